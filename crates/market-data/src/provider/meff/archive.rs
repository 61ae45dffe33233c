use std::io::{Cursor, Read};

use zip::ZipArchive;

use crate::errors::MarketDataError;

/// One decompressed file entry of a downloaded archive.
pub(crate) struct ArchiveEntry {
    pub name: String,
    pub data: Vec<u8>,
}

/// Decompresses every file entry of a ZIP payload.
///
/// An archive may hold several files (one per instrument class); the target
/// contract can appear in any of them, so all entries are returned and the
/// caller scans each one.
pub(crate) fn entries(payload: &[u8]) -> Result<Vec<ArchiveEntry>, MarketDataError> {
    let mut archive = ZipArchive::new(Cursor::new(payload)).map_err(|e| {
        MarketDataError::malformed(format!("payload is not a readable ZIP archive: {e}"))
    })?;

    let mut out = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let mut file = archive.by_index(index).map_err(|e| {
            MarketDataError::malformed(format!("failed to open archive entry {index}: {e}"))
        })?;
        if file.is_dir() {
            continue;
        }

        let name = file.name().to_string();
        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data).map_err(|e| {
            MarketDataError::malformed(format!("failed to decompress archive entry {name:?}: {e}"))
        })?;
        out.push(ArchiveEntry { name, data });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn build_zip(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in files {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn every_entry_is_decompressed() {
        let payload = build_zip(&[
            ("futures.txt", b"line one\n".as_slice()),
            ("options.txt", b"line two\n".as_slice()),
        ]);

        let entries = entries(&payload).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "futures.txt");
        assert_eq!(entries[0].data, b"line one\n");
        assert_eq!(entries[1].name, "options.txt");
        assert_eq!(entries[1].data, b"line two\n");
    }

    #[test]
    fn garbage_payload_is_malformed() {
        assert!(matches!(
            entries(b"definitely not a zip"),
            Err(MarketDataError::MalformedData { .. })
        ));
    }
}
