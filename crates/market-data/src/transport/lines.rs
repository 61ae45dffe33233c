use encoding_rs::Encoding;

/// Incremental byte-to-line splitter.
///
/// Bytes are pushed in whatever chunks the source produces; complete lines
/// are popped as soon as a newline is buffered. Decoding happens per
/// complete line, so a multi-byte sequence split across chunk boundaries
/// never yields a mangled character. A trailing `\r` is stripped and lines
/// that end up empty are skipped rather than handed to a parser.
///
/// The sequence is forward-only and not restartable; call [`finish`] once
/// the source is exhausted to recover an unterminated last line.
///
/// [`finish`]: LineSplitter::finish
pub struct LineSplitter {
    encoding: &'static Encoding,
    buf: Vec<u8>,
    start: usize,
}

impl LineSplitter {
    /// A splitter decoding lines with the given encoding.
    pub fn new(encoding: &'static Encoding) -> Self {
        Self {
            encoding,
            buf: Vec::new(),
            start: 0,
        }
    }

    /// A UTF-8 splitter, the right choice for the Yahoo CSV feed.
    pub fn utf8() -> Self {
        Self::new(encoding_rs::UTF_8)
    }

    /// A Windows-1252 splitter for the MEFF archives, which carry
    /// Spanish-locale text.
    pub fn windows_1252() -> Self {
        Self::new(encoding_rs::WINDOWS_1252)
    }

    /// Appends a chunk of raw bytes to the buffer.
    pub fn push(&mut self, chunk: &[u8]) {
        if self.start > 0 {
            self.buf.drain(..self.start);
            self.start = 0;
        }
        self.buf.extend_from_slice(chunk);
    }

    /// Pops the next complete non-empty line, without its newline.
    ///
    /// Returns `None` once no full line is buffered; the partial tail stays
    /// buffered until more bytes arrive or [`finish`](Self::finish) is called.
    pub fn pop_line(&mut self) -> Option<String> {
        loop {
            let newline = self.buf[self.start..].iter().position(|&b| b == b'\n')?;
            let line_start = self.start;
            let mut line_end = line_start + newline;
            self.start = line_end + 1;

            if line_end > line_start && self.buf[line_end - 1] == b'\r' {
                line_end -= 1;
            }
            if line_end == line_start {
                continue;
            }

            let (text, _, _) = self.encoding.decode(&self.buf[line_start..line_end]);
            return Some(text.into_owned());
        }
    }

    /// Consumes the unterminated tail left after the stream ends, if any.
    pub fn finish(&mut self) -> Option<String> {
        let start = self.start;
        let mut end = self.buf.len();
        self.start = end;

        if end > start && self.buf[end - 1] == b'\r' {
            end -= 1;
        }
        if end <= start {
            return None;
        }

        let (text, _, _) = self.encoding.decode(&self.buf[start..end]);
        Some(text.into_owned())
    }
}
