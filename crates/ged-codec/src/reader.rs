//! Physical line reader.
//!
//! Splits a byte stream into raw lines on `\n`, `\r` or `\r\n`. The first
//! bytes are sniffed for a byte-order mark (or the `0\0` / `\00` pattern of an
//! unmarked UTF-16 file); UTF-16 input is transcoded to UTF-8 bytes here so
//! every later stage works on ASCII-compatible lines.

use std::io::{ErrorKind, Read};

use encoding_rs::{Decoder, DecoderResult, UTF_16BE, UTF_16LE};
use ged_model::{ConvertError, Result, SourceEncoding};

/// Bytes requested from the source per read.
const CHUNK_LEN: usize = 8 * 1024;

/// Longest byte-order mark.
const SNIFF_LEN: usize = 3;

/// One physical line, terminator removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// 1-based line number.
    pub number: usize,
    pub bytes: Vec<u8>,
}

/// Lazy line splitter over any byte source.
pub struct LineReader<R: Read> {
    reader: R,
    buf: Vec<u8>,
    pos: usize,
    eof: bool,
    sniffed: bool,
    detected: Option<SourceEncoding>,
    utf16: Option<Decoder>,
    number: usize,
}

impl<R: Read> LineReader<R> {
    /// Create a new line reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::with_capacity(CHUNK_LEN),
            pos: 0,
            eof: false,
            sniffed: false,
            detected: None,
            utf16: None,
            number: 0,
        }
    }

    /// Encoding implied by a byte-order mark or UTF-16 byte pattern, once the
    /// first chunk has been read.
    pub fn detected(&self) -> Option<SourceEncoding> {
        self.detected
    }

    /// Number of lines returned so far.
    pub fn line_number(&self) -> usize {
        self.number
    }

    /// Read the next raw line, or `None` at end of input.
    pub fn next_line(&mut self) -> Result<Option<RawLine>> {
        loop {
            let pending = &self.buf[self.pos..];
            if let Some(offset) = pending.iter().position(|&b| b == b'\n' || b == b'\r') {
                let end = self.pos + offset;
                // A trailing `\r` may be the first half of `\r\n`.
                if self.buf[end] == b'\r' && end + 1 == self.buf.len() && !self.eof {
                    self.fill()?;
                    continue;
                }
                let bytes = self.buf[self.pos..end].to_vec();
                let mut next = end + 1;
                if self.buf[end] == b'\r' && self.buf.get(next) == Some(&b'\n') {
                    next += 1;
                }
                self.pos = next;
                return Ok(Some(self.emit(bytes)));
            }
            if self.eof {
                if self.pos < self.buf.len() {
                    let bytes = self.buf[self.pos..].to_vec();
                    self.pos = self.buf.len();
                    return Ok(Some(self.emit(bytes)));
                }
                return Ok(None);
            }
            self.fill()?;
        }
    }

    fn emit(&mut self, bytes: Vec<u8>) -> RawLine {
        self.number += 1;
        RawLine {
            number: self.number,
            bytes,
        }
    }

    /// Read one more chunk from the source into the line buffer.
    fn fill(&mut self) -> Result<()> {
        if self.pos > 0 {
            self.buf.drain(..self.pos);
            self.pos = 0;
        }
        if !self.sniffed {
            return self.fill_first();
        }

        let mut chunk = [0u8; CHUNK_LEN];
        let read = self.read_chunk(&mut chunk)?;
        if read == 0 {
            self.eof = true;
        }
        self.push_bytes(&chunk[..read])
    }

    /// Buffer enough of the source to recognise a byte-order mark, then sniff
    /// it. Sources may hand out fewer bytes per read than a mark is long.
    fn fill_first(&mut self) -> Result<()> {
        self.sniffed = true;
        let mut prefix = Vec::with_capacity(CHUNK_LEN);
        let mut chunk = [0u8; CHUNK_LEN];
        while prefix.len() < SNIFF_LEN {
            let read = self.read_chunk(&mut chunk)?;
            if read == 0 {
                self.eof = true;
                break;
            }
            prefix.extend_from_slice(&chunk[..read]);
        }
        let bytes = self.sniff(&prefix);
        self.push_bytes(bytes)
    }

    fn read_chunk(&mut self, chunk: &mut [u8]) -> Result<usize> {
        loop {
            match self.reader.read(chunk) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(ConvertError::Io(e)),
            }
        }
    }

    fn push_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if self.utf16.is_some() {
            self.transcode(bytes, self.eof)
        } else {
            self.buf.extend_from_slice(bytes);
            Ok(())
        }
    }

    /// Inspect the first chunk and strip a UTF-8 byte-order mark.
    fn sniff<'a>(&mut self, bytes: &'a [u8]) -> &'a [u8] {
        match bytes {
            [0xEF, 0xBB, 0xBF, rest @ ..] => {
                self.detected = Some(SourceEncoding::Utf8);
                rest
            }
            [0xFF, 0xFE, ..] | [b'0', 0x00, ..] => {
                self.detected = Some(SourceEncoding::Utf16Le);
                self.utf16 = Some(UTF_16LE.new_decoder_with_bom_removal());
                bytes
            }
            [0xFE, 0xFF, ..] | [0x00, b'0', ..] => {
                self.detected = Some(SourceEncoding::Utf16Be);
                self.utf16 = Some(UTF_16BE.new_decoder_with_bom_removal());
                bytes
            }
            _ => bytes,
        }
    }

    /// Transcode a UTF-16 chunk into UTF-8 bytes appended to the buffer.
    fn transcode(&mut self, mut src: &[u8], last: bool) -> Result<()> {
        let Some(decoder) = self.utf16.as_mut() else {
            return Ok(());
        };
        let encoding = self.detected.unwrap_or(SourceEncoding::Utf16Le);
        let mut out = String::new();
        loop {
            let needed = decoder
                .max_utf8_buffer_length_without_replacement(src.len())
                .unwrap_or(src.len() * 3 + 16);
            out.reserve(needed);
            let (result, read) = decoder.decode_to_string_without_replacement(src, &mut out, last);
            src = &src[read..];
            match result {
                DecoderResult::InputEmpty => break,
                DecoderResult::OutputFull => {}
                DecoderResult::Malformed(_, _) => {
                    let pending_lines = self.buf[self.pos..]
                        .iter()
                        .filter(|&&b| b == b'\n')
                        .count();
                    let line = self.number + pending_lines + out.matches('\n').count() + 1;
                    return Err(ConvertError::encoding(
                        line,
                        encoding,
                        "malformed UTF-16 code unit sequence",
                    ));
                }
            }
        }
        self.buf.extend_from_slice(out.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &[u8]) -> Vec<String> {
        let mut reader = LineReader::new(input);
        let mut lines = Vec::new();
        while let Some(line) = reader.next_line().unwrap() {
            lines.push(String::from_utf8(line.bytes).unwrap());
        }
        lines
    }

    #[test]
    fn test_mixed_terminators() {
        assert_eq!(
            collect(b"0 HEAD\r\n1 CHAR ASCII\r0 TRLR\n"),
            vec!["0 HEAD", "1 CHAR ASCII", "0 TRLR"]
        );
    }

    #[test]
    fn test_final_line_without_terminator() {
        assert_eq!(collect(b"0 HEAD\n0 TRLR"), vec!["0 HEAD", "0 TRLR"]);
    }

    #[test]
    fn test_blank_lines_are_kept() {
        assert_eq!(collect(b"a\n\nb\n"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        let mut reader = LineReader::new(&b"\xEF\xBB\xBF0 HEAD\n"[..]);
        let line = reader.next_line().unwrap().unwrap();
        assert_eq!(line.bytes, b"0 HEAD");
        assert_eq!(reader.detected(), Some(SourceEncoding::Utf8));
    }

    #[test]
    fn test_utf16le_is_transcoded() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "0 HEAD\r\n1 NOTE é\r\n".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let mut reader = LineReader::new(&bytes[..]);
        let first = reader.next_line().unwrap().unwrap();
        let second = reader.next_line().unwrap().unwrap();
        assert_eq!(first.bytes, b"0 HEAD");
        assert_eq!(String::from_utf8(second.bytes).unwrap(), "1 NOTE é");
        assert_eq!(second.number, 2);
        assert!(reader.next_line().unwrap().is_none());
        assert_eq!(reader.detected(), Some(SourceEncoding::Utf16Le));
    }

    #[test]
    fn test_utf16be_without_bom() {
        let mut bytes = Vec::new();
        for unit in "0 HEAD\n0 TRLR\n".encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        assert_eq!(collect(&bytes), vec!["0 HEAD", "0 TRLR"]);
    }

    #[test]
    fn test_malformed_utf16_is_fatal() {
        let mut bytes = vec![0xFF, 0xFE];
        bytes.extend_from_slice(&u16::from(b'0').to_le_bytes());
        bytes.extend_from_slice(&0xDC00u16.to_le_bytes());
        let mut reader = LineReader::new(&bytes[..]);
        let err = reader.next_line().unwrap_err();
        assert!(matches!(err, ConvertError::Encoding { line: 1, .. }));
    }

    /// Hands out one byte per read, like a slow pipe.
    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let Some((&first, rest)) = self.0.split_first() else {
                return Ok(0);
            };
            if buf.is_empty() {
                return Ok(0);
            }
            buf[0] = first;
            self.0 = rest;
            Ok(1)
        }
    }

    #[test]
    fn test_bom_split_across_reads() {
        let mut reader = LineReader::new(Trickle(b"\xEF\xBB\xBF0 HEAD\n1 CHAR UTF-8\n"));
        assert_eq!(reader.next_line().unwrap().unwrap().bytes, b"0 HEAD");
        assert_eq!(reader.detected(), Some(SourceEncoding::Utf8));
        assert_eq!(reader.next_line().unwrap().unwrap().bytes, b"1 CHAR UTF-8");
        assert!(reader.next_line().unwrap().is_none());
    }

    #[test]
    fn test_utf16_detected_across_reads() {
        let mut bytes = Vec::new();
        for unit in "0 HEAD\n0 TRLR\n".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let mut reader = LineReader::new(Trickle(&bytes));
        assert_eq!(reader.next_line().unwrap().unwrap().bytes, b"0 HEAD");
        assert_eq!(reader.next_line().unwrap().unwrap().bytes, b"0 TRLR");
        assert!(reader.next_line().unwrap().is_none());
        assert_eq!(reader.detected(), Some(SourceEncoding::Utf16Le));
    }

    #[test]
    fn test_short_input_without_bom() {
        assert_eq!(collect(b"0"), vec!["0"]);
    }
}
