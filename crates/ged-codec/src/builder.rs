//! Record tree builder.
//!
//! [`RecordReader`] pulls raw lines, decodes and parses them, and groups them
//! into one [`Record`] per level-0 line. Nothing beyond the record currently
//! being built is kept in memory.
//!
//! Structural irregularities never stop the reader:
//!
//! - malformed and blank lines are skipped
//! - a level jump attaches the line to the deepest open structure below it
//! - a continuation attaches to the deepest open structure below its level
//! - a continuation with no owner is skipped
//! - an identifier on a substructure is discarded
//! - a non-zero level with no open record starts a new record
//!
//! Each of these except blank lines is counted in
//! [`RecordReader::irregular_lines`].
//!
//! Header lines may precede `HEAD.CHAR`, so the raw lines of a leading `HEAD`
//! record are held back until its `CHAR` line (or the next record) is seen and
//! only then decoded.

use std::borrow::Cow;
use std::collections::VecDeque;
use std::io::Read;

use ged_model::{Continuation, Line, ParsedLine, Record, Result, SourceEncoding, Structure};
use tracing::{debug, trace};

use crate::encoding::LineDecoder;
use crate::parser::parse_line;
use crate::reader::{LineReader, RawLine};

/// Lazy iterator of records over a byte source.
pub struct RecordReader<R: Read> {
    lines: LineReader<R>,
    decoder: Option<LineDecoder>,
    /// Raw header lines read ahead of the `CHAR` declaration.
    held: VecDeque<RawLine>,
    header_scanned: bool,
    /// Open structures; `stack[0]` is the record root.
    stack: Vec<Structure>,
    xref: Option<String>,
    in_header: bool,
    structures: usize,
    irregular: usize,
    finished: bool,
}

impl<R: Read> RecordReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: LineReader::new(reader),
            decoder: None,
            held: VecDeque::new(),
            header_scanned: false,
            stack: Vec::new(),
            xref: None,
            in_header: false,
            structures: 0,
            irregular: 0,
            finished: false,
        }
    }

    /// Encoding lines are currently decoded with.
    pub fn encoding(&self) -> SourceEncoding {
        self.decoder
            .as_ref()
            .map_or_else(SourceEncoding::default, LineDecoder::encoding)
    }

    /// Structures read so far, record roots included.
    pub fn structures(&self) -> usize {
        self.structures
    }

    /// Irregular lines absorbed so far.
    pub fn irregular_lines(&self) -> usize {
        self.irregular
    }

    /// Read lines until a record completes or the input ends.
    fn read_record(&mut self) -> Result<Option<Record>> {
        if !self.header_scanned {
            self.scan_header()?;
        }
        while let Some(raw) = self.next_raw()? {
            let detected = self.lines.detected();
            let decoder = self
                .decoder
                .get_or_insert_with(|| LineDecoder::new(detected));
            let text = decoder.decode(&raw)?;
            if text.trim().is_empty() {
                continue;
            }

            match parse_line(&text, raw.number) {
                Ok(ParsedLine::Line(line)) => {
                    if let Some(record) = self.push_line(line) {
                        return Ok(Some(record));
                    }
                }
                Ok(ParsedLine::Continuation(cont)) => self.fold(cont),
                Err(err) => {
                    self.irregular += 1;
                    debug!(line = err.number, reason = %err.reason, "skipping malformed line");
                }
            }
        }
        Ok(self.close())
    }

    fn next_raw(&mut self) -> Result<Option<RawLine>> {
        match self.held.pop_front() {
            Some(raw) => Ok(Some(raw)),
            None => self.lines.next_line(),
        }
    }

    /// Read ahead through a leading `HEAD` record and apply its `CHAR`
    /// declaration before any of its lines are decoded.
    ///
    /// Structure is recognised on a lossy view of the bytes: every supported
    /// encoding is ASCII-compatible once UTF-16 has been transcoded, and
    /// non-ASCII bytes only ever occur in values.
    fn scan_header(&mut self) -> Result<()> {
        self.header_scanned = true;
        let mut in_head = false;
        while let Some(raw) = self.lines.next_line()? {
            let parsed = match String::from_utf8_lossy(&raw.bytes) {
                Cow::Borrowed(text) => parse_line(text, raw.number),
                Cow::Owned(text) => parse_line(&text, raw.number),
            };
            self.held.push_back(raw);
            let Ok(ParsedLine::Line(line)) = parsed else {
                continue;
            };
            match line.level {
                0 if !in_head && line.tag == "HEAD" => in_head = true,
                0 => break,
                1 if in_head && line.tag == "CHAR" => {
                    self.declare_encoding(&line);
                    break;
                }
                _ if !in_head => break,
                _ => {}
            }
        }
        trace!(held = self.held.len(), "header scanned");
        Ok(())
    }

    /// Attach a line to the open record, returning the previous record when
    /// the line starts a new one.
    fn push_line(&mut self, line: Line) -> Option<Record> {
        self.structures += 1;

        if line.level == 0 || self.stack.is_empty() {
            if line.level != 0 {
                self.irregular += 1;
                debug!(line = line.number, level = line.level, "record starts above level 0");
            }
            let finished = self.close();
            self.in_header = line.tag == "HEAD";
            self.stack.push(Structure::from_line(&line));
            self.xref = line.xref;
            return finished;
        }

        if let Some(xref) = &line.xref {
            self.irregular += 1;
            debug!(line = line.number, xref = %xref, "identifier on a substructure discarded");
        }

        while self.stack.len() > 1
            && self
                .stack
                .last()
                .is_some_and(|top| top.source_level >= line.level)
        {
            self.pop_into_parent();
        }

        let parent_level = self.stack.last().map_or(0, |top| top.source_level);
        if line.level > parent_level.saturating_add(1) {
            self.irregular += 1;
            debug!(
                line = line.number,
                level = line.level,
                parent_level,
                "level jump, attaching to deepest open structure"
            );
        }

        if self.in_header && self.stack.len() == 1 && line.tag == "CHAR" {
            self.declare_encoding(&line);
        }

        self.stack.push(Structure::from_line(&line));
        None
    }

    fn declare_encoding(&mut self, line: &Line) {
        let declared = line.value.as_deref().unwrap_or("");
        let Some(encoding) = SourceEncoding::from_declared(declared) else {
            debug!(line = line.number, declared, "unrecognised CHAR declaration ignored");
            return;
        };
        let detected = self.lines.detected();
        let decoder = self
            .decoder
            .get_or_insert_with(|| LineDecoder::new(detected));
        if decoder.declare(encoding) {
            debug!(encoding = %encoding, "switching source encoding");
        }
    }

    /// Fold a `CONT`/`CONC` line into its owner's value.
    fn fold(&mut self, cont: Continuation) {
        let owner = if cont.level == 0 {
            None
        } else {
            self.stack
                .iter_mut()
                .rev()
                .find(|open| open.source_level < cont.level)
        };
        match owner {
            Some(owner) => {
                trace!(line = cont.number, tag = cont.kind.tag(), owner = %owner.tag, "continuation");
                owner.append_value(cont.kind.separator(), &cont.value);
            }
            None => {
                self.irregular += 1;
                debug!(line = cont.number, tag = cont.kind.tag(), "continuation without owner skipped");
            }
        }
    }

    fn pop_into_parent(&mut self) {
        if let Some(child) = self.stack.pop()
            && let Some(parent) = self.stack.last_mut()
        {
            parent.children.push(child);
        }
    }

    /// Close every open structure and return the finished record.
    fn close(&mut self) -> Option<Record> {
        while self.stack.len() > 1 {
            self.pop_into_parent();
        }
        let root = self.stack.pop()?;
        self.in_header = false;
        Some(Record::new(self.xref.take(), root))
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}
