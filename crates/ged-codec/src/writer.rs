//! GEDCOM 7.0 serializer.
//!
//! Writes record trees depth-first as `LEVEL [@ID@] TAG [VALUE]` lines with
//! levels taken from tree depth. Multi-line values are written as `CONT`
//! lines; with a line limit, long text is further split into `CONC` lines.
//! Pointers and extension tag definitions (`SCHMA.TAG`) are never split.

use std::io::{BufWriter, Write};

use ged_model::{ContinuationKind, ConvertOptions, DEFAULT_LINE_LIMIT, Record, Result, Structure};

/// Tags whose payload is an identifier rather than text.
const UNSPLIT_TAGS: [&str; 1] = ["TAG"];

/// UTF-8 byte-order mark.
const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Streaming record serializer.
pub struct GedWriter<W: Write> {
    writer: BufWriter<W>,
    line_limit: Option<usize>,
    byte_order_mark: bool,
    started: bool,
    lines_written: usize,
}

impl<W: Write> GedWriter<W> {
    /// Create a writer with the default line limit and no byte-order mark.
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            line_limit: Some(DEFAULT_LINE_LIMIT),
            byte_order_mark: false,
            started: false,
            lines_written: 0,
        }
    }

    /// Create a writer honouring the line limit and byte-order mark options.
    ///
    /// The line limit applies to text only, so a pointer or `TAG` line may
    /// still exceed it.
    pub fn with_options(writer: W, options: &ConvertOptions) -> Self {
        Self {
            line_limit: options.line_limit,
            byte_order_mark: options.byte_order_mark,
            ..Self::new(writer)
        }
    }

    /// Physical lines written so far.
    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    /// Serialize one record. Returns the number of lines written.
    pub fn write_record(&mut self, record: &Record) -> Result<usize> {
        let before = self.lines_written;
        self.write_structure(0, record.xref.as_deref(), &record.root)?;
        Ok(self.lines_written - before)
    }

    /// Flush buffered output.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and return the underlying sink.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| e.into_error().into())
    }

    fn write_structure(&mut self, level: usize, xref: Option<&str>, node: &Structure) -> Result<()> {
        let mut prefix = format!("{level} ");
        if let Some(xref) = xref {
            prefix.push_str(xref);
            prefix.push(' ');
        }
        prefix.push_str(&node.tag);

        match node.value.as_deref() {
            None | Some("") => self.write_line(&prefix, "", false)?,
            Some(value) if node.is_pointer() => self.write_line(&prefix, value, false)?,
            Some(value) => {
                let split = !UNSPLIT_TAGS.contains(&node.tag.as_str());
                let cont_prefix = format!("{} {}", level + 1, ContinuationKind::Cont.tag());
                for (idx, segment) in value.split('\n').enumerate() {
                    let segment = segment.strip_suffix('\r').unwrap_or(segment);
                    let head = if idx == 0 { &prefix } else { &cont_prefix };
                    self.write_text(head, segment, level + 1, split)?;
                }
            }
        }

        for child in &node.children {
            self.write_structure(level + 1, None, child)?;
        }
        Ok(())
    }

    /// Write one logical text line, splitting it with `CONC` when too long.
    fn write_text(&mut self, head: &str, text: &str, cont_level: usize, split: bool) -> Result<()> {
        let Some(limit) = self.line_limit.filter(|_| split) else {
            return self.write_line(head, text, true);
        };
        let conc_prefix = format!("{cont_level} {}", ContinuationKind::Conc.tag());
        // Room for payload after "<head> " and "<conc_prefix> ".
        let first_room = limit.saturating_sub(head.len() + 1);
        let rest_room = limit.saturating_sub(conc_prefix.len() + 1);

        let mut chunks = split_text(text, first_room, rest_room).into_iter();
        if let Some(first) = chunks.next() {
            self.write_line(head, first, true)?;
        }
        for chunk in chunks {
            self.write_line(&conc_prefix, chunk, true)?;
        }
        Ok(())
    }

    /// Write `head`, then ` text` when `text` is non-empty. Text that is not
    /// a pointer has a leading `@` doubled.
    fn write_line(&mut self, head: &str, text: &str, is_text: bool) -> Result<()> {
        if !self.started {
            self.started = true;
            if self.byte_order_mark {
                self.writer.write_all(BOM)?;
            }
        }
        self.writer.write_all(head.as_bytes())?;
        if !text.is_empty() {
            self.writer.write_all(b" ")?;
            if is_text && text.starts_with('@') {
                self.writer.write_all(b"@")?;
            }
            self.writer.write_all(text.as_bytes())?;
        }
        self.writer.write_all(b"\n")?;
        self.lines_written += 1;
        Ok(())
    }
}

/// Split `text` into chunks of at most `first_room` bytes for the first chunk
/// and `rest_room` bytes for the others.
///
/// Chunks end on char boundaries and hold at least one char. A chunk starting
/// with `@` gets one byte less room, since it is written with a doubled `@`.
/// Where possible, a cut is moved back so that the next chunk does not start
/// with a space or `@`. Concatenating the chunks yields `text`.
#[must_use]
pub fn split_text(text: &str, first_room: usize, rest_room: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut rest = text;
    let mut base = first_room;

    loop {
        let room = base.saturating_sub(usize::from(rest.starts_with('@'))).max(1);
        if rest.len() <= room {
            break;
        }

        let mut cut = floor_char_boundary(rest, room);
        if cut == 0 {
            cut = rest.chars().next().map_or(rest.len(), char::len_utf8);
        }
        if cut >= rest.len() {
            break;
        }

        let mut back = cut;
        while back > 0 && matches!(rest.as_bytes()[back], b' ' | b'@') {
            back = floor_char_boundary(rest, back - 1);
        }
        if back > 0 {
            cut = back;
        }

        chunks.push(&rest[..cut]);
        rest = &rest[cut..];
        base = rest_room;
    }

    chunks.push(rest);
    chunks
}

/// Largest char boundary of `text` not above `index`.
fn floor_char_boundary(text: &str, index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    let mut idx = index;
    while !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}
