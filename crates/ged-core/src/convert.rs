//! The conversion driver.

use std::io::{Read, Write};
use std::time::Instant;

use ged_codec::{GedWriter, RecordReader};
use ged_model::{ConversionStats, ConvertOptions, Record, Result};
use ged_transform::{Transformer, rewrite_header, trailer};
use tracing::{debug, info, info_span};

/// Convert a GEDCOM 5.5.1 byte stream into GEDCOM 7.0.
///
/// Records are read, transformed and written one at a time. The first
/// record is replaced by a 7.0 header (or preceded by one when it is not a
/// header). The first `TRLR` is held back and written last; a trailer is
/// synthesized when the source has none.
///
/// On error the sink holds whatever was written before the failure.
pub fn convert<R: Read, W: Write>(
    source: R,
    sink: W,
    options: &ConvertOptions,
) -> Result<ConversionStats> {
    let span = info_span!(
        "convert",
        xref_case_insensitive = options.xref_case_insensitive,
        omit_phrases = options.omit_phrases
    );
    let _guard = span.enter();
    let start = Instant::now();

    let mut reader = RecordReader::new(source);
    let mut writer = GedWriter::with_options(sink, options);
    let mut transformer = Transformer::new(options.clone());
    let mut stats = ConversionStats::default();

    let mut header_written = false;
    let mut pending_trailer: Option<Record> = None;

    for record in reader.by_ref() {
        let record = record?;
        stats.records += 1;

        if !header_written {
            header_written = true;
            if record.is_header() {
                let header = rewrite_header(transformer.transform(record));
                write(&mut writer, &header, &mut stats)?;
                continue;
            }
            debug!(tag = record.tag(), "source has no header, writing a minimal one");
            write(&mut writer, &rewrite_header(None), &mut stats)?;
        }

        if record.is_trailer() {
            if pending_trailer.is_some() {
                debug!("duplicate trailer ignored");
            } else {
                pending_trailer = Some(record);
            }
            continue;
        }
        if pending_trailer.is_some() {
            debug!(tag = record.tag(), "record after trailer");
        }

        if let Some(record) = transformer.transform(record) {
            write(&mut writer, &record, &mut stats)?;
        }
    }

    if !header_written {
        write(&mut writer, &rewrite_header(None), &mut stats)?;
    }
    let trailer = pending_trailer.unwrap_or_else(|| {
        debug!("source has no trailer, appending one");
        trailer()
    });
    write(&mut writer, &trailer, &mut stats)?;
    writer.flush()?;

    stats.source_encoding = reader.encoding();
    stats.structures = reader.structures();
    stats.irregular_lines = reader.irregular_lines();
    stats.lines_written = writer.lines_written();
    transformer.counts().add_to(&mut stats);

    info!(
        records = stats.records,
        records_written = stats.records_written,
        lines_written = stats.lines_written,
        rewritten = stats.rewritten(),
        irregular_lines = stats.irregular_lines,
        encoding = %stats.source_encoding,
        duration_ms = start.elapsed().as_millis(),
        "conversion complete"
    );
    Ok(stats)
}

fn write<W: Write>(
    writer: &mut GedWriter<W>,
    record: &Record,
    stats: &mut ConversionStats,
) -> Result<()> {
    writer.write_record(record)?;
    stats.records_written += 1;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: &str) -> (String, ConversionStats) {
        let mut out = Vec::new();
        let stats = convert(input.as_bytes(), &mut out, &ConvertOptions::default()).unwrap();
        (String::from_utf8(out).unwrap(), stats)
    }

    #[test]
    fn test_empty_input_gets_header_and_trailer() {
        let (out, stats) = run("");
        assert!(out.starts_with("0 HEAD\n1 GEDC\n2 VERS 7.0\n"));
        assert!(out.ends_with("0 TRLR\n"));
        assert_eq!(stats.records, 0);
        assert_eq!(stats.records_written, 2);
    }

    #[test]
    fn test_records_after_trailer_are_kept() {
        let (out, stats) = run("0 HEAD\n0 TRLR\n0 @I1@ INDI\n0 TRLR\n");
        assert!(out.ends_with("0 @I1@ INDI\n0 TRLR\n"));
        assert_eq!(out.matches("0 TRLR").count(), 1);
        assert_eq!(stats.records, 4);
    }

    #[test]
    fn test_stats() {
        let (_, stats) = run("0 HEAD\n1 CHAR ASCII\n0 @I1@ INDI\n1 SEX Q\n2 FOO\n4 BAR\n0 TRLR\n");
        assert_eq!(stats.records, 3);
        assert_eq!(stats.structures, 7);
        assert_eq!(stats.phrases_added, 1);
        assert_eq!(stats.dropped, 1);
        assert_eq!(stats.irregular_lines, 1);
    }
}
