//! Integration tests for reading and re-serializing GEDCOM streams.

use ged_codec::{GedWriter, RecordReader, SourceEncoding, split_text};
use ged_model::{ConvertOptions, Record};
use proptest::prelude::*;

/// Read every record from `input`.
fn read_all(input: &[u8]) -> Vec<Record> {
    RecordReader::new(input)
        .collect::<ged_codec::Result<Vec<_>>>()
        .unwrap()
}

/// Write records and read the output back.
fn reread(records: &[Record], options: &ConvertOptions) -> (String, Vec<Record>) {
    let mut writer = GedWriter::with_options(Vec::new(), options);
    for record in records {
        writer.write_record(record).unwrap();
    }
    let bytes = writer.into_inner().unwrap();
    let text = String::from_utf8(bytes.clone()).unwrap();
    (text, read_all(&bytes))
}

#[test]
fn test_crlf_file_round_trip() {
    let input = b"0 HEAD\r\n1 CHAR UTF-8\r\n0 @I1@ INDI\r\n1 NAME Ann /Lee/\r\n1 NOTE line one\r\n2 CONT line two\r\n0 TRLR\r\n";
    let records = read_all(input);
    assert_eq!(records.len(), 3);

    let (text, back) = reread(&records, &ConvertOptions::default());
    assert!(text.contains("1 NOTE line one\n2 CONT line two\n"));
    assert_eq!(back, records_without_lines(&records, &back));
}

/// Record trees compared after a re-read differ only in source positions.
fn records_without_lines(expected: &[Record], actual: &[Record]) -> Vec<Record> {
    fn copy_positions(dst: &mut ged_model::Structure, src: &ged_model::Structure) {
        dst.source_line = src.source_line;
        dst.source_level = src.source_level;
        for (d, s) in dst.children.iter_mut().zip(&src.children) {
            copy_positions(d, s);
        }
    }
    expected
        .iter()
        .zip(actual)
        .map(|(e, a)| {
            let mut fixed = e.clone();
            copy_positions(&mut fixed.root, &a.root);
            fixed
        })
        .collect()
}

#[test]
fn test_utf8_bom_source() {
    let input = "\u{FEFF}0 HEAD\n1 CHAR ANSEL\n0 @I1@ INDI\n1 NAME Zoë\n".as_bytes();
    let mut reader = RecordReader::new(input);
    let records: Vec<_> = reader.by_ref().collect::<ged_codec::Result<_>>().unwrap();
    // The byte-order mark outranks the ANSEL declaration.
    assert_eq!(reader.encoding(), SourceEncoding::Utf8);
    assert_eq!(records[1].root.children[0].value_str(), "Zoë");
}

#[test]
fn test_ansel_source() {
    let input = b"0 HEAD\n1 CHAR ANSEL\n0 @I1@ INDI\n1 NAME Fran\xF0cois\n";
    let records = read_all(input);
    assert_eq!(records[1].root.children[0].value_str(), "Franc\u{0327}ois");
}

#[test]
fn test_long_lines_reassemble() {
    let long = "word ".repeat(120);
    let input = format!("0 @N1@ NOTE {long}\n");
    let records = read_all(input.as_bytes());
    let options = ConvertOptions::new().with_line_limit(40);
    let (text, back) = reread(&records, &options);
    assert!(text.lines().all(|line| line.len() <= 40));
    assert!(text.lines().skip(1).all(|line| line.starts_with("1 CONC ")));
    assert_eq!(back[0].root.value_str(), long);
}

#[test]
fn test_multibyte_text_is_split_on_char_boundaries() {
    let value = "日本語のテキスト".repeat(10);
    let input = format!("0 @N1@ NOTE {value}\n");
    let records = read_all(input.as_bytes());
    let options = ConvertOptions::new().with_line_limit(32);
    let (text, back) = reread(&records, &options);
    assert!(text.lines().count() > 1);
    assert_eq!(back[0].root.value_str(), value);
}

proptest! {
    #[test]
    fn prop_split_reassembles(text in "[ a-zA-Z@é日]{0,200}", first in 1usize..40, rest in 1usize..40) {
        let chunks = split_text(&text, first, rest);
        prop_assert_eq!(chunks.concat(), text.clone());
        prop_assert!(!chunks.is_empty());
        if chunks.len() > 1 {
            prop_assert!(chunks.iter().all(|chunk| !chunk.is_empty()));
        }
    }

    #[test]
    fn prop_split_chunks_fit(text in "[a-z日]{0,120}", room in 4usize..40) {
        for chunk in split_text(&text, room, room) {
            prop_assert!(chunk.len() <= room);
        }
    }

    #[test]
    fn prop_written_value_reads_back(value in "[ a-zA-Z0-9@é]{1,300}", limit in 16usize..80) {
        let value = value.trim().to_string();
        prop_assume!(!value.is_empty() && !value.starts_with('@'));
        let input = format!("0 @N1@ NOTE {value}\n");
        let records = read_all(input.as_bytes());
        let options = ConvertOptions::new().with_line_limit(limit);
        let (_, back) = reread(&records, &options);
        prop_assert_eq!(back[0].root.value_str(), value.as_str());
    }
}
