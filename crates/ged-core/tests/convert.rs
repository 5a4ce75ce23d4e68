//! End-to-end conversion tests.

use ged_codec::RecordReader;
use ged_core::{ConvertError, ConvertOptions, SourceEncoding, convert};
use ged_model::Structure;
use proptest::prelude::*;

fn run(input: &[u8], options: &ConvertOptions) -> String {
    let mut out = Vec::new();
    convert(input, &mut out, options).unwrap();
    String::from_utf8(out).unwrap()
}

/// Output with the fixed header lines removed, for compact snapshots.
fn body(output: &str) -> String {
    output
        .lines()
        .skip_while(|line| !line.starts_with("0 ") || line.starts_with("0 HEAD"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_full_file() {
    let input = "\
0 HEAD
1 SOUR MyApp
2 VERS 1.0
1 GEDC
2 VERS 5.5.1
2 FORM LINEAGE-LINKED
1 CHAR UTF-8
1 LANG English
1 SUBM @U1@
1 DATE 1 JAN 2020
0 @U1@ SUBM
1 NAME Ann Submitter
0 @I1@ INDI
1 NAME John /Doe/
1 SEX Male
1 BIRT
2 DATE @#DJULIAN@ 1 JAN 1700
2 PLAC Boston
3 FORM City, State
1 FAMS @F1@
0 @F1@ FAM
1 HUSB @I1@
1 MARR
2 TYPE Civil
0 TRLR
";
    let output = run(input.as_bytes(), &ConvertOptions::default());
    insta::assert_snapshot!(output.trim_end(), @r"
0 HEAD
1 GEDC
2 VERS 7.0
1 SCHMA
2 TAG _FONE https://gedcom.io/terms/v5.5.1/FONE
2 TAG _ROMN https://gedcom.io/terms/v5.5.1/ROMN
2 TAG _ANCI https://gedcom.io/terms/v5.5.1/ANCI
2 TAG _DESI https://gedcom.io/terms/v5.5.1/DESI
1 SOUR MyApp
2 VERS 1.0
1 DATE 1 JAN 2020
1 SUBM @U1@
1 LANG en
0 @U1@ SUBM
1 NAME Ann Submitter
0 @I1@ INDI
1 NAME John /Doe/
1 SEX M
1 BIRT
2 DATE JULIAN 1 JAN 1700
2 PLAC Boston
3 FORM City, State
1 FAMS @F1@
0 @F1@ FAM
1 HUSB @I1@
1 MARR
2 TYPE Civil
0 TRLR
");
}

#[test]
fn test_male_maps_to_code() {
    let input = "0 @I1@ INDI\n1 NAME John /Doe/\n1 SEX Male\n";
    let output = run(input.as_bytes(), &ConvertOptions::default());
    insta::assert_snapshot!(body(&output), @r"
0 @I1@ INDI
1 NAME John /Doe/
1 SEX M
0 TRLR
");
}

#[test]
fn test_unspecified_sex_phrase_policy() {
    let input = "0 @I1@ INDI\n1 NAME John /Doe/\n1 SEX Unspecified\n";

    let kept = run(input.as_bytes(), &ConvertOptions::default());
    insta::assert_snapshot!(body(&kept), @r"
0 @I1@ INDI
1 NAME John /Doe/
1 SEX
2 PHRASE Unspecified
0 TRLR
");

    let omitted = run(input.as_bytes(), &ConvertOptions::new().with_omit_phrases(true));
    insta::assert_snapshot!(body(&omitted), @r"
0 @I1@ INDI
1 NAME John /Doe/
1 SEX
0 TRLR
");
}

#[test]
fn test_case_folding_unifies_identifiers() {
    let input = "0 @i1@ INDI\n1 FAMC @f1@\n0 @f1@ FAM\n1 CHIL @I1@\n";
    let options = ConvertOptions::new().with_xref_case_insensitive(true);
    let output = run(input.as_bytes(), &options);
    insta::assert_snapshot!(body(&output), @r"
0 @I1@ INDI
1 FAMC @F1@
0 @F1@ FAM
1 CHIL @I1@
0 TRLR
");

    let unchanged = run(input.as_bytes(), &ConvertOptions::default());
    assert!(unchanged.contains("0 @i1@ INDI\n1 FAMC @f1@\n"));
}

#[test]
fn test_ansel_source_becomes_utf8() {
    let input = b"0 HEAD\n1 CHAR ANSEL\n0 @I1@ INDI\n1 NAME Ren\xE2e /Fran\xF0cois/\n0 TRLR\n";
    let mut out = Vec::new();
    let stats = convert(&input[..], &mut out, &ConvertOptions::default()).unwrap();
    let output = String::from_utf8(out).unwrap();
    assert!(output.contains("1 NAME Rene\u{0301} /Franc\u{0327}ois/\n"));
    assert_eq!(stats.source_encoding, SourceEncoding::Ansel);
}

#[test]
fn test_header_text_before_char_uses_declared_encoding() {
    let input = b"0 HEAD\n1 NOTE Exported by M\xE8uller\n1 CHAR ANSEL\n0 @I1@ INDI\n0 TRLR\n";
    let mut out = Vec::new();
    let stats = convert(&input[..], &mut out, &ConvertOptions::default()).unwrap();
    let output = String::from_utf8(out).unwrap();
    assert!(output.contains("1 NOTE Exported by Mu\u{0308}ller\n"));
    assert_eq!(stats.source_encoding, SourceEncoding::Ansel);
}

#[test]
fn test_padded_pointer_is_still_a_pointer() {
    let input = "0 @i1@ INDI\n1 FAMC @f1@ \n1 NOTE  @n1@\n0 @f1@ FAM\n0 @n1@ NOTE shared\n";
    let options = ConvertOptions::new().with_xref_case_insensitive(true);
    let output = run(input.as_bytes(), &options);
    assert!(output.contains("0 @I1@ INDI\n1 FAMC @F1@\n1 SNOTE @N1@\n"));
    assert!(output.contains("0 @F1@ FAM\n"));
}

#[test]
fn test_byte_order_mark_option() {
    let options = ConvertOptions::new().with_byte_order_mark(true);
    let output = run(b"0 HEAD\n0 TRLR\n", &options);
    assert!(output.starts_with("\u{FEFF}0 HEAD\n"));
}

#[test]
fn test_encoding_failure_reports_line() {
    let input = b"0 HEAD\n1 CHAR ASCII\n0 @I1@ INDI\n1 NAME Ren\xE9\n";
    let mut out = Vec::new();
    let err = convert(&input[..], &mut out, &ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, ConvertError::Encoding { line: 4, .. }));
    assert!(!err.is_io());
    // The header was already written when the bad line was met.
    assert!(String::from_utf8(out).unwrap().starts_with("0 HEAD\n"));
}

/// A sink that accepts a fixed number of bytes, then fails.
struct FailingSink {
    room: usize,
}

impl std::io::Write for FailingSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if self.room == 0 {
            return Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"));
        }
        let n = buf.len().min(self.room);
        self.room -= n;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_sink_failure_is_io_error() {
    let input = "0 @N1@ NOTE x\n".repeat(2000);
    let err = convert(input.as_bytes(), FailingSink { room: 64 }, &ConvertOptions::default())
        .unwrap_err();
    assert!(err.is_io());
}

#[test]
fn test_irregular_input_is_converted() {
    let input = "0 HEAD\nnot a line\n0 @I1@ INDI\n1 BIRT\n3 DATE 1900\n4 CONC  more\n";
    let output = run(input.as_bytes(), &ConvertOptions::default());
    insta::assert_snapshot!(body(&output), @r"
0 @I1@ INDI
1 BIRT
2 DATE 1900 more
0 TRLR
");
}

/// Tags that only exist in 5.5.1 and must never reach the output.
const LEGACY_TAGS: [&str; 11] = [
    "CHAR", "SUBN", "BLOB", "EMAI", "FONE", "ROMN", "AFN", "RFN", "RIN", "_UID", "CONC",
];

fn collect_tags(node: &Structure, tags: &mut Vec<String>) {
    tags.push(node.tag.clone());
    for child in &node.children {
        collect_tags(child, tags);
    }
}

fn tag_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "NAME", "SEX", "BIRT", "DATE", "PLAC", "NOTE", "EMAI", "FONE", "ROMN", "AFN", "RIN",
        "BLOB", "ASSO", "RELA", "FAMC", "PEDI", "_UID", "ADDR", "ADR1", "CITY", "TYPE",
    ])
}

proptest! {
    #[test]
    fn prop_output_has_no_legacy_tags(
        lines in prop::collection::vec((1u8..4, tag_strategy(), "[A-Za-z ]{0,12}"), 0..30),
    ) {
        let mut input = String::from("0 HEAD\n1 CHAR ASCII\n0 @I1@ INDI\n");
        let mut level = 0u8;
        for (step, tag, value) in lines {
            level = step.min(level + 1);
            input.push_str(&format!("{level} {tag} {value}\n"));
        }
        input.push_str("0 @U1@ SUBN\n1 FAMF f\n0 TRLR\n");

        let output = run(input.as_bytes(), &ConvertOptions::default().without_line_limit());
        let mut tags = Vec::new();
        for record in RecordReader::new(output.as_bytes()) {
            collect_tags(&record.unwrap().root, &mut tags);
        }
        for legacy in LEGACY_TAGS {
            prop_assert!(!tags.iter().any(|tag| tag == legacy), "{legacy} in output:\n{output}");
        }
    }

    #[test]
    fn prop_long_notes_survive_splitting(
        text in "[A-Za-z0-9 ,.]{1,600}",
        limit in 20usize..120,
    ) {
        let text = text.trim().to_string();
        prop_assume!(!text.is_empty());
        let input = format!("0 @N1@ NOTE {text}\n");
        let output = run(input.as_bytes(), &ConvertOptions::new().with_line_limit(limit));
        prop_assert!(body(&output).lines().all(|line| line.len() <= limit));

        let note = RecordReader::new(output.as_bytes())
            .map(Result::unwrap)
            .find(|record| record.tag() == "SNOTE")
            .unwrap();
        prop_assert_eq!(note.root.value_str(), text.as_str());
    }
}
