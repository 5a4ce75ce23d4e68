//! Subtree rewrites for 5.5.1 shapes that have a different 7.0 shape.

use ged_model::Structure;
use tracing::debug;

use crate::rules::Context;

/// Base of the URIs naming 7.0 standard structures.
pub const V7_TERMS: &str = "https://gedcom.io/terms/v7/";

/// Address lines folded into the `ADDR` value.
const ADDRESS_LINES: [&str; 3] = ["ADR1", "ADR2", "ADR3"];

/// Address parts moved to the front, in this order.
const ADDRESS_ORDER: [&str; 4] = ["CITY", "STAE", "POST", "CTRY"];

/// `ADDR`: fold `ADR1`..`ADR3` into the multi-line value and order the
/// address parts `CITY`, `STAE`, `POST`, `CTRY`, then everything else.
pub fn address(mut node: Structure, _ctx: &Context<'_>) -> Structure {
    let mut lines: Vec<String> = node
        .value
        .as_deref()
        .map(|value| value.split('\n').map(str::to_string).collect())
        .unwrap_or_default();
    lines.retain(|line| !line.is_empty());

    for tag in ADDRESS_LINES {
        for adr in node.take_children(tag) {
            let text = adr.value_str().trim();
            if !text.is_empty() && !lines.iter().any(|line| line.trim() == text) {
                lines.push(text.to_string());
            }
        }
    }
    node.value = (!lines.is_empty()).then(|| lines.join("\n"));

    let mut ordered = Vec::with_capacity(node.children.len());
    for tag in ADDRESS_ORDER {
        ordered.extend(node.take_children(tag));
    }
    ordered.append(&mut node.children);
    node.children = ordered;
    node
}

/// `AFN`, `RFN`, `RIN`: become `EXID` with a `TYPE` naming the old tag.
pub fn external_id(mut node: Structure, _ctx: &Context<'_>) -> Structure {
    let kind = Structure::new("TYPE").with_value(format!("{V7_TERMS}{}", node.tag));
    node.tag = "EXID".to_string();
    node.children.insert(0, kind);
    node
}

/// `NOTE` records and `NOTE` pointers become `SNOTE`.
pub fn shared_note(mut node: Structure, ctx: &Context<'_>) -> Structure {
    if ctx.depth == 0 || node.is_pointer() {
        node.tag = "SNOTE".to_string();
    }
    node
}

/// `FORM`: multimedia format name to media type.
pub fn media_type(mut node: Structure, _ctx: &Context<'_>) -> Structure {
    let Some(format) = node.value.as_deref().map(str::trim).filter(|v| !v.is_empty()) else {
        return node;
    };
    let format = format.trim_start_matches('.').to_ascii_lowercase();
    let media = match format.as_str() {
        "bmp" => "image/bmp".to_string(),
        "gif" => "image/gif".to_string(),
        "jpg" | "jpeg" => "image/jpeg".to_string(),
        "png" => "image/png".to_string(),
        "tif" | "tiff" => "image/tiff".to_string(),
        "pcx" => "image/vnd.zbrush.pcx".to_string(),
        "svg" => "image/svg+xml".to_string(),
        "wav" => "audio/wav".to_string(),
        "mp3" => "audio/mpeg".to_string(),
        "avi" => "video/x-msvideo".to_string(),
        "mov" => "video/quicktime".to_string(),
        "mp4" => "video/mp4".to_string(),
        "mpg" | "mpeg" => "video/mpeg".to_string(),
        "pdf" => "application/pdf".to_string(),
        "txt" => "text/plain".to_string(),
        "htm" | "html" => "text/html".to_string(),
        other if other.contains('/') => other.to_string(),
        other => {
            let name: String = other
                .chars()
                .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '+' | '.'))
                .collect();
            debug!(format = other, "unknown multimedia format");
            format!("application/x-{name}")
        }
    };
    node.value = Some(media);
    node
}

/// Language names used by 5.5.1 and their BCP 47 tags.
const LANGUAGES: &[(&str, &str)] = &[
    ("AFRIKAANS", "af"),
    ("ALBANIAN", "sq"),
    ("AMHARIC", "am"),
    ("ARABIC", "ar"),
    ("ARMENIAN", "hy"),
    ("ASSAMESE", "as"),
    ("BELORUSIAN", "be"),
    ("BENGALI", "bn"),
    ("BRAJ", "bra"),
    ("BULGARIAN", "bg"),
    ("BURMESE", "my"),
    ("CANTONESE", "yue"),
    ("CATALAN", "ca"),
    ("CATALAN_SPN", "ca-ES"),
    ("CHURCH-SLAVIC", "cu"),
    ("CZECH", "cs"),
    ("DANISH", "da"),
    ("DOGRI", "dgo"),
    ("DUTCH", "nl"),
    ("ENGLISH", "en"),
    ("ESPERANTO", "eo"),
    ("ESTONIAN", "et"),
    ("FAROESE", "fo"),
    ("FINNISH", "fi"),
    ("FRENCH", "fr"),
    ("GEORGIAN", "ka"),
    ("GERMAN", "de"),
    ("GREEK", "el"),
    ("GUJARATI", "gu"),
    ("HAWAIIAN", "haw"),
    ("HEBREW", "he"),
    ("HINDI", "hi"),
    ("HUNGARIAN", "hu"),
    ("ICELANDIC", "is"),
    ("INDONESIAN", "id"),
    ("ITALIAN", "it"),
    ("JAPANESE", "ja"),
    ("KANNADA", "kn"),
    ("KHMER", "km"),
    ("KONKANI", "kok"),
    ("KOREAN", "ko"),
    ("LAHNDA", "lah"),
    ("LAO", "lo"),
    ("LATVIAN", "lv"),
    ("LITHUANIAN", "lt"),
    ("MACEDONIAN", "mk"),
    ("MAITHILI", "mai"),
    ("MALAYALAM", "ml"),
    ("MANDRIN", "cmn"),
    ("MANIPURI", "mni"),
    ("MARATHI", "mr"),
    ("MEWARI", "mtr"),
    ("NAVAHO", "nv"),
    ("NEPALI", "ne"),
    ("NORWEGIAN", "no"),
    ("ORIYA", "or"),
    ("PALI", "pi"),
    ("PANJABI", "pa"),
    ("PERSIAN", "fa"),
    ("POLISH", "pl"),
    ("PORTUGUESE", "pt"),
    ("PRAKRIT", "pra"),
    ("PUSTO", "ps"),
    ("RAJASTHANI", "raj"),
    ("ROMANIAN", "ro"),
    ("RUSSIAN", "ru"),
    ("SANSKRIT", "sa"),
    ("SERB", "sr"),
    ("SERBO_CROA", "sh"),
    ("SLOVAK", "sk"),
    ("SLOVENE", "sl"),
    ("SPANISH", "es"),
    ("SWEDISH", "sv"),
    ("TAGALOG", "tl"),
    ("TAMIL", "ta"),
    ("TELUGU", "te"),
    ("THAI", "th"),
    ("TIBETAN", "bo"),
    ("TURKISH", "tr"),
    ("UKRAINIAN", "uk"),
    ("URDU", "ur"),
    ("VIETNAMESE", "vi"),
    ("WENDIC", "wen"),
    ("YIDDISH", "yi"),
];

/// Tag for undetermined languages.
const UNDETERMINED: &str = "und";

/// `LANG`: language name to BCP 47 tag.
pub fn language(mut node: Structure, _ctx: &Context<'_>) -> Structure {
    let Some(name) = node.value.as_deref().map(str::trim).filter(|v| !v.is_empty()) else {
        return node;
    };
    let key = name.to_ascii_uppercase();
    let tag = LANGUAGES
        .iter()
        .find(|(language, code)| *language == key || code.eq_ignore_ascii_case(name))
        .map_or_else(
            || {
                debug!(language = name, "unknown language name");
                UNDETERMINED
            },
            |(_, code)| *code,
        );
    node.value = Some(tag.to_string());
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use ged_model::ConvertOptions;

    fn ctx(options: &ConvertOptions, depth: usize) -> Context<'_> {
        Context { options, depth }
    }

    #[test]
    fn test_address_folds_lines() {
        let options = ConvertOptions::default();
        let addr = Structure::new("ADDR")
            .with_child(Structure::new("CTRY").with_value("USA"))
            .with_child(Structure::new("ADR1").with_value("1 Main St"))
            .with_child(Structure::new("PHON").with_value("555"))
            .with_child(Structure::new("CITY").with_value("Springfield"))
            .with_child(Structure::new("ADR2").with_value("Apt 4"));
        let out = address(addr, &ctx(&options, 2));
        assert_eq!(out.value_str(), "1 Main St\nApt 4");
        let tags: Vec<_> = out.children.iter().map(|c| c.tag.as_str()).collect();
        assert_eq!(tags, vec!["CITY", "CTRY", "PHON"]);
    }

    #[test]
    fn test_address_keeps_existing_value() {
        let options = ConvertOptions::default();
        let addr = Structure::new("ADDR")
            .with_value("1 Main St\nSpringfield")
            .with_child(Structure::new("ADR1").with_value("1 Main St"));
        let out = address(addr, &ctx(&options, 1));
        assert_eq!(out.value_str(), "1 Main St\nSpringfield");
        assert!(out.children.is_empty());
    }

    #[test]
    fn test_external_id() {
        let options = ConvertOptions::default();
        let out = external_id(Structure::new("AFN").with_value("ABCD-123"), &ctx(&options, 1));
        assert_eq!(out.tag, "EXID");
        assert_eq!(out.value_str(), "ABCD-123");
        assert_eq!(out.children[0].tag, "TYPE");
        assert_eq!(out.children[0].value_str(), "https://gedcom.io/terms/v7/AFN");
    }

    #[test]
    fn test_shared_note() {
        let options = ConvertOptions::default();
        let pointer = shared_note(Structure::new("NOTE").with_value("@N1@"), &ctx(&options, 1));
        assert_eq!(pointer.tag, "SNOTE");
        let record = shared_note(Structure::new("NOTE").with_value("text"), &ctx(&options, 0));
        assert_eq!(record.tag, "SNOTE");
        let inline = shared_note(Structure::new("NOTE").with_value("text"), &ctx(&options, 1));
        assert_eq!(inline.tag, "NOTE");
    }

    #[test]
    fn test_media_type() {
        let options = ConvertOptions::default();
        let form = |value: &str| {
            media_type(Structure::new("FORM").with_value(value), &ctx(&options, 2))
                .value
                .unwrap_or_default()
        };
        assert_eq!(form("JPG"), "image/jpeg");
        assert_eq!(form("tif"), "image/tiff");
        assert_eq!(form("wav"), "audio/wav");
        assert_eq!(form("image/png"), "image/png");
        assert_eq!(form("Foo Bar"), "application/x-foobar");
    }

    #[test]
    fn test_language() {
        let options = ConvertOptions::default();
        let lang = |value: &str| {
            language(Structure::new("LANG").with_value(value), &ctx(&options, 1))
                .value
                .unwrap_or_default()
        };
        assert_eq!(lang("English"), "en");
        assert_eq!(lang("SERBO_CROA"), "sh");
        assert_eq!(lang("de"), "de");
        assert_eq!(lang("Klingon"), "und");
    }
}
