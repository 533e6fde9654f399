//! Bridges the legacy numeric codepage IDs stored in save data to [`encoding_rs`] encodings.
//!
//! The container format never stores the encoding as a name; tools either get it from the
//! caller (a user-chosen codepage) or guess it by sniffing the database's text. [`detect`]
//! implements the latter with a deliberately small heuristic: it is a fallback, not a
//! replacement for an explicit `--encoding` flag at the CLI layer.

use once_cell::sync::Lazy;

use crate::error::{LcfError, LcfResult};

/// A handful of codepages that cover the common RPG Maker 2000/2003 locales. Not
/// exhaustive; unknown IDs are rejected rather than silently mapped to Latin-1.
pub const CP_WINDOWS_1252: u32 = 1252;
pub const CP_WINDOWS_1251: u32 = 1251;
pub const CP_SHIFT_JIS: u32 = 932;
pub const CP_GBK: u32 = 936;
pub const CP_BIG5: u32 = 950;
pub const CP_WINDOWS_1250: u32 = 1250;

/// codepage id -> (encoding, human-readable name), built once and reused for both lookups
/// and diagnostic messages.
static CODEPAGE_TABLE: Lazy<Vec<(u32, &'static encoding_rs::Encoding, &'static str)>> = Lazy::new(|| {
    vec![
        (CP_WINDOWS_1252, encoding_rs::WINDOWS_1252, "Windows-1252 (Western European)"),
        (CP_WINDOWS_1251, encoding_rs::WINDOWS_1251, "Windows-1251 (Cyrillic)"),
        (CP_WINDOWS_1250, encoding_rs::WINDOWS_1250, "Windows-1250 (Central European)"),
        (CP_SHIFT_JIS, encoding_rs::SHIFT_JIS, "Shift-JIS (Japanese)"),
        (CP_GBK, encoding_rs::GBK, "GBK (Simplified Chinese)"),
        (CP_BIG5, encoding_rs::BIG5, "Big5 (Traditional Chinese)"),
    ]
});

/// Looks up the [`encoding_rs::Encoding`] for a Windows codepage ID.
pub fn by_codepage(codepage: u32) -> LcfResult<&'static encoding_rs::Encoding> {
    CODEPAGE_TABLE
        .iter()
        .find(|(cp, _, _)| *cp == codepage)
        .map(|(_, enc, _)| *enc)
        .ok_or_else(|| {
            LcfError::malformed("codepage", format!("unsupported or unknown codepage id {codepage}"))
        })
}

/// Human-readable name for a codepage, for log messages and error context.
pub fn codepage_name(codepage: u32) -> Option<&'static str> {
    CODEPAGE_TABLE.iter().find(|(cp, _, _)| *cp == codepage).map(|(_, _, name)| *name)
}

/// Looks up an encoding the way a config file would name it (`"1252"`, `"windows-1252"`,
/// `"shift_jis"`, ...). Tries a bare codepage number first, then falls back to whatever
/// `encoding_rs` itself recognizes as a label.
pub fn by_label(label: &str) -> LcfResult<&'static encoding_rs::Encoding> {
    if let Ok(codepage) = label.parse::<u32>() {
        return by_codepage(codepage);
    }
    encoding_rs::Encoding::for_label(label.as_bytes())
        .ok_or_else(|| LcfError::EncodingUnavailable { label: label.to_string() })
}

/// Decodes `bytes` out of `encoding` into a Rust string, replacing unmappable sequences.
pub fn to_unicode(bytes: &[u8], encoding: &'static encoding_rs::Encoding) -> String {
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

/// Encodes `text` into `encoding`'s byte representation, using numeric character references
/// for anything the target encoding can't represent.
pub fn from_unicode(text: &str, encoding: &'static encoding_rs::Encoding) -> Vec<u8> {
    let (bytes, _, _) = encoding.encode(text);
    bytes.into_owned()
}

/// Transcodes a byte string from one named encoding to another, bridging through Unicode.
/// `from`/`to` accept anything [`by_label`] does: a bare codepage number or an `encoding_rs`
/// label.
pub fn recode(bytes: &[u8], from: &str, to: &str) -> LcfResult<Vec<u8>> {
    let from_encoding = by_label(from)?;
    let to_encoding = by_label(to)?;
    Ok(from_unicode(&to_unicode(bytes, from_encoding), to_encoding))
}

/// Heuristically guesses the encoding used by a block of text bytes, returning candidate
/// labels ordered from most to least plausible.
///
/// Looks for byte patterns that are implausible in Windows-125x single-byte encodings but
/// common in East Asian double-byte encodings (lead bytes followed by a valid trail byte).
/// Windows-1252 is always appended last as the fallback, matching the reference reader's
/// behavior of trusting the caller's configured default over silent misdetection.
pub fn detect(sample: &[u8]) -> Vec<String> {
    let mut shift_jis_pairs = 0usize;
    let mut gbk_pairs = 0usize;
    let mut i = 0;
    while i + 1 < sample.len() {
        let lead = sample[i];
        let trail = sample[i + 1];
        if matches!(lead, 0x81..=0x9f | 0xe0..=0xfc) && matches!(trail, 0x40..=0xfc) {
            shift_jis_pairs += 1;
        }
        if matches!(lead, 0x81..=0xfe) && matches!(trail, 0x40..=0xfe) {
            gbk_pairs += 1;
        }
        i += 1;
    }

    let threshold = sample.len() / 8 + 1;
    let mut candidates = Vec::new();
    if shift_jis_pairs > threshold {
        candidates.push(encoding_rs::SHIFT_JIS.name().to_string());
    }
    if gbk_pairs > threshold {
        candidates.push(encoding_rs::GBK.name().to_string());
    }
    candidates.push(encoding_rs::WINDOWS_1252.name().to_string());
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codepage_resolves() {
        assert_eq!(by_codepage(CP_WINDOWS_1252).unwrap(), encoding_rs::WINDOWS_1252);
    }

    #[test]
    fn unknown_codepage_is_rejected() {
        assert!(by_codepage(9999).is_err());
    }

    #[test]
    fn codepage_name_is_available_for_known_ids() {
        assert!(codepage_name(CP_SHIFT_JIS).unwrap().contains("Japanese"));
        assert_eq!(codepage_name(9999), None);
    }

    #[test]
    fn label_accepts_bare_numbers_and_names() {
        assert_eq!(by_label("1252").unwrap(), encoding_rs::WINDOWS_1252);
        assert_eq!(by_label("shift_jis").unwrap(), encoding_rs::SHIFT_JIS);
    }

    #[test]
    fn detect_falls_back_to_windows_1252_on_plain_ascii() {
        assert_eq!(detect(b"Hello, world!"), vec![encoding_rs::WINDOWS_1252.name().to_string()]);
    }

    #[test]
    fn detect_ranks_shift_jis_candidate_first() {
        let sample: Vec<u8> = std::iter::repeat([0x82u8, 0x60]).take(20).flatten().collect();
        let candidates = detect(&sample);
        assert_eq!(candidates.first().unwrap(), encoding_rs::SHIFT_JIS.name());
        assert!(candidates.contains(&encoding_rs::WINDOWS_1252.name().to_string()));
    }

    #[test]
    fn recode_bridges_two_encodings() {
        let (sjis_bytes, _, _) = encoding_rs::SHIFT_JIS.encode("A");
        let latin1_bytes = recode(&sjis_bytes, "shift_jis", "windows-1252").unwrap();
        assert_eq!(latin1_bytes, b"A");
    }

    #[test]
    fn by_label_rejects_unknown_name_without_leaking() {
        let err = by_label("not-a-real-encoding").unwrap_err();
        assert!(matches!(err, LcfError::EncodingUnavailable { ref label } if label == "not-a-real-encoding"));
    }
}
