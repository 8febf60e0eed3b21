//! Text normalization for bibliographic fields.
//!
//! Every comparison the engine makes happens on normalized text: diacritics
//! are folded away (NFKD, combining marks dropped), text is lower-cased,
//! every run of non-alphanumeric characters becomes a single space, and the
//! result is trimmed. `"Éxito: Análisis, Redes!"` becomes `"exito analisis redes"`.

use std::collections::BTreeSet;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Normalizes free text for token comparison.
///
/// # Examples
///
/// ```
/// use citegraph::domain::normalize::normalize_text;
///
/// assert_eq!(normalize_text("  Deep-Learning   in  Educación! "), "deep learning in educacion");
/// assert_eq!(normalize_text("!!!"), "");
/// ```
#[must_use]
pub fn normalize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.nfkd().filter(|c| !is_combining_mark(*c)) {
        if c.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.extend(c.to_lowercase());
        } else {
            pending_space = true;
        }
    }

    out
}

/// Splits normalized text into its set of whitespace tokens.
#[must_use]
pub fn tokens(normalized: &str) -> BTreeSet<String> {
    normalized.split_whitespace().map(str::to_string).collect()
}

/// Splits a delimited author list (`"Smith, J.; Pérez, A."` style) on `;`
/// and `,`, normalizing each name and dropping empties.
#[must_use]
pub fn split_authors(raw: &str) -> BTreeSet<String> {
    split_normalized(raw, &[';', ','])
}

/// Splits a delimited keyword list on `;`, `,` and `|`, normalizing each
/// keyword and dropping empties.
#[must_use]
pub fn split_keywords(raw: &str) -> BTreeSet<String> {
    split_normalized(raw, &[';', ',', '|'])
}

/// Normalizes each already-separated item, dropping those that normalize to nothing.
#[must_use]
pub fn normalize_items<I, S>(items: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| normalize_text(item.as_ref()))
        .filter(|item| !item.is_empty())
        .collect()
}

fn split_normalized(raw: &str, separators: &[char]) -> BTreeSet<String> {
    normalize_items(raw.split(separators))
}

const DOI_PREFIXES: [&str; 5] = [
    "https://dx.doi.org/",
    "http://dx.doi.org/",
    "https://doi.org/",
    "http://doi.org/",
    "doi:",
];

/// Canonicalizes a DOI: strips `doi:` and resolver URL prefixes, removes
/// spaces, and lower-cases. Returns `None` for blank input.
///
/// # Examples
///
/// ```
/// use citegraph::domain::normalize::normalize_doi;
///
/// assert_eq!(
///     normalize_doi("https://doi.org/10.1000/XYZ 123").as_deref(),
///     Some("10.1000/xyz123")
/// );
/// assert_eq!(normalize_doi("   "), None);
/// ```
#[must_use]
pub fn normalize_doi(raw: &str) -> Option<String> {
    let compact: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == '\\' { '/' } else { c })
        .collect::<String>()
        .to_lowercase();

    let mut rest = compact.as_str();
    for prefix in DOI_PREFIXES {
        if let Some(stripped) = rest.strip_prefix(prefix) {
            rest = stripped;
            break;
        }
    }

    (!rest.is_empty()).then(|| rest.to_string())
}

/// Extracts a publication year from free text: the first run of exactly
/// four consecutive ASCII digits (`"2019/05/01"` -> 2019).
#[must_use]
pub fn parse_year(raw: &str) -> Option<i32> {
    let bytes = raw.as_bytes();
    let mut start = None;

    for (i, b) in bytes.iter().enumerate() {
        match (b.is_ascii_digit(), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                if i - s == 4 {
                    return raw[s..i].parse().ok();
                }
                start = None;
            }
            _ => {}
        }
    }

    match start {
        Some(s) if bytes.len() - s == 4 => raw[s..].parse().ok(),
        _ => None,
    }
}
