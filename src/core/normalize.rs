use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

static NON_ALNUM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9]+").unwrap());

/// Builds the comparison key used when matching search results.
///
/// Accents are decomposed and dropped, every run of non-alphanumeric
/// characters collapses to a single space, and the result is lower-cased.
///
/// ```text
/// normalize("Fijación Oral, Vol. 1") == "fijacion oral vol 1"
/// normalize("DAMN.")                 == "damn"
/// ```
pub fn normalize(s: &str) -> String {
    let stripped: String = s.nfd().filter(|c| !is_combining_mark(*c)).collect();
    NON_ALNUM
        .replace_all(&stripped, " ")
        .trim()
        .to_lowercase()
}

/// Builds a filesystem-safe, lower-case, hyphen-separated name.
///
/// Characters without an ASCII compatibility decomposition are dropped
/// instead of becoming separators, so `She’s` turns into `shes`.
pub fn slug(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_dash = false;
    for c in s.nfkd().filter(char::is_ascii) {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            prev_dash = false;
        } else if !prev_dash {
            out.push('-');
            prev_dash = true;
        }
    }
    out.trim_matches('-').to_string()
}
