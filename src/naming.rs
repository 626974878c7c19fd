//! Page file naming: the `NNN-slug.md` convention.
//!
//! Content pages carry an optional numeric prefix that controls their position
//! in the navigation bar. The rest of the stem is the URL slug; the nav label
//! is derived from it with dashes turned into spaces and the first letter
//! capitalised:
//!
//! - `010-index.md` → slug `index`, nav position 10
//! - `020-o-nas.md` → slug `o-nas`, label "O nas"
//! - `030-Sluzby.md` → slug `sluzby`, label "Sluzby"
//! - `cenik.md` → slug `cenik`, hidden from nav

/// Result of parsing a page file stem like `020-o-nas`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    /// Number prefix if present (e.g., `20` from `020-o-nas`)
    pub number: Option<u32>,
    /// Lowercased URL slug, dashes preserved.
    pub slug: String,
    /// Navigation label.
    pub link_title: String,
}

/// Parse a page file stem. Returns `None` when nothing usable remains for a
/// slug (`"010"`, `"010-"`, `""`).
pub fn parse_page_name(stem: &str) -> Option<ParsedName> {
    let (number, rest) = match stem.split_once('-') {
        Some((prefix, rest)) if is_number(prefix) => (prefix.parse().ok(), rest),
        _ if is_number(stem) => return None,
        _ => (None, stem),
    };
    let rest = rest.trim_matches('-');
    if rest.is_empty() {
        return None;
    }
    Some(ParsedName {
        number,
        slug: rest.to_lowercase(),
        link_title: capitalize(&rest.replace('-', " ")),
    })
}

fn is_number(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Uppercase the first character, leaving the rest untouched.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_page() {
        let p = parse_page_name("020-o-nas").unwrap();
        assert_eq!(p.number, Some(20));
        assert_eq!(p.slug, "o-nas");
        assert_eq!(p.link_title, "O nas");
    }

    #[test]
    fn slug_is_lowercased() {
        let p = parse_page_name("030-Sluzby").unwrap();
        assert_eq!(p.slug, "sluzby");
        assert_eq!(p.link_title, "Sluzby");
    }

    #[test]
    fn unnumbered_page() {
        let p = parse_page_name("cenik").unwrap();
        assert_eq!(p.number, None);
        assert_eq!(p.slug, "cenik");
    }

    #[test]
    fn unnumbered_with_dashes_keeps_whole_stem() {
        let p = parse_page_name("kaceni-stromu").unwrap();
        assert_eq!(p.number, None);
        assert_eq!(p.slug, "kaceni-stromu");
        assert_eq!(p.link_title, "Kaceni stromu");
    }

    #[test]
    fn number_only_has_no_slug() {
        assert_eq!(parse_page_name("010"), None);
        assert_eq!(parse_page_name("010-"), None);
        assert_eq!(parse_page_name(""), None);
    }

    #[test]
    fn zero_prefix() {
        let p = parse_page_name("000-index").unwrap();
        assert_eq!(p.number, Some(0));
        assert_eq!(p.slug, "index");
    }

    #[test]
    fn capitalize_handles_non_ascii() {
        assert_eq!(capitalize("údržba zeleně"), "Údržba zeleně");
        assert_eq!(capitalize(""), "");
    }
}
