//! `Accept-Language` header parsing.
//!
//! Entries are returned in the order they are listed. Quality weights are
//! parsed but never used to reorder: the first listed tag is taken as the
//! client's preference.

/// One entry of an `Accept-Language` header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LanguageRange<'a> {
    /// The language tag, e.g. `fr-CH`.
    pub tag: &'a str,
    /// The `q` weight, if one was given and parses.
    pub quality: Option<f32>,
}

impl<'a> LanguageRange<'a> {
    /// Returns the primary language subtag (`fr` for `fr-CH`).
    pub fn primary(&self) -> &'a str {
        self.tag.split(['-', '_']).next().unwrap_or(self.tag)
    }
}

/// Parses a header value into its entries, in listed order.
///
/// Empty entries and the `*` wildcard are skipped.
///
/// # Examples
///
/// ```
/// use request_locale::source::accept_language::parse;
///
/// let ranges = parse("fr-CH, fr;q=0.9, *;q=0.1");
/// let tags: Vec<_> = ranges.iter().map(|r| r.tag).collect();
/// assert_eq!(tags, ["fr-CH", "fr"]);
/// assert_eq!(ranges[1].quality, Some(0.9));
/// ```
pub fn parse(header: &str) -> Vec<LanguageRange<'_>> {
    header
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split(';');
            let tag = parts.next()?.trim();
            if tag.is_empty() || tag == "*" {
                return None;
            }
            let quality = parts.find_map(|p| {
                let (name, value) = p.split_once('=')?;
                if name.trim().eq_ignore_ascii_case("q") {
                    value.trim().parse().ok()
                } else {
                    None
                }
            });
            Some(LanguageRange { tag, quality })
        })
        .collect()
}

/// Selects a tag from the header.
///
/// With a `filter`, returns the first listed tag whose primary subtag
/// matches it case-insensitively. Without one, returns the first listed tag.
///
/// # Examples
///
/// ```
/// use request_locale::source::accept_language::select;
///
/// let header = "fr-CH, fr;q=0.9, en;q=0.8, de;q=0.7";
/// assert_eq!(select(header, None), Some("fr-CH"));
/// assert_eq!(select(header, Some("de")), Some("de"));
/// assert_eq!(select(header, Some("it")), None);
/// ```
pub fn select<'a>(header: &'a str, filter: Option<&str>) -> Option<&'a str> {
    let ranges = parse(header);
    match filter {
        Some(primary) => ranges
            .iter()
            .find(|r| r.primary().eq_ignore_ascii_case(primary))
            .map(|r| r.tag),
        None => ranges.first().map(|r| r.tag),
    }
}
