//! `Accept-Language` header parsing and header-based timezone guessing.

use chrono_tz::Tz;

use crate::tz::country::guess_from_language;

/// ## Summary
/// Parses an `Accept-Language` header into language tags ordered by
/// descending quality. Entries without a `q` weight default to 1.0;
/// malformed entries are skipped. Ties keep header order.
///
/// Example: `"en-ca,en;q=0.8,de;q=0.4"` parses to
/// `["en-ca", "en", "de"]` with weights `[1.0, 0.8, 0.4]`.
#[must_use]
pub fn parse_accept_language(header: &str) -> Vec<(String, f32)> {
    let mut tags: Vec<(String, f32)> = header
        .split(',')
        .filter_map(|item| {
            let item = item.trim();
            if item.is_empty() {
                return None;
            }
            let (tag, quality) = match item.split_once(';') {
                None => (item, 1.0),
                Some((tag, params)) => {
                    let q = params.trim().strip_prefix("q=")?.trim().parse::<f32>().ok()?;
                    if !(0.0..=1.0).contains(&q) {
                        return None;
                    }
                    (tag.trim(), q)
                }
            };
            if tag.is_empty() {
                return None;
            }
            Some((tag.to_string(), quality))
        })
        .collect();

    tags.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    tags
}

/// ## Summary
/// Guesses a timezone from an `Accept-Language` header: tags are tried in
/// descending preference and the first successful country guess wins.
/// Returns `None` when no tag yields a guess; callers fall back to the
/// site default.
#[must_use]
pub fn guess_from_accept_language(header: &str) -> Option<Tz> {
    parse_accept_language(header)
        .iter()
        .find_map(|(tag, _)| guess_from_language(tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_orders_by_quality() {
        let tags = parse_accept_language("en;q=0.8,en-ca,de;q=0.4");
        let names: Vec<&str> = tags.iter().map(|(tag, _)| tag.as_str()).collect();
        assert_eq!(names, ["en-ca", "en", "de"]);
    }

    #[test]
    fn test_parse_default_quality_is_one() {
        let tags = parse_accept_language("pl");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].0, "pl");
        assert!((tags[0].1 - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_parse_skips_malformed_entries() {
        let tags = parse_accept_language("en;q=high,de;q=0.4,,;q=0.2");
        let names: Vec<&str> = tags.iter().map(|(tag, _)| tag.as_str()).collect();
        assert_eq!(names, ["de"]);
    }

    #[test]
    fn test_parse_rejects_out_of_range_quality() {
        assert!(parse_accept_language("en;q=1.5").is_empty());
    }

    #[test]
    fn test_parse_empty_header() {
        assert!(parse_accept_language("").is_empty());
    }

    #[test]
    fn test_guess_takes_first_guessable_tag() {
        // "en" is not a country; "en-ca" wins before the lower-weighted rest.
        let tz = guess_from_accept_language("en-ca,en;q=0.8,en-us;q=0.6,de-de;q=0.4,de;q=0.2")
            .expect("should guess");
        assert_eq!(tz.name(), "America/St_Johns");
    }

    #[test]
    fn test_guess_bare_language_as_country() {
        let tz = guess_from_accept_language("pl,en;q=0.8,en-us;q=0.6,de-de;q=0.4,de;q=0.2")
            .expect("should guess");
        assert_eq!(tz.name(), "Europe/Warsaw");
    }

    #[test]
    fn test_guess_skips_unguessable_tags() {
        // "en" yields nothing; "de-de" is the first tag with a country.
        let tz = guess_from_accept_language("en,de-de;q=0.5").expect("should guess");
        assert_eq!(tz.name(), "Europe/Berlin");
    }

    #[test]
    fn test_guess_none_when_nothing_matches() {
        assert_eq!(guess_from_accept_language("en,xx-zz;q=0.5"), None);
        assert_eq!(guess_from_accept_language(""), None);
    }
}
