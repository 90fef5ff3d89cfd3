// SPDX-License-Identifier: MPL-2.0

//! Parser for `.lang` resource files.
//!
//! ```text
//! # comment
//! app.title = Portfolio
//! nav.home = "Home page"
//! nav.blog = 'Blog'
//! ```
//!
//! Lines without `=` are skipped rather than reported. Later duplicates of a
//! key replace earlier ones.

use super::ResourceSet;

/// Parse `key = value` lines into a [`ResourceSet`].
pub fn parse_resource(content: &str) -> ResourceSet {
    let mut set = ResourceSet::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            log::trace!("Skipping malformed resource line: {}", line);
            continue;
        };

        set.insert(key.trim(), unquote(value.trim()));
    }

    set
}

/// Strip one pair of matching single or double quotes.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quoted_value_with_spaces() {
        let set = parse_resource(r#"key = "value with spaces""#);
        assert_eq!(set.get("key"), Some("value with spaces"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn skips_comments_blank_and_malformed_lines() {
        let content = "# header\n\n   \nno separator here\ntitle = Hello\n  # indented comment\n";
        let set = parse_resource(content);
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("title"), Some("Hello"));
    }

    #[test]
    fn unquotes_single_quotes_only_when_paired() {
        let set = parse_resource("a = 'single'\nb = \"open\nc = 'mixed\"");
        assert_eq!(set.get("a"), Some("single"));
        assert_eq!(set.get("b"), Some("\"open"));
        assert_eq!(set.get("c"), Some("'mixed\""));
    }

    #[test]
    fn splits_on_first_equals_only() {
        let set = parse_resource("url = https://example.com/?a=b\r\n");
        assert_eq!(set.get("url"), Some("https://example.com/?a=b"));
    }

    #[test]
    fn lone_quote_is_kept() {
        let set = parse_resource("q = \"");
        assert_eq!(set.get("q"), Some("\""));
    }

    #[test]
    fn empty_input_yields_empty_set() {
        assert!(parse_resource("").is_empty());
    }
}
