use aho_corasick::{AhoCorasick, MatchKind};
use once_cell::sync::Lazy;

// Static initialization: automaton is built only once, thread-safe
static XML_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\"", "'"])
        .expect("Failed to build XML escaper")
});

// Use LeftmostLongest to ensure longer entities are matched first (e.g., &amp; instead of &lt;)
static XML_UNESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .match_kind(MatchKind::LeftmostLongest)
        .build(["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
        .expect("Failed to build XML unescaper")
});

/// Escape XML special characters.
///
/// # Examples
///
/// ```
/// use loquat::common::xml::escape_xml;
/// assert_eq!(escape_xml("a & b"), "a &amp; b");
/// assert_eq!(escape_xml("<tag>\"hello\"</tag>"), "&lt;tag&gt;&quot;hello&quot;&lt;/tag&gt;");
/// ```
#[inline]
pub fn escape_xml(s: &str) -> String {
    XML_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
}

/// Unescape XML special characters.
///
/// Replaces the five standard XML entities and numeric character
/// references (`&#65;`, `&#x41;`) with their characters.
/// Unknown or malformed entities are left unchanged.
///
/// # Examples
///
/// ```
/// use loquat::common::xml::unescape_xml;
/// assert_eq!(unescape_xml("&lt;a &amp; b&gt;"), "<a & b>");
/// assert_eq!(unescape_xml("&quot;hello&apos;"), "\"hello'");
/// assert_eq!(unescape_xml("&amp;lt;"), "&lt;"); // &amp; is matched first
/// assert_eq!(unescape_xml("&#233;t&#xE9;"), "été");
/// assert_eq!(unescape_xml("&invalid;"), "&invalid;"); // unknown entity
/// ```
pub fn unescape_xml(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    if !s.contains("&#") {
        return XML_UNESCAPER.replace_all(s, &["&", "<", ">", "\"", "'"]);
    }

    // Resolve character references piecewise so that a named entity
    // produced by a reference (`&#38;lt;`) is not unescaped twice.
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("&#") {
        out.push_str(&XML_UNESCAPER.replace_all(&rest[..start], &["&", "<", ">", "\"", "'"]));
        let candidate = &rest[start..];
        match candidate.find(';').and_then(|end| {
            resolve_char_ref(&candidate[2..end]).map(|ch| (ch, end))
        }) {
            Some((ch, end)) => {
                out.push(ch);
                rest = &candidate[end + 1..];
            },
            None => {
                out.push_str("&#");
                rest = &candidate[2..];
            },
        }
    }
    out.push_str(&XML_UNESCAPER.replace_all(rest, &["&", "<", ">", "\"", "'"]));
    out
}

fn resolve_char_ref(body: &str) -> Option<char> {
    let code = match body.strip_prefix('x').or_else(|| body.strip_prefix('X')) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => body.parse::<u32>().ok()?,
    };
    char::from_u32(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_round_trip_keeps_markup_inert() {
        let raw = "Tom & Jerry <\"quoted\"> 'single'";
        let escaped = escape_xml(raw);
        assert!(!escaped.contains('<'));
        assert_eq!(unescape_xml(&escaped), raw);
    }

    #[test]
    fn test_char_refs() {
        assert_eq!(unescape_xml("caf&#233;"), "café");
        assert_eq!(unescape_xml("&#x3C;p&#x3E;"), "<p>");
        assert_eq!(unescape_xml("&#38;lt;"), "&lt;");
        assert_eq!(unescape_xml("&#zz;"), "&#zz;");
        assert_eq!(unescape_xml("a &# b"), "a &# b");
    }
}
