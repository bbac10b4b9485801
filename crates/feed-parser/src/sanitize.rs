// crates/feed-parser/src/sanitize.rs
//! Free-text cleanup for feed and API fields
//!
//! Upstream descriptions routinely arrive as HTML fragments. Normalized
//! records carry plain text, so tags are dropped and the common entities
//! decoded. This is a cleanup pass, not an HTML parser: nesting errors and
//! exotic entities degrade gracefully to their literal text.

/// Strips HTML tags and decodes entities in one pass
pub fn clean_text(raw: &str) -> String {
    decode_entities(&strip_tags(raw)).trim().to_string()
}

/// Removes everything between `<` and `>`, inclusive
pub fn strip_tags(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_tag = false;
    for ch in raw.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Decodes named and numeric HTML entities.
///
/// Unknown entities are kept verbatim, ampersand included.
pub fn decode_entities(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        match tail.find(';') {
            // Entities are short; a long run without ';' is a bare ampersand
            Some(end) if end <= 10 => {
                let entity = &tail[1..end];
                match decode_entity(entity) {
                    Some(decoded) => out.push(decoded),
                    None => out.push_str(&tail[..=end]),
                }
                rest = &tail[end + 1..];
            }
            _ => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        "mdash" => Some('—'),
        "ndash" => Some('–'),
        "hellip" => Some('…'),
        "rsquo" => Some('’'),
        "lsquo" => Some('‘'),
        "rdquo" => Some('”'),
        "ldquo" => Some('“'),
        _ => {
            let code = if let Some(hex) = entity.strip_prefix("#x").or(entity.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok()?
            } else {
                return None;
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<p>Hello <b>world</b></p>"), "Hello world");
        assert_eq!(strip_tags("no tags here"), "no tags here");
        assert_eq!(strip_tags("<br/>line"), "line");
    }

    #[test]
    fn test_decode_named_entities() {
        assert_eq!(decode_entities("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(decode_entities("&lt;tag&gt;"), "<tag>");
        assert_eq!(decode_entities("it&apos;s &quot;here&quot;"), "it's \"here\"");
    }

    #[test]
    fn test_decode_numeric_entities() {
        assert_eq!(decode_entities("&#39;quoted&#39;"), "'quoted'");
        assert_eq!(decode_entities("&#x27;hex&#x27;"), "'hex'");
    }

    #[test]
    fn test_unknown_entity_kept() {
        assert_eq!(decode_entities("&bogus; stays"), "&bogus; stays");
        assert_eq!(decode_entities("A & B"), "A & B");
    }

    #[test]
    fn test_clean_text() {
        let html = "  <p>A story about Tom &amp; Jerry.</p><br/> ";
        assert_eq!(clean_text(html), "A story about Tom & Jerry.");
        assert_eq!(clean_text(""), "");
    }
}
