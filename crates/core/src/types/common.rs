//! Shared parsing helpers

/// Parses upstream duration strings into whole seconds.
///
/// Accepts `H:MM:SS`, `MM:SS`, and bare seconds (including fractional
/// values, which some archive file listings report). Anything unparseable,
/// empty, or absent is 0.
pub fn parse_duration(raw: Option<&str>) -> u64 {
    let Some(raw) = raw else { return 0 };
    let raw = raw.trim();
    if raw.is_empty() {
        return 0;
    }

    let parts: Vec<&str> = raw.split(':').collect();
    match parts.as_slice() {
        [h, m, s] => {
            let (Ok(h), Ok(m), Ok(s)) = (h.parse::<u64>(), m.parse::<u64>(), s.parse::<u64>())
            else {
                return 0;
            };
            h * 3600 + m * 60 + s
        }
        [m, s] => {
            let (Ok(m), Ok(s)) = (m.parse::<u64>(), s.parse::<u64>()) else {
                return 0;
            };
            m * 60 + s
        }
        [secs] => secs.parse::<f64>().map(|v| v.max(0.0) as u64).unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hms() {
        assert_eq!(parse_duration(Some("1:02:03")), 3723);
        assert_eq!(parse_duration(Some("0:00:45")), 45);
    }

    #[test]
    fn test_ms() {
        assert_eq!(parse_duration(Some("45:10")), 2710);
        assert_eq!(parse_duration(Some("2:05")), 125);
    }

    #[test]
    fn test_bare_seconds() {
        assert_eq!(parse_duration(Some("90")), 90);
        assert_eq!(parse_duration(Some("603.5")), 603);
    }

    #[test]
    fn test_missing_and_garbage() {
        assert_eq!(parse_duration(None), 0);
        assert_eq!(parse_duration(Some("")), 0);
        assert_eq!(parse_duration(Some("  ")), 0);
        assert_eq!(parse_duration(Some("invalid")), 0);
        assert_eq!(parse_duration(Some("1:bb:03")), 0);
        assert_eq!(parse_duration(Some("1:2:3:4")), 0);
    }
}
