/// Header carrying a doctor's API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Normalises a raw `x-api-key` header value.
///
/// Surrounding whitespace is ignored and a blank header counts as no key, so the caller is
/// treated as anonymous rather than as presenting an unknown key.
pub fn parse_api_key(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|key| !key.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_header_is_no_key() {
        assert_eq!(parse_api_key(None), None);
        assert_eq!(parse_api_key(Some("")), None);
        assert_eq!(parse_api_key(Some("   ")), None);
    }

    #[test]
    fn key_is_trimmed() {
        assert_eq!(parse_api_key(Some(" abc123 ")), Some("abc123"));
    }
}
