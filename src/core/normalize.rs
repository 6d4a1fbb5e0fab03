use crate::utils::error::ProbeFailure;

const HTTP_PREFIX: &str = "http://";
const HTTPS_PREFIX: &str = "https://";

/// Turns user input into something a probe can fetch.
///
/// Blank input fails with [`ProbeFailure::EmptyUrl`]. Input that already
/// carries an `http://` or `https://` scheme (any case) is returned as is,
/// anything else gets `https://` prepended. The host is not validated here;
/// a bad URL fails when it is probed.
pub fn normalize_url(raw: &str) -> Result<String, ProbeFailure> {
    if raw.trim().is_empty() {
        return Err(ProbeFailure::EmptyUrl);
    }

    if has_prefix_ignore_case(raw, HTTP_PREFIX) || has_prefix_ignore_case(raw, HTTPS_PREFIX) {
        Ok(raw.to_string())
    } else {
        Ok(format!("{}{}", HTTPS_PREFIX, raw))
    }
}

fn has_prefix_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_input_is_empty_url() {
        assert_eq!(normalize_url(""), Err(ProbeFailure::EmptyUrl));
        assert_eq!(normalize_url("   "), Err(ProbeFailure::EmptyUrl));
        assert_eq!(normalize_url("\t\n"), Err(ProbeFailure::EmptyUrl));
    }

    #[test]
    fn test_existing_scheme_is_kept() {
        for url in [
            "http://example.com",
            "https://example.com/path?q=1",
            "HTTP://EXAMPLE.COM",
            "HtTpS://example.com",
        ] {
            assert_eq!(normalize_url(url).unwrap(), url);
        }
    }

    #[test]
    fn test_missing_scheme_gets_https() {
        for url in ["example.com", "www.example.com:8080/health", "ftp://example.com", " example.com"] {
            assert_eq!(normalize_url(url).unwrap(), format!("https://{}", url));
        }
    }

    #[test]
    fn test_multibyte_input_does_not_panic() {
        assert_eq!(normalize_url("ñandú.example").unwrap(), "https://ñandú.example");
        assert_eq!(normalize_url("日本").unwrap(), "https://日本");
    }
}
