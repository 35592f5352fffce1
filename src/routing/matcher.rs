//! Route matching module
//!
//! Path matching and parameter extraction for single-parameter route
//! templates like `/lambdaexp/{number}`.

/// Extract the parameter segment of a `{prefix}/{param}` route
///
/// Matches only a path made of exactly the prefix plus one non-empty
/// segment: trailing slashes, missing or extra segments do not match.
/// Returns the raw segment text; parsing it is the caller's concern.
///
/// # Examples
/// ```
/// use lambdaexp::routing::extract_param;
///
/// assert_eq!(extract_param("/lambdaexp/5", "/lambdaexp"), Some("5"));
/// assert_eq!(extract_param("/lambdaexp/-1", "/lambdaexp"), Some("-1"));
/// assert_eq!(extract_param("/lambdaexp", "/lambdaexp"), None);
/// assert_eq!(extract_param("/lambdaexp/5/6", "/lambdaexp"), None);
/// ```
pub fn extract_param<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(prefix)?;
    let segment = rest.strip_prefix('/')?;
    if segment.is_empty() || segment.contains('/') {
        return None;
    }
    Some(segment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_segment() {
        assert_eq!(extract_param("/lambdaexp/5", "/lambdaexp"), Some("5"));
        assert_eq!(extract_param("/lambdaexp/100", "/lambdaexp"), Some("100"));
        assert_eq!(extract_param("/lambdaexp/0", "/lambdaexp"), Some("0"));
    }

    #[test]
    fn test_sign_passes_through_verbatim() {
        assert_eq!(extract_param("/lambdaexp/-1", "/lambdaexp"), Some("-1"));
        assert_eq!(extract_param("/lambdaexp/+7", "/lambdaexp"), Some("+7"));
    }

    #[test]
    fn test_non_numeric_segment_still_matches() {
        // The matcher is string-level; parse failures are handled upstream
        assert_eq!(extract_param("/lambdaexp/abc", "/lambdaexp"), Some("abc"));
    }

    #[test]
    fn test_missing_segment() {
        assert_eq!(extract_param("/lambdaexp", "/lambdaexp"), None);
        assert_eq!(extract_param("/lambdaexp/", "/lambdaexp"), None);
    }

    #[test]
    fn test_extra_segments() {
        assert_eq!(extract_param("/lambdaexp/5/6", "/lambdaexp"), None);
        assert_eq!(extract_param("/lambdaexp/5/", "/lambdaexp"), None);
        assert_eq!(extract_param("/lambdaexp//5", "/lambdaexp"), None);
    }

    #[test]
    fn test_prefix_must_be_a_whole_segment() {
        // "/lambdaexpress/5" must not match the "/lambdaexp" route
        assert_eq!(extract_param("/lambdaexpress/5", "/lambdaexp"), None);
        assert_eq!(extract_param("/other/5", "/lambdaexp"), None);
        assert_eq!(extract_param("/", "/lambdaexp"), None);
    }
}
