//! Strict RFC 3986 grammar validation.
//!
//! The checker scans a candidate left to right and reports the *first*
//! violation as a structured failure. Character offsets are 0-based
//! `char` indices into the candidate, which is what the repair
//! classifiers splice against.
//!
//! Failure categories follow the repairability split: illegal characters
//! in the path, query, or fragment and malformed percent-escapes carry a
//! repairable category; everything else (scheme and authority damage) is
//! reported as uncategorized, since no minimal single-character edit is
//! defined for those components.

use smallvec::SmallVec;

use super::uri::{Uri, UriParts};
use crate::failure::{Component, ParseFailure};

/// Strict RFC 3986 validator.
///
/// Stateless; validating borrows the candidate and allocates only the
/// parsed component strings on acceptance.
///
/// # Example
///
/// ```rust,ignore
/// use urigrit::prelude::*;
///
/// let validator = Rfc3986Validator;
/// assert!(validator.validate("http://example.com/ok").is_ok());
///
/// let failure = validator.validate("http://example.com/?a=^").unwrap_err();
/// assert_eq!(
///     failure.category(),
///     FailureCategory::IllegalCharacter(Component::Query)
/// );
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rfc3986Validator;

impl super::Validate for Rfc3986Validator {
    fn validate(&self, candidate: &str) -> Result<Uri, ParseFailure> {
        parse(candidate)
    }
}

/// Validate `input` as a URI reference and decompose it.
pub(crate) fn parse(input: &str) -> Result<Uri, ParseFailure> {
    let chars: SmallVec<[char; 64]> = input.chars().collect();
    let len = chars.len();

    // Reference splitting: the first '#' starts the fragment, the first
    // '?' before it starts the query. Neither delimiter may reappear in
    // an earlier component, so splitting before character validation is
    // sound.
    let fragment_mark = chars.iter().position(|&c| c == '#');
    let end_before_fragment = fragment_mark.unwrap_or(len);

    let query_mark = chars[..end_before_fragment].iter().position(|&c| c == '?');
    let end_before_query = query_mark.unwrap_or(end_before_fragment);

    // A scheme is present when ':' occurs before the first '/'.
    let mut scheme_mark = None;
    for (i, &c) in chars[..end_before_query].iter().enumerate() {
        match c {
            ':' => {
                scheme_mark = Some(i);
                break;
            }
            '/' => break,
            _ => {}
        }
    }

    let mut parts = UriParts::default();

    if let Some(end) = scheme_mark {
        check_scheme(input, &chars[..end])?;
        parts.scheme = Some(segment(&chars[..end]));
    }

    let hier_start = scheme_mark.map_or(0, |end| end + 1);

    let path_start = if end_before_query >= hier_start + 2
        && chars[hier_start] == '/'
        && chars[hier_start + 1] == '/'
    {
        let auth_start = hier_start + 2;
        let auth_end = chars[auth_start..end_before_query]
            .iter()
            .position(|&c| c == '/')
            .map_or(end_before_query, |p| auth_start + p);
        check_authority(input, &chars, auth_start, auth_end, &mut parts)?;
        parts.authority = Some(segment(&chars[auth_start..auth_end]));
        auth_end
    } else {
        hier_start
    };

    scan(input, &chars, path_start, end_before_query, true, is_path_char, |i| {
        ParseFailure::illegal_character(Component::Path, i, input)
    })?;
    parts.path = segment(&chars[path_start..end_before_query]);

    if let Some(mark) = query_mark {
        scan(
            input,
            &chars,
            mark + 1,
            end_before_fragment,
            true,
            is_query_char,
            |i| ParseFailure::illegal_character(Component::Query, i, input),
        )?;
        parts.query = Some(segment(&chars[mark + 1..end_before_fragment]));
    }

    if let Some(mark) = fragment_mark {
        scan(input, &chars, mark + 1, len, true, is_query_char, |i| {
            ParseFailure::illegal_character(Component::Fragment, i, input)
        })?;
        parts.fragment = Some(segment(&chars[mark + 1..len]));
    }

    Ok(Uri::from_parts(input.to_owned(), parts))
}

/// Validate `[userinfo "@"] host [":" port]` and record the pieces.
fn check_authority(
    input: &str,
    chars: &[char],
    start: usize,
    end: usize,
    parts: &mut UriParts,
) -> Result<(), ParseFailure> {
    // userinfo may not contain '@', so the first '@' ends it.
    let host_start = match chars[start..end].iter().position(|&c| c == '@') {
        Some(p) => {
            let at = start + p;
            scan(input, chars, start, at, true, is_userinfo_char, |i| {
                ParseFailure::uncategorized_at("Illegal character in user info", i, input)
            })?;
            parts.userinfo = Some(segment(&chars[start..at]));
            at + 1
        }
        None => start,
    };

    if host_start < end && chars[host_start] == '[' {
        let close = match chars[host_start..end].iter().position(|&c| c == ']') {
            Some(p) => host_start + p,
            None => {
                return Err(ParseFailure::uncategorized(format!(
                    "Expected closing bracket for IP literal: {input}"
                )))
            }
        };
        if close == host_start + 1 {
            return Err(ParseFailure::uncategorized_at(
                "Expected an IP address",
                close,
                input,
            ));
        }
        scan(
            input,
            chars,
            host_start + 1,
            close,
            false,
            is_ip_literal_char,
            |i| ParseFailure::uncategorized_at("Illegal character in IP literal", i, input),
        )?;
        parts.host = Some(segment(&chars[host_start..=close]));
        if close + 1 < end {
            if chars[close + 1] != ':' {
                return Err(ParseFailure::uncategorized_at(
                    "Illegal character in authority",
                    close + 1,
                    input,
                ));
            }
            check_port(input, chars, close + 2, end, parts)?;
        }
    } else {
        // reg-name may not contain ':', so the first ':' starts the port.
        let host_end = chars[host_start..end]
            .iter()
            .position(|&c| c == ':')
            .map_or(end, |p| host_start + p);
        scan(input, chars, host_start, host_end, true, is_reg_name_char, |i| {
            ParseFailure::uncategorized_at("Illegal character in hostname", i, input)
        })?;
        parts.host = Some(segment(&chars[host_start..host_end]));
        if host_end < end {
            check_port(input, chars, host_end + 1, end, parts)?;
        }
    }

    Ok(())
}

fn check_port(
    input: &str,
    chars: &[char],
    start: usize,
    end: usize,
    parts: &mut UriParts,
) -> Result<(), ParseFailure> {
    scan(input, chars, start, end, false, |c: char| c.is_ascii_digit(), |i| {
        ParseFailure::uncategorized_at("Illegal character in port number", i, input)
    })?;
    parts.port = Some(segment(&chars[start..end]));
    Ok(())
}

fn check_scheme(input: &str, chars: &[char]) -> Result<(), ParseFailure> {
    if chars.is_empty() {
        return Err(ParseFailure::uncategorized(format!(
            "Expected scheme name at index 0: {input}"
        )));
    }
    if !chars[0].is_ascii_alphabetic() {
        return Err(ParseFailure::uncategorized_at(
            "Illegal character in scheme name",
            0,
            input,
        ));
    }
    for (i, &c) in chars.iter().enumerate().skip(1) {
        if !(c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
            return Err(ParseFailure::uncategorized_at(
                "Illegal character in scheme name",
                i,
                input,
            ));
        }
    }
    Ok(())
}

/// Check `chars[start..end]` against an allowed-character set.
///
/// When `allow_escapes` is set, a '%' must start a two-hex-digit escape;
/// the escape check runs before the character-set check, so a bad escape
/// is always reported as a malformed escape pair rather than an illegal
/// character.
fn scan<A, E>(
    input: &str,
    chars: &[char],
    start: usize,
    end: usize,
    allow_escapes: bool,
    is_allowed: A,
    illegal: E,
) -> Result<(), ParseFailure>
where
    A: Fn(char) -> bool,
    E: Fn(usize) -> ParseFailure,
{
    let mut i = start;
    while i < end {
        let c = chars[i];
        if c == '%' && allow_escapes {
            check_escape(input, chars, i)?;
            i += 3;
            continue;
        }
        if !is_allowed(c) {
            return Err(illegal(i));
        }
        i += 1;
    }
    Ok(())
}

/// A '%' at `i` must be followed by two hex digits, either case.
///
/// Component delimiters are never hex digits, so an escape that would
/// run past its component is caught here as malformed rather than
/// silently consuming the next component's characters.
fn check_escape(input: &str, chars: &[char], i: usize) -> Result<(), ParseFailure> {
    if i + 2 >= chars.len() || !chars[i + 1].is_ascii_hexdigit() || !chars[i + 2].is_ascii_hexdigit()
    {
        return Err(ParseFailure::malformed_escape(i, input));
    }
    Ok(())
}

fn segment(chars: &[char]) -> String {
    chars.iter().collect()
}

fn is_unreserved(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')
}

fn is_sub_delim(c: char) -> bool {
    matches!(c, '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ',' | ';' | '=')
}

fn is_pchar(c: char) -> bool {
    is_unreserved(c) || is_sub_delim(c) || matches!(c, ':' | '@')
}

fn is_path_char(c: char) -> bool {
    is_pchar(c) || c == '/'
}

/// Query and fragment share the same set: pchar plus '/' and '?'.
fn is_query_char(c: char) -> bool {
    is_pchar(c) || matches!(c, '/' | '?')
}

fn is_userinfo_char(c: char) -> bool {
    is_unreserved(c) || is_sub_delim(c) || c == ':'
}

fn is_reg_name_char(c: char) -> bool {
    is_unreserved(c) || is_sub_delim(c)
}

fn is_ip_literal_char(c: char) -> bool {
    c.is_ascii_hexdigit() || matches!(c, ':' | '.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::FailureCategory;

    fn first_failure(input: &str) -> ParseFailure {
        parse(input).expect_err("input should be rejected")
    }

    #[test]
    fn test_accepts_plain_http_url() {
        let uri = parse("http://example.com/a/b?q=1#top").unwrap();
        assert_eq!(uri.scheme(), Some("http"));
        assert_eq!(uri.host(), Some("example.com"));
        assert_eq!(uri.path(), "/a/b");
        assert_eq!(uri.query(), Some("q=1"));
        assert_eq!(uri.fragment(), Some("top"));
    }

    #[test]
    fn test_accepts_empty_reference() {
        let uri = parse("").unwrap();
        assert_eq!(uri.path(), "");
        assert_eq!(uri.scheme(), None);
    }

    #[test]
    fn test_accepts_scheme_only() {
        let uri = parse("http:").unwrap();
        assert_eq!(uri.scheme(), Some("http"));
        assert_eq!(uri.path(), "");
    }

    #[test]
    fn test_accepts_opaque_mailto() {
        let uri = parse("mailto:user@example.com").unwrap();
        assert_eq!(uri.scheme(), Some("mailto"));
        assert_eq!(uri.authority(), None);
        assert_eq!(uri.path(), "user@example.com");
    }

    #[test]
    fn test_accepts_ipv6_literal_with_port() {
        let uri = parse("http://[::1]:8080/x").unwrap();
        assert_eq!(uri.host(), Some("[::1]"));
        assert_eq!(uri.port(), Some("8080"));
        assert_eq!(uri.path(), "/x");
    }

    #[test]
    fn test_accepts_relative_reference_with_authority() {
        let uri = parse("//example.com/x").unwrap();
        assert_eq!(uri.scheme(), None);
        assert_eq!(uri.host(), Some("example.com"));
    }

    #[test]
    fn test_accepts_escapes_in_either_hex_case() {
        assert!(parse("http://example.com/a%2Fb?x=%5e").is_ok());
    }

    #[test]
    fn test_colon_in_first_path_segment_reads_as_scheme() {
        let uri = parse("a:b").unwrap();
        assert_eq!(uri.scheme(), Some("a"));
        assert_eq!(uri.path(), "b");
    }

    #[test]
    fn test_illegal_character_in_query_with_index() {
        let failure = first_failure("http://finance.yahoo.com/q/h?s=^IXIC");
        assert_eq!(
            failure.category(),
            FailureCategory::IllegalCharacter(Component::Query)
        );
        assert_eq!(failure.index(), Some(31));
    }

    #[test]
    fn test_illegal_character_in_path_with_index() {
        let failure = first_failure("http://e.com/a b");
        assert_eq!(
            failure.category(),
            FailureCategory::IllegalCharacter(Component::Path)
        );
        assert_eq!(failure.index(), Some(14));
    }

    #[test]
    fn test_illegal_character_in_fragment() {
        let failure = first_failure("http://e.com/#a#b");
        assert_eq!(
            failure.category(),
            FailureCategory::IllegalCharacter(Component::Fragment)
        );
        assert_eq!(failure.index(), Some(15));
    }

    #[test]
    fn test_malformed_escape_reports_percent_position() {
        let failure = first_failure("http://e.com/?a=%zz");
        assert_eq!(failure.category(), FailureCategory::MalformedEscapePair);
        assert_eq!(failure.index(), Some(16));
    }

    #[test]
    fn test_truncated_escape_at_end_of_input() {
        let failure = first_failure("http://e.com/?a=100%");
        assert_eq!(failure.category(), FailureCategory::MalformedEscapePair);
        assert_eq!(failure.index(), Some(19));
    }

    #[test]
    fn test_escape_may_not_cross_component_boundary() {
        // '%' then '?': the would-be digits belong to the query.
        let failure = first_failure("http://e.com/a%?q=1");
        assert_eq!(failure.category(), FailureCategory::MalformedEscapePair);
        assert_eq!(failure.index(), Some(14));
    }

    #[test]
    fn test_malformed_escape_in_hostname_is_categorized() {
        let failure = first_failure("http://ex%zzample.com/");
        assert_eq!(failure.category(), FailureCategory::MalformedEscapePair);
        assert_eq!(failure.index(), Some(9));
    }

    #[test]
    fn test_space_in_hostname_is_uncategorized() {
        let failure = first_failure("http://ho st/");
        assert_eq!(failure.category(), FailureCategory::Uncategorized);
        assert_eq!(failure.index(), Some(9));
    }

    #[test]
    fn test_scheme_errors_are_uncategorized() {
        let leading_digit = first_failure("1http://e.com/");
        assert_eq!(leading_digit.category(), FailureCategory::Uncategorized);
        assert_eq!(leading_digit.index(), Some(0));

        let empty = first_failure(":foo");
        assert_eq!(empty.category(), FailureCategory::Uncategorized);
        assert!(empty.message().starts_with("Expected scheme name"));
    }

    #[test]
    fn test_bad_port_is_uncategorized() {
        let failure = first_failure("http://e.com:8a/");
        assert_eq!(failure.category(), FailureCategory::Uncategorized);
        assert_eq!(failure.index(), Some(14));
    }

    #[test]
    fn test_first_failure_wins() {
        // Both a malformed escape and an illegal character; the escape
        // comes first in scan order.
        let failure = first_failure("http://e.com/?a=%x&b=^");
        assert_eq!(failure.category(), FailureCategory::MalformedEscapePair);
        assert_eq!(failure.index(), Some(16));
    }

    #[test]
    fn test_reported_index_is_in_bounds() {
        let inputs = [
            "http://e.com/?a=^",
            "http://e.com/?a=100%",
            "http://ho st/",
            "http://e.com:8a/",
            "1http://e.com/",
        ];
        for input in inputs {
            let failure = first_failure(input);
            if let Some(index) = failure.index() {
                assert!(
                    index < input.chars().count(),
                    "index {index} out of bounds for {input:?}"
                );
            }
        }
    }
}
