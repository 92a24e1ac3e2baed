use url::Url;

use super::Rejection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

/// Where a redirect candidate points, once it has passed structural checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Relative,
    /// `authority` is the lowercased host, with the port when it is not the
    /// scheme default. `default_port` is set when the port was left out or
    /// spelled as the default, so `edx.org` can also match `edx.org:443`.
    /// `scheme` is `None` for `//host/path`.
    Absolute {
        scheme: Option<Scheme>,
        authority: String,
        default_port: Option<u16>,
    },
}

impl Target {
    pub fn parse(raw: &str) -> Result<Self, Rejection> {
        let candidate = raw.trim();
        if candidate.is_empty() {
            return Err(Rejection::Empty);
        }
        if candidate.chars().any(char::is_control) || candidate.starts_with(is_format) {
            return Err(Rejection::ControlCharacter);
        }

        // A backslash inside the authority is read as a slash by browsers but
        // as part of the userinfo or host by RFC 3986 clients.
        if raw_authority(candidate).map_or(false, |a| a.contains('\\')) {
            return Err(Rejection::BackslashInAuthority);
        }

        // Browsers read backslashes as slashes.
        let normalized = candidate.replace('\\', "/");
        if normalized.starts_with("///") {
            return Err(Rejection::TripleSlash);
        }

        if let Some((scheme, rest)) = split_scheme(&normalized) {
            let scheme = match scheme.to_ascii_lowercase().as_str() {
                "http" => Scheme::Http,
                "https" => Scheme::Https,
                _ => return Err(Rejection::UnsupportedScheme),
            };
            if rest.starts_with("///") {
                return Err(Rejection::TripleSlash);
            }
            if !rest.starts_with("//") {
                return Err(Rejection::MissingAuthority);
            }
            let (authority, default_port) = parse_authority(&normalized)?;
            Ok(Target::Absolute {
                scheme: Some(scheme),
                authority,
                default_port,
            })
        } else if normalized.starts_with("//") {
            // The default port depends on the scheme of the request.
            let (authority, _) = parse_authority(&format!("https:{}", normalized))?;
            Ok(Target::Absolute {
                scheme: None,
                authority,
                default_port: None,
            })
        } else {
            Ok(Target::Relative)
        }
    }
}

fn split_scheme(s: &str) -> Option<(&str, &str)> {
    let idx = s.find(':')?;
    let (scheme, rest) = (&s[..idx], &s[idx + 1..]);

    let mut chars = scheme.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return None,
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        Some((scheme, rest))
    } else {
        None
    }
}

/// Unicode format characters (category Cf) used to disguise a leading `//`.
fn is_format(c: char) -> bool {
    matches!(
        c,
        '\u{ad}'
            | '\u{600}'..='\u{605}'
            | '\u{61c}'
            | '\u{6dd}'
            | '\u{70f}'
            | '\u{180e}'
            | '\u{200b}'..='\u{200f}'
            | '\u{202a}'..='\u{202e}'
            | '\u{2060}'..='\u{2064}'
            | '\u{2066}'..='\u{206f}'
            | '\u{feff}'
            | '\u{fff9}'..='\u{fffb}'
    )
}

/// The authority of the unnormalized candidate, if it spells one out.
fn raw_authority(s: &str) -> Option<&str> {
    let rest = split_scheme(s).map_or(s, |(_, rest)| rest);
    let rest = rest.strip_prefix("//")?;
    let end = rest
        .find(|c: char| matches!(c, '/' | '?' | '#'))
        .unwrap_or_else(|| rest.len());
    Some(&rest[..end])
}

fn parse_authority(s: &str) -> Result<(String, Option<u16>), Rejection> {
    let url = Url::parse(s).map_err(|_| Rejection::Unparseable)?;

    if !url.username().is_empty() || url.password().is_some() {
        return Err(Rejection::Credentials);
    }

    let host = url.host_str().ok_or(Rejection::MissingAuthority)?;
    let authority = match url.port() {
        Some(port) => (format!("{}:{}", host, port), None),
        None => (host.to_string(), url.port_or_known_default()),
    };
    Ok(authority)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn absolute(scheme: Option<Scheme>, authority: &str, default_port: Option<u16>) -> Result<Target, Rejection> {
        Ok(Target::Absolute {
            scheme,
            authority: authority.to_string(),
            default_port,
        })
    }

    #[yare::parameterized(
        root = { "/", Ok(Target::Relative) },
        path = { "/dashboard", Ok(Target::Relative) },
        bare_path = { "courses/course-v1", Ok(Target::Relative) },
        query_with_colon = { "/login?next=a:b", Ok(Target::Relative) },
        padded = { "  /dashboard  ", Ok(Target::Relative) },
        https = { "https://edx.org/courses", absolute(Some(Scheme::Https), "edx.org", Some(443)) },
        http = { "http://edx.org/courses", absolute(Some(Scheme::Http), "edx.org", Some(80)) },
        mixed_case = { "HTTPS://EDX.org/", absolute(Some(Scheme::Https), "edx.org", Some(443)) },
        port = { "https://edx.org:8443/", absolute(Some(Scheme::Https), "edx.org:8443", None) },
        default_port = { "https://edx.org:443/", absolute(Some(Scheme::Https), "edx.org", Some(443)) },
        scheme_relative = { "//edx.org/x", absolute(None, "edx.org", None) },
        backslash_relative = { "/\\evil.com", absolute(None, "evil.com", None) },
        backslash_in_path = { "https://edx.org/a\\b", absolute(Some(Scheme::Https), "edx.org", Some(443)) },
        empty = { "", Err(Rejection::Empty) },
        blank = { "   ", Err(Rejection::Empty) },
        control = { "/dash\u{7}board", Err(Rejection::ControlCharacter) },
        leading_lrm = { "\u{200e}//evil.com", Err(Rejection::ControlCharacter) },
        leading_zwsp = { "\u{200b}//evil.com", Err(Rejection::ControlCharacter) },
        leading_bom = { "\u{feff}//evil.com", Err(Rejection::ControlCharacter) },
        backslash_userinfo = { "https://edx.org\\@evil.com", Err(Rejection::BackslashInAuthority) },
        backslash_userinfo_relative = { "//edx.org\\@evil.com", Err(Rejection::BackslashInAuthority) },
        backslash_host = { "https://edx.org\\evil.com", Err(Rejection::BackslashInAuthority) },
        triple_slash = { "http:///edx.org/courses", Err(Rejection::TripleSlash) },
        leading_triple_slash = { "///evil.com", Err(Rejection::TripleSlash) },
        backslash_triple = { "https:\\\\\\evil.com", Err(Rejection::TripleSlash) },
        javascript = { "javascript:alert(1)", Err(Rejection::UnsupportedScheme) },
        ftp = { "ftp://edx.org/", Err(Rejection::UnsupportedScheme) },
        no_authority = { "http:edx.org", Err(Rejection::MissingAuthority) },
        userinfo = { "https://edx.org@evil.com/", Err(Rejection::Credentials) },
        empty_host = { "https://", Err(Rejection::Unparseable) },
    )]
    fn parse(raw: &str, expected: Result<Target, Rejection>) {
        assert_eq!(Target::parse(raw), expected);
    }
}
