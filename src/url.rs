use crate::client::ClientError;

/// The scheme every reference must carry.
pub const SCHEME: &str = "gemini";
/// The well-known Gemini port.
pub const DEFAULT_PORT: u16 = 1965;

const SCHEME_PREFIX: &str = "gemini://";

/// A Gemini URL, decomposed into its host and resource path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url {
    /// The hostname, with no scheme and no path.
    pub host: String,
    /// The resource path, always starting with `/`.
    pub path: String,
}

impl Url {
    /// Split a reference into host and path.
    ///
    /// The reference must start with `gemini://`. Everything up to the
    /// first `/` after the scheme is the host; the rest (slash included)
    /// is the path, defaulting to `/` when the reference has none.
    pub fn parse(reference: &str) -> Result<Self, ClientError> {
        let Some(rest) = reference.strip_prefix(SCHEME_PREFIX) else {
            return Err(ClientError::InvalidFormat(reference.to_string()));
        };
        let rest = rest.trim();

        Ok(match rest.find('/') {
            None => Self {
                host: rest.to_string(),
                path: "/".to_string(),
            },
            Some(slash) => Self {
                host: rest[..slash].to_string(),
                path: rest[slash..].to_string(),
            },
        })
    }
}

impl ToString for Url {
    fn to_string(&self) -> String {
        format!("{SCHEME}://{}{}", self.host, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_and_path() {
        let url = Url::parse("gemini://geminiprotocol.net/docs/faq.gmi").unwrap();
        assert_eq!(url.host, "geminiprotocol.net");
        assert_eq!(url.path, "/docs/faq.gmi");
    }

    #[test]
    fn path_defaults_to_root() {
        let url = Url::parse("gemini://midnight.pub").unwrap();
        assert_eq!(url.host, "midnight.pub");
        assert_eq!(url.path, "/");
    }

    #[test]
    fn bare_trailing_slash() {
        let url = Url::parse("gemini://midnight.pub/").unwrap();
        assert_eq!(url.host, "midnight.pub");
        assert_eq!(url.path, "/");
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let url = Url::parse("gemini://example.org/a ").unwrap();
        assert_eq!(url.host, "example.org");
        assert_eq!(url.path, "/a");
    }

    #[test]
    fn missing_scheme_is_rejected() {
        assert!(matches!(
            Url::parse("https://example.org/"),
            Err(ClientError::InvalidFormat(_)),
        ));
        assert!(matches!(
            Url::parse("example.org"),
            Err(ClientError::InvalidFormat(_)),
        ));
    }

    #[test]
    fn host_never_contains_a_slash() {
        let url = Url::parse("gemini://example.org/a/b/c").unwrap();
        assert!(!url.host.contains('/'));
        assert!(url.path.starts_with('/'));
    }

    #[test]
    fn round_trips_through_to_string() {
        let url = Url::parse("gemini://example.org/a/b").unwrap();
        assert_eq!(url.to_string(), "gemini://example.org/a/b");
    }
}
