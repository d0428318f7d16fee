use crate::url::Url;

/// The largest URL a request line may carry, in bytes.
pub const MAX_URL_LENGTH: usize = 1024;

/// A request for a given URL.
#[derive(Debug)]
pub struct Request(pub Url);

impl ToString for Request {
    fn to_string(&self) -> String {
        format!("{}\r\n", self.0.to_string())
    }
}

impl Request {
    /// Check that the request's URL fits the 1024-byte protocol limit.
    pub fn is_valid_length(&self) -> bool {
        self.0.to_string().len() <= MAX_URL_LENGTH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_line_ends_with_crlf() {
        let request = Request(Url::parse("gemini://example.org/page").unwrap());
        assert_eq!(request.to_string(), "gemini://example.org/page\r\n");
    }

    #[test]
    fn short_url_is_valid() {
        let request = Request(Url::parse("gemini://example.org").unwrap());
        assert!(request.is_valid_length());
    }

    #[test]
    fn oversized_url_is_invalid() {
        let reference = format!("gemini://example.org/{}", "a".repeat(1100));
        let request = Request(Url::parse(&reference).unwrap());
        assert!(!request.is_valid_length());
    }
}
