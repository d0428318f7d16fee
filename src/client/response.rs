use crate::client::ClientError;
use nom::{
    IResult,
    Parser,
    bytes::complete::{tag, take_till1},
    combinator::rest,
};

/// The only content type the client renders.
pub const SUPPORTED_CONTENT_TYPE: &str = "text/gemini";

/// The four status classes the protocol defines, keyed by the first
/// digit of the response code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 2x: the request succeeded and the body is the resource.
    Success,
    /// 3x: the resource lives elsewhere; the meta field is the new URL.
    Redirect,
    /// 4x: the server could not serve the request right now.
    TemporaryFailure,
    /// 5x: the server will never serve this request.
    PermanentFailure,
}

/// The first line of a response: a code and a meta field.
///
/// On success the meta field is a MIME type; on a redirect it is the
/// URL to follow; on a failure it is human-readable information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    /// The two-digit response code, kept as received.
    pub code: String,
    /// Everything after the first space.
    pub meta: String,
}

fn status_line(input: &str) -> IResult<&str, (&str, &str)> {
    let (input, code) = take_till1(|c| c == ' ').parse(input)?;
    let (input, _) = tag(" ").parse(input)?;
    let (input, meta) = rest.parse(input)?;

    Ok((input, (code, meta)))
}

impl StatusLine {
    /// Parse a status line into its code and meta tokens.
    ///
    /// The line must contain at least one space; everything before the
    /// first space is the code and everything after it is the meta
    /// field. A line with no space (including an empty response) fails
    /// with [`ClientError::MalformedStatusLine`].
    pub fn parse(line: &str) -> Result<Self, ClientError> {
        let (_, (code, meta)) = status_line(line)
            .map_err(|_| ClientError::MalformedStatusLine(line.to_string()))?;

        Ok(Self {
            code: code.to_string(),
            meta: meta.to_string(),
        })
    }

    /// The status class, from the code's leading digit.
    pub fn class(&self) -> Result<StatusClass, ClientError> {
        match self.code.chars().next() {
            Some('2') => Ok(StatusClass::Success),
            Some('3') => Ok(StatusClass::Redirect),
            Some('4') => Ok(StatusClass::TemporaryFailure),
            Some('5') => Ok(StatusClass::PermanentFailure),
            _ => Err(ClientError::UnknownResponseCode(self.code.clone())),
        }
    }
}

/// A parsed response: the status line plus the body lines after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// The parsed first line.
    pub status: StatusLine,
    /// Lines 1.. of the decoded text, with trailing `\r` trimmed.
    pub body: Vec<String>,
}

impl Response {
    /// Split decoded text into a status line and body lines.
    pub fn parse(text: &str) -> Result<Self, ClientError> {
        let mut lines = text.split('\n');
        // split always yields at least one item
        let header = lines.next().unwrap_or_default();
        let status = StatusLine::parse(header.trim_end_matches('\r'))?;
        let body = lines
            .map(|line| line.trim_end_matches('\r').to_string())
            .collect();

        Ok(Self { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_with_body() {
        let response = Response::parse("20 text/gemini\r\n# Hello\nworld").unwrap();
        assert_eq!(response.status.code, "20");
        assert_eq!(response.status.meta, "text/gemini");
        assert_eq!(response.body, vec!["# Hello".to_string(), "world".to_string()]);
    }

    #[test]
    fn meta_keeps_everything_after_the_first_space() {
        let response = Response::parse("40 slow down\r\n").unwrap();
        assert_eq!(response.status.code, "40");
        assert_eq!(response.status.meta, "slow down");
    }

    #[test]
    fn redirect_meta_is_the_target() {
        let status = StatusLine::parse("30 gemini://example.org/next").unwrap();
        assert_eq!(status.meta, "gemini://example.org/next");
        assert_eq!(status.class().unwrap(), StatusClass::Redirect);
    }

    #[test]
    fn single_token_is_malformed() {
        assert!(matches!(
            StatusLine::parse("20"),
            Err(ClientError::MalformedStatusLine(_)),
        ));
    }

    #[test]
    fn empty_response_is_malformed_not_a_panic() {
        assert!(matches!(
            Response::parse(""),
            Err(ClientError::MalformedStatusLine(_)),
        ));
    }

    #[test]
    fn classes_follow_the_leading_digit() {
        for (code, class) in [
            ("20", StatusClass::Success),
            ("31", StatusClass::Redirect),
            ("44", StatusClass::TemporaryFailure),
            ("51", StatusClass::PermanentFailure),
        ] {
            let status = StatusLine::parse(&format!("{code} meta")).unwrap();
            assert_eq!(status.class().unwrap(), class);
        }
    }

    #[test]
    fn unknown_class_is_an_error() {
        let status = StatusLine::parse("70 meta").unwrap();
        assert!(matches!(
            status.class(),
            Err(ClientError::UnknownResponseCode(_)),
        ));
    }

    #[test]
    fn failure_without_body_parses() {
        let response = Response::parse("51 not found\r\n").unwrap();
        assert_eq!(response.status.code, "51");
        assert_eq!(response.body, vec![String::new()]);
    }
}
