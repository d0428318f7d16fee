pub mod decode;
pub mod request;
pub mod response;
pub mod verify;

use crate::display::OutputSink;
use crate::url::{DEFAULT_PORT, Url};
use decode::StreamDecoder;
use request::Request;
use response::{Response, SUPPORTED_CONTENT_TYPE, StatusClass};
use rustls::pki_types::ServerName;
use std::io::ErrorKind;
use std::sync::Arc;
use thiserror::Error;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
};
use tokio_rustls::{TlsConnector, client::TlsStream};
use verify::{PolicyVerifier, TrustPolicy};

const READ_BUFFER_SIZE: usize = 2048;

/// An error that can occur during an exchange.
///
/// Failure responses (status classes 4 and 5) are not errors: they are
/// successfully parsed responses, reported through the output sink.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The reference does not start with `gemini://`.
    #[error("invalid URL format: {0:?}")]
    InvalidFormat(String),
    /// The request URL exceeds the 1024-byte limit.
    #[error("request URL is too long: {0} bytes")]
    RequestTooLong(usize),
    /// The connection or handshake could not be established, or the
    /// stream could not be written or read.
    #[error("transport failure: {0}")]
    TransportFailure(String),
    /// The status line does not split into a code and a meta field.
    #[error("malformed status line: {0:?}")]
    MalformedStatusLine(String),
    /// A success response with a content type other than `text/gemini`.
    #[error("unsupported content type: {0:?}")]
    UnsupportedContentType(String),
    /// A status code outside classes 2 through 5.
    #[error("unknown response code: {0:?}")]
    UnknownResponseCode(String),
}

/// What a dispatched response asks the orchestrator to do next.
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    /// The exchange is finished.
    Done,
    /// Follow a redirect to a new reference.
    Redirect(String),
}

/// A TLS connection to a Gemini host.
pub struct TlsConnection {
    stream: TlsStream<TcpStream>,
}

/// A client for the Gemini protocol.
pub struct Client {
    policy: TrustPolicy,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Create a client with the default self-signed-chain trust policy.
    pub fn new() -> Self {
        Self::with_policy(Arc::new(verify::self_signed_chain))
    }

    /// Create a client with a custom trust policy.
    pub fn with_policy(policy: TrustPolicy) -> Self {
        Self { policy }
    }

    /// Establish a TLS connection to the URL's host on port 1965.
    pub async fn establish_tls_connection(&self, url: &Url) -> Result<TlsConnection, ClientError> {
        let config = rustls::ClientConfig::builder()
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(PolicyVerifier::new(self.policy.clone())))
            .with_no_client_auth();
        let connector = TlsConnector::from(Arc::new(config));

        log::info!("connecting to {}:{DEFAULT_PORT}", url.host);
        let tcp_stream = TcpStream::connect((url.host.as_str(), DEFAULT_PORT))
            .await
            .map_err(|e| ClientError::TransportFailure(e.to_string()))?;

        // server name indication
        let domain = ServerName::try_from(url.host.clone())
            .map_err(|e| ClientError::TransportFailure(e.to_string()))?;

        let stream = connector
            .connect(domain, tcp_stream)
            .await
            .map_err(|e| ClientError::TransportFailure(e.to_string()))?;

        if let Some(version) = stream.get_ref().1.protocol_version() {
            log::debug!("negotiated {version:?}");
        }

        Ok(TlsConnection { stream })
    }

    /// Perform one full exchange against a reference, following
    /// redirects until a terminal response.
    ///
    /// Each redirect hop is a fresh exchange on a fresh connection; the
    /// previous connection is closed before the next one opens. There
    /// is no hop limit, so a redirect loop runs until interrupted.
    pub async fn fetch(&self, reference: &str, sink: &mut dyn OutputSink) -> Result<(), ClientError> {
        let mut current = reference.to_string();

        loop {
            let url = Url::parse(&current)?;
            let response = self.exchange(&url).await?;
            log::debug!("{} replied {} {:?}", url.host, response.status.code, response.status.meta);

            match dispatch(&response, sink)? {
                Outcome::Done => return Ok(()),
                Outcome::Redirect(next) => {
                    log::info!("redirected to {next}");
                    current = next;
                }
            }
        }
    }

    /// One request/response cycle: connect, send the request line, read
    /// until the server closes the stream, parse.
    async fn exchange(&self, url: &Url) -> Result<Response, ClientError> {
        let request = Request(url.clone());
        if !request.is_valid_length() {
            return Err(ClientError::RequestTooLong(url.to_string().len()));
        }

        let mut connection = self.establish_tls_connection(url).await?;

        connection
            .stream
            .write_all(request.to_string().as_bytes())
            .await
            .map_err(|e| ClientError::TransportFailure(e.to_string()))?;

        let text = read_to_close(&mut connection.stream).await?;
        connection.stream.shutdown().await.ok();

        Response::parse(&text)
    }
}

/// Read the stream in fixed-size chunks until the server closes it,
/// decoding incrementally so multi-byte characters split across reads
/// come out intact.
async fn read_to_close(stream: &mut TlsStream<TcpStream>) -> Result<String, ClientError> {
    let mut buffer = [0u8; READ_BUFFER_SIZE];
    let mut decoder = StreamDecoder::new();
    let mut text = String::new();

    loop {
        match stream.read(&mut buffer).await {
            Ok(0) => break,
            Ok(n) => decoder.feed(&buffer[..n], &mut text),
            // many servers close without a TLS close_notify
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(ClientError::TransportFailure(e.to_string())),
        }
    }
    decoder.finish(&mut text);

    Ok(text)
}

/// Act on a parsed response: render, redirect, or report a failure.
fn dispatch(response: &Response, sink: &mut dyn OutputSink) -> Result<Outcome, ClientError> {
    let status = &response.status;
    let class = status.class()?;

    // failure-class responses carry human-readable meta, so the content
    // type only constrains what we are asked to render
    if class == StatusClass::Success && !status.meta.starts_with(SUPPORTED_CONTENT_TYPE) {
        return Err(ClientError::UnsupportedContentType(status.meta.clone()));
    }

    match class {
        StatusClass::Success => {
            for line in &response.body {
                sink.line(line);
            }
            Ok(Outcome::Done)
        }
        StatusClass::Redirect => Ok(Outcome::Redirect(status.meta.clone())),
        StatusClass::TemporaryFailure => {
            sink.line(&format!("[error] temporary failure: {}", status.meta));
            Ok(Outcome::Done)
        }
        StatusClass::PermanentFailure => {
            sink.line(&format!("[error] permanent failure: {}", status.meta));
            Ok(Outcome::Done)
        }
    }
}
