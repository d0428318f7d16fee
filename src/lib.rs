//! # gemfetch
//!
//! gemfetch is a minimal client for the Gemini protocol described at
//! [gemini://geminiprotocol.net/docs/protocol-specification.gmi](gemini://geminiprotocol.net/docs/protocol-specification.gmi).
//!
//! It performs one exchange at a time: open a TLS connection to
//! `host:1965`, send a single request line, read until the server
//! closes the stream, then render the body, follow the redirect, or
//! report the failure. Certificates are checked with a pluggable trust
//! policy instead of a CA store, matching the protocol's self-signed
//! ethos.

#![warn(missing_docs)]
#![warn(unused_imports)]

mod client;
mod display;
mod url;

pub use client::{
    Client,
    ClientError,
    TlsConnection,
    decode::StreamDecoder,
    request::Request,
    response::{Response, StatusClass, StatusLine},
    verify::{PolicyVerifier, TrustPolicy, self_signed_chain},
};
pub use display::{Console, OutputSink};
pub use url::{DEFAULT_PORT, SCHEME, Url};
