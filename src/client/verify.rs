use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::Arc;

/// A verdict over the certificate chain presented during the handshake.
///
/// The chain is ordered leaf first; the policy returns `true` to accept
/// the connection. It is stateless and recomputed per connection.
pub type TrustPolicy = Arc<dyn Fn(&[CertificateDer<'_>]) -> bool + Send + Sync>;

/// The default trust policy: a self-signed-chain consistency check.
///
/// Accepts only when the leaf certificate's raw DER bytes equal the
/// root-most element's raw DER bytes. A single self-signed certificate
/// is its own root and passes; a CA-issued chain does not. There is no
/// PKI in Gemini, so this stands in for trust-store validation.
pub fn self_signed_chain(chain: &[CertificateDer<'_>]) -> bool {
    match (chain.first(), chain.last()) {
        (Some(leaf), Some(root)) => leaf.as_ref() == root.as_ref(),
        _ => false,
    }
}

/// A rustls `ServerCertVerifier` that delegates the verdict to an
/// injected [`TrustPolicy`].
pub struct PolicyVerifier {
    policy: TrustPolicy,
}

impl PolicyVerifier {
    /// Wrap a trust policy in a verifier rustls can call.
    pub fn new(policy: TrustPolicy) -> Self {
        Self { policy }
    }
}

impl fmt::Debug for PolicyVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyVerifier").finish_non_exhaustive()
    }
}

impl ServerCertVerifier for PolicyVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        log::debug!(
            "presented certificate sha256 fingerprint: {}",
            hex::encode(Sha256::digest(end_entity.as_ref())),
        );

        // rebuild the chain as presented, leaf first
        let mut chain = Vec::with_capacity(intermediates.len() + 1);
        chain.push(end_entity.clone());
        chain.extend(intermediates.iter().cloned());

        if (self.policy)(&chain) {
            Ok(ServerCertVerified::assertion())
        } else {
            Err(rustls::Error::InvalidCertificate(
                rustls::CertificateError::ApplicationVerificationFailure,
            ))
        }
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        vec![
            rustls::SignatureScheme::RSA_PKCS1_SHA256,
            rustls::SignatureScheme::RSA_PKCS1_SHA384,
            rustls::SignatureScheme::RSA_PKCS1_SHA512,
            rustls::SignatureScheme::ECDSA_NISTP256_SHA256,
            rustls::SignatureScheme::ECDSA_NISTP384_SHA384,
            rustls::SignatureScheme::ECDSA_NISTP521_SHA512,
            rustls::SignatureScheme::ED25519,
            rustls::SignatureScheme::ED448,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cert(bytes: &[u8]) -> CertificateDer<'static> {
        CertificateDer::from(bytes.to_vec())
    }

    #[test]
    fn single_self_signed_certificate_is_accepted() {
        assert!(self_signed_chain(&[cert(b"leaf")]));
    }

    #[test]
    fn leaf_equal_to_root_is_accepted_at_any_length() {
        assert!(self_signed_chain(&[cert(b"a"), cert(b"a")]));
        assert!(self_signed_chain(&[cert(b"a"), cert(b"mid"), cert(b"a")]));
    }

    #[test]
    fn leaf_differing_from_root_is_rejected() {
        assert!(!self_signed_chain(&[cert(b"leaf"), cert(b"root")]));
        assert!(!self_signed_chain(&[cert(b"leaf"), cert(b"mid"), cert(b"root")]));
    }

    #[test]
    fn empty_chain_is_rejected() {
        assert!(!self_signed_chain(&[]));
    }
}
