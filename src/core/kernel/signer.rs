use crate::core::errors::ExchangeError;
use crate::core::kernel::codec::{encode_query, QueryParams};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Signer trait for request authentication
///
/// Implementations turn the canonical query string (without the leading `?`)
/// into the value sent as the `signature` parameter.
pub trait Signer: Send + Sync {
    /// Sign a canonical payload and return the encoded signature
    fn sign(&self, payload: &str) -> Result<String, ExchangeError>;
}

/// HMAC-SHA256 signer producing lowercase hex digests
pub struct HmacSigner {
    secret_key: Secret<String>,
}

impl HmacSigner {
    pub fn new(secret_key: Secret<String>) -> Self {
        Self { secret_key }
    }
}

impl std::fmt::Debug for HmacSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacSigner").finish_non_exhaustive()
    }
}

impl Signer for HmacSigner {
    fn sign(&self, payload: &str) -> Result<String, ExchangeError> {
        let mut mac = HmacSha256::new_from_slice(self.secret_key.expose_secret().as_bytes())
            .map_err(|e| ExchangeError::AuthError(format!("Invalid secret key: {}", e)))?;
        mac.update(payload.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

/// Merge `timestamp` into `params`, sign the encoded result and append `signature`.
///
/// Parameters are signed in the order they were assembled. Callers that need a
/// reproducible signature must assemble parameters in a stable order.
pub fn sign_params(
    signer: &dyn Signer,
    params: QueryParams,
    timestamp: u64,
) -> Result<QueryParams, ExchangeError> {
    let mut signed = params.with("timestamp", timestamp);
    let query = encode_query(&signed);
    let payload = query.strip_prefix('?').unwrap_or(&query);
    let signature = signer.sign(payload)?;
    signed.insert("signature", signature);
    Ok(signed)
}
