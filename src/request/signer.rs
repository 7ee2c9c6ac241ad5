//! URL signing for business (client id) authentication.
//!
//! The signature is an HMAC-SHA1 of the URL's path and query, keyed with the
//! URL-safe base64 decoded private key, and appended as a `signature`
//! parameter in URL-safe base64.

use crate::configuration::{FieldError, ValidationErrorKind, ValidationErrors};
use crate::{Error, Result};
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

// Keys are issued padded, but unpadded copies are common.
const KEY_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

pub fn decode_private_key(key: &str) -> std::result::Result<Vec<u8>, base64::DecodeError> {
    KEY_ENGINE.decode(key.trim())
}

/// Signature for `path_and_query` (e.g. `/maps/api/distancematrix/json?origins=...`).
pub fn signature(path_and_query: &str, private_key: &str) -> Result<String> {
    let key = decode_private_key(private_key).map_err(|_| invalid_key())?;
    let mut mac = HmacSha1::new_from_slice(&key).map_err(|_| invalid_key())?;
    mac.update(path_and_query.as_bytes());
    Ok(URL_SAFE.encode(mac.finalize().into_bytes()))
}

/// Append the `signature` parameter to `path_and_query`.
pub fn sign(path_and_query: &str, private_key: &str) -> Result<String> {
    let signature = signature(path_and_query, private_key)?;
    Ok(format!("{}&signature={}", path_and_query, signature))
}

fn invalid_key() -> Error {
    let mut errors = ValidationErrors::new();
    errors.push(FieldError::new(
        "google_business_api_private_key",
        ValidationErrorKind::InvalidPrivateKey,
        Some("[FILTERED]".to_string()),
    ));
    Error::Validation(errors)
}
