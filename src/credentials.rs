//! Embedded API credentials
//!
//! The application id and shared secret for the appraisal API are compiled
//! into the client as obfuscated tokens and decoded exactly once, at client
//! construction. The decoded pair is held immutable for the session and fed
//! to the request signer; the cleartext values never travel in token form
//! and are never re-encoded.

use crate::error::Result;
use crate::obfuscation;

/// Obfuscated application id token compiled into the client.
pub const APP_ID_TOKEN: &str = "01C01F01F01C01H01J01D01K";

/// Obfuscated application secret token compiled into the client.
pub const APP_SECRET_TOKEN: &str = "02P01G01G01L01I01I01J02T02Q01H02Q02P01G01G01H01C02P02P01G02R01L01J02Q02P01F02T02S02Q02P01H01K02S";

/// A decoded application id and secret
///
/// Construct via [`CredentialPair::from_tokens`] or
/// [`CredentialPair::embedded`]. A malformed token is a build-time defect:
/// construction fails loudly and nothing downstream runs with substitute
/// credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialPair {
    app_id: String,
    app_secret: String,
}

impl CredentialPair {
    /// Decode a credential pair from two obfuscated tokens
    ///
    /// # Errors
    ///
    /// Returns [`Error::Credential`](crate::Error::Credential) if either
    /// token contains a character outside the key alphabet.
    pub fn from_tokens(app_id_token: &str, app_secret_token: &str) -> Result<Self> {
        Ok(Self {
            app_id: obfuscation::decode(app_id_token)?,
            app_secret: obfuscation::decode(app_secret_token)?,
        })
    }

    /// Decode the compiled-in default tokens
    ///
    /// # Errors
    ///
    /// Returns [`Error::Credential`](crate::Error::Credential) if an embedded
    /// token is malformed, which means the build itself is broken.
    pub fn embedded() -> Result<Self> {
        Self::from_tokens(APP_ID_TOKEN, APP_SECRET_TOKEN)
    }

    /// The decoded application id
    #[must_use]
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// The decoded application secret
    #[must_use]
    pub fn app_secret(&self) -> &str {
        &self.app_secret
    }
}
