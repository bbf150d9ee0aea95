//! Errors returned by this crate.

/// Results for hkp.
pub type Result<T> = ::std::result::Result<T, Error>;

/// Errors returned by the protocol and network routines.
///
/// Note: This enum cannot be exhaustively matched to allow future
/// extensions.
#[non_exhaustive]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A key id is missing or has an invalid length.
    #[error("No or invalid key id: {0:?}")]
    InvalidKeyId(String),

    /// A search operation is neither `index` nor an `x-` extension.
    #[error("Operation not allowed: {0:?}")]
    InvalidOperation(String),

    /// Submission was requested without any key material.
    #[error("No key(s) given")]
    NoKeyMaterial,

    /// The server's machine-readable index could not be parsed.
    #[error("Malformed index response: {0}")]
    MalformedIndexResponse(String),

    /// The HTTP exchange with the keyserver failed.
    #[error("Keyserver unavailable: {0}")]
    TransportUnavailable(String),

    /// A given keyserver URL was malformed.
    #[error("Malformed URL {0:?}; expected hkp:, hkps:, http:, or https:")]
    MalformedUrl(String),
}
