//! Key id validation.
//!
//! Keyservers accept V3 key ids (32 hex digits) and V4 key ids (8, 16,
//! 32, or 40 hex digits), each optionally prefixed with `0x`.  Only
//! the length is checked; the digits themselves are left to the
//! server.

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// The prefix keyservers expect in front of a key id.
pub const PREFIX: &str = "0x";

/// Accepted key id lengths, including the prefix if present.
const ACCEPTED_LENGTHS: &[usize] = &[8, 10, 16, 18, 20, 32, 34, 40, 42];

/// Validates a key id and prefixes it with `0x`.
///
/// Fails with [`Error::InvalidKeyId`] if `key_id` is absent, empty, or
/// has an unexpected length.  Ids that already carry the prefix are
/// returned unchanged.
///
/// Besides the lengths keyservers traditionally accept, this also
/// accepts 18 characters, a 16 digit key id with the `0x` prefix.
/// That way, normalizing any valid key id twice yields the same id.
pub fn normalize<'a, K>(key_id: K) -> Result<String>
where
    K: Into<Option<&'a str>>,
{
    let key_id = key_id.into()
        .ok_or_else(|| Error::InvalidKeyId(String::new()))?;

    if ! ACCEPTED_LENGTHS.contains(&key_id.chars().count()) {
        return Err(Error::InvalidKeyId(key_id.into()));
    }

    if key_id.starts_with(PREFIX) {
        Ok(key_id.into())
    } else {
        Ok(format!("{}{}", PREFIX, key_id))
    }
}

/// A validated, `0x`-prefixed key id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyId(String);

impl KeyId {
    /// Returns the key id as sent to the keyserver.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for KeyId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        normalize(s).map(KeyId)
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for KeyId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
