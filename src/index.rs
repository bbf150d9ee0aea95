//! Parsing machine-readable indexes.
//!
//! A keyserver answers an `index` operation with `options=mr` using a
//! colon-delimited format, see [section 5.2 of the HKP draft]:
//!
//! ```text
//! info:<version>:<count>
//! pub:<keyid>:<algo>:<keylen>:<creationdate>:<expirationdate>:<flags>
//! uid:<escaped uid string>:<creationdate>:<expirationdate>:<flags>
//! ```
//!
//! Line breaks carry no meaning.  The body is split at every `pub`,
//! and every key's segment is split at every `uid:`.
//!
//! [section 5.2 of the HKP draft]: https://tools.ietf.org/html/draft-shaw-openpgp-hkp-00#section-5.2

use chrono::{DateTime, Utc};
use percent_encoding::percent_decode_str;
use serde::Serialize;

use crate::{
    Error,
    Result,
    algorithm,
};

/// Controls tracing in this module.
const TRACE: bool = false;

/// Separates keys.
const KEY_SEPARATOR: &str = "pub";

/// Separates a key's user ids.
const IDENTITY_SEPARATOR: &str = "uid:";

/// Starts the `info:<version>:<count>` line.
const INFO_PREFIX: &str = "info";

/// A key found by a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyRecord {
    primary_key: PrimaryKey,
    identities: Vec<IdentityRecord>,
}

impl KeyRecord {
    /// Returns the primary key.
    pub fn primary_key(&self) -> &PrimaryKey {
        &self.primary_key
    }

    /// Returns the user ids in the order the server listed them.
    pub fn identities(&self) -> &[IdentityRecord] {
        &self.identities
    }
}

/// The primary key of a [`KeyRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrimaryKey {
    key_id: String,
    algorithm_id: u32,
    algorithm_name: &'static str,
    key_length: u32,
    creation: Option<DateTime<Utc>>,
    expiration: Option<DateTime<Utc>>,
    revoked: bool,
    disabled: bool,
    expired: bool,
}

impl PrimaryKey {
    /// Returns the key id or fingerprint, as sent by the server.
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Returns the public-key algorithm's identifier.
    pub fn algorithm_id(&self) -> u32 {
        self.algorithm_id
    }

    /// Returns the public-key algorithm's name.
    pub fn algorithm_name(&self) -> &'static str {
        self.algorithm_name
    }

    /// Returns the key size in bits.
    pub fn key_length(&self) -> u32 {
        self.key_length
    }

    /// Returns the key's creation time, if known.
    pub fn creation(&self) -> Option<DateTime<Utc>> {
        self.creation
    }

    /// Returns the key's expiration time, if any.
    pub fn expiration(&self) -> Option<DateTime<Utc>> {
        self.expiration
    }

    /// Returns whether the key is revoked.
    pub fn revoked(&self) -> bool {
        self.revoked
    }

    /// Returns whether the key is disabled.
    pub fn disabled(&self) -> bool {
        self.disabled
    }

    /// Returns whether the key is expired.
    pub fn expired(&self) -> bool {
        self.expired
    }

    /// Parses `:<keyid>:<algo>:<keylen>:<creation>:<expiration>:<flags>`.
    fn from_fields(fields: &[&str]) -> Result<Self> {
        let algorithm_id = integer(field(fields, 2, "algorithm")?, "algorithm")?;
        let flags = Flags::from(field(fields, 6, "key flags")?);

        Ok(PrimaryKey {
            key_id: field(fields, 1, "key id")?.into(),
            algorithm_id,
            algorithm_name: algorithm::name_for(algorithm_id),
            key_length: integer(field(fields, 3, "key length")?, "key length")?,
            creation: timestamp(field(fields, 4, "key creation time")?)?,
            expiration: timestamp(field(fields, 5, "key expiration time")?)?,
            revoked: flags.revoked,
            disabled: flags.disabled,
            expired: flags.expired,
        })
    }
}

/// A user id of a [`KeyRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityRecord {
    user_id: String,
    creation: Option<DateTime<Utc>>,
    expiration: Option<DateTime<Utc>>,
    revoked: bool,
    disabled: bool,
    expired: bool,
}

impl IdentityRecord {
    /// Returns the user id as sent by the server.
    ///
    /// Servers escape colons and other special characters using
    /// percent encoding.  See [`IdentityRecord::decoded_user_id`].
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Returns the user id with percent escapes decoded.
    ///
    /// Invalid UTF-8 is replaced.  The result comes from an untrusted
    /// source and must be sanitized before being displayed.
    pub fn decoded_user_id(&self) -> String {
        percent_decode_str(&self.user_id).decode_utf8_lossy().into_owned()
    }

    /// Returns the self-signature's creation time, if known.
    pub fn creation(&self) -> Option<DateTime<Utc>> {
        self.creation
    }

    /// Returns the user id's expiration time, if any.
    pub fn expiration(&self) -> Option<DateTime<Utc>> {
        self.expiration
    }

    /// Returns whether the user id is revoked.
    pub fn revoked(&self) -> bool {
        self.revoked
    }

    /// Returns whether the user id is disabled.
    pub fn disabled(&self) -> bool {
        self.disabled
    }

    /// Returns whether the user id is expired.
    pub fn expired(&self) -> bool {
        self.expired
    }

    /// Parses `<uid>:<creation>:<expiration>:<flags>`.
    fn from_fields(fields: &[&str]) -> Result<Self> {
        let flags = Flags::from(field(fields, 3, "user id flags")?);

        Ok(IdentityRecord {
            user_id: field(fields, 0, "user id")?.into(),
            creation: timestamp(field(fields, 1, "user id creation time")?)?,
            expiration: timestamp(field(fields, 2, "user id expiration time")?)?,
            revoked: flags.revoked,
            disabled: flags.disabled,
            expired: flags.expired,
        })
    }
}

/// The `r`, `d`, and `e` flags.
struct Flags {
    revoked: bool,
    disabled: bool,
    expired: bool,
}

impl From<&str> for Flags {
    fn from(flags: &str) -> Self {
        Flags {
            revoked: flags.contains('r'),
            disabled: flags.contains('d'),
            expired: flags.contains('e'),
        }
    }
}

/// Returns whether the colon-separated fields are a `pub` line.
///
/// `uid` lines have four fields (the `uid:` tag has been split off),
/// `pub` lines have seven (the leading one being empty).
fn is_primary_key_tail(fields: &[&str]) -> bool {
    fields.len() > 4
}

/// Returns the given field, or fails if the line is too short.
fn field<'a>(fields: &[&'a str], index: usize, what: &str) -> Result<&'a str> {
    fields.get(index).copied().ok_or_else(|| Error::MalformedIndexResponse(
        format!("missing {} in {:?}", what, fields.join(":"))))
}

fn integer(value: &str, what: &str) -> Result<u32> {
    value.parse().map_err(|_| Error::MalformedIndexResponse(
        format!("invalid {}: {:?}", what, value)))
}

/// Converts a Unix timestamp.  The empty string means not set.
fn timestamp(value: &str) -> Result<Option<DateTime<Utc>>> {
    if value.is_empty() {
        return Ok(None);
    }

    value.parse::<i64>().ok()
        .and_then(|t| DateTime::from_timestamp(t, 0))
        .map(Some)
        .ok_or_else(|| Error::MalformedIndexResponse(
            format!("invalid timestamp: {:?}", value)))
}

/// Parses one key's segment: the tail of the `pub` line followed by
/// the `uid` lines.
fn parse_key(segment: &str) -> Result<KeyRecord> {
    let mut primary_key = None;
    let mut identities = Vec::new();

    for block in segment.split(IDENTITY_SEPARATOR) {
        let fields = block.split(':').collect::<Vec<_>>();
        if is_primary_key_tail(&fields) {
            primary_key = Some(PrimaryKey::from_fields(&fields)?);
        } else {
            identities.push(IdentityRecord::from_fields(&fields)?);
        }
    }

    let primary_key = primary_key.ok_or_else(|| Error::MalformedIndexResponse(
        format!("no primary key in {:?}", segment)))?;

    Ok(KeyRecord { primary_key, identities })
}

/// Parses a machine-readable index.
///
/// Returns the keys in the order the server listed them.  If any key
/// is malformed, this fails with [`Error::MalformedIndexResponse`].
///
/// # Examples
///
/// ```
/// # fn main() -> hkp::Result<()> {
/// let keys = hkp::index::parse(
///     "info:1:1\n\
///      pub:AABBCCDD:17:2048:1136214245::\n\
///      uid:Jane Doe <jane@example.org>:1136214245::\n")?;
/// assert_eq!(keys.len(), 1);
/// assert_eq!(keys[0].primary_key().algorithm_name(), "DSA");
/// assert_eq!(keys[0].identities()[0].user_id(), "Jane Doe <jane@example.org>");
/// # Ok(()) }
/// ```
pub fn parse(body: &str) -> Result<Vec<KeyRecord>> {
    tracer!(TRACE, "index::parse");

    let body = body.replace(['\r', '\n'], "");

    let mut keys = Vec::new();
    for segment in body.split(KEY_SEPARATOR) {
        if segment.is_empty() {
            continue;
        }
        if segment.starts_with(INFO_PREFIX) {
            t!("Skipping {:?}", segment);
            continue;
        }

        keys.push(parse_key(segment)?);
    }

    t!("Parsed {} keys", keys.len());
    Ok(keys)
}
