//! Rendering results for humans and machines.
//!
//! Search results are either listed in a human-readable form, or
//! serialized as JSON, depending on the `--output-format` global
//! option.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};

use hkp::{IdentityRecord, KeyRecord, PrimaryKey};

pub mod pluralize;
pub mod sanitize;
pub mod wrapping;

use crate::cli::output::OutputFormat;
use pluralize::Pluralize;
use sanitize::Safe;

/// Serializes an object to JSON.
pub fn to_json<O, W>(mut w: W, o: &O) -> Result<()>
where
    O: serde::Serialize,
    W: std::io::Write,
{
    // Pretty-print, then add a final newline.
    serde_json::to_writer_pretty(&mut w, o)?;
    writeln!(w)?;
    Ok(())
}

/// Writes the keys found by a search in the requested format.
pub fn write_index(w: &mut dyn Write, format: OutputFormat,
                   keys: &[KeyRecord])
                   -> Result<()>
{
    match format {
        OutputFormat::Json => to_json(w, &keys),
        OutputFormat::HumanReadable => human_readable(w, keys),
    }
}

fn human_readable(w: &mut dyn Write, keys: &[KeyRecord]) -> Result<()> {
    for (i, key) in keys.iter().enumerate() {
        if i > 0 {
            wwriteln!(stream=w)?;
        }

        let pk = key.primary_key();
        wwriteln!(stream=w, initial_indent=" - ", "{}", Safe(pk.key_id()))?;
        wwriteln!(stream=w, indent="   ", "{}", describe_key(pk))?;

        for uid in key.identities() {
            wwriteln!(stream=w, initial_indent="   - ",
                      "{}", describe_identity(uid))?;
        }
    }

    wwriteln!(stream=w)?;
    wwriteln!(stream=w, "Found {}.", keys.len().of("key"))?;
    Ok(())
}

/// Formats a timestamp for listings.
fn date(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%d").to_string()
}

/// Returns a one line summary of the primary key.
fn describe_key(pk: &PrimaryKey) -> String {
    let mut s = pk.algorithm_name().to_string();
    if pk.key_length() > 0 {
        s.push_str(&format!(" {} bits", pk.key_length()));
    }
    if let Some(t) = pk.creation() {
        s.push_str(&format!(", created {}", date(t)));
    }
    if let Some(t) = pk.expiration() {
        s.push_str(&format!(", expires {}", date(t)));
    }
    s.push_str(&flags(pk.revoked(), pk.disabled(), pk.expired()));
    s
}

/// Returns a one line summary of the user ID.
fn describe_identity(uid: &IdentityRecord) -> String {
    format!("{}{}",
            Safe(&uid.decoded_user_id()),
            flags(uid.revoked(), uid.disabled(), uid.expired()))
}

fn flags(revoked: bool, disabled: bool, expired: bool) -> String {
    let mut s = String::new();
    for (set, label) in [(revoked, "revoked"),
                         (disabled, "disabled"),
                         (expired, "expired")] {
        if set {
            s.push_str(&format!(" [{}]", label));
        }
    }
    s
}
