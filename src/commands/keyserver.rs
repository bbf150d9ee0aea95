//! Retrieving, searching for, and submitting certificates.

use std::io::Write;

use anyhow::{Context, Result};

use hkp::{KeyId, SearchQuery};
use hkp::options::EXTENSION_PREFIX;

use crate::{
    App,
    cli::keyserver::{GetCommand, SearchCommand, SendCommand},
    output::{self, sanitize::Safe},
};

/// Returns a runtime for driving the keyserver requests.
fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
        .context("Creating the async runtime failed")
}

/// Implements `hkp get`.
pub fn get(app: App, c: GetCommand) -> Result<()> {
    // Check the key ID before touching the network.
    let key_id: KeyId = c.key_id.parse()?;

    let ks = app.keyserver()?;
    if app.verbose {
        weprintln!("Retrieving {} from {}", key_id, ks.endpoint());
    }

    let rt = runtime()?;
    let key = rt.block_on(ks.retrieve(key_id.as_str(), &app.options))?
        .ok_or_else(|| anyhow::anyhow!(
            "{} not found on {}", key_id, ks.endpoint()))?;

    let mut sink = c.output.create(app.force)?;
    writeln!(sink, "{}", key)
        .with_context(|| format!("Writing to {}", c.output))?;

    if c.output.path().is_some() {
        app.info(format_args!("Wrote {} to {}", key_id, c.output));
    }

    Ok(())
}

/// Implements `hkp search`.
pub fn search(app: App, c: SearchCommand) -> Result<()> {
    let mut query = SearchQuery::new(c.query.as_str())
        .operation(c.operation.as_str())
        .exact(if c.exact { "on" } else { "off" })
        .options(&app.options);
    for (name, value) in c.variables {
        if ! name.starts_with(EXTENSION_PREFIX) {
            app.info(format_args!(
                "Warning: Ignoring variable {}, only variables starting \
                 with {:?} are sent",
                Safe(&name), EXTENSION_PREFIX));
            continue;
        }
        query = query.variable(name, value);
    }

    let ks = app.keyserver()?;
    if app.verbose {
        weprintln!("Searching {} for {:?}", ks.endpoint(), query.query());
    }

    let rt = runtime()?;
    let keys = rt.block_on(ks.search(&query))
        .with_context(|| format!("Searching {} failed", ks.endpoint()))?
        .filter(|keys| ! keys.is_empty())
        .ok_or_else(|| anyhow::anyhow!(
            "No certificates matching {:?} found on {}",
            query.query(), ks.endpoint()))?;

    let mut stdout = std::io::stdout();
    output::write_index(&mut stdout, app.output_format, &keys)
}

/// Implements `hkp send`.
pub fn send(app: App, c: SendCommand) -> Result<()> {
    let keytext = c.input.read_to_string()?;
    let keytext = Some(keytext.as_str())
        .filter(|k| ! k.trim().is_empty());

    let ks = app.keyserver()?;
    if app.verbose {
        weprintln!("Sending {} to {}", c.input, ks.endpoint());
    }

    let rt = runtime()?;
    let status = rt.block_on(ks.submit(keytext, &app.options))
        .with_context(|| format!("Sending {} to {} failed",
                                 c.input, ks.endpoint()))?;

    if ! (200..300).contains(&status) {
        return Err(anyhow::anyhow!(
            "{} rejected the certificate: HTTP status {}",
            ks.endpoint(), status));
    }

    println!("{}", status);
    app.info(format_args!("Sent {} to {}", c.input, ks.endpoint()));
    Ok(())
}
