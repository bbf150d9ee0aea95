//! Configuration inspection.

use std::collections::BTreeMap;

use anyhow::Result;
use clap::ValueEnum;
use toml_edit::Value;

use crate::{
    App,
    cli::config,
    config::ConfigFile,
};

pub fn dispatch(app: App, cmd: config::Command) -> Result<()> {
    match cmd.subcommand {
        config::Subcommands::Get(c) => get(app, c),
        config::Subcommands::Template(c) => template(app, c),
    }
}

/// Implements `hkp config get`.
fn get(app: App, _: config::GetCommand) -> Result<()> {
    let endpoint = app.endpoint()?;

    let mut acc: BTreeMap<&str, Value> = BTreeMap::new();
    acc.insert("network.keyserver", app.keyserver.as_str().into());
    acc.insert("network.port", i64::from(endpoint.port()).into());
    acc.insert("network.options",
               app.options.iter().map(String::as_str)
               .collect::<toml_edit::Array>().into());
    acc.insert("output.format",
               app.output_format.to_possible_value()
               .map(|v| v.get_name().to_string())
               .unwrap_or_default().into());

    // Display sorted results.
    for (k, v) in acc {
        println!("{} = {}", k, v.decorated("", ""));
    }

    Ok(())
}

/// Implements `hkp config template`.
fn template(app: App, cmd: config::TemplateCommand) -> Result<()> {
    let mut sink = cmd.output.create(app.force)?;
    ConfigFile::default_template(app.config_file.as_deref())?
        .dump(&mut sink)?;
    Ok(())
}
