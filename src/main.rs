#![doc(html_favicon_url = "https://docs.sequoia-pgp.org/favicon.png")]
#![doc(html_logo_url = "https://docs.sequoia-pgp.org/logo.svg")]

#![allow(rustdoc::invalid_rust_codeblocks)]
#![allow(rustdoc::bare_urls)]
#![doc = include_str!("../README.md")]

use anyhow::Result;

use clap::FromArgMatches;

#[macro_use] mod macros;

mod app;
use app::App;

mod cli;
mod commands;
mod config;
use config::ConfigFile;
pub mod output;

fn main() {
    if let Err(e) = real_main() {
        print_error_chain(&e);
        std::process::exit(1);
    }
}

fn real_main() -> Result<()> {
    let matches = cli::build().get_matches();
    let mut c = cli::HkpCommand::from_arg_matches(&matches)?;

    // Workaround for https://github.com/clap-rs/clap/issues/3846
    c.server_source = matches.value_source("server");
    c.options_source = matches.value_source("options");
    c.output_format_source = matches.value_source("output_format");

    let config_file = ConfigFile::file_name(c.config_file.as_deref());
    let config = ConfigFile::default().read(config_file.as_deref())?;

    let keyserver = config.keyserver(&c.server, c.server_source);
    let app = App {
        verbose: c.verbose,
        quiet: c.quiet,
        force: c.force,
        keyserver: keyserver.into(),
        port: config.port(c.port, keyserver, c.server_source),
        options: config.options(&c.options, c.options_source).to_vec(),
        output_format: config.output_format(c.output_format,
                                            c.output_format_source),
        config_file,
    };

    commands::dispatch(app, c)
}

// Sometimes the same error cascades.  Compress these.
fn error_chain(err: &anyhow::Error) -> Vec<String> {
    let mut errs = std::iter::once(err.to_string())
        .chain(err.chain().map(|source| source.to_string()))
        .collect::<Vec<String>>();
    errs.dedup();
    errs
}

/// Prints the error and causes, if any.
pub fn print_error_chain(err: &anyhow::Error) {
    let mut chain = error_chain(err).into_iter();
    if let Some(e) = chain.next() {
        weprintln!(initial_indent="  error: ", subsequent_indent="         ",
                   "{}", e);
    }
    for cause in chain {
        weprintln!(initial_indent="because: ", subsequent_indent="         ",
                   "{}", cause);
    }
}
