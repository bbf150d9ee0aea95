// Command-line parser for `hkp`.
//
// XXX: This should be an inner doc comment, but cannot until
// https://github.com/rust-lang/rust/issues/66920 is resolved.  The
// build script includes this file to generate shell completions.

use std::path::PathBuf;

use clap::{Command, CommandFactory, Parser, Subcommand};
use clap::parser::ValueSource;

pub mod config;
pub mod keyserver;
pub mod output;
pub mod types;

/// The keyserver used if neither the command line nor the
/// configuration file names one.
pub const DEFAULT_KEYSERVER: &str = "hkps://keys.openpgp.org";

/// The environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "HKP_CONFIG";

pub const GLOBAL_OPTIONS_HEADER: &str = "Global Options";

/// Returns the command line parser.
pub fn build() -> Command {
    HkpCommand::command()
        .version(env!("CARGO_PKG_VERSION"))
        .max_term_width(100)
}

#[derive(Parser, Debug)]
#[clap(
    name = "hkp",
    about = "A client for the OpenPGP HTTP Keyserver Protocol",
    long_about = "A client for the OpenPGP HTTP Keyserver Protocol

Retrieves, searches for, and submits OpenPGP certificates using a \
keyserver speaking HKP.  `hkp://` URLs are contacted using HTTP on \
port 11371, `hkps://` URLs using HTTPS on port 443, unless the URL or \
`--port` says otherwise.

Returned certificates must be mistrusted, and be carefully \
interpreted under a policy and trust model.
",
    subcommand_required = true,
    arg_required_else_help = true,
    disable_colored_help = true,
    disable_help_subcommand = true,
)]
pub struct HkpCommand {
    #[clap(
        long = "config",
        value_name = "FILE",
        env = CONFIG_ENV,
        global = true,
        help_heading = GLOBAL_OPTIONS_HEADER,
        help = "Read the configuration from FILE",
        long_help = format!("\
Read the configuration from FILE.

By default, the configuration is read from `hkp/config.toml` in the \
user's configuration directory.  If the file does not exist, the \
built-in defaults are used.  Use `hkp config template` to get a \
template.  This can also be set using the `{}` environment variable.",
                            CONFIG_ENV),
    )]
    pub config_file: Option<PathBuf>,

    #[clap(
        short = 's',
        long = "server",
        value_name = "URI",
        default_value = DEFAULT_KEYSERVER,
        global = true,
        help_heading = GLOBAL_OPTIONS_HEADER,
        help = "Set the keyserver to use",
        long_help = "\
Set the keyserver to use.

The URI must use one of the schemes `hkp`, `hkps`, `http`, or `https`.  \
If not given, the keyserver from the configuration file is used, \
or the default.",
    )]
    pub server: String,

    /// Workaround for https://github.com/clap-rs/clap/issues/3846
    #[clap(skip)]
    pub server_source: Option<ValueSource>,

    #[clap(
        short = 'p',
        long = "port",
        value_name = "PORT",
        global = true,
        help_heading = GLOBAL_OPTIONS_HEADER,
        help = "Connect to PORT instead of the keyserver's default port",
    )]
    pub port: Option<u16>,

    #[clap(
        long = "option",
        value_name = "OPTION",
        global = true,
        help_heading = GLOBAL_OPTIONS_HEADER,
        help = "Send the HKP option OPTION (can be given multiple times)",
        long_help = "\
Send the HKP option OPTION.  Can be given multiple times.

The machine readable option `mr` is always sent.  Only `nm` (no \
modification) and options starting with `x-` are passed to the \
server, all others are silently dropped.  If not given, the options \
from the configuration file are used.",
    )]
    pub options: Vec<String>,

    /// Workaround for https://github.com/clap-rs/clap/issues/3846
    #[clap(skip)]
    pub options_source: Option<ValueSource>,

    #[clap(
        long = "output-format",
        value_name = "FORMAT",
        value_enum,
        default_value_t = output::OutputFormat::HumanReadable,
        global = true,
        help_heading = GLOBAL_OPTIONS_HEADER,
        help = "Produce output in FORMAT, if possible",
    )]
    pub output_format: output::OutputFormat,

    /// Workaround for https://github.com/clap-rs/clap/issues/3846
    #[clap(skip)]
    pub output_format_source: Option<ValueSource>,

    #[clap(
        short = 'f',
        long = "force",
        global = true,
        help_heading = GLOBAL_OPTIONS_HEADER,
        help = "Overwrite existing files",
    )]
    pub force: bool,

    #[clap(
        short = 'v',
        long,
        global = true,
        help_heading = GLOBAL_OPTIONS_HEADER,
        help = "Be more verbose.",
    )]
    pub verbose: bool,

    #[clap(
        short = 'q',
        long = "quiet",
        global = true,
        help_heading = GLOBAL_OPTIONS_HEADER,
        help = "Be more quiet.",
        conflicts_with = "verbose",
    )]
    pub quiet: bool,

    #[clap(subcommand)]
    pub subcommand: Subcommands,
}

#[derive(Debug, Subcommand)]
pub enum Subcommands {
    Get(keyserver::GetCommand),
    Search(keyserver::SearchCommand),
    Send(keyserver::SendCommand),
    Config(config::Command),
}
