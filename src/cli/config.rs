//! Command-line parser for `hkp config`.

use clap::{Args, Parser, Subcommand};

use super::types::ClapData;
use super::types::FileOrStdout;

#[derive(Debug, Parser)]
#[clap(
    name = "config",
    about = "Get configuration options",
    long_about = "\
Get configuration options

This subcommand can be used to inspect the configuration \
file, and to create a template that can be edited to your liking.
",
    subcommand_required = true,
    arg_required_else_help = true,
)]
pub struct Command {
    #[clap(subcommand)]
    pub subcommand: Subcommands,
}

#[derive(Debug, Subcommand)]
pub enum Subcommands {
    Get(GetCommand),
    Template(TemplateCommand),
}

#[derive(Debug, Args)]
#[clap(
    about = "Show the effective settings",
    long_about = "\
Show the effective settings

Prints the settings that are in effect after combining the command \
line, the configuration file, and the defaults.
",
)]
pub struct GetCommand {
}

#[derive(Debug, Args)]
#[clap(
    about = "Write a template configuration file",
    long_about = "\
Write a template configuration file

Writes a template containing the default values to stdout or the file \
given using `--output`.  All the options are commented out.
",
    after_help =
"EXAMPLES:

# Write a template configuration
$ hkp config template --output config.toml
",
)]
pub struct TemplateCommand {
    #[clap(
        help = FileOrStdout::HELP,
        long,
        short,
        value_name = FileOrStdout::VALUE_NAME,
        default_value_t = FileOrStdout::default(),
    )]
    pub output: FileOrStdout,
}
