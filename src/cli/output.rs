use clap::ValueEnum;

/// What output format to prefer, when there's an option?
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Output that is meant to be read by humans, instead of programs.
    ///
    /// This type of output is not meant to be parsed by programs.
    #[default]
    HumanReadable,

    /// Output as JSON.
    Json,
}
