//! Common types for arguments of hkp.

use std::fmt::Display;
use std::fmt::Formatter;
use std::fs::OpenOptions;
use std::io::Read;
use std::io::Write;
use std::io::stdin;
use std::io::stdout;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use anyhow::Result;

/// A trait to provide const &str for clap annotations for custom structs
pub trait ClapData {
    /// The clap value name
    const VALUE_NAME: &'static str;
    /// The clap help text
    const HELP: &'static str;
}

/// A type wrapping an optional PathBuf to use as stdin or file input
///
/// When creating `FileOrStdin` from `&str`, providing a `"-"` is interpreted
/// as `None`, i.e. read from stdin. Providing other strings is interpreted as
/// `Some(PathBuf)`, i.e. read from file.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FileOrStdin(Option<PathBuf>);

impl ClapData for FileOrStdin {
    const VALUE_NAME: &'static str = "FILE";
    const HELP: &'static str = "Reads from FILE or stdin if omitted";
}

impl FileOrStdin {
    /// Return a reference to the inner type
    pub fn inner(&self) -> Option<&PathBuf> {
        self.0.as_ref()
    }

    /// Reads the whole file, or stdin, into a string.
    pub fn read_to_string(&self) -> Result<String> {
        let mut s = String::new();
        if let Some(path) = self.inner() {
            std::fs::File::open(path)
                .with_context(|| format!("Failed to open {}", self))?
                .read_to_string(&mut s)
                .with_context(|| format!("Failed to read {}", self))?;
        } else {
            stdin().read_to_string(&mut s)
                .context("Failed to read from stdin")?;
        }
        Ok(s)
    }
}

impl FromStr for FileOrStdin {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if "-" == s {
            Ok(FileOrStdin(None))
        } else {
            Ok(FileOrStdin(Some(PathBuf::from(s))))
        }
    }
}

impl Display for FileOrStdin {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match &self.0 {
            None => write!(f, "-"),
            Some(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A type wrapping an optional PathBuf to use as stdout or file output
///
/// When creating `FileOrStdout` from `&str`, providing a `"-"` is interpreted
/// as `None`, i.e. output to stdout. Providing other strings is interpreted as
/// `Some(PathBuf)`, i.e. output to file.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FileOrStdout(Option<PathBuf>);

impl ClapData for FileOrStdout {
    const VALUE_NAME: &'static str = "FILE";
    const HELP: &'static str = "Writes to FILE or stdout if omitted";
}

impl FileOrStdout {
    pub fn new(path: Option<PathBuf>) -> Self {
        FileOrStdout(path)
    }

    /// Return a reference to the optional PathBuf
    pub fn path(&self) -> Option<&PathBuf> {
        self.0.as_ref()
    }

    /// Opens the file (or stdout) for writing.
    ///
    /// An existing file is only overwritten if `force` is set.
    pub fn create(&self, force: bool) -> Result<Box<dyn Write + Sync + Send>> {
        if let Some(path) = self.path() {
            if !path.exists() || force {
                Ok(Box::new(
                    OpenOptions::new()
                        .write(true)
                        .truncate(true)
                        .create(true)
                        .open(path)
                        .context("Failed to create output file")?,
                ))
            } else {
                Err(anyhow::anyhow!(
                    "File {} exists, use \"hkp --force ...\" to overwrite",
                    path.display(),
                ))
            }
        } else {
            Ok(Box::new(stdout()))
        }
    }
}

impl FromStr for FileOrStdout {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if "-" == s {
            Ok(FileOrStdout::default())
        } else {
            Ok(FileOrStdout::new(Some(PathBuf::from(s))))
        }
    }
}

impl Display for FileOrStdout {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.path() {
            Some(path) => write!(f, "{}", path.display()),
            None => write!(f, "-"),
        }
    }
}

/// Parses a `NAME=VALUE` pair.
pub fn parse_variable(s: &str) -> Result<(String, String), String> {
    let (name, value) = s.split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {:?}", s))?;
    if name.is_empty() {
        return Err(format!("empty name in {:?}", s));
    }
    Ok((name.to_string(), value.to_string()))
}
