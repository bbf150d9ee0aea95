//! Configuration model and file parsing.

use std::{
    collections::HashSet,
    fs,
    io,
    path::{Path, PathBuf},
};

use aho_corasick::AhoCorasick;
use anyhow::{Context, Result};
use clap::{ValueEnum, parser::ValueSource};

use toml_edit::{
    DocumentMut,
    Item,
    Value,
};

use crate::cli::{self, output::OutputFormat};

/// Represents configuration at runtime.
///
/// This struct is manipulated when parsing the configuration file.
/// It is available as `App::config`, with suitable accessors that
/// handle the precedence of the various sources.
#[derive(Debug, Default)]
pub struct Config {
    keyserver: Option<String>,
    port: Option<u16>,
    options: Option<Vec<String>>,
    output_format: Option<OutputFormat>,
}

/// Returns whether the user explicitly set the argument.
fn given(source: Option<ValueSource>) -> bool {
    matches!(source,
             Some(ValueSource::CommandLine) | Some(ValueSource::EnvVariable))
}

/// Returns whether the keyserver URL carries an explicit port.
fn names_port(server: &str) -> bool {
    hkp::url::Url::parse(server).ok()
        .and_then(|url| url.port())
        .is_some()
}

impl Config {
    /// Returns the keyserver to use.
    ///
    /// Handles the precedence of the various sources:
    ///
    /// - If the flag is given, use the given value.
    /// - If the command line flag is not given, then
    ///   - use the value from the configuration file (if any),
    ///   - or use the default value.
    pub fn keyserver<'s>(&'s self, cli: &'s str, source: Option<ValueSource>)
                         -> &'s str
    {
        if given(source) {
            cli
        } else {
            self.keyserver.as_deref().unwrap_or(cli)
        }
    }

    /// Returns the port override, if any.
    ///
    /// The flag takes precedence over the configuration file.  The
    /// configuration file's port is not applied to a keyserver given
    /// on the command line whose URL names a port.  If no override
    /// applies, the keyserver's port is used.
    pub fn port(&self, cli: Option<u16>,
                server: &str, server_source: Option<ValueSource>)
                -> Option<u16>
    {
        if cli.is_some() {
            return cli;
        }

        if given(server_source) && names_port(server) {
            None
        } else {
            self.port
        }
    }

    /// Returns the HKP options to send.
    ///
    /// Options given on the command line replace the ones from the
    /// configuration file.
    pub fn options<'s>(&'s self, cli: &'s [String],
                       source: Option<ValueSource>)
                       -> &'s [String]
    {
        if given(source) {
            cli
        } else {
            self.options.as_deref().unwrap_or(cli)
        }
    }

    /// Returns the output format.
    ///
    /// Handles the precedence of the various sources like
    /// [`Config::keyserver`].
    pub fn output_format(&self, cli: OutputFormat,
                         source: Option<ValueSource>)
                         -> OutputFormat
    {
        if given(source) {
            cli
        } else {
            self.output_format.unwrap_or(cli)
        }
    }
}

/// Holds the document tree of the configuration file.
#[derive(Debug, Default)]
pub struct ConfigFile {
    doc: DocumentMut,
}

impl ConfigFile {
    /// A template for the configuration containing the default
    /// values.
    const TEMPLATE: &'static str = "\
# Configuration template for hkp <HKP-VERSION>
<HKP-CONFIG-PATH-HINT>

[network]
#keyserver = <DEFAULT-KEYSERVER>

# Connect to this port instead of the keyserver's default port, which
# is 11371 for hkp:// and 443 for hkps:// URLs.
#port = 11371

# Additional HKP options.  Only \"nm\" and options starting with \"x-\"
# are sent to the server.
#options = <DEFAULT-OPTIONS>

[output]
#format = <DEFAULT-OUTPUT-FORMAT>
";

    /// Patterns to match on in `Self::TEMPLATE` to be replaced with
    /// the default values.
    const TEMPLATE_PATTERNS: &'static [&'static str] = &[
        "<HKP-VERSION>",
        "<HKP-CONFIG-PATH-HINT>",
        "<DEFAULT-KEYSERVER>",
        "<DEFAULT-OPTIONS>",
        "<DEFAULT-OUTPUT-FORMAT>",
    ];

    /// Returns a configuration template with the defaults.
    fn config_template(path: Option<&Path>) -> Result<String> {
        let ac = AhoCorasick::new(Self::TEMPLATE_PATTERNS)?;

        let format = OutputFormat::default().to_possible_value()
            .map(|v| v.get_name().to_string())
            .unwrap_or_default();

        Ok(ac.replace_all(Self::TEMPLATE, &[
            &env!("CARGO_PKG_VERSION").to_string(),
            &if let Some(path) = path {
                format!(
                    "\n\
                     # To use it, edit it to your liking and write it to\n\
                     # {}",
                    &path.display())
            } else {
                "".into()
            },
            &format!("{:?}", cli::DEFAULT_KEYSERVER),
            &format!("{:?}", ["nm"]),
            &format!("{:?}", format),
        ]))
    }

    /// Returns the default configuration in template form.
    ///
    /// All the configuration options with their defaults are
    /// commented out.
    pub fn default_template(path: Option<&Path>) -> Result<Self> {
        let template = Self::config_template(path)?;
        let doc: DocumentMut = template.parse()
            .context("Parsing default configuration failed")?;
        Ok(Self {
            doc,
        })
    }

    /// Returns the path of the config file.
    ///
    /// This is the given path, if any, or `hkp/config.toml` in the
    /// user's configuration directory.
    pub fn file_name(explicit: Option<&Path>) -> Option<PathBuf> {
        explicit.map(Path::to_path_buf)
            .or_else(|| dirs::config_dir()
                     .map(|d| d.join("hkp").join("config.toml")))
    }

    /// Reads and validates the configuration file.
    ///
    /// If the file does not exist, the defaults are used.
    pub fn read(&mut self, path: Option<&Path>) -> Result<Config> {
        let mut config = Config::default();

        let raw = if let Some(path) = path {
            match fs::read_to_string(path) {
                Ok(r) => r,
                Err(e) if e.kind() == io::ErrorKind::NotFound =>
                    Self::config_template(Some(path))?,
                Err(e) => return Err(anyhow::Error::from(e).context(
                    format!("Reading configuration file {} failed",
                            path.display()))),
            }
        } else {
            Self::config_template(None)?
        };

        let name = path.map(|p| p.display().to_string())
            .unwrap_or_else(|| "<default>".into());
        let doc: DocumentMut = raw.parse()
            .with_context(|| format!("Parsing configuration file {} failed",
                                     name))?;

        apply_schema(&mut Some(&mut config), None, doc.iter(),
                     TOP_LEVEL_SCHEMA)
            .with_context(|| format!("Parsing configuration file {} failed",
                                     name))?;
        self.doc = doc;

        Ok(config)
    }

    /// Writes the configuration to the given writer.
    pub fn dump(&self, sink: &mut dyn io::Write) -> Result<()> {
        write!(sink, "{}", self.doc)?;
        Ok(())
    }
}

/// Validates a configuration section using a schema, and optionally
/// applies changes to the configuration.
///
/// Returns an error if a key is unknown.
///
/// known_keys better be lowercase.
fn apply_schema<'toml>(config: &mut Option<&mut Config>,
                       path: Option<&str>,
                       section: toml_edit::Iter<'toml>,
                       schema: Schema) -> Result<()> {
    let section = section.collect::<Vec<_>>();
    let known_keys: Vec<_> =
        schema.iter().map(|(key, _)| *key).collect();

    // Schema keys better be lowercase.
    debug_assert!(known_keys.iter().all(|&s| &s.to_lowercase() == s),
                  "keys in schema must be lowercase");

    // Schema keys better be sorted.
    debug_assert!(known_keys.windows(2).all(|v| v[0] <= v[1]),
                  "keys in schema must be sorted");

    let prefix = if let Some(path) = path {
        format!("{}.", path)
    } else {
        "".to_string()
    };

    let keys: HashSet<&str> = section
        .iter().map(|(key, _value)| *key)
        .collect();

    // The set of allowed keys are the known keys, plus
    // "ignore_invalid", and the value of "ignore_invalid".
    let mut allowed_keys: Vec<&str> = known_keys.to_vec();
    if let Some(ignore) = section.iter()
        .find_map(|(k, v)| (*k == "ignore_invalid").then_some(*v))
    {
        allowed_keys.push("ignore_invalid");
        match ignore {
            Item::Value(Value::String(k)) =>
                allowed_keys.push(k.value().as_str()),
            Item::Value(Value::Array(ks)) => {
                for k in ks {
                    if let Value::String(k) = k {
                        allowed_keys.push(k.value().as_str());
                    } else {
                        Err(Error::ParseError(format!(
                            "'{}ignore_invalid' takes a string \
                             or an array of strings",
                            prefix)))?
                    }
                }
            }
            _ => {
                return Err(Error::ParseError(format!(
                    "Invalid value for '{}ignore_invalid': {}, \
                     expected a string or an array of strings",
                    prefix, ignore)).into());
            }
        }
    }

    // Now check if there are any unknown sections.
    let mut unknown_keys = keys
        .difference(&allowed_keys.into_iter().collect())
        .copied()
        .collect::<Vec<_>>();
    unknown_keys.sort_unstable();
    if ! unknown_keys.is_empty() {
        return Err(Error::ParseError(format!(
            "{} has unknown keys: {}, valid keys are: {}",
            path.unwrap_or("top-level section"),
            unknown_keys.join(", "),
            // We don't include the keys listed in ignore_invalid.
            known_keys.join(", "))).into());
    }

    // Now validate the values.
    for (key, value) in &section {
        if let Ok(i) = schema.binary_search_by_key(key, |(k, _)| k) {
            let apply = schema[i].1;
            (apply)(config, &format!("{}{}", prefix, key), value)
                .with_context(|| format!("Error validating {:?}", key))?;
        }
    }

    Ok(())
}

/// Errors used in this module.
///
/// Note: This enum cannot be exhaustively matched to allow future
/// extensions.
#[non_exhaustive]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Parse error
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Configuration item {0:?} is not a {1} but a {2}")]
    BadType(String, &'static str, &'static str),
}

impl Error {
    /// Returns an `Error::BadType` given an item.
    fn bad_item_type(path: &str, i: &Item, want_type: &'static str)
                     -> anyhow::Error
    {
        Error::BadType(path.into(), want_type, i.type_name()).into()
    }

    /// Returns an `Error::BadType` given a value.
    fn bad_value_type(path: &str, v: &Value, want_type: &'static str)
                      -> anyhow::Error
    {
        Error::BadType(path.into(), want_type, v.type_name()).into()
    }
}

/// A function that validates a node in the configuration tree with
/// the given path, and optionally makes changes to the configuration.
type Applicator = fn(&mut Option<&mut Config>, &str, &Item) -> Result<()>;

/// A [`Schema`] maps keys to [`Applicator`]s.
type Schema = &'static [(&'static str, Applicator)];

/// Schema for the toplevel.
const TOP_LEVEL_SCHEMA: Schema = &[
    ("network", apply_network),
    ("output", apply_output),
];

/// Schema for the `network` section.
const NETWORK_SCHEMA: Schema = &[
    ("keyserver", apply_network_keyserver),
    ("options", apply_network_options),
    ("port", apply_network_port),
];

/// Validates the `network` section.
fn apply_network(config: &mut Option<&mut Config>, path: &str, item: &Item)
                 -> Result<()>
{
    let section = item.as_table_like()
        .ok_or_else(|| Error::bad_item_type(path, item, "table"))?;
    apply_schema(config, Some(path), section.iter(), NETWORK_SCHEMA)?;
    Ok(())
}

/// Validates the `network.keyserver` value.
fn apply_network_keyserver(config: &mut Option<&mut Config>,
                           path: &str, item: &Item)
                           -> Result<()>
{
    let s = item.as_str()
        .ok_or_else(|| Error::bad_item_type(path, item, "string"))?;

    // Make sure we can talk to it.
    hkp::Endpoint::new(s)?;

    if let Some(config) = config {
        config.keyserver = Some(s.into());
    }

    Ok(())
}

/// Validates the `network.options` value.
fn apply_network_options(config: &mut Option<&mut Config>,
                         path: &str, item: &Item)
                         -> Result<()>
{
    let list = item.as_array()
        .ok_or_else(|| Error::bad_item_type(path, item, "array"))?;

    let mut options = Vec::new();
    for (i, option) in list.iter().enumerate() {
        let option = option.as_str()
            .ok_or_else(|| Error::bad_value_type(&format!("{}.{}", path, i),
                                                 option, "string"))?;
        options.push(option.to_string());
    }

    if let Some(config) = config {
        config.options = Some(options);
    }

    Ok(())
}

/// Validates the `network.port` value.
fn apply_network_port(config: &mut Option<&mut Config>,
                      path: &str, item: &Item)
                      -> Result<()>
{
    let port = item.as_integer()
        .ok_or_else(|| Error::bad_item_type(path, item, "integer"))?;
    let port = u16::try_from(port).ok().filter(|p| *p > 0)
        .ok_or_else(|| anyhow::anyhow!("invalid port: {}", port))?;

    if let Some(config) = config {
        config.port = Some(port);
    }

    Ok(())
}

/// Schema for the `output` section.
const OUTPUT_SCHEMA: Schema = &[
    ("format", apply_output_format),
];

/// Validates the `output` section.
fn apply_output(config: &mut Option<&mut Config>, path: &str, item: &Item)
                -> Result<()>
{
    let section = item.as_table_like()
        .ok_or_else(|| Error::bad_item_type(path, item, "table"))?;
    apply_schema(config, Some(path), section.iter(), OUTPUT_SCHEMA)?;
    Ok(())
}

/// Validates the `output.format` value.
fn apply_output_format(config: &mut Option<&mut Config>,
                       path: &str, item: &Item)
                       -> Result<()>
{
    let s = item.as_str()
        .ok_or_else(|| Error::bad_item_type(path, item, "string"))?;
    let v = OutputFormat::from_str(s, true)
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    if let Some(config) = config {
        config.output_format = Some(v);
    }

    Ok(())
}
