//! Keyserver locations.

use std::fmt;

use url::Url;

use crate::{Error, Result};

/// The keyserver used if none is given.
pub const DEFAULT_KEYSERVER: &str = "hkps://keys.openpgp.org";

/// The port HKP servers listen on.
pub const DEFAULT_HKP_PORT: u16 = 11371;

/// The port HKPS servers listen on.
pub const DEFAULT_HKPS_PORT: u16 = 443;

/// Path of the lookup operations (`get`, `index`, ...).
pub const LOOKUP_PATH: &str = "/pks/lookup";

/// Path for submitting keys.
pub const SUBMIT_PATH: &str = "/pks/add";

/// Where to reach a keyserver.
///
/// `hkp://` URLs are contacted using HTTP, `hkps://` URLs using
/// HTTPS.  Plain `http://` and `https://` URLs are accepted as well.
/// If the URL doesn't name a port, HKP's port 11371 is used for
/// unencrypted connections and 443 for encrypted ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// The original URL given to the constructor.
    url: Url,
    /// The URL we use for the requests, without a path.
    request_url: Url,
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new(DEFAULT_KEYSERVER)
            .expect("the default keyserver URL is well-formed")
    }
}

impl Endpoint {
    /// Returns the endpoint for the given URL.
    pub fn new(url: &str) -> Result<Self> {
        let malformed = || Error::MalformedUrl(url.into());
        let parsed = Url::parse(url).map_err(|_| malformed())?;

        let (scheme, default_port) = match parsed.scheme() {
            "hkp" | "http" => ("http", DEFAULT_HKP_PORT),
            "hkps" | "https" => ("https", DEFAULT_HKPS_PORT),
            _ => return Err(malformed()),
        };
        let host = parsed.host_str()
            .filter(|h| ! h.is_empty())
            .ok_or_else(malformed)?;
        let port = parsed.port().unwrap_or(default_port);

        let request_url = format!("{}://{}:{}", scheme, host, port)
            .parse().map_err(|_| malformed())?;

        Ok(Endpoint { url: parsed, request_url })
    }

    /// Uses the given port instead of the one derived from the URL.
    pub fn with_port(mut self, port: u16) -> Self {
        // Setting a port only fails for URLs without a host, which
        // `new` rejects.
        let _ = self.request_url.set_port(Some(port));
        self
    }

    /// Returns the keyserver's URL as given.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the port requests are sent to.
    pub fn port(&self) -> u16 {
        self.request_url.port_or_known_default()
            .unwrap_or(DEFAULT_HKP_PORT)
    }

    /// Returns the URL of the lookup operations.
    pub fn lookup_url(&self) -> Url {
        self.join(LOOKUP_PATH)
    }

    /// Returns the URL keys are submitted to.
    pub fn submit_url(&self) -> Url {
        self.join(SUBMIT_PATH)
    }

    fn join(&self, path: &str) -> Url {
        let mut url = self.request_url.clone();
        url.set_path(path);
        url
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}
