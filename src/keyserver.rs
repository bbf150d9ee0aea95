//! Talking to keyservers.
//!
//! [`KeyServer`] sends the requests built by [`RequestBuilder`] using
//! a [`Transport`], and interprets the answers.  A keyserver that
//! answers with an error, or that cannot be reached, is not a failure
//! of a lookup: [`KeyServer::retrieve`] and [`KeyServer::search`]
//! return `None` in that case.

use std::future::Future;
use std::time::Duration;

use url::Url;

use crate::{
    Endpoint,
    Error,
    KeyRecord,
    Request,
    RequestBuilder,
    Result,
    SearchQuery,
    index,
    request::Method,
};

/// Controls tracing in this module.
const TRACE: bool = false;

/// The user agent sent with every request.
pub const USER_AGENT: &str = concat!("hkp/", env!("CARGO_PKG_VERSION"));

/// How long to wait for a connection to be established.
pub const CONNECT_TIMEOUT: Duration = Duration::new(5, 0);

/// How long to wait for a request to complete.
pub const REQUEST_TIMEOUT: Duration = Duration::new(5, 0);

/// The outcome of an HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// The HTTP status code.
    pub status: u16,
    /// The decoded response body.
    pub body: String,
}

impl Reply {
    /// Returns whether the status indicates success.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs HTTP exchanges.
///
/// Implementations fail with [`Error::TransportUnavailable`] if no
/// reply could be obtained.  Any reply, whatever its status, is
/// returned.
pub trait Transport {
    /// Sends a `GET` request.
    fn get(&self, url: Url)
           -> impl Future<Output = Result<Reply>> + Send;

    /// Sends a `POST` request with a form-encoded body.
    fn post(&self, url: Url, body: String)
            -> impl Future<Output = Result<Reply>> + Send;
}

/// Converts client errors.
fn unavailable(e: reqwest::Error) -> Error {
    Error::TransportUnavailable(e.to_string())
}

/// A [`Transport`] using reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Returns a transport with the default timeouts.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(unavailable)?;
        Ok(Self::with_client(client))
    }

    /// Returns a transport using the given client.
    pub fn with_client(client: reqwest::Client) -> Self {
        HttpTransport { client }
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: Url) -> Result<Reply> {
        let res = self.client.get(url).send().await.map_err(unavailable)?;
        let status = res.status().as_u16();
        let body = res.text().await.map_err(unavailable)?;
        Ok(Reply { status, body })
    }

    async fn post(&self, url: Url, body: String) -> Result<Reply> {
        let length = body.len();
        let res = self.client.post(url)
            .header("content-type", "application/x-www-form-urlencoded")
            .header("content-length", length.to_string())
            .body(body).send().await.map_err(unavailable)?;
        let status = res.status().as_u16();
        let body = res.text().await.map_err(unavailable)?;
        Ok(Reply { status, body })
    }
}

/// For accessing keyservers using HKP.
///
/// # Examples
///
/// ```no_run
/// # async fn f() -> hkp::Result<()> {
/// use hkp::{KeyServer, SearchQuery};
/// use hkp::options::NO_OPTIONS;
///
/// let ks = KeyServer::new("hkps://keys.openpgp.org")?;
/// if let Some(key) = ks.retrieve("0x2D230C5F", NO_OPTIONS).await? {
///     println!("{}", key);
/// }
/// if let Some(keys) = ks.search(&SearchQuery::new("ftpmaster@debian.org")).await? {
///     println!("{} keys", keys.len());
/// }
/// # Ok(()) }
/// ```
#[derive(Debug, Clone)]
pub struct KeyServer<T: Transport = HttpTransport> {
    builder: RequestBuilder,
    transport: T,
}

impl KeyServer {
    /// Returns a handle for the given URL.
    pub fn new(url: &str) -> Result<Self> {
        Ok(Self::with_transport(Endpoint::new(url)?, HttpTransport::new()?))
    }
}

impl<T: Transport> KeyServer<T> {
    /// Returns a handle for the given endpoint using a custom
    /// transport.
    pub fn with_transport(endpoint: Endpoint, transport: T) -> Self {
        KeyServer {
            builder: RequestBuilder::new(endpoint),
            transport,
        }
    }

    /// Returns the keyserver's location.
    pub fn endpoint(&self) -> &Endpoint {
        self.builder.endpoint()
    }

    /// Returns the request builder.
    pub fn requests(&self) -> &RequestBuilder {
        &self.builder
    }

    /// Sends the request, returning the body of a successful reply.
    async fn lookup(&self, request: Request) -> Option<String> {
        tracer!(TRACE, "KeyServer::lookup");

        let url = request.url();
        t!("GET {}", url);
        match self.transport.get(url).await {
            Ok(reply) if reply.is_success() => Some(reply.body),
            Ok(reply) => {
                t!("Server returned status {}", reply.status);
                None
            },
            Err(e) => {
                t!("{}", e);
                None
            },
        }
    }

    /// Retrieves the key with the given id.
    ///
    /// Returns the server's answer, usually an ASCII armored
    /// certificate, with trailing whitespace removed.  If the server
    /// doesn't know the key, or cannot be reached, returns `None`.
    ///
    /// # Warning
    ///
    /// Returned certificates must be mistrusted, and be carefully
    /// interpreted under a policy and trust model.
    pub async fn retrieve<'a, K, I, S>(&self, key_id: K, options: I)
                                       -> Result<Option<String>>
    where
        K: Into<Option<&'a str>>,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let request = self.builder.retrieve(key_id, options)?;
        Ok(self.lookup(request).await
           .map(|body| body.trim_end().to_string()))
    }

    /// Searches for keys.
    ///
    /// If the server doesn't find anything, or cannot be reached,
    /// returns `None`.  A reply that is not a well-formed index is an
    /// error.
    pub async fn search(&self, query: &SearchQuery)
                        -> Result<Option<Vec<KeyRecord>>>
    {
        let request = self.builder.search(query)?;
        match self.lookup(request).await {
            Some(body) => Ok(Some(index::parse(&body)?)),
            None => Ok(None),
        }
    }

    /// Sends the given key material to the server.
    ///
    /// Returns the HTTP status code of the server's reply, whether it
    /// indicates success or not.
    pub async fn submit<'a, K, I, S>(&self, keytext: K, options: I)
                                     -> Result<u16>
    where
        K: Into<Option<&'a str>>,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tracer!(TRACE, "KeyServer::submit");

        let request = self.builder.submit(keytext, options)?;
        debug_assert_eq!(request.method(), Method::Post);

        let url = request.url();
        let body = request.body().unwrap_or_default();
        t!("POST {} ({} bytes)", url, body.len());
        let reply = self.transport.post(url, body).await?;
        t!("Server returned status {}", reply.status);
        Ok(reply.status)
    }
}
