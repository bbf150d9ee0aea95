//! Building keyserver requests.
//!
//! A [`RequestBuilder`] turns the three HKP operations into
//! [`Request`]s that can be handed to any HTTP client.  It never
//! contacts the network itself.

use std::collections::BTreeMap;

use percent_encoding::{percent_encode, AsciiSet, CONTROLS};
use url::Url;

use crate::{
    Endpoint,
    Error,
    Result,
    keyid,
    options,
};

/// Controls tracing in this module.
const TRACE: bool = false;

/// <https://url.spec.whatwg.org/#fragment-percent-encode-set>
const KEYSERVER_ENCODE_SET: &AsciiSet =
    // Formerly DEFAULT_ENCODE_SET
    &CONTROLS.add(b' ').add(b'"').add(b'#').add(b'<').add(b'>').add(b'`')
    .add(b'?').add(b'{').add(b'}')
    // The SKS keyserver as of version 1.1.6 is a bit picky with
    // respect to the encoding.
    .add(b'-').add(b'+').add(b'/')
    // Delimiters of the form encoding itself.
    .add(b'%').add(b'&').add(b'=');

/// The operation that retrieves keys.
pub const OP_GET: &str = "get";

/// The operation that searches for keys.
pub const OP_INDEX: &str = "index";

/// Parameter names.
pub const PARAM_OP: &str = "op";
pub const PARAM_SEARCH: &str = "search";
pub const PARAM_OPTIONS: &str = "options";
pub const PARAM_EXACT: &str = "exact";
pub const PARAM_KEYTEXT: &str = "keytext";

/// Name-value pairs of a request.
///
/// Iteration is ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParameters(BTreeMap<String, String>);

impl RequestParameters {
    /// Returns an empty set of parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter, replacing any previous value.
    pub fn insert<N, V>(&mut self, name: N, value: V)
    where
        N: Into<String>,
        V: Into<String>,
    {
        self.0.insert(name.into(), value.into());
    }

    /// Returns the value of the given parameter.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Returns the number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the parameters.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Returns the `application/x-www-form-urlencoded` form.
    pub fn to_form_string(&self) -> String {
        self.iter()
            .map(|(n, v)| format!(
                "{}={}",
                percent_encode(n.as_bytes(), KEYSERVER_ENCODE_SET),
                percent_encode(v.as_bytes(), KEYSERVER_ENCODE_SET)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// How a request is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Parameters go into the query string.
    Get,
    /// Parameters go into the request body.
    Post,
}

/// A request ready to be sent to a keyserver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    target: Url,
    params: RequestParameters,
}

impl Request {
    /// Returns how the request is sent.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Returns the parameters.
    pub fn params(&self) -> &RequestParameters {
        &self.params
    }

    /// Returns the URL to send the request to.
    ///
    /// For `GET` requests, this includes the encoded parameters.
    pub fn url(&self) -> Url {
        let mut url = self.target.clone();
        if self.method == Method::Get {
            url.set_query(Some(&self.params.to_form_string()));
        }
        url
    }

    /// Returns the encoded request body, if any.
    pub fn body(&self) -> Option<String> {
        match self.method {
            Method::Get => None,
            Method::Post => Some(self.params.to_form_string()),
        }
    }
}

/// Parameters of a search.
///
/// # Examples
///
/// ```
/// use hkp::SearchQuery;
///
/// let query = SearchQuery::new("alice@example.org")
///     .exact("on")
///     .option("x-foo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    query: String,
    operation: String,
    exact: String,
    options: Vec<String>,
    variables: Vec<(String, String)>,
}

impl SearchQuery {
    /// Searches for `query` using the `index` operation.
    pub fn new<Q: Into<String>>(query: Q) -> Self {
        SearchQuery {
            query: query.into(),
            operation: OP_INDEX.into(),
            exact: "off".into(),
            options: Vec::new(),
            variables: Vec::new(),
        }
    }

    /// Uses the given operation instead of `index`.
    ///
    /// Only `index` and `x-` extensions are allowed, see
    /// [`RequestBuilder::search`].
    pub fn operation<O: Into<String>>(mut self, operation: O) -> Self {
        self.operation = operation.into();
        self
    }

    /// Sets the `exact` variable.
    ///
    /// Values other than `on` and `off` are sent as `off`.
    pub fn exact<E: Into<String>>(mut self, exact: E) -> Self {
        self.exact = exact.into();
        self
    }

    /// Adds an option.
    pub fn option<O: Into<String>>(mut self, option: O) -> Self {
        self.options.push(option.into());
        self
    }

    /// Adds options.
    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.extend(options.into_iter().map(Into::into));
        self
    }

    /// Adds a site-specific `x-` variable.
    ///
    /// Variables with other names are not sent.
    pub fn variable<N, V>(mut self, name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        self.variables.push((name.into(), value.into()));
        self
    }

    /// Returns the search string.
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Builds requests for a keyserver.
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    endpoint: Endpoint,
}

impl RequestBuilder {
    /// Returns a builder for requests to the given keyserver.
    pub fn new(endpoint: Endpoint) -> Self {
        RequestBuilder { endpoint }
    }

    /// Returns the keyserver.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Builds a request retrieving the key with the given id.
    ///
    /// Retrieval by free text is not supported, because queries may
    /// be ambiguous.
    pub fn retrieve<'a, K, I, S>(&self, key_id: K, options: I)
                                 -> Result<Request>
    where
        K: Into<Option<&'a str>>,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let key_id = keyid::normalize(key_id)?;

        let mut params = RequestParameters::new();
        params.insert(PARAM_OP, OP_GET);
        params.insert(PARAM_SEARCH, key_id);
        params.insert(PARAM_OPTIONS, options::encode(options));

        Ok(Request {
            method: Method::Get,
            target: self.endpoint.lookup_url(),
            params,
        })
    }

    /// Builds a search request.
    ///
    /// The operation must be `index` or start with `x-`.  The query
    /// is sent verbatim.
    pub fn search(&self, query: &SearchQuery) -> Result<Request> {
        tracer!(TRACE, "RequestBuilder::search");

        let op = &query.operation;
        if op != OP_INDEX && ! op.starts_with(options::EXTENSION_PREFIX) {
            return Err(Error::InvalidOperation(op.clone()));
        }

        let exact = match query.exact.as_str() {
            "on" => "on",
            _ => "off",
        };

        let mut params = RequestParameters::new();
        params.insert(PARAM_OP, op.as_str());
        params.insert(PARAM_SEARCH, query.query.as_str());
        params.insert(PARAM_OPTIONS, options::encode(&query.options));
        params.insert(PARAM_EXACT, exact);

        for (name, value) in &query.variables {
            if name.starts_with(options::EXTENSION_PREFIX) {
                params.insert(name.as_str(), value.as_str());
            } else {
                t!("Ignoring variable {:?}", name);
            }
        }

        Ok(Request {
            method: Method::Get,
            target: self.endpoint.lookup_url(),
            params,
        })
    }

    /// Builds a request submitting the given key material.
    ///
    /// The key material is sent as is, usually one or more ASCII
    /// armored certificates.
    pub fn submit<'a, K, I, S>(&self, keytext: K, options: I)
                               -> Result<Request>
    where
        K: Into<Option<&'a str>>,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keytext = keytext.into().ok_or(Error::NoKeyMaterial)?;

        let mut params = RequestParameters::new();
        params.insert(PARAM_KEYTEXT, keytext);
        params.insert(PARAM_OPTIONS, options::encode(options));

        Ok(Request {
            method: Method::Post,
            target: self.endpoint.submit_url(),
            params,
        })
    }
}
