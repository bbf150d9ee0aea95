//! Accessing OpenPGP keyservers using HKP.
//!
//! This crate implements the client side of the [OpenPGP HTTP
//! Keyserver Protocol].  It validates key ids, builds the requests for
//! retrieving, searching, and submitting keys, and parses the
//! machine-readable index returned by searches.  [`KeyServer`] ties
//! these together with an HTTP client.
//!
//! [OpenPGP HTTP Keyserver Protocol]: https://tools.ietf.org/html/draft-shaw-openpgp-hkp-00
//!
//! # Examples
//!
//! Building a request without sending it:
//!
//! ```
//! # fn main() -> hkp::Result<()> {
//! use hkp::{Endpoint, RequestBuilder};
//!
//! let builder = RequestBuilder::new(Endpoint::new("hkp://keys.example.org")?);
//! let request = builder.retrieve("2D230C5F", ["nm"])?;
//! assert_eq!(request.params().get("search"), Some("0x2D230C5F"));
//! assert_eq!(request.params().get("options"), Some("mr,nm"));
//! # Ok(()) }
//! ```
//!
//! Parsing an index:
//!
//! ```
//! # fn main() -> hkp::Result<()> {
//! let keys = hkp::index::parse("info:1:1\npub:AABBCCDD:17:2048:1136214245::\n")?;
//! assert_eq!(keys[0].primary_key().algorithm_name(), "DSA");
//! assert!(keys[0].identities().is_empty());
//! # Ok(()) }
//! ```

#![doc(html_favicon_url = "https://docs.sequoia-pgp.org/favicon.png")]
#![doc(html_logo_url = "https://docs.sequoia-pgp.org/logo.svg")]

// Re-exports of crates that we use in our API.
pub use url;
pub use chrono;

#[macro_use] mod log;

pub mod algorithm;
pub mod endpoint;
pub use endpoint::{
    DEFAULT_KEYSERVER,
    Endpoint,
};
mod error;
pub use error::{
    Error,
    Result,
};
pub mod index;
pub use index::{
    IdentityRecord,
    KeyRecord,
    PrimaryKey,
};
pub mod keyid;
pub use keyid::KeyId;
pub mod keyserver;
pub use keyserver::{
    HttpTransport,
    KeyServer,
    Reply,
    Transport,
};
pub mod options;
pub mod request;
pub use request::{
    Request,
    RequestBuilder,
    RequestParameters,
    SearchQuery,
};
