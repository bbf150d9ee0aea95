//! The `options` variable.
//!
//! See [section 3.2.1 of the HKP draft].  We always request
//! machine-readable output, because that is the only format
//! [`crate::index`] understands.
//!
//! [section 3.2.1 of the HKP draft]: https://tools.ietf.org/html/draft-shaw-openpgp-hkp-00#section-3.2.1

/// Requests machine-readable output.
pub const MACHINE_READABLE: &str = "mr";

/// Asks the keyserver not to modify submitted keys.
pub const NO_MODIFY: &str = "nm";

/// Prefix of site-specific extensions.
pub const EXTENSION_PREFIX: &str = "x-";

/// No options besides the mandatory ones.
pub const NO_OPTIONS: [&str; 0] = [];

/// Returns whether the given option may be sent to a keyserver.
fn is_allowed(option: &str) -> bool {
    option == NO_MODIFY || option.starts_with(EXTENSION_PREFIX)
}

/// Encodes the given options into the comma-separated wire form.
///
/// `mr` comes first and is always present.  The remaining options
/// keep their order of first appearance; options other than `nm` and
/// `x-*` are dropped.
pub fn encode<I, S>(options: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut encoded: Vec<String> = vec![MACHINE_READABLE.into()];

    for option in options {
        let option = option.as_ref();
        if is_allowed(option) && ! encoded.iter().any(|o| o == option) {
            encoded.push(option.into());
        }
    }

    encoded.join(",")
}
