//! Safely displays strings from untrusted sources.

use std::fmt;

/// Safely displays values.
///
/// User IDs and key ids returned by keyservers are chosen by whoever
/// uploaded the key or runs the server.  Strings containing control
/// characters are displayed escaped.
pub struct Safe<T>(pub T);

impl fmt::Display for Safe<&str> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // XXX: Better detect dodgy strings and better sanitize them.
        // For now, this is better than the status quo, and it
        // encodes intent.
        if self.0.chars().any(char::is_control) {
            write!(f, "{:?}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl fmt::Display for Safe<&String> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Safe(self.0.as_str()).fmt(f)
    }
}
