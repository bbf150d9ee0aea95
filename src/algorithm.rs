//! Public-key algorithm names.
//!
//! Keyservers report the public-key algorithm of a primary key as the
//! numeric identifier assigned in [RFC 4880, section 9.1].
//!
//! [RFC 4880, section 9.1]: https://tools.ietf.org/html/rfc4880#section-9.1

/// The identifiers reserved for private or experimental algorithms.
pub const PRIVATE_OR_EXPERIMENTAL: std::ops::RangeInclusive<u32> = 100..=110;

/// Returns the display name of the given public-key algorithm.
///
/// Identifiers that are neither assigned nor reserved for private
/// use map to `"Unknown"`.
pub fn name_for(algorithm_id: u32) -> &'static str {
    if PRIVATE_OR_EXPERIMENTAL.contains(&algorithm_id) {
        return "Private/Experimental algorithm";
    }

    match algorithm_id {
        1 => "RSA Encrypt or Sign",
        2 => "RSA Encrypt-Only",
        3 => "RSA Sign-Only",
        16 => "ElGamal Encrypt-Only",
        17 => "DSA",
        18 => "Elliptic Curve",
        19 => "ECDSA",
        20 => "Formerly ElGamal Encrypt or Sign",
        21 => "Diffie-Hellman",
        _ => "Unknown",
    }
}
