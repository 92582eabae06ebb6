//! Password digests as stored on User nodes.
//!
//! Stored credentials are the lowercase hex MD5 of the raw password. This
//! format is part of the existing data contract and is kept for
//! compatibility with records written by earlier deployments.

use md5::{Digest, Md5};

/// Lowercase hex MD5 digest of `password`.
pub fn password_digest(password: &str) -> String {
    hex::encode(Md5::digest(password.as_bytes()))
}

/// Compares a raw password against a stored digest.
pub fn digest_matches(password: &str, stored: &str) -> bool {
    password_digest(password).eq_ignore_ascii_case(stored)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digests() {
        assert_eq!(password_digest(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(
            password_digest("password"),
            "5f4dcc3b5aa765d61d8327deb882cf99"
        );
    }

    #[test]
    fn matches_ignore_hex_case() {
        assert!(digest_matches("password", "5F4DCC3B5AA765D61D8327DEB882CF99"));
        assert!(!digest_matches("Password", "5f4dcc3b5aa765d61d8327deb882cf99"));
    }
}
