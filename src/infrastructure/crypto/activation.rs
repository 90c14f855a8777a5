//! Activation token generation
//!
//! Tokens are 256 bits from the OS CSPRNG, URL-safe base64 without padding.
//! They carry no information about the account they belong to.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;

/// Random bytes per token
pub const ACTIVATION_TOKEN_BYTES: usize = 32;

/// Encoded length of a token (32 bytes → 43 base64 characters)
pub const ACTIVATION_TOKEN_LEN: usize = 43;

/// Generate a fresh activation token
pub fn generate_activation_token() -> String {
    let mut bytes = [0u8; ACTIVATION_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Cheap shape check so obviously bogus links never reach the store.
pub fn is_well_formed_token(token: &str) -> bool {
    token.len() == ACTIVATION_TOKEN_LEN
        && token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Build the link mailed to the user
pub fn activation_link(public_base_url: &str, token: &str) -> String {
    format!("{}/activate/{}", public_base_url.trim_end_matches('/'), token)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn tokens_are_url_safe_and_fixed_length() {
        let token = generate_activation_token();
        assert_eq!(token.len(), ACTIVATION_TOKEN_LEN);
        assert!(is_well_formed_token(&token));
    }

    #[test]
    fn tokens_do_not_repeat() {
        let tokens: HashSet<String> = (0..1000).map(|_| generate_activation_token()).collect();
        assert_eq!(tokens.len(), 1000);
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert!(!is_well_formed_token(""));
        assert!(!is_well_formed_token("short"));
        assert!(!is_well_formed_token(&"a/".repeat(22)[..43]));
    }

    #[test]
    fn link_joins_base_url_without_double_slash() {
        assert_eq!(
            activation_link("http://localhost:8080/", "abc"),
            "http://localhost:8080/activate/abc"
        );
    }
}
