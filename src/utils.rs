use std::fmt::Write;

use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

/// Generates the opaque `state` value sent with the authorization request.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Short stable key derived from the client id, used to name the token cache
/// so that different applications never share tokens.
pub fn cache_key(client_id: &str) -> String {
    let hash = Sha256::digest(client_id.as_bytes());
    hash.iter().take(8).fold(String::new(), |mut acc, byte| {
        let _ = write!(acc, "{:02x}", byte);
        acc
    })
}

/// Returns true when every scope in `required` appears in `granted`.
///
/// Both are space separated scope lists as used by OAuth.
pub fn covers_scopes(granted: &str, required: &str) -> bool {
    let granted: Vec<&str> = granted.split_whitespace().collect();
    required
        .split_whitespace()
        .all(|scope| granted.contains(&scope))
}
