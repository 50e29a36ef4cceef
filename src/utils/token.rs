use base64::{engine::general_purpose, Engine};
use rand::RngCore;

/// Generate an opaque session token. The token carries no claims; it is only
/// meaningful as a key into the `tokens` table.
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}
