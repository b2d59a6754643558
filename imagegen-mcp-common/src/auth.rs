//! Authorization header construction for the upstream APIs.
//!
//! The two upstreams use different schemes:
//! - fal.ai expects its own `Key <token>` scheme, not a bearer token
//! - ImageKit expects HTTP Basic auth with the private key as the username
//!   and an empty password

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

/// `Authorization` header value for fal.ai.
///
/// # Example
///
/// ```
/// use imagegen_mcp_common::auth::fal_authorization;
///
/// assert_eq!(fal_authorization("abc"), "Key abc");
/// ```
pub fn fal_authorization(api_key: &str) -> String {
    format!("Key {}", api_key)
}

/// `Authorization` header value for ImageKit: `Basic base64(private_key + ":")`.
///
/// # Example
///
/// ```
/// use imagegen_mcp_common::auth::imagekit_authorization;
///
/// assert_eq!(imagekit_authorization("private_key"), "Basic cHJpdmF0ZV9rZXk6");
/// ```
pub fn imagekit_authorization(private_key: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{}:", private_key)))
}
