use lambda_http::http::{header::AUTHORIZATION, HeaderMap};
use sha2::{Digest, Sha256};

/// Checks the `Authorization` header against the admin shared secret.
///
/// This is a plain equality check on one static credential: no token
/// parsing, no expiry. Without a configured secret nobody is an admin.
/// Both sides are hashed first so the comparison time does not depend on
/// how much of the secret a caller guessed right.
pub fn is_admin(headers: &HeaderMap, admin_password: Option<&str>) -> bool {
    let Some(expected) = admin_password.filter(|p| !p.is_empty()) else {
        return false;
    };

    // HeaderMap lookups are case-insensitive.
    let Some(provided) = headers.get(AUTHORIZATION) else {
        return false;
    };

    // Raw bytes: to_str() would refuse a non-ASCII secret.
    Sha256::digest(provided.as_bytes()) == Sha256::digest(expected.as_bytes())
}
