//! Carries the session token between client and server in the `jwtToken`
//! cookie. Tokens are stateless: clearing the cookie is the whole logout.

use axum::http::{header, HeaderMap, HeaderValue};
use time::Duration;

pub const SESSION_COOKIE: &str = "jwtToken";

/// `Set-Cookie` value carrying `token`, expiring together with it.
pub fn session_cookie(token: &str, max_age: Duration, secure: bool) -> anyhow::Result<HeaderValue> {
    let mut cookie = format!(
        "{}={}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        token,
        max_age.whole_seconds()
    );
    if secure {
        cookie.push_str("; Secure");
    }
    Ok(HeaderValue::from_str(&cookie)?)
}

pub fn clear_session_cookie(secure: bool) -> HeaderValue {
    if secure {
        HeaderValue::from_static("jwtToken=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0; Secure")
    } else {
        HeaderValue::from_static("jwtToken=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0")
    }
}

/// Token from the session cookie, falling back to `Authorization: Bearer`.
pub fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value);

    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer ").or_else(|| v.strip_prefix("bearer ")))
            .map(str::trim)
            .filter(|t| !t.is_empty())
    })
}
