use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::services::{self, Identity};
use crate::{
    error::{ApiError, NOT_AUTHENTICATED},
    state::AppState,
};

/// Verifies the request's Basic credentials and yields the caller's identity.
pub struct AuthUser(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let (username, password) = basic_credentials(&parts.headers)
            .ok_or(ApiError::Unauthorized(NOT_AUTHENTICATED))?;

        let identity = services::authenticate(&state.db, &username, &password).await?;
        Ok(AuthUser(identity))
    }
}

/// Decodes `Authorization: Basic base64(username:password)`.
pub(crate) fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    // Passwords may contain ':'; usernames may not.
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_owned(), password.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn decodes_basic_credentials() {
        let encoded = STANDARD.encode("alice:pw1");
        assert_eq!(
            basic_credentials(&headers(&format!("Basic {encoded}"))),
            Some(("alice".into(), "pw1".into()))
        );
    }

    #[test]
    fn password_keeps_colons() {
        let encoded = STANDARD.encode("alice:a:b:c");
        assert_eq!(
            basic_credentials(&headers(&format!("basic {encoded}"))),
            Some(("alice".into(), "a:b:c".into()))
        );
    }

    #[test]
    fn rejects_missing_or_malformed_headers() {
        assert_eq!(basic_credentials(&HeaderMap::new()), None);
        assert_eq!(basic_credentials(&headers("Bearer abc.def.ghi")), None);
        assert_eq!(basic_credentials(&headers("Basic !!!not-base64")), None);
        let no_colon = STANDARD.encode("alice");
        assert_eq!(basic_credentials(&headers(&format!("Basic {no_colon}"))), None);
    }
}
