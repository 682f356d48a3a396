//! Double-submit anti-forgery tokens.
//!
//! Form pages make sure the browser holds a random token cookie and echo the
//! same token in a hidden field. State-changing requests must present both,
//! and they must match.

use axum_extra::extract::CookieJar;
use cookie::{Cookie, SameSite};

use crate::error::{AppError, AppResult};

pub const COOKIE_NAME: &str = "marquee_csrf";
pub const FIELD_NAME: &str = "_csrf";

/// Returns the jar (with a fresh cookie if none was present) and the token
/// to embed in the form.
pub fn issue(jar: CookieJar) -> (CookieJar, String) {
    if let Some(existing) = jar.get(COOKIE_NAME).map(|c| c.value().to_string()) {
        if !existing.is_empty() {
            return (jar, existing);
        }
    }

    let token = uuid::Uuid::new_v4().simple().to_string();
    let cookie = Cookie::build((COOKIE_NAME, token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::hours(12))
        .build();
    (jar.add(cookie), token)
}

pub fn verify(jar: &CookieJar, submitted: &str) -> AppResult<()> {
    match jar.get(COOKIE_NAME) {
        Some(cookie) if !submitted.is_empty() && cookie.value() == submitted => Ok(()),
        _ => {
            tracing::warn!("rejected request with missing or mismatched anti-forgery token");
            Err(AppError::Forbidden)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issues_a_token_once_and_reuses_it() {
        let (jar, token) = issue(CookieJar::new());
        assert!(!token.is_empty());
        assert_eq!(jar.get(COOKIE_NAME).unwrap().value(), token);

        let (_, again) = issue(jar);
        assert_eq!(again, token);
    }

    #[test]
    fn verify_requires_matching_values() {
        let (jar, token) = issue(CookieJar::new());
        assert!(verify(&jar, &token).is_ok());
        assert!(matches!(verify(&jar, "other"), Err(AppError::Forbidden)));
        assert!(matches!(verify(&jar, ""), Err(AppError::Forbidden)));
        assert!(matches!(verify(&CookieJar::new(), &token), Err(AppError::Forbidden)));
    }
}
