use actix_web::cookie::{time::Duration, Cookie, SameSite};
use zeroize::Zeroizing;

use crate::{
    constants::{ADMIN_COOKIE_NAME, ADMIN_COOKIE_VALUE, SESSION_MAX_AGE_SECS},
    entities::session::{LoginRequest, SessionState},
    errors::AuthError,
    settings::AppConfig,
};

/// Password check and session cookie issuing for the single admin.
///
/// The cookie holds a fixed sentinel rather than a signed token, so anyone holding
/// a copy stays authenticated until it expires. There is no server-side revocation.
pub struct SessionGate {
    admin_password: Zeroizing<String>,
    secure_cookies: bool,
}

impl SessionGate {
    pub fn new(config: &AppConfig) -> Self {
        SessionGate {
            admin_password: Zeroizing::new(config.admin_password.clone()),
            secure_cookies: config.is_production(),
        }
    }

    /// Exact match against the configured password. No lockout, no attempt counting.
    pub fn login(&self, request: &LoginRequest) -> Result<Cookie<'static>, AuthError> {
        if self.admin_password.is_empty() {
            tracing::error!("Admin password is not configured");
            return Err(AuthError::LoginFailed);
        }

        if request.password.as_str() != self.admin_password.as_str() {
            tracing::warn!("Rejected admin login attempt");
            return Err(AuthError::WrongCredentials);
        }

        tracing::info!("Admin logged in");
        Ok(self.session_cookie())
    }

    pub fn session_cookie(&self) -> Cookie<'static> {
        Cookie::build(ADMIN_COOKIE_NAME, ADMIN_COOKIE_VALUE)
            .http_only(true)
            .secure(self.secure_cookies)
            .same_site(SameSite::Lax)
            .max_age(Duration::seconds(SESSION_MAX_AGE_SECS))
            .path("/")
            .finish()
    }

    /// A cookie that makes the browser drop the session immediately.
    pub fn logout_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build(ADMIN_COOKIE_NAME, "")
            .http_only(true)
            .secure(self.secure_cookies)
            .same_site(SameSite::Lax)
            .path("/")
            .finish();
        cookie.make_removal();
        cookie
    }
}

pub fn session_state(cookie_value: Option<&str>) -> SessionState {
    match cookie_value {
        Some(ADMIN_COOKIE_VALUE) => SessionState::Authenticated,
        _ => SessionState::Anonymous,
    }
}
