use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::{
    constants::ADMIN_COOKIE_NAME,
    entities::session::{AdminSession, SessionState},
    errors::AuthError,
    use_cases::session::session_state,
};

/// Extractor for admin-only handlers.
/// Redirects to the login entry point when the request carries no valid session.
/// Usage: Add `_admin: AdminSession` as a parameter to your handler function.
impl FromRequest for AdminSession {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        if let Some(session) = req.extensions().get::<AdminSession>() {
            return ready(Ok(*session));
        }

        let cookie = req.cookie(ADMIN_COOKIE_NAME);
        match session_state(cookie.as_ref().map(|c| c.value())) {
            SessionState::Authenticated => ready(Ok(AdminSession)),
            SessionState::Anonymous => ready(Err(AuthError::Unauthenticated.into())),
        }
    }
}
