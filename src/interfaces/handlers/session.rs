use actix_web::{web, HttpRequest, HttpResponse};

use crate::{
    constants::ADMIN_COOKIE_NAME,
    entities::{action::ActionResponse, session::{LoginRequest, SessionState}},
    errors::AuthError,
    use_cases::session::session_state,
    AppState,
};

/// Login entry point. Tells the caller whether it already holds a session.
pub async fn login_page(request: HttpRequest) -> HttpResponse {
    let cookie = request.cookie(ADMIN_COOKIE_NAME);
    let state = session_state(cookie.as_ref().map(|c| c.value()));

    HttpResponse::Ok().json(ActionResponse::ok(serde_json::json!({
        "authenticated": state == SessionState::Authenticated,
        "login": "/admin/login",
    })))
}

pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AuthError> {
    let cookie = state.session_gate.login(&body)?;

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(ActionResponse::done()))
}

pub async fn logout(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(state.session_gate.logout_cookie())
        .json(ActionResponse::done())
}
