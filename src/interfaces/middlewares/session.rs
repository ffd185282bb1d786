use actix_web::{
    body::{EitherBody, MessageBody},
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    Error, HttpMessage, ResponseError,
};
use futures_util::future::{ok, LocalBoxFuture, Ready};
use std::{rc::Rc, task::{Context, Poll}};

use crate::{
    constants::{ADMIN_COOKIE_NAME, LOGIN_PATH},
    entities::session::{AdminSession, SessionState},
    errors::AuthError,
    use_cases::session::session_state,
};

/// Guards everything under `/admin` except the login entry points.
/// Anonymous requests are redirected to the login page before any handler runs.
pub struct SessionMiddleware;

impl<S, B> Transform<S, ServiceRequest> for SessionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(SessionMiddlewareService {
            service: Rc::new(service),
        })
    }
}

pub struct SessionMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SessionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            if is_public_route(req.path(), req.method()) {
                return service.call(req).await.map(ServiceResponse::map_into_left_body);
            }

            let cookie = req.cookie(ADMIN_COOKIE_NAME);
            match session_state(cookie.as_ref().map(|c| c.value())) {
                SessionState::Authenticated => {
                    req.extensions_mut().insert(AdminSession);
                    service.call(req).await.map(ServiceResponse::map_into_left_body)
                }
                SessionState::Anonymous => {
                    tracing::debug!(path = %req.path(), "Redirecting anonymous admin request");
                    let response = AuthError::Unauthenticated.error_response();
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

fn is_public_route(path: &str, method: &Method) -> bool {
    if *method == Method::OPTIONS {
        return true;
    }

    if path != LOGIN_PATH && !path.starts_with("/admin/") {
        return true;
    }

    matches!(
        (path, method.as_str()),
        (LOGIN_PATH, "GET") |
        ("/admin/login", "POST") |
        ("/admin/logout", "POST")
    )
}
