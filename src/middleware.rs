//! Session plumbing: the identity cookie carries the bearer token, the
//! session cookie the profile that goes with it.

use std::future::{Ready, ready};

use actix_identity::{Identity, IdentityExt};
use actix_session::SessionExt;
use actix_web::dev::{Payload, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::middleware::{ErrorHandlerResponse, ErrorHandlers};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest, HttpResponse, error};

use crate::domain::session::{AuthSession, SessionUser};

pub const SESSION_USER_KEY: &str = "user";

fn load_session(req: &HttpRequest) -> Result<AuthSession, Error> {
    let token = req
        .get_identity()
        .and_then(|identity| identity.id())
        .map_err(|_| error::ErrorUnauthorized("not logged in"))?;
    let user = req
        .get_session()
        .get::<SessionUser>(SESSION_USER_KEY)
        .map_err(|err| {
            log::error!("Failed to read session user: {err}");
            error::ErrorUnauthorized("corrupt session")
        })?
        .ok_or_else(|| error::ErrorUnauthorized("no session user"))?;
    AuthSession::login(token, user).map_err(|_| error::ErrorUnauthorized("empty token"))
}

/// Extracts the logged-in session. Fails with 401, which
/// [`redirect_unauthorized`] turns into a redirect to the login page.
/// Public pages take `Option<AuthSession>` instead.
impl FromRequest for AuthSession {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(load_session(req))
    }
}

/// Login transition: remembers the token and the profile.
pub fn start_session(req: &HttpRequest, session: &AuthSession) -> Result<(), Error> {
    Identity::login(&req.extensions(), session.token().to_string())?;
    req.get_session()
        .insert(SESSION_USER_KEY, session.user())
        .map_err(|err| error::ErrorInternalServerError(err.to_string()))?;
    Ok(())
}

/// Logout transition: purges identity and session cookies.
pub fn end_session(req: &HttpRequest) {
    match req.get_identity() {
        Ok(identity) => identity.logout(),
        Err(_) => req.get_session().purge(),
    }
}

fn redirect_to_login<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let (req, _) = res.into_parts();
    let response = HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/login"))
        .finish()
        .map_into_right_body();
    Ok(ErrorHandlerResponse::Response(ServiceResponse::new(
        req, response,
    )))
}

/// Sends anonymous visitors of gated pages to `/login`.
pub fn redirect_unauthorized<B: 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new().handler(StatusCode::UNAUTHORIZED, redirect_to_login)
}
