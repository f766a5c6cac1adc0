//! HTML handlers. Every mutation answers with a redirect so the browser
//! re-fetches the list it came from.

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::api::ApiClient;
use crate::domain::session::AuthSession;
use crate::dto::list::ListPageData;
use crate::middleware::end_session;
use crate::services::ServiceError;

pub mod account;
pub mod auth;
pub mod blogs;
pub mod cart;
pub mod catalog;
pub mod categories;
pub mod courses;
pub mod payouts;
pub mod purchases;
pub mod reviews;
pub mod subscriptions;
pub mod users;

pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

/// Context every page shares: alerts, the current user and the sidebar.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    session: Option<&AuthSession>,
    current_page: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_page", current_page);
    if let Some(session) = session {
        context.insert("current_user", session.user());
        context.insert("sections", &session.role().sections());
    }
    context
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn render_list(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    session: Option<&AuthSession>,
    current_page: &str,
    data: &ListPageData,
) -> HttpResponse {
    let mut context = base_context(flash_messages, session, current_page);
    context.insert("page", data);
    render_template(tera, "list.html", &context)
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Only local paths are followed; anything else falls back.
pub fn safe_next<'a>(next: Option<&'a str>, fallback: &'a str) -> &'a str {
    match next {
        Some(next) if next.starts_with('/') && !next.starts_with("//") => next,
        _ => fallback,
    }
}

pub fn redirect_back(next: Option<&str>, fallback: &str) -> HttpResponse {
    redirect(safe_next(next, fallback))
}

/// Adapter carrying the session token, or the anonymous one.
pub fn api_for(client: &ApiClient, session: Option<&AuthSession>) -> ApiClient {
    client.with_token(session.map(AuthSession::token))
}

/// Maps a failed service call to a flash message and a redirect. An expired
/// session is purged here.
pub fn service_error_response(
    req: &HttpRequest,
    err: ServiceError,
    action: &str,
    back: &str,
) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => {
            FlashMessage::error("Not enough permissions.").send();
            redirect("/")
        }
        ServiceError::SessionExpired => {
            end_session(req);
            FlashMessage::warning("Your session has expired. Please log in again.").send();
            redirect("/login")
        }
        ServiceError::NotFound => {
            FlashMessage::error("The record no longer exists.").send();
            redirect(back)
        }
        ServiceError::Form(message) => {
            FlashMessage::error(message).send();
            redirect(back)
        }
        ServiceError::Upstream(message) => {
            log::error!("Failed to {action}: {message}");
            FlashMessage::error(format!("Failed to {action}.")).send();
            redirect(back)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_levels_map_to_bootstrap() {
        assert_eq!(alert_level_to_str(&Level::Error), "danger");
        assert_eq!(alert_level_to_str(&Level::Warning), "warning");
        assert_eq!(alert_level_to_str(&Level::Success), "success");
        assert_eq!(alert_level_to_str(&Level::Debug), "info");
    }

    #[test]
    fn next_must_stay_on_site() {
        assert_eq!(safe_next(Some("/cart?tab=new"), "/"), "/cart?tab=new");
        assert_eq!(safe_next(Some("//evil.example"), "/"), "/");
        assert_eq!(safe_next(Some("https://evil.example"), "/"), "/");
        assert_eq!(safe_next(None, "/courses"), "/courses");
    }

    #[test]
    fn redirect_uses_see_other() {
        let response = redirect("/login");
        assert_eq!(response.status(), actix_web::http::StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
    }
}
