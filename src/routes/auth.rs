use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::api::ApiClient;
use crate::domain::session::AuthSession;
use crate::forms::auth::LoginForm;
use crate::middleware::{end_session, start_session};
use crate::routes::{api_for, base_context, redirect, render_template};
use crate::services::{ServiceError, auth as auth_service};

#[get("/login")]
pub async fn show_login(
    session: Option<AuthSession>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if session.is_some() {
        return redirect("/");
    }
    let context = base_context(&flash_messages, None, "login");
    render_template(&tera, "login.html", &context)
}

#[post("/login")]
pub async fn login(
    req: HttpRequest,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    let api = api_for(&client, None);
    match auth_service::login(&api, form).await {
        Ok(session) => match start_session(&req, &session) {
            Ok(()) => {
                FlashMessage::success(format!("Welcome back, {}.", session.user().name)).send();
                redirect("/")
            }
            Err(err) => {
                log::error!("Failed to store the session: {err}");
                HttpResponse::InternalServerError().finish()
            }
        },
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/login")
        }
        Err(err) => {
            log::error!("Failed to log in: {err}");
            FlashMessage::error("Login is unavailable right now.").send();
            redirect("/login")
        }
    }
}

#[post("/logout")]
pub async fn logout(
    req: HttpRequest,
    session: Option<AuthSession>,
    client: web::Data<ApiClient>,
) -> impl Responder {
    if let Some(session) = session {
        let api = api_for(&client, Some(&session));
        auth_service::logout(&api, session).await;
    }
    end_session(&req);
    redirect("/login")
}
