use actix_web::{HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::api::ApiClient;
use crate::domain::session::{AuthSession, SessionUser};
use crate::forms::users::{AccountForm, PasswordForm};
use crate::middleware::start_session;
use crate::routes::{api_for, base_context, redirect, render_template, service_error_response};
use crate::services::users as users_service;

#[get("/account")]
pub async fn show_account(
    req: HttpRequest,
    session: AuthSession,
    client: web::Data<ApiClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let api = api_for(&client, Some(&session));
    match users_service::load_account(&api, &session).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&session), "account");
            context.insert("account", &data.user);
            render_template(&tera, "account.html", &context)
        }
        Err(err) => service_error_response(&req, err, "load the account", "/"),
    }
}

#[post("/account")]
pub async fn save_account(
    req: HttpRequest,
    session: AuthSession,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<AccountForm>,
) -> impl Responder {
    let api = api_for(&client, Some(&session));
    match users_service::update_account(&api, &session, form).await {
        Ok(user) => {
            // Keep the header in sync with the new profile.
            let profile = SessionUser {
                name: user.name,
                avatar: user.avatar,
                ..session.user().clone()
            };
            if let Ok(refreshed) = AuthSession::login(session.token(), profile) {
                if let Err(err) = start_session(&req, &refreshed) {
                    log::error!("Failed to refresh the session profile: {err}");
                }
            }
            FlashMessage::success("Account updated.").send();
            redirect("/account")
        }
        Err(err) => service_error_response(&req, err, "update the account", "/account"),
    }
}

#[post("/account/password")]
pub async fn change_password(
    req: HttpRequest,
    session: AuthSession,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<PasswordForm>,
) -> impl Responder {
    let api = api_for(&client, Some(&session));
    match users_service::change_password(&api, &session, form).await {
        Ok(()) => {
            FlashMessage::success("Password changed.").send();
            redirect("/account")
        }
        Err(err) => service_error_response(&req, err, "change the password", "/account"),
    }
}
