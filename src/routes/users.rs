use actix_web::{HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::api::ApiClient;
use crate::domain::session::AuthSession;
use crate::domain::user::ReviewDecision;
use crate::dto::list::ListQuery;
use crate::forms::ActionForm;
use crate::forms::users::{NewUserForm, ReviewInstructorForm, RoleForm, StatusForm};
use crate::models::config::ServerConfig;
use crate::routes::{
    api_for, redirect, redirect_back, render_list, safe_next, service_error_response,
};
use crate::services::users as users_service;

#[get("/admin/users")]
pub async fn show_users(
    req: HttpRequest,
    session: AuthSession,
    query: web::Query<ListQuery>,
    client: web::Data<ApiClient>,
    server_config: web::Data<ServerConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let query = query.into_inner();
    let api = api_for(&client, Some(&session));
    let page = query.page_request(server_config.default_page_size);
    match users_service::list_users(&api, &session, &query, page).await {
        Ok(data) => render_list(&tera, &flash_messages, Some(&session), "users", &data),
        Err(err) => service_error_response(&req, err, "list users", "/"),
    }
}

#[post("/admin/users")]
pub async fn add_user(
    req: HttpRequest,
    session: AuthSession,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<NewUserForm>,
) -> impl Responder {
    let api = api_for(&client, Some(&session));
    match users_service::create_user(&api, &session, form).await {
        Ok(()) => {
            FlashMessage::success("User created.").send();
            redirect("/admin/users")
        }
        Err(err) => service_error_response(&req, err, "create the user", "/admin/users"),
    }
}

#[post("/admin/users/{user_id}/status")]
pub async fn change_status(
    req: HttpRequest,
    user_id: web::Path<String>,
    session: AuthSession,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<StatusForm>,
) -> impl Responder {
    let api = api_for(&client, Some(&session));
    let next = form.next.clone();
    match users_service::change_user_status(&api, &session, &user_id, form).await {
        Ok(active) => {
            let message = if active { "Account activated." } else { "Account deactivated." };
            FlashMessage::success(message).send();
            redirect_back(next.as_deref(), "/admin/users")
        }
        Err(err) => service_error_response(
            &req,
            err,
            "change the account status",
            safe_next(next.as_deref(), "/admin/users"),
        ),
    }
}

#[post("/admin/users/{user_id}/role")]
pub async fn change_role(
    req: HttpRequest,
    user_id: web::Path<String>,
    session: AuthSession,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<RoleForm>,
) -> impl Responder {
    let api = api_for(&client, Some(&session));
    let next = form.next.clone();
    match users_service::change_user_role(&api, &session, &user_id, form).await {
        Ok(()) => {
            FlashMessage::success("Role updated.").send();
            redirect_back(next.as_deref(), "/admin/users")
        }
        Err(err) => service_error_response(
            &req,
            err,
            "change the role",
            safe_next(next.as_deref(), "/admin/users"),
        ),
    }
}

#[post("/admin/users/{user_id}/delete")]
pub async fn delete_user(
    req: HttpRequest,
    user_id: web::Path<String>,
    session: AuthSession,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<ActionForm>,
) -> impl Responder {
    let api = api_for(&client, Some(&session));
    match users_service::delete_user(&api, &session, &user_id).await {
        Ok(()) => {
            FlashMessage::success("User deleted.").send();
            redirect_back(form.next.as_deref(), "/admin/users")
        }
        Err(err) => service_error_response(
            &req,
            err,
            "delete the user",
            safe_next(form.next.as_deref(), "/admin/users"),
        ),
    }
}

#[get("/admin/requests")]
pub async fn show_requests(
    req: HttpRequest,
    session: AuthSession,
    query: web::Query<ListQuery>,
    client: web::Data<ApiClient>,
    server_config: web::Data<ServerConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let query = query.into_inner();
    let api = api_for(&client, Some(&session));
    let page = query.page_request(server_config.default_page_size);
    match users_service::list_requests(&api, &session, &query, page).await {
        Ok(data) => render_list(&tera, &flash_messages, Some(&session), "requests", &data),
        Err(err) => service_error_response(&req, err, "list instructor requests", "/"),
    }
}

#[post("/admin/requests/{user_id}/review")]
pub async fn review_request(
    req: HttpRequest,
    user_id: web::Path<String>,
    session: AuthSession,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<ReviewInstructorForm>,
) -> impl Responder {
    let api = api_for(&client, Some(&session));
    let next = form.next.clone();
    match users_service::review_instructor(&api, &session, &user_id, form).await {
        Ok(decision) => {
            let message = match decision {
                ReviewDecision::Approve => "Instructor approved.",
                ReviewDecision::Reject => "Instructor request rejected.",
            };
            FlashMessage::success(message).send();
            redirect_back(next.as_deref(), "/admin/requests")
        }
        Err(err) => service_error_response(
            &req,
            err,
            "review the request",
            safe_next(next.as_deref(), "/admin/requests"),
        ),
    }
}
