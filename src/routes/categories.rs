use actix_web::{HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::api::ApiClient;
use crate::domain::session::AuthSession;
use crate::dto::list::ListQuery;
use crate::forms::ActionForm;
use crate::forms::categories::CategoryForm;
use crate::models::config::ServerConfig;
use crate::routes::{
    api_for, redirect, redirect_back, render_list, safe_next, service_error_response,
};
use crate::services::categories as categories_service;

#[get("/admin/categories")]
pub async fn show_categories(
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
    match categories_service::list_categories(&api, &session, &query, page).await {
        Ok(data) => render_list(&tera, &flash_messages, Some(&session), "categories", &data),
        Err(err) => service_error_response(&req, err, "list categories", "/"),
    }
}

#[post("/admin/categories")]
pub async fn add_category(
    req: HttpRequest,
    session: AuthSession,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<CategoryForm>,
) -> impl Responder {
    let api = api_for(&client, Some(&session));
    match categories_service::create_category(&api, &session, form).await {
        Ok(category) => {
            FlashMessage::success(format!("Category {} created.", category.name)).send();
            redirect("/admin/categories")
        }
        Err(err) => service_error_response(&req, err, "create the category", "/admin/categories"),
    }
}

#[post("/admin/categories/{category_id}")]
pub async fn save_category(
    req: HttpRequest,
    category_id: web::Path<String>,
    session: AuthSession,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<CategoryForm>,
) -> impl Responder {
    let api = api_for(&client, Some(&session));
    let next = form.next.clone();
    match categories_service::update_category(&api, &session, &category_id, form).await {
        Ok(_) => {
            FlashMessage::success("Category updated.").send();
            redirect_back(next.as_deref(), "/admin/categories")
        }
        Err(err) => service_error_response(
            &req,
            err,
            "update the category",
            safe_next(next.as_deref(), "/admin/categories"),
        ),
    }
}

#[post("/admin/categories/{category_id}/delete")]
pub async fn delete_category(
    req: HttpRequest,
    category_id: web::Path<String>,
    session: AuthSession,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<ActionForm>,
) -> impl Responder {
    let api = api_for(&client, Some(&session));
    match categories_service::delete_category(&api, &session, &category_id).await {
        Ok(()) => {
            FlashMessage::success("Category deleted.").send();
            redirect_back(form.next.as_deref(), "/admin/categories")
        }
        Err(err) => service_error_response(
            &req,
            err,
            "delete the category",
            safe_next(form.next.as_deref(), "/admin/categories"),
        ),
    }
}
