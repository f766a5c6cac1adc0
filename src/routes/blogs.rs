use actix_web::{HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::api::ApiClient;
use crate::domain::session::AuthSession;
use crate::dto::list::ListQuery;
use crate::forms::ActionForm;
use crate::forms::blogs::BlogForm;
use crate::models::config::ServerConfig;
use crate::routes::{
    api_for, redirect, redirect_back, render_list, safe_next, service_error_response,
};
use crate::services::blogs as blogs_service;

#[get("/admin/blogs")]
pub async fn show_blogs(
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
    match blogs_service::list_blogs(&api, &session, &query, page).await {
        Ok(data) => render_list(&tera, &flash_messages, Some(&session), "admin_blogs", &data),
        Err(err) => service_error_response(&req, err, "list blogs", "/"),
    }
}

#[post("/admin/blogs")]
pub async fn add_blog(
    req: HttpRequest,
    session: AuthSession,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<BlogForm>,
) -> impl Responder {
    let api = api_for(&client, Some(&session));
    match blogs_service::create_blog(&api, &session, form).await {
        Ok(_) => {
            FlashMessage::success("Blog published.").send();
            redirect("/admin/blogs")
        }
        Err(err) => service_error_response(&req, err, "create the blog", "/admin/blogs"),
    }
}

#[post("/admin/blogs/{blog_id}")]
pub async fn save_blog(
    req: HttpRequest,
    blog_id: web::Path<String>,
    session: AuthSession,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<BlogForm>,
) -> impl Responder {
    let api = api_for(&client, Some(&session));
    match blogs_service::update_blog(&api, &session, &blog_id, form).await {
        Ok(_) => {
            FlashMessage::success("Blog updated.").send();
            redirect("/admin/blogs")
        }
        Err(err) => service_error_response(&req, err, "update the blog", "/admin/blogs"),
    }
}

#[post("/admin/blogs/{blog_id}/delete")]
pub async fn delete_blog(
    req: HttpRequest,
    blog_id: web::Path<String>,
    session: AuthSession,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<ActionForm>,
) -> impl Responder {
    let api = api_for(&client, Some(&session));
    match blogs_service::delete_blog(&api, &session, &blog_id).await {
        Ok(()) => {
            FlashMessage::success("Blog deleted.").send();
            redirect_back(form.next.as_deref(), "/admin/blogs")
        }
        Err(err) => service_error_response(
            &req,
            err,
            "delete the blog",
            safe_next(form.next.as_deref(), "/admin/blogs"),
        ),
    }
}
