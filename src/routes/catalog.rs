use actix_web::{HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::api::ApiClient;
use crate::domain::session::AuthSession;
use crate::dto::list::ListQuery;
use crate::forms::reviews::ReviewForm;
use crate::models::config::ServerConfig;
use crate::routes::{
    api_for, base_context, redirect, render_list, render_template, service_error_response,
};
use crate::services::{catalog, reviews};

#[get("/")]
pub async fn show_index(
    req: HttpRequest,
    session: Option<AuthSession>,
    query: web::Query<ListQuery>,
    client: web::Data<ApiClient>,
    server_config: web::Data<ServerConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let query = query.into_inner();
    let api = api_for(&client, session.as_ref());
    let page = query.page_request(server_config.default_page_size);
    match catalog::search_courses(&api, session.as_ref(), &query, page).await {
        Ok(data) => render_list(&tera, &flash_messages, session.as_ref(), "catalog", &data),
        Err(err) => service_error_response(&req, err, "search courses", "/login"),
    }
}

#[get("/catalog/courses/{course_id}")]
pub async fn show_course(
    req: HttpRequest,
    course_id: web::Path<String>,
    session: Option<AuthSession>,
    client: web::Data<ApiClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let api = api_for(&client, session.as_ref());
    match catalog::course_detail(&api, session.as_ref(), &course_id).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, session.as_ref(), "catalog");
            context.insert("detail", &data);
            render_template(&tera, "course_detail.html", &context)
        }
        Err(err) => service_error_response(&req, err, "load the course", "/"),
    }
}

#[post("/catalog/courses/{course_id}/reviews")]
pub async fn add_review(
    req: HttpRequest,
    course_id: web::Path<String>,
    session: AuthSession,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<ReviewForm>,
) -> impl Responder {
    let course_url = format!("/catalog/courses/{course_id}");
    let api = api_for(&client, Some(&session));
    match reviews::create_review(&api, &session, &course_id, form).await {
        Ok(_) => {
            FlashMessage::success("Thank you for your review.").send();
            redirect(&course_url)
        }
        Err(err) => service_error_response(&req, err, "post the review", &course_url),
    }
}

#[post("/catalog/courses/{course_id}/reviews/{review_id}")]
pub async fn edit_review(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    session: AuthSession,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<ReviewForm>,
) -> impl Responder {
    let (course_id, review_id) = path.into_inner();
    let course_url = format!("/catalog/courses/{course_id}");
    let api = api_for(&client, Some(&session));
    match reviews::update_review(&api, &session, &review_id, &course_id, form).await {
        Ok(_) => {
            FlashMessage::success("Review updated.").send();
            redirect(&course_url)
        }
        Err(err) => service_error_response(&req, err, "update the review", &course_url),
    }
}

#[get("/blogs")]
pub async fn show_blogs(
    req: HttpRequest,
    session: Option<AuthSession>,
    query: web::Query<ListQuery>,
    client: web::Data<ApiClient>,
    server_config: web::Data<ServerConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let query = query.into_inner();
    let api = api_for(&client, session.as_ref());
    let page = query.page_request(server_config.default_page_size);
    match catalog::search_blogs(&api, session.as_ref(), &query, page).await {
        Ok(data) => render_list(&tera, &flash_messages, session.as_ref(), "blogs", &data),
        Err(err) => service_error_response(&req, err, "load blogs", "/"),
    }
}

#[get("/blogs/{blog_id}")]
pub async fn show_blog(
    req: HttpRequest,
    blog_id: web::Path<String>,
    session: Option<AuthSession>,
    client: web::Data<ApiClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let api = api_for(&client, session.as_ref());
    match catalog::blog_detail(&api, &blog_id).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, session.as_ref(), "blogs");
            context.insert("detail", &data);
            render_template(&tera, "blog_detail.html", &context)
        }
        Err(err) => service_error_response(&req, err, "load the blog", "/blogs"),
    }
}
