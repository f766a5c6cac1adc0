use actix_web::{HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::api::ApiClient;
use crate::domain::cart::CartStatus;
use crate::domain::session::AuthSession;
use crate::dto::list::ListQuery;
use crate::forms::ActionForm;
use crate::forms::cart::{AddToCartForm, CartItemStatusForm};
use crate::models::config::ServerConfig;
use crate::routes::{
    api_for, redirect, redirect_back, render_list, safe_next, service_error_response,
};
use crate::services::{cart, catalog};

#[get("/cart")]
pub async fn show_cart(
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
    match cart::list_cart(&api, &session, &query, page).await {
        Ok(data) => render_list(&tera, &flash_messages, Some(&session), "cart", &data),
        Err(err) => service_error_response(&req, err, "load the cart", "/"),
    }
}

#[post("/cart")]
pub async fn add_to_cart(
    req: HttpRequest,
    session: AuthSession,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<AddToCartForm>,
) -> impl Responder {
    let api = api_for(&client, Some(&session));
    let back = form.next.as_deref();
    match catalog::add_to_cart(&api, &session, &form.course_id).await {
        Ok(()) => {
            FlashMessage::success("Course added to the cart.").send();
            redirect_back(back, "/")
        }
        Err(err) => service_error_response(
            &req,
            err,
            "add the course to the cart",
            safe_next(back, "/"),
        ),
    }
}

#[post("/cart/checkout")]
pub async fn checkout(
    req: HttpRequest,
    session: AuthSession,
    client: web::Data<ApiClient>,
) -> impl Responder {
    let api = api_for(&client, Some(&session));
    match cart::checkout(&api, &session).await {
        Ok(count) => {
            FlashMessage::success(format!("{count} course(s) are waiting for payment.")).send();
            redirect("/cart?tab=waiting_paid")
        }
        Err(err) => service_error_response(&req, err, "check out", "/cart"),
    }
}

#[post("/cart/{item_id}/status")]
pub async fn update_item_status(
    req: HttpRequest,
    item_id: web::Path<String>,
    session: AuthSession,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<CartItemStatusForm>,
) -> impl Responder {
    let api = api_for(&client, Some(&session));
    let next = form.next.clone();
    match cart::update_item_status(&api, &session, &item_id, form).await {
        Ok(CartStatus::Completed) => {
            FlashMessage::success("Payment completed.").send();
            redirect_back(next.as_deref(), "/cart")
        }
        Ok(_) => {
            FlashMessage::info("Order cancelled.").send();
            redirect_back(next.as_deref(), "/cart")
        }
        Err(err) => service_error_response(
            &req,
            err,
            "update the cart item",
            safe_next(next.as_deref(), "/cart"),
        ),
    }
}

#[post("/cart/{item_id}/delete")]
pub async fn remove_item(
    req: HttpRequest,
    item_id: web::Path<String>,
    session: AuthSession,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<ActionForm>,
) -> impl Responder {
    let api = api_for(&client, Some(&session));
    match cart::remove_item(&api, &session, &item_id).await {
        Ok(()) => {
            FlashMessage::success("Course removed from the cart.").send();
            redirect_back(form.next.as_deref(), "/cart")
        }
        Err(err) => service_error_response(
            &req,
            err,
            "remove the cart item",
            safe_next(form.next.as_deref(), "/cart"),
        ),
    }
}
