use actix_web::{HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::api::ApiClient;
use crate::domain::session::AuthSession;
use crate::dto::list::ListQuery;
use crate::forms::ActionForm;
use crate::models::config::ServerConfig;
use crate::routes::{api_for, redirect_back, render_list, safe_next, service_error_response};
use crate::services::subscriptions as subscriptions_service;

#[get("/subscriptions")]
pub async fn show_subscriptions(
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
    match subscriptions_service::list_subscriptions(&api, &session, &query, page).await {
        Ok(data) => render_list(&tera, &flash_messages, Some(&session), "subscriptions", &data),
        Err(err) => service_error_response(&req, err, "list subscriptions", "/"),
    }
}

#[post("/subscriptions/{instructor_id}/toggle")]
pub async fn toggle_subscription(
    req: HttpRequest,
    instructor_id: web::Path<String>,
    session: AuthSession,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<ActionForm>,
) -> impl Responder {
    let api = api_for(&client, Some(&session));
    match subscriptions_service::toggle_subscription(&api, &session, &instructor_id).await {
        Ok(()) => {
            FlashMessage::success("Subscription updated.").send();
            redirect_back(form.next.as_deref(), "/subscriptions")
        }
        Err(err) => service_error_response(
            &req,
            err,
            "update the subscription",
            safe_next(form.next.as_deref(), "/subscriptions"),
        ),
    }
}
