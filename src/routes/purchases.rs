use actix_web::{HttpRequest, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::api::ApiClient;
use crate::domain::session::AuthSession;
use crate::dto::list::ListQuery;
use crate::models::config::ServerConfig;
use crate::routes::{api_for, render_list, service_error_response};
use crate::services::purchases as purchases_service;

#[get("/purchases")]
pub async fn show_purchases(
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
    match purchases_service::list_purchases(&api, &session, &query, page).await {
        Ok(data) => render_list(&tera, &flash_messages, Some(&session), "purchases", &data),
        Err(err) => service_error_response(&req, err, "list purchases", "/"),
    }
}
