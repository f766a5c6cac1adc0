use actix_web::{HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::api::ApiClient;
use crate::domain::payout::PayoutStatus;
use crate::domain::session::AuthSession;
use crate::dto::list::ListQuery;
use crate::forms::payouts::{NewPayoutForm, PayoutStatusForm};
use crate::models::config::ServerConfig;
use crate::routes::{api_for, redirect_back, render_list, safe_next, service_error_response};
use crate::services::ServiceError;
use crate::services::payouts as payouts_service;

#[get("/payouts")]
pub async fn show_payouts(
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
    match payouts_service::list_payouts(&api, &session, &query, page).await {
        Ok(data) => render_list(&tera, &flash_messages, Some(&session), "payouts", &data),
        Err(err) => service_error_response(&req, err, "list payouts", "/"),
    }
}

#[post("/payouts")]
pub async fn add_payout(
    req: HttpRequest,
    session: AuthSession,
    client: web::Data<ApiClient>,
    form: web::Bytes,
) -> impl Responder {
    let form = match NewPayoutForm::parse(form.as_ref()) {
        Ok(form) => form,
        Err(err) => {
            return service_error_response(&req, ServiceError::from(err), "read the form", "/purchases");
        }
    };
    let api = api_for(&client, Some(&session));
    match payouts_service::create_payout(&api, &session, &form).await {
        Ok(payout) => {
            FlashMessage::success(format!("Payout {} created.", payout.payout_no)).send();
            redirect_back(form.next.as_deref(), "/payouts")
        }
        Err(err) => service_error_response(
            &req,
            err,
            "create the payout",
            safe_next(form.next.as_deref(), "/purchases"),
        ),
    }
}

#[post("/payouts/{payout_id}/status")]
pub async fn change_payout_status(
    req: HttpRequest,
    payout_id: web::Path<String>,
    session: AuthSession,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<PayoutStatusForm>,
) -> impl Responder {
    let api = api_for(&client, Some(&session));
    let next = form.next.clone();
    match payouts_service::update_payout_status(&api, &session, &payout_id, form).await {
        Ok(status) => {
            let message = match status {
                PayoutStatus::RequestPayout => "Payout requested.",
                PayoutStatus::Completed => "Payout completed.",
                _ => "Payout rejected.",
            };
            FlashMessage::success(message).send();
            redirect_back(next.as_deref(), "/payouts")
        }
        Err(err) => service_error_response(
            &req,
            err,
            "update the payout",
            safe_next(next.as_deref(), "/payouts"),
        ),
    }
}
