use actix_cors::Cors;
use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use tera::Tera;

use crate::api::ApiClient;
use crate::middleware::redirect_unauthorized;
use crate::models::config::ServerConfig;
use crate::routes::account::{change_password, save_account, show_account};
use crate::routes::auth::{login, logout, show_login};
use crate::routes::blogs::{add_blog, delete_blog, save_blog, show_blogs as show_admin_blogs};
use crate::routes::cart::{add_to_cart, checkout, remove_item, show_cart, update_item_status};
use crate::routes::catalog::{
    add_review, edit_review, show_blog, show_blogs, show_course, show_index,
};
use crate::routes::categories::{add_category, delete_category, save_category, show_categories};
use crate::routes::courses::{
    add_course, add_lesson, add_session, change_course_status, delete_course, delete_lesson,
    delete_session, save_course, save_lesson, save_session, show_course_logs, show_courses,
    show_lessons, show_sessions,
};
use crate::routes::payouts::{add_payout, change_payout_status, show_payouts};
use crate::routes::purchases::show_purchases;
use crate::routes::reviews::show_reviews;
use crate::routes::subscriptions::{show_subscriptions, toggle_subscription};
use crate::routes::users::{
    add_user, change_role, change_status, delete_user, review_request, show_requests, show_users,
};

pub mod api;
pub mod browser;
pub mod domain;
pub mod dto;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod render;
pub mod routes;
pub mod services;

/// Registers every page and action handler.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(show_login)
        .service(login)
        .service(logout)
        .service(show_index)
        .service(show_course)
        .service(add_review)
        .service(edit_review)
        .service(show_blogs)
        .service(show_blog)
        .service(show_users)
        .service(add_user)
        .service(change_status)
        .service(change_role)
        .service(delete_user)
        .service(show_requests)
        .service(review_request)
        .service(show_account)
        .service(save_account)
        .service(change_password)
        .service(show_categories)
        .service(add_category)
        .service(save_category)
        .service(delete_category)
        .service(show_admin_blogs)
        .service(add_blog)
        .service(save_blog)
        .service(delete_blog)
        .service(show_courses)
        .service(add_course)
        .service(show_sessions)
        .service(add_session)
        .service(save_session)
        .service(show_lessons)
        .service(add_lesson)
        .service(save_lesson)
        .service(change_course_status)
        .service(delete_course)
        .service(save_course)
        .service(delete_session)
        .service(delete_lesson)
        .service(show_course_logs)
        .service(show_payouts)
        .service(add_payout)
        .service(change_payout_status)
        .service(show_purchases)
        .service(show_reviews)
        .service(show_subscriptions)
        .service(toggle_subscription)
        .service(show_cart)
        .service(add_to_cart)
        .service(checkout)
        .service(update_item_status)
        .service(remove_item);
}

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    // One pooled client; handlers derive per-session copies with their token.
    let client = ApiClient::new(&server_config.api_base_url, server_config.request_timeout())
        .map_err(|e| std::io::Error::other(format!("Failed to build API client: {e}")))?;

    // Keys and stores for identity, sessions, and flash messages.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{}", server_config.domain)))
                    .build(),
            )
            .wrap(actix_web::middleware::Compress::default())
            .wrap(actix_web::middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(
                web::scope("")
                    .wrap(redirect_unauthorized())
                    .configure(configure),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(client.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
