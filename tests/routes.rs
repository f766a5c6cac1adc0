use std::time::Duration;

use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use tera::Tera;

use coursehub::api::ApiClient;
use coursehub::configure;
use coursehub::middleware::redirect_unauthorized;
use coursehub::models::config::ServerConfig;

mod common;

fn key() -> Key {
    Key::from(&[42u8; 64])
}

fn server_config(api_base_url: &str) -> ServerConfig {
    ServerConfig {
        domain: "localhost".into(),
        address: "127.0.0.1".into(),
        port: 8080,
        api_base_url: api_base_url.into(),
        templates_dir: "templates/**/*".into(),
        secret: String::from_utf8(vec![b'k'; 64]).unwrap(),
        default_page_size: 10,
        request_timeout_secs: 5,
    }
}

macro_rules! app {
    ($backend:expr) => {
        test::init_service(
            App::new()
                .wrap(
                    FlashMessagesFramework::builder(CookieMessageStore::builder(key()).build())
                        .build(),
                )
                .wrap(IdentityMiddleware::default())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), key())
                        .cookie_secure(false)
                        .build(),
                )
                .service(web::scope("").wrap(redirect_unauthorized()).configure(configure))
                .app_data(web::Data::new(Tera::new("templates/**/*").unwrap()))
                .app_data(web::Data::new(
                    ApiClient::new($backend.as_str(), Duration::from_secs(5)).unwrap(),
                ))
                .app_data(web::Data::new(server_config(&$backend))),
        )
        .await
    };
}

/// Logs in as the student and yields the identity cookies.
macro_rules! log_in {
    ($app:expr) => {{
        let res = test::call_service(
            &$app,
            test::TestRequest::post()
                .uri("/login")
                .set_form([("email", "lan@example.com"), ("password", common::PASSWORD)])
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), "/");
        res.response()
            .cookies()
            .map(|c| c.into_owned())
            .collect::<Vec<Cookie<'static>>>()
    }};
}

fn with_cookies(mut req: test::TestRequest, cookies: Vec<Cookie<'static>>) -> test::TestRequest {
    for cookie in cookies {
        req = req.cookie(cookie);
    }
    req
}

fn location(res: &actix_web::dev::ServiceResponse) -> String {
    res.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[actix_web::test]
async fn login_page_renders() {
    let backend = common::spawn_backend().await;
    let app = app!(backend);

    let res = test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(res).await.to_vec()).unwrap();
    assert!(body.contains("name=\"password\""));
}

#[actix_web::test]
async fn gated_page_redirects_anonymous_visitor() {
    let backend = common::spawn_backend().await;
    let app = app!(backend);

    let res = test::call_service(&app, test::TestRequest::get().uri("/cart").to_request()).await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/login");
}

#[actix_web::test]
async fn catalog_is_public() {
    let backend = common::spawn_backend().await;
    let app = app!(backend);

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/?keyword=basics").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(res).await.to_vec()).unwrap();
    assert!(body.contains("Algebra basics"));
    assert!(body.contains("Math"));
    assert!(!body.contains("Add to cart"));
}

/// Ensures the cookies set at login open gated pages with the bearer token.
#[actix_web::test]
async fn login_opens_cart() {
    let backend = common::spawn_backend().await;
    let app = app!(backend);

    let cookies = log_in!(app);

    let req = with_cookies(test::TestRequest::get().uri("/cart"), cookies);
    let res = test::call_service(&app, req.to_request()).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(res).await.to_vec()).unwrap();
    assert!(body.contains("Geometry"));
    assert!(body.contains("Check out"));
    assert!(body.contains(r#"<span class="badge badge-blue">"#));
}

#[actix_web::test]
async fn search_form_keeps_page_size() {
    let backend = common::spawn_backend().await;
    let app = app!(backend);

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/?keyword=basics&size=20").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(res).await.to_vec()).unwrap();
    assert!(body.contains(r#"<input type="hidden" name="size" value="20">"#));
    assert!(
        body.contains(r#"<input type="hidden" name="prev" value="keyword=basics&amp;size=20">"#)
    );
    assert!(body.contains("?keyword=basics&amp;size=20&page=1"));
}

#[actix_web::test]
async fn new_keyword_lands_on_first_page() {
    let backend = common::spawn_backend().await;
    let app = app!(backend);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/?keyword=geometry&page=3&size=20&prev=keyword%3Dbasics%26size%3D20")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(res).await.to_vec()).unwrap();
    assert!(body.contains(r#"<input type="hidden" name="page" value="1">"#));
    assert!(body.contains(r#"<input type="hidden" name="size" value="20">"#));
}

#[actix_web::test]
async fn failed_removal_returns_to_filtered_cart() {
    let backend = common::spawn_backend().await;
    let app = app!(backend);
    let cookies = log_in!(app);

    let req = with_cookies(
        test::TestRequest::post()
            .uri("/cart/i1/delete")
            .set_form([("next", "/cart?tab=new&page=2")]),
        cookies,
    );
    let res = test::call_service(&app, req.to_request()).await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/cart?tab=new&page=2");
}

#[actix_web::test]
async fn wrong_password_returns_to_login() {
    let backend = common::spawn_backend().await;
    let app = app!(backend);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/login")
            .set_form([("email", "lan@example.com"), ("password", "wrong-pass")])
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/login");
}
