use std::time::Duration;

use coursehub::api::auth::Credentials;
use coursehub::api::course::CatalogCourseSearch;
use coursehub::api::{ApiClient, ApiError, AuthApi, CourseReader};
use coursehub::domain::role::Role;
use coursehub::domain::types::{Email, Password, RecordId};
use coursehub::pagination::PageRequest;

mod common;

fn client(base_url: &str) -> ApiClient {
    ApiClient::new(base_url, Duration::from_secs(5)).unwrap()
}

fn credentials(password: &str) -> Credentials {
    Credentials {
        email: Email::new("lan@example.com").unwrap(),
        password: Password::new(password).unwrap(),
    }
}

#[actix_web::test]
async fn search_unwraps_envelope_and_sends_condition() {
    let backend = common::spawn_backend().await;
    let api = client(&backend);

    let page = api
        .search_catalog_courses(
            &CatalogCourseSearch::default().keyword("basics"),
            PageRequest::from_query(Some(2), None, 10),
        )
        .await
        .unwrap();

    assert_eq!(page.page_info.page_num, 2);
    assert_eq!(page.page_data.len(), 1);
    assert_eq!(page.page_data[0].name, "Algebra basics");
}

#[actix_web::test]
async fn status_codes_map_to_errors() {
    let backend = common::spawn_backend().await;
    let api = client(&backend);

    let missing = api
        .get_catalog_course(&RecordId::new("missing").unwrap())
        .await;
    assert!(matches!(missing, Err(ApiError::NotFound)));

    let archived = api
        .get_catalog_course(&RecordId::new("archived").unwrap())
        .await;
    assert!(matches!(
        archived,
        Err(ApiError::Rejected { status: 422, ref message }) if message == "Course is archived"
    ));
}

/// Ensures the token from login is sent as a bearer token.
#[actix_web::test]
async fn login_token_authorizes_profile_request() {
    let backend = common::spawn_backend().await;
    let api = client(&backend);

    let token = api.login(&credentials(common::PASSWORD)).await.unwrap();
    assert_eq!(token, common::TOKEN);

    let user = api.current_user(&token).await.unwrap();
    assert_eq!(user.role, Role::Student);

    let rejected = api.current_user("stale").await;
    assert!(matches!(rejected, Err(ApiError::Unauthorized)));
}

#[actix_web::test]
async fn wrong_password_is_unauthorized() {
    let backend = common::spawn_backend().await;
    let result = client(&backend).login(&credentials("wrong-pass")).await;
    assert!(matches!(result, Err(ApiError::Unauthorized)));
}

#[actix_web::test]
async fn unreachable_backend_is_transport_error() {
    let api = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
    let result = api
        .search_catalog_courses(&CatalogCourseSearch::default(), PageRequest::first(10))
        .await;
    assert!(matches!(result, Err(ApiError::Transport(_))));
}
