use actix_web::{HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::api::ApiClient;
use crate::domain::session::AuthSession;
use crate::dto::list::ListQuery;
use crate::forms::ActionForm;
use crate::forms::courses::{CourseForm, CourseStatusForm, LessonForm, SessionForm};
use crate::models::config::ServerConfig;
use crate::routes::{
    api_for, redirect, redirect_back, render_list, safe_next, service_error_response,
};
use crate::services::courses as courses_service;

#[get("/courses")]
pub async fn show_courses(
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
    match courses_service::list_courses(&api, &session, &query, page).await {
        Ok(data) => render_list(&tera, &flash_messages, Some(&session), "courses", &data),
        Err(err) => service_error_response(&req, err, "list courses", "/"),
    }
}

#[post("/courses")]
pub async fn add_course(
    req: HttpRequest,
    session: AuthSession,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<CourseForm>,
) -> impl Responder {
    let api = api_for(&client, Some(&session));
    match courses_service::create_course(&api, &session, form).await {
        Ok(course) => {
            FlashMessage::success(format!("Course {} created.", course.name)).send();
            redirect("/courses")
        }
        Err(err) => service_error_response(&req, err, "create the course", "/courses"),
    }
}

#[post("/courses/{course_id}")]
pub async fn save_course(
    req: HttpRequest,
    course_id: web::Path<String>,
    session: AuthSession,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<CourseForm>,
) -> impl Responder {
    let api = api_for(&client, Some(&session));
    match courses_service::update_course(&api, &session, &course_id, form).await {
        Ok(_) => {
            FlashMessage::success("Course updated.").send();
            redirect("/courses")
        }
        Err(err) => service_error_response(&req, err, "update the course", "/courses"),
    }
}

#[post("/courses/{course_id}/status")]
pub async fn change_course_status(
    req: HttpRequest,
    course_id: web::Path<String>,
    session: AuthSession,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<CourseStatusForm>,
) -> impl Responder {
    let api = api_for(&client, Some(&session));
    let next = form.next.clone();
    match courses_service::change_course_status(&api, &session, &course_id, form).await {
        Ok(status) => {
            FlashMessage::success(format!("Course moved to {}.", status.as_str())).send();
            redirect_back(next.as_deref(), "/courses")
        }
        Err(err) => service_error_response(
            &req,
            err,
            "change the course status",
            safe_next(next.as_deref(), "/courses"),
        ),
    }
}

#[post("/courses/{course_id}/delete")]
pub async fn delete_course(
    req: HttpRequest,
    course_id: web::Path<String>,
    session: AuthSession,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<ActionForm>,
) -> impl Responder {
    let api = api_for(&client, Some(&session));
    match courses_service::delete_course(&api, &session, &course_id).await {
        Ok(()) => {
            FlashMessage::success("Course deleted.").send();
            redirect_back(form.next.as_deref(), "/courses")
        }
        Err(err) => service_error_response(
            &req,
            err,
            "delete the course",
            safe_next(form.next.as_deref(), "/courses"),
        ),
    }
}

#[get("/courses/{course_id}/sessions")]
pub async fn show_sessions(
    req: HttpRequest,
    course_id: web::Path<String>,
    session: AuthSession,
    query: web::Query<ListQuery>,
    client: web::Data<ApiClient>,
    server_config: web::Data<ServerConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let query = query.into_inner();
    if query.tab() == Some("lessons") {
        return redirect(&format!("/courses/{course_id}/lessons"));
    }
    let api = api_for(&client, Some(&session));
    let page = query.page_request(server_config.default_page_size);
    match courses_service::list_sessions(&api, &session, &course_id, &query, page).await {
        Ok(data) => render_list(&tera, &flash_messages, Some(&session), "courses", &data),
        Err(err) => service_error_response(&req, err, "list sessions", "/courses"),
    }
}

#[post("/courses/{course_id}/sessions")]
pub async fn add_session(
    req: HttpRequest,
    course_id: web::Path<String>,
    session: AuthSession,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<SessionForm>,
) -> impl Responder {
    let back = format!("/courses/{course_id}/sessions");
    let api = api_for(&client, Some(&session));
    match courses_service::create_session(&api, &session, &course_id, form).await {
        Ok(_) => {
            FlashMessage::success("Session created.").send();
            redirect(&back)
        }
        Err(err) => service_error_response(&req, err, "create the session", &back),
    }
}

#[post("/courses/{course_id}/sessions/{session_id}")]
pub async fn save_session(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    session: AuthSession,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<SessionForm>,
) -> impl Responder {
    let (course_id, session_id) = path.into_inner();
    let back = format!("/courses/{course_id}/sessions");
    let api = api_for(&client, Some(&session));
    match courses_service::update_session(&api, &session, &course_id, &session_id, form).await {
        Ok(_) => {
            FlashMessage::success("Session updated.").send();
            redirect(&back)
        }
        Err(err) => service_error_response(&req, err, "update the session", &back),
    }
}

#[post("/sessions/{session_id}/delete")]
pub async fn delete_session(
    req: HttpRequest,
    session_id: web::Path<String>,
    session: AuthSession,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<ActionForm>,
) -> impl Responder {
    let api = api_for(&client, Some(&session));
    let back = form.next.as_deref();
    match courses_service::delete_session(&api, &session, &session_id).await {
        Ok(()) => {
            FlashMessage::success("Session deleted.").send();
            redirect_back(back, "/courses")
        }
        Err(err) => service_error_response(
            &req,
            err,
            "delete the session",
            safe_next(back, "/courses"),
        ),
    }
}

#[get("/courses/{course_id}/lessons")]
pub async fn show_lessons(
    req: HttpRequest,
    course_id: web::Path<String>,
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
    match courses_service::list_lessons(&api, &session, &course_id, &query, page).await {
        Ok(data) => render_list(&tera, &flash_messages, Some(&session), "courses", &data),
        Err(err) => service_error_response(&req, err, "list lessons", "/courses"),
    }
}

#[post("/courses/{course_id}/lessons")]
pub async fn add_lesson(
    req: HttpRequest,
    course_id: web::Path<String>,
    session: AuthSession,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<LessonForm>,
) -> impl Responder {
    let back = format!("/courses/{course_id}/lessons");
    let api = api_for(&client, Some(&session));
    match courses_service::create_lesson(&api, &session, &course_id, form).await {
        Ok(_) => {
            FlashMessage::success("Lesson created.").send();
            redirect(&back)
        }
        Err(err) => service_error_response(&req, err, "create the lesson", &back),
    }
}

#[post("/courses/{course_id}/lessons/{lesson_id}")]
pub async fn save_lesson(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    session: AuthSession,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<LessonForm>,
) -> impl Responder {
    let (course_id, lesson_id) = path.into_inner();
    let back = format!("/courses/{course_id}/lessons");
    let api = api_for(&client, Some(&session));
    match courses_service::update_lesson(&api, &session, &course_id, &lesson_id, form).await {
        Ok(_) => {
            FlashMessage::success("Lesson updated.").send();
            redirect(&back)
        }
        Err(err) => service_error_response(&req, err, "update the lesson", &back),
    }
}

#[post("/lessons/{lesson_id}/delete")]
pub async fn delete_lesson(
    req: HttpRequest,
    lesson_id: web::Path<String>,
    session: AuthSession,
    client: web::Data<ApiClient>,
    web::Form(form): web::Form<ActionForm>,
) -> impl Responder {
    let api = api_for(&client, Some(&session));
    match courses_service::delete_lesson(&api, &session, &lesson_id).await {
        Ok(()) => {
            FlashMessage::success("Lesson deleted.").send();
            redirect_back(form.next.as_deref(), "/courses")
        }
        Err(err) => service_error_response(
            &req,
            err,
            "delete the lesson",
            safe_next(form.next.as_deref(), "/courses"),
        ),
    }
}

#[get("/course-logs")]
pub async fn show_course_logs(
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
    match courses_service::list_course_logs(&api, &session, &query, page).await {
        Ok(data) => render_list(&tera, &flash_messages, Some(&session), "course_logs", &data),
        Err(err) => service_error_response(&req, err, "list course logs", "/"),
    }
}
