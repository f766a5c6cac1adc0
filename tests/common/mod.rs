//! In-process stand-in for the remote JSON API.
#![allow(dead_code)]

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, http::header, web};
use serde_json::{Value, json};

pub const TOKEN: &str = "tok-1";
pub const PASSWORD: &str = "secret1";

fn authorized(req: &HttpRequest) -> bool {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        == Some(format!("Bearer {TOKEN}").as_str())
}

fn page(records: Value, page_num: u64) -> Value {
    sized_page(records, page_num, 10)
}

fn sized_page(records: Value, page_num: u64, page_size: u64) -> Value {
    let total = records.as_array().map(Vec::len).unwrap_or_default();
    json!({
        "pageData": records,
        "pageInfo": {
            "pageNum": page_num,
            "pageSize": page_size,
            "totalItems": total,
            "totalPages": 1
        }
    })
}

async fn search_catalog_courses(body: web::Json<Value>) -> HttpResponse {
    let keyword = body["searchCondition"]["keyword"]
        .as_str()
        .unwrap_or_default()
        .to_string();
    let page_num = body["pageInfo"]["pageNum"].as_u64().unwrap_or(1);
    let page_size = body["pageInfo"]["pageSize"].as_u64().unwrap_or(10);
    let name = if keyword.is_empty() {
        "Algebra".to_string()
    } else {
        format!("Algebra {keyword}")
    };
    HttpResponse::Ok().json(json!({
        "success": true,
        "data": sized_page(
            json!([{ "_id": "c1", "name": name, "status": "active", "price": 100000.0 }]),
            page_num,
            page_size,
        )
    }))
}

async fn search_catalog_categories() -> HttpResponse {
    HttpResponse::Ok().json(page(json!([{ "_id": "math", "name": "Math" }]), 1))
}

async fn get_catalog_course(id: web::Path<String>) -> HttpResponse {
    match id.as_str() {
        "missing" => HttpResponse::NotFound().json(json!({ "message": "Course not found" })),
        "archived" => {
            HttpResponse::UnprocessableEntity().json(json!({ "message": "Course is archived" }))
        }
        _ => HttpResponse::Ok().json(json!({ "_id": id.as_str(), "name": "Algebra", "status": "active" })),
    }
}

async fn login(body: web::Json<Value>) -> HttpResponse {
    if body["password"] == PASSWORD {
        HttpResponse::Ok().json(json!({ "token": TOKEN }))
    } else {
        HttpResponse::Unauthorized().json(json!({ "message": "Invalid credentials" }))
    }
}

async fn current_user(req: HttpRequest) -> HttpResponse {
    if !authorized(&req) {
        return HttpResponse::Unauthorized().finish();
    }
    HttpResponse::Ok().json(json!({
        "success": true,
        "data": { "_id": "u1", "name": "Lan", "email": "lan@example.com", "role": "student" }
    }))
}

async fn logout() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "success": true }))
}

async fn search_cart(req: HttpRequest) -> HttpResponse {
    if !authorized(&req) {
        return HttpResponse::Unauthorized().finish();
    }
    HttpResponse::Ok().json(page(
        json!([{
            "_id": "i1",
            "cart_no": "CART_1",
            "status": "new",
            "course_name": "Geometry",
            "price": 50000.0,
            "price_paid": 50000.0
        }]),
        1,
    ))
}

/// Paid items cannot leave the cart.
async fn remove_cart_item(req: HttpRequest) -> HttpResponse {
    if !authorized(&req) {
        return HttpResponse::Unauthorized().finish();
    }
    HttpResponse::UnprocessableEntity().json(json!({ "message": "Paid items cannot be removed" }))
}

/// Starts the fake backend on an ephemeral port and returns its base url.
pub async fn spawn_backend() -> String {
    let server = HttpServer::new(|| {
        App::new()
            .route("/api/client/course/search", web::post().to(search_catalog_courses))
            .route("/api/client/course/{id}", web::get().to(get_catalog_course))
            .route("/api/client/category/search", web::post().to(search_catalog_categories))
            .route("/api/auth", web::post().to(login))
            .route("/api/auth", web::get().to(current_user))
            .route("/api/auth/logout", web::get().to(logout))
            .route("/api/cart/search", web::post().to(search_cart))
            .route("/api/cart/{id}", web::delete().to(remove_cart_item))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("bind fake backend");
    let address = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{address}")
}
