//! Public catalog: course search, course and blog pages. Every function
//! accepts an anonymous visitor.

use crate::api::blog::{BlogSearch, CatalogBlogs};
use crate::api::course::{CatalogCourseSearch, CatalogCourses};
use crate::api::{BlogReader, CartWriter, CategoryReader, CourseReader};
use crate::domain::blog::Blog;
use crate::domain::course::Course;
use crate::domain::role::{Capability, Role};
use crate::domain::session::AuthSession;
use crate::dto::detail::{BlogDetailData, CourseDetailData};
use crate::dto::list::{FilterField, ListPageData, ListQuery};
use crate::forms::parse_id;
use crate::pagination::PageRequest;
use crate::render::table::{ActionDef, Cell, TableSpec};
use crate::services::categories::category_options;
use crate::services::{ServiceError, ServiceResult, browse, ensure_capability, mutation_failed};

fn catalog_table() -> TableSpec<Course> {
    TableSpec::<Course>::new()
        .column("Image", |course| Cell::image(course.image_url.as_deref(), &course.name))
        .column("Course", |course| {
            Cell::link(&course.name, format!("/catalog/courses/{}", course.id))
        })
        .column("Instructor", |course| {
            Cell::opt_text(course.instructor_name.as_deref())
        })
        .column("Category", |course| Cell::opt_text(course.category_name.as_deref()))
        .column("Price", |course| Cell::currency(course.price))
        .column("Rating", |course| match course.average_rating {
            Some(rating) => Cell::text(format!("{rating:.1} ★")),
            None => Cell::text(""),
        })
        .action(
            ActionDef::new("Add to cart", Capability::UseCart, |_: &Course| "/cart".to_string())
                .style("outline-success")
                .when(|course| !course.is_purchased && !course.is_in_cart)
                .fields(|course| vec![("course_id", course.id.to_string())]),
        )
}

fn blog_table() -> TableSpec<Blog> {
    TableSpec::<Blog>::new()
        .column("Image", |blog| Cell::image(blog.image_url.as_deref(), &blog.name))
        .column("Title", |blog| Cell::link(&blog.name, format!("/blogs/{}", blog.id)))
        .column("Category", |blog| Cell::opt_text(blog.category_name.as_deref()))
        .column("Summary", |blog| Cell::opt_text(blog.description.as_deref()))
        .column("Published", |blog| Cell::date(blog.created_at.as_ref()))
}

fn role_of(session: Option<&AuthSession>) -> Option<Role> {
    session.map(AuthSession::role)
}

/// Home page course search.
pub async fn search_courses<A>(
    api: &A,
    session: Option<&AuthSession>,
    query: &ListQuery,
    page: PageRequest,
) -> ServiceResult<ListPageData>
where
    A: CourseReader + CategoryReader + ?Sized,
{
    let condition = CatalogCourseSearch::default()
        .keyword(query.keyword())
        .category(query.category().unwrap_or_default());
    let browser = browse::<CatalogCourses, _, _>(condition, page, |condition, page| async move {
        api.search_catalog_courses(&condition, page).await
    })
    .await?;

    let mut categories = vec![(String::new(), "All categories".to_string())];
    categories.extend(category_options(api).await);

    Ok(ListPageData::new(
        "Courses",
        "/",
        &browser,
        &catalog_table(),
        role_of(session),
        query,
    )
    .filters(vec![
        FilterField::keyword(query, "What do you want to learn?"),
        FilterField::select("category", "Category", query.category(), categories),
    ]))
}

pub async fn course_detail<A>(
    api: &A,
    session: Option<&AuthSession>,
    course_id: &str,
) -> ServiceResult<CourseDetailData>
where
    A: CourseReader + ?Sized,
{
    let course_id = parse_id(course_id)?;
    let course = api.get_catalog_course(&course_id).await.map_err(|err| {
        log::error!("Failed to load course {course_id}: {err}");
        ServiceError::from(err)
    })?;
    let is_student = session.is_some_and(|session| session.can(Capability::UseCart));
    Ok(CourseDetailData::new(course, is_student))
}

pub async fn add_to_cart<A>(api: &A, session: &AuthSession, course_id: &str) -> ServiceResult<()>
where
    A: CartWriter + ?Sized,
{
    ensure_capability(session, Capability::UseCart)?;

    let course_id = parse_id(course_id)?;
    api.add_to_cart(&course_id)
        .await
        .map_err(|err| mutation_failed("add course to cart", err))
}

pub async fn search_blogs<A>(
    api: &A,
    session: Option<&AuthSession>,
    query: &ListQuery,
    page: PageRequest,
) -> ServiceResult<ListPageData>
where
    A: BlogReader + CategoryReader + ?Sized,
{
    let condition = BlogSearch::default().category(query.category().unwrap_or_default());
    let browser = browse::<CatalogBlogs, _, _>(condition, page, |condition, page| async move {
        api.search_catalog_blogs(&condition, page).await
    })
    .await?;

    let mut categories = vec![(String::new(), "All categories".to_string())];
    categories.extend(category_options(api).await);

    Ok(ListPageData::new(
        "Blogs",
        "/blogs",
        &browser,
        &blog_table(),
        role_of(session),
        query,
    )
    .filters(vec![FilterField::select(
        "category",
        "Category",
        query.category(),
        categories,
    )]))
}

pub async fn blog_detail<A>(api: &A, blog_id: &str) -> ServiceResult<BlogDetailData>
where
    A: BlogReader + ?Sized,
{
    let blog_id = parse_id(blog_id)?;
    let blog = api.get_catalog_blog(&blog_id).await.map_err(|err| {
        log::error!("Failed to load blog {blog_id}: {err}");
        ServiceError::from(err)
    })?;
    Ok(BlogDetailData::from(blog))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::api::mock::MockApi;
    use crate::domain::session::test_session;
    use crate::services::test_support::page_of;

    fn course(id: &str, in_cart: bool) -> Course {
        serde_json::from_value(serde_json::json!({
            "_id": id,
            "name": "Algebra",
            "status": "active",
            "price": 1_250_000.0,
            "average_rating": 4.5,
            "is_in_cart": in_cart
        }))
        .unwrap()
    }

    fn catalog_api(courses: Vec<Course>) -> MockApi {
        let mut api = MockApi::new();
        let total = courses.len();
        api.expect_search_catalog_courses()
            .times(1)
            .returning(move |_, _| Ok(page_of(courses.clone(), 1, 10, total)));
        api.expect_search_catalog_categories()
            .returning(|_, _| Ok(page_of(Vec::new(), 1, 100, 0)));
        api
    }

    /// Ensures anonymous visitors get rows without actions.
    #[actix_web::test]
    async fn visitors_browse_without_actions() {
        let api = catalog_api(vec![course("c1", false)]);

        let data = search_courses(&api, None, &ListQuery::default(), PageRequest::first(10))
            .await
            .unwrap();

        assert!(!data.table.has_actions);
        assert_eq!(data.table.rows[0].cells[4], Cell::text("1.250.000 ₫"));
        assert_eq!(data.table.rows[0].cells[5], Cell::text("4.5 ★"));
    }

    #[actix_web::test]
    async fn students_add_courses_not_yet_in_cart() {
        let api = catalog_api(vec![course("c1", false), course("c2", true)]);
        let session = test_session(Role::Student);

        let data = search_courses(&api, Some(&session), &ListQuery::default(), PageRequest::first(10))
            .await
            .unwrap();

        assert_eq!(data.table.rows[0].actions[0].fields[0].value, "c1");
        assert!(data.table.rows[1].actions.is_empty());
    }

    #[actix_web::test]
    async fn keyword_reaches_catalog_search() {
        let mut api = MockApi::new();
        api.expect_search_catalog_courses()
            .withf(|condition, page| {
                condition.keyword == "algebra" && condition.category_id == "math" && page.page_num() == 2
            })
            .times(1)
            .returning(|_, _| Ok(page_of(Vec::new(), 2, 10, 0)));
        api.expect_search_catalog_categories()
            .returning(|_, _| Ok(page_of(Vec::new(), 1, 100, 0)));
        let query = ListQuery {
            keyword: Some("algebra".into()),
            category: Some("math".into()),
            ..ListQuery::default()
        };

        search_courses(&api, None, &query, PageRequest::from_query(Some(2), None, 10))
            .await
            .unwrap();
    }

    #[actix_web::test]
    async fn missing_course_is_not_found() {
        let mut api = MockApi::new();
        api.expect_get_catalog_course()
            .returning(|_| Err(ApiError::NotFound));

        let result = course_detail(&api, None, "nope").await;
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[actix_web::test]
    async fn instructors_cannot_buy() {
        let mut api = MockApi::new();
        api.expect_add_to_cart().times(0);
        let session = test_session(Role::Instructor);

        let result = add_to_cart(&api, &session, "c1").await;
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[actix_web::test]
    async fn blog_detail_sanitizes_content() {
        let mut api = MockApi::new();
        api.expect_get_catalog_blog().returning(|_| {
            Ok(serde_json::from_value(serde_json::json!({
                "_id": "b1",
                "name": "News",
                "content": "<p>Hi</p><script>alert(1)</script>"
            }))
            .unwrap())
        });

        let data = blog_detail(&api, "b1").await.unwrap();
        assert_eq!(data.content_html, "<p>Hi</p>");
    }
}
