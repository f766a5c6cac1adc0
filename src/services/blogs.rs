use crate::api::blog::{BlogSearch, Blogs};
use crate::api::{BlogReader, BlogWriter, CategoryReader};
use crate::domain::blog::{Blog, BlogPayload};
use crate::domain::role::Capability;
use crate::domain::session::AuthSession;
use crate::dto::list::{CreatePanel, FilterField, FormField, InputKind, ListPageData, ListQuery};
use crate::forms::blogs::BlogForm;
use crate::forms::parse_id;
use crate::pagination::PageRequest;
use crate::render::table::{ActionDef, Cell, TableSpec};
use crate::services::categories::category_options;
use crate::services::{ServiceError, ServiceResult, browse, ensure_capability, mutation_failed};

fn blog_table() -> TableSpec<Blog> {
    TableSpec::<Blog>::new()
        .column("Image", |blog| Cell::image(blog.image_url.as_deref(), &blog.name))
        .column("Name", |blog| Cell::link(&blog.name, format!("/blogs/{}", blog.id)))
        .column("Category", |blog| Cell::opt_text(blog.category_name.as_deref()))
        .column("Author", |blog| Cell::opt_text(blog.user_name.as_deref()))
        .column("Created At", |blog| Cell::date(blog.created_at.as_ref()))
        .action(
            ActionDef::new("Delete", Capability::ManageBlogs, |blog: &Blog| {
                format!("/admin/blogs/{}/delete", blog.id)
            })
            .style("outline-danger")
            .confirm("Delete this blog?"),
        )
}

pub async fn list_blogs<A>(
    api: &A,
    session: &AuthSession,
    query: &ListQuery,
    page: PageRequest,
) -> ServiceResult<ListPageData>
where
    A: BlogReader + CategoryReader + ?Sized,
{
    ensure_capability(session, Capability::ManageBlogs)?;

    let condition = BlogSearch::default().category(query.category().unwrap_or_default());
    let browser = browse::<Blogs, _, _>(condition, page, |condition, page| async move {
        api.search_blogs(&condition, page).await
    })
    .await?;

    let options = category_options(api).await;
    let mut categories = vec![(String::new(), "All categories".to_string())];
    categories.extend(options.iter().cloned());

    Ok(ListPageData::new(
        "Blog Management",
        "/admin/blogs",
        &browser,
        &blog_table(),
        Some(session.role()),
        query,
    )
    .filters(vec![FilterField::select(
        "category",
        "Category",
        query.category(),
        categories,
    )])
    .create(CreatePanel::new(
        "New blog",
        "/admin/blogs",
        vec![
            FormField::new("name", "Title", InputKind::Text).required(),
            FormField::new("category_id", "Category", InputKind::Select)
                .options(options)
                .required(),
            FormField::new("image_url", "Image url", InputKind::Url).required(),
            FormField::new("description", "Summary", InputKind::Textarea),
            FormField::new("content", "Content", InputKind::Textarea).required(),
        ],
    )))
}

pub async fn create_blog<A>(api: &A, session: &AuthSession, form: BlogForm) -> ServiceResult<Blog>
where
    A: BlogWriter + ?Sized,
{
    ensure_capability(session, Capability::ManageBlogs)?;

    let payload = BlogPayload::try_from(form).map_err(|err| {
        log::error!("Failed to validate blog form: {err}");
        ServiceError::from(err)
    })?;
    api.create_blog(&payload)
        .await
        .map_err(|err| mutation_failed("create blog", err))
}

pub async fn update_blog<A>(
    api: &A,
    session: &AuthSession,
    blog_id: &str,
    form: BlogForm,
) -> ServiceResult<Blog>
where
    A: BlogWriter + ?Sized,
{
    ensure_capability(session, Capability::ManageBlogs)?;

    let blog_id = parse_id(blog_id)?;
    let payload = BlogPayload::try_from(form)?;
    api.update_blog(&blog_id, &payload)
        .await
        .map_err(|err| mutation_failed("update blog", err))
}

pub async fn delete_blog<A>(api: &A, session: &AuthSession, blog_id: &str) -> ServiceResult<()>
where
    A: BlogWriter + ?Sized,
{
    ensure_capability(session, Capability::ManageBlogs)?;

    let blog_id = parse_id(blog_id)?;
    api.delete_blog(&blog_id)
        .await
        .map_err(|err| mutation_failed("delete blog", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::api::mock::MockApi;
    use crate::domain::role::Role;
    use crate::domain::session::test_session;
    use crate::services::test_support::page_of;

    fn blog_form(image_url: &str) -> BlogForm {
        BlogForm {
            name: "Why Rust".into(),
            category_id: "c1".into(),
            image_url: image_url.into(),
            description: String::new(),
            content: "<p>Because</p>".into(),
        }
    }

    #[actix_web::test]
    async fn list_blogs_by_category() {
        let mut api = MockApi::new();
        api.expect_search_blogs()
            .withf(|condition, _| condition.category_id == "c1")
            .times(1)
            .returning(|_, _| Ok(page_of(Vec::new(), 1, 10, 0)));
        api.expect_search_catalog_categories()
            .returning(|_, _| Ok(page_of(Vec::new(), 1, 100, 0)));
        let session = test_session(Role::Admin);
        let query = ListQuery {
            category: Some("c1".into()),
            ..ListQuery::default()
        };

        let data = list_blogs(&api, &session, &query, PageRequest::first(10))
            .await
            .unwrap();
        assert!(data.table.rows.is_empty());
        assert_eq!(data.filters[0].options.len(), 1);
    }

    #[actix_web::test]
    async fn students_cannot_manage_blogs() {
        let mut api = MockApi::new();
        api.expect_search_blogs().times(0);
        let session = test_session(Role::Student);

        let result = list_blogs(&api, &session, &ListQuery::default(), PageRequest::first(10)).await;
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[actix_web::test]
    async fn create_rejects_bad_image_url() {
        let mut api = MockApi::new();
        api.expect_create_blog().times(0);
        let session = test_session(Role::Admin);

        let result = create_blog(&api, &session, blog_form("not a url")).await;
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    /// Ensures backend messages reach the user.
    #[actix_web::test]
    async fn delete_reports_backend_message() {
        let mut api = MockApi::new();
        api.expect_delete_blog().times(1).returning(|_| {
            Err(ApiError::Rejected {
                status: 409,
                message: "Blog is referenced".into(),
            })
        });
        let session = test_session(Role::Admin);

        let result = delete_blog(&api, &session, "b1").await;
        assert!(matches!(result, Err(ServiceError::Upstream(m)) if m == "Blog is referenced"));
    }
}
