use crate::api::category::{CatalogCategorySearch, Categories, CategorySearch};
use crate::api::{CategoryReader, CategoryWriter};
use crate::domain::category::{Category, CategoryPayload};
use crate::domain::role::Capability;
use crate::domain::session::AuthSession;
use crate::dto::list::{CreatePanel, FilterField, FormField, InputKind, ListPageData, ListQuery};
use crate::forms::categories::CategoryForm;
use crate::forms::parse_id;
use crate::pagination::{MAX_PAGE_SIZE, PageRequest};
use crate::render::table::{ActionDef, Cell, TableSpec};
use crate::services::{ServiceError, ServiceResult, browse, ensure_capability, mutation_failed};

fn category_table() -> TableSpec<Category> {
    TableSpec::<Category>::new()
        .column("Name", |category| Cell::text(&category.name))
        .column("Description", |category| {
            Cell::opt_text(category.description.as_deref())
        })
        .column("Created At", |category| Cell::date(category.created_at.as_ref()))
        .action(
            ActionDef::new("Rename", Capability::ManageCategories, |category: &Category| {
                format!("/admin/categories/{}", category.id)
            })
            .fields(|category| {
                vec![
                    ("description", category.description.clone().unwrap_or_default()),
                    (
                        "parent_category_id",
                        category.parent_category_id.clone().unwrap_or_default(),
                    ),
                ]
            })
            .input("name", "New name"),
        )
        .action(
            ActionDef::new("Delete", Capability::ManageCategories, |category: &Category| {
                format!("/admin/categories/{}/delete", category.id)
            })
            .style("outline-danger")
            .confirm("Delete this category?"),
        )
}

/// `(id, name)` pairs for category selects. A failed lookup yields no
/// options rather than failing the page.
pub async fn category_options<A>(api: &A) -> Vec<(String, String)>
where
    A: CategoryReader + ?Sized,
{
    match api
        .search_catalog_categories(
            &CatalogCategorySearch::default(),
            PageRequest::first(MAX_PAGE_SIZE),
        )
        .await
    {
        Ok(page) => page
            .page_data
            .into_iter()
            .map(|category| (category.id.into_inner(), category.name))
            .collect(),
        Err(err) => {
            log::error!("Failed to load category options: {err}");
            Vec::new()
        }
    }
}

pub async fn list_categories<A>(
    api: &A,
    session: &AuthSession,
    query: &ListQuery,
    page: PageRequest,
) -> ServiceResult<ListPageData>
where
    A: CategoryReader + ?Sized,
{
    ensure_capability(session, Capability::ManageCategories)?;

    let condition = CategorySearch::default()
        .keyword(query.keyword())
        .parent(query.category().unwrap_or_default());
    let browser = browse::<Categories, _, _>(condition, page, |condition, page| async move {
        api.search_categories(&condition, page).await
    })
    .await?;

    let options = category_options(api).await;
    let mut parents = vec![(String::new(), "All categories".to_string())];
    parents.extend(options.iter().cloned());
    let mut parent_choices = vec![(String::new(), "None".to_string())];
    parent_choices.extend(options);

    Ok(ListPageData::new(
        "Category Management",
        "/admin/categories",
        &browser,
        &category_table(),
        Some(session.role()),
        query,
    )
    .filters(vec![
        FilterField::keyword(query, "Search by name"),
        FilterField::select("category", "Parent", query.category(), parents),
    ])
    .create(CreatePanel::new(
        "New category",
        "/admin/categories",
        vec![
            FormField::new("name", "Name", InputKind::Text).required(),
            FormField::new("description", "Description", InputKind::Textarea),
            FormField::new("parent_category_id", "Parent", InputKind::Select)
                .options(parent_choices),
        ],
    )))
}

pub async fn create_category<A>(
    api: &A,
    session: &AuthSession,
    form: CategoryForm,
) -> ServiceResult<Category>
where
    A: CategoryWriter + ?Sized,
{
    ensure_capability(session, Capability::ManageCategories)?;

    let payload = CategoryPayload::try_from(form).map_err(|err| {
        log::error!("Failed to validate category form: {err}");
        ServiceError::from(err)
    })?;
    api.create_category(&payload)
        .await
        .map_err(|err| mutation_failed("create category", err))
}

pub async fn update_category<A>(
    api: &A,
    session: &AuthSession,
    category_id: &str,
    form: CategoryForm,
) -> ServiceResult<Category>
where
    A: CategoryWriter + ?Sized,
{
    ensure_capability(session, Capability::ManageCategories)?;

    let category_id = parse_id(category_id)?;
    let payload = CategoryPayload::try_from(form)?;
    if payload.parent_category_id.as_ref() == Some(&category_id) {
        return Err(ServiceError::Form(
            "A category cannot be its own parent".to_string(),
        ));
    }
    api.update_category(&category_id, &payload)
        .await
        .map_err(|err| mutation_failed("update category", err))
}

pub async fn delete_category<A>(
    api: &A,
    session: &AuthSession,
    category_id: &str,
) -> ServiceResult<()>
where
    A: CategoryWriter + ?Sized,
{
    ensure_capability(session, Capability::ManageCategories)?;

    let category_id = parse_id(category_id)?;
    api.delete_category(&category_id)
        .await
        .map_err(|err| mutation_failed("delete category", err))
}
