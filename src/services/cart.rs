use crate::api::cart::{CartItems, CartSearch};
use crate::api::{CartReader, CartWriter};
use crate::domain::cart::{CartItem, CartStatus, CartStatusChange};
use crate::domain::role::Capability;
use crate::domain::session::AuthSession;
use crate::dto::list::{CreatePanel, ListPageData, ListQuery, Tab};
use crate::forms::cart::CartItemStatusForm;
use crate::forms::parse_id;
use crate::pagination::{MAX_PAGE_SIZE, PageRequest};
use crate::render::table::{ActionDef, Cell, TableSpec};
use crate::services::{ServiceError, ServiceResult, browse, ensure_capability, mutation_failed};

const CART_TABS: &[(&str, &str)] = &[
    ("new", "Cart"),
    ("waiting_paid", "Waiting payment"),
    ("completed", "Completed"),
    ("cancel", "Cancelled"),
];

fn parse_status(value: &str) -> Option<CartStatus> {
    [
        CartStatus::New,
        CartStatus::Cancel,
        CartStatus::WaitingPaid,
        CartStatus::Completed,
    ]
    .into_iter()
    .find(|status| status.as_str() == value)
}

fn cart_table() -> TableSpec<CartItem> {
    TableSpec::<CartItem>::new()
        .column("Image", |item| {
            Cell::image(
                item.course_image.as_deref(),
                item.course_name.as_deref().unwrap_or_default(),
            )
        })
        .column("Course", |item| Cell::opt_text(item.course_name.as_deref()))
        .column("Instructor", |item| Cell::opt_text(item.instructor_name.as_deref()))
        .column("Price", |item| Cell::currency(item.price))
        .column("Discount", |item| Cell::text(format!("{}%", item.discount)))
        .column("Price Paid", |item| Cell::currency(item.price_paid))
        .column("Status", |item| Cell::badge(item.status.as_str()))
        .action(
            ActionDef::new("Remove", Capability::UseCart, |item: &CartItem| {
                format!("/cart/{}/delete", item.id)
            })
            .style("outline-danger")
            .when(|item| item.status.is_open())
            .confirm("Remove this course from the cart?"),
        )
        .action(
            ActionDef::new("Pay", Capability::UseCart, |item: &CartItem| {
                format!("/cart/{}/status", item.id)
            })
            .style("outline-success")
            .when(|item| item.status == CartStatus::WaitingPaid)
            .fields(|item| {
                vec![
                    ("cart_no", item.cart_no.clone()),
                    ("status", CartStatus::Completed.as_str().to_string()),
                ]
            }),
        )
        .action(
            ActionDef::new("Cancel", Capability::UseCart, |item: &CartItem| {
                format!("/cart/{}/status", item.id)
            })
            .style("outline-secondary")
            .when(|item| item.status == CartStatus::WaitingPaid)
            .fields(|item| {
                vec![
                    ("cart_no", item.cart_no.clone()),
                    ("status", CartStatus::Cancel.as_str().to_string()),
                ]
            }),
        )
}

pub async fn list_cart<A>(
    api: &A,
    session: &AuthSession,
    query: &ListQuery,
    page: PageRequest,
) -> ServiceResult<ListPageData>
where
    A: CartReader + ?Sized,
{
    ensure_capability(session, Capability::UseCart)?;

    let tab = query.tab().unwrap_or("new");
    let condition = CartSearch::default().status(parse_status(tab));
    let browser = browse::<CartItems, _, _>(condition, page, |condition, page| async move {
        api.search_cart(&condition, page).await
    })
    .await?;

    let data = ListPageData::new(
        "Cart",
        "/cart",
        &browser,
        &cart_table(),
        Some(session.role()),
        query,
    )
    .tabs(Tab::set(tab, CART_TABS));

    if tab == "new" && !data.table.rows.is_empty() {
        return Ok(data.create(CreatePanel::new("Check out", "/cart/checkout", Vec::new())));
    }
    Ok(data)
}

/// Moves every open item to waiting payment. Returns how many moved.
pub async fn checkout<A>(api: &A, session: &AuthSession) -> ServiceResult<usize>
where
    A: CartReader + CartWriter + ?Sized,
{
    ensure_capability(session, Capability::UseCart)?;

    let items = api
        .search_cart(&CartSearch::default(), PageRequest::first(MAX_PAGE_SIZE))
        .await
        .map_err(|err| {
            log::error!("Failed to load cart for checkout: {err}");
            ServiceError::from(err)
        })?
        .page_data;

    let change = CartStatusChange::for_open_items(CartStatus::WaitingPaid, &items);
    if change.items.is_empty() {
        return Err(ServiceError::Form("Your cart is empty".to_string()));
    }
    api.update_cart_status(&change)
        .await
        .map_err(|err| mutation_failed("check out cart", err))?;
    Ok(change.items.len())
}

/// Pays for or cancels one item waiting for payment.
pub async fn update_item_status<A>(
    api: &A,
    session: &AuthSession,
    item_id: &str,
    form: CartItemStatusForm,
) -> ServiceResult<CartStatus>
where
    A: CartWriter + ?Sized,
{
    ensure_capability(session, Capability::UseCart)?;

    if !matches!(form.status, CartStatus::Completed | CartStatus::Cancel) {
        return Err(ServiceError::Form(format!(
            "A cart item cannot be moved to {}",
            form.status.as_str()
        )));
    }
    let change = form.into_change(parse_id(item_id)?);
    api.update_cart_status(&change)
        .await
        .map_err(|err| mutation_failed("update cart item", err))?;
    Ok(change.status)
}

pub async fn remove_item<A>(api: &A, session: &AuthSession, item_id: &str) -> ServiceResult<()>
where
    A: CartWriter + ?Sized,
{
    ensure_capability(session, Capability::UseCart)?;

    let item_id = parse_id(item_id)?;
    api.remove_cart_item(&item_id)
        .await
        .map_err(|err| mutation_failed("remove cart item", err))
}
