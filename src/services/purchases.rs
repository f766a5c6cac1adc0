use crate::api::PurchaseReader;
use crate::api::purchase::{PurchaseScope, PurchaseSearch, Purchases};
use crate::domain::purchase::Purchase;
use crate::domain::role::Capability;
use crate::domain::session::AuthSession;
use crate::dto::list::{FilterField, ListPageData, ListQuery};
use crate::pagination::PageRequest;
use crate::render::table::{ActionDef, Cell, TableSpec};
use crate::services::{ServiceResult, browse, ensure_capability};

const PURCHASE_STATUSES: &[&str] = &["new", "request_paid", "completed"];

fn purchase_table() -> TableSpec<Purchase> {
    TableSpec::<Purchase>::new()
        .column("Purchase No", |purchase| Cell::text(&purchase.purchase_no))
        .column("Cart No", |purchase| Cell::opt_text(purchase.cart_no.as_deref()))
        .column("Course", |purchase| Cell::opt_text(purchase.course_name.as_deref()))
        .column("Student", |purchase| {
            Cell::opt_text(purchase.student_name.as_deref())
        })
        .column("Price", |purchase| Cell::currency(purchase.price))
        .column("Discount", |purchase| Cell::text(format!("{}%", purchase.discount)))
        .column("Price Paid", |purchase| Cell::currency(purchase.price_paid))
        .column("Status", |purchase| Cell::badge(&purchase.status))
        .column("Created At", |purchase| Cell::date(purchase.created_at.as_ref()))
        .action(
            ActionDef::new("Create payout", Capability::RequestPayouts, |_: &Purchase| {
                "/payouts".to_string()
            })
            .when(|purchase| purchase.status == "new")
            .fields(|purchase| vec![("purchase_id", purchase.id.to_string())]),
        )
}

/// Purchases the caller may see: all for admins, sales for instructors,
/// own orders for students.
pub async fn list_purchases<A>(
    api: &A,
    session: &AuthSession,
    query: &ListQuery,
    page: PageRequest,
) -> ServiceResult<ListPageData>
where
    A: PurchaseReader + ?Sized,
{
    ensure_capability(session, Capability::ViewPurchases)?;

    let scope = PurchaseScope::from(session.role());
    let condition = PurchaseSearch::default()
        .purchase_no(query.keyword())
        .status(query.status().unwrap_or_default());
    let browser = browse::<Purchases, _, _>(condition, page, |condition, page| async move {
        api.search_purchases(scope, &condition, page).await
    })
    .await?;

    let mut statuses = vec![(String::new(), "All statuses".to_string())];
    statuses.extend(
        PURCHASE_STATUSES
            .iter()
            .map(|status| (status.to_string(), status.to_uppercase())),
    );

    Ok(ListPageData::new(
        "Purchases",
        "/purchases",
        &browser,
        &purchase_table(),
        Some(session.role()),
        query,
    )
    .filters(vec![
        FilterField::keyword(query, "Search by purchase no"),
        FilterField::select("status", "Status", query.status(), statuses),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockApi;
    use crate::domain::role::Role;
    use crate::domain::session::test_session;
    use crate::services::test_support::page_of;

    fn purchase(id: &str, status: &str) -> Purchase {
        serde_json::from_value(serde_json::json!({
            "_id": id,
            "purchase_no": format!("PU_{id}"),
            "status": status,
            "price_paid": 90_000.0
        }))
        .unwrap()
    }

    /// Ensures each role reaches its own purchase endpoint.
    #[actix_web::test]
    async fn scope_follows_role() {
        for (role, scope) in [
            (Role::Admin, PurchaseScope::Admin),
            (Role::Instructor, PurchaseScope::Instructor),
            (Role::Student, PurchaseScope::Student),
        ] {
            let mut api = MockApi::new();
            api.expect_search_purchases()
                .withf(move |actual, _, _| *actual == scope)
                .times(1)
                .returning(|_, _, _| Ok(page_of(Vec::new(), 1, 10, 0)));

            list_purchases(&api, &test_session(role), &ListQuery::default(), PageRequest::first(10))
                .await
                .unwrap();
        }
    }

    #[actix_web::test]
    async fn instructors_can_bundle_new_purchases() {
        let mut api = MockApi::new();
        api.expect_search_purchases().returning(|_, _, _| {
            Ok(page_of(
                vec![purchase("a", "new"), purchase("b", "completed")],
                1,
                10,
                2,
            ))
        });
        let session = test_session(Role::Instructor);

        let data = list_purchases(&api, &session, &ListQuery::default(), PageRequest::first(10))
            .await
            .unwrap();

        let action = &data.table.rows[0].actions[0];
        assert_eq!(action.url, "/payouts");
        assert_eq!(action.fields[0].value, "a");
        assert!(data.table.rows[1].actions.is_empty());
    }

    #[actix_web::test]
    async fn students_see_no_payout_action() {
        let mut api = MockApi::new();
        api.expect_search_purchases()
            .withf(|_, condition, _| condition.status == "completed")
            .returning(|_, _, _| Ok(page_of(vec![purchase("a", "new")], 1, 10, 1)));
        let session = test_session(Role::Student);
        let query = ListQuery {
            status: Some("completed".into()),
            ..ListQuery::default()
        };

        let data = list_purchases(&api, &session, &query, PageRequest::first(10))
            .await
            .unwrap();
        assert!(!data.table.has_actions);
    }
}
