use crate::api::payout::{PayoutSearch, Payouts};
use crate::api::{PayoutReader, PayoutWriter};
use crate::domain::payout::{NewPayout, Payout, PayoutStatus, PayoutStatusChange};
use crate::domain::role::Capability;
use crate::domain::session::AuthSession;
use crate::dto::list::{FilterField, ListPageData, ListQuery};
use crate::forms::parse_id;
use crate::forms::payouts::{NewPayoutForm, PayoutStatusForm};
use crate::pagination::PageRequest;
use crate::render::table::{ActionDef, Cell, TableSpec};
use crate::services::{ServiceError, ServiceResult, browse, ensure_capability, mutation_failed};

const PAYOUT_STATUSES: [PayoutStatus; 4] = [
    PayoutStatus::New,
    PayoutStatus::RequestPayout,
    PayoutStatus::Completed,
    PayoutStatus::Rejected,
];

fn parse_status(value: &str) -> Option<PayoutStatus> {
    PAYOUT_STATUSES
        .into_iter()
        .find(|status| status.as_str() == value)
}

fn payout_table() -> TableSpec<Payout> {
    TableSpec::<Payout>::new()
        .column("Payout No", |payout| Cell::text(&payout.payout_no))
        .column("Instructor", |payout| {
            Cell::opt_text(payout.instructor_name.as_deref())
        })
        .column("Purchases", |payout| Cell::text(payout.transactions.len().to_string()))
        .column("Total", |payout| Cell::currency(payout.balance_origin))
        .column("Instructor Share", |payout| {
            Cell::currency(payout.balance_instructor_paid)
        })
        .column("Received", |payout| {
            Cell::currency(payout.balance_instructor_received)
        })
        .column("Status", |payout| Cell::badge(payout.status.as_str()))
        .column("Created At", |payout| Cell::date(payout.created_at.as_ref()))
        .action(
            ActionDef::new("Request payout", Capability::RequestPayouts, |payout: &Payout| {
                format!("/payouts/{}/status", payout.id)
            })
            .when(|payout| matches!(payout.status, PayoutStatus::New | PayoutStatus::Rejected))
            .fields(|_| vec![("status", "request_payout".to_string())]),
        )
        .action(
            ActionDef::new("Complete", Capability::ManagePayouts, |payout: &Payout| {
                format!("/payouts/{}/status", payout.id)
            })
            .style("outline-success")
            .when(|payout| payout.status == PayoutStatus::RequestPayout)
            .fields(|_| vec![("status", "completed".to_string())])
            .confirm("Mark this payout as paid?"),
        )
        .action(
            ActionDef::new("Reject", Capability::ManagePayouts, |payout: &Payout| {
                format!("/payouts/{}/status", payout.id)
            })
            .style("outline-danger")
            .when(|payout| payout.status == PayoutStatus::RequestPayout)
            .fields(|_| vec![("status", "rejected".to_string())])
            .input("comment", "Reason"),
        )
}

/// Admins see every payout, instructors only their own.
pub async fn list_payouts<A>(
    api: &A,
    session: &AuthSession,
    query: &ListQuery,
    page: PageRequest,
) -> ServiceResult<ListPageData>
where
    A: PayoutReader + ?Sized,
{
    let admin = session.can(Capability::ManagePayouts);
    if !admin {
        ensure_capability(session, Capability::RequestPayouts)?;
    }

    let condition = PayoutSearch::default()
        .payout_no(query.keyword())
        .status(query.status().and_then(parse_status))
        .own(!admin);
    let browser = browse::<Payouts, _, _>(condition, page, |condition, page| async move {
        api.search_payouts(&condition, page).await
    })
    .await?;

    let mut statuses = vec![(String::new(), "All statuses".to_string())];
    statuses.extend(
        PAYOUT_STATUSES
            .iter()
            .map(|status| (status.as_str().to_string(), status.as_str().to_uppercase())),
    );

    Ok(ListPageData::new(
        if admin { "Payout Management" } else { "Payout" },
        "/payouts",
        &browser,
        &payout_table(),
        Some(session.role()),
        query,
    )
    .filters(vec![
        FilterField::keyword(query, "Search by payout no"),
        FilterField::select("status", "Status", query.status(), statuses),
    ]))
}

/// Bundles selected purchases into a new payout.
pub async fn create_payout<A>(
    api: &A,
    session: &AuthSession,
    form: &NewPayoutForm,
) -> ServiceResult<Payout>
where
    A: PayoutWriter + ?Sized,
{
    ensure_capability(session, Capability::RequestPayouts)?;

    let payout = NewPayout::try_from(form).map_err(|err| {
        log::error!("Failed to validate payout selection: {err}");
        ServiceError::from(err)
    })?;
    api.create_payout(&payout)
        .await
        .map_err(|err| mutation_failed("create payout", err))
}

/// Instructors may only request a payout; completing or rejecting one is
/// an admin decision.
pub async fn update_payout_status<A>(
    api: &A,
    session: &AuthSession,
    payout_id: &str,
    form: PayoutStatusForm,
) -> ServiceResult<PayoutStatus>
where
    A: PayoutWriter + ?Sized,
{
    let required = match form.status {
        PayoutStatus::RequestPayout => Capability::RequestPayouts,
        PayoutStatus::Completed | PayoutStatus::Rejected => Capability::ManagePayouts,
        PayoutStatus::New => {
            return Err(ServiceError::Form(
                "A payout cannot be moved back to new".to_string(),
            ));
        }
    };
    ensure_capability(session, required)?;

    let payout_id = parse_id(payout_id)?;
    let change = PayoutStatusChange::try_from(form)?;
    api.update_payout_status(&payout_id, &change)
        .await
        .map_err(|err| mutation_failed("update payout status", err))?;
    Ok(change.status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockApi;
    use crate::domain::role::Role;
    use crate::domain::session::test_session;
    use crate::services::test_support::page_of;

    fn payout(id: &str, status: &str) -> Payout {
        serde_json::from_value(serde_json::json!({
            "_id": id,
            "payout_no": format!("PO_{id}"),
            "status": status,
            "balance_origin": 1_000_000.0
        }))
        .unwrap()
    }

    fn status_form(status: PayoutStatus, comment: &str) -> PayoutStatusForm {
        PayoutStatusForm {
            status,
            comment: comment.into(),
            next: None,
        }
    }

    /// Ensures instructors only search their own payouts.
    #[actix_web::test]
    async fn instructor_lists_own_payouts() {
        let mut api = MockApi::new();
        api.expect_search_payouts()
            .withf(|condition, _| condition.is_instructor && condition.status == "new")
            .times(1)
            .returning(|_, _| Ok(page_of(vec![payout("p1", "new")], 1, 10, 1)));
        let session = test_session(Role::Instructor);
        let query = ListQuery {
            status: Some("new".into()),
            ..ListQuery::default()
        };

        let data = list_payouts(&api, &session, &query, PageRequest::first(10))
            .await
            .unwrap();

        assert_eq!(data.title, "Payout");
        assert_eq!(data.table.rows[0].actions[0].label, "Request payout");
    }

    #[actix_web::test]
    async fn admin_lists_all_payouts() {
        let mut api = MockApi::new();
        api.expect_search_payouts()
            .withf(|condition, _| !condition.is_instructor && condition.status.is_empty())
            .times(1)
            .returning(|_, _| Ok(page_of(vec![payout("p1", "request_payout")], 1, 10, 1)));
        let session = test_session(Role::Admin);

        let data = list_payouts(&api, &session, &ListQuery::default(), PageRequest::first(10))
            .await
            .unwrap();

        let labels: Vec<_> = data.table.rows[0].actions.iter().map(|a| a.label).collect();
        assert_eq!(labels, vec!["Complete", "Reject"]);
    }

    #[actix_web::test]
    async fn students_have_no_payouts() {
        let mut api = MockApi::new();
        api.expect_search_payouts().times(0);
        let session = test_session(Role::Student);

        let result = list_payouts(&api, &session, &ListQuery::default(), PageRequest::first(10)).await;
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[actix_web::test]
    async fn instructor_cannot_complete_payout() {
        let mut api = MockApi::new();
        api.expect_update_payout_status().times(0);
        let session = test_session(Role::Instructor);

        let result =
            update_payout_status(&api, &session, "p1", status_form(PayoutStatus::Completed, "")).await;
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[actix_web::test]
    async fn admin_rejects_with_reason() {
        let mut api = MockApi::new();
        api.expect_update_payout_status()
            .withf(|id, change| {
                id.as_str() == "p1"
                    && change.status == PayoutStatus::Rejected
                    && change.comment == "Duplicate"
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let session = test_session(Role::Admin);

        let status = update_payout_status(
            &api,
            &session,
            "p1",
            status_form(PayoutStatus::Rejected, " Duplicate "),
        )
        .await
        .unwrap();
        assert_eq!(status, PayoutStatus::Rejected);
    }

    #[actix_web::test]
    async fn create_payout_dedups_purchases() {
        let mut api = MockApi::new();
        api.expect_create_payout()
            .withf(|payout| payout.transactions.len() == 2)
            .times(1)
            .returning(|_| Ok(payout("p9", "new")));
        let session = test_session(Role::Instructor);
        let form = NewPayoutForm::parse(b"purchase_id=b&purchase_id=a&purchase_id=b").unwrap();

        let created = create_payout(&api, &session, &form).await.unwrap();
        assert_eq!(created.payout_no, "PO_p9");
    }

    #[actix_web::test]
    async fn empty_selection_is_rejected() {
        let mut api = MockApi::new();
        api.expect_create_payout().times(0);
        let session = test_session(Role::Instructor);

        let result = create_payout(&api, &session, &NewPayoutForm::default()).await;
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }
}
