use crate::api::subscription::{Subscribers, SubscriptionSearch, Subscriptions};
use crate::api::{SubscriptionReader, SubscriptionWriter};
use crate::domain::role::Capability;
use crate::domain::session::AuthSession;
use crate::domain::subscription::Subscription;
use crate::dto::list::{FilterField, ListPageData, ListQuery};
use crate::forms::parse_id;
use crate::pagination::PageRequest;
use crate::render::table::{ActionDef, Cell, TableSpec};
use crate::services::{ServiceError, ServiceResult, browse, mutation_failed};

fn subscriber_table() -> TableSpec<Subscription> {
    TableSpec::<Subscription>::new()
        .column("Subscriber", |subscription| {
            Cell::opt_text(subscription.subscriber_name.as_deref())
        })
        .column("Status", |subscription| {
            Cell::badge(if subscription.is_subscribed { "active" } else { "inactive" })
        })
}

fn subscription_table() -> TableSpec<Subscription> {
    TableSpec::<Subscription>::new()
        .column("Instructor", |subscription| {
            Cell::opt_text(subscription.instructor_name.as_deref())
        })
        .column("Status", |subscription| {
            Cell::badge(if subscription.is_subscribed { "active" } else { "inactive" })
        })
        .action(
            ActionDef::new(
                "Unsubscribe",
                Capability::ViewSubscriptions,
                |subscription: &Subscription| {
                    format!(
                        "/subscriptions/{}/toggle",
                        subscription.instructor_id.as_deref().unwrap_or_default()
                    )
                },
            )
            .style("outline-danger")
            .when(|subscription| {
                subscription.is_subscribed && subscription.instructor_id.is_some()
            })
            .confirm("Unsubscribe from this instructor?"),
        )
}

/// Instructors see who follows them, students whom they follow.
pub async fn list_subscriptions<A>(
    api: &A,
    session: &AuthSession,
    query: &ListQuery,
    page: PageRequest,
) -> ServiceResult<ListPageData>
where
    A: SubscriptionReader + ?Sized,
{
    let condition = SubscriptionSearch::default().keyword(query.keyword());
    let filters = vec![FilterField::keyword(query, "Search by name")];

    if session.can(Capability::ViewSubscribers) {
        let browser = browse::<Subscribers, _, _>(condition, page, |condition, page| async move {
            api.search_subscribers(&condition, page).await
        })
        .await?;
        Ok(ListPageData::new(
            "Subscribers",
            "/subscriptions",
            &browser,
            &subscriber_table(),
            Some(session.role()),
            query,
        )
        .filters(filters))
    } else if session.can(Capability::ViewSubscriptions) {
        let browser =
            browse::<Subscriptions, _, _>(condition, page, |condition, page| async move {
                api.search_subscriptions(&condition, page).await
            })
            .await?;
        Ok(ListPageData::new(
            "Subscriptions",
            "/subscriptions",
            &browser,
            &subscription_table(),
            Some(session.role()),
            query,
        )
        .filters(filters))
    } else {
        Err(ServiceError::Unauthorized)
    }
}

/// Subscribes to, or unsubscribes from, an instructor.
pub async fn toggle_subscription<A>(
    api: &A,
    session: &AuthSession,
    instructor_id: &str,
) -> ServiceResult<()>
where
    A: SubscriptionWriter + ?Sized,
{
    if !session.can(Capability::ViewSubscriptions) {
        return Err(ServiceError::Unauthorized);
    }

    let instructor_id = parse_id(instructor_id)?;
    api.toggle_subscription(&instructor_id)
        .await
        .map_err(|err| mutation_failed("toggle subscription", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockApi;
    use crate::domain::role::Role;
    use crate::domain::session::test_session;
    use crate::services::test_support::page_of;

    fn subscription(subscribed: bool) -> Subscription {
        serde_json::from_value(serde_json::json!({
            "_id": "s1",
            "instructor_id": "i1",
            "instructor_name": "Teacher",
            "subscriber_name": "Pupil",
            "is_subscribed": subscribed
        }))
        .unwrap()
    }

    #[actix_web::test]
    async fn instructor_sees_subscribers() {
        let mut api = MockApi::new();
        api.expect_search_subscribers()
            .times(1)
            .returning(|_, _| Ok(page_of(vec![subscription(true)], 1, 10, 1)));
        api.expect_search_subscriptions().times(0);
        let session = test_session(Role::Instructor);

        let data = list_subscriptions(&api, &session, &ListQuery::default(), PageRequest::first(10))
            .await
            .unwrap();

        assert_eq!(data.title, "Subscribers");
        assert_eq!(data.table.rows[0].cells[0], Cell::text("Pupil"));
        assert!(!data.table.has_actions);
    }

    #[actix_web::test]
    async fn student_can_unsubscribe() {
        let mut api = MockApi::new();
        api.expect_search_subscriptions()
            .withf(|condition, _| condition.keyword == "teach")
            .times(1)
            .returning(|_, _| Ok(page_of(vec![subscription(true)], 1, 10, 1)));
        let session = test_session(Role::Student);
        let query = ListQuery {
            keyword: Some("teach".into()),
            ..ListQuery::default()
        };

        let data = list_subscriptions(&api, &session, &query, PageRequest::first(10))
            .await
            .unwrap();

        assert_eq!(data.table.rows[0].actions[0].url, "/subscriptions/i1/toggle");
    }

    #[actix_web::test]
    async fn admins_have_no_subscriptions() {
        let mut api = MockApi::new();
        api.expect_search_subscribers().times(0);
        api.expect_search_subscriptions().times(0);
        let session = test_session(Role::Admin);

        let result =
            list_subscriptions(&api, &session, &ListQuery::default(), PageRequest::first(10)).await;
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[actix_web::test]
    async fn toggle_posts_instructor() {
        let mut api = MockApi::new();
        api.expect_toggle_subscription()
            .withf(|id| id.as_str() == "i1")
            .times(1)
            .returning(|_| Ok(()));
        let session = test_session(Role::Student);

        toggle_subscription(&api, &session, "i1").await.unwrap();
    }
}
