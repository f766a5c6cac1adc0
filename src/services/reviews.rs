use crate::api::review::{ReviewSearch, Reviews};
use crate::api::{ReviewReader, ReviewWriter};
use crate::domain::review::Review;
use crate::domain::role::Capability;
use crate::domain::session::AuthSession;
use crate::dto::list::{ListPageData, ListQuery, Tab};
use crate::forms::parse_id;
use crate::forms::reviews::ReviewForm;
use crate::pagination::PageRequest;
use crate::render::table::{Cell, TableSpec};
use crate::services::{ServiceError, ServiceResult, browse, ensure_capability, mutation_failed};

const RATING_TABS: &[(&str, &str)] = &[
    ("all", "All"),
    ("5", "5 stars"),
    ("4", "4 stars"),
    ("3", "3 stars"),
    ("2", "2 stars"),
    ("1", "1 star"),
];

fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

fn review_table() -> TableSpec<Review> {
    TableSpec::<Review>::new()
        .column("Course", |review| Cell::opt_text(review.course_name.as_deref()))
        .column("Reviewer", |review| {
            Cell::opt_text(review.reviewer_name.as_deref())
        })
        .column("Rating", |review| Cell::text(stars(review.rating)))
        .column("Comment", |review| Cell::text(&review.comment))
        .column("Updated At", |review| Cell::date(review.updated_at.as_ref()))
}

/// Reviews left on the instructor's courses, best rated first.
pub async fn list_reviews<A>(
    api: &A,
    session: &AuthSession,
    query: &ListQuery,
    page: PageRequest,
) -> ServiceResult<ListPageData>
where
    A: ReviewReader + ?Sized,
{
    ensure_capability(session, Capability::ViewReviews)?;

    let tab = query.tab().unwrap_or("all");
    let mut condition = ReviewSearch::for_instructor().rating(tab.parse::<u8>().ok());
    condition.is_rating_order = true;
    let browser = browse::<Reviews, _, _>(condition, page, |condition, page| async move {
        api.search_reviews(&condition, page).await
    })
    .await?;

    Ok(ListPageData::new(
        "Review",
        "/reviews",
        &browser,
        &review_table(),
        Some(session.role()),
        query,
    )
    .tabs(Tab::set(tab, RATING_TABS)))
}

/// A student reviews a course they bought.
pub async fn create_review<A>(
    api: &A,
    session: &AuthSession,
    course_id: &str,
    form: ReviewForm,
) -> ServiceResult<Review>
where
    A: ReviewWriter + ?Sized,
{
    ensure_capability(session, Capability::WriteReviews)?;

    let payload = form.into_payload(parse_id(course_id)?).map_err(|err| {
        log::error!("Failed to validate review form: {err}");
        ServiceError::from(err)
    })?;
    api.create_review(&payload)
        .await
        .map_err(|err| mutation_failed("create review", err))
}

pub async fn update_review<A>(
    api: &A,
    session: &AuthSession,
    review_id: &str,
    course_id: &str,
    form: ReviewForm,
) -> ServiceResult<Review>
where
    A: ReviewWriter + ?Sized,
{
    ensure_capability(session, Capability::WriteReviews)?;

    let review_id = parse_id(review_id)?;
    let payload = form.into_payload(parse_id(course_id)?)?;
    api.update_review(&review_id, &payload)
        .await
        .map_err(|err| mutation_failed("update review", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockApi;
    use crate::domain::role::Role;
    use crate::domain::session::test_session;
    use crate::services::test_support::page_of;

    #[test]
    fn stars_render_rating() {
        assert_eq!(stars(4), "★★★★☆");
        assert_eq!(stars(0), "☆☆☆☆☆");
    }

    #[actix_web::test]
    async fn rating_tab_filters_reviews() {
        let mut api = MockApi::new();
        api.expect_search_reviews()
            .withf(|condition, _| {
                condition.is_instructor && condition.is_rating_order && condition.rating == 4
            })
            .times(1)
            .returning(|_, _| Ok(page_of(Vec::new(), 1, 10, 0)));
        let session = test_session(Role::Instructor);
        let query = ListQuery {
            tab: Some("4".into()),
            ..ListQuery::default()
        };

        let data = list_reviews(&api, &session, &query, PageRequest::first(10))
            .await
            .unwrap();
        assert!(data.tabs.iter().any(|tab| tab.key == "4" && tab.active));
    }

    #[actix_web::test]
    async fn all_tab_matches_every_rating() {
        let mut api = MockApi::new();
        api.expect_search_reviews()
            .withf(|condition, _| condition.rating == 0)
            .times(1)
            .returning(|_, _| Ok(page_of(Vec::new(), 1, 10, 0)));
        let session = test_session(Role::Instructor);

        list_reviews(&api, &session, &ListQuery::default(), PageRequest::first(10))
            .await
            .unwrap();
    }

    #[actix_web::test]
    async fn only_students_write_reviews() {
        let mut api = MockApi::new();
        api.expect_create_review().times(0);
        let session = test_session(Role::Instructor);
        let form = ReviewForm {
            rating: 5,
            comment: "Great".into(),
        };

        let result = create_review(&api, &session, "c1", form).await;
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[actix_web::test]
    async fn student_reviews_course() {
        let mut api = MockApi::new();
        api.expect_create_review()
            .withf(|payload| payload.course_id.as_str() == "c1" && payload.comment == "Great")
            .times(1)
            .returning(|_| {
                Ok(serde_json::from_value(serde_json::json!({"_id": "r1", "rating": 5})).unwrap())
            });
        let session = test_session(Role::Student);
        let form = ReviewForm {
            rating: 5,
            comment: " Great ".into(),
        };

        let review = create_review(&api, &session, "c1", form).await.unwrap();
        assert_eq!(review.rating, 5);
    }
}
