//! Services behind the admin user and instructor-request screens.

use crate::api::user::{UserSearch, Users};
use crate::api::{ApiError, UserReader, UserWriter};
use crate::browser::OptimisticToggle;
use crate::domain::role::{Capability, Role};
use crate::domain::session::AuthSession;
use crate::domain::types::RecordId;
use crate::domain::user::{NewUser, ReviewDecision, UpdateAccount, User};
use crate::dto::detail::AccountData;
use crate::dto::list::{CreatePanel, FilterField, FormField, InputKind, ListPageData, ListQuery, Tab};
use crate::forms::users::{
    AccountForm, NewUserForm, PasswordForm, ReviewInstructorForm, RoleForm, StatusForm,
};
use crate::forms::parse_id;
use crate::pagination::PageRequest;
use crate::render::table::{ActionDef, Cell, TableSpec};
use crate::services::{
    ServiceError, ServiceResult, browse, ensure_capability, mutation_failed,
};

const USER_TABS: &[(&str, &str)] = &[("active", "Active"), ("inactive", "Inactive")];

fn role_options() -> Vec<(String, String)> {
    Role::ALL
        .iter()
        .map(|role| (role.as_str().to_string(), role.as_str().to_uppercase()))
        .collect()
}

fn user_table() -> TableSpec<User> {
    TableSpec::<User>::new()
        .column("Avatar", |user| Cell::image(user.avatar.as_deref(), &user.name))
        .column("Name", |user| Cell::text(&user.name))
        .column("Email", |user| Cell::text(&user.email))
        .editable_column("Role", Capability::ManageUsers, |user| {
            Cell::select(
                format!("/admin/users/{}/role", user.id),
                "role",
                user.role.as_str(),
                role_options(),
            )
        })
        .editable_column("Status", Capability::ManageUsers, |user| {
            Cell::toggle(user.status, format!("/admin/users/{}/status", user.id), "status")
        })
        .column("Created At", |user| Cell::date(user.created_at.as_ref()))
        .action(
            ActionDef::new("Delete", Capability::ManageUsers, |user: &User| {
                format!("/admin/users/{}/delete", user.id)
            })
            .style("outline-danger")
            .confirm("Delete this account?"),
        )
}

fn request_table() -> TableSpec<User> {
    TableSpec::<User>::new()
        .column("Name", |user| Cell::text(&user.name))
        .column("Email", |user| Cell::text(&user.email))
        .column("Phone", |user| Cell::opt_text(user.phone_number.as_deref()))
        .column("Description", |user| {
            Cell::opt_text(user.description.as_deref())
        })
        .column("Video", |user| match user.video.as_deref() {
            Some(video) if !video.is_empty() => Cell::link("Watch", video),
            _ => Cell::text(""),
        })
        .column("Created At", |user| Cell::date(user.created_at.as_ref()))
        .action(
            ActionDef::new("Approve", Capability::ReviewInstructors, |user: &User| {
                format!("/admin/requests/{}/review", user.id)
            })
            .style("outline-success")
            .fields(|_| vec![("decision", "approve".to_string())]),
        )
        .action(
            ActionDef::new("Reject", Capability::ReviewInstructors, |user: &User| {
                format!("/admin/requests/{}/review", user.id)
            })
            .style("outline-danger")
            .fields(|_| vec![("decision", "reject".to_string())])
            .input("comment", "Reason"),
        )
}

fn user_panel() -> CreatePanel {
    CreatePanel::new(
        "New user",
        "/admin/users",
        vec![
            FormField::new("name", "Name", InputKind::Text).required(),
            FormField::new("email", "Email", InputKind::Email).required(),
            FormField::new("password", "Password", InputKind::Password).required(),
            FormField::new("role", "Role", InputKind::Select)
                .options(role_options())
                .required(),
            FormField::new("phone_number", "Phone", InputKind::Text),
            FormField::new("description", "Description", InputKind::Textarea),
            FormField::new("avatar", "Avatar url", InputKind::Url),
            FormField::new("video", "Video url", InputKind::Url),
        ],
    )
}

/// Verified accounts, split into active and inactive tabs.
pub async fn list_users<A>(
    api: &A,
    session: &AuthSession,
    query: &ListQuery,
    page: PageRequest,
) -> ServiceResult<ListPageData>
where
    A: UserReader + ?Sized,
{
    ensure_capability(session, Capability::ManageUsers)?;

    let tab = query.tab().unwrap_or("active");
    let role = query.role().and_then(|role| role.parse::<Role>().ok());
    let condition = UserSearch::accounts()
        .keyword(query.keyword())
        .role(role)
        .status(tab != "inactive");

    let browser = browse::<Users, _, _>(condition, page, |condition, page| async move {
        api.search_users(&condition, page).await
    })
    .await?;

    let mut roles = vec![(String::new(), "All roles".to_string())];
    roles.extend(role_options());

    Ok(ListPageData::new(
        "User Management",
        "/admin/users",
        &browser,
        &user_table(),
        Some(session.role()),
        query,
    )
    .filters(vec![
        FilterField::keyword(query, "Search by name or email"),
        FilterField::select("role", "Role", query.role(), roles),
    ])
    .tabs(Tab::set(tab, USER_TABS))
    .create(user_panel()))
}

/// Instructor registrations awaiting review.
pub async fn list_requests<A>(
    api: &A,
    session: &AuthSession,
    query: &ListQuery,
    page: PageRequest,
) -> ServiceResult<ListPageData>
where
    A: UserReader + ?Sized,
{
    ensure_capability(session, Capability::ReviewInstructors)?;

    let condition = UserSearch::pending_instructors().keyword(query.keyword());
    let browser = browse::<Users, _, _>(condition, page, |condition, page| async move {
        api.search_users(&condition, page).await
    })
    .await?;

    Ok(ListPageData::new(
        "Request Management",
        "/admin/requests",
        &browser,
        &request_table(),
        Some(session.role()),
        query,
    )
    .filters(vec![FilterField::keyword(query, "Search by name or email")]))
}

pub async fn create_user<A>(api: &A, session: &AuthSession, form: NewUserForm) -> ServiceResult<()>
where
    A: UserWriter + ?Sized,
{
    ensure_capability(session, Capability::ManageUsers)?;

    let new_user = NewUser::try_from(form).map_err(|err| {
        log::error!("Failed to validate new user form: {err}");
        ServiceError::from(err)
    })?;

    api.create_user(&new_user)
        .await
        .map_err(|err| mutation_failed("create user", err))?;
    Ok(())
}

/// Flips the account status and returns the status the switch settles on.
/// A refusal names the status the account keeps.
pub async fn change_user_status<A>(
    api: &A,
    session: &AuthSession,
    user_id: &str,
    form: StatusForm,
) -> ServiceResult<bool>
where
    A: UserWriter + ?Sized,
{
    ensure_capability(session, Capability::ManageUsers)?;

    let user_id = parse_id(user_id)?;
    let mut toggle = OptimisticToggle::new(!form.status);
    toggle.begin(form.status);

    let result = api.change_user_status(&form.into_change(user_id)).await;
    let shown = toggle.settle(result.is_ok());
    match result {
        Ok(()) => Ok(shown),
        Err(ApiError::Rejected { message, .. }) => {
            log::error!("Failed to change user status: {message}");
            let state = if shown { "active" } else { "inactive" };
            Err(ServiceError::Form(format!("{message}. The account stays {state}.")))
        }
        Err(err) => Err(mutation_failed("change user status", err)),
    }
}

pub async fn change_user_role<A>(
    api: &A,
    session: &AuthSession,
    user_id: &str,
    form: RoleForm,
) -> ServiceResult<()>
where
    A: UserWriter + ?Sized,
{
    ensure_capability(session, Capability::ManageUsers)?;

    let user_id = parse_id(user_id)?;
    if user_id == session.user().id {
        return Err(ServiceError::Form("You cannot change your own role".to_string()));
    }
    let change = form.into_change(user_id)?;
    api.change_user_role(&change)
        .await
        .map_err(|err| mutation_failed("change user role", err))
}

pub async fn delete_user<A>(api: &A, session: &AuthSession, user_id: &str) -> ServiceResult<()>
where
    A: UserWriter + ?Sized,
{
    ensure_capability(session, Capability::ManageUsers)?;

    let user_id = parse_id(user_id)?;
    if user_id == session.user().id {
        return Err(ServiceError::Form("You cannot delete your own account".to_string()));
    }
    api.delete_user(&user_id)
        .await
        .map_err(|err| mutation_failed("delete user", err))
}

pub async fn review_instructor<A>(
    api: &A,
    session: &AuthSession,
    user_id: &str,
    form: ReviewInstructorForm,
) -> ServiceResult<ReviewDecision>
where
    A: UserWriter + ?Sized,
{
    ensure_capability(session, Capability::ReviewInstructors)?;

    let review = form.into_review(parse_id(user_id)?)?;
    api.review_instructor(&review)
        .await
        .map_err(|err| mutation_failed("review instructor", err))?;
    Ok(review.status)
}

/// Profile of the logged-in account.
pub async fn load_account<A>(api: &A, session: &AuthSession) -> ServiceResult<AccountData>
where
    A: UserReader + ?Sized,
{
    let user = api.get_user(&session.user().id).await.map_err(|err| {
        log::error!("Failed to load account {}: {err}", session.user().id);
        ServiceError::from(err)
    })?;
    Ok(AccountData { user })
}

pub async fn update_account<A>(
    api: &A,
    session: &AuthSession,
    form: AccountForm,
) -> ServiceResult<User>
where
    A: UserWriter + ?Sized,
{
    let updates = UpdateAccount::try_from(form).map_err(|err| {
        log::error!("Failed to validate account form: {err}");
        ServiceError::from(err)
    })?;
    api.update_account(&session.user().id, &updates)
        .await
        .map_err(|err| mutation_failed("update account", err))
}

pub async fn change_password<A>(
    api: &A,
    session: &AuthSession,
    form: PasswordForm,
) -> ServiceResult<()>
where
    A: UserWriter + ?Sized,
{
    let user_id: RecordId = session.user().id.clone();
    let change = form.into_change(user_id)?;
    api.change_password(&change)
        .await
        .map_err(|err| mutation_failed("change password", err))
}
