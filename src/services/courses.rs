//! Course authoring, moderation and the session, lesson and log screens
//! hanging off a course.

use crate::api::course::{
    CourseLogSearch, CourseLogs, CourseSearch, Courses, LessonSearch, Lessons, SessionSearch,
    Sessions,
};
use crate::api::{CategoryReader, CourseReader, CourseWriter};
use crate::domain::course::{
    Course, CourseLog, CoursePayload, CourseSession, CourseStatus, Lesson, LessonType,
};
use crate::domain::role::Capability;
use crate::domain::session::AuthSession;
use crate::dto::list::{
    CreatePanel, FilterField, FormField, InputKind, ListPageData, ListQuery, Tab,
};
use crate::forms::courses::{CourseForm, CourseStatusForm, LessonForm, SessionForm};
use crate::forms::parse_id;
use crate::pagination::{MAX_PAGE_SIZE, PageRequest};
use crate::render::table::{ActionDef, Cell, TableSpec};
use crate::services::categories::category_options;
use crate::services::{ServiceError, ServiceResult, browse, ensure_capability, mutation_failed};

const COURSE_STATUSES: [CourseStatus; 6] = [
    CourseStatus::New,
    CourseStatus::WaitingApprove,
    CourseStatus::Approve,
    CourseStatus::Reject,
    CourseStatus::Active,
    CourseStatus::Inactive,
];

const LESSON_TABS: &[(&str, &str)] = &[
    ("all", "All"),
    ("video", "Video"),
    ("text", "Text"),
    ("image", "Image"),
];

fn status_options() -> Vec<(String, String)> {
    let mut options = vec![(String::new(), "All statuses".to_string())];
    options.extend(
        COURSE_STATUSES
            .iter()
            .map(|status| (status.as_str().to_string(), status.as_str().to_uppercase())),
    );
    options
}

fn status_action(
    label: &'static str,
    capability: Capability,
    target: CourseStatus,
) -> ActionDef<Course> {
    let action = ActionDef::new(label, capability, |course: &Course| {
        format!("/courses/{}/status", course.id)
    });
    match target {
        CourseStatus::WaitingApprove => action
            .when(|course| course.status.instructor_transitions().contains(&CourseStatus::WaitingApprove))
            .fields(|_| vec![("new_status", "waiting_approve".to_string())]),
        CourseStatus::Active => action
            .style("outline-success")
            .when(|course| course.status.instructor_transitions().contains(&CourseStatus::Active))
            .fields(|_| vec![("new_status", "active".to_string())]),
        CourseStatus::Inactive => action
            .style("outline-secondary")
            .when(|course| course.status.instructor_transitions().contains(&CourseStatus::Inactive))
            .fields(|_| vec![("new_status", "inactive".to_string())]),
        CourseStatus::Approve => action
            .style("outline-success")
            .when(|course| course.status.admin_transitions().contains(&CourseStatus::Approve))
            .fields(|_| vec![("new_status", "approve".to_string())]),
        CourseStatus::Reject | CourseStatus::New => action
            .style("outline-danger")
            .when(|course| course.status.admin_transitions().contains(&CourseStatus::Reject))
            .fields(|_| vec![("new_status", "reject".to_string())])
            .input("comment", "Reason"),
    }
}

fn course_table() -> TableSpec<Course> {
    TableSpec::<Course>::new()
        .column("Image", |course| Cell::image(course.image_url.as_deref(), &course.name))
        .column("Name", |course| {
            Cell::link(&course.name, format!("/courses/{}/sessions", course.id))
        })
        .column("Category", |course| Cell::opt_text(course.category_name.as_deref()))
        .column("Instructor", |course| {
            Cell::opt_text(course.instructor_name.as_deref())
        })
        .column("Price", |course| Cell::currency(course.price))
        .column("Duration", |course| Cell::duration(course.full_time))
        .column("Status", |course| Cell::badge(course.status.as_str()))
        .column("Created At", |course| Cell::date(course.created_at.as_ref()))
        .action(status_action(
            "Send to admin",
            Capability::AuthorCourses,
            CourseStatus::WaitingApprove,
        ))
        .action(status_action(
            "Activate",
            Capability::AuthorCourses,
            CourseStatus::Active,
        ))
        .action(status_action(
            "Deactivate",
            Capability::AuthorCourses,
            CourseStatus::Inactive,
        ))
        .action(status_action(
            "Approve",
            Capability::ModerateCourses,
            CourseStatus::Approve,
        ))
        .action(status_action(
            "Reject",
            Capability::ModerateCourses,
            CourseStatus::Reject,
        ))
        .action(
            ActionDef::new("Delete", Capability::AuthorCourses, |course: &Course| {
                format!("/courses/{}/delete", course.id)
            })
            .style("outline-danger")
            .when(|course| matches!(course.status, CourseStatus::New | CourseStatus::Reject))
            .confirm("Delete this course?"),
        )
}

fn course_panel(categories: Vec<(String, String)>) -> CreatePanel {
    CreatePanel::new(
        "New course",
        "/courses",
        vec![
            FormField::new("name", "Name", InputKind::Text).required(),
            FormField::new("category_id", "Category", InputKind::Select)
                .options(categories)
                .required(),
            FormField::new("description", "Description", InputKind::Textarea),
            FormField::new("content", "Content", InputKind::Textarea),
            FormField::new("image_url", "Image url", InputKind::Url),
            FormField::new("video_url", "Video url", InputKind::Url),
            FormField::new("is_free", "Free course", InputKind::Checkbox),
            FormField::new("price", "Price", InputKind::Number),
            FormField::new("discount", "Discount (%)", InputKind::Number),
        ],
    )
}

pub async fn list_courses<A>(
    api: &A,
    session: &AuthSession,
    query: &ListQuery,
    page: PageRequest,
) -> ServiceResult<ListPageData>
where
    A: CourseReader + CategoryReader + ?Sized,
{
    ensure_capability(session, Capability::ViewCourses)?;

    let status = query
        .status()
        .and_then(|status| status.parse::<CourseStatus>().ok());
    let condition = CourseSearch::default()
        .keyword(query.keyword())
        .category(query.category().unwrap_or_default())
        .status(status);
    let browser = browse::<Courses, _, _>(condition, page, |condition, page| async move {
        api.search_courses(&condition, page).await
    })
    .await?;

    let categories = category_options(api).await;
    let mut category_filter = vec![(String::new(), "All categories".to_string())];
    category_filter.extend(categories.iter().cloned());

    let data = ListPageData::new(
        "Courses",
        "/courses",
        &browser,
        &course_table(),
        Some(session.role()),
        query,
    )
    .filters(vec![
        FilterField::keyword(query, "Search by course name"),
        FilterField::select("category", "Category", query.category(), category_filter),
        FilterField::select("status", "Status", query.status(), status_options()),
    ]);

    Ok(if session.can(Capability::AuthorCourses) {
        data.create(course_panel(categories))
    } else {
        data
    })
}

pub async fn create_course<A>(
    api: &A,
    session: &AuthSession,
    form: CourseForm,
) -> ServiceResult<Course>
where
    A: CourseWriter + ?Sized,
{
    ensure_capability(session, Capability::AuthorCourses)?;

    let payload = CoursePayload::try_from(form).map_err(|err| {
        log::error!("Failed to validate course form: {err}");
        ServiceError::from(err)
    })?;
    api.create_course(&payload)
        .await
        .map_err(|err| mutation_failed("create course", err))
}

pub async fn update_course<A>(
    api: &A,
    session: &AuthSession,
    course_id: &str,
    form: CourseForm,
) -> ServiceResult<Course>
where
    A: CourseWriter + ?Sized,
{
    ensure_capability(session, Capability::AuthorCourses)?;

    let course_id = parse_id(course_id)?;
    let payload = CoursePayload::try_from(form)?;
    api.update_course(&course_id, &payload)
        .await
        .map_err(|err| mutation_failed("update course", err))
}

pub async fn delete_course<A>(api: &A, session: &AuthSession, course_id: &str) -> ServiceResult<()>
where
    A: CourseWriter + ?Sized,
{
    ensure_capability(session, Capability::AuthorCourses)?;

    let course_id = parse_id(course_id)?;
    api.delete_course(&course_id)
        .await
        .map_err(|err| mutation_failed("delete course", err))
}

/// Moves a course along its lifecycle. Admins moderate pending courses;
/// instructors submit, activate and deactivate their own.
pub async fn change_course_status<A>(
    api: &A,
    session: &AuthSession,
    course_id: &str,
    form: CourseStatusForm,
) -> ServiceResult<CourseStatus>
where
    A: CourseReader + CourseWriter + ?Sized,
{
    let moderator = session.can(Capability::ModerateCourses);
    if !moderator {
        ensure_capability(session, Capability::AuthorCourses)?;
    }

    let change = form.into_change(parse_id(course_id)?)?;
    let course = api.get_course(&change.course_id).await.map_err(|err| {
        log::error!("Failed to load course {}: {err}", change.course_id);
        ServiceError::from(err)
    })?;

    let allowed = if moderator {
        course.status.admin_transitions()
    } else {
        course.status.instructor_transitions()
    };
    if !allowed.contains(&change.new_status) {
        return Err(ServiceError::Form(format!(
            "A {} course cannot become {}",
            course.status, change.new_status
        )));
    }

    api.change_course_status(&change)
        .await
        .map_err(|err| mutation_failed("change course status", err))?;
    Ok(change.new_status)
}

fn session_table() -> TableSpec<CourseSession> {
    TableSpec::<CourseSession>::new()
        .column("Position", |chapter| Cell::text(chapter.position_order.to_string()))
        .column("Name", |chapter| Cell::text(&chapter.name))
        .column("Description", |chapter| {
            Cell::opt_text(chapter.description.as_deref())
        })
        .column("Lessons", |chapter| Cell::text(chapter.lesson_list.len().to_string()))
        .column("Duration", |chapter| Cell::duration(chapter.full_time))
        .action(
            ActionDef::new("Rename", Capability::AuthorCourses, |chapter: &CourseSession| {
                format!(
                    "/courses/{}/sessions/{}",
                    chapter.course_id.as_deref().unwrap_or_default(),
                    chapter.id
                )
            })
            .when(|chapter| chapter.course_id.is_some())
            .fields(|chapter| {
                vec![
                    ("description", chapter.description.clone().unwrap_or_default()),
                    ("position_order", chapter.position_order.to_string()),
                ]
            })
            .input("name", "New name"),
        )
        .action(
            ActionDef::new("Delete", Capability::AuthorCourses, |chapter: &CourseSession| {
                format!("/sessions/{}/delete", chapter.id)
            })
            .style("outline-danger")
            .confirm("Delete this session and its lessons?"),
        )
}

/// Sessions of one course in authoring order.
pub async fn list_sessions<A>(
    api: &A,
    session: &AuthSession,
    course_id: &str,
    query: &ListQuery,
    page: PageRequest,
) -> ServiceResult<ListPageData>
where
    A: CourseReader + ?Sized,
{
    ensure_capability(session, Capability::ViewCourses)?;

    let course_id = parse_id(course_id)?;
    let condition = SessionSearch::for_course(&course_id).keyword(query.keyword());
    let browser = browse::<Sessions, _, _>(condition, page, |condition, page| async move {
        api.search_sessions(&condition, page).await
    })
    .await?;

    let data = ListPageData::new(
        "Sessions",
        format!("/courses/{course_id}/sessions"),
        &browser,
        &session_table(),
        Some(session.role()),
        query,
    )
    .filters(vec![FilterField::keyword(query, "Search by session name")])
    .tabs(vec![
        Tab {
            key: "sessions",
            label: "Sessions",
            active: true,
        },
        Tab {
            key: "lessons",
            label: "Lessons",
            active: false,
        },
    ]);

    Ok(if session.can(Capability::AuthorCourses) {
        data.create(CreatePanel::new(
            "New session",
            format!("/courses/{course_id}/sessions"),
            vec![
                FormField::new("name", "Name", InputKind::Text).required(),
                FormField::new("description", "Description", InputKind::Textarea),
                FormField::new("position_order", "Position", InputKind::Number),
            ],
        ))
    } else {
        data
    })
}

pub async fn create_session<A>(
    api: &A,
    session: &AuthSession,
    course_id: &str,
    form: SessionForm,
) -> ServiceResult<CourseSession>
where
    A: CourseWriter + ?Sized,
{
    ensure_capability(session, Capability::AuthorCourses)?;

    let payload = form.into_payload(parse_id(course_id)?)?;
    api.create_session(&payload)
        .await
        .map_err(|err| mutation_failed("create session", err))
}

pub async fn update_session<A>(
    api: &A,
    session: &AuthSession,
    course_id: &str,
    session_id: &str,
    form: SessionForm,
) -> ServiceResult<CourseSession>
where
    A: CourseWriter + ?Sized,
{
    ensure_capability(session, Capability::AuthorCourses)?;

    let session_id = parse_id(session_id)?;
    let payload = form.into_payload(parse_id(course_id)?)?;
    api.update_session(&session_id, &payload)
        .await
        .map_err(|err| mutation_failed("update session", err))
}

pub async fn delete_session<A>(
    api: &A,
    session: &AuthSession,
    session_id: &str,
) -> ServiceResult<()>
where
    A: CourseWriter + ?Sized,
{
    ensure_capability(session, Capability::AuthorCourses)?;

    let session_id = parse_id(session_id)?;
    api.delete_session(&session_id)
        .await
        .map_err(|err| mutation_failed("delete session", err))
}

fn lesson_table() -> TableSpec<Lesson> {
    TableSpec::<Lesson>::new()
        .column("Position", |lesson| Cell::text(lesson.position_order.to_string()))
        .column("Name", |lesson| Cell::text(&lesson.name))
        .column("Session", |lesson| Cell::opt_text(lesson.session_name.as_deref()))
        .column("Type", |lesson| Cell::badge(lesson.lesson_type.as_str()))
        .column("Duration", |lesson| Cell::duration(lesson.full_time))
        .action(
            ActionDef::new("Rename", Capability::AuthorCourses, |lesson: &Lesson| {
                format!(
                    "/courses/{}/lessons/{}",
                    lesson.course_id.as_deref().unwrap_or_default(),
                    lesson.id
                )
            })
            .when(|lesson| lesson.course_id.is_some() && lesson.session_id.is_some())
            .fields(|lesson| {
                vec![
                    ("session_id", lesson.session_id.clone().unwrap_or_default()),
                    ("lesson_type", lesson.lesson_type.as_str().to_string()),
                    ("description", lesson.description.clone().unwrap_or_default()),
                    ("video_url", lesson.video_url.clone().unwrap_or_default()),
                    ("image_url", lesson.image_url.clone().unwrap_or_default()),
                    ("full_time", lesson.full_time.to_string()),
                    ("position_order", lesson.position_order.to_string()),
                ]
            })
            .input("name", "New name"),
        )
        .action(
            ActionDef::new("Delete", Capability::AuthorCourses, |lesson: &Lesson| {
                format!("/lessons/{}/delete", lesson.id)
            })
            .style("outline-danger")
            .confirm("Delete this lesson?"),
        )
}

/// Lessons of one course, filterable by session and lesson type.
pub async fn list_lessons<A>(
    api: &A,
    session: &AuthSession,
    course_id: &str,
    query: &ListQuery,
    page: PageRequest,
) -> ServiceResult<ListPageData>
where
    A: CourseReader + ?Sized,
{
    ensure_capability(session, Capability::ViewCourses)?;

    let course_id = parse_id(course_id)?;
    let tab = query.tab().unwrap_or("all");
    let lesson_type = tab.parse::<LessonType>().ok();
    let condition = LessonSearch::for_course(&course_id)
        .keyword(query.keyword())
        .session(query.session().unwrap_or_default())
        .lesson_type(lesson_type);
    let browser = browse::<Lessons, _, _>(condition, page, |condition, page| async move {
        api.search_lessons(&condition, page).await
    })
    .await?;

    let chapters: Vec<(String, String)> = match api
        .search_sessions(
            &SessionSearch::for_course(&course_id),
            PageRequest::first(MAX_PAGE_SIZE),
        )
        .await
    {
        Ok(page) => page
            .page_data
            .into_iter()
            .map(|chapter| (chapter.id.into_inner(), chapter.name))
            .collect(),
        Err(err) => {
            log::error!("Failed to load sessions of course {course_id}: {err}");
            Vec::new()
        }
    };
    let mut session_filter = vec![(String::new(), "All sessions".to_string())];
    session_filter.extend(chapters.iter().cloned());

    let data = ListPageData::new(
        "Lessons",
        format!("/courses/{course_id}/lessons"),
        &browser,
        &lesson_table(),
        Some(session.role()),
        query,
    )
    .filters(vec![
        FilterField::keyword(query, "Search by lesson name"),
        FilterField::select("session", "Session", query.session(), session_filter),
    ])
    .tabs(Tab::set(tab, LESSON_TABS));

    Ok(if session.can(Capability::AuthorCourses) {
        data.create(CreatePanel::new(
            "New lesson",
            format!("/courses/{course_id}/lessons"),
            vec![
                FormField::new("name", "Name", InputKind::Text).required(),
                FormField::new("session_id", "Session", InputKind::Select)
                    .options(chapters)
                    .required(),
                FormField::new("lesson_type", "Type", InputKind::Select)
                    .options(
                        LESSON_TABS[1..]
                            .iter()
                            .map(|(key, label)| (key.to_string(), label.to_string())),
                    )
                    .required(),
                FormField::new("description", "Description", InputKind::Textarea),
                FormField::new("video_url", "Video url", InputKind::Url),
                FormField::new("image_url", "Image url", InputKind::Url),
                FormField::new("full_time", "Duration (minutes)", InputKind::Number),
                FormField::new("position_order", "Position", InputKind::Number),
            ],
        ))
    } else {
        data
    })
}

pub async fn create_lesson<A>(
    api: &A,
    session: &AuthSession,
    course_id: &str,
    form: LessonForm,
) -> ServiceResult<Lesson>
where
    A: CourseWriter + ?Sized,
{
    ensure_capability(session, Capability::AuthorCourses)?;

    let payload = form.into_payload(parse_id(course_id)?)?;
    api.create_lesson(&payload)
        .await
        .map_err(|err| mutation_failed("create lesson", err))
}

pub async fn update_lesson<A>(
    api: &A,
    session: &AuthSession,
    course_id: &str,
    lesson_id: &str,
    form: LessonForm,
) -> ServiceResult<Lesson>
where
    A: CourseWriter + ?Sized,
{
    ensure_capability(session, Capability::AuthorCourses)?;

    let lesson_id = parse_id(lesson_id)?;
    let payload = form.into_payload(parse_id(course_id)?)?;
    api.update_lesson(&lesson_id, &payload)
        .await
        .map_err(|err| mutation_failed("update lesson", err))
}

pub async fn delete_lesson<A>(api: &A, session: &AuthSession, lesson_id: &str) -> ServiceResult<()>
where
    A: CourseWriter + ?Sized,
{
    ensure_capability(session, Capability::AuthorCourses)?;

    let lesson_id = parse_id(lesson_id)?;
    api.delete_lesson(&lesson_id)
        .await
        .map_err(|err| mutation_failed("delete lesson", err))
}

fn log_table() -> TableSpec<CourseLog> {
    TableSpec::<CourseLog>::new()
        .column("Course", |log| Cell::opt_text(log.course_name.as_deref()))
        .column("Changed By", |log| Cell::opt_text(log.user_name.as_deref()))
        .column("Old Status", |log| Cell::badge(&log.old_status))
        .column("New Status", |log| Cell::badge(&log.new_status))
        .column("Comment", |log| Cell::opt_text(log.comment.as_deref()))
        .column("Created At", |log| Cell::date(log.created_at.as_ref()))
}

/// History of course status changes.
pub async fn list_course_logs<A>(
    api: &A,
    session: &AuthSession,
    query: &ListQuery,
    page: PageRequest,
) -> ServiceResult<ListPageData>
where
    A: CourseReader + ?Sized,
{
    ensure_capability(session, Capability::ViewCourseLogs)?;

    let new_status = query
        .status()
        .and_then(|status| status.parse::<CourseStatus>().ok());
    let condition = CourseLogSearch::default()
        .keyword(query.keyword())
        .new_status(new_status);
    let browser = browse::<CourseLogs, _, _>(condition, page, |condition, page| async move {
        api.search_course_logs(&condition, page).await
    })
    .await?;

    Ok(ListPageData::new(
        "Course Log",
        "/course-logs",
        &browser,
        &log_table(),
        Some(session.role()),
        query,
    )
    .filters(vec![
        FilterField::keyword(query, "Search by course name"),
        FilterField::select("status", "New status", query.status(), status_options()),
    ]))
}
