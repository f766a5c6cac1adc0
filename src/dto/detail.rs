use serde::Serialize;

use crate::domain::blog::Blog;
use crate::domain::course::{Course, CourseSession};
use crate::domain::user::User;
use crate::render::format::{format_currency, format_date, format_duration, sanitize};

#[derive(Debug, Serialize)]
pub struct SessionOutline {
    pub name: String,
    pub duration: String,
    pub lessons: Vec<LessonOutline>,
}

#[derive(Debug, Serialize)]
pub struct LessonOutline {
    pub name: String,
    pub lesson_type: &'static str,
    pub duration: String,
}

impl From<&CourseSession> for SessionOutline {
    fn from(session: &CourseSession) -> Self {
        Self {
            name: session.name.clone(),
            duration: format_duration(session.full_time),
            lessons: session
                .lesson_list
                .iter()
                .map(|lesson| LessonOutline {
                    name: lesson.name.clone(),
                    lesson_type: lesson.lesson_type.as_str(),
                    duration: format_duration(lesson.full_time),
                })
                .collect(),
        }
    }
}

/// Public course page.
#[derive(Debug, Serialize)]
pub struct CourseDetailData {
    pub course: Course,
    pub description_html: String,
    pub content_html: String,
    pub price: String,
    pub price_paid: Option<String>,
    pub duration: String,
    pub sessions: Vec<SessionOutline>,
    pub can_add_to_cart: bool,
    pub can_review: bool,
    pub can_subscribe: bool,
}

impl CourseDetailData {
    pub fn new(course: Course, is_student: bool) -> Self {
        let discounted = course.discount > 0.0;
        Self {
            description_html: sanitize(course.description.as_deref().unwrap_or_default()),
            content_html: sanitize(course.content.as_deref().unwrap_or_default()),
            price: format_currency(course.price),
            price_paid: discounted
                .then(|| format_currency(course.price * (100.0 - course.discount) / 100.0)),
            duration: format_duration(course.full_time),
            sessions: course.session_list.iter().map(SessionOutline::from).collect(),
            can_add_to_cart: is_student && !course.is_purchased && !course.is_in_cart,
            can_review: is_student && course.is_purchased,
            can_subscribe: is_student && course.user_id.is_some(),
            course,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BlogDetailData {
    pub blog: Blog,
    pub content_html: String,
    pub published: String,
}

impl From<Blog> for BlogDetailData {
    fn from(blog: Blog) -> Self {
        Self {
            content_html: sanitize(blog.content.as_deref().unwrap_or_default()),
            published: format_date(blog.created_at.as_ref()),
            blog,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AccountData {
    pub user: User,
}
