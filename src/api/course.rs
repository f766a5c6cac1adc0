use async_trait::async_trait;
use serde::Serialize;

use crate::api::{ApiClient, ApiResult, CourseReader, CourseWriter, Resource};
use crate::domain::course::{
    Course, CourseLog, CoursePayload, CourseSession, CourseStatus, CourseStatusChange, Lesson,
    LessonPayload, LessonType, SessionPayload,
};
use crate::domain::types::RecordId;
use crate::pagination::{Page, PageRequest};

fn trimmed(value: impl AsRef<str>) -> String {
    value.as_ref().trim().to_string()
}

/// `searchCondition` of `/api/course/search`.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct CourseSearch {
    pub keyword: String,
    /// Category id.
    pub category: String,
    pub status: String,
    pub is_deleted: bool,
}

impl CourseSearch {
    pub fn keyword(mut self, keyword: impl AsRef<str>) -> Self {
        self.keyword = trimmed(keyword);
        self
    }

    pub fn category(mut self, category_id: impl AsRef<str>) -> Self {
        self.category = trimmed(category_id);
        self
    }

    pub fn status(mut self, status: Option<CourseStatus>) -> Self {
        self.status = status.map(|s| s.as_str().to_string()).unwrap_or_default();
        self
    }

    pub fn deleted(mut self, is_deleted: bool) -> Self {
        self.is_deleted = is_deleted;
        self
    }
}

/// `searchCondition` of the public `/api/client/course/search`.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct CatalogCourseSearch {
    pub keyword: String,
    pub category_id: String,
    pub is_deleted: bool,
}

impl CatalogCourseSearch {
    pub fn keyword(mut self, keyword: impl AsRef<str>) -> Self {
        self.keyword = trimmed(keyword);
        self
    }

    pub fn category(mut self, category_id: impl AsRef<str>) -> Self {
        self.category_id = trimmed(category_id);
        self
    }
}

#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct SessionSearch {
    pub keyword: String,
    pub course_id: String,
    pub is_position_order: bool,
    pub is_deleted: bool,
}

impl SessionSearch {
    /// Chapters of one course in authoring order.
    pub fn for_course(course_id: &RecordId) -> Self {
        Self {
            course_id: course_id.to_string(),
            is_position_order: true,
            ..Self::default()
        }
    }

    pub fn keyword(mut self, keyword: impl AsRef<str>) -> Self {
        self.keyword = trimmed(keyword);
        self
    }
}

#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct LessonSearch {
    pub keyword: String,
    pub course_id: String,
    pub session_id: String,
    pub lesson_type: String,
    pub is_position_order: bool,
    pub is_deleted: bool,
}

impl LessonSearch {
    pub fn for_course(course_id: &RecordId) -> Self {
        Self {
            course_id: course_id.to_string(),
            is_position_order: true,
            ..Self::default()
        }
    }

    pub fn keyword(mut self, keyword: impl AsRef<str>) -> Self {
        self.keyword = trimmed(keyword);
        self
    }

    pub fn session(mut self, session_id: impl AsRef<str>) -> Self {
        self.session_id = trimmed(session_id);
        self
    }

    pub fn lesson_type(mut self, lesson_type: Option<LessonType>) -> Self {
        self.lesson_type = lesson_type
            .map(|t| t.as_str().to_string())
            .unwrap_or_default();
        self
    }
}

#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct CourseLogSearch {
    pub course_id: String,
    pub keyword: String,
    pub old_status: String,
    pub new_status: String,
    pub is_deleted: bool,
}

impl CourseLogSearch {
    pub fn keyword(mut self, keyword: impl AsRef<str>) -> Self {
        self.keyword = trimmed(keyword);
        self
    }

    pub fn course(mut self, course_id: impl AsRef<str>) -> Self {
        self.course_id = trimmed(course_id);
        self
    }

    pub fn old_status(mut self, status: Option<CourseStatus>) -> Self {
        self.old_status = status.map(|s| s.as_str().to_string()).unwrap_or_default();
        self
    }

    pub fn new_status(mut self, status: Option<CourseStatus>) -> Self {
        self.new_status = status.map(|s| s.as_str().to_string()).unwrap_or_default();
        self
    }
}

pub struct Courses;

impl Resource for Courses {
    type Record = Course;
    type Condition = CourseSearch;
    const SEARCH_PATH: &'static str = "/api/course/search";
}

pub struct CatalogCourses;

impl Resource for CatalogCourses {
    type Record = Course;
    type Condition = CatalogCourseSearch;
    const SEARCH_PATH: &'static str = "/api/client/course/search";
}

pub struct Sessions;

impl Resource for Sessions {
    type Record = CourseSession;
    type Condition = SessionSearch;
    const SEARCH_PATH: &'static str = "/api/session/search";
}

pub struct Lessons;

impl Resource for Lessons {
    type Record = Lesson;
    type Condition = LessonSearch;
    const SEARCH_PATH: &'static str = "/api/lesson/search";
}

pub struct CourseLogs;

impl Resource for CourseLogs {
    type Record = CourseLog;
    type Condition = CourseLogSearch;
    const SEARCH_PATH: &'static str = "/api/course/log/search";
}

#[async_trait]
impl CourseReader for ApiClient {
    async fn search_courses(
        &self,
        condition: &CourseSearch,
        page: PageRequest,
    ) -> ApiResult<Page<Course>> {
        self.search::<Courses>(condition, page).await
    }

    async fn get_course(&self, id: &RecordId) -> ApiResult<Course> {
        self.get_json(&format!("/api/course/{id}")).await
    }

    async fn search_catalog_courses(
        &self,
        condition: &CatalogCourseSearch,
        page: PageRequest,
    ) -> ApiResult<Page<Course>> {
        self.search::<CatalogCourses>(condition, page).await
    }

    async fn get_catalog_course(&self, id: &RecordId) -> ApiResult<Course> {
        self.get_json(&format!("/api/client/course/{id}")).await
    }

    async fn search_sessions(
        &self,
        condition: &SessionSearch,
        page: PageRequest,
    ) -> ApiResult<Page<CourseSession>> {
        self.search::<Sessions>(condition, page).await
    }

    async fn search_lessons(
        &self,
        condition: &LessonSearch,
        page: PageRequest,
    ) -> ApiResult<Page<Lesson>> {
        self.search::<Lessons>(condition, page).await
    }

    async fn search_course_logs(
        &self,
        condition: &CourseLogSearch,
        page: PageRequest,
    ) -> ApiResult<Page<CourseLog>> {
        self.search::<CourseLogs>(condition, page).await
    }
}

#[async_trait]
impl CourseWriter for ApiClient {
    async fn create_course(&self, payload: &CoursePayload) -> ApiResult<Course> {
        self.post_json("/api/course", payload).await
    }

    async fn update_course(&self, id: &RecordId, payload: &CoursePayload) -> ApiResult<Course> {
        self.put_json(&format!("/api/course/{id}"), payload).await
    }

    async fn delete_course(&self, id: &RecordId) -> ApiResult<()> {
        self.delete(&format!("/api/course/{id}")).await
    }

    async fn change_course_status(&self, change: &CourseStatusChange) -> ApiResult<()> {
        self.put_ack("/api/course/change-status", change).await
    }

    async fn create_session(&self, payload: &SessionPayload) -> ApiResult<CourseSession> {
        self.post_json("/api/session", payload).await
    }

    async fn update_session(
        &self,
        id: &RecordId,
        payload: &SessionPayload,
    ) -> ApiResult<CourseSession> {
        self.put_json(&format!("/api/session/{id}"), payload).await
    }

    async fn delete_session(&self, id: &RecordId) -> ApiResult<()> {
        self.delete(&format!("/api/session/{id}")).await
    }

    async fn create_lesson(&self, payload: &LessonPayload) -> ApiResult<Lesson> {
        self.post_json("/api/lesson", payload).await
    }

    async fn update_lesson(&self, id: &RecordId, payload: &LessonPayload) -> ApiResult<Lesson> {
        self.put_json(&format!("/api/lesson/{id}"), payload).await
    }

    async fn delete_lesson(&self, id: &RecordId) -> ApiResult<()> {
        self.delete(&format!("/api/lesson/{id}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_condition_keeps_empty_fields() {
        let condition = CourseSearch::default()
            .keyword("algebra")
            .status(Some(CourseStatus::WaitingApprove));
        assert_eq!(
            serde_json::to_value(&condition).unwrap(),
            serde_json::json!({
                "keyword": "algebra",
                "category": "",
                "status": "waiting_approve",
                "is_deleted": false
            })
        );
    }

    #[test]
    fn session_condition_orders_by_position() {
        let id = RecordId::new("c1").unwrap();
        let condition = SessionSearch::for_course(&id);
        assert_eq!(condition.course_id, "c1");
        assert!(condition.is_position_order);
        assert!(!condition.is_deleted);
    }

    #[test]
    fn lesson_condition_wire_shape() {
        let id = RecordId::new("c1").unwrap();
        let condition = LessonSearch::for_course(&id).lesson_type(Some(LessonType::Video));
        assert_eq!(
            serde_json::to_value(&condition).unwrap(),
            serde_json::json!({
                "keyword": "",
                "course_id": "c1",
                "session_id": "",
                "lesson_type": "video",
                "is_position_order": true,
                "is_deleted": false
            })
        );
    }
}
