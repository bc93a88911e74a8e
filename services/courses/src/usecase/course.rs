use uuid::Uuid;

use crate::domain::repository::{CourseRepository, NotifierPort};
use crate::domain::types::{Course, CourseStatus};
use crate::error::CoursesServiceError;

/// Moderation: publish or unpublish a course and tell its teacher.
///
/// The notification is fire-and-forget. The status change is the operation;
/// a dispatcher outage must not roll it back.
pub struct SetCourseStatusUseCase<C: CourseRepository, N: NotifierPort> {
    pub courses: C,
    pub notifier: N,
}

impl<C: CourseRepository, N: NotifierPort> SetCourseStatusUseCase<C, N> {
    pub async fn execute(
        &self,
        course_id: Uuid,
        status: CourseStatus,
    ) -> Result<Course, CoursesServiceError> {
        let course = self
            .courses
            .find_by_id(course_id)
            .await?
            .ok_or(CoursesServiceError::CourseNotFound)?;

        if course.status != status {
            let updated = self.courses.update_status(course_id, status).await?;
            if !updated {
                return Err(CoursesServiceError::CourseNotFound);
            }

            let (subject, body) = match status {
                CourseStatus::Published => (
                    "Your course is live",
                    format!("\"{}\" has been approved and published.", course.title),
                ),
                CourseStatus::Draft => (
                    "Your course was unpublished",
                    format!("\"{}\" has been taken down pending review.", course.title),
                ),
            };
            if let Err(e) = self
                .notifier
                .notify(course.teacher_id, subject, &body)
                .await
            {
                tracing::warn!(
                    course_id = %course_id,
                    error = %e,
                    "course status notification failed"
                );
            }
        }

        Ok(Course { status, ..course })
    }
}
