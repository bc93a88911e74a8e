use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{
    CertificateRepository, CourseRepository, EnrollmentRepository, ProgressRepository,
};
use crate::domain::types::{Certificate, EnrollmentStatus, LessonProgress};
use crate::error::CoursesServiceError;
use crate::usecase::certificate::IssueCertificateUseCase;

pub struct SetLessonCompletionInput {
    pub lesson_id: Uuid,
    pub completed: bool,
}

pub struct ProgressSummary {
    pub course_id: Uuid,
    pub completed_lessons: u64,
    pub total_lessons: u64,
    /// Present when this call crossed the completion threshold (or the
    /// threshold had already been crossed and a certificate exists).
    pub certificate: Option<Certificate>,
    /// True only on the call whose issuance stored the row; a repeated
    /// completion returns the existing certificate with `false`.
    pub certificate_created: bool,
}

/// Record a lesson completion flag and, when the flag completes the course,
/// issue the certificate inline.
///
/// The write is an upsert on (user, lesson), so re-marking a completed
/// lesson changes nothing and never double-issues.
pub struct SetLessonCompletionUseCase<
    C: CourseRepository,
    E: EnrollmentRepository,
    P: ProgressRepository,
    R: CertificateRepository,
> {
    pub courses: C,
    pub enrollments: E,
    pub progress: P,
    pub certificates: R,
}

impl<C, E, P, R> SetLessonCompletionUseCase<C, E, P, R>
where
    C: CourseRepository + Clone,
    E: EnrollmentRepository,
    P: ProgressRepository,
    R: CertificateRepository + Clone,
{
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: SetLessonCompletionInput,
    ) -> Result<ProgressSummary, CoursesServiceError> {
        let course = self
            .courses
            .course_of_lesson(input.lesson_id)
            .await?
            .ok_or(CoursesServiceError::LessonNotFound)?;

        let enrolled = self
            .enrollments
            .find_by_user_course(user_id, course.id)
            .await?
            .is_some_and(|e| e.status == EnrollmentStatus::Active);
        if !enrolled {
            return Err(CoursesServiceError::NotEnrolled);
        }

        let now = Utc::now();
        self.progress
            .upsert(&LessonProgress {
                user_id,
                lesson_id: input.lesson_id,
                completed: input.completed,
                created_at: now,
                updated_at: now,
            })
            .await?;

        let total_lessons = self.courses.count_lessons(course.id).await?;
        let completed_lessons = self.progress.count_completed(user_id, course.id).await?;

        // A course with zero lessons can never certify.
        let (certificate, certificate_created) =
            if total_lessons > 0 && completed_lessons >= total_lessons {
                let issuer = IssueCertificateUseCase {
                    courses: self.courses.clone(),
                    certificates: self.certificates.clone(),
                };
                let issued = issuer.execute(user_id, course.id).await?;
                (Some(issued.certificate), issued.created)
            } else {
                (None, false)
            };

        Ok(ProgressSummary {
            course_id: course.id,
            completed_lessons,
            total_lessons,
            certificate,
            certificate_created,
        })
    }
}
