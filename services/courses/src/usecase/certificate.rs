use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{CertificateRepository, CourseRepository};
use crate::domain::types::Certificate;
use crate::error::CoursesServiceError;

/// Issue a certificate for a finished course.
///
/// Callers decide *whether* completion happened (all lessons done); this
/// usecase only materializes the record. Concurrent duplicate triggers are
/// collapsed by the (user, course) unique constraint underneath
/// [`CertificateRepository::get_or_create`], so every racer observes the
/// same row.
pub struct IssueCertificateUseCase<C: CourseRepository, R: CertificateRepository> {
    pub courses: C,
    pub certificates: R,
}

pub struct IssuedCertificate {
    pub certificate: Certificate,
    /// `false` when an earlier issuance already existed.
    pub created: bool,
}

impl<C: CourseRepository, R: CertificateRepository> IssueCertificateUseCase<C, R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<IssuedCertificate, CoursesServiceError> {
        if let Some(existing) = self
            .certificates
            .find_by_user_course(user_id, course_id)
            .await?
        {
            return Ok(IssuedCertificate {
                certificate: existing,
                created: false,
            });
        }

        let names = self
            .courses
            .name_snapshot(user_id, course_id)
            .await?
            .ok_or(CoursesServiceError::CourseNotFound)?;

        let candidate = Certificate {
            id: Uuid::now_v7(),
            user_id,
            course_id,
            // Serial is the public identifier printed on the certificate;
            // random v4 so it leaks no ordering.
            serial: Uuid::new_v4().to_string(),
            student_name: names.student_name,
            course_name: names.course_name,
            teacher_name: names.teacher_name,
            completed_at: Utc::now(),
        };
        let (certificate, created) = self.certificates.get_or_create(&candidate).await?;
        Ok(IssuedCertificate {
            certificate,
            created,
        })
    }
}
