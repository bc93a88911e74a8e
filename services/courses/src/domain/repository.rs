#![allow(async_fn_in_trait)]

use uuid::Uuid;

use learnhub_domain::pagination::PageRequest;

use crate::domain::types::{
    Certificate, CheckoutSession, Coupon, Course, CourseStatus, Enrollment, LessonProgress,
    NameSnapshot, PayoutRequest, PayoutStatus, TeacherProfile,
};
use crate::error::CoursesServiceError;

/// Repository for courses and their lesson tree.
pub trait CourseRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Course>, CoursesServiceError>;

    /// Resolve the course a lesson belongs to (lesson → chapter → course).
    async fn course_of_lesson(
        &self,
        lesson_id: Uuid,
    ) -> Result<Option<Course>, CoursesServiceError>;

    /// Total lessons across all chapters of a course.
    async fn count_lessons(&self, course_id: Uuid) -> Result<u64, CoursesServiceError>;

    /// Update course status. Returns `false` if the course does not exist.
    async fn update_status(
        &self,
        course_id: Uuid,
        status: CourseStatus,
    ) -> Result<bool, CoursesServiceError>;

    /// Student, course, and teacher names as of now, for certificate snapshots.
    async fn name_snapshot(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<Option<NameSnapshot>, CoursesServiceError>;
}

/// Coupon redemption recorded atomically with enrollment activation.
#[derive(Debug, Clone, Copy)]
pub struct Redemption {
    pub coupon_id: Uuid,
    pub user_id: Uuid,
}

/// Repository for enrollments.
pub trait EnrollmentRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Enrollment>, CoursesServiceError>;

    async fn find_by_user_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<Option<Enrollment>, CoursesServiceError>;

    /// Insert unless an enrollment for (user, course) already exists.
    /// Returns `false` when the unique constraint collapsed the insert.
    async fn insert_if_absent(
        &self,
        enrollment: &Enrollment,
    ) -> Result<bool, CoursesServiceError>;

    /// Create or refresh a Pending enrollment ahead of checkout.
    async fn upsert_pending(&self, enrollment: &Enrollment)
    -> Result<(), CoursesServiceError>;

    /// Transition Pending → Active and, in the same transaction, record the
    /// coupon redemption (guarded `used_count` increment + usage row).
    /// Fails with `CouponLimitReached` when the guard rejects the increment.
    /// A row that is no longer Pending is returned as-is without redeeming,
    /// so a replayed confirmation cannot consume a second redemption.
    async fn activate(
        &self,
        enrollment_id: Uuid,
        redemption: Option<Redemption>,
    ) -> Result<Enrollment, CoursesServiceError>;

    async fn list_for_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Enrollment>, CoursesServiceError>;
}

/// Repository for per-lesson completion flags.
pub trait ProgressRepository: Send + Sync {
    /// Upsert on the composite (user_id, lesson_id) key. Idempotent.
    async fn upsert(&self, progress: &LessonProgress) -> Result<(), CoursesServiceError>;

    async fn get(
        &self,
        user_id: Uuid,
        lesson_id: Uuid,
    ) -> Result<Option<LessonProgress>, CoursesServiceError>;

    /// Completed lessons for a user across one course's lesson tree.
    async fn count_completed(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<u64, CoursesServiceError>;
}

/// Repository for certificates.
pub trait CertificateRepository: Send + Sync {
    /// Conditional insert guarded by the (user_id, course_id) unique
    /// constraint. Returns the stored certificate and whether this call
    /// created it — concurrent duplicate triggers converge on one row.
    async fn get_or_create(
        &self,
        certificate: &Certificate,
    ) -> Result<(Certificate, bool), CoursesServiceError>;

    async fn find_by_user_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<Option<Certificate>, CoursesServiceError>;
}

/// Repository for coupons. Evaluation reads only; recording happens through
/// `EnrollmentRepository::activate` at payment-confirmation time.
pub trait CouponRepository: Send + Sync {
    async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, CoursesServiceError>;

    async fn count_user_redemptions(
        &self,
        coupon_id: Uuid,
        user_id: Uuid,
    ) -> Result<u64, CoursesServiceError>;
}

/// Repository for teacher profiles.
pub trait TeacherProfileRepository: Send + Sync {
    async fn find_by_user_id(
        &self,
        user_id: Uuid,
    ) -> Result<Option<TeacherProfile>, CoursesServiceError>;
}

/// Repository for payout requests.
pub trait PayoutRepository: Send + Sync {
    async fn create(&self, payout: &PayoutRequest) -> Result<(), CoursesServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PayoutRequest>, CoursesServiceError>;

    async fn list(
        &self,
        status: Option<PayoutStatus>,
        page: PageRequest,
    ) -> Result<Vec<PayoutRequest>, CoursesServiceError>;

    /// Persist a transitioned payout (status, review metadata, timestamps,
    /// computed amounts).
    async fn save_transition(&self, payout: &PayoutRequest) -> Result<(), CoursesServiceError>;
}

/// Port for the hosted payment provider. One synchronous call, no retry —
/// a failure surfaces immediately to the caller.
pub trait PaymentGatewayPort: Send + Sync {
    async fn create_checkout(
        &self,
        enrollment_id: Uuid,
        amount: i64,
    ) -> Result<CheckoutSession, CoursesServiceError>;
}

/// Port for the notification dispatcher. Fire-and-forget at call sites:
/// failures are logged, never propagated.
pub trait NotifierPort: Send + Sync {
    async fn notify(
        &self,
        user_id: Uuid,
        subject: &str,
        body: &str,
    ) -> Result<(), CoursesServiceError>;
}
