use chrono::Utc;
use uuid::Uuid;

use learnhub_domain::pagination::PageRequest;

use crate::domain::repository::{
    CouponRepository, CourseRepository, EnrollmentRepository, PaymentGatewayPort, Redemption,
};
use crate::domain::types::{
    CourseStatus, Enrollment, EnrollmentStatus,
};
use crate::error::CoursesServiceError;
use crate::usecase::coupon::{self, CouponContext};

/// Context type used when matching coupons against course purchases.
pub const COURSE_CONTEXT: &str = "COURSE";

// ── EnrollFree ───────────────────────────────────────────────────────────────

pub struct EnrollFreeOutcome {
    /// `false` means the user was already enrolled (soft success, no-op).
    pub enrolled: bool,
}

pub struct EnrollFreeUseCase<C: CourseRepository, E: EnrollmentRepository> {
    pub courses: C,
    pub enrollments: E,
}

impl<C: CourseRepository, E: EnrollmentRepository> EnrollFreeUseCase<C, E> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<EnrollFreeOutcome, CoursesServiceError> {
        let course = self
            .courses
            .find_by_id(course_id)
            .await?
            .filter(|c| c.status == CourseStatus::Published)
            .ok_or(CoursesServiceError::CourseNotFound)?;
        if course.price > 0 {
            return Err(CoursesServiceError::CourseNotFree);
        }

        let now = Utc::now();
        let enrollment = Enrollment {
            id: Uuid::now_v7(),
            user_id,
            course_id,
            amount: 0,
            status: EnrollmentStatus::Active,
            coupon_id: None,
            created_at: now,
            updated_at: now,
        };
        let enrolled = self.enrollments.insert_if_absent(&enrollment).await?;
        Ok(EnrollFreeOutcome { enrolled })
    }
}

// ── BeginCheckout ────────────────────────────────────────────────────────────

pub struct BeginCheckoutInput {
    pub course_id: Uuid,
    pub coupon_code: Option<String>,
}

pub struct BeginCheckoutOutput {
    pub enrollment_id: Uuid,
    pub amount: i64,
    pub checkout_url: String,
}

pub struct BeginCheckoutUseCase<
    C: CourseRepository,
    E: EnrollmentRepository,
    K: CouponRepository,
    P: PaymentGatewayPort,
> {
    pub courses: C,
    pub enrollments: E,
    pub coupons: K,
    pub payment: P,
}

impl<C, E, K, P> BeginCheckoutUseCase<C, E, K, P>
where
    C: CourseRepository,
    E: EnrollmentRepository,
    K: CouponRepository,
    P: PaymentGatewayPort,
{
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: BeginCheckoutInput,
    ) -> Result<BeginCheckoutOutput, CoursesServiceError> {
        let course = self
            .courses
            .find_by_id(input.course_id)
            .await?
            .filter(|c| c.status == CourseStatus::Published)
            .ok_or(CoursesServiceError::CourseNotFound)?;
        if course.price == 0 {
            return Err(CoursesServiceError::CourseFree);
        }

        if let Some(existing) = self
            .enrollments
            .find_by_user_course(user_id, course.id)
            .await?
        {
            if existing.status == EnrollmentStatus::Active {
                return Err(CoursesServiceError::AlreadyEnrolled);
            }
        }

        // Quote only — redemption is recorded when the payment confirms.
        let (amount, coupon_id) = match input.coupon_code {
            Some(ref code) => {
                let coupon = self
                    .coupons
                    .find_by_code(code)
                    .await?
                    .ok_or(CoursesServiceError::CouponNotFound)?;
                let redemptions = self
                    .coupons
                    .count_user_redemptions(coupon.id, user_id)
                    .await?;
                let ctx = CouponContext {
                    entity_type: COURSE_CONTEXT.into(),
                    teacher_id: Some(course.teacher_id),
                };
                let quote =
                    coupon::evaluate(&coupon, &ctx, course.price, redemptions, Utc::now())?;
                (quote.final_price, Some(quote.coupon_id))
            }
            None => (course.price, None),
        };

        let now = Utc::now();
        let enrollment = Enrollment {
            id: Uuid::now_v7(),
            user_id,
            course_id: course.id,
            amount,
            status: EnrollmentStatus::Pending,
            coupon_id,
            created_at: now,
            updated_at: now,
        };
        self.enrollments.upsert_pending(&enrollment).await?;
        // The upsert may have kept an earlier row's id; re-read for the real one.
        let stored = self
            .enrollments
            .find_by_user_course(user_id, course.id)
            .await?
            .ok_or(CoursesServiceError::EnrollmentNotFound)?;

        let session = self.payment.create_checkout(stored.id, amount).await?;
        Ok(BeginCheckoutOutput {
            enrollment_id: stored.id,
            amount,
            checkout_url: session.checkout_url,
        })
    }
}

// ── ConfirmPayment ───────────────────────────────────────────────────────────

pub struct ConfirmPaymentInput {
    pub enrollment_id: Uuid,
    pub succeeded: bool,
}

pub struct ConfirmPaymentOutcome {
    pub activated: bool,
}

pub struct ConfirmPaymentUseCase<E: EnrollmentRepository> {
    pub enrollments: E,
}

impl<E: EnrollmentRepository> ConfirmPaymentUseCase<E> {
    pub async fn execute(
        &self,
        input: ConfirmPaymentInput,
    ) -> Result<ConfirmPaymentOutcome, CoursesServiceError> {
        let enrollment = self
            .enrollments
            .find_by_id(input.enrollment_id)
            .await?
            .ok_or(CoursesServiceError::EnrollmentNotFound)?;

        if !input.succeeded {
            tracing::info!(enrollment_id = %enrollment.id, "payment declined, enrollment stays pending");
            return Ok(ConfirmPaymentOutcome { activated: false });
        }
        if enrollment.status == EnrollmentStatus::Active {
            // Duplicate webhook delivery; nothing to do.
            return Ok(ConfirmPaymentOutcome { activated: false });
        }

        let redemption = enrollment.coupon_id.map(|coupon_id| Redemption {
            coupon_id,
            user_id: enrollment.user_id,
        });
        self.enrollments.activate(enrollment.id, redemption).await?;
        Ok(ConfirmPaymentOutcome { activated: true })
    }
}

// ── ListEnrollments ──────────────────────────────────────────────────────────

pub struct ListEnrollmentsUseCase<E: EnrollmentRepository> {
    pub enrollments: E,
}

impl<E: EnrollmentRepository> ListEnrollmentsUseCase<E> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Enrollment>, CoursesServiceError> {
        self.enrollments.list_for_user(user_id, page).await
    }
}
