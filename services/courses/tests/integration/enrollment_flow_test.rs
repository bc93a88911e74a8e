use chrono::Utc;
use uuid::Uuid;

use learnhub_courses::domain::repository::{EnrollmentRepository, Redemption};
use learnhub_courses::domain::types::{CouponKind, Enrollment, EnrollmentStatus};
use learnhub_courses::error::CoursesServiceError;
use learnhub_courses::usecase::enrollment::{
    BeginCheckoutInput, BeginCheckoutUseCase, ConfirmPaymentInput, ConfirmPaymentUseCase,
};

use crate::helpers::{
    InMemoryCouponRepo, InMemoryCourseRepo, InMemoryEnrollmentRepo, MockPaymentGateway, coupon,
    course,
};

#[tokio::test]
async fn should_checkout_with_coupon_and_activate_on_confirm() {
    let user_id = Uuid::now_v7();
    let paid_course = course(10_000);

    let courses = InMemoryCourseRepo::default();
    courses.add(paid_course.clone(), vec![]);

    let enrollments = InMemoryEnrollmentRepo::default();
    let coupons = InMemoryCouponRepo::default();
    let twenty_off = coupon("TWENTY", CouponKind::Percentage, 20);
    coupons.coupons.lock().unwrap().push(twenty_off.clone());
    // activate() bumps used_count through the enrollment repo's view.
    enrollments.coupons.lock().unwrap().push(twenty_off.clone());

    let payment = MockPaymentGateway::default();

    let checkout = BeginCheckoutUseCase {
        courses: courses.clone(),
        enrollments: enrollments.clone(),
        coupons: coupons.clone(),
        payment: payment.clone(),
    };
    let output = checkout
        .execute(
            user_id,
            BeginCheckoutInput {
                course_id: paid_course.id,
                coupon_code: Some("TWENTY".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(output.amount, 8_000);

    // A checkout session was opened for the discounted amount.
    assert_eq!(
        *payment.sessions.lock().unwrap(),
        vec![(output.enrollment_id, 8_000)]
    );

    // Enrollment is pending until the provider confirms.
    let pending = enrollments
        .find_by_user_course_sync(user_id, paid_course.id)
        .unwrap();
    assert_eq!(pending.status, EnrollmentStatus::Pending);
    assert_eq!(pending.coupon_id, Some(twenty_off.id));

    let confirm = ConfirmPaymentUseCase {
        enrollments: enrollments.clone(),
    };
    let outcome = confirm
        .execute(ConfirmPaymentInput {
            enrollment_id: output.enrollment_id,
            succeeded: true,
        })
        .await
        .unwrap();
    assert!(outcome.activated);

    let active = enrollments
        .find_by_user_course_sync(user_id, paid_course.id)
        .unwrap();
    assert_eq!(active.status, EnrollmentStatus::Active);

    // Redemption was recorded exactly once.
    assert_eq!(enrollments.redemptions.lock().unwrap().len(), 1);
    assert_eq!(enrollments.coupons.lock().unwrap()[0].used_count, 1);

    // Duplicate webhook delivery is a no-op.
    let outcome = confirm
        .execute(ConfirmPaymentInput {
            enrollment_id: output.enrollment_id,
            succeeded: true,
        })
        .await
        .unwrap();
    assert!(!outcome.activated);
    assert_eq!(enrollments.redemptions.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn racing_confirms_redeem_the_coupon_once() {
    let user_id = Uuid::now_v7();
    let enrollments = InMemoryEnrollmentRepo::default();
    let ten_off = coupon("TEN", CouponKind::Flat, 1_000);
    enrollments.coupons.lock().unwrap().push(ten_off.clone());

    let now = Utc::now();
    let enrollment_id = Uuid::now_v7();
    enrollments.enrollments.lock().unwrap().push(Enrollment {
        id: enrollment_id,
        user_id,
        course_id: Uuid::now_v7(),
        amount: 9_000,
        status: EnrollmentStatus::Pending,
        coupon_id: Some(ten_off.id),
        created_at: now,
        updated_at: now,
    });

    // Both deliveries observed the row as Pending before either activation
    // ran; only the first may redeem.
    let redemption = || {
        Some(Redemption {
            coupon_id: ten_off.id,
            user_id,
        })
    };
    let first = enrollments
        .activate(enrollment_id, redemption())
        .await
        .unwrap();
    let second = enrollments
        .activate(enrollment_id, redemption())
        .await
        .unwrap();
    assert_eq!(first.status, EnrollmentStatus::Active);
    assert_eq!(second.status, EnrollmentStatus::Active);

    assert_eq!(enrollments.redemptions.lock().unwrap().len(), 1);
    assert_eq!(enrollments.coupons.lock().unwrap()[0].used_count, 1);
}

#[tokio::test]
async fn exhausted_coupon_fails_at_confirm_not_silently() {
    let user_id = Uuid::now_v7();
    let paid_course = course(10_000);

    let courses = InMemoryCourseRepo::default();
    courses.add(paid_course.clone(), vec![]);

    let enrollments = InMemoryEnrollmentRepo::default();
    let coupons = InMemoryCouponRepo::default();
    let mut last_seat = coupon("LAST", CouponKind::Flat, 1_000);
    last_seat.usage_limit = 1;
    coupons.coupons.lock().unwrap().push(last_seat.clone());
    // Someone else redeems the final seat between checkout and confirm.
    last_seat.used_count = 1;
    enrollments.coupons.lock().unwrap().push(last_seat);

    let checkout = BeginCheckoutUseCase {
        courses: courses.clone(),
        enrollments: enrollments.clone(),
        coupons: coupons.clone(),
        payment: MockPaymentGateway::default(),
    };
    let output = checkout
        .execute(
            user_id,
            BeginCheckoutInput {
                course_id: paid_course.id,
                coupon_code: Some("LAST".into()),
            },
        )
        .await
        .unwrap();

    let confirm = ConfirmPaymentUseCase {
        enrollments: enrollments.clone(),
    };
    let result = confirm
        .execute(ConfirmPaymentInput {
            enrollment_id: output.enrollment_id,
            succeeded: true,
        })
        .await;
    assert!(matches!(
        result,
        Err(CoursesServiceError::CouponLimitReached)
    ));

    // Nothing was activated or recorded.
    let still_pending = enrollments
        .find_by_user_course_sync(user_id, paid_course.id)
        .unwrap();
    assert_eq!(still_pending.status, EnrollmentStatus::Pending);
    assert!(enrollments.redemptions.lock().unwrap().is_empty());
}
