use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Courses service domain error variants.
///
/// Business-rule rejections (coupon, payout, verification) map to 422;
/// invalid state transitions to 400; everything a client can retry with
/// different input keeps its own `kind` so callers can branch on it.
#[derive(Debug, thiserror::Error)]
pub enum CoursesServiceError {
    #[error("course not found")]
    CourseNotFound,
    #[error("lesson not found")]
    LessonNotFound,
    #[error("enrollment not found")]
    EnrollmentNotFound,
    #[error("coupon not found")]
    CouponNotFound,
    #[error("payout request not found")]
    PayoutNotFound,
    #[error("already enrolled")]
    AlreadyEnrolled,
    #[error("not enrolled in this course")]
    NotEnrolled,
    #[error("course is not free")]
    CourseNotFree,
    #[error("course is free")]
    CourseFree,
    #[error("coupon is not active")]
    CouponInactive,
    #[error("coupon has expired")]
    CouponExpired,
    #[error("coupon usage limit reached")]
    CouponLimitReached,
    #[error("coupon does not apply to this purchase")]
    CouponNotApplicable,
    #[error("coupon is scoped to a different teacher")]
    CouponWrongTeacher,
    #[error("coupon already used by this user")]
    CouponAlreadyUsed,
    #[error("teacher profile is not verified")]
    TeacherNotVerified,
    #[error("invalid payout status transition")]
    InvalidPayoutTransition,
    #[error("payment provider call failed")]
    PaymentFailed,
    #[error("missing data")]
    MissingData,
    #[error("forbidden")]
    Forbidden,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl CoursesServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CourseNotFound => "COURSE_NOT_FOUND",
            Self::LessonNotFound => "LESSON_NOT_FOUND",
            Self::EnrollmentNotFound => "ENROLLMENT_NOT_FOUND",
            Self::CouponNotFound => "COUPON_NOT_FOUND",
            Self::PayoutNotFound => "PAYOUT_NOT_FOUND",
            Self::AlreadyEnrolled => "ALREADY_ENROLLED",
            Self::NotEnrolled => "NOT_ENROLLED",
            Self::CourseNotFree => "COURSE_NOT_FREE",
            Self::CourseFree => "COURSE_FREE",
            Self::CouponInactive => "COUPON_INACTIVE",
            Self::CouponExpired => "COUPON_EXPIRED",
            Self::CouponLimitReached => "COUPON_LIMIT_REACHED",
            Self::CouponNotApplicable => "COUPON_NOT_APPLICABLE",
            Self::CouponWrongTeacher => "COUPON_WRONG_TEACHER",
            Self::CouponAlreadyUsed => "COUPON_ALREADY_USED",
            Self::TeacherNotVerified => "TEACHER_NOT_VERIFIED",
            Self::InvalidPayoutTransition => "INVALID_PAYOUT_TRANSITION",
            Self::PaymentFailed => "PAYMENT_FAILED",
            Self::MissingData => "MISSING_DATA",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for CoursesServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::CourseNotFound
            | Self::LessonNotFound
            | Self::EnrollmentNotFound
            | Self::CouponNotFound
            | Self::PayoutNotFound => StatusCode::NOT_FOUND,
            Self::AlreadyEnrolled => StatusCode::CONFLICT,
            Self::NotEnrolled | Self::Forbidden => StatusCode::FORBIDDEN,
            Self::CourseNotFree
            | Self::CourseFree
            | Self::CouponInactive
            | Self::CouponExpired
            | Self::CouponLimitReached
            | Self::CouponNotApplicable
            | Self::CouponWrongTeacher
            | Self::CouponAlreadyUsed
            | Self::TeacherNotVerified => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InvalidPayoutTransition | Self::MissingData => StatusCode::BAD_REQUEST,
            Self::PaymentFailed => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::response::IntoResponse;

    async fn assert_error(
        error: CoursesServiceError,
        expected_status: StatusCode,
        expected_kind: &str,
    ) {
        let resp = error.into_response();
        assert_eq!(resp.status(), expected_status);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["kind"], expected_kind);
        assert!(json["message"].is_string());
    }

    #[tokio::test]
    async fn should_return_course_not_found() {
        assert_error(
            CoursesServiceError::CourseNotFound,
            StatusCode::NOT_FOUND,
            "COURSE_NOT_FOUND",
        )
        .await;
    }

    #[tokio::test]
    async fn should_return_already_enrolled_as_conflict() {
        assert_error(
            CoursesServiceError::AlreadyEnrolled,
            StatusCode::CONFLICT,
            "ALREADY_ENROLLED",
        )
        .await;
    }

    #[tokio::test]
    async fn should_return_not_enrolled_as_forbidden() {
        assert_error(
            CoursesServiceError::NotEnrolled,
            StatusCode::FORBIDDEN,
            "NOT_ENROLLED",
        )
        .await;
    }

    #[tokio::test]
    async fn coupon_rejections_are_unprocessable() {
        assert_error(
            CoursesServiceError::CouponExpired,
            StatusCode::UNPROCESSABLE_ENTITY,
            "COUPON_EXPIRED",
        )
        .await;
        assert_error(
            CoursesServiceError::CouponLimitReached,
            StatusCode::UNPROCESSABLE_ENTITY,
            "COUPON_LIMIT_REACHED",
        )
        .await;
        assert_error(
            CoursesServiceError::CouponWrongTeacher,
            StatusCode::UNPROCESSABLE_ENTITY,
            "COUPON_WRONG_TEACHER",
        )
        .await;
    }

    #[tokio::test]
    async fn invalid_payout_transition_is_bad_request() {
        assert_error(
            CoursesServiceError::InvalidPayoutTransition,
            StatusCode::BAD_REQUEST,
            "INVALID_PAYOUT_TRANSITION",
        )
        .await;
    }

    #[tokio::test]
    async fn payment_failure_is_bad_gateway() {
        assert_error(
            CoursesServiceError::PaymentFailed,
            StatusCode::BAD_GATEWAY,
            "PAYMENT_FAILED",
        )
        .await;
    }

    #[tokio::test]
    async fn internal_is_500_with_generic_message() {
        let resp = CoursesServiceError::Internal(anyhow::anyhow!("db error")).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["message"], "internal error");
    }
}
