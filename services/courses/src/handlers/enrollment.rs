use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use learnhub_auth_types::identity::IdentityHeaders;
use learnhub_domain::pagination::PageRequest;
use learnhub_domain::role::Capability;

use crate::domain::types::Enrollment;
use crate::error::CoursesServiceError;
use crate::state::AppState;
use crate::usecase::enrollment::{
    BeginCheckoutInput, BeginCheckoutUseCase, ConfirmPaymentInput, ConfirmPaymentUseCase,
    EnrollFreeUseCase, ListEnrollmentsUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct EnrollmentResponse {
    pub id: Uuid,
    pub course_id: Uuid,
    pub amount: i64,
    pub status: String,
    #[serde(serialize_with = "learnhub_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Enrollment> for EnrollmentResponse {
    fn from(e: Enrollment) -> Self {
        let status = match e.status {
            crate::domain::types::EnrollmentStatus::Pending => "pending",
            crate::domain::types::EnrollmentStatus::Active => "active",
            crate::domain::types::EnrollmentStatus::Cancelled => "cancelled",
        };
        EnrollmentResponse {
            id: e.id,
            course_id: e.course_id,
            amount: e.amount,
            status: status.to_owned(),
            created_at: e.created_at,
        }
    }
}

// ── POST /courses/{course_id}/enroll-free ────────────────────────────────────

#[derive(Serialize)]
pub struct EnrollFreeResponse {
    /// `false` means the caller was already enrolled (soft success).
    pub enrolled: bool,
}

pub async fn enroll_free(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
) -> Result<(StatusCode, Json<EnrollFreeResponse>), CoursesServiceError> {
    if !identity.role.allows(Capability::Enroll) {
        return Err(CoursesServiceError::Forbidden);
    }
    let uc = EnrollFreeUseCase {
        courses: state.course_repo(),
        enrollments: state.enrollment_repo(),
    };
    let outcome = uc.execute(identity.user_id, course_id).await?;
    let status = if outcome.enrolled {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(EnrollFreeResponse {
            enrolled: outcome.enrolled,
        }),
    ))
}

// ── POST /courses/{course_id}/checkout ───────────────────────────────────────

#[derive(Deserialize)]
pub struct CheckoutRequest {
    pub coupon_code: Option<String>,
}

#[derive(Serialize)]
pub struct CheckoutResponse {
    pub enrollment_id: Uuid,
    pub amount: i64,
    pub checkout_url: String,
}

pub async fn begin_checkout(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
    Json(body): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, CoursesServiceError> {
    if !identity.role.allows(Capability::Enroll) {
        return Err(CoursesServiceError::Forbidden);
    }
    let uc = BeginCheckoutUseCase {
        courses: state.course_repo(),
        enrollments: state.enrollment_repo(),
        coupons: state.coupon_repo(),
        payment: state.payment_gateway(),
    };
    let output = uc
        .execute(
            identity.user_id,
            BeginCheckoutInput {
                course_id,
                coupon_code: body.coupon_code,
            },
        )
        .await?;
    Ok(Json(CheckoutResponse {
        enrollment_id: output.enrollment_id,
        amount: output.amount,
        checkout_url: output.checkout_url,
    }))
}

// ── POST /payments/confirm ───────────────────────────────────────────────────

/// Provider webhook. Authenticated at the gateway, not via user headers.
#[derive(Deserialize)]
pub struct ConfirmPaymentRequest {
    pub enrollment_id: Uuid,
    /// Provider's own session reference; logged, not interpreted.
    pub provider_ref: Option<String>,
    pub succeeded: bool,
}

pub async fn confirm_payment(
    State(state): State<AppState>,
    Json(body): Json<ConfirmPaymentRequest>,
) -> Result<StatusCode, CoursesServiceError> {
    if let Some(ref provider_ref) = body.provider_ref {
        tracing::info!(
            enrollment_id = %body.enrollment_id,
            provider_ref = %provider_ref,
            "payment confirmation received"
        );
    }
    let uc = ConfirmPaymentUseCase {
        enrollments: state.enrollment_repo(),
    };
    uc.execute(ConfirmPaymentInput {
        enrollment_id: body.enrollment_id,
        succeeded: body.succeeded,
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /users/@me/enrollments ───────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct EnrollmentListQuery {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

pub async fn get_enrollments(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Query(query): Query<EnrollmentListQuery>,
) -> Result<Json<Vec<EnrollmentResponse>>, CoursesServiceError> {
    let page = PageRequest {
        per_page: query.per_page.unwrap_or(20),
        page: query.page.unwrap_or(1),
    };
    let uc = ListEnrollmentsUseCase {
        enrollments: state.enrollment_repo(),
    };
    let enrollments = uc.execute(identity.user_id, page).await?;
    let items = enrollments.into_iter().map(EnrollmentResponse::from).collect();
    Ok(Json(items))
}
