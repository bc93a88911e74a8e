use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use learnhub_auth_types::identity::IdentityHeaders;

use crate::error::CoursesServiceError;
use crate::state::AppState;
use crate::usecase::coupon::{ApplyCouponInput, ApplyCouponUseCase, CouponContext};
use crate::usecase::enrollment::COURSE_CONTEXT;

#[derive(Deserialize)]
pub struct ApplyCouponContext {
    pub entity_type: Option<String>,
    /// Teacher owning whatever the coupon is being priced against, when known.
    pub teacher_id: Option<Uuid>,
}

#[derive(Deserialize)]
pub struct ApplyCouponRequest {
    pub code: String,
    pub original_price: i64,
    pub context: Option<ApplyCouponContext>,
}

#[derive(Serialize)]
pub struct CouponQuoteResponse {
    pub coupon_id: Uuid,
    pub discount_amount: i64,
    pub final_price: i64,
}

// ── POST /coupons/apply ──────────────────────────────────────────────────────

/// Dry-run pricing. Never records a redemption; that happens when the
/// payment actually confirms.
pub async fn apply_coupon(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<ApplyCouponRequest>,
) -> Result<Json<CouponQuoteResponse>, CoursesServiceError> {
    let context = match body.context {
        Some(ctx) => CouponContext {
            entity_type: ctx.entity_type.unwrap_or_else(|| COURSE_CONTEXT.into()),
            teacher_id: ctx.teacher_id,
        },
        None => CouponContext {
            entity_type: COURSE_CONTEXT.into(),
            teacher_id: None,
        },
    };
    let uc = ApplyCouponUseCase {
        coupons: state.coupon_repo(),
    };
    let quote = uc
        .execute(
            identity.user_id,
            ApplyCouponInput {
                code: body.code,
                original_price: body.original_price,
                context,
            },
        )
        .await?;
    Ok(Json(CouponQuoteResponse {
        coupon_id: quote.coupon_id,
        discount_amount: quote.discount_amount,
        final_price: quote.final_price,
    }))
}
