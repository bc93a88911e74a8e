use chrono::{DateTime, Utc};
use uuid::Uuid;

use learnhub_domain::money;

use crate::domain::repository::CouponRepository;
use crate::domain::types::{Coupon, CouponKind, CouponQuote};
use crate::error::CoursesServiceError;

/// What the coupon is being applied to. `entity_type` matches against the
/// coupon's `applicable_on` list; `teacher_id` against its teacher scope.
#[derive(Debug, Clone)]
pub struct CouponContext {
    pub entity_type: String,
    pub teacher_id: Option<Uuid>,
}

/// Validate a coupon against a context and compute the discounted price.
///
/// Checks short-circuit in a fixed order: active → expiry → global limit →
/// applicability → teacher scope → per-user limit. The first failure wins,
/// so a caller always sees the same rejection for the same coupon state.
/// Existence (`CouponNotFound`) is the caller's check.
///
/// Evaluation never records usage — redemption is recorded at
/// payment-confirmation time so an abandoned checkout costs nothing.
pub fn evaluate(
    coupon: &Coupon,
    ctx: &CouponContext,
    original_price: i64,
    user_redemptions: u64,
    now: DateTime<Utc>,
) -> Result<CouponQuote, CoursesServiceError> {
    if !coupon.is_active {
        return Err(CoursesServiceError::CouponInactive);
    }
    if now > coupon.expires_at {
        return Err(CoursesServiceError::CouponExpired);
    }
    if coupon.used_count >= coupon.usage_limit {
        return Err(CoursesServiceError::CouponLimitReached);
    }
    if !coupon.applies_to(&ctx.entity_type) {
        return Err(CoursesServiceError::CouponNotApplicable);
    }
    if let Some(scope) = coupon.teacher_id {
        if ctx.teacher_id != Some(scope) {
            return Err(CoursesServiceError::CouponWrongTeacher);
        }
    }
    if user_redemptions >= coupon.per_user_limit as u64 {
        return Err(CoursesServiceError::CouponAlreadyUsed);
    }

    let raw = match coupon.kind {
        CouponKind::Percentage => money::percentage_of(original_price, coupon.value),
        CouponKind::Flat => coupon.value,
    };
    let discount_amount = money::clamp_discount(original_price, raw);
    Ok(CouponQuote {
        coupon_id: coupon.id,
        discount_amount,
        final_price: original_price - discount_amount,
    })
}

// ── ApplyCoupon ──────────────────────────────────────────────────────────────

pub struct ApplyCouponInput {
    pub code: String,
    pub original_price: i64,
    pub context: CouponContext,
}

pub struct ApplyCouponUseCase<C: CouponRepository> {
    pub coupons: C,
}

impl<C: CouponRepository> ApplyCouponUseCase<C> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: ApplyCouponInput,
    ) -> Result<CouponQuote, CoursesServiceError> {
        if input.original_price < 0 {
            return Err(CoursesServiceError::MissingData);
        }
        let coupon = self
            .coupons
            .find_by_code(&input.code)
            .await?
            .ok_or(CoursesServiceError::CouponNotFound)?;
        let redemptions = self
            .coupons
            .count_user_redemptions(coupon.id, user_id)
            .await?;
        evaluate(
            &coupon,
            &input.context,
            input.original_price,
            redemptions,
            Utc::now(),
        )
    }
}
