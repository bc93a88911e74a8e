use axum::{
    Router,
    routing::{get, patch, post, put},
};

use learnhub_core::health::{healthz, readyz};
use learnhub_core::middleware::request_id_layer;

use crate::handlers::{
    coupon::apply_coupon,
    course::set_course_status,
    enrollment::{begin_checkout, confirm_payment, enroll_free, get_enrollments},
    payout::{create_payout, get_payouts, review_payout},
    progress::set_lesson_progress,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Enrollment
        .route("/courses/{course_id}/enroll-free", post(enroll_free))
        .route("/courses/{course_id}/checkout", post(begin_checkout))
        .route("/payments/confirm", post(confirm_payment))
        .route("/users/@me/enrollments", get(get_enrollments))
        // Progress
        .route("/lessons/{lesson_id}/progress", put(set_lesson_progress))
        // Coupons
        .route("/coupons/apply", post(apply_coupon))
        // Payouts
        .route("/payouts", post(create_payout))
        .route("/payouts", get(get_payouts))
        .route("/payouts/{payout_id}", patch(review_payout))
        // Moderation
        .route("/courses/{course_id}/status", patch(set_course_status))
        .layer(request_id_layer())
        .with_state(state)
}
