//! Money arithmetic.
//!
//! All amounts are integer cents (`i64`). Percentage math rounds half-up so
//! that a 20% coupon on 1000 cents is exactly 200 cents, never 199.

/// Platform commission on payouts, in basis points (8%).
pub const PLATFORM_COMMISSION_BPS: i64 = 800;

/// `round(amount * percent / 100)` with half-up rounding.
///
/// Both arguments must be non-negative; callers validate before reaching here.
pub fn percentage_of(amount: i64, percent: i64) -> i64 {
    (amount * percent + 50) / 100
}

/// Clamp a discount so the final price never goes below zero.
pub fn clamp_discount(original: i64, discount: i64) -> i64 {
    discount.clamp(0, original.max(0))
}

/// Commission fee withheld from a payout, half-up rounded.
pub fn commission_fee(amount: i64) -> i64 {
    (amount * PLATFORM_COMMISSION_BPS + 5_000) / 10_000
}

/// Payout amount after the platform commission.
pub fn net_after_commission(amount: i64) -> i64 {
    amount - commission_fee(amount)
}
