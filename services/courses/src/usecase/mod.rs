pub mod certificate;
pub mod coupon;
pub mod course;
pub mod enrollment;
pub mod payout;
pub mod progress;
