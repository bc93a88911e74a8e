//! sea-orm entities for the courses service.

pub mod certificates;
pub mod chapters;
pub mod coupon_usages;
pub mod coupons;
pub mod courses;
pub mod enrollments;
pub mod lesson_progress;
pub mod lessons;
pub mod payout_requests;
pub mod teacher_profiles;
pub mod users;
