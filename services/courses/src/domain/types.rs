use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Course status. Wire format: `i16` (0 = Draft, 1 = Published).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseStatus {
    Draft = 0,
    Published = 1,
}

impl CourseStatus {
    pub fn from_i16(v: i16) -> Option<Self> {
        match v {
            0 => Some(Self::Draft),
            1 => Some(Self::Published),
            _ => None,
        }
    }

    pub fn as_i16(self) -> i16 {
        self as i16
    }
}

/// Enrollment status. Wire format: `i16` (0 = Pending, 1 = Active, 2 = Cancelled).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentStatus {
    Pending = 0,
    Active = 1,
    Cancelled = 2,
}

impl EnrollmentStatus {
    pub fn from_i16(v: i16) -> Option<Self> {
        match v {
            0 => Some(Self::Pending),
            1 => Some(Self::Active),
            2 => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn as_i16(self) -> i16 {
        self as i16
    }
}

/// Coupon kind. Wire format: `i16` (0 = Percentage, 1 = Flat cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouponKind {
    Percentage = 0,
    Flat = 1,
}

impl CouponKind {
    pub fn from_i16(v: i16) -> Option<Self> {
        match v {
            0 => Some(Self::Percentage),
            1 => Some(Self::Flat),
            _ => None,
        }
    }

    pub fn as_i16(self) -> i16 {
        self as i16
    }
}

/// Payout request status. Wire format: `i16`.
///
/// `Pending` is the only initial state; `Rejected` and `Completed` are
/// terminal. [`PayoutStatus::can_transition_to`] is the single source of
/// truth for the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayoutStatus {
    Pending = 0,
    Approved = 1,
    Rejected = 2,
    Completed = 3,
}

impl PayoutStatus {
    pub fn from_i16(v: i16) -> Option<Self> {
        match v {
            0 => Some(Self::Pending),
            1 => Some(Self::Approved),
            2 => Some(Self::Rejected),
            3 => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn as_i16(self) -> i16 {
        self as i16
    }

    /// Pending → {Approved, Rejected}; Approved → Completed; nothing else.
    pub fn can_transition_to(self, next: PayoutStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved)
                | (Self::Pending, Self::Rejected)
                | (Self::Approved, Self::Completed)
        )
    }
}

/// Course owned by a teacher. `price` in cents; 0 means free.
#[derive(Debug, Clone)]
pub struct Course {
    pub id: Uuid,
    pub teacher_id: Uuid,
    pub title: String,
    pub price: i64,
    pub status: CourseStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Enrollment tying a user to a course. At most one per (user, course).
#[derive(Debug, Clone)]
pub struct Enrollment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub amount: i64,
    pub status: EnrollmentStatus,
    pub coupon_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-user, per-lesson completion flag.
#[derive(Debug, Clone)]
pub struct LessonProgress {
    pub user_id: Uuid,
    pub lesson_id: Uuid,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Immutable proof-of-completion record.
#[derive(Debug, Clone)]
pub struct Certificate {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub serial: String,
    pub student_name: String,
    pub course_name: String,
    pub teacher_name: String,
    pub completed_at: DateTime<Utc>,
}

/// Names snapshotted onto a certificate at issuance time.
#[derive(Debug, Clone)]
pub struct NameSnapshot {
    pub student_name: String,
    pub course_name: String,
    pub teacher_name: String,
}

/// Discount code with scoping, expiry, and usage-limit rules.
#[derive(Debug, Clone)]
pub struct Coupon {
    pub id: Uuid,
    pub code: String,
    pub kind: CouponKind,
    pub value: i64,
    pub is_active: bool,
    pub expires_at: DateTime<Utc>,
    pub usage_limit: i32,
    pub used_count: i32,
    pub per_user_limit: i32,
    pub teacher_id: Option<Uuid>,
    pub applicable_on: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Coupon {
    /// Scope policy: a coupon applies only to context types it explicitly
    /// lists. An empty `applicable_on` list therefore applies to nothing
    /// (deny-when-unscoped) — deliberate, not a fallthrough.
    pub fn applies_to(&self, entity_type: &str) -> bool {
        self.applicable_on.iter().any(|t| t == entity_type)
    }
}

/// Teacher profile; payouts are owned by this, not by the user row.
#[derive(Debug, Clone)]
pub struct TeacherProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Teacher withdrawal request.
#[derive(Debug, Clone)]
pub struct PayoutRequest {
    pub id: Uuid,
    pub teacher_profile_id: Uuid,
    pub requested_amount: i64,
    pub status: PayoutStatus,
    pub review_notes: Option<String>,
    pub net_amount: Option<i64>,
    pub processing_fee: Option<i64>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Successful coupon evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponQuote {
    pub coupon_id: Uuid,
    pub discount_amount: i64,
    pub final_price: i64,
}

/// Checkout session handed back by the payment provider.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub provider_ref: String,
    pub checkout_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn coupon_with_scopes(scopes: &[&str]) -> Coupon {
        Coupon {
            id: Uuid::now_v7(),
            code: "WELCOME".into(),
            kind: CouponKind::Percentage,
            value: 10,
            is_active: true,
            expires_at: Utc::now(),
            usage_limit: 100,
            used_count: 0,
            per_user_limit: 1,
            teacher_id: None,
            applicable_on: scopes.iter().map(|s| s.to_string()).collect(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn should_round_trip_status_wire_values() {
        for v in 0..=1 {
            assert_eq!(CourseStatus::from_i16(v).unwrap().as_i16(), v);
        }
        for v in 0..=2 {
            assert_eq!(EnrollmentStatus::from_i16(v).unwrap().as_i16(), v);
        }
        for v in 0..=3 {
            assert_eq!(PayoutStatus::from_i16(v).unwrap().as_i16(), v);
        }
        assert_eq!(CourseStatus::from_i16(7), None);
        assert_eq!(EnrollmentStatus::from_i16(-1), None);
        assert_eq!(PayoutStatus::from_i16(4), None);
    }

    #[test]
    fn pending_may_move_to_approved_or_rejected() {
        assert!(PayoutStatus::Pending.can_transition_to(PayoutStatus::Approved));
        assert!(PayoutStatus::Pending.can_transition_to(PayoutStatus::Rejected));
        assert!(!PayoutStatus::Pending.can_transition_to(PayoutStatus::Completed));
    }

    #[test]
    fn only_approved_may_complete() {
        assert!(PayoutStatus::Approved.can_transition_to(PayoutStatus::Completed));
        assert!(!PayoutStatus::Rejected.can_transition_to(PayoutStatus::Completed));
        assert!(!PayoutStatus::Completed.can_transition_to(PayoutStatus::Completed));
    }

    #[test]
    fn terminal_states_admit_no_transition() {
        for next in [
            PayoutStatus::Pending,
            PayoutStatus::Approved,
            PayoutStatus::Rejected,
            PayoutStatus::Completed,
        ] {
            assert!(!PayoutStatus::Rejected.can_transition_to(next));
            assert!(!PayoutStatus::Completed.can_transition_to(next));
        }
    }

    #[test]
    fn coupon_applies_only_to_listed_types() {
        let coupon = coupon_with_scopes(&["COURSE", "GROUP"]);
        assert!(coupon.applies_to("COURSE"));
        assert!(coupon.applies_to("GROUP"));
        assert!(!coupon.applies_to("DEMO"));
    }

    #[test]
    fn empty_scope_list_applies_to_nothing() {
        let coupon = coupon_with_scopes(&[]);
        assert!(!coupon.applies_to("COURSE"));
        assert!(!coupon.applies_to(""));
    }
}
