use chrono::Utc;
use uuid::Uuid;

use learnhub_domain::money;
use learnhub_domain::pagination::PageRequest;

use crate::domain::repository::{PayoutRepository, TeacherProfileRepository};
use crate::domain::types::{PayoutRequest, PayoutStatus};
use crate::error::CoursesServiceError;

// ── CreatePayoutRequest ──────────────────────────────────────────────────────

pub struct CreatePayoutRequestUseCase<T: TeacherProfileRepository, P: PayoutRepository> {
    pub teacher_profiles: T,
    pub payouts: P,
}

impl<T: TeacherProfileRepository, P: PayoutRepository> CreatePayoutRequestUseCase<T, P> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        requested_amount: i64,
    ) -> Result<PayoutRequest, CoursesServiceError> {
        let profile = self
            .teacher_profiles
            .find_by_user_id(user_id)
            .await?
            .ok_or(CoursesServiceError::Forbidden)?;
        if !profile.verified {
            return Err(CoursesServiceError::TeacherNotVerified);
        }
        if requested_amount <= 0 {
            return Err(CoursesServiceError::MissingData);
        }

        let now = Utc::now();
        let payout = PayoutRequest {
            id: Uuid::now_v7(),
            teacher_profile_id: profile.id,
            requested_amount,
            status: PayoutStatus::Pending,
            review_notes: None,
            net_amount: None,
            processing_fee: None,
            approved_at: None,
            rejected_at: None,
            processed_at: None,
            created_at: now,
            updated_at: now,
        };
        self.payouts.create(&payout).await?;
        Ok(payout)
    }
}

// ── ReviewPayout ─────────────────────────────────────────────────────────────

pub enum ReviewDecision {
    Approve,
    Reject,
}

pub struct ReviewPayoutInput {
    pub payout_id: Uuid,
    pub decision: ReviewDecision,
    pub notes: Option<String>,
}

/// Admin review of a pending payout. Approve and Reject stamp their own
/// timestamp; the commission is not computed until completion.
pub struct ReviewPayoutUseCase<P: PayoutRepository> {
    pub payouts: P,
}

impl<P: PayoutRepository> ReviewPayoutUseCase<P> {
    pub async fn execute(
        &self,
        input: ReviewPayoutInput,
    ) -> Result<PayoutRequest, CoursesServiceError> {
        let mut payout = self
            .payouts
            .find_by_id(input.payout_id)
            .await?
            .ok_or(CoursesServiceError::PayoutNotFound)?;

        let next = match input.decision {
            ReviewDecision::Approve => PayoutStatus::Approved,
            ReviewDecision::Reject => PayoutStatus::Rejected,
        };
        if !payout.status.can_transition_to(next) {
            return Err(CoursesServiceError::InvalidPayoutTransition);
        }

        let now = Utc::now();
        payout.status = next;
        payout.review_notes = input.notes;
        match next {
            PayoutStatus::Approved => payout.approved_at = Some(now),
            PayoutStatus::Rejected => payout.rejected_at = Some(now),
            _ => unreachable!(),
        }
        payout.updated_at = now;
        self.payouts.save_transition(&payout).await?;
        Ok(payout)
    }
}

// ── CompletePayout ───────────────────────────────────────────────────────────

/// Mark an approved payout as paid out. Computes the platform commission and
/// the net amount at this point so the stored figures reflect the rate in
/// force when the money actually moved.
pub struct CompletePayoutUseCase<P: PayoutRepository> {
    pub payouts: P,
}

impl<P: PayoutRepository> CompletePayoutUseCase<P> {
    pub async fn execute(&self, payout_id: Uuid) -> Result<PayoutRequest, CoursesServiceError> {
        let mut payout = self
            .payouts
            .find_by_id(payout_id)
            .await?
            .ok_or(CoursesServiceError::PayoutNotFound)?;
        if !payout.status.can_transition_to(PayoutStatus::Completed) {
            return Err(CoursesServiceError::InvalidPayoutTransition);
        }

        let now = Utc::now();
        payout.status = PayoutStatus::Completed;
        payout.processing_fee = Some(money::commission_fee(payout.requested_amount));
        payout.net_amount = Some(money::net_after_commission(payout.requested_amount));
        payout.processed_at = Some(now);
        payout.updated_at = now;
        self.payouts.save_transition(&payout).await?;
        Ok(payout)
    }
}

// ── ListPayouts ──────────────────────────────────────────────────────────────

pub struct ListPayoutsUseCase<P: PayoutRepository> {
    pub payouts: P,
}

impl<P: PayoutRepository> ListPayoutsUseCase<P> {
    pub async fn execute(
        &self,
        status: Option<PayoutStatus>,
        page: PageRequest,
    ) -> Result<Vec<PayoutRequest>, CoursesServiceError> {
        self.payouts.list(status, page).await
    }
}
