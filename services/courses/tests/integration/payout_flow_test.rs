use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use learnhub_courses::domain::repository::{PayoutRepository, TeacherProfileRepository};
use learnhub_courses::domain::types::{PayoutRequest, PayoutStatus, TeacherProfile};
use learnhub_courses::error::CoursesServiceError;
use learnhub_courses::usecase::payout::{
    CompletePayoutUseCase, CreatePayoutRequestUseCase, ReviewDecision, ReviewPayoutInput,
    ReviewPayoutUseCase,
};
use learnhub_domain::pagination::PageRequest;

#[derive(Clone, Default)]
struct InMemoryPayoutRepo {
    payouts: Arc<Mutex<Vec<PayoutRequest>>>,
}

impl PayoutRepository for InMemoryPayoutRepo {
    async fn create(&self, payout: &PayoutRequest) -> Result<(), CoursesServiceError> {
        self.payouts.lock().unwrap().push(payout.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PayoutRequest>, CoursesServiceError> {
        Ok(self
            .payouts
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn list(
        &self,
        status: Option<PayoutStatus>,
        _page: PageRequest,
    ) -> Result<Vec<PayoutRequest>, CoursesServiceError> {
        Ok(self
            .payouts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| status.is_none_or(|s| p.status == s))
            .cloned()
            .collect())
    }

    async fn save_transition(&self, payout: &PayoutRequest) -> Result<(), CoursesServiceError> {
        let mut payouts = self.payouts.lock().unwrap();
        if let Some(existing) = payouts.iter_mut().find(|p| p.id == payout.id) {
            *existing = payout.clone();
        }
        Ok(())
    }
}

struct StaticProfileRepo {
    profile: TeacherProfile,
}

impl TeacherProfileRepository for StaticProfileRepo {
    async fn find_by_user_id(
        &self,
        user_id: Uuid,
    ) -> Result<Option<TeacherProfile>, CoursesServiceError> {
        Ok((self.profile.user_id == user_id).then(|| self.profile.clone()))
    }
}

#[tokio::test]
async fn should_walk_a_payout_from_request_to_completion() {
    let user_id = Uuid::now_v7();
    let profile = TeacherProfile {
        id: Uuid::now_v7(),
        user_id,
        verified: true,
        created_at: Utc::now(),
    };
    let payouts = InMemoryPayoutRepo::default();

    let created = CreatePayoutRequestUseCase {
        teacher_profiles: StaticProfileRepo { profile },
        payouts: payouts.clone(),
    }
    .execute(user_id, 25_000)
    .await
    .unwrap();
    assert_eq!(created.status, PayoutStatus::Pending);

    let approved = ReviewPayoutUseCase {
        payouts: payouts.clone(),
    }
    .execute(ReviewPayoutInput {
        payout_id: created.id,
        decision: ReviewDecision::Approve,
        notes: Some("balance verified".into()),
    })
    .await
    .unwrap();
    assert_eq!(approved.status, PayoutStatus::Approved);
    assert!(approved.approved_at.is_some());

    let completed = CompletePayoutUseCase {
        payouts: payouts.clone(),
    }
    .execute(created.id)
    .await
    .unwrap();
    assert_eq!(completed.status, PayoutStatus::Completed);
    // 8% of 25_000
    assert_eq!(completed.processing_fee, Some(2_000));
    assert_eq!(completed.net_amount, Some(23_000));

    // Terminal: no further review possible.
    let result = ReviewPayoutUseCase {
        payouts: payouts.clone(),
    }
    .execute(ReviewPayoutInput {
        payout_id: created.id,
        decision: ReviewDecision::Reject,
        notes: None,
    })
    .await;
    assert!(matches!(
        result,
        Err(CoursesServiceError::InvalidPayoutTransition)
    ));
}

#[tokio::test]
async fn rejected_payout_can_never_be_completed() {
    let user_id = Uuid::now_v7();
    let profile = TeacherProfile {
        id: Uuid::now_v7(),
        user_id,
        verified: true,
        created_at: Utc::now(),
    };
    let payouts = InMemoryPayoutRepo::default();

    let created = CreatePayoutRequestUseCase {
        teacher_profiles: StaticProfileRepo { profile },
        payouts: payouts.clone(),
    }
    .execute(user_id, 9_000)
    .await
    .unwrap();

    ReviewPayoutUseCase {
        payouts: payouts.clone(),
    }
    .execute(ReviewPayoutInput {
        payout_id: created.id,
        decision: ReviewDecision::Reject,
        notes: Some("insufficient balance".into()),
    })
    .await
    .unwrap();

    let result = CompletePayoutUseCase {
        payouts: payouts.clone(),
    }
    .execute(created.id)
    .await;
    assert!(matches!(
        result,
        Err(CoursesServiceError::InvalidPayoutTransition)
    ));

    let stored = payouts.payouts.lock().unwrap();
    assert_eq!(stored[0].status, PayoutStatus::Rejected);
    assert!(stored[0].net_amount.is_none());
}
