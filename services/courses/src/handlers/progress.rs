use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use learnhub_auth_types::identity::IdentityHeaders;
use learnhub_domain::role::Capability;

use crate::error::CoursesServiceError;
use crate::state::AppState;
use crate::usecase::progress::{SetLessonCompletionInput, SetLessonCompletionUseCase};

#[derive(Deserialize)]
pub struct SetProgressRequest {
    pub completed: bool,
}

#[derive(Serialize)]
pub struct ProgressResponse {
    pub completed_lessons: u64,
    pub total_lessons: u64,
    pub certificate_created: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_id: Option<Uuid>,
}

// ── PUT /lessons/{lesson_id}/progress ────────────────────────────────────────

pub async fn set_lesson_progress(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(lesson_id): Path<Uuid>,
    Json(body): Json<SetProgressRequest>,
) -> Result<Json<ProgressResponse>, CoursesServiceError> {
    if !identity.role.allows(Capability::TrackProgress) {
        return Err(CoursesServiceError::Forbidden);
    }
    let uc = SetLessonCompletionUseCase {
        courses: state.course_repo(),
        enrollments: state.enrollment_repo(),
        progress: state.progress_repo(),
        certificates: state.certificate_repo(),
    };
    let summary = uc
        .execute(
            identity.user_id,
            SetLessonCompletionInput {
                lesson_id,
                completed: body.completed,
            },
        )
        .await?;
    Ok(Json(ProgressResponse {
        completed_lessons: summary.completed_lessons,
        total_lessons: summary.total_lessons,
        certificate_created: summary.certificate_created,
        certificate_id: summary.certificate.map(|c| c.id),
    }))
}
