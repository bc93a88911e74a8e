use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use learnhub_auth_types::identity::IdentityHeaders;
use learnhub_domain::role::Capability;

use crate::domain::types::CourseStatus;
use crate::error::CoursesServiceError;
use crate::state::AppState;
use crate::usecase::course::SetCourseStatusUseCase;

#[derive(Deserialize)]
pub struct SetCourseStatusRequest {
    pub status: String,
}

#[derive(Serialize)]
pub struct CourseStatusResponse {
    pub id: Uuid,
    pub status: String,
}

// ── PATCH /courses/{course_id}/status ────────────────────────────────────────

pub async fn set_course_status(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
    Json(body): Json<SetCourseStatusRequest>,
) -> Result<Json<CourseStatusResponse>, CoursesServiceError> {
    if !identity.role.allows(Capability::ModerateCourses) {
        return Err(CoursesServiceError::Forbidden);
    }
    let status = match body.status.as_str() {
        "draft" => CourseStatus::Draft,
        "published" => CourseStatus::Published,
        _ => return Err(CoursesServiceError::MissingData),
    };
    let uc = SetCourseStatusUseCase {
        courses: state.course_repo(),
        notifier: state.notifier(),
    };
    let course = uc.execute(course_id, status).await?;
    Ok(Json(CourseStatusResponse {
        id: course.id,
        status: body.status,
    }))
}
