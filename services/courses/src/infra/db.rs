use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, TransactionError,
    TransactionTrait,
    sea_query::{Expr, OnConflict},
};
use uuid::Uuid;

use learnhub_courses_schema::{
    certificates, chapters, coupon_usages, coupons, courses, enrollments, lesson_progress,
    lessons, payout_requests, teacher_profiles, users,
};
use learnhub_domain::pagination::PageRequest;

use crate::domain::repository::{
    CertificateRepository, CouponRepository, CourseRepository, EnrollmentRepository,
    PayoutRepository, ProgressRepository, Redemption, TeacherProfileRepository,
};
use crate::domain::types::{
    Certificate, Coupon, CouponKind, Course, CourseStatus, Enrollment, EnrollmentStatus,
    LessonProgress, NameSnapshot, PayoutRequest, PayoutStatus, TeacherProfile,
};
use crate::error::CoursesServiceError;

// ── Course repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCourseRepository {
    pub db: DatabaseConnection,
}

impl CourseRepository for DbCourseRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Course>, CoursesServiceError> {
        let model = courses::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find course by id")?;
        model.map(course_from_model).transpose()
    }

    async fn course_of_lesson(
        &self,
        lesson_id: Uuid,
    ) -> Result<Option<Course>, CoursesServiceError> {
        let model = courses::Entity::find()
            .join_rev(JoinType::InnerJoin, chapters::Relation::Course.def())
            .join_rev(JoinType::InnerJoin, lessons::Relation::Chapter.def())
            .filter(lessons::Column::Id.eq(lesson_id))
            .one(&self.db)
            .await
            .context("find course of lesson")?;
        model.map(course_from_model).transpose()
    }

    async fn count_lessons(&self, course_id: Uuid) -> Result<u64, CoursesServiceError> {
        let count = lessons::Entity::find()
            .join(JoinType::InnerJoin, lessons::Relation::Chapter.def())
            .filter(chapters::Column::CourseId.eq(course_id))
            .count(&self.db)
            .await
            .context("count lessons of course")?;
        Ok(count)
    }

    async fn update_status(
        &self,
        course_id: Uuid,
        status: CourseStatus,
    ) -> Result<bool, CoursesServiceError> {
        let result = courses::Entity::update_many()
            .filter(courses::Column::Id.eq(course_id))
            .col_expr(courses::Column::Status, Expr::value(status.as_i16()))
            .col_expr(courses::Column::UpdatedAt, Expr::value(Utc::now()))
            .exec(&self.db)
            .await
            .context("update course status")?;
        Ok(result.rows_affected > 0)
    }

    async fn name_snapshot(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<Option<NameSnapshot>, CoursesServiceError> {
        let Some(student) = users::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .context("find student for snapshot")?
        else {
            return Ok(None);
        };
        let Some(course) = courses::Entity::find_by_id(course_id)
            .one(&self.db)
            .await
            .context("find course for snapshot")?
        else {
            return Ok(None);
        };
        let Some(teacher) = users::Entity::find_by_id(course.teacher_id)
            .one(&self.db)
            .await
            .context("find teacher for snapshot")?
        else {
            return Ok(None);
        };
        Ok(Some(NameSnapshot {
            student_name: student.name,
            course_name: course.title,
            teacher_name: teacher.name,
        }))
    }
}

fn course_from_model(model: courses::Model) -> Result<Course, CoursesServiceError> {
    let status = CourseStatus::from_i16(model.status)
        .with_context(|| format!("invalid course status {}", model.status))?;
    Ok(Course {
        id: model.id,
        teacher_id: model.teacher_id,
        title: model.title,
        price: model.price,
        status,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Enrollment repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbEnrollmentRepository {
    pub db: DatabaseConnection,
}

/// Carries the activation result out of the transaction closure, whose error
/// type has to stay `DbErr`.
enum ActivationOutcome {
    Activated(enrollments::Model),
    /// The row was no longer Pending; the winning confirmation already
    /// activated it and redeemed the coupon.
    AlreadyActivated(enrollments::Model),
    NotFound,
}

/// Sentinel threaded through `DbErr` so an exhausted coupon aborts the
/// transaction and rolls the claimed status back with it.
const COUPON_EXHAUSTED: &str = "coupon usage limit reached";

impl EnrollmentRepository for DbEnrollmentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Enrollment>, CoursesServiceError> {
        let model = enrollments::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find enrollment by id")?;
        model.map(enrollment_from_model).transpose()
    }

    async fn find_by_user_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<Option<Enrollment>, CoursesServiceError> {
        let model = enrollments::Entity::find()
            .filter(enrollments::Column::UserId.eq(user_id))
            .filter(enrollments::Column::CourseId.eq(course_id))
            .one(&self.db)
            .await
            .context("find enrollment by user and course")?;
        model.map(enrollment_from_model).transpose()
    }

    async fn insert_if_absent(
        &self,
        enrollment: &Enrollment,
    ) -> Result<bool, CoursesServiceError> {
        let rows = enrollments::Entity::insert(enrollment_to_active_model(enrollment))
            .on_conflict(
                OnConflict::columns([
                    enrollments::Column::UserId,
                    enrollments::Column::CourseId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("insert enrollment if absent")?;
        Ok(rows > 0)
    }

    async fn upsert_pending(
        &self,
        enrollment: &Enrollment,
    ) -> Result<(), CoursesServiceError> {
        enrollments::Entity::insert(enrollment_to_active_model(enrollment))
            .on_conflict(
                OnConflict::columns([
                    enrollments::Column::UserId,
                    enrollments::Column::CourseId,
                ])
                .update_columns([
                    enrollments::Column::Amount,
                    enrollments::Column::Status,
                    enrollments::Column::CouponId,
                    enrollments::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("upsert pending enrollment")?;
        Ok(())
    }

    async fn activate(
        &self,
        enrollment_id: Uuid,
        redemption: Option<Redemption>,
    ) -> Result<Enrollment, CoursesServiceError> {
        let result = self
            .db
            .transaction::<_, ActivationOutcome, sea_orm::DbErr>(move |txn| {
                Box::pin(async move {
                    // Claim the Pending row before touching the coupon. Two
                    // racing confirmations serialize on this row lock; the
                    // loser matches zero rows and must not redeem again.
                    let claimed = enrollments::Entity::update_many()
                        .filter(enrollments::Column::Id.eq(enrollment_id))
                        .filter(
                            enrollments::Column::Status
                                .eq(EnrollmentStatus::Pending.as_i16()),
                        )
                        .col_expr(
                            enrollments::Column::Status,
                            Expr::value(EnrollmentStatus::Active.as_i16()),
                        )
                        .col_expr(enrollments::Column::UpdatedAt, Expr::value(Utc::now()))
                        .exec(txn)
                        .await?;
                    if claimed.rows_affected == 0 {
                        return Ok(
                            match enrollments::Entity::find_by_id(enrollment_id)
                                .one(txn)
                                .await?
                            {
                                Some(model) => ActivationOutcome::AlreadyActivated(model),
                                None => ActivationOutcome::NotFound,
                            },
                        );
                    }

                    if let Some(redemption) = redemption {
                        // Guarded increment: only bump below the limit, so two
                        // racing confirms cannot oversell the coupon.
                        let bumped = coupons::Entity::update_many()
                            .filter(coupons::Column::Id.eq(redemption.coupon_id))
                            .filter(
                                Expr::col(coupons::Column::UsedCount)
                                    .lt(Expr::col(coupons::Column::UsageLimit)),
                            )
                            .col_expr(
                                coupons::Column::UsedCount,
                                Expr::col(coupons::Column::UsedCount).add(1),
                            )
                            .exec(txn)
                            .await?;
                        if bumped.rows_affected == 0 {
                            return Err(sea_orm::DbErr::Custom(COUPON_EXHAUSTED.into()));
                        }
                        coupon_usages::ActiveModel {
                            id: Set(Uuid::now_v7()),
                            coupon_id: Set(redemption.coupon_id),
                            user_id: Set(redemption.user_id),
                            enrollment_id: Set(enrollment_id),
                            created_at: Set(Utc::now()),
                        }
                        .insert(txn)
                        .await?;
                    }

                    let model = enrollments::Entity::find_by_id(enrollment_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            sea_orm::DbErr::RecordNotFound(format!(
                                "enrollment {enrollment_id} vanished during activation"
                            ))
                        })?;
                    Ok(ActivationOutcome::Activated(model))
                })
            })
            .await;

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(TransactionError::Transaction(sea_orm::DbErr::Custom(msg)))
                if msg == COUPON_EXHAUSTED =>
            {
                return Err(CoursesServiceError::CouponLimitReached);
            }
            Err(err) => {
                return Err(anyhow::Error::new(err)
                    .context("activate enrollment")
                    .into());
            }
        };

        match outcome {
            ActivationOutcome::Activated(model)
            | ActivationOutcome::AlreadyActivated(model) => enrollment_from_model(model),
            ActivationOutcome::NotFound => Err(CoursesServiceError::EnrollmentNotFound),
        }
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Enrollment>, CoursesServiceError> {
        let page = page.clamped();
        let models = enrollments::Entity::find()
            .filter(enrollments::Column::UserId.eq(user_id))
            .order_by_desc(enrollments::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.per_page as u64)
            .all(&self.db)
            .await
            .context("list enrollments for user")?;
        models.into_iter().map(enrollment_from_model).collect()
    }
}

fn enrollment_to_active_model(enrollment: &Enrollment) -> enrollments::ActiveModel {
    enrollments::ActiveModel {
        id: Set(enrollment.id),
        user_id: Set(enrollment.user_id),
        course_id: Set(enrollment.course_id),
        amount: Set(enrollment.amount),
        status: Set(enrollment.status.as_i16()),
        coupon_id: Set(enrollment.coupon_id),
        created_at: Set(enrollment.created_at),
        updated_at: Set(enrollment.updated_at),
    }
}

fn enrollment_from_model(model: enrollments::Model) -> Result<Enrollment, CoursesServiceError> {
    let status = EnrollmentStatus::from_i16(model.status)
        .with_context(|| format!("invalid enrollment status {}", model.status))?;
    Ok(Enrollment {
        id: model.id,
        user_id: model.user_id,
        course_id: model.course_id,
        amount: model.amount,
        status,
        coupon_id: model.coupon_id,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Progress repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProgressRepository {
    pub db: DatabaseConnection,
}

impl ProgressRepository for DbProgressRepository {
    async fn upsert(&self, progress: &LessonProgress) -> Result<(), CoursesServiceError> {
        let row = lesson_progress::ActiveModel {
            user_id: Set(progress.user_id),
            lesson_id: Set(progress.lesson_id),
            completed: Set(progress.completed),
            created_at: Set(progress.created_at),
            updated_at: Set(progress.updated_at),
        };
        lesson_progress::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([
                    lesson_progress::Column::UserId,
                    lesson_progress::Column::LessonId,
                ])
                .update_columns([
                    lesson_progress::Column::Completed,
                    lesson_progress::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("upsert lesson progress")?;
        Ok(())
    }

    async fn get(
        &self,
        user_id: Uuid,
        lesson_id: Uuid,
    ) -> Result<Option<LessonProgress>, CoursesServiceError> {
        let model = lesson_progress::Entity::find_by_id((user_id, lesson_id))
            .one(&self.db)
            .await
            .context("get lesson progress")?;
        Ok(model.map(|m| LessonProgress {
            user_id: m.user_id,
            lesson_id: m.lesson_id,
            completed: m.completed,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }))
    }

    async fn count_completed(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<u64, CoursesServiceError> {
        let count = lesson_progress::Entity::find()
            .join(JoinType::InnerJoin, lesson_progress::Relation::Lesson.def())
            .join(JoinType::InnerJoin, lessons::Relation::Chapter.def())
            .filter(chapters::Column::CourseId.eq(course_id))
            .filter(lesson_progress::Column::UserId.eq(user_id))
            .filter(lesson_progress::Column::Completed.eq(true))
            .count(&self.db)
            .await
            .context("count completed lessons")?;
        Ok(count)
    }
}

// ── Certificate repository ───────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCertificateRepository {
    pub db: DatabaseConnection,
}

impl CertificateRepository for DbCertificateRepository {
    async fn get_or_create(
        &self,
        certificate: &Certificate,
    ) -> Result<(Certificate, bool), CoursesServiceError> {
        let row = certificates::ActiveModel {
            id: Set(certificate.id),
            user_id: Set(certificate.user_id),
            course_id: Set(certificate.course_id),
            serial: Set(certificate.serial.clone()),
            student_name: Set(certificate.student_name.clone()),
            course_name: Set(certificate.course_name.clone()),
            teacher_name: Set(certificate.teacher_name.clone()),
            completed_at: Set(certificate.completed_at),
        };
        // Losers of the (user, course) unique race insert zero rows and fall
        // through to reading the winner's certificate.
        let rows = certificates::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([
                    certificates::Column::UserId,
                    certificates::Column::CourseId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("insert certificate")?;

        let stored = self
            .find_by_user_course(certificate.user_id, certificate.course_id)
            .await?
            .context("certificate missing after conditional insert")?;
        Ok((stored, rows > 0))
    }

    async fn find_by_user_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<Option<Certificate>, CoursesServiceError> {
        let model = certificates::Entity::find()
            .filter(certificates::Column::UserId.eq(user_id))
            .filter(certificates::Column::CourseId.eq(course_id))
            .one(&self.db)
            .await
            .context("find certificate by user and course")?;
        Ok(model.map(certificate_from_model))
    }
}

fn certificate_from_model(model: certificates::Model) -> Certificate {
    Certificate {
        id: model.id,
        user_id: model.user_id,
        course_id: model.course_id,
        serial: model.serial,
        student_name: model.student_name,
        course_name: model.course_name,
        teacher_name: model.teacher_name,
        completed_at: model.completed_at,
    }
}

// ── Coupon repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCouponRepository {
    pub db: DatabaseConnection,
}

impl CouponRepository for DbCouponRepository {
    async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, CoursesServiceError> {
        let model = coupons::Entity::find()
            .filter(coupons::Column::Code.eq(code))
            .one(&self.db)
            .await
            .context("find coupon by code")?;
        model.map(coupon_from_model).transpose()
    }

    async fn count_user_redemptions(
        &self,
        coupon_id: Uuid,
        user_id: Uuid,
    ) -> Result<u64, CoursesServiceError> {
        let count = coupon_usages::Entity::find()
            .filter(coupon_usages::Column::CouponId.eq(coupon_id))
            .filter(coupon_usages::Column::UserId.eq(user_id))
            .count(&self.db)
            .await
            .context("count coupon redemptions")?;
        Ok(count)
    }
}

fn coupon_from_model(model: coupons::Model) -> Result<Coupon, CoursesServiceError> {
    let kind = CouponKind::from_i16(model.kind)
        .with_context(|| format!("invalid coupon kind {}", model.kind))?;
    let applicable_on: Vec<String> =
        serde_json::from_value(model.applicable_on).context("decode coupon applicable_on")?;
    Ok(Coupon {
        id: model.id,
        code: model.code,
        kind,
        value: model.value,
        is_active: model.is_active,
        expires_at: model.expires_at,
        usage_limit: model.usage_limit,
        used_count: model.used_count,
        per_user_limit: model.per_user_limit,
        teacher_id: model.teacher_id,
        applicable_on,
        created_at: model.created_at,
    })
}

// ── Teacher profile repository ───────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTeacherProfileRepository {
    pub db: DatabaseConnection,
}

impl TeacherProfileRepository for DbTeacherProfileRepository {
    async fn find_by_user_id(
        &self,
        user_id: Uuid,
    ) -> Result<Option<TeacherProfile>, CoursesServiceError> {
        let model = teacher_profiles::Entity::find()
            .filter(teacher_profiles::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .context("find teacher profile by user id")?;
        Ok(model.map(|m| TeacherProfile {
            id: m.id,
            user_id: m.user_id,
            verified: m.verified,
            created_at: m.created_at,
        }))
    }
}

// ── Payout repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbPayoutRepository {
    pub db: DatabaseConnection,
}

impl PayoutRepository for DbPayoutRepository {
    async fn create(&self, payout: &PayoutRequest) -> Result<(), CoursesServiceError> {
        payout_to_active_model(payout)
            .insert(&self.db)
            .await
            .context("create payout request")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PayoutRequest>, CoursesServiceError> {
        let model = payout_requests::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find payout request by id")?;
        model.map(payout_from_model).transpose()
    }

    async fn list(
        &self,
        status: Option<PayoutStatus>,
        page: PageRequest,
    ) -> Result<Vec<PayoutRequest>, CoursesServiceError> {
        let page = page.clamped();
        let mut query = payout_requests::Entity::find();
        if let Some(status) = status {
            query = query.filter(payout_requests::Column::Status.eq(status.as_i16()));
        }
        let models = query
            .order_by_desc(payout_requests::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.per_page as u64)
            .all(&self.db)
            .await
            .context("list payout requests")?;
        models.into_iter().map(payout_from_model).collect()
    }

    async fn save_transition(&self, payout: &PayoutRequest) -> Result<(), CoursesServiceError> {
        payout_requests::ActiveModel {
            id: Set(payout.id),
            status: Set(payout.status.as_i16()),
            review_notes: Set(payout.review_notes.clone()),
            net_amount: Set(payout.net_amount),
            processing_fee: Set(payout.processing_fee),
            approved_at: Set(payout.approved_at),
            rejected_at: Set(payout.rejected_at),
            processed_at: Set(payout.processed_at),
            updated_at: Set(payout.updated_at),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("save payout transition")?;
        Ok(())
    }
}

fn payout_to_active_model(payout: &PayoutRequest) -> payout_requests::ActiveModel {
    payout_requests::ActiveModel {
        id: Set(payout.id),
        teacher_profile_id: Set(payout.teacher_profile_id),
        requested_amount: Set(payout.requested_amount),
        status: Set(payout.status.as_i16()),
        review_notes: Set(payout.review_notes.clone()),
        net_amount: Set(payout.net_amount),
        processing_fee: Set(payout.processing_fee),
        approved_at: Set(payout.approved_at),
        rejected_at: Set(payout.rejected_at),
        processed_at: Set(payout.processed_at),
        created_at: Set(payout.created_at),
        updated_at: Set(payout.updated_at),
    }
}

fn payout_from_model(model: payout_requests::Model) -> Result<PayoutRequest, CoursesServiceError> {
    let status = PayoutStatus::from_i16(model.status)
        .with_context(|| format!("invalid payout status {}", model.status))?;
    Ok(PayoutRequest {
        id: model.id,
        teacher_profile_id: model.teacher_profile_id,
        requested_amount: model.requested_amount,
        status,
        review_notes: model.review_notes,
        net_amount: model.net_amount,
        processing_fee: model.processing_fee,
        approved_at: model.approved_at,
        rejected_at: model.rejected_at,
        processed_at: model.processed_at,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
