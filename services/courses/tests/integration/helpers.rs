use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use uuid::Uuid;

use learnhub_courses::domain::repository::{
    CertificateRepository, CouponRepository, CourseRepository, EnrollmentRepository,
    PaymentGatewayPort, ProgressRepository, Redemption,
};
use learnhub_courses::domain::types::{
    Certificate, CheckoutSession, Coupon, CouponKind, Course, CourseStatus, Enrollment,
    EnrollmentStatus, LessonProgress, NameSnapshot,
};
use learnhub_courses::error::CoursesServiceError;
use learnhub_domain::pagination::PageRequest;

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn course(price: i64) -> Course {
    Course {
        id: Uuid::now_v7(),
        teacher_id: Uuid::now_v7(),
        title: "Intro to Baking".into(),
        price,
        status: CourseStatus::Published,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn coupon(code: &str, kind: CouponKind, value: i64) -> Coupon {
    Coupon {
        id: Uuid::now_v7(),
        code: code.to_owned(),
        kind,
        value,
        is_active: true,
        expires_at: Utc::now() + Duration::days(30),
        usage_limit: 100,
        used_count: 0,
        per_user_limit: 1,
        teacher_id: None,
        applicable_on: vec!["COURSE".into()],
        created_at: Utc::now(),
    }
}

// ── InMemoryCourseRepo ───────────────────────────────────────────────────────

/// Course plus its flat lesson list; chapters are irrelevant to these tests.
#[derive(Clone, Default)]
pub struct InMemoryCourseRepo {
    pub courses: Arc<Mutex<Vec<(Course, Vec<Uuid>)>>>,
}

impl InMemoryCourseRepo {
    pub fn add(&self, course: Course, lesson_ids: Vec<Uuid>) {
        self.courses.lock().unwrap().push((course, lesson_ids));
    }
}

impl CourseRepository for InMemoryCourseRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Course>, CoursesServiceError> {
        Ok(self
            .courses
            .lock()
            .unwrap()
            .iter()
            .find(|(c, _)| c.id == id)
            .map(|(c, _)| c.clone()))
    }

    async fn course_of_lesson(
        &self,
        lesson_id: Uuid,
    ) -> Result<Option<Course>, CoursesServiceError> {
        Ok(self
            .courses
            .lock()
            .unwrap()
            .iter()
            .find(|(_, lessons)| lessons.contains(&lesson_id))
            .map(|(c, _)| c.clone()))
    }

    async fn count_lessons(&self, course_id: Uuid) -> Result<u64, CoursesServiceError> {
        Ok(self
            .courses
            .lock()
            .unwrap()
            .iter()
            .find(|(c, _)| c.id == course_id)
            .map(|(_, lessons)| lessons.len() as u64)
            .unwrap_or(0))
    }

    async fn update_status(
        &self,
        course_id: Uuid,
        status: CourseStatus,
    ) -> Result<bool, CoursesServiceError> {
        let mut courses = self.courses.lock().unwrap();
        match courses.iter_mut().find(|(c, _)| c.id == course_id) {
            Some((c, _)) => {
                c.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn name_snapshot(
        &self,
        _user_id: Uuid,
        course_id: Uuid,
    ) -> Result<Option<NameSnapshot>, CoursesServiceError> {
        Ok(self
            .courses
            .lock()
            .unwrap()
            .iter()
            .find(|(c, _)| c.id == course_id)
            .map(|(c, _)| NameSnapshot {
                student_name: "Mina Park".into(),
                course_name: c.title.clone(),
                teacher_name: "Jo Bread".into(),
            }))
    }
}

// ── InMemoryEnrollmentRepo ───────────────────────────────────────────────────

/// Mirrors the real repository's semantics, including the guarded coupon
/// increment inside `activate`.
#[derive(Clone, Default)]
pub struct InMemoryEnrollmentRepo {
    pub enrollments: Arc<Mutex<Vec<Enrollment>>>,
    pub coupons: Arc<Mutex<Vec<Coupon>>>,
    pub redemptions: Arc<Mutex<Vec<Redemption>>>,
}

impl InMemoryEnrollmentRepo {
    /// Lock-and-look helper for assertions outside the async trait.
    pub fn find_by_user_course_sync(&self, user_id: Uuid, course_id: Uuid) -> Option<Enrollment> {
        self.enrollments
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.user_id == user_id && e.course_id == course_id)
            .cloned()
    }
}

impl EnrollmentRepository for InMemoryEnrollmentRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Enrollment>, CoursesServiceError> {
        Ok(self
            .enrollments
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }

    async fn find_by_user_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<Option<Enrollment>, CoursesServiceError> {
        Ok(self
            .enrollments
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.user_id == user_id && e.course_id == course_id)
            .cloned())
    }

    async fn insert_if_absent(
        &self,
        enrollment: &Enrollment,
    ) -> Result<bool, CoursesServiceError> {
        let mut enrollments = self.enrollments.lock().unwrap();
        let exists = enrollments
            .iter()
            .any(|e| e.user_id == enrollment.user_id && e.course_id == enrollment.course_id);
        if exists {
            return Ok(false);
        }
        enrollments.push(enrollment.clone());
        Ok(true)
    }

    async fn upsert_pending(
        &self,
        enrollment: &Enrollment,
    ) -> Result<(), CoursesServiceError> {
        let mut enrollments = self.enrollments.lock().unwrap();
        match enrollments
            .iter_mut()
            .find(|e| e.user_id == enrollment.user_id && e.course_id == enrollment.course_id)
        {
            Some(existing) => {
                existing.amount = enrollment.amount;
                existing.status = enrollment.status;
                existing.coupon_id = enrollment.coupon_id;
                existing.updated_at = enrollment.updated_at;
            }
            None => enrollments.push(enrollment.clone()),
        }
        Ok(())
    }

    async fn activate(
        &self,
        enrollment_id: Uuid,
        redemption: Option<Redemption>,
    ) -> Result<Enrollment, CoursesServiceError> {
        // Claim the Pending row first; a confirmation that lost the race
        // returns the activated row without redeeming again.
        {
            let enrollments = self.enrollments.lock().unwrap();
            let enrollment = enrollments
                .iter()
                .find(|e| e.id == enrollment_id)
                .ok_or(CoursesServiceError::EnrollmentNotFound)?;
            if enrollment.status != EnrollmentStatus::Pending {
                return Ok(enrollment.clone());
            }
        }
        if let Some(redemption) = redemption {
            let mut coupons = self.coupons.lock().unwrap();
            let coupon = coupons
                .iter_mut()
                .find(|c| c.id == redemption.coupon_id)
                .ok_or(CoursesServiceError::CouponNotFound)?;
            if coupon.used_count >= coupon.usage_limit {
                return Err(CoursesServiceError::CouponLimitReached);
            }
            coupon.used_count += 1;
            self.redemptions.lock().unwrap().push(redemption);
        }
        let mut enrollments = self.enrollments.lock().unwrap();
        let enrollment = enrollments
            .iter_mut()
            .find(|e| e.id == enrollment_id)
            .ok_or(CoursesServiceError::EnrollmentNotFound)?;
        enrollment.status = EnrollmentStatus::Active;
        enrollment.updated_at = Utc::now();
        Ok(enrollment.clone())
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Enrollment>, CoursesServiceError> {
        let page = page.clamped();
        Ok(self
            .enrollments
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.user_id == user_id)
            .skip(page.offset() as usize)
            .take(page.per_page as usize)
            .cloned()
            .collect())
    }
}

// ── InMemoryCouponRepo ───────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct InMemoryCouponRepo {
    pub coupons: Arc<Mutex<Vec<Coupon>>>,
    pub redemptions: Arc<Mutex<Vec<Redemption>>>,
}

impl CouponRepository for InMemoryCouponRepo {
    async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, CoursesServiceError> {
        Ok(self
            .coupons
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.code == code)
            .cloned())
    }

    async fn count_user_redemptions(
        &self,
        coupon_id: Uuid,
        user_id: Uuid,
    ) -> Result<u64, CoursesServiceError> {
        Ok(self
            .redemptions
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.coupon_id == coupon_id && r.user_id == user_id)
            .count() as u64)
    }
}

// ── InMemoryProgressRepo ─────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct InMemoryProgressRepo {
    pub flags: Arc<Mutex<HashMap<(Uuid, Uuid), bool>>>,
    /// Course lookup so `count_completed` can scope to one course's lessons.
    pub course_lessons: Arc<Mutex<HashMap<Uuid, Vec<Uuid>>>>,
}

impl ProgressRepository for InMemoryProgressRepo {
    async fn upsert(&self, progress: &LessonProgress) -> Result<(), CoursesServiceError> {
        self.flags
            .lock()
            .unwrap()
            .insert((progress.user_id, progress.lesson_id), progress.completed);
        Ok(())
    }

    async fn get(
        &self,
        user_id: Uuid,
        lesson_id: Uuid,
    ) -> Result<Option<LessonProgress>, CoursesServiceError> {
        let now = Utc::now();
        Ok(self
            .flags
            .lock()
            .unwrap()
            .get(&(user_id, lesson_id))
            .map(|&completed| LessonProgress {
                user_id,
                lesson_id,
                completed,
                created_at: now,
                updated_at: now,
            }))
    }

    async fn count_completed(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<u64, CoursesServiceError> {
        let lessons = self
            .course_lessons
            .lock()
            .unwrap()
            .get(&course_id)
            .cloned()
            .unwrap_or_default();
        let flags = self.flags.lock().unwrap();
        Ok(lessons
            .iter()
            .filter(|lesson_id| flags.get(&(user_id, **lesson_id)).copied().unwrap_or(false))
            .count() as u64)
    }
}

// ── InMemoryCertificateRepo ──────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct InMemoryCertificateRepo {
    pub certificates: Arc<Mutex<Vec<Certificate>>>,
}

impl CertificateRepository for InMemoryCertificateRepo {
    async fn get_or_create(
        &self,
        certificate: &Certificate,
    ) -> Result<(Certificate, bool), CoursesServiceError> {
        let mut certificates = self.certificates.lock().unwrap();
        if let Some(existing) = certificates
            .iter()
            .find(|c| c.user_id == certificate.user_id && c.course_id == certificate.course_id)
        {
            return Ok((existing.clone(), false));
        }
        certificates.push(certificate.clone());
        Ok((certificate.clone(), true))
    }

    async fn find_by_user_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<Option<Certificate>, CoursesServiceError> {
        Ok(self
            .certificates
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.user_id == user_id && c.course_id == course_id)
            .cloned())
    }
}

// ── MockPaymentGateway ───────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockPaymentGateway {
    pub sessions: Arc<Mutex<Vec<(Uuid, i64)>>>,
}

impl PaymentGatewayPort for MockPaymentGateway {
    async fn create_checkout(
        &self,
        enrollment_id: Uuid,
        amount: i64,
    ) -> Result<CheckoutSession, CoursesServiceError> {
        self.sessions.lock().unwrap().push((enrollment_id, amount));
        Ok(CheckoutSession {
            provider_ref: format!("cs_{enrollment_id}"),
            checkout_url: format!("https://pay.test/s/{enrollment_id}"),
        })
    }
}
