use chrono::Utc;
use uuid::Uuid;

use learnhub_courses::domain::types::{Enrollment, EnrollmentStatus};
use learnhub_courses::usecase::progress::{SetLessonCompletionInput, SetLessonCompletionUseCase};

use crate::helpers::{
    InMemoryCertificateRepo, InMemoryCourseRepo, InMemoryEnrollmentRepo, InMemoryProgressRepo,
    course,
};

fn enroll(enrollments: &InMemoryEnrollmentRepo, user_id: Uuid, course_id: Uuid) {
    let now = Utc::now();
    enrollments.enrollments.lock().unwrap().push(Enrollment {
        id: Uuid::now_v7(),
        user_id,
        course_id,
        amount: 0,
        status: EnrollmentStatus::Active,
        coupon_id: None,
        created_at: now,
        updated_at: now,
    });
}

#[tokio::test]
async fn should_certify_after_last_lesson_and_only_once() {
    let user_id = Uuid::now_v7();
    let free_course = course(0);
    let lessons: Vec<Uuid> = (0..3).map(|_| Uuid::now_v7()).collect();

    let courses = InMemoryCourseRepo::default();
    courses.add(free_course.clone(), lessons.clone());

    let enrollments = InMemoryEnrollmentRepo::default();
    enroll(&enrollments, user_id, free_course.id);

    let progress = InMemoryProgressRepo::default();
    progress
        .course_lessons
        .lock()
        .unwrap()
        .insert(free_course.id, lessons.clone());

    let certificates = InMemoryCertificateRepo::default();

    let uc = SetLessonCompletionUseCase {
        courses,
        enrollments,
        progress,
        certificates: certificates.clone(),
    };

    for (i, lesson_id) in lessons.iter().enumerate() {
        let summary = uc
            .execute(
                user_id,
                SetLessonCompletionInput {
                    lesson_id: *lesson_id,
                    completed: true,
                },
            )
            .await
            .unwrap();
        assert_eq!(summary.completed_lessons, i as u64 + 1);
        assert_eq!(summary.certificate.is_some(), i == 2);
        assert_eq!(summary.certificate_created, i == 2);
    }

    let issued = certificates.certificates.lock().unwrap();
    assert_eq!(issued.len(), 1);
    assert_eq!(issued[0].student_name, "Mina Park");
    assert_eq!(issued[0].course_name, "Intro to Baking");

    // Re-marking the last lesson returns the same certificate, no new row.
    drop(issued);
    let again = uc
        .execute(
            user_id,
            SetLessonCompletionInput {
                lesson_id: lessons[2],
                completed: true,
            },
        )
        .await
        .unwrap();
    assert_eq!(certificates.certificates.lock().unwrap().len(), 1);
    assert!(again.certificate.is_some());
    assert!(!again.certificate_created);
}

#[tokio::test]
async fn unmarking_a_lesson_never_certifies() {
    let user_id = Uuid::now_v7();
    let free_course = course(0);
    let lesson_id = Uuid::now_v7();

    let courses = InMemoryCourseRepo::default();
    courses.add(free_course.clone(), vec![lesson_id]);

    let enrollments = InMemoryEnrollmentRepo::default();
    enroll(&enrollments, user_id, free_course.id);

    let progress = InMemoryProgressRepo::default();
    progress
        .course_lessons
        .lock()
        .unwrap()
        .insert(free_course.id, vec![lesson_id]);

    let certificates = InMemoryCertificateRepo::default();

    let uc = SetLessonCompletionUseCase {
        courses,
        enrollments,
        progress,
        certificates: certificates.clone(),
    };

    let summary = uc
        .execute(
            user_id,
            SetLessonCompletionInput {
                lesson_id,
                completed: false,
            },
        )
        .await
        .unwrap();
    assert_eq!(summary.completed_lessons, 0);
    assert!(summary.certificate.is_none());
    assert!(certificates.certificates.lock().unwrap().is_empty());
}
