use sea_orm_migration::prelude::*;

mod m20260801_000001_create_users;
mod m20260801_000002_create_teacher_profiles;
mod m20260801_000003_create_courses;
mod m20260801_000004_create_course_content;
mod m20260801_000005_create_enrollments;
mod m20260801_000006_create_lesson_progress;
mod m20260801_000007_create_certificates;
mod m20260801_000008_create_coupons;
mod m20260801_000009_create_payout_requests;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260801_000001_create_users::Migration),
            Box::new(m20260801_000002_create_teacher_profiles::Migration),
            Box::new(m20260801_000003_create_courses::Migration),
            Box::new(m20260801_000004_create_course_content::Migration),
            Box::new(m20260801_000005_create_enrollments::Migration),
            Box::new(m20260801_000006_create_lesson_progress::Migration),
            Box::new(m20260801_000007_create_certificates::Migration),
            Box::new(m20260801_000008_create_coupons::Migration),
            Box::new(m20260801_000009_create_payout_requests::Migration),
        ]
    }
}
