use sea_orm::DatabaseConnection;

use crate::infra::db::{
    DbCertificateRepository, DbCouponRepository, DbCourseRepository, DbEnrollmentRepository,
    DbPayoutRepository, DbProgressRepository, DbTeacherProfileRepository,
};
use crate::infra::notify::HttpNotifier;
use crate::infra::payment::HttpPaymentGateway;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub payment: HttpPaymentGateway,
    pub notifier: HttpNotifier,
}

impl AppState {
    pub fn course_repo(&self) -> DbCourseRepository {
        DbCourseRepository {
            db: self.db.clone(),
        }
    }

    pub fn enrollment_repo(&self) -> DbEnrollmentRepository {
        DbEnrollmentRepository {
            db: self.db.clone(),
        }
    }

    pub fn progress_repo(&self) -> DbProgressRepository {
        DbProgressRepository {
            db: self.db.clone(),
        }
    }

    pub fn certificate_repo(&self) -> DbCertificateRepository {
        DbCertificateRepository {
            db: self.db.clone(),
        }
    }

    pub fn coupon_repo(&self) -> DbCouponRepository {
        DbCouponRepository {
            db: self.db.clone(),
        }
    }

    pub fn teacher_profile_repo(&self) -> DbTeacherProfileRepository {
        DbTeacherProfileRepository {
            db: self.db.clone(),
        }
    }

    pub fn payout_repo(&self) -> DbPayoutRepository {
        DbPayoutRepository {
            db: self.db.clone(),
        }
    }

    pub fn payment_gateway(&self) -> HttpPaymentGateway {
        self.payment.clone()
    }

    pub fn notifier(&self) -> HttpNotifier {
        self.notifier.clone()
    }
}
