use sea_orm::entity::prelude::*;

/// Teacher profile. Payouts hang off this, not off `users`, so a user can be
/// deactivated as a teacher without touching their student-side records.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "teacher_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub verified: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::payout_requests::Entity")]
    PayoutRequests,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::payout_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayoutRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
