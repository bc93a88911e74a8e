use sea_orm::entity::prelude::*;

/// Teacher withdrawal request. `status` is the wire value of the domain
/// `PayoutStatus`; `net_amount`/`processing_fee` are set only on completion.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "payout_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub teacher_profile_id: Uuid,
    pub requested_amount: i64,
    pub status: i16,
    pub review_notes: Option<String>,
    pub net_amount: Option<i64>,
    pub processing_fee: Option<i64>,
    pub approved_at: Option<chrono::DateTime<chrono::Utc>>,
    pub rejected_at: Option<chrono::DateTime<chrono::Utc>>,
    pub processed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::teacher_profiles::Entity",
        from = "Column::TeacherProfileId",
        to = "super::teacher_profiles::Column::Id"
    )]
    TeacherProfile,
}

impl Related<super::teacher_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeacherProfile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
