use sea_orm::entity::prelude::*;

/// Discount code. `kind` is the wire value of the domain `CouponKind`
/// (0 = percentage, 1 = flat cents). `applicable_on` is a JSON array of
/// context-type strings; an empty array means the coupon applies to nothing.
/// `teacher_id` scopes the coupon to one teacher's courses when set.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "coupons")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub kind: i16,
    pub value: i64,
    pub is_active: bool,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub usage_limit: i32,
    pub used_count: i32,
    pub per_user_limit: i32,
    pub teacher_id: Option<Uuid>,
    pub applicable_on: Json,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::coupon_usages::Entity")]
    Usages,
}

impl Related<super::coupon_usages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Usages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
