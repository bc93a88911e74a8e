use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PayoutRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PayoutRequests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PayoutRequests::TeacherProfileId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PayoutRequests::RequestedAmount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PayoutRequests::Status)
                            .small_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(PayoutRequests::ReviewNotes).string())
                    .col(ColumnDef::new(PayoutRequests::NetAmount).big_integer())
                    .col(ColumnDef::new(PayoutRequests::ProcessingFee).big_integer())
                    .col(ColumnDef::new(PayoutRequests::ApprovedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(PayoutRequests::RejectedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(PayoutRequests::ProcessedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(PayoutRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PayoutRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PayoutRequests::Table, PayoutRequests::TeacherProfileId)
                            .to(TeacherProfiles::Table, TeacherProfiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(PayoutRequests::Table)
                    .col(PayoutRequests::Status)
                    .name("idx_payout_requests_status")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PayoutRequests::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PayoutRequests {
    Table,
    Id,
    TeacherProfileId,
    RequestedAmount,
    Status,
    ReviewNotes,
    NetAmount,
    ProcessingFee,
    ApprovedAt,
    RejectedAt,
    ProcessedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum TeacherProfiles {
    Table,
    Id,
}
