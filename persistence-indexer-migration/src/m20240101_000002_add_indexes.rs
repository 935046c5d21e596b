use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let sql = r#"
            CREATE INDEX "activity_records_address_block_time_index"
                ON "activity_records" ("address", "block_time");
            CREATE INDEX "reward_events_delegator_address_index"
                ON "reward_events" ("delegator_address");
            CREATE INDEX "transfer_correlations_sender_id_index"
                ON "transfer_correlations" ("sender_id");
            CREATE INDEX "transfer_correlations_receiver_id_index"
                ON "transfer_correlations" ("receiver_id");
            CREATE INDEX "transactions_block_height_index"
                ON "transactions" ("block_height");
        "#;
        crate::from_sql(manager, sql).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let sql = r#"
            DROP INDEX "transactions_block_height_index";
            DROP INDEX "transfer_correlations_receiver_id_index";
            DROP INDEX "transfer_correlations_sender_id_index";
            DROP INDEX "reward_events_delegator_address_index";
            DROP INDEX "activity_records_address_block_time_index";
        "#;
        crate::from_sql(manager, sql).await
    }
}
