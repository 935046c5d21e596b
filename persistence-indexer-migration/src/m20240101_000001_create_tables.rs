use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let sql = r#"
            CREATE TYPE "transfer_direction" AS ENUM ('in', 'out');

            CREATE TABLE "users" (
                "id" text PRIMARY KEY,
                "first_seen" timestamp NOT NULL
            );

            CREATE TABLE "activity_records" (
                "id" text PRIMARY KEY,
                "address" text NOT NULL,
                "block_time" timestamp NOT NULL
            );

            CREATE TABLE "reward_events" (
                "id" text PRIMARY KEY,
                "block_height" bigint NOT NULL,
                "block_time" timestamp NOT NULL,
                "tx_hash" text NOT NULL,
                "delegator_address" text NOT NULL,
                "validator_address" text NOT NULL,
                "fee_amount" text NOT NULL,
                "fee_denom" text NOT NULL,
                "reward_amount" text
            );

            CREATE TABLE "transfer_correlations" (
                "id" text PRIMARY KEY,
                "block_height" bigint NOT NULL,
                "block_time" timestamp NOT NULL,
                "tx_hash" text NOT NULL,
                "sender_id" text NOT NULL REFERENCES "users"("id"),
                "receiver_id" text NOT NULL REFERENCES "users"("id"),
                "amount" numeric NOT NULL,
                "denom" text,
                "direction" "transfer_direction" NOT NULL,
                "source_chain" text,
                "source_chain_tx" text,
                "destination_chain" text,
                "destination_chain_tx" text
            );

            CREATE TABLE "transfers" (
                "id" text PRIMARY KEY,
                "block_height" bigint NOT NULL,
                "block_time" timestamp NOT NULL,
                "tx_hash" text NOT NULL,
                "recipient" text,
                "sender" text,
                "amount" text
            );

            CREATE TABLE "transactions" (
                "id" text PRIMARY KEY,
                "block_height" bigint NOT NULL,
                "block_time" timestamp NOT NULL,
                "tx_hash" text NOT NULL
            );

            CREATE TABLE "hourly_snapshots" (
                "id" text PRIMARY KEY,
                "last_block_height" bigint NOT NULL,
                "last_block_time" timestamp NOT NULL,
                "tx_count" bigint NOT NULL
            );

            CREATE TABLE "daily_snapshots" (
                "id" text PRIMARY KEY,
                "last_block_height" bigint NOT NULL,
                "last_block_time" timestamp NOT NULL,
                "tx_count" bigint NOT NULL
            );

            CREATE TABLE "monthly_snapshots" (
                "id" text PRIMARY KEY,
                "last_block_height" bigint NOT NULL,
                "last_block_time" timestamp NOT NULL,
                "tx_count" bigint NOT NULL
            );

            COMMENT ON TABLE "activity_records" IS 'One row per observed (address, block time) interaction';

            COMMENT ON TABLE "transfer_correlations" IS 'IBC transfers keyed by packet sequence, merged from send and receive sides';
        "#;
        crate::from_sql(manager, sql).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let sql = r#"
            DROP TABLE "monthly_snapshots";
            DROP TABLE "daily_snapshots";
            DROP TABLE "hourly_snapshots";
            DROP TABLE "transactions";
            DROP TABLE "transfers";
            DROP TABLE "transfer_correlations";
            DROP TABLE "reward_events";
            DROP TABLE "activity_records";
            DROP TABLE "users";
            DROP TYPE "transfer_direction";
        "#;
        crate::from_sql(manager, sql).await
    }
}
