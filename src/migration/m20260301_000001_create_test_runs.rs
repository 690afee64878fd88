//! Migration: Create test_runs table.
//!
//! One row per submitted batch of results, keyed externally by public_id.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE test_runs (
                    id BIGSERIAL PRIMARY KEY,
                    public_id VARCHAR(32) NOT NULL,

                    -- Aggregate counts over all suites and cases
                    total_test_count INTEGER NOT NULL DEFAULT 0,
                    total_passing_count INTEGER NOT NULL DEFAULT 0,
                    total_skipped_count INTEGER NOT NULL DEFAULT 0,
                    total_failure_count INTEGER NOT NULL DEFAULT 0,
                    passed BOOLEAN NOT NULL DEFAULT FALSE,

                    -- Durations in seconds
                    cumulative_duration DOUBLE PRECISION NOT NULL DEFAULT 0,
                    average_duration DOUBLE PRECISION NOT NULL DEFAULT 0,
                    slowest_test_case_duration DOUBLE PRECISION NOT NULL DEFAULT 0,

                    created_timestamp TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                -- Public identifiers are the external handle and must be unique
                CREATE UNIQUE INDEX idx_test_runs_public_id ON test_runs(public_id);

                -- Timeline queries order runs by creation
                CREATE INDEX idx_test_runs_created_timestamp ON test_runs(created_timestamp DESC);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS test_runs CASCADE;")
            .await?;

        Ok(())
    }
}
