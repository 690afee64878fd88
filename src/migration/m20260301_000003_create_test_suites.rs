//! Migration: Create test_suites table.

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
                CREATE TABLE test_suites (
                    id BIGSERIAL PRIMARY KEY,
                    test_run_id BIGINT NOT NULL REFERENCES test_runs(id) ON DELETE CASCADE,
                    test_suite_group_id BIGINT REFERENCES test_suite_groups(id) ON DELETE CASCADE,

                    -- 1-based, contiguous across all groups within the run
                    idx INTEGER NOT NULL,

                    package_name VARCHAR(500),
                    class_name VARCHAR(500) NOT NULL,

                    -- Per-suite counts (denormalized for read paths)
                    test_count INTEGER NOT NULL DEFAULT 0,
                    passing_count INTEGER NOT NULL DEFAULT 0,
                    skipped_count INTEGER NOT NULL DEFAULT 0,
                    failure_count INTEGER NOT NULL DEFAULT 0,

                    duration DOUBLE PRECISION NOT NULL DEFAULT 0,
                    start_ts TIMESTAMPTZ,
                    hostname VARCHAR(255),
                    system_out TEXT,
                    system_err TEXT,

                    CONSTRAINT uq_test_suites_run_idx UNIQUE (test_run_id, idx)
                );

                CREATE INDEX idx_test_suites_test_run_id ON test_suites(test_run_id);
                CREATE INDEX idx_test_suites_group_id ON test_suites(test_suite_group_id);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS test_suites CASCADE;")
            .await?;

        Ok(())
    }
}
