//! Migration: Create test_cases table.

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
                CREATE TABLE test_cases (
                    id BIGSERIAL PRIMARY KEY,
                    test_suite_id BIGINT NOT NULL REFERENCES test_suites(id) ON DELETE CASCADE,

                    -- 1-based, contiguous within the suite
                    idx INTEGER NOT NULL,

                    name VARCHAR(1000) NOT NULL,
                    class_name VARCHAR(500),
                    duration DOUBLE PRECISION NOT NULL DEFAULT 0,
                    passed BOOLEAN NOT NULL,
                    skipped BOOLEAN NOT NULL DEFAULT FALSE,

                    CONSTRAINT uq_test_cases_suite_idx UNIQUE (test_suite_id, idx)
                );

                CREATE INDEX idx_test_cases_test_suite_id ON test_cases(test_suite_id);

                -- Flaky-test detection scans failing cases by name
                CREATE INDEX idx_test_cases_failed_name ON test_cases(name)
                    WHERE passed = FALSE AND skipped = FALSE;
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS test_cases CASCADE;")
            .await?;

        Ok(())
    }
}
