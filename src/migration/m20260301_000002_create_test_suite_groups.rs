//! Migration: Create test_suite_groups table.
//!
//! Named partitions of a run's suites (e.g. per module), insertion-ordered
//! via the serial primary key.

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
                CREATE TABLE test_suite_groups (
                    id BIGSERIAL PRIMARY KEY,
                    test_run_id BIGINT NOT NULL REFERENCES test_runs(id) ON DELETE CASCADE,
                    group_name VARCHAR(255) NOT NULL,
                    group_label VARCHAR(255)
                );

                CREATE INDEX idx_test_suite_groups_test_run_id ON test_suite_groups(test_run_id);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS test_suite_groups CASCADE;")
            .await?;

        Ok(())
    }
}
