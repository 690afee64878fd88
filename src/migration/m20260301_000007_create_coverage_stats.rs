//! Migration: Create coverage_stats table.

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
                CREATE TABLE coverage_stats (
                    id BIGSERIAL PRIMARY KEY,
                    test_run_id BIGINT NOT NULL UNIQUE REFERENCES test_runs(id) ON DELETE CASCADE,
                    covered_percentage DOUBLE PRECISION NOT NULL,
                    covered_lines INTEGER NOT NULL DEFAULT 0,
                    total_lines INTEGER NOT NULL DEFAULT 0,
                    created_timestamp TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS coverage_stats CASCADE;")
            .await?;

        Ok(())
    }
}
