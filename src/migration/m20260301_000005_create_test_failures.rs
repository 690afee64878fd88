//! Migration: Create test_failures table.

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
                CREATE TABLE test_failures (
                    id BIGSERIAL PRIMARY KEY,
                    test_case_id BIGINT NOT NULL UNIQUE REFERENCES test_cases(id) ON DELETE CASCADE,
                    failure_message TEXT,
                    failure_type VARCHAR(500),
                    failure_text TEXT
                );
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS test_failures CASCADE;")
            .await?;

        Ok(())
    }
}
