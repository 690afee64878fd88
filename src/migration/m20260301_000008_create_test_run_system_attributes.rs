//! Migration: Create test_run_system_attributes table.

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
                CREATE TABLE test_run_system_attributes (
                    public_id VARCHAR(32) PRIMARY KEY REFERENCES test_runs(public_id) ON DELETE CASCADE,
                    pinned BOOLEAN NOT NULL DEFAULT FALSE
                );
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS test_run_system_attributes CASCADE;")
            .await?;

        Ok(())
    }
}
