//! Migration: Create git_metadata table.
//!
//! Links runs to repositories for the repository-level aggregate views.

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
                CREATE TABLE git_metadata (
                    id BIGSERIAL PRIMARY KEY,
                    test_run_id BIGINT NOT NULL UNIQUE REFERENCES test_runs(id) ON DELETE CASCADE,
                    repo_name VARCHAR(500) NOT NULL,
                    project_name VARCHAR(255),
                    branch_name VARCHAR(255),
                    is_main_line BOOLEAN NOT NULL DEFAULT TRUE
                );

                CREATE INDEX idx_git_metadata_repo_name ON git_metadata(repo_name, project_name);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS git_metadata CASCADE;")
            .await?;

        Ok(())
    }
}
