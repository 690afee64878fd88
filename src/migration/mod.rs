//! SeaORM database migrations.

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_test_runs;
mod m20260301_000002_create_test_suite_groups;
mod m20260301_000003_create_test_suites;
mod m20260301_000004_create_test_cases;
mod m20260301_000005_create_test_failures;
mod m20260301_000006_create_git_metadata;
mod m20260301_000007_create_coverage_stats;
mod m20260301_000008_create_test_run_system_attributes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_test_runs::Migration),
            Box::new(m20260301_000002_create_test_suite_groups::Migration),
            Box::new(m20260301_000003_create_test_suites::Migration),
            Box::new(m20260301_000004_create_test_cases::Migration),
            Box::new(m20260301_000005_create_test_failures::Migration),
            Box::new(m20260301_000006_create_git_metadata::Migration),
            Box::new(m20260301_000007_create_coverage_stats::Migration),
            Box::new(m20260301_000008_create_test_run_system_attributes::Migration),
        ]
    }
}
