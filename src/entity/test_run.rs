//! TestRun entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "test_runs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Opaque external handle, unique across all runs.
    #[sea_orm(unique)]
    pub public_id: String,
    pub total_test_count: i32,
    pub total_passing_count: i32,
    pub total_skipped_count: i32,
    pub total_failure_count: i32,
    pub passed: bool,
    pub cumulative_duration: f64,
    pub average_duration: f64,
    pub slowest_test_case_duration: f64,
    pub created_timestamp: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::test_suite::Entity")]
    TestSuites,
    #[sea_orm(has_many = "super::test_suite_group::Entity")]
    TestSuiteGroups,
    #[sea_orm(has_one = "super::git_metadata::Entity")]
    GitMetadata,
    #[sea_orm(has_one = "super::coverage_stats::Entity")]
    CoverageStats,
}

impl Related<super::test_suite::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TestSuites.def()
    }
}

impl Related<super::test_suite_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TestSuiteGroups.def()
    }
}

impl Related<super::git_metadata::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GitMetadata.def()
    }
}

impl Related<super::coverage_stats::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CoverageStats.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
