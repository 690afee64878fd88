//! TestSuite entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "test_suites")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub test_run_id: i64,
    /// Null for ungrouped suites.
    pub test_suite_group_id: Option<i64>,
    /// 1-based index, unique within the run and contiguous across groups.
    pub idx: i32,
    pub package_name: Option<String>,
    pub class_name: String,
    pub test_count: i32,
    pub passing_count: i32,
    pub skipped_count: i32,
    pub failure_count: i32,
    pub duration: f64,
    pub start_ts: Option<DateTimeUtc>,
    pub hostname: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub system_out: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub system_err: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::test_run::Entity",
        from = "Column::TestRunId",
        to = "super::test_run::Column::Id",
        on_delete = "Cascade"
    )]
    TestRun,
    #[sea_orm(
        belongs_to = "super::test_suite_group::Entity",
        from = "Column::TestSuiteGroupId",
        to = "super::test_suite_group::Column::Id",
        on_delete = "Cascade"
    )]
    TestSuiteGroup,
    #[sea_orm(has_many = "super::test_case::Entity")]
    TestCases,
}

impl Related<super::test_run::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TestRun.def()
    }
}

impl Related<super::test_suite_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TestSuiteGroup.def()
    }
}

impl Related<super::test_case::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TestCases.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
