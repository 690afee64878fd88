//! TestCase entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "test_cases")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub test_suite_id: i64,
    /// 1-based index, unique and contiguous within the suite.
    pub idx: i32,
    pub name: String,
    pub class_name: Option<String>,
    pub duration: f64,
    pub passed: bool,
    pub skipped: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::test_suite::Entity",
        from = "Column::TestSuiteId",
        to = "super::test_suite::Column::Id",
        on_delete = "Cascade"
    )]
    TestSuite,
    #[sea_orm(has_one = "super::test_failure::Entity")]
    TestFailure,
}

impl Related<super::test_suite::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TestSuite.def()
    }
}

impl Related<super::test_failure::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TestFailure.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
