//! TestFailure entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "test_failures")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// One failure row per failed case.
    #[sea_orm(unique)]
    pub test_case_id: i64,
    #[sea_orm(column_type = "Text", nullable)]
    pub failure_message: Option<String>,
    pub failure_type: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub failure_text: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::test_case::Entity",
        from = "Column::TestCaseId",
        to = "super::test_case::Column::Id",
        on_delete = "Cascade"
    )]
    TestCase,
}

impl Related<super::test_case::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TestCase.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
