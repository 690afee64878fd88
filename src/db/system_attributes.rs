//! Per-run coverage recording and mutable system attributes (pinning).

use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

use crate::entity::coverage_stats::ActiveModel as CoverageStatsActiveModel;
use crate::entity::test_run::{self, Entity as TestRunEntity};
use crate::entity::test_run_system_attributes::{
    self, ActiveModel as AttributesActiveModel, Entity as AttributesEntity,
};
use crate::error::{AppError, AppResult};
use crate::models::{CoveragePayload, PublicId, TestRunSystemAttributes};

use super::DbPool;

impl DbPool {
    async fn run_id_for(&self, public_id: &PublicId) -> AppResult<i64> {
        let run = TestRunEntity::find()
            .filter(test_run::Column::PublicId.eq(public_id.as_str()))
            .one(self.connection())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Test run {}", public_id)))?;

        Ok(run.id)
    }

    /// Record coverage stats for a run. At most one coverage row per run;
    /// a second submission is a conflict.
    pub async fn save_coverage(
        &self,
        public_id: &PublicId,
        payload: CoveragePayload,
    ) -> AppResult<()> {
        let run_id = self.run_id_for(public_id).await?;

        let row = CoverageStatsActiveModel {
            test_run_id: Set(run_id),
            covered_percentage: Set(payload.covered_percentage),
            covered_lines: Set(payload.covered_lines),
            total_lines: Set(payload.total_lines),
            created_timestamp: Set(chrono::Utc::now()),
            ..Default::default()
        };
        row.insert(self.connection()).await?;

        Ok(())
    }

    /// Set the pinned flag for a run, creating the attributes row if needed.
    pub async fn set_pinned(&self, public_id: &PublicId, pinned: bool) -> AppResult<()> {
        // Verify the run exists so unknown IDs surface as 404, not an FK error.
        self.run_id_for(public_id).await?;

        let row = AttributesActiveModel {
            public_id: Set(public_id.to_string()),
            pinned: Set(pinned),
        };

        AttributesEntity::insert(row)
            .on_conflict(
                OnConflict::column(test_run_system_attributes::Column::PublicId)
                    .update_column(test_run_system_attributes::Column::Pinned)
                    .to_owned(),
            )
            .exec(self.connection())
            .await?;

        Ok(())
    }

    /// Fetch a run's system attributes. Runs that were never pinned get the
    /// default (unpinned) attributes; unknown runs are a NotFound error.
    pub async fn fetch_system_attributes(
        &self,
        public_id: &PublicId,
    ) -> AppResult<TestRunSystemAttributes> {
        self.run_id_for(public_id).await?;

        let attributes = AttributesEntity::find_by_id(public_id.to_string())
            .one(self.connection())
            .await?;

        Ok(TestRunSystemAttributes {
            pinned: attributes.map(|a| a.pinned).unwrap_or(false),
        })
    }
}
