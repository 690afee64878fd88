//! SeaORM entity definitions for PostgreSQL database.

pub mod coverage_stats;
pub mod git_metadata;
pub mod test_case;
pub mod test_failure;
pub mod test_run;
pub mod test_run_system_attributes;
pub mod test_suite;
pub mod test_suite_group;
