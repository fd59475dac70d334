//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - run configuration (`PipelineConfig`, `SleepConfig`, `TrainingConfig`)
//! - column rename maps (`ColumnMapping`) and join kinds (`JoinKind`)
//! - raw and date-keyed tables (`RawTable`, `KeyedTable`)

pub mod table;
pub mod types;

pub use table::*;
pub use types::*;
