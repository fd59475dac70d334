//! Input/output helpers.
//!
//! - locator reads over the filesystem or HTTP (`source`)
//! - CSV ingest with a column allow-list (`ingest`)
//! - combined-table CSV export (`export`)
//! - run summary JSON (`summary`)

pub mod export;
pub mod ingest;
pub mod source;
pub mod summary;

pub use export::*;
pub use ingest::*;
pub use source::*;
pub use summary::*;
