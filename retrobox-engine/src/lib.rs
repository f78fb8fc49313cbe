//! Verification and execution engine.
//!
//! A refresh lists the items of a [`Selection`](retrobox_lib::Selection),
//! verifies each one into a row of tri-state component statuses and
//! persists the rows. An execute applies the selected action to chosen
//! rows; the ids it processed are then refreshed again.

pub mod aggregate;
pub mod catalog;
pub mod error;
pub mod execute;
mod executor;
pub mod layout;
pub mod refresh;
pub mod rows;
pub mod services;
pub mod source;
pub mod verifier;
pub mod web;

pub use aggregate::row_color;
pub use error::EngineError;
pub use execute::{ExecuteOptions, ExecuteOutcome, confirm_platform_mapping, execute};
pub use refresh::{RefreshOutcome, refresh};
pub use rows::Row;
pub use services::Services;
pub use source::{Item, list_items};
pub use verifier::{Verifier, verify_csv_bdd_version};
pub use web::{NoLookup, VersionLookup, WebVersionLookup};
