//! Pipeline entry points.
//!
//! - `detect`: decide what changed between the stored and scraped batch
//! - `run_check`: persist and notify for one scraped batch
//! - `run_once`: scrape the portal, then `run_check`

pub mod check;
pub mod diff;
pub mod filter;
mod run;

pub use check::{CheckReport, run_check};
pub use diff::{ChangeDecision, ChangeKind, detect};
pub use filter::{InterestFilter, is_interesting};
pub use run::run_once;
