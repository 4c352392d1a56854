//! Service layer for talking to the exam portal.
//!
//! - Latest batch fetching and parsing (`PortalScraper`)

mod portal;

pub use portal::{PortalScraper, parse_latest_batch};
