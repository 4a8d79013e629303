//! Queries for the `gmb_locations` table.

mod read;
mod types;
mod write;

pub use read::list_locations_to_verify;
pub use types::GmbLocationRow;
pub use write::{update_verification_results, VerificationUpdate};
