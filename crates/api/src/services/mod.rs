pub mod digest;
pub mod draft;
pub mod history;
pub mod identity;
pub mod outcome;
pub mod progress;
pub mod prospects;
pub mod results;
pub mod roster_order;
pub mod scoring;
pub mod seasons;

pub use draft::DraftWorkspace;
pub use outcome::{DraftOutcome, OutcomeStatus};
pub use roster_order::RosterOrderingEngine;
