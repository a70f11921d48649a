//! Team and teammate lifecycle over file-backed mailboxes

pub mod directory;
pub mod error;

pub use directory::{CreateOutcome, TeamDirectory, Teammate};
pub use error::TeamError;
