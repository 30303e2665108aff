//! Type definitions for gocab

mod catalog;
mod contact;
pub(crate) mod de;
mod envelope;
mod error;
mod outcome;

pub use catalog::*;
pub use contact::*;
pub use envelope::Envelope;
pub use error::*;
pub use outcome::Outcome;
