//! Interactive command console
//!
//! A [`ConsoleSession`] sends user-typed commands to one endpoint, one at a
//! time, and appends echoes and results to a growing [`Transcript`]. It does
//! not poll and does not retry.

mod session;
mod transcript;

pub use session::{ConsoleSession, ConsoleState, ERROR_EVENT_CAPACITY};
pub use transcript::Transcript;
