//! Event log domain model.

mod event;
mod sequence;

pub use event::Event;
pub use sequence::SequenceNumber;
