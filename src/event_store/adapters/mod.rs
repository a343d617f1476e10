//! Event store adapters.

mod memory;

pub use memory::InMemoryEventStore;
