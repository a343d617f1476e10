//! Adapter implementations of the tool handler port.
//!
//! [`FnToolHandler`] lifts a plain function into a handler. The sample
//! travel catalog (weather, flights, places) is built on top of it and
//! assembled into registries by [`Catalog`].

mod arguments;
mod catalog;
mod flights;
mod function;
mod places;
mod sample;
mod weather;

pub use catalog::{Catalog, ParseCatalogError};
pub use function::FnToolHandler;
pub use sample::SampleRng;
