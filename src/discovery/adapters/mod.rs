//! Adapter implementations for the discovery ports.

pub mod memory;

mod clock;
mod http;
mod json_reader;

pub use clock::ManualClock;
pub use http::HttpDirectoryTransport;
pub use json_reader::JsonResponseReader;
pub use memory::{InMemoryDirectoryTransport, RecordedRegistration};
