//! Port contracts for service discovery.
//!
//! Ports define the two capabilities the agent consumes: a transport that
//! talks to the discovery server and a reader that pulls typed results out of
//! its responses.

pub mod reader;
pub mod transport;

pub use reader::{ResponseDecodeError, ResponseDecodeResult, ResponseReader};
pub use transport::{
    DirectoryTransport, ListingResponse, RegistrationResponse, TransportError, TransportResult,
};
