//! Default reader for JSON response envelopes.

use crate::discovery::{
    domain::{Service, Ttl},
    ports::{
        ListingResponse, RegistrationResponse, ResponseDecodeError, ResponseDecodeResult,
        ResponseReader,
    },
};
use serde_json::Value;

/// Reads the payloads produced by the default discovery server.
///
/// Listings carry an array of `{"Name", "Host", "Port"}` objects; a `null`
/// payload is an empty listing. Registrations carry the renewal TTL as a
/// non-negative integer number of seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonResponseReader;

impl JsonResponseReader {
    /// Creates a reader.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ResponseReader for JsonResponseReader {
    fn extract_services(&self, response: &ListingResponse) -> ResponseDecodeResult<Vec<Service>> {
        match &response.data {
            Value::Null => Ok(Vec::new()),
            Value::Array(_) => Ok(serde_json::from_value(response.data.clone())?),
            other => Err(ResponseDecodeError::unexpected(
                "service listing",
                format!("expected an array, found {other}"),
            )),
        }
    }

    fn extract_renewal_ttl(&self, response: &RegistrationResponse) -> ResponseDecodeResult<Ttl> {
        response.data.as_u64().map(Ttl::from_secs).ok_or_else(|| {
            ResponseDecodeError::unexpected(
                "renewal TTL",
                format!("expected a non-negative integer, found {}", response.data),
            )
        })
    }
}
