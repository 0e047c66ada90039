//! Outbound HTTP: the transport port, its reqwest adapter, and the
//! executor that turns one endpoint into one counted outcome.
mod client;
mod executor;
mod transport;

#[cfg(test)]
pub(crate) mod test_support;
#[cfg(test)]
mod tests;

pub use client::{ClientSettings, ReqwestTransport, parse_base_url};
pub use executor::{RequestExecutor, RequestOutcome};
pub use transport::{
    ErrorKind, Transport, TransportError, TransportRequest, TransportResponse,
};
