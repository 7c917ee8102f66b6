//! LRS GP Client - HTTP access to linear referencing geoprocessing tasks
//!
//! This crate defines the transport port, its `reqwest` adapter and the
//! client that drives the `execute` protocol.

pub mod client;
pub mod http;
pub mod ports;
pub mod response;
pub mod transport;

// Re-export main types
pub use client::{GpClient, GpTask};
pub use http::ReqwestTransport;
pub use lrsgp_core::GpClientOptions;
pub use ports::{GpRequest, GpResponse, HttpTransport, RequestMethod};
pub use transport::{build_request, choose_transport};
