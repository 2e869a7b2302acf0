//! Authenticated request pipeline against the Prelude API.

pub mod client;
pub mod diagnostics;
pub mod params;
pub mod resources;
pub mod status;

pub use client::ApiClient;
pub use diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
pub use params::HttpParams;
pub use resources::Resource;
pub use status::ServiceStatus;
