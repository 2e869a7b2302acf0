//! OAuth client-credentials authentication.

pub mod oauth2;
pub mod provider;

pub use oauth2::ConnectParams;
pub use provider::TokenProvider;
