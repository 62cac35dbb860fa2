//! Client module — Docker API gateway trait, live and fake implementations.

pub mod api;
pub mod error;
pub mod fake;
pub mod live;

pub use api::{filters, Filters, SwarmApi, API_VERSION};
pub use error::ApiError;
pub use live::UnixSocketClient;
