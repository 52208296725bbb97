//! HTTP plumbing: request descriptor, transport seam and the authenticated
//! pipeline every API call goes through.

pub mod error;
pub mod http;
pub mod pipeline;
pub mod request;
pub mod transport;

pub use error::{ApiError, TransportError};
pub use pipeline::{AuthPipeline, RefreshPolicy, ResponseAction};
pub use request::{ApiRequest, ApiResponse, Method};
pub use transport::{HttpTransport, Transport, REFRESH_COOKIE};
