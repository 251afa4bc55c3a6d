//! Networking: request/response models, the transport seam and the fetcher
//! that ties them together.

pub mod fetcher;
pub mod request;
pub mod response;
pub mod transport;

pub use fetcher::{Fetcher, FetcherBuilder};
pub use request::{FetchRequest, HttpRequest, Method};
pub use response::{JsonResponse, Response};
pub use transport::{ReqwestTransport, Transport};
