//! HTTP primitives for leadbox
//!
//! [`Request`] and [`Response`] are plain owned values; [`Handler`] turns one
//! into the other and [`Middleware`] wraps handlers with cross-cutting
//! behaviour. The server crate adapts these to hyper.

pub mod middleware;
pub mod request;
pub mod response;

pub use leadbox_core::exception::{Error, Result};
pub use middleware::{Handler, Middleware, MiddlewareChain};
pub use request::{Request, RequestBuilder};
pub use response::Response;
