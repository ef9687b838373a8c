//! Garden REST API plumbing.
//!
//! Builds the requests the application emits as actions and decodes the
//! responses Zellij delivers as `WebRequestResult` events. Nothing here
//! performs I/O; the plugin shim passes requests to `web_request`.
//!
//! # Modules
//!
//! - `request`: Request types with trace-context propagation
//! - `response`: Response decoding and routing back to forms

mod request;
mod response;

pub use request::{ApiRequest, Method, TraceContext};
pub use response::ApiResponse;
