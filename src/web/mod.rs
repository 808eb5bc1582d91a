//! Inbound boundary for HTTP and gRPC servers.
//!
//! This module maps framework request types to [`RequestData`](crate::RequestData)
//! and parks the resulting [`Ctx`](crate::Ctx) in the request's extensions,
//! where handlers pick it up.
//!
//! # Design Principles
//!
//! 1. **No Framework Dependencies**: Only the `http` and `tonic` request types
//!    are known here. Anything built on them (axum, hyper, tower) can call in.
//!
//! 2. **Explicit Context**: No globals. The context lives in the request that
//!    carries it and is passed on by value.
//!
//! 3. **Lenient Decode**: Extraction never rejects a request. Malformed
//!    identifiers decode to `0`.
//!
//! # Example Flow
//!
//! ```
//! use request_data::web::{attach_context, request_context};
//! use request_data::Propagator;
//!
//! let propagator = Propagator::default();
//! let request = http::Request::builder()
//!     .header("X-User-Id", "42")
//!     .body(())
//!     .unwrap();
//!
//! let request = attach_context(&propagator, request);
//! let ctx = request_context(&request).expect("context attached");
//!
//! assert_eq!(ctx.request_data().unwrap().user_id, 42);
//! ```

mod extract;
mod middleware;

pub use extract::ExtractRequestData;
pub use middleware::{attach_context, attach_rpc_context, request_context, rpc_context};
