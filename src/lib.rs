//! Request-scoped identity and tracing fields, propagated across processes.
//!
//! This crate carries a small bundle of request fields (user, client,
//! session, request id, ...) through four representations:
//! - **In-process**: a [`Ctx`] threaded explicitly through the call chain
//! - **HTTP**: `X-*` headers on inbound and outbound requests
//! - **RPC**: snake_case gRPC metadata on outgoing calls
//! - **Logs**: structured `tracing` fields and spans
//!
//! # Core Types
//!
//! - [`RequestData`]: The propagated record
//! - [`Ctx`]: Immutable request context holding the record and its outgoing metadata
//! - [`Metadata`]: Flat key/value pairs for outgoing RPC calls
//! - [`Propagator`]: Config-driven inbound/outbound pipeline
//! - [`RequestLog`]: Logger bound to one request's record
//!
//! # Examples
//!
//! ```
//! use http::HeaderMap;
//! use request_data::{attach, resolve_location, retrieve, Ctx, RequestData};
//!
//! // Decode inbound headers
//! let mut headers = HeaderMap::new();
//! headers.insert("X-User-Id", "42".parse().unwrap());
//! headers.insert("X-User-Login", "a@b.com".parse().unwrap());
//! let rd = RequestData::from_headers(&headers);
//!
//! // Attach to the request's context; downstream calls inherit it
//! let ctx = attach(&Ctx::new(), rd);
//! assert_eq!(retrieve(Some(&ctx)).unwrap().user_id, 42);
//!
//! let call = ctx.outgoing_request(());
//! assert_eq!(call.metadata().get("user_login").unwrap().to_str().unwrap(), "a@b.com");
//!
//! // Derived views
//! ctx.log().info(format_args!("handling request"));
//! assert_eq!(resolve_location(&ctx).unwrap(), chrono_tz::Europe::Moscow);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod context;
mod error;
pub mod headers;
mod location;
mod logging;
pub mod metadata;
mod propagator;
mod request;
pub mod web;

pub use config::Config;
pub use context::{attach, copy_across, retrieve, Ctx};
pub use error::Error;
pub use location::{resolve_location, resolve_location_or, DEFAULT_TIME_ZONE};
pub use logging::RequestLog;
pub use metadata::Metadata;
pub use propagator::Propagator;
pub use request::{RequestData, REQUEST_DATA_KEY};
