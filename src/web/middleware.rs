//! Attaching contexts to inbound requests.
//!
//! Servers call [`attach_context`] (HTTP) or [`attach_rpc_context`] (gRPC) as
//! early as possible, typically from a middleware layer; handlers read the
//! context back with [`request_context`] or [`rpc_context`].
//!
//! ```text
//! Inbound request
//!   ↓
//! attach_context(propagator, request)      headers → RequestData → Ctx
//!   ↓
//! handler: request_context(&request)       Ctx → logging, time zone, downstream calls
//! ```

use crate::context::Ctx;
use crate::propagator::Propagator;

/// Decodes the request's headers and stores the resulting [`Ctx`] in its
/// extensions, replacing any context stored before.
pub fn attach_context<B>(propagator: &Propagator, mut request: http::Request<B>) -> http::Request<B> {
    let ctx = propagator.inbound(&request);
    request.extensions_mut().insert(ctx);
    request
}

/// Returns the context stored by [`attach_context`].
pub fn request_context<B>(request: &http::Request<B>) -> Option<&Ctx> {
    request.extensions().get::<Ctx>()
}

/// gRPC counterpart of [`attach_context`], decoding the call's metadata.
pub fn attach_rpc_context<T>(propagator: &Propagator, mut request: tonic::Request<T>) -> tonic::Request<T> {
    let ctx = propagator.inbound(&request);
    request.extensions_mut().insert(ctx);
    request
}

/// Returns the context stored by [`attach_rpc_context`].
pub fn rpc_context<T>(request: &tonic::Request<T>) -> Option<&Ctx> {
    request.extensions().get::<Ctx>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_context_round_trip() {
        let request = http::Request::builder()
            .header("X-Request-Id", "req-http")
            .header("X-User-Login", "a@b.com")
            .body(())
            .unwrap();

        let request = attach_context(&Propagator::default(), request);
        let rd = request_context(&request).and_then(Ctx::request_data).unwrap();

        assert_eq!(rd.request_id, "req-http");
        assert_eq!(rd.user_email, "a@b.com");
    }

    #[test]
    fn plain_request_has_no_context() {
        let request = http::Request::new(());
        assert!(request_context(&request).is_none());
    }

    #[test]
    fn rpc_context_round_trip() {
        let mut request = tonic::Request::new(());
        request.metadata_mut().insert("client_name", "acme".parse().unwrap());

        let request = attach_rpc_context(&Propagator::default(), request);
        let rd = rpc_context(&request).and_then(Ctx::request_data).unwrap();

        assert_eq!(rd.client_name, "acme");
        assert!(!rd.request_id.is_empty());
    }

    #[test]
    fn reattaching_replaces_context() {
        let request = http::Request::builder()
            .header("X-Request-Id", "first")
            .body(())
            .unwrap();
        let mut request = attach_context(&Propagator::default(), request);

        request
            .headers_mut()
            .insert("X-Request-Id", http::HeaderValue::from_static("second"));
        let request = attach_context(&Propagator::default(), request);

        let rd = request_context(&request).and_then(Ctx::request_data).unwrap();
        assert_eq!(rd.request_id, "second");
    }
}
