use std::sync::Arc;

use crate::logging::RequestLog;
use crate::metadata::Metadata;
use crate::RequestData;

/// Request-scoped context threaded explicitly through a call chain.
///
/// A `Ctx` holds at most one [`RequestData`] together with the outgoing RPC
/// metadata derived from it. The two are always set together by
/// [`Ctx::with_request_data`]; there is no way to carry one without the other.
///
/// Contexts are never modified in place. Every derivation returns a new `Ctx`
/// that shares the record through an `Arc`, so clones can be handed to
/// parallel branches of a call tree without locking.
///
/// # Examples
///
/// ```
/// use request_data::{Ctx, RequestData};
///
/// let rd = RequestData { request_id: "req-123".to_string(), ..Default::default() };
/// let ctx = Ctx::new().with_request_data(rd.clone());
///
/// assert_eq!(ctx.request_data(), Some(&rd));
/// assert_eq!(ctx.outgoing_metadata().unwrap().get("request_id"), Some("req-123"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Ctx {
    request_data: Option<Arc<RequestData>>,
    outgoing: Option<Arc<Metadata>>,
}

impl Ctx {
    /// Creates an empty context with no record attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives a child context carrying `rd` and its outgoing metadata.
    ///
    /// `self` is left unchanged.
    pub fn with_request_data(&self, rd: RequestData) -> Self {
        let outgoing = rd.to_metadata();
        Self {
            request_data: Some(Arc::new(rd)),
            outgoing: Some(Arc::new(outgoing)),
        }
    }

    /// Returns the attached record, if any.
    pub fn request_data(&self) -> Option<&RequestData> {
        self.request_data.as_deref()
    }

    /// Returns the metadata that outgoing calls made with this context carry.
    pub fn outgoing_metadata(&self) -> Option<&Metadata> {
        self.outgoing.as_deref()
    }

    /// Derives a context from `self` that carries the record of `source`.
    ///
    /// Used when a new call chain must keep the identity of an unrelated one,
    /// e.g. a background task spawned from a request handler. If `source` has
    /// no record, the result is a plain copy of `self`.
    pub fn inherit_from(&self, source: &Ctx) -> Self {
        match &source.request_data {
            Some(rd) => Self {
                request_data: Some(Arc::clone(rd)),
                outgoing: source.outgoing.clone(),
            },
            None => self.clone(),
        }
    }

    /// Wraps `message` in a tonic request carrying this context's metadata.
    ///
    /// Without an attached record the request has no propagated metadata.
    pub fn outgoing_request<T>(&self, message: T) -> tonic::Request<T> {
        let mut request = tonic::Request::new(message);
        if let Some(outgoing) = &self.outgoing {
            outgoing.write_to(request.metadata_mut());
        }
        request
    }

    /// Returns a logger whose events carry this context's log fields.
    pub fn log(&self) -> RequestLog<'_> {
        RequestLog::new(self.request_data())
    }
}

/// Derives a child of `parent` carrying `rd` and its outgoing metadata.
pub fn attach(parent: &Ctx, rd: RequestData) -> Ctx {
    parent.with_request_data(rd)
}

/// Looks up the record of `ctx`.
///
/// Returns `None` when there is no context or no record attached to it.
pub fn retrieve(ctx: Option<&Ctx>) -> Option<&RequestData> {
    ctx.and_then(Ctx::request_data)
}

/// Attaches the record of `source` to `target`.
///
/// When `source` has no record, `target` is returned as it is, keeping
/// whatever record it already carries.
pub fn copy_across(source: &Ctx, target: &Ctx) -> Ctx {
    target.inherit_from(source)
}
