use chrono_tz::Tz;
use http::HeaderMap;

use crate::config::Config;
use crate::context::Ctx;
use crate::error::Error;
use crate::location::resolve_location_or;
use crate::web::ExtractRequestData;

/// Inbound and outbound propagation driven by a [`Config`].
///
/// Inbound, a request's headers or metadata become a fresh [`Ctx`] whose
/// record always has a `request_id`. Outbound, the record is stamped with the
/// configured service name before it is written to headers or metadata.
///
/// # Examples
///
/// ```
/// use http::HeaderMap;
/// use request_data::{Config, Propagator};
///
/// let propagator = Propagator::new(Config {
///     service_name: Some("billing".to_string()),
///     ..Config::default()
/// })
/// .expect("valid config");
///
/// let mut inbound = HeaderMap::new();
/// inbound.insert("X-Request-Id", "req-7".parse().unwrap());
///
/// let ctx = propagator.inbound(&inbound);
/// let outbound = propagator.outgoing_headers(&ctx, HeaderMap::new());
///
/// assert_eq!(outbound["x-request-id"], "req-7");
/// assert_eq!(outbound["from-service"], "billing");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Propagator {
    config: Config,
}

impl Propagator {
    /// Creates a propagator after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DefaultTimeZone`] if the configured default zone
    /// cannot be loaded.
    pub fn new(config: Config) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Builds the context for an inbound request.
    ///
    /// A `request_id` is generated when the caller sent none.
    pub fn inbound<R>(&self, request: &R) -> Ctx
    where
        R: ExtractRequestData + ?Sized,
    {
        let rd = request.extract_request_data().ensure_request_id();
        tracing::debug!(request_id = %rd.request_id, from_service = %rd.from_service, "inbound request data");
        Ctx::new().with_request_data(rd)
    }

    /// Derives the context used for calls leaving this service.
    ///
    /// With a configured service name the record's `from_service` is replaced;
    /// otherwise, or without a record, `ctx` is returned as is.
    pub fn outbound(&self, ctx: &Ctx) -> Ctx {
        match (self.config.service_name.as_deref(), ctx.request_data()) {
            (Some(service), Some(rd)) => ctx.with_request_data(rd.with_from_service(service)),
            _ => ctx.clone(),
        }
    }

    /// Writes the outbound record of `ctx` into `headers`.
    pub fn outgoing_headers(&self, ctx: &Ctx, headers: HeaderMap) -> HeaderMap {
        match self.outbound(ctx).request_data() {
            Some(rd) => rd.to_headers(headers),
            None => headers,
        }
    }

    /// Wraps `message` in a tonic request carrying the outbound metadata.
    pub fn outgoing_request<T>(&self, ctx: &Ctx, message: T) -> tonic::Request<T> {
        self.outbound(ctx).outgoing_request(message)
    }

    /// Resolves the client's time zone using the configured default.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DefaultTimeZone`] if the default zone cannot be loaded.
    pub fn location(&self, ctx: &Ctx) -> Result<Tz, Error> {
        resolve_location_or(ctx, &self.config.default_time_zone)
    }
}
