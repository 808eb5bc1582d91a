//! Time zone resolution for the client of a request.

use chrono_tz::Tz;

use crate::context::Ctx;
use crate::error::Error;

/// Zone used when the client sent none or an unknown one.
pub const DEFAULT_TIME_ZONE: &str = "Europe/Moscow";

/// Resolves the client's time zone from `ctx`, falling back to
/// [`DEFAULT_TIME_ZONE`].
///
/// # Errors
///
/// Returns [`Error::DefaultTimeZone`] only if the fallback zone itself cannot
/// be loaded.
///
/// # Examples
///
/// ```
/// use request_data::{resolve_location, Ctx, RequestData};
///
/// let rd = RequestData { client_time_zone: "Not/AZone".to_string(), ..Default::default() };
/// let ctx = Ctx::new().with_request_data(rd);
///
/// assert_eq!(resolve_location(&ctx).unwrap(), chrono_tz::Europe::Moscow);
/// ```
pub fn resolve_location(ctx: &Ctx) -> Result<Tz, Error> {
    resolve_location_or(ctx, DEFAULT_TIME_ZONE)
}

/// Like [`resolve_location`] with a caller-chosen fallback zone.
///
/// # Errors
///
/// Returns [`Error::DefaultTimeZone`] if `default_zone` cannot be loaded and
/// the client's zone did not resolve.
pub fn resolve_location_or(ctx: &Ctx, default_zone: &str) -> Result<Tz, Error> {
    let requested = ctx
        .request_data()
        .map(|rd| rd.client_time_zone.as_str())
        .filter(|name| !name.is_empty());

    let Some(name) = requested else {
        return load_default(default_zone);
    };

    match name.parse::<Tz>() {
        Ok(tz) => Ok(tz),
        Err(_) => {
            tracing::debug!(zone = name, fallback = default_zone, "unknown client time zone");
            load_default(default_zone)
        }
    }
}

pub(crate) fn load_default(name: &str) -> Result<Tz, Error> {
    name.parse::<Tz>()
        .map_err(|_| Error::DefaultTimeZone(name.to_string()))
}
