//! Extraction of request data from framework request types.

use http::HeaderMap;
use tonic::metadata::MetadataMap;

use crate::RequestData;

/// Extracts a [`RequestData`] from an inbound request.
///
/// Implemented for the `http` and `tonic` request and header types.
/// Framework integrations can implement it for their own request types.
///
/// # Examples
///
/// ```
/// use request_data::web::ExtractRequestData;
/// use request_data::RequestData;
///
/// struct QueueMessage {
///     correlation_id: String,
/// }
///
/// impl ExtractRequestData for QueueMessage {
///     fn extract_request_data(&self) -> RequestData {
///         RequestData {
///             request_id: self.correlation_id.clone(),
///             ..Default::default()
///         }
///     }
/// }
///
/// let msg = QueueMessage { correlation_id: "c-1".to_string() };
/// assert_eq!(msg.extract_request_data().request_id, "c-1");
/// ```
pub trait ExtractRequestData {
    /// Decodes the propagated fields. Never fails.
    fn extract_request_data(&self) -> RequestData;
}

impl ExtractRequestData for HeaderMap {
    fn extract_request_data(&self) -> RequestData {
        RequestData::from_headers(self)
    }
}

impl<B> ExtractRequestData for http::Request<B> {
    fn extract_request_data(&self) -> RequestData {
        RequestData::from_headers(self.headers())
    }
}

impl ExtractRequestData for MetadataMap {
    fn extract_request_data(&self) -> RequestData {
        RequestData::from_metadata(self)
    }
}

impl<T> ExtractRequestData for tonic::Request<T> {
    fn extract_request_data(&self) -> RequestData {
        RequestData::from_metadata(self.metadata())
    }
}
