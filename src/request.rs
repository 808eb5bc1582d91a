use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Key under which the whole record travels when serialized as one JSON blob.
pub const REQUEST_DATA_KEY: &str = "request_data";

/// Request-scoped identity and tracing fields.
///
/// Every field is independently optional: an absent value is the empty string
/// or `0`. A record is created by decoding inbound headers or metadata, or by
/// [`RequestData::or_default`] when none exists yet, and is treated as
/// immutable afterwards. Derivations such as [`RequestData::with_from_service`]
/// return a new value.
///
/// `client_id` and `user_id` are distinct identifiers and are never
/// substituted for one another by any codec in this crate.
///
/// # Examples
///
/// ```
/// use request_data::RequestData;
///
/// let rd = RequestData {
///     user_id: 42,
///     user_email: "a@b.com".to_string(),
///     ..Default::default()
/// };
///
/// assert_eq!(rd.client_id, 0);
/// assert!(rd.request_id.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestData {
    /// Session identifier
    #[serde(rename = "sessionID", skip_serializing_if = "String::is_empty")]
    pub session_id: String,
    /// Correlation identifier of the request
    #[serde(rename = "requestID", skip_serializing_if = "String::is_empty")]
    pub request_id: String,
    /// Caller's user agent
    #[serde(rename = "userAgent", skip_serializing_if = "String::is_empty")]
    pub user_agent: String,
    /// Caller's address as forwarded by the edge
    #[serde(rename = "ipAddr", skip_serializing_if = "String::is_empty")]
    pub ip_address: String,

    /// Client (tenant) name
    #[serde(rename = "clientName", skip_serializing_if = "String::is_empty")]
    pub client_name: String,
    /// Client storage schema
    #[serde(rename = "clientSchema", skip_serializing_if = "String::is_empty")]
    pub client_schema: String,
    /// Numeric client identifier
    #[serde(rename = "clientID", skip_serializing_if = "is_zero")]
    pub client_id: i64,
    /// Client account status
    #[serde(rename = "clientStatus", skip_serializing_if = "String::is_empty")]
    pub client_status: String,
    /// IANA time zone name of the client, e.g. `Europe/Berlin`
    #[serde(rename = "clientTimeZone", skip_serializing_if = "String::is_empty")]
    pub client_time_zone: String,

    /// Numeric user identifier
    #[serde(rename = "userId", skip_serializing_if = "is_zero")]
    pub user_id: i64,
    /// User login (email)
    #[serde(rename = "userLogin", skip_serializing_if = "String::is_empty")]
    pub user_email: String,
    /// User roles, as sent by the edge
    #[serde(rename = "userRoles", skip_serializing_if = "String::is_empty")]
    pub user_role: String,
    /// User account status
    #[serde(rename = "userStatus", skip_serializing_if = "String::is_empty")]
    pub user_status: String,
    /// Preferred user language
    #[serde(rename = "userLanguage", skip_serializing_if = "String::is_empty")]
    pub user_language: String,

    /// Name of the service that issued the call
    #[serde(rename = "fromService", skip_serializing_if = "String::is_empty")]
    pub from_service: String,
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}

impl RequestData {
    /// Returns a record whose only populated field is a freshly generated
    /// v4 `request_id`.
    pub fn with_generated_request_id() -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            ..Self::default()
        }
    }

    /// Returns a copy of `rd`, or a new record with a generated `request_id`
    /// when `rd` is absent.
    ///
    /// A fresh identifier is drawn only in the absent case.
    ///
    /// # Examples
    ///
    /// ```
    /// use request_data::RequestData;
    ///
    /// let generated = RequestData::or_default(None);
    /// assert!(!generated.request_id.is_empty());
    ///
    /// let existing = RequestData { request_id: "req-1".to_string(), ..Default::default() };
    /// assert_eq!(RequestData::or_default(Some(&existing)), existing);
    /// ```
    pub fn or_default(rd: Option<&RequestData>) -> RequestData {
        match rd {
            Some(rd) => rd.clone(),
            None => Self::with_generated_request_id(),
        }
    }

    /// Returns a copy with `from_service` replaced by `service`.
    pub fn with_from_service(&self, service: impl Into<String>) -> Self {
        Self {
            from_service: service.into(),
            ..self.clone()
        }
    }

    /// Returns a copy carrying a generated `request_id` if this one has none.
    pub fn ensure_request_id(self) -> Self {
        if self.request_id.is_empty() {
            Self {
                request_id: Uuid::new_v4().to_string(),
                ..self
            }
        } else {
            self
        }
    }
}

/// Diagnostic rendering: `{ Name: "value", ..., ClientID: 0, UserID: 0 }`.
///
/// The field order is fixed. The `Route` label repeats `from_service`; there is
/// no separate route field on the record.
impl fmt::Display for RequestData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quoted: [(&str, &str); 14] = [
            ("SessionID", self.session_id.as_str()),
            ("UserAgent", self.user_agent.as_str()),
            ("IPAddress", self.ip_address.as_str()),
            ("RequestID", self.request_id.as_str()),
            ("ClientName", self.client_name.as_str()),
            ("ClientSchema", self.client_schema.as_str()),
            ("UserEmail", self.user_email.as_str()),
            ("UserStatus", self.user_status.as_str()),
            ("UserLanguage", self.user_language.as_str()),
            ("ClientStatus", self.client_status.as_str()),
            ("FromService", self.from_service.as_str()),
            ("Route", self.from_service.as_str()),
            ("UserRole", self.user_role.as_str()),
            ("ClientTimeZone", self.client_time_zone.as_str()),
        ];

        f.write_str("{ ")?;
        for (name, value) in quoted {
            write!(f, "{name}: {value:?}, ")?;
        }
        write!(f, "ClientID: {}, UserID: {} }}", self.client_id, self.user_id)
    }
}
