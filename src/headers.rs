use http::{HeaderMap, HeaderValue};

use crate::RequestData;

/// HTTP header names.
///
/// The first group is what [`RequestData::to_headers`] writes and
/// [`RequestData::from_headers`] reads. The rest is shared vocabulary for
/// neighbouring components (uploads, CORS, auth) and is never produced by
/// this crate.
pub mod keys {
    /// Client (tenant) name
    pub const CLIENT_NAME: &str = "X-Client-Name";
    /// Client storage schema
    pub const CLIENT_SCHEMA: &str = "X-Client-Schema";
    /// Numeric client identifier
    pub const CLIENT_ID: &str = "X-Client-Id";
    /// Client account status
    pub const CLIENT_STATUS: &str = "X-Client-Status";
    /// Client time zone name
    pub const CLIENT_TIME_ZONE: &str = "X-Client-Time-Zone";
    /// Numeric user identifier
    pub const USER_ID: &str = "X-User-Id";
    /// User login (email)
    pub const USER_LOGIN: &str = "X-User-Login";
    /// User account status
    pub const USER_STATUS: &str = "X-User-Status";
    /// User roles
    pub const USER_ROLES: &str = "X-User-Roles";
    /// Preferred user language
    pub const USER_LANGUAGE: &str = "X-User-Language";
    /// Request correlation identifier
    pub const REQUEST_ID: &str = "X-Request-Id";
    /// Session identifier
    pub const SESSION_ID: &str = "X-Session-Id";
    /// Caller address
    pub const FORWARDED_FOR: &str = "X-Forwarded-For";
    /// Caller user agent
    pub const USER_AGENT: &str = "User-Agent";
    /// Name of the calling service
    pub const FROM_SERVICE: &str = "From-Service";

    /// Account name
    pub const ACCOUNT: &str = "X-Account";
    /// Account storage schema
    pub const ACCOUNT_SCHEMA: &str = "X-Account-Schema";
    /// Numeric account identifier
    pub const ACCOUNT_ID: &str = "X-Account-Id";
    /// Uploaded file name
    pub const FILE_NAME: &str = "X-File-Name";
    /// Uploaded file size
    pub const FILE_SIZE: &str = "X-File-Size";
    /// Uploaded file type
    pub const FILE_TYPE: &str = "X-File-Type";
    /// Marks health-check probes
    pub const HEALTH_CHECKER: &str = "X-Health-Checker";
    /// Crawler directives
    pub const ROBOTS_TAG: &str = "X-Robots-Tag";
    /// Body media type
    pub const CONTENT_TYPE: &str = "Content-Type";
    /// CORS allowed origin
    pub const ACCESS_CONTROL_ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
    /// CORS preflight cache lifetime
    pub const ACCESS_CONTROL_MAX_AGE: &str = "Access-Control-Max-Age";
    /// CORS allowed methods
    pub const ACCESS_CONTROL_ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
    /// CORS allowed request headers
    pub const ACCESS_CONTROL_ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
    /// CORS headers exposed to scripts
    pub const ACCESS_CONTROL_EXPOSE_HEADERS: &str = "Access-Control-Expose-Headers";
    /// Connection options
    pub const CONNECTION: &str = "Connection";
    /// Credentials
    pub const AUTHORIZATION: &str = "Authorization";
}

impl RequestData {
    /// Writes every propagated field into `headers` and returns them.
    ///
    /// Existing values for the propagated keys are replaced; all other headers
    /// are left untouched. Integers are written in base 10.
    ///
    /// # Examples
    ///
    /// ```
    /// use http::HeaderMap;
    /// use request_data::RequestData;
    ///
    /// let rd = RequestData { user_id: 42, ..Default::default() };
    /// let headers = rd.to_headers(HeaderMap::new());
    ///
    /// assert_eq!(headers["x-user-id"], "42");
    /// ```
    pub fn to_headers(&self, mut headers: HeaderMap) -> HeaderMap {
        self.write_headers(&mut headers);
        headers
    }

    /// In-place form of [`RequestData::to_headers`].
    pub fn write_headers(&self, headers: &mut HeaderMap) {
        let client_id = self.client_id.to_string();
        let user_id = self.user_id.to_string();

        let fields: [(&'static str, &str); 15] = [
            (keys::CLIENT_NAME, self.client_name.as_str()),
            (keys::CLIENT_SCHEMA, self.client_schema.as_str()),
            (keys::CLIENT_ID, client_id.as_str()),
            (keys::CLIENT_STATUS, self.client_status.as_str()),
            (keys::CLIENT_TIME_ZONE, self.client_time_zone.as_str()),
            (keys::USER_ID, user_id.as_str()),
            (keys::USER_LOGIN, self.user_email.as_str()),
            (keys::USER_STATUS, self.user_status.as_str()),
            (keys::USER_ROLES, self.user_role.as_str()),
            (keys::USER_LANGUAGE, self.user_language.as_str()),
            (keys::REQUEST_ID, self.request_id.as_str()),
            (keys::USER_AGENT, self.user_agent.as_str()),
            (keys::SESSION_ID, self.session_id.as_str()),
            (keys::FORWARDED_FOR, self.ip_address.as_str()),
            (keys::FROM_SERVICE, self.from_service.as_str()),
        ];

        for (key, value) in fields {
            match HeaderValue::from_bytes(value.as_bytes()) {
                Ok(value) => {
                    headers.insert(key, value);
                }
                Err(_) => {
                    // Drop any previous value for this key.
                    headers.remove(key);
                    tracing::warn!(header = key, "value is not a valid header value, dropped");
                }
            }
        }
    }

    /// Decodes a record from inbound headers.
    ///
    /// Missing headers leave the field empty. Integer headers that are missing
    /// or do not parse as a base-10 `i64` decode to `0`; this never fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use http::HeaderMap;
    /// use request_data::RequestData;
    ///
    /// let mut headers = HeaderMap::new();
    /// headers.insert("X-User-Id", "42".parse().unwrap());
    /// headers.insert("X-User-Login", "a@b.com".parse().unwrap());
    ///
    /// let rd = RequestData::from_headers(&headers);
    /// assert_eq!(rd.user_id, 42);
    /// assert_eq!(rd.user_email, "a@b.com");
    /// assert_eq!(rd.client_id, 0);
    /// ```
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let text = |key: &'static str| -> String {
            headers
                .get(key)
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                .unwrap_or_default()
        };
        let id = |key: &'static str| -> i64 { lenient_id(key, text(key).as_str()) };

        Self {
            client_name: text(keys::CLIENT_NAME),
            client_schema: text(keys::CLIENT_SCHEMA),
            client_id: id(keys::CLIENT_ID),
            client_status: text(keys::CLIENT_STATUS),
            client_time_zone: text(keys::CLIENT_TIME_ZONE),

            user_id: id(keys::USER_ID),
            user_email: text(keys::USER_LOGIN),
            user_status: text(keys::USER_STATUS),
            user_role: text(keys::USER_ROLES),
            user_language: text(keys::USER_LANGUAGE),

            request_id: text(keys::REQUEST_ID),
            user_agent: text(keys::USER_AGENT),
            session_id: text(keys::SESSION_ID),
            ip_address: text(keys::FORWARDED_FOR),

            from_service: text(keys::FROM_SERVICE),
        }
    }
}

/// Parses a base-10 identifier, falling back to `0`.
///
/// Malformed input is reported at debug level only; callers never see it.
pub(crate) fn lenient_id(key: &str, raw: &str) -> i64 {
    if raw.is_empty() {
        return 0;
    }
    match raw.parse::<i64>() {
        Ok(id) => id,
        Err(err) => {
            tracing::debug!(key, value = raw, error = %err, "malformed identifier, using 0");
            0
        }
    }
}
