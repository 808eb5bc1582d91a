//! RPC metadata codec.
//!
//! Outgoing calls carry the record as flat snake_case pairs. The pairs are
//! kept as plain strings in [`Metadata`] so a context can hold them without
//! caring about the transport, and converted to a tonic [`MetadataMap`] at
//! the point a request is built.

use std::collections::btree_map;
use std::collections::BTreeMap;

use serde_json::Value;
use tonic::metadata::{Ascii, MetadataKey, MetadataMap, MetadataValue};

use crate::headers::lenient_id;
use crate::RequestData;

/// RPC metadata keys.
pub mod keys {
    /// Client (tenant) name
    pub const CLIENT_NAME: &str = "client_name";
    /// Client storage schema
    pub const CLIENT_SCHEMA: &str = "client_schema";
    /// Numeric client identifier
    pub const CLIENT_ID: &str = "client_id";
    /// User login (email)
    pub const USER_LOGIN: &str = "user_login";
    /// Numeric user identifier
    pub const USER_ID: &str = "user_id";
    /// User roles
    pub const USER_ROLES: &str = "user_roles";
    /// User account status
    pub const USER_STATUS: &str = "user_status";
    /// Caller user agent
    pub const USER_AGENT: &str = "user_agent";
    /// Caller address
    pub const IP_ADDRESS: &str = "ip_address";
    /// Request correlation identifier
    pub const REQUEST_ID: &str = "request_id";
    /// Session identifier
    pub const SESSION_ID: &str = "session_id";
    /// Client account status
    pub const CLIENT_STATUS: &str = "client_status";
    /// Name of the calling service
    pub const FROM_SERVICE: &str = "from_service";
}

/// Flat key/value pairs attached to outgoing RPC calls.
///
/// Always holds every key in [`keys`], empty values included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata(BTreeMap<&'static str, String>);

impl Metadata {
    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the pairs in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, &'static str, String> {
        self.0.iter()
    }

    /// Copies the pairs into `map`, replacing existing values for the same keys.
    ///
    /// Every key is written. A value that is not printable ASCII (non-ASCII
    /// text, control characters) is sent empty and logged with a warning.
    pub fn write_to(&self, map: &mut MetadataMap) {
        for (&key, value) in &self.0 {
            let key = MetadataKey::<Ascii>::from_static(key);
            let encoded = if value.is_ascii() {
                value.parse::<MetadataValue<Ascii>>().ok()
            } else {
                None
            };
            match encoded {
                Some(value) => {
                    map.insert(key, value);
                }
                None => {
                    tracing::warn!(key = key.as_str(), "value is not valid ASCII metadata, sent empty");
                    map.insert(key, MetadataValue::from_static(""));
                }
            }
        }
    }

    /// Builds a tonic metadata map from the pairs.
    pub fn to_metadata_map(&self) -> MetadataMap {
        let mut map = MetadataMap::with_capacity(self.0.len());
        self.write_to(&mut map);
        map
    }
}

impl<'a> IntoIterator for &'a Metadata {
    type Item = (&'a &'static str, &'a String);
    type IntoIter = btree_map::Iter<'a, &'static str, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl RequestData {
    /// Produces the metadata pairs for outgoing RPC calls.
    ///
    /// Every key is present even when the field is empty. `client_time_zone`
    /// and `user_language` are not part of the metadata vocabulary and do not
    /// travel over RPC.
    ///
    /// # Examples
    ///
    /// ```
    /// use request_data::RequestData;
    ///
    /// let rd = RequestData { client_id: 7, ..Default::default() };
    /// let md = rd.to_metadata();
    ///
    /// assert_eq!(md.get("client_id"), Some("7"));
    /// assert_eq!(md.get("session_id"), Some(""));
    /// ```
    pub fn to_metadata(&self) -> Metadata {
        let pairs = [
            (keys::CLIENT_NAME, self.client_name.clone()),
            (keys::CLIENT_SCHEMA, self.client_schema.clone()),
            (keys::CLIENT_ID, self.client_id.to_string()),
            (keys::USER_LOGIN, self.user_email.clone()),
            (keys::USER_ID, self.user_id.to_string()),
            (keys::USER_ROLES, self.user_role.clone()),
            (keys::USER_STATUS, self.user_status.clone()),
            (keys::USER_AGENT, self.user_agent.clone()),
            (keys::IP_ADDRESS, self.ip_address.clone()),
            (keys::REQUEST_ID, self.request_id.clone()),
            (keys::SESSION_ID, self.session_id.clone()),
            (keys::CLIENT_STATUS, self.client_status.clone()),
            (keys::FROM_SERVICE, self.from_service.clone()),
        ];
        Metadata(pairs.into_iter().collect())
    }

    /// Decodes a record from inbound RPC metadata.
    ///
    /// Uses the same lenient policy as [`RequestData::from_headers`]: missing
    /// or non-ASCII values are empty, malformed identifiers are `0`.
    pub fn from_metadata(map: &MetadataMap) -> Self {
        let text = |key: &'static str| -> String {
            map.get(key)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string()
        };
        let id = |key: &'static str| -> i64 { lenient_id(key, text(key).as_str()) };

        Self {
            client_name: text(keys::CLIENT_NAME),
            client_schema: text(keys::CLIENT_SCHEMA),
            client_id: id(keys::CLIENT_ID),
            client_status: text(keys::CLIENT_STATUS),
            user_id: id(keys::USER_ID),
            user_email: text(keys::USER_LOGIN),
            user_role: text(keys::USER_ROLES),
            user_status: text(keys::USER_STATUS),
            user_agent: text(keys::USER_AGENT),
            ip_address: text(keys::IP_ADDRESS),
            request_id: text(keys::REQUEST_ID),
            session_id: text(keys::SESSION_ID),
            from_service: text(keys::FROM_SERVICE),
            ..Self::default()
        }
    }

    /// Generic map of the metadata fields with identifiers kept as numbers.
    ///
    /// Suitable for JSON serialization or structured payloads.
    pub fn to_header_map(&self) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([
            (keys::CLIENT_NAME, Value::from(self.client_name.as_str())),
            (keys::CLIENT_SCHEMA, Value::from(self.client_schema.as_str())),
            (keys::CLIENT_ID, Value::from(self.client_id)),
            (keys::USER_LOGIN, Value::from(self.user_email.as_str())),
            (keys::USER_ID, Value::from(self.user_id)),
            (keys::USER_ROLES, Value::from(self.user_role.as_str())),
            (keys::USER_STATUS, Value::from(self.user_status.as_str())),
            (keys::USER_AGENT, Value::from(self.user_agent.as_str())),
            (keys::IP_ADDRESS, Value::from(self.ip_address.as_str())),
            (keys::REQUEST_ID, Value::from(self.request_id.as_str())),
            (keys::SESSION_ID, Value::from(self.session_id.as_str())),
            (keys::CLIENT_STATUS, Value::from(self.client_status.as_str())),
            (keys::FROM_SERVICE, Value::from(self.from_service.as_str())),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RequestData {
        RequestData {
            session_id: "sess-1".to_string(),
            request_id: "req-1".to_string(),
            user_agent: "grpc-rust/0.12".to_string(),
            ip_address: "10.1.2.3".to_string(),
            client_name: "acme".to_string(),
            client_schema: "acme_v2".to_string(),
            client_id: 17,
            client_status: "active".to_string(),
            client_time_zone: "Asia/Tokyo".to_string(),
            user_id: 42,
            user_email: "a@b.com".to_string(),
            user_role: "admin".to_string(),
            user_status: "enabled".to_string(),
            user_language: "ja".to_string(),
            from_service: "gateway".to_string(),
        }
    }

    #[test]
    fn metadata_always_has_every_key() {
        let md = RequestData::default().to_metadata();

        assert_eq!(md.len(), 13);
        for (_, value) in md.iter().filter(|(k, _)| !k.ends_with("_id")) {
            assert!(value.is_empty());
        }
        assert_eq!(md.get(keys::CLIENT_ID), Some("0"));
        assert_eq!(md.get(keys::USER_ID), Some("0"));
    }

    #[test]
    fn metadata_maps_fields_to_snake_case_keys() {
        let md = sample().to_metadata();

        assert_eq!(md.get("client_id"), Some("17"));
        assert_eq!(md.get("user_id"), Some("42"));
        assert_eq!(md.get("user_login"), Some("a@b.com"));
        assert_eq!(md.get("ip_address"), Some("10.1.2.3"));
        assert_eq!(md.get("from_service"), Some("gateway"));
        assert_eq!(md.get("client_time_zone"), None);
    }

    #[test]
    fn metadata_map_round_trip() {
        let rd = sample();
        let decoded = RequestData::from_metadata(&rd.to_metadata().to_metadata_map());

        let expected = RequestData {
            client_time_zone: String::new(),
            user_language: String::new(),
            ..rd
        };
        assert_eq!(decoded, expected);
    }

    #[test]
    fn unencodable_values_are_sent_empty() {
        let rd = RequestData {
            user_agent: "Браузер".to_string(),
            client_name: "bad\nname".to_string(),
            request_id: "req-2".to_string(),
            ..Default::default()
        };
        let map = rd.to_metadata().to_metadata_map();

        assert_eq!(map.len(), 13);
        assert_eq!(map.get(keys::USER_AGENT).unwrap().to_str().unwrap(), "");
        assert_eq!(map.get(keys::CLIENT_NAME).unwrap().to_str().unwrap(), "");
        assert_eq!(map.get(keys::REQUEST_ID).and_then(|v| v.to_str().ok()), Some("req-2"));
    }

    #[test]
    fn unencodable_value_replaces_existing_one() {
        let mut map = MetadataMap::new();
        map.insert("user_login", "old@b.com".parse().unwrap());

        let rd = RequestData { user_email: "иван@почта.рф".to_string(), ..Default::default() };
        rd.to_metadata().write_to(&mut map);

        assert_eq!(map.get_all("user_login").iter().count(), 1);
        assert_eq!(map.get("user_login").unwrap().to_str().unwrap(), "");
    }

    #[test]
    fn write_to_keeps_foreign_keys() {
        let mut map = MetadataMap::new();
        map.insert("authorization", "Bearer t".parse().unwrap());
        map.insert("request_id", "stale".parse().unwrap());

        sample().to_metadata().write_to(&mut map);

        assert_eq!(map.get("authorization").unwrap().to_str().unwrap(), "Bearer t");
        assert_eq!(map.get("request_id").unwrap().to_str().unwrap(), "req-1");
    }

    #[test]
    fn from_metadata_is_lenient() {
        let mut map = MetadataMap::new();
        map.insert("client_id", "not-a-number".parse().unwrap());
        map.insert("user_id", "5".parse().unwrap());

        let rd = RequestData::from_metadata(&map);
        assert_eq!(rd.client_id, 0);
        assert_eq!(rd.user_id, 5);
        assert!(rd.request_id.is_empty());
    }

    #[test]
    fn header_map_keeps_numbers_numeric() {
        let map = sample().to_header_map();

        assert_eq!(map.len(), 13);
        assert_eq!(map["client_id"], Value::from(17));
        assert_eq!(map["user_id"], Value::from(42));
        assert_eq!(map["user_login"], Value::from("a@b.com"));

        let json = serde_json::to_string(&map).expect("serialize");
        assert!(json.contains(r#""client_id":17"#));
    }
}
