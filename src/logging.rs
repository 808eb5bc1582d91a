use std::collections::BTreeMap;
use std::fmt;

use crate::RequestData;

static EMPTY: RequestData = RequestData {
    session_id: String::new(),
    request_id: String::new(),
    user_agent: String::new(),
    ip_address: String::new(),
    client_name: String::new(),
    client_schema: String::new(),
    client_id: 0,
    client_status: String::new(),
    client_time_zone: String::new(),
    user_id: 0,
    user_email: String::new(),
    user_role: String::new(),
    user_status: String::new(),
    user_language: String::new(),
    from_service: String::new(),
};

impl RequestData {
    /// Fields used to correlate log lines.
    ///
    /// A narrower set than [`RequestData::to_header_map`]: roles, statuses and
    /// the schema are left out to keep log cardinality low.
    ///
    /// # Examples
    ///
    /// ```
    /// use request_data::RequestData;
    ///
    /// let rd = RequestData { user_email: "a@b.com".to_string(), ..Default::default() };
    /// let fields = rd.to_log_fields();
    ///
    /// assert_eq!(fields["user"], "a@b.com");
    /// assert!(!fields.contains_key("user_roles"));
    /// ```
    pub fn to_log_fields(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("user", self.user_email.clone()),
            ("client_name", self.client_name.clone()),
            ("request_id", self.request_id.clone()),
            ("session_id", self.session_id.clone()),
            ("user_agent", self.user_agent.clone()),
            ("ip_address", self.ip_address.clone()),
            ("from_service", self.from_service.clone()),
        ])
    }

    /// Returns an `info`-level span carrying the log fields.
    ///
    /// Events recorded while the span is entered are correlated with the
    /// request by any subscriber that records span fields.
    pub fn span(&self) -> tracing::Span {
        tracing::info_span!(
            "request",
            user = %self.user_email,
            client_name = %self.client_name,
            request_id = %self.request_id,
            session_id = %self.session_id,
            user_agent = %self.user_agent,
            ip_address = %self.ip_address,
            from_service = %self.from_service,
        )
    }
}

macro_rules! emit {
    ($level:ident, $rd:ident, $args:ident) => {
        tracing::$level!(
            user = %$rd.user_email,
            client_name = %$rd.client_name,
            request_id = %$rd.request_id,
            session_id = %$rd.session_id,
            user_agent = %$rd.user_agent,
            ip_address = %$rd.ip_address,
            from_service = %$rd.from_service,
            "{}",
            $args
        )
    };
}

/// A logger bound to one request's record.
///
/// Obtained from [`Ctx::log`](crate::Ctx::log). Every event carries the
/// record's log fields; a context without a record logs them empty.
#[derive(Debug, Clone, Copy)]
pub struct RequestLog<'a> {
    rd: &'a RequestData,
}

impl<'a> RequestLog<'a> {
    pub(crate) fn new(rd: Option<&'a RequestData>) -> Self {
        Self {
            rd: rd.unwrap_or(&EMPTY),
        }
    }

    /// Returns the request ID attached to every event.
    pub fn request_id(&self) -> &str {
        &self.rd.request_id
    }

    /// Logs an info-level message.
    ///
    /// ```
    /// # use request_data::{Ctx, RequestData};
    /// let ctx = Ctx::new().with_request_data(RequestData::or_default(None));
    /// ctx.log().info(format_args!("order {} accepted", 17));
    /// ```
    pub fn info(&self, args: fmt::Arguments<'_>) {
        let rd = self.rd;
        emit!(info, rd, args);
    }

    /// Logs a warning-level message.
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        let rd = self.rd;
        emit!(warn, rd, args);
    }

    /// Logs an error-level message.
    pub fn error(&self, args: fmt::Arguments<'_>) {
        let rd = self.rd;
        emit!(error, rd, args);
    }

    /// Logs a debug-level message.
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        let rd = self.rd;
        emit!(debug, rd, args);
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::Ctx;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn captured<F: FnOnce()>(f: F) -> String {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        capture.contents()
    }

    fn record() -> RequestData {
        RequestData {
            request_id: "req-log".to_string(),
            session_id: "sess-log".to_string(),
            user_email: "a@b.com".to_string(),
            client_name: "acme".to_string(),
            user_role: "admin".to_string(),
            client_schema: "acme_v2".to_string(),
            from_service: "gateway".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn log_fields_are_the_narrow_subset() {
        let fields = record().to_log_fields();

        let keys: Vec<_> = fields.keys().copied().collect();
        assert_eq!(
            keys,
            vec![
                "client_name",
                "from_service",
                "ip_address",
                "request_id",
                "session_id",
                "user",
                "user_agent"
            ]
        );
        assert_eq!(fields["user"], "a@b.com");
        assert_eq!(fields["request_id"], "req-log");
    }

    #[test]
    fn request_log_includes_fields() {
        let ctx = Ctx::new().with_request_data(record());

        let out = captured(|| ctx.log().info(format_args!("hello {}", "world")));

        assert!(out.contains("hello world"));
        assert!(out.contains("request_id=req-log"));
        assert!(out.contains("user=a@b.com"));
        assert!(!out.contains("admin"));
        assert!(!out.contains("acme_v2"));
    }

    #[test]
    fn request_log_without_record_still_logs() {
        let ctx = Ctx::new();
        assert_eq!(ctx.log().request_id(), "");

        let out = captured(|| ctx.log().warn(format_args!("no identity")));
        assert!(out.contains("no identity"));
    }

    #[test]
    fn span_fields_reach_events() {
        let rd = record();

        let out = captured(|| {
            let _guard = rd.span().entered();
            tracing::info!("inside");
        });

        assert!(out.contains("inside"));
        assert!(out.contains("request_id=req-log"));
        assert!(out.contains("from_service=gateway"));
    }
}
