use std::{sync::Arc, time::Duration};

use log::{debug, warn};

use crate::{
    clock::Clock,
    error::IpClockError,
    parser::{DefaultResponseParser, RawResponse, ResponseParser},
    request_url::resolve_url,
    timestamp::Timestamp,
    transport::{HttpTransport, UreqTransport, DEFAULT_TIMEOUT},
};

pub const DEFAULT_API_URL: &str = "https://worldtimeapi.org/api/ip";

/// A clock that asks a remote time API for the current time, optionally for
/// a given IP address.
///
/// Every call to [`IpClock::now`] performs exactly one request. Nothing is
/// cached or retried.
#[derive(Clone)]
pub struct IpClock {
    ip: Option<String>,
    api_url: String,
    transport: Arc<dyn HttpTransport>,
    parser: Arc<dyn ResponseParser>,
}

/// Configuration for an [`IpClock`]. Unset fields take their defaults in
/// [`IpClockBuilder::build`]:
///
/// - `ip`: none, the API resolves the caller's own address
/// - `api_url`: [`DEFAULT_API_URL`]
/// - `transport`: [`UreqTransport`] with `timeout`
/// - `timeout`: [`DEFAULT_TIMEOUT`], ignored when a transport is given
/// - `parser`: [`DefaultResponseParser`]
#[derive(Default)]
pub struct IpClockBuilder {
    ip: Option<String>,
    api_url: Option<String>,
    transport: Option<Arc<dyn HttpTransport>>,
    timeout: Option<Duration>,
    parser: Option<Arc<dyn ResponseParser>>,
}

impl IpClockBuilder {
    pub fn ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    pub fn transport<T: HttpTransport + 'static>(mut self, transport: T) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn shared_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn parser<P: ResponseParser + 'static>(mut self, parser: P) -> Self {
        self.parser = Some(Arc::new(parser));
        self
    }

    pub fn shared_parser(mut self, parser: Arc<dyn ResponseParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    pub fn build(self) -> IpClock {
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        IpClock {
            ip: self.ip.filter(|ip| !ip.is_empty()),
            api_url: self.api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            transport: self
                .transport
                .unwrap_or_else(|| Arc::new(UreqTransport::new(timeout))),
            parser: self
                .parser
                .unwrap_or_else(|| Arc::new(DefaultResponseParser)),
        }
    }
}

impl IpClock {
    pub fn new(ip: Option<String>) -> Self {
        let mut builder = Self::builder();
        if let Some(ip) = ip {
            builder = builder.ip(ip);
        }
        builder.build()
    }

    pub fn builder() -> IpClockBuilder {
        IpClockBuilder::default()
    }

    pub fn ip(&self) -> Option<&str> {
        self.ip.as_deref()
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn request_url(&self) -> String {
        resolve_url(&self.api_url, self.ip())
    }

    pub fn now(&self) -> Result<Timestamp, IpClockError> {
        let url = self.request_url();
        debug!("GET {}", url);
        self.fetch(&url).inspect_err(|e| warn!("{} ({})", e, url))
    }

    fn fetch(&self, url: &str) -> Result<Timestamp, IpClockError> {
        let res = self.transport.get(url).map_err(IpClockError::Transport)?;
        debug!("{} responded with status {}", url, res.status);
        let data: RawResponse = serde_json::from_str(&res.body).map_err(IpClockError::Decode)?;
        self.parser
            .parse(&data)
            .map_err(IpClockError::InvalidResponse)
    }
}

impl Default for IpClock {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Clock for IpClock {
    type Error = IpClockError;

    fn now(&self) -> Result<Timestamp, IpClockError> {
        IpClock::now(self)
    }
}

impl std::fmt::Debug for IpClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IpClock")
            .field("ip", &self.ip)
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use crate::{
        error::{InvalidResponse, TransportError},
        transport::HttpResponse,
    };

    use super::*;

    /// Replies with a canned body and records requested URLs.
    #[derive(Default)]
    struct StubTransport {
        body: String,
        requests: Mutex<Vec<String>>,
    }

    impl StubTransport {
        fn new(body: &str) -> Arc<Self> {
            Arc::new(Self {
                body: body.to_string(),
                requests: Mutex::new(vec![]),
            })
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl HttpTransport for StubTransport {
        fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
            self.requests.lock().unwrap().push(url.to_string());
            Ok(HttpResponse {
                status: 200,
                body: self.body.clone(),
            })
        }
    }

    const UTC_BODY: &str = r#"{"datetime": "2023-10-27T10:00:00Z", "timezone": "UTC"}"#;

    #[test]
    fn test_defaults() {
        let clock = IpClock::default();
        assert_eq!(clock.ip(), None);
        assert_eq!(clock.api_url(), DEFAULT_API_URL);
        assert_eq!(clock.request_url(), "https://worldtimeapi.org/api/ip");
    }

    #[test]
    fn test_empty_ip_is_absent() {
        let clock = IpClock::new(Some(String::new()));
        assert_eq!(clock.ip(), None);
        assert_eq!(clock.request_url(), DEFAULT_API_URL);
    }

    #[test]
    fn test_now_requests_resolved_url_once() {
        let transport = StubTransport::new(UTC_BODY);
        let clock = IpClock::builder()
            .ip("8.8.8.8")
            .shared_transport(transport.clone())
            .build();
        let now = clock.now().unwrap();
        assert_eq!(now.to_rfc3339(), "2023-10-27T10:00:00+00:00");
        assert_eq!(
            transport.requests(),
            vec!["https://worldtimeapi.org/api/ip/8.8.8.8".to_string()]
        );
    }

    #[test]
    fn test_decode_failure() {
        let transport = StubTransport::new("<html>502 Bad Gateway</html>");
        let clock = IpClock::builder().shared_transport(transport).build();
        let err = clock.now().unwrap_err();
        assert!(matches!(err, IpClockError::Decode(_)));
        assert!(err
            .to_string()
            .starts_with("Failed to retrieve time from API: "));
    }

    #[test]
    fn test_non_object_body_is_decode_failure() {
        let transport = StubTransport::new(r#"["2023-10-27T10:00:00Z", "UTC"]"#);
        let clock = IpClock::builder().shared_transport(transport).build();
        assert!(matches!(clock.now(), Err(IpClockError::Decode(_))));
    }

    #[test]
    fn test_missing_fields() {
        let transport = StubTransport::new(r#"{"foo": "bar"}"#);
        let clock = IpClock::builder().shared_transport(transport).build();
        let err = clock.now().unwrap_err();
        assert!(matches!(
            err,
            IpClockError::InvalidResponse(InvalidResponse::MissingField("datetime"))
        ));
        assert!(err
            .to_string()
            .starts_with("Failed to retrieve time from API: Invalid response from Time API"));
    }

    #[test]
    fn test_clock_trait() {
        fn year_of<C: Clock>(clock: &C) -> Option<i32> {
            use chrono::Datelike;
            clock.now().ok().map(|ts| ts.local().year())
        }
        let clock = IpClock::builder()
            .transport(StubTransportOwned(UTC_BODY))
            .build();
        assert_eq!(year_of(&clock), Some(2023));
    }

    struct StubTransportOwned(&'static str);

    impl HttpTransport for StubTransportOwned {
        fn get(&self, _url: &str) -> Result<HttpResponse, TransportError> {
            Ok(HttpResponse {
                status: 200,
                body: self.0.to_string(),
            })
        }
    }
}
