//! HTTP client for the music.163.com web API.
//!
//! Every call runs the same pipeline:
//!
//! 1. Append the endpoint's options as a query string ([`add_options`])
//! 2. Resolve the path against the base endpoint and attach the fixed
//!    `Referer` and `User-Agent` headers ([`Music163Client::new_request`])
//! 3. Send it and classify the status ([`check_response`])
//! 4. Route the body to its [`Destination`]: decode, copy, or discard
//!
//! Endpoint methods live in separate modules (`search`, `album`, `song`,
//! `playlist`, `dj`) as `impl Music163Client` blocks.

use crate::error::{Music163Error, Result, check_response};
use crate::query::{QueryOptions, add_options};
use crate::response::{Destination, ResponseInfo};
use reqwest::Method;
use reqwest::blocking::{Client, Request};
use reqwest::header::{CONTENT_TYPE, HeaderValue, REFERER, USER_AGENT};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::{self, Write};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Root all relative request paths are resolved against.
pub const DEFAULT_BASE_URL: &str = "http://music.163.com/api/";
/// Sent as `Referer` on every request.
pub const REFERER_URL: &str = "http://music.163.com/";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows; U; Windows NT 6.1; en-US; \
    rv:1.9.1.6) Gecko/20091201 Firefox/3.5.6";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Blocking client for the music.163.com API.
///
/// Holds the transport, the base endpoint and the user agent. It is never
/// mutated after construction, so one instance (or cheap clones of it) can
/// serve any number of threads; [`reqwest::blocking::Client`] pools
/// connections internally.
#[derive(Debug, Clone)]
pub struct Music163Client {
    http: Client,
    base_url: Url,
    user_agent: String,
    user_agent_header: HeaderValue,
    timeout: Option<Duration>,
}

impl Music163Client {
    /// Create a client on `http`, or on a default transport when `None`.
    pub fn new(http: Option<Client>) -> Result<Self> {
        let builder = Self::builder();
        match http {
            Some(http) => builder.client(http).build(),
            None => builder.build(),
        }
    }

    /// Create a builder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Per-request deadline, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// A copy of this client whose requests expire after `timeout`.
    ///
    /// The transport is shared with `self`.
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..self.clone()
        }
    }

    /// Build an API request.
    ///
    /// `path` is resolved against the base endpoint (`song/detail` becomes
    /// `http://music.163.com/api/song/detail`; an absolute URL replaces the
    /// base). `body`, when present, is sent as JSON. No I/O happens here.
    pub fn new_request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Request> {
        let url = self.base_url.join(path)?;
        let mut request = Request::new(method, url);

        let headers = request.headers_mut();
        headers.insert(REFERER, HeaderValue::from_static(REFERER_URL));
        headers.insert(USER_AGENT, self.user_agent_header.clone());

        if let Some(body) = body {
            let payload = serde_json::to_vec(body).map_err(Music163Error::Serialization)?;
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            *request.body_mut() = Some(payload.into());
        }
        *request.timeout_mut() = self.timeout;
        Ok(request)
    }

    /// Send `request` and route the response body to `destination`.
    ///
    /// A non-2xx status is returned as [`Music163Error::Api`] before the
    /// destination is touched. The body is released on every path.
    pub fn execute(&self, request: Request, destination: Destination<'_>) -> Result<ResponseInfo> {
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending request");

        let mut response = self.http.execute(request)?;
        let info = ResponseInfo::from_response(&response);
        debug!(status = %info.status, %url, "received response");

        if let Err(err) = check_response(&method, &url, &info, &mut response) {
            warn!(status = %info.status, %url, message = %err.message, "API request failed");
            return Err(err.into());
        }

        match destination {
            Destination::Discard => {
                io::copy(&mut response, &mut io::sink())
                    .map_err(|e| Music163Error::stream(&info, e))?;
            }
            Destination::Sink(sink) => {
                io::copy(&mut response, &mut *sink)
                    .and_then(|_| sink.flush())
                    .map_err(|e| Music163Error::stream(&info, e))?;
            }
            Destination::Json(target) => {
                target.decode_json(&mut response).map_err(|e| {
                    warn!(status = %info.status, %url, error = %e, "cannot decode response");
                    Music163Error::decoding(&info, e)
                })?;
            }
        }
        Ok(info)
    }

    /// GET `path` with `options` and decode the JSON body into `T`.
    pub fn get_json<T: DeserializeOwned + Default>(
        &self,
        path: &str,
        options: Option<&dyn QueryOptions>,
    ) -> Result<T> {
        let path = add_options(path, options)?;
        let request = self.new_request(Method::GET, &path, None::<&()>)?;
        let mut out = T::default();
        self.execute(request, Destination::Json(&mut out))?;
        Ok(out)
    }

    /// Download `path` (relative, or an absolute URL such as a cover image
    /// or an `mp3Url`) into `sink`.
    ///
    /// Returns the number of bytes written.
    pub fn download(&self, path: &str, sink: &mut dyn Write) -> Result<u64> {
        let request = self.new_request(Method::GET, path, None::<&()>)?;
        let mut counter = CountingWriter {
            inner: sink,
            written: 0,
        };
        self.execute(request, Destination::Sink(&mut counter))?;
        Ok(counter.written)
    }
}

/// Reject a body-level `code` other than 200.
///
/// The API reports some failures (unknown id, throttling) with HTTP 200 and
/// a `code` field; bodies without `code` pass.
pub(crate) fn ensure_code(code: Option<i64>, message: Option<&str>) -> Result<()> {
    match code {
        Some(code) if code != 200 => Err(Music163Error::Code {
            code,
            message: message.unwrap_or("unknown error").to_owned(),
        }),
        _ => Ok(()),
    }
}

struct CountingWriter<'a> {
    inner: &'a mut dyn Write,
    written: u64,
}

impl Write for CountingWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Builder for [`Music163Client`].
#[derive(Debug)]
pub struct ClientBuilder {
    client: Option<Client>,
    base_url: String,
    user_agent: String,
    timeout: Option<Duration>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            client: None,
            base_url: DEFAULT_BASE_URL.to_owned(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        }
    }
}

impl ClientBuilder {
    /// Use a custom transport (shared connection pool, proxy, TLS settings).
    #[must_use]
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the base endpoint. A trailing `/` is added if missing so that
    /// relative paths extend it instead of replacing its last segment.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the per-request deadline.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Disable the per-request deadline; the transport's own settings apply.
    #[must_use]
    pub fn no_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    pub fn build(self) -> Result<Music163Client> {
        let mut base_url = Url::parse(&self.base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let user_agent_header = HeaderValue::from_str(&self.user_agent)?;
        let http = match self.client {
            Some(client) => client,
            None => Client::builder().build()?,
        };
        Ok(Music163Client {
            http,
            base_url,
            user_agent: self.user_agent,
            user_agent_header,
            timeout: self.timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Music163Client {
        Music163Client::new(None).unwrap()
    }

    #[test]
    fn test_defaults() {
        let c = client();
        assert_eq!(c.base_url().as_str(), DEFAULT_BASE_URL);
        assert_eq!(c.user_agent(), DEFAULT_USER_AGENT);
        assert_eq!(c.timeout(), Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)));
    }

    #[test]
    fn test_relative_path_keeps_base_host() {
        let c = client();
        for path in ["song/detail", "album/32311", "dj/program/detail?id=1", "../x"] {
            let req = c.new_request(Method::GET, path, None::<&()>).unwrap();
            assert_eq!(req.url().scheme(), "http");
            assert_eq!(req.url().host_str(), Some("music.163.com"));
        }
        let req = c.new_request(Method::GET, "song/detail?id=1", None::<&()>).unwrap();
        assert_eq!(req.url().as_str(), "http://music.163.com/api/song/detail?id=1");
    }

    #[test]
    fn test_absolute_path_overrides_base() {
        let req = client()
            .new_request(Method::GET, "https://p1.music.126.net/cover.jpg", None::<&()>)
            .unwrap();
        assert_eq!(req.url().as_str(), "https://p1.music.126.net/cover.jpg");
    }

    #[test]
    fn test_fixed_headers() {
        let req = client().new_request(Method::GET, "song/detail", None::<&()>).unwrap();
        assert_eq!(req.headers()[REFERER], REFERER_URL);
        assert_eq!(req.headers()[USER_AGENT], DEFAULT_USER_AGENT);
        assert!(req.headers().get(CONTENT_TYPE).is_none());
        assert!(req.body().is_none());
    }

    #[test]
    fn test_json_body() {
        #[derive(Serialize)]
        struct Body {
            id: u64,
            name: &'static str,
        }
        let req = client()
            .new_request(Method::POST, "playlist/create", Some(&Body { id: 1, name: "A" }))
            .unwrap();
        assert_eq!(*req.method(), Method::POST);
        assert_eq!(req.headers()[CONTENT_TYPE], "application/json");
        let bytes = req.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(bytes, br#"{"id":1,"name":"A"}"#);
    }

    #[test]
    fn test_unserializable_body() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(vec![1u8], 1);
        let err = client()
            .new_request(Method::POST, "x", Some(&map))
            .unwrap_err();
        assert!(matches!(err, Music163Error::Serialization(_)));
    }

    #[test]
    fn test_unparseable_path() {
        let err = client()
            .new_request(Method::GET, "http://[::1/x", None::<&()>)
            .unwrap_err();
        assert!(matches!(err, Music163Error::Parse(_)));
    }

    #[test]
    fn test_builder_normalizes_base() {
        let c = Music163Client::builder()
            .base_url("http://127.0.0.1:8080/api")
            .user_agent("music163-test")
            .no_timeout()
            .build()
            .unwrap();
        assert_eq!(c.base_url().as_str(), "http://127.0.0.1:8080/api/");
        assert_eq!(c.timeout(), None);
        let req = c.new_request(Method::GET, "album/1", None::<&()>).unwrap();
        assert_eq!(req.url().as_str(), "http://127.0.0.1:8080/api/album/1");
        assert!(req.timeout().is_none());
    }

    #[test]
    fn test_builder_rejects_bad_input() {
        let err = Music163Client::builder().base_url("not a url").build().unwrap_err();
        assert!(matches!(err, Music163Error::Parse(_)));

        let err = Music163Client::builder().user_agent("bad\nagent").build().unwrap_err();
        assert!(matches!(err, Music163Error::UserAgent(_)));
    }

    #[test]
    fn test_non_ascii_user_agent_round_trips() {
        let c = Music163Client::builder().user_agent("Müsic/1.0").build().unwrap();
        assert_eq!(c.user_agent(), "Müsic/1.0");
        let req = c.new_request(Method::GET, "album/1", None::<&()>).unwrap();
        assert_eq!(req.headers()[USER_AGENT].as_bytes(), "Müsic/1.0".as_bytes());
    }

    #[test]
    fn test_with_timeout_applies_to_requests() {
        let c = client().with_timeout(Duration::from_millis(250));
        let req = c.new_request(Method::GET, "song/detail", None::<&()>).unwrap();
        assert_eq!(req.timeout(), Some(&Duration::from_millis(250)));
    }

    #[test]
    fn test_ensure_code() {
        assert!(ensure_code(None, None).is_ok());
        assert!(ensure_code(Some(200), Some("ok")).is_ok());
        let err = ensure_code(Some(-460), Some("Cheating")).unwrap_err();
        assert_eq!(err.to_string(), "API error (code -460): Cheating");
        let err = ensure_code(Some(404), None).unwrap_err();
        assert!(matches!(err, Music163Error::Code { code: 404, ref message } if message == "unknown error"));
    }

    #[test]
    fn test_client_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Music163Client>();
    }
}
