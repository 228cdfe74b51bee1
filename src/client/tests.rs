use std::cell::RefCell;

use super::{
    CheckResponse, ClientConfig, ClientError, Endpoint, RawResponse, Transport, UserCheckClient,
    endpoint_url,
};
use crate::policy::{BlockOptions, ErrorCode, RemoteFlags};

type RespondFn = dyn Fn(&str) -> Result<RawResponse, ClientError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SeenRequest {
    pub endpoint: &'static str,
    pub url: String,
    pub api_key: String,
    pub user_agent: String,
}

pub(crate) struct StubTransport {
    on_get: Box<RespondFn>,
    pub seen: RefCell<Vec<SeenRequest>>,
}

impl StubTransport {
    pub(crate) fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> Result<RawResponse, ClientError> + 'static,
    {
        Self {
            on_get: Box::new(f),
            seen: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn replying(status: u16, body: &'static str) -> Self {
        Self::new(move |_| Ok(RawResponse::new(status, body)))
    }
}

impl Transport for StubTransport {
    fn get(
        &self,
        endpoint: &'static str,
        url: &str,
        api_key: &str,
        user_agent: &str,
    ) -> Result<RawResponse, ClientError> {
        self.seen.borrow_mut().push(SeenRequest {
            endpoint,
            url: url.to_string(),
            api_key: api_key.to_string(),
            user_agent: user_agent.to_string(),
        });
        (self.on_get)(url)
    }
}

pub(crate) fn stub_client(transport: StubTransport) -> UserCheckClient<StubTransport> {
    let config = ClientConfig::new("test-key").with_base_url("https://api.test");
    UserCheckClient::with_transport(config, transport).expect("key is set")
}

#[test]
fn missing_api_key_fails_at_construction() {
    let err = UserCheckClient::new(ClientConfig::new("")).err().expect("empty key");
    assert!(matches!(err, ClientError::MissingApiKey));

    let err = UserCheckClient::with_transport(
        ClientConfig::new("   "),
        StubTransport::replying(200, "{}"),
    )
    .err()
    .expect("blank key");
    assert!(matches!(err, ClientError::MissingApiKey));
}

#[test]
fn config_from_lookup_requires_key() {
    let err = ClientConfig::from_lookup(|_| None).expect_err("no key");
    assert!(matches!(err, ClientError::MissingApiKey));

    let config = ClientConfig::from_lookup(|name| match name {
        "USERCHECK_API_KEY" => Some("abc".to_string()),
        "USERCHECK_BASE_URL" => Some("http://localhost:8080/".to_string()),
        _ => None,
    })
    .expect("key present");
    assert_eq!(config.api_key, "abc");
    assert_eq!(config.base_url(), "http://localhost:8080");
}

#[test]
fn config_debug_redacts_api_key() {
    let rendered = format!("{:?}", ClientConfig::new("super-secret"));
    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("<redacted>"));
}

#[test]
fn value_is_form_encoded_into_the_path() {
    assert_eq!(
        endpoint_url("https://api.test", Endpoint::Email, "john doe+tag@example.com"),
        "https://api.test/email/john+doe%2Btag%40example.com"
    );
    assert_eq!(
        endpoint_url("https://api.test", Endpoint::Domain, "example.com"),
        "https://api.test/domain/example.com"
    );
}

#[test]
fn email_mode_hits_email_endpoint_with_bearer_key() {
    let client = stub_client(StubTransport::replying(
        200,
        r#"{"disposable":false,"public_domain":false,"mx":true}"#,
    ));

    let outcome = client
        .validate("test@example.com", &BlockOptions::default())
        .expect("api answered");
    assert!(outcome.is_valid());
    assert_eq!(outcome.error_code(), None);

    let seen = client.transport.seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].endpoint, "email");
    assert_eq!(seen[0].url, "https://api.test/email/test%40example.com");
    assert_eq!(seen[0].api_key, "test-key");
    assert!(seen[0].user_agent.starts_with("usercheck_lib/"));
}

#[test]
fn domain_only_routes_to_domain_endpoint() {
    let client = stub_client(StubTransport::replying(200, r#"{"mx":true}"#));

    client
        .validate("example.com", &BlockOptions::new().domain_only(true))
        .expect("api answered");
    client
        .validate_domain("example.org", &BlockOptions::default())
        .expect("api answered");

    let seen = client.transport.seen.borrow();
    assert_eq!(seen[0].url, "https://api.test/domain/example.com");
    assert_eq!(seen[1].url, "https://api.test/domain/example.org");
}

#[test]
fn disposable_email_is_blocked_only_when_asked() {
    let client = stub_client(StubTransport::replying(
        200,
        r#"{"disposable":true,"public_domain":false,"mx":true}"#,
    ));

    let allowed = client
        .validate_email("test@disposable.com", &BlockOptions::default())
        .expect("api answered");
    assert!(allowed.is_valid());

    let blocked = client
        .validate_email(
            "test@disposable.com",
            &BlockOptions::new().block_disposable(true),
        )
        .expect("api answered");
    assert!(!blocked.is_valid());
    assert_eq!(blocked.error_code(), Some(ErrorCode::Disposable));
}

#[test]
fn missing_mx_is_reported_when_blocked() {
    let client = stub_client(StubTransport::replying(200, r#"{"mx":false}"#));
    let outcome = client
        .validate_domain("example.com", &BlockOptions::new().block_no_mx(true))
        .expect("api answered");
    assert_eq!(outcome.error_code(), Some(ErrorCode::NoMx));
}

#[test]
fn blocklisted_takes_priority_over_every_other_flag() {
    let client = stub_client(StubTransport::replying(
        200,
        r#"{"disposable":true,"public_domain":true,"mx":false,"blocklisted":true}"#,
    ));
    let outcome = client
        .validate_email("user@blocked.example", &BlockOptions::all())
        .expect("api answered");
    assert!(!outcome.is_valid());
    assert_eq!(outcome.error_code(), Some(ErrorCode::Blocklisted));
}

#[test]
fn bad_request_is_malformed_regardless_of_options() {
    let client = stub_client(StubTransport::replying(400, "invalid email"));

    for options in [BlockOptions::default(), BlockOptions::all()] {
        let outcome = client
            .validate_email("not-an-email", &options)
            .expect("400 is a verdict");
        assert!(!outcome.is_valid());
        assert_eq!(outcome.error_code(), Some(ErrorCode::Malformed));
    }

    assert_eq!(
        client.check("not-an-email", false).expect("400 is a verdict"),
        CheckResponse::Malformed
    );
}

#[test]
fn server_error_is_a_client_error() {
    let client = stub_client(StubTransport::replying(500, "upstream exploded"));
    let err = client
        .validate_email("test@example.com", &BlockOptions::all())
        .expect_err("500 is not a verdict");

    assert!(matches!(err, ClientError::Status { status: 500, .. }));
    assert_eq!(err.endpoint(), Some("email"));
    assert_eq!(err.body(), Some("upstream exploded"));
    assert_eq!(
        err.to_string(),
        "unable to verify email (HTTP 500): upstream exploded"
    );
}

#[test]
fn other_client_statuses_are_errors_too() {
    for status in [301, 401, 403, 404, 429] {
        let client = stub_client(StubTransport::replying(status, ""));
        let err = client.check("example.com", true).expect_err("non-2xx");
        assert!(matches!(err, ClientError::Status { endpoint: "domain", .. }));
    }
}

#[test]
fn unparseable_body_is_an_error() {
    let client = stub_client(StubTransport::replying(200, "<html>oops</html>"));
    let err = client
        .validate_email("test@example.com", &BlockOptions::default())
        .expect_err("not json");
    assert!(matches!(err, ClientError::InvalidBody { .. }));
    assert_eq!(err.body(), Some("<html>oops</html>"));
}

#[test]
fn non_object_body_is_an_error() {
    let client = stub_client(StubTransport::replying(200, "[true, false]"));
    let err = client.check("example.com", true).expect_err("array body");
    assert!(matches!(err, ClientError::InvalidFlags { .. }));
}

#[test]
fn absent_flags_take_their_defaults() {
    let client = stub_client(StubTransport::replying(200, r#"{"domain":"example.com"}"#));
    let response = client.check("example.com", true).expect("api answered");
    assert_eq!(response, CheckResponse::Flags(RemoteFlags::default()));

    let outcome = client
        .validate_domain("example.com", &BlockOptions::all())
        .expect("api answered");
    assert!(outcome.is_valid());
}

#[test]
fn transport_failures_propagate_unchanged() {
    let client = stub_client(StubTransport::new(|_| {
        Err(ClientError::status("email", 503, "maintenance"))
    }));
    let err = client
        .validate_email("test@example.com", &BlockOptions::default())
        .expect_err("transport failed");
    assert!(matches!(err, ClientError::Status { status: 503, .. }));
    assert_eq!(client.transport.seen.borrow().len(), 1);
}

pub(crate) fn seen_urls(client: &UserCheckClient<StubTransport>) -> Vec<String> {
    client
        .transport
        .seen
        .borrow()
        .iter()
        .map(|req| req.url.clone())
        .collect()
}

#[test]
fn dot_segments_are_malformed_without_a_request() {
    let client = stub_client(StubTransport::replying(200, "{}"));

    for value in [".", ".."] {
        let outcome = client
            .validate_email(value, &BlockOptions::default())
            .expect("answered locally");
        assert_eq!(outcome.error_code(), Some(ErrorCode::Malformed), "{value:?}");
        assert_eq!(
            client.check(value, true).expect("answered locally"),
            CheckResponse::Malformed
        );
    }
    assert!(seen_urls(&client).is_empty());

    // seuls les segments exacts sont concernés
    client
        .validate_domain("...", &BlockOptions::default())
        .expect("api answered");
    client
        .validate_domain("example.com.", &BlockOptions::default())
        .expect("api answered");
    assert_eq!(
        seen_urls(&client),
        [
            "https://api.test/domain/...",
            "https://api.test/domain/example.com."
        ]
    );
}

fn reqwest_client(server: &mockito::Server) -> UserCheckClient {
    let config = ClientConfig::new("test-key").with_base_url(server.url());
    UserCheckClient::new(config).expect("key is set")
}

#[test]
fn http_transport_sends_bearer_key_and_user_agent() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/domain/example.com")
        .match_header("authorization", "Bearer test-key")
        .match_header(
            "user-agent",
            mockito::Matcher::Regex(r"^usercheck_lib/\d+\.\d+\.\d+$".to_string()),
        )
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"disposable":false,"public_domain":false,"mx":false}"#)
        .create();

    let outcome = reqwest_client(&server)
        .validate_domain("example.com", &BlockOptions::new().block_no_mx(true))
        .expect("api answered");

    mock.assert();
    assert_eq!(outcome.error_code(), Some(ErrorCode::NoMx));
}

#[test]
fn http_transport_encodes_email_into_the_path() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock(
            "GET",
            mockito::Matcher::Regex(r"^/email/john\+doe(%40|@)example\.com$".to_string()),
        )
        .with_status(200)
        .with_body(r#"{"disposable":true}"#)
        .create();

    let outcome = reqwest_client(&server)
        .validate_email("john doe@example.com", &BlockOptions::new().block_disposable(true))
        .expect("api answered");

    mock.assert();
    assert_eq!(outcome.error_code(), Some(ErrorCode::Disposable));
}

#[test]
fn http_transport_maps_bad_request_to_malformed() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/email/not-an-email")
        .with_status(400)
        .with_body(r#"{"error":"invalid email"}"#)
        .create();

    let outcome = reqwest_client(&server)
        .validate_email("not-an-email", &BlockOptions::all())
        .expect("400 is a verdict");

    mock.assert();
    assert!(!outcome.is_valid());
    assert_eq!(outcome.error_code(), Some(ErrorCode::Malformed));
}

#[test]
fn http_transport_passes_server_error_body_through() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/email/test")
        .with_status(500)
        .with_body("upstream exploded")
        .expect(1)
        .create();

    let err = reqwest_client(&server)
        .validate_email("test", &BlockOptions::default())
        .expect_err("500 is not a verdict");

    mock.assert();
    assert!(matches!(
        err,
        ClientError::Status {
            endpoint: "email",
            status: 500,
            ..
        }
    ));
    assert_eq!(err.body(), Some("upstream exploded"));
}
