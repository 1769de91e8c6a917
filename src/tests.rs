//! Client behaviour tests against a scripted gateway

use crate::client::*;
use crate::response::{ItemOutcome, Reply};
use crate::status::MessageStatus;
use bytes::Bytes;
use std::collections::VecDeque;
use std::sync::Mutex;

/// A request as seen by the transport
#[derive(Debug, Clone)]
struct Recorded {
    path: String,
    params: Vec<(String, String)>,
}

impl Recorded {
    fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Answers requests with canned bodies, in order, and records every request
#[derive(Default)]
struct ScriptedTransport {
    responses: Mutex<VecDeque<crate::Result<&'static str>>>,
    requests: Mutex<Vec<Recorded>>,
}

impl ScriptedTransport {
    fn new<I: IntoIterator<Item = &'static str>>(bodies: I) -> Self {
        Self {
            responses: Mutex::new(bodies.into_iter().map(Ok).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn then_fail(self, message: &'static str) -> Self {
        self.responses.lock().unwrap().push_back(Err(message.into()));
        self
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }

    fn count(&self, path: &str) -> usize {
        self.paths().iter().filter(|p| *p == path).count()
    }
}

impl Transport for ScriptedTransport {
    async fn get(&self, path: &str, params: &[(String, String)]) -> crate::Result<Bytes> {
        self.requests.lock().unwrap().push(Recorded {
            path: path.to_string(),
            params: params.to_vec(),
        });

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(body)) => Ok(Bytes::from_static(body.as_bytes())),
            Some(Err(e)) => Err(e),
            None => Err("no scripted response left".into()),
        }
    }
}

fn config() -> ClientConfig {
    ClientConfig::new(Credentials::new("3412345", "user", "secret"))
}

fn client(bodies: Vec<&'static str>) -> ClickatellClient<ScriptedTransport> {
    ClickatellClient::with_transport(config(), ScriptedTransport::new(bodies)).unwrap()
}

#[cfg(test)]
mod session_tests {
    use super::*;

    #[tokio::test]
    async fn test_authenticate_sends_credentials() {
        let mut client = client(vec!["OK: session-1"]);

        let session = client.authenticate(false).await.unwrap();
        assert_eq!(session, "session-1");
        assert_eq!(client.session_id(), Some("session-1"));

        let requests = client.transport().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/http/auth");
        assert_eq!(requests[0].param("api_id"), Some("3412345"));
        assert_eq!(requests[0].param("user"), Some("user"));
        assert_eq!(requests[0].param("password"), Some("secret"));
        assert_eq!(requests[0].param("session_id"), None);
    }

    #[tokio::test]
    async fn test_authenticate_is_cached() {
        let mut client = client(vec!["OK: session-1"]);

        let first = client.authenticate(false).await.unwrap();
        let second = client.authenticate(false).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(client.transport().count("/http/auth"), 1);
    }

    #[tokio::test]
    async fn test_forced_authenticate_renews_session() {
        let mut client = client(vec!["OK: session-1", "OK: session-2"]);

        client.authenticate(false).await.unwrap();
        let renewed = client.authenticate(true).await.unwrap();

        assert_eq!(renewed, "session-2");
        assert_eq!(client.transport().count("/http/auth"), 2);
    }

    #[tokio::test]
    async fn test_authentication_failure_is_not_retried() {
        let mut client = client(vec!["ERR: 001, Authentication failed"]);

        let err = client.authenticate(false).await.unwrap_err();
        assert_eq!(err.code(), Some("001"));
        assert_eq!(client.transport().count("/http/auth"), 1);
        assert_eq!(client.session_id(), None);
    }

    #[tokio::test]
    async fn test_empty_session_id_is_rejected() {
        let mut client = client(vec!["OK:"]);

        let err = client.authenticate(false).await.unwrap_err();
        assert!(matches!(err, ClickatellError::InvalidData(_)));
        assert_eq!(client.session_id(), None);
    }

    #[tokio::test]
    async fn test_ping_uses_cached_session() {
        let mut client = client(vec!["OK: session-1", "OK:"]);

        assert!(client.ping().await.unwrap());

        let requests = client.transport().requests();
        assert_eq!(requests[1].path, "/http/ping");
        assert_eq!(requests[1].param("session_id"), Some("session-1"));
    }

    #[tokio::test]
    async fn test_ping_reports_gateway_failure_as_false() {
        let mut client = client(vec!["OK: session-1", "ERR: 004, Account frozen"]);
        assert!(!client.ping().await.unwrap());
    }

    #[tokio::test]
    async fn test_ping_propagates_transport_failure() {
        let transport = ScriptedTransport::new(["OK: session-1"]).then_fail("connection refused");
        let mut client = ClickatellClient::with_transport(config(), transport).unwrap();

        let err = client.ping().await.unwrap_err();
        assert!(matches!(err, ClickatellError::Transport(msg) if msg == "connection refused"));
    }

    #[tokio::test]
    async fn test_invalidate_session_forces_reauthentication() {
        let mut client = client(vec!["OK: session-1", "OK: session-2", "OK:"]);

        client.authenticate(false).await.unwrap();
        client.invalidate_session();
        assert_eq!(client.session_id(), None);

        client.ping().await.unwrap();
        let requests = client.transport().requests();
        assert_eq!(requests[2].param("session_id"), Some("session-2"));
    }

    #[test]
    fn test_missing_credentials_fail_before_any_request() {
        let config = ClientConfig::new(Credentials::new("3412345", "", "secret"));
        let result = ClickatellClient::with_transport(config, ScriptedTransport::default());
        assert!(matches!(result, Err(ClickatellError::Config(_))));
    }

    #[test]
    fn test_client_exposes_configuration() {
        let mut config = config();
        config.from = Some("Acme".to_string());
        let client = ClickatellClient::with_transport(config, ScriptedTransport::default()).unwrap();

        assert_eq!(client.api_id(), "3412345");
        assert_eq!(client.from(), Some("Acme"));
    }
}

#[cfg(test)]
mod retry_tests {
    use super::*;

    #[tokio::test]
    async fn test_send_returns_message_id() {
        let mut client = client(vec!["OK: session-1", "ID: 12345"]);

        let id = client.send("27999000001", "Hello").await.unwrap();
        assert_eq!(id, "12345");

        let requests = client.transport().requests();
        assert_eq!(requests[1].path, "/http/sendmsg");
        assert_eq!(requests[1].param("to"), Some("27999000001"));
        assert_eq!(requests[1].param("text"), Some("Hello"));
        assert_eq!(requests[1].param("from"), None);
        assert_eq!(requests[1].param("deliv_ack"), None);
    }

    #[tokio::test]
    async fn test_send_to_several_recipients_keeps_every_id() {
        let mut client = client(vec!["OK: session-1", "ID: aaa To: 1\nID: bbb To: 2"]);

        let err = client.send("1,2", "Hello").await.unwrap_err();
        assert!(matches!(err, ClickatellError::InvalidData(_)));
        assert!(err.to_string().contains("aaa to 1"));
        assert!(err.to_string().contains("bbb to 2"));
    }

    #[tokio::test]
    async fn test_session_error_triggers_single_reauthentication() {
        let mut client = client(vec![
            "OK: session-1",
            "ERR: 001, Authentication failed",
            "OK: session-2",
            "ID: 12345",
        ]);

        let id = client.send("27999000001", "Hello").await.unwrap();
        assert_eq!(id, "12345");

        let transport = client.transport();
        assert_eq!(transport.count("/http/auth"), 2);
        assert_eq!(transport.count("/http/sendmsg"), 2);

        // The retry carries the renewed session
        let requests = transport.requests();
        assert_eq!(requests[1].param("session_id"), Some("session-1"));
        assert_eq!(requests[3].param("session_id"), Some("session-2"));
        assert_eq!(client.session_id(), Some("session-2"));
    }

    #[tokio::test]
    async fn test_repeated_session_error_propagates_after_one_retry() {
        let mut client = client(vec![
            "OK: session-1",
            "ERR: 001, Authentication failed",
            "OK: session-2",
            "ERR: 001, Authentication failed",
        ]);

        let err = client.send("27999000001", "Hello").await.unwrap_err();
        assert_eq!(err.code(), Some("001"));

        let transport = client.transport();
        assert_eq!(transport.count("/http/auth"), 2);
        assert_eq!(transport.count("/http/sendmsg"), 2);
    }

    #[tokio::test]
    async fn test_expired_and_missing_session_are_retried() {
        for code in ["ERR: 003, Session ID expired", "ERR: 005, Missing session ID"] {
            let mut client = client(vec!["OK: s1", code, "OK: s2", "ID: 99"]);
            assert_eq!(client.send("1", "x").await.unwrap(), "99");
        }
    }

    #[tokio::test]
    async fn test_other_failures_propagate_without_retry() {
        let mut client = client(vec!["OK: session-1", "ERR: 301, No credit left"]);

        let err = client.send("27999000001", "Hello").await.unwrap_err();
        match &err {
            ClickatellError::Gateway { code, message } => {
                assert_eq!(code, "301");
                assert_eq!(message, "No credit left");
            }
            other => panic!("Expected gateway error, got {other:?}"),
        }

        let transport = client.transport();
        assert_eq!(transport.count("/http/auth"), 1);
        assert_eq!(transport.count("/http/sendmsg"), 1);
    }

    #[tokio::test]
    async fn test_unexpected_result_propagates_with_sentinel_code() {
        let mut client = client(vec!["OK: session-1", "Service temporarily unavailable"]);

        let err = client.send("27999000001", "Hello").await.unwrap_err();
        assert_eq!(err.code(), Some("6660"));
        assert_eq!(client.transport().count("/http/sendmsg"), 1);
    }

    #[tokio::test]
    async fn test_failed_reauthentication_propagates() {
        let mut client = client(vec![
            "OK: session-1",
            "ERR: 003, Session ID expired",
            "ERR: 002, Unknown username or password",
        ]);

        let err = client.send("27999000001", "Hello").await.unwrap_err();
        assert_eq!(err.code(), Some("002"));
        assert_eq!(client.transport().count("/http/sendmsg"), 1);
    }

    #[tokio::test]
    async fn test_each_call_gets_its_own_retry() {
        let mut client = client(vec![
            "OK: s1",
            "ERR: 003, Session ID expired",
            "OK: s2",
            "ID: first",
            "ERR: 003, Session ID expired",
            "OK: s3",
            "ID: second",
        ]);

        assert_eq!(client.send("1", "a").await.unwrap(), "first");
        assert_eq!(client.send("1", "b").await.unwrap(), "second");
        assert_eq!(client.transport().count("/http/auth"), 3);
    }

    #[tokio::test]
    async fn test_send_includes_optional_delivery_flags() {
        let mut config = config();
        config.from = Some("27820000000".to_string());
        config.callback = Some("3".to_string());
        let transport = ScriptedTransport::new(["OK: s1", "ID: 1"]);
        let mut client = ClickatellClient::with_transport(config, transport).unwrap();

        client.send("27999000001", "Hello").await.unwrap();

        let request = &client.transport().requests()[1];
        assert_eq!(request.param("from"), Some("27820000000"));
        assert_eq!(request.param("mo"), Some("1"));
        assert_eq!(request.param("callback"), Some("3"));
        assert_eq!(request.param("deliv_ack"), Some("1"));
    }

    #[tokio::test]
    async fn test_query_decodes_status() {
        let mut client = client(vec!["OK: s1", "ID: a1b2c3 Status: 003"]);

        let report = client.query("a1b2c3").await.unwrap();
        assert_eq!(report.message_id, "a1b2c3");
        assert_eq!(report.raw_status, "003");
        assert_eq!(report.status, Some(MessageStatus::DeliveredToGateway));

        let request = &client.transport().requests()[1];
        assert_eq!(request.path, "/http/querymsg");
        assert_eq!(request.param("apimsgid"), Some("a1b2c3"));
    }
}

#[cfg(test)]
mod batch_tests {
    use super::*;

    #[tokio::test]
    async fn test_start_batch_carries_template_and_flags() {
        let mut config = config();
        config.from = Some("Acme".to_string());
        let transport = ScriptedTransport::new(["OK: s1", "ID: batch-7"]);
        let mut client = ClickatellClient::with_transport(config, transport).unwrap();

        let batch_id = client.start_batch("Hi #field1#").await.unwrap();
        assert_eq!(batch_id, "batch-7");

        let request = &client.transport().requests()[1];
        assert_eq!(request.path, "/http_batch/startbatch");
        assert_eq!(request.param("template"), Some("Hi #field1#"));
        assert_eq!(request.param("from"), Some("Acme"));
        assert_eq!(request.param("mo"), Some("1"));
    }

    #[tokio::test]
    async fn test_send_item_merges_fields_and_joins_recipients() {
        let mut client = client(vec![
            "OK: s1",
            "ID: aaa To: 2799900001\nID: bbb To: 2799900002",
        ]);

        let fields = TemplateFields::positional(["Alice", "Tuesday"]);
        let reply = client
            .send_item("batch-7", &["2799900001", "2799900002"], &fields)
            .await
            .unwrap();

        assert_eq!(reply.ids(), vec!["aaa", "bbb"]);
        match reply {
            Reply::Multiple(items) => {
                assert_eq!(items[0].to, "2799900001");
                assert_eq!(items[1].to, "2799900002");
            }
            other => panic!("Expected multiple ids, got {other:?}"),
        }

        let request = &client.transport().requests()[1];
        assert_eq!(request.path, "/http_batch/senditem");
        assert_eq!(request.param("batch_id"), Some("batch-7"));
        assert_eq!(request.param("to"), Some("2799900001,2799900002"));
        assert_eq!(request.param("field1"), Some("Alice"));
        assert_eq!(request.param("field2"), Some("Tuesday"));
    }

    #[tokio::test]
    async fn test_send_item_reports_rejected_recipient() {
        let mut client = client(vec![
            "OK: s1",
            "ID: aaa To: 2799900001\nERR: 105, Invalid destination address To: 2799900002",
        ]);

        let reply = client
            .send_item("b", &["2799900001", "2799900002"], &TemplateFields::new())
            .await
            .unwrap();

        assert_eq!(reply.len(), 2);
        assert_eq!(reply.ids(), vec!["aaa"]);

        let failures = reply.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].to, "2799900002");
        assert_eq!(
            failures[0].outcome,
            ItemOutcome::Rejected {
                code: "105".to_string(),
                message: "Invalid destination address".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_quick_send_has_no_fields() {
        let mut client = client(vec!["OK: s1", "ID: aaa To: 2799900001"]);

        let reply = client
            .quick_send("batch-7", &vec!["2799900001".to_string()])
            .await
            .unwrap();
        assert_eq!(reply, Reply::Single("aaa".to_string()));

        let request = &client.transport().requests()[1];
        assert_eq!(request.path, "/http_batch/quicksend");
        assert_eq!(request.params.len(), 3);
    }

    #[tokio::test]
    async fn test_empty_recipients_rejected_before_request() {
        let mut client = client(vec!["OK: s1"]);
        let none: [&str; 0] = [];

        let err = client.quick_send("batch-7", &none).await.unwrap_err();
        assert!(matches!(err, ClickatellError::InvalidData(_)));
        assert!(client.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_end_batch() {
        let mut client = client(vec!["OK: s1", "OK:"]);

        assert!(client.end_batch("batch-7").await.unwrap());

        let request = &client.transport().requests()[1];
        assert_eq!(request.path, "/http_batch/endbatch");
        assert_eq!(request.param("batch_id"), Some("batch-7"));
    }

    #[tokio::test]
    async fn test_send_bulk_composes_batch_calls() {
        let mut client = client(vec![
            "OK: s1",
            "ID: batch-9",
            "ID: aaa To: 2799900001\nID: bbb To: 2799900002",
            "OK:",
        ]);

        let fields = TemplateFields::new().with("field1", "Friday");
        let done = client
            .send_bulk(&["2799900001", "2799900002"], "Ships #field1#", &fields)
            .await
            .unwrap();
        assert!(done);

        let requests = client.transport().requests();
        let paths: Vec<_> = requests.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "/http/auth",
                "/http_batch/startbatch",
                "/http_batch/senditem",
                "/http_batch/endbatch",
            ]
        );
        assert_eq!(requests[2].param("batch_id"), Some("batch-9"));
        assert_eq!(requests[2].param("field1"), Some("Friday"));
        assert_eq!(requests[3].param("batch_id"), Some("batch-9"));
    }

    #[tokio::test]
    async fn test_send_bulk_reports_partial_rejection() {
        let mut client = client(vec![
            "OK: s1",
            "ID: batch-9",
            "ID: aaa To: 2799900001\nERR: 105, Invalid destination address To: 2799900002",
            "OK:",
        ]);

        let done = client
            .send_bulk(&["2799900001", "2799900002"], "Hello", &TemplateFields::new())
            .await
            .unwrap();
        assert!(!done);
        assert_eq!(client.transport().count("/http_batch/endbatch"), 1);
    }

    #[tokio::test]
    async fn test_send_bulk_leaves_batch_open_on_item_failure() {
        let mut client = client(vec![
            "OK: s1",
            "ID: batch-9",
            "ERR: 105, Invalid destination address",
        ]);

        let err = client
            .send_bulk(&["bogus"], "Hello", &TemplateFields::new())
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some("105"));
        assert_eq!(client.transport().count("/http_batch/endbatch"), 0);
    }
}

#[cfg(test)]
mod keep_alive_tests {
    use super::*;
    use std::time::Duration;

    fn keep_alive_client(bodies: Vec<&'static str>) -> ClickatellClient<ScriptedTransport> {
        let mut config = config();
        config.keep_alive = KeepAliveConfig::new(Duration::ZERO).with_max_failures(2);
        ClickatellClient::with_transport(config, ScriptedTransport::new(bodies)).unwrap()
    }

    #[tokio::test]
    async fn test_no_ping_before_authentication() {
        let mut client = keep_alive_client(vec![]);
        assert!(!client.maintain_keep_alive().await.unwrap());
        assert!(client.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_idle_session_is_pinged() {
        let mut client = keep_alive_client(vec!["OK: s1", "OK:"]);
        client.authenticate(false).await.unwrap();

        assert!(client.maintain_keep_alive().await.unwrap());
        assert_eq!(client.transport().count("/http/ping"), 1);

        let status = client.keep_alive_status();
        assert_eq!(status.total_pings, 1);
        assert_eq!(status.total_pongs, 1);
    }

    #[tokio::test]
    async fn test_failed_pings_mark_session_failed() {
        let mut client = keep_alive_client(vec![
            "OK: s1",
            "ERR: 004, Account frozen",
            "ERR: 004, Account frozen",
        ]);
        client.authenticate(false).await.unwrap();

        client.maintain_keep_alive().await.unwrap();
        client.maintain_keep_alive().await.unwrap();
        assert!(client.is_keep_alive_failed());

        // No further pings once the limit is reached
        assert!(!client.maintain_keep_alive().await.unwrap());
        assert_eq!(client.transport().count("/http/ping"), 2);
    }

    #[tokio::test]
    async fn test_keep_alive_ping_renews_expired_session() {
        let mut client = keep_alive_client(vec![
            "OK: s1",
            "ERR: 003, Session ID expired",
            "OK: s2",
            "OK:",
        ]);
        client.authenticate(false).await.unwrap();

        assert!(client.maintain_keep_alive().await.unwrap());
        assert_eq!(client.session_id(), Some("s2"));
        assert!(!client.is_keep_alive_failed());

        let transport = client.transport();
        assert_eq!(transport.count("/http/auth"), 2);
        assert_eq!(transport.count("/http/ping"), 2);
        assert_eq!(transport.requests()[3].param("session_id"), Some("s2"));
    }

    #[tokio::test]
    async fn test_shared_client_serialises_callers() {
        let transport = ScriptedTransport::new(["OK: s1", "ID: one", "ID: two"]);
        let shared = SharedClient::new(ClickatellClient::with_transport(config(), transport).unwrap());
        let other = shared.clone();

        let (first, second) = tokio::join!(
            async { shared.lock().await.send("1", "a").await },
            async { other.lock().await.send("2", "b").await },
        );

        let mut ids = vec![first.unwrap(), second.unwrap()];
        ids.sort();
        assert_eq!(ids, vec!["one", "two"]);
        assert_eq!(shared.lock().await.transport().count("/http/auth"), 1);
    }
}
