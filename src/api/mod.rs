//! Target configuration and the blocking HTTP call behind every leaf.
//!
//! RootConfig -> endpoint_url -> Invoker::invoke -> Outcome
//!
//! `Invoker::invoke` never fails: transport errors and non-2xx replies are
//! folded into `Outcome::Failed` so a dispatched command always returns.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use url::Url;

use crate::error::ConfigError;
use crate::registry::naming::CommandName;
use crate::registry::{EndpointDescriptor, Strategy};

pub const URL_SCHEME: &str = "http://";
pub const DEFAULT_ADDRESS: &str = "localhost";
pub const DEFAULT_PORT: &str = "10000";

/// Target `host:port`, fixed once from the root options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootConfig {
    host: String,
    port: String,
}

impl RootConfig {
    /// Validate and freeze the target. The values are kept as given; the
    /// parsed URL is only used to reject hosts/ports that can't form one.
    pub fn new(host: impl Into<String>, port: impl Into<String>) -> Result<Self, ConfigError> {
        let host = host.into();
        let port = port.into();
        let invalid = |reason: &str| ConfigError::InvalidRoot {
            host: host.clone(),
            port: port.clone(),
            reason: reason.to_string(),
        };

        if host.trim().is_empty() {
            return Err(invalid("host is empty"));
        }
        if port.parse::<u16>().is_err() {
            return Err(invalid("port must be an integer in 0..=65535"));
        }
        let base = Url::parse(&format!("{URL_SCHEME}{host}:{port}/"))
            .map_err(|e| invalid(&e.to_string()))?;
        if base.path() != "/" || base.query().is_some() || base.fragment().is_some() {
            return Err(invalid("host must not contain a path"));
        }

        Ok(Self { host, port })
    }

    /// `http://host:port/`
    pub fn base_url(&self) -> String {
        format!("{URL_SCHEME}{}:{}/", self.host, self.port)
    }
}

/// Full request URL. Slashes in the path suffix are kept as declared.
pub fn endpoint_url(config: &RootConfig, descriptor: &EndpointDescriptor) -> String {
    format!("{}{}", config.base_url(), descriptor.url_path())
}

/// Result of selecting one leaf command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// `Describe` strategy: nothing was sent.
    Described { command: CommandName },
    /// 2xx reply.
    Ok {
        url: String,
        status: u16,
        body: String,
    },
    /// Non-2xx reply (`status` set) or transport failure (`status` is `None`,
    /// `body` carries the error message).
    Failed {
        url: String,
        status: Option<u16>,
        body: String,
    },
}

impl Outcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Outcome::Described { .. } => None,
            Outcome::Ok { url, .. } | Outcome::Failed { url, .. } => Some(url),
        }
    }
}

pub struct Invoker {
    config: RootConfig,
    client: Client,
}

impl Invoker {
    pub fn new(config: RootConfig) -> Result<Self> {
        // node-local REST API: never route through HTTP(S)_PROXY
        let client = Client::builder()
            .no_proxy()
            .build()
            .context("Failed to initialize HTTP client")?;
        Ok(Self { config, client })
    }

    /// URL a `CallRemote` descriptor would hit; `None` for `Describe`.
    pub fn target_url(&self, descriptor: &EndpointDescriptor) -> Option<String> {
        match descriptor.strategy() {
            Strategy::Describe => None,
            Strategy::CallRemote => Some(endpoint_url(&self.config, descriptor)),
        }
    }

    pub fn invoke(&self, descriptor: &EndpointDescriptor) -> Outcome {
        match self.target_url(descriptor) {
            None => Outcome::Described {
                command: descriptor.command_name(),
            },
            Some(url) => self.get(url),
        }
    }

    fn get(&self, url: String) -> Outcome {
        tracing::debug!(%url, "GET");
        let response = match self.client.get(&url).send() {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(%url, error = %e, "transport failure");
                return Outcome::Failed {
                    url,
                    status: None,
                    body: error_chain(&e),
                };
            }
        };

        let status = response.status();
        tracing::debug!(%url, status = status.as_u16(), "response");
        match response.text() {
            Ok(body) if status.is_success() => Outcome::Ok {
                url,
                status: status.as_u16(),
                body,
            },
            Ok(body) => Outcome::Failed {
                url,
                status: Some(status.as_u16()),
                body,
            },
            Err(e) => Outcome::Failed {
                url,
                status: Some(status.as_u16()),
                body: format!("failed to read response body: {}", error_chain(&e)),
            },
        }
    }
}

/// `outer: inner: root` message for an error and its sources.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(s) = source {
        let text = s.to_string();
        if !msg.contains(&text) {
            msg.push_str(": ");
            msg.push_str(&text);
        }
        source = s.source();
    }
    msg
}


#[cfg(test)]
mod tests {
    use super::testing::{closed_port, serve_once};
    use super::*;

    fn remote(ns: &str, path: &str) -> EndpointDescriptor {
        EndpointDescriptor::with_path(ns, path).unwrap().call_remote()
    }

    fn invoker_on(port: u16) -> Invoker {
        Invoker::new(RootConfig::new("127.0.0.1", port.to_string()).unwrap()).unwrap()
    }

    #[test]
    fn url_keeps_suffix_verbatim() {
        let config = RootConfig::new("localhost", "10000").unwrap();
        assert_eq!(
            endpoint_url(&config, &remote("gossiper", "/endpoint/down/")),
            "http://localhost:10000/gossiper/endpoint/down/"
        );
        assert_eq!(
            endpoint_url(&config, &remote("config", "")),
            "http://localhost:10000/config"
        );
        assert_eq!(
            endpoint_url(&config, &remote("a", "//b")),
            "http://localhost:10000/a//b"
        );
    }

    #[test]
    fn default_root() {
        let config = RootConfig::new(DEFAULT_ADDRESS, DEFAULT_PORT).unwrap();
        assert_eq!(config.base_url(), "http://localhost:10000/");
    }

    #[test]
    fn invalid_roots_rejected() {
        let cases = [
            ("", "10000"),
            ("localhost", "http"),
            ("localhost", "70000"),
            ("a b", "1"),
            ("a/b", "1"),
        ];
        for (host, port) in cases {
            let err = RootConfig::new(host, port).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidRoot { .. }), "{host}:{port}");
        }
        assert!(RootConfig::new("10.0.0.1", "80").is_ok());
    }

    #[test]
    fn describe_sends_nothing() {
        let invoker = invoker_on(closed_port());
        let d = EndpointDescriptor::with_path("gossiper", "/endpoint/down/").unwrap();
        assert_eq!(invoker.target_url(&d), None);
        match invoker.invoke(&d) {
            Outcome::Described { command } => {
                assert_eq!(command.as_str(), "gossiper--endpoint-down")
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn success_is_ok() {
        let (port, server) = serve_once("200 OK", "123456");
        let invoker = invoker_on(port);
        let outcome = invoker.invoke(&remote("system", "/uptime_ms"));
        assert_eq!(server.join().unwrap(), "GET /system/uptime_ms HTTP/1.1");
        assert_eq!(
            outcome,
            Outcome::Ok {
                url: format!("http://127.0.0.1:{port}/system/uptime_ms"),
                status: 200,
                body: "123456".into(),
            }
        );
    }

    #[test]
    fn trailing_slash_reaches_server() {
        let (port, server) = serve_once("200 OK", "[]");
        let invoker = invoker_on(port);
        let outcome = invoker.invoke(&remote("gossiper", "/endpoint/live/"));
        assert!(!outcome.is_failed());
        assert_eq!(
            server.join().unwrap(),
            "GET /gossiper/endpoint/live/ HTTP/1.1"
        );
    }

    #[test]
    fn non_2xx_is_failed_with_body() {
        let (port, server) = serve_once("404 Not Found", "{\"message\":\"nope\"}");
        let invoker = invoker_on(port);
        let outcome = invoker.invoke(&remote("system", "/missing"));
        server.join().unwrap();
        match outcome {
            Outcome::Failed { status, body, .. } => {
                assert_eq!(status, Some(404));
                assert_eq!(body, "{\"message\":\"nope\"}");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn two_descriptor_scenario_issues_one_get() {
        use crate::registry::{build, group};

        let all = vec![
            remote("system", "/uptime_ms"),
            remote("gossiper", "/endpoint/live/"),
        ];
        let groups = group(&all);
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|g| g.members.len() == 1));

        let root = clap::Command::new("scylla-cli").subcommand_required(true);
        let mut tree = build(root, &groups).unwrap();
        let m = tree
            .command_mut()
            .try_get_matches_from_mut(["scylla-cli", "system", "uptime_ms"])
            .unwrap();
        let (descriptor, _) = tree.resolve(&m).unwrap();

        let (port, server) = serve_once("200 OK", "1");
        let invoker = invoker_on(port);
        assert!(!invoker.invoke(descriptor).is_failed());
        assert_eq!(server.join().unwrap(), "GET /system/uptime_ms HTTP/1.1");
    }

    #[test]
    fn connection_refused_is_failed_not_error() {
        let port = closed_port();
        let invoker = invoker_on(port);
        let outcome = invoker.invoke(&remote("system", "/uptime_ms"));
        match outcome {
            Outcome::Failed { url, status, body } => {
                assert_eq!(url, format!("http://127.0.0.1:{port}/system/uptime_ms"));
                assert_eq!(status, None);
                assert!(!body.is_empty());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
