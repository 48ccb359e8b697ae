//! Endpoint descriptor data model.

use serde::Serialize;

use super::naming::{self, CommandName};
use crate::error::ConfigError;

/// What selecting a leaf command does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Echo the command name only (endpoint not wired yet).
    Describe,
    /// Issue a GET against `namespace + path_suffix`.
    CallRemote,
}

/// A string-valued `--flag` declared by an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterSpec {
    pub flag_name: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl ParameterSpec {
    pub fn new(flag_name: impl Into<String>) -> Self {
        Self {
            flag_name: flag_name.into(),
            required: false,
            help: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// One remote operation.
///
/// `path_suffix` is kept verbatim: leading and trailing slashes are part of
/// the remote route and go into the request path unchanged. Only name
/// derivation ignores trailing slashes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointDescriptor {
    namespace: String,
    path_suffix: String,
    parameters: Vec<ParameterSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    help: Option<String>,
    strategy: Strategy,
}

impl EndpointDescriptor {
    /// Start a `Describe` descriptor with an empty path.
    pub fn new(namespace: impl Into<String>) -> Result<Self, ConfigError> {
        Self::with_path(namespace, "")
    }

    pub fn with_path(
        namespace: impl Into<String>,
        path_suffix: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let namespace = namespace.into();
        let path_suffix = path_suffix.into();
        if namespace.is_empty() {
            return Err(ConfigError::EmptyNamespace { path: path_suffix });
        }
        Ok(Self {
            namespace,
            path_suffix,
            parameters: Vec::new(),
            help: None,
            strategy: Strategy::Describe,
        })
    }

    pub fn param(mut self, param: ParameterSpec) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn call_remote(mut self) -> Self {
        self.strategy = Strategy::CallRemote;
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path_suffix(&self) -> &str {
        &self.path_suffix
    }

    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    pub fn help_text(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Request path relative to the target root (no leading slash added).
    pub fn url_path(&self) -> String {
        format!("{}{}", self.namespace, self.path_suffix())
    }

    pub fn command_name(&self) -> CommandName {
        naming::derive(&self.namespace, self.path_suffix())
    }
}
