/*!
`call.rs`

Runs the leaf command the user selected: announce, invoke, render.

Human output (CallRemote):

  Sending request to: http://localhost:10000/system/uptime_ms
  Status: 0 (200 OK)
  API response: 123456

`Status` keeps the legacy 0 = ok / 1 = failed convention; the HTTP code (or
"transport error") follows in parentheses. Describe-only endpoints print
`Calling: <command-name>`.

JSON output (single object, no announcement line):

{
  "status": "ok" | "failed" | "described",
  "command": "system--uptime_ms",
  "url": "http://...",
  "code": 200,
  "body": "...",
  "params": { "id": "..." }
}

The process exits 0 in every case above; the remote result is reported only
through this output.
*/

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;

use crate::api::{Invoker, Outcome};
use crate::cmd::format::{Role, StyleOptions, color};
use crate::registry::{EndpointDescriptor, ResolvedParams};

/// How results are written.
#[derive(Debug, Clone)]
pub struct OutputOpts {
    pub json: bool,
    pub style: StyleOptions,
}

impl OutputOpts {
    /// JSON output never carries ANSI codes, whatever the terminal says.
    pub fn new(json: bool) -> Self {
        let style = if json {
            StyleOptions::plain()
        } else {
            StyleOptions::detect()
        };
        Self { json, style }
    }
}

/* -------------------------------------------------------------------------- */
/* Public Entry Point                                                         */
/* -------------------------------------------------------------------------- */

pub fn execute_call(
    invoker: &Invoker,
    descriptor: &EndpointDescriptor,
    params: &ResolvedParams,
    out: &mut impl Write,
    opts: &OutputOpts,
) -> Result<Outcome> {
    let command = descriptor.command_name();
    if !params.is_empty() {
        // Declared flags are validated by clap but not sent with the request yet.
        for (flag, value) in params.iter() {
            tracing::debug!(%command, flag, value, "parameter accepted, not forwarded");
        }
    }

    if !opts.json
        && let Some(url) = invoker.target_url(descriptor)
    {
        writeln!(out, "Sending request to: {url}").context("Failed to write output")?;
        out.flush().context("Failed to write output")?;
    }

    let outcome = invoker.invoke(descriptor);
    if outcome.is_failed() {
        tracing::info!(%command, url = outcome.url().unwrap_or_default(), "remote call failed");
    }

    if opts.json {
        write_json(out, descriptor, params, &outcome)?;
    } else {
        write_human(out, &outcome, &opts.style)?;
    }
    Ok(outcome)
}

/* -------------------------------------------------------------------------- */
/* Human Output                                                               */
/* -------------------------------------------------------------------------- */

fn write_human(out: &mut impl Write, outcome: &Outcome, style: &StyleOptions) -> Result<()> {
    match outcome {
        Outcome::Described { command } => {
            writeln!(
                out,
                "{}{}",
                color(Role::Primary, "Calling: ", style),
                color(Role::Accent, command.as_str(), style)
            )?;
        }
        Outcome::Ok { status, body, .. } => {
            writeln!(
                out,
                "{}",
                color(Role::Success, format!("Status: 0 ({})", describe_status(*status)), style)
            )?;
            writeln!(out, "{}", color(Role::Success, format!("API response: {body}"), style))?;
        }
        Outcome::Failed {
            status: Some(status),
            body,
            ..
        } => {
            writeln!(
                out,
                "{}",
                color(Role::Error, format!("Status: 1 ({})", describe_status(*status)), style)
            )?;
            writeln!(out, "{}", color(Role::Success, format!("API response: {body}"), style))?;
        }
        Outcome::Failed {
            status: None, body, ..
        } => {
            writeln!(out, "{}", color(Role::Error, "Status: 1 (transport error)", style))?;
            writeln!(out, "{}", color(Role::Error, format!("Error: {body}"), style))?;
        }
    }
    Ok(())
}

fn describe_status(code: u16) -> String {
    match reqwest::StatusCode::from_u16(code)
        .ok()
        .and_then(|s| s.canonical_reason())
    {
        Some(reason) => format!("{code} {reason}"),
        None => code.to_string(),
    }
}

/* -------------------------------------------------------------------------- */
/* JSON Output                                                                */
/* -------------------------------------------------------------------------- */

#[derive(Serialize)]
struct Report<'a> {
    status: &'static str,
    command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<&'a str>,
    #[serde(skip_serializing_if = "no_params")]
    params: &'a ResolvedParams,
}

fn no_params(p: &&ResolvedParams) -> bool {
    p.is_empty()
}

fn write_json(
    out: &mut impl Write,
    descriptor: &EndpointDescriptor,
    params: &ResolvedParams,
    outcome: &Outcome,
) -> Result<()> {
    let (status, code, body) = match outcome {
        Outcome::Described { .. } => ("described", None, None),
        Outcome::Ok { status, body, .. } => ("ok", Some(*status), Some(body.as_str())),
        Outcome::Failed { status, body, .. } => ("failed", *status, Some(body.as_str())),
    };
    let report = Report {
        status,
        command: descriptor.command_name().to_string(),
        url: outcome.url(),
        code,
        body,
        params,
    };
    let text = serde_json::to_string_pretty(&report).context("Failed to serialize result")?;
    writeln!(out, "{text}")?;
    Ok(())
}

/* -------------------------------------------------------------------------- */
/* Tests                                                                      */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RootConfig;
    use crate::api::testing::{closed_port, serve_once};

    fn plain() -> OutputOpts {
        OutputOpts {
            json: false,
            style: StyleOptions::plain(),
        }
    }

    fn json() -> OutputOpts {
        OutputOpts::new(true)
    }

    fn invoker(port: u16) -> Invoker {
        Invoker::new(RootConfig::new("127.0.0.1", port.to_string()).unwrap()).unwrap()
    }

    fn run(invoker: &Invoker, d: &EndpointDescriptor, opts: &OutputOpts) -> (Outcome, String) {
        let mut buf = Vec::new();
        let outcome = execute_call(invoker, d, &ResolvedParams::default(), &mut buf, opts).unwrap();
        (outcome, String::from_utf8(buf).unwrap())
    }

    #[test]
    fn describe_prints_command_name() {
        let d = EndpointDescriptor::with_path("gossiper", "/endpoint/down/").unwrap();
        let (_, text) = run(&invoker(closed_port()), &d, &plain());
        assert_eq!(text, "Calling: gossiper--endpoint-down\n");
    }

    #[test]
    fn remote_success_renders_status_and_body() {
        let (port, server) = serve_once("200 OK", "4242");
        let d = EndpointDescriptor::with_path("system", "/uptime_ms")
            .unwrap()
            .call_remote();
        let (outcome, text) = run(&invoker(port), &d, &plain());
        server.join().unwrap();
        assert!(!outcome.is_failed());
        let announce = format!("Sending request to: http://127.0.0.1:{port}/system/uptime_ms");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![announce.as_str(), "Status: 0 (200 OK)", "API response: 4242"]
        );
    }

    #[test]
    fn server_error_renders_failed() {
        let (port, server) = serve_once("500 Internal Server Error", "boom");
        let d = EndpointDescriptor::with_path("system", "/uptime_ms")
            .unwrap()
            .call_remote();
        let (outcome, text) = run(&invoker(port), &d, &plain());
        server.join().unwrap();
        assert!(outcome.is_failed());
        assert!(text.contains("Status: 1 (500 Internal Server Error)"));
        assert!(text.contains("API response: boom"));
    }

    #[test]
    fn transport_error_returns_normally() {
        let d = EndpointDescriptor::with_path("system", "/uptime_ms")
            .unwrap()
            .call_remote();
        let (outcome, text) = run(&invoker(closed_port()), &d, &plain());
        assert!(outcome.is_failed());
        assert!(text.contains("Status: 1 (transport error)"));
        assert!(text.contains("Error: "));
    }

    #[test]
    fn json_report_shape() {
        let (port, server) = serve_once("200 OK", "17");
        let d = EndpointDescriptor::with_path("system", "/uptime_ms")
            .unwrap()
            .call_remote();
        let (_, text) = run(&invoker(port), &d, &json());
        server.join().unwrap();
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["status"], "ok");
        assert_eq!(v["command"], "system--uptime_ms");
        assert_eq!(v["code"], 200);
        assert_eq!(v["body"], "17");
        assert!(v.get("params").is_none());
    }

    #[test]
    fn json_describe_includes_params() {
        let d = EndpointDescriptor::new("config").unwrap();
        let params: ResolvedParams = [("id".to_string(), "9".to_string())].into_iter().collect();
        let mut buf = Vec::new();
        execute_call(&invoker(closed_port()), &d, &params, &mut buf, &json()).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(v["status"], "described");
        assert_eq!(v["command"], "config-");
        assert_eq!(v["params"]["id"], "9");
        assert!(v.get("url").is_none());
    }

    #[test]
    fn json_mode_is_never_colored() {
        let opts = OutputOpts::new(true);
        assert!(opts.json);
        assert!(!opts.style.use_color);
        assert!(!OutputOpts::new(false).json);
    }
}
