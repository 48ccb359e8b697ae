/*!
`list` - print every generated endpoint command.

  scylla-cli list           table: GROUP COMMAND MODE PATH PARAMS HELP
  scylla-cli list --json    JSON array, one object per descriptor

Rows follow group order (first-seen namespace), then declaration order.
Required parameters are marked with a trailing `*` in the table.
*/

use anyhow::{Context, Result};
use clap::Command;
use serde::Serialize;
use std::io::Write;

use super::call::OutputOpts;
use crate::cmd::format::{Role, color, table};
use crate::registry::naming::leaf_name;
use crate::registry::{CommandGroup, ParameterSpec, Strategy};

pub const NAME: &str = "list";

pub fn command() -> Command {
    Command::new(NAME).about("List the endpoint commands generated from the catalog")
}

#[derive(Serialize)]
struct Entry<'a> {
    group: &'a str,
    command: String,
    name: String,
    path: String,
    strategy: Strategy,
    parameters: &'a [ParameterSpec],
    #[serde(skip_serializing_if = "Option::is_none")]
    help: Option<&'a str>,
}

fn entries<'a>(groups: &'a [CommandGroup<'a>]) -> Vec<Entry<'a>> {
    groups
        .iter()
        .flat_map(|g| {
            g.members.iter().map(move |&d| {
                let name = d.command_name();
                Entry {
                    group: g.name,
                    command: leaf_name(g.name, &name),
                    name: name.to_string(),
                    path: format!("/{}", d.url_path()),
                    strategy: d.strategy(),
                    parameters: d.parameters(),
                    help: d.help_text(),
                }
            })
        })
        .collect()
}

pub fn execute_list(
    groups: &[CommandGroup<'_>],
    out: &mut impl Write,
    opts: &OutputOpts,
) -> Result<()> {
    let entries = entries(groups);

    if opts.json {
        let text = serde_json::to_string_pretty(&entries).context("Failed to serialize catalog")?;
        writeln!(out, "{text}")?;
        return Ok(());
    }

    if entries.is_empty() {
        writeln!(out, "{}", color(Role::Dim, "No endpoint commands registered", &opts.style))?;
        return Ok(());
    }

    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|e| {
            let mode = match e.strategy {
                Strategy::CallRemote => "call",
                Strategy::Describe => "describe",
            };
            let params = e
                .parameters
                .iter()
                .map(|p| {
                    let star = if p.required { "*" } else { "" };
                    format!("--{}{star}", p.flag_name)
                })
                .collect::<Vec<_>>()
                .join(" ");
            vec![
                e.group.to_string(),
                e.command.clone(),
                mode.to_string(),
                e.path.clone(),
                params,
                e.help.unwrap_or("").to_string(),
            ]
        })
        .collect();

    writeln!(
        out,
        "{}",
        table(
            &["GROUP", "COMMAND", "MODE", "PATH", "PARAMS", "HELP"],
            &rows,
            &opts.style
        )
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::cmd::format::StyleOptions;
    use crate::registry::group;

    fn opts(json: bool) -> OutputOpts {
        OutputOpts {
            json,
            style: StyleOptions {
                use_color: false,
                term_width: 200,
            },
        }
    }

    #[test]
    fn table_lists_every_descriptor() {
        let all = catalog::builtin().unwrap();
        let groups = group(&all);
        let mut buf = Vec::new();
        execute_list(&groups, &mut buf, &opts(false)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2 + all.len());
        let header: Vec<&str> = lines[0].split_whitespace().collect();
        assert_eq!(header, ["GROUP", "COMMAND", "MODE", "PATH", "PARAMS", "HELP"]);
        assert!(lines[2].contains("describe"));
        assert!(lines[2].starts_with("config "));
        assert!(lines[2].contains("--id*"));
        assert!(text.contains("endpoint-down"));
        assert!(text.contains("/gossiper/endpoint/live/"));
        assert!(lines[5].contains("uptime_ms") && lines[5].contains("call"));
    }

    #[test]
    fn json_lists_every_descriptor() {
        let all = catalog::builtin().unwrap();
        let groups = group(&all);
        let mut buf = Vec::new();
        execute_list(&groups, &mut buf, &opts(true)).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        let arr = v.as_array().unwrap();
        assert_eq!(arr.len(), 4);
        assert_eq!(arr[0]["command"], "config");
        assert_eq!(arr[0]["name"], "config-");
        assert_eq!(arr[0]["parameters"][0]["flag_name"], "id");
        assert_eq!(arr[3]["strategy"], "call_remote");
        assert_eq!(arr[3]["path"], "/system/uptime_ms");
    }

    #[test]
    fn empty_catalog() {
        let mut buf = Vec::new();
        execute_list(&[], &mut buf, &opts(false)).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "No endpoint commands registered\n");
    }
}
