//! Command tree construction: root -> namespace group -> leaf.
//!
//! This is the single seam with clap. Groups and leaves are registered with
//! the builder API on top of whatever root the caller hands in (the derive
//! based global options plus any built-in subcommands). Collisions are
//! surfaced as `ConfigError` before the tree is ever parsed.

use std::collections::{BTreeMap, HashMap, HashSet};

use clap::{Arg, ArgMatches, Command};
use serde::Serialize;

use super::descriptor::EndpointDescriptor;
use super::group::CommandGroup;
use super::naming::{self, CommandName};
use crate::error::ConfigError;

/// Flag values the user actually supplied for the selected leaf.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResolvedParams(BTreeMap<String, String>);

impl ResolvedParams {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for ResolvedParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A built clap tree plus the routing table back to descriptors.
#[derive(Debug)]
pub struct CommandTree<'a> {
    command: Command,
    routes: HashMap<(String, String), &'a EndpointDescriptor>,
}

impl<'a> CommandTree<'a> {
    pub fn command_mut(&mut self) -> &mut Command {
        &mut self.command
    }

    /// Number of leaf commands registered.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Map parsed matches back to the selected descriptor.
    ///
    /// `None` when the selected subcommand is not a generated group/leaf.
    pub fn resolve(
        &self,
        matches: &ArgMatches,
    ) -> Option<(&'a EndpointDescriptor, ResolvedParams)> {
        let (group, group_matches) = matches.subcommand()?;
        let (leaf, leaf_matches) = group_matches.subcommand()?;
        let descriptor = *self.routes.get(&(group.to_string(), leaf.to_string()))?;
        let params = descriptor
            .parameters()
            .iter()
            .filter_map(|p| {
                leaf_matches
                    .get_one::<String>(&p.flag_name)
                    .map(|v| (p.flag_name.clone(), v.clone()))
            })
            .collect();
        Some((descriptor, params))
    }
}

/// Attach one subcommand group per `CommandGroup` and one leaf per member.
pub fn build<'a>(
    root: Command,
    groups: &[CommandGroup<'a>],
) -> Result<CommandTree<'a>, ConfigError> {
    let builtins: HashSet<String> = root
        .get_subcommands()
        .map(|c| c.get_name().to_string())
        .collect();
    let root_flags = reserved_flags(&root);

    let mut derived: HashMap<CommandName, &'a EndpointDescriptor> = HashMap::new();
    let mut routes = HashMap::new();
    let mut command = root;

    for group in groups {
        if builtins.contains(group.name) {
            return Err(ConfigError::ReservedName {
                name: group.name.to_string(),
            });
        }

        let mut group_cmd = Command::new(group.name.to_string())
            .about(format!("'{}' endpoints", group.name))
            .subcommand_required(true)
            .arg_required_else_help(true)
            .disable_help_subcommand(true);
        let mut leaves: HashMap<String, &'a EndpointDescriptor> = HashMap::new();

        for &descriptor in &group.members {
            let name = descriptor.command_name();
            if let Some(prev) = derived.insert(name.clone(), descriptor) {
                return Err(duplicate(name.as_str(), prev, descriptor));
            }

            let leaf = naming::leaf_name(group.name, &name);
            if let Some(prev) = leaves.insert(leaf.clone(), descriptor) {
                return Err(duplicate(&format!("{} {leaf}", group.name), prev, descriptor));
            }

            let leaf_cmd = leaf_command(&leaf, &name, descriptor, &root_flags)?;
            group_cmd = group_cmd.subcommand(leaf_cmd);
            routes.insert((group.name.to_string(), leaf), descriptor);
        }

        command = command.subcommand(group_cmd);
    }

    tracing::trace!(groups = groups.len(), leaves = routes.len(), "command tree built");
    Ok(CommandTree { command, routes })
}

fn leaf_command(
    leaf: &str,
    name: &CommandName,
    descriptor: &EndpointDescriptor,
    root_flags: &HashSet<String>,
) -> Result<Command, ConfigError> {
    let mut cmd = Command::new(leaf.to_string());
    if let Some(help) = descriptor.help_text() {
        cmd = cmd.about(help.to_string());
    }

    let mut seen = HashSet::new();
    for p in descriptor.parameters() {
        let reason = if p.flag_name.is_empty() {
            Some("flag name is empty")
        } else if p.flag_name.starts_with('-') || p.flag_name.contains(char::is_whitespace) {
            Some("flag name must be a bare word")
        } else if root_flags.contains(&p.flag_name) {
            Some("shadows a global option")
        } else if !seen.insert(p.flag_name.as_str()) {
            Some("declared more than once")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(ConfigError::InvalidParameter {
                command: name.to_string(),
                flag: p.flag_name.clone(),
                reason: reason.to_string(),
            });
        }

        let mut arg = Arg::new(p.flag_name.clone())
            .long(p.flag_name.clone())
            .value_name("VALUE")
            .required(p.required);
        if let Some(help) = &p.help {
            arg = arg.help(help.clone());
        }
        cmd = cmd.arg(arg);
    }
    Ok(cmd)
}

/// Ids and long names already claimed on the root, plus clap's own.
fn reserved_flags(root: &Command) -> HashSet<String> {
    let mut out: HashSet<String> = ["help", "version"].iter().map(|s| s.to_string()).collect();
    for arg in root.get_arguments() {
        out.insert(arg.get_id().as_str().to_string());
        if let Some(long) = arg.get_long() {
            out.insert(long.to_string());
        }
    }
    out
}

fn duplicate(name: &str, first: &EndpointDescriptor, second: &EndpointDescriptor) -> ConfigError {
    ConfigError::DuplicateCommand {
        name: name.to_string(),
        first: first.url_path(),
        second: second.url_path(),
    }
}
