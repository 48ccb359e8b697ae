/*!
Descriptor-driven command registry.

  descriptor.rs  EndpointDescriptor / ParameterSpec / Strategy
  naming.rs      (namespace, path) -> CommandName, leaf names
  group.rs       descriptors -> CommandGroup per namespace
  tree.rs        groups -> clap Command tree + routing table

Flow: descriptors -> group() -> build(root, groups) -> CommandTree,
then CommandTree::resolve(matches) -> (descriptor, params) at dispatch time.
*/

pub mod descriptor;
pub mod group;
pub mod naming;
pub mod tree;

pub use descriptor::{EndpointDescriptor, ParameterSpec, Strategy};
pub use group::{CommandGroup, group};
pub use tree::{ResolvedParams, build};
