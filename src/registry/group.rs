//! Partition descriptors into one command group per namespace.

use std::collections::HashMap;

use super::descriptor::EndpointDescriptor;

/// Descriptors sharing one namespace. `name` equals every member's namespace.
#[derive(Debug, Clone)]
pub struct CommandGroup<'a> {
    pub name: &'a str,
    pub members: Vec<&'a EndpointDescriptor>,
}

/// Group by exact namespace equality, groups in first-seen order.
pub fn group(descriptors: &[EndpointDescriptor]) -> Vec<CommandGroup<'_>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<CommandGroup<'_>> = Vec::new();
    for d in descriptors {
        let slot = *index.entry(d.namespace()).or_insert_with(|| {
            groups.push(CommandGroup {
                name: d.namespace(),
                members: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].members.push(d);
    }
    groups
}
