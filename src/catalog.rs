//! Built-in endpoint descriptors.
//!
//! Static stand-in for schema discovery (e.g. reading the node's Swagger
//! document). Anything producing an ordered `Vec<EndpointDescriptor>` can
//! replace `builtin` without touching the registry.

use crate::error::ConfigError;
use crate::registry::{EndpointDescriptor, ParameterSpec};

pub fn builtin() -> Result<Vec<EndpointDescriptor>, ConfigError> {
    Ok(vec![
        EndpointDescriptor::new("config")?
            .param(
                ParameterSpec::new("id")
                    .required()
                    .help("ID of config to return"),
            )
            .help("Return a config value"),
        EndpointDescriptor::with_path("gossiper", "/endpoint/down/")?
            .help("Get the addresses of the down endpoints"),
        EndpointDescriptor::with_path("gossiper", "/endpoint/live/")?
            .help("Get the addresses of live endpoints"),
        EndpointDescriptor::with_path("system", "/uptime_ms")?
            .help("Get system uptime, in milliseconds")
            .call_remote(),
    ])
}
