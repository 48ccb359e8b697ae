/*!
Command handlers.

  call.rs    run the selected endpoint leaf (generated commands)
  list.rs    `list` built-in: print the generated commands
  format.rs  color / table helpers for human output

Each handler exposes one `execute_*` function returning `anyhow::Result`
and writes to a caller-supplied `Write` so tests can capture output.
*/

pub mod call;
pub mod format;
pub mod list;

pub use call::{OutputOpts, execute_call};
pub use list::execute_list;
