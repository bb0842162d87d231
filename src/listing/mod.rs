//! Producers of the recursive tree listing that forms the report body.

use std::path::Path;

use anyhow::Result;

use crate::cli::Backend;

mod native;
mod system;

pub use native::NativeLister;
pub use system::SystemLister;

/// Produces a recursive, annotated text listing of everything under a root.
pub trait TreeLister {
    /// Short human-readable name used in logs.
    fn describe(&self) -> String;

    /// List `root` recursively. The returned text is written to the report verbatim.
    fn list(&self, root: &Path) -> Result<String>;
}

/// Build the lister selected on the command line.
pub fn for_backend(backend: Backend) -> Box<dyn TreeLister> {
    match backend {
        Backend::System => Box::new(SystemLister::host_default()),
        Backend::Native => Box::new(NativeLister),
    }
}
