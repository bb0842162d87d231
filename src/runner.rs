use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use camino::Utf8Path;
use tracing::{debug, info};

use crate::cli::{Backend, Cli};
use crate::clock::SystemClock;
use crate::listing;
use crate::report::{DEFAULT_OUTPUT, ReportGenerator, ReportSummary};

pub fn run(cli: Cli) -> Result<()> {
    let ctx = CliContext::from(&cli);
    ctx.apply_chdir()?;

    let root = std::env::current_dir().context("resolving current directory")?;
    let summary = generate(&root, ctx.backend, &mut io::stdout().lock())?;
    info!(
        path = %summary.path,
        generated_at = %summary.generated_at,
        body_bytes = summary.body_bytes,
        "tree report complete"
    );
    Ok(())
}

fn generate(root: &Path, backend: Backend, console: &mut dyn io::Write) -> Result<ReportSummary> {
    let lister = listing::for_backend(backend);
    debug!(
        root = %root.display(),
        backend = backend.as_str(),
        lister = %lister.describe(),
        "generating tree report"
    );

    let clock = SystemClock;
    let generator = ReportGenerator::new(root, lister.as_ref(), &clock);
    generator.generate(Utf8Path::new(DEFAULT_OUTPUT), console)
}

#[derive(Clone, Debug)]
struct CliContext {
    chdir: Option<PathBuf>,
    backend: Backend,
}

impl CliContext {
    fn apply_chdir(&self) -> Result<()> {
        if let Some(path) = &self.chdir {
            std::env::set_current_dir(path)
                .with_context(|| format!("changing directory to {}", path.display()))?;
        }
        Ok(())
    }
}

impl From<&Cli> for CliContext {
    fn from(cli: &Cli) -> Self {
        Self {
            chdir: cli.chdir.clone(),
            backend: cli.backend,
        }
    }
}
