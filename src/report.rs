use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDateTime;
use tracing::debug;

use crate::clock::Clock;
use crate::listing::TreeLister;
use crate::util::fs;

/// Report location used when running with no arguments.
pub const DEFAULT_OUTPUT: &str = "docs/arbol.txt";

const HEADER_PREFIX: &str = "Tree generated: ";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[cfg(windows)]
const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &str = "\n";

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub path: Utf8PathBuf,
    pub generated_at: NaiveDateTime,
    pub body_bytes: usize,
}

/// Writes `Tree generated: <timestamp>` followed by a tree listing of `root`.
pub struct ReportGenerator<'a> {
    root: PathBuf,
    lister: &'a dyn TreeLister,
    clock: &'a dyn Clock,
}

impl<'a> ReportGenerator<'a> {
    pub fn new(
        root: impl Into<PathBuf>,
        lister: &'a dyn TreeLister,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            root: root.into(),
            lister,
            clock,
        }
    }

    /// Generate the report at `output_path` and print a confirmation line to `console`.
    ///
    /// A relative `output_path` is resolved against the root. The header is
    /// written (truncating the file) before the listing runs, so a failed
    /// listing leaves a header-only report behind.
    pub fn generate(
        &self,
        output_path: &Utf8Path,
        console: &mut dyn Write,
    ) -> Result<ReportSummary> {
        let target = self.resolve(output_path);

        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::ensure_dir(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }

        let generated_at = self.clock.now();
        fs::write_truncate(&target, header_line(generated_at).as_bytes())
            .with_context(|| format!("writing report header to {}", target.display()))?;

        debug!(
            lister = %self.lister.describe(),
            root = %self.root.display(),
            "producing tree listing"
        );
        let body = self.lister.list(&self.root)?;

        fs::append(&target, body.as_bytes())
            .with_context(|| format!("appending tree listing to {}", target.display()))?;

        writeln!(console, "Tree report written to {}", output_path)
            .context("writing confirmation message")?;

        Ok(ReportSummary {
            path: output_path.to_path_buf(),
            generated_at,
            body_bytes: body.len(),
        })
    }

    fn resolve(&self, output_path: &Utf8Path) -> PathBuf {
        let output = Path::new(output_path.as_str());
        if output.is_absolute() {
            output.to_path_buf()
        } else {
            self.root.join(output)
        }
    }
}

/// Header line, including its line ending.
pub fn header_line(at: NaiveDateTime) -> String {
    format!("{}{}{}", HEADER_PREFIX, at.format(TIMESTAMP_FORMAT), LINE_ENDING)
}
