use std::ffi::OsStr;
use std::io;
use std::path::{self, Path};
use std::process::{Command as ProcessCommand, Stdio};

use anyhow::{Context, Result, anyhow, bail};
use tracing::{debug, warn};

use super::TreeLister;

/// Argument replaced by the absolute root path when the utility runs.
pub const ROOT_ARG: &str = "{root}";

/// Delegates the listing to an external program run inside the root directory.
/// Any argument equal to [`ROOT_ARG`] is replaced by the absolute root path.
#[derive(Clone, Debug)]
pub struct SystemLister {
    argv: Vec<String>,
}

impl SystemLister {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut argv = vec![program.to_owned()];
        argv.extend(args.into_iter().map(Into::into));
        Self { argv }
    }

    /// The recursive listing utility every supported host ships with.
    pub fn host_default() -> Self {
        if cfg!(windows) {
            Self::new(
                "powershell",
                [
                    "-NoProfile",
                    "-NonInteractive",
                    "-Command",
                    "Get-ChildItem -Recurse -Force | Format-Table Mode, LastWriteTime, Length, FullName -AutoSize | Out-String -Width 4096",
                ],
            )
        } else {
            Self::new("find", [ROOT_ARG, "-ls"])
        }
    }
}

impl TreeLister for SystemLister {
    fn describe(&self) -> String {
        format!("system: {}", format_command(&self.argv))
    }

    fn list(&self, root: &Path) -> Result<String> {
        let render = format_command(&self.argv);
        debug!(command = %render, root = %root.display(), "invoking listing utility");

        let root = path::absolute(root)
            .with_context(|| format!("resolving absolute path of {}", root.display()))?;
        let args = self.argv[1..].iter().map(|arg| {
            if arg == ROOT_ARG {
                root.as_os_str()
            } else {
                OsStr::new(arg.as_str())
            }
        });

        let output = ProcessCommand::new(&self.argv[0])
            .args(args)
            .current_dir(&root)
            .stdin(Stdio::null())
            .output()
            .map_err(|err| match err.kind() {
                io::ErrorKind::NotFound => anyhow!(err).context(format!(
                    "listing utility `{}` is not available",
                    self.argv[0]
                )),
                _ => anyhow!(err).context(format!("executing `{}`", render)),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let code = output
                .status
                .code()
                .map(|code| code.to_string())
                .unwrap_or_else(|| "none (terminated by signal)".to_owned());
            bail!(
                "command `{}` failed with exit code {}: {}",
                render,
                code,
                stderr.trim()
            );
        }

        match String::from_utf8(output.stdout) {
            Ok(text) => Ok(text),
            Err(err) => {
                warn!(command = %render, "listing output is not valid UTF-8; decoding lossily");
                Ok(String::from_utf8_lossy(err.as_bytes()).into_owned())
            }
        }
    }
}

fn format_command(argv: &[String]) -> String {
    argv.iter()
        .map(|arg| {
            if arg.chars().any(|c| c.is_whitespace()) {
                let escaped = arg.replace('"', "\\\"");
                format!("\"{}\"", escaped)
            } else {
                arg.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
