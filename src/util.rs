/// Filesystem helpers shared by the report writer.
pub mod fs {
    use std::fs::{self, OpenOptions};
    use std::io::{self, Write};
    use std::path::Path;

    /// Ensure a directory exists, creating it recursively if needed.
    pub fn ensure_dir(path: &Path) -> io::Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Create or truncate `path` and write `contents`.
    pub fn write_truncate(path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        file.write_all(contents)?;
        file.flush()
    }

    /// Append `contents` to `path`, creating it if missing.
    pub fn append(path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(contents)?;
        file.flush()
    }

}
