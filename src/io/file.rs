use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;
use tempfile::NamedTempFile;

/// Read a whole input file.
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Write `bytes` to `target` through a temp file in the same directory and
/// an atomic rename, so readers never see a partial file. Refuses to replace
/// an existing file unless `force`.
pub fn write_atomic(target: &Path, bytes: &[u8], force: bool) -> Result<()> {
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create dir {}", parent.display()))?;
    }
    if !force && target.exists() {
        bail!("refusing to overwrite existing file: {} (use --force)", target.display());
    }

    let dir = target.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).context("create temp file")?;
    tmp.write_all(bytes).with_context(|| format!("write {}", target.display()))?;
    tmp.as_file().sync_all().ok(); // best-effort fsync file
    tmp.persist(target)
        .with_context(|| format!("rename to {}", target.display()))?;

    let _ = File::open(dir).and_then(|f| f.sync_all());
    Ok(())
}

/// Pretty-print `value` to `target` atomically.
pub fn write_json(target: &Path, value: &Value, force: bool) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("failed to serialize JSON")?;
    write_atomic(target, &bytes, force)
}
