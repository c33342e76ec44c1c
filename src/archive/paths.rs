use anyhow::Result;
use std::env;
use std::path::PathBuf;

fn required_home_dir() -> Result<PathBuf> {
    if let Some(home) = dirs::home_dir() {
        return Ok(home);
    }
    Err(anyhow::anyhow!("HOME directory could not be resolved"))
}

fn env_or_default_path(var: &str, fallback: PathBuf) -> PathBuf {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => fallback,
    }
}

/// Resolve the archive root: the `--archive_fld` flag wins, then the
/// `SEQ_ARCHIVE_ROOT` environment variable, then `~/sequencing_archive`.
pub fn resolve_archive_root(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(root) = flag {
        return Ok(root);
    }
    let home = required_home_dir()?;
    Ok(env_or_default_path(
        "SEQ_ARCHIVE_ROOT",
        home.join("sequencing_archive"),
    ))
}
