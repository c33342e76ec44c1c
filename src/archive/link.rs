use anyhow::{Context, Result};
use std::fs;
use std::os::unix::fs::{PermissionsExt, symlink};
use std::path::Path;

use crate::archive::CollisionPolicy;
use crate::archive::logbook::RunLog;
use crate::error::ArchiveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    Linked,
    SkippedExisting,
}

fn destination_occupied(dest: &Path) -> bool {
    // symlink_metadata also catches dangling symlinks left by earlier runs
    fs::symlink_metadata(dest).is_ok()
}

/// Create the archive symlink `dest` pointing at the absolute source
/// path, applying the collision policy when `dest` already exists, and
/// strip write permission from the source once linked.
pub fn place_link(
    src_abs: &Path,
    dest: &Path,
    policy: CollisionPolicy,
    log: &mut RunLog,
) -> Result<LinkOutcome> {
    if destination_occupied(dest) {
        match policy {
            CollisionPolicy::Fail => {
                return Err(ArchiveError::DestinationExists(dest.to_path_buf()).into());
            }
            CollisionPolicy::Skip => {
                log.warn(format!(
                    "skipping link creation, {} is already present",
                    dest.display()
                ));
                return Ok(LinkOutcome::SkippedExisting);
            }
            CollisionPolicy::Overwrite => {
                fs::remove_file(dest)
                    .with_context(|| format!("failed to remove {}", dest.display()))?;
                log.push(format!("replacing existing link {}", dest.display()));
            }
        }
    }

    symlink(src_abs, dest).with_context(|| {
        format!("failed to link {} -> {}", dest.display(), src_abs.display())
    })?;
    strip_write_permission(src_abs)?;
    Ok(LinkOutcome::Linked)
}

/// Revoke all write bits on `path` so the archived-from data cannot be
/// mutated after linking.
pub fn strip_write_permission(path: &Path) -> Result<()> {
    let meta =
        fs::metadata(path).with_context(|| format!("failed to stat {}", path.display()))?;
    let mut perms = meta.permissions();
    perms.set_mode(perms.mode() & !0o222);
    fs::set_permissions(path, perms)
        .with_context(|| format!("failed to change permissions of {}", path.display()))?;
    Ok(())
}
