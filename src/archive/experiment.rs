use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::archive::logbook::RunLog;
use crate::archive::util::today_iso;

/// Directory-name suffix identifying an experiment, independent of the
/// date prefix: `_<research_group>_<experiment_id>`, group lowercased.
pub fn experiment_tag(research_group: &str, experiment_id: &str) -> String {
    format!("_{}_{}", research_group.to_lowercase(), experiment_id)
}

fn matching_dir_name(names: &[String], tag: &str) -> Option<String> {
    let mut matches: Vec<&String> = names.iter().filter(|n| n.ends_with(tag)).collect();
    matches.sort();
    matches.first().map(|n| n.to_string())
}

/// Find the experiment directory for (research_group, experiment_id)
/// under the archive root, or create a new one dated today.
pub fn find_or_create(
    archive_root: &Path,
    research_group: &str,
    experiment_id: &str,
    log: &mut RunLog,
) -> Result<PathBuf> {
    let tag = experiment_tag(research_group, experiment_id);

    let mut names = Vec::new();
    let read_dir = fs::read_dir(archive_root)
        .with_context(|| format!("failed to read {}", archive_root.display()))?;
    for entry in read_dir {
        let entry = entry?;
        if !entry.path().is_dir() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }

    if let Some(name) = matching_dir_name(&names, &tag) {
        return Ok(archive_root.join(name));
    }

    let exp_fld = archive_root.join(format!("{}{tag}", today_iso()));
    fs::create_dir(&exp_fld)
        .with_context(|| format!("failed to create {}", exp_fld.display()))?;
    log.push(format!("created experiment folder {}", exp_fld.display()));
    Ok(exp_fld)
}

/// Ensure `samples/<sample_id>/` exists inside the experiment
/// directory and return it.
pub fn ensure_sample_dir(exp_fld: &Path, sample_id: &str) -> Result<PathBuf> {
    let sample_dir = exp_fld.join("samples").join(sample_id);
    fs::create_dir_all(&sample_dir)
        .with_context(|| format!("failed to create {}", sample_dir.display()))?;
    Ok(sample_dir)
}

#[cfg(test)]
mod tests {
    use super::{experiment_tag, matching_dir_name};

    #[test]
    fn tag_lowercases_the_research_group() {
        assert_eq!(experiment_tag("NeherLab", "E1"), "_neherlab_E1");
    }

    #[test]
    fn suffix_match_ignores_the_date_prefix() {
        let names = vec![
            "2023-11-02_lab_E2".to_string(),
            "2024-01-15_lab_E1".to_string(),
        ];
        assert_eq!(
            matching_dir_name(&names, "_lab_E1"),
            Some("2024-01-15_lab_E1".to_string())
        );
        assert_eq!(matching_dir_name(&names, "_lab_E9"), None);
    }

    #[test]
    fn suffix_match_is_deterministic_across_listing_order() {
        let a = vec!["2024-02-01_lab_E1".to_string(), "2024-01-01_lab_E1".to_string()];
        let b = vec!["2024-01-01_lab_E1".to_string(), "2024-02-01_lab_E1".to_string()];
        assert_eq!(matching_dir_name(&a, "_lab_E1"), matching_dir_name(&b, "_lab_E1"));
    }
}
