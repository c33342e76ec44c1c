use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::archive::CollisionPolicy;
use crate::archive::params::ParamRow;
use crate::error::ArchiveError;

/// One row of `sample_info.csv`: the parameter fields plus provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerRow {
    pub barcode_id: u32,
    pub experiment_id: String,
    pub sample_id: String,
    pub research_group: String,
    pub requester: String,
    pub species_taxid: String,
    pub strain_id: String,
    pub clinical_sample_id: String,
    pub flow_cell_id: String,
    pub flow_cell_type: String,
    pub ligation_kit: String,
    pub barcode_kits: String,
    pub nanopore_data_root_dir: String,
    pub original_fastq_file: String,
    pub archive_date: String,
}

impl LedgerRow {
    pub fn from_param(row: &ParamRow, original_fastq_file: &Path, archive_date: &str) -> Self {
        Self {
            barcode_id: row.barcode_id,
            experiment_id: row.experiment_id.clone(),
            sample_id: row.sample_id.clone(),
            research_group: row.research_group.clone(),
            requester: row.requester.clone(),
            species_taxid: row.species_taxid.clone(),
            strain_id: row.strain_id.clone(),
            clinical_sample_id: row.clinical_sample_id.clone(),
            flow_cell_id: row.flow_cell_id.clone(),
            flow_cell_type: row.flow_cell_type.clone(),
            ligation_kit: row.ligation_kit.clone(),
            barcode_kits: row.barcode_kits.clone(),
            nanopore_data_root_dir: row.nanopore_data_root_dir.clone(),
            original_fastq_file: original_fastq_file.display().to_string(),
            archive_date: archive_date.to_string(),
        }
    }

    fn same_key(&self, other: &LedgerRow) -> bool {
        self.barcode_id == other.barcode_id && self.flow_cell_id == other.flow_cell_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeDecision {
    Appended,
    Replaced,
    SkippedExisting,
}

/// Merge `candidate` into the current row set under the collision
/// policy. Pure function: returns the new row set (re-sorted by
/// sample_id) and what was done, without touching the filesystem.
pub fn merge_row(
    mut rows: Vec<LedgerRow>,
    candidate: LedgerRow,
    policy: CollisionPolicy,
) -> Result<(Vec<LedgerRow>, MergeDecision), ArchiveError> {
    let collides = rows.iter().any(|r| r.same_key(&candidate));
    let decision = if collides {
        match policy {
            CollisionPolicy::Fail => {
                return Err(ArchiveError::LedgerCollision {
                    barcode_id: candidate.barcode_id,
                    flow_cell_id: candidate.flow_cell_id,
                });
            }
            CollisionPolicy::Skip => return Ok((rows, MergeDecision::SkippedExisting)),
            CollisionPolicy::Overwrite => {
                rows.retain(|r| !r.same_key(&candidate));
                MergeDecision::Replaced
            }
        }
    } else {
        MergeDecision::Appended
    };

    rows.push(candidate);
    rows.sort_by(|a, b| a.sample_id.cmp(&b.sample_id));
    Ok((rows, decision))
}

/// Load `sample_info.csv`, or an empty table when the file is absent.
pub fn load(path: &Path) -> Result<Vec<LedgerRow>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut rows = Vec::new();
    for record in rdr.deserialize() {
        let row: LedgerRow =
            record.with_context(|| format!("failed to parse a row of {}", path.display()))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Persist the ledger as a full rewrite with header.
pub fn save(path: &Path, rows: &[LedgerRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    for row in rows {
        wtr.serialize(row)
            .with_context(|| format!("failed to write a row of {}", path.display()))?;
    }
    wtr.flush()
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
