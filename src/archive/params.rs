use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;

use crate::archive::logbook::RunLog;
use crate::error::ArchiveError;

/// The fixed column set of the parameters TSV, order-independent.
pub const PARAM_COLUMNS: [&str; 13] = [
    "barcode_id",
    "experiment_id",
    "sample_id",
    "research_group",
    "requester",
    "species_taxid",
    "strain_id",
    "clinical_sample_id",
    "flow_cell_id",
    "flow_cell_type",
    "ligation_kit",
    "barcode_kits",
    "nanopore_data_root_dir",
];

/// One sample row of the parameters TSV.
#[derive(Debug, Clone, Deserialize)]
pub struct ParamRow {
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
}

impl ParamRow {
    /// An empty selection means every barcode is selected.
    pub fn is_selected(&self, only_barcodes: &[u32]) -> bool {
        only_barcodes.is_empty() || only_barcodes.contains(&self.barcode_id)
    }
}

/// Read file name for a barcode, zero-padded to two digits.
pub fn barcode_file_name(barcode_id: u32) -> String {
    format!("barcode{barcode_id:02}.fastq.gz")
}

fn check_columns(path: &Path, headers: &[String]) -> Result<(), ArchiveError> {
    let expected: BTreeSet<&str> = PARAM_COLUMNS.iter().copied().collect();
    let found: BTreeSet<&str> = headers.iter().map(String::as_str).collect();
    if expected == found {
        return Ok(());
    }

    let join = |set: Vec<&&str>| {
        set.into_iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };
    Err(ArchiveError::SchemaMismatch {
        path: path.to_path_buf(),
        missing: join(expected.difference(&found).collect()),
        unexpected: join(found.difference(&expected).collect()),
    })
}

/// Load the parameters TSV, enforcing the fixed column set.
pub fn load_param_table(path: &Path) -> Result<Vec<ParamRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let headers: Vec<String> = rdr
        .headers()
        .with_context(|| format!("failed to read the header row of {}", path.display()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    check_columns(path, &headers)?;

    let mut rows = Vec::new();
    for record in rdr.deserialize() {
        let row: ParamRow =
            record.with_context(|| format!("failed to parse a row of {}", path.display()))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Verify that every selected barcode has its read file in the source
/// folder. Missing files are fatal unless `allow_missing` downgrades
/// them to a logged warning.
pub fn check_barcode_files(
    rows: &[ParamRow],
    reads_fld: &Path,
    only_barcodes: &[u32],
    allow_missing: bool,
    log: &mut RunLog,
) -> Result<()> {
    for row in rows.iter().filter(|r| r.is_selected(only_barcodes)) {
        let bc_file = reads_fld.join(barcode_file_name(row.barcode_id));
        if bc_file.is_file() {
            continue;
        }
        if allow_missing {
            log.warn(format!("expected read file {} is missing", bc_file.display()));
        } else {
            return Err(ArchiveError::MissingBarcodeFile(bc_file).into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{PARAM_COLUMNS, barcode_file_name, check_columns};
    use crate::error::ArchiveError;
    use std::path::Path;

    fn owned(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn column_check_accepts_reordered_schema() {
        let mut cols = owned(&PARAM_COLUMNS);
        cols.reverse();
        assert!(check_columns(Path::new("p.tsv"), &cols).is_ok());
    }

    #[test]
    fn column_check_names_missing_and_unexpected_columns() {
        let mut cols = owned(&PARAM_COLUMNS[1..]);
        cols.push("comment".to_string());

        let err = check_columns(Path::new("p.tsv"), &cols).unwrap_err();
        match err {
            ArchiveError::SchemaMismatch {
                missing, unexpected, ..
            } => {
                assert_eq!(missing, "barcode_id");
                assert_eq!(unexpected, "comment");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn barcode_file_names_are_zero_padded() {
        assert_eq!(barcode_file_name(1), "barcode01.fastq.gz");
        assert_eq!(barcode_file_name(12), "barcode12.fastq.gz");
    }
}
