use std::path::PathBuf;
use thiserror::Error;

/// Precondition violations that abort an archiving run.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error(
        "parameter file {path} has an unexpected column set \
         (missing: [{missing}]; unexpected: [{unexpected}])"
    )]
    SchemaMismatch {
        path: PathBuf,
        missing: String,
        unexpected: String,
    },
    #[error("missing expected read file: {0}")]
    MissingBarcodeFile(PathBuf),
    #[error("destination {0} already exists; pass --overwrite or --skip_present_barcodes")]
    DestinationExists(PathBuf),
    #[error("barcode {barcode_id} on flow cell {flow_cell_id} is already registered")]
    LedgerCollision { barcode_id: u32, flow_cell_id: String },
    #[error("no barcodes were archived; check the parameter table and --only_barcodes")]
    NothingArchived,
}
