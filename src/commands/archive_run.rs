use anyhow::{Context, Result, ensure};
use std::path::PathBuf;

use crate::archive::CollisionPolicy;
use crate::archive::experiment;
use crate::archive::ledger::{self, LedgerRow, MergeDecision};
use crate::archive::link::{self, LinkOutcome};
use crate::archive::logbook::RunLog;
use crate::archive::params::{self, ParamRow};
use crate::archive::paths::resolve_archive_root;
use crate::archive::util::today_iso;
use crate::commands::CommandReport;
use crate::error::ArchiveError;

#[derive(Debug, Clone)]
pub struct ArchiveRunOptions {
    pub reads_fld: PathBuf,
    pub param_file: PathBuf,
    pub archive_fld: Option<PathBuf>,
    pub collision: CollisionPolicy,
    pub allow_missing_barcodes: bool,
    pub only_barcodes: Vec<u32>,
    pub quiet: bool,
}

fn destination_name(row: &ParamRow) -> String {
    format!(
        "{}_{}_barcode{:02}.fastq.gz",
        row.sample_id, row.flow_cell_id, row.barcode_id
    )
}

pub fn run(opts: &ArchiveRunOptions) -> Result<CommandReport> {
    let archive_root = resolve_archive_root(opts.archive_fld.clone())?;

    ensure!(
        opts.reads_fld.is_dir(),
        "source folder {} is not a directory",
        opts.reads_fld.display()
    );
    ensure!(
        opts.param_file.is_file(),
        "parameter file {} does not exist",
        opts.param_file.display()
    );
    ensure!(
        archive_root.is_dir(),
        "archive folder {} is not a directory",
        archive_root.display()
    );

    let mut log = RunLog::new(!opts.quiet);
    let mut report = CommandReport::new("archive-run");

    let table = params::load_param_table(&opts.param_file)?;
    params::check_barcode_files(
        &table,
        &opts.reads_fld,
        &opts.only_barcodes,
        opts.allow_missing_barcodes,
        &mut log,
    )?;

    let archive_date = today_iso();
    let mut processed = 0usize;

    for row in &table {
        if !row.is_selected(&opts.only_barcodes) {
            continue;
        }

        let src = opts.reads_fld.join(params::barcode_file_name(row.barcode_id));
        if !src.is_file() {
            // check_barcode_files already logged the warning
            report.missing += 1;
            continue;
        }
        let src_abs = src
            .canonicalize()
            .with_context(|| format!("failed to resolve {}", src.display()))?;

        let exp_fld =
            experiment::find_or_create(&archive_root, &row.research_group, &row.experiment_id, &mut log)?;
        log.push(format!(
            "archiving barcode {} in folder {}",
            row.barcode_id,
            exp_fld.display()
        ));

        let ledger_path = exp_fld.join("sample_info.csv");
        let existing = ledger::load(&ledger_path)?;
        let candidate = LedgerRow::from_param(row, &src_abs, &archive_date);
        let (merged, decision) = ledger::merge_row(existing, candidate, opts.collision)
            .with_context(|| format!("cannot register sample in {}", ledger_path.display()))?;

        if decision == MergeDecision::SkippedExisting {
            log.warn(format!(
                "sample {} is already registered in {}",
                row.sample_id,
                ledger_path.display()
            ));
            report.skipped += 1;
            processed += 1;
            continue;
        }

        let sample_dir = experiment::ensure_sample_dir(&exp_fld, &row.sample_id)?;
        let dest = sample_dir.join(destination_name(row));
        if link::place_link(&src_abs, &dest, opts.collision, &mut log)?
            == LinkOutcome::SkippedExisting
        {
            report.skipped += 1;
            processed += 1;
            continue;
        }

        ledger::save(&ledger_path, &merged)?;
        if decision == MergeDecision::Replaced {
            log.push(format!(
                "replaced the ledger row for barcode {} on flow cell {}",
                row.barcode_id, row.flow_cell_id
            ));
        }

        log.push(format!("linked {} -> {}", dest.display(), src_abs.display()));
        report.detail(format!("barcode {:02}: {}", row.barcode_id, dest.display()));
        report.archived += 1;
        processed += 1;
    }

    if processed == 0 {
        return Err(ArchiveError::NothingArchived.into());
    }

    log.push(format!(
        "done: archived={} skipped={} missing={}",
        report.archived, report.skipped, report.missing
    ));
    log.flush_to(&archive_root.join("archive_log.txt"))?;

    Ok(report)
}
