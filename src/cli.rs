use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::archive::CollisionPolicy;
use crate::commands::CommandReport;
use crate::commands::archive_run::{self, ArchiveRunOptions};

/// Archive the results of basecalling into the experiment folders.
///
/// Subdivides the reads by experiment id, creating symlinks to the
/// original files, and creates (or updates) a sample_info.csv file
/// describing the samples stored in each folder.
#[derive(Debug, Parser)]
#[command(name = "archive-run", version, about)]
pub struct Cli {
    /// Source folder containing the reads of the sequencing run, in
    /// fastq.gz format.
    #[arg(long = "reads_fld", value_name = "DIR")]
    pub reads_fld: PathBuf,

    /// The parameters.tsv file describing every sample of the run.
    #[arg(long = "param_file", value_name = "FILE")]
    pub param_file: PathBuf,

    /// Destination archive folder, one subfolder per experiment.
    /// Defaults to SEQ_ARCHIVE_ROOT, then ~/sequencing_archive.
    #[arg(long = "archive_fld", value_name = "DIR")]
    pub archive_fld: Option<PathBuf>,

    /// Replace destination links and ledger rows that already exist.
    #[arg(long, conflicts_with = "skip_present_barcodes")]
    pub overwrite: bool,

    /// Leave already-archived barcodes untouched instead of failing.
    #[arg(long = "skip_present_barcodes", conflicts_with = "overwrite")]
    pub skip_present_barcodes: bool,

    /// Warn instead of failing when an expected barcode file is
    /// missing from the source folder.
    #[arg(long = "allow_missing_barcodes")]
    pub allow_missing_barcodes: bool,

    /// Archive only these barcode ids (space-separated list).
    #[arg(long = "only_barcodes", value_name = "BARCODE", num_args = 1..)]
    pub only_barcodes: Vec<u32>,

    /// Suppress the run-log echo on stdout.
    #[arg(long)]
    pub quiet: bool,

    /// Print the final report as JSON.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    fn collision_policy(&self) -> CollisionPolicy {
        if self.overwrite {
            CollisionPolicy::Overwrite
        } else if self.skip_present_barcodes {
            CollisionPolicy::Skip
        } else {
            CollisionPolicy::Fail
        }
    }
}

fn print_report(report: &CommandReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    for detail in &report.details {
        println!("{detail}");
    }
    println!(
        "{}: archived={} skipped={} missing={}",
        report.command, report.archived, report.skipped, report.missing
    );
    Ok(())
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let opts = ArchiveRunOptions {
        reads_fld: cli.reads_fld.clone(),
        param_file: cli.param_file.clone(),
        archive_fld: cli.archive_fld.clone(),
        collision: cli.collision_policy(),
        allow_missing_barcodes: cli.allow_missing_barcodes,
        only_barcodes: cli.only_barcodes.clone(),
        quiet: cli.quiet,
    };

    let report = archive_run::run(&opts)?;
    print_report(&report, cli.json)
}
