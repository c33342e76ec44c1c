use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const HEADER: &str = "barcode_id\texperiment_id\tsample_id\tresearch_group\trequester\t\
                      species_taxid\tstrain_id\tclinical_sample_id\tflow_cell_id\t\
                      flow_cell_type\tligation_kit\tbarcode_kits\tnanopore_data_root_dir";

fn setup_single_row(root: &Path) -> (PathBuf, PathBuf, PathBuf) {
    let reads = root.join("reads");
    let archive = root.join("archive");
    fs::create_dir_all(&reads).expect("mkdir reads");
    fs::create_dir_all(&archive).expect("mkdir archive");
    fs::write(reads.join("barcode01.fastq.gz"), b"@read\nACGT\n+\nIIII\n").expect("write reads");

    let params = root.join("params.tsv");
    let row = "1\tE1\tS1\tlab\talice\t562\tK12\tna\tFC1\tFLO-MIN106\t\
               SQK-LSK109\tEXP-NBD104\t/data/runs";
    fs::write(&params, format!("{HEADER}\n{row}\n")).expect("write params");

    (reads, params, archive)
}

fn archive_cmd(
    root: &Path,
    reads: &Path,
    params: &Path,
    archive: &Path,
    extra: &[&str],
) -> assert_cmd::assert::Assert {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("archive-run");
    cmd.current_dir(root)
        .arg("--reads_fld")
        .arg(reads)
        .arg("--param_file")
        .arg(params)
        .arg("--archive_fld")
        .arg(archive);
    for arg in extra {
        cmd.arg(arg);
    }
    cmd.assert()
}

fn ledger_data_rows(archive: &Path) -> Vec<String> {
    let exp_fld = fs::read_dir(archive)
        .expect("read archive")
        .map(|e| e.expect("entry").path())
        .find(|p| p.is_dir())
        .expect("experiment dir");
    fs::read_to_string(exp_fld.join("sample_info.csv"))
        .expect("read ledger")
        .lines()
        .skip(1)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

#[test]
fn rerun_without_overwrite_fails_with_a_ledger_collision() {
    let tmp = tempdir().expect("tempdir");
    let (reads, params, archive) = setup_single_row(tmp.path());

    archive_cmd(tmp.path(), &reads, &params, &archive, &[]).success();
    archive_cmd(tmp.path(), &reads, &params, &archive, &[])
        .failure()
        .stderr(predicate::str::contains("already registered"));

    assert_eq!(ledger_data_rows(&archive).len(), 1);
}

#[test]
fn rerun_with_overwrite_replaces_the_link_and_the_ledger_row() {
    let tmp = tempdir().expect("tempdir");
    let (reads, params, archive) = setup_single_row(tmp.path());

    archive_cmd(tmp.path(), &reads, &params, &archive, &[]).success();
    archive_cmd(tmp.path(), &reads, &params, &archive, &["--overwrite"])
        .success()
        .stdout(predicate::str::contains("archived=1"));

    let rows = ledger_data_rows(&archive);
    assert_eq!(rows.len(), 1, "overwrite must not duplicate the row");
}

#[test]
fn rerun_with_skip_preserves_the_existing_archive() {
    let tmp = tempdir().expect("tempdir");
    let (reads, params, archive) = setup_single_row(tmp.path());

    archive_cmd(tmp.path(), &reads, &params, &archive, &[]).success();
    archive_cmd(
        tmp.path(),
        &reads,
        &params,
        &archive,
        &["--skip_present_barcodes"],
    )
    .success()
    .stdout(predicate::str::contains("WARNING"))
    .stdout(predicate::str::contains("skipped=1"));

    assert_eq!(ledger_data_rows(&archive).len(), 1);
}

#[test]
fn destination_collision_without_a_ledger_row_is_fatal() {
    let tmp = tempdir().expect("tempdir");
    let (reads, params, archive) = setup_single_row(tmp.path());

    archive_cmd(tmp.path(), &reads, &params, &archive, &[]).success();

    // drop the ledger but keep the link: the half-state is still caught
    let exp_fld = fs::read_dir(&archive)
        .expect("read archive")
        .map(|e| e.expect("entry").path())
        .find(|p| p.is_dir())
        .expect("experiment dir");
    fs::remove_file(exp_fld.join("sample_info.csv")).expect("remove ledger");

    archive_cmd(tmp.path(), &reads, &params, &archive, &[])
        .failure()
        .stderr(predicate::str::contains("already exists"));
}
