//! Integration tests for the batch runner.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use calamine::{open_workbook, Reader, Xlsx};
use coshh::batch::{BatchConfig, BatchRunner, FileOutcome};
use coshh::extract::DocumentReader;
use coshh::output::{OutputFormat, SHEET_NAME};
use coshh::{Error, Result};

/// Reads "PDFs" that are really plain-text fixtures; any file whose
/// contents start with `CORRUPT` fails like a broken document.
#[derive(Default)]
struct FixtureReader {
    reads: AtomicUsize,
}

impl DocumentReader for FixtureReader {
    fn read_text(&self, path: &Path) -> Result<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let text = fs::read_to_string(path)?;
        if text.starts_with("CORRUPT") {
            return Err(Error::PdfParse("invalid xref table".to_string()));
        }
        Ok(text)
    }
}

fn runner(config: BatchConfig) -> (BatchRunner, Arc<FixtureReader>) {
    let reader = Arc::new(FixtureReader::default());
    (BatchRunner::new(config).with_reader(reader.clone()), reader)
}

fn sheet_rows(path: &Path) -> usize {
    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    let range = workbook.worksheet_range(SHEET_NAME).unwrap().unwrap();
    range.height()
}

fn populate(dir: &Path) {
    fs::write(dir.join("acetone.pdf"), "Product name: Acetone\nWear gloves.\n").unwrap();
    fs::write(dir.join("broken.PDF"), "CORRUPT").unwrap();
    fs::write(dir.join("bleach.pdf"), "Product name: Bleach\nIn case of fire...\n").unwrap();
    fs::write(dir.join("readme.txt"), "Product name: Not a sheet\n").unwrap();
}

#[test]
fn test_one_failure_among_three() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path());

    let (runner, reader) = runner(BatchConfig::new(dir.path()));
    let report = runner.run().unwrap();

    assert_eq!(reader.reads.load(Ordering::SeqCst), 3);
    assert_eq!(report.records.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].file, "broken.PDF");
    assert!(report.failures[0].reason.contains("invalid xref table"));

    let output = dir.path().join("COSHH_output.xlsx");
    assert_eq!(report.output_path, output);
    assert_eq!(sheet_rows(&output), 3); // header + 2 rows
}

#[test]
fn test_source_file_and_sorted_order() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path());

    let (runner, _) = runner(BatchConfig::new(dir.path()));
    let report = runner.run().unwrap();

    let names: Vec<_> = report.records.iter().map(|r| r.source_file.as_str()).collect();
    assert_eq!(names, vec!["acetone.pdf", "bleach.pdf"]);
    assert_eq!(report.records[0].chemical_name, "Acetone");
    assert_eq!(report.records[1].emergency_procedures, "Use CO₂, foam, dry powder");
}

#[test]
fn test_empty_directory_writes_header_only() {
    let dir = tempfile::tempdir().unwrap();

    let (runner, reader) = runner(BatchConfig::new(dir.path()));
    let report = runner.run().unwrap();

    assert_eq!(report.total(), 0);
    assert_eq!(reader.reads.load(Ordering::SeqCst), 0);
    assert!(report.output_path.exists());
    assert_eq!(sheet_rows(&report.output_path), 1);
}

#[test]
fn test_rerun_produces_identical_rows() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path());
    let output = dir.path().join("rows.csv");
    let config = BatchConfig::new(dir.path())
        .with_output(&output)
        .with_format(OutputFormat::Csv);

    let (first_runner, _) = runner(config.clone());
    first_runner.run().unwrap();
    let first = fs::read_to_string(&output).unwrap();

    let (second_runner, _) = runner(config);
    second_runner.run().unwrap();
    let second = fs::read_to_string(&output).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.lines().count(), 3);
}

#[test]
fn test_parallel_keeps_input_order() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..12 {
        fs::write(
            dir.path().join(format!("sheet-{:02}.pdf", i)),
            format!("Product name: Chemical {}\n", i),
        )
        .unwrap();
    }

    let config = BatchConfig::new(dir.path())
        .with_output(dir.path().join("out.json"))
        .with_format(OutputFormat::Json)
        .with_jobs(4);
    let (runner, _) = runner(config);
    let report = runner.run().unwrap();

    let names: Vec<_> = report.records.iter().map(|r| r.chemical_name.clone()).collect();
    let expected: Vec<_> = (0..12).map(|i| format!("Chemical {}", i)).collect();
    assert_eq!(names, expected);
}

#[test]
fn test_progress_callback_sees_every_file() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path());

    let seen = Mutex::new(Vec::new());
    let (runner, _) = runner(BatchConfig::new(dir.path()));
    runner
        .run_with_progress(&|path, outcome| {
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            seen.lock().unwrap().push((name, outcome.is_processed()));
        })
        .unwrap();

    let seen = seen.into_inner().unwrap();
    assert_eq!(
        seen,
        vec![
            ("acetone.pdf".to_string(), true),
            ("bleach.pdf".to_string(), true),
            ("broken.PDF".to_string(), false),
        ]
    );
}

#[test]
fn test_process_file_outcome() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path());

    let (runner, _) = runner(BatchConfig::new(dir.path()));
    match runner.process_file(&dir.path().join("acetone.pdf")) {
        FileOutcome::Processed(record) => {
            assert_eq!(record.source_file, "acetone.pdf");
            assert_eq!(record.control_measures, "Protective gloves (EN 374)");
        }
        FileOutcome::Failed(failure) => panic!("unexpected failure: {:?}", failure),
    }
}

#[test]
fn test_default_extractor_skips_non_pdf_content() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("fake.pdf"), "not a pdf at all").unwrap();

    let report = coshh::run(BatchConfig::new(dir.path())).unwrap();

    assert!(report.records.is_empty());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].file, "fake.pdf");
    assert!(report.failures[0].reason.contains("not a valid PDF"));
}

#[test]
fn test_unwritable_output_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path());

    let config = BatchConfig::new(dir.path())
        .with_output(dir.path().join("missing-dir").join("out.csv"))
        .with_format(OutputFormat::Csv);
    let (runner, _) = runner(config);

    assert!(runner.run().is_err());
}
