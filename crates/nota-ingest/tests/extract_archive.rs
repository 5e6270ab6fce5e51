//! Extraction against real zip files built in a temp directory.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use nota_ingest::{ExtractOptions, Extractor, IngestError, prepare_output_dir};
use pretty_assertions::assert_eq;
use zip::write::SimpleFileOptions;

fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, body) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(body).unwrap();
        }
    }
    writer.finish().unwrap();
}

fn padded(body: &str) -> Vec<u8> {
    format!("{body}<!--{}-->", " ".repeat(1200)).into_bytes()
}

fn setup() -> (tempfile::TempDir, PathBuf, PathBuf) {
    let root = tempfile::tempdir().unwrap();
    let archive = root.path().join("export.zip");
    let output = root.path().join("extraido");
    (root, archive, output)
}

#[test]
fn extracts_counts_and_deletes_archive() {
    let (_root, archive, output) = setup();
    let doc = padded("<NFe/>");
    write_zip(
        &archive,
        &[
            ("35240001.xml", &doc),
            ("35240002.XML", &doc),
            ("danfe.pdf", b"%PDF-1.4"),
        ],
    );

    let count = Extractor::default().extract(&archive, &output).unwrap();

    assert_eq!(count, 2);
    assert!(!archive.exists());
    assert_eq!(fs::read(output.join("35240001.xml")).unwrap(), doc);
    assert!(output.join("danfe.pdf").is_file());
}

#[test]
fn creates_directory_entries_and_parents() {
    let (_root, archive, output) = setup();
    let doc = padded("<NFe/>");
    write_zip(&archive, &[("lote/", b""), ("lote/a.xml", &doc), ("b.xml", &doc)]);

    let count = Extractor::default().extract(&archive, &output).unwrap();

    assert!(output.join("lote").join("a.xml").is_file());
    // Only documents directly in the output directory are counted.
    assert_eq!(count, 1);
}

#[test]
fn overwrites_existing_files() {
    let (_root, archive, output) = setup();
    fs::create_dir_all(&output).unwrap();
    fs::write(output.join("a.xml"), b"old").unwrap();
    let doc = padded("<NFe/>");
    write_zip(&archive, &[("a.xml", &doc)]);

    Extractor::default().extract(&archive, &output).unwrap();

    assert_eq!(fs::read(output.join("a.xml")).unwrap(), doc);
}

#[test]
fn missing_archive_is_reported() {
    let (_root, archive, output) = setup();
    let err = Extractor::default().extract(&archive, &output).unwrap_err();
    assert!(matches!(err, IngestError::ArchiveMissing(path) if path == archive));
}

#[test]
fn small_archive_is_rejected_and_kept() {
    let (_root, archive, output) = setup();
    write_zip(&archive, &[("a.xml", b"<NFe/>")]);

    let err = Extractor::default().extract(&archive, &output).unwrap_err();

    assert!(matches!(err, IngestError::ArchiveTooSmall { min: 1024, .. }));
    assert!(archive.exists());
    assert!(!output.exists());
}

#[test]
fn html_error_page_is_not_an_archive() {
    let (_root, archive, output) = setup();
    let page = format!("<!DOCTYPE html><html><body>{}</body></html>", "x".repeat(2000));
    fs::write(&archive, &page).unwrap();

    let err = Extractor::default().extract(&archive, &output).unwrap_err();

    match err {
        IngestError::NotAnArchive { preview, .. } => {
            assert!(preview.starts_with("<!DOCTYPE html>"));
            assert_eq!(preview.len(), 300);
        }
        other => panic!("expected NotAnArchive, got {other:?}"),
    }
    assert!(archive.exists());
}

#[test]
fn corrupt_archive_with_signature_is_kept() {
    let (_root, archive, output) = setup();
    let mut bytes = b"PK\x03\x04".to_vec();
    bytes.extend(std::iter::repeat_n(0_u8, 2048));
    fs::write(&archive, &bytes).unwrap();

    let err = Extractor::default().extract(&archive, &output).unwrap_err();

    assert!(matches!(err, IngestError::Corrupt { .. }));
    assert!(archive.exists());
}

#[test]
fn minimum_size_is_configurable() {
    let (_root, archive, output) = setup();
    write_zip(&archive, &[("a.xml", b"<NFe/>")]);
    let extractor = Extractor::new(ExtractOptions {
        min_archive_bytes: 16,
        ..ExtractOptions::default()
    });

    assert_eq!(extractor.extract(&archive, &output).unwrap(), 1);
}

#[test]
fn prepared_output_holds_only_the_new_archive() {
    let (_root, archive, output) = setup();
    fs::create_dir_all(&output).unwrap();
    fs::write(output.join("previous-run.xml"), b"<NFe/>").unwrap();
    let doc = padded("<NFe/>");
    write_zip(&archive, &[("a.xml", &doc), ("b.xml", &doc)]);

    prepare_output_dir(&output).unwrap();
    let count = Extractor::default().extract(&archive, &output).unwrap();

    assert_eq!(count, 2);
    assert!(!output.join("previous-run.xml").exists());
}
