use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use housing_ingest::data::strata::IncomeCategory;
use housing_ingest::{
    DataIngestion, DataIngestionConfig, IngestionEvent, IngestionObserver, Stage,
};
use reqwest::Url;
use tempfile::TempDir;

const HEADER: &str = "longitude,latitude,median_income,ocean_proximity";

#[derive(Default)]
struct Recorder {
    events: RefCell<Vec<&'static str>>,
}

impl IngestionObserver for Recorder {
    fn on_event(&self, event: &IngestionEvent<'_>) {
        self.events.borrow_mut().push(event.name());
    }
}

/// Write a gzipped tar holding `members` and return its path.
fn write_tgz(dir: &Path, name: &str, members: &[(&str, &str)]) -> PathBuf {
    let mut builder = tar::Builder::new(Vec::new());
    for (member, content) in members {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, member, content.as_bytes())
            .unwrap();
    }
    let tar_bytes = builder.into_inner().unwrap();

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&tar_bytes).unwrap();
    let path = dir.join(name);
    fs::write(&path, encoder.finish().unwrap()).unwrap();
    path
}

fn config_for(root: &Path, archive: &Path) -> DataIngestionConfig {
    let artifact = root.join("artifact").join("data_ingestion");
    DataIngestionConfig::new(
        Url::from_file_path(archive).unwrap().to_string(),
        artifact.join("tgz_data"),
        artifact.join("raw_data"),
        artifact.join("ingested_data").join("train"),
        artifact.join("ingested_data").join("test"),
    )
}

fn housing_csv(incomes: &[f64]) -> String {
    let mut out = format!("{HEADER}\n");
    for (i, income) in incomes.iter().enumerate() {
        out.push_str(&format!("-122.{i:03},37.{i:03},{income},NEAR BAY\n"));
    }
    out
}

/// Data rows of a written CSV, header checked and stripped.
fn data_rows(path: &Path) -> Vec<String> {
    let content = fs::read_to_string(path).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some(HEADER), "header of {}", path.display());
    lines.map(str::to_string).collect()
}

fn income_of(row: &str) -> f64 {
    row.split(',').nth(2).unwrap().parse().unwrap()
}

#[test]
fn ten_row_dataset_splits_eight_two_and_reproducibly() {
    let root = TempDir::new().unwrap();
    let incomes = [0.5, 1.0, 2.0, 2.5, 3.5, 4.0, 5.0, 5.5, 7.0, 8.0];
    let input = housing_csv(&incomes);
    let archive = write_tgz(root.path(), "housing.tgz", &[("housing.csv", input.as_str())]);
    let config = config_for(root.path(), &archive);

    let labels: Vec<u8> = incomes.iter().map(|&v| IncomeCategory::of(v).label()).collect();
    assert_eq!(labels, vec![1, 1, 2, 2, 3, 3, 4, 4, 5, 5]);

    let ingestion = DataIngestion::new(config.clone()).unwrap();
    let artifact = ingestion.initiate_data_ingestion().unwrap();
    assert!(artifact.is_ingested);
    assert_eq!(
        artifact.train_file_path,
        config.ingested_train_dir.join("housing.csv")
    );
    assert_eq!(
        artifact.test_file_path,
        config.ingested_test_dir.join("housing.csv")
    );
    assert!(config.tgz_download_dir.join("housing.tgz").is_file());
    assert!(config.raw_data_dir.join("housing.csv").is_file());

    let train = data_rows(&artifact.train_file_path);
    let test = data_rows(&artifact.test_file_path);
    assert_eq!(train.len(), 8);
    assert_eq!(test.len(), 2);

    let train_set: BTreeSet<&String> = train.iter().collect();
    let test_set: BTreeSet<&String> = test.iter().collect();
    assert!(train_set.is_disjoint(&test_set));
    let input_rows: BTreeSet<String> = input.lines().skip(1).map(str::to_string).collect();
    let output_rows: BTreeSet<String> = train.iter().chain(&test).cloned().collect();
    assert_eq!(input_rows, output_rows);

    // Rerun over the same directories: byte-identical outputs.
    let first_train = fs::read(&artifact.train_file_path).unwrap();
    let first_test = fs::read(&artifact.test_file_path).unwrap();
    let again = DataIngestion::new(config)
        .unwrap()
        .initiate_data_ingestion()
        .unwrap();
    assert_eq!(again, artifact);
    assert_eq!(fs::read(&again.train_file_path).unwrap(), first_train);
    assert_eq!(fs::read(&again.test_file_path).unwrap(), first_test);
}

#[test]
fn larger_dataset_keeps_bucket_proportions() {
    let root = TempDir::new().unwrap();
    // 1000 rows: 40 / 320 / 350 / 170 / 120 across buckets 1..=5.
    let mut incomes = Vec::new();
    for (value, count) in [(1.0, 40), (2.2, 320), (3.7, 350), (5.1, 170), (9.4, 120)] {
        incomes.extend(std::iter::repeat(value).take(count));
    }
    let archive = write_tgz(
        root.path(),
        "housing.tgz",
        &[("housing.csv", housing_csv(&incomes).as_str())],
    );
    let config = config_for(root.path(), &archive);

    let artifact = DataIngestion::new(config)
        .unwrap()
        .initiate_data_ingestion()
        .unwrap();
    let train = data_rows(&artifact.train_file_path);
    let test = data_rows(&artifact.test_file_path);
    assert_eq!(test.len(), 200);
    assert_eq!(train.len(), 800);

    let count_by_bucket = |rows: &[String]| {
        let mut counts: BTreeMap<u8, usize> = BTreeMap::new();
        for row in rows {
            *counts.entry(IncomeCategory::of(income_of(row)).label()).or_default() += 1;
        }
        counts
    };
    let test_counts = count_by_bucket(&test[..]);
    let train_counts = count_by_bucket(&train[..]);
    assert_eq!(test_counts[&1], 8);
    assert_eq!(test_counts[&2], 64);
    assert_eq!(test_counts[&3], 70);
    assert_eq!(test_counts[&4], 34);
    assert_eq!(test_counts[&5], 24);
    assert_eq!(train_counts[&3], 280);
}

#[test]
fn missing_archive_aborts_before_extraction() {
    let root = TempDir::new().unwrap();
    let config = config_for(root.path(), &root.path().join("missing.tgz"));

    let ingestion = DataIngestion::with_observer(config.clone(), Recorder::default()).unwrap();
    let err = ingestion.initiate_data_ingestion().unwrap_err();

    assert_eq!(err.stage(), Stage::Download);
    assert!(!config.raw_data_dir.exists());
    assert!(!config.ingested_train_dir.exists());
    assert!(!config.ingested_test_dir.exists());
    assert_eq!(
        *ingestion.observer().events.borrow(),
        vec!["run_started", "run_failed"]
    );
}

#[test]
fn corrupt_archive_fails_at_extract_stage() {
    let root = TempDir::new().unwrap();
    let archive = root.path().join("housing.tgz");
    fs::write(&archive, b"\x1f\x8bnot really gzip").unwrap();
    let config = config_for(root.path(), &archive);

    let err = DataIngestion::new(config.clone())
        .unwrap()
        .initiate_data_ingestion()
        .unwrap_err();
    assert_eq!(err.stage(), Stage::Extract);
    assert!(!config.ingested_train_dir.exists());
}

#[test]
fn two_raw_files_use_the_lexicographically_first() {
    let root = TempDir::new().unwrap();
    let incomes = [0.5, 1.0, 2.0, 2.5, 3.5, 4.0, 5.0, 5.5, 7.0, 8.0];
    // Archive order puts the later name first; it must not matter.
    let archive = write_tgz(
        root.path(),
        "housing.tgz",
        &[
            ("b_housing.csv", "not,a,usable\nfile,at,all\n"),
            ("a_housing.csv", housing_csv(&incomes).as_str()),
        ],
    );
    let config = config_for(root.path(), &archive);

    let artifact = DataIngestion::new(config.clone())
        .unwrap()
        .initiate_data_ingestion()
        .unwrap();
    assert_eq!(
        artifact.train_file_path,
        config.ingested_train_dir.join("a_housing.csv")
    );
    assert_eq!(data_rows(&artifact.train_file_path).len(), 8);
    assert!(!config.ingested_train_dir.join("b_housing.csv").exists());
}

#[test]
fn observer_sees_every_step_in_order() {
    let root = TempDir::new().unwrap();
    let incomes = [0.5, 1.0, 2.0, 2.5, 3.5, 4.0, 5.0, 5.5, 7.0, 8.0];
    let archive = write_tgz(
        root.path(),
        "housing.tgz",
        &[("housing.csv", housing_csv(&incomes).as_str())],
    );
    let ingestion =
        DataIngestion::with_observer(config_for(root.path(), &archive), Recorder::default())
            .unwrap();
    ingestion.initiate_data_ingestion().unwrap();

    assert_eq!(
        *ingestion.observer().events.borrow(),
        vec![
            "run_started",
            "downloaded",
            "extracted",
            "loaded",
            "split",
            "written",
            "written",
            "run_completed",
        ]
    );
}

#[test]
fn artifact_serializes_to_json() {
    let root = TempDir::new().unwrap();
    let incomes = [0.5, 1.0, 2.0, 2.5, 3.5, 4.0, 5.0, 5.5, 7.0, 8.0];
    let archive = write_tgz(
        root.path(),
        "housing.tgz",
        &[("housing.csv", housing_csv(&incomes).as_str())],
    );
    let artifact = DataIngestion::new(config_for(root.path(), &archive))
        .unwrap()
        .initiate_data_ingestion()
        .unwrap();

    let json: serde_json::Value = serde_json::to_value(&artifact).unwrap();
    assert_eq!(json["is_ingested"], true);
    assert_eq!(json["message"], "Data ingestion completed successfully.");
    assert!(json["train_file_path"]
        .as_str()
        .unwrap()
        .ends_with("housing.csv"));
}
