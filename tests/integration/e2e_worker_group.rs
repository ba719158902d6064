//! End-to-end worker group runs: config -> group runtime -> rendered output.
//!
//! Each test writes an export to a temp file, runs the whole group through
//! `congestion::run_group` and checks the rendered text exactly.

use std::io::Write;
use std::path::Path;

use congestion::config::{CongestionConfig, Overrides};
use congestion::group::exit_code;
use congestion::output::write_reports;
use congestion::{OutputFormat, run_group};

// ---------------------------------------------------------------------------
// Test fixture data
// ---------------------------------------------------------------------------

const SAMPLE: &str = "\
Generated: 2024-01-01T00:00,Traffic Light ID:1:Cars Passed:10
Generated: 2024-01-01T00:01,Traffic Light ID:1:Cars Passed:5
Generated: 2024-01-01T00:02,Traffic Light ID:2:Cars Passed:7
";

const CITY_GRID: &str = "\
Generated: 2024-06-01 08:00:00, Traffic Light ID: 10, Cars Passed: 40
Generated: 2024-06-01 08:00:00, Traffic Light ID: 11, Cars Passed: 12
Generated: 2024-06-01 08:00:00, Traffic Light ID: 12, Cars Passed: 33
Generated: 2024-06-01 08:00:00, Traffic Light ID: 13, Cars Passed: 8
Generated: 2024-06-01 08:00:00, Traffic Light ID: 14, Cars Passed: 25
Generated: 2024-06-01 08:05:00, Traffic Light ID: 10, Cars Passed: 35
Generated: 2024-06-01 08:05:00, Traffic Light ID: 11, Cars Passed: 61
Generated: 2024-06-01 08:05:00, Traffic Light ID: 12, Cars Passed: 2
Generated: 2024-06-01 08:05:00, Traffic Light ID: 16, Cars Passed: 25
Generated: 2024-06-01 08:05:00, Traffic Light ID: 18, Cars Passed: 25
";

// ---------------------------------------------------------------------------
// Harness helpers
// ---------------------------------------------------------------------------

fn write_input(contents: &str) -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().expect("create temp file");
    write!(f, "{}", contents).expect("write input");
    f
}

fn config(input: &Path, workers: u32) -> CongestionConfig {
    CongestionConfig::default()
        .with_overrides(&Overrides {
            input: Some(input.to_path_buf()),
            workers: Some(workers),
            ..Overrides::default()
        })
        .unwrap()
}

async fn render(cfg: &CongestionConfig) -> (String, i32) {
    let outcomes = run_group(cfg).await.expect("valid group");
    let mut out = Vec::new();
    write_reports(&mut out, &outcomes, cfg.format).unwrap();
    (String::from_utf8(out).unwrap(), exit_code(&outcomes))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn single_worker_sample() {
    let input = write_input(SAMPLE);
    let (text, code) = render(&config(input.path(), 1)).await;
    assert_eq!(code, 0);
    assert_eq!(
        text,
        "Process 0 congested traffic lights:\n\
         Traffic Light ID: 1, Total Cars Passed: 15\n\
         Traffic Light ID: 2, Total Cars Passed: 7\n"
    );
}

#[tokio::test]
async fn city_grid_single_worker_breaks_ties_by_id() {
    let input = write_input(CITY_GRID);
    let mut cfg = config(input.path(), 1);
    cfg.top_k = 5;
    let (text, _) = render(&cfg).await;
    assert_eq!(
        text,
        "Process 0 congested traffic lights:\n\
         Traffic Light ID: 10, Total Cars Passed: 75\n\
         Traffic Light ID: 11, Total Cars Passed: 73\n\
         Traffic Light ID: 12, Total Cars Passed: 35\n\
         Traffic Light ID: 14, Total Cars Passed: 25\n\
         Traffic Light ID: 16, Total Cars Passed: 25\n"
    );
}

#[tokio::test]
async fn city_grid_three_workers() {
    let input = write_input(CITY_GRID);
    let (text, code) = render(&config(input.path(), 3)).await;
    assert_eq!(code, 0);
    // rank 0: 12, 18   rank 1: 10, 13, 16   rank 2: 11, 14
    assert_eq!(
        text,
        "Process 0 congested traffic lights:\n\
         Traffic Light ID: 12, Total Cars Passed: 35\n\
         Traffic Light ID: 18, Total Cars Passed: 25\n\
         Process 1 congested traffic lights:\n\
         Traffic Light ID: 10, Total Cars Passed: 75\n\
         Traffic Light ID: 16, Total Cars Passed: 25\n\
         Traffic Light ID: 13, Total Cars Passed: 8\n\
         Process 2 congested traffic lights:\n\
         Traffic Light ID: 11, Total Cars Passed: 73\n\
         Traffic Light ID: 14, Total Cars Passed: 25\n"
    );
}

#[tokio::test]
async fn more_workers_than_sensors() {
    let input = write_input(SAMPLE);
    let (text, code) = render(&config(input.path(), 4)).await;
    assert_eq!(code, 0);
    assert_eq!(
        text,
        "Process 0 congested traffic lights:\n\
         Process 1 congested traffic lights:\n\
         Traffic Light ID: 1, Total Cars Passed: 15\n\
         Process 2 congested traffic lights:\n\
         Traffic Light ID: 2, Total Cars Passed: 7\n\
         Process 3 congested traffic lights:\n"
    );
}

#[tokio::test]
async fn reporting_twice_is_identical() {
    let input = write_input(CITY_GRID);
    let cfg = config(input.path(), 2);
    assert_eq!(render(&cfg).await, render(&cfg).await);
}

#[tokio::test]
async fn missing_input_produces_no_report() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(&dir.path().join("data.txt"), 2);
    cfg.format = OutputFormat::Text;
    let (text, code) = render(&cfg).await;
    assert_eq!(code, 1);
    assert!(text.is_empty());
}
