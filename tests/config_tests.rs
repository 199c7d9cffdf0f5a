use platescope::config::{OutputPaths, PipelineConfig, SimilarityThreshold, SortOrder, ThresholdError};
use platescope::grouping::Grouping;
use std::path::{Path, PathBuf};

#[test]
fn threshold_parses_values_in_range() {
    assert_eq!("85".parse::<SimilarityThreshold>().unwrap().value(), 85.0);
    assert_eq!(" 90.5 ".parse::<SimilarityThreshold>().unwrap().value(), 90.5);
    assert_eq!("0".parse::<SimilarityThreshold>().unwrap().value(), 0.0);
    assert_eq!("100".parse::<SimilarityThreshold>().unwrap().value(), 100.0);
}

#[test]
fn threshold_rejects_bad_input() {
    assert_eq!("abc".parse::<SimilarityThreshold>(), Err(ThresholdError::NotNumeric("abc".into())));
    assert_eq!("150".parse::<SimilarityThreshold>(), Err(ThresholdError::OutOfRange(150.0)));
    assert_eq!("-0.5".parse::<SimilarityThreshold>(), Err(ThresholdError::OutOfRange(-0.5)));
    assert!(matches!("NaN".parse::<SimilarityThreshold>(), Err(ThresholdError::OutOfRange(_))));
}

#[test]
fn resolve_falls_back_to_default() {
    assert_eq!(SimilarityThreshold::resolve(None).value(), 80.0);
    assert_eq!(SimilarityThreshold::resolve(Some("")).value(), 80.0);
    assert_eq!(SimilarityThreshold::resolve(Some("eighty")).value(), 80.0);
    assert_eq!(SimilarityThreshold::resolve(Some("101")).value(), 80.0);
    assert_eq!(SimilarityThreshold::resolve(Some("72.5")).value(), 72.5);
}

#[test]
fn threshold_displays_with_a_decimal() {
    assert_eq!(SimilarityThreshold::default().to_string(), "80.0");
    assert_eq!(SimilarityThreshold::new(72.5).unwrap().to_string(), "72.5");
}

#[test]
fn threshold_deserialization_is_validated() {
    let ok: SimilarityThreshold = serde_json::from_str("85.0").unwrap();
    assert_eq!(ok.value(), 85.0);
    assert!(serde_json::from_str::<SimilarityThreshold>("150.0").is_err());
}

#[test]
fn sort_order_names() {
    assert_eq!("confidence".parse::<SortOrder>(), Ok(SortOrder::Confidence));
    assert_eq!("first-frame".parse::<SortOrder>(), Ok(SortOrder::FirstFrame));
    assert_eq!("FIRST_FRAME".parse::<SortOrder>(), Ok(SortOrder::FirstFrame));
    assert!("alphabetical".parse::<SortOrder>().is_err());
    assert_eq!(SortOrder::default(), SortOrder::Confidence);
}

#[test]
fn output_paths_replace_txt_suffix() {
    let out = OutputPaths::for_input(Path::new("logs/run1.txt"));
    assert_eq!(out.table, PathBuf::from("logs/run1_summary.csv"));
    assert_eq!(out.report, Some(PathBuf::from("logs/run1_report.txt")));
}

#[test]
fn output_paths_append_for_other_names() {
    let out = OutputPaths::for_input(Path::new("capture.log"));
    assert_eq!(out.table, PathBuf::from("capture.log_summary.csv"));
    assert_eq!(out.report, Some(PathBuf::from("capture.log_report.txt")));
}

#[test]
fn pipeline_config_overrides() {
    let cfg = PipelineConfig::new("plates.txt", Grouping::Exact)
        .with_sort(SortOrder::FirstFrame)
        .with_table_path("out/table.csv")
        .with_report_path(None);
    assert_eq!(cfg.input, PathBuf::from("plates.txt"));
    assert_eq!(cfg.grouping, Grouping::Exact);
    assert_eq!(cfg.sort, SortOrder::FirstFrame);
    assert_eq!(cfg.outputs.table, PathBuf::from("out/table.csv"));
    assert_eq!(cfg.outputs.report, None);
}
