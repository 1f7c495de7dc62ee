//! Integration tests for the whole export step.

use docslice::{
    load_result, ConversionResult, ConversionStatus, Error, ExportOptions, Exporter, JsonFormat,
};
use image::RgbImage;
use std::fs;
use std::path::Path;

const RESULT_JSON: &str = r#"{
    "input": "/incoming/Annual Report: 2024.pdf",
    "status": "success",
    "document": {
        "name": "Annual Report: 2024",
        "pages": {
            "1": {"page_no": 1, "width": 800, "height": 600, "image": "images/page_1.png"},
            "2": {"page_no": 2, "width": 800, "height": 600}
        },
        "items": [
            {"kind": "section_header", "text": "Revenue", "level": 1,
             "prov": {"page_no": 1, "bbox": [50, 40, 300, 70]}},
            {"kind": "picture", "prov": {"page_no": 1, "bbox": [100, 100, 200, 200]}},
            {"kind": "picture", "prov": {"page_no": 1, "bbox": [210, 150, 300, 250]}},
            {"kind": "text", "text": "Revenue grew in every region.",
             "prov": {"page_no": 1, "bbox": [50, 300, 700, 330]}},
            {"kind": "table",
             "table": {"rows": [
                {"is_header": true, "cells": [{"text": "Region"}, {"text": "Sales"}]},
                {"cells": [{"text": "North"}, {"text": "120"}]},
                {"cells": [{"text": "South"}, {"text": "95"}]}
             ]},
             "prov": {"page_no": 2, "bbox": [50, 50, 500, 200]}},
            {"kind": "list_item", "text": "Footnote without location"}
        ]
    }
}"#;

/// Write the conversion result and its page image into `dir`.
fn write_fixture(dir: &Path) -> std::path::PathBuf {
    fs::create_dir_all(dir.join("images")).unwrap();
    RgbImage::new(800, 600)
        .save(dir.join("images").join("page_1.png"))
        .unwrap();
    let path = dir.join("result.json");
    fs::write(&path, RESULT_JSON).unwrap();
    path
}

#[test]
fn test_save_writes_full_layout() {
    let input_dir = tempfile::tempdir().unwrap();
    let output_dir = tempfile::tempdir().unwrap();
    let result = load_result(write_fixture(input_dir.path())).unwrap();

    let report = Exporter::default().save(&result, output_dir.path()).unwrap();

    let root = output_dir.path().join("output_Annual Report_ 2024");
    assert_eq!(report.output_dir, root);
    let base = "Annual Report_ 2024";

    assert!(root.join(format!("{}_full.md", base)).is_file());
    assert!(root.join(format!("{}_full.json", base)).is_file());
    assert!(root.join("tables").join(format!("{}_table_1.csv", base)).is_file());
    assert!(root.join("tables").join(format!("{}_table_1.md", base)).is_file());
    assert!(root
        .join("figures")
        .join(format!("{}_pg1_smart_fig_1.png", base))
        .is_file());
    assert!(root.join("pages").join("page_1").join(format!("{}_pg1.md", base)).is_file());
    assert!(root.join("pages").join("page_2").join(format!("{}_pg2.json", base)).is_file());

    assert_eq!(report.element_count, 4);
    assert_eq!(report.figures_saved, 1);
    assert_eq!(report.tables_written, 2);
    assert_eq!(report.pages_written, 2);
    assert_eq!(report.pages_failed, 0);
    assert!(!report.has_failures());
}

#[test]
fn test_full_exports_content() {
    let input_dir = tempfile::tempdir().unwrap();
    let output_dir = tempfile::tempdir().unwrap();
    let result = load_result(write_fixture(input_dir.path())).unwrap();
    let report = Exporter::default().save(&result, output_dir.path()).unwrap();
    let base = "Annual Report_ 2024";

    let md = fs::read_to_string(report.output_dir.join(format!("{}_full.md", base))).unwrap();
    assert!(md.starts_with("## Revenue"));
    assert!(md.contains("<!-- image -->"));
    assert!(md.contains("- Footnote without location"));

    let json = fs::read_to_string(report.output_dir.join(format!("{}_full.json", base))).unwrap();
    let elements: serde_json::Value = serde_json::from_str(&json).unwrap();
    let elements = elements.as_array().unwrap();
    let table = elements.iter().find(|e| e["type"] == "Table").unwrap();
    assert_eq!(table["text"], "Region,Sales\nNorth,120\nSouth,95\n");
    assert!(table["metadata"]["text_as_html"]
        .as_str()
        .unwrap()
        .contains("<th>Region</th>"));

    let body = elements
        .iter()
        .find(|e| e["text"] == "Revenue grew in every region.")
        .unwrap();
    assert_eq!(body["type"], "UncategorizedText");
    assert_eq!(body["metadata"]["page_number"], 1);

    let footnote = elements.last().unwrap();
    assert_eq!(footnote["type"], "ListItem");
    assert!(footnote["metadata"].get("page_number").is_none());

    let csv = fs::read_to_string(
        report
            .output_dir
            .join("tables")
            .join(format!("{}_table_1.csv", base)),
    )
    .unwrap();
    assert_eq!(csv, "Region,Sales\nNorth,120\nSouth,95\n");

    let page_two = fs::read_to_string(
        report
            .output_dir
            .join("pages")
            .join("page_2")
            .join(format!("{}_pg2.md", base)),
    )
    .unwrap();
    assert_eq!(page_two, "[TABLE ON PAGE 2]");
}

#[test]
fn test_json_format_option() {
    let input_dir = tempfile::tempdir().unwrap();
    let result = load_result(write_fixture(input_dir.path())).unwrap();
    let base = "Annual Report_ 2024";

    let compact_dir = tempfile::tempdir().unwrap();
    let report = Exporter::default().save(&result, compact_dir.path()).unwrap();
    let compact = fs::read_to_string(report.output_dir.join(format!("{}_full.json", base))).unwrap();
    assert!(!compact.contains('\n'));
    assert!(compact.starts_with("[{"));

    let pretty_dir = tempfile::tempdir().unwrap();
    let exporter = Exporter::new(ExportOptions::new().with_json_format(JsonFormat::Pretty));
    let report = exporter.save(&result, pretty_dir.path()).unwrap();
    let pretty = fs::read_to_string(report.output_dir.join(format!("{}_full.json", base))).unwrap();
    assert!(pretty.starts_with("[\n  {"));
}

#[test]
fn test_failed_conversion_is_not_exported() {
    let output_dir = tempfile::tempdir().unwrap();
    let mut result = ConversionResult::failure("/incoming/broken.pdf", "unsupported encryption");
    result.status = ConversionStatus::PartialSuccess;

    let err = Exporter::default().save(&result, output_dir.path()).unwrap_err();
    assert!(matches!(err, Error::ConversionFailed { .. }));
    assert_eq!(fs::read_dir(output_dir.path()).unwrap().count(), 0);
}

#[test]
fn test_save_all_isolates_failures() {
    let input_dir = tempfile::tempdir().unwrap();
    let output_dir = tempfile::tempdir().unwrap();
    let good = load_result(write_fixture(input_dir.path())).unwrap();
    let bad = ConversionResult::failure("/incoming/broken.pdf", "timeout");

    let reports = Exporter::default().save_all(&[bad, good], output_dir.path());
    assert_eq!(reports.len(), 2);
    assert!(reports[0].is_err());
    let report = reports[1].as_ref().unwrap();
    assert_eq!(report.figures_saved, 1);
    assert!(report.output_dir.is_dir());
}
