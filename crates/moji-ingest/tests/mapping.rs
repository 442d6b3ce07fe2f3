use std::fs;
use std::path::PathBuf;

use moji_core::SilentDiagnostics;
use moji_ingest::{
    IngestError, build_mapping_tables, load_conversion_table, write_mapping_tables,
};
use tempfile::TempDir;

const HEADER: &str =
    "HKCode,HKChar,MJCode,KanjiLevel,RealCode,RealChar,IVSCode,IVSChar,UnicodeCode,UnicodeChar";

fn source_file(dir: &TempDir, rows: &[&str]) -> PathBuf {
    let mut contents = String::from(HEADER);
    for row in rows {
        contents.push('\n');
        contents.push_str(row);
    }
    contents.push('\n');
    let path = dir.path().join("source.csv");
    fs::write(&path, contents).expect("write source");
    path
}

#[test]
fn prefers_ivs_then_real_then_unicode() {
    let dir = TempDir::new().unwrap();
    let path = source_file(
        &dir,
        &[
            "0001,葛,MJ000001,1,,,E0100,葛\u{E0100},845B,葛",
            "0002,髙,MJ000002,1,9AD9,髙,,,9AD8,高",
            "0003,崎,MJ000003,1,,,,,5D0E,崎",
        ],
    );
    let (tables, rows) = build_mapping_tables(&path).expect("build tables");
    assert_eq!(rows, 3);
    assert_eq!(tables.hk_to_mj.get("葛"), Some("葛\u{E0100}"));
    assert_eq!(tables.hk_to_mj.get("髙"), Some("髙"));
    assert_eq!(tables.hk_to_mj.get("崎"), Some("崎"));
    assert_eq!(tables.mj_to_hk.get("葛\u{E0100}"), Some("葛"));
}

#[test]
fn skips_incomplete_rows_and_blank_lines() {
    let dir = TempDir::new().unwrap();
    let path = source_file(
        &dir,
        &[
            "0001,,MJ000001,1,,,,,6F22,漢",
            "",
            "0002,字,MJ000002,1,,,,,,",
            "0003, 龍 ,MJ000003,1,,,,, 9F8D , 龍 ",
        ],
    );
    let (tables, rows) = build_mapping_tables(&path).expect("build tables");
    assert_eq!(rows, 3);
    assert_eq!(tables.hk_to_mj.len(), 1);
    assert_eq!(tables.hk_to_mj.get("龍"), Some("龍"));
}

#[test]
fn last_write_wins_in_first_insertion_order() {
    let dir = TempDir::new().unwrap();
    let path = source_file(
        &dir,
        &[
            "0001,A,MJ1,1,,,,,,X",
            "0002,B,MJ2,1,,,,,,Y",
            "0003,A,MJ3,1,,,,,,Z",
        ],
    );
    let (tables, _) = build_mapping_tables(&path).expect("build tables");
    assert_eq!(
        tables.hk_to_mj.iter().collect::<Vec<_>>(),
        vec![("A", "Z"), ("B", "Y")]
    );
    assert_eq!(
        tables.mj_to_hk.iter().collect::<Vec<_>>(),
        vec![("X", "A"), ("Y", "B"), ("Z", "A")]
    );
}

#[test]
fn generated_tables_load_as_conversion_tables() {
    let dir = TempDir::new().unwrap();
    let path = source_file(
        &dir,
        &[
            "0001,髙,MJ000002,1,9AD9,髙,,,9AD8,高",
            "0002,\"﨑\",MJ000003,1,,,,,5D0E,崎",
        ],
    );
    let mj_to_hk = dir.path().join("mj_to_hk.csv");
    let hk_to_mj = dir.path().join("hk_to_mj.csv");

    let summary = write_mapping_tables(&path, &mj_to_hk, &hk_to_mj).expect("write tables");
    assert_eq!(summary.source_rows, 2);
    assert_eq!(summary.mj_to_hk, 2);
    assert_eq!(summary.hk_to_mj, 2);

    assert_eq!(
        fs::read_to_string(&hk_to_mj).unwrap(),
        "\"髙\",\"髙\"\n\"﨑\",\"崎\"\n"
    );

    let table = load_conversion_table(&mj_to_hk, &SilentDiagnostics).expect("load table");
    assert_eq!(table.get("崎"), Some("﨑"));
}

#[test]
fn missing_column_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("source.csv");
    fs::write(&path, "HKCode,HKChar,UnicodeChar\n0001,漢,漢\n").unwrap();
    match build_mapping_tables(&path) {
        Err(IngestError::MissingColumn { column, .. }) => assert_eq!(column, "IVSChar"),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn missing_source_file() {
    let dir = TempDir::new().unwrap();
    let err = build_mapping_tables(&dir.path().join("missing.csv")).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}
