use encoding_rs::EUC_KR;
use population_dashboard::config::DEFAULT_CSV_FILE;
use population_dashboard::data::{
    DataLoader, DataOrigin, LoaderError, TextEncoding, UploadedFile,
};
use std::fs;

const POPULATION_CSV: &str = "\
행정구역,2025년09월_총인구수,2025년09월_세대수,2025년09월_세대당 인구
서울특별시  (1100000000),9386034,4473563,2.10
부산광역시  (2600000000),3266598,1575183,2.07
대구광역시  (2700000000),2364547,1086789,2.18
";

#[test]
fn cp949_file_matches_utf8_shape() {
    let (cp949, _, had_errors) = EUC_KR.encode(POPULATION_CSV);
    assert!(!had_errors);

    let loader = DataLoader::new("missing.csv");
    let utf8 = loader
        .load(Some(&UploadedFile::new("utf8.csv", POPULATION_CSV.as_bytes().to_vec())))
        .expect("utf-8 load");
    let fallback = loader
        .load(Some(&UploadedFile::new("cp949.csv", cp949.into_owned())))
        .expect("cp949 load");

    assert_eq!(utf8.encoding(), TextEncoding::Utf8);
    assert_eq!(fallback.encoding(), TextEncoding::Cp949);
    assert_eq!(fallback.row_count(), utf8.row_count());
    assert_eq!(fallback.column_count(), utf8.column_count());
    assert_eq!(fallback.columns(), utf8.columns());
}

#[test]
fn default_file_is_used_without_upload() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(DEFAULT_CSV_FILE);
    fs::write(&path, POPULATION_CSV).expect("write csv");

    let dataset = DataLoader::new(&path).load(None).expect("default load");
    assert_eq!(dataset.origin(), &DataOrigin::LocalFile(path.clone()));
    assert_eq!(dataset.row_count(), 3);
    assert_eq!(dataset.column_count(), 4);
}

#[test]
fn default_cp949_file_falls_back() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(DEFAULT_CSV_FILE);
    let (cp949, _, _) = EUC_KR.encode(POPULATION_CSV);
    fs::write(&path, &cp949).expect("write csv");

    let dataset = DataLoader::new(&path).load(None).expect("default load");
    assert_eq!(dataset.encoding(), TextEncoding::Cp949);
    assert_eq!(dataset.columns()[0], "행정구역");
}

#[test]
fn upload_wins_over_existing_default() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(DEFAULT_CSV_FILE);
    fs::write(&path, POPULATION_CSV).expect("write csv");

    let upload = UploadedFile::new("mine.csv", b"a,b\n1,2\n".to_vec());
    let dataset = DataLoader::new(&path).load(Some(&upload)).expect("upload load");
    assert_eq!(dataset.origin(), &DataOrigin::Uploaded("mine.csv".to_string()));
    assert_eq!(dataset.columns(), vec!["a", "b"]);
}

#[test]
fn nothing_to_load_reports_no_data_source() {
    let dir = tempfile::tempdir().expect("tempdir");
    let loader = DataLoader::new(dir.path().join(DEFAULT_CSV_FILE));
    assert!(matches!(loader.load(None), Err(LoaderError::NoDataSource)));
}

#[test]
fn uploaded_file_reads_name_and_bytes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("인구.csv");
    fs::write(&path, POPULATION_CSV).expect("write csv");

    let upload = UploadedFile::from_path(&path).expect("read upload");
    assert_eq!(upload.name, "인구.csv");
    assert_eq!(upload.bytes, POPULATION_CSV.as_bytes());
}

#[test]
fn double_decode_failure_is_structured() {
    let upload = UploadedFile::new("broken.csv", b"x,y\n\xFF,1\n".to_vec());
    let err = DataLoader::new("missing.csv")
        .load(Some(&upload))
        .expect_err("must fail both encodings");
    assert!(matches!(err, LoaderError::Undecodable { .. }));
    assert!(err.to_string().contains("cp949"));
}
