//! End-to-end import tests against real files on disk.

use domain_tally::{CustomerExporter, CustomerImporter, DomainData, ImportError, ImportOptions};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_input(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn import(path: &Path) -> Result<Vec<DomainData>, ImportError> {
    CustomerImporter::new(path).import_domain_data()
}

fn pairs(data: &[DomainData]) -> Vec<(&[u8], u64)> {
    data.iter()
        .map(|d| (d.domain.as_slice(), d.customer_quantity))
        .collect()
}

#[test]
fn test_scenario_basic_counts() {
    let dir = TempDir::new().unwrap();
    let path = write_input(
        &dir,
        "customers.csv",
        "first_name,last_name,email,gender,ip_address\n1,Foo,a@example.com\n2,Bar,b@example.com\n3,Baz,c@other.com\n",
    );

    let data = import(&path).unwrap();
    assert_eq!(pairs(&data), vec![(b"example.com".as_slice(), 2), (b"other.com".as_slice(), 1)]);
}

#[test]
fn test_scenario_malformed_rows_contribute_nothing() {
    let dir = TempDir::new().unwrap();
    let path = write_input(
        &dir,
        "customers.csv",
        "id,name,email\n1,Foo,a@example.com\n4,Bad,noatsign\n5,Bad2,@nolocal.com\n6,Bad3,trailing@\n7,Qux,d@other.com\n8,Quux,e@example.com\n",
    );

    let data = import(&path).unwrap();
    assert_eq!(pairs(&data), vec![(b"example.com".as_slice(), 2), (b"other.com".as_slice(), 1)]);
}

#[test]
fn test_scenario_ten_thousand_rows() {
    let dir = TempDir::new().unwrap();
    let mut contents = String::from("first_name,last_name,email,gender,ip_address\n");
    for i in 0..10_000 {
        contents.push_str(&format!(
            "First{i},Last{i},user{i}@domain{:03}.example,Female,10.0.0.{}\n",
            (i * 7) % 100,
            i % 255
        ));
    }
    let path = write_input(&dir, "large.csv", &contents);

    let data = import(&path).unwrap();
    assert_eq!(data.len(), 100);
    assert!(data.windows(2).all(|w| w[0].domain < w[1].domain));
    assert_eq!(data.iter().map(|d| d.customer_quantity).sum::<u64>(), 10_000);
    assert!(data.iter().all(|d| d.customer_quantity == 100));
}

#[test]
fn test_latin1_file_round_trips_bytes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("latin1.csv");
    fs::write(&path, b"id,name,email\n1,a,x@caf\xe9.com\n2,b,y@caf\xe9.com\n3,c,z@ok.com\n").unwrap();
    let out = dir.path().join("report.csv");

    let data = import(&path).unwrap();
    assert_eq!(
        pairs(&data),
        vec![(b"caf\xe9.com".as_slice(), 2), (b"ok.com".as_slice(), 1)]
    );

    CustomerExporter::new(&out).export_data(&data).unwrap();
    assert_eq!(
        fs::read(&out).unwrap(),
        b"domain,number_of_customers\ncaf\xe9.com,2\nok.com,1\n"
    );
}

#[test]
fn test_zero_line_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = write_input(&dir, "empty.csv", "");

    match import(&path) {
        Err(ImportError::EmptyInput { path: reported }) => assert_eq!(reported, path),
        other => panic!("expected EmptyInput, got {other:?}"),
    }
}

#[test]
fn test_header_only_file_is_empty_success() {
    let dir = TempDir::new().unwrap();
    let path = write_input(&dir, "header.csv", "first_name,last_name,email\n");

    assert!(import(&path).unwrap().is_empty());
}

#[test]
fn test_rescan_is_identical() {
    let dir = TempDir::new().unwrap();
    let path = write_input(
        &dir,
        "customers.csv",
        "id,name,email\n1,a,x@b.com\n2,b,y@a.com\n3,c,z@c.com\n4,d,w@a.com\n",
    );
    let out_a = dir.path().join("a.csv");
    let out_b = dir.path().join("b.csv");

    CustomerExporter::new(&out_a)
        .export_data(&import(&path).unwrap())
        .unwrap();
    CustomerExporter::new(&out_b)
        .export_data(&import(&path).unwrap())
        .unwrap();

    assert_eq!(fs::read(&out_a).unwrap(), fs::read(&out_b).unwrap());
}

#[test]
fn test_export_reads_back() {
    let dir = TempDir::new().unwrap();
    let path = write_input(
        &dir,
        "customers.csv",
        "id,name,email\n1,a,x@360.cn\n2,b,y@github.io\n3,c,z@github.io\n",
    );
    let out = dir.path().join("report.csv");

    let data = import(&path).unwrap();
    CustomerExporter::new(&out).export_data(&data).unwrap();

    let mut reader = csv::Reader::from_path(&out).unwrap();
    assert_eq!(
        reader.headers().unwrap().iter().collect::<Vec<_>>(),
        vec!["domain", "number_of_customers"]
    );
    let read_back: Vec<DomainData> = reader
        .deserialize::<DomainData>()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(read_back, data);
}

#[test]
fn test_sharded_file_import_matches_sequential() {
    let dir = TempDir::new().unwrap();
    let mut contents = String::from("id,name,email\n");
    for i in 0..5_000 {
        contents.push_str(&format!("{i},n,u{i}@d{}.org\n", i % 13));
        if i % 17 == 0 {
            contents.push_str(&format!("{i},no-email\n"));
        }
    }
    let path = write_input(&dir, "customers.csv", &contents);

    let sequential = import(&path).unwrap();
    let sharded = CustomerImporter::new(&path)
        .with_options(ImportOptions {
            workers: Some(4),
            batch_lines: 333,
            ..ImportOptions::default()
        })
        .import_domain_data()
        .unwrap();

    assert_eq!(sharded, sequential);
    assert_eq!(sequential.len(), 13);
}
