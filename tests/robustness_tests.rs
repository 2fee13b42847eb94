use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_malformed_catalog_rows_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = dir.path().join("catalog.csv");
    let mut wtr = csv::Writer::from_path(&catalog).unwrap();
    wtr.write_record(["id", "name", "description", "price", "category", "image_url"])
        .unwrap();

    // Valid product
    wtr.write_record(["1", "Rice", "", "1.20", "groceries", ""]).unwrap();
    // Negative price
    wtr.write_record(["2", "Bad", "", "-1.00", "groceries", ""]).unwrap();
    // Unknown category
    wtr.write_record(["3", "Toy", "", "5.00", "toys", ""]).unwrap();
    // Non-numeric id
    wtr.write_record(["abc", "Soap", "", "1.00", "personal-care", ""]).unwrap();
    // Blank name
    wtr.write_record(["5", " ", "", "1.00", "groceries", ""]).unwrap();
    // Valid product again
    wtr.write_record(["6", "Beans", "", "0.90", "groceries", ""]).unwrap();
    wtr.flush().unwrap();
    drop(wtr);

    let mut cmd = Command::new(cargo_bin!("omnistore"));
    cmd.arg("products").arg("--catalog").arg(&catalog);

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("skipping catalog row"))
        .stdout(predicate::str::contains("1,Rice,groceries,1.20"))
        .stdout(predicate::str::contains("6,Beans,groceries,0.90"))
        .stdout(predicate::str::contains("Bad").not())
        .stdout(predicate::str::contains("Toy").not());
}

#[test]
fn test_missing_catalog_file() {
    let mut cmd = Command::new(cargo_bin!("omnistore"));
    cmd.args(["products", "--catalog", "tests/fixtures/does_not_exist.csv"]);

    cmd.assert().failure();
}
