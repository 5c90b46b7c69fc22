///
/// End-to-end CLI test: runs the `sortmerge` binary against fixture input
/// files and checks the sorted/merged output on disk, covering the
/// literal two-file scenario from the sort/merge exercise.
///
use std::fs;
use std::process::Command;

#[test]
fn two_files_sort_and_merge_within_budget() {
    let bin = env!("CARGO_BIN_EXE_sortmerge");
    let tmp = tempfile::tempdir().expect("failed to create tempdir");

    let a = tmp.path().join("a.txt");
    let b = tmp.path().join("b.txt");
    fs::write(&a, "3 1 2").unwrap();
    fs::write(&b, "6 5 4").unwrap();

    let output = Command::new(bin)
        .current_dir(tmp.path())
        .args(["2000", &a.to_string_lossy(), &b.to_string_lossy()])
        .output()
        .expect("failed to run sortmerge");

    assert!(
        output.status.success(),
        "sortmerge failed:\nstdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr),
    );

    let sorted_a = fs::read_to_string(format!("{}.sorted", a.display())).unwrap();
    let sorted_b = fs::read_to_string(format!("{}.sorted", b.display())).unwrap();
    assert_eq!(sorted_a.split_whitespace().collect::<Vec<_>>(), vec!["1", "2", "3"]);
    assert_eq!(sorted_b.split_whitespace().collect::<Vec<_>>(), vec!["4", "5", "6"]);

    let merged = fs::read_to_string(tmp.path().join("result.txt")).unwrap();
    assert_eq!(merged.split_whitespace().collect::<Vec<_>>(), vec!["1", "2", "3", "4", "5", "6"]);
}

#[test]
fn rejects_non_integer_input() {
    let bin = env!("CARGO_BIN_EXE_sortmerge");
    let tmp = tempfile::tempdir().expect("failed to create tempdir");

    let bad = tmp.path().join("bad.txt");
    fs::write(&bad, "1 two 3").unwrap();

    let output = Command::new(bin)
        .current_dir(tmp.path())
        .args(["1000", &bad.to_string_lossy()])
        .output()
        .expect("failed to run sortmerge");

    assert!(!output.status.success());
}
