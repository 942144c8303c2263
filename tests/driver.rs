use std::fs;

use sequoia::driver::{self, Config, Error};

fn config_in(dir: &tempfile::TempDir, input: &str) -> Config {
    let config = Config {
        input: dir.path().join("input.txt"),
        output: dir.path().join("output.txt"),
    };
    fs::write(&config.input, input).unwrap();
    config
}

#[test]
fn writes_both_phases() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir, "5 3 8 1 4 7 9\n5 8 4 3 1 7\n");

    let tree = driver::run(&config).unwrap();

    assert_eq!(
        fs::read_to_string(&config.output).unwrap(),
        "(8 L:(5 L:(4 L:(3 L:(1))) R:(7)) R:(9))\n(9)\n"
    );
    assert_eq!(tree.to_string(), "(9)");
    assert_eq!(tree.size(), 7);
}

#[test]
fn removing_everything_renders_empty() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir, "2 1 3\n1 2 3\n");

    driver::run(&config).unwrap();

    assert_eq!(
        fs::read_to_string(&config.output).unwrap(),
        "(3 L:(2 L:(1)))\nempty\n"
    );
}

#[test]
fn absent_removals_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir, "1 2 3 4 5 6 7 8\n42 -1\n");

    driver::run(&config).unwrap();

    let output = fs::read_to_string(&config.output).unwrap();
    let lines: Vec<_> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], lines[1]);
    assert_eq!(
        lines[0],
        "(1 R:(2 R:(3 R:(4 R:(5 R:(6 R:(7 R:(8))))))))"
    );
}

#[test]
fn missing_input_is_reported_before_touching_the_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        input: dir.path().join("nope.txt"),
        output: dir.path().join("output.txt"),
    };

    match driver::run(&config) {
        Err(Error::ResourceUnavailable { path, .. }) => assert_eq!(path, config.input),
        other => panic!("expected ResourceUnavailable, got {:?}", other),
    }
    assert!(!config.output.exists());
}

#[test]
fn unwritable_output_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(&dir, "1\n\n");
    config.output = dir.path().join("missing-dir").join("output.txt");

    match driver::run(&config) {
        Err(Error::ResourceUnavailable { path, .. }) => assert_eq!(path, config.output),
        other => panic!("expected ResourceUnavailable, got {:?}", other),
    }
}
