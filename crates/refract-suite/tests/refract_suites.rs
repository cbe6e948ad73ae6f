//! Integration test: run the shipped conformance suites against the shipped
//! Refract schema. Every test in `refract-schema-tests/` must pass.

use refract_suite::{load_suites, NullReporter, Outcome, Schema, SuiteRunner};
use std::path::PathBuf;

/// Find the repository root.
fn repo_root() -> PathBuf {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.pop(); // crates/
    dir.pop(); // repo root
    dir
}

#[test]
fn shipped_schema_compiles() {
    let schema = Schema::load(repo_root().join("refract-schema.json"), None)
        .expect("Failed to load refract-schema.json");
    assert_eq!(
        schema.document()["$schema"],
        "http://json-schema.org/draft-07/schema#"
    );
}

#[test]
fn shipped_suites_all_pass() {
    let root = repo_root();
    let schema = Schema::load(root.join("refract-schema.json"), None)
        .expect("Failed to load refract-schema.json");
    let suites = load_suites(&root.join("refract-schema-tests"), ".json")
        .expect("Failed to load refract-schema-tests");

    assert!(
        suites.len() >= 3,
        "Expected at least 3 suite files, found {}",
        suites.len()
    );

    let report = SuiteRunner::new(&schema).execute(&suites, &mut NullReporter);

    let failed: Vec<String> = report
        .suites
        .iter()
        .flat_map(|s| {
            s.cases.iter().flat_map(move |c| {
                c.tests
                    .iter()
                    .filter(|t| t.outcome == Outcome::Fail)
                    .map(move |t| format!("{} / {} / {}", s.suite, c.description, t.description))
            })
        })
        .collect();

    assert!(
        failed.is_empty(),
        "{} of {} shipped tests failed:\n{}",
        failed.len(),
        report.tally.total(),
        failed.join("\n")
    );
    assert_eq!(
        report.tally.total(),
        suites.iter().map(|s| s.test_count()).sum::<usize>()
    );
}

#[test]
fn shipped_suites_cover_both_expectations() {
    let suites = load_suites(&repo_root().join("refract-schema-tests"), ".json")
        .expect("Failed to load refract-schema-tests");
    let tests: Vec<_> = suites
        .iter()
        .flat_map(|s| s.cases.iter())
        .flat_map(|c| c.tests.iter())
        .collect();
    assert!(tests.iter().any(|t| t.valid));
    assert!(tests.iter().any(|t| !t.valid));
}
