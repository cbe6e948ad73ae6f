//! # Suite Runner
//!
//! Executes every test of every case of every suite against the schema.
//!
//! Each test is validated, the outcome collapsed to valid/invalid, and
//! compared with the test's expectation. Results stream to a [`Reporter`]
//! in execution order and are also accumulated into a [`RunReport`].
//! A failing test never stops the run.

use serde::Serialize;
use serde_json::Value;

use crate::schema::{Schema, ValidationViolations};
use crate::suite::{Case, Suite, Test};

/// Whether a test's actual validity matched its expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Actual validity equals expected validity.
    Pass,
    /// Actual validity differs from expected validity.
    Fail,
}

impl Outcome {
    /// Classify an actual validity against an expected one.
    pub fn classify(expected_valid: bool, actual_valid: bool) -> Self {
        if expected_valid == actual_valid {
            Self::Pass
        } else {
            Self::Fail
        }
    }
}

/// Running pass and fail counters for a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    /// Tests whose outcome matched their expectation.
    pub passes: usize,
    /// Tests whose outcome did not match their expectation.
    pub failures: usize,
}

impl Tally {
    /// Count one outcome.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Pass => self.passes += 1,
            Outcome::Fail => self.failures += 1,
        }
    }

    /// Total number of tests counted.
    pub fn total(&self) -> usize {
        self.passes + self.failures
    }

    /// True iff no test failed.
    pub fn is_success(&self) -> bool {
        self.failures == 0
    }
}

/// Result of running one test.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    /// The test's description.
    pub description: String,
    /// Expected validity declared by the test.
    pub expected_valid: bool,
    /// Validity reported by the schema.
    pub actual_valid: bool,
    /// Pass iff `expected_valid == actual_valid`.
    pub outcome: Outcome,
    /// The value that was validated.
    pub data: Value,
    /// Violations reported when the value did not conform.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<ValidationViolations>,
}

/// Results of one case, in test order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseResult {
    /// The case's description.
    pub description: String,
    /// Per-test results.
    pub tests: Vec<TestResult>,
}

/// Results of one suite file, in case order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuiteResult {
    /// Suite name (file stem).
    pub suite: String,
    /// Per-case results.
    pub cases: Vec<CaseResult>,
}

/// Structured result of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    /// Per-suite results in execution order.
    pub suites: Vec<SuiteResult>,
    /// Aggregate counts.
    pub tally: Tally,
}

/// Receives run events in execution order.
///
/// `case_started` precedes the case's `test_finished` events, which precede
/// `case_finished`. `run_finished` is called once, after the last case.
pub trait Reporter {
    /// A case is about to run.
    fn case_started(&mut self, case: &Case);

    /// A test has been classified.
    fn test_finished(&mut self, test: &Test, result: &TestResult);

    /// All tests of a case have run.
    fn case_finished(&mut self, case: &Case);

    /// All suites have run.
    fn run_finished(&mut self, tally: &Tally);
}

/// Reporter that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn case_started(&mut self, _case: &Case) {}
    fn test_finished(&mut self, _test: &Test, _result: &TestResult) {}
    fn case_finished(&mut self, _case: &Case) {}
    fn run_finished(&mut self, _tally: &Tally) {}
}

/// Runs suites against a loaded schema.
#[derive(Debug, Clone, Copy)]
pub struct SuiteRunner<'a> {
    schema: &'a Schema,
}

impl<'a> SuiteRunner<'a> {
    /// Create a runner for `schema`.
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Validate one test's data and classify the outcome.
    ///
    /// Any violation, of any kind, makes the value invalid.
    pub fn run_test(&self, test: &Test) -> TestResult {
        let validation = self.schema.validate(&test.data);
        let actual_valid = validation.is_ok();
        let outcome = Outcome::classify(test.valid, actual_valid);

        tracing::trace!(
            test = %test.description,
            expected = test.valid,
            actual = actual_valid,
            ?outcome,
            "classified test"
        );

        TestResult {
            description: test.description.clone(),
            expected_valid: test.valid,
            actual_valid,
            outcome,
            data: test.data.clone(),
            violations: validation.err(),
        }
    }

    /// Run one case, streaming events to `reporter`.
    pub fn run_case(
        &self,
        case: &Case,
        tally: &mut Tally,
        reporter: &mut dyn Reporter,
    ) -> CaseResult {
        reporter.case_started(case);
        let mut tests = Vec::with_capacity(case.tests.len());
        for test in &case.tests {
            let result = self.run_test(test);
            tally.record(result.outcome);
            reporter.test_finished(test, &result);
            tests.push(result);
        }
        reporter.case_finished(case);

        CaseResult {
            description: case.description.clone(),
            tests,
        }
    }

    /// Run every suite in order and return the accumulated report.
    pub fn execute(&self, suites: &[Suite], reporter: &mut dyn Reporter) -> RunReport {
        let mut report = RunReport::default();
        for suite in suites {
            tracing::debug!(
                suite = %suite.path.display(),
                tests = suite.test_count(),
                "running suite"
            );
            let mut cases = Vec::with_capacity(suite.cases.len());
            for case in &suite.cases {
                cases.push(self.run_case(case, &mut report.tally, reporter));
            }
            report.suites.push(SuiteResult {
                suite: suite.name(),
                cases,
            });
        }
        reporter.run_finished(&report.tally);

        tracing::info!(
            passes = report.tally.passes,
            failures = report.tally.failures,
            "run complete"
        );
        report
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use std::path::PathBuf;

    fn string_schema() -> Schema {
        Schema::from_document("inline.json", serde_json::json!({"type": "string"}), None).unwrap()
    }

    fn data_value() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| serde_json::json!(n)),
            "[a-zA-Z0-9_ ]{0,20}".prop_map(Value::String),
        ]
    }

    fn case_strategy() -> impl Strategy<Value = Case> {
        prop::collection::vec((data_value(), any::<bool>()), 0..8).prop_map(|tests| Case {
            description: "generated".to_string(),
            tests: tests
                .into_iter()
                .enumerate()
                .map(|(i, (data, valid))| Test {
                    description: format!("test {i}"),
                    data,
                    valid,
                })
                .collect(),
        })
    }

    fn suites_strategy() -> impl Strategy<Value = Vec<Suite>> {
        prop::collection::vec(prop::collection::vec(case_strategy(), 0..4), 0..4).prop_map(
            |suites| {
                suites
                    .into_iter()
                    .enumerate()
                    .map(|(i, cases)| Suite {
                        path: PathBuf::from(format!("suite-{i}.json")),
                        cases,
                    })
                    .collect()
            },
        )
    }

    proptest! {
        /// Every test is counted exactly once.
        #[test]
        fn tally_total_equals_test_count(suites in suites_strategy()) {
            let schema = string_schema();
            let report = SuiteRunner::new(&schema).execute(&suites, &mut NullReporter);
            let expected: usize = suites.iter().map(Suite::test_count).sum();
            prop_assert_eq!(report.tally.total(), expected);
        }

        /// A test passes iff its expectation matches whether the data is a string.
        #[test]
        fn outcome_matches_expectation(data in data_value(), valid in any::<bool>()) {
            let schema = string_schema();
            let conforms = data.is_string();
            let result = SuiteRunner::new(&schema).run_test(&Test {
                description: "generated".to_string(),
                data,
                valid,
            });
            prop_assert_eq!(result.actual_valid, conforms);
            prop_assert_eq!(result.outcome == Outcome::Pass, valid == conforms);
        }

        /// Two runs over the same inputs classify every test identically.
        #[test]
        fn execute_is_idempotent(suites in suites_strategy()) {
            let schema = string_schema();
            let runner = SuiteRunner::new(&schema);
            let first = runner.execute(&suites, &mut NullReporter);
            let second = runner.execute(&suites, &mut NullReporter);
            prop_assert_eq!(first, second);
        }
    }
}
