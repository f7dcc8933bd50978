use std::io;

use super::{result::*, runner::RunMode, testcase::TestCase};
use crate::error::{Error, Result};

/// Decides whether one run of the subject passes.
pub trait VerdictPolicy {
    fn name(&self) -> &'static str;

    fn run_mode(&self) -> RunMode;

    /// Fixture checks that must hold before the subject is spawned.
    fn preflight(&self, _testcase: &TestCase) -> Result<()> {
        Ok(())
    }

    fn evaluate(&self, result: ExecutionResult, testcase: &TestCase) -> Result<Verdict>;
}

impl<P: VerdictPolicy + ?Sized> VerdictPolicy for Box<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn run_mode(&self) -> RunMode {
        (**self).run_mode()
    }

    fn preflight(&self, testcase: &TestCase) -> Result<()> {
        (**self).preflight(testcase)
    }

    fn evaluate(&self, result: ExecutionResult, testcase: &TestCase) -> Result<Verdict> {
        (**self).evaluate(result, testcase)
    }
}

/// Stdout must equal the answer file once both are trimmed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatch;

/// Any non-blank stdout or stderr counts as the subject having rejected the program.
///
/// This cannot tell a real diagnostic from unrelated noise; it only certifies that
/// something was emitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailureDetection;

impl ExactMatch {
    fn read_expected(testcase: &TestCase) -> Result<String> {
        fsutil::read_to_string(testcase.expected_output_path()).map_err(|e| match e {
            fsutil::Error::SingleIO(_, _, ref io_err) if io_err.kind() == io::ErrorKind::NotFound => {
                Error::MissingAnswer(testcase.test_id().to_owned())
            }
            e => e.into(),
        })
    }
}

impl VerdictPolicy for ExactMatch {
    fn name(&self) -> &'static str {
        "exact-match"
    }

    fn run_mode(&self) -> RunMode {
        RunMode::Strict
    }

    fn preflight(&self, testcase: &TestCase) -> Result<()> {
        if testcase.expected_output_path().exists() {
            Ok(())
        } else {
            Err(Error::MissingAnswer(testcase.test_id().to_owned()))
        }
    }

    fn evaluate(&self, result: ExecutionResult, testcase: &TestCase) -> Result<Verdict> {
        let expected = Self::read_expected(testcase)?;

        if result.stdout.trim() == expected.trim() {
            return Ok(Verdict::passed(testcase.test_id()));
        }
        Ok(Verdict::failed(testcase.test_id()).mismatch(Mismatch {
            expected,
            actual: result.stdout,
            stderr: result.stderr,
        }))
    }
}

impl VerdictPolicy for FailureDetection {
    fn name(&self) -> &'static str {
        "failure-detection"
    }

    fn run_mode(&self) -> RunMode {
        RunMode::Tolerant
    }

    fn evaluate(&self, result: ExecutionResult, testcase: &TestCase) -> Result<Verdict> {
        let reacted = !result.stdout.trim().is_empty() || !result.stderr.trim().is_empty();
        let verdict = if reacted {
            Verdict::passed(testcase.test_id()).reason("output detected")
        } else {
            Verdict::failed(testcase.test_id()).reason("no output detected")
        };
        Ok(verdict)
    }
}
