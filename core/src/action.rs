use std::path::PathBuf;

use crate::error::Result;
use crate::report;
use crate::testing::{FixtureLayout, SubjectRunner, Verdict, VerdictPolicy};

/// Resolve → run → evaluate, for one test file.
#[derive(Debug, Clone)]
pub struct TestPipeline<P> {
    layout: FixtureLayout,
    runner: SubjectRunner,
    policy: P,
}

impl<P: VerdictPolicy> TestPipeline<P> {
    pub fn new(layout: FixtureLayout, binary: impl Into<PathBuf>, policy: P) -> Self {
        let runner = SubjectRunner::new(binary).mode(policy.run_mode());
        Self {
            layout,
            runner,
            policy,
        }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn runner(&self) -> &SubjectRunner {
        &self.runner
    }

    pub async fn run(&self, test_file: &str) -> Result<Verdict> {
        self.runner.ensure_executable()?;

        let testcase = self.layout.resolve(test_file);
        self.policy.preflight(&testcase)?;

        let result = self.runner.run(&testcase).await?;
        let verdict = self.policy.evaluate(result, &testcase)?;

        log::debug!(
            "Test {} judged {} by {}",
            verdict.test_id,
            verdict.judge,
            self.policy.name()
        );
        Ok(verdict)
    }
}

/// Runs the pipeline, prints the outcome and returns the process exit code.
pub async fn do_test<P: VerdictPolicy>(pipeline: &TestPipeline<P>, test_file: &str) -> i32 {
    let outcome = pipeline.run(test_file).await;
    report::print_outcome(&outcome);
    self::exit_code(&outcome)
}

/// 0 only for a passed verdict; errors count as failures.
pub fn exit_code(outcome: &Result<Verdict>) -> i32 {
    match outcome {
        Ok(verdict) => verdict.exit_code(),
        Err(_) => Verdict::EXIT_FAILED,
    }
}
