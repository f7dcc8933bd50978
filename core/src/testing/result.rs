use std::time::Duration;

/// Everything observed from one run of the subject binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub execution_time: Duration,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum JudgeCode {
    Passed,
    Failed,
}

/// Expected vs. actual text, kept only so a human can diff them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub expected: String,
    pub actual: String,
    pub stderr: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub test_id: String,
    pub judge: JudgeCode,
    pub reason: Option<&'static str>,
    pub mismatch: Option<Mismatch>,
}

impl Verdict {
    pub const EXIT_PASSED: i32 = 0;
    pub const EXIT_FAILED: i32 = 1;

    pub fn passed(test_id: impl Into<String>) -> Self {
        Self {
            test_id: test_id.into(),
            judge: JudgeCode::Passed,
            reason: None,
            mismatch: None,
        }
    }

    pub fn failed(test_id: impl Into<String>) -> Self {
        Self {
            test_id: test_id.into(),
            judge: JudgeCode::Failed,
            reason: None,
            mismatch: None,
        }
    }

    pub fn reason(mut self, reason: &'static str) -> Self {
        self.reason = Some(reason);
        self
    }

    pub fn mismatch(mut self, mismatch: Mismatch) -> Self {
        self.mismatch = Some(mismatch);
        self
    }

    pub fn is_passed(&self) -> bool {
        self.judge == JudgeCode::Passed
    }

    pub fn exit_code(&self) -> i32 {
        match self.judge {
            JudgeCode::Passed => Self::EXIT_PASSED,
            JudgeCode::Failed => Self::EXIT_FAILED,
        }
    }
}
