use std::{
    io,
    path::{Component, Path, PathBuf},
    process::{ExitStatus, Stdio},
};

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    process::{Child, Command},
};

use super::{result::*, testcase::*};
use crate::error::{Error, ExitStatusDesc, Result};

/// How the runner treats an unsuccessful exit of the subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Non-zero exit is a harness error; the test cannot be judged.
    Strict,
    /// Any exit status is handed to the policy.
    Tolerant,
}

#[derive(Debug, Clone)]
pub struct SubjectRunner {
    binary: PathBuf,
    mode: RunMode,
}

impl SubjectRunner {
    /// Where the subject is expected relative to the directory holding the harness.
    pub const DEFAULT_RELPATH: &str = "../../../build/paraCL";

    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: Self::pin_bare_name(binary.into()),
            mode: RunMode::Strict,
        }
    }

    /// `Command` looks a single-component path up in `$PATH`; `./name` always runs the file
    /// that `ensure_executable` checked.
    fn pin_bare_name(binary: PathBuf) -> PathBuf {
        let mut components = binary.components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Path::new(".").join(binary),
            _ => binary,
        }
    }

    pub fn mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn default_binary_path(harness_dir: impl AsRef<Path>) -> PathBuf {
        fsutil::normalize_path(harness_dir.as_ref().join(Self::DEFAULT_RELPATH))
    }

    pub fn get_binary(&self) -> &Path {
        &self.binary
    }

    pub fn get_mode(&self) -> RunMode {
        self.mode
    }

    pub fn ensure_executable(&self) -> Result<()> {
        if fsutil::is_executable_file(&self.binary) {
            Ok(())
        } else {
            Err(Error::SubjectNotExecutable(self.binary.clone()))
        }
    }

    fn command_line(&self, testcase: &TestCase) -> String {
        format!(
            "{} {}",
            self.binary.to_string_lossy(),
            testcase.source_path().to_string_lossy()
        )
    }

    /// Spawns the subject once. Callers check [`Self::ensure_executable`] beforehand.
    pub async fn run(&self, testcase: &TestCase) -> Result<ExecutionResult> {
        let input = testcase.read_input()?;
        let cmdline = self.command_line(testcase);
        let test_id = testcase.test_id();

        log::info!("Running: {}", cmdline);

        let child = Command::new(&self.binary)
            .arg(testcase.source_path())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::Spawn {
                test_id: test_id.to_owned(),
                command: cmdline.clone(),
                source: e,
            })?;
        let mut child = ChildGuard::new(child);

        let start_at = tokio::time::Instant::now();
        let (status, stdout_buf, stderr_buf) = child
            .communicate(&input)
            .await
            .map_err(|e| Error::Communicate {
                test_id: test_id.to_owned(),
                source: e,
            })?;
        let execution_time = start_at.elapsed();

        log::debug!(
            "Subject finished: status={:?} [{}ms]",
            status.code(),
            execution_time.as_millis()
        );

        let result = ExecutionResult {
            stdout: String::from_utf8_lossy(&stdout_buf).into(),
            stderr: String::from_utf8_lossy(&stderr_buf).into(),
            exit_code: status.code(),
            execution_time,
        };

        if self.mode == RunMode::Strict && !status.success() {
            return Err(Error::SubjectFailed {
                test_id: test_id.to_owned(),
                command: cmdline,
                status: ExitStatusDesc::from_code(status.code()),
                stderr: result.stderr,
            });
        }
        Ok(result)
    }
}

/// Owns the child for the duration of one run.
/// If dropped before the child was reaped (an error on any pipe, or the future being dropped),
/// the child is killed; `kill_on_drop` leaves the reaping to the runtime.
struct ChildGuard {
    child: Child,
}

impl ChildGuard {
    fn new(child: Child) -> Self {
        Self { child }
    }

    /// Feeds `input` to stdin, closes it, and collects stdout/stderr until the child exits.
    async fn communicate(&mut self, input: &[u8]) -> io::Result<(ExitStatus, Vec<u8>, Vec<u8>)> {
        let mut stdin = self.child.stdin.take().ok_or_else(|| closed_pipe("stdin"))?;
        let mut stdout = self.child.stdout.take().ok_or_else(|| closed_pipe("stdout"))?;
        let mut stderr = self.child.stderr.take().ok_or_else(|| closed_pipe("stderr"))?;

        let fut_stdin = async move {
            let res = stdin.write_all(input).await;
            drop(stdin); // NOTE: the subject sees EOF only once stdin is closed
            match res {
                // The subject is allowed to exit without consuming its input.
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
                res => res,
            }
        };

        let mut stdout_buf = Vec::new();
        let mut stderr_buf = Vec::new();
        let fut_stdout = stdout.read_to_end(&mut stdout_buf);
        let fut_stderr = stderr.read_to_end(&mut stderr_buf);

        let (_, _, _) = tokio::try_join!(fut_stdin, fut_stdout, fut_stderr)?;
        let status = self.child.wait().await?;
        Ok((status, stdout_buf, stderr_buf))
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if let Ok(None) = self.child.try_wait() {
            log::warn!("Killing unfinished subject process");
            self.child
                .start_kill()
                .unwrap_or_else(|e| log::warn!("Failed to kill subject process: {:#}", e));
        }
    }
}

fn closed_pipe(name: &str) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("Failed to open {}", name))
}
