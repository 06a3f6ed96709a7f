//! Benchmark executable process management (launch/wait).

use std::io;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};

use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use crate::error::{Result, SweepError};
use crate::run::{ArtifactLayout, RunDescriptor};

/// Builds and spawns the executable's command line for a run.
#[derive(Debug, Clone)]
pub struct Launcher {
    /// Command prefix placed before the rank count, e.g. `["mpiexec", "-n"]`.
    pub launcher: Vec<String>,
    pub executable: PathBuf,
    pub generations: u32,
    pub layout: ArtifactLayout,
    /// Discard the child's stdout/stderr instead of inheriting them.
    pub quiet: bool,
    /// Send the child's stdout to our stderr, leaving stdout for the report.
    pub stdout_to_stderr: bool,
}

impl Launcher {
    /// Full argv for `run`, program first.
    ///
    /// With a prefix: `<prefix..> <ranks> <executable> <input> <generations>`.
    /// Without one: `<executable> <ranks> <input> <generations>`.
    pub fn command_line(&self, run: &RunDescriptor) -> Vec<String> {
        let exe = self.executable.to_string_lossy().into_owned();
        let ranks = run.ranks().to_string();
        let input = run.input_path(&self.layout).to_string_lossy().into_owned();
        let gens = self.generations.to_string();

        let mut argv = self.launcher.clone();
        if argv.is_empty() {
            argv.extend([exe, ranks]);
        } else {
            argv.extend([ranks, exe]);
        }
        argv.extend([input, gens]);
        argv
    }

    /// Starts the process for `run` without waiting on it.
    pub fn launch(&self, run: RunDescriptor) -> Result<ProcessHandle> {
        let argv = self.command_line(&run);
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| SweepError::Config("empty command line".into()))?;
        debug!(grid_size = run.grid_size, worker_count = run.worker_count, command = %argv.join(" "), "spawning");

        let mut cmd = Command::new(program);
        cmd.args(args).stdin(Stdio::null()).kill_on_drop(true);
        if self.quiet {
            cmd.stdout(Stdio::null()).stderr(Stdio::null());
        } else if self.stdout_to_stderr {
            cmd.stdout(io::stderr());
        }

        let child = cmd.spawn().map_err(|source| SweepError::Launch {
            grid_size: run.grid_size,
            worker_count: run.worker_count,
            program: program.clone(),
            source,
        })?;
        info!(grid_size = run.grid_size, worker_count = run.worker_count, pid = ?child.id(), "launched");

        Ok(ProcessHandle { run, child })
    }
}

/// A launched process. Consumed by [`ProcessHandle::await_completion`], the
/// only way to reach the completed state.
#[derive(Debug)]
pub struct ProcessHandle {
    run: RunDescriptor,
    child: Child,
}

/// A process that has exited, for any exit status.
#[derive(Debug, Clone, Copy)]
pub struct CompletedRun {
    pub run: RunDescriptor,
    pub status: ExitStatus,
}

impl ProcessHandle {
    pub fn run(&self) -> &RunDescriptor {
        &self.run
    }

    /// Blocks until the process exits. The exit code is only logged; missing
    /// output is detected when the artifacts are read.
    pub async fn await_completion(mut self) -> Result<CompletedRun> {
        let status = self.child.wait().await.map_err(|source| SweepError::Wait {
            grid_size: self.run.grid_size,
            worker_count: self.run.worker_count,
            source,
        })?;
        if status.success() {
            info!(grid_size = self.run.grid_size, worker_count = self.run.worker_count, "completed");
        } else {
            warn!(grid_size = self.run.grid_size, worker_count = self.run.worker_count, %status, "process exited unsuccessfully");
        }
        Ok(CompletedRun { run: self.run, status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn launcher(prefix: &[&str]) -> Launcher {
        Launcher {
            launcher: prefix.iter().map(|s| s.to_string()).collect(),
            executable: PathBuf::from("life_mpi"),
            generations: 100,
            layout: ArtifactLayout::new("in", "out", "bacteria"),
            quiet: true,
            stdout_to_stderr: false,
        }
    }

    #[test]
    fn command_line_with_mpi_prefix() {
        let argv = launcher(&["mpiexec", "-n"]).command_line(&RunDescriptor::new(10, 4));
        let input = PathBuf::from("in").join("bacteria10.txt").to_string_lossy().into_owned();
        assert_eq!(argv, vec!["mpiexec".to_string(), "-n".into(), "5".into(), "life_mpi".into(), input, "100".into()]);
    }

    #[test]
    fn command_line_without_prefix() {
        let argv = launcher(&[]).command_line(&RunDescriptor::new(15, 8));
        assert_eq!(argv[0], "life_mpi");
        assert_eq!(argv[1], "9");
        assert_eq!(argv[3], "100");
    }

    #[tokio::test]
    async fn missing_executable_fails_fast() {
        let mut l = launcher(&[]);
        l.executable = PathBuf::from("/definitely/not/here/life_mpi");
        let err = l.launch(RunDescriptor::new(10, 4)).unwrap_err();
        assert!(matches!(err, SweepError::Launch { grid_size: 10, worker_count: 4, .. }));
    }
}
