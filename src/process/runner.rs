/*!
 * Process Runner
 * Spawns OS child processes, tracks live children, and reaps them
 */

use super::types::{CommandSpec, ExitReport, ProcessError, ProcessResult};
use crate::core::types::Pid;
use dashmap::DashMap;
use log::{error, info, warn};
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// Reader threads draining a captured child's output pipes
///
/// Started at spawn time; a child that writes more than the pipe buffer
/// would otherwise block and wedge `wait`.
#[derive(Debug, Default)]
struct OutputDrains {
    stdout: Option<thread::JoinHandle<Vec<u8>>>,
    stderr: Option<thread::JoinHandle<Vec<u8>>>,
}

impl OutputDrains {
    fn start(child: &mut Child) -> Self {
        Self {
            stdout: child.stdout.take().map(Self::drain),
            stderr: child.stderr.take().map(Self::drain),
        }
    }

    fn drain<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<Vec<u8>> {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    }

    /// Join the reader threads and return what the child wrote
    fn finish(self) -> (Option<String>, Option<String>) {
        let join = |handle: Option<thread::JoinHandle<Vec<u8>>>| {
            handle
                .and_then(|h| h.join().ok())
                .map(|buf| String::from_utf8_lossy(&buf).into_owned())
        };
        (join(self.stdout), join(self.stderr))
    }
}

/// A spawned child the runner has not yet waited on or killed
#[derive(Debug)]
struct LiveChild {
    os_pid: u32,
    command: String,
    child: Child,
    started: Instant,
    drains: OutputDrains,
}

impl LiveChild {
    /// Consume the entry into a report once the child has been reaped
    fn into_report(self, pid: Pid, exit_code: i32) -> ExitReport {
        let wall_time_micros = self.started.elapsed().as_micros() as u64;
        let (stdout, stderr) = self.drains.finish();
        ExitReport {
            pid,
            os_pid: self.os_pid,
            command: self.command,
            exit_code,
            wall_time_micros,
            stdout,
            stderr,
        }
    }
}

/// Manages OS child process execution
///
/// Cloning shares the registry of live children.
pub struct ProcessRunner {
    children: Arc<DashMap<Pid, LiveChild>>,
    next_pid: Arc<AtomicU32>,
}

impl ProcessRunner {
    pub fn new() -> Self {
        info!("Process runner initialized");
        Self {
            children: Arc::new(DashMap::new()),
            next_pid: Arc::new(AtomicU32::new(1)),
        }
    }

    /// Spawn a new OS child process from the spec
    ///
    /// Returns the internal pid the child is registered under. On spawn
    /// failure nothing is registered.
    pub fn spawn(&self, spec: CommandSpec) -> ProcessResult<Pid> {
        validate_command(&spec.command)?;

        let mut cmd = Command::new(&spec.command);

        if !spec.args.is_empty() {
            cmd.args(&spec.args);
        }

        // Clean environment slate; only the spec's vars are visible
        cmd.env_clear();
        for (key, value) in &spec.env_vars {
            cmd.env(key, value);
        }

        if let Some(ref dir) = spec.working_dir {
            cmd.current_dir(dir);
        }

        // stdin is null either way so a child that reads it sees EOF
        if spec.capture_output {
            cmd.stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped());
        } else {
            cmd.stdin(Stdio::null())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit());
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| ProcessError::SpawnFailed(format!("{}: {}", spec.command, e)))?;

        // Drain piped output as it arrives so the child never blocks on a
        // full pipe while we hold its handle
        let drains = if spec.capture_output {
            OutputDrains::start(&mut child)
        } else {
            OutputDrains::default()
        };

        let pid = self.next_pid.fetch_add(1, Ordering::SeqCst);
        let os_pid = child.id();

        info!(
            "Spawned child process '{}' (pid: {}, OS pid: {})",
            spec.command, pid, os_pid
        );

        self.children.insert(
            pid,
            LiveChild {
                os_pid,
                command: spec.command,
                child,
                started: Instant::now(),
                drains,
            },
        );

        Ok(pid)
    }

    /// Block until the child exits and report its exit status
    ///
    /// A child that already exited still reports its stored status.
    pub fn wait(&self, pid: Pid) -> ProcessResult<ExitReport> {
        let (_, mut live) = self
            .children
            .remove(&pid)
            .ok_or(ProcessError::NotFound(pid))?;

        match live.child.wait() {
            Ok(status) => {
                let report = live.into_report(pid, status.code().unwrap_or(-1));
                info!(
                    "Child '{}' (pid: {}) exited with code {}",
                    report.command, pid, report.exit_code
                );
                Ok(report)
            }
            Err(e) => {
                error!("Failed to wait for child pid {}: {}", pid, e);
                Err(ProcessError::WaitFailed(e.to_string()))
            }
        }
    }

    /// Report the child's exit status if it has already exited
    ///
    /// Returns `Ok(None)` while the child is still running.
    pub fn try_wait(&self, pid: Pid) -> ProcessResult<Option<ExitReport>> {
        let status = {
            let mut entry = self
                .children
                .get_mut(&pid)
                .ok_or(ProcessError::NotFound(pid))?;
            match entry.child.try_wait() {
                Ok(status) => status,
                Err(e) => {
                    warn!("Error polling child pid {}: {}", pid, e);
                    return Err(ProcessError::WaitFailed(e.to_string()));
                }
            }
        };

        match status {
            Some(status) => {
                let (_, live) = self
                    .children
                    .remove(&pid)
                    .ok_or(ProcessError::NotFound(pid))?;
                Ok(Some(live.into_report(pid, status.code().unwrap_or(-1))))
            }
            None => Ok(None),
        }
    }

    /// Kill a running child, then reap it
    pub fn kill(&self, pid: Pid) -> ProcessResult<()> {
        let (_, mut live) = self
            .children
            .remove(&pid)
            .ok_or(ProcessError::NotFound(pid))?;

        match live.child.kill() {
            Ok(_) => {
                info!("Killed child pid {} (OS pid: {})", pid, live.os_pid);
                // Reap so the OS entry does not linger as a zombie, and let
                // the drain threads run to EOF
                let _ = live.child.wait();
                let _ = live.drains.finish();
                Ok(())
            }
            Err(e) => {
                error!("Failed to kill child pid {}: {}", pid, e);
                Err(ProcessError::WaitFailed(e.to_string()))
            }
        }
    }

    /// Spawn a child and wait for it to exit
    pub fn run(&self, spec: CommandSpec) -> ProcessResult<ExitReport> {
        let pid = self.spawn(spec)?;
        self.wait(pid)
    }

    /// Check if a child is still registered as live
    pub fn is_running(&self, pid: Pid) -> bool {
        self.children.contains_key(&pid)
    }

    /// Get the OS pid for an internal pid
    pub fn os_pid(&self, pid: Pid) -> Option<u32> {
        self.children.get(&pid).map(|c| c.os_pid)
    }

    /// Get count of live children
    pub fn count(&self) -> usize {
        self.children.len()
    }
}

/// Validate a command before handing it to the OS
fn validate_command(command: &str) -> ProcessResult<()> {
    if command.trim().is_empty() {
        return Err(ProcessError::InvalidCommand("Empty command".to_string()));
    }

    // Shell injection prevention
    let dangerous_chars = [';', '|', '&', '\n', '\r', '\0', '`', '$', '(', ')'];
    if dangerous_chars.iter().any(|&c| command.contains(c)) {
        return Err(ProcessError::Rejected(
            "Command contains dangerous characters".to_string(),
        ));
    }

    // Path traversal prevention
    if command.contains("..") {
        return Err(ProcessError::Rejected(
            "Command contains path traversal".to_string(),
        ));
    }

    Ok(())
}

impl Clone for ProcessRunner {
    fn clone(&self) -> Self {
        Self {
            children: Arc::clone(&self.children),
            next_pid: Arc::clone(&self.next_pid),
        }
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_simple_command() {
        let runner = ProcessRunner::new();
        let spec = CommandSpec::new("sleep").with_args(vec!["0.1".to_string()]);

        let pid = runner.spawn(spec).unwrap();
        assert!(runner.is_running(pid));
        assert!(runner.os_pid(pid).is_some());

        runner.kill(pid).ok();
    }

    #[test]
    fn test_dangerous_command_rejected() {
        let runner = ProcessRunner::new();
        let spec = CommandSpec::new("echo; rm -rf /");

        let result = runner.spawn(spec);
        assert!(matches!(result, Err(ProcessError::Rejected(_))));
        assert_eq!(runner.count(), 0);
    }

    #[test]
    fn test_empty_command_invalid() {
        let runner = ProcessRunner::new();
        let result = runner.spawn(CommandSpec::new("  "));
        assert!(matches!(result, Err(ProcessError::InvalidCommand(_))));
    }

    #[test]
    fn test_kill_removes_child() {
        let runner = ProcessRunner::new();
        let spec = CommandSpec::new("sleep").with_args(vec!["10".to_string()]);

        let pid = runner.spawn(spec).unwrap();
        assert!(runner.is_running(pid));

        runner.kill(pid).unwrap();
        assert!(!runner.is_running(pid));
        assert!(matches!(runner.wait(pid), Err(ProcessError::NotFound(_))));
    }

    #[test]
    fn test_run_reports_exit_code() {
        let runner = ProcessRunner::new();
        let report = runner.run(CommandSpec::new("true")).unwrap();

        assert_eq!(report.exit_code, 0);
        assert!(report.success());
        assert_eq!(runner.count(), 0);
    }
}
