//! External command execution.
//!
//! Build tools are opaque to the installer: a command either succeeds or it
//! doesn't, and whatever it prints is forwarded line by line to a sink.

use std::env;
use std::ffi::OsString;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("{program}: not found")]
    NotFound { program: String },

    #[error("{program}: nonzero exit ({})", exit_code(.code))]
    NonZeroExit { program: String, code: Option<i32> },

    #[error("{program}: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

fn exit_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {code}"),
        None => "terminated by signal".to_string(),
    }
}

/// Runs external programs on behalf of the install pipeline.
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` inside `cwd`, handing every output line
    /// (stdout and stderr) to `sink` as it arrives.
    fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: &Path,
        sink: &mut dyn FnMut(&str),
    ) -> Result<(), CommandError>;

    /// Cheap probe: is `program` resolvable on the execution path?
    fn exists(&self, program: &str) -> bool;
}

/// Runner backed by real subprocesses.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: &Path,
        sink: &mut dyn FnMut(&str),
    ) -> Result<(), CommandError> {
        info!("Running {} {:?} in {:?}", program, args, cwd);

        let mut child = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => CommandError::NotFound {
                    program: program.to_string(),
                },
                _ => CommandError::Io {
                    program: program.to_string(),
                    source: e,
                },
            })?;

        let (tx, rx) = mpsc::channel();
        let mut readers = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            readers.push(forward_lines(stdout, tx.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(forward_lines(stderr, tx.clone()));
        }
        // Receiver ends once both reader threads drop their senders
        drop(tx);

        for line in rx {
            debug!(tool = program, "{}", line);
            sink(&line);
        }
        for reader in readers {
            let _ = reader.join();
        }

        let status = child.wait().map_err(|e| CommandError::Io {
            program: program.to_string(),
            source: e,
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(CommandError::NonZeroExit {
                program: program.to_string(),
                code: status.code(),
            })
        }
    }

    fn exists(&self, program: &str) -> bool {
        let path = env::var_os("PATH").unwrap_or_default();
        let entries = env::split_paths(&path).collect::<Vec<_>>();
        find_in_paths(program, &entries).is_some()
    }
}

/// Forward every line of `stream` until EOF. Lines are decoded lossily and
/// the pipe is drained even after the receiver is gone, so the child never
/// sees a closed pipe.
fn forward_lines<R>(stream: R, tx: mpsc::Sender<String>) -> thread::JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut reader = BufReader::new(stream);
        let mut buf = Vec::new();
        let mut receiver_alive = true;
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    if receiver_alive {
                        let line = String::from_utf8_lossy(&buf);
                        let line = line.trim_end_matches(['\r', '\n']).to_string();
                        receiver_alive = tx.send(line).is_ok();
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }
    })
}

/// Locate `program` in the given search directories.
///
/// A name containing a path separator is checked as-is. On Windows each
/// `PATHEXT` extension is tried as well.
pub fn find_in_paths(program: &str, entries: &[PathBuf]) -> Option<PathBuf> {
    if program.is_empty() {
        return None;
    }

    let direct = Path::new(program);
    if direct.components().count() > 1 {
        return direct.is_file().then(|| direct.to_path_buf());
    }

    let extensions = executable_extensions();
    for dir in entries {
        for ext in &extensions {
            let mut name = OsString::from(program);
            name.push(ext);
            let candidate = dir.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }
    None
}

fn executable_extensions() -> Vec<OsString> {
    let mut exts = vec![OsString::new()];
    if cfg!(windows) {
        let pathext = env::var("PATHEXT").unwrap_or_else(|_| ".COM;.EXE;.BAT;.CMD".to_string());
        exts.extend(
            pathext
                .split(';')
                .filter(|e| !e.is_empty())
                .map(|e| OsString::from(e.to_ascii_lowercase())),
        );
    }
    exts
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn find_in_paths_returns_first_match() {
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        fs::write(second.path().join("gotool"), b"").unwrap();

        let entries = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        assert_eq!(
            find_in_paths("gotool", &entries),
            Some(second.path().join("gotool"))
        );
    }

    #[test]
    fn find_in_paths_ignores_directories_and_empty_names() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("dotnet")).unwrap();

        let entries = vec![dir.path().to_path_buf()];
        assert_eq!(find_in_paths("dotnet", &entries), None);
        assert_eq!(find_in_paths("", &entries), None);
    }

    #[test]
    fn missing_program_reports_not_found() {
        let dir = tempdir().unwrap();
        let err = SystemCommandRunner
            .run(
                "definitely-not-a-real-build-tool-7f3a",
                &[],
                dir.path(),
                &mut |_| {},
            )
            .unwrap_err();
        assert!(matches!(err, CommandError::NotFound { .. }));
        assert!(err.to_string().contains("not found"));
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_is_an_error_and_output_reaches_sink() {
        let dir = tempdir().unwrap();
        let mut lines = Vec::new();
        let err = SystemCommandRunner
            .run(
                "sh",
                &["-c", "echo building; echo oops >&2; exit 3"],
                dir.path(),
                &mut |line| lines.push(line.to_string()),
            )
            .unwrap_err();

        assert!(matches!(
            err,
            CommandError::NonZeroExit { code: Some(3), .. }
        ));
        assert!(err.to_string().contains("nonzero exit"));
        lines.sort();
        assert_eq!(lines, vec!["building".to_string(), "oops".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_output_is_decoded_and_fully_forwarded() {
        let dir = tempdir().unwrap();
        let mut lines = Vec::new();
        SystemCommandRunner
            .run(
                "sh",
                &["-c", "printf 'G\\351n\\351ration\\r\\n'; seq 1 20000; echo done"],
                dir.path(),
                &mut |line| lines.push(line.to_string()),
            )
            .unwrap();

        assert_eq!(lines.len(), 20002);
        assert_eq!(lines[0], "G\u{fffd}n\u{fffd}ration");
        assert_eq!(lines[1], "1");
        assert_eq!(lines[20000], "20000");
        assert_eq!(lines[20001], "done");
    }

    #[cfg(unix)]
    #[test]
    fn successful_command_runs_in_working_directory() {
        let dir = tempdir().unwrap();
        SystemCommandRunner
            .run("sh", &["-c", "touch marker"], dir.path(), &mut |_| {})
            .unwrap();
        assert!(dir.path().join("marker").exists());
    }
}
