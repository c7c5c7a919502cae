use std::fmt::{Display, Formatter};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::logging;
use crate::model::Word;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchError {
    EmptyProgram,
    SpawnFailed { program: String, message: String },
}

impl Display for LaunchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyProgram => write!(f, "empty program name"),
            Self::SpawnFailed { program, message } => {
                write!(f, "failed to execute application {program}: {message}")
            }
        }
    }
}

impl std::error::Error for LaunchError {}

/// Receives the committed candidate. Results are not reported back.
pub trait InvocationSink {
    fn invoke(&mut self, program: &Word, args: &[String]);
}

/// Starts the program without waiting for it. Names are looked up in
/// `search_paths` first, in order, then through the process `PATH`.
#[derive(Debug, Default, Clone)]
pub struct ProcessLauncher {
    search_paths: Vec<PathBuf>,
}

impl ProcessLauncher {
    pub fn new(search_paths: Vec<PathBuf>) -> Self {
        Self { search_paths }
    }
}

impl InvocationSink for ProcessLauncher {
    fn invoke(&mut self, program: &Word, args: &[String]) {
        match launch_program_in(program.as_str(), args, &self.search_paths) {
            Ok(resolved) => logging::info(&format!(
                "launched program={program} resolved={}",
                resolved.display()
            )),
            Err(error) => logging::error(&format!("launch error: {error}")),
        }
    }
}

/// First `dir/name` that is a regular file, in search-path order. Falls back
/// to the bare name so the OS can still search `PATH`.
pub fn resolve_program(name: &str, search_paths: &[PathBuf]) -> PathBuf {
    search_paths
        .iter()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
        .unwrap_or_else(|| PathBuf::from(name))
}

pub fn launch_program(program: &str, args: &[String]) -> Result<(), LaunchError> {
    launch_program_in(program, args, &[]).map(|_| ())
}

pub fn launch_program_in(
    program: &str,
    args: &[String],
    search_paths: &[PathBuf],
) -> Result<PathBuf, LaunchError> {
    let trimmed = program.trim();
    if trimmed.is_empty() {
        return Err(LaunchError::EmptyProgram);
    }

    let resolved = resolve_program(trimmed, search_paths);
    Command::new(&resolved)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_child| resolved.clone())
        .map_err(|error| LaunchError::SpawnFailed {
            program: trimmed.to_string(),
            message: error.to_string(),
        })
}

/// Writes the program name instead of starting it (`--dry-run`). The runtime
/// points it at stderr so stdout stays renderer-only.
pub struct DryRunSink<W: Write> {
    out: W,
}

impl<W: Write> DryRunSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> InvocationSink for DryRunSink<W> {
    fn invoke(&mut self, program: &Word, args: &[String]) {
        logging::info(&format!("dry-run program={program} args={}", args.len()));
        let _ = writeln!(self.out, "{program}");
        let _ = self.out.flush();
    }
}

/// Keeps every invocation instead of running anything.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordingSink {
    pub invocations: Vec<(Word, Vec<String>)>,
}

impl InvocationSink for RecordingSink {
    fn invoke(&mut self, program: &Word, args: &[String]) {
        self.invocations.push((program.clone(), args.to_vec()));
    }
}
