use std::io::BufRead;
use std::path::PathBuf;

use crate::action_executor::{DryRunSink, InvocationSink, ProcessLauncher};
use crate::candidate_store::CandidateStore;
use crate::config::{self, Config, ConfigError};
use crate::contract::SessionOutcome;
use crate::discovery::FileSystemSource;
use crate::keys::KeyScript;
use crate::logging;
use crate::render::{JsonRenderer, RenderSink, TextRenderer};
use crate::session::{InputSession, KeyEvent, SessionSignal};

pub const USAGE: &str = "usage: rex [--config <path>] [--max-suggestions <n>] [--path <dir>]... [--json] [--dry-run] [--verbose]

Reads key events from stdin, one per line: plain text is typed as-is,
<bs> <up> <down> <enter> <esc> are special keys.";

#[derive(Debug)]
pub enum RuntimeError {
    Config(ConfigError),
    Io(std::io::Error),
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(error) => write!(f, "config error: {error}"),
            Self::Io(error) => write!(f, "io error: {error}"),
        }
    }
}

impl std::error::Error for RuntimeError {}

impl From<ConfigError> for RuntimeError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<std::io::Error> for RuntimeError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    pub config_path: Option<PathBuf>,
    pub max_suggestions: Option<u16>,
    pub search_paths: Vec<PathBuf>,
    pub json: bool,
    pub dry_run: bool,
    pub verbose: bool,
    pub show_help: bool,
}

pub fn parse_cli_args(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let value = iter.next().ok_or("--config requires a path")?;
                options.config_path = Some(PathBuf::from(value));
            }
            "--max-suggestions" => {
                let value = iter.next().ok_or("--max-suggestions requires a number")?;
                let parsed = value
                    .parse::<u16>()
                    .map_err(|_| format!("invalid --max-suggestions value: {value}"))?;
                options.max_suggestions = Some(parsed);
            }
            "--path" => {
                let value = iter.next().ok_or("--path requires a directory")?;
                options.search_paths.push(PathBuf::from(value));
            }
            "--json" => options.json = true,
            "--dry-run" => options.dry_run = true,
            "--verbose" | "-v" => options.verbose = true,
            "--help" | "-h" => options.show_help = true,
            other => return Err(format!("unknown argument: {other}\n{USAGE}")),
        }
    }

    Ok(options)
}

/// Loads config and applies command-line overrides on top of it.
pub fn resolve_config(options: &CliOptions) -> Result<Config, RuntimeError> {
    let mut config = config::read(options.config_path.as_deref())?;
    if let Some(max) = options.max_suggestions {
        config.max_suggestions = max;
    }
    if !options.search_paths.is_empty() {
        config.search_paths = options.search_paths.clone();
    }
    config::validate(&config).map_err(ConfigError::Invalid)?;
    Ok(config)
}

pub fn run_with_options(options: CliOptions) -> Result<(), RuntimeError> {
    if options.show_help {
        println!("{USAGE}");
        return Ok(());
    }

    let config = resolve_config(&options)?;

    logging::set_stderr_mirror(options.verbose);
    match logging::init(&config.log_dir) {
        Ok(log_path) => logging::info(&format!("logging to {}", log_path.display())),
        Err(error) => eprintln!("[rex] file logging disabled: {error}"),
    }
    logging::info(&format!(
        "startup config_path={} max_suggestions={} search_paths={}",
        config.config_path.display(),
        config.max_suggestions,
        config.search_paths.len()
    ));

    // Fully populated before the first key event is read.
    let mut store = CandidateStore::new();
    store.populate(&FileSystemSource, &config.search_paths);

    let capacity = config.max_suggestions as usize;
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut renderer: Box<dyn RenderSink> = if options.json {
        Box::new(JsonRenderer::new(stdout.lock()))
    } else {
        Box::new(TextRenderer::new(stdout.lock()))
    };
    let mut sink: Box<dyn InvocationSink> = if options.dry_run {
        Box::new(DryRunSink::new(std::io::stderr()))
    } else {
        Box::new(ProcessLauncher::new(config.search_paths.clone()))
    };

    let outcome = run_key_script(
        &store,
        capacity,
        stdin.lock(),
        renderer.as_mut(),
        sink.as_mut(),
    )?;
    logging::info(&format!("session ended outcome={outcome:?}"));
    Ok(())
}

/// Drives a session from a line-oriented key script. A read failure ends the
/// session and is returned after the renderer has seen the final state.
pub fn run_key_script<R: BufRead>(
    store: &CandidateStore,
    capacity: usize,
    reader: R,
    renderer: &mut dyn RenderSink,
    sink: &mut dyn InvocationSink,
) -> Result<SessionOutcome, RuntimeError> {
    let mut read_error = None;
    let events = KeyScript::new(reader)
        .map_while(|line| match line {
            Ok(events) => Some(events),
            Err(error) => {
                read_error = Some(error);
                None
            }
        })
        .flatten();

    let outcome = drive_session(store, capacity, events, renderer, sink);
    match read_error {
        Some(error) => {
            logging::error(&format!("key input failed: {error}"));
            Err(RuntimeError::Io(error))
        }
        None => Ok(outcome),
    }
}

/// Feeds `events` through a fresh session until it commits, cancels or the
/// events run out. Renders once up front and after every non-terminal event.
pub fn drive_session<I>(
    store: &CandidateStore,
    capacity: usize,
    events: I,
    renderer: &mut dyn RenderSink,
    sink: &mut dyn InvocationSink,
) -> SessionOutcome
where
    I: IntoIterator<Item = KeyEvent>,
{
    let mut session = InputSession::new(store, capacity);
    renderer.render(&session.snapshot());

    let mut outcome = SessionOutcome::InputClosed;
    for event in events {
        match session.handle(event) {
            SessionSignal::Continue => renderer.render(&session.snapshot()),
            SessionSignal::Commit(Some(program)) => {
                sink.invoke(&program, &[]);
                outcome = SessionOutcome::Launched { program };
                break;
            }
            SessionSignal::Commit(None) => {
                outcome = SessionOutcome::CommittedEmpty;
                break;
            }
            SessionSignal::Cancel => {
                outcome = SessionOutcome::Cancelled;
                break;
            }
        }
    }

    renderer.finish(&outcome);
    outcome
}

#[cfg(test)]
mod tests {
    use super::parse_cli_args;
    use std::path::PathBuf;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn parses_repeatable_paths_and_flags() {
        let options = parse_cli_args(&args(&[
            "--path",
            "/bin",
            "--path",
            "/usr/bin",
            "--json",
            "--dry-run",
            "--max-suggestions",
            "8",
        ]))
        .unwrap();

        assert_eq!(
            options.search_paths,
            vec![PathBuf::from("/bin"), PathBuf::from("/usr/bin")]
        );
        assert!(options.json);
        assert!(options.dry_run);
        assert!(!options.verbose);
        assert_eq!(options.max_suggestions, Some(8));
    }

    #[test]
    fn rejects_missing_values_and_unknown_flags() {
        assert!(parse_cli_args(&args(&["--config"])).is_err());
        assert!(parse_cli_args(&args(&["--max-suggestions", "many"])).is_err());
        let error = parse_cli_args(&args(&["--bogus"])).unwrap_err();
        assert!(error.starts_with("unknown argument: --bogus"));
    }

    #[test]
    fn empty_args_use_defaults() {
        let options = parse_cli_args(&[]).unwrap();
        assert!(options.config_path.is_none());
        assert!(options.search_paths.is_empty());
        assert!(!options.show_help);
    }
}
