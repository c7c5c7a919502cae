use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ProviderError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: String,
    pub executable: bool,
}

impl DirEntryInfo {
    pub fn new(name: &str, executable: bool) -> Self {
        Self {
            name: name.to_string(),
            executable,
        }
    }
}

/// Outcome of enumerating one search-path directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathScan {
    Listed {
        path: PathBuf,
        entries: Vec<DirEntryInfo>,
    },
    Failed {
        path: PathBuf,
        error: ProviderError,
    },
}

impl PathScan {
    pub fn path(&self) -> &Path {
        match self {
            Self::Listed { path, .. } | Self::Failed { path, .. } => path,
        }
    }
}

pub trait PopulationSource {
    fn source_name(&self) -> &'static str;
    fn scan(&self, path: &Path) -> PathScan;
}

/// Lists the direct children of each search-path directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSystemSource;

impl PopulationSource for FileSystemSource {
    fn source_name(&self) -> &'static str {
        "filesystem"
    }

    fn scan(&self, path: &Path) -> PathScan {
        match list_directory(path) {
            Ok(entries) => PathScan::Listed {
                path: path.to_path_buf(),
                entries,
            },
            Err(error) => PathScan::Failed {
                path: path.to_path_buf(),
                error,
            },
        }
    }
}

fn list_directory(path: &Path) -> Result<Vec<DirEntryInfo>, ProviderError> {
    if !path.exists() {
        return Err(ProviderError::new(format!(
            "skipping invalid path {}: does not exist",
            path.display()
        )));
    }
    if !path.is_dir() {
        return Err(ProviderError::new(format!(
            "skipping invalid path {}: not a directory",
            path.display()
        )));
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            // Dangling links and unreadable children only lose that one entry.
            Err(error) if error.depth() > 0 => continue,
            Err(error) => {
                return Err(ProviderError::new(format!(
                    "error accessing directory {}: {error}",
                    path.display()
                )))
            }
        };

        let Some(name) = entry.file_name().to_str() else {
            continue;
        };

        let executable = entry
            .metadata()
            .map(|metadata| metadata.is_file() && is_executable(entry.path(), &metadata))
            .unwrap_or(false);

        entries.push(DirEntryInfo::new(name, executable));
    }

    Ok(entries)
}

#[cfg(unix)]
fn is_executable(_path: &Path, metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;

    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(path: &Path, _metadata: &std::fs::Metadata) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .map(|ext| {
            matches!(
                ext.to_ascii_lowercase().as_str(),
                "exe" | "bat" | "cmd" | "com"
            )
        })
        .unwrap_or(false)
}

/// In-memory directory listings keyed by path. Paths with no listing fail
/// the same way a missing directory does.
#[derive(Debug, Default, Clone)]
pub struct StaticSource {
    listings: BTreeMap<PathBuf, Vec<DirEntryInfo>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dir(mut self, path: impl Into<PathBuf>, entries: Vec<DirEntryInfo>) -> Self {
        self.listings.insert(path.into(), entries);
        self
    }

    pub fn deterministic_fixture() -> Self {
        Self::new()
            .with_dir(
                "/usr/bin",
                vec![
                    DirEntryInfo::new("find", true),
                    DirEntryInfo::new("finger", true),
                    DirEntryInfo::new("fish", true),
                    DirEntryInfo::new("cat", true),
                    DirEntryInfo::new("README", false),
                ],
            )
            .with_dir(
                "/usr/local/bin",
                vec![
                    DirEntryInfo::new("[", true),
                    DirEntryInfo::new("x", true),
                    DirEntryInfo::new("firefox", true),
                ],
            )
    }
}

impl PopulationSource for StaticSource {
    fn source_name(&self) -> &'static str {
        "static"
    }

    fn scan(&self, path: &Path) -> PathScan {
        match self.listings.get(path) {
            Some(entries) => PathScan::Listed {
                path: path.to_path_buf(),
                entries: entries.clone(),
            },
            None => PathScan::Failed {
                path: path.to_path_buf(),
                error: ProviderError::new(format!(
                    "skipping invalid path {}: no listing",
                    path.display()
                )),
            },
        }
    }
}

pub fn split_search_path(value: &OsStr) -> Vec<PathBuf> {
    std::env::split_paths(value)
        .filter(|path| !path.as_os_str().is_empty())
        .collect()
}

pub fn search_paths_from_env() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|value| split_search_path(&value))
        .unwrap_or_default()
}
