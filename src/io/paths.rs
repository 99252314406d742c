use std::path::{Path, PathBuf};

/// Directory layout for one invocation.
///
/// Resolved once at startup (from `--home`, `KB_HOME` or the XDG variables)
/// and passed down, so nothing below `main` reads the environment for paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
    pub session_dir: PathBuf,
}

impl Paths {
    /// Everything lives under a single directory
    pub fn under(home: &Path) -> Self {
        Paths {
            config_dir: home.to_path_buf(),
            data_dir: home.to_path_buf(),
            session_dir: home.to_path_buf(),
        }
    }

    /// Resolve from an explicit override, then `KB_HOME`, then XDG defaults
    pub fn resolve(home_override: Option<&Path>) -> Self {
        if let Some(home) = home_override {
            return Paths::under(home);
        }
        if let Some(home) = env_path("KB_HOME") {
            return Paths::under(&home);
        }
        let config_dir = env_path("XDG_CONFIG_HOME")
            .unwrap_or_else(|| dirs_home().join(".config"))
            .join("kanban");
        let data_dir = env_path("XDG_DATA_HOME")
            .unwrap_or_else(|| dirs_home().join(".local").join("share"))
            .join("kanban");
        let session_dir = env_path("XDG_RUNTIME_DIR")
            .map(|dir| dir.join("kanban"))
            .unwrap_or_else(|| data_dir.clone());
        Paths {
            config_dir,
            data_dir,
            session_dir,
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn session_file(&self) -> PathBuf {
        self.session_dir.join("session.json")
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join("kb.log")
    }

    /// Board directory, honouring the `[storage] dir` override
    pub fn boards_dir(&self, storage_override: Option<&Path>) -> PathBuf {
        match storage_override {
            Some(dir) => dir.to_path_buf(),
            None => self.data_dir.join("boards"),
        }
    }
}

/// Non-empty environment variable as a path
fn env_path(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Get the user's home directory
fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}
