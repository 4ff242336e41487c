use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::session::DEFAULT_HOTKEY;
use crate::theme::ThemeMode;

pub(crate) const BACKEND_SOCKET_ENV: &str = "PROMPTMAXX_BACKEND_SOCKET";
pub(crate) const HUD_SOCKET_ENV: &str = "PROMPTMAXX_HUD_SOCKET";

/// On-disk shape of `hud.toml`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    backend_socket: Option<PathBuf>,
    event_socket: Option<PathBuf>,
    hotkey_label: Option<String>,
    theme: Option<ThemeMode>,
}

/// Resolved settings: file values, then environment overrides, then defaults.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct HudConfig {
    /// Where the prompt store listens for requests.
    pub(crate) backend_socket: PathBuf,
    /// Where this HUD listens for push-events.
    pub(crate) event_socket: PathBuf,
    pub(crate) hotkey_label: String,
    pub(crate) theme: ThemeMode,
}

/// `$XDG_RUNTIME_DIR`, falling back to `/tmp`.
pub(crate) fn runtime_dir() -> PathBuf {
    std::env::var("XDG_RUNTIME_DIR")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/tmp"))
}

impl HudConfig {
    /// `~/.config/promptmaxx/hud.toml` (or the platform equivalent).
    pub(crate) fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("promptmaxx").join("hud.toml"))
    }

    /// Load from `path` (or the default location). A missing file is not an
    /// error; an unreadable or malformed one is logged and ignored.
    pub(crate) fn load(path: Option<&Path>) -> Self {
        let path = path.map(Path::to_path_buf).or_else(Self::config_path);
        let file = match path.as_deref() {
            Some(path) => match read_file(path) {
                Ok(Some(file)) => {
                    tracing::info!("config loaded from {path:?}");
                    file
                }
                Ok(None) => ConfigFile::default(),
                Err(err) => {
                    tracing::warn!("{err}; using defaults");
                    ConfigFile::default()
                }
            },
            None => ConfigFile::default(),
        };
        Self::resolve(file, |key| std::env::var(key).ok(), &runtime_dir())
    }

    fn resolve(
        file: ConfigFile,
        env: impl Fn(&str) -> Option<String>,
        runtime_dir: &Path,
    ) -> Self {
        let from_env = |key: &str| env(key).filter(|s| !s.is_empty()).map(PathBuf::from);
        Self {
            backend_socket: from_env(BACKEND_SOCKET_ENV)
                .or(file.backend_socket)
                .unwrap_or_else(|| runtime_dir.join("promptmaxx.sock")),
            event_socket: from_env(HUD_SOCKET_ENV)
                .or(file.event_socket)
                .unwrap_or_else(|| runtime_dir.join("promptmaxx-hud.sock")),
            hotkey_label: file
                .hotkey_label
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_HOTKEY.to_string()),
            theme: file.theme.unwrap_or_default(),
        }
    }
}

fn read_file(path: &Path) -> Result<Option<ConfigFile>, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    parse(&content)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn parse(content: &str) -> Result<ConfigFile, toml::de::Error> {
    toml::from_str(content)
}
