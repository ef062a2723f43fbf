//! Configuration loading and parsing.
//!
//! Reads an optional `mustang.toml` from the working directory, falling back
//! to `<config dir>/mustang/mustang.toml`. The file can rebind the prefix,
//! quit, save and interrupt keys and can enable diagnostic logging. A missing
//! file yields defaults. A malformed file also yields defaults, with the parse
//! error kept on `Config::parse_error` so the caller can report it once a
//! log sink exists. Unknown fields are ignored.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "mustang.toml";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct KeysConfig {
    #[serde(default = "KeysConfig::default_prefix")]
    pub prefix: String,
    #[serde(default = "KeysConfig::default_quit")]
    pub quit: String,
    #[serde(default = "KeysConfig::default_save")]
    pub save: String,
    /// Empty string disables the interrupt binding.
    #[serde(default = "KeysConfig::default_interrupt")]
    pub interrupt: String,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            prefix: Self::default_prefix(),
            quit: Self::default_quit(),
            save: Self::default_save(),
            interrupt: Self::default_interrupt(),
        }
    }
}

impl KeysConfig {
    fn default_prefix() -> String {
        "C-x".into()
    }
    fn default_quit() -> String {
        "C-c".into()
    }
    fn default_save() -> String {
        "C-s".into()
    }
    fn default_interrupt() -> String {
        "C-c".into()
    }

    pub fn interrupt(&self) -> Option<&str> {
        let trimmed = self.interrupt.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `EnvFilter` directive string, e.g. `info` or `render=trace,io=debug`.
    #[serde(default = "LogConfig::default_level")]
    pub level: String,
    /// Log file path; logging is disabled when absent.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            file: None,
        }
    }
}

impl LogConfig {
    fn default_level() -> String {
        "info".into()
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub keys: KeysConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub source: Option<PathBuf>, // file the values came from, if any
    pub file: ConfigFile,        // parsed (or default) data
    pub parse_error: Option<String>,
}

/// Local working directory first, then the platform config dir.
pub fn discover() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }
    let global = dirs::config_dir()?.join("mustang").join(CONFIG_FILE_NAME);
    global.exists().then_some(global)
}

pub fn load() -> Result<Config> {
    load_from(discover())
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                source: Some(path),
                file,
                parse_error: None,
            })
        }
        Err(e) => {
            let message = e.message().to_string();
            warn!(target: "config", path = %path.display(), error = %message, "config_parse_error");
            Ok(Config {
                source: Some(path),
                file: ConfigFile::default(),
                parse_error: Some(message),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl<'a> Write for LockedWriter<'a> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert_eq!(cfg.file, ConfigFile::default());
        assert!(cfg.source.is_none());
        assert_eq!(cfg.file.keys.prefix, "C-x");
        assert_eq!(cfg.file.keys.interrupt(), Some("C-c"));
        assert!(cfg.file.log.file.is_none());
    }

    #[test]
    fn default_config_without_path() {
        let cfg = load_from(None).unwrap();
        assert_eq!(cfg.file, ConfigFile::default());
        assert!(cfg.parse_error.is_none());
    }

    #[test]
    fn parses_partial_keys_section() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[keys]\nsave = \"C-w\"\ninterrupt = \"\"\n").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file.keys.save, "C-w");
        assert_eq!(cfg.file.keys.prefix, "C-x", "unspecified keys keep defaults");
        assert_eq!(cfg.file.keys.interrupt(), None);
        assert_eq!(cfg.source.as_deref(), Some(tmp.path()));
    }

    #[test]
    fn parses_log_section() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            tmp.path(),
            "[log]\nlevel = \"render=trace\"\nfile = \"/tmp/m.log\"\n[future]\nx = 1\n",
        )
        .unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file.log.level, "render=trace");
        assert_eq!(cfg.file.log.file, Some(PathBuf::from("/tmp/m.log")));
    }

    #[test]
    fn parse_error_falls_back_and_logs() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[keys\nprefix = 3\n").unwrap();
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();

        let cfg = with_default(subscriber, || load_from(Some(tmp.path().to_path_buf()))).unwrap();

        let log_output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(log_output.contains("WARN config:"));
        assert!(log_output.contains("config_parse_error"));
        assert_eq!(cfg.file, ConfigFile::default());
        assert!(cfg.parse_error.is_some());
    }
}
