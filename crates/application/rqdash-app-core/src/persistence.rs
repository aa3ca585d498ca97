use crate::domain::AppSettings;
use crate::ports::SettingsRepo;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const QUALIFIER: &str = "io";
const ORG: &str = "rqdash";
const APP: &str = "rqdash";
const SETTINGS_FILE: &str = "settings.json";

/// Settings stored as pretty JSON under the platform config dir, or under an
/// explicit directory when one is given.
#[derive(Debug, Clone, Default)]
pub struct FilePersistence {
    root: Option<PathBuf>,
}

impl FilePersistence {
    pub fn new() -> Self {
        Self { root: None }
    }

    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(dir.into()),
        }
    }

    fn config_dir(&self) -> Result<PathBuf> {
        let dir = match &self.root {
            Some(root) => root.clone(),
            None => ProjectDirs::from(QUALIFIER, ORG, APP)
                .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
                .config_dir()
                .to_path_buf(),
        };
        if !dir.exists() {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.to_string_lossy()))?;
        }
        Ok(dir)
    }

    pub fn settings_path(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join(SETTINGS_FILE))
    }

    pub fn load_settings(&self) -> Result<AppSettings> {
        let path = self.settings_path()?;
        if !path.exists() {
            return Ok(AppSettings::default());
        }
        let content = fs::read_to_string(&path).context("Failed to read settings")?;
        let settings: AppSettings = serde_json::from_str(&content)
            .with_context(|| format!("Malformed settings in {}", path.to_string_lossy()))?;
        Ok(settings)
    }

    pub fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        let path = self.settings_path()?;
        let json = serde_json::to_string_pretty(settings)?;
        atomic_write(&path, json.as_bytes()).context("Failed to write settings")?;
        Ok(())
    }
}

impl SettingsRepo for FilePersistence {
    fn load(&self) -> Result<AppSettings> {
        self.load_settings()
    }

    fn save(&self, settings: &AppSettings) -> Result<()> {
        self.save_settings(settings)
    }
}

fn atomic_write(path: &Path, contents: &[u8]) -> Result<()> {
    let tmp_path = {
        let mut name = path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    };

    let mut file = fs::File::create(&tmp_path)
        .with_context(|| format!("Failed to create temp file {}", tmp_path.to_string_lossy()))?;
    file.write_all(contents)
        .with_context(|| format!("Failed to write temp file {}", tmp_path.to_string_lossy()))?;
    file.sync_all()
        .with_context(|| format!("Failed to sync temp file {}", tmp_path.to_string_lossy()))?;
    drop(file);

    if let Err(e) = fs::rename(&tmp_path, path) {
        if e.kind() != std::io::ErrorKind::AlreadyExists {
            return Err(e).with_context(|| {
                format!("Failed to move settings into {}", path.to_string_lossy())
            });
        }
        fs::remove_file(path).ok();
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to replace destination file {}",
                path.to_string_lossy()
            )
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FilePersistence::at(dir.path());
        assert_eq!(repo.load().unwrap(), AppSettings::default());
    }

    #[test]
    fn save_then_load_keeps_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FilePersistence::at(dir.path().join("nested"));
        let settings = AppSettings {
            base_url: "http://monitor:9181".into(),
            url_prefix: Some("rq".into()),
            instance_index: 1,
            reload_on_error: true,
            ..AppSettings::default()
        };
        repo.save(&settings).unwrap();
        assert_eq!(repo.load().unwrap(), settings);
        assert!(!repo
            .settings_path()
            .unwrap()
            .with_extension("json.tmp")
            .exists());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), "{not json").unwrap();
        let err = FilePersistence::at(dir.path()).load().unwrap_err();
        assert!(err.to_string().contains("Malformed settings"));
    }
}
