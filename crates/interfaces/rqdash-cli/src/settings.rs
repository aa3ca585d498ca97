use anyhow::{anyhow, Result};
use rqdash_app_core::domain::AppSettings;
use rqdash_app_core::persistence::FilePersistence;
use rqdash_app_core::ports::SettingsRepo;
use std::path::PathBuf;

/// Per-invocation values from flags or the environment. They win over the
/// saved settings but are never written back.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub url_prefix: Option<String>,
    pub instance_index: Option<usize>,
    pub username: Option<String>,
    pub password: Option<String>,
}

pub fn resolve(mut settings: AppSettings, overrides: &Overrides) -> AppSettings {
    if let Some(url) = &overrides.base_url {
        settings.base_url = url.clone();
    }
    if let Some(prefix) = &overrides.url_prefix {
        settings.url_prefix = Some(prefix.clone());
    }
    if let Some(index) = overrides.instance_index {
        settings.instance_index = index;
    }
    if let Some(user) = &overrides.username {
        settings.username = Some(user.clone());
    }
    if let Some(password) = &overrides.password {
        settings.password = Some(password.clone());
    }
    settings
}

/// Fields `config set` may change. `None` leaves the saved value alone; an
/// empty string clears an optional one.
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub base_url: Option<String>,
    pub url_prefix: Option<String>,
    pub instance_index: Option<usize>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub reload_on_error: Option<bool>,
    pub auto_dismiss_after_ms: Option<u64>,
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub struct SettingsManager {
    persistence: FilePersistence,
}

impl SettingsManager {
    pub fn new(config_dir: Option<PathBuf>) -> Self {
        Self {
            persistence: config_dir.map_or_else(FilePersistence::new, FilePersistence::at),
        }
    }

    pub fn load(&self) -> Result<AppSettings> {
        self.persistence.load()
    }

    pub fn update(&self, patch: SettingsPatch) -> Result<AppSettings> {
        let mut settings = self.load()?;

        if let Some(url) = patch.base_url {
            let url = non_empty(&url).ok_or_else(|| anyhow!("Base URL cannot be empty"))?;
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(anyhow!("Base URL must start with http:// or https://"));
            }
            settings.base_url = url;
        }
        if let Some(prefix) = patch.url_prefix {
            settings.url_prefix = non_empty(prefix.trim_matches('/'));
        }
        if let Some(index) = patch.instance_index {
            settings.instance_index = index;
        }
        if let Some(user) = patch.username {
            settings.username = non_empty(&user);
        }
        if let Some(password) = patch.password {
            settings.password = non_empty(&password);
        }
        if let Some(flag) = patch.reload_on_error {
            settings.reload_on_error = flag;
        }
        if let Some(ms) = patch.auto_dismiss_after_ms {
            settings.auto_dismiss_after_ms = ms;
        }

        self.persistence.save(&settings)?;
        Ok(settings)
    }
}

/// Settings as shown to the operator. The password never leaves masked.
pub fn masked(settings: &AppSettings) -> AppSettings {
    AppSettings {
        password: settings.password.as_ref().map(|_| "********".to_string()),
        ..settings.clone()
    }
}

pub fn handle_show(config_dir: Option<PathBuf>) -> Result<()> {
    let mgr = SettingsManager::new(config_dir);
    let settings = mgr.load()?;
    println!("{}", serde_json::to_string_pretty(&masked(&settings))?);
    Ok(())
}

pub fn handle_set(config_dir: Option<PathBuf>, patch: SettingsPatch) -> Result<()> {
    let mgr = SettingsManager::new(config_dir);
    let settings = mgr.update(patch)?;
    println!("Settings saved.");
    println!("{}", serde_json::to_string_pretty(&masked(&settings))?);
    Ok(())
}
