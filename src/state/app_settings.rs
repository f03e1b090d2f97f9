use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use ticketbook_api::client::derive_ws_base;
use ticketbook_api::draft::{DisplayLocale, DraftOptions, NeutralFallback};

const APP_DIR: &str = "ticketbook";
const PREFERENCES_FILE: &str = "settings.json";

/// Values persisted between runs in `settings.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_team_id: Option<String>,
}

impl Preferences {
    pub fn load(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    pub fn save(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| format!("create dir failed: {e}"))?;
        }
        let payload =
            serde_json::to_string_pretty(self).map_err(|e| format!("serialize settings failed: {e}"))?;
        std::fs::write(path, payload).map_err(|e| format!("write settings failed: {e}"))
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub admin_mode: bool,
    pub api_url: Option<String>,
    pub ws_url: Option<String>,
    pub data_dir: PathBuf,
    pub preferences_path: PathBuf,
    pub draft_options: DraftOptions,
    pub admin_email: String,
    pub admin_password: String,
    pub preferences: Preferences,
}

impl AppSettings {
    /// Gather configuration from the environment and the saved preferences.
    pub fn load(admin_mode: bool) -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        let data_dir = resolve_dir(var("TICKETBOOK_DATA_DIR"), var("XDG_DATA_HOME"), var("HOME"), ".local/share");
        let config_dir = resolve_dir(None, var("XDG_CONFIG_HOME"), var("HOME"), ".config");
        let preferences_path = config_dir.join(PREFERENCES_FILE);

        let api_url = var("TICKETBOOK_API_URL");
        let ws_url = var("TICKETBOOK_WS_URL").or_else(|| api_url.as_deref().map(derive_ws_base));

        Self {
            full_screen: false,
            log_level: var("TICKETBOOK_LOG").and_then(|level| LevelFilter::from_str(level.trim()).ok()),
            admin_mode,
            api_url,
            ws_url,
            data_dir,
            preferences: Preferences::load(&preferences_path),
            preferences_path,
            draft_options: draft_options(var("TICKETBOOK_LOCALE").as_deref(), var("TICKETBOOK_NEUTRAL_RESULT").as_deref()),
            admin_email: var("TICKETBOOK_ADMIN_EMAIL").unwrap_or_default(),
            admin_password: var("TICKETBOOK_ADMIN_PASSWORD").unwrap_or_default(),
        }
    }

    pub fn selected_team_id(&self) -> Option<&str> {
        self.preferences.selected_team_id.as_deref()
    }

    pub fn set_selected_team(&mut self, team_id: &str) -> Result<(), String> {
        self.preferences.selected_team_id = Some(team_id.to_string());
        self.preferences.save(&self.preferences_path)
    }
}

/// `explicit`, else `$XDG_*/ticketbook`, else `$HOME/<fallback>/ticketbook`,
/// else the working directory.
fn resolve_dir(explicit: Option<String>, xdg: Option<String>, home: Option<String>, fallback: &str) -> PathBuf {
    if let Some(dir) = explicit {
        return PathBuf::from(dir);
    }
    if let Some(dir) = xdg {
        return PathBuf::from(dir).join(APP_DIR);
    }
    if let Some(home) = home {
        return PathBuf::from(home).join(fallback).join(APP_DIR);
    }
    PathBuf::from(".").join(APP_DIR)
}

fn draft_options(locale: Option<&str>, neutral: Option<&str>) -> DraftOptions {
    DraftOptions {
        locale: locale.and_then(DisplayLocale::from_tag).unwrap_or_default(),
        neutral_fallback: neutral.and_then(NeutralFallback::from_tag).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn explicit_dir_wins() {
        let dir = resolve_dir(Some("/data".into()), Some("/xdg".into()), Some("/home/u".into()), ".local/share");
        assert_eq!(dir, PathBuf::from("/data"));
    }

    #[test]
    fn xdg_then_home_fallbacks() {
        assert_eq!(
            resolve_dir(None, Some("/xdg".into()), Some("/home/u".into()), ".config"),
            PathBuf::from("/xdg/ticketbook")
        );
        assert_eq!(
            resolve_dir(None, None, Some("/home/u".into()), ".config"),
            PathBuf::from("/home/u/.config/ticketbook")
        );
    }

    #[test]
    fn draft_options_from_tags() {
        let options = draft_options(Some("en"), Some("legacy"));
        assert_eq!(options.locale, DisplayLocale::English);
        assert_eq!(options.neutral_fallback, NeutralFallback::Legacy);

        let defaults = draft_options(Some("fr"), None);
        assert_eq!(defaults, DraftOptions::default());
    }

    #[test]
    fn preferences_round_trip_through_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(PREFERENCES_FILE);
        assert_eq!(Preferences::load(&path), Preferences::default());

        let prefs = Preferences { selected_team_id: Some("doosan".into()) };
        prefs.save(&path).unwrap();
        assert_eq!(Preferences::load(&path), prefs);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("selectedTeamId"));
    }
}
