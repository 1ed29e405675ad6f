use anyhow::{Context, Result};
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use taskbull_core::{PrioritizationPolicy, today_in};

use crate::state::ensure_taskbull_home;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub profile: ProfileSection,
    /// Scoring constants; any field left out keeps its built-in value.
    pub prioritization: PrioritizationPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSection {
    /// IANA timezone used to decide what "today" is.
    pub timezone: String,
}

impl Default for ProfileSection {
    fn default() -> Self {
        Self {
            timezone: "America/Chicago".to_string(),
        }
    }
}

impl Config {
    pub fn timezone(&self) -> Result<Tz> {
        self.profile
            .timezone
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid timezone in config: {}", self.profile.timezone))
    }

    /// `--today` if given, otherwise the current date in the profile timezone.
    pub fn resolve_today(&self, flag: Option<NaiveDate>) -> Result<NaiveDate> {
        match flag {
            Some(d) => Ok(d),
            None => Ok(today_in(self.timezone()?)),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_taskbull_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).context("parse config.toml")
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config() -> Result<()> {
    let cfg = load_config()?;
    cfg.timezone()?;
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg: Config = toml::from_str(
            r#"
[prioritization]
motivation_threshold = 6.0
"#,
        )
        .unwrap();
        assert_eq!(cfg.prioritization.motivation_threshold, 6.0);
        assert_eq!(cfg.prioritization.weighted_importance, 4.0);
        assert_eq!(cfg.prioritization.due_soon_days, 2);
        assert_eq!(cfg.profile.timezone, "America/Chicago");
    }

    #[test]
    fn explicit_today_wins() {
        let cfg = Config::default();
        let d = NaiveDate::from_ymd_opt(2026, 2, 19).unwrap();
        assert_eq!(cfg.resolve_today(Some(d)).unwrap(), d);
    }

    #[test]
    fn bad_timezone_is_an_error() {
        let mut cfg = Config::default();
        cfg.profile.timezone = "Mars/Olympus".to_string();
        assert!(cfg.timezone().is_err());
        assert!(cfg.resolve_today(None).is_err());
    }
}
