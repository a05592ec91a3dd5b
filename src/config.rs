use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use periods::Date;
use periods::edit::{CONFIRM_ABOVE_HOURS, WorkCalendar};
use periods::period::{Frequency, PeriodCalculator};
use periods::session::{Role, SessionContext};
use periods::verify::MAX_DAILY_HOURS;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "timegrid.json";
pub const CONFIG_ENV: &str = "TIMEGRID_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Monday biweekly periods are counted from.
    pub biweekly_anchor: Option<Date>,
    pub holidays: Vec<Date>,
    /// Entries above this many hours on one day ask for confirmation.
    pub confirm_above_hours: f64,
    pub default_frequency: Frequency,
    pub user: String,
    pub role: Role,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            biweekly_anchor: None,
            holidays: Vec::new(),
            confirm_above_hours: CONFIRM_ABOVE_HOURS,
            default_frequency: Frequency::Weekly,
            user: std::env::var("USER").unwrap_or_else(|_| "me".to_owned()),
            role: Role::Employee,
        }
    }
}

impl Config {
    /// Picks the explicit path, then `$TIMEGRID_CONFIG`, then `timegrid.json`
    /// in the working directory if it exists, else the defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
            .or_else(|| {
                let local = PathBuf::from(CONFIG_FILE_NAME);
                local.is_file().then_some(local)
            });
        match path {
            Some(path) => Self::load(&path),
            None => {
                debug!("no configuration file, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs_err::read_to_string(path)?;
        let config: Config = serde_json::from_str(&text)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        config
            .check()
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    fn check(&self) -> Result<()> {
        self.calculator()?;
        ensure!(
            (0.0..=MAX_DAILY_HOURS).contains(&self.confirm_above_hours),
            "confirm_above_hours must be between 0 and {MAX_DAILY_HOURS}, got {}",
            self.confirm_above_hours
        );
        Ok(())
    }

    pub fn calculator(&self) -> Result<PeriodCalculator> {
        match self.biweekly_anchor {
            Some(anchor) => Ok(PeriodCalculator::with_anchor(anchor)?),
            None => Ok(PeriodCalculator::default()),
        }
    }

    pub fn calendar(&self) -> WorkCalendar {
        WorkCalendar::new(self.holidays.iter().copied(), self.confirm_above_hours)
    }

    pub fn session(&self) -> SessionContext {
        SessionContext::new(self.user.clone(), self.role)
    }
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use periods::Date;
    use periods::period::Frequency;
    use periods::session::Role;
    use tempfile::NamedTempFile;

    use crate::config::Config;

    fn write(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_partial_config() {
        let file = write(
            r#"{
                "biweekly_anchor": "01/08/2024",
                "holidays": ["12/25/2024"],
                "role": "MANAGER"
            }"#,
        );
        let config = Config::resolve(Some(file.path())).unwrap();
        assert_eq!(config.biweekly_anchor, Date::from_ymd(2024, 1, 8));
        assert_eq!(config.role, Role::Manager);
        assert_eq!(config.default_frequency, Frequency::Weekly);
        assert!((config.confirm_above_hours - 8.0).abs() < f64::EPSILON);
        assert_eq!(
            config.calculator().unwrap().anchor(),
            Date::from_ymd(2024, 1, 8).unwrap()
        );
        assert!(config.calendar().is_holiday(Date::from_ymd(2024, 12, 25).unwrap()));
    }

    #[test]
    fn test_reject_invalid_config() {
        let file = write(r#"{ "biweekly_anchor": "01/09/2024" }"#);
        let error = Config::load(file.path()).unwrap_err();
        assert!(format!("{error:#}").contains("not a Monday"), "{error:#}");

        let file = write(r#"{ "holidays": ["02/30/2024"] }"#);
        assert!(Config::load(file.path()).is_err());

        let file = write(r#"{ "default_frequency": "DAILY" }"#);
        assert!(Config::load(file.path()).is_err());

        for hours in ["-1", "-0.5", "24.5"] {
            let file = write(&format!(r#"{{ "confirm_above_hours": {hours} }}"#));
            let error = Config::load(file.path()).unwrap_err();
            assert!(
                format!("{error:#}").contains("confirm_above_hours"),
                "{hours}: {error:#}"
            );
        }
        let file = write(r#"{ "confirm_above_hours": 10 }"#);
        assert!((Config::load(file.path()).unwrap().confirm_above_hours - 10.0).abs() < 1e-9);
    }
}
