// Configuration loading and parsing (league.toml).

use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub salary: SalaryConfig,
    pub paths: PathsConfig,
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire league.toml file.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
    salary: SalaryConfig,
    paths: PathsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
    /// Player ages are computed as of this date.
    pub age_cutoff: NaiveDate,
}

/// Salary-cap bookkeeping constants used by the team finance reports.
#[derive(Debug, Clone, Deserialize)]
pub struct SalaryConfig {
    /// Number of periods a season salary is spread across.
    pub salary_periods: u32,
    /// Number of periods in the fantasy season.
    pub season_periods: u32,
    /// AddSalary is reported only while fewer periods than this have been played.
    pub add_salary_last_period: u32,
    /// Minimum cash charged per period, regardless of payroll.
    pub minimum_cash_charge: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    pub data_dir: String,
    pub output_dir: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` relative to the
/// given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let league_path = base_dir.join("config").join("league.toml");
    let text = read_file(&league_path)?;
    let file: LeagueFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: league_path.clone(),
        source: e,
    })?;

    let config = Config {
        league: file.league,
        salary: file.salary,
        paths: file.paths,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.league.name.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "league.name".into(),
            message: "must not be empty".into(),
        });
    }

    let salary = &config.salary;
    let period_fields: &[(&str, u32)] = &[
        ("salary.salary_periods", salary.salary_periods),
        ("salary.season_periods", salary.season_periods),
        ("salary.add_salary_last_period", salary.add_salary_last_period),
    ];
    for (name, val) in period_fields {
        if *val == 0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must be > 0".into(),
            });
        }
    }

    // AddSalary divides by (salary_periods - periods played).
    if salary.add_salary_last_period > salary.salary_periods {
        return Err(ConfigError::ValidationError {
            field: "salary.add_salary_last_period".into(),
            message: format!(
                "must not exceed salary.salary_periods ({}), got {}",
                salary.salary_periods, salary.add_salary_last_period
            ),
        });
    }

    if !salary.minimum_cash_charge.is_finite() || salary.minimum_cash_charge < 0.0 {
        return Err(ConfigError::ValidationError {
            field: "salary.minimum_cash_charge".into(),
            message: format!("must be >= 0, got {}", salary.minimum_cash_charge),
        });
    }

    let path_fields: &[(&str, &str)] = &[
        ("paths.data_dir", &config.paths.data_dir),
        ("paths.output_dir", &config.paths.output_dir),
    ];
    for (name, val) in path_fields {
        if val.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must not be empty".into(),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    /// Helper: returns the path to the workspace root holding `defaults/`
    /// (works whether `cargo test` runs from the crate dir or the repo root).
    fn project_root() -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        if cwd.join("defaults").exists() {
            cwd
        } else if cwd.join("../../defaults").exists() {
            cwd.join("../..")
        } else {
            panic!("Cannot locate defaults/ directory from CWD {:?}", cwd);
        }
    }

    /// Create `<tmp>/config/league.toml` from the shipped defaults, with an
    /// optional textual substitution applied.
    fn write_league_toml(name: &str, from: &str, to: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let config_dir = tmp.join("config");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&config_dir).unwrap();

        let text = fs::read_to_string(project_root().join("defaults/league.toml")).unwrap();
        fs::write(config_dir.join("league.toml"), text.replace(from, to)).unwrap();
        tmp
    }

    fn expect_validation_field(err: ConfigError, expected: &str) {
        match &err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, expected),
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn load_default_league_toml() {
        let tmp = write_league_toml("fhl_config_defaults", "", "");
        let config = load_config_from(&tmp).expect("defaults should load");

        assert_eq!(config.league.name, "Fantasy Hockey League");
        assert_eq!(
            config.league.age_cutoff,
            NaiveDate::from_ymd_opt(2025, 9, 15).unwrap()
        );
        assert_eq!(config.salary.salary_periods, 25);
        assert_eq!(config.salary.season_periods, 26);
        assert_eq!(config.salary.add_salary_last_period, 22);
        assert!((config.salary.minimum_cash_charge - 13.0).abs() < f64::EPSILON);
        assert_eq!(config.paths.data_dir, "src/data");
        assert_eq!(config.paths.output_dir, "dist/data");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_salary_periods() {
        let tmp = write_league_toml(
            "fhl_config_zero_salary_periods",
            "salary_periods = 25",
            "salary_periods = 0",
        );
        let err = load_config_from(&tmp).unwrap_err();
        expect_validation_field(err, "salary.salary_periods");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_add_salary_period_past_salary_periods() {
        let tmp = write_league_toml(
            "fhl_config_add_salary_past",
            "add_salary_last_period = 22",
            "add_salary_last_period = 30",
        );
        let err = load_config_from(&tmp).unwrap_err();
        expect_validation_field(err, "salary.add_salary_last_period");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_negative_cash_charge() {
        let tmp = write_league_toml(
            "fhl_config_negative_charge",
            "minimum_cash_charge = 13.0",
            "minimum_cash_charge = -1.0",
        );
        let err = load_config_from(&tmp).unwrap_err();
        expect_validation_field(err, "salary.minimum_cash_charge");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_empty_data_dir() {
        let tmp = write_league_toml(
            "fhl_config_empty_data_dir",
            "data_dir = \"src/data\"",
            "data_dir = \"\"",
        );
        let err = load_config_from(&tmp).unwrap_err();
        expect_validation_field(err, "paths.data_dir");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_bad_date() {
        let tmp = write_league_toml(
            "fhl_config_bad_date",
            "age_cutoff = \"2025-09-15\"",
            "age_cutoff = \"September\"",
        );
        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ParseError { path, .. } => assert!(path.ends_with("league.toml")),
            other => panic!("expected ParseError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_league_toml() {
        let tmp = std::env::temp_dir().join("fhl_config_missing_league");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::FileNotFound { path } => assert!(path.ends_with("league.toml")),
            other => panic!("expected FileNotFound, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_copies_missing_files() {
        let tmp = std::env::temp_dir().join("fhl_config_ensure_copies");
        let _ = fs::remove_dir_all(&tmp);

        let defaults_dir = tmp.join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::copy(
            project_root().join("defaults/league.toml"),
            defaults_dir.join("league.toml"),
        )
        .unwrap();
        fs::write(defaults_dir.join("league.toml.example"), "# template\n").unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert_eq!(copied.len(), 1);
        assert!(tmp.join("config/league.toml").exists());
        assert!(!tmp.join("config/league.toml.example").exists());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_skips_existing() {
        let tmp = std::env::temp_dir().join("fhl_config_ensure_skips");
        let _ = fs::remove_dir_all(&tmp);

        let defaults_dir = tmp.join("defaults");
        let config_dir = tmp.join("config");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::create_dir_all(&config_dir).unwrap();
        fs::copy(
            project_root().join("defaults/league.toml"),
            defaults_dir.join("league.toml"),
        )
        .unwrap();
        fs::write(config_dir.join("league.toml"), "# custom\n").unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert!(copied.is_empty());
        let content = fs::read_to_string(config_dir.join("league.toml")).unwrap();
        assert_eq!(content, "# custom\n");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = std::env::temp_dir().join("fhl_config_both_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        let err = ensure_config_files(&tmp).unwrap_err();
        match &err {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains("neither defaults/ nor config/"));
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }
}
