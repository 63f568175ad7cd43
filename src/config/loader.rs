//! Configuration loading functionality.
//!
//! This module loads a complete planning [`Config`] from a single YAML
//! file. Workbook-style inputs are handled by external collaborators; this
//! loader only covers the typed record schema.

use std::fs;
use std::path::Path;

use crate::error::{PlannerError, PlannerResult};

use super::types::Config;

impl Config {
    /// Loads and validates a configuration from a YAML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file (e.g., "./config/january.yaml")
    ///
    /// # Returns
    ///
    /// Returns the validated [`Config`] on success, or an error if the file
    /// is missing, contains invalid YAML, or fails structural validation.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use roster_engine::config::Config;
    ///
    /// let config = Config::from_yaml_file("./config/january.yaml")?;
    /// println!("Planning {}-{:02}", config.global.year, config.global.month);
    /// # Ok::<(), roster_engine::error::PlannerError>(())
    /// ```
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> PlannerResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| PlannerError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| PlannerError::ConfigParseError {
                path: path_str,
                message: e.to_string(),
            })?;

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmployeeKind;
    use std::io::Write;

    const VALID_YAML: &str = r#"
global:
  year: 2025
  month: 1
  day_start: "06:00:00"
  night_start: "21:00:00"
  shift_length_hours: 12
  shift_start_time: "06:00:00"
  he_pct: "1.25"
  rf_pct: "0.80"
  rn_pct: "0.35"
  hours_base_month: "220"
  hours_per_week: "44"
  sunday_threshold: 2
  min_fixed_per_post: 3
  max_posts_per_floater: 4
  w_he: "100"
  w_rf: "10"
  w_rn: "1"
  w_base: "1"
  use_lexicographic: true
holidays:
  - date: 2025-01-01
    description: "New Year's Day"
posts:
  - post_id: P001
    name: "Main Gate"
    required_coverage: 1
    allow_day_shift: true
    allow_night_shift: true
employees:
  - emp_id: E001
    kind: FIXED
    assigned_post_id: P001
    contract_salary: "1423500"
    available_from: 2025-01-01
    available_to: 2025-12-31
  - emp_id: E004
    kind: FLOATER
    contract_salary: "1423500"
    available_from: 2025-01-01
    available_to: 2025-12-31
    max_posts_if_floater: 4
"#;

    fn write_temp_yaml(content: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "roster_engine_config_test_{}_{}.yaml",
            std::process::id(),
            content.len()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_valid_configuration() {
        let path = write_temp_yaml(VALID_YAML);
        let result = Config::from_yaml_file(&path);
        std::fs::remove_file(&path).ok();

        let config = result.expect("valid YAML should load");
        assert_eq!(config.global.year, 2025);
        assert_eq!(config.posts.len(), 1);
        assert_eq!(config.employees.len(), 2);
        assert_eq!(config.employees[1].kind, EmployeeKind::Floater);
        assert_eq!(config.employees[1].assigned_post_id, None);
    }

    #[test]
    fn test_load_missing_file_returns_not_found() {
        let result = Config::from_yaml_file("/nonexistent/config.yaml");
        match result {
            Err(PlannerError::ConfigNotFound { path }) => {
                assert!(path.contains("config.yaml"));
            }
            other => panic!("Expected ConfigNotFound, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_load_invalid_yaml_returns_parse_error() {
        let path = write_temp_yaml("global: [not, a, mapping");
        let result = Config::from_yaml_file(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(PlannerError::ConfigParseError { .. })));
    }

    #[test]
    fn test_load_runs_structural_validation() {
        // A fixed employee without a post must be rejected at load time.
        let broken = VALID_YAML.replace("    assigned_post_id: P001\n", "");
        let path = write_temp_yaml(&broken);
        let result = Config::from_yaml_file(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(PlannerError::InvalidConfig { .. })));
    }
}
