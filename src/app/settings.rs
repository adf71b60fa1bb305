use super::config::Config;
use std::path::Path;

/// Validation errors for application configuration
#[derive(Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Root prefix is empty
    EmptyRootPrefix,
    /// Root prefix must name a folder (`Assets/`, not `Assets`)
    RootPrefixWithoutSlash(String),
    /// A project-relative setting holds an absolute path
    AbsoluteProjectPath { key: &'static str, value: String },
    /// A project-relative setting escapes the project with `..`
    PathOutsideProject { key: &'static str, value: String },
    /// Excluded prefix can never match because it is outside the root
    ExcludedPrefixOutsideRoot { prefix: String, root_prefix: String },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyRootPrefix => {
                write!(f, "structure.root_prefix must not be empty")
            }
            ValidationError::RootPrefixWithoutSlash(prefix) => {
                write!(f, "structure.root_prefix '{}' must end with '/'", prefix)
            }
            ValidationError::AbsoluteProjectPath { key, value } => {
                write!(f, "{} '{}' must be relative to the project root", key, value)
            }
            ValidationError::PathOutsideProject { key, value } => {
                write!(f, "{} '{}' must stay inside the project", key, value)
            }
            ValidationError::ExcludedPrefixOutsideRoot {
                prefix,
                root_prefix,
            } => {
                write!(
                    f,
                    "organiser.excluded_prefixes entry '{}' is not under '{}'",
                    prefix, root_prefix
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

fn check_project_relative(key: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if Path::new(value).is_absolute() || value.starts_with('/') || value.starts_with('\\') {
        errors.push(ValidationError::AbsoluteProjectPath {
            key,
            value: value.to_string(),
        });
    } else if value.replace('\\', "/").split('/').any(|part| part == "..") {
        errors.push(ValidationError::PathOutsideProject {
            key,
            value: value.to_string(),
        });
    }
}

/// Validate application configuration
pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let root_prefix = &config.structure.root_prefix;

    if root_prefix.trim().is_empty() {
        errors.push(ValidationError::EmptyRootPrefix);
    } else if !root_prefix.ends_with('/') {
        errors.push(ValidationError::RootPrefixWithoutSlash(root_prefix.clone()));
    } else {
        for prefix in &config.organiser.excluded_prefixes {
            if !prefix.replace('\\', "/").starts_with(root_prefix.as_str()) {
                errors.push(ValidationError::ExcludedPrefixOutsideRoot {
                    prefix: prefix.clone(),
                    root_prefix: root_prefix.clone(),
                });
            }
        }
    }

    check_project_relative(
        "structure.preset_directory",
        &config.structure.preset_directory,
        &mut errors,
    );
    check_project_relative(
        "structure.preferences_file",
        &config.structure.preferences_file,
        &mut errors,
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_empty_root_prefix() {
        let mut config = Config::default();
        config.structure.root_prefix = "  ".to_string();
        assert_eq!(validate_config(&config), Err(vec![ValidationError::EmptyRootPrefix]));
    }

    #[test]
    fn test_root_prefix_needs_slash() {
        let mut config = Config::default();
        config.structure.root_prefix = "Assets".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::RootPrefixWithoutSlash("Assets".to_string())]);
    }

    #[test]
    fn test_absolute_and_escaping_paths() {
        let mut config = Config::default();
        config.structure.preset_directory = "/etc/presets".to_string();
        config.structure.preferences_file = "../prefs.toml".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], ValidationError::AbsoluteProjectPath { .. }));
        assert!(matches!(errors[1], ValidationError::PathOutsideProject { .. }));
    }

    #[test]
    fn test_excluded_prefix_outside_root() {
        let mut config = Config::default();
        config.organiser.excluded_prefixes.push("Packages/".to_string());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::ExcludedPrefixOutsideRoot {
                prefix: "Packages/".to_string(),
                root_prefix: "Assets/".to_string(),
            }]
        );
        assert!(errors[0].to_string().contains("Packages/"));
    }
}
