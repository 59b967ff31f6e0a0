use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::RoimapConfig;
use crate::core::{ConfigurationError, Error, Result};

pub const CONFIG_FILE_NAME: &str = ".roimap.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

pub(crate) fn read_config_file(path: &Path) -> std::io::Result<String> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse TOML and check that it describes a usable model.
///
/// `origin` names the source in error messages.
pub fn parse_and_validate_config(
    contents: &str,
    origin: &str,
) -> std::result::Result<RoimapConfig, ConfigurationError> {
    let config =
        toml::from_str::<RoimapConfig>(contents).map_err(|e| ConfigurationError::Parse {
            origin: origin.to_string(),
            message: e.message().to_string(),
        })?;

    config.to_state()?;
    Ok(config)
}

fn try_load_config_from_path(config_path: &Path) -> Option<RoimapConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            // Missing files are the common case while walking ancestors
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!(
                    "Failed to read config file {}: {}",
                    config_path.display(),
                    e
                );
            }
            return None;
        }
    };

    match parse_and_validate_config(&contents, &config_path.display().to_string()) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{e}. Using defaults.");
            None
        }
    }
}

pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search the current directory and its ancestors for `.roimap.toml`.
///
/// Never fails: unreadable or invalid files log a warning and the search
/// falls back to the default model.
pub fn load_config() -> RoimapConfig {
    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            return RoimapConfig::default();
        }
    };

    discover_config(current)
}

pub(crate) fn discover_config(start: PathBuf) -> RoimapConfig {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            RoimapConfig::default()
        })
}

/// Load an explicitly named config file. Any failure is an error.
pub fn load_config_from(path: &Path) -> Result<RoimapConfig> {
    let contents = read_config_file(path)?;
    let config = parse_and_validate_config(&contents, &path.display().to_string())
        .map_err(Error::Configuration)?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Metric;
    use indoc::indoc;
    use tempfile::TempDir;

    #[test]
    fn ancestors_stop_at_depth() {
        let dirs: Vec<_> = directory_ancestors(PathBuf::from("/a/b/c/d"), 2).collect();
        assert_eq!(dirs, vec![PathBuf::from("/a/b/c/d"), PathBuf::from("/a/b/c")]);
    }

    #[test]
    fn ancestors_end_at_root() {
        let dirs: Vec<_> = directory_ancestors(PathBuf::from("/a"), 10).collect();
        assert_eq!(dirs, vec![PathBuf::from("/a"), PathBuf::from("/")]);
    }

    #[test]
    fn parse_error_names_origin() {
        let err = parse_and_validate_config("[inputs\n", "broken.toml").unwrap_err();
        match err {
            ConfigurationError::Parse { origin, .. } => assert_eq!(origin, "broken.toml"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_input_key_is_rejected() {
        let toml = indoc! {r#"
            [inputs]
            pipelin = 5
        "#};
        assert!(matches!(
            parse_and_validate_config(toml, "test"),
            Err(ConfigurationError::Parse { .. })
        ));
    }

    #[test]
    fn discovers_config_in_parent_directory() {
        let root = TempDir::new().unwrap();
        let nested = root.path().join("team").join("q3");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            root.path().join(CONFIG_FILE_NAME),
            indoc! {r#"
                [metrics]
                enabled = ["churn"]
            "#},
        )
        .unwrap();

        let config = discover_config(nested);
        let state = config.to_state().unwrap();
        assert_eq!(state.enabled.iter().collect::<Vec<_>>(), vec![Metric::Churn]);
    }

    #[test]
    fn invalid_discovered_config_falls_back_to_default() {
        let root = TempDir::new().unwrap();
        fs::write(
            root.path().join(CONFIG_FILE_NAME),
            "[risk.winRate]\nprobability = 400\n",
        )
        .unwrap();

        assert_eq!(discover_config(root.path().to_path_buf()), RoimapConfig::default());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let root = TempDir::new().unwrap();
        let err = load_config_from(&root.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn explicit_invalid_file_is_a_configuration_error() {
        let root = TempDir::new().unwrap();
        let path = root.path().join("model.toml");
        fs::write(&path, "[metrics]\nenabled = [\"bogus\"]\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(err.is_configuration());
    }
}
