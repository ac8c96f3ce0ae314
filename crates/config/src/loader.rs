use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{env_subst::substitute_env, schema::CourierConfig};

const CONFIG_FILENAME: &str = "courier.toml";

/// Load config from the given path.
pub fn load_config(path: &Path) -> anyhow::Result<CourierConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    let cfg = toml::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("failed to parse {}: {e}", path.display()))?;
    Ok(cfg)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. explicit `path` argument (errors are fatal for an explicit path)
/// 2. `./courier.toml` (project-local)
/// 3. `~/.config/courier/courier.toml` (user-global)
///
/// Returns `CourierConfig::default()` if no config file is found.
pub fn discover_and_load(path: Option<&Path>) -> anyhow::Result<CourierConfig> {
    if let Some(path) = path {
        debug!(path = %path.display(), "loading config");
        return load_config(path);
    }

    if let Some(found) = find_config_file() {
        debug!(path = %found.display(), "loading config");
        match load_config(&found) {
            Ok(cfg) => return Ok(cfg),
            Err(e) => {
                warn!(path = %found.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    Ok(CourierConfig::default())
}

/// Find the first config file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILENAME);
    if local.exists() {
        return Some(local);
    }

    if let Some(dirs) = directories::ProjectDirs::from("", "", "courier") {
        let global = dirs.config_dir().join(CONFIG_FILENAME);
        if global.exists() {
            return Some(global);
        }
    }

    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn loads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("courier.toml");
        std::fs::write(&path, "backend = \"hosted\"\n").unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.backend, crate::schema::BackendKind::Hosted);
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(discover_and_load(Some(&missing)).is_err());
    }

    #[test]
    fn env_placeholders_substituted_before_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("courier.toml");
        std::fs::write(
            &path,
            "[telegram]\ntoken = \"${COURIER_LOADER_TEST_TOKEN}\"\n",
        )
        .unwrap();

        // Unset var: placeholder survives as a literal.
        let cfg = load_config(&path).unwrap();
        use secrecy::ExposeSecret;
        assert_eq!(
            cfg.telegram.token.expose_secret(),
            "${COURIER_LOADER_TEST_TOKEN}"
        );
    }
}
