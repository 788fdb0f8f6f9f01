use std::path::Path;

use stowage_core::StowageConfig;

pub fn init(
    config_path: &Path,
    data_dir: &Path,
    namespace: Option<&str>,
    force: bool,
) -> anyhow::Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists (pass --force to overwrite)",
            config_path.display()
        );
    }

    let config = StowageConfig::scaffold(data_dir, namespace);
    std::fs::write(config_path, config.to_toml_string()?)?;

    println!("✓ Wrote {}", config_path.display());
    println!("  state: {}", config.storage.path.display());
    if let Some(namespace) = namespace {
        println!("  namespace: {namespace}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stowage.toml");

        init(&path, &dir.path().join("data"), Some("demo"), false).unwrap();

        let config = StowageConfig::from_file(&path).unwrap();
        assert_eq!(config.storage.namespace.as_deref(), Some("demo"));
        assert!(config.storage.path.ends_with("data/state.redb"));
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stowage.toml");
        std::fs::write(&path, "# mine").unwrap();

        assert!(init(&path, dir.path(), None, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine");

        init(&path, dir.path(), None, true).unwrap();
        assert!(StowageConfig::from_file(&path).is_ok());
    }
}
