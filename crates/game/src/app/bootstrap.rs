use std::env;
use std::path::{Path, PathBuf};

use engine::{discover_levels, load_level, resolve_app_paths, AppPaths, LevelDef, LoopConfig, Scene};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::config::{load_config, GameConfig};
use super::error::GameError;
use super::gameplay;

const LEVEL_ENV_VAR: &str = "STEPWISE_LEVEL";

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: Box<dyn Scene>,
}

pub(crate) fn build_app() -> Result<AppWiring, GameError> {
    info!("=== Stepwise Startup ===");

    let paths = resolve_app_paths()?;
    info!(root = %paths.root.display(), "project_root_resolved");
    let config = load_config(&paths.config_path)?;
    let level_override = env::var(LEVEL_ENV_VAR)
        .ok()
        .filter(|value| !value.trim().is_empty());
    let level = load_selected_level(&paths, &config, level_override.as_deref())?;

    Ok(AppWiring {
        config: config.loop_config(),
        scene: gameplay::build_scene(level),
    })
}

pub(crate) fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn load_selected_level(
    paths: &AppPaths,
    config: &GameConfig,
    level_override: Option<&str>,
) -> Result<LevelDef, GameError> {
    let mut level = match select_level_path(paths, config, level_override) {
        Some(path) => load_level(&path)?,
        None => {
            warn!(levels_dir = %paths.levels_dir.display(), "no_level_found_using_default");
            LevelDef::default()
        }
    };
    level.player.tuning = config.player_tuning.apply(level.player.tuning);
    level.adversary.tuning = config.adversary_tuning.apply(level.adversary.tuning);
    Ok(level)
}

/// Env override, then the config file, then the first level on disk.
fn select_level_path(
    paths: &AppPaths,
    config: &GameConfig,
    level_override: Option<&str>,
) -> Option<PathBuf> {
    if let Some(raw) = level_override {
        return Some(resolve_against_root(&paths.root, Path::new(raw.trim())));
    }
    if let Some(path) = &config.level {
        return Some(resolve_against_root(&paths.root, path));
    }
    match discover_levels(&paths.levels_dir) {
        Ok(levels) => levels.into_iter().next(),
        Err(err) => {
            warn!(error = %err, "level_discovery_failed");
            None
        }
    }
}

fn resolve_against_root(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    const LEVEL_XML: &str = r#"<Level name="From Disk">
        <Player x="-4"><Tuning jumpForce="4"/></Player>
        <Adversary x="3"/>
    </Level>"#;

    fn temp_paths() -> (TempDir, AppPaths) {
        let temp = TempDir::new().expect("temp");
        let paths = AppPaths::from_root(temp.path().to_path_buf());
        fs::create_dir_all(&paths.levels_dir).expect("levels dir");
        (temp, paths)
    }

    #[test]
    fn first_discovered_level_is_used() {
        let (_temp, paths) = temp_paths();
        fs::write(paths.levels_dir.join("level_02.xml"), LEVEL_XML).expect("write");
        fs::write(paths.levels_dir.join("level_01.xml"), LEVEL_XML).expect("write");

        let selected = select_level_path(&paths, &GameConfig::default(), None);
        assert_eq!(selected, Some(paths.levels_dir.join("level_01.xml")));
    }

    #[test]
    fn env_override_beats_config() {
        let (_temp, paths) = temp_paths();
        let config = GameConfig {
            level: Some(PathBuf::from("assets/levels/from_config.xml")),
            ..GameConfig::default()
        };

        assert_eq!(
            select_level_path(&paths, &config, Some("custom.xml")),
            Some(paths.root.join("custom.xml"))
        );
        assert_eq!(
            select_level_path(&paths, &config, None),
            Some(paths.root.join("assets/levels/from_config.xml"))
        );
    }

    #[test]
    fn empty_levels_dir_falls_back_to_default_level() {
        let (_temp, paths) = temp_paths();
        let level = load_selected_level(&paths, &GameConfig::default(), None).expect("level");
        assert_eq!(level.name, LevelDef::default().name);
    }

    #[test]
    fn config_overrides_apply_on_top_of_level_tuning() {
        let (_temp, paths) = temp_paths();
        fs::write(paths.levels_dir.join("level_01.xml"), LEVEL_XML).expect("write");
        let mut config = GameConfig::default();
        config.player_tuning.move_duration = Some(0.5);

        let level = load_selected_level(&paths, &config, None).expect("level");
        assert_eq!(level.name, "From Disk");
        assert_eq!(level.player.tuning.jump_force, 4.0);
        assert_eq!(level.player.tuning.move_duration, 0.5);
        assert_eq!(level.adversary.tuning.jump_drift, -2.0);
    }

    #[test]
    fn broken_level_file_is_an_error() {
        let (_temp, paths) = temp_paths();
        fs::write(paths.levels_dir.join("level_01.xml"), "<Level").expect("write");

        let err = load_selected_level(&paths, &GameConfig::default(), None).expect_err("err");
        assert!(matches!(err, GameError::Level(_)));
    }
}
