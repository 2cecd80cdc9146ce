// tests/config_env.rs
//
// Config lookup touches process-wide state (env vars, cwd), so every test
// here runs serially.

use std::{fs, path::Path};

use serial_test::serial;
use storm_advisor::config::{
    config_path_default, load_config_default, HotReloadConfig, ENV_CONFIG_PATH,
};
use storm_advisor::{classify_with, engine::canonical_rules, EngineConfig, ObservationInput};

struct CwdGuard(std::path::PathBuf);

impl CwdGuard {
    fn enter(dir: &Path) -> Self {
        let prev = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir).unwrap();
        Self(prev)
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.0);
    }
}

#[test]
#[serial]
fn env_path_wins() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.json");
    fs::write(&path, r#"{ "visibility_threshold": 0.1 }"#).unwrap();

    std::env::set_var(ENV_CONFIG_PATH, &path);
    let cfg = load_config_default();
    std::env::remove_var(ENV_CONFIG_PATH);

    let cfg = cfg.unwrap();
    assert_eq!(cfg.visibility_threshold, 0.1);
    assert!(cfg.humidity_advisories);
}

#[test]
#[serial]
fn env_path_missing_is_an_error() {
    std::env::set_var(ENV_CONFIG_PATH, "/definitely/not/here/storm.toml");
    let res = config_path_default();
    std::env::remove_var(ENV_CONFIG_PATH);
    assert!(res.is_err());
}

#[test]
#[serial]
fn falls_back_to_config_dir_toml() {
    std::env::remove_var(ENV_CONFIG_PATH);
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("config")).unwrap();
    fs::write(
        dir.path().join("config/storm.toml"),
        "visibility_threshold = 0.05\ncategory_advisories = false\n",
    )
    .unwrap();

    let _cwd = CwdGuard::enter(dir.path());
    let cfg = load_config_default().unwrap();
    assert_eq!(cfg.visibility_threshold, 0.05);
    assert!(!cfg.category_advisories);
}

#[test]
#[serial]
fn defaults_when_nothing_is_configured() {
    std::env::remove_var(ENV_CONFIG_PATH);
    let dir = tempfile::tempdir().unwrap();
    let _cwd = CwdGuard::enter(dir.path());

    assert!(config_path_default().unwrap().is_none());
    assert_eq!(load_config_default().unwrap(), EngineConfig::default());

    let hot = HotReloadConfig::from_env();
    assert!(hot.path().is_none());
    assert_eq!(hot.current(), EngineConfig::default());
}

#[test]
#[serial]
fn loaded_config_changes_classification_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storm.toml");
    fs::write(&path, "category_advisories = false\nhumidity_advisories = false\n").unwrap();

    let hot = HotReloadConfig::new(Some(path));
    let cfg = hot.current();

    let input = ObservationInput::new()
        .wind_speed(55.0)
        .pressure(990.0)
        .temperature(26.0)
        .humidity(90.0);
    let res = classify_with(&input, canonical_rules(), cfg).unwrap();

    // Only the missing-coordinates notice survives.
    assert_eq!(res.advisories.len(), 1);
    assert_eq!(
        res.advisories[0].kind,
        storm_advisor::AdvisoryKind::MissingCoordinates
    );
}
