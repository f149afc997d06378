// tests for `gsq config`

use crate::common::{exit_code, parse_json, stderr, stdout, TestEnv};

fn show(env: &TestEnv) -> serde_json::Value {
    let output = env.run(&["config", "show"]);
    assert_eq!(exit_code(&output), 0, "stderr: {}", stderr(&output));
    serde_json::from_str(&stdout(&output)).expect("config show prints JSON")
}

#[test]
fn test_config_path_uses_override() {
    let env = TestEnv::new();
    let output = env.run(&["config", "path"]);

    assert_eq!(exit_code(&output), 0);
    assert_eq!(stdout(&output).trim(), env.config_path().display().to_string());
}

#[test]
fn test_config_show_defaults_without_file() {
    let env = TestEnv::new();
    let config = show(&env);

    assert_eq!(config["cache"]["eviction_interval_ticks"], 3600);
    assert_eq!(config["cache"]["min_entries_to_evict"], 50);
    assert_eq!(config["aliases"], serde_json::json!({}));
    assert!(config.get("random_seed").is_none());
    assert!(!env.config_path().exists());
}

#[test]
fn test_config_show_reads_json5() {
    let env = TestEnv::new();
    env.write_config(
        r#"{
            // comments and trailing commas are fine
            cache: { min_entries_to_evict: 5, },
            random_seed: 7,
        }"#,
    );

    let config = show(&env);
    assert_eq!(config["cache"]["min_entries_to_evict"], 5);
    assert_eq!(config["cache"]["eviction_interval_ticks"], 3600);
    assert_eq!(config["random_seed"], 7);
}

#[test]
fn test_config_set_then_show() {
    let env = TestEnv::new();

    let output = env.run(&["--no-json", "config", "set", "cache.min_entries_to_evict", "10"]);
    assert_eq!(exit_code(&output), 0);
    assert_eq!(stdout(&output).trim(), "Set cache.min_entries_to_evict = 10");

    env.run(&["config", "set", "aliases.SEASONS", "SEASON"]);
    env.run(&["config", "set", "random_seed", "42"]);

    let config = show(&env);
    assert_eq!(config["cache"]["min_entries_to_evict"], 10);
    assert_eq!(config["aliases"]["SEASONS"], "SEASON");
    assert_eq!(config["random_seed"], 42);

    // empty values clear
    env.run(&["config", "set", "aliases.SEASONS", ""]);
    env.run(&["config", "set", "random_seed", "none"]);

    let config = show(&env);
    assert_eq!(config["aliases"], serde_json::json!({}));
    assert!(config.get("random_seed").is_none());
}

#[test]
fn test_config_set_alias_is_used_by_check() {
    let env = TestEnv::new();
    env.run(&["config", "set", "aliases.SEASONS", "SEASON"]);

    let output = env.run(&["-q", "check", "SEASONS spring"]);
    assert_eq!(exit_code(&output), 0, "stderr: {}", stderr(&output));
}

#[test]
fn test_config_set_unknown_key() {
    let env = TestEnv::new();
    let output = env.run(&["config", "set", "cache.size", "10"]);

    assert_eq!(exit_code(&output), 2);
    assert!(stderr(&output).contains("Unknown config key: cache.size"));
    assert!(!env.config_path().exists());
}

#[test]
fn test_config_set_invalid_number() {
    let env = TestEnv::new();
    let output = env.run(&["config", "set", "cache.eviction_interval_ticks", "soon"]);

    assert_eq!(exit_code(&output), 2);
    assert!(stderr(&output).contains("Invalid number: soon"));
}

#[test]
fn test_config_reset() {
    let env = TestEnv::new();
    env.write_config(r#"{ aliases: { SEASONS: "SEASON" }, random_seed: 3 }"#);

    let output = env.run(&["--no-json", "config", "reset"]);
    assert_eq!(exit_code(&output), 0);
    assert_eq!(stdout(&output).trim(), "Configuration reset to defaults");

    let config = show(&env);
    assert_eq!(config["aliases"], serde_json::json!({}));
    assert!(config.get("random_seed").is_none());
}

#[test]
fn test_config_default_has_examples() {
    let env = TestEnv::new();
    let output = env.run(&["config", "default"]);

    assert_eq!(exit_code(&output), 0);
    let config: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(config["aliases"]["SEASONS"], "SEASON");
    assert_eq!(config["aliases"]["HAS_ITEM"], "PLAYER_HAS_ITEM");
    assert!(!env.config_path().exists());
}

#[test]
fn test_config_verify_valid() {
    let env = TestEnv::new();
    env.write_config(r#"{ aliases: { SEASONS: "SEASON" } }"#);

    let output = env.run(&["--no-json", "config", "verify"]);
    assert_eq!(exit_code(&output), 0);
    assert!(stdout(&output).contains("Configuration is valid"));

    let output = env.run(&["--json", "config", "verify"]);
    assert_eq!(parse_json(&output)["result"]["valid"], true);
}

#[test]
fn test_config_verify_missing_file() {
    let env = TestEnv::new();
    let output = env.run(&["--no-json", "config", "verify"]);

    assert_eq!(exit_code(&output), 4);
    assert!(stderr(&output).contains("config file not found"));
}

#[test]
fn test_config_verify_invalid_json5() {
    let env = TestEnv::new();
    env.write_config("{ cache: ");

    let output = env.run(&["--no-json", "config", "verify"]);
    assert_eq!(exit_code(&output), 4);
    assert!(stderr(&output).contains("invalid JSON5"));
}

#[test]
fn test_config_verify_reports_every_error() {
    let env = TestEnv::new();
    env.write_config(
        r#"{
            cache: { eviction_interval_ticks: 0 },
            aliases: { SEASON: "TIME", LATER: "NOT_A_KEY" },
        }"#,
    );

    let output = env.run(&["--json", "config", "verify"]);
    assert_eq!(exit_code(&output), 4);

    let json = parse_json(&output);
    assert_eq!(json["error"]["code"], -32004);
    let details = json["error"]["data"]["details"].as_array().unwrap();
    assert_eq!(details.len(), 3);
    assert!(details
        .iter()
        .any(|d| d.as_str().unwrap().starts_with("cache.eviction_interval_ticks")));
    assert!(details
        .iter()
        .any(|d| d.as_str().unwrap().starts_with("aliases.LATER")));
}
