// tests for `gsq check`

use crate::common::{exit_code, parse_json, stderr, stdout, TestEnv};

const SCENARIO: &str = r#"{
    // summer, day 3 (a Wednesday), raining at the beach
    world: { season: "summer", day_of_month: 3, time_of_day: 900, weather: "Rain" },
    location: { name: "Beach", is_outdoors: true },
    player: { name: "Sam", money: 750, items: [ { id: "(O)128", stack: 3 } ] },
}"#;

#[test]
fn test_check_true_exits_zero() {
    let env = TestEnv::new();
    let output = env.run(&["--no-json", "check", "TRUE"]);

    assert_eq!(exit_code(&output), 0);
    assert_eq!(stdout(&output).trim(), "true");
}

#[test]
fn test_check_false_exits_one() {
    let env = TestEnv::new();
    let output = env.run(&["--no-json", "check", "FALSE"]);

    assert_eq!(exit_code(&output), 1);
    assert_eq!(stdout(&output).trim(), "false");
}

#[test]
fn test_check_default_state() {
    let env = TestEnv::new();

    // spring 1, year 1 without a state file
    assert_eq!(exit_code(&env.run(&["-q", "check", "SEASON spring, YEAR 1"])), 0);
    assert_eq!(exit_code(&env.run(&["-q", "check", "SEASON winter"])), 1);
}

#[test]
fn test_check_with_state_file() {
    let env = TestEnv::new();
    let state = env.write("state.json5", SCENARIO);
    let state = state.to_str().unwrap();

    let output = env.run(&[
        "--no-json",
        "check",
        "SEASON summer, WEEKDAY Wed, LOCATION Beach, PLAYER_HAS_ITEM (O)128 3, WEATHER rain",
        "--state",
        state,
    ]);
    assert_eq!(exit_code(&output), 0, "stderr: {}", stderr(&output));

    let output = env.run(&["--no-json", "check", "!WEATHER Rain", "-s", state]);
    assert_eq!(exit_code(&output), 1);
}

#[test]
fn test_check_json_output() {
    let env = TestEnv::new();
    let state = env.write("state.json5", SCENARIO);

    let output = env.run(&[
        "--json",
        "check",
        "PLAYER_MONEY 500",
        "--state",
        state.to_str().unwrap(),
    ]);

    assert_eq!(exit_code(&output), 0);
    let json = parse_json(&output);
    assert_eq!(json["jsonrpc"], "2.0");
    assert_eq!(json["result"]["query"], "PLAYER_MONEY 500");
    assert_eq!(json["result"]["result"], true);
    assert!(json["result"].get("ignored").is_none());
}

#[test]
fn test_check_unknown_key_fails_closed() {
    let env = TestEnv::new();
    let output = env.run(&["--no-json", "check", "TRUE, NOT_A_REAL_KEY"]);

    assert_eq!(exit_code(&output), 1);
    assert_eq!(stdout(&output).trim(), "false");
    assert!(stderr(&output).contains("isn't a known query or alias"));
}

#[test]
fn test_check_negated_unknown_key_is_still_false() {
    let env = TestEnv::new();
    let output = env.run(&["-q", "check", "!NOT_A_REAL_KEY"]);
    assert_eq!(exit_code(&output), 1);
}

#[test]
fn test_check_resolver_error_is_logged() {
    let env = TestEnv::new();
    let output = env.run(&["--no-json", "check", "SEASON autumn"]);

    assert_eq!(exit_code(&output), 1);
    assert!(stderr(&output).contains("isn't a valid season"));
}

#[test]
fn test_check_ignore_key() {
    let env = TestEnv::new();

    let output = env.run(&["--no-json", "check", "SEASON winter, TRUE"]);
    assert_eq!(exit_code(&output), 1);

    let output = env.run(&["--no-json", "check", "SEASON winter, TRUE", "--ignore", "season"]);
    assert_eq!(exit_code(&output), 0);

    // ignoring a key doesn't skip the other clauses
    let output = env.run(&["--no-json", "check", "SEASON winter, FALSE", "-i", "SEASON"]);
    assert_eq!(exit_code(&output), 1);
}

#[test]
fn test_check_ignore_alias_matches_canonical_key() {
    let env = TestEnv::new();
    let output = env.run(&["--json", "check", "DAY_OF_WEEK Sunday", "--ignore", "WEEKDAY"]);

    assert_eq!(exit_code(&output), 0);
    let json = parse_json(&output);
    assert_eq!(json["result"]["ignored"], serde_json::json!(["DAY_OF_WEEK"]));
}

#[test]
fn test_check_ignore_season_and_time() {
    let env = TestEnv::new();
    let query = "LOCATION_SEASON fall, TIME 2000 2200, DAY_OF_MONTH 20";

    assert_eq!(exit_code(&env.run(&["-q", "check", query])), 1);
    assert_eq!(exit_code(&env.run(&["-q", "check", query, "--ignore-season"])), 1);
    assert_eq!(
        exit_code(&env.run(&["-q", "check", query, "--ignore-season", "--ignore-time"])),
        0
    );
}

#[test]
fn test_check_seed_is_reproducible() {
    let env = TestEnv::new();
    let query = "ANY \"RANDOM 0.5, RANDOM 0.5\" \"RANDOM 0.5, RANDOM 0.5\"";

    let results: Vec<i32> = (0..3)
        .map(|_| exit_code(&env.run(&["-q", "check", query, "--seed", "1234"])))
        .collect();
    assert!(results.iter().all(|code| *code == results[0]));

    let output = env.run(&["--json", "check", "RANDOM 1", "--seed", "1234"]);
    assert_eq!(parse_json(&output)["result"]["seed"], 1234);
}

#[test]
fn test_check_seed_from_config() {
    let env = TestEnv::new();
    env.write_config(r#"{ random_seed: 99 }"#);

    let output = env.run(&["--json", "check", "RANDOM 1"]);
    assert_eq!(exit_code(&output), 0);
    assert_eq!(parse_json(&output)["result"]["seed"], 99);

    let output = env.run(&["--json", "check", "RANDOM 1", "--seed", "5"]);
    assert_eq!(parse_json(&output)["result"]["seed"], 5);
}

#[test]
fn test_check_query_from_stdin() {
    let env = TestEnv::new();

    let output = env.run_with_stdin(&["--no-json", "check", "-"], "SEASON spring\n");
    assert_eq!(exit_code(&output), 0);
    assert_eq!(stdout(&output).trim(), "true");

    let output = env.run_with_stdin(&["--no-json", "check", "-"], "SEASON fall\n");
    assert_eq!(exit_code(&output), 1);
}

#[test]
fn test_check_missing_state_file() {
    let env = TestEnv::new();
    let missing = env.path().join("missing.json5");

    let output = env.run(&["--no-json", "check", "TRUE", "--state", missing.to_str().unwrap()]);
    assert_eq!(exit_code(&output), 5);
    assert!(stderr(&output).contains("Failed to read state file"));
}

#[test]
fn test_check_invalid_state_file_json_error() {
    let env = TestEnv::new();
    let state = env.write("state.json5", "{ world: { season: \"autumn\" } }");

    let output = env.run(&["--json", "check", "TRUE", "--state", state.to_str().unwrap()]);
    assert_eq!(exit_code(&output), 5);

    let json = parse_json(&output);
    assert_eq!(json["error"]["code"], -32005);
    assert!(json["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Failed to parse state file"));
}

#[test]
fn test_check_config_alias() {
    let env = TestEnv::new();
    env.write_config(r#"{ aliases: { SEASONS: "SEASON" } }"#);

    let output = env.run(&["--no-json", "check", "SEASONS spring"]);
    assert_eq!(exit_code(&output), 0, "stderr: {}", stderr(&output));
}

#[test]
fn test_check_bad_config_alias() {
    let env = TestEnv::new();
    env.write_config(r#"{ aliases: { SEASONS: "NOT_A_KEY" } }"#);

    let output = env.run(&["--no-json", "check", "TRUE"]);
    assert_eq!(exit_code(&output), 4);
    assert!(stderr(&output).contains("Invalid alias in config: SEASONS"));
}

#[test]
fn test_check_zero_eviction_interval_is_config_error() {
    let env = TestEnv::new();
    env.write_config(r#"{ cache: { eviction_interval_ticks: 0 } }"#);

    let output = env.run(&["--no-json", "check", "TRUE"]);
    assert_eq!(exit_code(&output), 4);
    assert!(stderr(&output).contains("cache.eviction_interval_ticks: must be greater than 0"));
}
