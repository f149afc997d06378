// tests for `gsq parse`, `gsq analyze` and `gsq keys`

use crate::common::{exit_code, parse_json, stderr, stdout, TestEnv};

// ============================================================================
// parse
// ============================================================================

#[test]
fn test_parse_json_clauses() {
    let env = TestEnv::new();
    let output = env.run(&[
        "--json",
        "parse",
        r#"SEASON spring summer, !weekday Sun, LOCATION_NAME "Pierre's Shop""#,
    ]);

    assert_eq!(exit_code(&output), 0);
    let json = parse_json(&output);
    let result = &json["result"];
    assert_eq!(result["valid"], true);

    let clauses = result["clauses"].as_array().unwrap();
    assert_eq!(clauses.len(), 3);

    assert_eq!(clauses[0]["key"], "SEASON");
    assert_eq!(clauses[0]["negated"], false);
    assert_eq!(clauses[0]["args"], serde_json::json!(["spring", "summer"]));

    // aliases are rewritten to the canonical key
    assert_eq!(clauses[1]["key"], "DAY_OF_WEEK");
    assert_eq!(clauses[1]["negated"], true);

    assert_eq!(clauses[2]["args"], serde_json::json!(["Pierre's Shop"]));
    assert!(clauses[2].get("error").is_none());
}

#[test]
fn test_parse_text_output() {
    let env = TestEnv::new();
    let output = env.run(&["--no-json", "parse", r#"ANY "TRUE, FALSE" FALSE, !TRUE"#]);

    assert_eq!(exit_code(&output), 0);
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines, vec![r#"1. ANY "TRUE, FALSE" FALSE"#, "2. !TRUE"]);
}

#[test]
fn test_parse_empty_query() {
    let env = TestEnv::new();
    let output = env.run(&["--no-json", "parse", " , "]);

    assert_eq!(exit_code(&output), 0);
    assert_eq!(stdout(&output).trim(), "(no clauses)");
}

#[test]
fn test_parse_unknown_key_suggests() {
    let env = TestEnv::new();
    let output = env.run(&["--json", "parse", "SEASON spring, SEASN fall"]);

    assert_eq!(exit_code(&output), 3);
    let json = parse_json(&output);
    assert_eq!(json["error"]["code"], -32003);
    assert_eq!(
        json["error"]["message"],
        "'SEASN' isn't a known query or alias"
    );

    let suggestions = json["error"]["data"]["suggestions"].as_array().unwrap();
    assert_eq!(suggestions[0], "SEASON");
}

#[test]
fn test_parse_unknown_key_text() {
    let env = TestEnv::new();
    let output = env.run(&["--no-json", "parse", "WEEKDY Monday"]);

    assert_eq!(exit_code(&output), 3);
    let err = stderr(&output);
    assert!(err.contains("error: 'WEEKDY' isn't a known query or alias"));
    assert!(err.contains("did you mean: WEEKDAY?"));
}

#[test]
fn test_parse_config_alias() {
    let env = TestEnv::new();
    env.write_config(r#"{ aliases: { HAS_ITEM: "PLAYER_HAS_ITEM" } }"#);

    let output = env.run(&["--json", "parse", "has_item (O)128"]);
    assert_eq!(exit_code(&output), 0);
    assert_eq!(parse_json(&output)["result"]["clauses"][0]["key"], "PLAYER_HAS_ITEM");
}

#[test]
fn test_parse_from_stdin() {
    let env = TestEnv::new();
    let output = env.run_with_stdin(&["--json", "parse", "-"], "TIME 600 1200\n");

    assert_eq!(exit_code(&output), 0);
    let json = parse_json(&output);
    assert_eq!(json["result"]["query"], "TIME 600 1200");
    assert_eq!(json["result"]["clauses"][0]["args"], serde_json::json!(["600", "1200"]));
}

// ============================================================================
// analyze
// ============================================================================

#[test]
fn test_analyze_immutably_false() {
    let env = TestEnv::new();
    let output = env.run(&["--json", "analyze", "SEASON spring, !TRUE"]);

    assert_eq!(exit_code(&output), 0);
    let result = &parse_json(&output)["result"];
    assert_eq!(result["valid"], true);
    assert_eq!(result["immutably_true"], false);
    assert_eq!(result["immutably_false"], true);
}

#[test]
fn test_analyze_text() {
    let env = TestEnv::new();

    let output = env.run(&["--no-json", "analyze", "TRUE, !FALSE"]);
    let text = stdout(&output);
    assert!(text.contains("immutably true:  yes"));
    assert!(text.contains("immutably false: no"));

    let output = env.run(&["--no-json", "analyze", "SEASON spring"]);
    let text = stdout(&output);
    assert!(text.contains("immutably true:  no"));
    assert!(text.contains("immutably false: no"));
    assert!(!text.contains("note:"));
}

#[test]
fn test_analyze_invalid_query() {
    let env = TestEnv::new();
    let output = env.run(&["--no-json", "analyze", "NOT_A_KEY, FALSE"]);

    assert_eq!(exit_code(&output), 0);
    let text = stdout(&output);
    assert!(text.contains("immutably false: no"));
    assert!(text.contains("note: query has a parse error"));
}

// ============================================================================
// keys
// ============================================================================

#[test]
fn test_keys_names() {
    let env = TestEnv::new();
    let output = env.run(&["keys", "--names"]);

    assert_eq!(exit_code(&output), 0);
    let text = stdout(&output);
    let names: Vec<&str> = text.lines().collect();
    for expected in ["TRUE", "FALSE", "ANY", "RANDOM", "SEASON", "ITEM_CONTEXT_TAG", "WEEKDAY"] {
        assert!(names.contains(&expected), "missing {}", expected);
    }
}

#[test]
fn test_keys_json_includes_config_aliases() {
    let env = TestEnv::new();
    env.write_config(r#"{ aliases: { SEASONS: "season" } }"#);

    let output = env.run(&["--json", "keys"]);
    assert_eq!(exit_code(&output), 0);

    let json = parse_json(&output);
    let keys = json["result"]["keys"].as_array().unwrap();
    assert_eq!(keys.len(), 20);

    let aliases = json["result"]["aliases"].as_array().unwrap();
    assert!(aliases
        .iter()
        .any(|a| a["alias"] == "SEASONS" && a["key"] == "SEASON"));
    assert!(aliases
        .iter()
        .any(|a| a["alias"] == "WEEKDAY" && a["key"] == "DAY_OF_WEEK"));
}

#[test]
fn test_keys_text() {
    let env = TestEnv::new();
    let output = env.run(&["--no-json", "keys"]);

    let text = stdout(&output);
    assert!(text.starts_with("Query keys:"));
    assert!(text.contains("  PLAYER_HAS_ITEM\n"));
    assert!(text.contains("Aliases:"));
    assert!(text.contains("  PLAYER_MONEY -> PLAYER_CURRENT_MONEY"));
}
