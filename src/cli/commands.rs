use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use rand::rngs::StdRng;
use rand::SeedableRng;

use std::cell::RefCell;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::config::{self, Config};
use crate::query::{Engine, IgnoredKeys, ParsedClause, DEFAULT_SUGGESTION_DISTANCE};
use crate::resolvers::{ignore_set, SEASON_QUERY_KEYS, TIME_QUERY_KEYS};
use crate::state::Scenario;

use super::exit_codes;
use super::output::{
    self, AliasData, AnalyzeData, CheckData, ClauseData, JsonRpcError, KeysData, OutputMode,
    ParseData,
};

#[derive(Parser)]
#[command(name = "gsq")]
#[command(about = "Evaluate and inspect game state query strings")]
#[command(version)]
pub struct Cli {
    /// Path to config file (overrides GSQ_CONFIG env var and default location)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (auto-enabled when stdout is piped)
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Force text output even when stdout is piped
    #[arg(long, global = true, conflicts_with = "json")]
    pub no_json: bool,

    /// Suppress all output on success (errors still go to stderr)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log debug diagnostics to stderr (overrides GSQ_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate a query (exit code 0 when true, 1 when false)
    Check {
        /// Query string, or "-" to read it from stdin
        query: String,

        /// Scenario file (JSON5) with world, location, player and items
        #[arg(short, long)]
        state: Option<PathBuf>,

        /// Skip clauses for a query key or alias (repeatable)
        #[arg(short, long, action = clap::ArgAction::Append)]
        ignore: Vec<String>,

        /// Skip season clauses (SEASON, LOCATION_SEASON)
        #[arg(long)]
        ignore_season: bool,

        /// Skip time clauses (TIME, DAY_OF_WEEK, DAY_OF_MONTH)
        #[arg(long)]
        ignore_time: bool,

        /// Seed for RANDOM clauses (overrides random_seed in config)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show how a query is split into clauses
    Parse {
        /// Query string, or "-" to read it from stdin
        query: String,
    },

    /// Report whether a query is true or false regardless of state
    Analyze {
        /// Query string, or "-" to read it from stdin
        query: String,
    },

    /// List registered query keys and aliases
    Keys {
        /// Output one name per line
        #[arg(long)]
        names: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Show configuration file path
    Path,
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "cache.min_entries_to_evict", "aliases.SEASONS")
        key: String,
        /// Value to set
        value: String,
    },
    /// Reset configuration to defaults
    Reset,
    /// Show the default configuration with example aliases
    Default,
    /// Verify configuration file for errors
    Verify,
}

/// resolve a query argument, reading from stdin if "-" is passed
fn resolve_query(query: &str) -> Result<String> {
    if query == "-" {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("failed to read query from stdin")?;
        Ok(input.trim().to_string())
    } else {
        Ok(query.to_string())
    }
}

/// report an error in the current output mode and exit with `code`
fn fail(
    mode: OutputMode,
    code: i32,
    message: &str,
    suggestions: Vec<String>,
    details: Vec<String>,
) -> ! {
    if mode.is_json() {
        let error = JsonRpcError::new(code, message)
            .with_suggestions(suggestions)
            .with_details(details);
        output::print_json_error(&error);
    } else {
        eprintln!("error: {}", message);
        for detail in &details {
            eprintln!("  - {}", detail);
        }
        if !suggestions.is_empty() {
            eprintln!("  did you mean: {}?", suggestions.join(", "));
        }
    }
    std::process::exit(code)
}

fn load_config(config_path: Option<&Path>, mode: OutputMode) -> Config {
    let loaded = config::get_config_path(config_path).and_then(|path| config::load(&path));
    match loaded {
        Ok(config) => config,
        Err(e) => fail(mode, exit_codes::CONFIG_ERROR, &format!("{:#}", e), vec![], vec![]),
    }
}

fn load_engine(config_path: Option<&Path>, mode: OutputMode) -> (Config, Engine) {
    let config = load_config(config_path, mode);
    match Engine::from_config(&config) {
        Ok(engine) => (config, engine),
        Err(e) => fail(mode, exit_codes::CONFIG_ERROR, &format!("{:#}", e), vec![], vec![]),
    }
}

/// collect ignored keys, mapping aliases to the keys clauses are parsed to
fn ignored_keys(engine: &Engine, keys: &[String], season: bool, time: bool) -> IgnoredKeys {
    let mut groups: Vec<&[&str]> = Vec::new();
    if season {
        groups.push(SEASON_QUERY_KEYS);
    }
    if time {
        groups.push(TIME_QUERY_KEYS);
    }

    let mut ignored = ignore_set(groups);
    for key in keys.iter().map(|k| k.trim()).filter(|k| !k.is_empty()) {
        let canonical = engine.registry().resolve_alias(key).unwrap_or(key);
        ignored.insert(canonical);
    }
    ignored
}

fn clause_data(clause: &ParsedClause) -> ClauseData {
    ClauseData {
        negated: clause.negated,
        key: clause.key().to_string(),
        args: clause.args().to_vec(),
        error: clause.error().map(String::from),
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

pub fn execute(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    let output_mode = OutputMode::from_flags(cli.json, cli.no_json, cli.quiet, false);

    match cli.command {
        Commands::Check {
            query,
            state,
            ignore,
            ignore_season,
            ignore_time,
            seed,
        } => {
            let query = resolve_query(&query)?;
            let (config, engine) = load_engine(config_path, output_mode);

            let scenario = match &state {
                Some(path) => Scenario::load(path).unwrap_or_else(|e| {
                    fail(output_mode, exit_codes::STATE_ERROR, &format!("{:#}", e), vec![], vec![])
                }),
                None => Scenario::default(),
            };

            let seed = seed.or(config.random_seed);
            let rng = RefCell::new(match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            });

            let ignored = ignored_keys(&engine, &ignore, ignore_season, ignore_time);
            let mut ctx = scenario.context().with_random(&rng);
            if !ignored.is_empty() {
                ctx = ctx.with_ignored_keys(&ignored);
            }

            let result = engine.check_conditions(query.as_str(), &ctx);

            match output_mode {
                OutputMode::Json => {
                    let ignored = ignored.sorted().into_iter().map(String::from).collect();
                    output::print_json(&CheckData {
                        query,
                        result,
                        ignored,
                        seed,
                    });
                }
                OutputMode::Quiet => {}
                OutputMode::Text | OutputMode::Names => println!("{}", result),
            }

            let code = exit_codes::for_check(result);
            if code != exit_codes::SUCCESS {
                std::process::exit(code);
            }
            Ok(())
        }

        Commands::Parse { query } => {
            let query = resolve_query(&query)?;
            let (_, engine) = load_engine(config_path, output_mode);
            let parsed = engine.parse(&query);

            if let Some(message) = parsed.error() {
                let key = parsed.iter().next().map(|c| c.key()).unwrap_or("");
                let suggestions = engine.registry().suggest(key, DEFAULT_SUGGESTION_DISTANCE);
                fail(output_mode, exit_codes::INVALID_QUERY, message, suggestions, vec![]);
            }

            match output_mode {
                OutputMode::Json => {
                    output::print_json(&ParseData {
                        query: query.clone(),
                        valid: parsed.is_valid(),
                        clauses: parsed.iter().map(clause_data).collect(),
                    });
                }
                OutputMode::Quiet => {}
                OutputMode::Text | OutputMode::Names => {
                    if parsed.is_empty() {
                        println!("(no clauses)");
                    }
                    for (i, clause) in parsed.iter().enumerate() {
                        println!("{}. {}", i + 1, clause);
                    }
                }
            }
            Ok(())
        }

        Commands::Analyze { query } => {
            let query = resolve_query(&query)?;
            let (_, engine) = load_engine(config_path, output_mode);

            let data = AnalyzeData {
                valid: engine.parse(&query).is_valid(),
                immutably_true: engine.is_immutably_true(query.as_str()),
                immutably_false: engine.is_immutably_false(query.as_str()),
                query,
            };

            match output_mode {
                OutputMode::Json => output::print_json(&data),
                OutputMode::Quiet => {}
                OutputMode::Text | OutputMode::Names => {
                    println!("immutably true:  {}", yes_no(data.immutably_true));
                    println!("immutably false: {}", yes_no(data.immutably_false));
                    if !data.valid {
                        println!("note: query has a parse error and always evaluates to false");
                    }
                }
            }
            Ok(())
        }

        Commands::Keys { names } => {
            let (_, engine) = load_engine(config_path, output_mode);
            let registry = engine.registry();
            let keys_mode = OutputMode::from_flags(cli.json, cli.no_json, cli.quiet, names);

            match keys_mode {
                OutputMode::Names => {
                    for key in registry.keys() {
                        println!("{}", key);
                    }
                    for (alias, _) in registry.aliases() {
                        println!("{}", alias);
                    }
                }
                OutputMode::Json => {
                    output::print_json(&KeysData {
                        keys: registry.keys().into_iter().map(String::from).collect(),
                        aliases: registry
                            .aliases()
                            .into_iter()
                            .map(|(alias, key)| AliasData {
                                alias: alias.to_string(),
                                key: key.to_string(),
                            })
                            .collect(),
                    });
                }
                OutputMode::Quiet => {}
                OutputMode::Text => {
                    println!("Query keys:");
                    for key in registry.keys() {
                        println!("  {}", key);
                    }
                    let aliases = registry.aliases();
                    if !aliases.is_empty() {
                        println!();
                        println!("Aliases:");
                        for (alias, key) in aliases {
                            println!("  {} -> {}", alias, key);
                        }
                    }
                }
            }
            Ok(())
        }

        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                let config = load_config(config_path, output_mode);
                let json =
                    serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
                println!("{}", json);
                Ok(())
            }
            ConfigCommands::Path => {
                let path = config::get_config_path(config_path)?;
                println!("{}", path.display());
                Ok(())
            }
            ConfigCommands::Set { key, value } => {
                let path = config::get_config_path(config_path)?;
                let mut config = load_config(config_path, output_mode);
                config::set_value(&mut config, &key, &value)?;
                config::save(&config, &path)?;
                if !output_mode.is_quiet() {
                    println!("Set {} = {}", key, value);
                }
                Ok(())
            }
            ConfigCommands::Reset => {
                let path = config::get_config_path(config_path)?;
                config::save(&Config::default(), &path)?;
                if !output_mode.is_quiet() {
                    println!("Configuration reset to defaults");
                }
                Ok(())
            }
            ConfigCommands::Default => {
                let config = config::default_with_examples();
                let json =
                    serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
                println!("{}", json);
                Ok(())
            }
            ConfigCommands::Verify => {
                let path = config::get_config_path(config_path)?;
                let errors = match config::verify(&path) {
                    Ok(errors) => errors,
                    Err(e) => {
                        let message = format!("{:#}", e);
                        fail(output_mode, exit_codes::CONFIG_ERROR, &message, vec![], vec![])
                    }
                };

                if !errors.is_empty() {
                    let message = format!(
                        "configuration has {} error(s): {}",
                        errors.len(),
                        path.display()
                    );
                    fail(output_mode, exit_codes::CONFIG_ERROR, &message, vec![], errors);
                }

                match output_mode {
                    OutputMode::Json => output::print_json(&serde_json::json!({
                        "valid": true,
                        "path": path.display().to_string(),
                    })),
                    OutputMode::Quiet => {}
                    _ => println!("✓ Configuration is valid: {}", path.display()),
                }
                Ok(())
            }
        },

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "gsq", &mut io::stdout());
            Ok(())
        }
    }
}
