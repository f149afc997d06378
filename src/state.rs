//! host state snapshots that queries are evaluated against
//!
//! the engine itself never mutates these; a host builds them (or loads a
//! scenario file) and lends them to a `QueryContext`.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::query::QueryContext;

pub const DAYS_PER_SEASON: u32 = 28;
pub const DEFAULT_WEATHER: &str = "Sun";

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
            Season::Winter => "winter",
        }
    }
}

impl FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "fall" => Ok(Season::Fall),
            "winter" => Ok(Season::Winter),
            _ => Err(format!("unknown season '{}'", s)),
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// global calendar and weather
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    #[serde(default = "default_season")]
    pub season: Season,
    /// 1-28
    #[serde(default = "default_one")]
    pub day_of_month: u32,
    #[serde(default = "default_one")]
    pub year: u32,
    /// military time, 600 (6am) to 2600 (2am)
    #[serde(default = "default_time_of_day")]
    pub time_of_day: u32,
    #[serde(default = "default_weather")]
    pub weather: String,
}

fn default_season() -> Season {
    Season::Spring
}

fn default_one() -> u32 {
    1
}

fn default_time_of_day() -> u32 {
    600
}

fn default_weather() -> String {
    DEFAULT_WEATHER.to_string()
}

impl Default for WorldState {
    fn default() -> Self {
        Self {
            season: default_season(),
            day_of_month: 1,
            year: 1,
            time_of_day: default_time_of_day(),
            weather: default_weather(),
        }
    }
}

impl WorldState {
    /// weekday for the current day; every season starts on a Monday
    pub fn day_of_week(&self) -> Weekday {
        let index = self.day_of_month.saturating_sub(1) % 7;
        WEEK[index as usize]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    #[serde(default)]
    pub is_outdoors: bool,
    /// season that applies here instead of the world season
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season_override: Option<Season>,
}

impl Location {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_outdoors: false,
            season_override: None,
        }
    }

    pub fn season(&self, world: &WorldState) -> Season {
        self.season_override.unwrap_or(world.season)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// qualified item id, e.g. "(O)128"
    pub id: String,
    #[serde(default)]
    pub quality: u8,
    #[serde(default = "default_stack")]
    pub stack: u32,
    #[serde(default)]
    pub context_tags: Vec<String>,
}

fn default_stack() -> u32 {
    1
}

impl Item {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            quality: 0,
            stack: 1,
            context_tags: Vec::new(),
        }
    }

    pub fn with_stack(mut self, stack: u32) -> Self {
        self.stack = stack;
        self
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.context_tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.id.eq_ignore_ascii_case(id)
    }

    pub fn has_context_tag(&self, tag: &str) -> bool {
        self.context_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    #[serde(default)]
    pub money: u64,
    /// added to RANDOM chances that opt in with `@addDailyLuck`
    #[serde(default)]
    pub daily_luck: f64,
    #[serde(default)]
    pub items: Vec<Item>,
    /// received mail and event flags
    #[serde(default)]
    pub mail: Vec<String>,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// total stack size of an item across the inventory
    pub fn count_item(&self, id: &str) -> u64 {
        self.items
            .iter()
            .filter(|item| item.has_id(id))
            .map(|item| u64::from(item.stack))
            .sum()
    }

    pub fn has_mail(&self, flag: &str) -> bool {
        self.mail.iter().any(|m| m.eq_ignore_ascii_case(flag))
    }
}

/// everything needed to build a context, as loaded from a scenario file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub world: WorldState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<Player>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_item: Option<Item>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_item: Option<Item>,
}

impl Scenario {
    /// load a scenario from a JSON5 file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read state file: {}", path.display()))?;

        Self::from_json5(&content)
            .with_context(|| format!("Failed to parse state file: {}", path.display()))
    }

    pub fn from_json5(content: &str) -> Result<Self> {
        Ok(json5::from_str(content)?)
    }

    /// borrow this scenario as a query context
    pub fn context(&self) -> QueryContext<'_> {
        QueryContext::new(&self.world)
            .with_location(self.location.as_ref())
            .with_player(self.player.as_ref())
            .with_target_item(self.target_item.as_ref())
            .with_input_item(self.input_item.as_ref())
    }
}
