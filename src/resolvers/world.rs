//! calendar, clock and weather resolvers

use chrono::Weekday;

use super::{in_range, matches_any, read_range};
use crate::query::{QueryArgs, QueryContext, ResolverError, ResolverResult};
use crate::state::Season;

/// `SEASON <season>+`
pub fn season(args: &QueryArgs<'_>, ctx: &QueryContext<'_>) -> ResolverResult {
    season_matches(args, ctx.world.season)
}

/// true if `current` is one of the seasons listed from index 1
pub(super) fn season_matches(args: &QueryArgs<'_>, current: Season) -> ResolverResult {
    let seasons = args.required_list(1, "string season")?;

    for (offset, value) in seasons.iter().enumerate() {
        let season: Season = value.parse().map_err(|_| {
            ResolverError::invalid(offset + 1, "string season", value.as_str(), "isn't a valid season")
        })?;
        if season == current {
            return Ok(true);
        }
    }
    Ok(false)
}

/// `DAY_OF_MONTH <day|even|odd>+`
pub fn day_of_month(args: &QueryArgs<'_>, ctx: &QueryContext<'_>) -> ResolverResult {
    let days = args.required_list(1, "string day")?;
    let today = ctx.world.day_of_month;

    for (offset, value) in days.iter().enumerate() {
        let matched = if value.eq_ignore_ascii_case("even") {
            today % 2 == 0
        } else if value.eq_ignore_ascii_case("odd") {
            today % 2 == 1
        } else {
            let day = args.required_int(offset + 1, "int day")?;
            day == i64::from(today)
        };
        if matched {
            return Ok(true);
        }
    }
    Ok(false)
}

/// `DAY_OF_WEEK <weekday>+`, accepting full or short names
pub fn day_of_week(args: &QueryArgs<'_>, ctx: &QueryContext<'_>) -> ResolverResult {
    let days = args.required_list(1, "string weekday")?;
    let today = ctx.world.day_of_week();

    for (offset, value) in days.iter().enumerate() {
        let day: Weekday = value.parse().map_err(|_| {
            ResolverError::invalid(
                offset + 1,
                "string weekday",
                value.as_str(),
                "isn't a valid day of week",
            )
        })?;
        if day == today {
            return Ok(true);
        }
    }
    Ok(false)
}

/// `TIME <min> [max]`, inclusive, in military time
pub fn time(args: &QueryArgs<'_>, ctx: &QueryContext<'_>) -> ResolverResult {
    let range = read_range(args, 1)?;
    Ok(in_range(i64::from(ctx.world.time_of_day), range))
}

/// `YEAR <min> [max]`
pub fn year(args: &QueryArgs<'_>, ctx: &QueryContext<'_>) -> ResolverResult {
    let range = read_range(args, 1)?;
    Ok(in_range(i64::from(ctx.world.year), range))
}

/// `WEATHER <weather>+`
pub fn weather(args: &QueryArgs<'_>, ctx: &QueryContext<'_>) -> ResolverResult {
    let weathers = args.required_list(1, "string weather")?;
    Ok(matches_any(&ctx.world.weather, weathers))
}
