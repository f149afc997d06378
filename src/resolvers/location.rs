//! location resolvers; all are false when the context has no location

use super::matches_any;
use super::world::season_matches;
use crate::query::{QueryArgs, QueryContext, ResolverResult};

/// `LOCATION_SEASON <season>+`, honoring the location's season override
pub fn location_season(args: &QueryArgs<'_>, ctx: &QueryContext<'_>) -> ResolverResult {
    let current = match ctx.location {
        Some(location) => location.season(ctx.world),
        None => ctx.world.season,
    };
    season_matches(args, current)
}

/// `LOCATION_NAME <name>+`
pub fn location_name(args: &QueryArgs<'_>, ctx: &QueryContext<'_>) -> ResolverResult {
    let names = args.required_list(1, "string location name")?;
    Ok(ctx
        .location
        .map(|location| matches_any(&location.name, names))
        .unwrap_or(false))
}

/// `LOCATION_IS_OUTDOORS`
pub fn location_is_outdoors(_args: &QueryArgs<'_>, ctx: &QueryContext<'_>) -> ResolverResult {
    Ok(ctx.location.map(|l| l.is_outdoors).unwrap_or(false))
}
