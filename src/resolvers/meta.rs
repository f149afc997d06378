//! constant, combinator and random resolvers

use crate::query::{QueryArgs, QueryContext, ResolverError, ResolverResult};

/// RANDOM flag that adds the player's daily luck to the chance
const ADD_DAILY_LUCK: &str = "@addDailyLuck";

pub fn always_true(_args: &QueryArgs<'_>, _ctx: &QueryContext<'_>) -> ResolverResult {
    Ok(true)
}

pub fn always_false(_args: &QueryArgs<'_>, _ctx: &QueryContext<'_>) -> ResolverResult {
    Ok(false)
}

/// `ANY <query>+`: true if any sub-query is true
pub fn any(args: &QueryArgs<'_>, ctx: &QueryContext<'_>) -> ResolverResult {
    let queries = args.required_list(1, "string query")?;
    let engine = args.engine();
    Ok(queries
        .iter()
        .any(|query| engine.check_conditions(query.as_str(), ctx)))
}

/// `RANDOM <chance> [@addDailyLuck]`
pub fn random(args: &QueryArgs<'_>, ctx: &QueryContext<'_>) -> ResolverResult {
    let mut chance = args.required_float(1, "float chance")?;

    for (offset, flag) in args.rest(2).iter().enumerate() {
        if !flag.eq_ignore_ascii_case(ADD_DAILY_LUCK) {
            return Err(ResolverError::invalid(
                offset + 2,
                "string flag",
                flag.as_str(),
                "isn't a recognized flag",
            ));
        }
        let player = ctx.player.ok_or(ResolverError::MissingContext("player"))?;
        chance += player.daily_luck;
    }

    Ok(ctx.random_f64() < chance)
}
