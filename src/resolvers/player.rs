//! player resolvers
//!
//! these need a player in the context; evaluating one without a player is a
//! host error and fails the query.

use super::{in_range, read_range};
use crate::query::{QueryArgs, QueryContext, ResolverError, ResolverResult};
use crate::state::Player;

fn player<'a>(ctx: &QueryContext<'a>) -> Result<&'a Player, ResolverError> {
    ctx.player.ok_or(ResolverError::MissingContext("player"))
}

fn saturating_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// `PLAYER_HAS_ITEM <itemId> [min] [max]`, min defaults to 1
pub fn has_item(args: &QueryArgs<'_>, ctx: &QueryContext<'_>) -> ResolverResult {
    let id = args.required(1, "string item id")?;
    let min = args.optional_int(2, "int min", 1)?;
    let max = args.optional_int(3, "int max", i64::MAX)?;

    let count = player(ctx)?.count_item(id);
    Ok(in_range(saturating_i64(count), (min, max)))
}

/// `PLAYER_CURRENT_MONEY <min> [max]`
pub fn current_money(args: &QueryArgs<'_>, ctx: &QueryContext<'_>) -> ResolverResult {
    let range = read_range(args, 1)?;
    Ok(in_range(saturating_i64(player(ctx)?.money), range))
}

/// `PLAYER_HAS_MAIL <flag>+`
pub fn has_mail(args: &QueryArgs<'_>, ctx: &QueryContext<'_>) -> ResolverResult {
    let flags = args.required_list(1, "string mail flag")?;
    let player = player(ctx)?;
    Ok(flags.iter().any(|flag| player.has_mail(flag)))
}
