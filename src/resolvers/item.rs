//! resolvers that inspect the target or input item
//!
//! the first argument picks the item (`Target` or `Input`); a missing item
//! makes the clause false.

use super::{in_range, read_range};
use crate::query::{ItemSlot, QueryArgs, QueryContext, ResolverError, ResolverResult};
use crate::state::Item;

/// prefix on an ITEM_CONTEXT_TAG tag that requires the tag to be absent
const EXCLUDED_TAG_PREFIX: char = '!';

fn item<'a>(args: &QueryArgs<'_>, ctx: &QueryContext<'a>) -> Result<Option<&'a Item>, ResolverError> {
    let value = args.required(1, "string item type")?;
    let slot = ItemSlot::parse(value).ok_or_else(|| {
        ResolverError::invalid(1, "string item type", value, "must be Target or Input")
    })?;
    Ok(ctx.item(slot))
}

/// `ITEM_ID <Target|Input> <id>+`
pub fn item_id(args: &QueryArgs<'_>, ctx: &QueryContext<'_>) -> ResolverResult {
    let item = item(args, ctx)?;
    let ids = args.required_list(2, "string item id")?;
    Ok(item
        .map(|item| ids.iter().any(|id| item.has_id(id)))
        .unwrap_or(false))
}

/// `ITEM_QUALITY <Target|Input> <min> [max]`
pub fn item_quality(args: &QueryArgs<'_>, ctx: &QueryContext<'_>) -> ResolverResult {
    let item = item(args, ctx)?;
    let range = read_range(args, 2)?;
    Ok(item
        .map(|item| in_range(i64::from(item.quality), range))
        .unwrap_or(false))
}

/// `ITEM_STACK <Target|Input> <min> [max]`
pub fn item_stack(args: &QueryArgs<'_>, ctx: &QueryContext<'_>) -> ResolverResult {
    let item = item(args, ctx)?;
    let range = read_range(args, 2)?;
    Ok(item
        .map(|item| in_range(i64::from(item.stack), range))
        .unwrap_or(false))
}

/// `ITEM_CONTEXT_TAG <Target|Input> <tag>+`; every tag must match, `!tag` must be absent
pub fn item_context_tag(args: &QueryArgs<'_>, ctx: &QueryContext<'_>) -> ResolverResult {
    let item = item(args, ctx)?;
    let tags = args.required_list(2, "string context tag")?;
    let Some(item) = item else {
        return Ok(false);
    };

    Ok(tags.iter().all(|tag| match tag.strip_prefix(EXCLUDED_TAG_PREFIX) {
        Some(excluded) => !item.has_context_tag(excluded),
        None => item.has_context_tag(tag),
    }))
}
