//! Status command handlers.
//!
//! Fetch a fresh snapshot of the chat's farm and render the readiness of one
//! resource kind, or the Floating Island schedule. These commands are
//! read-only: notification flags are never touched.

use log::debug;

use crate::{
    commands::{
        CommandContext, CommandResult,
        markdown_response::{
            format_farm_required, format_fetch_error, format_island_schedule,
            format_no_island_events, format_nothing_active, format_nothing_found, format_status,
        },
    },
    farm::{FarmSnapshot, ResourceKind, SnapshotSource},
    readiness::ReadinessScanner,
};

fn answer(response: String) -> CommandResult {
    CommandResult {
        response,
        farm_to_register: None,
    }
}

/// Fetches the snapshot of the chat's farm, or the message to answer instead.
async fn fetch_snapshot<S: SnapshotSource>(
    context: &CommandContext,
    source: &S,
) -> Result<FarmSnapshot, CommandResult> {
    let Some(farm_id) = &context.farm_id else {
        debug!("no farm registered for {}", context.chat_id);
        return Err(answer(format_farm_required()));
    };

    source
        .fetch_farm_snapshot(farm_id)
        .await
        .map_err(|_| answer(format_fetch_error()))
}

/// Status listing of one resource kind.
pub async fn handle_status<S: SnapshotSource>(
    context: &CommandContext,
    kind: ResourceKind,
    source: &S,
) -> CommandResult {
    debug!("handling {} status command for {}", kind.plural(), context.chat_id);

    let snapshot = match fetch_snapshot(context, source).await {
        Ok(snapshot) => snapshot,
        Err(result) => return result,
    };

    let is_empty = match kind {
        ResourceKind::Beehive => snapshot.beehives.is_empty(),
        _ => snapshot.instances(kind).is_empty(),
    };
    if is_empty {
        return answer(format_nothing_found(kind));
    }

    let lines = ReadinessScanner::new(&snapshot, context.now).status(kind);
    if lines.is_empty() {
        return answer(format_nothing_active(kind));
    }

    answer(format_status(kind, &snapshot.farm_id, &lines))
}

/// Floating Island schedule.
pub async fn handle_globe<S: SnapshotSource>(context: &CommandContext, source: &S) -> CommandResult {
    debug!("handling globe command for {}", context.chat_id);

    let snapshot = match fetch_snapshot(context, source).await {
        Ok(snapshot) => snapshot,
        Err(result) => return result,
    };

    if snapshot.floating_island.is_empty() {
        return answer(format_no_island_events());
    }

    let schedule = ReadinessScanner::new(&snapshot, context.now).island_status();
    answer(format_island_schedule(&schedule))
}
