use anyhow::{Context, Result};
use serde::Serialize;

use slash_db::Database;
use slash_db::models::{ActivityLevel, ActivityRow, ActivityType, NewActivity, ShortcutRow};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ShortcutCreatePayload {
    shortcut_id: i32,
}

/// Appends a `shortcut.create` activity for a freshly created shortcut.
pub fn record_shortcut_created(db: &Database, shortcut: &ShortcutRow) -> Result<ActivityRow> {
    let payload = serde_json::to_string(&ShortcutCreatePayload {
        shortcut_id: shortcut.id,
    })
    .context("failed to marshal activity payload")?;

    let activity = db
        .create_activity(&NewActivity {
            creator_id: shortcut.creator_id,
            activity_type: ActivityType::ShortcutCreate,
            level: ActivityLevel::Info,
            payload,
        })
        .context("failed to create activity")?;

    Ok(activity)
}
