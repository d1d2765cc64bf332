use tracing::{debug, info, warn};

use slash_db::Database;
use slash_db::models::{
    FindShortcut, FindUser, NewShortcut, Role, ShortcutRow, UpdateShortcut, Visibility,
};
use slash_db::tags::encode_tags;
use slash_types::api::{CreateShortcutRequest, UpdateShortcutRequest};
use slash_types::models::Shortcut;

use crate::activity::record_shortcut_created;
use crate::convert::{convert_og_metadata_to_store, convert_shortcut, convert_visibility_to_store};
use crate::error::ApiError;

/// Update-mask paths that map onto a shortcut column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShortcutField {
    Link,
    Title,
    Tags,
    Description,
    Visibility,
    OgMetadata,
}

impl ShortcutField {
    fn from_path(path: &str) -> Option<Self> {
        match path {
            "link" => Some(Self::Link),
            "title" => Some(Self::Title),
            "tags" => Some(Self::Tags),
            "description" => Some(Self::Description),
            "visibility" => Some(Self::Visibility),
            "og_metadata" => Some(Self::OgMetadata),
            _ => None,
        }
    }
}

/// Turns the masked fields of `request` into a sparse store update.
///
/// Unknown paths are skipped. `og_metadata` is only applied when the request
/// actually carries metadata.
pub fn build_update(id: i32, request: &UpdateShortcutRequest) -> UpdateShortcut {
    let mut update = UpdateShortcut::new(id);

    for path in &request.update_mask {
        let Some(field) = ShortcutField::from_path(path) else {
            debug!("Ignoring unknown update path '{}'", path);
            continue;
        };

        match field {
            ShortcutField::Link => update.link = Some(request.link.clone()),
            ShortcutField::Title => update.title = Some(request.title.clone()),
            ShortcutField::Tags => update.tag = Some(encode_tags(&request.tags)),
            ShortcutField::Description => update.description = Some(request.description.clone()),
            ShortcutField::Visibility => {
                update.visibility = Some(convert_visibility_to_store(request.visibility))
            }
            ShortcutField::OgMetadata => {
                if let Some(metadata) = &request.og_metadata {
                    update.og_metadata = Some(convert_og_metadata_to_store(metadata));
                }
            }
        }
    }

    update
}

/// Access control and orchestration for shortcuts.
///
/// Every operation takes the authenticated caller's user id explicitly.
/// Private shortcuts are visible to their creator only; mutation is allowed
/// to the creator and to admins.
pub struct ShortcutService<'a> {
    db: &'a Database,
}

impl<'a> ShortcutService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// The caller's private shortcuts first, then every workspace and public one.
    pub fn list(&self, caller_id: i32) -> Result<Vec<Shortcut>, ApiError> {
        let visible = self
            .db
            .list_shortcuts(&FindShortcut {
                visibility_list: Some(vec![Visibility::Workspace, Visibility::Public]),
                ..Default::default()
            })
            .map_err(|e| ApiError::from_store("failed to fetch visible shortcut list", e))?;

        let mut shortcuts = self
            .db
            .list_shortcuts(&FindShortcut {
                visibility_list: Some(vec![Visibility::Private]),
                creator_id: Some(caller_id),
                ..Default::default()
            })
            .map_err(|e| ApiError::from_store("failed to fetch private shortcut list", e))?;

        shortcuts.extend(visible);
        Ok(shortcuts.into_iter().map(convert_shortcut).collect())
    }

    pub fn get(&self, caller_id: i32, name: &str) -> Result<Shortcut, ApiError> {
        let shortcut = self.find_by_name(name)?;

        if shortcut.visibility == Visibility::Private && shortcut.creator_id != caller_id {
            return Err(ApiError::PermissionDenied);
        }

        Ok(convert_shortcut(shortcut))
    }

    /// Persists a new shortcut owned by the caller.
    ///
    /// The creation activity is best-effort: if it cannot be written the
    /// failure is logged and the shortcut is still returned.
    pub fn create(
        &self,
        caller_id: i32,
        request: CreateShortcutRequest,
    ) -> Result<Shortcut, ApiError> {
        let create = NewShortcut {
            creator_id: caller_id,
            name: request.name,
            link: request.link,
            title: request.title,
            tags: request.tags,
            description: request.description,
            visibility: convert_visibility_to_store(request.visibility),
            og_metadata: request
                .og_metadata
                .as_ref()
                .map(convert_og_metadata_to_store)
                .unwrap_or_default(),
        };

        let shortcut = self
            .db
            .create_shortcut(&create)
            .map_err(|e| ApiError::from_store("failed to create shortcut", e))?;

        if let Err(e) = record_shortcut_created(self.db, &shortcut) {
            warn!(
                "Shortcut {} created without activity record: {:#}",
                shortcut.id, e
            );
        }

        info!(
            "User {} created shortcut '{}' ({})",
            caller_id, shortcut.name, shortcut.id
        );
        Ok(convert_shortcut(shortcut))
    }

    pub fn update(
        &self,
        caller_id: i32,
        name: &str,
        request: &UpdateShortcutRequest,
    ) -> Result<Shortcut, ApiError> {
        if request.update_mask.is_empty() {
            return Err(ApiError::InvalidArgument("update_mask is required".into()));
        }

        let shortcut = self.find_mutable(caller_id, name)?;

        let update = build_update(shortcut.id, request);
        let shortcut = self
            .db
            .update_shortcut(&update)
            .map_err(|e| ApiError::from_store("failed to update shortcut", e))?;

        Ok(convert_shortcut(shortcut))
    }

    pub fn delete(&self, caller_id: i32, name: &str) -> Result<(), ApiError> {
        let shortcut = self.find_mutable(caller_id, name)?;

        self.db
            .delete_shortcut(shortcut.id)
            .map_err(|e| ApiError::from_store("failed to delete shortcut", e))?;

        info!("User {} deleted shortcut '{}' ({})", caller_id, name, shortcut.id);
        Ok(())
    }

    fn find_by_name(&self, name: &str) -> Result<ShortcutRow, ApiError> {
        self.db
            .get_shortcut(&FindShortcut {
                name: Some(name.to_string()),
                ..Default::default()
            })
            .map_err(|e| ApiError::from_store("failed to get shortcut by name", e))?
            .ok_or_else(|| ApiError::NotFound("shortcut not found".into()))
    }

    /// Resolves `name` for an update or delete by `caller_id`, who must be
    /// its creator or an admin. The caller's user record is only consulted
    /// when they are not the creator.
    fn find_mutable(&self, caller_id: i32, name: &str) -> Result<ShortcutRow, ApiError> {
        let shortcut = self.find_by_name(name)?;
        if shortcut.creator_id == caller_id {
            return Ok(shortcut);
        }

        let caller = self
            .db
            .get_user(&FindUser {
                id: Some(caller_id),
                ..Default::default()
            })
            .map_err(|e| ApiError::from_store("failed to get current user", e))?
            .ok_or(ApiError::PermissionDenied)?;

        if caller.role != Role::Admin {
            return Err(ApiError::PermissionDenied);
        }

        Ok(shortcut)
    }
}
