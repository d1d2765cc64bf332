//! Translation between storage rows (slash-db) and the wire types
//! (slash-types). Pure functions only.

use slash_db::models::{self as store, ShortcutRow};
use slash_types::models::{OpenGraphMetadata, Role, RowStatus, Shortcut, Visibility};

pub fn convert_shortcut(shortcut: ShortcutRow) -> Shortcut {
    Shortcut {
        id: shortcut.id,
        creator_id: shortcut.creator_id,
        created_ts: shortcut.created_ts,
        updated_ts: shortcut.updated_ts,
        row_status: convert_row_status(shortcut.row_status),
        name: shortcut.name,
        link: shortcut.link,
        title: shortcut.title,
        tags: shortcut.tags,
        description: shortcut.description,
        visibility: convert_visibility(shortcut.visibility),
        og_metadata: OpenGraphMetadata {
            title: shortcut.og_metadata.title,
            description: shortcut.og_metadata.description,
            image: shortcut.og_metadata.image,
        },
    }
}

pub fn convert_visibility(visibility: store::Visibility) -> Visibility {
    match visibility {
        store::Visibility::Private => Visibility::Private,
        store::Visibility::Workspace => Visibility::Workspace,
        store::Visibility::Public => Visibility::Public,
    }
}

pub fn convert_visibility_to_store(visibility: Visibility) -> store::Visibility {
    match visibility {
        Visibility::Private => store::Visibility::Private,
        Visibility::Workspace => store::Visibility::Workspace,
        Visibility::Public => store::Visibility::Public,
    }
}

pub fn convert_row_status(row_status: store::RowStatus) -> RowStatus {
    match row_status {
        store::RowStatus::Normal => RowStatus::Normal,
        store::RowStatus::Archived => RowStatus::Archived,
    }
}

pub fn convert_role(role: store::Role) -> Role {
    match role {
        store::Role::Admin => Role::Admin,
        store::Role::User => Role::User,
    }
}

pub fn convert_og_metadata_to_store(metadata: &OpenGraphMetadata) -> store::OpenGraphMetadata {
    store::OpenGraphMetadata {
        title: metadata.title.clone(),
        description: metadata.description.clone(),
        image: metadata.image.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> ShortcutRow {
        ShortcutRow {
            id: 3,
            creator_id: 7,
            created_ts: 1_700_000_000,
            updated_ts: 1_700_000_100,
            row_status: store::RowStatus::Archived,
            name: "go".to_string(),
            link: "https://go.dev".to_string(),
            title: "Go".to_string(),
            tags: vec!["lang".to_string()],
            description: "The Go language".to_string(),
            visibility: store::Visibility::Workspace,
            og_metadata: store::OpenGraphMetadata::default(),
        }
    }

    #[test]
    fn shortcut_fields_are_copied() {
        let shortcut = convert_shortcut(row());

        assert_eq!(shortcut.id, 3);
        assert_eq!(shortcut.creator_id, 7);
        assert_eq!(shortcut.updated_ts, 1_700_000_100);
        assert_eq!(shortcut.row_status, RowStatus::Archived);
        assert_eq!(shortcut.visibility, Visibility::Workspace);
        assert_eq!(shortcut.tags, vec!["lang"]);
        assert_eq!(shortcut.og_metadata, OpenGraphMetadata::default());
    }

    #[test]
    fn empty_metadata_is_still_serialized() {
        let json = serde_json::to_value(convert_shortcut(row())).unwrap();
        assert_eq!(
            json["og_metadata"],
            serde_json::json!({ "title": "", "description": "", "image": "" })
        );
        assert_eq!(json["visibility"], "WORKSPACE");
        assert_eq!(json["row_status"], "ARCHIVED");
    }

    #[test]
    fn visibility_survives_store_round_trip() {
        for visibility in [Visibility::Private, Visibility::Workspace, Visibility::Public] {
            assert_eq!(convert_visibility(convert_visibility_to_store(visibility)), visibility);
        }
    }
}
