//! Database row types. These map directly to SQLite rows.
//! Distinct from slash-types API models to keep the DB layer independent.
use std::fmt;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("unknown {kind} value '{value}'")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

/// Text-backed enum columns; each variant is stored as the literal next to it.
macro_rules! text_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(ParseEnumError {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|e: ParseEnumError| FromSqlError::Other(Box::new(e)))
            }
        }
    };
}

text_enum!(Visibility, "visibility", {
    Private => "PRIVATE",
    Workspace => "WORKSPACE",
    Public => "PUBLIC",
});

text_enum!(RowStatus, "row status", {
    Normal => "NORMAL",
    Archived => "ARCHIVED",
});

text_enum!(Role, "role", {
    Admin => "ADMIN",
    User => "USER",
});

text_enum!(ActivityType, "activity type", {
    ShortcutCreate => "shortcut.create",
});

text_enum!(ActivityLevel, "activity level", {
    Info => "INFO",
    Warn => "WARN",
    Error => "ERROR",
});

// -- Shortcuts --

/// Stored as a JSON document in the `og_metadata` column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenGraphMetadata {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutRow {
    pub id: i32,
    pub creator_id: i32,
    pub created_ts: i64,
    pub updated_ts: i64,
    pub row_status: RowStatus,
    pub name: String,
    pub link: String,
    pub title: String,
    pub tags: Vec<String>,
    pub description: String,
    pub visibility: Visibility,
    pub og_metadata: OpenGraphMetadata,
}

#[derive(Debug, Clone)]
pub struct NewShortcut {
    pub creator_id: i32,
    pub name: String,
    pub link: String,
    pub title: String,
    pub tags: Vec<String>,
    pub description: String,
    pub visibility: Visibility,
    pub og_metadata: OpenGraphMetadata,
}

/// Sparse update of one shortcut. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateShortcut {
    pub id: i32,
    pub link: Option<String>,
    pub title: Option<String>,
    /// Already space-joined, see [`crate::tags::encode_tags`].
    pub tag: Option<String>,
    pub description: Option<String>,
    pub visibility: Option<Visibility>,
    pub og_metadata: Option<OpenGraphMetadata>,
}

impl UpdateShortcut {
    pub fn new(id: i32) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }
}

/// Filter for shortcut lookups. Unset fields do not constrain the result;
/// an empty `visibility_list` matches nothing.
#[derive(Debug, Clone, Default)]
pub struct FindShortcut {
    pub id: Option<i32>,
    pub creator_id: Option<i32>,
    pub name: Option<String>,
    pub visibility_list: Option<Vec<Visibility>>,
}

// -- Users --

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i32,
    pub created_ts: i64,
    pub email: String,
    pub nickname: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub nickname: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Default)]
pub struct FindUser {
    pub id: Option<i32>,
    pub email: Option<String>,
}

// -- Activities --

#[derive(Debug, Clone)]
pub struct ActivityRow {
    pub id: i32,
    pub creator_id: i32,
    pub created_ts: i64,
    pub activity_type: ActivityType,
    pub level: ActivityLevel,
    pub payload: String,
}

#[derive(Debug, Clone)]
pub struct NewActivity {
    pub creator_id: i32,
    pub activity_type: ActivityType,
    pub level: ActivityLevel,
    pub payload: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_text_values() {
        assert_eq!(Visibility::Workspace.as_str(), "WORKSPACE");
        assert_eq!("PUBLIC".parse::<Visibility>().unwrap(), Visibility::Public);
        assert_eq!(ActivityType::ShortcutCreate.to_string(), "shortcut.create");
    }

    #[test]
    fn unknown_enum_text_is_rejected() {
        let err = "public".parse::<Visibility>().unwrap_err();
        assert_eq!(err.to_string(), "unknown visibility value 'public'");
        assert!("OWNER".parse::<Role>().is_err());
    }
}
