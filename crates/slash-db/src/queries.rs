use chrono::Utc;
use rusqlite::types::{ToSql, Type};
use rusqlite::{Connection, Row};

use crate::models::{
    ActivityRow, FindShortcut, FindUser, NewActivity, NewShortcut, NewUser, Role, ShortcutRow,
    UpdateShortcut, UserRow,
};
use crate::tags::{decode_tags, encode_tags};
use crate::{Database, Result, StoreError};

const SHORTCUT_COLUMNS: &str = "id, creator_id, created_ts, updated_ts, row_status, name, link, \
     title, tag, description, visibility, og_metadata";

const USER_COLUMNS: &str = "id, created_ts, email, nickname, password_hash, role";

impl Database {
    // -- Shortcuts --

    /// Newest first.
    pub fn list_shortcuts(&self, find: &FindShortcut) -> Result<Vec<ShortcutRow>> {
        self.with_conn(|conn| query_shortcuts(conn, find))
    }

    pub fn get_shortcut(&self, find: &FindShortcut) -> Result<Option<ShortcutRow>> {
        Ok(self.list_shortcuts(find)?.into_iter().next())
    }

    pub fn create_shortcut(&self, create: &NewShortcut) -> Result<ShortcutRow> {
        let og_metadata = serde_json::to_string(&create.og_metadata)?;
        let now = Utc::now().timestamp();

        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO shortcut (creator_id, created_ts, updated_ts, name, link, title, tag, description, visibility, og_metadata)
                 VALUES (?1, ?2, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                rusqlite::params![
                    create.creator_id,
                    now,
                    create.name,
                    create.link,
                    create.title,
                    encode_tags(&create.tags),
                    create.description,
                    create.visibility,
                    og_metadata,
                ],
            )?;
            let id = conn.last_insert_rowid() as i32;
            query_shortcut_by_id(conn, id)?.ok_or(StoreError::NotFound)
        })
    }

    /// Applies only the fields set on `update` and bumps `updated_ts`.
    pub fn update_shortcut(&self, update: &UpdateShortcut) -> Result<ShortcutRow> {
        let mut sets: Vec<&str> = vec!["updated_ts = ?"];
        let mut args: Vec<Box<dyn ToSql>> = Vec::new();
        args.push(Box::new(Utc::now().timestamp()));

        if let Some(link) = &update.link {
            sets.push("link = ?");
            args.push(Box::new(link.clone()));
        }
        if let Some(title) = &update.title {
            sets.push("title = ?");
            args.push(Box::new(title.clone()));
        }
        if let Some(tag) = &update.tag {
            sets.push("tag = ?");
            args.push(Box::new(tag.clone()));
        }
        if let Some(description) = &update.description {
            sets.push("description = ?");
            args.push(Box::new(description.clone()));
        }
        if let Some(visibility) = update.visibility {
            sets.push("visibility = ?");
            args.push(Box::new(visibility));
        }
        if let Some(og_metadata) = &update.og_metadata {
            sets.push("og_metadata = ?");
            args.push(Box::new(serde_json::to_string(og_metadata)?));
        }
        args.push(Box::new(update.id));

        let sql = format!("UPDATE shortcut SET {} WHERE id = ?", sets.join(", "));

        self.with_conn_mut(|conn| {
            let params: Vec<&dyn ToSql> = args.iter().map(|a| &**a).collect();
            if conn.execute(&sql, params.as_slice())? == 0 {
                return Err(StoreError::NotFound);
            }
            query_shortcut_by_id(conn, update.id)?.ok_or(StoreError::NotFound)
        })
    }

    pub fn delete_shortcut(&self, id: i32) -> Result<()> {
        self.with_conn_mut(|conn| {
            if conn.execute("DELETE FROM shortcut WHERE id = ?1", [id])? == 0 {
                return Err(StoreError::NotFound);
            }
            Ok(())
        })
    }

    // -- Users --

    /// The very first user of an instance becomes its admin.
    pub fn create_user(&self, create: &NewUser) -> Result<UserRow> {
        let now = Utc::now().timestamp();

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let existing: i64 = tx.query_row("SELECT COUNT(*) FROM user", [], |r| r.get(0))?;
            let role = if existing == 0 { Role::Admin } else { Role::User };

            tx.execute(
                "INSERT INTO user (created_ts, updated_ts, email, nickname, password_hash, role)
                 VALUES (?1, ?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![now, create.email, create.nickname, create.password_hash, role],
            )?;
            let id = tx.last_insert_rowid() as i32;

            let user = query_user(
                &tx,
                &FindUser {
                    id: Some(id),
                    ..Default::default()
                },
            )?
            .ok_or(StoreError::NotFound)?;

            tx.commit()?;
            Ok(user)
        })
    }

    pub fn get_user(&self, find: &FindUser) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, find))
    }

    // -- Activities --

    pub fn create_activity(&self, create: &NewActivity) -> Result<ActivityRow> {
        let now = Utc::now().timestamp();

        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO activity (creator_id, created_ts, type, level, payload) VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![
                    create.creator_id,
                    now,
                    create.activity_type,
                    create.level,
                    create.payload,
                ],
            )?;

            Ok(ActivityRow {
                id: conn.last_insert_rowid() as i32,
                creator_id: create.creator_id,
                created_ts: now,
                activity_type: create.activity_type,
                level: create.level,
                payload: create.payload.clone(),
            })
        })
    }

    /// Oldest first, optionally limited to one creator.
    pub fn list_activities(&self, creator_id: Option<i32>) -> Result<Vec<ActivityRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, creator_id, created_ts, type, level, payload FROM activity
                 WHERE ?1 IS NULL OR creator_id = ?1
                 ORDER BY id ASC",
            )?;

            let rows = stmt
                .query_map([creator_id], |row| {
                    Ok(ActivityRow {
                        id: row.get(0)?,
                        creator_id: row.get(1)?,
                        created_ts: row.get(2)?,
                        activity_type: row.get(3)?,
                        level: row.get(4)?,
                        payload: row.get(5)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }
}

fn query_shortcuts(conn: &Connection, find: &FindShortcut) -> Result<Vec<ShortcutRow>> {
    let mut clauses: Vec<String> = vec!["1 = 1".to_string()];
    let mut args: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(id) = find.id {
        clauses.push("id = ?".to_string());
        args.push(Box::new(id));
    }
    if let Some(creator_id) = find.creator_id {
        clauses.push("creator_id = ?".to_string());
        args.push(Box::new(creator_id));
    }
    if let Some(name) = &find.name {
        clauses.push("name = ?".to_string());
        args.push(Box::new(name.clone()));
    }
    if let Some(visibility_list) = &find.visibility_list {
        if visibility_list.is_empty() {
            clauses.push("1 = 0".to_string());
        } else {
            let placeholders = vec!["?"; visibility_list.len()].join(", ");
            clauses.push(format!("visibility IN ({})", placeholders));
            for visibility in visibility_list {
                args.push(Box::new(*visibility));
            }
        }
    }

    let sql = format!(
        "SELECT {} FROM shortcut WHERE {} ORDER BY id DESC",
        SHORTCUT_COLUMNS,
        clauses.join(" AND ")
    );

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn ToSql> = args.iter().map(|a| &**a).collect();

    let rows = stmt
        .query_map(params.as_slice(), map_shortcut)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_shortcut_by_id(conn: &Connection, id: i32) -> Result<Option<ShortcutRow>> {
    let find = FindShortcut {
        id: Some(id),
        ..Default::default()
    };
    Ok(query_shortcuts(conn, &find)?.into_iter().next())
}

fn map_shortcut(row: &Row<'_>) -> rusqlite::Result<ShortcutRow> {
    let tag: String = row.get(8)?;
    let og_metadata: String = row.get(11)?;
    let og_metadata = serde_json::from_str(&og_metadata)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(11, Type::Text, Box::new(e)))?;

    Ok(ShortcutRow {
        id: row.get(0)?,
        creator_id: row.get(1)?,
        created_ts: row.get(2)?,
        updated_ts: row.get(3)?,
        row_status: row.get(4)?,
        name: row.get(5)?,
        link: row.get(6)?,
        title: row.get(7)?,
        tags: decode_tags(&tag),
        description: row.get(9)?,
        visibility: row.get(10)?,
        og_metadata,
    })
}

fn query_user(conn: &Connection, find: &FindUser) -> Result<Option<UserRow>> {
    let sql = format!(
        "SELECT {} FROM user WHERE (?1 IS NULL OR id = ?1) AND (?2 IS NULL OR email = ?2) LIMIT 1",
        USER_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;

    let row = stmt
        .query_row(rusqlite::params![find.id, find.email], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                created_ts: row.get(1)?,
                email: row.get(2)?,
                nickname: row.get(3)?,
                password_hash: row.get(4)?,
                role: row.get(5)?,
            })
        })
        .optional()?;

    Ok(row)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
