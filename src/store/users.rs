// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::DomainError;
use crate::models::UserProfile;
use crate::utils::non_empty;

pub struct NewUser {
    pub name: String,
    pub email: String,
}

pub fn create(conn: &Connection, input: &NewUser) -> Result<i64> {
    let name = non_empty(&input.name, "Name")?;
    let email = non_empty(&input.email, "Email")?;
    if !email.contains('@') {
        return Err(DomainError::Validation(format!("Invalid email '{}'", email)).into());
    }
    let existing: Option<i64> = conn
        .query_row("SELECT id FROM users WHERE email=?1", params![email], |r| {
            r.get(0)
        })
        .optional()?;
    if existing.is_some() {
        return Err(
            DomainError::Validation(format!("A profile with email '{}' already exists", email))
                .into(),
        );
    }
    conn.execute(
        "INSERT INTO users(name, email) VALUES (?1, ?2)",
        params![name, email],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list(conn: &Connection) -> Result<Vec<UserProfile>> {
    let mut stmt =
        conn.prepare("SELECT id, name, email, avatar_key, created_at FROM users ORDER BY name")?;
    let rows = stmt.query_map([], |r| {
        Ok(UserProfile {
            id: r.get(0)?,
            name: r.get(1)?,
            email: r.get(2)?,
            avatar_key: r.get(3)?,
            created_at: r.get(4)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn get(conn: &Connection, id: i64) -> Result<UserProfile> {
    let row = conn
        .query_row(
            "SELECT id, name, email, avatar_key, created_at FROM users WHERE id=?1",
            params![id],
            |r| {
                Ok(UserProfile {
                    id: r.get(0)?,
                    name: r.get(1)?,
                    email: r.get(2)?,
                    avatar_key: r.get(3)?,
                    created_at: r.get(4)?,
                })
            },
        )
        .optional()?;
    row.ok_or_else(|| DomainError::NotFound { what: "profile", id }.into())
}

pub fn find_by_email(conn: &Connection, email: &str) -> Result<Option<UserProfile>> {
    let row = conn
        .query_row(
            "SELECT id, name, email, avatar_key, created_at FROM users WHERE email=?1",
            params![email],
            |r| {
                Ok(UserProfile {
                    id: r.get(0)?,
                    name: r.get(1)?,
                    email: r.get(2)?,
                    avatar_key: r.get(3)?,
                    created_at: r.get(4)?,
                })
            },
        )
        .optional()?;
    Ok(row)
}

pub fn set_avatar_key(conn: &Connection, user_id: i64, key: &str) -> Result<()> {
    let affected = conn.execute(
        "UPDATE users SET avatar_key=?1 WHERE id=?2",
        params![key, user_id],
    )?;
    if affected == 0 {
        return Err(DomainError::NotFound {
            what: "profile",
            id: user_id,
        }
        .into());
    }
    Ok(())
}
