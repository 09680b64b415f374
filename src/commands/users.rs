// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::blobstore;
use crate::store::users::{self, NewUser};
use crate::utils::{
    clear_current_user, current_user, maybe_print_json, pretty_table, set_current_user,
};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().to_string();
            let email = sub.get_one::<String>("email").unwrap().to_string();
            let id = users::create(conn, &NewUser { name, email })?;
            let profile = users::get(conn, id)?;
            // First profile signs in right away, same as sign-up in the app.
            if current_user(conn).is_err() {
                set_current_user(conn, id)?;
                println!(
                    "Added profile '{}' <{}> and signed in",
                    profile.name, profile.email
                );
            } else {
                println!("Added profile '{}' <{}>", profile.name, profile.email);
            }
        }
        Some(("list", sub)) => {
            let json_flag = sub.get_flag("json");
            let jsonl_flag = sub.get_flag("jsonl");
            let profiles = users::list(conn)?;
            if !maybe_print_json(json_flag, jsonl_flag, &profiles)? {
                let rows = profiles
                    .iter()
                    .map(|p| {
                        vec![
                            p.id.to_string(),
                            p.name.clone(),
                            p.email.clone(),
                            p.avatar_key.clone().unwrap_or_default(),
                            p.created_at.clone(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Name", "Email", "Avatar", "Created"], rows)
                );
            }
        }
        Some(("use", sub)) => {
            let email = sub.get_one::<String>("email").unwrap();
            let profile = users::find_by_email(conn, email)?
                .with_context(|| format!("No profile with email '{}'", email))?;
            set_current_user(conn, profile.id)?;
            println!("Signed in as '{}' <{}>", profile.name, profile.email);
        }
        Some(("current", _)) => match current_user(conn) {
            Ok(id) => {
                let profile = users::get(conn, id)?;
                println!("{} <{}> (id {})", profile.name, profile.email, profile.id);
            }
            Err(_) => println!("No active profile"),
        },
        Some(("signout", _)) => {
            clear_current_user(conn)?;
            println!("Signed out");
        }
        Some(("avatar", sub)) => avatar(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn avatar(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let user_id = current_user(conn)?;
    match m.subcommand() {
        Some(("set", sub)) => {
            let path = sub.get_one::<String>("path").unwrap();
            let bytes =
                std::fs::read(path).with_context(|| format!("Read avatar file {}", path))?;
            let ext = std::path::Path::new(path)
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("img");
            let key = format!("avatar-{}.{}", user_id, ext);
            let stored = blobstore::put(&key, &bytes)?;
            users::set_avatar_key(conn, user_id, &key)?;
            println!("Avatar stored at {}", stored.display());
        }
        Some(("path", _)) => {
            let profile = users::get(conn, user_id)?;
            match profile.avatar_key.as_deref().map(blobstore::path).transpose()? {
                Some(Some(p)) => println!("{}", p.display()),
                _ => println!("No avatar set"),
            }
        }
        _ => {}
    }
    Ok(())
}
