// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::utils::{get_display_currency, set_display_currency};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("currency", sub)) => {
            if let Some(code) = sub.get_one::<String>("code") {
                let code = code.to_uppercase();
                set_display_currency(conn, &code)?;
                println!("Display currency set to {}", code);
            } else {
                println!("{}", get_display_currency(conn)?);
            }
        }
        _ => {}
    }
    Ok(())
}
