// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Flat-file blob store for avatar images. The database keeps only the key;
//! bytes live under the platform data dir, put/get by key.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::db;

pub fn put(key: &str, bytes: &[u8]) -> Result<PathBuf> {
    let path = db::blob_dir()?.join(key);
    fs::write(&path, bytes).with_context(|| format!("Write blob {}", path.display()))?;
    Ok(path)
}

pub fn path(key: &str) -> Result<Option<PathBuf>> {
    let path = db::blob_dir()?.join(key);
    Ok(path.exists().then_some(path))
}
