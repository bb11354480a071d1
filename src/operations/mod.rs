//! Operations module provides the read-only commands exposed by the CLI

pub mod comments;
pub mod posts;
pub mod subreddit;

use crate::error::RedditClientError;
use log::info;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Save records as pretty-printed JSON
pub fn write_json<T: Serialize + ?Sized>(path: &Path, records: &T) -> Result<(), RedditClientError> {
    let json = serde_json::to_string_pretty(records).map_err(std::io::Error::from)?;
    fs::write(path, json)?;
    info!("Results saved to {}", path.display());
    Ok(())
}
