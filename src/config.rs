use std::path::PathBuf;

use crate::error::{Error, Result};

/// Default per-user location for a persisted classmap.
pub fn default_classmap_path() -> Result<PathBuf> {
    Ok(loader_home()?.join("classmap.json"))
}

fn loader_home() -> Result<PathBuf> {
    let base = dirs::data_local_dir()
        .or_else(dirs::cache_dir)
        .or_else(dirs::home_dir)
        .ok_or_else(|| Error::Runtime("failed to resolve data directory".to_string()))?;
    Ok(base.join("lookup-loader"))
}
