use crate::error::Result;
use crate::model::LanguageStats;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Write statistics as pretty JSON, largest language first.
pub fn save(path: &Path, stats: &LanguageStats) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut json = serde_json::to_string_pretty(stats)?;
    json.push('\n');
    fs::write(path, json)?;
    Ok(())
}

/// Read statistics back. `Ok(None)` when nothing has been saved yet.
pub fn load(path: &Path) -> Result<Option<LanguageStats>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_str(&content)?))
}
