use std::{fs, path::Path};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::state::State;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

fn format_for(path: &Path) -> Format {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
            Format::Yaml
        }
        _ => Format::Json,
    }
}

/// Load a saved session. A missing file yields a fresh session at round 1.
pub fn load_state(path: &Path) -> Result<State> {
    if !path.exists() {
        info!(path = %path.display(), "no saved state, starting fresh");
        return Ok(State::new());
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read state file: {}", path.display()))?;
    let state: State = match format_for(path) {
        Format::Json => serde_json::from_str(&text)
            .with_context(|| format!("failed to parse state JSON: {}", path.display()))?,
        Format::Yaml => serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse state YAML: {}", path.display()))?,
    };
    debug!(
        path = %path.display(),
        round = state.current_round(),
        history = state.history_len(),
        "state loaded"
    );
    Ok(state)
}

/// Write the full session, history included.
pub fn save_state(path: &Path, state: &State, pretty: bool) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    let text = match format_for(path) {
        Format::Json if pretty => serde_json::to_string_pretty(state)?,
        Format::Json => serde_json::to_string(state)?,
        Format::Yaml => serde_yaml::to_string(state)?,
    };
    fs::write(path, text)
        .with_context(|| format!("failed to write state file: {}", path.display()))?;
    debug!(path = %path.display(), round = state.current_round(), "state saved");
    Ok(())
}
