use serde::Deserialize;
use thiserror::Error;

use crate::model::{FlameData, Frame};

#[derive(Debug, Error)]
pub enum LevelsParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Either the full generator document or a bare array of levels.
#[derive(Deserialize)]
#[serde(untagged)]
enum LevelsDocument {
    Full(FlameData),
    Bare(Vec<Vec<Frame>>),
}

/// Parse the level-ordered flame-graph JSON emitted by the generator:
///
/// ```json
/// {"depth": 2, "levels": [[{"left": 0, "total": 10, "color": "#50e150", "title": "all"}], ...]}
/// ```
///
/// A bare `[[...], ...]` array of levels is accepted as well. Extra keys
/// (`height`, `title`, `reverse`, `highlight`) are ignored.
pub fn parse_levels(data: &[u8]) -> Result<FlameData, LevelsParseError> {
    let doc: LevelsDocument = serde_json::from_slice(data)?;
    Ok(match doc {
        LevelsDocument::Full(data) => data,
        LevelsDocument::Bare(levels) => FlameData {
            depth: levels.len().saturating_sub(1),
            levels,
        },
    })
}
