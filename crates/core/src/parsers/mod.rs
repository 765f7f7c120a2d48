pub mod levels;

use thiserror::Error;

use crate::model::{FlameTree, TreeError};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("levels: {0}")]
    Levels(#[from] levels::LevelsParseError),
    #[error("tree: {0}")]
    Tree(#[from] TreeError),
}

/// Parse a levels document and validate it into a [`FlameTree`].
pub fn parse_tree(data: &[u8]) -> Result<FlameTree, ParseError> {
    let data = levels::parse_levels(data)?;
    Ok(FlameTree::from_data(data)?)
}
