//! Error types for `dab-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown relation kind: {0:?}")]
  UnknownRelKind(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
