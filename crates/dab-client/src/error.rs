//! Error types for the HTTP client.

use thiserror::Error;

/// A failed API call.
///
/// `Status` is the interesting one: the server answered, but outside the
/// 2xx range. The numeric code is kept so callers can distinguish a 404
/// (usually mapped to `None`/`false` at the trait level) from anything else.
#[derive(Debug, Error)]
pub enum ClientError {
  #[error("{method} {path} → {status}")]
  Status {
    method: &'static str,
    path:   String,
    status: u16,
  },

  #[error("transport error: {0}")]
  Transport(#[from] reqwest::Error),
}

impl ClientError {
  /// The HTTP status carried by this error, if the server answered at all.
  pub fn status(&self) -> Option<u16> {
    match self {
      Self::Status { status, .. } => Some(*status),
      Self::Transport(e) => e.status().map(|s| s.as_u16()),
    }
  }

  pub fn is_not_found(&self) -> bool { self.status() == Some(404) }
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;
