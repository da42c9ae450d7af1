//! Error types for the filter and session layers.
//!
//! Strongly-typed errors per layer. Transport failures propagate through
//! the filter unchanged; the filter adds only its own contract violations
//! (use before arming, double arming). We avoid `std::io::Error` so the
//! core stays independent of any particular transport implementation.

use thiserror::Error;

/// Errors reported by a [`Transport`](crate::Transport) implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The peer closed the stream; no further bytes will arrive
    #[error("transport closed")]
    Closed,

    /// Underlying I/O failure
    #[error("transport i/o failure: {0}")]
    Io(String),
}

/// Errors reported by the [`CryptoStream`](crate::CryptoStream) filter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// Read/write/rekey attempted before `set_key_with_iv`.
    ///
    /// This is a programming-contract violation, not a runtime condition to
    /// recover from: the caller sequenced its setup wrong.
    #[error("filter not armed: set_key_with_iv must be called before use")]
    NotArmed,

    /// `set_key_with_iv` called on an already-armed filter
    #[error("filter already armed: key installation happens exactly once")]
    AlreadyArmed,

    /// Inner transport failure, propagated unchanged
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Errors reported by the [`SecureSession`](crate::SecureSession) layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Filter or transport failure beneath the session
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// Malformed control frame on the inbound stream
    #[error("control frame error: {0}")]
    Protocol(#[from] shroud_proto::ProtocolError),
}
