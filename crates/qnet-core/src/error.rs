//! Framework error type.
//!
//! Sub-crates define their own error enums and either convert into
//! `QnetError` via `From` impls or wrap it as one variant.  Both patterns are
//! acceptable; prefer whichever keeps error sites clean.

use thiserror::Error;

use crate::{LinkId, NodeId, PersonId};

/// The top-level error type for `qnet-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum QnetError {
    #[error("person {0} not found")]
    PersonNotFound(PersonId),

    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("link {0} not found")]
    LinkNotFound(LinkId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `qnet-*` crates.
pub type QnetResult<T> = Result<T, QnetError>;
