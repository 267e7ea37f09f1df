use qnet_core::{LinkId, NodeId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("link {link} references unknown node {node}")]
    UnknownNode { link: LinkId, node: NodeId },

    #[error("link {0} has a non-positive length, freespeed, or lane count, or negative capacity")]
    BadAttribute(LinkId),

    #[error("duplicate {what} id {id} in CSV input")]
    DuplicateId { what: &'static str, id: u32 },

    #[error("{what} id {id} missing from CSV input (ids must be dense)")]
    MissingId { what: &'static str, id: u32 },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
