//! Crate-wide error type.
//!
//! Each module keeps its own narrow error enum (codec corruption vs.
//! capability format vs. store I/O); this type is the boundary error
//! the public, single-shot operations surface, composing the others
//! rather than re-deriving the taxonomy (spec §7).

use crate::capability::CapabilityError;
use crate::ingest::IngestError;
use crate::reader::ReaderError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    Reader(#[from] ReaderError),
    #[error(transparent)]
    Capability(#[from] CapabilityError),
}

pub type Result<T> = std::result::Result<T, Error>;
