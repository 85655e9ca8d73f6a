// SPDX-License-Identifier: MIT

//! The verification capability boundary.
//!
//! The concrete hash store lives outside this crate: we only define the
//! interface the Loader consumes, and require that validation and read
//! happen as a single atomic call so no TOCTOU window opens between hash
//! check and content read.

use std::path::Path;
use thiserror::Error;

/// Failure from the injected verification capability.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("hash verification failed for {path}: {reason}")]
    HashMismatch { path: String, reason: String },
    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: String, reason: String },
}

/// Atomically validates and reads a config or template file.
///
/// Implementations MUST perform hash validation and the content read as a
/// single operation with no window in which the file could be swapped
/// between the two. The concrete hash store backing this is an external
/// collaborator — this crate only consumes the interface.
pub trait VerificationCapability: Send + Sync {
    fn verify_and_read_config(&self, path: &Path) -> Result<Vec<u8>, VerificationError>;
    fn verify_and_read_template(&self, path: &Path) -> Result<Vec<u8>, VerificationError>;
}
