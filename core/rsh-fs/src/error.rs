//!
//! Error taxonomy for the block file system.
//!
//! Three families: argument errors (`NoPermission`), resource errors
//! (`NoMem`), and lookup errors (`NoFile`, overloaded as both "file not
//! found" and "invalid descriptor", exactly as the reference source does).
//!

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum UfsError {
    #[error("no such file or invalid descriptor")]
    NoFile,
    #[error("out of memory: file would exceed the maximum size")]
    NoMem,
    #[error("operation not permitted by the descriptor's access flags")]
    NoPermission,
}
