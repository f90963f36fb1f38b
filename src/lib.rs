//! # hookscan — Hook Call-Site Extraction Engine
//!
//! Scans decompiled game-plugin source for calls that dispatch a hook by
//! literal string name through a recognized framework type, and produces a
//! deduplicated JSON catalog of hook signatures with the enclosing method
//! context of each call site.
//!
//! ## Library usage
//!
//! This crate is primarily a CLI tool, but the pipeline stages are exposed
//! as a library for integration testing and embedding:
//!
//! - [`binder`] — best-effort static type resolution over one module
//! - [`detector`] — hook dispatch recognition and hook-name extraction
//! - [`arguments`] — argument descriptor resolution and name normalization
//! - [`context`] — enclosing method/class attribution
//! - [`catalog`] — two-tier record deduplication
//! - [`scanner`] — module walk and parallel scan driver

pub mod arguments;
pub mod binder;
pub mod catalog;
pub mod cli;
pub mod context;
pub mod detector;
pub mod error;
pub mod scanner;
pub mod types;

pub use catalog::{HookCatalog, ModuleHooks};
pub use error::ScanError;
pub use types::{build_hook_signature, HookRecord, ParameterDescriptor};

/// Read a file as a String, using lossy UTF-8 conversion for non-UTF8 files.
/// Returns `(content, was_lossy)`. Decompiler output occasionally carries
/// Windows-1252 characters in string literals and comments.
pub fn read_file_lossy(path: &std::path::Path) -> std::io::Result<(String, bool)> {
    let raw = std::fs::read(path)?;
    match String::from_utf8(raw) {
        Ok(s) => Ok((s, false)),
        Err(e) => Ok((String::from_utf8_lossy(e.as_bytes()).into_owned(), true)),
    }
}
