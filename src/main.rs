//! Hook call-site extraction engine for decompiled plugin source.
//!
//! Binary crate entry point. All CLI logic is in the `cli` module.

// Use mimalloc as global allocator — scanning thousands of decompiled
// modules churns through short-lived parse trees and strings.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() {
    hookscan::cli::run();
}
