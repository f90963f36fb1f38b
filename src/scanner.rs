//! Scan driver: walks plugin modules, runs the extraction pipeline over
//! each, and merges the results into a [`HookCatalog`].
//!
//! Module order is sorted by path before merging, so output is
//! deterministic regardless of walker or thread scheduling.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use ignore::WalkBuilder;
use tracing::{debug, warn};
use tree_sitter::Node;

use crate::arguments::resolve_arguments;
use crate::binder::SourceBinder;
use crate::catalog::{HookCatalog, ModuleHooks};
use crate::context;
use crate::detector::detect_hook_call;
use crate::error::ScanError;
use crate::types::{build_hook_signature, HookRecord};
use crate::read_file_lossy;

/// Builds a parser with the C# grammar loaded.
pub fn new_parser() -> Result<tree_sitter::Parser, ScanError> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
        .map_err(|e| ScanError::GrammarLoad(e.to_string()))?;
    Ok(parser)
}

/// Runs the full pipeline over one module's source.
///
/// Individual call sites that fail any pipeline stage are skipped without
/// a trace; a module whose source does not parse at all produces a warning
/// and an empty result.
pub fn scan_module_source(
    parser: &mut tree_sitter::Parser,
    source: &str,
    module_name: &str,
) -> ModuleHooks {
    let mut hooks = ModuleHooks::new();

    let Some(tree) = parser.parse(source, None) else {
        warn!(module = module_name, "failed to parse module, skipping");
        return hooks;
    };

    let bytes = source.as_bytes();
    let binder = SourceBinder::build(tree.root_node(), bytes);
    let mut calls = Vec::new();
    collect_invocations(tree.root_node(), &mut calls);

    for call in calls {
        let Some(dispatch) = detect_hook_call(call, &binder, bytes) else {
            continue;
        };
        let Some(ctx) = context::locate(call, &binder, bytes) else {
            continue;
        };
        let descriptors = resolve_arguments(&dispatch.arguments, &binder, bytes);
        let signature = build_hook_signature(&dispatch.hook_name, &descriptors);

        hooks.insert(HookRecord {
            hook_name: dispatch.hook_name,
            hook_signature: signature,
            method_parameters: ctx.parameters,
            method_source_code: ctx.source_code,
            method_class_name: ctx.class_name,
            hook_line_invoke: ctx.line_invoke,
        });
    }

    debug!(module = module_name, hooks = hooks.len(), "module scanned");
    hooks
}

/// Invocation nodes in pre-order, matching source position order within
/// a module (first-seen-wins dedup depends on it).
fn collect_invocations<'a>(node: Node<'a>, out: &mut Vec<Node<'a>>) {
    if node.kind() == "invocation_expression" {
        out.push(node);
    }
    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            collect_invocations(child, out);
        }
    }
}

/// Scans every module file under `dir` with the given extensions.
pub fn scan_directory(dir: &Path, extensions: &[String], threads: usize) -> Result<HookCatalog, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::DirNotFound(dir.display().to_string()));
    }
    let files = collect_module_files(dir, extensions, threads);
    scan_files(files, threads)
}

/// Collects matching file paths under `dir`, sorted for deterministic
/// module order.
fn collect_module_files(dir: &Path, extensions: &[String], threads: usize) -> Vec<String> {
    let mut walker = WalkBuilder::new(dir);
    walker.hidden(false).git_ignore(true);
    if threads > 0 {
        walker.threads(threads);
    }

    let found: Mutex<Vec<String>> = Mutex::new(Vec::new());
    walker.build_parallel().run(|| {
        Box::new(|entry| {
            let entry = match entry {
                Ok(e) => e,
                Err(_) => return ignore::WalkState::Continue,
            };
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                return ignore::WalkState::Continue;
            }
            let path = entry.path();
            let ext_match = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)));
            if !ext_match {
                return ignore::WalkState::Continue;
            }
            found
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(path.to_string_lossy().into_owned());
            ignore::WalkState::Continue
        })
    });

    let mut files = found.into_inner().unwrap_or_else(|e| e.into_inner());
    files.sort();
    files
}

/// Parses the given modules in parallel and merges their records in
/// path-sorted order.
pub fn scan_files(files: Vec<String>, threads: usize) -> Result<HookCatalog, ScanError> {
    // Surface a broken grammar before spawning workers.
    drop(new_parser()?);

    let total = files.len();
    let num_threads = if threads > 0 {
        threads
    } else {
        std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4)
    };
    let chunk_size = total.div_ceil(num_threads.max(1)).max(1);
    let chunks: Vec<Vec<(usize, String)>> = files
        .into_iter()
        .enumerate()
        .collect::<Vec<_>>()
        .chunks(chunk_size)
        .map(|c| c.to_vec())
        .collect();

    debug!(files = total, threads = chunks.len(), "scanning modules");

    let read_errors = AtomicUsize::new(0);
    let thread_results: Vec<Vec<(usize, ModuleHooks)>> = std::thread::scope(|s| {
        let read_errors = &read_errors;
        let handles: Vec<_> = chunks
            .into_iter()
            .map(|chunk| {
                s.spawn(move || {
                    let mut parser = match new_parser() {
                        Ok(p) => p,
                        Err(e) => {
                            warn!(error = %e, "worker could not load grammar");
                            return Vec::new();
                        }
                    };
                    let mut results = Vec::new();
                    for (order, path) in chunk {
                        let (content, _was_lossy) = match read_file_lossy(Path::new(&path)) {
                            Ok(r) => r,
                            Err(e) => {
                                warn!(module = %path, error = %e, "failed to read module");
                                read_errors.fetch_add(1, Ordering::Relaxed);
                                continue;
                            }
                        };
                        let hooks = scan_module_source(&mut parser, &content, &path);
                        if !hooks.is_empty() {
                            results.push((order, hooks));
                        }
                    }
                    results
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| {
                h.join().unwrap_or_else(|_| {
                    warn!("worker thread panicked during scan");
                    Vec::new()
                })
            })
            .collect()
    });

    let mut ordered: Vec<(usize, ModuleHooks)> =
        thread_results.into_iter().flatten().collect();
    ordered.sort_by_key(|(order, _)| *order);

    let mut catalog = HookCatalog::new();
    for (_, module) in ordered {
        catalog.merge(module);
    }

    let errors = read_errors.load(Ordering::Relaxed);
    if errors > 0 {
        warn!(errors, "some modules could not be read");
    }
    Ok(catalog)
}

// ─── Tests ──────────────────────────────────────────────────────────
