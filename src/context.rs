//! Attribution of a hook call to its enclosing function and class.

use tree_sitter::Node;

use crate::binder::{declared_parameters, node_text, SourceBinder};
use crate::types::{ParameterDescriptor, UNKNOWN_CLASS};

/// Where a hook call lives: the function that contains it, the nearest
/// class, and the call's line offset within that function.
#[derive(Debug)]
pub struct EnclosingContext {
    /// `Method` for a plain method, `Method.Local` for a local function
    /// nested in a named method, `Local` for a detached local function.
    pub function_name: String,
    pub class_name: String,
    /// Full source text of the effective function.
    pub source_code: String,
    /// 1-based line of the call relative to the function's first line.
    pub line_invoke: u32,
    /// The effective function's own declared parameters. Parameters whose
    /// type cannot be read are dropped, not replaced with a placeholder.
    pub parameters: Vec<ParameterDescriptor>,
}

/// Locates the attribution context for an accepted call node.
///
/// Returns `None` when no enclosing method or local function exists — a
/// hook call a reader cannot attribute to any function is not reported.
pub fn locate(call: Node<'_>, binder: &SourceBinder<'_>, source: &[u8]) -> Option<EnclosingContext> {
    let mut local_function: Option<Node<'_>> = None;
    let mut named_function: Option<Node<'_>> = None;
    let mut class_name: Option<String> = None;

    // Nearest enclosing wins for every role; the walk stops at the first
    // class so a nested class never attributes to an outer one.
    let mut cursor = call.parent();
    while let Some(node) = cursor {
        match node.kind() {
            "local_function_statement" => {
                if local_function.is_none() && named_function.is_none() {
                    local_function = Some(node);
                }
            }
            "method_declaration" | "constructor_declaration" => {
                if named_function.is_none() {
                    named_function = Some(node);
                }
            }
            "class_declaration" => {
                class_name = node
                    .child_by_field_name("name")
                    .map(|n| node_text(n, source).to_string());
                break;
            }
            _ => {}
        }
        cursor = node.parent();
    }

    let class_name = class_name
        .or_else(|| binder.first_class_name().map(str::to_string))
        .unwrap_or_else(|| UNKNOWN_CLASS.to_string());

    let effective = local_function.or(named_function)?;

    let function_name = match (named_function, local_function) {
        (Some(named), Some(local)) => {
            format!("{}.{}", function_display_name(named, source), function_display_name(local, source))
        }
        (None, Some(local)) => function_display_name(local, source),
        (Some(named), None) => function_display_name(named, source),
        (None, None) => unreachable!(),
    };

    let start_line = effective.start_position().row as u32;
    let call_line = call.start_position().row as u32;

    let parameters = declared_parameters(effective, source)
        .into_iter()
        .map(|(param_type, name)| ParameterDescriptor::new(param_type, name))
        .collect();

    Some(EnclosingContext {
        function_name,
        class_name,
        source_code: node_text(effective, source).to_string(),
        line_invoke: call_line - start_line + 1,
        parameters,
    })
}

fn function_display_name(node: Node<'_>, source: &[u8]) -> String {
    node.child_by_field_name("name")
        .map(|n| node_text(n, source).to_string())
        .unwrap_or_default()
}

// ─── Tests ──────────────────────────────────────────────────────────
