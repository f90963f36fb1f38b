//! Hook dispatch detection: decides whether an invocation is a hook call
//! and extracts the literal hook name.

use tree_sitter::Node;

use crate::binder::{find_child_by_kind, node_text, strip_generics, SourceBinder, TypeBinder};

/// Framework base types whose members (or descendants) dispatch hooks.
/// A receiver is eligible when any type in its declared-base-type chain
/// matches one of these names.
pub const RECOGNIZED_DISPATCH_TYPES: &[&str] = &[
    "Plugin",
    "RustPlugin",
    "CovalencePlugin",
    "CSPlugin",
    "BaseHookable",
    "Interface",
];

/// Member names that all mean "dispatch a hook by string name":
/// the generic call, the static direct variant, the event variant,
/// and the short form.
pub const HOOK_CALL_ALIASES: &[&str] = &["CallHook", "CallStaticHook", "FireEvent", "Call"];

/// Cap on the declared-base-type walk. Decompiled output can contain
/// malformed or self-referential base lists.
const MAX_ANCESTOR_DEPTH: usize = 32;

/// An accepted hook dispatch: the literal hook name plus the argument
/// expressions after it, in call order.
pub struct HookDispatch<'a> {
    pub hook_name: String,
    pub arguments: Vec<Node<'a>>,
}

/// Inspects one `invocation_expression`. Returns `None` for anything that
/// is not a hook dispatch — silently, since decompiled source is noisy.
pub fn detect_hook_call<'a>(
    call: Node<'a>,
    binder: &SourceBinder<'_>,
    source: &[u8],
) -> Option<HookDispatch<'a>> {
    let expr = call.child(0)?;

    let (invoked_name, receiver_type) = match expr.kind() {
        "member_access_expression" => {
            let name_node = expr.child_by_field_name("name")?;
            let invoked = invoked_member_name(name_node, source);
            let receiver = expr.child_by_field_name("expression").or_else(|| expr.child(0))?;
            (invoked, binder.expression_type(receiver)?)
        }
        // Bare call: the implicit receiver is the enclosing class.
        "identifier" => {
            let invoked = node_text(expr, source).trim().to_string();
            let class_name = binder.enclosing_class_name(call)?.to_string();
            (invoked, class_name)
        }
        "generic_name" => {
            let invoked = invoked_member_name(expr, source);
            let class_name = binder.enclosing_class_name(call)?.to_string();
            (invoked, class_name)
        }
        _ => return None,
    };

    if !is_recognized_dispatch_type(binder, &receiver_type) {
        return None;
    }
    if !HOOK_CALL_ALIASES.contains(&invoked_name.as_str()) {
        return None;
    }

    let args = argument_expressions(call);
    let first = args.first()?;
    let hook_name = literal_string_value(*first, source)?;
    if hook_name.is_empty() {
        return None;
    }

    Some(HookDispatch {
        hook_name,
        arguments: args[1..].to_vec(),
    })
}

/// Walks the declared-base-type chain of `type_name` (itself included),
/// testing membership against the recognized set at each step.
pub fn is_recognized_dispatch_type(binder: &dyn TypeBinder, type_name: &str) -> bool {
    let mut current = Some(type_name.to_string());
    let mut depth = 0;
    while let Some(t) = current {
        if RECOGNIZED_DISPATCH_TYPES.contains(&strip_generics(&t)) {
            return true;
        }
        depth += 1;
        if depth >= MAX_ANCESTOR_DEPTH {
            break;
        }
        current = binder.declared_base_type(&t);
    }
    false
}

/// The invoked member name, with generic type arguments stripped
/// (`Call<T>` → `Call`).
fn invoked_member_name(name_node: Node<'_>, source: &[u8]) -> String {
    if name_node.kind() == "generic_name" {
        if let Some(id) = name_node.child(0)
            && id.kind() == "identifier"
        {
            return node_text(id, source).to_string();
        }
        let text = node_text(name_node, source);
        return text.split('<').next().unwrap_or(text).to_string();
    }
    node_text(name_node, source).to_string()
}

/// The call's argument expressions (each `argument` node unwrapped to its
/// inner expression), in source order.
fn argument_expressions(call: Node<'_>) -> Vec<Node<'_>> {
    let mut args = Vec::new();
    if let Some(list) = find_child_by_kind(call, "argument_list") {
        for i in 0..list.child_count() {
            if let Some(child) = list.child(i)
                && child.kind() == "argument"
                && let Some(inner) = child.child(child.child_count().saturating_sub(1))
            {
                // `argument` may carry a ref/out modifier before the expression;
                // the expression is always the last child.
                args.push(inner);
            }
        }
    }
    args
}

/// Value of a string literal expression. Verbatim literals count;
/// interpolated strings and everything else do not.
pub(crate) fn literal_string_value(node: Node<'_>, source: &[u8]) -> Option<String> {
    match node.kind() {
        "string_literal" => {
            let text = node_text(node, source);
            Some(text.trim_matches('"').to_string())
        }
        "verbatim_string_literal" => {
            let text = node_text(node, source);
            let stripped = text.strip_prefix('@').unwrap_or(text);
            Some(stripped.trim_matches('"').replace("\"\"", "\""))
        }
        _ => None,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
