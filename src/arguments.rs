//! Argument resolution: turns the dispatch call's trailing arguments into
//! ordered `{type, name}` descriptors for the hook signature.

use tree_sitter::Node;

use crate::binder::{find_child_by_kind, node_text, SourceBinder, TypeBinder};
use crate::types::{ParameterDescriptor, FALLBACK_PARAM_NAME, UNKNOWN_TYPE};

/// Resolves the argument expressions after the hook name, in order.
///
/// Null arguments are skipped. An inline array construction with an explicit
/// element list is flattened to one descriptor per element (null elements
/// skipped) — hooks receiving `new object[] { a, b }` are documented as
/// two-parameter hooks, not one array-parameter hooks.
pub fn resolve_arguments(
    args: &[Node<'_>],
    binder: &SourceBinder<'_>,
    source: &[u8],
) -> Vec<ParameterDescriptor> {
    let mut descriptors = Vec::new();
    for &arg in args {
        if arg.kind() == "null_literal" {
            continue;
        }
        if let Some(elements) = inline_array_elements(arg) {
            for element in elements {
                if element.kind() == "null_literal" {
                    continue;
                }
                descriptors.push(describe_expression(element, binder, source));
            }
        } else {
            descriptors.push(describe_expression(arg, binder, source));
        }
    }
    descriptors
}

/// Elements of an inline array construction, or `None` when the argument is
/// not an array construction with an explicit initializer list
/// (`new object[5]` stays a single descriptor).
fn inline_array_elements<'a>(node: Node<'a>) -> Option<Vec<Node<'a>>> {
    if !matches!(
        node.kind(),
        "array_creation_expression" | "implicit_array_creation_expression"
    ) {
        return None;
    }
    let initializer = find_child_by_kind(node, "initializer_expression")?;
    let elements = (0..initializer.child_count())
        .filter_map(|i| initializer.child(i))
        .filter(|c| c.is_named())
        .collect();
    Some(elements)
}

fn describe_expression(
    expr: Node<'_>,
    binder: &SourceBinder<'_>,
    source: &[u8],
) -> ParameterDescriptor {
    let resolved_type = binder.expression_type(expr);
    let raw_text = node_text(expr, source).trim();
    let name = normalize_param_name(raw_text, resolved_type.as_deref());
    ParameterDescriptor::new(
        resolved_type.unwrap_or_else(|| UNKNOWN_TYPE.to_string()),
        name,
    )
}

// ─── Name normalization ─────────────────────────────────────────────

/// Derives a human-readable parameter name from an expression's source text.
///
/// Deliberately heuristic and lossy; collisions are acceptable. Steps:
/// 1. `this` with a known type → the type name, first character lowered.
/// 2. Collapse call suffixes right-to-left: `obj.GetTarget()` → `getTarget`,
///    repeated until no parentheses remain.
/// 3. camelCase-join remaining dotted segments: `a.b` → `aB`.
/// 4. Drop any leftover `ToString` text.
/// 5. Empty result → `"param"`.
pub fn normalize_param_name(text: &str, resolved_type: Option<&str>) -> String {
    let text = text.trim();

    if text == "this" {
        if let Some(type_name) = resolved_type {
            let lowered = lower_first(type_name);
            if !lowered.is_empty() {
                return lowered;
            }
        }
    }

    let mut name = collapse_call_suffixes(text);
    name = camel_join_segments(&name);
    name = name.replace("ToString", "");

    if name.is_empty() {
        FALLBACK_PARAM_NAME.to_string()
    } else {
        name
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Repeatedly collapses the rightmost `<prefix>.<Name>(<args>)` or
/// `<Name>(<args>)` span into the lower-cased method name until the text
/// contains no parentheses. The prefix chain (dotted components, including
/// earlier call results) is consumed along with the call.
fn collapse_call_suffixes(text: &str) -> String {
    let mut s = text.to_string();

    while let Some(open) = s.rfind('(') {
        let bytes = s.as_bytes();

        // Method name directly before '('.
        let mut name_start = open;
        while name_start > 0 && is_ident_byte(bytes[name_start - 1]) {
            name_start -= 1;
        }
        let name = s[name_start..open].to_string();

        // `open` is the rightmost '(' — its match is the next ')'.
        let end = s[open..]
            .find(')')
            .map(|i| open + i + 1)
            .unwrap_or(s.len());

        // Consume the dotted prefix chain to the left of the name.
        let mut span_start = name_start;
        while span_start > 0 && bytes[span_start - 1] == b'.' {
            let mut pos = span_start - 1; // at '.'
            if pos > 0 && bytes[pos - 1] == b')' {
                // Earlier call result: skip its balanced parens and name.
                let mut depth = 0usize;
                pos -= 1;
                loop {
                    match bytes[pos] {
                        b')' => depth += 1,
                        b'(' => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        _ => {}
                    }
                    if pos == 0 {
                        break;
                    }
                    pos -= 1;
                }
                while pos > 0 && is_ident_byte(bytes[pos - 1]) {
                    pos -= 1;
                }
            } else {
                while pos > 0 && is_ident_byte(bytes[pos - 1]) {
                    pos -= 1;
                }
            }
            if pos == span_start - 1 {
                // No component consumed; stop to guarantee progress.
                break;
            }
            span_start = pos;
        }

        s.replace_range(span_start..end, &lower_first(&name));
    }

    s
}

/// `a.b.c` → `aBC`: first segment kept, later segments upper-cased and
/// appended without separators.
fn camel_join_segments(text: &str) -> String {
    if !text.contains('.') {
        return text.to_string();
    }
    let mut segments = text.split('.');
    let mut out = segments.next().unwrap_or("").to_string();
    for segment in segments {
        out.push_str(&upper_first(segment));
    }
    out
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::find_descendant_by_kind;
    use crate::detector::detect_hook_call;
    use crate::binder::SourceBinder;

    #[test]
    fn test_self_reference_uses_type_name() {
        assert_eq!(normalize_param_name("this", Some("Player")), "player");
    }

    #[test]
    fn test_self_reference_without_type_falls_through() {
        assert_eq!(normalize_param_name("this", None), "this");
    }

    #[test]
    fn test_call_suffix_collapsed() {
        assert_eq!(normalize_param_name("obj.GetTarget()", None), "getTarget");
    }

    #[test]
    fn test_bare_call_collapsed() {
        assert_eq!(normalize_param_name("GetTarget()", None), "getTarget");
    }

    #[test]
    fn test_chained_calls_collapse_to_last() {
        assert_eq!(normalize_param_name("Foo(x).Bar(y)", None), "bar");
    }

    #[test]
    fn test_dotted_segments_camel_joined() {
        assert_eq!(normalize_param_name("a.b", None), "aB");
        assert_eq!(
            normalize_param_name("player.inventory.containerMain", None),
            "playerInventoryContainerMain"
        );
    }

    #[test]
    fn test_tostring_removed() {
        assert_eq!(normalize_param_name("entity.net.ID.ToString", None), "entityNetID");
    }

    #[test]
    fn test_empty_falls_back_to_param() {
        assert_eq!(normalize_param_name("", None), "param");
    }

    #[test]
    fn test_simple_identifier_unchanged() {
        assert_eq!(normalize_param_name("player", Some("BasePlayer")), "player");
    }

    #[test]
    fn test_collapse_leaves_no_parens() {
        for text in ["A(B(c)).D(e)", "((x))", "f()g()", "weird)("] {
            let collapsed = collapse_call_suffixes(text);
            assert!(!collapsed.contains('('), "'{}' -> '{}'", text, collapsed);
        }
    }

    // ─── End-to-end descriptor resolution ────────────────────────

    fn parse(source: &str) -> tree_sitter::Tree {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
            .unwrap();
        parser.parse(source, None).unwrap()
    }

    fn resolve_first_call(source: &str) -> Vec<ParameterDescriptor> {
        let tree = parse(source);
        let binder = SourceBinder::build(tree.root_node(), source.as_bytes());
        let inv = find_descendant_by_kind(tree.root_node(), "invocation_expression").unwrap();
        let dispatch = detect_hook_call(inv, &binder, source.as_bytes()).unwrap();
        resolve_arguments(&dispatch.arguments, &binder, source.as_bytes())
    }

    #[test]
    fn test_array_argument_flattened() {
        let source = r#"
class MyPlugin : RustPlugin {
    void M(BasePlayer a, Item b) {
        CallHook("OnX", new object[] { a, b });
    }
}"#;
        let descriptors = resolve_first_call(source);
        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors[0], ParameterDescriptor::new("BasePlayer", "a"));
        assert_eq!(descriptors[1], ParameterDescriptor::new("Item", "b"));
    }

    #[test]
    fn test_null_arguments_skipped() {
        let source = r#"
class MyPlugin : RustPlugin {
    void M(BasePlayer a) {
        CallHook("OnX", null, a, new object[] { null, a });
    }
}"#;
        let descriptors = resolve_first_call(source);
        assert_eq!(descriptors.len(), 2);
        assert!(descriptors.iter().all(|d| d.name == "a"));
    }

    #[test]
    fn test_array_without_initializer_stays_single() {
        let source = r#"
class MyPlugin : RustPlugin {
    void M() {
        CallHook("OnX", new object[5]);
    }
}"#;
        let descriptors = resolve_first_call(source);
        assert_eq!(descriptors.len(), 1);
    }

    #[test]
    fn test_unresolvable_type_is_unknown() {
        let source = r#"
class MyPlugin : RustPlugin {
    void M() {
        CallHook("OnX", mystery);
    }
}"#;
        let descriptors = resolve_first_call(source);
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].param_type, "unknown");
        assert_eq!(descriptors[0].name, "mystery");
    }

    #[test]
    fn test_this_argument_named_after_class() {
        let source = r#"
class MyPlugin : RustPlugin {
    void M() {
        CallHook("OnX", this);
    }
}"#;
        let descriptors = resolve_first_call(source);
        assert_eq!(descriptors[0], ParameterDescriptor::new("MyPlugin", "myPlugin"));
    }

    // ─── Property-style invariants ───────────────────────────────

    use proptest::prelude::*;

    proptest! {
        /// Normalized names never retain opening parens or dot separators.
        /// (An unmatched ')' with no '(' is outside the collapse rule and
        /// may survive; decompiled expressions are always balanced.)
        #[test]
        fn normalize_strips_structure(text in "[a-zA-Z_][a-zA-Z0-9_.()]{0,40}") {
            let name = normalize_param_name(&text, None);
            prop_assert!(!name.contains('('), "'{}' -> '{}'", text, name);
            prop_assert!(!name.contains('.'), "'{}' -> '{}'", text, name);
        }

        /// Normalization is deterministic and never empty.
        #[test]
        fn normalize_deterministic_nonempty(text in "\\PC{0,60}") {
            let a = normalize_param_name(&text, None);
            let b = normalize_param_name(&text, None);
            prop_assert_eq!(&a, &b);
            prop_assert!(!a.is_empty());
        }
    }
}
