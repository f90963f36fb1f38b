//! Semantic binder: best-effort static type resolution over one module's tree.
//!
//! The engine only ever asks two questions, captured by [`TypeBinder`]:
//! the resolved type name of an expression, and the declared base type of a
//! named type. [`SourceBinder`] answers both from a single pass over the
//! decompiled module: class base lists, field and property declarations,
//! constructor-injected parameters, method return types, and local variable
//! declarations. Anything it cannot see resolves to `None` — callers treat
//! that as "skip", never as an error.

use std::collections::HashMap;
use std::ops::Range;

use tree_sitter::Node;

/// The leaf capability the extraction engine depends on.
pub trait TypeBinder {
    /// Resolved static type name of an expression, or `None`.
    fn expression_type(&self, node: Node<'_>) -> Option<String>;

    /// Declared base type of a named type, or `None` when the type is
    /// not declared in this module or has no base list.
    fn declared_base_type(&self, type_name: &str) -> Option<String>;
}

/// Strip generic arguments from a type name: `List<Item>` → `List`.
pub fn strip_generics(type_name: &str) -> &str {
    type_name.split('<').next().unwrap_or(type_name).trim()
}

// ─── Source-backed binder ────────────────────────────────────────────

#[derive(Debug)]
struct ClassScope {
    name: String,
    range: Range<usize>,
    /// Base list in declaration order; the base class comes first in C#.
    base_types: Vec<String>,
    /// field/property name → declared type (generics stripped)
    member_types: HashMap<String, String>,
    /// method name → declared return type
    method_return_types: HashMap<String, String>,
}

#[derive(Debug)]
struct FunctionScope {
    range: Range<usize>,
    /// parameter/local name → declared or inferred type (generics stripped)
    var_types: HashMap<String, String>,
}

/// [`TypeBinder`] built from the parsed source of one module.
pub struct SourceBinder<'a> {
    source: &'a [u8],
    /// Pre-order, so the first entry is the first class declared in the module.
    classes: Vec<ClassScope>,
    functions: Vec<FunctionScope>,
}

impl<'a> SourceBinder<'a> {
    pub fn build(root: Node<'a>, source: &'a [u8]) -> Self {
        let mut classes = Vec::new();
        collect_classes(root, source, &mut classes);
        collect_members(root, source, &mut classes);

        let mut binder = Self { source, classes, functions: Vec::new() };
        let mut functions = Vec::new();
        binder.collect_functions(root, &mut functions);
        binder.functions = functions;
        binder
    }

    /// Name of the innermost class declaration containing `node`.
    pub fn enclosing_class_name(&self, node: Node<'_>) -> Option<&str> {
        self.innermost_class(node.start_byte()).map(|c| c.name.as_str())
    }

    /// First class declared anywhere in the module (attribution fallback).
    pub fn first_class_name(&self) -> Option<&str> {
        self.classes.first().map(|c| c.name.as_str())
    }

    fn innermost_class(&self, byte: usize) -> Option<&ClassScope> {
        self.classes
            .iter()
            .filter(|c| c.range.contains(&byte))
            .min_by_key(|c| c.range.end - c.range.start)
    }

    fn innermost_function(&self, byte: usize) -> Option<&FunctionScope> {
        self.functions
            .iter()
            .filter(|f| f.range.contains(&byte))
            .min_by_key(|f| f.range.end - f.range.start)
    }

    fn text(&self, node: Node<'_>) -> &'a str {
        node.utf8_text(self.source).unwrap_or("")
    }

    /// Resolve a bare identifier: locals and parameters first, then fields
    /// and properties of the enclosing class, then the PascalCase convention
    /// (an uppercase-first bare receiver is a type name, e.g. a static class).
    fn resolve_identifier(&self, node: Node<'_>) -> Option<String> {
        let name = self.text(node).trim();
        match name {
            "" => None,
            "this" => self.enclosing_class_name(node).map(str::to_string),
            "base" => {
                let class = self.innermost_class(node.start_byte())?;
                class.base_types.first().map(|b| strip_generics(b).to_string())
            }
            _ => {
                if let Some(scope) = self.innermost_function(node.start_byte())
                    && let Some(t) = scope.var_types.get(name)
                {
                    return Some(t.clone());
                }
                if let Some(class) = self.innermost_class(node.start_byte())
                    && let Some(t) = class.member_types.get(name)
                {
                    return Some(t.clone());
                }
                if name.chars().next().is_some_and(|c| c.is_uppercase()) {
                    return Some(name.to_string());
                }
                None
            }
        }
    }

    fn resolve_member_access(&self, node: Node<'_>) -> Option<String> {
        // Chained access like `player.inventory.containerMain`: resolve the
        // last member name through the enclosing class's member map, or treat
        // an uppercase-first member as a type name (PascalCase property).
        if let Some(name_node) = node.child_by_field_name("name") {
            let member = self.text(name_node).trim();
            if let Some(class) = self.innermost_class(node.start_byte())
                && let Some(t) = class.member_types.get(member)
            {
                return Some(t.clone());
            }
            if !member.is_empty() && member.chars().next().is_some_and(|c| c.is_uppercase()) {
                return Some(member.to_string());
            }
        }
        let expr = node.child_by_field_name("expression").or_else(|| node.child(0))?;
        self.expression_type(expr)
    }

    /// Resolve same-class calls (`Foo()` or `this.Foo()`) through the class's
    /// method return types. Cross-class calls stay unresolved.
    fn resolve_invocation(&self, node: Node<'_>) -> Option<String> {
        let expr = node.child(0)?;
        let method_name = match expr.kind() {
            "identifier" => Some(self.text(expr).trim().to_string()),
            "generic_name" => expr
                .child(0)
                .filter(|c| c.kind() == "identifier")
                .map(|c| self.text(c).to_string()),
            "member_access_expression" => {
                let receiver = expr.child_by_field_name("expression").or_else(|| expr.child(0))?;
                if receiver.kind() == "this_expression" || self.text(receiver).trim() == "this" {
                    expr.child_by_field_name("name").map(|n| self.text(n).to_string())
                } else {
                    None
                }
            }
            _ => None,
        }?;

        let class = self.innermost_class(node.start_byte())?;
        class.method_return_types.get(method_name.as_str()).cloned()
    }

    // ─── Scope collection ────────────────────────────────────────

    fn collect_functions(&self, node: Node<'a>, functions: &mut Vec<FunctionScope>) {
        match node.kind() {
            "method_declaration" | "constructor_declaration" | "local_function_statement" => {
                let mut var_types = HashMap::new();
                for (param_type, param_name) in declared_parameters(node, self.source) {
                    var_types.insert(param_name, strip_generics(&param_type).to_string());
                }
                if let Some(body) = find_child_by_kind(node, "block")
                    .or_else(|| find_child_by_kind(node, "arrow_expression_clause"))
                {
                    let return_types = self
                        .innermost_class(node.start_byte())
                        .map(|c| &c.method_return_types);
                    collect_local_var_types(body, self.source, return_types, &mut var_types);
                }
                functions.push(FunctionScope { range: node.byte_range(), var_types });
            }
            _ => {}
        }
        for i in 0..node.child_count() {
            if let Some(child) = node.child(i) {
                self.collect_functions(child, functions);
            }
        }
    }
}

impl TypeBinder for SourceBinder<'_> {
    fn expression_type(&self, node: Node<'_>) -> Option<String> {
        match node.kind() {
            "string_literal" | "verbatim_string_literal" | "raw_string_literal"
            | "interpolated_string_expression" => Some("string".to_string()),
            "integer_literal" => Some("int".to_string()),
            "real_literal" => Some("float".to_string()),
            "boolean_literal" => Some("bool".to_string()),
            "character_literal" => Some("char".to_string()),
            "this_expression" | "this" => self.enclosing_class_name(node).map(str::to_string),
            "base_expression" | "base" => {
                let class = self.innermost_class(node.start_byte())?;
                class.base_types.first().map(|b| strip_generics(b).to_string())
            }
            "identifier" => self.resolve_identifier(node),
            "member_access_expression" => self.resolve_member_access(node),
            "invocation_expression" => self.resolve_invocation(node),
            "object_creation_expression" => {
                // child(0) = "new", child(1) = type
                let type_node = node.child(1)?;
                let text = self.text(type_node);
                let simple = text.rsplit('.').next().unwrap_or(text);
                let base = strip_generics(simple);
                (!base.is_empty()).then(|| base.to_string())
            }
            "cast_expression" => {
                // child(0) = "(", child(1) = type
                let type_node = node.child(1)?;
                Some(strip_generics(self.text(type_node)).to_string())
            }
            "as_expression" => {
                // child(0) = expr, child(1) = "as", child(2) = type
                let type_node = node.child(2)?;
                Some(strip_generics(self.text(type_node)).to_string())
            }
            "parenthesized_expression" => {
                let inner = node.child(1).filter(|c| c.is_named()).or_else(|| {
                    (0..node.child_count()).filter_map(|i| node.child(i)).find(|c| c.is_named())
                })?;
                self.expression_type(inner)
            }
            "await_expression" => {
                let inner = node.child(1)?;
                self.expression_type(inner).map(|t| unwrap_task_type(&t))
            }
            "prefix_unary_expression" => {
                let inner = node.child(1)?;
                self.expression_type(inner)
            }
            _ => None,
        }
    }

    fn declared_base_type(&self, type_name: &str) -> Option<String> {
        let wanted = strip_generics(type_name);
        self.classes
            .iter()
            .find(|c| c.name == wanted)
            .and_then(|c| c.base_types.first())
            .map(|b| strip_generics(b).to_string())
    }
}

// ─── Declaration collection helpers ─────────────────────────────────

fn collect_classes(node: Node<'_>, source: &[u8], classes: &mut Vec<ClassScope>) {
    if matches!(
        node.kind(),
        "class_declaration" | "struct_declaration" | "record_declaration"
    ) && let Some(name_node) = node.child_by_field_name("name")
    {
        let name = node_text(name_node, source).to_string();
        classes.push(ClassScope {
            name,
            range: node.byte_range(),
            base_types: extract_base_types(node, source),
            member_types: HashMap::new(),
            method_return_types: HashMap::new(),
        });
    }
    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            collect_classes(child, source, classes);
        }
    }
}

fn collect_members(node: Node<'_>, source: &[u8], classes: &mut [ClassScope]) {
    match node.kind() {
        "field_declaration" => {
            if let Some(var_decl) = find_child_by_kind(node, "variable_declaration") {
                let type_text = var_decl
                    .child_by_field_name("type")
                    .or_else(|| var_decl.child(0))
                    .map(|t| node_text(t, source))
                    .unwrap_or("");
                let base_type = strip_generics(type_text).to_string();
                if !base_type.is_empty() && base_type != "var" {
                    for i in 0..var_decl.child_count() {
                        if let Some(child) = var_decl.child(i)
                            && child.kind() == "variable_declarator"
                            && let Some(name_node) =
                                child.child_by_field_name("name").or_else(|| child.child(0))
                        {
                            insert_member(
                                classes,
                                node.start_byte(),
                                node_text(name_node, source),
                                &base_type,
                            );
                        }
                    }
                }
            }
        }
        "property_declaration" => {
            if let (Some(type_node), Some(name_node)) =
                (node.child_by_field_name("type"), node.child_by_field_name("name"))
            {
                let base_type = strip_generics(node_text(type_node, source)).to_string();
                if !base_type.is_empty() {
                    insert_member(classes, node.start_byte(), node_text(name_node, source), &base_type);
                }
            }
        }
        "method_declaration" => {
            if let (Some(type_node), Some(name_node)) = (
                node.child_by_field_name("returns")
                    .or_else(|| node.child_by_field_name("type")),
                node.child_by_field_name("name"),
            )
            {
                let return_type = node_text(type_node, source).trim().to_string();
                if !return_type.is_empty() && return_type != "void" {
                    let name = node_text(name_node, source).to_string();
                    if let Some(class) = innermost_class_mut(classes, node.start_byte()) {
                        class.method_return_types.insert(name, return_type);
                    }
                }
            }
        }
        "constructor_declaration" => {
            // DI pattern: constructor parameters commonly back same-named
            // fields, with or without an underscore prefix.
            for (param_type, param_name) in declared_parameters(node, source) {
                let base_type = strip_generics(&param_type).to_string();
                if base_type.is_empty() {
                    continue;
                }
                if let Some(class) = innermost_class_mut(classes, node.start_byte()) {
                    class
                        .member_types
                        .entry(format!("_{}", param_name))
                        .or_insert_with(|| base_type.clone());
                    class.member_types.entry(param_name).or_insert(base_type);
                }
            }
        }
        _ => {}
    }

    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            collect_members(child, source, classes);
        }
    }
}

fn insert_member(classes: &mut [ClassScope], byte: usize, name: &str, base_type: &str) {
    let name = name.trim();
    if name.is_empty() {
        return;
    }
    if let Some(class) = innermost_class_mut(classes, byte) {
        class.member_types.insert(name.to_string(), base_type.to_string());
    }
}

fn innermost_class_mut(classes: &mut [ClassScope], byte: usize) -> Option<&mut ClassScope> {
    classes
        .iter_mut()
        .filter(|c| c.range.contains(&byte))
        .min_by_key(|c| c.range.end - c.range.start)
}

/// Declared `(type, name)` pairs of a method/constructor/local function.
/// Parameters without a parseable type node are omitted.
pub(crate) fn declared_parameters(node: Node<'_>, source: &[u8]) -> Vec<(String, String)> {
    let mut params = Vec::new();
    let Some(list) = find_child_by_kind(node, "parameter_list") else {
        return params;
    };
    for i in 0..list.child_count() {
        let Some(param) = list.child(i) else { continue };
        if param.kind() != "parameter" {
            continue;
        }
        let type_text = param
            .child_by_field_name("type")
            .map(|t| node_text(t, source).trim().to_string())
            .unwrap_or_default();
        let name_text = param
            .child_by_field_name("name")
            .map(|n| node_text(n, source).trim().to_string())
            .unwrap_or_default();
        if !type_text.is_empty() && !name_text.is_empty() {
            params.push((type_text, name_text));
        }
    }
    params
}

// ─── Local variable type extraction ─────────────────────────────────

/// Walks a method body recording local declaration types.
/// Handles explicit types, `var x = new T(...)`, casts, `as` expressions,
/// pattern declarations, and same-class method return types.
fn collect_local_var_types(
    node: Node<'_>,
    source: &[u8],
    method_return_types: Option<&HashMap<String, String>>,
    vars: &mut HashMap<String, String>,
) {
    match node.kind() {
        "local_declaration_statement" => {
            if let Some(var_decl) = find_child_by_kind(node, "variable_declaration") {
                extract_var_declaration_types(var_decl, source, method_return_types, vars);
            }
        }
        // if (obj is TypeName varName), case TypeName varName:
        "declaration_pattern" => {
            if let (Some(t), Some(n)) = (node.child(0), node.child(1)) {
                let type_name = strip_generics(node_text(t, source)).to_string();
                let var_name = node_text(n, source).trim().to_string();
                if !type_name.is_empty()
                    && !var_name.is_empty()
                    && type_name.chars().next().is_some_and(|c| c.is_uppercase())
                {
                    vars.insert(var_name, type_name);
                }
            }
        }
        // Nested functions and lambdas get their own scope.
        "local_function_statement" | "lambda_expression" | "anonymous_method_expression" => return,
        _ => {}
    }

    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            collect_local_var_types(child, source, method_return_types, vars);
        }
    }
}

fn extract_var_declaration_types(
    var_decl: Node<'_>,
    source: &[u8],
    method_return_types: Option<&HashMap<String, String>>,
    vars: &mut HashMap<String, String>,
) {
    let Some(type_node) = var_decl.child(0) else { return };
    let type_text = node_text(type_node, source).trim().to_string();
    let is_var_or_dynamic = type_text == "var" || type_text == "dynamic";

    let explicit_base_type = if !is_var_or_dynamic {
        let base = strip_generics(&type_text).to_string();
        (!base.is_empty() && base.chars().next().is_some_and(|c| c.is_uppercase())).then_some(base)
    } else {
        None
    };

    for i in 0..var_decl.child_count() {
        let Some(child) = var_decl.child(i) else { continue };
        if child.kind() != "variable_declarator" {
            continue;
        }
        let Some(name_node) = child.child_by_field_name("name").or_else(|| child.child(0)) else {
            continue;
        };
        if name_node.kind() != "identifier" {
            continue;
        }
        let name = node_text(name_node, source).trim().to_string();
        if name.is_empty() {
            continue;
        }

        if let Some(ref base_type) = explicit_base_type {
            vars.insert(name, base_type.clone());
        } else if is_var_or_dynamic {
            let mut inferred = find_descendant_by_kind(child, "object_creation_expression")
                .and_then(|new_expr| new_expr.child(1))
                .map(|t| {
                    let text = node_text(t, source);
                    let simple = text.rsplit('.').next().unwrap_or(text);
                    strip_generics(simple).to_string()
                })
                .filter(|t| !t.is_empty() && t.chars().next().is_some_and(|c| c.is_uppercase()));

            if inferred.is_none() {
                inferred = find_descendant_by_kind(child, "cast_expression")
                    .and_then(|cast| cast.child(1))
                    .map(|t| strip_generics(node_text(t, source)).to_string())
                    .filter(|t| !t.is_empty() && t.chars().next().is_some_and(|c| c.is_uppercase()));
            }

            if inferred.is_none() {
                inferred = find_descendant_by_kind(child, "as_expression")
                    .and_then(|as_expr| as_expr.child(2))
                    .map(|t| strip_generics(node_text(t, source)).to_string())
                    .filter(|t| !t.is_empty() && t.chars().next().is_some_and(|c| c.is_uppercase()));
            }

            if inferred.is_none()
                && let Some(return_types) = method_return_types
            {
                let has_await = find_descendant_by_kind(child, "await_expression").is_some();
                inferred = find_descendant_by_kind(child, "invocation_expression")
                    .and_then(|inv| simple_invoked_name(inv, source))
                    .and_then(|method_name| return_types.get(&method_name))
                    .map(|rt| if has_await { unwrap_task_type(rt) } else { rt.clone() })
                    .map(|t| strip_generics(&t).to_string())
                    .filter(|t| !t.is_empty() && t.chars().next().is_some_and(|c| c.is_uppercase()));
            }

            if let Some(t) = inferred {
                vars.insert(name, t);
            }
        }
    }
}

/// Method name of a same-class invocation (`Foo()` / `this.Foo()`); `None`
/// for cross-class calls through fields or other receivers.
fn simple_invoked_name(invocation: Node<'_>, source: &[u8]) -> Option<String> {
    let expr = invocation.child(0)?;
    match expr.kind() {
        "identifier" => {
            let name = node_text(expr, source).trim();
            (!name.is_empty()).then(|| name.to_string())
        }
        "member_access_expression" => {
            let receiver = expr.child_by_field_name("expression").or_else(|| expr.child(0))?;
            if receiver.kind() == "this_expression" || node_text(receiver, source).trim() == "this" {
                expr.child_by_field_name("name")
                    .map(|n| node_text(n, source).to_string())
            } else {
                None
            }
        }
        _ => None,
    }
}

/// `Task<T>` / `ValueTask<T>` → `T`; anything else unchanged.
pub(crate) fn unwrap_task_type(type_name: &str) -> String {
    let prefix_len = if type_name.starts_with("Task<") {
        5
    } else if type_name.starts_with("ValueTask<") {
        10
    } else {
        return type_name.to_string();
    };
    if !type_name.ends_with('>') {
        return type_name.to_string();
    }
    let inner = &type_name[prefix_len..type_name.len() - 1];
    if inner.is_empty() {
        return type_name.to_string();
    }
    inner.to_string()
}

// ─── Shared node helpers ────────────────────────────────────────────

pub(crate) fn node_text<'a>(node: Node<'_>, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

pub(crate) fn find_child_by_kind<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    for i in 0..node.child_count() {
        let child = node.child(i)?;
        if child.kind() == kind {
            return Some(child);
        }
    }
    None
}

pub(crate) fn find_descendant_by_kind<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            if child.kind() == kind {
                return Some(child);
            }
            if let Some(found) = find_descendant_by_kind(child, kind) {
                return Some(found);
            }
        }
    }
    None
}

fn extract_base_types(node: Node<'_>, source: &[u8]) -> Vec<String> {
    let mut base_types = Vec::new();
    if let Some(base_list) = find_child_by_kind(node, "base_list") {
        for i in 0..base_list.child_count() {
            if let Some(child) = base_list.child(i)
                && child.is_named()
            {
                base_types.push(node_text(child, source).to_string());
            }
        }
    }
    base_types
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> tree_sitter::Tree {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
            .unwrap();
        parser.parse(source, None).unwrap()
    }

    fn first_invocation(root: Node<'_>) -> Node<'_> {
        find_descendant_by_kind(root, "invocation_expression").unwrap()
    }

    #[test]
    fn test_declared_base_type_from_base_list() {
        let source = "class MyPlugin : RustPlugin { }";
        let tree = parse(source);
        let binder = SourceBinder::build(tree.root_node(), source.as_bytes());
        assert_eq!(binder.declared_base_type("MyPlugin").as_deref(), Some("RustPlugin"));
        assert_eq!(binder.declared_base_type("RustPlugin"), None);
    }

    #[test]
    fn test_field_type_resolution() {
        let source = r#"
class MyPlugin : RustPlugin {
    private Timer _timer;
    void Go() { _timer.Call("OnTick"); }
}"#;
        let tree = parse(source);
        let binder = SourceBinder::build(tree.root_node(), source.as_bytes());
        let inv = first_invocation(tree.root_node());
        let member = inv.child(0).unwrap();
        let receiver = member.child_by_field_name("expression").unwrap();
        assert_eq!(binder.expression_type(receiver).as_deref(), Some("Timer"));
    }

    #[test]
    fn test_local_var_explicit_and_inferred() {
        let source = r#"
class C {
    void M() {
        BasePlayer player = GetPlayer();
        var item = new Item();
        var other = (BaseEntity)raw;
        Use(player, item, other);
    }
}"#;
        let tree = parse(source);
        let binder = SourceBinder::build(tree.root_node(), source.as_bytes());
        let scope = binder
            .innermost_function(source.find("Use(").unwrap())
            .unwrap();
        assert_eq!(scope.var_types.get("player").map(String::as_str), Some("BasePlayer"));
        assert_eq!(scope.var_types.get("item").map(String::as_str), Some("Item"));
        assert_eq!(scope.var_types.get("other").map(String::as_str), Some("BaseEntity"));
    }

    #[test]
    fn test_parameter_resolution() {
        let source = r#"
class C {
    void M(BasePlayer player) { player.Kick(); }
}"#;
        let tree = parse(source);
        let binder = SourceBinder::build(tree.root_node(), source.as_bytes());
        let inv = first_invocation(tree.root_node());
        let receiver = inv.child(0).unwrap().child_by_field_name("expression").unwrap();
        assert_eq!(binder.expression_type(receiver).as_deref(), Some("BasePlayer"));
    }

    #[test]
    fn test_this_resolves_to_enclosing_class() {
        let source = r#"
class MyPlugin : RustPlugin {
    void M() { this.Call("OnX"); }
}"#;
        let tree = parse(source);
        let binder = SourceBinder::build(tree.root_node(), source.as_bytes());
        let inv = first_invocation(tree.root_node());
        let receiver = inv.child(0).unwrap().child_by_field_name("expression").unwrap();
        assert_eq!(binder.expression_type(receiver).as_deref(), Some("MyPlugin"));
    }

    #[test]
    fn test_uppercase_bare_identifier_is_type() {
        let source = r#"
class C {
    void M() { Interface.CallHook("OnX"); }
}"#;
        let tree = parse(source);
        let binder = SourceBinder::build(tree.root_node(), source.as_bytes());
        let inv = first_invocation(tree.root_node());
        let receiver = inv.child(0).unwrap().child_by_field_name("expression").unwrap();
        assert_eq!(binder.expression_type(receiver).as_deref(), Some("Interface"));
    }

    #[test]
    fn test_method_return_type_resolution() {
        let source = r#"
class C {
    BasePlayer FindPlayer() { return null; }
    void M() {
        var p = FindPlayer();
        p.Kick();
    }
}"#;
        let tree = parse(source);
        let binder = SourceBinder::build(tree.root_node(), source.as_bytes());
        let scope = binder
            .innermost_function(source.find("p.Kick").unwrap())
            .unwrap();
        assert_eq!(scope.var_types.get("p").map(String::as_str), Some("BasePlayer"));
    }

    #[test]
    fn test_literal_types() {
        let source = r#"class C { void M() { F("a", 1, 1.5f, true); } }"#;
        let tree = parse(source);
        let binder = SourceBinder::build(tree.root_node(), source.as_bytes());
        let inv = first_invocation(tree.root_node());
        let args = find_child_by_kind(inv, "argument_list").unwrap();
        let literals: Vec<Option<String>> = (0..args.child_count())
            .filter_map(|i| args.child(i))
            .filter(|c| c.kind() == "argument")
            .map(|a| binder.expression_type(a.child(0).unwrap()))
            .collect();
        assert_eq!(literals[0].as_deref(), Some("string"));
        assert_eq!(literals[1].as_deref(), Some("int"));
        assert_eq!(literals[2].as_deref(), Some("float"));
        assert_eq!(literals[3].as_deref(), Some("bool"));
    }

    #[test]
    fn test_unwrap_task_type() {
        assert_eq!(unwrap_task_type("Task<Item>"), "Item");
        assert_eq!(unwrap_task_type("ValueTask<Stream>"), "Stream");
        assert_eq!(unwrap_task_type("Task"), "Task");
        assert_eq!(unwrap_task_type("Item"), "Item");
        assert_eq!(unwrap_task_type("Task<>"), "Task<>");
    }

    #[test]
    fn test_first_class_name_is_preorder_first() {
        let source = "class First { } class Second { }";
        let tree = parse(source);
        let binder = SourceBinder::build(tree.root_node(), source.as_bytes());
        assert_eq!(binder.first_class_name(), Some("First"));
    }
}
