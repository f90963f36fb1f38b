//! Core record types produced by the extraction engine.

use serde::Serialize;

/// Placeholder used when an argument's static type cannot be resolved.
pub const UNKNOWN_TYPE: &str = "unknown";

/// Fallback name used when normalization yields an empty string.
pub const FALLBACK_PARAM_NAME: &str = "param";

/// Placeholder class name when the module declares no class at all.
pub const UNKNOWN_CLASS: &str = "UnknownClass";

/// One `{type, name}` pair. Used both for hook-signature parameter
/// descriptors and for the enclosing method's declared parameters.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterDescriptor {
    #[serde(rename = "type")]
    pub param_type: String,
    pub name: String,
}

impl ParameterDescriptor {
    pub fn new(param_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            param_type: param_type.into(),
            name: name.into(),
        }
    }
}

/// Metadata describing one hook dispatch call site.
///
/// Immutable once built. `hook_name` is recoverable from `hook_signature`
/// and is not serialized (the output boundary carries the signature only).
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct HookRecord {
    #[serde(skip_serializing)]
    pub hook_name: String,
    /// Canonical dedup key: `name(type name, type name, ...)`.
    pub hook_signature: String,
    /// Declared parameters of the enclosing method (not the call arguments).
    pub method_parameters: Vec<ParameterDescriptor>,
    /// Full source text of the enclosing method or local function.
    pub method_source_code: String,
    /// Name of the nearest enclosing class.
    pub method_class_name: String,
    /// 1-based line of the call relative to the enclosing method's first line.
    pub hook_line_invoke: u32,
}

/// Builds the canonical signature key from a hook name and its descriptors.
pub fn build_hook_signature(hook_name: &str, params: &[ParameterDescriptor]) -> String {
    let joined = params
        .iter()
        .map(|p| format!("{} {}", p.param_type, p.name))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{}({})", hook_name, joined)
}
