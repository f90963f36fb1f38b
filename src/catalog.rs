//! Accumulation and deduplication of hook records.
//!
//! Two tiers: within a module, one record per hook signature (first call
//! site wins). Across modules, a record is dropped only when every field
//! matches an already-merged record — the same signature dispatched from
//! two different methods yields two catalog entries.

use std::collections::HashSet;

use serde::Serialize;

use crate::types::HookRecord;

/// Records extracted from one module, keyed by hook signature.
#[derive(Debug, Default)]
pub struct ModuleHooks {
    records: Vec<HookRecord>,
    seen_signatures: HashSet<String>,
}

impl ModuleHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record unless this module already produced one with the same
    /// hook signature. Returns whether the record was kept.
    pub fn insert(&mut self, record: HookRecord) -> bool {
        if self.seen_signatures.contains(&record.hook_signature) {
            return false;
        }
        self.seen_signatures.insert(record.hook_signature.clone());
        self.records.push(record);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// The final output collection, merged from modules in deterministic order.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct HookCatalog {
    records: Vec<HookRecord>,
    #[serde(skip)]
    seen: HashSet<HookRecord>,
}

impl HookCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges one module's records, preserving their encounter order and
    /// dropping records identical in every field to one already present.
    pub fn merge(&mut self, module: ModuleHooks) {
        for record in module.records {
            if self.seen.contains(&record) {
                continue;
            }
            self.seen.insert(record.clone());
            self.records.push(record);
        }
    }

    pub fn records(&self) -> &[HookRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ParameterDescriptor;

    fn record(signature: &str, class: &str, line: u32) -> HookRecord {
        HookRecord {
            hook_name: signature.split('(').next().unwrap().to_string(),
            hook_signature: signature.to_string(),
            method_parameters: vec![ParameterDescriptor::new("int", "code")],
            method_source_code: format!("void M() {{ /* {} */ }}", class),
            method_class_name: class.to_string(),
            hook_line_invoke: line,
        }
    }

    #[test]
    fn test_module_dedup_is_signature_keyed_first_wins() {
        let mut module = ModuleHooks::new();
        assert!(module.insert(record("OnX(int a)", "A", 1)));
        // Same signature from a different method: still dropped in-module.
        assert!(!module.insert(record("OnX(int a)", "B", 9)));
        assert!(module.insert(record("OnX(string a)", "A", 2)));
        assert_eq!(module.len(), 2);
    }

    #[test]
    fn test_catalog_dedup_requires_full_equality() {
        let mut a = ModuleHooks::new();
        a.insert(record("OnX(int a)", "PluginA", 3));
        let mut b = ModuleHooks::new();
        b.insert(record("OnX(int a)", "PluginB", 3));

        let mut catalog = HookCatalog::new();
        catalog.merge(a);
        catalog.merge(b);
        // Same signature but different class names: both survive.
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_catalog_drops_identical_records_across_modules() {
        let mut a = ModuleHooks::new();
        a.insert(record("OnX(int a)", "Shared", 3));
        let mut b = ModuleHooks::new();
        b.insert(record("OnX(int a)", "Shared", 3));

        let mut catalog = HookCatalog::new();
        catalog.merge(a);
        catalog.merge(b);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_merge_preserves_encounter_order() {
        let mut module = ModuleHooks::new();
        module.insert(record("OnB()", "C", 1));
        module.insert(record("OnA()", "C", 2));

        let mut catalog = HookCatalog::new();
        catalog.merge(module);
        let signatures: Vec<&str> = catalog
            .records()
            .iter()
            .map(|r| r.hook_signature.as_str())
            .collect();
        assert_eq!(signatures, vec!["OnB()", "OnA()"]);
    }

    #[test]
    fn test_catalog_serializes_as_bare_array() {
        let mut module = ModuleHooks::new();
        module.insert(record("OnX(int a)", "C", 1));
        let mut catalog = HookCatalog::new();
        catalog.merge(module);

        let json = serde_json::to_value(&catalog).unwrap();
        assert!(json.is_array());
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["hookSignature"], "OnX(int a)");
    }
}
