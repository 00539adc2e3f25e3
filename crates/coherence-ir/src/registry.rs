//! Gate-kind lookup by name.

use rustc_hash::FxHashMap;

use crate::error::{IrError, IrResult};
use crate::gate::{CustomGate, Gate, GateKind, StandardGate};
use crate::qubit::QubitId;

/// Alternate spellings accepted on input, resolved to canonical names.
const ALIASES: &[(&str, &str)] = &[
    ("cnot", "cx"),
    ("toffoli", "ccx"),
    ("fredkin", "cswap"),
    ("i", "id"),
    ("u3", "u"),
    ("phase", "p"),
];

/// Name → gate kind table used by every parser and converter.
///
/// Lookups are case-insensitive. Registries are plain values: build one with
/// [`GateRegistry::standard`] and pass it by reference.
#[derive(Debug, Clone)]
pub struct GateRegistry {
    kinds: FxHashMap<String, GateKind>,
    aliases: FxHashMap<String, String>,
}

impl GateRegistry {
    /// An empty registry with no kinds and no aliases.
    pub fn empty() -> Self {
        Self {
            kinds: FxHashMap::default(),
            aliases: FxHashMap::default(),
        }
    }

    /// A registry holding every built-in kind and alias.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        for gate in StandardGate::ALL {
            registry
                .kinds
                .insert(gate.name().to_string(), GateKind::Standard(gate));
        }
        for (alias, canonical) in ALIASES {
            registry
                .aliases
                .insert((*alias).to_string(), (*canonical).to_string());
        }
        registry
    }

    /// Add a runtime kind. Fails if the name collides with a kind or alias.
    pub fn register(&mut self, gate: CustomGate) -> IrResult<()> {
        let name = gate.name().to_string();
        if self.kinds.contains_key(&name) || self.aliases.contains_key(&name) {
            return Err(IrError::DuplicateGateName(name));
        }
        self.kinds.insert(name, GateKind::Custom(gate));
        Ok(())
    }

    /// Look up a kind by name or alias, case-insensitively.
    pub fn get(&self, name: &str) -> Option<&GateKind> {
        let lower = name.to_ascii_lowercase();
        match self.aliases.get(&lower) {
            Some(canonical) => self.kinds.get(canonical),
            None => self.kinds.get(&lower),
        }
    }

    /// Look up a kind by name, failing with `UnknownGateKind`.
    pub fn resolve(&self, name: &str) -> IrResult<&GateKind> {
        self.get(name)
            .ok_or_else(|| IrError::UnknownGateKind(name.to_string()))
    }

    /// Resolve `name` and build a validated gate from it.
    pub fn gate(&self, name: &str, qubits: Vec<QubitId>, params: Vec<f64>) -> IrResult<Gate> {
        let kind = self.resolve(name)?.clone();
        Gate::new(kind, qubits, params)
    }

    /// Check whether `name` resolves.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of distinct kinds (aliases not counted).
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Check if the registry holds no kinds.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// All kinds, sorted by canonical name.
    pub fn kinds(&self) -> Vec<&GateKind> {
        let mut kinds: Vec<_> = self.kinds.values().collect();
        kinds.sort_by(|a, b| a.name().cmp(b.name()));
        kinds
    }
}

impl Default for GateRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::Arity;

    #[test]
    fn test_standard_lookup() {
        let registry = GateRegistry::standard();
        assert_eq!(registry.len(), StandardGate::ALL.len());
        assert_eq!(
            registry.get("cx"),
            Some(&GateKind::Standard(StandardGate::CX))
        );
        assert_eq!(
            registry.get("CX"),
            Some(&GateKind::Standard(StandardGate::CX))
        );
        assert!(registry.get("foo").is_none());
    }

    #[test]
    fn test_aliases() {
        let registry = GateRegistry::standard();
        assert_eq!(registry.resolve("CNOT").unwrap().name(), "cx");
        assert_eq!(registry.resolve("toffoli").unwrap().name(), "ccx");
        assert_eq!(registry.resolve("u3").unwrap().name(), "u");
        assert_eq!(registry.resolve("i").unwrap().name(), "id");
    }

    #[test]
    fn test_unknown_gate() {
        let registry = GateRegistry::standard();
        let err = registry.resolve("frobnicate").unwrap_err();
        assert_eq!(err, IrError::UnknownGateKind("frobnicate".into()));
    }

    #[test]
    fn test_register_custom() {
        let mut registry = GateRegistry::standard();
        registry
            .register(CustomGate::new("iswap", 2))
            .unwrap();
        let kind = registry.resolve("ISWAP").unwrap();
        assert_eq!(kind.arity(), Arity::Exactly(2));
        assert!(matches!(kind, GateKind::Custom(_)));

        let err = registry.register(CustomGate::new("H", 1)).unwrap_err();
        assert_eq!(err, IrError::DuplicateGateName("h".into()));

        let err = registry.register(CustomGate::new("cnot", 2)).unwrap_err();
        assert!(matches!(err, IrError::DuplicateGateName(_)));
    }

    #[test]
    fn test_build_gate_by_name() {
        let registry = GateRegistry::standard();
        let gate = registry
            .gate("rz", vec![QubitId(0)], vec![0.25])
            .unwrap();
        assert_eq!(gate.kind(), &GateKind::Standard(StandardGate::Rz));

        assert!(registry.gate("cx", vec![QubitId(0)], vec![]).is_err());
    }

    #[test]
    fn test_kinds_sorted() {
        let registry = GateRegistry::standard();
        let names: Vec<_> = registry.kinds().iter().map(|k| k.name()).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }
}
