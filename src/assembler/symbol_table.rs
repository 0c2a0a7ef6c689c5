//! Symbol table mapping labels and variables to 15-bit RAM addresses

use std::collections::HashMap;

/// Address of an assembly-level symbol
pub type Address = u16;

/// Maps labels/variables to addresses, seeded with the 23 predefined symbols
pub struct SymbolTable {
    addresses: HashMap<String, Address>,
}

impl SymbolTable {
    /// Create a table containing only the predefined symbols
    pub fn new() -> SymbolTable {
        let mut addresses = HashMap::new();
        for i in 0..16u16 {
            addresses.insert(format!("R{}", i), i);
        }
        addresses.insert("SP".to_string(), 0);
        addresses.insert("LCL".to_string(), 1);
        addresses.insert("ARG".to_string(), 2);
        addresses.insert("THIS".to_string(), 3);
        addresses.insert("THAT".to_string(), 4);
        addresses.insert("SCREEN".to_string(), 16384);
        addresses.insert("KBD".to_string(), 24576);
        SymbolTable { addresses }
    }

    /// Look up a symbol's address, if known
    pub fn get(&self, name: &str) -> Option<Address> {
        self.addresses.get(name).copied()
    }

    /// Bind a label to an address. Returns `false` if the label was already bound
    pub fn define_label(&mut self, name: &str, address: Address) -> bool {
        if self.addresses.contains_key(name) {
            return false;
        }
        self.addresses.insert(name.to_string(), address);
        true
    }

    /// Bind a variable to an address, overwriting nothing (used only for
    /// fresh, not-yet-seen symbols)
    pub fn define_variable(&mut self, name: &str, address: Address) {
        self.addresses.insert(name.to_string(), address);
    }
}

impl Default for SymbolTable {
    fn default() -> SymbolTable {
        SymbolTable::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predefined_symbols_are_seeded() {
        let table = SymbolTable::new();
        assert_eq!(table.get("SP"), Some(0));
        assert_eq!(table.get("LCL"), Some(1));
        assert_eq!(table.get("ARG"), Some(2));
        assert_eq!(table.get("THIS"), Some(3));
        assert_eq!(table.get("THAT"), Some(4));
        assert_eq!(table.get("SCREEN"), Some(16384));
        assert_eq!(table.get("KBD"), Some(24576));
        for i in 0..16 {
            assert_eq!(table.get(&format!("R{}", i)), Some(i));
        }
        assert_eq!(table.get("nope"), None);
    }

    #[test]
    fn label_collision_is_rejected() {
        let mut table = SymbolTable::new();
        assert!(table.define_label("LOOP", 10));
        assert!(!table.define_label("LOOP", 20));
        assert_eq!(table.get("LOOP"), Some(10));
    }
}
