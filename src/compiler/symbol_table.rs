//! Class-wide and subroutine-wide symbol tables

use std::collections::HashMap;

/// The role a symbol plays, each with its own independent 0-based counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Static,
    Field,
    Arg,
    Var,
}

/// One declared name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub type_name: String,
    pub kind: Kind,
    pub index: u16,
}

/// Two independent tables: class-wide (`Static`/`Field`) and subroutine-wide
/// (`Arg`/`Var`), each kind counted separately. The subroutine table is
/// cleared at the start of every subroutine.
pub struct SymbolTable {
    class: HashMap<String, Symbol>,
    subroutine: HashMap<String, Symbol>,
    static_count: u16,
    field_count: u16,
    arg_count: u16,
    var_count: u16,
}

impl SymbolTable {
    /// An empty table
    pub fn new() -> SymbolTable {
        SymbolTable {
            class: HashMap::new(),
            subroutine: HashMap::new(),
            static_count: 0,
            field_count: 0,
            arg_count: 0,
            var_count: 0,
        }
    }

    /// Clear the subroutine-wide table and its `Arg`/`Var` counters. Called
    /// at the start of every subroutine. `is_method` pre-increments the
    /// `Arg` counter so that argument 0 is reserved for the implicit receiver.
    pub fn start_subroutine(&mut self, is_method: bool) {
        self.subroutine.clear();
        self.arg_count = if is_method { 1 } else { 0 };
        self.var_count = 0;
    }

    /// Declare a name. Returns `false` if the name is already declared in
    /// the table this kind belongs to (class table for Static/Field,
    /// subroutine table for Arg/Var).
    pub fn define(&mut self, name: &str, type_name: &str, kind: Kind) -> bool {
        let (table, index) = match kind {
            Kind::Static => {
                let index = self.static_count;
                self.static_count += 1;
                (&mut self.class, index)
            }
            Kind::Field => {
                let index = self.field_count;
                self.field_count += 1;
                (&mut self.class, index)
            }
            Kind::Arg => {
                let index = self.arg_count;
                self.arg_count += 1;
                (&mut self.subroutine, index)
            }
            Kind::Var => {
                let index = self.var_count;
                self.var_count += 1;
                (&mut self.subroutine, index)
            }
        };
        if table.contains_key(name) {
            return false;
        }
        table.insert(
            name.to_string(),
            Symbol {
                type_name: type_name.to_string(),
                kind,
                index,
            },
        );
        true
    }

    /// Resolve a name: subroutine table first, then class table
    pub fn resolve(&self, name: &str) -> Option<&Symbol> {
        self.subroutine.get(name).or_else(|| self.class.get(name))
    }

    /// Number of `Var` symbols declared in the current subroutine
    pub fn var_count(&self) -> u16 {
        self.var_count
    }

    /// Number of `Field` symbols declared in the class
    pub fn field_count(&self) -> u16 {
        self.field_count
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
    fn class_and_subroutine_tables_are_independent() {
        let mut table = SymbolTable::new();
        assert!(table.define("x", "int", Kind::Field));
        assert!(table.define("x", "int", Kind::Var));
        assert_eq!(table.resolve("x").unwrap().kind, Kind::Var);
    }

    #[test]
    fn redeclaration_in_same_table_is_rejected() {
        let mut table = SymbolTable::new();
        assert!(table.define("x", "int", Kind::Field));
        assert!(!table.define("x", "int", Kind::Field));
    }

    #[test]
    fn method_pre_increments_arg_counter_for_receiver() {
        let mut table = SymbolTable::new();
        table.start_subroutine(true);
        table.define("n", "int", Kind::Arg);
        assert_eq!(table.resolve("n").unwrap().index, 1);
    }

    #[test]
    fn function_does_not_reserve_argument_zero() {
        let mut table = SymbolTable::new();
        table.start_subroutine(false);
        table.define("n", "int", Kind::Arg);
        assert_eq!(table.resolve("n").unwrap().index, 0);
    }

    #[test]
    fn subroutine_table_clears_between_subroutines() {
        let mut table = SymbolTable::new();
        table.start_subroutine(false);
        table.define("a", "int", Kind::Var);
        table.start_subroutine(false);
        assert!(table.resolve("a").is_none());
    }

    #[test]
    fn resolve_prefers_subroutine_over_class() {
        let mut table = SymbolTable::new();
        table.define("x", "int", Kind::Field);
        table.start_subroutine(false);
        table.define("x", "boolean", Kind::Var);
        assert_eq!(table.resolve("x").unwrap().kind, Kind::Var);
    }
}
