/// `.EQU`-defined name-to-value bindings.
///
/// Insertion-ordered and first-write-wins: `spec.md` §3/§9 documents the
/// original assembler's duplicate-`.EQU` behavior as "silently keeps the
/// first" and leaves it unresolved whether that was intentional. This
/// keeps that exact behavior rather than promoting it to an error, since
/// `spec.md` explicitly declines to reinterpret it.
#[derive(Default)]
pub struct SymbolTable {
    entries: Vec<(String, u8)>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable::default()
    }

    pub fn define(&mut self, name: &str, value: u8) {
        if !self.entries.iter().any(|(n, _)| n == name) {
            self.entries.push((name.to_owned(), value));
        }
    }

    pub fn get(&self, name: &str) -> Option<u8> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, u8)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn duplicate_name_keeps_first_value() {
        let mut table = SymbolTable::new();
        table.define("X", 1);
        table.define("X", 2);
        assert_eq!(table.get("X"), Some(1));
    }
}
