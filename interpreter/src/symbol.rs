use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::{FunctionDecl, VariableDecl};

/// What a name stands for. Only Variable and Function are ever produced by
/// this language; Class and Interface exist in the taxonomy for the larger
/// source language the keyword set reserves words for.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SymKind {
    Variable,
    Function,
    #[allow(dead_code)]
    Class,
    #[allow(dead_code)]
    Interface,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Function(Rc<FunctionDecl>),
    Variable(Rc<VariableDecl>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub decl: Decl,
    pub kind: SymKind,
}

/// One flat mapping from name to symbol for the whole program. There are no
/// nested scopes; re-declaring a name overwrites the earlier entry (the
/// duplicate diagnostic is the Enter pass's business).
#[derive(Debug, Default)]
pub struct SymTable {
    table: HashMap<String, Symbol>,
}

impl SymTable {
    pub fn new() -> Self {
        SymTable {
            table: HashMap::new(),
        }
    }

    pub fn enter(&mut self, name: &str, decl: Decl, kind: SymKind) {
        self.table.insert(
            String::from(name),
            Symbol {
                name: String::from(name),
                decl,
                kind,
            },
        );
    }

    pub fn has_symbol(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    pub fn get_symbol(&self, name: &str) -> Option<&Symbol> {
        self.table.get(name)
    }
}
