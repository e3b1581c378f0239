use std::rc::Rc;

use phf::{phf_set, Set};

use alang_core::Reporter;

use crate::ast::{AstVisitor, FunctionCall, FunctionDecl, Variable, VariableDecl};
use crate::error::Error;
use crate::symbol::{Decl, SymKind, SymTable};

// Callables recognized by name without a user declaration.
static BUILTINS: Set<&'static str> = phf_set! {
    "println",
};

/// Pass 1: walk every declaration into the symbol table. The table is
/// write-only during this pass and read-only afterwards. A name declared
/// twice logs a duplicate diagnostic and the later declaration wins.
pub struct Enter<'a> {
    sym_table: &'a mut SymTable,
    reporter: Reporter,
}

impl<'a> Enter<'a> {
    pub fn new(sym_table: &'a mut SymTable, reporter: Reporter) -> Self {
        Enter {
            sym_table,
            reporter,
        }
    }
}

impl<'a> AstVisitor for Enter<'a> {
    type Item = ();

    fn visit_function_decl(&mut self, decl: &Rc<FunctionDecl>) {
        if self.sym_table.has_symbol(&decl.name) {
            self.reporter.report(Error::DuplicateSymbol {
                name: decl.name.clone(),
            });
        }
        self.sym_table
            .enter(&decl.name, Decl::Function(decl.clone()), SymKind::Function);

        // The namespace is flat, so declarations inside the body land in the
        // same table.
        self.visit_block(&decl.body);
    }

    fn visit_variable_decl(&mut self, decl: &Rc<VariableDecl>) {
        if self.sym_table.has_symbol(&decl.name) {
            self.reporter.report(Error::DuplicateSymbol {
                name: decl.name.clone(),
            });
        }
        self.sym_table
            .enter(&decl.name, Decl::Variable(decl.clone()), SymKind::Variable);
    }
}

/// Pass 2: link every call and variable reference to its declaration. A link
/// is written at most once; re-running the pass leaves already-resolved
/// nodes untouched. Unknown names log unresolved diagnostics (unless the
/// name is a builtin) and keep the link empty; the interpreter treats such
/// nodes as no-ops.
pub struct RefResolver<'a> {
    sym_table: &'a SymTable,
    reporter: Reporter,
}

impl<'a> RefResolver<'a> {
    pub fn new(sym_table: &'a SymTable, reporter: Reporter) -> Self {
        RefResolver {
            sym_table,
            reporter,
        }
    }
}

impl<'a> AstVisitor for RefResolver<'a> {
    type Item = ();

    fn visit_call(&mut self, call: &Rc<FunctionCall>) {
        match self.sym_table.get_symbol(&call.name) {
            Some(symbol) if symbol.kind == SymKind::Function => {
                if let Decl::Function(decl) = &symbol.decl {
                    if call.decl.borrow().is_none() {
                        *call.decl.borrow_mut() = Some(decl.clone());
                    }
                }
            }
            _ => {
                if !BUILTINS.contains(call.name.as_str()) {
                    self.reporter.report(Error::UnresolvedFunction {
                        name: call.name.clone(),
                    });
                }
            }
        }

        for arg in &call.args {
            self.visit_expr(arg);
        }
    }

    fn visit_variable(&mut self, var: &Rc<Variable>) {
        match self.sym_table.get_symbol(&var.name) {
            Some(symbol) if symbol.kind == SymKind::Variable => {
                if let Decl::Variable(decl) = &symbol.decl {
                    if var.decl.borrow().is_none() {
                        *var.decl.borrow_mut() = Some(decl.clone());
                    }
                }
            }
            _ => {
                self.reporter.report(Error::UnresolvedVariable {
                    name: var.name.clone(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use alang_core::{Reporter, Scanner};

    use crate::ast::{AstVisitor, Expr, Program, Stmt};
    use crate::parser::Parser;
    use crate::resolver::{Enter, RefResolver};
    use crate::symbol::SymTable;

    fn resolve(src: &str) -> (Program, SymTable, String) {
        let out: Rc<RefCell<Vec<u8>>> = Rc::new(RefCell::new(Vec::new()));
        let reporter = Reporter::new(out.clone());
        let mut parser = Parser::new(Scanner::new(src, reporter.clone()), reporter.clone());
        let program = parser.parse_program();

        let mut sym_table = SymTable::new();
        Enter::new(&mut sym_table, reporter.clone()).visit_program(&program);
        RefResolver::new(&sym_table, reporter).visit_program(&program);

        let diags = String::from_utf8(out.borrow().clone()).unwrap();
        (program, sym_table, diags)
    }

    fn call_of(stmt: &Stmt) -> &Rc<crate::ast::FunctionCall> {
        match stmt {
            Stmt::Expression(Expr::Call(call)) => call,
            _ => panic!("expected a call statement"),
        }
    }

    #[test]
    fn test_function_call_is_linked() {
        let (program, _, diags) = resolve("function f() { } f();");
        let call = call_of(&program.stmts[1]);
        assert!(call.decl.borrow().is_some());
        assert!(diags.is_empty());
    }

    #[test]
    fn test_variable_reference_is_linked() {
        let (program, _, diags) = resolve("let x = 1; x;");
        match &program.stmts[1] {
            Stmt::Expression(Expr::Variable(var)) => assert!(var.decl.borrow().is_some()),
            _ => panic!("expected a variable statement"),
        }
        assert!(diags.is_empty());
    }

    #[test]
    fn test_builtin_call_is_not_reported() {
        let (program, _, diags) = resolve("println();");
        let call = call_of(&program.stmts[0]);
        assert!(call.decl.borrow().is_none());
        assert!(diags.is_empty());
    }

    #[test]
    fn test_unresolved_references_are_reported() {
        let (_, _, diags) = resolve("g(); y;");
        assert!(diags.contains("cannot find declaration of function g"));
        assert!(diags.contains("cannot find declaration of variable y"));
    }

    #[test]
    fn test_duplicate_declaration_last_wins() {
        let (_, sym_table, diags) = resolve("let x = 1; let x = 2;");
        assert!(diags.contains("duplicate symbol: x"));

        match &sym_table.get_symbol("x").unwrap().decl {
            crate::symbol::Decl::Variable(decl) => {
                assert_eq!(decl.init, Some(Expr::IntegerLiteral(2)))
            }
            _ => panic!("expected a variable declaration"),
        }
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let out: Rc<RefCell<Vec<u8>>> = Rc::new(RefCell::new(Vec::new()));
        let reporter = Reporter::new(out.clone());
        let mut parser = Parser::new(
            Scanner::new("function f() { } f();", reporter.clone()),
            reporter.clone(),
        );
        let program = parser.parse_program();

        let mut sym_table = SymTable::new();
        Enter::new(&mut sym_table, reporter.clone()).visit_program(&program);
        RefResolver::new(&sym_table, reporter.clone()).visit_program(&program);

        let call = call_of(&program.stmts[1]);
        let first = call.decl.borrow().clone().unwrap();

        RefResolver::new(&sym_table, reporter).visit_program(&program);
        let second = call.decl.borrow().clone().unwrap();
        assert!(Rc::ptr_eq(&first, &second));
    }
}
