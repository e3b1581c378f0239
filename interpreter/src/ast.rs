use std::cell::RefCell;
use std::rc::Rc;

// Declarations are Rc-shared so that call and variable nodes can point back
// at them once resolution has run. The `decl` cells are the only mutation the
// tree ever sees after parsing, and each is written at most once.

#[derive(Debug, PartialEq)]
pub struct Program {
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

/// Function declaration. The language has no parameter lists; a function is
/// a named body executed in the caller's (global) environment.
#[derive(Debug, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub body: Block,
}

/// Variable declaration. The type is annotation only, defaulting to "any";
/// nothing ever checks it.
#[derive(Debug, PartialEq)]
pub struct VariableDecl {
    pub name: String,
    pub var_type: String,
    pub init: Option<Expr>,
}

#[derive(Debug, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<Expr>,
    pub decl: RefCell<Option<Rc<FunctionDecl>>>,
}

#[derive(Debug, PartialEq)]
pub struct Variable {
    pub name: String,
    pub decl: RefCell<Option<Rc<VariableDecl>>>,
}

#[derive(Debug, PartialEq)]
pub enum Stmt {
    Function(Rc<FunctionDecl>),
    Var(Rc<VariableDecl>),
    Expression(Expr),
}

#[derive(Debug, PartialEq)]
pub enum Expr {
    Binary {
        op: String,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call(Rc<FunctionCall>),
    Variable(Rc<Variable>),
    StringLiteral(String),
    IntegerLiteral(i64),
    DecimalLiteral(f64),
    BooleanLiteral(bool),
    NullLiteral,
}

impl Stmt {
    pub fn function(name: impl Into<String>, body: Block) -> Self {
        Stmt::Function(Rc::new(FunctionDecl {
            name: name.into(),
            body,
        }))
    }

    pub fn var(name: impl Into<String>, var_type: impl Into<String>, init: Option<Expr>) -> Self {
        Stmt::Var(Rc::new(VariableDecl {
            name: name.into(),
            var_type: var_type.into(),
            init,
        }))
    }

    pub fn expression(expr: Expr) -> Self {
        Stmt::Expression(expr)
    }
}

impl Expr {
    pub fn binary(op: impl Into<String>, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op: op.into(),
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call(Rc::new(FunctionCall {
            name: name.into(),
            args,
            decl: RefCell::new(None),
        }))
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Expr::Variable(Rc::new(Variable {
            name: name.into(),
            decl: RefCell::new(None),
        }))
    }
}

/// One tree-walk shape shared by every pass. The default methods implement
/// plain traversal; a pass overrides only the node kinds it acts on.
///
/// A statement list evaluates to the value of its last statement, so the
/// default Program/Block visits return whatever the final statement produced
/// and `Self::Item::default()` stands in for "no result".
pub trait AstVisitor {
    type Item: Default;

    fn visit_program(&mut self, program: &Program) -> Self::Item {
        self.visit_stmts(&program.stmts)
    }

    fn visit_block(&mut self, block: &Block) -> Self::Item {
        self.visit_stmts(&block.stmts)
    }

    fn visit_stmts(&mut self, stmts: &[Stmt]) -> Self::Item {
        let mut last = Self::Item::default();
        for stmt in stmts {
            last = self.visit_stmt(stmt);
        }
        last
    }

    fn visit_stmt(&mut self, stmt: &Stmt) -> Self::Item {
        match stmt {
            Stmt::Function(decl) => self.visit_function_decl(decl),
            Stmt::Var(decl) => self.visit_variable_decl(decl),
            Stmt::Expression(expr) => self.visit_expression_stmt(expr),
        }
    }

    fn visit_function_decl(&mut self, decl: &Rc<FunctionDecl>) -> Self::Item {
        self.visit_block(&decl.body)
    }

    fn visit_variable_decl(&mut self, decl: &Rc<VariableDecl>) -> Self::Item {
        match &decl.init {
            Some(init) => self.visit_expr(init),
            None => Self::Item::default(),
        }
    }

    fn visit_expression_stmt(&mut self, expr: &Expr) -> Self::Item {
        self.visit_expr(expr)
    }

    fn visit_expr(&mut self, expr: &Expr) -> Self::Item {
        match expr {
            Expr::Binary { op, lhs, rhs } => self.visit_binary(op, lhs, rhs),
            Expr::Call(call) => self.visit_call(call),
            Expr::Variable(var) => self.visit_variable(var),
            Expr::StringLiteral(value) => self.visit_string_literal(value),
            Expr::IntegerLiteral(value) => self.visit_integer_literal(*value),
            Expr::DecimalLiteral(value) => self.visit_decimal_literal(*value),
            Expr::BooleanLiteral(value) => self.visit_boolean_literal(*value),
            Expr::NullLiteral => self.visit_null_literal(),
        }
    }

    fn visit_binary(&mut self, _op: &str, lhs: &Expr, rhs: &Expr) -> Self::Item {
        self.visit_expr(lhs);
        self.visit_expr(rhs);
        Self::Item::default()
    }

    fn visit_call(&mut self, call: &Rc<FunctionCall>) -> Self::Item {
        for arg in &call.args {
            self.visit_expr(arg);
        }
        Self::Item::default()
    }

    fn visit_variable(&mut self, _var: &Rc<Variable>) -> Self::Item {
        Self::Item::default()
    }

    fn visit_string_literal(&mut self, _value: &str) -> Self::Item {
        Self::Item::default()
    }

    fn visit_integer_literal(&mut self, _value: i64) -> Self::Item {
        Self::Item::default()
    }

    fn visit_decimal_literal(&mut self, _value: f64) -> Self::Item {
        Self::Item::default()
    }

    fn visit_boolean_literal(&mut self, _value: bool) -> Self::Item {
        Self::Item::default()
    }

    fn visit_null_literal(&mut self) -> Self::Item {
        Self::Item::default()
    }
}
