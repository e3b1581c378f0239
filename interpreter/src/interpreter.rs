use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

use alang_core::Reporter;

use crate::ast::{AstVisitor, Expr, FunctionCall, FunctionDecl, Program, Variable, VariableDecl};
use crate::error::Error;
use crate::value::{Eval, Value};

/// Tree-walking evaluator over the resolved AST.
///
/// There is one flat value store shared by every function invocation. The
/// language has no call frames and no parameter binding, so nested calls
/// deliberately alias the same storage. Program output and runtime
/// diagnostics go to the same sink.
pub struct Interpreter {
    values: HashMap<String, Value>,
    stdout: Rc<RefCell<dyn Write>>,
    reporter: Reporter,
}

impl Interpreter {
    pub fn new(reporter: Reporter) -> Self {
        Interpreter {
            values: HashMap::new(),
            stdout: reporter.sink(),
            reporter,
        }
    }

    /// Run the program and return its final value (the value of the last
    /// top-level statement).
    pub fn interpret(&mut self, program: &Program) -> Value {
        let result = self.visit_program(program);
        self.load(result)
    }

    /// Coerce a slot to the value it currently stores; plain values pass
    /// through. Reading a slot that was never written yields null.
    fn load(&self, eval: Eval) -> Value {
        match eval {
            Eval::Value(value) => value,
            Eval::Slot(name) => self.values.get(&name).cloned().unwrap_or(Value::Null),
        }
    }

    fn store(&mut self, name: &str, value: Value) {
        self.values.insert(String::from(name), value);
    }

    fn apply(&mut self, op: &str, lhs: Value, rhs: Value) -> Value {
        match op {
            "+" => match (lhs, rhs) {
                (Value::Str(l), r) => Value::Str(format!("{}{}", l, r)),
                (l, Value::Str(r)) => Value::Str(format!("{}{}", l, r)),
                (Value::Int(l), Value::Int(r)) => Value::Int(l.wrapping_add(r)),
                (l, r) => self.numeric(op, l, r, |a, b| a + b),
            },
            "-" => match (lhs, rhs) {
                (Value::Int(l), Value::Int(r)) => Value::Int(l.wrapping_sub(r)),
                (l, r) => self.numeric(op, l, r, |a, b| a - b),
            },
            "*" => match (lhs, rhs) {
                (Value::Int(l), Value::Int(r)) => Value::Int(l.wrapping_mul(r)),
                (l, r) => self.numeric(op, l, r, |a, b| a * b),
            },
            // Division always yields a decimal, the way the original host
            // language divides.
            "/" => self.numeric(op, lhs, rhs, |a, b| a / b),
            "%" => match (lhs, rhs) {
                (Value::Int(l), Value::Int(r)) if r != 0 => Value::Int(l.wrapping_rem(r)),
                (l, r) => self.numeric(op, l, r, |a, b| a % b),
            },
            ">" | ">=" | "<" | "<=" => self.compare(op, lhs, rhs),
            "&&" => {
                if !lhs.truthy() {
                    lhs
                } else {
                    rhs
                }
            }
            "||" => {
                if lhs.truthy() {
                    lhs
                } else {
                    rhs
                }
            }
            _ => {
                self.reporter.report(Error::UnsupportedOperator {
                    op: String::from(op),
                });
                Value::Null
            }
        }
    }

    fn numeric(&mut self, op: &str, lhs: Value, rhs: Value, f: impl Fn(f64, f64) -> f64) -> Value {
        match (lhs.as_num(), rhs.as_num()) {
            (Some(l), Some(r)) => Value::Num(f(l, r)),
            _ => {
                self.reporter.report(Error::InvalidOperands {
                    op: String::from(op),
                });
                Value::Null
            }
        }
    }

    fn compare(&mut self, op: &str, lhs: Value, rhs: Value) -> Value {
        let result = match (&lhs, &rhs) {
            (Value::Str(l), Value::Str(r)) => Some(match op {
                ">" => l > r,
                ">=" => l >= r,
                "<" => l < r,
                _ => l <= r,
            }),
            _ => match (lhs.as_num(), rhs.as_num()) {
                (Some(l), Some(r)) => Some(match op {
                    ">" => l > r,
                    ">=" => l >= r,
                    "<" => l < r,
                    _ => l <= r,
                }),
                _ => None,
            },
        };

        match result {
            Some(value) => Value::Bool(value),
            None => {
                self.reporter.report(Error::InvalidOperands {
                    op: String::from(op),
                });
                Value::Null
            }
        }
    }
}

impl AstVisitor for Interpreter {
    type Item = Eval;

    /// Declarations do not execute when encountered; the default traversal
    /// would walk straight into the body.
    fn visit_function_decl(&mut self, _decl: &Rc<FunctionDecl>) -> Eval {
        Eval::default()
    }

    fn visit_variable_decl(&mut self, decl: &Rc<VariableDecl>) -> Eval {
        match &decl.init {
            Some(init) => {
                let value = self.visit_expr(init);
                let value = self.load(value);
                self.store(&decl.name, value.clone());
                Eval::Value(value)
            }
            None => Eval::default(),
        }
    }

    fn visit_call(&mut self, call: &Rc<FunctionCall>) -> Eval {
        if call.name == "println" {
            match call.args.first() {
                Some(arg) => {
                    let value = self.visit_expr(arg);
                    let value = self.load(value);
                    let _ = writeln!(self.stdout.borrow_mut(), "{}", value);
                }
                None => {
                    let _ = writeln!(self.stdout.borrow_mut());
                }
            }
            return Eval::Value(Value::Int(0));
        }

        // An unresolved call is a no-op; the resolver already complained.
        let decl = call.decl.borrow().clone();
        match decl {
            Some(decl) => self.visit_block(&decl.body),
            None => Eval::default(),
        }
    }

    fn visit_variable(&mut self, var: &Rc<Variable>) -> Eval {
        Eval::Slot(var.name.clone())
    }

    fn visit_binary(&mut self, op: &str, lhs: &Expr, rhs: &Expr) -> Eval {
        let left = self.visit_expr(lhs);
        let right = self.visit_expr(rhs);
        let right = self.load(right);

        if op == "=" {
            match left {
                Eval::Slot(name) => {
                    self.store(&name, right);
                }
                Eval::Value(_) => {
                    self.reporter.report(Error::AssignmentNeedsLeftValue);
                }
            }
            Eval::default()
        } else {
            let left = self.load(left);
            Eval::Value(self.apply(op, left, right))
        }
    }

    fn visit_string_literal(&mut self, value: &str) -> Eval {
        Eval::Value(Value::from(value))
    }

    fn visit_integer_literal(&mut self, value: i64) -> Eval {
        Eval::Value(Value::Int(value))
    }

    fn visit_decimal_literal(&mut self, value: f64) -> Eval {
        Eval::Value(Value::Num(value))
    }

    fn visit_boolean_literal(&mut self, value: bool) -> Eval {
        Eval::Value(Value::Bool(value))
    }

    fn visit_null_literal(&mut self) -> Eval {
        Eval::Value(Value::Null)
    }
}
