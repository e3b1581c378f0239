use crate::ast::{Block, Expr, Program, Stmt};

/// Renders the tree as an indented listing, one node per line. The output is
/// deterministic: the same tree always produces the same text, byte for
/// byte. Call and variable nodes show whether resolution has linked them
/// yet, which is how the CLI makes the before/after dumps comparable.
pub fn dump(program: &Program) -> String {
    let mut out = String::from("Program\n");
    for stmt in &program.stmts {
        dump_stmt(&mut out, stmt, 1);
    }
    out
}

fn line(out: &mut String, depth: usize, text: &str) {
    for _ in 0..depth {
        out.push_str("    ");
    }
    out.push_str(text);
    out.push('\n');
}

fn dump_stmt(out: &mut String, stmt: &Stmt, depth: usize) {
    match stmt {
        Stmt::Function(decl) => {
            line(out, depth, &format!("FunctionDecl {}", decl.name));
            dump_block(out, &decl.body, depth + 1);
        }
        Stmt::Var(decl) => {
            line(
                out,
                depth,
                &format!("VariableDecl {}, type: {}", decl.name, decl.var_type),
            );
            match &decl.init {
                Some(init) => dump_expr(out, init, depth + 1),
                None => line(out, depth + 1, "no initialization."),
            }
        }
        Stmt::Expression(expr) => {
            line(out, depth, "ExpressionStatement");
            dump_expr(out, expr, depth + 1);
        }
    }
}

fn dump_block(out: &mut String, block: &Block, depth: usize) {
    line(out, depth, "Block");
    for stmt in &block.stmts {
        dump_stmt(out, stmt, depth + 1);
    }
}

fn dump_expr(out: &mut String, expr: &Expr, depth: usize) {
    match expr {
        Expr::Binary { op, lhs, rhs } => {
            line(out, depth, &format!("Binary:{}", op));
            dump_expr(out, lhs, depth + 1);
            dump_expr(out, rhs, depth + 1);
        }
        Expr::Call(call) => {
            line(
                out,
                depth,
                &format!(
                    "FunctionCall {}, {}",
                    call.name,
                    resolved_mark(call.decl.borrow().is_some())
                ),
            );
            for arg in &call.args {
                dump_expr(out, arg, depth + 1);
            }
        }
        Expr::Variable(var) => {
            line(
                out,
                depth,
                &format!(
                    "Variable: {}, {}",
                    var.name,
                    resolved_mark(var.decl.borrow().is_some())
                ),
            );
        }
        Expr::StringLiteral(value) => line(out, depth, value),
        Expr::IntegerLiteral(value) => line(out, depth, &value.to_string()),
        Expr::DecimalLiteral(value) => line(out, depth, &value.to_string()),
        Expr::BooleanLiteral(value) => line(out, depth, &value.to_string()),
        Expr::NullLiteral => line(out, depth, "null"),
    }
}

fn resolved_mark(resolved: bool) -> &'static str {
    if resolved {
        "resolved"
    } else {
        "not resolved"
    }
}
