use phf::{phf_map, Map};

use alang_core::{Reporter, Scanner, TokenKind};

use crate::ast::{Block, Expr, Program, Stmt};
use crate::error::Error;

/// Recursive-descent parser with precedence climbing for binary expressions.
///
/// Parse failures are non-fatal at the node level: a failing sub-parse
/// reports a diagnostic and returns `None`, and the caller drops the partial
/// statement or sub-expression. The statement-list driver guarantees forward
/// progress by discarding one token whenever a failed statement consumed
/// nothing, so malformed input can never stall the loop.
pub struct Parser {
    scanner: Scanner,
    reporter: Reporter,
}

// Binary operator priorities; higher binds tighter. Anything absent maps to
// -1 and ends the climb.
static OP_PRIORITY: Map<&'static str, i32> = phf_map! {
    "=" => 2,
    "+=" => 2,
    "-=" => 2,
    "*=" => 2,
    "/=" => 2,
    "%=" => 2,
    "&=" => 2,
    "|=" => 2,
    "^=" => 2,
    "~=" => 2,
    "<<=" => 2,
    ">>=" => 2,
    ">>>=" => 2,
    "||" => 4,
    "&&" => 5,
    "|" => 6,
    "^" => 7,
    "&" => 8,
    "==" => 9,
    "===" => 9,
    "!=" => 9,
    "!==" => 9,
    ">" => 10,
    ">=" => 10,
    "<" => 10,
    "<=" => 10,
    "<<" => 11,
    ">>" => 11,
    ">>>" => 11,
    "+" => 12,
    "-" => 12,
    "*" => 13,
    "/" => 13,
    "%" => 13,
};

fn priority(op: &str) -> i32 {
    OP_PRIORITY.get(op).copied().unwrap_or(-1)
}

impl Parser {
    pub fn new(scanner: Scanner, reporter: Reporter) -> Self {
        Parser { scanner, reporter }
    }

    /// program := statementList EOF
    ///
    /// Always yields a Program, however malformed the input; failed
    /// statements are dropped after being reported.
    pub fn parse_program(&mut self) -> Program {
        Program {
            stmts: self.parse_statement_list(),
        }
    }

    // statementList := statement*, ending on EOF or '}' (the follow set
    // shared by the program root and function bodies).
    fn parse_statement_list(&mut self) -> Vec<Stmt> {
        let mut stmts = Vec::new();

        loop {
            {
                let t = self.scanner.peek();
                if t.is_eof() || t.is(TokenKind::Separator, "}") {
                    break;
                }
            }

            let before = self.scanner.consumed();
            match self.parse_statement() {
                Some(stmt) => stmts.push(stmt),
                None => {
                    if self.scanner.consumed() == before {
                        self.scanner.next();
                    }
                }
            }
        }

        stmts
    }

    // statement := functionDecl | variableDecl | expressionStatement
    fn parse_statement(&mut self) -> Option<Stmt> {
        let (kind, text) = {
            let t = self.scanner.peek();
            (t.kind, t.text.clone())
        };

        if kind == TokenKind::Keyword && text == "function" {
            self.parse_function_decl()
        } else if kind == TokenKind::Keyword && text == "let" {
            self.parse_variable_decl()
        } else if matches!(
            kind,
            TokenKind::Identifier
                | TokenKind::IntegerLiteral
                | TokenKind::DecimalLiteral
                | TokenKind::StringLiteral
                | TokenKind::BooleanLiteral
                | TokenKind::NullLiteral
        ) || (kind == TokenKind::Separator && text == "(")
        {
            self.parse_expression_statement()
        } else {
            self.reporter
                .report(Error::UnrecognizedStatement { found: text });
            None
        }
    }

    // variableDecl := 'let' Identifier (':' Identifier)? ('=' expression)? ';'
    fn parse_variable_decl(&mut self) -> Option<Stmt> {
        self.scanner.next();

        let t = self.scanner.next();
        if t.kind != TokenKind::Identifier {
            self.reporter
                .report(Error::ExpectedVariableName { found: t.text });
            return None;
        }
        let name = t.text;

        let mut var_type = String::from("any");
        if self.scanner.peek().is(TokenKind::Separator, ":") {
            self.scanner.next();
            let t = self.scanner.next();
            if t.kind != TokenKind::Identifier {
                self.reporter
                    .report(Error::ExpectedTypeName { found: t.text });
                return None;
            }
            var_type = t.text;
        }

        let mut init = None;
        if self.scanner.peek().is(TokenKind::Operator, "=") {
            self.scanner.next();
            init = self.parse_expression();
        }

        if self.scanner.peek().is(TokenKind::Separator, ";") {
            self.scanner.next();
            Some(Stmt::var(name, var_type, init))
        } else {
            self.reporter.report(Error::ExpectedToken {
                expected: ";",
                context: "the variable declaration",
                found: self.scanner.peek().text.clone(),
            });
            None
        }
    }

    // functionDecl := 'function' Identifier '(' ')' block
    //
    // No parameter list; this is a grammar restriction of the language.
    fn parse_function_decl(&mut self) -> Option<Stmt> {
        self.scanner.next();

        let t = self.scanner.next();
        if t.kind != TokenKind::Identifier {
            self.reporter
                .report(Error::ExpectedFunctionName { found: t.text });
            return None;
        }
        let name = t.text;

        if !self.expect_separator("(", "the function declaration") {
            return None;
        }
        if !self.expect_separator(")", "the function declaration") {
            return None;
        }

        let body = self.parse_function_body()?;
        Some(Stmt::function(name, body))
    }

    // block := '{' statementList '}'
    fn parse_function_body(&mut self) -> Option<Block> {
        if !self.scanner.peek().is(TokenKind::Separator, "{") {
            self.reporter.report(Error::ExpectedToken {
                expected: "{",
                context: "the function body",
                found: self.scanner.peek().text.clone(),
            });
            return None;
        }
        self.scanner.next();

        let stmts = self.parse_statement_list();

        let t = self.scanner.next();
        if t.is(TokenKind::Separator, "}") {
            Some(Block { stmts })
        } else {
            self.reporter.report(Error::ExpectedToken {
                expected: "}",
                context: "the function body",
                found: t.text,
            });
            None
        }
    }

    // expressionStatement := expression ';'
    fn parse_expression_statement(&mut self) -> Option<Stmt> {
        let expr = self.parse_expression()?;

        if self.scanner.peek().is(TokenKind::Separator, ";") {
            self.scanner.next();
            Some(Stmt::expression(expr))
        } else {
            self.reporter.report(Error::ExpectedToken {
                expected: ";",
                context: "the expression statement",
                found: self.scanner.peek().text.clone(),
            });
            None
        }
    }

    fn parse_expression(&mut self) -> Option<Expr> {
        self.parse_binary(0)
    }

    /// Precedence climbing: while the upcoming operator binds tighter than
    /// the current floor, consume it and parse the right operand with that
    /// operator's priority as the new floor. Equal-priority chains therefore
    /// group to the left. A failed right operand abandons the climb and
    /// returns what has been built so far.
    fn parse_binary(&mut self, floor: i32) -> Option<Expr> {
        let mut lhs = self.parse_primary()?;

        loop {
            let (kind, op) = {
                let t = self.scanner.peek();
                (t.kind, t.text.clone())
            };
            let prio = priority(&op);
            if kind != TokenKind::Operator || prio <= floor {
                break;
            }

            self.scanner.next();
            match self.parse_binary(prio) {
                Some(rhs) => lhs = Expr::binary(op, lhs, rhs),
                None => break,
            }
        }

        Some(lhs)
    }

    // primary := Identifier | Identifier '(' argList? ')' | literals
    //          | '(' expression ')'
    //
    // Call vs. variable takes exactly two tokens of lookahead.
    fn parse_primary(&mut self) -> Option<Expr> {
        let (kind, text) = {
            let t = self.scanner.peek();
            (t.kind, t.text.clone())
        };

        match kind {
            TokenKind::Identifier => {
                if self.scanner.peek_at(1).is(TokenKind::Separator, "(") {
                    self.parse_function_call()
                } else {
                    self.scanner.next();
                    Some(Expr::variable(text))
                }
            }
            TokenKind::IntegerLiteral => {
                self.scanner.next();
                match text.parse::<i64>() {
                    Ok(value) => Some(Expr::IntegerLiteral(value)),
                    Err(_) => {
                        self.reporter
                            .report(Error::InvalidNumberLiteral { text });
                        None
                    }
                }
            }
            TokenKind::DecimalLiteral => {
                self.scanner.next();
                match text.parse::<f64>() {
                    Ok(value) => Some(Expr::DecimalLiteral(value)),
                    Err(_) => {
                        self.reporter
                            .report(Error::InvalidNumberLiteral { text });
                        None
                    }
                }
            }
            TokenKind::StringLiteral => {
                self.scanner.next();
                Some(Expr::StringLiteral(text))
            }
            TokenKind::BooleanLiteral => {
                self.scanner.next();
                Some(Expr::BooleanLiteral(text == "true"))
            }
            TokenKind::NullLiteral => {
                self.scanner.next();
                Some(Expr::NullLiteral)
            }
            TokenKind::Separator if text == "(" => {
                self.scanner.next();
                let expr = self.parse_expression();
                if self.scanner.peek().is(TokenKind::Separator, ")") {
                    self.scanner.next();
                    expr
                } else {
                    self.reporter.report(Error::ExpectedToken {
                        expected: ")",
                        context: "the parenthesized expression",
                        found: self.scanner.peek().text.clone(),
                    });
                    None
                }
            }
            _ => {
                self.reporter
                    .report(Error::UnrecognizedExpression { found: text });
                None
            }
        }
    }

    // argList := expression (',' expression)*
    fn parse_function_call(&mut self) -> Option<Expr> {
        let name = self.scanner.next().text;
        self.scanner.next();

        let mut args = Vec::new();
        while !self.scanner.peek().is(TokenKind::Separator, ")") {
            args.push(self.parse_expression()?);

            if !self.scanner.peek().is(TokenKind::Separator, ")") {
                if self.scanner.peek().is(TokenKind::Separator, ",") {
                    self.scanner.next();
                } else {
                    self.reporter.report(Error::ExpectedToken {
                        expected: ",",
                        context: "the function call",
                        found: self.scanner.peek().text.clone(),
                    });
                    return None;
                }
            }
        }

        self.scanner.next();
        Some(Expr::call(name, args))
    }

    fn expect_separator(&mut self, expected: &'static str, context: &'static str) -> bool {
        let t = self.scanner.next();
        if t.is(TokenKind::Separator, expected) {
            true
        } else {
            self.reporter.report(Error::ExpectedToken {
                expected,
                context,
                found: t.text,
            });
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use alang_core::{Reporter, Scanner};

    use crate::ast::{Block, Expr, Program, Stmt};
    use crate::parser::Parser;

    fn parse(src: &str) -> (Program, String) {
        let out: Rc<RefCell<Vec<u8>>> = Rc::new(RefCell::new(Vec::new()));
        let reporter = Reporter::new(out.clone());
        let mut parser = Parser::new(Scanner::new(src, reporter.clone()), reporter);
        let program = parser.parse_program();
        let diags = String::from_utf8(out.borrow().clone()).unwrap();
        (program, diags)
    }

    #[test]
    fn test_precedence() {
        let (program, diags) = parse("2 + 3 * 4;");
        assert_eq!(
            program.stmts,
            vec![Stmt::expression(Expr::binary(
                "+",
                Expr::IntegerLiteral(2),
                Expr::binary("*", Expr::IntegerLiteral(3), Expr::IntegerLiteral(4)),
            ))]
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn test_left_associativity() {
        let (program, _) = parse("10 - 2 - 3;");
        assert_eq!(
            program.stmts,
            vec![Stmt::expression(Expr::binary(
                "-",
                Expr::binary("-", Expr::IntegerLiteral(10), Expr::IntegerLiteral(2)),
                Expr::IntegerLiteral(3),
            ))]
        );
    }

    #[test]
    fn test_grouping() {
        let (program, _) = parse("(1 + 2) * 3;");
        assert_eq!(
            program.stmts,
            vec![Stmt::expression(Expr::binary(
                "*",
                Expr::binary("+", Expr::IntegerLiteral(1), Expr::IntegerLiteral(2)),
                Expr::IntegerLiteral(3),
            ))]
        );
    }

    #[test]
    fn test_call_vs_variable_disambiguation() {
        let (program, _) = parse("foo;");
        assert_eq!(program.stmts, vec![Stmt::expression(Expr::variable("foo"))]);

        let (program, _) = parse("foo();");
        assert_eq!(
            program.stmts,
            vec![Stmt::expression(Expr::call("foo", vec![]))]
        );
    }

    #[test]
    fn test_call_arguments() {
        let (program, diags) = parse("println(\"x is\", x + 1);");
        assert_eq!(
            program.stmts,
            vec![Stmt::expression(Expr::call(
                "println",
                vec![
                    Expr::StringLiteral(String::from("x is")),
                    Expr::binary("+", Expr::variable("x"), Expr::IntegerLiteral(1)),
                ]
            ))]
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn test_variable_declarations() {
        let (program, _) = parse("let i: number = 10; let s = \"hi\"; let u;");
        assert_eq!(
            program.stmts,
            vec![
                Stmt::var("i", "number", Some(Expr::IntegerLiteral(10))),
                Stmt::var("s", "any", Some(Expr::StringLiteral(String::from("hi")))),
                Stmt::var("u", "any", None),
            ]
        );
    }

    #[test]
    fn test_function_declaration() {
        let (program, diags) = parse("function bump() { i = i + 1; }");
        assert_eq!(
            program.stmts,
            vec![Stmt::function(
                "bump",
                Block {
                    stmts: vec![Stmt::expression(Expr::binary(
                        "=",
                        Expr::variable("i"),
                        Expr::binary("+", Expr::variable("i"), Expr::IntegerLiteral(1)),
                    ))],
                }
            )]
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn test_failed_statement_is_reported_and_dropped() {
        let (program, diags) = parse("let ; let y = 1;");
        assert_eq!(
            program.stmts,
            vec![Stmt::var("y", "any", Some(Expr::IntegerLiteral(1)))]
        );
        assert!(diags.contains("expecting a variable name"));
    }

    #[test]
    fn test_malformed_input_makes_progress() {
        // A statement start the grammar does not know must not hang the
        // statement-list loop; the offending token gets discarded.
        let (program, diags) = parse("+ 1; let y = 2;");
        assert_eq!(
            program.stmts,
            vec![
                Stmt::expression(Expr::IntegerLiteral(1)),
                Stmt::var("y", "any", Some(Expr::IntegerLiteral(2))),
            ]
        );
        assert!(diags.contains("cannot recognize a statement"));
    }

    #[test]
    fn test_missing_right_operand_keeps_partial_expression() {
        let (program, diags) = parse("1 + ; let y = 2;");
        // The climb abandons on the missing operand; the bare '1' survives as
        // the expression and the next statement still parses.
        assert_eq!(
            program.stmts,
            vec![
                Stmt::expression(Expr::IntegerLiteral(1)),
                Stmt::var("y", "any", Some(Expr::IntegerLiteral(2))),
            ]
        );
        assert!(diags.contains("cannot recognize an expression"));
    }
}
