//! Command grammar
//!
//! ```text
//! line       := statement (';' statement)*
//! statement  := 'engine' '.' 'apply_impulse' '(' 'obj' ',' expr [',' expr] ')'
//!             | 'engine' '.' 'set_gravity' '(' expr ')'
//!             | expr '=' expr            (only `engine.gravity` is writable)
//!             | expr
//! expr       := term (('+' | '-') term)*
//! term       := unary (('*' | '/') unary)*
//! unary      := ('-' | '+') unary | postfix
//! postfix    := primary ('.' ('x' | 'y'))*
//! primary    := NUMBER | '(' expr ')' | 'Vector2D' '(' expr ',' expr ')'
//!             | 'engine' '.' ('gravity' | 'get_gravity' '(' ')' | 'get_position' '(' ')')
//!             | 'obj' '.' ('position' | 'velocity' | 'mass' | 'radius')
//! ```
//!
//! Names are resolved while parsing, so anything outside the three bound
//! names is rejected before a single statement runs.

use super::lexer::{Token, TokenKind, tokenize};
use crate::consts::{MAX_COMMAND_LEN, MAX_EXPR_DEPTH, MAX_STATEMENTS};
use crate::error::CommandError;

/// Read-only engine/body state reachable from command text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Gravity,
    Position,
    Velocity,
    Mass,
    Radius,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Read(Quantity),
    /// `Vector2D(x, y)`
    Vector(Box<Expr>, Box<Expr>),
    Component(Box<Expr>, Axis),
    Neg(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
}

/// One parsed statement
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Impulse vector, divided by the body's mass when applied
    ApplyImpulse { impulse: Expr },
    SetGravity { value: Expr },
    GetPosition,
    /// Evaluate and report an arbitrary read-only expression
    Inspect(Expr),
}

/// Call argument: the body handle is only meaningful as an argument
enum Arg {
    Body,
    Value(Expr),
}

/// Parse a full command line into statements
pub fn parse(src: &str) -> Result<Vec<Command>, CommandError> {
    if src.len() > MAX_COMMAND_LEN {
        return Err(CommandError::TooLong {
            len: src.len(),
            max: MAX_COMMAND_LEN,
        });
    }
    let tokens = tokenize(src)?;
    Parser::new(src, tokens).line()
}

struct Parser<'a> {
    src: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str, tokens: Vec<Token>) -> Self {
        Self {
            src,
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    fn peek_at(&self, offset: usize) -> &TokenKind {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    fn column(&self) -> usize {
        self.tokens[self.pos].column
    }

    fn advance(&mut self) -> TokenKind {
        let kind = self.tokens[self.pos].kind.clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<(), CommandError> {
        if self.eat(&kind) {
            Ok(())
        } else {
            Err(self.syntax(expected))
        }
    }

    fn syntax(&self, expected: &'static str) -> CommandError {
        CommandError::Syntax {
            expected,
            found: self.peek().describe(),
            column: self.column(),
        }
    }

    fn enter(&mut self) -> Result<(), CommandError> {
        self.depth += 1;
        if self.depth > MAX_EXPR_DEPTH {
            return Err(CommandError::TooDeep {
                max: MAX_EXPR_DEPTH,
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn line(mut self) -> Result<Vec<Command>, CommandError> {
        let mut commands = Vec::new();
        loop {
            while self.eat(&TokenKind::Semicolon) {}
            if *self.peek() == TokenKind::End {
                break;
            }
            if commands.len() == MAX_STATEMENTS {
                let count = self.count_remaining_statements() + commands.len();
                return Err(CommandError::TooManyStatements {
                    count,
                    max: MAX_STATEMENTS,
                });
            }
            commands.push(self.statement()?);
            if !matches!(self.peek(), TokenKind::Semicolon | TokenKind::End) {
                return Err(self.syntax("';' or end of input"));
            }
        }
        Ok(commands)
    }

    /// Rough count of the statements left, for the error message only
    fn count_remaining_statements(&self) -> usize {
        let mut count = 0;
        let mut in_statement = false;
        for token in &self.tokens[self.pos..] {
            match token.kind {
                TokenKind::Semicolon | TokenKind::End => in_statement = false,
                _ if !in_statement => {
                    in_statement = true;
                    count += 1;
                }
                _ => {}
            }
        }
        count
    }

    fn statement(&mut self) -> Result<Command, CommandError> {
        if self.is_engine_call("apply_impulse") {
            return self.apply_impulse();
        }
        if self.is_engine_call("set_gravity") {
            self.pos += 3;
            let values = values_only(self.call_args()?)?;
            return match <[Expr; 1]>::try_from(values) {
                Ok([value]) => Ok(Command::SetGravity { value }),
                Err(values) => Err(CommandError::Arity {
                    callee: "set_gravity",
                    expected: "1",
                    got: values.len(),
                }),
            };
        }

        let start_column = self.column();
        let expr = self.expr()?;

        if *self.peek() == TokenKind::Assign {
            let target = self.source_between(start_column, self.column());
            self.advance();
            if expr != Expr::Read(Quantity::Gravity) || target.ends_with(')') {
                return Err(CommandError::ReadOnly { target });
            }
            let value = self.expr()?;
            return Ok(Command::SetGravity { value });
        }

        Ok(match expr {
            Expr::Read(Quantity::Position) => Command::GetPosition,
            other => Command::Inspect(other),
        })
    }

    fn is_engine_call(&self, method: &str) -> bool {
        matches!(self.peek(), TokenKind::Ident(name) if name == "engine")
            && *self.peek_at(1) == TokenKind::Dot
            && matches!(self.peek_at(2), TokenKind::Ident(name) if name == method)
            && *self.peek_at(3) == TokenKind::LParen
    }

    fn apply_impulse(&mut self) -> Result<Command, CommandError> {
        self.pos += 3;
        let args = self.call_args()?;
        let got = args.len();
        let mut args = args.into_iter();

        let impulse = match (args.next(), args.next(), args.next(), args.next()) {
            (Some(Arg::Body), Some(Arg::Value(x)), Some(Arg::Value(y)), None) => {
                Expr::Vector(Box::new(x), Box::new(y))
            }
            (Some(Arg::Body), Some(Arg::Value(v)), None, None) => v,
            (_, Some(Arg::Body), _, _) | (_, _, Some(Arg::Body), _) => {
                return Err(CommandError::NotAValue { name: "obj" });
            }
            _ => {
                return Err(CommandError::Arity {
                    callee: "apply_impulse",
                    expected: "(obj, x, y) or (obj, vector)",
                    got,
                });
            }
        };
        Ok(Command::ApplyImpulse { impulse })
    }

    /// Arguments after an opening '(' through the closing ')'
    fn call_args(&mut self) -> Result<Vec<Arg>, CommandError> {
        self.expect(TokenKind::LParen, "'('")?;
        let mut args = Vec::new();
        if self.eat(&TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            let is_body = matches!(self.peek(), TokenKind::Ident(name) if name == "obj")
                && matches!(self.peek_at(1), TokenKind::Comma | TokenKind::RParen);
            if is_body {
                self.advance();
                args.push(Arg::Body);
            } else {
                args.push(Arg::Value(self.expr()?));
            }
            if self.eat(&TokenKind::RParen) {
                return Ok(args);
            }
            self.expect(TokenKind::Comma, "',' or ')'")?;
        }
    }

    fn no_args(&mut self, callee: &'static str) -> Result<(), CommandError> {
        let args = self.call_args()?;
        if !args.is_empty() {
            return Err(CommandError::Arity {
                callee,
                expected: "0",
                got: args.len(),
            });
        }
        Ok(())
    }

    fn expr(&mut self) -> Result<Expr, CommandError> {
        self.enter()?;
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.term()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        self.leave();
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, CommandError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                _ => break,
            };
            self.advance();
            let rhs = self.unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, CommandError> {
        self.enter()?;
        let expr = match self.peek() {
            TokenKind::Minus => {
                self.advance();
                Expr::Neg(Box::new(self.unary()?))
            }
            TokenKind::Plus => {
                self.advance();
                self.unary()?
            }
            _ => self.postfix()?,
        };
        self.leave();
        Ok(expr)
    }

    fn postfix(&mut self) -> Result<Expr, CommandError> {
        let mut expr = self.primary()?;
        while self.eat(&TokenKind::Dot) {
            let axis = match self.advance() {
                TokenKind::Ident(name) if name == "x" => Axis::X,
                TokenKind::Ident(name) if name == "y" => Axis::Y,
                TokenKind::Ident(member) => {
                    return Err(CommandError::UnknownMember {
                        target: "value",
                        member,
                    });
                }
                other => {
                    return Err(CommandError::Syntax {
                        expected: "'x' or 'y'",
                        found: other.describe(),
                        column: self.tokens[self.pos.saturating_sub(1)].column,
                    });
                }
            };
            expr = Expr::Component(Box::new(expr), axis);
        }
        Ok(expr)
    }

    fn primary(&mut self) -> Result<Expr, CommandError> {
        match self.peek().clone() {
            TokenKind::Number(n) => {
                self.advance();
                Ok(Expr::Number(n))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.expr()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            TokenKind::Ident(name) => {
                self.advance();
                match name.as_str() {
                    "Vector2D" => self.vector_ctor(),
                    "engine" => self.engine_member(),
                    "obj" => self.body_member(),
                    _ => Err(CommandError::UnknownName { name }),
                }
            }
            _ => Err(self.syntax("a value")),
        }
    }

    fn vector_ctor(&mut self) -> Result<Expr, CommandError> {
        if *self.peek() != TokenKind::LParen {
            return Err(CommandError::NotAValue { name: "Vector2D" });
        }
        let values = values_only(self.call_args()?)?;
        match <[Expr; 2]>::try_from(values) {
            Ok([x, y]) => Ok(Expr::Vector(Box::new(x), Box::new(y))),
            Err(values) => Err(CommandError::Arity {
                callee: "Vector2D",
                expected: "2",
                got: values.len(),
            }),
        }
    }

    fn member_name(&mut self, target: &'static str) -> Result<String, CommandError> {
        if !self.eat(&TokenKind::Dot) {
            return Err(CommandError::NotAValue { name: target });
        }
        match self.advance() {
            TokenKind::Ident(member) => Ok(member),
            other => Err(CommandError::Syntax {
                expected: "a member name",
                found: other.describe(),
                column: self.tokens[self.pos.saturating_sub(1)].column,
            }),
        }
    }

    fn engine_member(&mut self) -> Result<Expr, CommandError> {
        let member = self.member_name("engine")?;
        match member.as_str() {
            "gravity" => Ok(Expr::Read(Quantity::Gravity)),
            "get_gravity" => {
                self.no_args("get_gravity")?;
                Ok(Expr::Read(Quantity::Gravity))
            }
            "get_position" => {
                self.no_args("get_position")?;
                Ok(Expr::Read(Quantity::Position))
            }
            "apply_impulse" => Err(CommandError::NotAValue {
                name: "engine.apply_impulse",
            }),
            "set_gravity" => Err(CommandError::NotAValue {
                name: "engine.set_gravity",
            }),
            _ => Err(CommandError::UnknownMember {
                target: "engine",
                member,
            }),
        }
    }

    fn body_member(&mut self) -> Result<Expr, CommandError> {
        let member = self.member_name("obj")?;
        let quantity = match member.as_str() {
            "position" => Quantity::Position,
            "velocity" => Quantity::Velocity,
            "mass" => Quantity::Mass,
            "radius" => Quantity::Radius,
            _ => {
                return Err(CommandError::UnknownMember {
                    target: "obj",
                    member,
                });
            }
        };
        Ok(Expr::Read(quantity))
    }

    /// Trimmed source text from `start` up to (not including) `end`, by column
    fn source_between(&self, start: usize, end: usize) -> String {
        self.src
            .chars()
            .skip(start - 1)
            .take(end.saturating_sub(start))
            .collect::<String>()
            .trim()
            .to_string()
    }
}

fn values_only(args: Vec<Arg>) -> Result<Vec<Expr>, CommandError> {
    args.into_iter()
        .map(|arg| match arg {
            Arg::Value(expr) => Ok(expr),
            Arg::Body => Err(CommandError::NotAValue { name: "obj" }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> Box<Expr> {
        Box::new(Expr::Number(n))
    }

    #[test]
    fn test_apply_impulse_components() {
        let cmds = parse("engine.apply_impulse(obj, 10, 0)").unwrap();
        assert_eq!(
            cmds,
            vec![Command::ApplyImpulse {
                impulse: Expr::Vector(num(10.0), num(0.0))
            }]
        );
    }

    #[test]
    fn test_apply_impulse_vector() {
        let cmds = parse("engine.apply_impulse(obj, Vector2D(1, 2) * 3)").unwrap();
        assert_eq!(
            cmds,
            vec![Command::ApplyImpulse {
                impulse: Expr::Binary(
                    BinOp::Mul,
                    Box::new(Expr::Vector(num(1.0), num(2.0))),
                    num(3.0)
                )
            }]
        );
    }

    #[test]
    fn test_apply_impulse_arity() {
        let err = parse("engine.apply_impulse(10, 0)").unwrap_err();
        assert!(matches!(err, CommandError::Arity { callee: "apply_impulse", got: 2, .. }));

        let err = parse("engine.apply_impulse(obj, 1, 2, 3)").unwrap_err();
        assert!(matches!(err, CommandError::Arity { got: 4, .. }));

        let err = parse("engine.apply_impulse(obj, obj, 2)").unwrap_err();
        assert_eq!(err, CommandError::NotAValue { name: "obj" });
    }

    #[test]
    fn test_gravity_forms() {
        let expected = vec![Command::SetGravity {
            value: Expr::Number(3.0),
        }];
        assert_eq!(parse("engine.gravity = 3").unwrap(), expected);
        assert_eq!(parse("engine.set_gravity(3)").unwrap(), expected);
        assert_eq!(
            parse("engine.gravity").unwrap(),
            vec![Command::Inspect(Expr::Read(Quantity::Gravity))]
        );
    }

    #[test]
    fn test_read_only_targets() {
        assert_eq!(
            parse("obj.mass = 0").unwrap_err(),
            CommandError::ReadOnly {
                target: "obj.mass".into()
            }
        );
        assert!(matches!(
            parse("engine.get_gravity() = 2").unwrap_err(),
            CommandError::ReadOnly { .. }
        ));
    }

    #[test]
    fn test_get_position() {
        assert_eq!(parse("engine.get_position()").unwrap(), vec![Command::GetPosition]);
        assert!(matches!(
            parse("engine.get_position(1)").unwrap_err(),
            CommandError::Arity { callee: "get_position", .. }
        ));
    }

    #[test]
    fn test_precedence() {
        let cmds = parse("1 + 2 * -3").unwrap();
        assert_eq!(
            cmds,
            vec![Command::Inspect(Expr::Binary(
                BinOp::Add,
                num(1.0),
                Box::new(Expr::Binary(
                    BinOp::Mul,
                    num(2.0),
                    Box::new(Expr::Neg(num(3.0)))
                ))
            ))]
        );
    }

    #[test]
    fn test_components() {
        let cmds = parse("obj.velocity.x").unwrap();
        assert_eq!(
            cmds,
            vec![Command::Inspect(Expr::Component(
                Box::new(Expr::Read(Quantity::Velocity)),
                Axis::X
            ))]
        );
        assert!(matches!(
            parse("obj.velocity.z").unwrap_err(),
            CommandError::UnknownMember { member, .. } if member == "z"
        ));
    }

    #[test]
    fn test_multiple_statements() {
        let cmds = parse("engine.gravity = 2; engine.apply_impulse(obj, 1, 1);;").unwrap();
        assert_eq!(cmds.len(), 2);
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_names() {
        assert_eq!(
            parse("import os").unwrap_err(),
            CommandError::UnknownName {
                name: "import".into()
            }
        );
        assert!(matches!(
            parse("engine._PhysicsEngine__gravity").unwrap_err(),
            CommandError::UnknownMember { target: "engine", .. }
        ));
        assert!(matches!(
            parse("obj.__class__").unwrap_err(),
            CommandError::UnknownMember { target: "obj", .. }
        ));
        assert_eq!(
            parse("engine").unwrap_err(),
            CommandError::NotAValue { name: "engine" }
        );
    }

    #[test]
    fn test_missing_separator() {
        assert!(matches!(
            parse("1 2").unwrap_err(),
            CommandError::Syntax { column: 3, .. }
        ));
    }

    #[test]
    fn test_limits() {
        let long = "1+".repeat(MAX_COMMAND_LEN);
        assert!(matches!(parse(&long).unwrap_err(), CommandError::TooLong { .. }));

        let deep = format!("{}1{}", "(".repeat(60), ")".repeat(60));
        assert_eq!(
            parse(&deep).unwrap_err(),
            CommandError::TooDeep {
                max: MAX_EXPR_DEPTH
            }
        );

        let many = vec!["1"; MAX_STATEMENTS + 2].join(";");
        assert_eq!(
            parse(&many).unwrap_err(),
            CommandError::TooManyStatements {
                count: MAX_STATEMENTS + 2,
                max: MAX_STATEMENTS
            }
        );
    }
}
