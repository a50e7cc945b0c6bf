//! Recursive-descent parser for the predicate expression language.
//!
//! Precedence from loosest to tightest: `or`, `and`, `not`, primary.

use crate::error::CompileError;
use crate::query::field::Locator;
use crate::script::lexer::{tokenize, Operator, Token, TokenKind};

/// Expression tree produced by [`parse`]
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Const(bool),
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Not(Box<Expr>),
    /// `field op "literal"`
    Test {
        field: ScriptField,
        op: StringOp,
        value: String,
    },
    /// Bare field: true when it holds any value
    Exists(ScriptField),
    /// `id op integer`
    IdCompare { op: Ordering, value: i64 },
}

/// Field references available to scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptField {
    Headword,
    Translation,
    TranslationLabel,
    Tag,
    Gloss,
    GlossLabel,
    Variation,
    VariationLabel,
    Relation,
    RelationLabel,
    Everything,
}

impl ScriptField {
    fn from_name(name: &str) -> Option<Self> {
        let field = match name.to_ascii_lowercase().as_str() {
            "headword" | "word" | "form" => ScriptField::Headword,
            "translation" | "translations" => ScriptField::Translation,
            "translation.label" | "translation.title" => ScriptField::TranslationLabel,
            "tag" | "tags" => ScriptField::Tag,
            "gloss" | "content" | "contents" => ScriptField::Gloss,
            "gloss.label" | "content.title" => ScriptField::GlossLabel,
            "variation" | "variations" => ScriptField::Variation,
            "variation.label" | "variation.title" => ScriptField::VariationLabel,
            "relation" | "relations" => ScriptField::Relation,
            "relation.label" | "relation.title" => ScriptField::RelationLabel,
            "everything" | "all" => ScriptField::Everything,
            _ => return None,
        };
        Some(field)
    }

    pub fn locators(self) -> &'static [Locator] {
        match self {
            ScriptField::Headword => &[Locator::HeadwordForm],
            ScriptField::Translation => &[Locator::TranslationForm],
            ScriptField::TranslationLabel => &[Locator::TranslationLabel],
            ScriptField::Tag => &[Locator::Tag],
            ScriptField::Gloss => &[Locator::GlossText],
            ScriptField::GlossLabel => &[Locator::GlossLabel],
            ScriptField::Variation => &[Locator::VariationForm],
            ScriptField::VariationLabel => &[Locator::VariationLabel],
            ScriptField::Relation => &[Locator::RelationForm],
            ScriptField::RelationLabel => &[Locator::RelationLabel],
            ScriptField::Everything => crate::query::WordField::Everything.locators(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringOp {
    StartsWith,
    EndsWith,
    Contains,
    Matches,
    Eq,
    Ne,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordering {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Ordering {
    pub fn holds(self, lhs: i64, rhs: i64) -> bool {
        match self {
            Ordering::Eq => lhs == rhs,
            Ordering::Ne => lhs != rhs,
            Ordering::Lt => lhs < rhs,
            Ordering::Le => lhs <= rhs,
            Ordering::Gt => lhs > rhs,
            Ordering::Ge => lhs >= rhs,
        }
    }
}

/// Parse a script into an expression tree
pub fn parse(source: &str) -> Result<Expr, CompileError> {
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
        return Err(CompileError::new(0, "empty script"));
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        end: source.len(),
        depth: 0,
    };
    let expr = parser.parse_or()?;

    if let Some(token) = parser.peek() {
        return Err(CompileError::new(
            token.offset,
            format!("unexpected {}", describe(&token.kind)),
        ));
    }
    Ok(expr)
}

/// Deepest allowed chain of `(` and `not`. Keeps parsing, lowering and
/// evaluation within a bounded stack.
pub const MAX_NESTING: usize = 128;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Offset reported for errors at end of input
    end: usize,
    depth: usize,
}

impl Parser {
    fn parse_or(&mut self) -> Result<Expr, CompileError> {
        let mut nodes = vec![self.parse_and()?];
        while self.consume(&TokenKind::Or) {
            nodes.push(self.parse_and()?);
        }

        Ok(if nodes.len() == 1 {
            nodes.swap_remove(0)
        } else {
            Expr::Or(nodes)
        })
    }

    fn parse_and(&mut self) -> Result<Expr, CompileError> {
        let mut nodes = vec![self.parse_unary()?];
        while self.consume(&TokenKind::And) {
            nodes.push(self.parse_unary()?);
        }

        Ok(if nodes.len() == 1 {
            nodes.swap_remove(0)
        } else {
            Expr::And(nodes)
        })
    }

    fn parse_unary(&mut self) -> Result<Expr, CompileError> {
        if let Some(offset) = self.peek().filter(|t| t.kind == TokenKind::Not).map(|t| t.offset) {
            self.pos += 1;
            self.descend(offset)?;
            let inner = self.parse_unary()?;
            self.depth -= 1;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, CompileError> {
        let token = self.next_token("expression")?;

        match token.kind {
            TokenKind::LParen => {
                self.descend(token.offset)?;
                let inner = self.parse_or()?;
                self.depth -= 1;
                let close = self.next_token("')'")?;
                if close.kind != TokenKind::RParen {
                    return Err(CompileError::new(
                        close.offset,
                        format!("expected ')', found {}", describe(&close.kind)),
                    ));
                }
                Ok(inner)
            }
            TokenKind::True => Ok(Expr::Const(true)),
            TokenKind::False => Ok(Expr::Const(false)),
            TokenKind::Ident(name) => self.parse_test(&name, token.offset),
            other => Err(CompileError::new(
                token.offset,
                format!("expected expression, found {}", describe(&other)),
            )),
        }
    }

    fn parse_test(&mut self, name: &str, offset: usize) -> Result<Expr, CompileError> {
        if name.eq_ignore_ascii_case("id") {
            return self.parse_id_compare(offset);
        }

        let field = ScriptField::from_name(name)
            .ok_or_else(|| CompileError::new(offset, format!("unknown field '{}'", name)))?;

        let op = match self.peek().map(|t| (t.kind.clone(), t.offset)) {
            Some((TokenKind::Op(op), op_offset)) => {
                self.pos += 1;
                string_op(op).ok_or_else(|| {
                    CompileError::new(
                        op_offset,
                        format!("operator '{}' needs a numeric field", op.symbol()),
                    )
                })?
            }
            _ => return Ok(Expr::Exists(field)),
        };

        let literal = self.next_token("string literal")?;
        match literal.kind {
            TokenKind::Str(value) => Ok(Expr::Test { field, op, value }),
            other => Err(CompileError::new(
                literal.offset,
                format!("expected string literal, found {}", describe(&other)),
            )),
        }
    }

    fn parse_id_compare(&mut self, offset: usize) -> Result<Expr, CompileError> {
        let op_token = self.next_token("comparison operator")?;
        let op = match op_token.kind {
            TokenKind::Op(op) => ordering(op).ok_or_else(|| {
                CompileError::new(
                    op_token.offset,
                    format!("operator '{}' does not apply to 'id'", op.symbol()),
                )
            })?,
            other => {
                return Err(CompileError::new(
                    offset,
                    format!("'id' must be compared, found {}", describe(&other)),
                ));
            }
        };

        let literal = self.next_token("integer")?;
        match literal.kind {
            TokenKind::Int(value) => Ok(Expr::IdCompare { op, value }),
            other => Err(CompileError::new(
                literal.offset,
                format!("expected integer, found {}", describe(&other)),
            )),
        }
    }

    fn descend(&mut self, offset: usize) -> Result<(), CompileError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(CompileError::new(offset, "expression nested too deeply"));
        }
        Ok(())
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn consume(&mut self, kind: &TokenKind) -> bool {
        if self.peek().map(|t| &t.kind) == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn next_token(&mut self, expected: &str) -> Result<Token, CompileError> {
        match self.tokens.get(self.pos) {
            Some(token) => {
                self.pos += 1;
                Ok(token.clone())
            }
            None => Err(CompileError::new(
                self.end,
                format!("expected {}, found end of script", expected),
            )),
        }
    }
}

fn string_op(op: Operator) -> Option<StringOp> {
    match op {
        Operator::StartsWith => Some(StringOp::StartsWith),
        Operator::EndsWith => Some(StringOp::EndsWith),
        Operator::Contains => Some(StringOp::Contains),
        Operator::Matches => Some(StringOp::Matches),
        Operator::Eq => Some(StringOp::Eq),
        Operator::Ne => Some(StringOp::Ne),
        _ => None,
    }
}

fn ordering(op: Operator) -> Option<Ordering> {
    match op {
        Operator::Eq => Some(Ordering::Eq),
        Operator::Ne => Some(Ordering::Ne),
        Operator::Lt => Some(Ordering::Lt),
        Operator::Le => Some(Ordering::Le),
        Operator::Gt => Some(Ordering::Gt),
        Operator::Ge => Some(Ordering::Ge),
        _ => None,
    }
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::LParen => "'('".to_string(),
        TokenKind::RParen => "')'".to_string(),
        TokenKind::And => "'and'".to_string(),
        TokenKind::Or => "'or'".to_string(),
        TokenKind::Not => "'not'".to_string(),
        TokenKind::True => "'true'".to_string(),
        TokenKind::False => "'false'".to_string(),
        TokenKind::Ident(name) => format!("identifier '{}'", name),
        TokenKind::Str(_) => "string literal".to_string(),
        TokenKind::Int(n) => format!("integer {}", n),
        TokenKind::Op(op) => format!("operator '{}'", op.symbol()),
    }
}
