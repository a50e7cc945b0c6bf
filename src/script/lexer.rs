use crate::error::CompileError;

/// Lexical token with the byte offset it starts at
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    LParen,
    RParen,
    And,
    Or,
    Not,
    True,
    False,
    /// Field reference such as `headword` or `translation.label`
    Ident(String),
    Str(String),
    Int(i64),
    Op(Operator),
}

/// Binary operators between a field and a literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    StartsWith,
    EndsWith,
    Contains,
    Matches,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::StartsWith => "startswith",
            Operator::EndsWith => "endswith",
            Operator::Contains => "contains",
            Operator::Matches => "matches",
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
        }
    }
}

/// Split a script into tokens
pub fn tokenize(input: &str) -> Result<Vec<Token>, CompileError> {
    Lexer::new(input).run()
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>, CompileError> {
        loop {
            self.skip_whitespace();
            let Some(ch) = self.peek_char() else {
                break;
            };
            let start = self.pos;

            let kind = match ch {
                '(' => {
                    self.advance();
                    TokenKind::LParen
                }
                ')' => {
                    self.advance();
                    TokenKind::RParen
                }
                '"' | '\'' => self.lex_string(ch)?,
                '&' => self.lex_pair('&', TokenKind::And)?,
                '|' => self.lex_pair('|', TokenKind::Or)?,
                '!' => {
                    self.advance();
                    if self.consume_char('=') {
                        TokenKind::Op(Operator::Ne)
                    } else {
                        TokenKind::Not
                    }
                }
                '=' => self.lex_eq_suffix(Operator::Eq)?,
                '^' => self.lex_eq_suffix(Operator::StartsWith)?,
                '$' => self.lex_eq_suffix(Operator::EndsWith)?,
                '*' => self.lex_eq_suffix(Operator::Contains)?,
                '~' => self.lex_eq_suffix(Operator::Matches)?,
                '<' => {
                    self.advance();
                    if self.consume_char('=') {
                        TokenKind::Op(Operator::Le)
                    } else {
                        TokenKind::Op(Operator::Lt)
                    }
                }
                '>' => {
                    self.advance();
                    if self.consume_char('=') {
                        TokenKind::Op(Operator::Ge)
                    } else {
                        TokenKind::Op(Operator::Gt)
                    }
                }
                c if c == '-' || c.is_ascii_digit() => self.lex_int()?,
                c if is_ident_start(c) => self.lex_word(),
                other => {
                    return Err(CompileError::new(
                        start,
                        format!("unexpected character '{}'", other),
                    ));
                }
            };

            self.tokens.push(Token {
                kind,
                offset: start,
            });
        }

        Ok(self.tokens)
    }

    /// Two-character operator spelled with the same char twice (`&&`, `||`)
    fn lex_pair(&mut self, ch: char, kind: TokenKind) -> Result<TokenKind, CompileError> {
        let start = self.pos;
        self.advance();
        if self.consume_char(ch) {
            Ok(kind)
        } else {
            Err(CompileError::new(start, format!("expected '{ch}{ch}'")))
        }
    }

    /// Operator spelled as `<ch>=`
    fn lex_eq_suffix(&mut self, op: Operator) -> Result<TokenKind, CompileError> {
        let start = self.pos;
        self.advance();
        if self.consume_char('=') {
            Ok(TokenKind::Op(op))
        } else {
            Err(CompileError::new(
                start,
                format!("expected '{}'", op.symbol()),
            ))
        }
    }

    fn lex_string(&mut self, quote: char) -> Result<TokenKind, CompileError> {
        let start = self.pos;
        self.advance();
        let mut value = String::new();

        loop {
            match self.peek_char() {
                None => return Err(CompileError::new(start, "unterminated string literal")),
                Some(c) if c == quote => {
                    self.advance();
                    return Ok(TokenKind::Str(value));
                }
                Some('\\') => {
                    let escape_at = self.pos;
                    self.advance();
                    let escaped = match self.peek_char() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('\\') => '\\',
                        Some('"') => '"',
                        Some('\'') => '\'',
                        Some(other) => {
                            return Err(CompileError::new(
                                escape_at,
                                format!("unknown escape '\\{}'", other),
                            ));
                        }
                        None => return Err(CompileError::new(start, "unterminated string literal")),
                    };
                    value.push(escaped);
                    self.advance();
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
            }
        }
    }

    fn lex_int(&mut self) -> Result<TokenKind, CompileError> {
        let start = self.pos;
        self.consume_char('-');
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        let text = &self.input[start..self.pos];
        text.parse::<i64>()
            .map(TokenKind::Int)
            .map_err(|_| CompileError::new(start, format!("invalid integer '{}'", text)))
    }

    fn lex_word(&mut self) -> TokenKind {
        let start = self.pos;
        while self.peek_char().is_some_and(is_ident_continue) {
            self.advance();
        }

        let word = &self.input[start..self.pos];
        match word.to_ascii_lowercase().as_str() {
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "not" => TokenKind::Not,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "startswith" => TokenKind::Op(Operator::StartsWith),
            "endswith" => TokenKind::Op(Operator::EndsWith),
            "contains" => TokenKind::Op(Operator::Contains),
            "matches" => TokenKind::Op(Operator::Matches),
            _ => TokenKind::Ident(word.to_string()),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn consume_char(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn advance(&mut self) {
        if let Some(ch) = self.peek_char() {
            self.pos += ch.len_utf8();
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}
