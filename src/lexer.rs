//! Lexical analyzer for BotScript.
//!
//! Converts a raw UTF-8 source buffer into a stream of spanned [`Token`]s.
//! Single-pass, one code point of lookahead (two where a decimal-point
//! lookahead is needed). Unlike a compiler that aborts on the first bad
//! character, this lexer runs in panic mode: a malformed token becomes an
//! `Error` token plus a recorded diagnostic, and scanning continues. This
//! guarantees lexing always terminates with an `Eof` token, which later
//! phases rely on.

use std::fmt;

use crate::error::Diagnostic;

/// The kind of a token, independent of its source text.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Keyword(Keyword),
    Identifier(String),
    Variable(String),
    Integer(i64),
    Float(f64),
    String(String),
    Operator(Operator),
    Punctuation(Punctuation),
    Newline,
    Error(char),
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Def,
    Say,
    Move,
    Goto,
    Attack,
    Dig,
    Place,
    Wait,
    Equip,
    Drop,
    If,
    Then,
    Else,
    Endif,
    While,
    Endwhile,
    Repeat,
    Endrepeat,
    For,
    To,
    Endfor,
    Function,
    Endfunction,
    Return,
    Try,
    Catch,
    Endtry,
    Switch,
    Case,
    Default,
    Endswitch,
    True,
    False,
    Null,
    And,
    Or,
    Not,
}

impl Keyword {
    /// The host verbs recognized as `host_call` statements.
    pub const HOST_VERBS: &'static [Keyword] = &[
        Keyword::Say,
        Keyword::Move,
        Keyword::Goto,
        Keyword::Attack,
        Keyword::Dig,
        Keyword::Place,
        Keyword::Wait,
        Keyword::Equip,
        Keyword::Drop,
    ];

    pub fn is_host_verb(self) -> bool {
        Self::HOST_VERBS.contains(&self)
    }

    pub fn verb_name(self) -> &'static str {
        match self {
            Keyword::Say => "say",
            Keyword::Move => "move",
            Keyword::Goto => "goto",
            Keyword::Attack => "attack",
            Keyword::Dig => "dig",
            Keyword::Place => "place",
            Keyword::Wait => "wait",
            Keyword::Equip => "equip",
            Keyword::Drop => "drop",
            _ => unreachable!("verb_name called on a non-verb keyword"),
        }
    }

    fn from_uppercase(word: &str) -> Option<Keyword> {
        Some(match word {
            "DEF" => Keyword::Def,
            "SAY" => Keyword::Say,
            "MOVE" => Keyword::Move,
            "GOTO" => Keyword::Goto,
            "ATTACK" => Keyword::Attack,
            "DIG" => Keyword::Dig,
            "PLACE" => Keyword::Place,
            "WAIT" => Keyword::Wait,
            "EQUIP" => Keyword::Equip,
            "DROP" => Keyword::Drop,
            "IF" => Keyword::If,
            "THEN" => Keyword::Then,
            "ELSE" => Keyword::Else,
            "ENDIF" => Keyword::Endif,
            "WHILE" => Keyword::While,
            "ENDWHILE" => Keyword::Endwhile,
            "REPEAT" => Keyword::Repeat,
            "ENDREPEAT" => Keyword::Endrepeat,
            "FOR" => Keyword::For,
            "TO" => Keyword::To,
            "ENDFOR" => Keyword::Endfor,
            "FUNCTION" => Keyword::Function,
            "ENDFUNCTION" => Keyword::Endfunction,
            "RETURN" => Keyword::Return,
            "TRY" => Keyword::Try,
            "CATCH" => Keyword::Catch,
            "ENDTRY" => Keyword::Endtry,
            "SWITCH" => Keyword::Switch,
            "CASE" => Keyword::Case,
            "DEFAULT" => Keyword::Default,
            "ENDSWITCH" => Keyword::Endswitch,
            "TRUE" => Keyword::True,
            "FALSE" => Keyword::False,
            "NULL" => Keyword::Null,
            "AND" => Keyword::And,
            "OR" => Keyword::Or,
            "NOT" => Keyword::Not,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Equal,
    EqualEqual,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punctuation {
    LeftParen,
    RightParen,
    Comma,
    Semicolon,
}

/// One lexical unit plus its position in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
    pub column: usize,
    pub byte_offset: usize,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenKind::Keyword(k) => write!(f, "{:?}", k),
            TokenKind::Identifier(s) => write!(f, "identifier '{}'", s),
            TokenKind::Variable(s) => write!(f, "variable '${}'", s),
            TokenKind::Integer(n) => write!(f, "integer {}", n),
            TokenKind::Float(n) => write!(f, "float {}", n),
            TokenKind::String(s) => write!(f, "string {:?}", s),
            TokenKind::Operator(op) => write!(f, "operator {:?}", op),
            TokenKind::Punctuation(p) => write!(f, "punctuation {:?}", p),
            TokenKind::Newline => write!(f, "newline"),
            TokenKind::Error(c) => write!(f, "error token '{}'", c),
            TokenKind::Eof => write!(f, "eof"),
        }
    }
}

/// Tokenizes BotScript source, never aborting: bad input becomes `Error`
/// tokens plus diagnostics, and scanning resumes past the offending code
/// point (panic-mode recovery, see SPEC_FULL.md §4.1).
pub struct Lexer {
    input: Vec<char>,
    byte_offsets: Vec<usize>,
    position: usize,
    line: usize,
    column: usize,
    diagnostics: Vec<Diagnostic>,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        let mut byte_offsets = Vec::with_capacity(source.len());
        let mut offset = 0;
        let input: Vec<char> = source
            .chars()
            .map(|c| {
                byte_offsets.push(offset);
                offset += c.len_utf8();
                c
            })
            .collect();
        byte_offsets.push(offset);

        Self {
            input,
            byte_offsets,
            position: 0,
            line: 1,
            column: 1,
            diagnostics: Vec::new(),
        }
    }

    /// Tokenizes the whole input. Always terminates; the last token is
    /// always `Eof`.
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        (tokens, self.diagnostics)
    }

    fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        let (line, column, byte_offset) = (self.line, self.column, self.current_byte_offset());

        if self.is_at_end() {
            return self.make_token(TokenKind::Eof, String::new(), line, column, byte_offset);
        }

        let c = self.advance();

        match c {
            '\n' => {
                self.line += 1;
                self.column = 1;
                self.make_token(TokenKind::Newline, "\n".to_string(), line, column, byte_offset)
            }
            '(' => self.make_token(
                TokenKind::Punctuation(Punctuation::LeftParen),
                "(".to_string(),
                line,
                column,
                byte_offset,
            ),
            ')' => self.make_token(
                TokenKind::Punctuation(Punctuation::RightParen),
                ")".to_string(),
                line,
                column,
                byte_offset,
            ),
            ',' => self.make_token(
                TokenKind::Punctuation(Punctuation::Comma),
                ",".to_string(),
                line,
                column,
                byte_offset,
            ),
            ';' => self.make_token(
                TokenKind::Punctuation(Punctuation::Semicolon),
                ";".to_string(),
                line,
                column,
                byte_offset,
            ),
            '+' => self.make_token(
                TokenKind::Operator(Operator::Plus),
                "+".to_string(),
                line,
                column,
                byte_offset,
            ),
            '-' => self.make_token(
                TokenKind::Operator(Operator::Minus),
                "-".to_string(),
                line,
                column,
                byte_offset,
            ),
            '*' => self.make_token(
                TokenKind::Operator(Operator::Star),
                "*".to_string(),
                line,
                column,
                byte_offset,
            ),
            '/' => self.make_token(
                TokenKind::Operator(Operator::Slash),
                "/".to_string(),
                line,
                column,
                byte_offset,
            ),
            '%' => self.make_token(
                TokenKind::Operator(Operator::Percent),
                "%".to_string(),
                line,
                column,
                byte_offset,
            ),
            '=' => {
                if self.peek() == '=' {
                    self.advance();
                    self.make_token(
                        TokenKind::Operator(Operator::EqualEqual),
                        "==".to_string(),
                        line,
                        column,
                        byte_offset,
                    )
                } else {
                    self.make_token(
                        TokenKind::Operator(Operator::Equal),
                        "=".to_string(),
                        line,
                        column,
                        byte_offset,
                    )
                }
            }
            '!' => {
                if self.peek() == '=' {
                    self.advance();
                    self.make_token(
                        TokenKind::Operator(Operator::NotEqual),
                        "!=".to_string(),
                        line,
                        column,
                        byte_offset,
                    )
                } else {
                    self.error_token(c, line, column, byte_offset, "unexpected '!'")
                }
            }
            '<' => {
                if self.peek() == '=' {
                    self.advance();
                    self.make_token(
                        TokenKind::Operator(Operator::LessEqual),
                        "<=".to_string(),
                        line,
                        column,
                        byte_offset,
                    )
                } else {
                    self.make_token(
                        TokenKind::Operator(Operator::Less),
                        "<".to_string(),
                        line,
                        column,
                        byte_offset,
                    )
                }
            }
            '>' => {
                if self.peek() == '=' {
                    self.advance();
                    self.make_token(
                        TokenKind::Operator(Operator::GreaterEqual),
                        ">=".to_string(),
                        line,
                        column,
                        byte_offset,
                    )
                } else {
                    self.make_token(
                        TokenKind::Operator(Operator::Greater),
                        ">".to_string(),
                        line,
                        column,
                        byte_offset,
                    )
                }
            }
            '"' => self.string_literal(line, column, byte_offset),
            '$' => self.variable(line, column, byte_offset),
            c if c.is_ascii_digit() => self.number_literal(c, line, column, byte_offset),
            c if c.is_ascii_alphabetic() || c == '_' => {
                self.identifier_or_keyword(c, line, column, byte_offset)
            }
            other => self.error_token(
                other,
                line,
                column,
                byte_offset,
                &format!("unexpected character '{}'", other),
            ),
        }
    }

    fn string_literal(&mut self, line: usize, column: usize, byte_offset: usize) -> Token {
        let mut value = String::new();
        loop {
            if self.is_at_end() || self.peek() == '\n' {
                self.diagnostics.push(Diagnostic::new(
                    crate::ast::Span::new(line, column, byte_offset, self.current_byte_offset() - byte_offset),
                    "unterminated string literal",
                ));
                break;
            }
            let c = self.advance();
            if c == '"' {
                return self.make_token(
                    TokenKind::String(value.clone()),
                    format!("\"{}\"", value),
                    line,
                    column,
                    byte_offset,
                );
            }
            if c == '\\' {
                if self.is_at_end() {
                    self.diagnostics.push(Diagnostic::new(
                        crate::ast::Span::new(line, column, byte_offset, self.current_byte_offset() - byte_offset),
                        "unterminated string literal",
                    ));
                    break;
                }
                let escaped = self.advance();
                match escaped {
                    'n' => value.push('\n'),
                    't' => value.push('\t'),
                    'r' => value.push('\r'),
                    '\\' => value.push('\\'),
                    '"' => value.push('"'),
                    other => {
                        self.diagnostics.push(Diagnostic::new(
                            crate::ast::Span::new(self.line, self.column, self.current_byte_offset(), 1),
                            format!("unrecognized escape '\\{}'", other),
                        ));
                        value.push('\\');
                        value.push(other);
                    }
                }
            } else {
                value.push(c);
            }
        }
        self.make_token(
            TokenKind::String(value.clone()),
            format!("\"{}", value),
            line,
            column,
            byte_offset,
        )
    }

    fn variable(&mut self, line: usize, column: usize, byte_offset: usize) -> Token {
        if !(self.peek().is_ascii_alphabetic() || self.peek() == '_') {
            return self.error_token(
                '$',
                line,
                column,
                byte_offset,
                "bare '$' is not a valid variable name",
            );
        }
        let mut name = String::new();
        while self.peek().is_ascii_alphanumeric() || self.peek() == '_' {
            name.push(self.advance());
        }
        let lexeme = format!("${}", name);
        self.make_token(TokenKind::Variable(name), lexeme, line, column, byte_offset)
    }

    fn number_literal(&mut self, first_digit: char, line: usize, column: usize, byte_offset: usize) -> Token {
        let mut text = String::from(first_digit);
        while self.peek().is_ascii_digit() {
            text.push(self.advance());
        }

        let mut is_float = false;
        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            is_float = true;
            text.push(self.advance());
            while self.peek().is_ascii_digit() {
                text.push(self.advance());
            }
            if self.peek() == '.' {
                // A second decimal point: consume it so lexing still makes
                // forward progress, then report the malformed number.
                text.push(self.advance());
                while self.peek().is_ascii_digit() {
                    text.push(self.advance());
                }
                self.diagnostics.push(Diagnostic::new(
                    crate::ast::Span::new(line, column, byte_offset, self.current_byte_offset() - byte_offset),
                    format!("malformed number '{}'", text),
                ));
                return self.make_token(TokenKind::Error('.'), text, line, column, byte_offset);
            }
        }

        if is_float {
            match text.parse::<f64>() {
                Ok(n) => self.make_token(TokenKind::Float(n), text, line, column, byte_offset),
                Err(_) => {
                    self.diagnostics.push(Diagnostic::new(
                        crate::ast::Span::new(line, column, byte_offset, text.len()),
                        format!("malformed number '{}'", text),
                    ));
                    self.make_token(TokenKind::Error('.'), text, line, column, byte_offset)
                }
            }
        } else {
            match text.parse::<i64>() {
                Ok(n) => self.make_token(TokenKind::Integer(n), text, line, column, byte_offset),
                Err(_) => {
                    self.diagnostics.push(Diagnostic::new(
                        crate::ast::Span::new(line, column, byte_offset, text.len()),
                        format!("malformed number '{}'", text),
                    ));
                    self.make_token(TokenKind::Error('.'), text, line, column, byte_offset)
                }
            }
        }
    }

    fn identifier_or_keyword(&mut self, first_char: char, line: usize, column: usize, byte_offset: usize) -> Token {
        let mut text = String::from(first_char);
        while self.peek().is_ascii_alphanumeric() || self.peek() == '_' {
            text.push(self.advance());
        }

        if let Some(keyword) = Keyword::from_uppercase(&text.to_ascii_uppercase()) {
            self.make_token(TokenKind::Keyword(keyword), text, line, column, byte_offset)
        } else {
            self.make_token(TokenKind::Identifier(text.clone()), text, line, column, byte_offset)
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                ' ' | '\t' | '\r' => {
                    self.advance();
                }
                '/' if self.peek_next() == '/' => {
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn error_token(
        &mut self,
        offending: char,
        line: usize,
        column: usize,
        byte_offset: usize,
        message: &str,
    ) -> Token {
        self.diagnostics.push(Diagnostic::new(
            crate::ast::Span::new(line, column, byte_offset, offending.len_utf8()),
            message.to_string(),
        ));
        self.make_token(
            TokenKind::Error(offending),
            offending.to_string(),
            line,
            column,
            byte_offset,
        )
    }

    fn make_token(
        &self,
        kind: TokenKind,
        lexeme: String,
        line: usize,
        column: usize,
        byte_offset: usize,
    ) -> Token {
        Token {
            kind,
            lexeme,
            line,
            column,
            byte_offset,
        }
    }

    fn current_byte_offset(&self) -> usize {
        self.byte_offsets[self.position]
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn advance(&mut self) -> char {
        let c = self.input[self.position];
        self.position += 1;
        self.column += 1;
        c
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.input[self.position]
        }
    }

    fn peek_next(&self) -> char {
        if self.position + 1 >= self.input.len() {
            '\0'
        } else {
            self.input[self.position + 1]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let (tokens, _) = Lexer::new(source).tokenize();
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn totality_always_ends_in_eof() {
        let (tokens, _) = Lexer::new("say \"ok\" @ move").tokenize();
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn byte_offsets_strictly_increase() {
        let (tokens, _) = Lexer::new("def $x = 1 + 2").tokenize();
        let mut last = None;
        for t in &tokens {
            if let Some(prev) = last {
                assert!(t.byte_offset >= prev, "offsets must be non-decreasing");
            }
            last = Some(t.byte_offset);
        }
    }

    #[test]
    fn lex_recovery_continues_past_bad_character() {
        let (tokens, diagnostics) = Lexer::new("say \"ok\" @ move").tokenize();
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(
            tokens.iter().find(|t| t.kind == TokenKind::Error('@')),
            Some(_)
        ));
        // `move` after the bad token is still lexed correctly.
        assert!(tokens
            .iter()
            .any(|t| t.kind == TokenKind::Keyword(Keyword::Move)));
    }

    #[test]
    fn keyword_matching_is_case_insensitive_but_preserves_lexeme_case() {
        let (tokens, _) = Lexer::new("While").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Keyword(Keyword::While));
        assert_eq!(tokens[0].lexeme, "While");
    }

    #[test]
    fn numbers_distinguish_integer_and_float() {
        assert_eq!(kinds("42")[0], TokenKind::Integer(42));
        assert_eq!(kinds("3.5")[0], TokenKind::Float(3.5));
    }

    #[test]
    fn malformed_number_is_a_lex_error() {
        let (_, diagnostics) = Lexer::new("1.2.3").tokenize();
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn string_escapes_are_decoded() {
        let (tokens, diagnostics) = Lexer::new(r#""a\nb\tc""#).tokenize();
        assert_eq!(tokens[0].kind, TokenKind::String("a\nb\tc".to_string()));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn unrecognized_escape_keeps_the_backslash_and_errors() {
        let (tokens, diagnostics) = Lexer::new(r#""a\qb""#).tokenize();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::String("a\\qb".to_string()));
    }

    #[test]
    fn bare_dollar_is_an_error_token() {
        let (tokens, diagnostics) = Lexer::new("$ 1").tokenize();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Error('$'));
    }

    #[test]
    fn variable_token_captures_name_without_sigil() {
        let (tokens, _) = Lexer::new("$health").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Variable("health".to_string()));
    }

    #[test]
    fn multi_char_operators_prefer_longest_match() {
        assert_eq!(kinds("<=")[0], TokenKind::Operator(Operator::LessEqual));
        assert_eq!(kinds(">=")[0], TokenKind::Operator(Operator::GreaterEqual));
        assert_eq!(kinds("==")[0], TokenKind::Operator(Operator::EqualEqual));
        assert_eq!(kinds("!=")[0], TokenKind::Operator(Operator::NotEqual));
    }
}
