//! Parser for BotScript.
//!
//! Recursive descent with precedence climbing for expressions, one token of
//! lookahead, no backtracking. On a syntax error the parser records a
//! diagnostic and synchronizes — discarding tokens up to the next statement
//! terminator, block-closing keyword, or EOF — rather than aborting, so a
//! single pass can surface more than one syntax error and still hand back a
//! best-effort AST (see SPEC_FULL.md §4.2).

use crate::ast::*;
use crate::error::{BotScriptError, Diagnostic, Result};
use crate::lexer::{Keyword, Operator, Punctuation, Token, TokenKind};

/// Recursive-descent parser over a finished token stream.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    diagnostics: Vec<Diagnostic>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            current: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Parses the whole token stream into a `Program`, collecting every
    /// diagnostic along the way instead of stopping at the first one.
    pub fn parse(mut self) -> (Program, Vec<Diagnostic>) {
        let mut statements = Vec::new();
        self.skip_newlines();
        while !self.is_at_end() {
            match self.statement() {
                Ok(stmt) => statements.push(stmt),
                Err(_) => self.synchronize(),
            }
            self.skip_newlines();
        }
        (Program { statements }, self.diagnostics)
    }

    // ---- statements ---------------------------------------------------

    fn statement(&mut self) -> Result<Statement> {
        match self.peek_kind().clone() {
            TokenKind::Keyword(Keyword::Def) => self.var_decl(),
            TokenKind::Keyword(Keyword::If) => self.if_stmt(),
            TokenKind::Keyword(Keyword::While) => self.while_stmt(),
            TokenKind::Keyword(Keyword::Repeat) => self.repeat_stmt(),
            TokenKind::Keyword(Keyword::For) => self.for_stmt(),
            TokenKind::Keyword(Keyword::Function) => self.function_decl(),
            TokenKind::Keyword(Keyword::Return) => self.return_stmt(),
            TokenKind::Keyword(Keyword::Try) => self.try_stmt(),
            TokenKind::Keyword(Keyword::Switch) => self.switch_stmt(),
            TokenKind::Keyword(k) if k.is_host_verb() => self.host_call(),
            TokenKind::Variable(_) if self.peek_ahead_is_assignment() => self.assign(),
            _ => self.expression_stmt(),
        }
    }

    /// `"def" variable "=" expression`
    fn var_decl(&mut self) -> Result<Statement> {
        let span = self.current_span();
        self.advance(); // 'def'
        let name = self.expect_variable_name()?;
        self.expect_operator(Operator::Equal)?;
        let init = self.expression()?;
        Ok(Statement {
            kind: StatementKind::VarDecl { name, init },
            span,
        })
    }

    /// `variable "=" expression`
    fn assign(&mut self) -> Result<Statement> {
        let span = self.current_span();
        let name = self.expect_variable_name()?;
        self.expect_operator(Operator::Equal)?;
        let value = self.expression()?;
        Ok(Statement {
            kind: StatementKind::Assign { name, value },
            span,
        })
    }

    /// `"if" expression "then"? statement* ("else" statement*)? "endif"`
    fn if_stmt(&mut self) -> Result<Statement> {
        let span = self.current_span();
        self.advance(); // 'if'
        let condition = self.expression()?;
        if self.check_keyword(Keyword::Then) {
            self.advance();
        }
        let then_block = self.parse_block(|k| {
            matches!(
                k,
                TokenKind::Keyword(Keyword::Else) | TokenKind::Keyword(Keyword::Endif)
            )
        });
        let else_block = if self.check_keyword(Keyword::Else) {
            self.advance();
            Some(self.parse_block(|k| matches!(k, TokenKind::Keyword(Keyword::Endif))))
        } else {
            None
        };
        self.expect_keyword(Keyword::Endif)?;
        Ok(Statement {
            kind: StatementKind::If {
                condition,
                then_block,
                else_block,
            },
            span,
        })
    }

    /// `"while" expression statement* "endwhile"`
    fn while_stmt(&mut self) -> Result<Statement> {
        let span = self.current_span();
        self.advance(); // 'while'
        let condition = self.expression()?;
        let body = self.parse_block(|k| matches!(k, TokenKind::Keyword(Keyword::Endwhile)));
        self.expect_keyword(Keyword::Endwhile)?;
        Ok(Statement {
            kind: StatementKind::While { condition, body },
            span,
        })
    }

    /// `"repeat" expression statement* "endrepeat"`
    fn repeat_stmt(&mut self) -> Result<Statement> {
        let span = self.current_span();
        self.advance(); // 'repeat'
        let count = self.expression()?;
        let body = self.parse_block(|k| matches!(k, TokenKind::Keyword(Keyword::Endrepeat)));
        self.expect_keyword(Keyword::Endrepeat)?;
        Ok(Statement {
            kind: StatementKind::Repeat { count, body },
            span,
        })
    }

    /// `"for" variable "=" expression "to" expression statement* "endfor"`
    fn for_stmt(&mut self) -> Result<Statement> {
        let span = self.current_span();
        self.advance(); // 'for'
        let var = self.expect_variable_name()?;
        self.expect_operator(Operator::Equal)?;
        let from = self.expression()?;
        self.expect_keyword(Keyword::To)?;
        let to = self.expression()?;
        let body = self.parse_block(|k| matches!(k, TokenKind::Keyword(Keyword::Endfor)));
        self.expect_keyword(Keyword::Endfor)?;
        Ok(Statement {
            kind: StatementKind::For {
                var,
                from,
                to,
                body,
            },
            span,
        })
    }

    /// `"function" identifier "(" params? ")" statement* "endfunction"`
    fn function_decl(&mut self) -> Result<Statement> {
        let span = self.current_span();
        self.advance(); // 'function'
        let name = self.expect_identifier()?;
        self.expect_punctuation(Punctuation::LeftParen)?;
        let mut params = Vec::new();
        if !self.check_punctuation(Punctuation::RightParen) {
            params.push(self.expect_identifier()?);
            while self.check_punctuation(Punctuation::Comma) {
                self.advance();
                params.push(self.expect_identifier()?);
            }
        }
        self.expect_punctuation(Punctuation::RightParen)?;
        let body = self.parse_block(|k| matches!(k, TokenKind::Keyword(Keyword::Endfunction)));
        self.expect_keyword(Keyword::Endfunction)?;
        Ok(Statement {
            kind: StatementKind::FunctionDecl {
                name,
                params,
                body,
            },
            span,
        })
    }

    /// `"return" expression?`
    fn return_stmt(&mut self) -> Result<Statement> {
        let span = self.current_span();
        self.advance(); // 'return'
        let value = if can_start_expression(self.peek_kind()) {
            Some(self.expression()?)
        } else {
            None
        };
        Ok(Statement {
            kind: StatementKind::Return { value },
            span,
        })
    }

    /// `"try" statement* "catch" variable statement* "endtry"`
    fn try_stmt(&mut self) -> Result<Statement> {
        let span = self.current_span();
        self.advance(); // 'try'
        let body = self.parse_block(|k| matches!(k, TokenKind::Keyword(Keyword::Catch)));
        self.expect_keyword(Keyword::Catch)?;
        let catch_var = self.expect_variable_name()?;
        let catch_body = self.parse_block(|k| matches!(k, TokenKind::Keyword(Keyword::Endtry)));
        self.expect_keyword(Keyword::Endtry)?;
        Ok(Statement {
            kind: StatementKind::Try {
                body,
                catch_var,
                catch_body,
            },
            span,
        })
    }

    /// `"switch" expression ("case" literal statement*)* ("default" statement*)? "endswitch"`
    fn switch_stmt(&mut self) -> Result<Statement> {
        let span = self.current_span();
        self.advance(); // 'switch'
        let discriminant = self.expression()?;
        self.skip_newlines();

        let mut cases = Vec::new();
        while self.check_keyword(Keyword::Case) {
            self.advance();
            let value = self.case_label()?;
            let body = self.parse_block(|k| {
                matches!(
                    k,
                    TokenKind::Keyword(Keyword::Case)
                        | TokenKind::Keyword(Keyword::Default)
                        | TokenKind::Keyword(Keyword::Endswitch)
                )
            });
            cases.push((value, body));
        }

        let default_body = if self.check_keyword(Keyword::Default) {
            self.advance();
            Some(self.parse_block(|k| matches!(k, TokenKind::Keyword(Keyword::Endswitch))))
        } else {
            None
        };

        self.expect_keyword(Keyword::Endswitch)?;
        Ok(Statement {
            kind: StatementKind::Switch {
                discriminant,
                cases,
                default_body,
            },
            span,
        })
    }

    /// `host_verb argument*` — arguments are parsed as full expressions,
    /// one per syntactic argument; the loop keeps consuming them as long as
    /// the next token could start a new one (see `can_start_expression`),
    /// which lets `say "hi " + name` parse as one argument while
    /// `goto 10 20` parses as two.
    fn host_call(&mut self) -> Result<Statement> {
        let span = self.current_span();
        let verb = match self.advance().kind {
            TokenKind::Keyword(k) => k.verb_name().to_string(),
            _ => unreachable!("host_call only dispatched on a verb keyword"),
        };
        let mut args = Vec::new();
        while can_start_expression(self.peek_kind()) {
            args.push(self.expression()?);
        }
        Ok(Statement {
            kind: StatementKind::HostCall { verb, args },
            span,
        })
    }

    fn expression_stmt(&mut self) -> Result<Statement> {
        let span = self.current_span();
        let expr = self.expression()?;
        Ok(Statement {
            kind: StatementKind::ExpressionStatement(expr),
            span,
        })
    }

    /// A literal-only expression, used for `switch`/`case` labels (§9:
    /// case labels are literals only, for determinism). A leading `-` is
    /// accepted so negative numeric labels still work.
    fn case_label(&mut self) -> Result<Expression> {
        let span = self.current_span();
        let negative = if self.check_operator(Operator::Minus) {
            self.advance();
            true
        } else {
            false
        };
        let kind = match self.peek_kind().clone() {
            TokenKind::Integer(n) => {
                self.advance();
                ExpressionKind::Literal(Value::Integer(if negative { -n } else { n }))
            }
            TokenKind::Float(n) => {
                self.advance();
                ExpressionKind::Literal(Value::Float(if negative { -n } else { n }))
            }
            TokenKind::String(s) if !negative => {
                self.advance();
                ExpressionKind::Literal(Value::String(s))
            }
            TokenKind::Keyword(Keyword::True) if !negative => {
                self.advance();
                ExpressionKind::Literal(Value::Bool(true))
            }
            TokenKind::Keyword(Keyword::False) if !negative => {
                self.advance();
                ExpressionKind::Literal(Value::Bool(false))
            }
            TokenKind::Keyword(Keyword::Null) if !negative => {
                self.advance();
                ExpressionKind::Literal(Value::Null)
            }
            other => return Err(self.error(format!("expected a literal case label, found {}", other))),
        };
        Ok(Expression { kind, span })
    }

    /// Parses statements until `is_terminator` matches the current token
    /// (or EOF), skipping blank lines between them.
    fn parse_block(&mut self, is_terminator: impl Fn(&TokenKind) -> bool) -> Vec<Statement> {
        let mut stmts = Vec::new();
        self.skip_newlines();
        while !self.is_at_end() && !is_terminator(self.peek_kind()) {
            match self.statement() {
                Ok(stmt) => stmts.push(stmt),
                Err(_) => self.synchronize(),
            }
            self.skip_newlines();
        }
        stmts
    }

    // ---- expressions, lowest to highest precedence --------------------

    fn expression(&mut self) -> Result<Expression> {
        self.or_expr()
    }

    fn or_expr(&mut self) -> Result<Expression> {
        let mut expr = self.and_expr()?;
        while self.check_keyword(Keyword::Or) {
            self.advance();
            let right = self.and_expr()?;
            expr = self.binary(BinaryOperator::Or, expr, right);
        }
        Ok(expr)
    }

    fn and_expr(&mut self) -> Result<Expression> {
        let mut expr = self.equality()?;
        while self.check_keyword(Keyword::And) {
            self.advance();
            let right = self.equality()?;
            expr = self.binary(BinaryOperator::And, expr, right);
        }
        Ok(expr)
    }

    fn equality(&mut self) -> Result<Expression> {
        let mut expr = self.comparison()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Operator(Operator::EqualEqual) => BinaryOperator::Equal,
                TokenKind::Operator(Operator::NotEqual) => BinaryOperator::NotEqual,
                _ => break,
            };
            self.advance();
            let right = self.comparison()?;
            expr = self.binary(op, expr, right);
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Expression> {
        let mut expr = self.term()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Operator(Operator::Less) => BinaryOperator::Less,
                TokenKind::Operator(Operator::Greater) => BinaryOperator::Greater,
                TokenKind::Operator(Operator::LessEqual) => BinaryOperator::LessEqual,
                TokenKind::Operator(Operator::GreaterEqual) => BinaryOperator::GreaterEqual,
                _ => break,
            };
            self.advance();
            let right = self.term()?;
            expr = self.binary(op, expr, right);
        }
        Ok(expr)
    }

    fn term(&mut self) -> Result<Expression> {
        let mut expr = self.factor()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Operator(Operator::Plus) => BinaryOperator::Add,
                TokenKind::Operator(Operator::Minus) => BinaryOperator::Subtract,
                _ => break,
            };
            self.advance();
            let right = self.factor()?;
            expr = self.binary(op, expr, right);
        }
        Ok(expr)
    }

    fn factor(&mut self) -> Result<Expression> {
        let mut expr = self.unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Operator(Operator::Star) => BinaryOperator::Multiply,
                TokenKind::Operator(Operator::Slash) => BinaryOperator::Divide,
                TokenKind::Operator(Operator::Percent) => BinaryOperator::Modulo,
                _ => break,
            };
            self.advance();
            let right = self.unary()?;
            expr = self.binary(op, expr, right);
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expression> {
        let span = self.current_span();
        if self.check_operator(Operator::Minus) {
            self.advance();
            let operand = self.unary()?;
            return Ok(Expression {
                kind: ExpressionKind::Unary {
                    operator: UnaryOperator::Negate,
                    operand: Box::new(operand),
                },
                span,
            });
        }
        if self.check_keyword(Keyword::Not) {
            self.advance();
            let operand = self.unary()?;
            return Ok(Expression {
                kind: ExpressionKind::Unary {
                    operator: UnaryOperator::Not,
                    operand: Box::new(operand),
                },
                span,
            });
        }
        self.call()
    }

    /// `primary ( "(" args? ")" )*`
    fn call(&mut self) -> Result<Expression> {
        let mut expr = self.primary()?;
        while self.check_punctuation(Punctuation::LeftParen) {
            let span = expr.span;
            self.advance(); // '('
            let mut args = Vec::new();
            if !self.check_punctuation(Punctuation::RightParen) {
                args.push(self.expression()?);
                while self.check_punctuation(Punctuation::Comma) {
                    self.advance();
                    args.push(self.expression()?);
                }
            }
            self.expect_punctuation(Punctuation::RightParen)?;
            expr = Expression {
                kind: ExpressionKind::Call {
                    callee: Box::new(expr),
                    args,
                },
                span,
            };
        }
        Ok(expr)
    }

    fn primary(&mut self) -> Result<Expression> {
        let span = self.current_span();
        let kind = match self.peek_kind().clone() {
            TokenKind::Integer(n) => {
                self.advance();
                ExpressionKind::Literal(Value::Integer(n))
            }
            TokenKind::Float(n) => {
                self.advance();
                ExpressionKind::Literal(Value::Float(n))
            }
            TokenKind::String(s) => {
                self.advance();
                ExpressionKind::Literal(Value::String(s))
            }
            TokenKind::Keyword(Keyword::True) => {
                self.advance();
                ExpressionKind::Literal(Value::Bool(true))
            }
            TokenKind::Keyword(Keyword::False) => {
                self.advance();
                ExpressionKind::Literal(Value::Bool(false))
            }
            TokenKind::Keyword(Keyword::Null) => {
                self.advance();
                ExpressionKind::Literal(Value::Null)
            }
            TokenKind::Variable(name) => {
                self.advance();
                ExpressionKind::Variable(name)
            }
            TokenKind::Identifier(name) => {
                self.advance();
                ExpressionKind::Variable(name)
            }
            TokenKind::Punctuation(Punctuation::LeftParen) => {
                self.advance();
                let inner = self.expression()?;
                self.expect_punctuation(Punctuation::RightParen)?;
                ExpressionKind::Grouping(Box::new(inner))
            }
            other => return Err(self.error(format!("unexpected token {}", other))),
        };
        Ok(Expression { kind, span })
    }

    fn binary(&self, operator: BinaryOperator, left: Expression, right: Expression) -> Expression {
        let span = left.span;
        Expression {
            kind: ExpressionKind::Binary {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        }
    }

    // ---- token stream plumbing -----------------------------------------

    fn peek_kind(&self) -> &TokenKind {
        &self.tokens[self.current].kind
    }

    fn peek_ahead_is_assignment(&self) -> bool {
        matches!(
            self.tokens.get(self.current + 1).map(|t| &t.kind),
            Some(TokenKind::Operator(Operator::Equal))
        )
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.current].clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    fn check_keyword(&self, kw: Keyword) -> bool {
        matches!(self.peek_kind(), TokenKind::Keyword(k) if *k == kw)
    }

    fn check_operator(&self, op: Operator) -> bool {
        matches!(self.peek_kind(), TokenKind::Operator(o) if *o == op)
    }

    fn check_punctuation(&self, p: Punctuation) -> bool {
        matches!(self.peek_kind(), TokenKind::Punctuation(x) if *x == p)
    }

    fn skip_newlines(&mut self) {
        while matches!(self.peek_kind(), TokenKind::Newline) {
            self.advance();
        }
    }

    fn current_span(&self) -> Span {
        let token = &self.tokens[self.current];
        Span::new(token.line, token.column, token.byte_offset, token.lexeme.len())
    }

    fn expect_keyword(&mut self, kw: Keyword) -> Result<()> {
        if self.check_keyword(kw) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(format!("expected '{:?}', found {}", kw, self.peek_kind())))
        }
    }

    fn expect_operator(&mut self, op: Operator) -> Result<()> {
        if self.check_operator(op) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(format!("expected '{:?}', found {}", op, self.peek_kind())))
        }
    }

    fn expect_punctuation(&mut self, p: Punctuation) -> Result<()> {
        if self.check_punctuation(p) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(format!("expected '{:?}', found {}", p, self.peek_kind())))
        }
    }

    fn expect_variable_name(&mut self) -> Result<String> {
        match self.peek_kind().clone() {
            TokenKind::Variable(name) => {
                self.advance();
                Ok(name)
            }
            other => Err(self.error(format!("expected a variable, found {}", other))),
        }
    }

    fn expect_identifier(&mut self) -> Result<String> {
        match self.peek_kind().clone() {
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(name)
            }
            other => Err(self.error(format!("expected an identifier, found {}", other))),
        }
    }

    fn error(&mut self, message: impl Into<String>) -> BotScriptError {
        let message = message.into();
        self.diagnostics.push(Diagnostic::new(self.current_span(), message.clone()));
        BotScriptError::ParseError(message)
    }

    /// Discards tokens up to the next statement boundary: a newline, a
    /// block-closing keyword, or EOF. Never aborts parsing.
    fn synchronize(&mut self) {
        while !self.is_at_end() {
            match self.peek_kind() {
                TokenKind::Newline => {
                    self.advance();
                    return;
                }
                k if is_block_closer(k) => return,
                _ => {
                    self.advance();
                }
            }
        }
    }
}

fn can_start_expression(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Integer(_)
            | TokenKind::Float(_)
            | TokenKind::String(_)
            | TokenKind::Variable(_)
            | TokenKind::Identifier(_)
            | TokenKind::Keyword(Keyword::True)
            | TokenKind::Keyword(Keyword::False)
            | TokenKind::Keyword(Keyword::Null)
            | TokenKind::Keyword(Keyword::Not)
            | TokenKind::Operator(Operator::Minus)
            | TokenKind::Punctuation(Punctuation::LeftParen)
    )
}

fn is_block_closer(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Keyword(Keyword::Else)
            | TokenKind::Keyword(Keyword::Endif)
            | TokenKind::Keyword(Keyword::Endwhile)
            | TokenKind::Keyword(Keyword::Endrepeat)
            | TokenKind::Keyword(Keyword::Endfor)
            | TokenKind::Keyword(Keyword::Endfunction)
            | TokenKind::Keyword(Keyword::Catch)
            | TokenKind::Keyword(Keyword::Endtry)
            | TokenKind::Keyword(Keyword::Case)
            | TokenKind::Keyword(Keyword::Default)
            | TokenKind::Keyword(Keyword::Endswitch)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse(source: &str) -> (Program, Vec<Diagnostic>) {
        let (tokens, _) = Lexer::new(source).tokenize();
        Parser::new(tokens).parse()
    }

    #[test]
    fn arithmetic_precedence_nests_multiply_under_add() {
        let (program, diagnostics) = parse("def $x = 1 + 2 * 3");
        assert!(diagnostics.is_empty());
        match &program.statements[0].kind {
            StatementKind::VarDecl { init, .. } => match &init.kind {
                ExpressionKind::Binary {
                    operator: BinaryOperator::Add,
                    right,
                    ..
                } => {
                    assert!(matches!(
                        right.kind,
                        ExpressionKind::Binary {
                            operator: BinaryOperator::Multiply,
                            ..
                        }
                    ));
                }
                other => panic!("expected a top-level add, got {:?}", other),
            },
            other => panic!("expected a var_decl, got {:?}", other),
        }
    }

    #[test]
    fn host_call_with_binary_expression_is_one_argument() {
        let (program, diagnostics) = parse("say \"hi \" + name");
        assert!(diagnostics.is_empty());
        match &program.statements[0].kind {
            StatementKind::HostCall { verb, args } => {
                assert_eq!(verb, "say");
                assert_eq!(args.len(), 1);
            }
            other => panic!("expected a host_call, got {:?}", other),
        }
    }

    #[test]
    fn host_call_with_space_separated_literals_is_multiple_arguments() {
        let (program, diagnostics) = parse("goto 10 20");
        assert!(diagnostics.is_empty());
        match &program.statements[0].kind {
            StatementKind::HostCall { verb, args } => {
                assert_eq!(verb, "goto");
                assert_eq!(args.len(), 2);
            }
            other => panic!("expected a host_call, got {:?}", other),
        }
    }

    #[test]
    fn if_without_endif_recovers_with_a_diagnostic() {
        let (_, diagnostics) = parse("if $x > 0 then\nsay \"hi\"\n");
        assert!(!diagnostics.is_empty());
    }

    #[test]
    fn parse_is_deterministic_for_the_same_tokens() {
        let source = "while $count < 3\n  say \"hello\"\n  $count = $count + 1\nendwhile";
        let (a, _) = parse(source);
        let (b, _) = parse(source);
        assert_eq!(a, b);
    }

    #[test]
    fn function_decl_and_call_round_trip() {
        let (program, diagnostics) = parse(
            "function greet(name)\n  say \"hi \" + name\nendfunction\ngreet(\"world\")",
        );
        assert!(diagnostics.is_empty());
        assert_eq!(program.statements.len(), 2);
        assert!(matches!(
            program.statements[0].kind,
            StatementKind::FunctionDecl { .. }
        ));
        match &program.statements[1].kind {
            StatementKind::ExpressionStatement(expr) => {
                assert!(matches!(expr.kind, ExpressionKind::Call { .. }));
            }
            other => panic!("expected an expression statement, got {:?}", other),
        }
    }

    #[test]
    fn switch_case_labels_are_literals_only() {
        let (_, diagnostics) = parse("switch $x\ncase 1\n  say \"one\"\nendswitch");
        assert!(diagnostics.is_empty());
    }
}
