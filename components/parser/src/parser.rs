//! Parser for script source code
//!
//! Statements are parsed by recursive descent. Expressions use precedence
//! climbing over the table in [`crate::precedence`]. The lexer is driven
//! one token at a time with the grammar that fits the current position,
//! so `/` after an operand is division and `?.` only appears after one.

use crate::ast::*;
use crate::error::{syntax_error, unexpected_eof, unexpected_token};
use crate::lexer::{Grammar, Keyword, Lexer, Punctuator, Token, TokenKind};
use crate::precedence::{self, infix_operator, InfixOperator, OperatorInfo};
use crate::scope::ScopeTracker;
use core_types::{ensure_sufficient_stack, JsError, SourcePosition};
use std::rc::Rc;
use tracing::debug;

/// Script parser
pub struct Parser {
    lexer: Lexer,
    scopes: ScopeTracker,
    loop_depth: usize,
    function_depth: usize,
}

impl Parser {
    /// Create a new parser for the given source
    pub fn new(source: &str) -> Self {
        Self {
            lexer: Lexer::new(source),
            scopes: ScopeTracker::new(),
            loop_depth: 0,
            function_depth: 0,
        }
    }

    /// Parse the whole source as a program
    #[tracing::instrument(skip(self), level = "debug")]
    pub fn parse_program(&mut self) -> Result<Program, JsError> {
        let mut body = Vec::new();
        loop {
            let token = self.lexer.peek_token(Grammar::Statement)?;
            if token.kind == TokenKind::EOF {
                break;
            }
            body.push(self.parse_statement()?);
        }
        let scope = self.scopes.exit();
        debug!(
            statements = body.len(),
            vars = scope.vars.len(),
            lexicals = scope.lets.len() + scope.consts.len(),
            "parsed program"
        );
        Ok(Program { body, scope })
    }

    // ---------------------------------------------------------------------
    // Statements
    // ---------------------------------------------------------------------

    fn parse_statement(&mut self) -> Result<Statement, JsError> {
        ensure_sufficient_stack(|| self.parse_statement_inner())
    }

    fn parse_statement_inner(&mut self) -> Result<Statement, JsError> {
        let token = self.lexer.peek_token(Grammar::Statement)?;
        let position = token.start;

        match token.kind {
            TokenKind::Keyword(Keyword::Var) => self.parse_variable_declaration(VariableKind::Var),
            TokenKind::Keyword(Keyword::Let) => self.parse_variable_declaration(VariableKind::Let),
            TokenKind::Keyword(Keyword::Const) => {
                self.parse_variable_declaration(VariableKind::Const)
            }
            TokenKind::Keyword(Keyword::Function) => self.parse_function_declaration(),
            TokenKind::Keyword(Keyword::Return) => self.parse_return_statement(),
            TokenKind::Keyword(Keyword::If) => self.parse_if_statement(),
            TokenKind::Keyword(Keyword::While) => self.parse_while_statement(),
            TokenKind::Keyword(Keyword::Do) => self.parse_do_while_statement(),
            TokenKind::Keyword(Keyword::Break) => self.parse_break_continue(true),
            TokenKind::Keyword(Keyword::Continue) => self.parse_break_continue(false),
            TokenKind::Keyword(Keyword::Throw) => self.parse_throw_statement(),
            TokenKind::Keyword(Keyword::With) => self.parse_with_statement(),
            TokenKind::Keyword(Keyword::Debugger) => self.parse_debugger_statement(),
            TokenKind::Keyword(Keyword::Reserved(word)) => Err(unsupported(word, position)),
            TokenKind::Punctuator(Punctuator::LBrace) => self.parse_block_statement(),
            TokenKind::Punctuator(Punctuator::Semicolon) => {
                self.lexer.next_token(Grammar::Statement)?;
                Ok(Statement::EmptyStatement { position })
            }
            _ => self.parse_expression_statement(),
        }
    }

    /// Body of `if`, `while`, `do` and `with`, where declarations are not allowed
    fn parse_substatement(&mut self) -> Result<Statement, JsError> {
        let token = self.lexer.peek_token(Grammar::Statement)?;
        match token.kind {
            TokenKind::Keyword(Keyword::Let)
            | TokenKind::Keyword(Keyword::Const)
            | TokenKind::Keyword(Keyword::Function) => Err(syntax_error(
                format!(
                    "{} declaration is not allowed in a single-statement context",
                    token.raw
                ),
                Some(token.start),
            )),
            _ => self.parse_statement(),
        }
    }

    fn parse_variable_declaration(&mut self, kind: VariableKind) -> Result<Statement, JsError> {
        let keyword = self.lexer.next_token(Grammar::Statement)?;
        let mut declarations = Vec::new();

        loop {
            let (name, position) = self.expect_binding_identifier()?;
            let init = if self.eat_punctuator(Punctuator::Assign, Grammar::Infix)? {
                Some(self.parse_assignment_expression()?)
            } else {
                None
            };
            if kind == VariableKind::Const && init.is_none() {
                return Err(syntax_error(
                    "Missing initializer in const declaration",
                    Some(position),
                ));
            }
            self.scopes.declare(&name, kind, position)?;
            declarations.push(VariableDeclarator {
                name,
                init,
                position,
            });

            if !self.eat_punctuator(Punctuator::Comma, Grammar::Infix)? {
                break;
            }
        }

        self.consume_semicolon()?;
        Ok(Statement::VariableDeclaration {
            kind,
            declarations,
            position: keyword.start,
        })
    }

    fn parse_function_declaration(&mut self) -> Result<Statement, JsError> {
        let keyword = self.lexer.next_token(Grammar::Statement)?;
        let (name, name_position) = self.expect_binding_identifier()?;
        self.scopes.declare(&name, VariableKind::Var, name_position)?;
        let function = self.parse_function_rest(Some(name), keyword.start)?;
        Ok(Statement::FunctionDeclaration {
            function: Rc::new(function),
            position: keyword.start,
        })
    }

    fn parse_return_statement(&mut self) -> Result<Statement, JsError> {
        let keyword = self.lexer.next_token(Grammar::Statement)?;
        if self.function_depth == 0 {
            return Err(syntax_error("Illegal return statement", Some(keyword.start)));
        }
        let argument = if self.at_statement_end()? {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume_semicolon()?;
        Ok(Statement::ReturnStatement {
            argument,
            position: keyword.start,
        })
    }

    fn parse_if_statement(&mut self) -> Result<Statement, JsError> {
        let keyword = self.lexer.next_token(Grammar::Statement)?;
        self.expect_punctuator(Punctuator::LParen, Grammar::Prefix)?;
        let test = self.parse_expression()?;
        self.expect_punctuator(Punctuator::RParen, Grammar::Infix)?;
        let consequent = Box::new(self.parse_substatement()?);

        let alternate = if self.lexer.peek_token(Grammar::Statement)?.is_keyword(Keyword::Else) {
            self.lexer.next_token(Grammar::Statement)?;
            Some(Box::new(self.parse_substatement()?))
        } else {
            None
        };

        Ok(Statement::IfStatement {
            test,
            consequent,
            alternate,
            position: keyword.start,
        })
    }

    fn parse_while_statement(&mut self) -> Result<Statement, JsError> {
        let keyword = self.lexer.next_token(Grammar::Statement)?;
        self.expect_punctuator(Punctuator::LParen, Grammar::Prefix)?;
        let test = self.parse_expression()?;
        self.expect_punctuator(Punctuator::RParen, Grammar::Infix)?;
        let body = Box::new(self.parse_loop_body()?);
        Ok(Statement::WhileStatement {
            test,
            body,
            position: keyword.start,
        })
    }

    fn parse_do_while_statement(&mut self) -> Result<Statement, JsError> {
        let keyword = self.lexer.next_token(Grammar::Statement)?;
        let body = Box::new(self.parse_loop_body()?);
        self.expect_keyword(Keyword::While)?;
        self.expect_punctuator(Punctuator::LParen, Grammar::Prefix)?;
        let test = self.parse_expression()?;
        self.expect_punctuator(Punctuator::RParen, Grammar::Infix)?;

        // The semicolon after `do ... while (x)` is always optional
        let token = self.lexer.next_token(Grammar::Terminal)?;
        if !token.is_punctuator(Punctuator::Semicolon) {
            self.lexer.rewind();
        }

        Ok(Statement::DoWhileStatement {
            body,
            test,
            position: keyword.start,
        })
    }

    fn parse_loop_body(&mut self) -> Result<Statement, JsError> {
        self.loop_depth += 1;
        let body = self.parse_substatement();
        self.loop_depth -= 1;
        body
    }

    fn parse_break_continue(&mut self, is_break: bool) -> Result<Statement, JsError> {
        let keyword = self.lexer.next_token(Grammar::Statement)?;
        if self.loop_depth == 0 {
            let message = if is_break {
                "Illegal break statement"
            } else {
                "Illegal continue statement: no surrounding iteration statement"
            };
            return Err(syntax_error(message, Some(keyword.start)));
        }

        let next = self.lexer.peek_token(Grammar::Terminal)?;
        if let TokenKind::Identifier(_) = next.kind {
            return Err(syntax_error(
                format!("Labeled {} is not supported", keyword.raw),
                Some(next.start),
            ));
        }
        self.consume_semicolon()?;

        let position = keyword.start;
        Ok(if is_break {
            Statement::BreakStatement { position }
        } else {
            Statement::ContinueStatement { position }
        })
    }

    fn parse_throw_statement(&mut self) -> Result<Statement, JsError> {
        let keyword = self.lexer.next_token(Grammar::Statement)?;
        let next = self.lexer.peek_token(Grammar::Prefix)?;
        if next.newline_before {
            return Err(syntax_error("Illegal newline after throw", Some(next.start)));
        }
        let argument = self.parse_expression()?;
        self.consume_semicolon()?;
        Ok(Statement::ThrowStatement {
            argument,
            position: keyword.start,
        })
    }

    fn parse_with_statement(&mut self) -> Result<Statement, JsError> {
        let keyword = self.lexer.next_token(Grammar::Statement)?;
        self.expect_punctuator(Punctuator::LParen, Grammar::Prefix)?;
        let object = self.parse_expression()?;
        self.expect_punctuator(Punctuator::RParen, Grammar::Infix)?;
        let body = Box::new(self.parse_substatement()?);
        Ok(Statement::WithStatement {
            object,
            body,
            position: keyword.start,
        })
    }

    fn parse_debugger_statement(&mut self) -> Result<Statement, JsError> {
        let keyword = self.lexer.next_token(Grammar::Statement)?;
        self.consume_semicolon()?;
        Ok(Statement::DebuggerStatement {
            position: keyword.start,
        })
    }

    fn parse_block_statement(&mut self) -> Result<Statement, JsError> {
        let open = self.lexer.next_token(Grammar::Statement)?;
        self.scopes.enter_block();
        let result = self.parse_statements_until_rbrace();
        let scope = self.scopes.exit();
        let (body, _) = result?;
        Ok(Statement::BlockStatement {
            body,
            scope,
            position: open.start,
        })
    }

    /// Statements up to and including the closing `}`
    fn parse_statements_until_rbrace(&mut self) -> Result<(Vec<Statement>, Token), JsError> {
        let mut body = Vec::new();
        loop {
            let token = self.lexer.peek_token(Grammar::Statement)?;
            match token.kind {
                TokenKind::Punctuator(Punctuator::RBrace) => {
                    let close = self.lexer.next_token(Grammar::Statement)?;
                    return Ok((body, close));
                }
                TokenKind::EOF => return Err(unexpected_eof(Some(token.start))),
                _ => body.push(self.parse_statement()?),
            }
        }
    }

    fn parse_expression_statement(&mut self) -> Result<Statement, JsError> {
        let expression = self.parse_expression()?;
        let position = expression.position();

        if let Expression::Identifier { .. } = expression {
            let next = self.lexer.peek_token(Grammar::Infix)?;
            if next.is_punctuator(Punctuator::Colon) {
                return Err(syntax_error(
                    "Labeled statements are not supported",
                    Some(next.start),
                ));
            }
        }

        self.consume_semicolon()?;
        Ok(Statement::ExpressionStatement {
            expression,
            position,
        })
    }

    // ---------------------------------------------------------------------
    // Functions
    // ---------------------------------------------------------------------

    /// Parameter list and body. `start` is where the function's source text begins.
    fn parse_function_rest(
        &mut self,
        name: Option<String>,
        start: SourcePosition,
    ) -> Result<FunctionDefinition, JsError> {
        self.expect_punctuator(Punctuator::LParen, Grammar::Prefix)?;

        self.scopes.enter_function();
        let saved_loop_depth = std::mem::replace(&mut self.loop_depth, 0);
        self.function_depth += 1;
        let result = self.parse_params_and_body();
        self.function_depth -= 1;
        self.loop_depth = saved_loop_depth;
        let scope = self.scopes.exit();

        let (params, body, end) = result?;
        Ok(FunctionDefinition {
            name,
            params,
            body,
            scope,
            source: self.lexer.slice(start.offset, end),
            position: start,
        })
    }

    fn parse_params_and_body(
        &mut self,
    ) -> Result<(Vec<Parameter>, Vec<Statement>, usize), JsError> {
        let mut params = Vec::new();

        if !self.eat_punctuator(Punctuator::RParen, Grammar::Prefix)? {
            loop {
                let (name, position) = self.expect_binding_identifier()?;
                self.scopes.declare(&name, VariableKind::Var, position)?;
                let default = if self.eat_punctuator(Punctuator::Assign, Grammar::Infix)? {
                    Some(self.parse_assignment_expression()?)
                } else {
                    None
                };
                params.push(Parameter { name, default });

                let token = self.lexer.next_token(Grammar::Infix)?;
                match token.kind {
                    TokenKind::Punctuator(Punctuator::RParen) => break,
                    TokenKind::Punctuator(Punctuator::Comma) => {
                        if self.eat_punctuator(Punctuator::RParen, Grammar::Prefix)? {
                            break;
                        }
                    }
                    _ => return Err(expected("',' or ')'", &token)),
                }
            }
        }

        self.expect_punctuator(Punctuator::LBrace, Grammar::Statement)?;
        let (body, close) = self.parse_statements_until_rbrace()?;
        Ok((params, body, close.end))
    }

    // ---------------------------------------------------------------------
    // Expressions
    // ---------------------------------------------------------------------

    /// Full expression, including the comma operator
    fn parse_expression(&mut self) -> Result<Expression, JsError> {
        self.parse_expression_with(0)
    }

    /// Expression without a top-level comma: arguments, elements, initializers
    fn parse_assignment_expression(&mut self) -> Result<Expression, JsError> {
        self.parse_expression_with(precedence::COMMA)
    }

    /// Parse an operand and then every operator binding tighter than
    /// `min_precedence`.
    fn parse_expression_with(&mut self, min_precedence: u8) -> Result<Expression, JsError> {
        ensure_sufficient_stack(|| {
            let mut left = self.parse_prefix()?;
            loop {
                let token = self.lexer.peek_token(Grammar::Infix)?;
                let Some(info) = infix_operator(&token.kind) else {
                    break;
                };
                if info.precedence <= min_precedence {
                    break;
                }
                // `a \n ++b` is two statements
                if matches!(info.operator, InfixOperator::Postfix(_)) && token.newline_before {
                    break;
                }
                left = self.parse_infix(left, info)?;
            }
            Ok(left)
        })
    }

    fn parse_infix(&mut self, left: Expression, info: OperatorInfo) -> Result<Expression, JsError> {
        let token = self.lexer.next_token(Grammar::Infix)?;
        let position = left.position();

        match info.operator {
            InfixOperator::Postfix(increment) => {
                if !left.is_simple_target() {
                    return Err(syntax_error(
                        "Invalid left-hand side expression in postfix operation",
                        Some(token.start),
                    ));
                }
                Ok(Expression::UpdateExpression {
                    operator: update_operator(increment),
                    argument: Box::new(left),
                    prefix: false,
                    position,
                })
            }

            InfixOperator::Assign | InfixOperator::CompoundAssign(_) => {
                if !left.is_simple_target() {
                    return Err(syntax_error(
                        "Invalid left-hand side in assignment",
                        Some(token.start),
                    ));
                }
                let value = self.parse_expression_with(info.right_operand_threshold())?;
                let operator = match info.operator {
                    InfixOperator::CompoundAssign(op) => Some(op),
                    _ => None,
                };
                Ok(Expression::AssignmentExpression {
                    target: Box::new(left),
                    operator,
                    value: Box::new(value),
                    position,
                })
            }

            InfixOperator::Conditional => {
                let consequent = self.parse_assignment_expression()?;
                self.expect_punctuator(Punctuator::Colon, Grammar::Infix)?;
                let alternate = self.parse_expression_with(info.right_operand_threshold())?;
                Ok(Expression::ConditionalExpression {
                    test: Box::new(left),
                    consequent: Box::new(consequent),
                    alternate: Box::new(alternate),
                    position,
                })
            }

            InfixOperator::Comma => {
                let right = self.parse_expression_with(info.right_operand_threshold())?;
                let expressions = match left {
                    Expression::SequenceExpression {
                        mut expressions, ..
                    } => {
                        expressions.push(right);
                        expressions
                    }
                    other => vec![other, right],
                };
                Ok(Expression::SequenceExpression {
                    expressions,
                    position,
                })
            }

            InfixOperator::LogicalAnd | InfixOperator::LogicalOr => {
                let right = self.parse_expression_with(info.right_operand_threshold())?;
                let operator = if info.operator == InfixOperator::LogicalAnd {
                    LogicalOperator::And
                } else {
                    LogicalOperator::Or
                };
                Ok(Expression::LogicalExpression {
                    left: Box::new(left),
                    operator,
                    right: Box::new(right),
                    position,
                })
            }

            InfixOperator::Binary(operator) => {
                if operator == BinaryOperator::Exp
                    && matches!(left, Expression::UnaryExpression { .. })
                {
                    return Err(syntax_error(
                        "Unary operator used immediately before exponentiation expression. \
                         Parenthesis must be used to disambiguate operator precedence",
                        Some(token.start),
                    ));
                }
                let right = self.parse_expression_with(info.right_operand_threshold())?;
                Ok(Expression::BinaryExpression {
                    left: Box::new(left),
                    operator,
                    right: Box::new(right),
                    position,
                })
            }

            InfixOperator::Access => {
                self.lexer.rewind();
                self.parse_access_chain(left)
            }
        }
    }

    /// `.name`, `?.name`, `[expr]`, `?.[expr]`, `(args)` and `?.(args)`
    /// links, as many as follow. A chain containing `?.` is wrapped in
    /// [`Expression::OptionalChain`].
    fn parse_access_chain(&mut self, mut object: Expression) -> Result<Expression, JsError> {
        let start = object.position();
        let mut has_optional = false;

        loop {
            let token = self.lexer.next_token(Grammar::Infix)?;
            object = match token.kind {
                TokenKind::Punctuator(Punctuator::Dot) => {
                    let property = self.parse_property_name()?;
                    member(object, property, false, false, token.start)
                }
                TokenKind::Punctuator(Punctuator::LBracket) => {
                    let property = self.parse_expression()?;
                    self.expect_punctuator(Punctuator::RBracket, Grammar::Infix)?;
                    member(object, property, true, false, token.start)
                }
                TokenKind::Punctuator(Punctuator::LParen) => {
                    let arguments = self.parse_arguments()?;
                    call(object, arguments, false, start)
                }
                TokenKind::Punctuator(Punctuator::OptionalChain) => {
                    has_optional = true;
                    let next = self.lexer.next_token(Grammar::Prefix)?;
                    match next.kind {
                        TokenKind::Punctuator(Punctuator::LBracket) => {
                            let property = self.parse_expression()?;
                            self.expect_punctuator(Punctuator::RBracket, Grammar::Infix)?;
                            member(object, property, true, true, token.start)
                        }
                        TokenKind::Punctuator(Punctuator::LParen) => {
                            let arguments = self.parse_arguments()?;
                            call(object, arguments, true, start)
                        }
                        TokenKind::Punctuator(Punctuator::Backtick) => {
                            return Err(syntax_error(
                                "Invalid tagged template on optional chain",
                                Some(next.start),
                            ));
                        }
                        _ => {
                            self.lexer.rewind();
                            let property = self.parse_property_name()?;
                            member(object, property, false, true, token.start)
                        }
                    }
                }
                _ => {
                    self.lexer.rewind();
                    break;
                }
            };
        }

        if has_optional {
            Ok(Expression::OptionalChain {
                expression: Box::new(object),
                position: start,
            })
        } else {
            Ok(object)
        }
    }

    /// Name after `.` or `?.`; keywords are allowed
    fn parse_property_name(&mut self) -> Result<Expression, JsError> {
        let token = self.lexer.next_token(Grammar::Prefix)?;
        let name = match token.kind {
            TokenKind::Identifier(name) => name,
            TokenKind::Keyword(_) => token.raw,
            TokenKind::EOF => return Err(unexpected_eof(Some(token.start))),
            _ => return Err(expected("property name", &token)),
        };
        Ok(Expression::Identifier {
            name,
            position: token.start,
        })
    }

    /// Call arguments after the opening `(`
    fn parse_arguments(&mut self) -> Result<Vec<Expression>, JsError> {
        let mut arguments = Vec::new();
        if self.eat_punctuator(Punctuator::RParen, Grammar::Prefix)? {
            return Ok(arguments);
        }
        loop {
            arguments.push(self.parse_assignment_expression()?);
            let token = self.lexer.next_token(Grammar::Infix)?;
            match token.kind {
                TokenKind::Punctuator(Punctuator::RParen) => break,
                TokenKind::Punctuator(Punctuator::Comma) => {
                    if self.eat_punctuator(Punctuator::RParen, Grammar::Prefix)? {
                        break;
                    }
                }
                TokenKind::EOF => return Err(unexpected_eof(Some(token.start))),
                _ => return Err(expected("',' or ')'", &token)),
            }
        }
        Ok(arguments)
    }

    /// Operand: a literal, identifier, prefix operation or bracketed form
    fn parse_prefix(&mut self) -> Result<Expression, JsError> {
        let token = self.lexer.next_token(Grammar::Prefix)?;
        let position = token.start;

        match token.kind {
            TokenKind::Number(n) => Ok(literal(Literal::Number(n), position)),
            TokenKind::String(s) => Ok(literal(Literal::String(s), position)),
            TokenKind::Identifier(name) => Ok(Expression::Identifier { name, position }),
            TokenKind::Keyword(Keyword::True) => Ok(literal(Literal::Boolean(true), position)),
            TokenKind::Keyword(Keyword::False) => Ok(literal(Literal::Boolean(false), position)),
            TokenKind::Keyword(Keyword::Null) => Ok(literal(Literal::Null, position)),

            TokenKind::Keyword(Keyword::Typeof) => {
                self.parse_unary(UnaryOperator::Typeof, position)
            }
            TokenKind::Keyword(Keyword::Void) => self.parse_unary(UnaryOperator::Void, position),
            TokenKind::Punctuator(Punctuator::Not) => {
                self.parse_unary(UnaryOperator::Not, position)
            }
            TokenKind::Punctuator(Punctuator::Tilde) => {
                self.parse_unary(UnaryOperator::BitwiseNot, position)
            }
            TokenKind::Punctuator(Punctuator::Plus) => {
                self.parse_unary(UnaryOperator::Plus, position)
            }
            TokenKind::Punctuator(Punctuator::Minus) => {
                self.parse_unary(UnaryOperator::Minus, position)
            }

            TokenKind::Punctuator(Punctuator::PlusPlus) => self.parse_prefix_update(true, position),
            TokenKind::Punctuator(Punctuator::MinusMinus) => {
                self.parse_prefix_update(false, position)
            }

            TokenKind::Keyword(Keyword::Function) => {
                let name = match self.lexer.peek_token(Grammar::Prefix)?.kind {
                    TokenKind::Identifier(name) => {
                        self.lexer.next_token(Grammar::Prefix)?;
                        Some(name)
                    }
                    _ => None,
                };
                let function = self.parse_function_rest(name, position)?;
                Ok(Expression::FunctionExpression {
                    function: Rc::new(function),
                    position,
                })
            }

            TokenKind::Keyword(Keyword::New) => self.parse_new_expression(position),

            TokenKind::Punctuator(Punctuator::LParen) => {
                let next = self.lexer.peek_token(Grammar::Prefix)?;
                if next.is_punctuator(Punctuator::RParen) {
                    return Err(syntax_error("Unexpected token ')'", Some(next.start)));
                }
                let expression = self.parse_expression()?;
                self.expect_punctuator(Punctuator::RParen, Grammar::Infix)?;
                Ok(Expression::ParenthesizedExpression {
                    expression: Box::new(expression),
                    position,
                })
            }

            TokenKind::Punctuator(Punctuator::LBracket) => self.parse_array_literal(position),
            TokenKind::Punctuator(Punctuator::LBrace) => self.parse_object_literal(position),
            TokenKind::Punctuator(Punctuator::Backtick) => self.parse_template_literal(position),

            TokenKind::Punctuator(Punctuator::Slash)
            | TokenKind::Punctuator(Punctuator::SlashEq) => {
                Err(syntax_error(
                    "Regular expression literals are not supported",
                    Some(position),
                ))
            }
            TokenKind::Keyword(Keyword::Reserved(word)) => Err(unsupported(word, position)),
            TokenKind::EOF => Err(unexpected_eof(Some(position))),
            _ => Err(expected("expression", &token)),
        }
    }

    fn parse_unary(
        &mut self,
        operator: UnaryOperator,
        position: SourcePosition,
    ) -> Result<Expression, JsError> {
        let argument = self.parse_expression_with(precedence::UNARY)?;
        Ok(Expression::UnaryExpression {
            operator,
            argument: Box::new(argument),
            position,
        })
    }

    fn parse_prefix_update(
        &mut self,
        increment: bool,
        position: SourcePosition,
    ) -> Result<Expression, JsError> {
        let argument = self.parse_expression_with(precedence::UNARY)?;
        if !argument.is_simple_target() {
            return Err(syntax_error(
                "Invalid left-hand side expression in prefix operation",
                Some(position),
            ));
        }
        Ok(Expression::UpdateExpression {
            operator: update_operator(increment),
            argument: Box::new(argument),
            prefix: true,
            position,
        })
    }

    /// `new Callee` or `new Callee(args)`. The callee takes member accesses
    /// but not calls, so `new a.b(c)` constructs `a.b`.
    fn parse_new_expression(&mut self, position: SourcePosition) -> Result<Expression, JsError> {
        let mut callee = if self.lexer.peek_token(Grammar::Prefix)?.is_keyword(Keyword::New) {
            let inner = self.lexer.next_token(Grammar::Prefix)?;
            self.parse_new_expression(inner.start)?
        } else {
            let operand = self.parse_prefix()?;
            if matches!(
                operand,
                Expression::UnaryExpression { .. } | Expression::UpdateExpression { .. }
            ) {
                return Err(syntax_error("Invalid constructor expression", Some(position)));
            }
            operand
        };

        loop {
            let token = self.lexer.next_token(Grammar::Infix)?;
            callee = match token.kind {
                TokenKind::Punctuator(Punctuator::Dot) => {
                    let property = self.parse_property_name()?;
                    member(callee, property, false, false, token.start)
                }
                TokenKind::Punctuator(Punctuator::LBracket) => {
                    let property = self.parse_expression()?;
                    self.expect_punctuator(Punctuator::RBracket, Grammar::Infix)?;
                    member(callee, property, true, false, token.start)
                }
                TokenKind::Punctuator(Punctuator::OptionalChain) => {
                    return Err(syntax_error(
                        "Invalid optional chain from new expression",
                        Some(token.start),
                    ));
                }
                _ => {
                    self.lexer.rewind();
                    break;
                }
            };
        }

        let arguments = if self.eat_punctuator(Punctuator::LParen, Grammar::Infix)? {
            self.parse_arguments()?
        } else {
            Vec::new()
        };

        Ok(Expression::NewExpression {
            callee: Box::new(callee),
            arguments,
            position,
        })
    }

    /// Array literal after `[`. A comma directly after `[` or after another
    /// comma leaves a hole; one trailing comma adds nothing.
    fn parse_array_literal(&mut self, position: SourcePosition) -> Result<Expression, JsError> {
        let mut elements = Vec::new();

        loop {
            let token = self.lexer.peek_token(Grammar::Prefix)?;
            match token.kind {
                TokenKind::Punctuator(Punctuator::RBracket) => {
                    self.lexer.next_token(Grammar::Prefix)?;
                    break;
                }
                TokenKind::Punctuator(Punctuator::Comma) => {
                    self.lexer.next_token(Grammar::Prefix)?;
                    elements.push(None);
                    continue;
                }
                TokenKind::EOF => return Err(unexpected_eof(Some(token.start))),
                _ => {}
            }

            elements.push(Some(self.parse_assignment_expression()?));

            let token = self.lexer.next_token(Grammar::Infix)?;
            match token.kind {
                TokenKind::Punctuator(Punctuator::RBracket) => break,
                TokenKind::Punctuator(Punctuator::Comma) => {}
                TokenKind::EOF => return Err(unexpected_eof(Some(token.start))),
                _ => return Err(expected("',' or ']'", &token)),
            }
        }

        Ok(Expression::ArrayExpression { elements, position })
    }

    /// Object literal after `{`
    fn parse_object_literal(&mut self, position: SourcePosition) -> Result<Expression, JsError> {
        let mut properties = Vec::new();

        loop {
            let token = self.lexer.next_token(Grammar::Prefix)?;
            let key_position = token.start;
            let (key, shorthand_name) = match token.kind {
                TokenKind::Punctuator(Punctuator::RBrace) => break,
                TokenKind::Identifier(name) => (PropertyKey::Identifier(name.clone()), Some(name)),
                TokenKind::Keyword(_) => (PropertyKey::Identifier(token.raw.clone()), None),
                TokenKind::String(s) => (PropertyKey::String(s), None),
                TokenKind::Number(n) => (PropertyKey::Number(n), None),
                TokenKind::Punctuator(Punctuator::LBracket) => {
                    let expr = self.parse_assignment_expression()?;
                    self.expect_punctuator(Punctuator::RBracket, Grammar::Infix)?;
                    (PropertyKey::Computed(Box::new(expr)), None)
                }
                TokenKind::EOF => return Err(unexpected_eof(Some(key_position))),
                _ => return Err(expected("property name", &token)),
            };

            let next = self.lexer.next_token(Grammar::Infix)?;
            let is_method = next.is_punctuator(Punctuator::LParen);
            let (value, shorthand) = match next.kind {
                TokenKind::Punctuator(Punctuator::Colon) => {
                    (self.parse_assignment_expression()?, false)
                }
                TokenKind::Punctuator(Punctuator::LParen) => {
                    self.lexer.rewind();
                    let name = match &key {
                        PropertyKey::Identifier(name) | PropertyKey::String(name) => {
                            Some(name.clone())
                        }
                        PropertyKey::Number(n) => Some(core_types::number_to_string(*n)),
                        PropertyKey::Computed(_) => None,
                    };
                    let function = self.parse_function_rest(name, key_position)?;
                    let method = Expression::FunctionExpression {
                        function: Rc::new(function),
                        position: key_position,
                    };
                    (method, false)
                }
                TokenKind::Punctuator(Punctuator::Comma)
                | TokenKind::Punctuator(Punctuator::RBrace)
                    if shorthand_name.is_some() =>
                {
                    self.lexer.rewind();
                    let name = shorthand_name.unwrap_or_default();
                    let value = Expression::Identifier {
                        name,
                        position: key_position,
                    };
                    (value, true)
                }
                TokenKind::EOF => return Err(unexpected_eof(Some(next.start))),
                _ => return Err(expected("':'", &next)),
            };

            properties.push(ObjectProperty {
                key,
                value,
                shorthand,
                method: is_method,
            });

            let separator = self.lexer.next_token(Grammar::Infix)?;
            match separator.kind {
                TokenKind::Punctuator(Punctuator::Comma) => {}
                TokenKind::Punctuator(Punctuator::RBrace) => break,
                TokenKind::EOF => return Err(unexpected_eof(Some(separator.start))),
                _ => return Err(expected("',' or '}'", &separator)),
            }
        }

        Ok(Expression::ObjectExpression {
            properties,
            position,
        })
    }

    /// Template literal after the opening backtick
    fn parse_template_literal(&mut self, position: SourcePosition) -> Result<Expression, JsError> {
        let mut quasis = Vec::new();
        let mut expressions = Vec::new();

        loop {
            let chunk = self.lexer.next_token(Grammar::Template)?;
            let TokenKind::Template { cooked, tail } = chunk.kind else {
                return Err(expected("template text", &chunk));
            };
            quasis.push(cooked);
            if tail {
                break;
            }
            expressions.push(self.parse_expression()?);
            self.expect_punctuator(Punctuator::RBrace, Grammar::Infix)?;
        }

        Ok(Expression::TemplateLiteral {
            quasis,
            expressions,
            position,
        })
    }

    // ---------------------------------------------------------------------
    // Token helpers
    // ---------------------------------------------------------------------

    /// Consume the punctuator if it is next
    fn eat_punctuator(&mut self, p: Punctuator, grammar: Grammar) -> Result<bool, JsError> {
        let token = self.lexer.next_token(grammar)?;
        if token.is_punctuator(p) {
            Ok(true)
        } else {
            self.lexer.rewind();
            Ok(false)
        }
    }

    fn expect_punctuator(&mut self, p: Punctuator, grammar: Grammar) -> Result<Token, JsError> {
        let token = self.lexer.next_token(grammar)?;
        if token.is_punctuator(p) {
            Ok(token)
        } else if token.kind == TokenKind::EOF {
            Err(unexpected_eof(Some(token.start)))
        } else {
            Err(expected(&format!("'{}'", p.as_str()), &token))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<Token, JsError> {
        let token = self.lexer.next_token(Grammar::Statement)?;
        if token.is_keyword(keyword) {
            Ok(token)
        } else {
            Err(expected(&format!("{:?}", keyword).to_lowercase(), &token))
        }
    }

    /// Name in a declaration or parameter list
    fn expect_binding_identifier(&mut self) -> Result<(String, SourcePosition), JsError> {
        let token = self.lexer.next_token(Grammar::Prefix)?;
        match token.kind {
            TokenKind::Identifier(name) => Ok((name, token.start)),
            TokenKind::Keyword(_) => Err(syntax_error(
                format!("Unexpected keyword '{}'", token.raw),
                Some(token.start),
            )),
            TokenKind::EOF => Err(unexpected_eof(Some(token.start))),
            _ => Err(expected("identifier", &token)),
        }
    }

    /// Whether the current statement ends here (explicitly or by a line break)
    fn at_statement_end(&mut self) -> Result<bool, JsError> {
        let token = self.lexer.peek_token(Grammar::Terminal)?;
        Ok(matches!(
            token.kind,
            TokenKind::Punctuator(Punctuator::Semicolon)
                | TokenKind::Punctuator(Punctuator::RBrace)
                | TokenKind::LineBreak
                | TokenKind::EOF
        ))
    }

    /// End a statement: `;`, a line break, `}` (left in place) or end of input
    fn consume_semicolon(&mut self) -> Result<(), JsError> {
        let token = self.lexer.next_token(Grammar::Terminal)?;
        match token.kind {
            TokenKind::Punctuator(Punctuator::Semicolon)
            | TokenKind::LineBreak
            | TokenKind::EOF => {
                Ok(())
            }
            TokenKind::Punctuator(Punctuator::RBrace) => {
                self.lexer.rewind();
                Ok(())
            }
            _ => Err(expected("';'", &token)),
        }
    }
}

fn expected(what: &str, got: &Token) -> JsError {
    unexpected_token(what, &got.describe(), Some(got.start))
}

fn unsupported(word: &str, position: SourcePosition) -> JsError {
    syntax_error(format!("Unsupported syntax: '{}'", word), Some(position))
}

fn literal(value: Literal, position: SourcePosition) -> Expression {
    Expression::Literal { value, position }
}

fn update_operator(increment: bool) -> UpdateOperator {
    if increment {
        UpdateOperator::Increment
    } else {
        UpdateOperator::Decrement
    }
}

fn member(
    object: Expression,
    property: Expression,
    computed: bool,
    optional: bool,
    position: SourcePosition,
) -> Expression {
    Expression::MemberExpression {
        object: Box::new(object),
        property: Box::new(property),
        computed,
        optional,
        position,
    }
}

fn call(
    callee: Expression,
    arguments: Vec<Expression>,
    optional: bool,
    position: SourcePosition,
) -> Expression {
    Expression::CallExpression {
        callee: Box::new(callee),
        arguments,
        optional,
        position,
    }
}
