/*!
Recursive-descent parser for Grai.

Grammar (EBNF - condensed)
--------------------------

```text
program        → declaration* EOF ;
declaration    → classDecl | funDecl | varDecl | statement ;
classDecl      → "clasa" IDENT ( "mosteneste" IDENT )? "{" method* "}" ;
method         → IDENT "(" parameters? ")" block ;
funDecl        → "fun" IDENT "(" parameters? ")" block ;
varDecl        → "var" IDENT ( "=" expression )? ";" ;
statement      → exprStmt | printStmt | whileStmt | forStmt
               | ifStmt | block | returnStmt ;
exprStmt       → expression ";" ;
printStmt      → "afiseaza" expression ";" ;
whileStmt      → "cattimp" "(" expression ")" statement ;
forStmt        → "pentru" "(" ( varDecl | exprStmt | ";" )
                 expression? ";" expression? ")" statement ;
ifStmt         → "daca" "(" expression ")" statement
               ( "altfel" statement )? ;
returnStmt     → "returneaza" expression? ";" ;
block          → "{" declaration* "}" ;
parameters     → IDENT ( "," IDENT )* ;
expression     → assignment ;
assignment     → ( call "." )? IDENT "=" assignment | logic_or ;
logic_or       → logic_and ( "sau" logic_and )* ;
logic_and      → equality  ( "si" equality )* ;
equality       → comparison ( ( "!=" | "==" ) comparison )* ;
comparison     → term ( ( ">" | ">=" | "<" | "<=" ) term )* ;
term           → factor ( ( "-" | "+" ) factor )* ;
factor         → unary ( ( "/" | "*" | "%" ) unary )* ;
unary          → ( "!" | "-" ) unary | call ;
call           → primary ( "(" arguments? ")" | "." IDENT )* ;
arguments      → expression ( "," expression )* ;
primary        → NUMBER | STRING | "adevarat" | "fals" | "nul"
               | IDENT | "(" expression ")"
               | "instanta" | "super" "." IDENT ;
```

`pentru` never reaches the statement tree: it is desugared here into
`Block[init, While(cond, Block[body, Expression(incr)])]`, which scopes
identically to the hand-written `cattimp` form.

Error handling is panic-mode: a failed production unwinds to the statement
loop, the error is collected, and `synchronize` discards tokens until a `;`
is passed or a declaration keyword is reached.  One pass therefore surfaces
multiple independent syntax errors.  Two errors are reported *without*
unwinding (an over-long parameter/argument list and an invalid assignment
target), so parsing of the enclosing production continues.

### Logging Policy

| Location                     | Level  | Purpose                                   |
|------------------------------|--------|-------------------------------------------|
| `Parser::new`, `parse`       | `info` | Lifecycle milestones.                     |
| `declaration`, `statement`   | `debug`| High-level descent into grammar branches. |
| Error paths                  | `debug`| Context before returning structured error.|
*/

use std::rc::Rc;

use crate::error::{GraiError, Result};
use crate::expr::{Expr, ExprId, LiteralValue};
use crate::stmt::{ClassDecl, FunctionDecl, Stmt};
use crate::token::{Token, TokenType};

use log::{debug, info};

/// Hard cap on call arguments and function parameters.
const MAX_ARITY: usize = 255;

/// Top-level parser over an immutable slice of tokens.
///
/// `'t` is the lifetime of the borrowed token slice; `'src` ties the tokens
/// (and the AST built from them) back to the source buffer.
pub struct Parser<'t, 'src> {
    tokens: &'t [Token<'src>],
    current: usize,
    next_id: ExprId,
    errors: Vec<GraiError>,
}

impl<'t, 'src> Parser<'t, 'src> {
    /// Construct a new parser.
    pub fn new(tokens: &'t [Token<'src>]) -> Self {
        info!("Parser created with {} tokens", tokens.len());

        Self {
            tokens,
            current: 0,
            next_id: 0,
            errors: Vec::new(),
        }
    }

    // ───────────────────────── public API ─────────────────────────

    /// Parse an entire program.
    ///
    /// Returns the statement list together with every syntax error collected
    /// along the way.  A non-empty error list means the caller must not
    /// evaluate the (partial) statement list.
    pub fn parse(&mut self) -> (Vec<Stmt<'src>>, Vec<GraiError>) {
        info!("Beginning parse phase");

        let mut statements: Vec<Stmt<'src>> = Vec::new();

        while !self.is_at_end() {
            match self.declaration() {
                Ok(stmt) => statements.push(stmt),

                Err(e) => {
                    debug!("Parse error, entering panic-mode recovery: {}", e);

                    self.errors.push(e);
                    self.synchronize();
                }
            }
        }

        (statements, std::mem::take(&mut self.errors))
    }

    /// Stamp a fresh node id for a resolvable expression.
    fn new_id(&mut self) -> ExprId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // ──────────────────────── declaration rules ───────────────────

    fn declaration(&mut self) -> Result<Stmt<'src>> {
        debug!("Entering declaration");

        if self.matches(TokenType::CLASS) {
            self.class_declaration()
        } else if self.matches(TokenType::FUN) {
            Ok(Stmt::Function(Rc::new(self.function_decl("function")?)))
        } else if self.matches(TokenType::VAR) {
            self.var_declaration()
        } else {
            self.statement()
        }
    }

    fn class_declaration(&mut self) -> Result<Stmt<'src>> {
        let name: Token<'src> = self.consume(TokenType::IDENTIFIER, "Expected class name")?;

        let superclass: Option<Expr<'src>> = if self.matches(TokenType::INHERITS) {
            let sup: Token<'src> =
                self.consume(TokenType::IDENTIFIER, "Expected superclass name")?;
            let id = self.new_id();

            Some(Expr::Variable { name: sup, id })
        } else {
            None
        };

        self.consume(TokenType::LEFT_BRACE, "Expected '{' before class body")?;

        let mut methods: Vec<Rc<FunctionDecl<'src>>> = Vec::new();

        while !self.check(TokenType::RIGHT_BRACE) && !self.is_at_end() {
            methods.push(Rc::new(self.function_decl("method")?));
        }

        self.consume(TokenType::RIGHT_BRACE, "Expected '}' after class body")?;

        Ok(Stmt::Class(Rc::new(ClassDecl {
            name,
            superclass,
            methods,
        })))
    }

    /// Shared tail of `fun` declarations and class methods (methods carry no
    /// `fun` keyword).
    fn function_decl(&mut self, kind: &str) -> Result<FunctionDecl<'src>> {
        let name: Token<'src> =
            self.consume(TokenType::IDENTIFIER, format!("Expected {} name", kind))?;

        self.consume(
            TokenType::LEFT_PAREN,
            format!("Expected '(' after {} name", kind),
        )?;

        let mut params: Vec<Token<'src>> = Vec::new();

        if !self.check(TokenType::RIGHT_PAREN) {
            loop {
                if params.len() >= MAX_ARITY {
                    // Reported, but not fatal: keep consuming the list.
                    let err = GraiError::parse(
                        self.peek().line,
                        format!("Cannot have more than {} parameters", MAX_ARITY),
                    );
                    self.errors.push(err);
                }

                params.push(self.consume(TokenType::IDENTIFIER, "Expected parameter name")?);

                if !self.matches(TokenType::COMMA) {
                    break;
                }
            }
        }

        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after parameters")?;

        self.consume(
            TokenType::LEFT_BRACE,
            format!("Expected '{{' before {} body", kind),
        )?;

        let body: Vec<Stmt<'src>> = self.block()?;

        Ok(FunctionDecl { name, params, body })
    }

    fn var_declaration(&mut self) -> Result<Stmt<'src>> {
        let name: Token<'src> = self.consume(TokenType::IDENTIFIER, "Expected variable name")?;

        let initializer: Option<Expr<'src>> = if self.matches(TokenType::EQUAL) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(
            TokenType::SEMICOLON,
            "Expected ';' after variable declaration",
        )?;

        Ok(Stmt::Var { name, initializer })
    }

    // ───────────────────────── statement rules ────────────────────

    fn statement(&mut self) -> Result<Stmt<'src>> {
        if self.matches(TokenType::FOR) {
            self.for_statement()
        } else if self.matches(TokenType::IF) {
            self.if_statement()
        } else if self.matches(TokenType::WHILE) {
            self.while_statement()
        } else if self.matches(TokenType::RETURN) {
            self.return_statement()
        } else if self.matches(TokenType::LEFT_BRACE) {
            Ok(Stmt::Block(self.block()?))
        } else if self.matches(TokenType::PRINT) {
            self.print_statement()
        } else {
            self.expression_statement()
        }
    }

    /// `pentru` is pure sugar: build the equivalent `cattimp` loop here so
    /// the resolver and the evaluator never see a for-node.
    fn for_statement(&mut self) -> Result<Stmt<'src>> {
        self.consume(TokenType::LEFT_PAREN, "Expected '(' after 'pentru'")?;

        let initializer: Option<Stmt<'src>> = if self.matches(TokenType::SEMICOLON) {
            None
        } else if self.matches(TokenType::VAR) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition: Option<Expr<'src>> = if !self.check(TokenType::SEMICOLON) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(TokenType::SEMICOLON, "Expected ';' after loop condition")?;

        let increment: Option<Expr<'src>> = if !self.check(TokenType::RIGHT_PAREN) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after 'pentru' clauses")?;

        let mut body: Stmt<'src> = self.statement()?;

        if let Some(incr) = increment {
            body = Stmt::Block(vec![body, Stmt::Expression(incr)]);
        }

        let condition: Expr<'src> = condition.unwrap_or(Expr::Literal(LiteralValue::True));

        body = Stmt::While {
            condition,
            body: Box::new(body),
        };

        if let Some(init) = initializer {
            body = Stmt::Block(vec![init, body]);
        }

        Ok(body)
    }

    fn print_statement(&mut self) -> Result<Stmt<'src>> {
        let value: Expr<'src> = self.expression()?;

        self.consume(TokenType::SEMICOLON, "Expected ';' after value")?;

        Ok(Stmt::Print(value))
    }

    fn expression_statement(&mut self) -> Result<Stmt<'src>> {
        let expr: Expr<'src> = self.expression()?;

        self.consume(TokenType::SEMICOLON, "Expected ';' after expression")?;

        Ok(Stmt::Expression(expr))
    }

    fn if_statement(&mut self) -> Result<Stmt<'src>> {
        self.consume(TokenType::LEFT_PAREN, "Expected '(' after 'daca'")?;
        let condition: Expr<'src> = self.expression()?;
        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after condition")?;

        let then_branch: Box<Stmt<'src>> = Box::new(self.statement()?);
        let else_branch: Option<Box<Stmt<'src>>> = if self.matches(TokenType::ELSE) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn while_statement(&mut self) -> Result<Stmt<'src>> {
        self.consume(TokenType::LEFT_PAREN, "Expected '(' after 'cattimp'")?;
        let condition: Expr<'src> = self.expression()?;
        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after condition")?;
        let body: Box<Stmt<'src>> = Box::new(self.statement()?);

        Ok(Stmt::While { condition, body })
    }

    fn return_statement(&mut self) -> Result<Stmt<'src>> {
        let keyword: Token<'src> = self.previous().clone();

        let value: Option<Expr<'src>> = if !self.check(TokenType::SEMICOLON) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(TokenType::SEMICOLON, "Expected ';' after return value")?;

        Ok(Stmt::Return { keyword, value })
    }

    fn block(&mut self) -> Result<Vec<Stmt<'src>>> {
        let mut statements: Vec<Stmt<'src>> = Vec::new();

        while !self.check(TokenType::RIGHT_BRACE) && !self.is_at_end() {
            statements.push(self.declaration()?);
        }

        self.consume(TokenType::RIGHT_BRACE, "Expected '}' after block")?;

        Ok(statements)
    }

    // ─────────────────────── expression rules ─────────────────────

    fn expression(&mut self) -> Result<Expr<'src>> {
        self.assignment()
    }

    fn assignment(&mut self) -> Result<Expr<'src>> {
        let expr: Expr<'src> = self.logical_or()?;

        if self.matches(TokenType::EQUAL) {
            let equals: Token<'src> = self.previous().clone();
            let value: Expr<'src> = self.assignment()?;

            match expr {
                Expr::Variable { name, .. } => {
                    let id = self.new_id();

                    return Ok(Expr::Assign {
                        name,
                        value: Box::new(value),
                        id,
                    });
                }

                Expr::Get { object, name } => {
                    return Ok(Expr::Set {
                        object,
                        name,
                        value: Box::new(value),
                    });
                }

                _ => {
                    // Reported, but not fatal: the caller keeps the
                    // left-hand side and parsing continues.
                    debug!("Invalid assignment target at line {}", equals.line);

                    self.errors
                        .push(GraiError::parse(equals.line, "Invalid assignment target"));
                }
            }
        }

        Ok(expr)
    }

    fn logical_or(&mut self) -> Result<Expr<'src>> {
        let mut expr: Expr<'src> = self.logical_and()?;

        while self.matches(TokenType::OR) {
            let operator: Token<'src> = self.previous().clone();
            let right: Expr<'src> = self.logical_and()?;

            expr = Expr::Logical {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn logical_and(&mut self) -> Result<Expr<'src>> {
        let mut expr: Expr<'src> = self.equality()?;

        while self.matches(TokenType::AND) {
            let operator: Token<'src> = self.previous().clone();
            let right: Expr<'src> = self.equality()?;

            expr = Expr::Logical {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn equality(&mut self) -> Result<Expr<'src>> {
        let mut expr: Expr<'src> = self.comparison()?;

        while self.matches(TokenType::BANG_EQUAL) || self.matches(TokenType::EQUAL_EQUAL) {
            let operator: Token<'src> = self.previous().clone();
            let right: Expr<'src> = self.comparison()?;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Expr<'src>> {
        let mut expr: Expr<'src> = self.term()?;

        while self.matches(TokenType::GREATER)
            || self.matches(TokenType::GREATER_EQUAL)
            || self.matches(TokenType::LESS)
            || self.matches(TokenType::LESS_EQUAL)
        {
            let operator: Token<'src> = self.previous().clone();
            let right: Expr<'src> = self.term()?;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn term(&mut self) -> Result<Expr<'src>> {
        let mut expr: Expr<'src> = self.factor()?;

        while self.matches(TokenType::MINUS) || self.matches(TokenType::PLUS) {
            let operator: Token<'src> = self.previous().clone();
            let right: Expr<'src> = self.factor()?;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn factor(&mut self) -> Result<Expr<'src>> {
        let mut expr: Expr<'src> = self.unary()?;

        while self.matches(TokenType::STAR)
            || self.matches(TokenType::SLASH)
            || self.matches(TokenType::PERCENT)
        {
            let operator: Token<'src> = self.previous().clone();
            let right: Expr<'src> = self.unary()?;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr<'src>> {
        if self.matches(TokenType::BANG) || self.matches(TokenType::MINUS) {
            let operator: Token<'src> = self.previous().clone();
            let right: Expr<'src> = self.unary()?;

            return Ok(Expr::Unary {
                operator,
                right: Box::new(right),
            });
        }

        self.call()
    }

    fn call(&mut self) -> Result<Expr<'src>> {
        let mut expr: Expr<'src> = self.primary()?;

        loop {
            if self.matches(TokenType::LEFT_PAREN) {
                expr = self.finish_call(expr)?;
            } else if self.matches(TokenType::DOT) {
                let name: Token<'src> =
                    self.consume(TokenType::IDENTIFIER, "Expected property name after '.'")?;

                expr = Expr::Get {
                    object: Box::new(expr),
                    name,
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr<'src>) -> Result<Expr<'src>> {
        let mut arguments: Vec<Expr<'src>> = Vec::new();

        if !self.check(TokenType::RIGHT_PAREN) {
            loop {
                if arguments.len() >= MAX_ARITY {
                    // Reported, but not fatal: keep consuming the list.
                    let err = GraiError::parse(
                        self.peek().line,
                        format!("Cannot have more than {} arguments", MAX_ARITY),
                    );
                    self.errors.push(err);
                }

                arguments.push(self.expression()?);

                if !self.matches(TokenType::COMMA) {
                    break;
                }
            }
        }

        let paren: Token<'src> =
            self.consume(TokenType::RIGHT_PAREN, "Expected ')' after arguments")?;

        Ok(Expr::Call {
            callee: Box::new(callee),
            paren,
            arguments,
        })
    }

    fn primary(&mut self) -> Result<Expr<'src>> {
        if self.matches(TokenType::FALSE) {
            return Ok(Expr::Literal(LiteralValue::False));
        }
        if self.matches(TokenType::TRUE) {
            return Ok(Expr::Literal(LiteralValue::True));
        }
        if self.matches(TokenType::NIL) {
            return Ok(Expr::Literal(LiteralValue::Nil));
        }

        match &self.peek().token_type {
            TokenType::NUMBER(n) => {
                let n = *n;
                self.advance();

                return Ok(Expr::Literal(LiteralValue::Number(n)));
            }

            TokenType::STRING(s) => {
                let s = s.clone();
                self.advance();

                return Ok(Expr::Literal(LiteralValue::Str(s)));
            }

            _ => {}
        }

        if self.matches(TokenType::IDENTIFIER) {
            let name: Token<'src> = self.previous().clone();
            let id = self.new_id();

            return Ok(Expr::Variable { name, id });
        }

        if self.matches(TokenType::THIS) {
            let keyword: Token<'src> = self.previous().clone();
            let id = self.new_id();

            return Ok(Expr::This { keyword, id });
        }

        if self.matches(TokenType::SUPER) {
            let keyword: Token<'src> = self.previous().clone();

            self.consume(TokenType::DOT, "Expected '.' after 'super'")?;

            let method: Token<'src> =
                self.consume(TokenType::IDENTIFIER, "Expected superclass method name")?;
            let id = self.new_id();

            return Ok(Expr::Super {
                keyword,
                method,
                id,
            });
        }

        if self.matches(TokenType::LEFT_PAREN) {
            let expr: Expr<'src> = self.expression()?;

            self.consume(TokenType::RIGHT_PAREN, "Expected ')' after expression")?;

            return Ok(Expr::Grouping(Box::new(expr)));
        }

        Err(GraiError::parse(self.peek().line, "Expected expression"))
    }

    // ────────────────────── utility helpers ───────────────────────

    #[inline(always)]
    fn matches(&mut self, ttype: TokenType) -> bool {
        if self.check(ttype) {
            self.advance();

            return true;
        }

        false
    }

    #[inline(always)]
    fn consume<S: Into<String>>(&mut self, ttype: TokenType, message: S) -> Result<Token<'src>> {
        if self.check(ttype) {
            return Ok(self.advance().clone());
        }

        Err(GraiError::parse(self.peek().line, message))
    }

    #[inline(always)]
    fn check(&self, ttype: TokenType) -> bool {
        if self.is_at_end() {
            return false;
        }

        self.peek().token_type == ttype
    }

    #[inline(always)]
    fn advance(&mut self) -> &'t Token<'src> {
        if !self.is_at_end() {
            self.current += 1;
        }

        self.previous()
    }

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        matches!(self.peek().token_type, TokenType::EOF)
    }

    #[inline(always)]
    fn peek(&self) -> &'t Token<'src> {
        &self.tokens[self.current]
    }

    #[inline(always)]
    fn previous(&self) -> &'t Token<'src> {
        &self.tokens[self.current - 1]
    }

    /// Discards tokens until it thinks it is at a statement boundary.
    fn synchronize(&mut self) {
        self.advance(); // skip the token that caused the error

        while !self.is_at_end() {
            if matches!(self.previous().token_type, TokenType::SEMICOLON) {
                return;
            }

            match self.peek().token_type {
                TokenType::CLASS
                | TokenType::FUN
                | TokenType::VAR
                | TokenType::FOR
                | TokenType::IF
                | TokenType::WHILE
                | TokenType::RETURN => return,
                _ => {}
            }

            self.advance();
        }
    }
}
