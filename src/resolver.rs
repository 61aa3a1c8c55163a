//! Static resolver pass for the **Grai** interpreter.
//!
//! This resolver does three things in one AST walk:
//! 1. Build lexical scopes (stack of `HashMap<&str,bool>` tracking
//!    declared/defined).
//! 2. Report static errors (redeclaration, forward-read in initializer,
//!    `returneaza`/`instanta`/`super` in places they cannot appear, a class
//!    inheriting from itself).
//! 3. Tell the interpreter, for *each* variable occurrence, whether it is a
//!    local (and at what depth) or a global - so the interpreter never falls
//!    back to dynamic lookup that would see a later shadowing local.
//!
//! Method bodies resolve inside two extra scopes: an outer one binding
//! `super` when an inherits clause is present, and an inner one binding
//! `instanta` around all methods.  The distances this produces line up with
//! the environment chain the evaluator builds at class-declaration and
//! method-bind time.

use crate::error::{GraiError, Result};
use crate::expr::Expr;
use crate::interpreter::Interpreter;
use crate::stmt::{FunctionDecl, Stmt};
use crate::token::Token;
use log::{debug, info};
use std::collections::HashMap;

/// Are we inside a user function?  Used to validate `returneaza`.
/// Initializers count as methods: a `returneaza` inside `init` is legal, and
/// the evaluator yields the bound instance regardless of the value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum FunctionType {
    None,
    Function,
    Method,
}

/// Are we inside a class body?  Used to validate `instanta` and `super`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ClassType {
    None,
    Class,
    Subclass,
}

/// Resolver: tracks scopes, enforces static rules, and *records* binding
/// distances (locals vs. globals) by calling back into the interpreter.
pub struct Resolver<'i, 'src> {
    interpreter: &'i mut Interpreter<'src>,
    scopes: Vec<HashMap<&'src str, bool>>, // false=declared, true=defined
    current_function: FunctionType,
    current_class: ClassType,
}

impl<'i, 'src> Resolver<'i, 'src> {
    /// Create a new resolver bound to the given interpreter.
    pub fn new(interpreter: &'i mut Interpreter<'src>) -> Self {
        info!("Resolver instantiated");

        Resolver {
            interpreter,
            scopes: Vec::new(),
            current_function: FunctionType::None,
            current_class: ClassType::None,
        }
    }

    /// Walk all top-level statements.
    pub fn resolve(&mut self, statements: &[Stmt<'src>]) -> Result<()> {
        info!(
            "Beginning resolve pass over {} statement(s)",
            statements.len()
        );

        for stmt in statements {
            self.resolve_stmt(stmt)?;
        }

        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Statement resolution
    // ─────────────────────────────────────────────────────────────────────────

    fn resolve_stmt(&mut self, stmt: &Stmt<'src>) -> Result<()> {
        match stmt {
            Stmt::Block(statements) => {
                self.begin_scope();

                for s in statements {
                    self.resolve_stmt(s)?;
                }

                self.end_scope();
            }

            Stmt::Var { name, initializer } => {
                // declare → resolve initializer → define, so a variable is
                // "not ready" while its own initializer resolves.
                self.declare(name)?;

                if let Some(expr) = initializer {
                    self.resolve_expr(expr)?;
                }

                self.define(name);
            }

            Stmt::Function(decl) => {
                // The name is visible *inside* its own body, enabling
                // recursion.
                self.declare(&decl.name)?;
                self.define(&decl.name);

                self.resolve_function(decl, FunctionType::Function)?;
            }

            Stmt::Expression(expr) | Stmt::Print(expr) => {
                self.resolve_expr(expr)?;
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(condition)?;
                self.resolve_stmt(then_branch)?;

                if let Some(eb) = else_branch.as_deref() {
                    self.resolve_stmt(eb)?;
                }
            }

            Stmt::While { condition, body } => {
                self.resolve_expr(condition)?;
                self.resolve_stmt(body)?;
            }

            Stmt::Return { keyword, value } => {
                if self.current_function == FunctionType::None {
                    return Err(GraiError::resolve(
                        keyword.line,
                        "'returneaza' used outside of a function",
                    ));
                }

                if let Some(expr) = value {
                    self.resolve_expr(expr)?;
                }
            }

            Stmt::Class(decl) => {
                let enclosing_class = self.current_class;
                self.current_class = ClassType::Class;

                self.declare(&decl.name)?;
                self.define(&decl.name);

                if let Some(superclass) = &decl.superclass {
                    if let Expr::Variable { name, .. } = superclass {
                        if name.lexeme == decl.name.lexeme {
                            return Err(GraiError::resolve(
                                name.line,
                                "A class cannot inherit from itself",
                            ));
                        }
                    }

                    self.current_class = ClassType::Subclass;
                    self.resolve_expr(superclass)?;

                    self.begin_scope();

                    if let Some(scope) = self.scopes.last_mut() {
                        scope.insert("super", true);
                    }
                }

                self.begin_scope();

                if let Some(scope) = self.scopes.last_mut() {
                    scope.insert("instanta", true);
                }

                for method in &decl.methods {
                    self.resolve_function(method, FunctionType::Method)?;
                }

                self.end_scope();

                if decl.superclass.is_some() {
                    self.end_scope();
                }

                self.current_class = enclosing_class;
            }
        }

        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Expression resolution
    // ─────────────────────────────────────────────────────────────────────────

    fn resolve_expr(&mut self, expr: &Expr<'src>) -> Result<()> {
        match expr {
            Expr::Literal(_) => {}

            Expr::Grouping(inner) => {
                self.resolve_expr(inner)?;
            }

            Expr::Unary { right, .. } => {
                self.resolve_expr(right)?;
            }

            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                self.resolve_expr(left)?;
                self.resolve_expr(right)?;
            }

            Expr::Variable { name, id } => {
                // Cannot read in own initializer
                if let Some(scope) = self.scopes.last() {
                    if scope.get(name.lexeme) == Some(&false) {
                        return Err(GraiError::resolve(
                            name.line,
                            "Cannot read local variable in its own initializer",
                        ));
                    }
                }

                self.resolve_local(*id, name);
            }

            Expr::Assign { name, value, id } => {
                // First resolve RHS, then bind LHS
                self.resolve_expr(value)?;
                self.resolve_local(*id, name);
            }

            Expr::Call {
                callee, arguments, ..
            } => {
                self.resolve_expr(callee)?;

                for arg in arguments {
                    self.resolve_expr(arg)?;
                }
            }

            Expr::Get { object, .. } => self.resolve_expr(object)?,

            Expr::Set { object, value, .. } => {
                self.resolve_expr(object)?;
                self.resolve_expr(value)?;
            }

            Expr::This { keyword, id } => {
                if self.current_class == ClassType::None {
                    return Err(GraiError::resolve(
                        keyword.line,
                        "Cannot use 'instanta' outside of a class",
                    ));
                }

                self.resolve_local(*id, keyword);
            }

            Expr::Super { keyword, id, .. } => {
                match self.current_class {
                    ClassType::None => {
                        return Err(GraiError::resolve(
                            keyword.line,
                            "Cannot use 'super' outside of a class",
                        ));
                    }

                    ClassType::Class => {
                        return Err(GraiError::resolve(
                            keyword.line,
                            "Cannot use 'super' in a class with no superclass",
                        ));
                    }

                    ClassType::Subclass => {}
                }

                self.resolve_local(*id, keyword);
            }
        }

        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Function helper
    // ─────────────────────────────────────────────────────────────────────────

    /// Enter a fresh scope for a function's parameters + body.
    fn resolve_function(&mut self, decl: &FunctionDecl<'src>, ftype: FunctionType) -> Result<()> {
        let enclosing = self.current_function;
        self.current_function = ftype;

        self.begin_scope();

        for param in &decl.params {
            self.declare(param)?;
            self.define(param);
        }

        for stmt in &decl.body {
            self.resolve_stmt(stmt)?;
        }

        self.end_scope();

        self.current_function = enclosing;

        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Scope management
    // ─────────────────────────────────────────────────────────────────────────

    #[inline]
    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    #[inline]
    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: &Token<'src>) -> Result<()> {
        if let Some(scope) = self.scopes.last_mut() {
            if scope.contains_key(name.lexeme) {
                return Err(GraiError::resolve(
                    name.line,
                    "Variable already declared in this scope",
                ));
            }

            scope.insert(name.lexeme, false);
        }

        Ok(())
    }

    fn define(&mut self, name: &Token<'src>) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme, true);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Binding-distance helper
    // ─────────────────────────────────────────────────────────────────────────

    /// Record this variable occurrence as either:
    ///  - a local at depth `d`, or
    ///  - a global if not found in *any* scope.
    fn resolve_local(&mut self, id: usize, name: &Token<'src>) {
        // 1. check innermost → outermost
        for (depth, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(name.lexeme) {
                debug!("Resolved '{}' at depth {}", name.lexeme, depth);

                self.interpreter.note_local(id, depth);
                return;
            }
        }

        // 2. not found in any local scope ⇒ global
        debug!("Resolved '{}' as global", name.lexeme);

        self.interpreter.note_global(id);
    }
}
