use std::rc::Rc;

use crate::expr::Expr;
use crate::token::Token;

/// A function (or method) declaration.
///
/// Held behind `Rc` so closure values can share the declaration with the
/// tree instead of cloning parameter lists and bodies per call.
#[derive(Debug)]
pub struct FunctionDecl<'src> {
    pub name: Token<'src>,

    /// Parameter name tokens (arity <= 255, enforced by the parser).
    pub params: Vec<Token<'src>>,

    /// Body executed when the function is called.
    pub body: Vec<Stmt<'src>>,
}

/// A class declaration: name, optional `mosteneste` clause, method list.
#[derive(Debug)]
pub struct ClassDecl<'src> {
    pub name: Token<'src>,

    /// The superclass reference, always an `Expr::Variable` so the resolver
    /// can bind it like any other name.
    pub superclass: Option<Expr<'src>>,

    pub methods: Vec<Rc<FunctionDecl<'src>>>,
}

/// **Abstract-syntax-tree node** for *statements* (complete executable
/// constructs).  A program is a sequence of these nodes returned by the
/// parser.  `pentru` loops never appear here: the parser desugars them into
/// `Block`/`While` with identical scoping.
#[derive(Debug, Clone)]
pub enum Stmt<'src> {
    /// Stand-alone expression terminated by a semicolon.
    Expression(Expr<'src>),

    /// `afiseaza` statement used for output.
    Print(Expr<'src>),

    /// Variable declaration: `"var" IDENT ("=" initializer)? ";"`.
    Var {
        name: Token<'src>,
        initializer: Option<Expr<'src>>,
    },

    /// Braced scope containing zero or more declarations/statements.
    Block(Vec<Stmt<'src>>),

    /// `daca` / `altfel` conditional.
    If {
        condition: Expr<'src>,
        then_branch: Box<Stmt<'src>>,
        else_branch: Option<Box<Stmt<'src>>>,
    },

    /// `cattimp` loop.
    While {
        condition: Expr<'src>,
        body: Box<Stmt<'src>>,
    },

    /// Function declaration - becomes a first-class callable value.
    Function(Rc<FunctionDecl<'src>>),

    /// `returneaza` statement inside a function body.
    Return {
        /// The `returneaza` keyword token (for error locations).
        keyword: Token<'src>,

        /// Optional expression to return.  Absent => `nul` is returned.
        value: Option<Expr<'src>>,
    },

    /// `clasa` declaration.
    Class(Rc<ClassDecl<'src>>),
}
