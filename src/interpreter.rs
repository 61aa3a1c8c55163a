//! Tree-walking evaluator for Grai.
//!
//! Executes statements in program order against an environment chain rooted
//! at a global scope pre-populated with the native `clock` callable.  All
//! interpreter state (the chain, the resolution side table, the globals)
//! lives on one `Interpreter` value with explicit construction, so
//! independent runs never interfere.
//!
//! Control flow has exactly two states: normal sequential execution and an
//! in-flight `returneaza` unwind.  The unwind travels through the error
//! channel as [`InterpretError::ReturnSignal`] until the nearest enclosing
//! call frame catches it; the only other error variant is a runtime error,
//! which aborts the remaining evaluation of the program outright.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use chrono::Utc;
use log::{debug, info};
use thiserror::Error;

use crate::callable::{Function, NativeFunction, INITIALIZER_NAME};
use crate::class::Class;
use crate::environment::Environment;
use crate::error::GraiError;
use crate::expr::{Expr, ExprId, LiteralValue};
use crate::instance::Instance;
use crate::stmt::{ClassDecl, Stmt};
use crate::token::{Token, TokenType};
use crate::value::Value;

/// Evaluation outcome signal: either a genuine runtime error or a
/// `returneaza` unwinding toward its call frame.
#[derive(Error, Debug)]
pub enum InterpretError<'src> {
    #[error("[line {line}] Runtime error: {message}")]
    Runtime { message: String, line: usize },

    #[error("return signal with value: {value}")]
    ReturnSignal { value: Value<'src>, line: usize },
}

impl InterpretError<'_> {
    pub fn runtime<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        debug!("Runtime error: line={}, msg={}", line, message);

        InterpretError::Runtime { message, line }
    }
}

/// Convenient alias for evaluator results.
pub type IResult<'src, T> = Result<T, InterpretError<'src>>;

/// The native `clock` callable: wall-clock time in fractional seconds.
fn clock_native<'src>(_args: &[Value<'src>]) -> Result<Value<'src>, String> {
    Ok(Value::Number(Utc::now().timestamp_micros() as f64 / 1e6))
}

pub struct Interpreter<'src> {
    globals: Rc<RefCell<Environment<'src>>>,
    environment: Rc<RefCell<Environment<'src>>>,

    /// Resolution side table: node id → number of enclosing scopes to walk.
    /// Absence means "operate on the global environment directly".
    locals: HashMap<ExprId, usize>,
}

impl<'src> Interpreter<'src> {
    /// Creates a new Interpreter and defines native functions such as
    /// `clock`.
    pub fn new() -> Self {
        info!("Initializing Interpreter");

        let globals = Rc::new(RefCell::new(Environment::new()));

        let mut interpreter = Self {
            environment: globals.clone(),
            globals,
            locals: HashMap::new(),
        };

        interpreter.define_native("clock", 0, clock_native);

        interpreter
    }

    /// Inject a host callable into the global scope.  Anything satisfying
    /// the arity + call contract can be added here without touching the
    /// evaluator.
    pub fn define_native(
        &mut self,
        name: &str,
        arity: usize,
        func: fn(&[Value<'src>]) -> Result<Value<'src>, String>,
    ) {
        debug!("Defining native function '{}'", name);

        let native = NativeFunction {
            name: name.to_string(),
            arity,
            func,
        };

        self.globals
            .borrow_mut()
            .define(name, Value::Native(Rc::new(native)));
    }

    /// The global scope, for embedders and tests that want to inspect
    /// program state after a run.
    pub fn global(&self, name: &str) -> Option<Value<'src>> {
        self.globals.borrow().get(name).ok()
    }

    // ─────────────────────── resolver callbacks ────────────────────

    /// Record a variable occurrence as a local at `depth` enclosing scopes.
    pub fn note_local(&mut self, id: ExprId, depth: usize) {
        debug!("Binding node {} at depth {}", id, depth);

        self.locals.insert(id, depth);
    }

    /// Record a variable occurrence as a global (absent from the table).
    pub fn note_global(&mut self, id: ExprId) {
        debug!("Binding node {} as global", id);
    }

    // ───────────────────────── execution ───────────────────────────

    /// Interprets a list of statements (a "program").  The first runtime
    /// error aborts everything after it.
    pub fn interpret(&mut self, statements: &[Stmt<'src>]) -> Result<(), GraiError> {
        debug!("Interpreting {} statements", statements.len());

        for stmt in statements {
            if let Err(err) = self.execute(stmt) {
                return Err(match err {
                    InterpretError::Runtime { message, line } => GraiError::runtime(line, message),

                    // Statically rejected by the resolver; kept as a runtime
                    // diagnostic rather than a panic in case a caller skips
                    // the resolve pass.
                    InterpretError::ReturnSignal { line, .. } => {
                        GraiError::runtime(line, "Cannot return from top-level code")
                    }
                });
            }
        }

        info!("Interpretation completed successfully");

        Ok(())
    }

    /// Executes a single statement.
    fn execute(&mut self, stmt: &Stmt<'src>) -> IResult<'src, ()> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;

                Ok(())
            }

            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;

                println!("{}", value);

                Ok(())
            }

            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };

                debug!("Variable '{}' defined with value: {}", name.lexeme, value);

                self.environment.borrow_mut().define(name.lexeme, value);

                Ok(())
            }

            Stmt::Block(statements) => {
                let environment = Rc::new(RefCell::new(Environment::with_enclosing(
                    self.environment.clone(),
                )));

                self.execute_block(statements, environment)
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_stmt) = else_branch {
                    self.execute(else_stmt)
                } else {
                    Ok(())
                }
            }

            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    self.execute(body)?;
                }

                Ok(())
            }

            Stmt::Function(decl) => {
                debug!("Defining function '{}'", decl.name.lexeme);

                // Capture the *current* environment as the closure; binding
                // the name first makes recursion work.
                let function = Function::new(decl.clone(), self.environment.clone(), false);

                self.environment
                    .borrow_mut()
                    .define(decl.name.lexeme, Value::Function(Rc::new(function)));

                Ok(())
            }

            Stmt::Return { keyword, value } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };

                Err(InterpretError::ReturnSignal {
                    value,
                    line: keyword.line,
                })
            }

            Stmt::Class(decl) => self.execute_class(decl),
        }
    }

    /// Class declaration: evaluate the superclass (if any), build the method
    /// table, and bind the finished class object under the class name.
    fn execute_class(&mut self, decl: &Rc<ClassDecl<'src>>) -> IResult<'src, ()> {
        debug!("Defining class '{}'", decl.name.lexeme);

        let superclass: Option<Rc<Class<'src>>> = match &decl.superclass {
            Some(expr) => match self.evaluate(expr)? {
                Value::Class(c) => Some(c),

                _ => {
                    let line = match expr {
                        Expr::Variable { name, .. } => name.line,
                        _ => decl.name.line,
                    };

                    return Err(InterpretError::runtime(line, "Superclass must be a class"));
                }
            },

            None => None,
        };

        self.environment
            .borrow_mut()
            .define(decl.name.lexeme, Value::Nil);

        // Methods close over an extra scope holding `super` when an
        // inherits clause is present; the resolver assumes the same shape.
        let method_closure = match &superclass {
            Some(sc) => {
                let env = Rc::new(RefCell::new(Environment::with_enclosing(
                    self.environment.clone(),
                )));

                env.borrow_mut().define("super", Value::Class(sc.clone()));

                env
            }

            None => self.environment.clone(),
        };

        let mut methods: HashMap<String, Rc<Function<'src>>> = HashMap::new();

        for method in &decl.methods {
            let is_initializer = method.name.lexeme == INITIALIZER_NAME;

            methods.insert(
                method.name.lexeme.to_string(),
                Rc::new(Function::new(
                    method.clone(),
                    method_closure.clone(),
                    is_initializer,
                )),
            );
        }

        let class = Value::Class(Rc::new(Class::new(decl.name.lexeme, superclass, methods)));

        self.environment
            .borrow_mut()
            .assign(decl.name.lexeme, class)
            .map_err(|message| InterpretError::runtime(decl.name.line, message))
    }

    /// Run `statements` inside `environment`, restoring the previous scope
    /// afterwards even when an error or a return signal unwinds through.
    pub fn execute_block(
        &mut self,
        statements: &[Stmt<'src>],
        environment: Rc<RefCell<Environment<'src>>>,
    ) -> IResult<'src, ()> {
        let previous = std::mem::replace(&mut self.environment, environment);

        let mut result = Ok(());

        for statement in statements {
            result = self.execute(statement);

            if result.is_err() {
                break;
            }
        }

        self.environment = previous;

        result
    }

    // ───────────────────────── evaluation ──────────────────────────

    /// Evaluates an expression and returns a Value.
    pub fn evaluate(&mut self, expr: &Expr<'src>) -> IResult<'src, Value<'src>> {
        match expr {
            Expr::Literal(literal) => Ok(match literal {
                LiteralValue::Number(n) => Value::Number(*n),
                LiteralValue::Str(s) => Value::Str(s.clone()),
                LiteralValue::True => Value::Bool(true),
                LiteralValue::False => Value::Bool(false),
                LiteralValue::Nil => Value::Nil,
            }),

            Expr::Grouping(inner) => self.evaluate(inner),

            Expr::Unary { operator, right } => self.evaluate_unary(operator, right),

            Expr::Binary {
                left,
                operator,
                right,
            } => self.evaluate_binary(left, operator, right),

            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left_val = self.evaluate(left)?;

                // `sau` keeps a truthy left operand, `si` a falsy one; the
                // right operand is only evaluated otherwise.
                match operator.token_type {
                    TokenType::OR if left_val.is_truthy() => Ok(left_val),
                    TokenType::AND if !left_val.is_truthy() => Ok(left_val),
                    _ => self.evaluate(right),
                }
            }

            Expr::Variable { name, id } => self.look_up_variable(name, *id),

            Expr::Assign { name, value, id } => {
                let value = self.evaluate(value)?;

                let result = match self.locals.get(id) {
                    Some(distance) => Environment::assign_at(
                        &self.environment,
                        *distance,
                        name.lexeme,
                        value.clone(),
                    ),

                    None => self.globals.borrow_mut().assign(name.lexeme, value.clone()),
                };

                result.map_err(|message| InterpretError::runtime(name.line, message))?;

                Ok(value)
            }

            Expr::Call {
                callee,
                paren,
                arguments,
            } => {
                let callee_val = self.evaluate(callee)?;

                let mut arg_values = Vec::with_capacity(arguments.len());

                for arg in arguments {
                    arg_values.push(self.evaluate(arg)?);
                }

                self.invoke_callable(&callee_val, paren, &arg_values)
            }

            Expr::Get { object, name } => match self.evaluate(object)? {
                Value::Instance(instance) => Instance::get(&instance, name),

                _ => Err(InterpretError::runtime(
                    name.line,
                    "Only instances have properties",
                )),
            },

            Expr::Set {
                object,
                name,
                value,
            } => match self.evaluate(object)? {
                Value::Instance(instance) => {
                    let value = self.evaluate(value)?;

                    instance.set(name.lexeme, value.clone());

                    Ok(value)
                }

                _ => Err(InterpretError::runtime(
                    name.line,
                    "Only instances have fields",
                )),
            },

            Expr::This { keyword, id } => self.look_up_variable(keyword, *id),

            Expr::Super {
                keyword,
                method,
                id,
            } => self.evaluate_super(keyword, method, *id),
        }
    }

    fn evaluate_unary(&mut self, op: &Token<'src>, expr: &Expr<'src>) -> IResult<'src, Value<'src>> {
        let right = self.evaluate(expr)?;

        match op.token_type {
            TokenType::MINUS => match right {
                Value::Number(n) => Ok(Value::Number(-n)),
                _ => Err(InterpretError::runtime(
                    op.line,
                    "Operand must be a number",
                )),
            },

            TokenType::BANG => Ok(Value::Bool(!right.is_truthy())),

            _ => Err(InterpretError::runtime(op.line, "Invalid unary operator")),
        }
    }

    fn evaluate_binary(
        &mut self,
        left: &Expr<'src>,
        op: &Token<'src>,
        right: &Expr<'src>,
    ) -> IResult<'src, Value<'src>> {
        let left_val = self.evaluate(left)?;
        let right_val = self.evaluate(right)?;

        match op.token_type {
            // `+` is overloaded: numeric addition, or string concatenation of
            // both operands' display forms when either side is a string.
            TokenType::PLUS => match (&left_val, &right_val) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),

                (a, b) if matches!(a, Value::Str(_)) || matches!(b, Value::Str(_)) => {
                    Ok(Value::Str(format!("{}{}", a, b)))
                }

                _ => Err(InterpretError::runtime(
                    op.line,
                    "Operands must be numbers or strings",
                )),
            },

            TokenType::MINUS => {
                let (a, b) = Self::number_operands(op, &left_val, &right_val)?;

                Ok(Value::Number(a - b))
            }

            TokenType::STAR => {
                let (a, b) = Self::number_operands(op, &left_val, &right_val)?;

                Ok(Value::Number(a * b))
            }

            // IEEE-754 semantics: dividing by zero yields an infinity.
            TokenType::SLASH => {
                let (a, b) = Self::number_operands(op, &left_val, &right_val)?;

                Ok(Value::Number(a / b))
            }

            TokenType::PERCENT => {
                let (a, b) = Self::number_operands(op, &left_val, &right_val)?;

                Ok(Value::Number(a % b))
            }

            TokenType::GREATER => {
                let (a, b) = Self::number_operands(op, &left_val, &right_val)?;

                Ok(Value::Bool(a > b))
            }

            TokenType::GREATER_EQUAL => {
                let (a, b) = Self::number_operands(op, &left_val, &right_val)?;

                Ok(Value::Bool(a >= b))
            }

            TokenType::LESS => {
                let (a, b) = Self::number_operands(op, &left_val, &right_val)?;

                Ok(Value::Bool(a < b))
            }

            TokenType::LESS_EQUAL => {
                let (a, b) = Self::number_operands(op, &left_val, &right_val)?;

                Ok(Value::Bool(a <= b))
            }

            TokenType::EQUAL_EQUAL => Ok(Value::Bool(left_val == right_val)),

            TokenType::BANG_EQUAL => Ok(Value::Bool(left_val != right_val)),

            _ => Err(InterpretError::runtime(op.line, "Invalid binary operator")),
        }
    }

    fn number_operands(
        op: &Token<'src>,
        left: &Value<'src>,
        right: &Value<'src>,
    ) -> IResult<'src, (f64, f64)> {
        match (left, right) {
            (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
            _ => Err(InterpretError::runtime(
                op.line,
                "Operands must be numbers",
            )),
        }
    }

    /// Variable reference through the resolution table: a recorded distance
    /// walks exactly that many enclosing links; otherwise the global scope.
    fn look_up_variable(&self, name: &Token<'src>, id: ExprId) -> IResult<'src, Value<'src>> {
        let result = match self.locals.get(&id) {
            Some(distance) => Environment::get_at(&self.environment, *distance, name.lexeme),
            None => self.globals.borrow().get(name.lexeme),
        };

        result.map_err(|message| InterpretError::runtime(name.line, message))
    }

    /// `super.method` starts the lookup one level above the class the
    /// enclosing method was *lexically* defined in, then binds the hit to
    /// the current `instanta`.
    fn evaluate_super(
        &mut self,
        keyword: &Token<'src>,
        method: &Token<'src>,
        id: ExprId,
    ) -> IResult<'src, Value<'src>> {
        let distance = match self.locals.get(&id) {
            Some(distance) => *distance,
            None => {
                return Err(InterpretError::runtime(
                    keyword.line,
                    "Cannot use 'super' here",
                ));
            }
        };

        let superclass = match Environment::get_at(&self.environment, distance, "super") {
            Ok(Value::Class(c)) => c,
            _ => {
                return Err(InterpretError::runtime(
                    keyword.line,
                    "Cannot use 'super' here",
                ));
            }
        };

        // `instanta` lives one scope inside the `super` scope.
        let instance = Environment::get_at(&self.environment, distance - 1, "instanta")
            .map_err(|message| InterpretError::runtime(keyword.line, message))?;

        match superclass.find_method(method.lexeme) {
            Some(m) => Ok(Value::Function(Rc::new(m.bind(instance)))),

            None => Err(InterpretError::runtime(
                method.line,
                format!("Undefined property '{}'", method.lexeme),
            )),
        }
    }

    /// Invokes a callable (native, user function, or class constructor).
    fn invoke_callable(
        &mut self,
        callee: &Value<'src>,
        paren: &Token<'src>,
        arguments: &[Value<'src>],
    ) -> IResult<'src, Value<'src>> {
        match callee {
            Value::Native(native) => {
                Self::check_arity(native.arity, arguments.len(), paren.line)?;

                debug!("Calling native function '{}'", native.name);

                (native.func)(arguments)
                    .map_err(|message| InterpretError::runtime(paren.line, message))
            }

            Value::Function(function) => {
                Self::check_arity(function.arity(), arguments.len(), paren.line)?;

                function.call(self, arguments)
            }

            Value::Class(class) => {
                Self::check_arity(class.arity(), arguments.len(), paren.line)?;

                debug!("Instantiating class '{}'", class.name);

                let instance = Value::Instance(Rc::new(Instance::new(class.clone())));

                if let Some(init) = class.find_method(INITIALIZER_NAME) {
                    init.bind(instance.clone()).call(self, arguments)?;
                }

                Ok(instance)
            }

            _ => Err(InterpretError::runtime(
                paren.line,
                "Can only call functions and classes",
            )),
        }
    }

    fn check_arity(expected: usize, got: usize, line: usize) -> IResult<'src, ()> {
        if expected != got {
            return Err(InterpretError::runtime(
                line,
                format!("Expected {} arguments but got {}", expected, got),
            ));
        }

        Ok(())
    }
}

impl Default for Interpreter<'_> {
    fn default() -> Self {
        Self::new()
    }
}
