use crate::ast::{
    BinaryOp, Block, Expression, FunctionDecl, HttpRequest, Import, Program, Statement, Visitor,
};
use crate::builtins;
use crate::callable::Function;
use crate::class::Class;
use crate::config::Options;
use crate::dict::Dict;
use crate::environment::Environment;
use crate::error::RuntimeError;
use crate::http::{HttpTransport, UreqTransport, ERROR_PREFIX};
use crate::instance::Instance;
use crate::module;
use crate::shared_list::SharedList;
use crate::value::{format_number, is_truthy, parse_number, Value};
use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, trace, warn};

const JSON_CONTENT_TYPE: &str = "Content-Type: application/json";

/// How a statement finished.
#[derive(Debug, Clone)]
pub enum Flow {
    Normal(Value),
    Return(Value),
    Break,
    Continue,
}

/// Seconds spent in each phase of a run, as reported by `timing()`.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Timings {
    pub compile_time: f64,
    pub execute_time: f64,
    pub total_time: f64,
}

type EvalResult = Result<Value, RuntimeError>;
type ExecResult = Result<Flow, RuntimeError>;

pub struct Interpreter {
    pub environment: Environment,
    pub timings: Timings,
    loop_depth: usize,
    /// A `break` or `continue` that ended a called function, waiting for the
    /// caller's loop.
    pending: Option<Flow>,
    out: Box<dyn Write>,
    transport: Box<dyn HttpTransport>,
    options: Options,
    module_root: PathBuf,
    loading: Vec<PathBuf>,
    started: Instant,
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}

impl Visitor<Expression, EvalResult> for Interpreter {
    fn visit(&mut self, expr: &Expression) -> EvalResult {
        match expr {
            Expression::Number(text) => Ok(Value::Number(parse_number(text))),
            Expression::Str(text) => Ok(Value::Str(text.clone())),
            Expression::Bool(b) => Ok(Value::Bool(*b)),
            Expression::Null => Ok(Value::Null),
            Expression::Variable { name, .. } => Ok(self.environment.get_variable(name)),
            Expression::Negate(operand) => match self.evaluate(operand)? {
                Value::Number(n) => Ok(Value::Number(-n)),
                _ => Ok(Value::Null),
            },
            Expression::Binary {
                left,
                operator,
                right,
            } => {
                let lv = self.evaluate(left)?;
                let rv = self.evaluate(right)?;
                Ok(binary(*operator, lv, rv))
            }
            Expression::Call {
                name, arguments, ..
            } => self.call_named(name, arguments),
            Expression::Member {
                object,
                member,
                arguments,
            } => {
                let object = self.evaluate(object)?;
                self.member(object, member, arguments.as_deref())
            }
            Expression::Index {
                collection, index, ..
            } => {
                let collection = self.evaluate(collection)?;
                let index = self.evaluate(index)?;
                index_value(collection, index)
            }
            Expression::New { class, .. } => match self.environment.get_variable(class) {
                Value::Class(class) => {
                    trace!(class = class.name(), "new instance");
                    Ok(Value::Object(Instance::new(class)))
                }
                _ => Ok(Value::Null),
            },
            Expression::List(items) => {
                let list = SharedList::new();
                for item in items {
                    list.push(self.evaluate(item)?);
                }
                Ok(Value::List(list))
            }
            Expression::Dict(pairs) => {
                let mut dict = Dict::new();
                for (key, value) in pairs {
                    let key = self.evaluate(key)?;
                    let value = self.evaluate(value)?;
                    if let Value::Str(key) = key {
                        dict.insert(&key, value);
                    }
                }
                Ok(Value::Dict(dict.shared()))
            }
            Expression::Http(request) => self.http(request),
        }
    }
}

impl Visitor<Statement, ExecResult> for Interpreter {
    fn visit(&mut self, stmt: &Statement) -> ExecResult {
        match stmt {
            Statement::Expression(expr) => Ok(Flow::Normal(self.evaluate(expr)?)),
            Statement::Assign { name, value } => {
                let value = self.evaluate(value)?;
                self.environment.set_variable(name, value.clone());
                Ok(Flow::Normal(value))
            }
            Statement::SetMember {
                object,
                member,
                value,
            } => {
                let value = self.evaluate(value)?;
                if let Value::Object(instance) = self.environment.get_variable(object) {
                    instance.set(member, value.clone());
                }
                Ok(Flow::Normal(value))
            }
            Statement::Print(expressions) => {
                let mut last = Value::Null;
                let mut parts: Vec<String> = Vec::new();
                for expr in expressions {
                    last = self.evaluate(expr)?;
                    parts.push(last.to_string());
                }
                self.write_line(&parts.join(" "));
                Ok(Flow::Normal(last))
            }
            Statement::Block(block) => self.execute_block(block),
            Statement::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if is_truthy(&self.evaluate(condition)?) {
                    self.execute_block(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute_block(else_branch)
                } else {
                    Ok(Flow::Normal(Value::Null))
                }
            }
            Statement::While { condition, body } => self.in_loop(|interpreter| -> ExecResult {
                while is_truthy(&interpreter.evaluate(condition)?) {
                    match interpreter.execute_block(body)? {
                        Flow::Break => break,
                        Flow::Return(value) => return Ok(Flow::Return(value)),
                        Flow::Normal(_) | Flow::Continue => {}
                    }
                }
                Ok(Flow::Normal(Value::Null))
            }),
            Statement::Repeat { count, body } => {
                let count = self.evaluate(count)?;
                if let Some(flow) = self.pending.take() {
                    return Ok(flow);
                }
                let count = match count {
                    Value::Number(n) => n as i64,
                    _ => return Ok(Flow::Normal(Value::Null)),
                };
                self.in_loop(|interpreter| -> ExecResult {
                    for _ in 0..count {
                        match interpreter.execute_block(body)? {
                            Flow::Break => break,
                            Flow::Return(value) => return Ok(Flow::Return(value)),
                            Flow::Normal(_) | Flow::Continue => {}
                        }
                    }
                    Ok(Flow::Normal(Value::Null))
                })
            }
            Statement::Break { .. } if self.loop_depth > 0 => Ok(Flow::Break),
            Statement::Continue { .. } if self.loop_depth > 0 => Ok(Flow::Continue),
            Statement::Break { .. } | Statement::Continue { .. } => Ok(Flow::Normal(Value::Null)),
            Statement::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Null,
                };
                Ok(Flow::Return(value))
            }
            Statement::Try { body, handler } => match self.execute_block(body) {
                Err(err) if err.is_catchable() => {
                    debug!(error = %err, "caught");
                    self.scoped(|interpreter| {
                        interpreter
                            .environment
                            .set_variable("error", Value::Str(err.message()));
                        interpreter.execute_block(handler)
                    })
                }
                result => result,
            },
            Statement::Function(decl) => {
                self.environment
                    .set_variable(&decl.name, Value::Function(Function::User(decl.clone())));
                Ok(Flow::Normal(Value::Null))
            }
            Statement::Class(decl) => {
                self.environment
                    .set_variable(&decl.name, Value::Class(Class::new(decl)));
                Ok(Flow::Normal(Value::Null))
            }
            Statement::Import(import) => {
                self.import(import)?;
                Ok(Flow::Normal(Value::Null))
            }
            Statement::Start { entry, .. } => match self.resolve_callee(entry) {
                Some(function) => Ok(Flow::Normal(self.call(&function, Vec::new())?)),
                None => {
                    self.write_line(&format!("Error: {} function not found", entry));
                    Ok(Flow::Normal(Value::Null))
                }
            },
        }
    }
}

impl Interpreter {
    /// A fresh interpreter writing to stdout, with every builtin bound.
    pub fn new() -> Interpreter {
        let mut interpreter = Interpreter {
            environment: Environment::new(),
            timings: Timings::default(),
            loop_depth: 0,
            pending: None,
            out: Box::new(io::stdout()),
            transport: Box::new(UreqTransport::new()),
            options: Options::default(),
            module_root: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            loading: Vec::new(),
            started: Instant::now(),
        };
        builtins::register_globals(&mut interpreter);
        interpreter
    }
    pub fn with_output(mut self, out: Box<dyn Write>) -> Interpreter {
        self.out = out;
        self
    }
    pub fn with_transport(mut self, transport: Box<dyn HttpTransport>) -> Interpreter {
        self.transport = transport;
        self
    }
    pub fn with_options(mut self, options: Options) -> Interpreter {
        self.options = options;
        self
    }
    /// Directory that module names are resolved against.
    pub fn with_module_root(mut self, root: PathBuf) -> Interpreter {
        self.module_root = root;
        self
    }
    pub fn options(&self) -> Options {
        self.options
    }
    pub fn elapsed_seconds(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    /// Program output is flushed as soon as it is written.
    pub fn write_str(&mut self, text: &str) {
        let result = self
            .out
            .write_all(text.as_bytes())
            .and_then(|_| self.out.flush());
        if let Err(err) = result {
            warn!(%err, "could not write program output");
        }
    }
    pub fn write_line(&mut self, text: &str) {
        self.write_str(&format!("{}\n", text));
    }

    fn evaluate(&mut self, expr: &Expression) -> EvalResult {
        expr.accept(self)
    }
    pub fn execute(&mut self, stmt: &Statement) -> ExecResult {
        stmt.accept(self)
    }

    /// Runs a whole program. A top-level `ret` ends it early; the value of
    /// the last statement run is returned.
    pub fn interpret(&mut self, program: &Program) -> EvalResult {
        match self.execute_statements(&program.statements)? {
            Flow::Normal(value) | Flow::Return(value) => Ok(value),
            Flow::Break | Flow::Continue => Ok(Value::Null),
        }
    }

    /// Pushes a scope around `f`. The scope is popped on every exit,
    /// including errors.
    pub fn scoped<T>(&mut self, f: impl FnOnce(&mut Interpreter) -> T) -> T {
        self.environment.push_scope();
        let result = f(self);
        self.environment.pop_scope();
        result
    }

    fn in_loop<T>(&mut self, f: impl FnOnce(&mut Interpreter) -> T) -> T {
        self.loop_depth += 1;
        let result = f(self);
        self.loop_depth -= 1;
        result
    }

    fn execute_statements(&mut self, statements: &[Statement]) -> ExecResult {
        let mut last = Value::Null;
        for stmt in statements {
            if let Some(flow) = self.pending.take() {
                return Ok(flow);
            }
            match self.execute(stmt)? {
                Flow::Normal(value) => last = value,
                flow => return Ok(flow),
            }
        }
        Ok(self.pending.take().unwrap_or(Flow::Normal(last)))
    }

    fn execute_block(&mut self, block: &Block) -> ExecResult {
        self.scoped(|interpreter| interpreter.execute_statements(&block.statements))
    }

    fn evaluate_all(&mut self, arguments: &[Expression]) -> Result<Vec<Value>, RuntimeError> {
        arguments.iter().map(|arg| self.evaluate(arg)).collect()
    }

    /// Builtins first, then whatever function the name is bound to.
    fn resolve_callee(&self, name: &str) -> Option<Function> {
        if let Some(native) = builtins::lookup(name) {
            return Some(Function::Native(native));
        }
        match self.environment.get_variable(name) {
            Value::Function(function) => Some(function),
            _ => None,
        }
    }

    fn call_named(&mut self, name: &str, arguments: &[Expression]) -> EvalResult {
        match self.resolve_callee(name) {
            Some(function) => {
                let arguments = self.evaluate_all(arguments)?;
                self.call(&function, arguments)
            }
            None => {
                self.write_line(&format!("Warning: function '{}' not found", name));
                Ok(Value::Null)
            }
        }
    }

    pub fn call(&mut self, function: &Function, arguments: Vec<Value>) -> EvalResult {
        trace!(name = function.name(), args = arguments.len(), "call");
        match function {
            Function::User(decl) => self.call_function(decl, arguments),
            Function::Native(native) => (native.call)(self, &arguments),
        }
    }

    /// Binds parameters positionally in a new scope and runs the body. Extra
    /// arguments are dropped and missing ones stay unbound. Without a `ret`,
    /// the value of the last statement is the result.
    fn call_function(&mut self, decl: &FunctionDecl, arguments: Vec<Value>) -> EvalResult {
        let body = match &decl.body {
            Some(body) => body,
            None => return Ok(Value::Null),
        };
        let result = self.scoped(|interpreter| {
            for (param, argument) in decl.params.iter().zip(arguments) {
                interpreter.environment.set_variable(param, argument);
            }
            interpreter.execute_statements(&body.statements)
        });
        match result? {
            Flow::Normal(value) | Flow::Return(value) => Ok(value),
            // The loop counter is shared with the caller, so this ends the
            // body and is handed on to the loop around the call.
            flow => {
                self.pending = Some(flow);
                Ok(Value::Null)
            }
        }
    }

    fn member(
        &mut self,
        object: Value,
        member: &str,
        arguments: Option<&[Expression]>,
    ) -> EvalResult {
        match object {
            Value::FileHandle(_) => match builtins::file_method(member) {
                Some(native) => {
                    let mut args = vec![object];
                    args.extend(self.evaluate_all(arguments.unwrap_or(&[]))?);
                    (native.call)(self, &args)
                }
                None => Ok(Value::Null),
            },
            Value::Object(instance) => {
                let value = match instance.get(member) {
                    Some(value) => value,
                    None => return Ok(Value::Null),
                };
                match (value, arguments) {
                    // Methods see no receiver; namespace members are plain builtins.
                    (Value::Function(function), Some(arguments)) => {
                        let arguments = self.evaluate_all(arguments)?;
                        self.call(&function, arguments)
                    }
                    (value, _) => Ok(value),
                }
            }
            Value::Str(_) | Value::List(_) | Value::Dict(_) => {
                match (builtins::method(member), arguments) {
                    (Some(native), Some(arguments)) => {
                        let mut args = vec![object];
                        args.extend(self.evaluate_all(arguments)?);
                        (native.call)(self, &args)
                    }
                    _ => Ok(Value::Null),
                }
            }
            _ => Ok(Value::Null),
        }
    }

    fn http(&mut self, request: &HttpRequest) -> EvalResult {
        let method = self.evaluate(&request.method)?;
        let url = self.evaluate(&request.url)?;
        let (method, url) = match (method, url) {
            (Value::Str(method), Value::Str(url)) => (method, url),
            _ => {
                return Ok(Value::Str(format!(
                    "{}Method and URL must be strings",
                    ERROR_PREFIX
                )))
            }
        };
        let body = match &request.body {
            Some(body) => match self.evaluate(body)? {
                Value::Str(body) => Some(body),
                _ => None,
            },
            None => None,
        };
        let mut headers: Vec<&str> = Vec::new();
        if body.is_some() && (method == "POST" || method == "PUT") {
            headers.push(JSON_CONTENT_TYPE);
        }
        match self
            .transport
            .request(&method, &url, body.as_deref(), &headers)
        {
            Ok(response) => Ok(Value::Str(response)),
            Err(err) => {
                debug!(%method, %url, %err, "http request failed");
                Ok(Value::Str(format!("{}{}", ERROR_PREFIX, err)))
            }
        }
    }

    /// Runs a module's statements in the current scope. A module that is
    /// missing or unreadable is reported and skipped.
    fn import(&mut self, import: &Import) -> Result<(), RuntimeError> {
        let path = match module::resolve(&self.module_root, &import.path) {
            Some(path) => path,
            None => {
                eprintln!("Error: Module '{}' not found", import.path);
                return Ok(());
            }
        };
        if self.loading.contains(&path) {
            debug!(module = %import.path, "already loading, skipped");
            return Ok(());
        }
        let program = match module::load(&path) {
            Ok(program) => program,
            Err(err) => {
                debug!(%err, "module load failed");
                eprintln!("Error: Cannot open module file '{}'", path.display());
                return Ok(());
            }
        };
        debug!(module = %import.path, path = %path.display(), "executing module");
        self.loading.push(path);
        let result = self.execute_statements(&program.statements);
        self.loading.pop();
        result.map(|_| ())
    }
}

fn truth(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Numbers combine arithmetically and compare to 1 or 0. `+` joins a string
/// with a string or number. Anything else is null.
fn binary(operator: BinaryOp, left: Value, right: Value) -> Value {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => Value::Number(match operator {
            BinaryOp::Add => l + r,
            BinaryOp::Subtract => l - r,
            BinaryOp::Multiply => l * r,
            BinaryOp::Divide => l / r,
            BinaryOp::Modulo => l % r,
            BinaryOp::Greater => truth(l > r),
            BinaryOp::Less => truth(l < r),
            BinaryOp::Equal => truth(l == r),
            BinaryOp::NotEqual => truth(l != r),
            BinaryOp::GreaterEqual => truth(l >= r),
            BinaryOp::LessEqual => truth(l <= r),
        }),
        (Value::Str(l), Value::Str(r)) => match operator {
            BinaryOp::Add => Value::Str(l + &r),
            BinaryOp::Equal => Value::Number(truth(l == r)),
            BinaryOp::NotEqual => Value::Number(truth(l != r)),
            _ => Value::Null,
        },
        (Value::Str(l), Value::Number(r)) if operator == BinaryOp::Add => {
            Value::Str(l + &format_number(r))
        }
        (Value::Number(l), Value::Str(r)) if operator == BinaryOp::Add => {
            Value::Str(format_number(l) + &r)
        }
        _ => Value::Null,
    }
}

fn index_value(collection: Value, index: Value) -> EvalResult {
    match (collection, index) {
        (Value::List(list), Value::Number(n)) => {
            let index = n as i64;
            if index < 0 {
                return Err(RuntimeError::IndexOutOfRange { index });
            }
            list.get(index as usize)
                .ok_or(RuntimeError::IndexOutOfRange { index })
        }
        (Value::Str(text), Value::Number(n)) if n >= 0.0 => Ok(text
            .chars()
            .nth(n as usize)
            .map_or(Value::Null, |c| Value::Str(c.to_string()))),
        (Value::Dict(dict), Value::Str(key)) => Ok(dict.borrow().get(&key).unwrap_or(Value::Null)),
        _ => Ok(Value::Null),
    }
}

#[cfg(test)]
mod interpreter_tests {
    use crate::ast::BinaryOp;
    use crate::error::RuntimeError;
    use crate::interpreter::{binary, index_value, Interpreter};
    use crate::parser;
    use crate::scanner;
    use crate::shared_list::SharedList;
    use crate::value::Value;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::io::{self, Write};
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Capture(Rc<RefCell<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn run(source: &str) -> (Result<Value, RuntimeError>, String) {
        let out = Capture::default();
        let mut interpreter = Interpreter::new().with_output(Box::new(out.clone()));
        let outcome = parser::parse(&scanner::scan_tokens(source));
        assert_eq!(outcome.diagnostics, vec![], "source: {}", source);
        let result = interpreter.interpret(&outcome.program);
        let text = String::from_utf8(out.0.borrow().clone()).unwrap();
        (result, text)
    }

    fn output(source: &str) -> String {
        let (result, text) = run(source);
        result.unwrap();
        text
    }

    fn n(x: f64) -> Value {
        Value::Number(x)
    }

    fn s(text: &str) -> Value {
        Value::Str(text.to_string())
    }

    #[test]
    fn arithmetic_is_flat_and_left_to_right() {
        assert_eq!(output("print:: 1 + 2 * 3"), "9\n");
        assert_eq!(output("print:: 7 % 4, 10 / 4, 2 - 5"), "3 2.5 -3\n");
        assert_eq!(output("print:: 3 > 2, 3 < 2, 2 == 2, 2 != 2, 2 >= 3, 2 <= 3"), "1 0 1 0 0 1\n");
    }

    #[test]
    fn binary_mixing() {
        assert_eq!(binary(BinaryOp::Add, s("x"), n(1.0)).to_string(), "x1");
        assert_eq!(binary(BinaryOp::Add, n(1.0), s("x")).to_string(), "1x");
        assert_eq!(binary(BinaryOp::Add, n(0.5), s("")).to_string(), "0.5");
        assert_eq!(binary(BinaryOp::Equal, s("a"), s("a")).to_string(), "1");
        assert!(binary(BinaryOp::Subtract, s("a"), n(1.0)).is_null());
        assert!(binary(BinaryOp::Add, Value::Bool(true), n(1.0)).is_null());
        assert!(binary(BinaryOp::Less, s("a"), s("b")).is_null());
    }

    #[test]
    fn indexing() {
        let list = SharedList::from(vec![n(1.0), n(2.0)]);
        assert_eq!(
            index_value(Value::List(list.clone()), n(1.0)).unwrap().to_string(),
            "2"
        );
        match index_value(Value::List(list), n(5.0)) {
            Err(RuntimeError::IndexOutOfRange { index }) => assert_eq!(index, 5),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(index_value(s("hey"), n(1.0)).unwrap().to_string(), "e");
        assert!(index_value(s("hey"), n(3.0)).unwrap().is_null());
        assert!(index_value(n(1.0), n(0.0)).unwrap().is_null());
    }

    #[test]
    fn blocks_shadow_outer_names() {
        assert_eq!(output("x = 1\n{ x = 2 print:: x }\nprint:: x"), "2\n1\n");
    }

    #[test]
    fn return_unwinds_loops_and_blocks() {
        let source = "
f! find(limit) {
    seen = []
    while 1 {
        list_append(seen, 0)
        if len(seen) == limit { ret len(seen) * 10 }
    }
    print:: \"unreachable\"
}
print:: find(3)
";
        assert_eq!(output(source), "30\n");
    }

    #[test]
    fn last_statement_is_the_implicit_result() {
        assert_eq!(output("f! two { 1 + 1 }\nprint:: two()"), "2\n");
        assert_eq!(output("f! nothing { ret }\nprint:: nothing()"), "null\n");
    }

    #[test]
    fn break_and_continue() {
        let source = "
seen = []
kept = []
while 1 {
    list_append(seen, 0)
    if len(seen) == 3 { continue }
    if len(seen) == 6 { break }
    list_append(kept, len(seen))
}
print:: len(kept), kept[0], kept[2]
break
continue
print:: \"after\"
";
        assert_eq!(output(source), "4 1 4\nafter\n");
    }

    #[test]
    fn loop_bodies_get_a_fresh_scope_each_pass() {
        assert_eq!(
            output("n = 0\nrepeat 3 { n = n + 1 print:: n }\nprint:: n"),
            "1\n1\n1\n0\n"
        );
    }

    #[test]
    fn loops_stop_on_break_inside_nested_blocks() {
        let source = "
i = [0]
while 1 {
    list_append(i, 0)
    if len(i) == 3 { print:: \"stop\" break }
}
print:: len(i)
";
        assert_eq!(output(source), "stop\n3\n");
    }

    #[test]
    fn break_inside_a_function_leaves_the_callers_loop() {
        let source = "
f! quit { print:: \"before\" break print:: \"still\" }
repeat 3 { quit() print:: \"rest\" }
print:: \"after\"
";
        assert_eq!(output(source), "before\nafter\n");
    }

    #[test]
    fn continue_inside_a_function_skips_the_rest_of_the_pass() {
        let source = "
seen = []
f! skip { continue }
repeat 3 { list_append(seen, 1) skip() print:: \"no\" }
print:: len(seen)
";
        assert_eq!(output(source), "3\n");
    }

    #[test]
    fn break_in_a_function_called_outside_loops_does_nothing() {
        let source = "
f! quit { break print:: \"still\" ret 2 }
print:: quit()
";
        assert_eq!(output(source), "still\n2\n");
    }

    #[test]
    fn break_from_a_call_in_a_condition() {
        let source = "
f! stop { break ret 1 }
n = []
while 1 {
    list_append(n, 1)
    if stop() { print:: \"no\" }
}
print:: len(n)
";
        assert_eq!(output(source), "1\n");
    }

    #[test]
    fn try_catch_binds_the_message() {
        let source = "
l = [1]
try { print:: l[5] print:: \"no\" } catch { print:: error }
try { print:: l[0] } catch { print:: \"no\" }
";
        assert_eq!(output(source), "List index out of range: 5\n1\n");
    }

    #[test]
    fn uncaught_errors_stop_the_program() {
        let (result, text) = run("print:: \"a\"\nx = [][0]\nprint:: \"b\"");
        assert!(matches!(result, Err(RuntimeError::IndexOutOfRange { index: 0 })));
        assert_eq!(text, "a\n");
    }

    #[test]
    fn exit_is_not_caught() {
        let (result, text) = run("try { sys.exit(4) } catch { print:: \"caught\" }");
        assert!(matches!(result, Err(RuntimeError::Exit { code: 4 })));
        assert_eq!(text, "");
    }

    #[test]
    fn builtins_take_precedence() {
        let source = "f! len(x) { ret 99 }\nprint:: len(\"abc\")";
        assert_eq!(output(source), "3\n");
    }

    #[test]
    fn missing_functions_warn() {
        assert_eq!(
            output("print:: nope(1)"),
            "Warning: function 'nope' not found\nnull\n"
        );
        assert_eq!(output("start >.<"), "Error: main function not found\n");
        assert_eq!(output("start >go<"), "Error: go function not found\n");
    }

    #[test]
    fn entry_point() {
        let source = "f! main { print:: \"Hello, \" + \"World!\" }\nstart >.<";
        assert_eq!(output(source), "Hello, World!\n");
    }

    #[test]
    fn objects_have_their_own_fields() {
        let source = "
cls Counter {
    f! describe { ret \"counter\" }
    f! twice(x) { ret x * 2 }
}
a = new Counter()
b = new Counter()
a.count = 1
b.count = 2
print:: a.count, b.count, a.twice(4), b.describe()
print:: a, Counter
";
        assert_eq!(output(source), "1 2 8 counter\n[Object] [Class]\n");
    }

    #[test]
    fn aliases_and_method_calls() {
        let source = "
a = [1]
b = a
list_append(b, 2)
a.append(3)
print:: len(a), a[2], \"hello\".slice(1, 3)
d = {\"x\": 1, y: 2}
print:: d[\"x\"], d[\"y\"], d[\"z\"], len(d.keys())
g = len
print:: g(\"abcd\")
";
        assert_eq!(output(source), "3 3 el\n1 2 null 2\n4\n");
    }

    #[test]
    fn printing_values() {
        assert_eq!(
            output("print:: 1, \"s\", true, null, [1], {}, -2.50"),
            "1 s true null [List] [Dict] -2.5\n"
        );
        assert_eq!(output("f! fn {}\nprint:: fn"), "[Function]\n");
    }

    #[test]
    fn top_level_return_stops_the_program() {
        assert_eq!(output("print:: 1\nret\nprint:: 2"), "1\n");
    }
}
