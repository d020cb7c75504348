use crate::ast::{Block, Expression, FunctionDecl, Program, Statement, Visitor};
use crate::builtins;
use crate::diagnostic::Diagnostic;
use std::collections::BTreeSet;

#[derive(Clone, Copy, Debug)]
enum FunctionType {
    None,
    Function,
    Method,
}

/// Static checks for `tess lint`. Nothing here changes how a program runs:
/// the interpreter treats every one of these findings as a no-op or a
/// printed warning.
pub struct Resolver {
    current_function: FunctionType,
    loop_depth: usize,
    /// Every name a call could legitimately reach.
    defined: BTreeSet<String>,
    has_imports: bool,
    diagnostics: Vec<Diagnostic>,
}

/// Lints a parsed program, in source order.
pub fn lint(program: &Program) -> Vec<Diagnostic> {
    let mut resolver = Resolver::new();
    resolver.resolve(program);
    resolver.diagnostics
}

impl Visitor<Expression, ()> for Resolver {
    fn visit(&mut self, expr: &Expression) {
        match expr {
            Expression::Number(_)
            | Expression::Str(_)
            | Expression::Bool(_)
            | Expression::Null
            | Expression::Variable { .. }
            | Expression::New { .. } => {}
            Expression::Negate(operand) => self.resolve_expr(operand),
            Expression::Binary { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }
            Expression::Call {
                name,
                arguments,
                line,
            } => {
                if !self.has_imports
                    && builtins::lookup(name).is_none()
                    && !self.defined.contains(name)
                {
                    self.warn(*line, &format!("Call to undefined function '{}'.", name));
                }
                self.resolve_exprs(arguments);
            }
            Expression::Member {
                object, arguments, ..
            } => {
                self.resolve_expr(object);
                if let Some(arguments) = arguments {
                    self.resolve_exprs(arguments);
                }
            }
            Expression::Index {
                collection, index, ..
            } => {
                self.resolve_expr(collection);
                self.resolve_expr(index);
            }
            Expression::List(items) => self.resolve_exprs(items),
            Expression::Dict(pairs) => {
                for (key, value) in pairs {
                    self.resolve_expr(key);
                    self.resolve_expr(value);
                }
            }
            Expression::Http(request) => {
                self.resolve_expr(&request.method);
                self.resolve_expr(&request.url);
                if let Some(body) = &request.body {
                    self.resolve_expr(body);
                }
            }
        }
    }
}

impl Visitor<Statement, ()> for Resolver {
    fn visit(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Expression(expr) => self.resolve_expr(expr),
            Statement::Assign { value, .. } | Statement::SetMember { value, .. } => {
                self.resolve_expr(value)
            }
            Statement::Print(expressions) => self.resolve_exprs(expressions),
            Statement::Block(block) => self.resolve_block(block),
            Statement::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(condition);
                self.resolve_block(then_branch);
                if let Some(else_branch) = else_branch {
                    self.resolve_block(else_branch);
                }
            }
            Statement::While { condition, body } => {
                self.resolve_expr(condition);
                self.resolve_loop(body);
            }
            Statement::Repeat { count, body } => {
                self.resolve_expr(count);
                self.resolve_loop(body);
            }
            Statement::Break { line } if self.outside_loops() => {
                self.warn(*line, "'break' outside a loop does nothing.")
            }
            Statement::Continue { line } if self.outside_loops() => {
                self.warn(*line, "'continue' outside a loop does nothing.")
            }
            Statement::Break { .. } | Statement::Continue { .. } => {}
            Statement::Return { value, line } => {
                if let FunctionType::None = self.current_function {
                    self.warn(*line, "'ret' outside a function ends the program.");
                }
                if let Some(value) = value {
                    self.resolve_expr(value);
                }
            }
            Statement::Try { body, handler } => {
                self.resolve_block(body);
                self.resolve_block(handler);
            }
            Statement::Function(decl) => self.resolve_function(decl, FunctionType::Function),
            Statement::Class(decl) => {
                for method in &decl.methods {
                    self.resolve_function(method, FunctionType::Method);
                }
            }
            Statement::Import(_) => {}
            Statement::Start { entry, line } => {
                if !self.has_imports && !self.defined.contains(entry) {
                    self.warn(
                        *line,
                        &format!("Entry point '{}' is not defined.", entry),
                    );
                }
            }
        }
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Resolver::new()
    }
}

impl Resolver {
    pub fn new() -> Resolver {
        Resolver {
            current_function: FunctionType::None,
            loop_depth: 0,
            defined: BTreeSet::new(),
            has_imports: false,
            diagnostics: Vec::new(),
        }
    }
    pub fn resolve(&mut self, program: &Program) {
        // Functions may be called before they are defined, so collect names first.
        for stmt in &program.statements {
            self.declare(stmt);
        }
        for stmt in &program.statements {
            self.resolve_stmt(stmt);
        }
    }
    /// Inside a function body a stray `break` may still end the caller's
    /// loop, so only top-level code is certain to be outside one.
    fn outside_loops(&self) -> bool {
        self.loop_depth == 0 && matches!(self.current_function, FunctionType::None)
    }
    fn warn(&mut self, line: u32, message: &str) {
        self.diagnostics.push(Diagnostic::on_line(line, message));
    }
    fn resolve_expr(&mut self, expr: &Expression) {
        expr.accept(self)
    }
    fn resolve_exprs(&mut self, exprs: &[Expression]) {
        for expr in exprs {
            self.resolve_expr(expr);
        }
    }
    fn resolve_stmt(&mut self, stmt: &Statement) {
        stmt.accept(self)
    }
    fn resolve_block(&mut self, block: &Block) {
        for stmt in &block.statements {
            self.resolve_stmt(stmt);
        }
    }
    fn resolve_loop(&mut self, body: &Block) {
        self.loop_depth += 1;
        self.resolve_block(body);
        self.loop_depth -= 1;
    }
    fn resolve_function(&mut self, decl: &FunctionDecl, function_type: FunctionType) {
        let enclosing_function = self.current_function;
        let enclosing_depth = self.loop_depth;
        self.current_function = function_type;
        self.loop_depth = 0;
        if let Some(body) = &decl.body {
            self.resolve_block(body);
        }
        self.current_function = enclosing_function;
        self.loop_depth = enclosing_depth;
    }
    fn declare_block(&mut self, block: &Block) {
        for stmt in &block.statements {
            self.declare(stmt);
        }
    }
    fn declare(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Function(decl) => {
                self.defined.insert(decl.name.clone());
                self.defined.extend(decl.params.iter().cloned());
                if let Some(body) = &decl.body {
                    self.declare_block(body);
                }
            }
            Statement::Class(decl) => {
                self.defined.insert(decl.name.clone());
                for method in &decl.methods {
                    self.defined.extend(method.params.iter().cloned());
                    if let Some(body) = &method.body {
                        self.declare_block(body);
                    }
                }
            }
            Statement::Assign { name, .. } => {
                self.defined.insert(name.clone());
            }
            Statement::Import(_) => self.has_imports = true,
            Statement::Block(block) => self.declare_block(block),
            Statement::If {
                then_branch,
                else_branch,
                ..
            } => {
                self.declare_block(then_branch);
                if let Some(else_branch) = else_branch {
                    self.declare_block(else_branch);
                }
            }
            Statement::While { body, .. } | Statement::Repeat { body, .. } => {
                self.declare_block(body)
            }
            Statement::Try { body, handler } => {
                self.declare_block(body);
                self.declare_block(handler);
            }
            _ => {}
        }
    }
}
