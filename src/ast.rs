use std::rc::Rc;
use strum_macros::{Display, EnumString};

/// The flat binary operator tier. Every operator binds equally tightly and
/// chains left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum BinaryOp {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Subtract,
    #[strum(serialize = "*")]
    Multiply,
    #[strum(serialize = "/")]
    Divide,
    #[strum(serialize = "%")]
    Modulo,
    #[strum(serialize = ">")]
    Greater,
    #[strum(serialize = "<")]
    Less,
    #[strum(serialize = "==")]
    Equal,
    #[strum(serialize = "!=")]
    NotEqual,
    #[strum(serialize = ">=")]
    GreaterEqual,
    #[strum(serialize = "<=")]
    LessEqual,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Raw literal text; converted when evaluated.
    Number(String),
    Str(String),
    Bool(bool),
    Null,
    Variable {
        name: String,
        line: u32,
    },
    Negate(Box<Expression>),
    Binary {
        left: Box<Expression>,
        operator: BinaryOp,
        right: Box<Expression>,
    },
    Call {
        name: String,
        arguments: Vec<Expression>,
        line: u32,
    },
    /// `object.member`, or `object.member(args)` when `arguments` is set.
    Member {
        object: Box<Expression>,
        member: String,
        arguments: Option<Vec<Expression>>,
    },
    Index {
        collection: Box<Expression>,
        index: Box<Expression>,
        line: u32,
    },
    New {
        class: String,
        line: u32,
    },
    List(Vec<Expression>),
    Dict(Vec<(Expression, Expression)>),
    Http(HttpRequest),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Box<Expression>,
    pub url: Box<Expression>,
    pub body: Option<Box<Expression>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<String>,
    pub body: Option<Block>,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    pub methods: Vec<Rc<FunctionDecl>>,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    /// `name`, or `module/name` for `add name from module`.
    pub path: String,
    pub alias: Option<String>,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Expression(Expression),
    Assign {
        name: String,
        value: Expression,
    },
    SetMember {
        object: String,
        member: String,
        value: Expression,
    },
    Print(Vec<Expression>),
    Block(Block),
    If {
        condition: Expression,
        then_branch: Block,
        else_branch: Option<Block>,
    },
    While {
        condition: Expression,
        body: Block,
    },
    Repeat {
        count: Expression,
        body: Block,
    },
    Break {
        line: u32,
    },
    Continue {
        line: u32,
    },
    Return {
        value: Option<Expression>,
        line: u32,
    },
    Try {
        body: Block,
        handler: Block,
    },
    Function(Rc<FunctionDecl>),
    Class(Rc<ClassDecl>),
    Import(Import),
    /// `start >.<` (entry `main`) or `start >name<`.
    Start {
        entry: String,
        line: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

pub trait Visitor<T, Output> {
    fn visit(&mut self, n: &T) -> Output;
}

impl Expression {
    pub fn accept<T>(&self, v: &mut dyn Visitor<Expression, T>) -> T {
        v.visit(self)
    }
}

impl Statement {
    pub fn accept<T>(&self, v: &mut dyn Visitor<Statement, T>) -> T {
        v.visit(self)
    }
}

/// Renders a parsed program as s-expressions; `tess check --ast` prints this.
pub struct AstPrinter {}

impl AstPrinter {
    fn parenthesize(&mut self, name: &str, args: Vec<&Expression>) -> String {
        let mut x = String::from("(");
        x.push_str(name);
        for arg in args {
            x.push(' ');
            x.push_str(arg.accept(self).as_str());
        }
        x.push(')');
        x
    }
    fn block(&mut self, name: &str, head: Option<&Expression>, block: &Block) -> String {
        let mut x = format!("({}", name);
        if let Some(head) = head {
            x.push(' ');
            x.push_str(&head.accept(self));
        }
        for stmt in &block.statements {
            x.push(' ');
            x.push_str(&stmt.accept(self));
        }
        x.push(')');
        x
    }
    pub fn print_program(&mut self, program: &Program) -> Vec<String> {
        program
            .statements
            .iter()
            .map(|stmt| stmt.accept(self))
            .collect()
    }
}

impl Visitor<Expression, String> for AstPrinter {
    fn visit(&mut self, n: &Expression) -> String {
        match n {
            Expression::Number(x) => x.clone(),
            Expression::Str(x) => format!("{:?}", x),
            Expression::Bool(x) => x.to_string(),
            Expression::Null => String::from("null"),
            Expression::Variable { name, .. } => name.clone(),
            Expression::Negate(x) => self.parenthesize("-", vec![x]),
            Expression::Binary {
                left,
                operator,
                right,
            } => self.parenthesize(&operator.to_string(), vec![left, right]),
            Expression::Call {
                name, arguments, ..
            } => self.parenthesize(&format!("call {}", name), arguments.iter().collect()),
            Expression::Member {
                object,
                member,
                arguments,
            } => match arguments {
                None => self.parenthesize(&format!(". {}", member), vec![object]),
                Some(arguments) => {
                    let mut args: Vec<&Expression> = vec![object];
                    args.extend(arguments.iter());
                    self.parenthesize(&format!(".call {}", member), args)
                }
            },
            Expression::Index {
                collection, index, ..
            } => self.parenthesize("index", vec![collection, index]),
            Expression::New { class, .. } => format!("(new {})", class),
            Expression::List(items) => self.parenthesize("list", items.iter().collect()),
            Expression::Dict(pairs) => {
                let mut args: Vec<&Expression> = Vec::new();
                for (key, value) in pairs {
                    args.push(key);
                    args.push(value);
                }
                self.parenthesize("dict", args)
            }
            Expression::Http(request) => {
                let mut args: Vec<&Expression> = vec![&request.method, &request.url];
                if let Some(body) = &request.body {
                    args.push(body);
                }
                self.parenthesize("request", args)
            }
        }
    }
}

impl Visitor<Statement, String> for AstPrinter {
    fn visit(&mut self, n: &Statement) -> String {
        match n {
            Statement::Expression(e) => e.accept(self),
            Statement::Assign { name, value } => format!("(assign {} {})", name, value.accept(self)),
            Statement::SetMember {
                object,
                member,
                value,
            } => format!("(set {}.{} {})", object, member, value.accept(self)),
            Statement::Print(exprs) => self.parenthesize("print", exprs.iter().collect()),
            Statement::Block(block) => self.block("block", None, block),
            Statement::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let mut x = self.block("if", Some(condition), then_branch);
                if let Some(else_branch) = else_branch {
                    x.pop();
                    x.push(' ');
                    x.push_str(&self.block("else", None, else_branch));
                    x.push(')');
                }
                x
            }
            Statement::While { condition, body } => self.block("while", Some(condition), body),
            Statement::Repeat { count, body } => self.block("repeat", Some(count), body),
            Statement::Break { .. } => String::from("(break)"),
            Statement::Continue { .. } => String::from("(continue)"),
            Statement::Return { value, .. } => match value {
                Some(value) => self.parenthesize("ret", vec![value]),
                None => String::from("(ret)"),
            },
            Statement::Try { body, handler } => format!(
                "(try {} {})",
                self.block("block", None, body),
                self.block("catch", None, handler)
            ),
            Statement::Function(decl) => {
                let head = format!("f! {} ({})", decl.name, decl.params.join(" "));
                match &decl.body {
                    Some(body) => self.block(&head, None, body),
                    None => format!("({})", head),
                }
            }
            Statement::Class(decl) => {
                let names: Vec<&str> = decl.methods.iter().map(|m| m.name.as_str()).collect();
                format!("(cls {} {})", decl.name, names.join(" "))
            }
            Statement::Import(import) => match &import.alias {
                Some(alias) => format!("(add {} as {})", import.path, alias),
                None => format!("(add {})", import.path),
            },
            Statement::Start { entry, .. } => format!("(start {})", entry),
        }
    }
}

#[cfg(test)]
mod ast_tests {
    use crate::ast::{AstPrinter, BinaryOp, Expression, Visitor};
    use std::str::FromStr;

    #[test]
    fn basic_ast_test() {
        let expression = Expression::Binary {
            left: Box::new(Expression::Negate(Box::new(Expression::Number(
                "123".to_string(),
            )))),
            operator: BinaryOp::Multiply,
            right: Box::new(Expression::Number("45.67".to_string())),
        };
        let mut visitor = AstPrinter {};
        assert_eq!(visitor.visit(&expression), "(* (- 123) 45.67)");
    }

    #[test]
    fn operators_round_trip_through_their_spelling() {
        for op in &["+", "-", "*", "/", "%", ">", "<", "==", "!=", ">=", "<="] {
            let parsed = BinaryOp::from_str(op).unwrap();
            assert_eq!(parsed.to_string(), *op);
        }
        assert!(BinaryOp::from_str("&&").is_err());
    }
}
