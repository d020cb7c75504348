use crate::ast::{
    BinaryOp, Block, ClassDecl, Expression, FunctionDecl, HttpRequest, Import, Program, Statement,
};
use crate::diagnostic::Diagnostic;
use crate::token::{Token, TokenType};
use std::rc::Rc;

type ParseResult<T> = Result<T, Diagnostic>;

static EOF_TOKEN: Token = Token {
    tokentype: TokenType::EOF,
    text: String::new(),
    line: 0,
    column: 0,
};

/// The parser never gives up: whatever it could make sense of ends up in
/// `program`, and everything it had to skip is described in `diagnostics`.
#[derive(Debug)]
pub struct ParseOutcome {
    pub program: Program,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct Parser<'a> {
    tokens: &'a [Token],
    current: usize,
    diagnostics: Vec<Diagnostic>,
}

pub fn parse(tokens: &[Token]) -> ParseOutcome {
    Parser::new(tokens).parse()
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Parser<'a> {
        Parser {
            tokens,
            current: 0,
            diagnostics: Vec::new(),
        }
    }
    pub fn parse(mut self) -> ParseOutcome {
        let statements = self.statements_until(None);
        ParseOutcome {
            program: Program { statements },
            diagnostics: self.diagnostics,
        }
    }
    fn statements_until(&mut self, terminator: Option<TokenType>) -> Vec<Statement> {
        let mut statements: Vec<Statement> = Vec::new();
        while !self.is_at_end() && Some(self.peek().tokentype) != terminator {
            match self.statement() {
                Ok(stmt) => statements.push(stmt),
                Err(diagnostic) => {
                    self.diagnostics.push(diagnostic);
                    // Drop the offending token and carry on with the next one.
                    if Some(self.peek().tokentype) != terminator {
                        self.advance();
                    }
                }
            }
        }
        statements
    }
    fn statement(&mut self) -> ParseResult<Statement> {
        let token = self.peek();
        match token.tokentype {
            TokenType::Identifier if self.at_function_marker() => {
                Ok(Statement::Function(Rc::new(self.function()?)))
            }
            TokenType::Class => {
                self.advance();
                self.class_declaration()
            }
            TokenType::Return => {
                self.advance();
                let value = if self.starts_expression_on(token.line) {
                    Some(self.expression()?)
                } else {
                    None
                };
                Ok(Statement::Return {
                    value,
                    line: token.line,
                })
            }
            TokenType::Print => {
                self.advance();
                let mut expressions: Vec<Expression> = Vec::new();
                if self.starts_expression_on(token.line) {
                    expressions.push(self.expression()?);
                    while self.peek().tokentype == TokenType::Comma {
                        self.advance();
                        expressions.push(self.expression()?);
                    }
                }
                Ok(Statement::Print(expressions))
            }
            TokenType::While => {
                self.advance();
                let condition = self.expression()?;
                let body = self.block()?;
                Ok(Statement::While { condition, body })
            }
            TokenType::Repeat => {
                self.advance();
                let count = self.expression()?;
                let body = self.block()?;
                Ok(Statement::Repeat { count, body })
            }
            TokenType::If => {
                self.advance();
                self.if_statement()
            }
            TokenType::Break => {
                self.advance();
                Ok(Statement::Break { line: token.line })
            }
            TokenType::Continue => {
                self.advance();
                Ok(Statement::Continue { line: token.line })
            }
            TokenType::Try => {
                self.advance();
                let body = self.block()?;
                self.consume(TokenType::Catch, "Expect 'catch' after try block.")?;
                let handler = self.block()?;
                Ok(Statement::Try { body, handler })
            }
            TokenType::Get => {
                self.advance();
                let module = self.module_name("Expect module name after 'get'.")?;
                Ok(Statement::Import(Import {
                    path: module,
                    alias: None,
                    line: token.line,
                }))
            }
            TokenType::Add => {
                self.advance();
                self.add_statement(token.line)
            }
            TokenType::Start => {
                self.advance();
                self.start_marker(token.line)
            }
            TokenType::LeftBrace | TokenType::LessLess => Ok(Statement::Block(self.block()?)),
            TokenType::Identifier if self.peek_at(1).tokentype == TokenType::Equal => {
                self.advance();
                self.advance();
                let value = self.expression()?;
                Ok(Statement::Assign {
                    name: token.text.clone(),
                    value,
                })
            }
            TokenType::Identifier
                if self.peek_at(1).tokentype == TokenType::Dot
                    && self.peek_at(2).is_word()
                    && self.peek_at(3).tokentype == TokenType::Equal =>
            {
                self.advance();
                self.advance();
                let member = self.advance().text.clone();
                self.advance();
                let value = self.expression()?;
                Ok(Statement::SetMember {
                    object: token.text.clone(),
                    member,
                    value,
                })
            }
            _ => Ok(Statement::Expression(self.expression()?)),
        }
    }
    fn at_function_marker(&self) -> bool {
        let token = self.peek();
        token.tokentype == TokenType::Identifier
            && token.text == "f"
            && self.peek_at(1).tokentype == TokenType::Bang
    }
    fn function(&mut self) -> ParseResult<FunctionDecl> {
        let line = self.peek().line;
        self.advance();
        self.advance();
        let name = self.peek();
        if !name.is_word() {
            return Err(self.error("Expect function name after 'f!'."));
        }
        self.advance();

        let mut params: Vec<String> = Vec::new();
        if self.peek().tokentype == TokenType::LeftParen {
            self.advance();
            loop {
                let param = self.peek();
                match param.tokentype {
                    TokenType::RightParen | TokenType::EOF => break,
                    TokenType::Identifier => {
                        params.push(param.text.clone());
                        self.advance();
                    }
                    TokenType::Comma => {
                        self.advance();
                    }
                    _ => return Err(self.error("Expect parameter name.")),
                }
            }
            self.close(TokenType::RightParen, "Expect ')' after parameters.");
        }

        let body = match self.peek().tokentype {
            TokenType::LeftBrace | TokenType::LessLess => Some(self.block()?),
            _ => None,
        };
        Ok(FunctionDecl {
            name: name.text.clone(),
            params,
            body,
            line,
        })
    }
    fn class_declaration(&mut self) -> ParseResult<Statement> {
        let line = self.previous().line;
        let name = self.peek();
        if name.tokentype != TokenType::Identifier {
            return Err(self.error("Expect class name after 'cls'."));
        }
        self.advance();
        let (closing, message) = match self.peek().tokentype {
            TokenType::LeftBrace => (TokenType::RightBrace, "Expect '}' after class body."),
            TokenType::LessLess => (TokenType::GreaterGreater, "Expect '>>' after class body."),
            _ => return Err(self.error("Expect '{' or '<<' before class body.")),
        };
        self.advance();

        let mut methods: Vec<Rc<FunctionDecl>> = Vec::new();
        while !self.is_at_end() && self.peek().tokentype != closing {
            if self.at_function_marker() {
                match self.function() {
                    Ok(method) => methods.push(Rc::new(method)),
                    Err(diagnostic) => self.diagnostics.push(diagnostic),
                }
            } else {
                let diagnostic = self.error("Expect method definition in class body.");
                self.diagnostics.push(diagnostic);
                self.advance();
            }
        }
        self.close(closing, message);
        Ok(Statement::Class(Rc::new(ClassDecl {
            name: name.text.clone(),
            methods,
            line,
        })))
    }
    fn if_statement(&mut self) -> ParseResult<Statement> {
        let condition = self.expression()?;
        let then_branch = self.block()?;
        let else_branch = match self.peek().tokentype {
            TokenType::Else => {
                self.advance();
                if self.peek().tokentype == TokenType::If {
                    self.advance();
                    Some(Block {
                        statements: vec![self.if_statement()?],
                    })
                } else {
                    Some(self.block()?)
                }
            }
            _ => None,
        };
        Ok(Statement::If {
            condition,
            then_branch,
            else_branch,
        })
    }
    fn module_name(&mut self, message: &str) -> ParseResult<String> {
        let token = self.peek();
        match token.tokentype {
            TokenType::Identifier | TokenType::String => {
                self.advance();
                Ok(token.text.clone())
            }
            _ => Err(self.error(message)),
        }
    }
    fn add_statement(&mut self, line: u32) -> ParseResult<Statement> {
        let mut path = self.module_name("Expect module name after 'add'.")?;
        if self.at_word("from") {
            self.advance();
            let module = self.module_name("Expect module name after 'from'.")?;
            path = format!("{}/{}", module, path);
        }
        let mut alias: Option<String> = None;
        if self.at_word("as") {
            self.advance();
            let token = self.peek();
            match token.tokentype {
                TokenType::Identifier | TokenType::Number => {
                    self.advance();
                    alias = Some(token.text.clone());
                }
                _ => return Err(self.error("Expect alias after 'as'.")),
            }
        }
        Ok(Statement::Import(Import { path, alias, line }))
    }
    fn start_marker(&mut self, line: u32) -> ParseResult<Statement> {
        self.consume(TokenType::Greater, "Expect '>' after 'start'.")?;
        let token = self.peek();
        let entry = match token.tokentype {
            TokenType::Dot => String::from("main"),
            TokenType::Identifier => token.text.clone(),
            _ => return Err(self.error("Expect '.' or an entry point name after 'start >'.")),
        };
        self.advance();
        self.consume(TokenType::Less, "Expect '<' to close the start marker.")?;
        Ok(Statement::Start { entry, line })
    }
    /// `{ ... }` and `<< ... >>` are interchangeable.
    fn block(&mut self) -> ParseResult<Block> {
        let (closing, message) = match self.peek().tokentype {
            TokenType::LeftBrace => (TokenType::RightBrace, "Expect '}' after block."),
            TokenType::LessLess => (TokenType::GreaterGreater, "Expect '>>' after block."),
            _ => return Err(self.error("Expect '{' or '<<' before block.")),
        };
        self.advance();
        let statements = self.statements_until(Some(closing));
        self.close(closing, message);
        Ok(Block { statements })
    }
    fn expression(&mut self) -> ParseResult<Expression> {
        let mut expr = self.unary()?;
        while let Some(operator) = binary_operator(self.peek().tokentype) {
            self.advance();
            let right = self.unary()?;
            expr = Expression::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }
    fn unary(&mut self) -> ParseResult<Expression> {
        match self.peek().tokentype {
            TokenType::Minus => {
                self.advance();
                let right = self.unary()?;
                Ok(Expression::Negate(Box::new(right)))
            }
            _ => self.postfix(),
        }
    }
    fn postfix(&mut self) -> ParseResult<Expression> {
        let mut expr = self.primary()?;
        loop {
            let token = self.peek();
            match token.tokentype {
                TokenType::Dot => {
                    self.advance();
                    let member = self.peek();
                    if !member.is_word() {
                        return Err(self.error("Expect member name after '.'."));
                    }
                    self.advance();
                    let arguments = if self.peek().tokentype == TokenType::LeftParen {
                        self.advance();
                        Some(self.arguments(TokenType::RightParen, "Expect ')' after arguments.")?)
                    } else {
                        None
                    };
                    expr = Expression::Member {
                        object: Box::new(expr),
                        member: member.text.clone(),
                        arguments,
                    };
                }
                // A '[' on a later line opens a new list literal, not an index.
                TokenType::LeftBracket if token.line == self.previous().line => {
                    self.advance();
                    let index = self.expression()?;
                    self.consume(TokenType::RightBracket, "Expect ']' after index.")?;
                    expr = Expression::Index {
                        collection: Box::new(expr),
                        index: Box::new(index),
                        line: token.line,
                    };
                }
                _ => break,
            }
        }
        Ok(expr)
    }
    fn primary(&mut self) -> ParseResult<Expression> {
        let token = self.peek();
        match token.tokentype {
            TokenType::Number => {
                self.advance();
                Ok(Expression::Number(token.text.clone()))
            }
            TokenType::String => {
                self.advance();
                Ok(Expression::Str(token.text.clone()))
            }
            TokenType::True => {
                self.advance();
                Ok(Expression::Bool(true))
            }
            TokenType::False => {
                self.advance();
                Ok(Expression::Bool(false))
            }
            TokenType::Null => {
                self.advance();
                Ok(Expression::Null)
            }
            TokenType::Request | TokenType::Http => {
                self.advance();
                self.http_request()
            }
            TokenType::Identifier => {
                self.advance();
                if self.peek().tokentype == TokenType::LeftParen {
                    self.advance();
                    let arguments =
                        self.arguments(TokenType::RightParen, "Expect ')' after arguments.")?;
                    Ok(Expression::Call {
                        name: token.text.clone(),
                        arguments,
                        line: token.line,
                    })
                } else {
                    Ok(Expression::Variable {
                        name: token.text.clone(),
                        line: token.line,
                    })
                }
            }
            TokenType::LeftParen => {
                self.advance();
                let expr = self.expression()?;
                self.consume(TokenType::RightParen, "Expect ')' after expression.")?;
                Ok(expr)
            }
            TokenType::New => {
                self.advance();
                let class = self.peek();
                if class.tokentype != TokenType::Identifier {
                    return Err(self.error("Expect class name after 'new'."));
                }
                self.advance();
                if self.peek().tokentype == TokenType::LeftParen {
                    self.advance();
                    self.consume(
                        TokenType::RightParen,
                        "Expect ')' after class name; constructors take no arguments.",
                    )?;
                }
                Ok(Expression::New {
                    class: class.text.clone(),
                    line: token.line,
                })
            }
            TokenType::LeftBracket => {
                self.advance();
                let items =
                    self.arguments(TokenType::RightBracket, "Expect ']' after list items.")?;
                Ok(Expression::List(items))
            }
            TokenType::LeftBrace => {
                self.advance();
                self.dict_literal()
            }
            _ => Err(self.error("Expect expression.")),
        }
    }
    /// Comma-separated expressions up to `closing`; the commas are optional.
    fn arguments(&mut self, closing: TokenType, message: &str) -> ParseResult<Vec<Expression>> {
        let mut arguments: Vec<Expression> = Vec::new();
        while !self.is_at_end() && self.peek().tokentype != closing {
            arguments.push(self.expression()?);
            if self.peek().tokentype == TokenType::Comma {
                self.advance();
            }
        }
        self.close(closing, message);
        Ok(arguments)
    }
    fn dict_literal(&mut self) -> ParseResult<Expression> {
        let mut pairs: Vec<(Expression, Expression)> = Vec::new();
        while !self.is_at_end() && self.peek().tokentype != TokenType::RightBrace {
            let token = self.peek();
            let key = if token.tokentype == TokenType::Identifier && token.text.ends_with(':') {
                // `name:` lexes as one identifier.
                self.advance();
                Expression::Str(token.text.trim_end_matches(':').to_string())
            } else {
                let key = if token.tokentype == TokenType::Identifier
                    && self.peek_at(1).tokentype == TokenType::Colon
                {
                    self.advance();
                    Expression::Str(token.text.clone())
                } else {
                    self.expression()?
                };
                self.consume(TokenType::Colon, "Expect ':' after dictionary key.")?;
                key
            };
            let value = self.expression()?;
            pairs.push((key, value));
            if self.peek().tokentype == TokenType::Comma {
                self.advance();
            }
        }
        self.close(TokenType::RightBrace, "Expect '}' after dictionary entries.");
        Ok(Expression::Dict(pairs))
    }
    /// `request:: METHOD URL [BODY]`. The body is only taken from the same
    /// line, and only when it is a string or a name.
    fn http_request(&mut self) -> ParseResult<Expression> {
        let method = self.expression()?;
        let url = self.expression()?;
        let next = self.peek();
        let body = match next.tokentype {
            TokenType::String | TokenType::Identifier if next.line == self.previous().line => {
                Some(Box::new(self.postfix()?))
            }
            _ => None,
        };
        Ok(Expression::Http(HttpRequest {
            method: Box::new(method),
            url: Box::new(url),
            body,
        }))
    }
    fn starts_expression_on(&self, line: u32) -> bool {
        let token = self.peek();
        token.line == line
            && match token.tokentype {
                TokenType::Number
                | TokenType::String
                | TokenType::True
                | TokenType::False
                | TokenType::Null
                | TokenType::Identifier
                | TokenType::LeftParen
                | TokenType::LeftBracket
                | TokenType::LeftBrace
                | TokenType::Minus
                | TokenType::New
                | TokenType::Request
                | TokenType::Http => true,
                _ => false,
            }
    }
    fn at_word(&self, word: &str) -> bool {
        let token = self.peek();
        token.tokentype == TokenType::Identifier && token.text == word
    }
    fn consume(&mut self, tokentype: TokenType, message: &str) -> ParseResult<&'a Token> {
        if self.peek().tokentype == tokentype {
            Ok(self.advance())
        } else {
            Err(self.error(message))
        }
    }
    /// Like `consume`, but a missing closer is only reported: whatever was
    /// parsed before it is kept.
    fn close(&mut self, tokentype: TokenType, message: &str) {
        if self.peek().tokentype == tokentype {
            self.advance();
        } else {
            let diagnostic = self.error(message);
            self.diagnostics.push(diagnostic);
        }
    }
    fn advance(&mut self) -> &'a Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }
    fn is_at_end(&self) -> bool {
        self.peek().tokentype == TokenType::EOF
    }
    fn peek(&self) -> &'a Token {
        self.peek_at(0)
    }
    fn peek_at(&self, offset: usize) -> &'a Token {
        let tokens: &'a [Token] = self.tokens;
        tokens.get(self.current + offset).unwrap_or_else(|| {
            tokens.last().unwrap_or(&EOF_TOKEN)
        })
    }
    fn previous(&self) -> &'a Token {
        let tokens: &'a [Token] = self.tokens;
        let index = if self.current > 0 { self.current - 1 } else { 0 };
        tokens.get(index).unwrap_or(&EOF_TOKEN)
    }
    fn error(&self, message: &str) -> Diagnostic {
        Diagnostic::at(self.peek(), message)
    }
}

fn binary_operator(tokentype: TokenType) -> Option<BinaryOp> {
    match tokentype {
        TokenType::Plus => Some(BinaryOp::Add),
        TokenType::Minus => Some(BinaryOp::Subtract),
        TokenType::Star => Some(BinaryOp::Multiply),
        TokenType::Slash => Some(BinaryOp::Divide),
        TokenType::Percent => Some(BinaryOp::Modulo),
        TokenType::Greater => Some(BinaryOp::Greater),
        TokenType::Less => Some(BinaryOp::Less),
        TokenType::EqualEqual => Some(BinaryOp::Equal),
        TokenType::BangEqual => Some(BinaryOp::NotEqual),
        TokenType::GreaterEqual => Some(BinaryOp::GreaterEqual),
        TokenType::LessEqual => Some(BinaryOp::LessEqual),
        _ => None,
    }
}

#[cfg(test)]
mod parser_tests {
    use crate::ast::{AstPrinter, Expression, Statement};
    use crate::parser::{self, ParseOutcome};
    use crate::scanner;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> ParseOutcome {
        parser::parse(&scanner::scan_tokens(source))
    }

    fn printed(source: &str) -> Vec<String> {
        let outcome = parse(source);
        assert_eq!(outcome.diagnostics, vec![]);
        AstPrinter {}.print_program(&outcome.program)
    }

    #[test]
    fn hello_world_program() {
        assert_eq!(
            printed("f! main { print:: \"Hello, \" + \"World!\" }\nstart >.<"),
            vec![
                "(f! main () (print (+ \"Hello, \" \"World!\")))",
                "(start main)"
            ]
        );
    }

    #[test]
    fn operators_chain_left_to_right_without_precedence() {
        assert_eq!(printed("x = 1 + 2 * 3"), vec!["(assign x (* (+ 1 2) 3))"]);
        assert_eq!(
            printed("y = a != 2 <= -b"),
            vec!["(assign y (<= (!= a 2) (- b)))"]
        );
    }

    #[test]
    fn both_block_forms_parse_identically() {
        let braces = parse("f! add(a, b) { ret a + b }");
        let chevrons = parse("f! add(a b) << ret a + b >>");
        assert_eq!(braces.program, chevrons.program);
        assert!(braces.diagnostics.is_empty());
    }

    #[test]
    fn member_call_and_field_access() {
        let outcome = parse("obj.greet(1, 2)\nobj.name");
        match &outcome.program.statements[0] {
            Statement::Expression(Expression::Member {
                member, arguments, ..
            }) => {
                assert_eq!(member, "greet");
                assert_eq!(arguments.as_ref().map(|a| a.len()), Some(2));
            }
            other => panic!("unexpected {:?}", other),
        }
        match &outcome.program.statements[1] {
            Statement::Expression(Expression::Member { arguments, .. }) => {
                assert!(arguments.is_none())
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn keyword_shaped_member_names() {
        assert_eq!(
            printed("mem.set(p, 0, 1)\nv = mem.get(p, 0)"),
            vec![
                "(.call set mem p 0 1)",
                "(assign v (.call get mem p 0))"
            ]
        );
    }

    #[test]
    fn unrecognized_tokens_are_skipped_with_diagnostics() {
        let outcome = parse(") x = 1\n] print:: x");
        assert_eq!(outcome.diagnostics.len(), 2);
        assert_eq!(outcome.diagnostics[0].line, 1);
        assert_eq!(outcome.diagnostics[1].line, 2);
        assert_eq!(
            AstPrinter {}.print_program(&outcome.program),
            vec!["(assign x 1)", "(print x)"]
        );
    }

    #[test]
    fn missing_closer_keeps_the_body() {
        let outcome = parse("f! main { print:: 1");
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(
            AstPrinter {}.print_program(&outcome.program),
            vec!["(f! main () (print 1))"]
        );
    }

    #[test]
    fn http_body_must_be_on_the_same_line() {
        assert_eq!(
            printed("r = request:: \"POST\" \"http://x\" payload\nrequest:: \"GET\" url\nnext = 1"),
            vec![
                "(assign r (request \"POST\" \"http://x\" payload))",
                "(request \"GET\" url)",
                "(assign next 1)"
            ]
        );
    }

    #[test]
    fn import_forms() {
        let outcome = parse("get math\nadd sqrt from utils as s\nadd \"net/http\"");
        let imports: Vec<(String, Option<String>)> = outcome
            .program
            .statements
            .iter()
            .map(|s| match s {
                Statement::Import(i) => (i.path.clone(), i.alias.clone()),
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert_eq!(
            imports,
            vec![
                ("math".to_string(), None),
                ("utils/sqrt".to_string(), Some("s".to_string())),
                ("net/http".to_string(), None),
            ]
        );
    }

    #[test]
    fn start_markers() {
        assert_eq!(
            printed("start >.<\nstart >boot<"),
            vec!["(start main)", "(start boot)"]
        );
        // The bad entry and the stray '<' are each reported and skipped.
        let outcome = parse("start > 1 <");
        assert_eq!(outcome.diagnostics.len(), 2);
        assert!(outcome.program.statements.is_empty());
    }

    #[test]
    fn control_flow_statements() {
        assert_eq!(
            printed(
                "while i < 3 { i = i + 1 continue }\nrepeat 2 << break >>\ntry { x = [1][5] } catch { print:: error }"
            ),
            vec![
                "(while (< i 3) (assign i (+ i 1)) (continue))",
                "(repeat 2 (break))",
                "(try (block (assign x (index (list 1) 5))) (catch (print error)))"
            ]
        );
    }

    #[test]
    fn else_if_chains() {
        assert_eq!(
            printed("if a { print:: 1 } else if b { print:: 2 } else { print:: 3 }"),
            vec!["(if a (print 1) (else (if b (print 2) (else (print 3)))))"]
        );
    }

    #[test]
    fn dict_literal_keys() {
        assert_eq!(
            printed("d = { name: \"tess\", \"v\": 1, k : 2 }"),
            vec!["(assign d (dict \"name\" \"tess\" \"v\" 1 \"k\" 2))"]
        );
    }

    #[test]
    fn classes_objects_and_member_assignment() {
        assert_eq!(
            printed("cls Dog { f! bark { print:: \"woof\" } f! sit(x) << ret x >> }\nd = new Dog()\nd.name = \"rex\""),
            vec![
                "(cls Dog bark sit)",
                "(assign d (new Dog))",
                "(set d.name \"rex\")"
            ]
        );
    }

    #[test]
    fn bare_ret_and_empty_print() {
        assert_eq!(
            printed("f! stop {\n ret\n}\nprint::\nx = 1"),
            vec!["(f! stop () (ret))", "(print)", "(assign x 1)"]
        );
    }

    #[test]
    fn nested_blocks_and_indexing() {
        assert_eq!(
            printed("x = 1 { x = 2 } print:: x, m[0][1]"),
            vec![
                "(assign x 1)",
                "(block (assign x 2))",
                "(print x (index (index m 0) 1))"
            ]
        );
    }
}
