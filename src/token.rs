use strum_macros::Display;

#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenType {
    // Single-character tokens.
    LeftParen, RightParen, LeftBrace, RightBrace,
    LeftBracket, RightBracket,
    Comma, Dot, Colon, Semicolon,
    Minus, Plus, Slash, Star, Percent,

    // One or two character tokens.
    Bang, BangEqual,
    Equal, EqualEqual,
    Greater, GreaterEqual, GreaterGreater,
    Less, LessEqual, LessLess,

    // Literals.
    Identifier, String, Number,

    // Keywords.
    If, Else, While, Repeat, For, Break, Continue, Return,
    Class, New, Try, Catch, Print, Request, Http, Start, Get, Add,
    True, False, Null,

    EOF
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub tokentype: TokenType,
    pub text: String,
    pub line: u32,
    pub column: u32,
}

impl Token {
    /// Keyword tokens still carry their spelling, which lets the parser accept
    /// them where any name is allowed (`mem.get`, `mem.set`).
    pub fn is_word(&self) -> bool {
        match self.text.chars().next() {
            Some(c) => {
                self.tokentype != TokenType::String
                    && self.tokentype != TokenType::Number
                    && (c.is_ascii_alphabetic() || c == '_')
            }
            None => false,
        }
    }
}
