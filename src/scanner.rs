use crate::token::{Token, TokenType};
use phf::phf_map;
use std::iter::Peekable;
use std::str::CharIndices;

// Note: current becomes self.iter.peek()?.0
struct Scanner<'a> {
    source: &'a str,
    iter: Peekable<CharIndices<'a>>,
    start: usize,
    line: u32,
    column: u32,
    start_line: u32,
    start_column: u32,
}

/// Tokenizes `source`. Never fails: characters the language has no use for
/// are dropped, and the result always ends with an EOF token.
pub fn scan_tokens(source: &str) -> Vec<Token> {
    let mut scanner = Scanner {
        source,
        iter: source.char_indices().peekable(),
        start: 0,
        line: 1,
        column: 1,
        start_line: 1,
        start_column: 1,
    };
    let mut tokens: Vec<Token> = Vec::new();

    while let Some((idx, _)) = scanner.iter.peek() {
        scanner.start = *idx;
        scanner.start_line = scanner.line;
        scanner.start_column = scanner.column;
        if let Some(token) = scanner.scan_token() {
            tokens.push(token);
        }
    }
    tokens.push(Token {
        tokentype: TokenType::EOF,
        text: String::new(),
        line: scanner.line,
        column: scanner.column,
    });
    tokens
}

impl<'a> Scanner<'a> {
    fn scan_token(&mut self) -> Option<Token> {
        let c = self.advance()?;
        match c {
            '(' => Some(self.token(TokenType::LeftParen)),
            ')' => Some(self.token(TokenType::RightParen)),
            '{' => Some(self.token(TokenType::LeftBrace)),
            '}' => Some(self.token(TokenType::RightBrace)),
            '[' => Some(self.token(TokenType::LeftBracket)),
            ']' => Some(self.token(TokenType::RightBracket)),
            ',' => Some(self.token(TokenType::Comma)),
            '.' => Some(self.token(TokenType::Dot)),
            ':' => Some(self.token(TokenType::Colon)),
            ';' => Some(self.token(TokenType::Semicolon)),
            '-' => Some(self.token(TokenType::Minus)),
            '+' => Some(self.token(TokenType::Plus)),
            '*' => Some(self.token(TokenType::Star)),
            '/' => Some(self.token(TokenType::Slash)),
            '%' => Some(self.token(TokenType::Percent)),
            '!' => {
                if self.next_if('=') {
                    Some(self.token(TokenType::BangEqual))
                } else {
                    Some(self.token(TokenType::Bang))
                }
            }
            '=' => {
                if self.next_if('=') {
                    Some(self.token(TokenType::EqualEqual))
                } else {
                    Some(self.token(TokenType::Equal))
                }
            }
            '<' => {
                if self.next_if('<') {
                    Some(self.token(TokenType::LessLess))
                } else if self.next_if('=') {
                    Some(self.token(TokenType::LessEqual))
                } else {
                    Some(self.token(TokenType::Less))
                }
            }
            '>' => {
                if self.next_if('>') {
                    Some(self.token(TokenType::GreaterGreater))
                } else if self.next_if('=') {
                    Some(self.token(TokenType::GreaterEqual))
                } else {
                    Some(self.token(TokenType::Greater))
                }
            }
            '#' => {
                self.skip_line();
                None
            }
            '$' => {
                // A lone '$' is not a comment, just an unknown character.
                if self.next_if('$') {
                    self.skip_line();
                }
                None
            }
            '"' => Some(self.string()),
            '0'..='9' => Some(self.number()),
            'a'..='z' | 'A'..='Z' | '_' => Some(self.identifier()),
            _ => None,
        }
    }
    fn current(&mut self) -> usize {
        match self.iter.peek() {
            None => self.source.len(),
            Some((idx, _)) => *idx,
        }
    }
    fn token(&mut self, token_type: TokenType) -> Token {
        let current = self.current();
        self.token_with_text(token_type, self.source[self.start..current].to_string())
    }
    fn token_with_text(&self, token_type: TokenType, text: String) -> Token {
        Token {
            tokentype: token_type,
            text,
            line: self.start_line,
            column: self.start_column,
        }
    }
    fn next_if(&mut self, expected: char) -> bool {
        match self.iter.peek() {
            Some((_, c)) if *c == expected => {
                self.advance();
                true
            }
            _ => false,
        }
    }
    fn advance(&mut self) -> Option<char> {
        let (_, c) = self.iter.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }
    fn skip_line(&mut self) {
        while let Some(c) = self.advance() {
            if c == '\n' {
                break;
            }
        }
    }
    fn string(&mut self) -> Token {
        let mut text = String::new();
        while let Some(c) = self.advance() {
            match c {
                '"' => break,
                '\\' => match self.advance() {
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some('r') => text.push('\r'),
                    Some(other) => text.push(other),
                    None => text.push('\\'),
                },
                _ => text.push(c),
            }
        }
        // An unterminated string runs to the end of the source.
        self.token_with_text(TokenType::String, text)
    }
    fn number(&mut self) -> Token {
        // Dots are accepted anywhere after the first digit; the evaluator
        // converts the longest numeric prefix.
        while let Some((_, c)) = self.iter.peek() {
            match c {
                '0'..='9' | '.' => {
                    self.advance();
                }
                _ => break,
            }
        }
        self.token(TokenType::Number)
    }
    fn identifier(&mut self) -> Token {
        while let Some((_, c)) = self.iter.peek() {
            match c {
                '0'..='9' | 'a'..='z' | 'A'..='Z' | '_' | ':' => {
                    self.advance();
                }
                _ => break,
            }
        }
        let current = self.current();
        let text = &self.source[self.start..current];
        match KEYWORDS.get(text) {
            None => self.token(TokenType::Identifier),
            Some(x) => self.token(*x),
        }
    }
}

static KEYWORDS: phf::Map<&'static str, TokenType> = phf_map! {
    "if" => TokenType::If,
    "else" => TokenType::Else,
    "while" => TokenType::While,
    "repeat" => TokenType::Repeat,
    "for" => TokenType::For,
    "break" => TokenType::Break,
    "continue" => TokenType::Continue,
    "ret" => TokenType::Return,
    "cls" => TokenType::Class,
    "new" => TokenType::New,
    "try" => TokenType::Try,
    "catch" => TokenType::Catch,
    "print::" => TokenType::Print,
    "request::" => TokenType::Request,
    "http::" => TokenType::Http,
    "start" => TokenType::Start,
    "get" => TokenType::Get,
    "add" => TokenType::Add,
    "true" => TokenType::True,
    "false" => TokenType::False,
    "null" => TokenType::Null,
};

#[cfg(test)]
mod scanner_tests {
    use crate::scanner;
    use crate::token::TokenType;

    fn types(source: &str) -> Vec<TokenType> {
        scanner::scan_tokens(source)
            .iter()
            .map(|t| t.tokentype)
            .collect()
    }

    #[test]
    fn basic_scanner_test() {
        let tokens = scanner::scan_tokens("x = 2");
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0].tokentype, TokenType::Identifier);
        assert_eq!(tokens[0].text, "x");
        assert_eq!(tokens[1].tokentype, TokenType::Equal);
        assert_eq!(tokens[2].tokentype, TokenType::Number);
        assert_eq!(tokens[2].text, "2");
        assert_eq!(tokens[3].tokentype, TokenType::EOF);
    }

    #[test]
    fn empty_source_is_just_eof() {
        assert_eq!(types(""), vec![TokenType::EOF]);
        assert_eq!(types("   \n\t"), vec![TokenType::EOF]);
    }

    #[test]
    fn two_character_operators_win() {
        assert_eq!(
            types("<< >> <= >= == != < > = !"),
            vec![
                TokenType::LessLess,
                TokenType::GreaterGreater,
                TokenType::LessEqual,
                TokenType::GreaterEqual,
                TokenType::EqualEqual,
                TokenType::BangEqual,
                TokenType::Less,
                TokenType::Greater,
                TokenType::Equal,
                TokenType::Bang,
                TokenType::EOF
            ]
        );
    }

    #[test]
    fn both_comment_forms_are_skipped() {
        let tokens = scanner::scan_tokens("# a comment\nx $$ another\ny");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].text, "x");
        assert_eq!(tokens[0].line, 2);
        assert_eq!(tokens[1].text, "y");
        assert_eq!(tokens[1].line, 3);
    }

    #[test]
    fn string_escapes_and_positions() {
        let tokens = scanner::scan_tokens("  \"a\\n\\t\\\"b\\\\\" z");
        assert_eq!(tokens[0].tokentype, TokenType::String);
        assert_eq!(tokens[0].text, "a\n\t\"b\\");
        assert_eq!(tokens[0].column, 3);
        assert_eq!(tokens[1].text, "z");
    }

    #[test]
    fn strings_track_embedded_newlines() {
        let tokens = scanner::scan_tokens("\"one\ntwo\" x");
        assert_eq!(tokens[0].text, "one\ntwo");
        assert_eq!(tokens[1].line, 2);
        assert_eq!(tokens[1].column, 6);
    }

    #[test]
    fn numbers_keep_extra_dots() {
        let tokens = scanner::scan_tokens("1.2.3+4");
        assert_eq!(tokens[0].tokentype, TokenType::Number);
        assert_eq!(tokens[0].text, "1.2.3");
        assert_eq!(tokens[1].tokentype, TokenType::Plus);
    }

    #[test]
    fn colon_words_become_keywords() {
        assert_eq!(
            types("print:: request:: http:: ret cls f"),
            vec![
                TokenType::Print,
                TokenType::Request,
                TokenType::Http,
                TokenType::Return,
                TokenType::Class,
                TokenType::Identifier,
                TokenType::EOF
            ]
        );
        let tokens = scanner::scan_tokens("std::io");
        assert_eq!(tokens[0].tokentype, TokenType::Identifier);
        assert_eq!(tokens[0].text, "std::io");
    }

    #[test]
    fn unknown_characters_are_dropped() {
        let tokens = scanner::scan_tokens("a @ b ~ $ c");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c", ""]);
    }

    #[test]
    fn start_marker_tokens() {
        assert_eq!(
            types("start >.<"),
            vec![
                TokenType::Start,
                TokenType::Greater,
                TokenType::Dot,
                TokenType::Less,
                TokenType::EOF
            ]
        );
    }
}
