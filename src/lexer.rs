/// Represents the different kinds of tokens that the lexer can produce.
/// Each token is a meaningful unit of the CDL language syntax.
#[derive(Debug, PartialEq, Clone)]
pub enum TokenType {
    // == Special Tokens ==
    /// Represents the end of the input file.
    Eof,
    /// Represents a sequence of one or more whitespace characters (spaces, tabs, newlines).
    Whitespace,
    /// Represents a `(comment ...)` form. The associated `String` contains the
    /// comment text. Comments terminate at the first `)`, they do not nest.
    Comment(String),
    /// Represents a token that could not be recognized by the lexer,
    /// including unterminated strings and comments.
    Unknown,

    // == Literals ==
    /// An identifier: a letter followed by letters, digits, or underscores.
    /// Used for constant names and dictionary keys.
    Identifier(String),
    /// A string literal, enclosed in double quotes.
    /// The associated `String` holds the content with escapes decoded.
    String(String),
    /// An integer literal, stored as its raw lexeme. Range checking is a
    /// semantic concern and happens in the transformer, not here.
    Integer(String),

    // == Keywords ==
    /// The `define` keyword, introducing a constant declaration.
    Define,
    /// The `begin` keyword, opening a dictionary block.
    Begin,
    /// The `end` keyword, closing a dictionary block.
    End,

    // == Punctuation & Operators ==
    /// Left Parenthesis: `(`
    LParen,
    /// Right Parenthesis: `)`
    RParen,
    /// Left Bracket: `[` (opens a constant reference)
    LBracket,
    /// Right Bracket: `]` (closes a constant reference)
    RBracket,
    /// Assignment operator: `:=`
    Assign,
    /// Semicolon: `;` (terminates an assignment)
    Semicolon,
}

/// A token with its type and position
#[derive(Debug, Clone)]
pub struct Token {
    pub ttype: TokenType,
    pub pos_start: usize,
    pub pos_end: usize,
}

impl Token {
    pub fn new(ttype: TokenType, pos_start: usize, pos_end: usize) -> Token {
        Token {
            ttype,
            pos_start,
            pos_end,
        }
    }
}

pub struct Lexer<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    pub fn lex(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.ttype == TokenType::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }

    pub fn next_token(&mut self) -> Token {
        let start_pos = self.position;

        let ttype = if let Some(char) = self.advance() {
            match char {
                '(' => {
                    // `(comment` opens a comment form; any other `(` is plain
                    // punctuation (e.g. `(define ...)`).
                    if self.input[self.position..].starts_with("comment") {
                        self.read_comment()
                    } else {
                        TokenType::LParen
                    }
                }
                ')' => TokenType::RParen,
                '[' => TokenType::LBracket,
                ']' => TokenType::RBracket,
                ';' => TokenType::Semicolon,

                ':' => {
                    if self.peek() == Some(&'=') {
                        self.advance();
                        TokenType::Assign
                    } else {
                        // A bare colon has no meaning in CDL.
                        TokenType::Unknown
                    }
                }
                '"' => self.read_string(),
                c if c.is_whitespace() => self.read_whitespace(),
                c if c.is_ascii_alphabetic() => self.read_identifier(c),
                c if c.is_ascii_digit()
                    || (c == '-' && self.peek().is_some_and(|c| c.is_ascii_digit())) =>
                {
                    self.read_integer(c)
                }

                _ => TokenType::Unknown,
            }
        } else {
            TokenType::Eof
        };

        Token::new(ttype, start_pos, self.position)
    }

    fn advance(&mut self) -> Option<char> {
        let char = self.chars.next();
        if let Some(c) = char {
            self.position += c.len_utf8();
        }
        char
    }

    fn peek(&mut self) -> Option<&char> {
        self.chars.peek()
    }

    fn read_whitespace(&mut self) -> TokenType {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
        TokenType::Whitespace
    }

    fn read_comment(&mut self) -> TokenType {
        // Consume the `comment` marker itself.
        for _ in 0.."comment".len() {
            self.advance();
        }
        let mut comment_text = String::new();
        while let Some(c) = self.advance() {
            // First `)` always closes the comment; a `(` inside does not
            // open a nested one.
            if c == ')' {
                return TokenType::Comment(comment_text.trim().to_string());
            }
            comment_text.push(c);
        }
        TokenType::Unknown // Unclosed comment
    }

    fn read_string(&mut self) -> TokenType {
        let mut value = String::new();
        while let Some(c) = self.peek() {
            if *c == '"' {
                self.advance(); // Consume the closing quote
                return TokenType::String(value);
            }

            if *c == '\\' {
                self.advance(); // Consume the backslash
                if let Some(escaped_char) = self.advance() {
                    match escaped_char {
                        '"' => value.push('"'),
                        '\\' => value.push('\\'),
                        'n' => value.push('\n'),
                        'r' => value.push('\r'),
                        't' => value.push('\t'),
                        _ => {
                            value.push('\\');
                            value.push(escaped_char);
                        }
                    }
                } else {
                    return TokenType::Unknown; // Unclosed escape sequence
                }
            } else {
                value.push(self.advance().unwrap());
            }
        }
        TokenType::Unknown // Unclosed string
    }

    fn read_identifier(&mut self, first_char: char) -> TokenType {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || *c == '_' {
                ident.push(self.advance().unwrap());
            } else {
                break;
            }
        }

        match ident.as_str() {
            "define" => TokenType::Define,
            "begin" => TokenType::Begin,
            "end" => TokenType::End,
            _ => TokenType::Identifier(ident),
        }
    }

    fn read_integer(&mut self, first_char: char) -> TokenType {
        let mut number_str = String::new();
        number_str.push(first_char);

        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                number_str.push(self.advance().unwrap());
            } else {
                break;
            }
        }

        TokenType::Integer(number_str)
    }
}
