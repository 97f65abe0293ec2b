//! Contextual lexer - tokenizes source code under a caller-selected grammar

use core_types::{parse_radix_digits, JsError, SourcePosition};
use tracing::trace;

/// Lexical grammar the parser asks for, depending on where it is.
///
/// The same characters can mean different things depending on position:
/// `.5` is a number where an operand starts but a member access after one,
/// `?.` only exists after an operand, and template bodies are not tokens at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    /// Start of a statement
    Statement,
    /// Start of an operand (prefix operators, literals, identifiers)
    Prefix,
    /// After an operand (binary/postfix operators, member access, calls)
    Infix,
    /// Inside a template literal body: returns the next text chunk
    Template,
    /// Statement terminator check: `;`, line break, `}` or end of input
    Terminal,
}

/// Keywords of the language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    /// var keyword
    Var,
    /// let keyword
    Let,
    /// const keyword
    Const,
    /// function keyword
    Function,
    /// return keyword
    Return,
    /// if keyword
    If,
    /// else keyword
    Else,
    /// while keyword
    While,
    /// do keyword
    Do,
    /// break keyword
    Break,
    /// continue keyword
    Continue,
    /// throw keyword
    Throw,
    /// with keyword
    With,
    /// debugger keyword
    Debugger,
    /// new keyword
    New,
    /// typeof keyword
    Typeof,
    /// void keyword
    Void,
    /// in keyword
    In,
    /// true keyword
    True,
    /// false keyword
    False,
    /// null keyword
    Null,
    /// Reserved word with no supported meaning (for, class, try, ...)
    Reserved(&'static str),
}

/// Reserved words, looked up after an identifier has been scanned.
/// `undefined`, `NaN` and `Infinity` are globals, not keywords.
static KEYWORDS: &[(&str, Keyword)] = &[
    ("var", Keyword::Var),
    ("let", Keyword::Let),
    ("const", Keyword::Const),
    ("function", Keyword::Function),
    ("return", Keyword::Return),
    ("if", Keyword::If),
    ("else", Keyword::Else),
    ("while", Keyword::While),
    ("do", Keyword::Do),
    ("break", Keyword::Break),
    ("continue", Keyword::Continue),
    ("throw", Keyword::Throw),
    ("with", Keyword::With),
    ("debugger", Keyword::Debugger),
    ("new", Keyword::New),
    ("typeof", Keyword::Typeof),
    ("void", Keyword::Void),
    ("in", Keyword::In),
    ("true", Keyword::True),
    ("false", Keyword::False),
    ("null", Keyword::Null),
    ("for", Keyword::Reserved("for")),
    ("class", Keyword::Reserved("class")),
    ("extends", Keyword::Reserved("extends")),
    ("super", Keyword::Reserved("super")),
    ("this", Keyword::Reserved("this")),
    ("try", Keyword::Reserved("try")),
    ("catch", Keyword::Reserved("catch")),
    ("finally", Keyword::Reserved("finally")),
    ("switch", Keyword::Reserved("switch")),
    ("case", Keyword::Reserved("case")),
    ("default", Keyword::Reserved("default")),
    ("delete", Keyword::Reserved("delete")),
    ("instanceof", Keyword::Reserved("instanceof")),
    ("import", Keyword::Reserved("import")),
    ("export", Keyword::Reserved("export")),
    ("yield", Keyword::Reserved("yield")),
    ("enum", Keyword::Reserved("enum")),
];

fn lookup_keyword(ident: &str) -> Option<Keyword> {
    KEYWORDS
        .iter()
        .find(|(name, _)| *name == ident)
        .map(|(_, keyword)| *keyword)
}

/// Operators and delimiters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punctuator {
    /// (
    LParen,
    /// )
    RParen,
    /// {
    LBrace,
    /// }
    RBrace,
    /// [
    LBracket,
    /// ]
    RBracket,
    /// ;
    Semicolon,
    /// ,
    Comma,
    /// .
    Dot,
    /// ?.
    OptionalChain,
    /// :
    Colon,
    /// ?
    Question,
    /// =
    Assign,
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// **
    StarStar,
    /// ==
    EqEq,
    /// ===
    EqEqEq,
    /// !=
    NotEq,
    /// !==
    NotEqEq,
    /// <
    Lt,
    /// <=
    LtEq,
    /// >
    Gt,
    /// >=
    GtEq,
    /// &&
    AndAnd,
    /// ||
    OrOr,
    /// !
    Not,
    /// &
    And,
    /// |
    Or,
    /// ^
    Xor,
    /// ~
    Tilde,
    /// <<
    LtLt,
    /// >>
    GtGt,
    /// >>>
    GtGtGt,
    /// +=
    PlusEq,
    /// -=
    MinusEq,
    /// *=
    StarEq,
    /// /=
    SlashEq,
    /// %=
    PercentEq,
    /// **=
    StarStarEq,
    /// &=
    AndEq,
    /// |=
    OrEq,
    /// ^=
    XorEq,
    /// <<=
    LtLtEq,
    /// >>=
    GtGtEq,
    /// >>>=
    GtGtGtEq,
    /// ++
    PlusPlus,
    /// --
    MinusMinus,
    /// ` (opens a template literal)
    Backtick,
}

impl Punctuator {
    /// Source spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Punctuator::LParen => "(",
            Punctuator::RParen => ")",
            Punctuator::LBrace => "{",
            Punctuator::RBrace => "}",
            Punctuator::LBracket => "[",
            Punctuator::RBracket => "]",
            Punctuator::Semicolon => ";",
            Punctuator::Comma => ",",
            Punctuator::Dot => ".",
            Punctuator::OptionalChain => "?.",
            Punctuator::Colon => ":",
            Punctuator::Question => "?",
            Punctuator::Assign => "=",
            Punctuator::Plus => "+",
            Punctuator::Minus => "-",
            Punctuator::Star => "*",
            Punctuator::Slash => "/",
            Punctuator::Percent => "%",
            Punctuator::StarStar => "**",
            Punctuator::EqEq => "==",
            Punctuator::EqEqEq => "===",
            Punctuator::NotEq => "!=",
            Punctuator::NotEqEq => "!==",
            Punctuator::Lt => "<",
            Punctuator::LtEq => "<=",
            Punctuator::Gt => ">",
            Punctuator::GtEq => ">=",
            Punctuator::AndAnd => "&&",
            Punctuator::OrOr => "||",
            Punctuator::Not => "!",
            Punctuator::And => "&",
            Punctuator::Or => "|",
            Punctuator::Xor => "^",
            Punctuator::Tilde => "~",
            Punctuator::LtLt => "<<",
            Punctuator::GtGt => ">>",
            Punctuator::GtGtGt => ">>>",
            Punctuator::PlusEq => "+=",
            Punctuator::MinusEq => "-=",
            Punctuator::StarEq => "*=",
            Punctuator::SlashEq => "/=",
            Punctuator::PercentEq => "%=",
            Punctuator::StarStarEq => "**=",
            Punctuator::AndEq => "&=",
            Punctuator::OrEq => "|=",
            Punctuator::XorEq => "^=",
            Punctuator::LtLtEq => "<<=",
            Punctuator::GtGtEq => ">>=",
            Punctuator::GtGtGtEq => ">>>=",
            Punctuator::PlusPlus => "++",
            Punctuator::MinusMinus => "--",
            Punctuator::Backtick => "`",
        }
    }
}

/// What a token is, with its literal value if it has one
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Identifier
    Identifier(String),
    /// Keyword or reserved word
    Keyword(Keyword),
    /// Operator or delimiter
    Punctuator(Punctuator),
    /// Number literal
    Number(f64),
    /// String literal (escapes already decoded)
    String(String),
    /// Template literal text chunk. `tail` is true when the chunk ended at
    /// the closing backtick rather than at `${`.
    Template {
        /// Decoded text
        cooked: String,
        /// Whether this chunk closes the template
        tail: bool,
    },
    /// Implied statement terminator (Terminal grammar only)
    LineBreak,
    /// End of input
    EOF,
}

/// Token produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Token kind and literal value
    pub kind: TokenKind,
    /// Source text of the token
    pub raw: String,
    /// Start position
    pub start: SourcePosition,
    /// End offset (exclusive, in characters)
    pub end: usize,
    /// Whether a line terminator appeared between the previous token and this one
    pub newline_before: bool,
}

impl Token {
    /// Whether this token is the given punctuator
    pub fn is_punctuator(&self, p: Punctuator) -> bool {
        matches!(self.kind, TokenKind::Punctuator(x) if x == p)
    }

    /// Whether this token is the given keyword
    pub fn is_keyword(&self, k: Keyword) -> bool {
        matches!(self.kind, TokenKind::Keyword(x) if x == k)
    }

    /// Text used for this token in error messages
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::EOF => "end of input".to_string(),
            TokenKind::LineBreak => "line break".to_string(),
            _ => format!("'{}'", self.raw),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    position: usize,
    line: u32,
    column: u32,
}

/// Lexer for script source code
pub struct Lexer {
    chars: Vec<char>,
    position: usize,
    line: u32,
    column: u32,
    previous: Option<Checkpoint>,
}

impl Lexer {
    /// Create a new lexer for the given source code
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            previous: None,
        }
    }

    /// Consume and return the next token under the given grammar.
    pub fn next_token(&mut self, grammar: Grammar) -> Result<Token, JsError> {
        self.previous = Some(self.checkpoint());
        let token = match grammar {
            Grammar::Template => self.scan_template_chunk()?,
            Grammar::Terminal => self.scan_terminal()?,
            _ => self.scan_token(grammar)?,
        };
        trace!(?grammar, kind = ?token.kind, offset = token.start.offset, "token");
        Ok(token)
    }

    /// Undo the most recent [`next_token`](Self::next_token). Only one step
    /// of history is kept; a second rewind is a no-op.
    pub fn rewind(&mut self) {
        if let Some(checkpoint) = self.previous.take() {
            self.restore(checkpoint);
        }
    }

    /// Look at the next token without consuming it.
    pub fn peek_token(&mut self, grammar: Grammar) -> Result<Token, JsError> {
        let token = self.next_token(grammar)?;
        self.rewind();
        Ok(token)
    }

    /// Current position (start of the next unconsumed character)
    pub fn current_position(&self) -> SourcePosition {
        SourcePosition {
            line: self.line,
            column: self.column,
            offset: self.position,
        }
    }

    /// Source text between two character offsets
    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.chars.len());
        let start = start.min(end);
        self.chars[start..end].iter().collect()
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            position: self.position,
            line: self.line,
            column: self.column,
        }
    }

    fn restore(&mut self, checkpoint: Checkpoint) {
        self.position = checkpoint.position;
        self.line = checkpoint.line;
        self.column = checkpoint.column;
    }

    fn make_token(&self, kind: TokenKind, start: SourcePosition, newline_before: bool) -> Token {
        Token {
            kind,
            raw: self.slice(start.offset, self.position),
            start,
            end: self.position,
            newline_before,
        }
    }

    fn scan_terminal(&mut self) -> Result<Token, JsError> {
        let newline_before = self.skip_whitespace_and_comments()?;
        let start = self.current_position();

        if self.is_at_end() {
            return Ok(self.make_token(TokenKind::EOF, start, newline_before));
        }
        if self.match_char(';') {
            let kind = TokenKind::Punctuator(Punctuator::Semicolon);
            return Ok(self.make_token(kind, start, newline_before));
        }
        if newline_before {
            return Ok(self.make_token(TokenKind::LineBreak, start, true));
        }
        if self.peek() == '}' {
            // Reported but left in place for the enclosing block to consume.
            let mut token =
                self.make_token(TokenKind::Punctuator(Punctuator::RBrace), start, false);
            token.raw = "}".to_string();
            return Ok(token);
        }
        self.scan_token(Grammar::Statement)
    }

    fn scan_token(&mut self, grammar: Grammar) -> Result<Token, JsError> {
        let newline_before = self.skip_whitespace_and_comments()?;
        let start = self.current_position();

        if self.is_at_end() {
            return Ok(self.make_token(TokenKind::EOF, start, newline_before));
        }

        let ch = self.advance();
        let kind = match ch {
            '(' => TokenKind::Punctuator(Punctuator::LParen),
            ')' => TokenKind::Punctuator(Punctuator::RParen),
            '{' => TokenKind::Punctuator(Punctuator::LBrace),
            '}' => TokenKind::Punctuator(Punctuator::RBrace),
            '[' => TokenKind::Punctuator(Punctuator::LBracket),
            ']' => TokenKind::Punctuator(Punctuator::RBracket),
            ';' => TokenKind::Punctuator(Punctuator::Semicolon),
            ',' => TokenKind::Punctuator(Punctuator::Comma),
            ':' => TokenKind::Punctuator(Punctuator::Colon),
            '~' => TokenKind::Punctuator(Punctuator::Tilde),
            '`' => TokenKind::Punctuator(Punctuator::Backtick),

            '.' => {
                if grammar != Grammar::Infix && self.peek().is_ascii_digit() {
                    self.scan_number('.', &start)?
                } else {
                    TokenKind::Punctuator(Punctuator::Dot)
                }
            }

            '?' => {
                // `a?.5:1` is a conditional, not an optional chain
                let after_dot = self.peek_next().is_some_and(|c| c.is_ascii_digit());
                if grammar == Grammar::Infix && self.peek() == '.' && !after_dot {
                    self.advance();
                    TokenKind::Punctuator(Punctuator::OptionalChain)
                } else {
                    TokenKind::Punctuator(Punctuator::Question)
                }
            }

            '=' => {
                if self.match_char('=') {
                    if self.match_char('=') {
                        TokenKind::Punctuator(Punctuator::EqEqEq)
                    } else {
                        TokenKind::Punctuator(Punctuator::EqEq)
                    }
                } else {
                    TokenKind::Punctuator(Punctuator::Assign)
                }
            }

            '+' => {
                if self.match_char('+') {
                    TokenKind::Punctuator(Punctuator::PlusPlus)
                } else if self.match_char('=') {
                    TokenKind::Punctuator(Punctuator::PlusEq)
                } else {
                    TokenKind::Punctuator(Punctuator::Plus)
                }
            }

            '-' => {
                if self.match_char('-') {
                    TokenKind::Punctuator(Punctuator::MinusMinus)
                } else if self.match_char('=') {
                    TokenKind::Punctuator(Punctuator::MinusEq)
                } else {
                    TokenKind::Punctuator(Punctuator::Minus)
                }
            }

            '*' => {
                if self.match_char('*') {
                    if self.match_char('=') {
                        TokenKind::Punctuator(Punctuator::StarStarEq)
                    } else {
                        TokenKind::Punctuator(Punctuator::StarStar)
                    }
                } else if self.match_char('=') {
                    TokenKind::Punctuator(Punctuator::StarEq)
                } else {
                    TokenKind::Punctuator(Punctuator::Star)
                }
            }

            '/' => {
                if self.match_char('=') {
                    TokenKind::Punctuator(Punctuator::SlashEq)
                } else {
                    TokenKind::Punctuator(Punctuator::Slash)
                }
            }

            '%' => {
                if self.match_char('=') {
                    TokenKind::Punctuator(Punctuator::PercentEq)
                } else {
                    TokenKind::Punctuator(Punctuator::Percent)
                }
            }

            '!' => {
                if self.match_char('=') {
                    if self.match_char('=') {
                        TokenKind::Punctuator(Punctuator::NotEqEq)
                    } else {
                        TokenKind::Punctuator(Punctuator::NotEq)
                    }
                } else {
                    TokenKind::Punctuator(Punctuator::Not)
                }
            }

            '<' => {
                if self.match_char('<') {
                    if self.match_char('=') {
                        TokenKind::Punctuator(Punctuator::LtLtEq)
                    } else {
                        TokenKind::Punctuator(Punctuator::LtLt)
                    }
                } else if self.match_char('=') {
                    TokenKind::Punctuator(Punctuator::LtEq)
                } else {
                    TokenKind::Punctuator(Punctuator::Lt)
                }
            }

            '>' => {
                if self.match_char('>') {
                    if self.match_char('>') {
                        if self.match_char('=') {
                            TokenKind::Punctuator(Punctuator::GtGtGtEq)
                        } else {
                            TokenKind::Punctuator(Punctuator::GtGtGt)
                        }
                    } else if self.match_char('=') {
                        TokenKind::Punctuator(Punctuator::GtGtEq)
                    } else {
                        TokenKind::Punctuator(Punctuator::GtGt)
                    }
                } else if self.match_char('=') {
                    TokenKind::Punctuator(Punctuator::GtEq)
                } else {
                    TokenKind::Punctuator(Punctuator::Gt)
                }
            }

            '&' => {
                if self.match_char('&') {
                    TokenKind::Punctuator(Punctuator::AndAnd)
                } else if self.match_char('=') {
                    TokenKind::Punctuator(Punctuator::AndEq)
                } else {
                    TokenKind::Punctuator(Punctuator::And)
                }
            }

            '|' => {
                if self.match_char('|') {
                    TokenKind::Punctuator(Punctuator::OrOr)
                } else if self.match_char('=') {
                    TokenKind::Punctuator(Punctuator::OrEq)
                } else {
                    TokenKind::Punctuator(Punctuator::Or)
                }
            }

            '^' => {
                if self.match_char('=') {
                    TokenKind::Punctuator(Punctuator::XorEq)
                } else {
                    TokenKind::Punctuator(Punctuator::Xor)
                }
            }

            '"' | '\'' => self.scan_string(ch, &start)?,

            _ if ch.is_ascii_digit() => self.scan_number(ch, &start)?,

            _ if is_id_start(ch) => self.scan_identifier(ch),

            _ => {
                return Err(JsError::syntax(
                    format!("Unexpected character: '{}'", ch),
                    Some(start),
                ))
            }
        };

        Ok(self.make_token(kind, start, newline_before))
    }

    fn scan_string(&mut self, quote: char, start: &SourcePosition) -> Result<TokenKind, JsError> {
        let mut value = String::new();

        loop {
            if self.is_at_end() {
                return Err(JsError::syntax("Unterminated string literal", Some(*start)));
            }
            let ch = self.peek();
            if ch == quote {
                self.advance();
                break;
            }
            if is_line_terminator(ch) {
                return Err(JsError::syntax("Unterminated string literal", Some(*start)));
            }
            self.advance();
            if ch == '\\' {
                if self.is_at_end() {
                    return Err(JsError::syntax("Unterminated string literal", Some(*start)));
                }
                self.scan_escape(&mut value, false, start)?;
            } else {
                value.push(ch);
            }
        }

        Ok(TokenKind::String(value))
    }

    /// Scan a template body chunk: text up to `${` or the closing backtick.
    fn scan_template_chunk(&mut self) -> Result<Token, JsError> {
        let start = self.current_position();
        let mut cooked = String::new();

        loop {
            if self.is_at_end() {
                return Err(JsError::syntax("Unterminated template literal", Some(start)));
            }
            let ch = self.advance();
            match ch {
                '`' => {
                    let kind = TokenKind::Template { cooked, tail: true };
                    return Ok(self.make_token(kind, start, false));
                }
                '$' if self.peek() == '{' => {
                    self.advance();
                    let kind = TokenKind::Template {
                        cooked,
                        tail: false,
                    };
                    return Ok(self.make_token(kind, start, false));
                }
                '\\' => {
                    if self.is_at_end() {
                        return Err(JsError::syntax(
                            "Unterminated template literal",
                            Some(start),
                        ));
                    }
                    self.scan_escape(&mut cooked, true, &start)?;
                }
                '\r' => {
                    // CR and CRLF are normalized to LF in template text
                    self.match_char('\n');
                    cooked.push('\n');
                }
                _ => cooked.push(ch),
            }
        }
    }

    /// Decode one escape sequence; the backslash is already consumed.
    fn scan_escape(
        &mut self,
        value: &mut String,
        in_template: bool,
        start: &SourcePosition,
    ) -> Result<(), JsError> {
        let escaped = self.advance();
        match escaped {
            'n' => value.push('\n'),
            't' => value.push('\t'),
            'r' => value.push('\r'),
            'b' => value.push('\u{0008}'),
            'f' => value.push('\u{000C}'),
            'v' => value.push('\u{000B}'),
            '0' if !self.peek().is_ascii_digit() => value.push('\0'),
            '0'..='7' => {
                if in_template {
                    return Err(JsError::syntax(
                        "Octal escape sequences are not allowed in template literals",
                        Some(*start),
                    ));
                }
                // Three digits only when the first is 0-3, keeping the value below 256
                let max_len = if escaped <= '3' { 3 } else { 2 };
                let mut code = escaped.to_digit(8).unwrap_or(0);
                let mut len = 1;
                while len < max_len {
                    match self.peek().to_digit(8) {
                        Some(d) if !self.is_at_end() => {
                            self.advance();
                            code = code * 8 + d;
                            len += 1;
                        }
                        _ => break,
                    }
                }
                value.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
            }
            '8' | '9' => {
                if in_template {
                    return Err(JsError::syntax(
                        format!("\\{} is not allowed in template literals", escaped),
                        Some(*start),
                    ));
                }
                value.push(escaped);
            }
            'x' => {
                let code = self
                    .read_hex_digits(2)
                    .ok_or_else(|| {
                        JsError::syntax("Invalid hexadecimal escape sequence", Some(*start))
                    })?;
                value.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
            }
            'u' => {
                let ch = self.scan_unicode_escape(start)?;
                value.push(ch);
            }
            '\r' => {
                // Line continuation
                self.match_char('\n');
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            _ => value.push(escaped),
        }
        Ok(())
    }

    /// `\uHHHH` or `\u{H...}`; the `\u` is already consumed. A high surrogate
    /// followed by an escaped low surrogate is combined into one character.
    fn scan_unicode_escape(&mut self, start: &SourcePosition) -> Result<char, JsError> {
        let invalid = || JsError::syntax("Invalid Unicode escape sequence", Some(*start));

        if self.match_char('{') {
            let mut code: u32 = 0;
            let mut digits = 0;
            while let Some(d) = self.peek().to_digit(16) {
                if self.is_at_end() {
                    break;
                }
                self.advance();
                code = code.saturating_mul(16).saturating_add(d);
                digits += 1;
            }
            if digits == 0 || !self.match_char('}') || code > 0x10FFFF {
                return Err(invalid());
            }
            return Ok(char::from_u32(code).unwrap_or('\u{FFFD}'));
        }

        let code = self.read_hex_digits(4).ok_or_else(invalid)?;
        if (0xD800..=0xDBFF).contains(&code) {
            let checkpoint = self.checkpoint();
            if self.match_char('\\') && self.match_char('u') {
                if let Some(low) = self.read_hex_digits(4) {
                    if (0xDC00..=0xDFFF).contains(&low) {
                        let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                        return Ok(char::from_u32(combined).unwrap_or('\u{FFFD}'));
                    }
                }
            }
            self.restore(checkpoint);
        }
        Ok(char::from_u32(code).unwrap_or('\u{FFFD}'))
    }

    fn read_hex_digits(&mut self, count: usize) -> Option<u32> {
        let mut code = 0;
        for _ in 0..count {
            if self.is_at_end() {
                return None;
            }
            let digit = self.peek().to_digit(16)?;
            self.advance();
            code = code * 16 + digit;
        }
        Some(code)
    }

    fn scan_number(&mut self, first: char, start: &SourcePosition) -> Result<TokenKind, JsError> {
        let value = if first == '0' && matches!(self.peek(), 'x' | 'X' | 'o' | 'O' | 'b' | 'B') {
            let radix = match self.advance() {
                'x' | 'X' => 16,
                'o' | 'O' => 8,
                _ => 2,
            };
            let mut digits = String::new();
            if self.scan_digits(radix, &mut digits, false, start)? == 0 {
                return Err(JsError::syntax(
                    format!("Missing digits after base-{} prefix", radix),
                    Some(*start),
                ));
            }
            parse_radix_digits(&digits, radix)
                .ok_or_else(|| JsError::syntax("Invalid number literal", Some(*start)))?
        } else if first == '0' && (self.peek().is_ascii_digit() || self.peek() == '_') {
            self.scan_legacy_octal(start)?
        } else if first == '.' {
            let mut text = String::from("0.");
            self.scan_digits(10, &mut text, false, start)?;
            self.scan_exponent(&mut text, start)?;
            self.reject_second_decimal_point(start)?;
            parse_decimal(&text, start)?
        } else {
            let mut text = first.to_string();
            self.scan_digits(10, &mut text, true, start)?;
            self.scan_fraction_and_exponent(&mut text, start)?;
            parse_decimal(&text, start)?
        };

        if is_id_start(self.peek()) || self.peek().is_ascii_digit() {
            return Err(JsError::syntax(
                "Identifier starts immediately after numeric literal",
                Some(*start),
            ));
        }

        Ok(TokenKind::Number(value))
    }

    /// `0` followed by digits: octal when every digit is 0-7, otherwise a
    /// decimal with a redundant leading zero (`089` is 89).
    fn scan_legacy_octal(&mut self, start: &SourcePosition) -> Result<f64, JsError> {
        let mut digits = String::new();
        while self.peek().is_ascii_digit() {
            digits.push(self.advance());
        }
        if self.peek() == '_' {
            return Err(JsError::syntax(
                "Numeric separators are not allowed after a leading 0",
                Some(*start),
            ));
        }

        if digits.chars().all(|c| c < '8') {
            if self.peek() == '.' && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
                return Err(JsError::syntax(
                    "Legacy octal literals cannot have a fractional part",
                    Some(*start),
                ));
            }
            return parse_radix_digits(&digits, 8)
                .ok_or_else(|| JsError::syntax("Invalid number literal", Some(*start)));
        }

        let mut text = format!("0{}", digits);
        self.scan_fraction_and_exponent(&mut text, start)?;
        parse_decimal(&text, start)
    }

    fn scan_fraction_and_exponent(
        &mut self,
        text: &mut String,
        start: &SourcePosition,
    ) -> Result<(), JsError> {
        if self.match_char('.') {
            text.push('.');
            self.scan_digits(10, text, false, start)?;
            self.scan_exponent(text, start)?;
            self.reject_second_decimal_point(start)?;
        } else {
            self.scan_exponent(text, start)?;
        }
        Ok(())
    }

    fn scan_exponent(&mut self, text: &mut String, start: &SourcePosition) -> Result<(), JsError> {
        if !matches!(self.peek(), 'e' | 'E') || self.is_at_end() {
            return Ok(());
        }
        self.advance();
        text.push('e');
        if matches!(self.peek(), '+' | '-') && !self.is_at_end() {
            text.push(self.advance());
        }
        if self.scan_digits(10, text, false, start)? == 0 {
            return Err(JsError::syntax("Missing exponent digits", Some(*start)));
        }
        Ok(())
    }

    fn reject_second_decimal_point(&self, start: &SourcePosition) -> Result<(), JsError> {
        if self.peek() == '.' && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            return Err(JsError::syntax(
                "Number literal has more than one decimal point",
                Some(*start),
            ));
        }
        Ok(())
    }

    /// Append digits of `radix` to `out`, skipping `_` separators that sit
    /// between two digits. Returns the number of digits consumed.
    fn scan_digits(
        &mut self,
        radix: u32,
        out: &mut String,
        mut after_digit: bool,
        start: &SourcePosition,
    ) -> Result<usize, JsError> {
        let mut count = 0;
        while !self.is_at_end() {
            let ch = self.peek();
            if ch.is_digit(radix) {
                out.push(self.advance());
                count += 1;
                after_digit = true;
            } else if ch == '_' {
                let digit_follows = self.peek_next().is_some_and(|c| c.is_digit(radix));
                if !after_digit || !digit_follows {
                    return Err(JsError::syntax(
                        "Numeric separators are only allowed between digits",
                        Some(*start),
                    ));
                }
                self.advance();
                after_digit = false;
            } else {
                break;
            }
        }
        Ok(count)
    }

    fn scan_identifier(&mut self, first: char) -> TokenKind {
        let mut ident = first.to_string();
        while !self.is_at_end() && is_id_continue(self.peek()) {
            ident.push(self.advance());
        }

        match lookup_keyword(&ident) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Identifier(ident),
        }
    }

    /// Skip whitespace and comments. Returns true if a line terminator was
    /// crossed, including one inside a block comment.
    fn skip_whitespace_and_comments(&mut self) -> Result<bool, JsError> {
        let mut saw_newline = false;
        while !self.is_at_end() {
            let ch = self.peek();
            if is_line_terminator(ch) {
                self.advance();
                saw_newline = true;
            } else if is_whitespace(ch) {
                self.advance();
            } else if ch == '/' && self.peek_next() == Some('/') {
                while !self.is_at_end() && !is_line_terminator(self.peek()) {
                    self.advance();
                }
            } else if ch == '/' && self.peek_next() == Some('*') {
                let comment_start = self.current_position();
                self.advance(); // /
                self.advance(); // *
                let mut found_end = false;
                while !self.is_at_end() {
                    if self.peek() == '*' && self.peek_next() == Some('/') {
                        self.advance();
                        self.advance();
                        found_end = true;
                        break;
                    }
                    if is_line_terminator(self.advance()) {
                        saw_newline = true;
                    }
                }
                if !found_end {
                    return Err(JsError::syntax(
                        "Unterminated multi-line comment",
                        Some(comment_start),
                    ));
                }
            } else {
                break;
            }
        }
        Ok(saw_newline)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.chars.len()
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.chars[self.position]
        }
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.position + 1).copied()
    }

    fn advance(&mut self) -> char {
        let ch = self.peek();
        self.position += 1;
        // CRLF counts as one line break, charged to the LF
        let crlf = ch == '\r' && self.chars.get(self.position) == Some(&'\n');
        if is_line_terminator(ch) && !crlf {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        ch
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.chars[self.position] != expected {
            false
        } else {
            self.advance();
            true
        }
    }
}

fn parse_decimal(text: &str, start: &SourcePosition) -> Result<f64, JsError> {
    text.parse::<f64>()
        .map_err(|_| JsError::syntax(format!("Invalid number: {}", text), Some(*start)))
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn is_whitespace(c: char) -> bool {
    matches!(c, '\t' | '\u{000B}' | '\u{000C}' | '\u{FEFF}')
        || (c.is_whitespace() && !is_line_terminator(c))
}

fn is_id_start(ch: char) -> bool {
    ch == '_' || ch == '$' || ch.is_alphabetic()
}

fn is_id_continue(ch: char) -> bool {
    is_id_start(ch) || ch.is_alphanumeric() || ch == '\u{200C}' || ch == '\u{200D}'
}
