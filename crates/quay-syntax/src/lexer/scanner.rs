//! The scanner that produces tokens from source text.

use super::{Keyword, Span, Token, TokenKind};

/// A scanner that tokenizes JavaScript-family source text.
///
/// The scanner is total: malformed input never makes it fail. Unterminated
/// strings, comments, templates, and regex literals are treated as closed at
/// end of input, so every buffer produces a finite token stream.
pub struct Scanner<'a> {
    source: &'a str,
    pos: usize,
    /// Kind of the previously emitted token; drives regex-vs-division.
    prev: Option<TokenKind>,
    /// `{`/`}` nesting of code regions, used to pair interpolation closers.
    brace_depth: usize,
    /// Brace depth recorded at each currently open `${` interpolation.
    interpolations: Vec<usize>,
}

impl<'a> Scanner<'a> {
    /// Creates a new scanner for the given source text.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            prev: None,
            brace_depth: 0,
            interpolations: Vec::new(),
        }
    }

    /// Returns the next token from the source.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        let start = self.pos;

        let Some(ch) = self.advance() else {
            return Token::new(TokenKind::Eof, Span::new(start, start));
        };

        let kind = match ch {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,

            '{' => {
                self.brace_depth += 1;
                TokenKind::LeftBrace
            }
            '}' => self.scan_right_brace(),

            '.' => self.scan_dot(),
            '*' => self.scan_star(),
            '+' => self.scan_plus(),
            '-' => self.scan_minus(),
            '=' => self.scan_equal(),
            '?' => self.scan_question(),
            '/' => self.scan_slash(),
            '!' | '%' | '&' | '<' | '>' | '^' | '|' | '~' => self.scan_operator(),

            '"' | '\'' => self.scan_string(ch),
            '`' => self.scan_template(),

            '0'..='9' => self.scan_number(ch),

            '#' => self.scan_private_identifier(),
            _ if is_id_start(ch) => self.scan_identifier(start),

            _ => TokenKind::Invalid,
        };

        self.emit(kind, start)
    }

    fn emit(&mut self, kind: TokenKind, start: usize) -> Token {
        self.prev = Some(kind);
        Token::new(kind, Span::new(start, self.pos))
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.source[self.pos..].chars();
        iter.next();
        iter.next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(ch) if ch.is_whitespace() => {
                    self.advance();
                }
                Some('/') => {
                    match self.peek_next() {
                        Some('/') => {
                            // Single-line comment: skip until end of line
                            self.advance();
                            self.advance();
                            while let Some(ch) = self.peek() {
                                if ch == '\n' || ch == '\r' {
                                    break;
                                }
                                self.advance();
                            }
                        }
                        Some('*') => {
                            // Multi-line comment: skip until */, or end of
                            // input for an unterminated one
                            self.advance();
                            self.advance();
                            let mut prev = ' ';
                            while let Some(ch) = self.advance() {
                                if prev == '*' && ch == '/' {
                                    break;
                                }
                                prev = ch;
                            }
                        }
                        _ => break, // division, regex, or /=
                    }
                }
                _ => break,
            }
        }
    }

    /// A `}` either closes a `${…}` interpolation, resuming template text,
    /// or is an ordinary right brace. Interpolation closers are recognized
    /// by comparing the current brace depth against the depth recorded when
    /// the interpolation opened.
    fn scan_right_brace(&mut self) -> TokenKind {
        if self.interpolations.last() == Some(&self.brace_depth) {
            self.interpolations.pop();
            if self.template_text() {
                self.interpolations.push(self.brace_depth);
                TokenKind::TemplateMiddle
            } else {
                TokenKind::TemplateTail
            }
        } else {
            self.brace_depth = self.brace_depth.saturating_sub(1);
            TokenKind::RightBrace
        }
    }

    fn scan_dot(&mut self) -> TokenKind {
        match self.peek() {
            Some('0'..='9') => {
                self.eat_digits();
                self.eat_exponent();
                TokenKind::Number
            }
            Some('.') => {
                self.advance();
                if self.eat('.') {
                    TokenKind::Ellipsis
                } else {
                    // ".." is not valid
                    TokenKind::Invalid
                }
            }
            _ => TokenKind::Dot,
        }
    }

    fn scan_star(&mut self) -> TokenKind {
        match self.peek() {
            Some('*') => {
                self.advance();
                self.eat('=');
                TokenKind::Op
            }
            Some('=') => {
                self.advance();
                TokenKind::Op
            }
            _ => TokenKind::Star,
        }
    }

    fn scan_plus(&mut self) -> TokenKind {
        match self.peek() {
            Some('+') => {
                self.advance();
                TokenKind::PlusPlus
            }
            Some('=') => {
                self.advance();
                TokenKind::Op
            }
            _ => TokenKind::Op,
        }
    }

    fn scan_minus(&mut self) -> TokenKind {
        match self.peek() {
            Some('-') => {
                self.advance();
                TokenKind::MinusMinus
            }
            Some('=') => {
                self.advance();
                TokenKind::Op
            }
            _ => TokenKind::Op,
        }
    }

    fn scan_equal(&mut self) -> TokenKind {
        match self.peek() {
            Some('=') => {
                self.advance();
                self.eat('=');
                TokenKind::Op
            }
            Some('>') => {
                self.advance();
                TokenKind::Arrow
            }
            _ => TokenKind::Equal,
        }
    }

    fn scan_question(&mut self) -> TokenKind {
        match self.peek() {
            Some('.') => {
                self.advance();
                TokenKind::QuestionDot
            }
            Some('?') => {
                self.advance();
                self.eat('=');
                TokenKind::Op
            }
            _ => TokenKind::Op,
        }
    }

    /// Greedily consumes an operator run (`!==`, `>>>=`, `&&=`, …). Slashes
    /// are excluded so the run never swallows a following regex or comment.
    fn scan_operator(&mut self) -> TokenKind {
        while let Some(ch) = self.peek() {
            match ch {
                '!' | '%' | '&' | '<' | '>' | '^' | '|' | '~' | '=' => {
                    self.advance();
                }
                _ => break,
            }
        }
        TokenKind::Op
    }

    /// A slash in expression position starts a regex literal; anywhere else
    /// it is division. A candidate whose literal would run past the end of
    /// the line is re-read as division, since regexes cannot span lines.
    fn scan_slash(&mut self) -> TokenKind {
        let regex_allowed = self.prev.is_none_or(|kind| !kind.ends_expression());
        if regex_allowed {
            if let Some(end) = self.regex_end() {
                self.pos = end;
                return TokenKind::Regex;
            }
        }
        self.eat('=');
        TokenKind::Op
    }

    /// Pre-scans a regex literal body starting right after the opening `/`.
    /// Returns the end offset (flags included), or None if the candidate
    /// hits a line terminator first. An unescaped `/` inside a `[…]`
    /// character class does not close the literal. A literal still open at
    /// end of input is treated as closed there.
    fn regex_end(&self) -> Option<usize> {
        let mut in_class = false;
        let mut escaped = false;
        for (i, ch) in self.source[self.pos..].char_indices() {
            if escaped {
                escaped = false;
                continue;
            }
            match ch {
                '\\' => escaped = true,
                '\n' | '\r' => return None,
                '[' => in_class = true,
                ']' => in_class = false,
                '/' if !in_class => {
                    let body_end = self.pos + i + 1;
                    let flags = self.source[body_end..]
                        .chars()
                        .take_while(|c| c.is_ascii_alphabetic())
                        .count();
                    return Some(body_end + flags);
                }
                _ => {}
            }
        }
        Some(self.source.len())
    }

    fn scan_string(&mut self, quote: char) -> TokenKind {
        while let Some(ch) = self.advance() {
            match ch {
                '\\' => {
                    self.advance();
                }
                c if c == quote => break,
                _ => {}
            }
        }
        TokenKind::Str
    }

    fn scan_template(&mut self) -> TokenKind {
        if self.template_text() {
            self.interpolations.push(self.brace_depth);
            TokenKind::TemplateHead
        } else {
            TokenKind::Template
        }
    }

    /// Consumes template text until an unescaped backtick (returns false) or
    /// an unescaped `${` (consumed; returns true). End of input closes the
    /// template.
    fn template_text(&mut self) -> bool {
        while let Some(ch) = self.advance() {
            match ch {
                '\\' => {
                    self.advance();
                }
                '`' => return false,
                '$' if self.peek() == Some('{') => {
                    self.advance();
                    return true;
                }
                _ => {}
            }
        }
        false
    }

    fn scan_number(&mut self, first: char) -> TokenKind {
        // The numeric value is irrelevant here; only the token's extent
        // matters, so all bases share one consuming loop.
        if first == '0' && matches!(self.peek(), Some('x' | 'X' | 'o' | 'O' | 'b' | 'B')) {
            self.advance();
            while let Some(ch) = self.peek() {
                if ch.is_ascii_alphanumeric() || ch == '_' {
                    self.advance();
                } else {
                    break;
                }
            }
            return TokenKind::Number;
        }

        self.eat_digits();
        if self.peek() == Some('.') {
            self.advance();
            self.eat_digits();
        }
        self.eat_exponent();
        self.eat('n');
        TokenKind::Number
    }

    fn eat_digits(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn eat_exponent(&mut self) {
        if matches!(self.peek(), Some('e' | 'E')) {
            self.advance();
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            self.eat_digits();
        }
    }

    fn scan_identifier(&mut self, start: usize) -> TokenKind {
        while let Some(ch) = self.peek() {
            if is_id_continue(ch) {
                self.advance();
            } else {
                break;
            }
        }

        match Keyword::from_ident(&self.source[start..self.pos]) {
            Some(kw) => TokenKind::Kw(kw),
            None => TokenKind::Ident,
        }
    }

    fn scan_private_identifier(&mut self) -> TokenKind {
        let mut empty = true;
        while let Some(ch) = self.peek() {
            if is_id_continue(ch) {
                self.advance();
                empty = false;
            } else {
                break;
            }
        }

        // The span keeps the leading `#`, so a private `#exports` can never
        // collide with the bare identifier.
        if empty { TokenKind::Invalid } else { TokenKind::Ident }
    }
}

/// Checks if a character can start an identifier.
fn is_id_start(ch: char) -> bool {
    ch == '_' || ch == '$' || unicode_xid::UnicodeXID::is_xid_start(ch)
}

/// Checks if a character can continue an identifier.
fn is_id_continue(ch: char) -> bool {
    ch == '_' || ch == '$' || unicode_xid::UnicodeXID::is_xid_continue(ch)
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}
