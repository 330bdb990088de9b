//! Whitespace tokenizer with quoted-literal handling
//!
//! Tokens are not classified here. The same text can be a field in one
//! position and a value in another, so classification is left to the state
//! machine in [`super::fsm`].

use std::fmt;
use std::ops::Range;

/// Lexing failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexError {
    /// A quote was opened and never closed before end of input
    UnterminatedLiteral,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnterminatedLiteral => write!(f, "unterminated quoted literal"),
        }
    }
}

impl std::error::Error for LexError {}

/// One whitespace-delimited chunk of the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Raw text, quotes included
    pub text: String,
    /// Byte range in the input
    pub span: Range<usize>,
    /// Chunk starts with a quote character
    pub literal: bool,
    /// Terminated by whitespace
    pub closed: bool,
}

impl Token {
    /// Text with the surrounding quotes of a literal removed
    pub fn unquoted(&self) -> &str {
        if self.literal && self.text.len() >= 2 {
            let quote = &self.text[..1];
            if self.text.ends_with(quote) {
                return &self.text[1..self.text.len() - 1];
            }
        }
        &self.text
    }
}

pub(crate) fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

/// Tokenized input split into closed tokens and the open partial
#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    input: &'a str,
    /// All tokens; only the last one may be open
    pub tokens: Vec<Token>,
}

impl<'a> TokenStream<'a> {
    /// Split `input` on unquoted whitespace
    ///
    /// # Returns
    /// * `Result<TokenStream, LexError>` - Fails when a quote is left open
    pub fn tokenize(input: &'a str) -> Result<Self, LexError> {
        let mut tokens = Vec::new();
        let mut chars = input.char_indices().peekable();

        while let Some(&(start, c)) = chars.peek() {
            if c.is_whitespace() {
                chars.next();
                continue;
            }

            let mut end = start;
            let mut quote: Option<char> = None;
            while let Some(&(i, c)) = chars.peek() {
                match quote {
                    Some(q) if c == q => quote = None,
                    Some(_) => {}
                    None if c.is_whitespace() => break,
                    None if is_quote(c) => quote = Some(c),
                    None => {}
                }
                end = i + c.len_utf8();
                chars.next();
            }

            if quote.is_some() {
                return Err(LexError::UnterminatedLiteral);
            }

            tokens.push(Token {
                text: input[start..end].to_string(),
                span: start..end,
                literal: is_quote(c),
                closed: end < input.len(),
            });
        }

        Ok(Self { input, tokens })
    }

    /// Tokens terminated by whitespace
    pub fn closed_tokens(&self) -> &[Token] {
        match self.tokens.last() {
            Some(last) if !last.closed => &self.tokens[..self.tokens.len() - 1],
            _ => &self.tokens,
        }
    }

    /// The trailing token still being typed, if any
    pub fn open_token(&self) -> Option<&Token> {
        self.tokens.last().filter(|t| !t.closed)
    }

    /// Text of the open partial, empty when the input ends in whitespace
    pub fn open_partial(&self) -> &str {
        self.open_token().map(|t| t.text.as_str()).unwrap_or("")
    }

    /// Input before the open partial, kept verbatim in suggestions
    pub fn head(&self) -> &'a str {
        match self.open_token() {
            Some(token) => &self.input[..token.span.start],
            None => self.input,
        }
    }

    pub fn input(&self) -> &'a str {
        self.input
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Split `input` into closed tokens and the open partial
pub fn tokenize(input: &str) -> Result<(Vec<Token>, String), LexError> {
    let stream = TokenStream::tokenize(input)?;
    let partial = stream.open_partial().to_string();
    let closed = stream.closed_tokens().to_vec();
    Ok((closed, partial))
}
