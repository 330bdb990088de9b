//! Syntax highlighter for search queries
//!
//! Tokens are colored by the role the grammar gives them, so the same word is
//! styled as a field in one position and as a value in another. Field tokens
//! are checked against the current schema.

use nu_ansi_term::{Color, Style};
use reedline::{Highlighter, StyledText};

use super::shared_state::SharedState;
use crate::completion::{QueryPosition, TokenKind, TokenStream};
use crate::schema::SchemaRegistry;

/// Query syntax highlighter
pub struct QueryHighlighter {
    shared_state: SharedState,
    enabled: bool,
}

impl QueryHighlighter {
    /// Create a new highlighter
    pub fn new(shared_state: SharedState, enabled: bool) -> Self {
        Self {
            shared_state,
            enabled,
        }
    }

    fn style_for(kind: TokenKind, text: &str, registry: &SchemaRegistry) -> Style {
        match kind {
            TokenKind::Field => match registry.resolve(text) {
                Some(field) if field.completion_enabled => Color::Cyan.bold(),
                Some(_) => Color::Red.normal(),
                None => Style::default(),
            },
            TokenKind::Comparator => Color::Yellow.normal(),
            TokenKind::LogicalConnective => Color::Magenta.bold(),
            TokenKind::PrefixOperator => Color::Magenta.normal(),
            TokenKind::Value | TokenKind::LiteralValue => Color::Green.normal(),
        }
    }

    /// Highlight text known to hold no open quote
    fn highlight_closed(styled: &mut StyledText, line: &str, registry: &SchemaRegistry) {
        let Ok(stream) = TokenStream::tokenize(line) else {
            styled.push((Style::default(), line.to_string()));
            return;
        };

        let kinds = QueryPosition::run(&stream.tokens).kinds;
        let mut cursor = 0;

        for (token, kind) in stream.tokens.iter().zip(kinds) {
            if token.span.start > cursor {
                styled.push((Style::default(), line[cursor..token.span.start].to_string()));
            }
            styled.push((
                Self::style_for(kind, &token.text, registry),
                token.text.clone(),
            ));
            cursor = token.span.end;
        }

        if cursor < line.len() {
            styled.push((Style::default(), line[cursor..].to_string()));
        }
    }
}

/// Start of the token holding an unterminated quote
fn open_literal_start(line: &str) -> Option<usize> {
    let mut quote: Option<(char, usize)> = None;
    for (i, c) in line.char_indices() {
        match quote {
            Some((q, _)) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some((c, i)),
            None => {}
        }
    }

    let (_, start) = quote?;
    Some(line[..start].trim_end_matches(|c: char| !c.is_whitespace()).len())
}

impl Highlighter for QueryHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled = StyledText::new();

        if !self.enabled {
            styled.push((Style::default(), line.to_string()));
            return styled;
        }

        if line.trim_start().starts_with(':') {
            styled.push((Color::Blue.bold(), line.to_string()));
            return styled;
        }

        let registry = self.shared_state.registry();
        match open_literal_start(line) {
            Some(start) => {
                Self::highlight_closed(&mut styled, &line[..start], &registry);
                styled.push((Color::Green.italic(), line[start..].to_string()));
            }
            None => Self::highlight_closed(&mut styled, line, &registry),
        }

        styled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::schema::{LoadedSchema, fixtures};

    fn create_test_highlighter(enabled: bool) -> QueryHighlighter {
        let state = SharedState::with_schema(
            Some(LoadedSchema {
                registry: fixtures::foos(),
                values: Default::default(),
                path: "foos.toml".into(),
            }),
            &Config::default(),
        );
        QueryHighlighter::new(state, enabled)
    }

    fn segments(styled: &StyledText) -> Vec<(Style, &str)> {
        styled
            .buffer
            .iter()
            .map(|(style, text)| (*style, text.as_str()))
            .collect()
    }

    #[test]
    fn test_text_is_preserved() {
        let highlighter = create_test_highlighter(true);
        for line in ["", "  int  =  4 ", "has alias or 'a b' foo", "string = 'open"] {
            let styled = highlighter.highlight(line, line.len());
            let joined: String = styled.buffer.iter().map(|(_, t)| t.as_str()).collect();
            assert_eq!(joined, line);
        }
    }

    #[test]
    fn test_token_roles() {
        let highlighter = create_test_highlighter(true);
        let styled = highlighter.highlight("int = 4 and deprecated", 0);

        assert_eq!(
            segments(&styled),
            [
                (Color::Cyan.bold(), "int"),
                (Style::default(), " "),
                (Color::Yellow.normal(), "="),
                (Style::default(), " "),
                (Color::Green.normal(), "4"),
                (Style::default(), " "),
                (Color::Magenta.bold(), "and"),
                (Style::default(), " "),
                (Color::Red.normal(), "deprecated"),
            ]
        );
    }

    #[test]
    fn test_open_literal() {
        let highlighter = create_test_highlighter(true);
        let styled = highlighter.highlight("string = 'a b", 0);
        let last = styled.buffer.last().unwrap();

        assert_eq!(last, &(Color::Green.italic(), "'a b".to_string()));
        assert_eq!(open_literal_start("string = 'a b"), Some(9));
        assert_eq!(open_literal_start("string = 'a b'"), None);
        assert_eq!(open_literal_start("x='a"), Some(0));
    }

    #[test]
    fn test_disabled() {
        let highlighter = create_test_highlighter(false);
        let styled = highlighter.highlight("int = 4", 0);
        assert_eq!(segments(&styled), [(Style::default(), "int = 4")]);
    }
}
