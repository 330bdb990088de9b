//! Suggestion formatting
//!
//! A suggestion replaces the open partial: the already-typed head is kept
//! verbatim, followed by one separating space, the candidate and, for
//! terminal candidates, one trailing space. When the head already ends in
//! whitespace this yields the language's double spacing, e.g. `int  = `.

use super::candidates::Candidate;

/// Render candidates against the input head, dropping duplicates
pub fn render_suggestions(head: &str, candidates: Vec<Candidate>) -> Vec<String> {
    let mut suggestions: Vec<String> = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let trailer = if candidate.terminal { " " } else { "" };
        let suggestion = format!("{head} {}{trailer}", candidate.text);
        if !suggestions.contains(&suggestion) {
            suggestions.push(suggestion);
        }
    }

    suggestions
}
