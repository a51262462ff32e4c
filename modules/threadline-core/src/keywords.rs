use ai_client::OpenRouter;
use tracing::warn;

/// Reasoning models prefix their answer with a chain-of-thought block;
/// everything through this marker is discarded before parsing.
const THINK_END_MARKER: &str = "</think>";

const KEYWORD_SYSTEM_PROMPT: &str = "You generate search keywords. Given a topic, reply with a \
single list literal of 5 to 10 related keyword strings, e.g. ['keyword one', 'keyword two']. \
Output only the list. No prose, no code fences, no explanation.";

/// Extracts related keywords for a topic via one model completion.
///
/// The model's raw response is parsed with a fail-safe pipeline: strip
/// the reasoning preamble, find the first bracketed list, parse it as a
/// literal list of quoted strings. Every failure mode degrades to an
/// empty result; this never errors past its own boundary.
pub struct KeywordExtractor {
    llm: OpenRouter,
    model: String,
}

impl KeywordExtractor {
    pub fn new(llm: OpenRouter, model: &str) -> Self {
        Self {
            llm,
            model: model.to_string(),
        }
    }

    pub async fn extract(&self, topic: &str) -> Vec<String> {
        let user_prompt = format!("Topic: {topic}");
        let raw = match self
            .llm
            .complete(&self.model, KEYWORD_SYSTEM_PROMPT, &user_prompt)
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                warn!(topic, error = %e, "Keyword completion failed");
                return Vec::new();
            }
        };

        parse_keyword_list(&raw)
    }
}

/// Parse a model response down to a deduplicated keyword list.
pub fn parse_keyword_list(raw: &str) -> Vec<String> {
    let answer = strip_reasoning(raw);

    let span = match find_list_span(answer) {
        FoundSpan::Span(span) => span,
        FoundSpan::None => return Vec::new(),
        FoundSpan::Unterminated => {
            warn!(response = answer, "Unterminated list in model response");
            return Vec::new();
        }
    };

    let items = match parse_items(span) {
        Ok(items) => items,
        Err(e) => {
            warn!(response = answer, error = e.as_str(), "Malformed list in model response");
            return Vec::new();
        }
    };

    // Ordered, distinct, non-empty.
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| !item.trim().is_empty())
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Discard everything up to and including the reasoning end marker.
fn strip_reasoning(raw: &str) -> &str {
    match raw.find(THINK_END_MARKER) {
        Some(idx) => &raw[idx + THINK_END_MARKER.len()..],
        None => raw,
    }
}

enum FoundSpan<'a> {
    /// Inner text of the first bracketed span, brackets excluded.
    Span(&'a str),
    /// No opening bracket at all.
    None,
    /// Opening bracket with no matching close.
    Unterminated,
}

/// Quote-aware scan for the first `[...]` span. A `]` inside a quoted
/// string does not close the list.
fn find_list_span(s: &str) -> FoundSpan<'_> {
    let open = match s.find('[') {
        Some(idx) => idx,
        None => return FoundSpan::None,
    };

    let mut in_quote: Option<char> = None;
    for (idx, ch) in s[open + 1..].char_indices() {
        match in_quote {
            Some(q) => {
                if ch == q {
                    in_quote = None;
                }
            }
            None => match ch {
                '\'' | '"' => in_quote = Some(ch),
                ']' => return FoundSpan::Span(&s[open + 1..open + 1 + idx]),
                _ => {}
            },
        }
    }
    FoundSpan::Unterminated
}

/// Strict literal parse of the span contents: quoted strings separated
/// by commas, trailing comma allowed, nothing else.
fn parse_items(inner: &str) -> Result<Vec<String>, String> {
    let mut items = Vec::new();
    let mut rest = inner.trim_start();

    while let Some(quote) = rest.chars().next() {
        if quote != '\'' && quote != '"' {
            return Err(format!("expected quoted string, found {quote:?}"));
        }

        let body = &rest[quote.len_utf8()..];
        let close = body
            .find(quote)
            .ok_or_else(|| "unterminated string".to_string())?;
        items.push(body[..close].to_string());

        rest = body[close + quote.len_utf8()..].trim_start();
        match rest.chars().next() {
            None => break,
            Some(',') => rest = rest[1..].trim_start(),
            Some(c) => return Err(format!("expected comma between items, found {c:?}")),
        }
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasoning_preamble_is_discarded() {
        let raw = "<think>ignore this</think>['a','b','c']";
        assert_eq!(parse_keyword_list(raw), vec!["a", "b", "c"]);
    }

    #[test]
    fn list_without_preamble_parses() {
        assert_eq!(
            parse_keyword_list("['rust lang', \"borrow checker\"]"),
            vec!["rust lang", "borrow checker"]
        );
    }

    #[test]
    fn surrounding_prose_is_ignored() {
        let raw = "Here are your keywords: ['a', 'b'] hope that helps!";
        assert_eq!(parse_keyword_list(raw), vec!["a", "b"]);
    }

    #[test]
    fn no_list_yields_empty() {
        assert!(parse_keyword_list("I could not think of any keywords.").is_empty());
    }

    #[test]
    fn unterminated_list_yields_empty() {
        assert!(parse_keyword_list("['a', 'b'").is_empty());
    }

    #[test]
    fn unquoted_items_yield_empty() {
        assert!(parse_keyword_list("[a, b, c]").is_empty());
    }

    #[test]
    fn missing_comma_yields_empty() {
        assert!(parse_keyword_list("['a' 'b']").is_empty());
    }

    #[test]
    fn trailing_comma_and_bracket_in_string_are_accepted() {
        assert_eq!(
            parse_keyword_list("['a]b', 'c',]"),
            vec!["a]b", "c"]
        );
    }

    #[test]
    fn empty_list_is_valid() {
        assert!(parse_keyword_list("[]").is_empty());
    }

    #[test]
    fn duplicates_and_blanks_are_dropped_in_order() {
        assert_eq!(
            parse_keyword_list("['a', '', 'b', 'a', '  ']"),
            vec!["a", "b"]
        );
    }

    #[test]
    fn only_first_list_is_used() {
        assert_eq!(parse_keyword_list("['a'] ['b']"), vec!["a"]);
    }
}
