//! @ai:module:intent Extract a balanced call expression and its callee from generated text
//! @ai:module:layer application
//! @ai:module:public_api CallExtractor, CallExtractorTrait, first_balanced_call
//! @ai:module:stateless true

use regex::Regex;

/// Leading `!` characters tolerated before a callee (`!f()`, `!!f()`)
const MAX_NEGATIONS: usize = 2;

/// @ai:intent Trait for call extraction
pub trait CallExtractorTrait: Send + Sync {
    /// @ai:intent First complete, balanced call expression in the text
    fn first_call(&self, text: &str) -> Option<String>;

    /// @ai:intent Plain callee identifier of a call expression
    fn identifier(&self, text: &str) -> Option<String>;
}

/// @ai:intent Extracts calls from model output
pub struct CallExtractor {
    identifier_regex: Regex,
}

impl CallExtractor {
    /// @ai:intent Create a new call extractor
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            identifier_regex: Regex::new(r"^[A-Za-z_$][\w$]*$").unwrap(),
        }
    }

    /// @ai:intent Drop up to MAX_NEGATIONS leading `!`
    /// @ai:effects pure
    fn strip_negations(text: &str) -> &str {
        let negations = text
            .chars()
            .take(MAX_NEGATIONS)
            .take_while(|&c| c == '!')
            .count();
        &text[negations..]
    }
}

impl Default for CallExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl CallExtractorTrait for CallExtractor {
    fn first_call(&self, text: &str) -> Option<String> {
        first_balanced_call(text).map(str::to_string)
    }

    /// @ai:intent Property access, computed callees and leading digits yield None
    /// @ai:effects pure
    fn identifier(&self, text: &str) -> Option<String> {
        let text = Self::strip_negations(text);
        let paren = text.find('(')?;
        let name = &text[..paren];

        if self.identifier_regex.is_match(name) {
            Some(name.to_string())
        } else {
            None
        }
    }
}

/// @ai:intent Prefix of the text ending where the first opened paren is closed
/// @ai:post None on a closer before any matching opener, or when input ends unbalanced
/// @ai:effects pure
pub fn first_balanced_call(text: &str) -> Option<&str> {
    let mut depth: i64 = 0;
    let mut started = false;

    for (i, c) in text.char_indices() {
        match c {
            '(' => {
                started = true;
                depth += 1;
            }
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return None;
                }
            }
            _ => {}
        }

        if started && depth == 0 {
            return Some(&text[..i + c.len_utf8()]);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balanced_call_with_nesting() {
        assert_eq!(
            first_balanced_call("foo(a, (b+c), d)xyz"),
            Some("foo(a, (b+c), d)")
        );
    }

    #[test]
    fn test_first_of_several_calls() {
        assert_eq!(first_balanced_call("g(1); h(2);"), Some("g(1)"));
    }

    #[test]
    fn test_unmatched_opener() {
        assert_eq!(first_balanced_call("foo(a, (b"), None);
    }

    #[test]
    fn test_leading_closer() {
        assert_eq!(first_balanced_call(")foo("), None);
    }

    #[test]
    fn test_no_call_at_all() {
        assert_eq!(first_balanced_call("return x;"), None);
        assert_eq!(first_balanced_call(""), None);
    }

    #[test]
    fn test_multibyte_text() {
        assert_eq!(first_balanced_call("été(ü)…"), Some("été(ü)"));
    }

    #[test]
    fn test_identifier_tolerates_negation() {
        let extractor = CallExtractor::new();
        assert_eq!(extractor.identifier("!!isReady()"), Some("isReady".to_string()));
        assert_eq!(extractor.identifier("!isReady()"), Some("isReady".to_string()));
    }

    #[test]
    fn test_identifier_negation_run_is_bounded() {
        let extractor = CallExtractor::new();
        assert_eq!(extractor.identifier("!!!isReady()"), None);
    }

    #[test]
    fn test_identifier_rejects_leading_digit() {
        let extractor = CallExtractor::new();
        assert_eq!(extractor.identifier("1+2()"), None);
    }

    #[test]
    fn test_identifier_rejects_member_and_computed_calls() {
        let extractor = CallExtractor::new();
        assert_eq!(extractor.identifier("obj.method(1)"), None);
        assert_eq!(extractor.identifier("handlers[key](1)"), None);
        assert_eq!(extractor.identifier("(1)"), None);
        assert_eq!(extractor.identifier("noCall"), None);
    }

    #[test]
    fn test_identifier_accepts_dollar_and_underscore() {
        let extractor = CallExtractor::new();
        assert_eq!(extractor.identifier("$_select2(x)"), Some("$_select2".to_string()));
        assert_eq!(extractor.identifier("_private()"), Some("_private".to_string()));
    }
}
