//! @ai:module:intent Locate in-corpus call expressions inside function bodies
//! @ai:module:layer domain
//! @ai:module:public_api CallOccurrence, CallSpanLocator
//! @ai:module:stateless true

use crate::corpus::analysis::{ExportedFunction, ProjectSignatures};
use std::collections::HashSet;

/// @ai:intent A located call: `function.text[begin..end] == text`
/// @ai:invariant begin and end are byte offsets on char boundaries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOccurrence {
    pub begin: usize,
    pub end: usize,
    pub text: String,
}

/// @ai:intent Finds every occurrence of each distinct in-corpus call in a function
pub struct CallSpanLocator;

impl CallSpanLocator {
    /// @ai:intent Create a new locator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Locate the occurrences of all calls to project-exported functions
    /// @ai:post empty when the function calls nothing in the project
    /// @ai:effects pure
    pub fn locate(
        &self,
        function: &ExportedFunction,
        project: &ProjectSignatures,
    ) -> Vec<CallOccurrence> {
        let mut handled: HashSet<&str> = HashSet::new();
        let mut occurrences = Vec::new();

        for call in &function.function_calls {
            let Some(callee) = call.callee() else {
                continue;
            };

            if !project.exposes(callee) {
                continue;
            }

            if !handled.insert(call.text.as_str()) {
                continue;
            }

            occurrences.extend(find_occurrences(&function.text, &call.text));
        }

        occurrences
    }
}

impl Default for CallSpanLocator {
    fn default() -> Self {
        Self::new()
    }
}

/// @ai:intent Scan left to right, resuming one character past each match start
/// @ai:effects pure
pub fn find_occurrences(haystack: &str, needle: &str) -> Vec<CallOccurrence> {
    let mut occurrences = Vec::new();

    if needle.is_empty() {
        return occurrences;
    }

    let mut cursor = 0;

    while let Some(offset) = haystack[cursor..].find(needle) {
        let begin = cursor + offset;
        let end = begin + needle.len();

        occurrences.push(CallOccurrence {
            begin,
            end,
            text: needle.to_string(),
        });

        let step = haystack[begin..].chars().next().map_or(1, char::len_utf8);
        cursor = begin + step;
    }

    occurrences
}
