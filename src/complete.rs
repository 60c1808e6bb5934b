use crate::buffer::{InputBuffer, SENTENCE_TERMINATOR};

/// Prefix completion against the target sentence's own vocabulary.
///
/// Candidates are the sentence's whitespace-delimited tokens in order,
/// duplicates preserved, so resolution is stable for a fixed prefix.
#[derive(Debug, Clone)]
pub struct AutocompleteEngine {
    candidates: Vec<String>,
    suggestion: String,
}

impl AutocompleteEngine {
    pub fn new(target_sentence: &str) -> Self {
        Self {
            candidates: target_sentence
                .split_whitespace()
                .map(str::to_string)
                .collect(),
            suggestion: String::new(),
        }
    }

    /// The currently proposed completion tail (possibly empty).
    pub fn suggestion(&self) -> &str {
        &self.suggestion
    }

    /// Completion tail for `prefix`: the shortest case-sensitively matching
    /// token (first wins on ties), trailing sentence terminator stripped,
    /// minus the prefix itself. Empty for an empty prefix or no match.
    pub fn suggest(&self, prefix: &str) -> String {
        if prefix.is_empty() {
            return String::new();
        }
        self.candidates
            .iter()
            .filter(|token| token.starts_with(prefix))
            .min_by_key(|token| token.len())
            .map(|token| {
                let word = token.strip_suffix(SENTENCE_TERMINATOR).unwrap_or(token);
                word.get(prefix.len()..).unwrap_or("").to_string()
            })
            .unwrap_or_default()
    }

    /// Recomputes the stored suggestion from the buffer's trailing partial
    /// word. Called after every buffer mutation that is not a commit.
    pub fn refresh(&mut self, buffer: &InputBuffer) {
        self.suggestion = self.suggest(buffer.last_word());
    }

    /// Appends the current suggestion to the buffer and clears it. An empty
    /// suggestion leaves the buffer untouched but still clears the state.
    pub fn commit(&mut self, buffer: &mut InputBuffer) {
        buffer.append_str(&self.suggestion);
        self.suggestion.clear();
    }
}
