/// Sentence-terminator stripped from word tokens and used to end the session.
pub const SENTENCE_TERMINATOR: char = '.';

/// Everything the participant has committed since the session started.
///
/// The autocomplete suggestion preview is never part of the buffer; only
/// characters that were typed or explicitly committed land here.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_char(&mut self, c: char) {
        self.text.push(c);
    }

    pub fn append_str(&mut self, s: &str) {
        self.text.push_str(s);
    }

    /// Removes exactly one trailing character; no-op on an empty buffer.
    pub fn delete_last(&mut self) {
        self.text.pop();
    }

    pub fn current_text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Final whitespace-delimited token with a trailing sentence terminator
    /// stripped. Empty when the buffer holds no token at all, so a boundary
    /// character typed first still yields a (deliberately empty) word.
    pub fn last_word(&self) -> &str {
        let word = self.text.split_whitespace().last().unwrap_or("");
        word.strip_suffix(SENTENCE_TERMINATOR).unwrap_or(word)
    }

    /// Buffer contents with exactly one leading character dropped.
    ///
    /// The original study tool logged `input[1:]` as the completed-sentence
    /// content. Whether that was a leading-space trim or an off-by-one is
    /// unresolved; the behavior is kept literally so logs stay comparable
    /// across implementations.
    pub fn normalized_for_completion(&self) -> String {
        let mut chars = self.text.chars();
        chars.next();
        chars.collect()
    }
}
