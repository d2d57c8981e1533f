use std::fmt;

/// Response text received so far for one submission.
///
/// Append-only while a request is in flight; only [`reset`](Self::reset)
/// shortens it, which starts a new submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccumulatedResult {
    text: String,
}

impl AccumulatedResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, delta: &str) {
        self.text.push_str(delta);
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn reset(&mut self) {
        self.text.clear();
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for AccumulatedResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
