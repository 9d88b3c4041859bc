use crate::{Error, Result};

/// Maximum number of characters forwarded to a model.
///
/// Counted in Unicode scalar values, which never exceeds the model's token
/// count for the same text, so staying under the bound keeps the prompt
/// within the token budget. It may cut more than strictly necessary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncationBound(usize);

impl TruncationBound {
    pub fn new(max_characters: usize) -> Result<Self> {
        if max_characters == 0 {
            return Err(Error::config("max_characters must be greater than 0"));
        }
        Ok(Self(max_characters))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

/// Returns the prefix of `prompt` that fits within `bound`, and whether
/// anything was cut.
pub fn normalize(prompt: &str, bound: TruncationBound) -> (&str, bool) {
    match prompt.char_indices().nth(bound.0) {
        Some((offset, _)) => (&prompt[..offset], true),
        None => (prompt, false),
    }
}
