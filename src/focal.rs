//! Optimal Recognition Point (ORP) helpers.
//!
//! The reader's eye lands slightly left of a word's centre. These functions
//! pick that character and split the word around it so a display can pin the
//! focal character to a fixed column.

use serde::Serialize;

/// Index (in `char`s) of the focal character for `word`.
pub fn focal_index(word: &str) -> usize {
    let len = word.chars().count();
    match len {
        0..=1 => 0,
        2..=5 => 1,
        6..=9 => 2,
        10..=13 => 3,
        _ => len * 3 / 10,
    }
}

/// A word cut into the three display segments.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FocalSplit {
    pub before: String,
    pub focal: String,
    pub after: String,
}

impl FocalSplit {
    /// Rejoin the segments; always equal to the word that was split.
    pub fn joined(&self) -> String {
        let mut word =
            String::with_capacity(self.before.len() + self.focal.len() + self.after.len());
        word.push_str(&self.before);
        word.push_str(&self.focal);
        word.push_str(&self.after);
        word
    }
}

/// Split `word` into the text left of the focal character, the focal
/// character itself, and the text right of it.
pub fn split(word: &str) -> FocalSplit {
    let focal_at = focal_index(word);
    let mut before = String::new();
    let mut focal = String::new();
    let mut after = String::new();

    for (idx, ch) in word.chars().enumerate() {
        match idx.cmp(&focal_at) {
            std::cmp::Ordering::Less => before.push(ch),
            std::cmp::Ordering::Equal => focal.push(ch),
            std::cmp::Ordering::Greater => after.push(ch),
        }
    }

    FocalSplit {
        before,
        focal,
        after,
    }
}
