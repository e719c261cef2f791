use serde::{Deserialize, Serialize};

use crate::error::{BoardError, BoardResult};

/// Built-in hazardous weather keywords, in match priority order.
///
/// Keywords containing a period are abbreviations and also match as a
/// substring of a longer word (`кр.гололед` inside `кр.гололед/изм`).
pub const HAZARD_KEYWORDS: &[&str] = &[
    // Visibility
    "туман",
    // Precipitation
    "гроза",
    "интенсивный дождь",
    "снежные заряды",
    "град",
    "ледяной дождь",
    "отд.куч.дожд",
    // Wind
    "шквал",
    // Icing
    "гололед",
    "гололёд",
    "кр.гололед",
    "кр.гололёд",
    // Low ceiling sentinel
    "50х",
];

/// A single hazard keyword, pre-lowercased for matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HazardKeyword {
    text: String,
    words: Vec<String>,
    substring: bool,
}

impl HazardKeyword {
    pub fn new(keyword: &str) -> BoardResult<Self> {
        let text = keyword.trim().to_lowercase();
        let words: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        if words.is_empty() {
            return Err(BoardError::InvalidKeyword {
                keyword: keyword.to_string(),
            });
        }
        Ok(Self {
            substring: text.contains('.'),
            text: words.join(" "),
            words,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of whitespace-separated words this keyword spans
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    fn matches_word(&self, word: &str) -> bool {
        let lowered = word.to_lowercase();
        lowered == self.text || (self.substring && lowered.contains(&self.text))
    }

    fn matches_window(&self, window: &[&str]) -> bool {
        window.len() == self.words.len()
            && window
                .iter()
                .zip(&self.words)
                .all(|(word, keyword)| word.to_lowercase() == *keyword)
    }
}

/// A run of words recognised as a hazard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HazardMatch {
    /// The keyword that matched (lowercased)
    pub keyword: String,
    /// The matched words as they appeared in the input
    pub matched: String,
    pub word_count: usize,
}

/// Ordered, read-only hazard keyword table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HazardKeywords {
    keywords: Vec<HazardKeyword>,
}

impl Default for HazardKeywords {
    fn default() -> Self {
        Self::builtin()
    }
}

impl HazardKeywords {
    /// The built-in [`HAZARD_KEYWORDS`] table
    pub fn builtin() -> Self {
        Self {
            keywords: HAZARD_KEYWORDS
                .iter()
                .filter_map(|k| HazardKeyword::new(k).ok())
                .collect(),
        }
    }

    /// Build a table from a caller-supplied list, keeping its order
    pub fn from_list<S: AsRef<str>>(list: &[S]) -> BoardResult<Self> {
        let keywords = list
            .iter()
            .map(|k| HazardKeyword::new(k.as_ref()))
            .collect::<BoardResult<Vec<_>>>()?;
        Ok(Self { keywords })
    }

    pub fn iter(&self) -> impl Iterator<Item = &HazardKeyword> {
        self.keywords.iter()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Try every keyword, in table order, against the words starting at
    /// `words[start]`. First match wins.
    pub fn match_at(&self, words: &[&str], start: usize) -> Option<HazardMatch> {
        let rest = words.get(start..)?;
        let first = rest.first()?;

        self.keywords.iter().find_map(|keyword| {
            let count = keyword.word_count();
            let hit = if count == 1 {
                keyword.matches_word(first)
            } else {
                rest.get(..count)
                    .is_some_and(|window| keyword.matches_window(window))
            };
            hit.then(|| HazardMatch {
                keyword: keyword.text.clone(),
                matched: rest[..count].join(" "),
                word_count: count,
            })
        })
    }
}
