use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// ============================================================================
// Lesson Map
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LessonMapError {
    #[error("lesson map has no pages")]
    Empty,
    #[error("lesson map key {0:?} is not a page index")]
    InvalidKey(String),
    #[error("lesson map index {0} is defined more than once")]
    Duplicate(usize),
    #[error("lesson map is missing index {0}")]
    Gap(usize),
}

/// Ordered page targets, indexed contiguously from 0
///
/// A target is either a path relative to the course root or an absolute URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LessonMapRepr", into = "Vec<String>")]
pub struct LessonMap {
    targets: Vec<String>,
}

/// Accepted config shapes: a plain array, or a table keyed by index
#[derive(Deserialize)]
#[serde(untagged)]
enum LessonMapRepr {
    List(Vec<String>),
    Table(BTreeMap<String, String>),
}

impl TryFrom<LessonMapRepr> for LessonMap {
    type Error = LessonMapError;

    fn try_from(repr: LessonMapRepr) -> Result<Self, Self::Error> {
        match repr {
            LessonMapRepr::List(targets) => Self::new(targets),
            LessonMapRepr::Table(table) => {
                let mut entries = Vec::with_capacity(table.len());
                for (key, target) in table {
                    let index = key
                        .trim()
                        .parse::<usize>()
                        .map_err(|_| LessonMapError::InvalidKey(key.clone()))?;
                    entries.push((index, target));
                }
                Self::from_entries(entries)
            }
        }
    }
}

impl From<LessonMap> for Vec<String> {
    fn from(map: LessonMap) -> Self {
        map.targets
    }
}

impl LessonMap {
    pub fn new(targets: Vec<String>) -> Result<Self, LessonMapError> {
        if targets.is_empty() {
            return Err(LessonMapError::Empty);
        }
        Ok(Self { targets })
    }

    /// Build from `(index, target)` pairs; indices must cover 0..N-1 exactly once
    pub fn from_entries<I>(entries: I) -> Result<Self, LessonMapError>
    where
        I: IntoIterator<Item = (usize, String)>,
    {
        let mut by_index = BTreeMap::new();
        for (index, target) in entries {
            if by_index.insert(index, target).is_some() {
                return Err(LessonMapError::Duplicate(index));
            }
        }
        for (expected, index) in by_index.keys().enumerate() {
            if *index != expected {
                return Err(LessonMapError::Gap(expected));
            }
        }
        Self::new(by_index.into_values().collect())
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Always false; an empty map is rejected on construction
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.targets.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.targets.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.targets.iter().map(String::as_str).enumerate()
    }
}

// ============================================================================
// Quiz Bank
// ============================================================================

/// Accepted answer for one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerKey {
    /// Radio question: the value of the one correct option
    Single(String),
    /// Checkbox group: the labels that must be checked
    Multiple(Vec<String>),
}

impl AnswerKey {
    pub fn as_single(&self) -> Option<&str> {
        match self {
            AnswerKey::Single(answer) => Some(answer),
            AnswerKey::Multiple(_) => None,
        }
    }

    /// Accepted labels trimmed and lower-cased; a single answer yields one label
    pub fn normalized_labels(&self) -> Vec<String> {
        match self {
            AnswerKey::Single(answer) => vec![normalize_label(answer)],
            AnswerKey::Multiple(answers) => answers.iter().map(|a| normalize_label(a)).collect(),
        }
    }
}

/// Trim and lower-case label text for comparison
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Answer keys for one quiz, by question id (`q1`, `q2`, ...)
pub type QuizKey = BTreeMap<String, AnswerKey>;

/// Answer keys for every quiz, by quiz id (`quiz1`, `quiz2`, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuizBank {
    quizzes: BTreeMap<String, QuizKey>,
}

impl QuizBank {
    pub fn new(quizzes: BTreeMap<String, QuizKey>) -> Self {
        Self { quizzes }
    }

    pub fn quiz(&self, quiz_id: &str) -> Option<&QuizKey> {
        self.quizzes.get(quiz_id)
    }

    pub fn quiz_ids(&self) -> impl Iterator<Item = &str> {
        self.quizzes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.quizzes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quizzes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn pages(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("page{}.html", i)).collect()
    }

    #[test]
    fn test_lesson_map_rejects_empty() {
        assert_eq!(LessonMap::new(Vec::new()), Err(LessonMapError::Empty));
    }

    #[test]
    fn test_lesson_map_from_entries_sorts_by_index() {
        let map = LessonMap::from_entries(vec![
            (2, "c.html".to_string()),
            (0, "a.html".to_string()),
            (1, "https://example.com/b".to_string()),
        ])
        .unwrap();

        assert_eq!(map.len(), 3);
        assert_eq!(map.last_index(), 2);
        assert_eq!(map.get(1), Some("https://example.com/b"));
        assert_eq!(map.get(3), None);
    }

    #[test]
    fn test_lesson_map_from_entries_rejects_gaps_and_duplicates() {
        let gap = LessonMap::from_entries(vec![(0, "a".to_string()), (2, "c".to_string())]);
        assert_eq!(gap, Err(LessonMapError::Gap(1)));

        let dup = LessonMap::from_entries(vec![(0, "a".to_string()), (0, "b".to_string())]);
        assert_eq!(dup, Err(LessonMapError::Duplicate(0)));

        let offset = LessonMap::from_entries(vec![(1, "a".to_string())]);
        assert_eq!(offset, Err(LessonMapError::Gap(0)));
    }

    #[test]
    fn test_lesson_map_deserializes_list_and_table() {
        let list: LessonMap = serde_json::from_value(json!(["a.html", "b.html"])).unwrap();
        assert_eq!(list, LessonMap::new(vec!["a.html".into(), "b.html".into()]).unwrap());

        let table: LessonMap =
            serde_json::from_value(json!({"1": "b.html", "0": "a.html"})).unwrap();
        assert_eq!(table, list);

        assert!(serde_json::from_value::<LessonMap>(json!({"zero": "a.html"})).is_err());
        assert!(serde_json::from_value::<LessonMap>(json!([])).is_err());
    }

    #[test]
    fn test_lesson_map_iter() {
        let map = LessonMap::new(pages(3)).unwrap();
        let indices: Vec<usize> = map.iter().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_answer_key_shapes() {
        let bank: QuizBank = serde_json::from_value(json!({
            "quiz1": {
                "q3": "To safeguard computer systems and data from unauthorized access",
                "q16": ["  Passwords are often too simple or easily guessable ", "People tend to reuse passwords across multiple accounts"]
            }
        }))
        .unwrap();

        let quiz = bank.quiz("quiz1").unwrap();
        assert_eq!(
            quiz["q3"].as_single(),
            Some("To safeguard computer systems and data from unauthorized access")
        );
        assert_eq!(quiz["q16"].as_single(), None);
        assert_eq!(
            quiz["q16"].normalized_labels(),
            vec![
                "passwords are often too simple or easily guessable".to_string(),
                "people tend to reuse passwords across multiple accounts".to_string(),
            ]
        );
        assert!(bank.quiz("quiz9").is_none());
        assert_eq!(bank.quiz_ids().collect::<Vec<_>>(), vec!["quiz1"]);
    }
}
