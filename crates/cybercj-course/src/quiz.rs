//! Self-scoring quizzes: draw a random subset of questions, grade against the bank

use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;

use cybercj_types::course::normalize_label;
use cybercj_types::{AnswerKey, QuizBank, QuizKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Radio,
    Checkbox,
}

/// One option as rendered on the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceInput {
    pub kind: InputKind,
    /// `name` attribute: `qN` for radios, `qNaM` for checkboxes
    pub name: String,
    pub value: String,
    /// Text of the label following the input
    pub label: String,
    pub checked: bool,
}

impl ChoiceInput {
    pub fn radio(name: &str, value: &str, checked: bool) -> Self {
        Self {
            kind: InputKind::Radio,
            name: name.to_string(),
            value: value.to_string(),
            label: value.to_string(),
            checked,
        }
    }

    pub fn checkbox(name: &str, label: &str, checked: bool) -> Self {
        Self {
            kind: InputKind::Checkbox,
            name: name.to_string(),
            value: String::new(),
            label: label.to_string(),
            checked,
        }
    }
}

/// The inputs of one question block, in page order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedQuestion {
    pub inputs: Vec<ChoiceInput>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizScore {
    pub points: usize,
    pub out_of: usize,
}

impl fmt::Display for QuizScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Your score is: {}/{}", self.points, self.out_of)
    }
}

/// What the quiz engine needs from the page
pub trait QuizView {
    /// Handle to one question block
    type Card: Clone;

    /// Heading as authored, without any number added by a previous setup
    fn base_heading(&self, card: &Self::Card) -> String;
    fn set_heading(&self, card: &Self::Card, heading: &str);
    /// Replace the container's content with `cards`, followed by the submit control
    fn mount(&self, cards: &[Self::Card]);
    fn rendered_questions(&self, quiz_id: &str) -> Vec<RenderedQuestion>;
    /// Blocking acknowledgment of the score
    fn announce_score(&self, quiz_id: &str, score: &QuizScore);
    fn clear_selections(&self, quiz_id: &str);
}

pub struct QuizEngine {
    bank: QuizBank,
    question_limit: usize,
}

impl QuizEngine {
    pub fn new(bank: QuizBank, question_limit: usize) -> Self {
        Self {
            bank,
            question_limit,
        }
    }

    pub fn bank(&self) -> &QuizBank {
        &self.bank
    }

    /// Mount a fresh random draw of at most `question_limit` questions from `pool`
    ///
    /// Headings are numbered 1..k in the new order. Each call is independent of
    /// the previous one as long as the caller passes the full pool.
    pub fn setup_quiz<V, R>(&self, view: &V, pool: &[V::Card], rng: &mut R) -> Vec<V::Card>
    where
        V: QuizView,
        R: Rng + ?Sized,
    {
        let selected = select_questions(pool, self.question_limit, rng);
        for (index, card) in selected.iter().enumerate() {
            let heading = numbered_heading(index + 1, &view.base_heading(card));
            view.set_heading(card, &heading);
        }
        view.mount(&selected);
        log::debug!("Quiz set up with {} of {} questions", selected.len(), pool.len());
        selected
    }

    /// Grade the rendered questions of `quiz_id`, announce the score, then reset the inputs
    pub fn submit_quiz<V: QuizView>(&self, quiz_id: &str, view: &V) -> QuizScore {
        let questions = view.rendered_questions(quiz_id);
        let score = self.grade(quiz_id, &questions);
        log::info!("{}: {}/{}", quiz_id, score.points, score.out_of);
        view.announce_score(quiz_id, &score);
        view.clear_selections(quiz_id);
        score
    }

    /// Score `questions` against the bank; unanswered or unknown questions earn nothing
    pub fn grade(&self, quiz_id: &str, questions: &[RenderedQuestion]) -> QuizScore {
        let out_of = questions.len();
        let Some(key) = self.bank.quiz(quiz_id) else {
            log::warn!("No answer key for quiz {:?}", quiz_id);
            return QuizScore { points: 0, out_of };
        };
        let points = questions.iter().map(|q| grade_question(key, q)).sum();
        QuizScore { points, out_of }
    }
}

/// Shuffle a copy of `pool` (Fisher–Yates) and keep the first `limit` items
pub fn select_questions<T, R>(pool: &[T], limit: usize, rng: &mut R) -> Vec<T>
where
    T: Clone,
    R: Rng + ?Sized,
{
    let mut shuffled = pool.to_vec();
    shuffled.shuffle(rng);
    shuffled.truncate(limit);
    shuffled
}

/// Prefix the display position to the authored heading
pub fn numbered_heading(position: usize, base: &str) -> String {
    format!("{}{}", position, base)
}

/// Question id shared by a checkbox group: `q3a1` -> `q3`
pub fn question_id_from_checkbox(name: &str) -> &str {
    name.split('a').next().unwrap_or(name)
}

fn grade_question(key: &QuizKey, question: &RenderedQuestion) -> usize {
    let radio_points = question
        .inputs
        .iter()
        .filter(|input| input.kind == InputKind::Radio && input.checked)
        .filter(|input| {
            key.get(&input.name).and_then(AnswerKey::as_single) == Some(input.value.as_str())
        })
        .count();

    let checkboxes: Vec<&ChoiceInput> = question
        .inputs
        .iter()
        .filter(|input| input.kind == InputKind::Checkbox)
        .collect();
    let checkbox_points = usize::from(!checkboxes.is_empty() && checkbox_group_correct(key, &checkboxes));

    radio_points + checkbox_points
}

/// Every checkbox must be checked exactly when its label is an accepted answer
fn checkbox_group_correct(key: &QuizKey, checkboxes: &[&ChoiceInput]) -> bool {
    let question_id = question_id_from_checkbox(&checkboxes[0].name);
    let Some(answer) = key.get(question_id) else {
        log::warn!("No answer key for checkbox group {:?}", question_id);
        return false;
    };
    let accepted = answer.normalized_labels();
    checkboxes
        .iter()
        .all(|input| input.checked == accepted.contains(&normalize_label(&input.label)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::{BTreeMap, HashSet};

    fn bank() -> QuizBank {
        let mut quiz = BTreeMap::new();
        quiz.insert("q1".to_string(), AnswerKey::Single("Firewall".to_string()));
        quiz.insert(
            "q2".to_string(),
            AnswerKey::Multiple(vec!["Block unauthorized access".into(), "Control network traffic".into()]),
        );
        let mut quizzes = BTreeMap::new();
        quizzes.insert("quiz2".to_string(), quiz);
        QuizBank::new(quizzes)
    }

    #[test]
    fn test_select_questions_limits_and_keeps_items_distinct() {
        let pool: Vec<u32> = (0..20).collect();
        let mut rng = StdRng::seed_from_u64(7);
        let picked = select_questions(&pool, 15, &mut rng);

        assert_eq!(picked.len(), 15);
        assert_eq!(picked.iter().collect::<HashSet<_>>().len(), 15);
        assert!(picked.iter().all(|q| pool.contains(q)));
    }

    #[test]
    fn test_select_questions_small_pool_keeps_all() {
        let pool = vec!["a", "b", "c"];
        let mut rng = StdRng::seed_from_u64(1);
        let mut picked = select_questions(&pool, 15, &mut rng);
        picked.sort();
        assert_eq!(picked, pool);
    }

    #[test]
    fn test_numbered_heading() {
        assert_eq!(numbered_heading(3, ". What is a firewall?"), "3. What is a firewall?");
    }

    #[test]
    fn test_question_id_from_checkbox() {
        assert_eq!(question_id_from_checkbox("q13a2"), "q13");
        assert_eq!(question_id_from_checkbox("q7"), "q7");
    }

    #[test]
    fn test_grade_mixed_questions() {
        let engine = QuizEngine::new(bank(), 15);
        let questions = vec![
            RenderedQuestion {
                inputs: vec![
                    ChoiceInput::radio("q1", "Antivirus", false),
                    ChoiceInput::radio("q1", "Firewall", true),
                ],
            },
            RenderedQuestion {
                inputs: vec![
                    ChoiceInput::checkbox("q2a1", " block unauthorized ACCESS ", true),
                    ChoiceInput::checkbox("q2a2", "Speed up downloads", false),
                    ChoiceInput::checkbox("q2a3", "Control network traffic", true),
                ],
            },
        ];
        assert_eq!(engine.grade("quiz2", &questions), QuizScore { points: 2, out_of: 2 });
    }

    #[test]
    fn test_grade_unanswered_and_unknown() {
        let engine = QuizEngine::new(bank(), 15);
        let unanswered = vec![
            RenderedQuestion {
                inputs: vec![ChoiceInput::radio("q1", "Firewall", false)],
            },
            RenderedQuestion {
                inputs: vec![ChoiceInput::checkbox("q2a1", "Block unauthorized access", false)],
            },
            RenderedQuestion {
                inputs: vec![ChoiceInput::checkbox("q99a1", "Anything", true)],
            },
            RenderedQuestion::default(),
        ];
        assert_eq!(engine.grade("quiz2", &unanswered), QuizScore { points: 0, out_of: 4 });
        assert_eq!(engine.grade("quiz7", &unanswered), QuizScore { points: 0, out_of: 4 });
    }

    #[test]
    fn test_score_message() {
        assert_eq!(QuizScore { points: 9, out_of: 15 }.to_string(), "Your score is: 9/15");
    }
}
