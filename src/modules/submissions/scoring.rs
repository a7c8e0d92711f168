//! Exact-match grading.
//!
//! A question is answered correctly iff the set of selected options equals
//! the set of options marked correct. One rule covers both question types:
//! a single-choice answer is just a set of size one. A question whose key
//! has no correct option never awards points, even for an empty answer.

use std::collections::{HashMap, HashSet};

use coursebyte_models::{AnswerOption, AnswerOptionId, Question, QuestionId};

#[derive(Debug, Clone)]
struct KeyEntry {
    question_id: QuestionId,
    points: i32,
    correct: HashSet<AnswerOptionId>,
}

/// The authored answer key of one quiz.
#[derive(Debug, Clone)]
pub struct AnswerKey {
    entries: Vec<KeyEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grade {
    pub score: i32,
    pub correct_answers: usize,
}

pub fn is_answer_correct(
    selected: &HashSet<AnswerOptionId>,
    correct: &HashSet<AnswerOptionId>,
) -> bool {
    !correct.is_empty() && selected == correct
}

impl AnswerKey {
    /// Options that reference a question outside `questions` are ignored.
    pub fn build(questions: &[Question], options: &[AnswerOption]) -> Self {
        let mut correct: HashMap<QuestionId, HashSet<AnswerOptionId>> = HashMap::new();
        for option in options.iter().filter(|o| o.is_correct) {
            correct
                .entry(option.question_id)
                .or_default()
                .insert(option.id);
        }

        let entries = questions
            .iter()
            .map(|q| KeyEntry {
                question_id: q.id,
                points: q.points,
                correct: correct.remove(&q.id).unwrap_or_default(),
            })
            .collect();

        Self { entries }
    }

    /// Sum of points over every question, saturating at `i32::MAX`.
    pub fn max_score(&self) -> i32 {
        self.entries
            .iter()
            .fold(0i32, |total, e| total.saturating_add(e.points))
    }

    /// Unanswered questions score zero; answers to questions that are not
    /// part of the quiz are ignored.
    pub fn grade(&self, answers: &HashMap<QuestionId, HashSet<AnswerOptionId>>) -> Grade {
        self.entries
            .iter()
            .filter(|entry| {
                answers
                    .get(&entry.question_id)
                    .is_some_and(|selected| is_answer_correct(selected, &entry.correct))
            })
            .fold(
                Grade {
                    score: 0,
                    correct_answers: 0,
                },
                |grade, entry| Grade {
                    score: grade.score.saturating_add(entry.points),
                    correct_answers: grade.correct_answers + 1,
                },
            )
    }
}
