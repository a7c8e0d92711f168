//! Quiz models: quizzes, questions, answer options, submissions and the
//! authoring / submission DTOs.
//!
//! The authoring DTOs carry the full answer-key contract so a quiz that
//! reaches the service layer is always gradable: every question has at
//! least two options and at least one correct option, and a single-choice
//! question has exactly one.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::ids::{AnswerOptionId, CourseId, ModuleId, QuestionId, QuizId, QuizSubmissionId, UserId};

pub const DEFAULT_TIME_LIMIT_SECONDS: i64 = 1800;
pub const MAX_TIME_LIMIT_SECONDS: i64 = 8 * 60 * 60;
pub const MAX_QUESTION_POINTS: i32 = 1000;
pub const MAX_QUESTIONS: usize = 200;
pub const MAX_OPTIONS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "question_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    SingleChoice,
    MultipleChoice,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Quiz {
    pub id: QuizId,
    pub course_id: CourseId,
    pub module_id: Option<ModuleId>,
    pub title: String,
    pub description: Option<String>,
    /// Seconds.
    pub time_limit: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Question {
    pub id: QuestionId,
    pub quiz_id: QuizId,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub points: i32,
    /// Zero-based position in the authoring request.
    pub position: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AnswerOption {
    pub id: AnswerOptionId,
    pub question_id: QuestionId,
    pub text: String,
    pub is_correct: bool,
    pub position: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct QuizSubmission {
    pub id: QuizSubmissionId,
    pub quiz_id: QuizId,
    pub student_id: UserId,
    pub score: i32,
    pub taken_at: DateTime<Utc>,
}

/// Returned after a quiz is authored.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuizSummary {
    #[serde(flatten)]
    pub quiz: Quiz,
    pub question_count: usize,
    pub max_score: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuestionDetail {
    #[serde(flatten)]
    pub question: Question,
    pub options: Vec<AnswerOption>,
}

/// A quiz with its questions and options, correct flags included.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuizDetail {
    #[serde(flatten)]
    pub quiz: Quiz,
    pub max_score: i32,
    pub questions: Vec<QuestionDetail>,
}

/// Outcome of a graded submission.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubmissionResult {
    #[serde(flatten)]
    pub submission: QuizSubmission,
    pub max_score: i32,
    pub correct_answers: usize,
}

fn default_time_limit() -> i64 {
    DEFAULT_TIME_LIMIT_SECONDS
}

fn default_points() -> i32 {
    1
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateQuizDto {
    pub course_id: CourseId,
    pub module_id: Option<ModuleId>,
    #[validate(length(min = 3, max = 100, message = "Title must be between 3 and 100 characters"))]
    pub title: String,
    #[validate(length(max = 500, message = "Description must not exceed 500 characters"))]
    pub description: Option<String>,
    #[serde(default = "default_time_limit")]
    #[validate(range(
        min = 1,
        max = 28800,
        message = "Time limit must be between 1 second and 8 hours"
    ))]
    pub time_limit: i64,
    #[validate(
        length(min = 1, max = 200, message = "Quiz must have between 1 and 200 questions"),
        nested
    )]
    pub questions: Vec<CreateQuestionDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_answer_key"))]
pub struct CreateQuestionDto {
    #[validate(length(min = 1, max = 1000, message = "Question text must be between 1 and 1000 characters"))]
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default = "default_points")]
    #[validate(range(min = 1, max = 1000, message = "Points must be between 1 and 1000"))]
    pub points: i32,
    #[validate(
        length(min = 2, max = 20, message = "Question must have between 2 and 20 options"),
        nested
    )]
    pub options: Vec<CreateAnswerOptionDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateAnswerOptionDto {
    #[validate(length(min = 1, message = "Option text is required"))]
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

fn validate_answer_key(question: &CreateQuestionDto) -> Result<(), ValidationError> {
    let correct = question.options.iter().filter(|o| o.is_correct).count();

    if correct == 0 {
        return Err(ValidationError::new("answer_key")
            .with_message("Question must have at least one correct option".into()));
    }

    if question.question_type == QuestionType::SingleChoice && correct != 1 {
        return Err(ValidationError::new("answer_key")
            .with_message("Single choice question must have exactly one correct option".into()));
    }

    Ok(())
}

impl CreateQuizDto {
    /// Sum of points over all questions. Saturates instead of overflowing
    /// for input that skipped validation.
    pub fn max_score(&self) -> i32 {
        self.questions
            .iter()
            .fold(0i32, |total, q| total.saturating_add(q.points))
    }
}

/// Answers for any question type: question id to the set of selected options.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SubmitQuizDto {
    pub student_id: UserId,
    #[schema(value_type = Object)]
    pub answers: HashMap<QuestionId, HashSet<AnswerOptionId>>,
}

/// Answers where every question has exactly one selected option.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SubmitSingleChoiceDto {
    pub student_id: UserId,
    #[schema(value_type = Object)]
    pub answers: HashMap<QuestionId, AnswerOptionId>,
}

impl From<SubmitSingleChoiceDto> for SubmitQuizDto {
    fn from(dto: SubmitSingleChoiceDto) -> Self {
        let answers = dto
            .answers
            .into_iter()
            .map(|(question, option)| (question, HashSet::from([option])))
            .collect();

        Self {
            student_id: dto.student_id,
            answers,
        }
    }
}
