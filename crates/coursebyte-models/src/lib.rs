//! # Coursebyte Models
//!
//! Domain models and DTOs for the Coursebyte API: database entities
//! (`sqlx::FromRow`), request DTOs (`validator::Validate`) and response
//! views (`utoipa::ToSchema`).
//!
//! # Modules
//!
//! - [`ids`]: Strongly-typed entity identifiers
//! - [`courses`]: Course and user records owned by external systems
//! - [`structure`]: Modules, lessons and their ordering DTOs
//! - [`quizzes`]: Quizzes, questions, answer options and submissions

pub mod courses;
pub mod ids;
pub mod quizzes;
pub mod structure;

pub use courses::{Course, User, UserRole};
pub use ids::{
    AnswerOptionId, CourseId, LessonId, ModuleId, QuestionId, QuizId, QuizSubmissionId, UserId,
};
pub use quizzes::{
    AnswerOption, CreateAnswerOptionDto, CreateQuestionDto, CreateQuizDto, Question,
    QuestionDetail, QuestionType, Quiz, QuizDetail, QuizSubmission, QuizSummary,
    SubmissionResult, SubmitQuizDto, SubmitSingleChoiceDto,
};
pub use structure::{
    CourseStructure, CreateLessonDto, CreateModuleDto, Lesson, Module, ModuleWithLessons,
    ReorderLessonsDto, ReorderModulesDto, UpdateLessonDto, UpdateModuleDto, UpdateOrderDto,
};
