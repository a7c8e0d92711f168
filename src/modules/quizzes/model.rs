pub use coursebyte_models::quizzes::{
    AnswerOption, CreateAnswerOptionDto, CreateQuestionDto, CreateQuizDto,
    DEFAULT_TIME_LIMIT_SECONDS, MAX_TIME_LIMIT_SECONDS, Question, QuestionDetail, QuestionType,
    Quiz, QuizDetail, QuizSummary,
};
pub use coursebyte_models::{CourseId, ModuleId, QuestionId, QuizId};
