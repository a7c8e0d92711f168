pub use coursebyte_models::quizzes::{
    QuizSubmission, SubmissionResult, SubmitQuizDto, SubmitSingleChoiceDto,
};
pub use coursebyte_models::{QuizId, UserId};
