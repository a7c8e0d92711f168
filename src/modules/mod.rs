pub mod quizzes;
pub mod structure;
pub mod submissions;
