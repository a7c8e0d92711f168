//! The data-access interface the engines depend on.
//!
//! Each method is one query shape (find by id, list by parent, exists by
//! pair, guarded delete, atomic multi-row write). Implementations must make
//! every method atomic on its own: in particular `insert_*` must reject a
//! duplicate order index or submission even when a concurrent caller passed
//! the engine's pre-check at the same time.

use async_trait::async_trait;
use coursebyte_core::AppError;
use coursebyte_models::{
    AnswerOption, Course, CourseId, CreateLessonDto, CreateModuleDto, CreateQuizDto, Lesson,
    LessonId, Module, ModuleId, Question, Quiz, QuizId, QuizSubmission, User, UserId,
};

/// Read-only view of the identity store and course catalogue.
#[async_trait]
pub trait CourseDirectory: Send + Sync {
    async fn find_course(&self, course_id: CourseId) -> Result<Option<Course>, AppError>;

    /// Returns the user only if their role is student.
    async fn find_student(&self, student_id: UserId) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait StructureRepository: Send + Sync {
    async fn find_module(&self, module_id: ModuleId) -> Result<Option<Module>, AppError>;

    /// Modules of a course ordered by `order_index`.
    async fn modules_by_course(&self, course_id: CourseId) -> Result<Vec<Module>, AppError>;

    async fn insert_module(
        &self,
        course_id: CourseId,
        dto: &CreateModuleDto,
    ) -> Result<Module, AppError>;

    /// Persists title, description and order index of an existing module.
    async fn update_module(&self, module: &Module) -> Result<Module, AppError>;

    /// Returns `Ok(false)` if the module does not exist and a conflict if it
    /// still has lessons.
    async fn delete_module(&self, module_id: ModuleId) -> Result<bool, AppError>;

    /// Assigns `1..=N` to `ordered` in sequence within one atomic write.
    /// `ordered` must list every module of the course.
    async fn resequence_modules(
        &self,
        course_id: CourseId,
        ordered: &[ModuleId],
    ) -> Result<(), AppError>;

    async fn find_lesson(&self, lesson_id: LessonId) -> Result<Option<Lesson>, AppError>;

    /// Lessons of a module ordered by `order_index`.
    async fn lessons_by_module(&self, module_id: ModuleId) -> Result<Vec<Lesson>, AppError>;

    /// Every lesson of every module of a course, ordered by module then lesson order.
    async fn lessons_by_course(&self, course_id: CourseId) -> Result<Vec<Lesson>, AppError>;

    async fn insert_lesson(
        &self,
        module_id: ModuleId,
        dto: &CreateLessonDto,
    ) -> Result<Lesson, AppError>;

    async fn update_lesson(&self, lesson: &Lesson) -> Result<Lesson, AppError>;

    async fn delete_lesson(&self, lesson_id: LessonId) -> Result<bool, AppError>;

    async fn resequence_lessons(
        &self,
        module_id: ModuleId,
        ordered: &[LessonId],
    ) -> Result<(), AppError>;
}

#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn find_quiz(&self, quiz_id: QuizId) -> Result<Option<Quiz>, AppError>;

    async fn quizzes_by_course(&self, course_id: CourseId) -> Result<Vec<Quiz>, AppError>;

    async fn quiz_by_module(&self, module_id: ModuleId) -> Result<Option<Quiz>, AppError>;

    /// Persists the quiz, its questions and their options in request order.
    /// Either all rows become visible or none do.
    async fn insert_quiz(&self, dto: &CreateQuizDto) -> Result<Quiz, AppError>;

    /// Questions in authoring order.
    async fn questions_by_quiz(&self, quiz_id: QuizId) -> Result<Vec<Question>, AppError>;

    /// Options of every question of the quiz, in question then option order.
    async fn options_by_quiz(&self, quiz_id: QuizId) -> Result<Vec<AnswerOption>, AppError>;

    /// Deletes answer options, then questions, then the quiz. Returns
    /// `Ok(false)` if the quiz does not exist and a conflict if any
    /// submission references it.
    async fn delete_quiz(&self, quiz_id: QuizId) -> Result<bool, AppError>;

    async fn submission_exists(
        &self,
        student_id: UserId,
        quiz_id: QuizId,
    ) -> Result<bool, AppError>;

    /// Records a graded attempt; the timestamp is assigned by the store.
    async fn insert_submission(
        &self,
        quiz_id: QuizId,
        student_id: UserId,
        score: i32,
    ) -> Result<QuizSubmission, AppError>;

    async fn submissions_by_quiz(&self, quiz_id: QuizId)
    -> Result<Vec<QuizSubmission>, AppError>;

    async fn submissions_by_student(
        &self,
        student_id: UserId,
    ) -> Result<Vec<QuizSubmission>, AppError>;
}

/// Everything the application needs from storage.
pub trait Repository: CourseDirectory + StructureRepository + QuizRepository {}

impl<T> Repository for T where T: CourseDirectory + StructureRepository + QuizRepository {}
