//! PostgreSQL implementation of the repository traits.
//!
//! Multi-row writes (`insert_quiz`, `delete_quiz`, both resequences and the
//! guarded module delete) run inside a single transaction. Guarded deletes
//! lock the parent row `FOR UPDATE` first; inserting a child takes a key
//! share lock on the same row through its foreign key, so a concurrent
//! insert cannot slip in between the check and the delete.

use anyhow::anyhow;
use async_trait::async_trait;
use coursebyte_core::AppError;
use coursebyte_models::{
    AnswerOption, Course, CourseId, CreateLessonDto, CreateModuleDto, CreateQuizDto, Lesson,
    LessonId, Module, ModuleId, Question, QuestionId, Quiz, QuizId, QuizSubmission, User, UserId,
};
use sqlx::PgPool;
use tracing::instrument;

use crate::conflicts;
use crate::repository::{CourseDirectory, QuizRepository, StructureRepository};

#[derive(Clone, Debug)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Turns a unique violation into the given business-rule error.
fn on_unique_violation(err: sqlx::Error, conflict: impl FnOnce() -> AppError) -> AppError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
    {
        return conflict();
    }
    AppError::from(err)
}

/// Like [`on_unique_violation`], and reports a dangling parent reference
/// (the parent vanished between the engine's check and the insert) as
/// not found.
fn on_insert_violation(
    err: sqlx::Error,
    conflict: impl FnOnce() -> AppError,
    parent: &str,
) -> AppError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_foreign_key_violation()
    {
        return AppError::not_found(anyhow!("{} not found", parent));
    }
    on_unique_violation(err, conflict)
}

#[async_trait]
impl CourseDirectory for PgRepository {
    async fn find_course(&self, course_id: CourseId) -> Result<Option<Course>, AppError> {
        let course = sqlx::query_as::<_, Course>(
            r#"SELECT id, teacher_id, title, description, created_at, updated_at
               FROM courses WHERE id = $1"#,
        )
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(course)
    }

    async fn find_student(&self, student_id: UserId) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, name, email, role, created_at
               FROM users WHERE id = $1 AND role = 'student'"#,
        )
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl StructureRepository for PgRepository {
    async fn find_module(&self, module_id: ModuleId) -> Result<Option<Module>, AppError> {
        let module = sqlx::query_as::<_, Module>(
            r#"SELECT id, course_id, title, description, order_index, created_at, updated_at
               FROM modules WHERE id = $1"#,
        )
        .bind(module_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(module)
    }

    async fn modules_by_course(&self, course_id: CourseId) -> Result<Vec<Module>, AppError> {
        let modules = sqlx::query_as::<_, Module>(
            r#"SELECT id, course_id, title, description, order_index, created_at, updated_at
               FROM modules WHERE course_id = $1
               ORDER BY order_index"#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(modules)
    }

    #[instrument(skip(self, dto))]
    async fn insert_module(
        &self,
        course_id: CourseId,
        dto: &CreateModuleDto,
    ) -> Result<Module, AppError> {
        let module = sqlx::query_as::<_, Module>(
            r#"INSERT INTO modules (course_id, title, description, order_index)
               VALUES ($1, $2, $3, $4)
               RETURNING id, course_id, title, description, order_index, created_at, updated_at"#,
        )
        .bind(course_id)
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(dto.order_index)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            on_insert_violation(e, || conflicts::module_order_taken(dto.order_index), "Course")
        })?;

        Ok(module)
    }

    #[instrument(skip(self, module), fields(module_id = %module.id))]
    async fn update_module(&self, module: &Module) -> Result<Module, AppError> {
        let updated = sqlx::query_as::<_, Module>(
            r#"UPDATE modules
               SET title = $1, description = $2, order_index = $3, updated_at = NOW()
               WHERE id = $4
               RETURNING id, course_id, title, description, order_index, created_at, updated_at"#,
        )
        .bind(&module.title)
        .bind(&module.description)
        .bind(module.order_index)
        .bind(module.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| on_unique_violation(e, || conflicts::module_order_taken(module.order_index)))?
        .ok_or_else(|| AppError::not_found(anyhow!("Module not found")))?;

        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete_module(&self, module_id: ModuleId) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let locked = sqlx::query_scalar::<_, ModuleId>(
            "SELECT id FROM modules WHERE id = $1 FOR UPDATE",
        )
        .bind(module_id)
        .fetch_optional(&mut *tx)
        .await?;

        if locked.is_none() {
            return Ok(false);
        }

        let has_lessons = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM lessons WHERE module_id = $1)",
        )
        .bind(module_id)
        .fetch_one(&mut *tx)
        .await?;

        if has_lessons {
            return Err(conflicts::module_has_lessons());
        }

        sqlx::query("DELETE FROM modules WHERE id = $1")
            .bind(module_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(true)
    }

    #[instrument(skip(self, ordered), fields(count = ordered.len()))]
    async fn resequence_modules(
        &self,
        course_id: CourseId,
        ordered: &[ModuleId],
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        // Checked once at commit, after every index has moved.
        sqlx::query("SET CONSTRAINTS modules_course_order_key DEFERRED")
            .execute(&mut *tx)
            .await?;

        for (position, module_id) in ordered.iter().enumerate() {
            sqlx::query(
                r#"UPDATE modules SET order_index = $1, updated_at = NOW()
                   WHERE id = $2 AND course_id = $3"#,
            )
            .bind(position as i32 + 1)
            .bind(*module_id)
            .bind(course_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| on_unique_violation(e, conflicts::module_order_collision))?;

        Ok(())
    }

    async fn find_lesson(&self, lesson_id: LessonId) -> Result<Option<Lesson>, AppError> {
        let lesson = sqlx::query_as::<_, Lesson>(
            r#"SELECT id, module_id, title, content, video_url, order_index, created_at, updated_at
               FROM lessons WHERE id = $1"#,
        )
        .bind(lesson_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(lesson)
    }

    async fn lessons_by_module(&self, module_id: ModuleId) -> Result<Vec<Lesson>, AppError> {
        let lessons = sqlx::query_as::<_, Lesson>(
            r#"SELECT id, module_id, title, content, video_url, order_index, created_at, updated_at
               FROM lessons WHERE module_id = $1
               ORDER BY order_index"#,
        )
        .bind(module_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lessons)
    }

    async fn lessons_by_course(&self, course_id: CourseId) -> Result<Vec<Lesson>, AppError> {
        let lessons = sqlx::query_as::<_, Lesson>(
            r#"SELECT l.id, l.module_id, l.title, l.content, l.video_url, l.order_index,
                      l.created_at, l.updated_at
               FROM lessons l
               JOIN modules m ON m.id = l.module_id
               WHERE m.course_id = $1
               ORDER BY m.order_index, l.order_index"#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lessons)
    }

    #[instrument(skip(self, dto))]
    async fn insert_lesson(
        &self,
        module_id: ModuleId,
        dto: &CreateLessonDto,
    ) -> Result<Lesson, AppError> {
        let lesson = sqlx::query_as::<_, Lesson>(
            r#"INSERT INTO lessons (module_id, title, content, video_url, order_index)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, module_id, title, content, video_url, order_index, created_at, updated_at"#,
        )
        .bind(module_id)
        .bind(&dto.title)
        .bind(&dto.content)
        .bind(&dto.video_url)
        .bind(dto.order_index)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            on_insert_violation(e, || conflicts::lesson_order_taken(dto.order_index), "Module")
        })?;

        Ok(lesson)
    }

    #[instrument(skip(self, lesson), fields(lesson_id = %lesson.id))]
    async fn update_lesson(&self, lesson: &Lesson) -> Result<Lesson, AppError> {
        let updated = sqlx::query_as::<_, Lesson>(
            r#"UPDATE lessons
               SET title = $1, content = $2, video_url = $3, order_index = $4, updated_at = NOW()
               WHERE id = $5
               RETURNING id, module_id, title, content, video_url, order_index, created_at, updated_at"#,
        )
        .bind(&lesson.title)
        .bind(&lesson.content)
        .bind(&lesson.video_url)
        .bind(lesson.order_index)
        .bind(lesson.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| on_unique_violation(e, || conflicts::lesson_order_taken(lesson.order_index)))?
        .ok_or_else(|| AppError::not_found(anyhow!("Lesson not found")))?;

        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete_lesson(&self, lesson_id: LessonId) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM lessons WHERE id = $1")
            .bind(lesson_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, ordered), fields(count = ordered.len()))]
    async fn resequence_lessons(
        &self,
        module_id: ModuleId,
        ordered: &[LessonId],
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SET CONSTRAINTS lessons_module_order_key DEFERRED")
            .execute(&mut *tx)
            .await?;

        for (position, lesson_id) in ordered.iter().enumerate() {
            sqlx::query(
                r#"UPDATE lessons SET order_index = $1, updated_at = NOW()
                   WHERE id = $2 AND module_id = $3"#,
            )
            .bind(position as i32 + 1)
            .bind(*lesson_id)
            .bind(module_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| on_unique_violation(e, conflicts::lesson_order_collision))?;

        Ok(())
    }
}

#[async_trait]
impl QuizRepository for PgRepository {
    async fn find_quiz(&self, quiz_id: QuizId) -> Result<Option<Quiz>, AppError> {
        let quiz = sqlx::query_as::<_, Quiz>(
            r#"SELECT id, course_id, module_id, title, description, time_limit, created_at, updated_at
               FROM quizzes WHERE id = $1"#,
        )
        .bind(quiz_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quiz)
    }

    async fn quizzes_by_course(&self, course_id: CourseId) -> Result<Vec<Quiz>, AppError> {
        let quizzes = sqlx::query_as::<_, Quiz>(
            r#"SELECT id, course_id, module_id, title, description, time_limit, created_at, updated_at
               FROM quizzes WHERE course_id = $1
               ORDER BY created_at, id"#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(quizzes)
    }

    async fn quiz_by_module(&self, module_id: ModuleId) -> Result<Option<Quiz>, AppError> {
        let quiz = sqlx::query_as::<_, Quiz>(
            r#"SELECT id, course_id, module_id, title, description, time_limit, created_at, updated_at
               FROM quizzes WHERE module_id = $1"#,
        )
        .bind(module_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quiz)
    }

    #[instrument(skip(self, dto), fields(course_id = %dto.course_id, questions = dto.questions.len()))]
    async fn insert_quiz(&self, dto: &CreateQuizDto) -> Result<Quiz, AppError> {
        let mut tx = self.pool.begin().await?;

        let quiz = sqlx::query_as::<_, Quiz>(
            r#"INSERT INTO quizzes (course_id, module_id, title, description, time_limit)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, course_id, module_id, title, description, time_limit, created_at, updated_at"#,
        )
        .bind(dto.course_id)
        .bind(dto.module_id)
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(dto.time_limit)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| on_insert_violation(e, conflicts::module_has_quiz, "Course or module"))?;

        for (position, question) in dto.questions.iter().enumerate() {
            let question_id = sqlx::query_scalar::<_, QuestionId>(
                r#"INSERT INTO questions (quiz_id, text, question_type, points, position)
                   VALUES ($1, $2, $3, $4, $5)
                   RETURNING id"#,
            )
            .bind(quiz.id)
            .bind(&question.text)
            .bind(question.question_type)
            .bind(question.points)
            .bind(position as i32)
            .fetch_one(&mut *tx)
            .await?;

            for (option_position, option) in question.options.iter().enumerate() {
                sqlx::query(
                    r#"INSERT INTO answer_options (question_id, text, is_correct, position)
                       VALUES ($1, $2, $3, $4)"#,
                )
                .bind(question_id)
                .bind(&option.text)
                .bind(option.is_correct)
                .bind(option_position as i32)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        Ok(quiz)
    }

    async fn questions_by_quiz(&self, quiz_id: QuizId) -> Result<Vec<Question>, AppError> {
        let questions = sqlx::query_as::<_, Question>(
            r#"SELECT id, quiz_id, text, question_type, points, position
               FROM questions WHERE quiz_id = $1
               ORDER BY position"#,
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    async fn options_by_quiz(&self, quiz_id: QuizId) -> Result<Vec<AnswerOption>, AppError> {
        let options = sqlx::query_as::<_, AnswerOption>(
            r#"SELECT o.id, o.question_id, o.text, o.is_correct, o.position
               FROM answer_options o
               JOIN questions q ON q.id = o.question_id
               WHERE q.quiz_id = $1
               ORDER BY q.position, o.position"#,
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(options)
    }

    #[instrument(skip(self))]
    async fn delete_quiz(&self, quiz_id: QuizId) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let locked =
            sqlx::query_scalar::<_, QuizId>("SELECT id FROM quizzes WHERE id = $1 FOR UPDATE")
                .bind(quiz_id)
                .fetch_optional(&mut *tx)
                .await?;

        if locked.is_none() {
            return Ok(false);
        }

        let has_submissions = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM quiz_submissions WHERE quiz_id = $1)",
        )
        .bind(quiz_id)
        .fetch_one(&mut *tx)
        .await?;

        if has_submissions {
            return Err(conflicts::quiz_has_submissions());
        }

        sqlx::query(
            r#"DELETE FROM answer_options
               WHERE question_id IN (SELECT id FROM questions WHERE quiz_id = $1)"#,
        )
        .bind(quiz_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM questions WHERE quiz_id = $1")
            .bind(quiz_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM quizzes WHERE id = $1")
            .bind(quiz_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(true)
    }

    async fn submission_exists(
        &self,
        student_id: UserId,
        quiz_id: QuizId,
    ) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM quiz_submissions WHERE student_id = $1 AND quiz_id = $2)",
        )
        .bind(student_id)
        .bind(quiz_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    #[instrument(skip(self))]
    async fn insert_submission(
        &self,
        quiz_id: QuizId,
        student_id: UserId,
        score: i32,
    ) -> Result<QuizSubmission, AppError> {
        let submission = sqlx::query_as::<_, QuizSubmission>(
            r#"INSERT INTO quiz_submissions (quiz_id, student_id, score)
               VALUES ($1, $2, $3)
               RETURNING id, quiz_id, student_id, score, taken_at"#,
        )
        .bind(quiz_id)
        .bind(student_id)
        .bind(score)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| on_insert_violation(e, conflicts::duplicate_submission, "Quiz"))?;

        Ok(submission)
    }

    async fn submissions_by_quiz(
        &self,
        quiz_id: QuizId,
    ) -> Result<Vec<QuizSubmission>, AppError> {
        let submissions = sqlx::query_as::<_, QuizSubmission>(
            r#"SELECT id, quiz_id, student_id, score, taken_at
               FROM quiz_submissions WHERE quiz_id = $1
               ORDER BY taken_at, id"#,
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(submissions)
    }

    async fn submissions_by_student(
        &self,
        student_id: UserId,
    ) -> Result<Vec<QuizSubmission>, AppError> {
        let submissions = sqlx::query_as::<_, QuizSubmission>(
            r#"SELECT id, quiz_id, student_id, score, taken_at
               FROM quiz_submissions WHERE student_id = $1
               ORDER BY taken_at, id"#,
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(submissions)
    }
}
