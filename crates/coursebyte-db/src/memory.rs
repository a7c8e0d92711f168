//! In-memory implementation of the repository traits.
//!
//! All state sits behind one async mutex, so every trait method is atomic
//! with respect to every other. The same uniqueness and dependent-row rules
//! the PostgreSQL schema enforces are checked here under that lock.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use coursebyte_core::AppError;
use coursebyte_models::{
    AnswerOption, AnswerOptionId, Course, CourseId, CreateLessonDto, CreateModuleDto,
    CreateQuizDto, Lesson, LessonId, Module, ModuleId, Question, QuestionId, Quiz, QuizId,
    QuizSubmission, QuizSubmissionId, User, UserId, UserRole,
};
use tokio::sync::Mutex;

use crate::conflicts;
use crate::repository::{CourseDirectory, QuizRepository, StructureRepository};

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<UserId, User>,
    courses: HashMap<CourseId, Course>,
    modules: HashMap<ModuleId, Module>,
    lessons: HashMap<LessonId, Lesson>,
    quizzes: HashMap<QuizId, Quiz>,
    questions: HashMap<QuestionId, Question>,
    options: HashMap<AnswerOptionId, AnswerOption>,
    submissions: HashMap<QuizSubmissionId, QuizSubmission>,
}

impl MemoryState {
    fn module_order_taken(&self, course_id: CourseId, order_index: i32, exclude: Option<ModuleId>) -> bool {
        self.modules.values().any(|m| {
            m.course_id == course_id && m.order_index == order_index && Some(m.id) != exclude
        })
    }

    fn lesson_order_taken(&self, module_id: ModuleId, order_index: i32, exclude: Option<LessonId>) -> bool {
        self.lessons.values().any(|l| {
            l.module_id == module_id && l.order_index == order_index && Some(l.id) != exclude
        })
    }

    fn sorted_modules(&self, course_id: CourseId) -> Vec<Module> {
        let mut modules: Vec<Module> = self
            .modules
            .values()
            .filter(|m| m.course_id == course_id)
            .cloned()
            .collect();
        modules.sort_by_key(|m| m.order_index);
        modules
    }

    fn sorted_lessons(&self, module_id: ModuleId) -> Vec<Lesson> {
        let mut lessons: Vec<Lesson> = self
            .lessons
            .values()
            .filter(|l| l.module_id == module_id)
            .cloned()
            .collect();
        lessons.sort_by_key(|l| l.order_index);
        lessons
    }

    fn quiz_question_ids(&self, quiz_id: QuizId) -> Vec<QuestionId> {
        self.questions
            .values()
            .filter(|q| q.quiz_id == quiz_id)
            .map(|q| q.id)
            .collect()
    }
}

/// Repository backed by process memory.
///
/// Users and courses are owned by external systems, so they are seeded
/// through [`MemoryRepository::add_user`] and [`MemoryRepository::add_course`]
/// rather than through the repository traits.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: Mutex<MemoryState>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, name: &str, email: &str, role: UserRole) -> User {
        let user = User {
            id: UserId::new(),
            name: name.to_string(),
            email: email.to_string(),
            role,
            created_at: Utc::now(),
        };

        self.state.lock().await.users.insert(user.id, user.clone());
        user
    }

    pub async fn add_course(&self, teacher_id: UserId, title: &str) -> Course {
        let now = Utc::now();
        let course = Course {
            id: CourseId::new(),
            teacher_id,
            title: title.to_string(),
            description: None,
            created_at: now,
            updated_at: now,
        };

        self.state
            .lock()
            .await
            .courses
            .insert(course.id, course.clone());
        course
    }

    /// Removes a course and everything below it, the way the catalogue's
    /// cascade does.
    pub async fn remove_course(&self, course_id: CourseId) -> bool {
        let mut state = self.state.lock().await;

        if state.courses.remove(&course_id).is_none() {
            return false;
        }

        let module_ids: Vec<ModuleId> = state
            .modules
            .values()
            .filter(|m| m.course_id == course_id)
            .map(|m| m.id)
            .collect();
        state.modules.retain(|_, m| m.course_id != course_id);
        state.lessons.retain(|_, l| !module_ids.contains(&l.module_id));

        let quiz_ids: Vec<QuizId> = state
            .quizzes
            .values()
            .filter(|q| q.course_id == course_id)
            .map(|q| q.id)
            .collect();
        state.quizzes.retain(|_, q| q.course_id != course_id);
        state.questions.retain(|_, q| !quiz_ids.contains(&q.quiz_id));
        let question_ids: Vec<QuestionId> = state.questions.keys().copied().collect();
        state
            .options
            .retain(|_, o| question_ids.contains(&o.question_id));
        state
            .submissions
            .retain(|_, s| !quiz_ids.contains(&s.quiz_id));

        true
    }
}

#[async_trait]
impl CourseDirectory for MemoryRepository {
    async fn find_course(&self, course_id: CourseId) -> Result<Option<Course>, AppError> {
        Ok(self.state.lock().await.courses.get(&course_id).cloned())
    }

    async fn find_student(&self, student_id: UserId) -> Result<Option<User>, AppError> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .get(&student_id)
            .filter(|u| u.role == UserRole::Student)
            .cloned())
    }
}

#[async_trait]
impl StructureRepository for MemoryRepository {
    async fn find_module(&self, module_id: ModuleId) -> Result<Option<Module>, AppError> {
        Ok(self.state.lock().await.modules.get(&module_id).cloned())
    }

    async fn modules_by_course(&self, course_id: CourseId) -> Result<Vec<Module>, AppError> {
        Ok(self.state.lock().await.sorted_modules(course_id))
    }

    async fn insert_module(
        &self,
        course_id: CourseId,
        dto: &CreateModuleDto,
    ) -> Result<Module, AppError> {
        let mut state = self.state.lock().await;

        if !state.courses.contains_key(&course_id) {
            return Err(AppError::not_found(anyhow::anyhow!("Course not found")));
        }

        if state.module_order_taken(course_id, dto.order_index, None) {
            return Err(conflicts::module_order_taken(dto.order_index));
        }

        let now = Utc::now();
        let module = Module {
            id: ModuleId::new(),
            course_id,
            title: dto.title.clone(),
            description: dto.description.clone(),
            order_index: dto.order_index,
            created_at: now,
            updated_at: now,
        };
        state.modules.insert(module.id, module.clone());

        Ok(module)
    }

    async fn update_module(&self, module: &Module) -> Result<Module, AppError> {
        let mut state = self.state.lock().await;

        if state.module_order_taken(module.course_id, module.order_index, Some(module.id)) {
            return Err(conflicts::module_order_taken(module.order_index));
        }

        let stored = state
            .modules
            .get_mut(&module.id)
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Module not found")))?;
        stored.title = module.title.clone();
        stored.description = module.description.clone();
        stored.order_index = module.order_index;
        stored.updated_at = Utc::now();

        Ok(stored.clone())
    }

    async fn delete_module(&self, module_id: ModuleId) -> Result<bool, AppError> {
        let mut state = self.state.lock().await;

        if !state.modules.contains_key(&module_id) {
            return Ok(false);
        }

        if state.lessons.values().any(|l| l.module_id == module_id) {
            return Err(conflicts::module_has_lessons());
        }

        state.modules.remove(&module_id);
        for quiz in state.quizzes.values_mut() {
            if quiz.module_id == Some(module_id) {
                quiz.module_id = None;
            }
        }

        Ok(true)
    }

    async fn resequence_modules(
        &self,
        course_id: CourseId,
        ordered: &[ModuleId],
    ) -> Result<(), AppError> {
        let mut state = self.state.lock().await;

        // Every module of the course must be listed, or the new indices
        // could collide with the ones left in place.
        let siblings = state.sorted_modules(course_id);
        let covers_all = siblings.len() == ordered.len()
            && siblings.iter().all(|m| ordered.contains(&m.id));
        if !covers_all {
            return Err(conflicts::module_order_collision());
        }

        let now = Utc::now();
        for (position, module_id) in ordered.iter().enumerate() {
            if let Some(module) = state.modules.get_mut(module_id) {
                module.order_index = position as i32 + 1;
                module.updated_at = now;
            }
        }

        Ok(())
    }

    async fn find_lesson(&self, lesson_id: LessonId) -> Result<Option<Lesson>, AppError> {
        Ok(self.state.lock().await.lessons.get(&lesson_id).cloned())
    }

    async fn lessons_by_module(&self, module_id: ModuleId) -> Result<Vec<Lesson>, AppError> {
        Ok(self.state.lock().await.sorted_lessons(module_id))
    }

    async fn lessons_by_course(&self, course_id: CourseId) -> Result<Vec<Lesson>, AppError> {
        let state = self.state.lock().await;
        Ok(state
            .sorted_modules(course_id)
            .iter()
            .flat_map(|m| state.sorted_lessons(m.id))
            .collect())
    }

    async fn insert_lesson(
        &self,
        module_id: ModuleId,
        dto: &CreateLessonDto,
    ) -> Result<Lesson, AppError> {
        let mut state = self.state.lock().await;

        if !state.modules.contains_key(&module_id) {
            return Err(AppError::not_found(anyhow::anyhow!("Module not found")));
        }

        if state.lesson_order_taken(module_id, dto.order_index, None) {
            return Err(conflicts::lesson_order_taken(dto.order_index));
        }

        let now = Utc::now();
        let lesson = Lesson {
            id: LessonId::new(),
            module_id,
            title: dto.title.clone(),
            content: dto.content.clone(),
            video_url: dto.video_url.clone(),
            order_index: dto.order_index,
            created_at: now,
            updated_at: now,
        };
        state.lessons.insert(lesson.id, lesson.clone());

        Ok(lesson)
    }

    async fn update_lesson(&self, lesson: &Lesson) -> Result<Lesson, AppError> {
        let mut state = self.state.lock().await;

        if state.lesson_order_taken(lesson.module_id, lesson.order_index, Some(lesson.id)) {
            return Err(conflicts::lesson_order_taken(lesson.order_index));
        }

        let stored = state
            .lessons
            .get_mut(&lesson.id)
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Lesson not found")))?;
        stored.title = lesson.title.clone();
        stored.content = lesson.content.clone();
        stored.video_url = lesson.video_url.clone();
        stored.order_index = lesson.order_index;
        stored.updated_at = Utc::now();

        Ok(stored.clone())
    }

    async fn delete_lesson(&self, lesson_id: LessonId) -> Result<bool, AppError> {
        Ok(self.state.lock().await.lessons.remove(&lesson_id).is_some())
    }

    async fn resequence_lessons(
        &self,
        module_id: ModuleId,
        ordered: &[LessonId],
    ) -> Result<(), AppError> {
        let mut state = self.state.lock().await;

        let siblings = state.sorted_lessons(module_id);
        let covers_all = siblings.len() == ordered.len()
            && siblings.iter().all(|l| ordered.contains(&l.id));
        if !covers_all {
            return Err(conflicts::lesson_order_collision());
        }

        let now = Utc::now();
        for (position, lesson_id) in ordered.iter().enumerate() {
            if let Some(lesson) = state.lessons.get_mut(lesson_id) {
                lesson.order_index = position as i32 + 1;
                lesson.updated_at = now;
            }
        }

        Ok(())
    }
}

#[async_trait]
impl QuizRepository for MemoryRepository {
    async fn find_quiz(&self, quiz_id: QuizId) -> Result<Option<Quiz>, AppError> {
        Ok(self.state.lock().await.quizzes.get(&quiz_id).cloned())
    }

    async fn quizzes_by_course(&self, course_id: CourseId) -> Result<Vec<Quiz>, AppError> {
        let state = self.state.lock().await;
        let mut quizzes: Vec<Quiz> = state
            .quizzes
            .values()
            .filter(|q| q.course_id == course_id)
            .cloned()
            .collect();
        quizzes.sort_by_key(|q| (q.created_at, q.id));
        Ok(quizzes)
    }

    async fn quiz_by_module(&self, module_id: ModuleId) -> Result<Option<Quiz>, AppError> {
        let state = self.state.lock().await;
        Ok(state
            .quizzes
            .values()
            .find(|q| q.module_id == Some(module_id))
            .cloned())
    }

    async fn insert_quiz(&self, dto: &CreateQuizDto) -> Result<Quiz, AppError> {
        let mut state = self.state.lock().await;

        if !state.courses.contains_key(&dto.course_id) {
            return Err(AppError::not_found(anyhow::anyhow!("Course not found")));
        }

        if let Some(module_id) = dto.module_id {
            if !state.modules.contains_key(&module_id) {
                return Err(AppError::not_found(anyhow::anyhow!("Module not found")));
            }
            if state.quizzes.values().any(|q| q.module_id == Some(module_id)) {
                return Err(conflicts::module_has_quiz());
            }
        }

        let now = Utc::now();
        let quiz = Quiz {
            id: QuizId::new(),
            course_id: dto.course_id,
            module_id: dto.module_id,
            title: dto.title.clone(),
            description: dto.description.clone(),
            time_limit: dto.time_limit,
            created_at: now,
            updated_at: now,
        };
        state.quizzes.insert(quiz.id, quiz.clone());

        for (position, question_dto) in dto.questions.iter().enumerate() {
            let question = Question {
                id: QuestionId::new(),
                quiz_id: quiz.id,
                text: question_dto.text.clone(),
                question_type: question_dto.question_type,
                points: question_dto.points,
                position: position as i32,
            };

            for (option_position, option_dto) in question_dto.options.iter().enumerate() {
                let option = AnswerOption {
                    id: AnswerOptionId::new(),
                    question_id: question.id,
                    text: option_dto.text.clone(),
                    is_correct: option_dto.is_correct,
                    position: option_position as i32,
                };
                state.options.insert(option.id, option);
            }

            state.questions.insert(question.id, question);
        }

        Ok(quiz)
    }

    async fn questions_by_quiz(&self, quiz_id: QuizId) -> Result<Vec<Question>, AppError> {
        let state = self.state.lock().await;
        let mut questions: Vec<Question> = state
            .questions
            .values()
            .filter(|q| q.quiz_id == quiz_id)
            .cloned()
            .collect();
        questions.sort_by_key(|q| q.position);
        Ok(questions)
    }

    async fn options_by_quiz(&self, quiz_id: QuizId) -> Result<Vec<AnswerOption>, AppError> {
        let state = self.state.lock().await;
        let mut options: Vec<(i32, AnswerOption)> = state
            .options
            .values()
            .filter_map(|o| {
                state
                    .questions
                    .get(&o.question_id)
                    .filter(|q| q.quiz_id == quiz_id)
                    .map(|q| (q.position, o.clone()))
            })
            .collect();
        options.sort_by_key(|(question_position, o)| (*question_position, o.position));
        Ok(options.into_iter().map(|(_, o)| o).collect())
    }

    async fn delete_quiz(&self, quiz_id: QuizId) -> Result<bool, AppError> {
        let mut state = self.state.lock().await;

        if !state.quizzes.contains_key(&quiz_id) {
            return Ok(false);
        }

        if state.submissions.values().any(|s| s.quiz_id == quiz_id) {
            return Err(conflicts::quiz_has_submissions());
        }

        let question_ids = state.quiz_question_ids(quiz_id);
        state
            .options
            .retain(|_, o| !question_ids.contains(&o.question_id));
        state.questions.retain(|_, q| q.quiz_id != quiz_id);
        state.quizzes.remove(&quiz_id);

        Ok(true)
    }

    async fn submission_exists(
        &self,
        student_id: UserId,
        quiz_id: QuizId,
    ) -> Result<bool, AppError> {
        let state = self.state.lock().await;
        Ok(state
            .submissions
            .values()
            .any(|s| s.student_id == student_id && s.quiz_id == quiz_id))
    }

    async fn insert_submission(
        &self,
        quiz_id: QuizId,
        student_id: UserId,
        score: i32,
    ) -> Result<QuizSubmission, AppError> {
        let mut state = self.state.lock().await;

        if state
            .submissions
            .values()
            .any(|s| s.student_id == student_id && s.quiz_id == quiz_id)
        {
            return Err(conflicts::duplicate_submission());
        }

        let submission = QuizSubmission {
            id: QuizSubmissionId::new(),
            quiz_id,
            student_id,
            score,
            taken_at: Utc::now(),
        };
        state.submissions.insert(submission.id, submission.clone());

        Ok(submission)
    }

    async fn submissions_by_quiz(
        &self,
        quiz_id: QuizId,
    ) -> Result<Vec<QuizSubmission>, AppError> {
        let state = self.state.lock().await;
        let mut submissions: Vec<QuizSubmission> = state
            .submissions
            .values()
            .filter(|s| s.quiz_id == quiz_id)
            .cloned()
            .collect();
        submissions.sort_by_key(|s| (s.taken_at, s.id));
        Ok(submissions)
    }

    async fn submissions_by_student(
        &self,
        student_id: UserId,
    ) -> Result<Vec<QuizSubmission>, AppError> {
        let state = self.state.lock().await;
        let mut submissions: Vec<QuizSubmission> = state
            .submissions
            .values()
            .filter(|s| s.student_id == student_id)
            .cloned()
            .collect();
        submissions.sort_by_key(|s| (s.taken_at, s.id));
        Ok(submissions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursebyte_models::{CreateAnswerOptionDto, CreateQuestionDto, QuestionType};

    fn module_dto(title: &str, order_index: i32) -> CreateModuleDto {
        CreateModuleDto {
            title: title.to_string(),
            description: None,
            order_index,
        }
    }

    async fn seeded() -> (MemoryRepository, Course) {
        let repo = MemoryRepository::new();
        let teacher = repo
            .add_user("Ada", "ada@example.com", UserRole::Teacher)
            .await;
        let course = repo.add_course(teacher.id, "Systems programming").await;
        (repo, course)
    }

    #[tokio::test]
    async fn test_insert_module_rejects_taken_order() {
        let (repo, course) = seeded().await;
        repo.insert_module(course.id, &module_dto("Intro", 1))
            .await
            .unwrap();

        let err = repo
            .insert_module(course.id, &module_dto("Again", 1))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_resequence_requires_every_sibling() {
        let (repo, course) = seeded().await;
        let a = repo
            .insert_module(course.id, &module_dto("First", 1))
            .await
            .unwrap();
        let b = repo
            .insert_module(course.id, &module_dto("Second", 2))
            .await
            .unwrap();

        let err = repo.resequence_modules(course.id, &[b.id]).await.unwrap_err();
        assert!(err.is_conflict());

        repo.resequence_modules(course.id, &[b.id, a.id])
            .await
            .unwrap();
        let modules = repo.modules_by_course(course.id).await.unwrap();
        assert_eq!(modules[0].id, b.id);
        assert_eq!(modules[1].id, a.id);
        assert_eq!(modules[1].order_index, 2);
    }

    #[tokio::test]
    async fn test_find_student_ignores_other_roles() {
        let repo = MemoryRepository::new();
        let teacher = repo
            .add_user("Grace", "grace@example.com", UserRole::Teacher)
            .await;
        let student = repo
            .add_user("Linus", "linus@example.com", UserRole::Student)
            .await;

        assert!(repo.find_student(teacher.id).await.unwrap().is_none());
        assert!(repo.find_student(student.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_remove_course_cascades() {
        let (repo, course) = seeded().await;
        let module = repo
            .insert_module(course.id, &module_dto("Intro", 1))
            .await
            .unwrap();

        assert!(repo.remove_course(course.id).await);
        assert!(repo.find_module(module.id).await.unwrap().is_none());
        assert!(!repo.remove_course(course.id).await);
    }

    fn quiz_dto(course_id: CourseId, module_id: Option<ModuleId>) -> CreateQuizDto {
        CreateQuizDto {
            course_id,
            module_id,
            title: "Checkpoint".to_string(),
            description: None,
            time_limit: 600,
            questions: vec![CreateQuestionDto {
                text: "Pick one".to_string(),
                question_type: QuestionType::SingleChoice,
                points: 1,
                options: vec![
                    CreateAnswerOptionDto {
                        text: "a".to_string(),
                        is_correct: true,
                    },
                    CreateAnswerOptionDto {
                        text: "b".to_string(),
                        is_correct: false,
                    },
                ],
            }],
        }
    }

    #[tokio::test]
    async fn test_insert_quiz_rechecks_parents() {
        let (repo, course) = seeded().await;
        let module = repo
            .insert_module(course.id, &module_dto("Intro", 1))
            .await
            .unwrap();
        assert!(repo.delete_module(module.id).await.unwrap());

        let err = repo
            .insert_quiz(&quiz_dto(course.id, Some(module.id)))
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let err = repo
            .insert_quiz(&quiz_dto(CourseId::new(), None))
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        assert!(repo.quizzes_by_course(course.id).await.unwrap().is_empty());
    }
}
