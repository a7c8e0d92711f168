use std::collections::HashMap;

use anyhow::anyhow;
use coursebyte_core::AppError;
use coursebyte_db::{Repository, conflicts};
use tracing::{info, instrument};

use crate::modules::quizzes::model::{
    AnswerOption, CourseId, CreateQuizDto, ModuleId, QuestionDetail, QuestionId, Quiz, QuizDetail,
    QuizId, QuizSummary,
};

pub struct QuizService;

fn quiz_not_found() -> AppError {
    AppError::not_found(anyhow!("Quiz not found"))
}

impl QuizService {
    /// Builds a quiz with its questions and options in one atomic write.
    ///
    /// The DTO is expected to have passed validation already, so every
    /// question carries a usable answer key.
    #[instrument(skip(repo, dto), fields(course_id = %dto.course_id, module_id = ?dto.module_id))]
    pub async fn create_quiz<R>(repo: &R, dto: CreateQuizDto) -> Result<QuizSummary, AppError>
    where
        R: Repository + ?Sized,
    {
        repo.find_course(dto.course_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Course not found")))?;

        if let Some(module_id) = dto.module_id {
            let module = repo
                .find_module(module_id)
                .await?
                .ok_or_else(|| AppError::not_found(anyhow!("Module not found")))?;

            if module.course_id != dto.course_id {
                return Err(AppError::bad_request(anyhow!(
                    "Module does not belong to this course"
                )));
            }

            if repo.quiz_by_module(module_id).await?.is_some() {
                return Err(conflicts::module_has_quiz());
            }
        }

        let question_count = dto.questions.len();
        let max_score = dto.max_score();
        if max_score == i32::MAX {
            return Err(AppError::bad_request(anyhow!(
                "Total points of the quiz are too large"
            )));
        }

        let quiz = repo.insert_quiz(&dto).await?;

        info!(
            quiz_id = %quiz.id,
            question_count,
            max_score,
            "Quiz created"
        );

        Ok(QuizSummary {
            quiz,
            question_count,
            max_score,
        })
    }

    /// The quiz with its questions and options in authoring order, correct
    /// flags included.
    #[instrument(skip(repo))]
    pub async fn get_quiz_with_questions<R>(
        repo: &R,
        quiz_id: QuizId,
    ) -> Result<QuizDetail, AppError>
    where
        R: Repository + ?Sized,
    {
        let quiz = repo.find_quiz(quiz_id).await?.ok_or_else(quiz_not_found)?;
        let questions = repo.questions_by_quiz(quiz_id).await?;

        let mut options_by_question: HashMap<QuestionId, Vec<AnswerOption>> = HashMap::new();
        for option in repo.options_by_quiz(quiz_id).await? {
            options_by_question
                .entry(option.question_id)
                .or_default()
                .push(option);
        }

        let max_score = questions
            .iter()
            .fold(0i32, |total, q| total.saturating_add(q.points));
        let questions = questions
            .into_iter()
            .map(|question| {
                let options = options_by_question
                    .remove(&question.id)
                    .unwrap_or_default();
                QuestionDetail { question, options }
            })
            .collect();

        Ok(QuizDetail {
            quiz,
            max_score,
            questions,
        })
    }

    #[instrument(skip(repo))]
    pub async fn get_quizzes_by_course<R>(
        repo: &R,
        course_id: CourseId,
    ) -> Result<Vec<Quiz>, AppError>
    where
        R: Repository + ?Sized,
    {
        repo.find_course(course_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Course not found")))?;

        repo.quizzes_by_course(course_id).await
    }

    #[instrument(skip(repo))]
    pub async fn get_quiz_by_module<R>(repo: &R, module_id: ModuleId) -> Result<Quiz, AppError>
    where
        R: Repository + ?Sized,
    {
        repo.find_module(module_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Module not found")))?;

        repo.quiz_by_module(module_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Module has no quiz")))
    }

    /// Refuses once any student has submitted; otherwise removes options,
    /// questions and the quiz.
    #[instrument(skip(repo))]
    pub async fn delete_quiz<R>(repo: &R, quiz_id: QuizId) -> Result<(), AppError>
    where
        R: Repository + ?Sized,
    {
        repo.find_quiz(quiz_id).await?.ok_or_else(quiz_not_found)?;

        if !repo.submissions_by_quiz(quiz_id).await?.is_empty() {
            return Err(conflicts::quiz_has_submissions());
        }

        if !repo.delete_quiz(quiz_id).await? {
            return Err(quiz_not_found());
        }

        info!(quiz_id = %quiz_id, "Quiz deleted");

        Ok(())
    }
}
