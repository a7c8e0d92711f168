use anyhow::anyhow;
use coursebyte_core::AppError;
use coursebyte_db::{Repository, conflicts};
use tracing::{info, instrument};

use crate::modules::submissions::model::{
    QuizId, QuizSubmission, SubmissionResult, SubmitQuizDto, SubmitSingleChoiceDto, UserId,
};
use crate::modules::submissions::scoring::AnswerKey;

pub struct SubmissionService;

impl SubmissionService {
    /// Grades and records a student's only attempt at a quiz.
    #[instrument(skip(repo, dto), fields(student_id = %dto.student_id, answered = dto.answers.len()))]
    pub async fn submit<R>(
        repo: &R,
        quiz_id: QuizId,
        dto: SubmitQuizDto,
    ) -> Result<SubmissionResult, AppError>
    where
        R: Repository + ?Sized,
    {
        repo.find_quiz(quiz_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Quiz not found")))?;

        repo.find_student(dto.student_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))?;

        if repo.submission_exists(dto.student_id, quiz_id).await? {
            return Err(conflicts::duplicate_submission());
        }

        let questions = repo.questions_by_quiz(quiz_id).await?;
        let options = repo.options_by_quiz(quiz_id).await?;
        let key = AnswerKey::build(&questions, &options);
        let grade = key.grade(&dto.answers);

        let submission = repo
            .insert_submission(quiz_id, dto.student_id, grade.score)
            .await?;

        info!(
            submission_id = %submission.id,
            quiz_id = %quiz_id,
            score = grade.score,
            max_score = key.max_score(),
            "Quiz submitted"
        );

        Ok(SubmissionResult {
            submission,
            max_score: key.max_score(),
            correct_answers: grade.correct_answers,
        })
    }

    /// One option per question; each becomes a singleton selection.
    pub async fn submit_single_choice<R>(
        repo: &R,
        quiz_id: QuizId,
        dto: SubmitSingleChoiceDto,
    ) -> Result<SubmissionResult, AppError>
    where
        R: Repository + ?Sized,
    {
        Self::submit(repo, quiz_id, dto.into()).await
    }

    #[instrument(skip(repo))]
    pub async fn submissions_by_quiz<R>(
        repo: &R,
        quiz_id: QuizId,
    ) -> Result<Vec<QuizSubmission>, AppError>
    where
        R: Repository + ?Sized,
    {
        repo.find_quiz(quiz_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Quiz not found")))?;

        repo.submissions_by_quiz(quiz_id).await
    }

    #[instrument(skip(repo))]
    pub async fn submissions_by_student<R>(
        repo: &R,
        student_id: UserId,
    ) -> Result<Vec<QuizSubmission>, AppError>
    where
        R: Repository + ?Sized,
    {
        repo.find_student(student_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))?;

        repo.submissions_by_student(student_id).await
    }
}
