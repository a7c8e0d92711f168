use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use coursebyte_core::{AppError, ErrorResponse};
use tracing::instrument;

use crate::modules::submissions::model::{
    QuizId, QuizSubmission, SubmissionResult, SubmitQuizDto, SubmitSingleChoiceDto, UserId,
};
use crate::modules::submissions::service::SubmissionService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/quizzes/{quiz_id}/submissions",
    params(
        ("quiz_id" = Uuid, Path, description = "Quiz ID")
    ),
    request_body(
        content = SubmitQuizDto,
        description = "`answers` maps each question id to the list of selected option ids"
    ),
    responses(
        (status = 201, description = "Submission graded and recorded", body = SubmissionResult),
        (status = 404, description = "Quiz or student not found", body = ErrorResponse),
        (status = 409, description = "Student has already taken this quiz", body = ErrorResponse)
    ),
    tag = "Submissions"
)]
#[instrument(skip(state, dto))]
pub async fn submit_quiz(
    State(state): State<AppState>,
    Path(quiz_id): Path<QuizId>,
    ValidatedJson(dto): ValidatedJson<SubmitQuizDto>,
) -> Result<(StatusCode, Json<SubmissionResult>), AppError> {
    let result = SubmissionService::submit(state.repo.as_ref(), quiz_id, dto).await?;

    Ok((StatusCode::CREATED, Json(result)))
}

#[utoipa::path(
    post,
    path = "/api/quizzes/{quiz_id}/submissions/single",
    params(
        ("quiz_id" = Uuid, Path, description = "Quiz ID")
    ),
    request_body(
        content = SubmitSingleChoiceDto,
        description = "`answers` maps each question id to one selected option id"
    ),
    responses(
        (status = 201, description = "Submission graded and recorded", body = SubmissionResult),
        (status = 404, description = "Quiz or student not found", body = ErrorResponse),
        (status = 409, description = "Student has already taken this quiz", body = ErrorResponse)
    ),
    tag = "Submissions"
)]
#[instrument(skip(state, dto))]
pub async fn submit_single_choice(
    State(state): State<AppState>,
    Path(quiz_id): Path<QuizId>,
    ValidatedJson(dto): ValidatedJson<SubmitSingleChoiceDto>,
) -> Result<(StatusCode, Json<SubmissionResult>), AppError> {
    let result =
        SubmissionService::submit_single_choice(state.repo.as_ref(), quiz_id, dto).await?;

    Ok((StatusCode::CREATED, Json(result)))
}

#[utoipa::path(
    get,
    path = "/api/quizzes/{quiz_id}/submissions",
    params(
        ("quiz_id" = Uuid, Path, description = "Quiz ID")
    ),
    responses(
        (status = 200, description = "Submissions for the quiz", body = Vec<QuizSubmission>),
        (status = 404, description = "Quiz not found", body = ErrorResponse)
    ),
    tag = "Submissions"
)]
#[instrument(skip(state))]
pub async fn get_submissions_by_quiz(
    State(state): State<AppState>,
    Path(quiz_id): Path<QuizId>,
) -> Result<Json<Vec<QuizSubmission>>, AppError> {
    let submissions = SubmissionService::submissions_by_quiz(state.repo.as_ref(), quiz_id).await?;

    Ok(Json(submissions))
}

#[utoipa::path(
    get,
    path = "/api/students/{student_id}/quiz-submissions",
    params(
        ("student_id" = Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Submissions made by the student", body = Vec<QuizSubmission>),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Submissions"
)]
#[instrument(skip(state))]
pub async fn get_submissions_by_student(
    State(state): State<AppState>,
    Path(student_id): Path<UserId>,
) -> Result<Json<Vec<QuizSubmission>>, AppError> {
    let submissions =
        SubmissionService::submissions_by_student(state.repo.as_ref(), student_id).await?;

    Ok(Json(submissions))
}
