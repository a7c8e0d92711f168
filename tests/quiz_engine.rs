mod common;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use axum::http::StatusCode;
use common::{
    create_test_course, create_test_module, create_test_student, create_test_user, question_dto,
    quiz_dto,
};
use coursebyte::modules::quizzes::service::QuizService;
use coursebyte::modules::submissions::service::SubmissionService;
use coursebyte_db::{MemoryRepository, QuizRepository};
use coursebyte_models::{
    AnswerOptionId, CourseId, ModuleId, QuestionId, QuestionType, QuizDetail, QuizId,
    SubmitQuizDto, SubmitSingleChoiceDto, UserId, UserRole,
};

/// Option ids of `question_index` whose text is in `texts`.
fn pick(quiz: &QuizDetail, question_index: usize, texts: &[&str]) -> HashSet<AnswerOptionId> {
    quiz.questions[question_index]
        .options
        .iter()
        .filter(|o| texts.contains(&o.text.as_str()))
        .map(|o| o.id)
        .collect()
}

fn question_id(quiz: &QuizDetail, question_index: usize) -> QuestionId {
    quiz.questions[question_index].question.id
}

async fn submit(
    repo: &MemoryRepository,
    quiz_id: QuizId,
    student_id: UserId,
    answers: HashMap<QuestionId, HashSet<AnswerOptionId>>,
) -> i32 {
    SubmissionService::submit(
        repo,
        quiz_id,
        SubmitQuizDto {
            student_id,
            answers,
        },
    )
    .await
    .unwrap()
    .submission
    .score
}

/// One multiple-choice question worth 10 with correct options {A, C}.
async fn create_ac_quiz(repo: &MemoryRepository) -> QuizDetail {
    let course = create_test_course(repo).await.course;
    let summary = QuizService::create_quiz(
        repo,
        quiz_dto(
            course.id,
            None,
            vec![question_dto(
                QuestionType::MultipleChoice,
                10,
                &[("A", true), ("B", false), ("C", true)],
            )],
        ),
    )
    .await
    .unwrap();

    QuizService::get_quiz_with_questions(repo, summary.quiz.id)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_create_quiz_persists_tree_in_order() {
    let repo = MemoryRepository::new();
    let course = create_test_course(&repo).await.course;
    let module = create_test_module(&repo, course.id, 1).await;

    let summary = QuizService::create_quiz(
        &repo,
        quiz_dto(
            course.id,
            Some(module.id),
            vec![
                question_dto(QuestionType::SingleChoice, 2, &[("fn", true), ("def", false)]),
                question_dto(
                    QuestionType::MultipleChoice,
                    3,
                    &[("u8", true), ("int", false), ("i64", true)],
                ),
            ],
        ),
    )
    .await
    .unwrap();

    assert_eq!(summary.question_count, 2);
    assert_eq!(summary.max_score, 5);
    assert_eq!(summary.quiz.module_id, Some(module.id));

    let detail = QuizService::get_quiz_with_questions(&repo, summary.quiz.id)
        .await
        .unwrap();
    assert_eq!(detail.max_score, 5);
    assert_eq!(detail.questions.len(), 2);
    assert_eq!(detail.questions[0].question.points, 2);
    assert_eq!(
        detail.questions[1]
            .options
            .iter()
            .map(|o| (o.text.as_str(), o.is_correct))
            .collect::<Vec<_>>(),
        vec![("u8", true), ("int", false), ("i64", true)]
    );

    let by_module = QuizService::get_quiz_by_module(&repo, module.id)
        .await
        .unwrap();
    assert_eq!(by_module.id, summary.quiz.id);

    let by_course = QuizService::get_quizzes_by_course(&repo, course.id)
        .await
        .unwrap();
    assert_eq!(by_course.len(), 1);
}

#[tokio::test]
async fn test_create_quiz_reference_checks() {
    let repo = MemoryRepository::new();
    let course = create_test_course(&repo).await.course;
    let other_course = create_test_course(&repo).await.course;
    let foreign_module = create_test_module(&repo, other_course.id, 1).await;
    let questions = || {
        vec![question_dto(
            QuestionType::SingleChoice,
            1,
            &[("yes", true), ("no", false)],
        )]
    };

    let err = QuizService::create_quiz(&repo, quiz_dto(CourseId::new(), None, questions()))
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let err = QuizService::create_quiz(
        &repo,
        quiz_dto(course.id, Some(ModuleId::new()), questions()),
    )
    .await
    .unwrap_err();
    assert!(err.is_not_found());

    let err = QuizService::create_quiz(
        &repo,
        quiz_dto(course.id, Some(foreign_module.id), questions()),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_module_carries_one_quiz() {
    let repo = MemoryRepository::new();
    let course = create_test_course(&repo).await.course;
    let module = create_test_module(&repo, course.id, 1).await;
    let questions = || {
        vec![question_dto(
            QuestionType::SingleChoice,
            1,
            &[("yes", true), ("no", false)],
        )]
    };

    QuizService::create_quiz(&repo, quiz_dto(course.id, Some(module.id), questions()))
        .await
        .unwrap();

    let err = QuizService::create_quiz(&repo, quiz_dto(course.id, Some(module.id), questions()))
        .await
        .unwrap_err();
    assert!(err.is_conflict());

    // Course-level quizzes are unrestricted.
    QuizService::create_quiz(&repo, quiz_dto(course.id, None, questions()))
        .await
        .unwrap();
    QuizService::create_quiz(&repo, quiz_dto(course.id, None, questions()))
        .await
        .unwrap();

    let quizzes = QuizService::get_quizzes_by_course(&repo, course.id)
        .await
        .unwrap();
    assert_eq!(quizzes.len(), 3);
}

#[tokio::test]
async fn test_exact_match_scoring() {
    let repo = MemoryRepository::new();
    let quiz = create_ac_quiz(&repo).await;
    let q = question_id(&quiz, 0);

    let cases: [(&[&str], i32); 4] = [
        (&["A", "C"], 10),
        (&["A"], 0),
        (&["A", "B", "C"], 0),
        (&[], 0),
    ];

    for (selected, expected) in cases {
        let student = create_test_student(&repo).await;
        let answers = HashMap::from([(q, pick(&quiz, 0, selected))]);
        let score = submit(&repo, quiz.quiz.id, student.id, answers).await;
        assert_eq!(score, expected, "selected {selected:?}");
    }

    let student = create_test_student(&repo).await;
    let score = submit(&repo, quiz.quiz.id, student.id, HashMap::new()).await;
    assert_eq!(score, 0);
}

#[tokio::test]
async fn test_scores_add_up_across_questions() {
    let repo = MemoryRepository::new();
    let course = create_test_course(&repo).await.course;
    let summary = QuizService::create_quiz(
        &repo,
        quiz_dto(
            course.id,
            None,
            vec![
                question_dto(QuestionType::SingleChoice, 10, &[("A", true), ("B", false)]),
                question_dto(
                    QuestionType::MultipleChoice,
                    20,
                    &[("X", true), ("Y", true), ("Z", false)],
                ),
            ],
        ),
    )
    .await
    .unwrap();
    let quiz = QuizService::get_quiz_with_questions(&repo, summary.quiz.id)
        .await
        .unwrap();

    let student = create_test_student(&repo).await;
    let result = SubmissionService::submit(
        &repo,
        quiz.quiz.id,
        SubmitQuizDto {
            student_id: student.id,
            answers: HashMap::from([
                (question_id(&quiz, 0), pick(&quiz, 0, &["A"])),
                (question_id(&quiz, 1), pick(&quiz, 1, &["X", "Y"])),
            ]),
        },
    )
    .await
    .unwrap();
    assert_eq!(result.submission.score, 30);
    assert_eq!(result.max_score, 30);
    assert_eq!(result.correct_answers, 2);

    let student = create_test_student(&repo).await;
    let score = submit(
        &repo,
        quiz.quiz.id,
        student.id,
        HashMap::from([
            (question_id(&quiz, 0), pick(&quiz, 0, &["A"])),
            (question_id(&quiz, 1), pick(&quiz, 1, &["X"])),
        ]),
    )
    .await;
    assert_eq!(score, 10);
}

#[tokio::test]
async fn test_one_submission_per_student() {
    let repo = MemoryRepository::new();
    let quiz = create_ac_quiz(&repo).await;
    let q = question_id(&quiz, 0);
    let student = create_test_student(&repo).await;

    let first = submit(
        &repo,
        quiz.quiz.id,
        student.id,
        HashMap::from([(q, pick(&quiz, 0, &["A", "C"]))]),
    )
    .await;
    assert_eq!(first, 10);

    let err = SubmissionService::submit(
        &repo,
        quiz.quiz.id,
        SubmitQuizDto {
            student_id: student.id,
            answers: HashMap::new(),
        },
    )
    .await
    .unwrap_err();
    assert!(err.is_conflict());

    let submissions = repo.submissions_by_quiz(quiz.quiz.id).await.unwrap();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].score, 10);
}

#[tokio::test]
async fn test_submit_reference_checks() {
    let repo = MemoryRepository::new();
    let quiz = create_ac_quiz(&repo).await;
    let teacher = create_test_user(&repo, UserRole::Teacher).await;

    let err = SubmissionService::submit(
        &repo,
        QuizId::new(),
        SubmitQuizDto {
            student_id: teacher.id,
            answers: HashMap::new(),
        },
    )
    .await
    .unwrap_err();
    assert!(err.is_not_found());

    // Only students can submit.
    let err = SubmissionService::submit(
        &repo,
        quiz.quiz.id,
        SubmitQuizDto {
            student_id: teacher.id,
            answers: HashMap::new(),
        },
    )
    .await
    .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_single_choice_submission() {
    let repo = MemoryRepository::new();
    let course = create_test_course(&repo).await.course;
    let summary = QuizService::create_quiz(
        &repo,
        quiz_dto(
            course.id,
            None,
            vec![
                question_dto(QuestionType::SingleChoice, 4, &[("Some", true), ("Null", false)]),
                question_dto(QuestionType::SingleChoice, 6, &[("Err", false), ("Ok", true)]),
            ],
        ),
    )
    .await
    .unwrap();
    let quiz = QuizService::get_quiz_with_questions(&repo, summary.quiz.id)
        .await
        .unwrap();

    let option = |question_index: usize, text: &str| {
        pick(&quiz, question_index, &[text])
            .into_iter()
            .next()
            .unwrap()
    };

    let student = create_test_student(&repo).await;
    let result = SubmissionService::submit_single_choice(
        &repo,
        quiz.quiz.id,
        SubmitSingleChoiceDto {
            student_id: student.id,
            answers: HashMap::from([
                (question_id(&quiz, 0), option(0, "Some")),
                (question_id(&quiz, 1), option(1, "Err")),
            ]),
        },
    )
    .await
    .unwrap();

    assert_eq!(result.submission.score, 4);
    assert_eq!(result.correct_answers, 1);
    assert_eq!(result.max_score, 10);

    let history = SubmissionService::submissions_by_student(&repo, student.id)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].quiz_id, quiz.quiz.id);
}

#[tokio::test]
async fn test_delete_quiz_guard() {
    let repo = MemoryRepository::new();
    let quiz = create_ac_quiz(&repo).await;
    let quiz_id = quiz.quiz.id;
    let student = create_test_student(&repo).await;
    submit(&repo, quiz_id, student.id, HashMap::new()).await;

    let err = QuizService::delete_quiz(&repo, quiz_id).await.unwrap_err();
    assert!(err.is_conflict());

    let still_there = QuizService::get_quiz_with_questions(&repo, quiz_id)
        .await
        .unwrap();
    assert_eq!(still_there.questions.len(), 1);
    assert_eq!(still_there.questions[0].options.len(), 3);
    assert_eq!(repo.submissions_by_quiz(quiz_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_quiz_removes_tree() {
    let repo = MemoryRepository::new();
    let quiz = create_ac_quiz(&repo).await;
    let quiz_id = quiz.quiz.id;

    QuizService::delete_quiz(&repo, quiz_id).await.unwrap();

    assert!(repo.find_quiz(quiz_id).await.unwrap().is_none());
    assert!(repo.questions_by_quiz(quiz_id).await.unwrap().is_empty());
    assert!(repo.options_by_quiz(quiz_id).await.unwrap().is_empty());

    let err = QuizService::delete_quiz(&repo, quiz_id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_oversized_point_total_is_rejected_before_saving() {
    let repo = MemoryRepository::new();
    let course = create_test_course(&repo).await.course;

    let err = QuizService::create_quiz(
        &repo,
        quiz_dto(
            course.id,
            None,
            vec![
                question_dto(QuestionType::SingleChoice, i32::MAX, &[("a", true), ("b", false)]),
                question_dto(QuestionType::SingleChoice, 1, &[("c", true), ("d", false)]),
            ],
        ),
    )
    .await
    .unwrap_err();

    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert!(repo.quizzes_by_course(course.id).await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_racing_submissions_record_one_attempt() {
    let repo = Arc::new(MemoryRepository::new());
    let quiz = create_ac_quiz(&repo).await;
    let q = question_id(&quiz, 0);
    let student = create_test_student(&repo).await;
    let dto = SubmitQuizDto {
        student_id: student.id,
        answers: HashMap::from([(q, pick(&quiz, 0, &["A", "C"]))]),
    };

    let attempts: Vec<_> = (0..2)
        .map(|_| {
            let repo = repo.clone();
            let dto = dto.clone();
            let quiz_id = quiz.quiz.id;
            tokio::spawn(async move { SubmissionService::submit(repo.as_ref(), quiz_id, dto).await })
        })
        .collect();

    let mut results = Vec::new();
    for attempt in attempts {
        results.push(attempt.await.unwrap());
    }

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| e.is_conflict())
    );

    let submissions = repo.submissions_by_quiz(quiz.quiz.id).await.unwrap();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].score, 10);
}
