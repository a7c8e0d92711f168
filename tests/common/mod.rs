#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use coursebyte::router::init_router;
use coursebyte::state::AppState;
use coursebyte_config::CorsConfig;
use coursebyte_db::MemoryRepository;
use coursebyte_models::{
    Course, CourseId, CreateAnswerOptionDto, CreateLessonDto, CreateModuleDto, CreateQuestionDto,
    CreateQuizDto, Lesson, Module, ModuleId, QuestionType, User, UserRole,
};
use fake::Fake;
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::Name;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

pub struct TestCourse {
    pub teacher: User,
    pub course: Course,
}

pub async fn create_test_user(repo: &MemoryRepository, role: UserRole) -> User {
    let name: String = Name().fake();
    let email: String = SafeEmail().fake();
    repo.add_user(&name, &email, role).await
}

pub async fn create_test_student(repo: &MemoryRepository) -> User {
    create_test_user(repo, UserRole::Student).await
}

pub async fn create_test_course(repo: &MemoryRepository) -> TestCourse {
    let teacher = create_test_user(repo, UserRole::Teacher).await;
    let title: String = Sentence(2..4).fake();
    let course = repo.add_course(teacher.id, &title).await;
    TestCourse { teacher, course }
}

pub fn module_dto(order_index: i32) -> CreateModuleDto {
    CreateModuleDto {
        title: format!("Module {}", order_index),
        description: Some(Sentence(3..8).fake()),
        order_index,
    }
}

pub fn lesson_dto(order_index: i32) -> CreateLessonDto {
    CreateLessonDto {
        title: format!("Lesson {}", order_index),
        content: Some(Sentence(5..12).fake()),
        video_url: None,
        order_index,
    }
}

pub async fn create_test_module(
    repo: &MemoryRepository,
    course_id: CourseId,
    order_index: i32,
) -> Module {
    coursebyte::modules::structure::service::StructureService::add_module(
        repo,
        course_id,
        module_dto(order_index),
    )
    .await
    .unwrap()
}

pub async fn create_test_lesson(
    repo: &MemoryRepository,
    module_id: ModuleId,
    order_index: i32,
) -> Lesson {
    coursebyte::modules::structure::service::StructureService::add_lesson(
        repo,
        module_id,
        lesson_dto(order_index),
    )
    .await
    .unwrap()
}

/// `options` pairs option text with its correct flag.
pub fn question_dto(
    question_type: QuestionType,
    points: i32,
    options: &[(&str, bool)],
) -> CreateQuestionDto {
    CreateQuestionDto {
        text: Sentence(4..10).fake(),
        question_type,
        points,
        options: options
            .iter()
            .map(|(text, is_correct)| CreateAnswerOptionDto {
                text: text.to_string(),
                is_correct: *is_correct,
            })
            .collect(),
    }
}

pub fn quiz_dto(
    course_id: CourseId,
    module_id: Option<ModuleId>,
    questions: Vec<CreateQuestionDto>,
) -> CreateQuizDto {
    CreateQuizDto {
        course_id,
        module_id,
        title: "Checkpoint quiz".to_string(),
        description: None,
        time_limit: 900,
        questions,
    }
}

pub fn setup_test_app(repo: Arc<MemoryRepository>) -> Router {
    let state = AppState {
        repo,
        cors_config: CorsConfig::default(),
    };
    init_router(state)
}

/// Sends one request through the router and returns the status with the
/// parsed JSON body (`Value::Null` for empty bodies, a string for plain
/// text rejections).
pub async fn send(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    (status, body)
}
