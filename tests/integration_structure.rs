mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{create_test_course, send, setup_test_app};
use coursebyte_db::MemoryRepository;
use serde_json::{Value, json};
use uuid::Uuid;

async fn create_module(
    repo: &Arc<MemoryRepository>,
    course_id: &str,
    title: &str,
    order_index: i32,
) -> (StatusCode, Value) {
    send(
        setup_test_app(repo.clone()),
        "POST",
        &format!("/api/courses/{}/modules", course_id),
        Some(json!({
            "title": title,
            "description": "Module description",
            "order_index": order_index
        })),
    )
    .await
}

async fn create_lesson(
    repo: &Arc<MemoryRepository>,
    module_id: &str,
    title: &str,
    order_index: i32,
) -> (StatusCode, Value) {
    send(
        setup_test_app(repo.clone()),
        "POST",
        &format!("/api/modules/{}/lessons", module_id),
        Some(json!({
            "title": title,
            "content": "Lesson body",
            "order_index": order_index
        })),
    )
    .await
}

#[tokio::test]
async fn test_create_module() {
    let repo = Arc::new(MemoryRepository::new());
    let course = create_test_course(&repo).await.course;

    let (status, body) = create_module(&repo, &course.id.to_string(), "Getting started", 1).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "Getting started");
    assert_eq!(body["order_index"], 1);
    assert_eq!(body["course_id"], course.id.to_string());
    assert!(body["id"].is_string());
}

#[tokio::test]
async fn test_create_module_duplicate_order_conflict() {
    let repo = Arc::new(MemoryRepository::new());
    let course_id = create_test_course(&repo).await.course.id.to_string();

    let (status, _) = create_module(&repo, &course_id, "Getting started", 1).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = create_module(&repo, &course_id, "Second try", 1).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["error"],
        "Module with order index 1 already exists in this course"
    );
}

#[tokio::test]
async fn test_create_module_unknown_course() {
    let repo = Arc::new(MemoryRepository::new());

    let (status, body) = create_module(&repo, &Uuid::new_v4().to_string(), "Orphan", 1).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Course not found");
}

#[tokio::test]
async fn test_create_module_validation() {
    let repo = Arc::new(MemoryRepository::new());
    let course_id = create_test_course(&repo).await.course.id.to_string();

    let (status, body) = create_module(&repo, &course_id, "Ok", 1).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("Title"));

    let (status, _) = create_module(&repo, &course_id, "Valid title", 0).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(
        setup_test_app(repo.clone()),
        "POST",
        &format!("/api/courses/{}/modules", course_id),
        Some(json!({ "title": "No order" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "order_index is required");
}

#[tokio::test]
async fn test_reorder_modules_and_read_structure() {
    let repo = Arc::new(MemoryRepository::new());
    let course_id = create_test_course(&repo).await.course.id.to_string();

    let (_, a) = create_module(&repo, &course_id, "Module A", 1).await;
    let (_, b) = create_module(&repo, &course_id, "Module B", 2).await;
    let (_, lesson) = create_lesson(&repo, a["id"].as_str().unwrap(), "First lesson", 1).await;

    let (status, body) = send(
        setup_test_app(repo.clone()),
        "PUT",
        &format!("/api/courses/{}/modules/order", course_id),
        Some(json!({ "module_ids": [b["id"], a["id"]] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], b["id"]);
    assert_eq!(body[0]["order_index"], 1);
    assert_eq!(body[1]["id"], a["id"]);
    assert_eq!(body[1]["order_index"], 2);

    let (status, body) = send(
        setup_test_app(repo.clone()),
        "GET",
        &format!("/api/courses/{}/structure", course_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], course_id.as_str());
    let modules = body["modules"].as_array().unwrap();
    assert_eq!(modules.len(), 2);
    assert_eq!(modules[0]["title"], "Module B");
    assert!(modules[0]["lessons"].as_array().unwrap().is_empty());
    assert_eq!(modules[1]["lessons"][0]["id"], lesson["id"]);
}

#[tokio::test]
async fn test_reorder_modules_rejects_duplicates() {
    let repo = Arc::new(MemoryRepository::new());
    let course_id = create_test_course(&repo).await.course.id.to_string();
    let (_, a) = create_module(&repo, &course_id, "Module A", 1).await;

    let (status, _) = send(
        setup_test_app(repo.clone()),
        "PUT",
        &format!("/api/courses/{}/modules/order", course_id),
        Some(json!({ "module_ids": [a["id"], a["id"]] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_module_and_order() {
    let repo = Arc::new(MemoryRepository::new());
    let course_id = create_test_course(&repo).await.course.id.to_string();
    let (_, a) = create_module(&repo, &course_id, "Module A", 1).await;
    let (_, b) = create_module(&repo, &course_id, "Module B", 2).await;
    let a_id = a["id"].as_str().unwrap();

    let (status, body) = send(
        setup_test_app(repo.clone()),
        "PUT",
        &format!("/api/courses/{}/modules/{}", course_id, a_id),
        Some(json!({ "title": "Module A, revised", "order_index": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Module A, revised");
    assert_eq!(body["order_index"], 3);

    let (status, _) = send(
        setup_test_app(repo.clone()),
        "PATCH",
        &format!("/api/modules/{}/order", b["id"].as_str().unwrap()),
        Some(json!({ "order_index": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        setup_test_app(repo.clone()),
        "PATCH",
        &format!("/api/modules/{}/order", b["id"].as_str().unwrap()),
        Some(json!({ "order_index": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order_index"], 1);
}

#[tokio::test]
async fn test_lesson_endpoints() {
    let repo = Arc::new(MemoryRepository::new());
    let course_id = create_test_course(&repo).await.course.id.to_string();
    let (_, module) = create_module(&repo, &course_id, "Module A", 1).await;
    let module_id = module["id"].as_str().unwrap();

    let (status, first) = create_lesson(&repo, module_id, "Variables", 1).await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, second) = create_lesson(&repo, module_id, "Functions", 2).await;

    let (status, _) = create_lesson(&repo, module_id, "Duplicate", 2).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        setup_test_app(repo.clone()),
        "PUT",
        &format!("/api/modules/{}/lessons/order", module_id),
        Some(json!({ "lesson_ids": [second["id"]] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], second["id"]);
    assert_eq!(body[1]["id"], first["id"]);
    assert_eq!(body[1]["order_index"], 2);

    let first_id = first["id"].as_str().unwrap();
    let (status, body) = send(
        setup_test_app(repo.clone()),
        "PUT",
        &format!("/api/modules/{}/lessons/{}", module_id, first_id),
        Some(json!({
            "title": "Variables and mutability",
            "video_url": "https://videos.example.com/vars",
            "order_index": 5
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["video_url"], "https://videos.example.com/vars");

    let (status, _) = send(
        setup_test_app(repo.clone()),
        "PATCH",
        &format!("/api/lessons/{}/order", first_id),
        Some(json!({ "order_index": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        setup_test_app(repo.clone()),
        "GET",
        &format!("/api/lessons/{}", first_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order_index"], 5);

    let (status, body) = send(
        setup_test_app(repo.clone()),
        "GET",
        &format!("/api/modules/{}/lessons", module_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_delete_module_with_lessons_conflict() {
    let repo = Arc::new(MemoryRepository::new());
    let course_id = create_test_course(&repo).await.course.id.to_string();
    let (_, module) = create_module(&repo, &course_id, "Module A", 1).await;
    let module_id = module["id"].as_str().unwrap();
    let (_, lesson) = create_lesson(&repo, module_id, "Only lesson", 1).await;

    let (status, body) = send(
        setup_test_app(repo.clone()),
        "DELETE",
        &format!("/api/modules/{}", module_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["error"],
        "Cannot delete module with existing lessons. Delete lessons first."
    );

    let (status, _) = send(
        setup_test_app(repo.clone()),
        "DELETE",
        &format!("/api/lessons/{}", lesson["id"].as_str().unwrap()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        setup_test_app(repo.clone()),
        "DELETE",
        &format!("/api/modules/{}", module_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        setup_test_app(repo.clone()),
        "GET",
        &format!("/api/modules/{}", module_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_ids_are_rejected() {
    let repo = Arc::new(MemoryRepository::new());

    let (status, _) = send(
        setup_test_app(repo.clone()),
        "GET",
        "/api/modules/not-a-uuid",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
