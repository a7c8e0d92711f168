//! Course structure models: modules, lessons and the DTOs that create,
//! update and reorder them.
//!
//! Modules are ordered within a course and lessons within a module by a
//! positive `order_index` that is unique among siblings. Gaps are allowed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::courses::Course;
use crate::ids::{CourseId, LessonId, ModuleId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Module {
    pub id: ModuleId,
    pub course_id: CourseId,
    pub title: String,
    pub description: Option<String>,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Lesson {
    pub id: LessonId,
    pub module_id: ModuleId,
    pub title: String,
    pub content: Option<String>,
    pub video_url: Option<String>,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A module together with its lessons, ordered by `order_index`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ModuleWithLessons {
    #[serde(flatten)]
    pub module: Module,
    pub lessons: Vec<Lesson>,
}

/// The full tree of a course: modules with nested lessons.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CourseStructure {
    #[serde(flatten)]
    pub course: Course,
    pub modules: Vec<ModuleWithLessons>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateModuleDto {
    #[validate(length(min = 3, max = 100, message = "Title must be between 3 and 100 characters"))]
    pub title: String,
    #[validate(length(max = 500, message = "Description must not exceed 500 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 1, message = "Order index must be at least 1"))]
    pub order_index: i32,
}

/// Full replacement of a module's editable fields.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateModuleDto {
    #[validate(length(min = 3, max = 100, message = "Title must be between 3 and 100 characters"))]
    pub title: String,
    #[validate(length(max = 500, message = "Description must not exceed 500 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 1, message = "Order index must be at least 1"))]
    pub order_index: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateLessonDto {
    #[validate(length(min = 3, max = 100, message = "Title must be between 3 and 100 characters"))]
    pub title: String,
    #[validate(length(max = 5000, message = "Content must not exceed 5000 characters"))]
    pub content: Option<String>,
    #[validate(url(message = "Video URL must be valid"))]
    pub video_url: Option<String>,
    #[validate(range(min = 1, message = "Order index must be at least 1"))]
    pub order_index: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateLessonDto {
    #[validate(length(min = 3, max = 100, message = "Title must be between 3 and 100 characters"))]
    pub title: String,
    #[validate(length(max = 5000, message = "Content must not exceed 5000 characters"))]
    pub content: Option<String>,
    #[validate(url(message = "Video URL must be valid"))]
    pub video_url: Option<String>,
    #[validate(range(min = 1, message = "Order index must be at least 1"))]
    pub order_index: i32,
}

#[derive(Debug, Clone, Copy, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderDto {
    #[validate(range(min = 1, message = "Order index must be at least 1"))]
    pub order_index: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ReorderModulesDto {
    #[validate(length(min = 1, message = "At least one module id is required"))]
    pub module_ids: Vec<ModuleId>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ReorderLessonsDto {
    #[validate(length(min = 1, message = "At least one lesson id is required"))]
    pub lesson_ids: Vec<LessonId>,
}
