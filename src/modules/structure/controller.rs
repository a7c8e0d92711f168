use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use coursebyte_core::{AppError, ErrorResponse};
use tracing::instrument;

use crate::modules::structure::model::{
    CourseId, CourseStructure, CreateLessonDto, CreateModuleDto, Lesson, LessonId, Module,
    ModuleId, ModuleWithLessons, ReorderLessonsDto, ReorderModulesDto, UpdateLessonDto,
    UpdateModuleDto, UpdateOrderDto,
};
use crate::modules::structure::service::StructureService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/courses/{course_id}/modules",
    params(
        ("course_id" = Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Modules of the course ordered by order index", body = Vec<Module>),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Structure"
)]
#[instrument(skip(state))]
pub async fn get_course_modules(
    State(state): State<AppState>,
    Path(course_id): Path<CourseId>,
) -> Result<Json<Vec<Module>>, AppError> {
    let modules = StructureService::get_course_modules(state.repo.as_ref(), course_id).await?;

    Ok(Json(modules))
}

#[utoipa::path(
    post,
    path = "/api/courses/{course_id}/modules",
    params(
        ("course_id" = Uuid, Path, description = "Course ID")
    ),
    request_body = CreateModuleDto,
    responses(
        (status = 201, description = "Module created", body = Module),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 409, description = "Order index already used in this course", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Structure"
)]
#[instrument(skip(state, dto))]
pub async fn add_module(
    State(state): State<AppState>,
    Path(course_id): Path<CourseId>,
    ValidatedJson(dto): ValidatedJson<CreateModuleDto>,
) -> Result<(StatusCode, Json<Module>), AppError> {
    let module = StructureService::add_module(state.repo.as_ref(), course_id, dto).await?;

    Ok((StatusCode::CREATED, Json(module)))
}

#[utoipa::path(
    put,
    path = "/api/courses/{course_id}/modules/order",
    params(
        ("course_id" = Uuid, Path, description = "Course ID")
    ),
    request_body = ReorderModulesDto,
    responses(
        (status = 200, description = "Modules renumbered 1..N in the requested order", body = Vec<Module>),
        (status = 400, description = "Duplicate id or module of another course", body = ErrorResponse),
        (status = 404, description = "Course or module not found", body = ErrorResponse)
    ),
    tag = "Structure"
)]
#[instrument(skip(state, dto))]
pub async fn reorder_modules(
    State(state): State<AppState>,
    Path(course_id): Path<CourseId>,
    ValidatedJson(dto): ValidatedJson<ReorderModulesDto>,
) -> Result<Json<Vec<Module>>, AppError> {
    let modules =
        StructureService::reorder_modules(state.repo.as_ref(), course_id, dto.module_ids).await?;

    Ok(Json(modules))
}

#[utoipa::path(
    put,
    path = "/api/courses/{course_id}/modules/{module_id}",
    params(
        ("course_id" = Uuid, Path, description = "Course ID"),
        ("module_id" = Uuid, Path, description = "Module ID")
    ),
    request_body = UpdateModuleDto,
    responses(
        (status = 200, description = "Module updated", body = Module),
        (status = 404, description = "Module not found in this course", body = ErrorResponse),
        (status = 409, description = "Order index already used in this course", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Structure"
)]
#[instrument(skip(state, dto))]
pub async fn update_module(
    State(state): State<AppState>,
    Path((course_id, module_id)): Path<(CourseId, ModuleId)>,
    ValidatedJson(dto): ValidatedJson<UpdateModuleDto>,
) -> Result<Json<Module>, AppError> {
    let module =
        StructureService::update_module(state.repo.as_ref(), course_id, module_id, dto).await?;

    Ok(Json(module))
}

#[utoipa::path(
    get,
    path = "/api/courses/{course_id}/structure",
    params(
        ("course_id" = Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course with ordered modules and nested lessons", body = CourseStructure),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Structure"
)]
#[instrument(skip(state))]
pub async fn get_course_structure(
    State(state): State<AppState>,
    Path(course_id): Path<CourseId>,
) -> Result<Json<CourseStructure>, AppError> {
    let structure = StructureService::get_course_structure(state.repo.as_ref(), course_id).await?;

    Ok(Json(structure))
}

#[utoipa::path(
    get,
    path = "/api/modules/{module_id}",
    params(
        ("module_id" = Uuid, Path, description = "Module ID")
    ),
    responses(
        (status = 200, description = "Module with its lessons", body = ModuleWithLessons),
        (status = 404, description = "Module not found", body = ErrorResponse)
    ),
    tag = "Structure"
)]
#[instrument(skip(state))]
pub async fn get_module_with_lessons(
    State(state): State<AppState>,
    Path(module_id): Path<ModuleId>,
) -> Result<Json<ModuleWithLessons>, AppError> {
    let module = StructureService::get_module_with_lessons(state.repo.as_ref(), module_id).await?;

    Ok(Json(module))
}

#[utoipa::path(
    delete,
    path = "/api/modules/{module_id}",
    params(
        ("module_id" = Uuid, Path, description = "Module ID")
    ),
    responses(
        (status = 204, description = "Module deleted"),
        (status = 404, description = "Module not found", body = ErrorResponse),
        (status = 409, description = "Module still has lessons", body = ErrorResponse)
    ),
    tag = "Structure"
)]
#[instrument(skip(state))]
pub async fn delete_module(
    State(state): State<AppState>,
    Path(module_id): Path<ModuleId>,
) -> Result<StatusCode, AppError> {
    StructureService::delete_module(state.repo.as_ref(), module_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/api/modules/{module_id}/order",
    params(
        ("module_id" = Uuid, Path, description = "Module ID")
    ),
    request_body = UpdateOrderDto,
    responses(
        (status = 200, description = "Module moved", body = Module),
        (status = 404, description = "Module not found", body = ErrorResponse),
        (status = 409, description = "Order index already used in this course", body = ErrorResponse)
    ),
    tag = "Structure"
)]
#[instrument(skip(state))]
pub async fn update_module_order(
    State(state): State<AppState>,
    Path(module_id): Path<ModuleId>,
    ValidatedJson(dto): ValidatedJson<UpdateOrderDto>,
) -> Result<Json<Module>, AppError> {
    let module =
        StructureService::update_module_order(state.repo.as_ref(), module_id, dto.order_index)
            .await?;

    Ok(Json(module))
}

#[utoipa::path(
    get,
    path = "/api/modules/{module_id}/lessons",
    params(
        ("module_id" = Uuid, Path, description = "Module ID")
    ),
    responses(
        (status = 200, description = "Lessons ordered by order index", body = Vec<Lesson>),
        (status = 404, description = "Module not found", body = ErrorResponse)
    ),
    tag = "Structure"
)]
#[instrument(skip(state))]
pub async fn get_module_lessons(
    State(state): State<AppState>,
    Path(module_id): Path<ModuleId>,
) -> Result<Json<Vec<Lesson>>, AppError> {
    let lessons = StructureService::get_module_lessons(state.repo.as_ref(), module_id).await?;

    Ok(Json(lessons))
}

#[utoipa::path(
    post,
    path = "/api/modules/{module_id}/lessons",
    params(
        ("module_id" = Uuid, Path, description = "Module ID")
    ),
    request_body = CreateLessonDto,
    responses(
        (status = 201, description = "Lesson created", body = Lesson),
        (status = 404, description = "Module not found", body = ErrorResponse),
        (status = 409, description = "Order index already used in this module", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Structure"
)]
#[instrument(skip(state, dto))]
pub async fn add_lesson(
    State(state): State<AppState>,
    Path(module_id): Path<ModuleId>,
    ValidatedJson(dto): ValidatedJson<CreateLessonDto>,
) -> Result<(StatusCode, Json<Lesson>), AppError> {
    let lesson = StructureService::add_lesson(state.repo.as_ref(), module_id, dto).await?;

    Ok((StatusCode::CREATED, Json(lesson)))
}

#[utoipa::path(
    put,
    path = "/api/modules/{module_id}/lessons/order",
    params(
        ("module_id" = Uuid, Path, description = "Module ID")
    ),
    request_body = ReorderLessonsDto,
    responses(
        (status = 200, description = "Lessons renumbered 1..N in the requested order", body = Vec<Lesson>),
        (status = 400, description = "Duplicate id or lesson of another module", body = ErrorResponse),
        (status = 404, description = "Module or lesson not found", body = ErrorResponse)
    ),
    tag = "Structure"
)]
#[instrument(skip(state, dto))]
pub async fn reorder_lessons(
    State(state): State<AppState>,
    Path(module_id): Path<ModuleId>,
    ValidatedJson(dto): ValidatedJson<ReorderLessonsDto>,
) -> Result<Json<Vec<Lesson>>, AppError> {
    let lessons =
        StructureService::reorder_lessons(state.repo.as_ref(), module_id, dto.lesson_ids).await?;

    Ok(Json(lessons))
}

#[utoipa::path(
    put,
    path = "/api/modules/{module_id}/lessons/{lesson_id}",
    params(
        ("module_id" = Uuid, Path, description = "Module ID"),
        ("lesson_id" = Uuid, Path, description = "Lesson ID")
    ),
    request_body = UpdateLessonDto,
    responses(
        (status = 200, description = "Lesson updated", body = Lesson),
        (status = 404, description = "Lesson not found in this module", body = ErrorResponse),
        (status = 409, description = "Order index already used in this module", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Structure"
)]
#[instrument(skip(state, dto))]
pub async fn update_lesson(
    State(state): State<AppState>,
    Path((module_id, lesson_id)): Path<(ModuleId, LessonId)>,
    ValidatedJson(dto): ValidatedJson<UpdateLessonDto>,
) -> Result<Json<Lesson>, AppError> {
    let lesson =
        StructureService::update_lesson(state.repo.as_ref(), module_id, lesson_id, dto).await?;

    Ok(Json(lesson))
}

#[utoipa::path(
    get,
    path = "/api/lessons/{lesson_id}",
    params(
        ("lesson_id" = Uuid, Path, description = "Lesson ID")
    ),
    responses(
        (status = 200, description = "Lesson", body = Lesson),
        (status = 404, description = "Lesson not found", body = ErrorResponse)
    ),
    tag = "Structure"
)]
#[instrument(skip(state))]
pub async fn get_lesson(
    State(state): State<AppState>,
    Path(lesson_id): Path<LessonId>,
) -> Result<Json<Lesson>, AppError> {
    let lesson = StructureService::get_lesson(state.repo.as_ref(), lesson_id).await?;

    Ok(Json(lesson))
}

#[utoipa::path(
    delete,
    path = "/api/lessons/{lesson_id}",
    params(
        ("lesson_id" = Uuid, Path, description = "Lesson ID")
    ),
    responses(
        (status = 204, description = "Lesson deleted"),
        (status = 404, description = "Lesson not found", body = ErrorResponse)
    ),
    tag = "Structure"
)]
#[instrument(skip(state))]
pub async fn delete_lesson(
    State(state): State<AppState>,
    Path(lesson_id): Path<LessonId>,
) -> Result<StatusCode, AppError> {
    StructureService::delete_lesson(state.repo.as_ref(), lesson_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/api/lessons/{lesson_id}/order",
    params(
        ("lesson_id" = Uuid, Path, description = "Lesson ID")
    ),
    request_body = UpdateOrderDto,
    responses(
        (status = 200, description = "Lesson moved", body = Lesson),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 409, description = "Order index already used in this module", body = ErrorResponse)
    ),
    tag = "Structure"
)]
#[instrument(skip(state))]
pub async fn update_lesson_order(
    State(state): State<AppState>,
    Path(lesson_id): Path<LessonId>,
    ValidatedJson(dto): ValidatedJson<UpdateOrderDto>,
) -> Result<Json<Lesson>, AppError> {
    let lesson =
        StructureService::update_lesson_order(state.repo.as_ref(), lesson_id, dto.order_index)
            .await?;

    Ok(Json(lesson))
}
