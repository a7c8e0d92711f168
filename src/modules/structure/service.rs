use std::collections::HashMap;

use anyhow::anyhow;
use coursebyte_core::AppError;
use coursebyte_db::{Repository, conflicts};
use tracing::{info, instrument};

use crate::modules::structure::model::{
    CourseId, CourseStructure, CreateLessonDto, CreateModuleDto, Lesson, LessonId, Module,
    ModuleId, ModuleWithLessons, UpdateLessonDto, UpdateModuleDto,
};
use crate::modules::structure::ordering::{ResequenceError, order_taken, resequence};

pub struct StructureService;

fn ensure_positive(order_index: i32) -> Result<(), AppError> {
    if order_index < 1 {
        return Err(AppError::bad_request(anyhow!(
            "Order index must be at least 1"
        )));
    }
    Ok(())
}

fn course_not_found() -> AppError {
    AppError::not_found(anyhow!("Course not found"))
}

fn module_not_found() -> AppError {
    AppError::not_found(anyhow!("Module not found"))
}

fn lesson_not_found() -> AppError {
    AppError::not_found(anyhow!("Lesson not found"))
}

impl StructureService {
    #[instrument(skip(repo, dto))]
    pub async fn add_module<R>(
        repo: &R,
        course_id: CourseId,
        dto: CreateModuleDto,
    ) -> Result<Module, AppError>
    where
        R: Repository + ?Sized,
    {
        ensure_positive(dto.order_index)?;

        repo.find_course(course_id)
            .await?
            .ok_or_else(course_not_found)?;

        let siblings = repo.modules_by_course(course_id).await?;
        if order_taken(&siblings, dto.order_index, None) {
            return Err(conflicts::module_order_taken(dto.order_index));
        }

        let module = repo.insert_module(course_id, &dto).await?;

        info!(
            module_id = %module.id,
            course_id = %course_id,
            order_index = module.order_index,
            "Module created"
        );

        Ok(module)
    }

    #[instrument(skip(repo, dto))]
    pub async fn add_lesson<R>(
        repo: &R,
        module_id: ModuleId,
        dto: CreateLessonDto,
    ) -> Result<Lesson, AppError>
    where
        R: Repository + ?Sized,
    {
        ensure_positive(dto.order_index)?;

        repo.find_module(module_id)
            .await?
            .ok_or_else(module_not_found)?;

        let siblings = repo.lessons_by_module(module_id).await?;
        if order_taken(&siblings, dto.order_index, None) {
            return Err(conflicts::lesson_order_taken(dto.order_index));
        }

        let lesson = repo.insert_lesson(module_id, &dto).await?;

        info!(
            lesson_id = %lesson.id,
            module_id = %module_id,
            order_index = lesson.order_index,
            "Lesson created"
        );

        Ok(lesson)
    }

    /// Replaces the editable fields of a module that belongs to `course_id`.
    #[instrument(skip(repo, dto))]
    pub async fn update_module<R>(
        repo: &R,
        course_id: CourseId,
        module_id: ModuleId,
        dto: UpdateModuleDto,
    ) -> Result<Module, AppError>
    where
        R: Repository + ?Sized,
    {
        ensure_positive(dto.order_index)?;

        let mut module = repo
            .find_module(module_id)
            .await?
            .filter(|m| m.course_id == course_id)
            .ok_or_else(|| AppError::not_found(anyhow!("Module not found in this course")))?;

        if module.order_index != dto.order_index {
            let siblings = repo.modules_by_course(course_id).await?;
            if order_taken(&siblings, dto.order_index, Some(module_id)) {
                return Err(conflicts::module_order_taken(dto.order_index));
            }
        }

        module.title = dto.title;
        module.description = dto.description;
        module.order_index = dto.order_index;

        let module = repo.update_module(&module).await?;

        info!(module_id = %module.id, "Module updated");

        Ok(module)
    }

    /// Replaces the editable fields of a lesson that belongs to `module_id`.
    #[instrument(skip(repo, dto))]
    pub async fn update_lesson<R>(
        repo: &R,
        module_id: ModuleId,
        lesson_id: LessonId,
        dto: UpdateLessonDto,
    ) -> Result<Lesson, AppError>
    where
        R: Repository + ?Sized,
    {
        ensure_positive(dto.order_index)?;

        let mut lesson = repo
            .find_lesson(lesson_id)
            .await?
            .filter(|l| l.module_id == module_id)
            .ok_or_else(|| AppError::not_found(anyhow!("Lesson not found in this module")))?;

        if lesson.order_index != dto.order_index {
            let siblings = repo.lessons_by_module(module_id).await?;
            if order_taken(&siblings, dto.order_index, Some(lesson_id)) {
                return Err(conflicts::lesson_order_taken(dto.order_index));
            }
        }

        lesson.title = dto.title;
        lesson.content = dto.content;
        lesson.video_url = dto.video_url;
        lesson.order_index = dto.order_index;

        let lesson = repo.update_lesson(&lesson).await?;

        info!(lesson_id = %lesson.id, "Lesson updated");

        Ok(lesson)
    }

    #[instrument(skip(repo))]
    pub async fn update_module_order<R>(
        repo: &R,
        module_id: ModuleId,
        order_index: i32,
    ) -> Result<Module, AppError>
    where
        R: Repository + ?Sized,
    {
        ensure_positive(order_index)?;

        let mut module = repo
            .find_module(module_id)
            .await?
            .ok_or_else(module_not_found)?;

        if module.order_index == order_index {
            return Ok(module);
        }

        let siblings = repo.modules_by_course(module.course_id).await?;
        if order_taken(&siblings, order_index, Some(module_id)) {
            return Err(conflicts::module_order_taken(order_index));
        }

        module.order_index = order_index;
        let module = repo.update_module(&module).await?;

        info!(module_id = %module_id, order_index, "Module order updated");

        Ok(module)
    }

    #[instrument(skip(repo))]
    pub async fn update_lesson_order<R>(
        repo: &R,
        lesson_id: LessonId,
        order_index: i32,
    ) -> Result<Lesson, AppError>
    where
        R: Repository + ?Sized,
    {
        ensure_positive(order_index)?;

        let mut lesson = repo
            .find_lesson(lesson_id)
            .await?
            .ok_or_else(lesson_not_found)?;

        if lesson.order_index == order_index {
            return Ok(lesson);
        }

        let siblings = repo.lessons_by_module(lesson.module_id).await?;
        if order_taken(&siblings, order_index, Some(lesson_id)) {
            return Err(conflicts::lesson_order_taken(order_index));
        }

        lesson.order_index = order_index;
        let lesson = repo.update_lesson(&lesson).await?;

        info!(lesson_id = %lesson_id, order_index, "Lesson order updated");

        Ok(lesson)
    }

    /// Refuses while the module still has lessons; lessons are never
    /// removed implicitly.
    #[instrument(skip(repo))]
    pub async fn delete_module<R>(repo: &R, module_id: ModuleId) -> Result<(), AppError>
    where
        R: Repository + ?Sized,
    {
        repo.find_module(module_id)
            .await?
            .ok_or_else(module_not_found)?;

        if !repo.lessons_by_module(module_id).await?.is_empty() {
            return Err(conflicts::module_has_lessons());
        }

        if !repo.delete_module(module_id).await? {
            return Err(module_not_found());
        }

        info!(module_id = %module_id, "Module deleted");

        Ok(())
    }

    #[instrument(skip(repo))]
    pub async fn delete_lesson<R>(repo: &R, lesson_id: LessonId) -> Result<(), AppError>
    where
        R: Repository + ?Sized,
    {
        if !repo.delete_lesson(lesson_id).await? {
            return Err(lesson_not_found());
        }

        info!(lesson_id = %lesson_id, "Lesson deleted");

        Ok(())
    }

    /// Assigns `1..=N` following `module_ids`; unlisted modules of the
    /// course follow in their current order.
    #[instrument(skip(repo, module_ids), fields(count = module_ids.len()))]
    pub async fn reorder_modules<R>(
        repo: &R,
        course_id: CourseId,
        module_ids: Vec<ModuleId>,
    ) -> Result<Vec<Module>, AppError>
    where
        R: Repository + ?Sized,
    {
        repo.find_course(course_id)
            .await?
            .ok_or_else(course_not_found)?;

        let current = repo.modules_by_course(course_id).await?;
        let current_ids: Vec<ModuleId> = current.iter().map(|m| m.id).collect();

        let sequence = match resequence(&current_ids, &module_ids) {
            Ok(sequence) => sequence,
            Err(ResequenceError::Duplicate(id)) => {
                return Err(AppError::bad_request(anyhow!(
                    "Module {} is listed more than once",
                    id
                )));
            }
            Err(ResequenceError::Foreign(id)) => {
                return Err(match repo.find_module(id).await? {
                    Some(_) => AppError::bad_request(anyhow!(
                        "Module {} does not belong to this course",
                        id
                    )),
                    None => AppError::not_found(anyhow!("Module {} not found", id)),
                });
            }
        };

        repo.resequence_modules(course_id, &sequence).await?;

        info!(course_id = %course_id, modules = sequence.len(), "Modules reordered");

        repo.modules_by_course(course_id).await
    }

    /// Assigns `1..=N` following `lesson_ids`; unlisted lessons of the
    /// module follow in their current order.
    #[instrument(skip(repo, lesson_ids), fields(count = lesson_ids.len()))]
    pub async fn reorder_lessons<R>(
        repo: &R,
        module_id: ModuleId,
        lesson_ids: Vec<LessonId>,
    ) -> Result<Vec<Lesson>, AppError>
    where
        R: Repository + ?Sized,
    {
        repo.find_module(module_id)
            .await?
            .ok_or_else(module_not_found)?;

        let current = repo.lessons_by_module(module_id).await?;
        let current_ids: Vec<LessonId> = current.iter().map(|l| l.id).collect();

        let sequence = match resequence(&current_ids, &lesson_ids) {
            Ok(sequence) => sequence,
            Err(ResequenceError::Duplicate(id)) => {
                return Err(AppError::bad_request(anyhow!(
                    "Lesson {} is listed more than once",
                    id
                )));
            }
            Err(ResequenceError::Foreign(id)) => {
                return Err(match repo.find_lesson(id).await? {
                    Some(_) => AppError::bad_request(anyhow!(
                        "Lesson {} does not belong to this module",
                        id
                    )),
                    None => AppError::not_found(anyhow!("Lesson {} not found", id)),
                });
            }
        };

        repo.resequence_lessons(module_id, &sequence).await?;

        info!(module_id = %module_id, lessons = sequence.len(), "Lessons reordered");

        repo.lessons_by_module(module_id).await
    }

    #[instrument(skip(repo))]
    pub async fn get_module_with_lessons<R>(
        repo: &R,
        module_id: ModuleId,
    ) -> Result<ModuleWithLessons, AppError>
    where
        R: Repository + ?Sized,
    {
        let module = repo
            .find_module(module_id)
            .await?
            .ok_or_else(module_not_found)?;
        let lessons = repo.lessons_by_module(module_id).await?;

        Ok(ModuleWithLessons { module, lessons })
    }

    #[instrument(skip(repo))]
    pub async fn get_course_structure<R>(
        repo: &R,
        course_id: CourseId,
    ) -> Result<CourseStructure, AppError>
    where
        R: Repository + ?Sized,
    {
        let course = repo
            .find_course(course_id)
            .await?
            .ok_or_else(course_not_found)?;

        let modules = repo.modules_by_course(course_id).await?;
        let mut lessons_by_module: HashMap<ModuleId, Vec<Lesson>> = HashMap::new();
        for lesson in repo.lessons_by_course(course_id).await? {
            lessons_by_module
                .entry(lesson.module_id)
                .or_default()
                .push(lesson);
        }

        let modules = modules
            .into_iter()
            .map(|module| {
                let mut lessons = lessons_by_module.remove(&module.id).unwrap_or_default();
                lessons.sort_by_key(|l| l.order_index);
                ModuleWithLessons { module, lessons }
            })
            .collect();

        Ok(CourseStructure { course, modules })
    }

    #[instrument(skip(repo))]
    pub async fn get_course_modules<R>(
        repo: &R,
        course_id: CourseId,
    ) -> Result<Vec<Module>, AppError>
    where
        R: Repository + ?Sized,
    {
        repo.find_course(course_id)
            .await?
            .ok_or_else(course_not_found)?;

        repo.modules_by_course(course_id).await
    }

    #[instrument(skip(repo))]
    pub async fn get_module_lessons<R>(
        repo: &R,
        module_id: ModuleId,
    ) -> Result<Vec<Lesson>, AppError>
    where
        R: Repository + ?Sized,
    {
        repo.find_module(module_id)
            .await?
            .ok_or_else(module_not_found)?;

        repo.lessons_by_module(module_id).await
    }

    #[instrument(skip(repo))]
    pub async fn get_lesson<R>(repo: &R, lesson_id: LessonId) -> Result<Lesson, AppError>
    where
        R: Repository + ?Sized,
    {
        repo.find_lesson(lesson_id)
            .await?
            .ok_or_else(lesson_not_found)
    }
}
