pub use coursebyte_models::structure::{
    CourseStructure, CreateLessonDto, CreateModuleDto, Lesson, Module, ModuleWithLessons,
    ReorderLessonsDto, ReorderModulesDto, UpdateLessonDto, UpdateModuleDto, UpdateOrderDto,
};
pub use coursebyte_models::{CourseId, LessonId, ModuleId};
