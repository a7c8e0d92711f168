use coursebyte_core::ErrorResponse;
use coursebyte_models::{
    AnswerOption, Course, CourseStructure, CreateAnswerOptionDto, CreateLessonDto,
    CreateModuleDto, CreateQuestionDto, CreateQuizDto, Lesson, Module, ModuleWithLessons,
    Question, QuestionDetail, QuestionType, Quiz, QuizDetail, QuizSubmission, QuizSummary,
    ReorderLessonsDto, ReorderModulesDto, SubmissionResult, SubmitQuizDto, SubmitSingleChoiceDto,
    UpdateLessonDto, UpdateModuleDto, UpdateOrderDto,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::structure::controller::get_course_modules,
        crate::modules::structure::controller::add_module,
        crate::modules::structure::controller::reorder_modules,
        crate::modules::structure::controller::update_module,
        crate::modules::structure::controller::get_course_structure,
        crate::modules::structure::controller::get_module_with_lessons,
        crate::modules::structure::controller::delete_module,
        crate::modules::structure::controller::update_module_order,
        crate::modules::structure::controller::get_module_lessons,
        crate::modules::structure::controller::add_lesson,
        crate::modules::structure::controller::reorder_lessons,
        crate::modules::structure::controller::update_lesson,
        crate::modules::structure::controller::get_lesson,
        crate::modules::structure::controller::delete_lesson,
        crate::modules::structure::controller::update_lesson_order,
        crate::modules::quizzes::controller::create_quiz,
        crate::modules::quizzes::controller::get_quiz_with_questions,
        crate::modules::quizzes::controller::delete_quiz,
        crate::modules::quizzes::controller::get_quizzes_by_course,
        crate::modules::quizzes::controller::get_quiz_by_module,
        crate::modules::submissions::controller::submit_quiz,
        crate::modules::submissions::controller::submit_single_choice,
        crate::modules::submissions::controller::get_submissions_by_quiz,
        crate::modules::submissions::controller::get_submissions_by_student,
    ),
    components(
        schemas(
            Course,
            Module,
            Lesson,
            ModuleWithLessons,
            CourseStructure,
            CreateModuleDto,
            UpdateModuleDto,
            CreateLessonDto,
            UpdateLessonDto,
            UpdateOrderDto,
            ReorderModulesDto,
            ReorderLessonsDto,
            QuestionType,
            Quiz,
            Question,
            AnswerOption,
            QuestionDetail,
            QuizDetail,
            QuizSummary,
            CreateQuizDto,
            CreateQuestionDto,
            CreateAnswerOptionDto,
            QuizSubmission,
            SubmissionResult,
            SubmitQuizDto,
            SubmitSingleChoiceDto,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Structure", description = "Ordered modules and lessons of a course"),
        (name = "Quizzes", description = "Quiz authoring"),
        (name = "Submissions", description = "Graded quiz attempts")
    ),
    info(
        title = "Coursebyte API",
        version = "0.1.0",
        description = "Course structure and quiz assessment service built with Rust, Axum, and PostgreSQL.",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
