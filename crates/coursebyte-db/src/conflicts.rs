//! Business-rule violations shared by the engines and the repositories.
//!
//! The engines detect most violations by scanning siblings before writing;
//! the repositories raise the same errors when a storage constraint catches
//! a concurrent writer, so callers see one message either way.

use anyhow::anyhow;
use coursebyte_core::AppError;

pub fn module_order_taken(order_index: i32) -> AppError {
    AppError::conflict(anyhow!(
        "Module with order index {} already exists in this course",
        order_index
    ))
}

pub fn lesson_order_taken(order_index: i32) -> AppError {
    AppError::conflict(anyhow!(
        "Lesson with order index {} already exists in this module",
        order_index
    ))
}

pub fn module_order_collision() -> AppError {
    AppError::conflict(anyhow!(
        "Modules of this course changed concurrently; order indices would collide"
    ))
}

pub fn lesson_order_collision() -> AppError {
    AppError::conflict(anyhow!(
        "Lessons of this module changed concurrently; order indices would collide"
    ))
}

pub fn module_has_lessons() -> AppError {
    AppError::conflict(anyhow!(
        "Cannot delete module with existing lessons. Delete lessons first."
    ))
}

pub fn module_has_quiz() -> AppError {
    AppError::conflict(anyhow!("Module already has a quiz"))
}

pub fn quiz_has_submissions() -> AppError {
    AppError::conflict(anyhow!("Cannot delete quiz that has submissions"))
}

pub fn duplicate_submission() -> AppError {
    AppError::conflict(anyhow!("Student has already taken this quiz"))
}
