//! Sibling ordering rules shared by modules and lessons.
//!
//! Siblings under one parent carry a positive `order_index` that is unique
//! among them. Gaps are allowed; only an explicit reorder compacts them.

use std::collections::HashSet;
use std::hash::Hash;

use coursebyte_models::{Lesson, LessonId, Module, ModuleId};

/// An entity ordered among its siblings.
pub trait Ordered {
    type Id: Copy + Eq + Hash;

    fn id(&self) -> Self::Id;
    fn order_index(&self) -> i32;
}

impl Ordered for Module {
    type Id = ModuleId;

    fn id(&self) -> ModuleId {
        self.id
    }

    fn order_index(&self) -> i32 {
        self.order_index
    }
}

impl Ordered for Lesson {
    type Id = LessonId;

    fn id(&self) -> LessonId {
        self.id
    }

    fn order_index(&self) -> i32 {
        self.order_index
    }
}

/// True if a sibling other than `exclude` already holds `order_index`.
pub fn order_taken<T: Ordered>(siblings: &[T], order_index: i32, exclude: Option<T::Id>) -> bool {
    siblings
        .iter()
        .any(|s| s.order_index() == order_index && Some(s.id()) != exclude)
}

#[derive(Debug, PartialEq, Eq)]
pub enum ResequenceError<Id> {
    /// The same id was listed twice.
    Duplicate(Id),
    /// The id is not one of the siblings.
    Foreign(Id),
}

/// Computes the full sibling sequence for a bulk reorder.
///
/// `current` is the sibling list in its present order. Ids in `requested`
/// come first, in request order; siblings left out keep their relative
/// order and follow. The result always lists every sibling exactly once,
/// so assigning `1..=N` along it keeps indices unique.
pub fn resequence<Id>(current: &[Id], requested: &[Id]) -> Result<Vec<Id>, ResequenceError<Id>>
where
    Id: Copy + Eq + Hash,
{
    let siblings: HashSet<Id> = current.iter().copied().collect();
    let mut seen = HashSet::with_capacity(requested.len());

    for &id in requested {
        if !siblings.contains(&id) {
            return Err(ResequenceError::Foreign(id));
        }
        if !seen.insert(id) {
            return Err(ResequenceError::Duplicate(id));
        }
    }

    let mut sequence = requested.to_vec();
    sequence.extend(current.iter().copied().filter(|id| !seen.contains(id)));

    Ok(sequence)
}
