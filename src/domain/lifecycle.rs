/// Habit lifecycle engine
///
/// Pure functions that derive progress facts from a habit and apply the
/// user-initiated state changes. Nothing here persists: callers hand the
/// returned record to the habit store.
///
/// ```text
///            target reached + confirmed
///   active ───────────────────────────► completed
///     │
///     └──────── user archives ─────────► archived
/// ```

use chrono::NaiveDate;

use crate::domain::{today, DomainError, Habit, HabitStatus};

/// Result of toggling one day on a habit
#[derive(Debug, Clone, PartialEq)]
pub struct ToggleOutcome {
    /// The habit with the day added or removed
    pub habit: Habit,
    /// True if the date was added, false if it was removed
    pub marked: bool,
    /// The habit now has at least `target` completed days
    ///
    /// This is only a proposal to complete the habit. The caller asks the
    /// user and then calls [`complete`] (or the store's `mark_completed`).
    pub target_reached: bool,
}

/// Add `date` to the habit's completed days, or remove it if already there
///
/// Works on habits in any state, so past days can still be corrected on
/// completed or archived habits.
pub fn toggle_completion_for_date(habit: &Habit, date: NaiveDate) -> ToggleOutcome {
    let mut updated = habit.clone();

    let marked = if updated.completed_dates.contains(date) {
        updated.completed_dates.remove(date);
        false
    } else {
        updated.completed_dates.insert(date);
        true
    };

    let target_reached = updated.target_reached();

    ToggleOutcome {
        habit: updated,
        marked,
        target_reached,
    }
}

/// [`toggle_completion_for_date`] for the current calendar day
pub fn toggle_completion_for_today(habit: &Habit) -> ToggleOutcome {
    toggle_completion_for_date(habit, today())
}

/// Progress toward the target as a whole percentage in `0..=100`
///
/// Habits without a target report 0. Completing more days than the target
/// is allowed, but the percentage stops at 100.
pub fn compute_progress_percent(habit: &Habit) -> u8 {
    let target = match habit.target {
        Some(target) if target > 0 => target as u64,
        _ => return 0,
    };

    let done = habit.completed_count() as u64;
    if done >= target {
        return 100;
    }

    // round(100 * done / target), halves rounding up
    ((200 * done + target) / (2 * target)) as u8
}

/// Whether the habit was done on `date`
pub fn is_completed_on(habit: &Habit, date: NaiveDate) -> bool {
    habit.is_completed_on(date)
}

/// Move a habit to `next`, keeping `is_completed` in step with the status
pub fn transition(habit: &Habit, next: HabitStatus) -> Result<Habit, DomainError> {
    if !habit.status.can_transition_to(next) {
        return Err(DomainError::InvalidTransition {
            from: habit.status,
            to: next,
        });
    }

    let mut updated = habit.clone();
    updated.status = next;
    updated.is_completed = next == HabitStatus::Completed;
    Ok(updated)
}

/// Mark an active habit as completed
pub fn complete(habit: &Habit) -> Result<Habit, DomainError> {
    transition(habit, HabitStatus::Completed)
}

/// Archive an active habit
///
/// The `is_completed` flag follows the status, so it ends up false.
pub fn archive(habit: &Habit) -> Result<Habit, DomainError> {
    transition(habit, HabitStatus::Archived)
}
