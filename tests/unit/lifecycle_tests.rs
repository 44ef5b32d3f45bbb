/// Lifecycle engine behaviour through the public API
use chrono::{Duration, NaiveDate};
use habit_ledger::*;

fn habit(target: Option<u32>) -> Habit {
    let mut habit = Habit::create(NewHabit {
        title: "Practice guitar".to_string(),
        description: Some("20 minutes".to_string()),
        target: Some(1),
    })
    .expect("valid habit");
    habit.target = target;
    habit
}

fn date(s: &str) -> NaiveDate {
    parse_date(s).expect("valid date")
}

#[test]
fn test_new_habit_starts_active_and_empty() {
    let habit = Habit::create(NewHabit {
        title: "Sleep by 11".to_string(),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(habit.status, HabitStatus::Active);
    assert!(!habit.is_completed);
    assert!(habit.completed_dates.is_empty());
    assert_eq!(habit.target, Some(DEFAULT_TARGET));
}

#[test]
fn test_toggle_symmetry_for_any_state() {
    let days = ["2024-01-01", "2024-02-29", "2030-12-31"];
    let habits = vec![
        habit(Some(3)),
        habit(None),
        complete(&habit(Some(3))).unwrap(),
        archive(&habit(Some(3))).unwrap(),
    ];

    for h in &habits {
        for day in days {
            let once = toggle_completion_for_date(h, date(day));
            let twice = toggle_completion_for_date(&once.habit, date(day));
            assert_eq!(&twice.habit, h);
        }
    }
}

#[test]
fn test_target_signal_sequence() {
    let start = habit(Some(2));
    let first = toggle_completion_for_date(&start, date("2024-09-01"));
    let second = toggle_completion_for_date(&first.habit, date("2024-09-02"));
    let third = toggle_completion_for_date(&second.habit, date("2024-09-03"));
    let undo = toggle_completion_for_date(&third.habit, date("2024-09-03"));

    assert!(!first.target_reached);
    assert!(second.target_reached);
    // over-completion keeps counting
    assert!(third.target_reached);
    assert_eq!(third.habit.completed_count(), 3);
    assert!(undo.target_reached);
}

#[test]
fn test_progress_matches_rounded_ratio() {
    let base = date("2024-01-01");
    for target in [1u32, 3, 7, 21, 30] {
        for n in 0..=(target + 5) {
            let mut h = habit(Some(target));
            for i in 0..n {
                h.completed_dates.insert(base + Duration::days(i as i64));
            }

            let expected = if n >= target {
                100
            } else {
                (100.0 * n as f64 / target as f64).round() as u8
            };
            assert_eq!(compute_progress_percent(&h), expected, "{}/{}", n, target);
        }
    }
}

#[test]
fn test_progress_example_values() {
    let mut h = habit(Some(21));
    let base = date("2024-01-01");
    for i in 0..7 {
        h.completed_dates.insert(base + Duration::days(i));
    }
    assert_eq!(compute_progress_percent(&h), 33);
    assert_eq!(compute_progress_percent(&habit(None)), 0);
}

#[test]
fn test_today_toggle_uses_current_date() {
    let outcome = toggle_completion_for_today(&habit(Some(5)));
    assert!(is_completed_on(&outcome.habit, today()));
}

#[test]
fn test_filters_and_counts_over_lifecycle() {
    let habits = vec![
        habit(Some(2)),
        complete(&habit(Some(2))).unwrap(),
        archive(&habit(Some(2))).unwrap(),
    ];
    let counts = StatusCounts::from_habits(&habits);
    assert_eq!(counts.for_filter(StatusFilter::All), 3);
    assert_eq!(counts.for_filter(StatusFilter::Active), 1);
    assert_eq!(StatusFilter::Completed.apply(&habits).len(), 1);
    assert_eq!(HabitStatus::Active.display_name(), "In Progress");
}
