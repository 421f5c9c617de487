use chrono::NaiveDate;
use uuid::Uuid;

use day_planner::error::ScheduleError;
use day_planner::logic::{
    category_breakdown, check_placement, check_recurring_slot, materialize, overlaps,
};
use day_planner::models::{Category, RecurringAppointment, ScheduledTask, TaskSnapshot};

fn entry(name: &str, category: Category, start_hour: f64, duration: f64) -> ScheduledTask {
    let id = Uuid::new_v4();
    ScheduledTask {
        id,
        task: TaskSnapshot {
            id,
            name: name.into(),
            category,
            color: category.color().into(),
            duration,
        },
        start_hour,
    }
}

fn weekly(name: &str, day_of_week: u8, start_hour: f64, duration: f64) -> RecurringAppointment {
    let category = Category::Work;
    RecurringAppointment {
        id: Uuid::new_v4(),
        name: name.into(),
        category,
        color: category.color().into(),
        duration,
        start_hour,
        day_of_week,
    }
}

// 2024-06-03 was a Monday.
fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
}

#[test]
fn test_overlap_is_symmetric() {
    let pairs = [
        ((0.0, 2.0), (1.0, 3.0)),
        ((0.0, 2.0), (2.0, 4.0)),
        ((8.5, 10.5), (8.0, 9.0)),
        ((0.0, 24.0), (12.0, 12.5)),
    ];
    for ((s1, e1), (s2, e2)) in pairs {
        assert_eq!(
            overlaps(s1, e1, s2, e2),
            overlaps(s2, e2, s1, e1),
            "asymmetry for [{s1},{e1}) vs [{s2},{e2})"
        );
    }
}

#[test]
fn test_touching_intervals_do_not_collide() {
    assert!(!overlaps(0.0, 2.0, 2.0, 4.0));
    assert!(overlaps(0.0, 2.5, 2.0, 4.0));
}

#[test]
fn test_placement_rejects_input_errors_before_collisions() {
    // end == start is an input error even on an empty day
    assert_eq!(
        check_placement(5.0, 5.0, &[]),
        Err(ScheduleError::EndBeforeStart)
    );
    assert_eq!(
        check_placement(6.0, 5.0, &[]),
        Err(ScheduleError::EndBeforeStart)
    );
    assert_eq!(
        check_placement(-1.0, 2.0, &[]),
        Err(ScheduleError::StartOutOfRange(-1.0))
    );
    assert_eq!(
        check_placement(23.5, 24.5, &[]),
        Err(ScheduleError::TimeBoundsExceeded { end: 24.5 })
    );
    // ending exactly at 24:00 is fine
    assert_eq!(check_placement(23.0, 24.0, &[]), Ok(()));
}

#[test]
fn test_placement_names_the_conflicting_interval() {
    let existing = vec![entry("Gym", Category::Exercise, 8.0, 1.0)];
    // 8.5 < 9 and 10.5 > 8
    assert_eq!(
        check_placement(8.5, 10.5, &existing),
        Err(ScheduleError::Overlap {
            start: 8.0,
            end: 9.0
        })
    );
    // the slot right after is free
    assert_eq!(check_placement(9.0, 10.0, &existing), Ok(()));
}

#[test]
fn test_recurring_slot_only_checks_matching_weekday() {
    let existing = vec![weekly("Standup", 1, 10.0, 1.0)];
    assert_eq!(
        check_recurring_slot(10.5, 11.5, 1, &existing),
        Err(ScheduleError::Overlap {
            start: 10.0,
            end: 11.0
        })
    );
    // same hours on another weekday are free
    assert_eq!(check_recurring_slot(10.5, 11.5, 2, &existing), Ok(()));
    // bounds still apply
    assert_eq!(
        check_recurring_slot(23.5, 24.5, 3, &existing),
        Err(ScheduleError::TimeBoundsExceeded { end: 24.5 })
    );
}

#[test]
fn test_materialize_projects_matching_weekday_only() {
    let standup = weekly("Standup", 1, 9.0, 0.5);
    let recurring = vec![standup.clone(), weekly("Review", 3, 14.0, 1.0)];

    let schedule = materialize(monday(), &[], &recurring);
    assert_eq!(schedule.len(), 1);
    assert_eq!(schedule[0].id, standup.id);
    assert_eq!(schedule[0].task.id, standup.id);
    assert_eq!(schedule[0].start_hour, 9.0);

    // Tuesday has neither
    let tuesday = NaiveDate::from_ymd_opt(2024, 6, 4).unwrap();
    assert!(materialize(tuesday, &[], &recurring).is_empty());
}

#[test]
fn test_materialize_drops_colliding_occurrence() {
    // recurring Monday 10:00-11:00, single-day entry 10:30-11:30
    let recurring = vec![weekly("Standup", 1, 10.0, 1.0)];
    let day = vec![entry("Dentist", Category::Other, 10.5, 1.0)];

    let schedule = materialize(monday(), &day, &recurring);
    assert_eq!(schedule.len(), 1);
    assert_eq!(schedule[0].task.name, "Dentist");
}

#[test]
fn test_materialize_is_deterministic() {
    let recurring = vec![weekly("Standup", 1, 9.0, 0.5), weekly("Lunch", 1, 12.0, 1.0)];
    let day = vec![
        entry("Gym", Category::Exercise, 7.0, 1.0),
        entry("Study", Category::Study, 10.0, 2.0),
    ];
    let first = materialize(monday(), &day, &recurring);
    let second = materialize(monday(), &day, &recurring);
    assert_eq!(first, second);
}

#[test]
fn test_materialize_sorts_by_start_hour() {
    // inserted 9, 14, 11 -> comes back 9, 11, 14
    let day = vec![
        entry("A", Category::Work, 9.0, 1.0),
        entry("B", Category::Work, 14.0, 1.0),
        entry("C", Category::Work, 11.0, 1.0),
    ];
    let schedule = materialize(monday(), &day, &[]);
    let starts: Vec<f64> = schedule.iter().map(|st| st.start_hour).collect();
    assert_eq!(starts, vec![9.0, 11.0, 14.0]);
}

#[test]
fn test_materialize_interleaves_projections_by_start_hour() {
    let day = vec![
        entry("Errand", Category::Other, 9.0, 0.5),
        entry("Study", Category::Study, 11.0, 1.0),
    ];
    let recurring = vec![weekly("Call", 1, 10.0, 0.5)];
    let schedule = materialize(monday(), &day, &recurring);
    let names: Vec<&str> = schedule.iter().map(|st| st.task.name.as_str()).collect();
    assert_eq!(names, vec!["Errand", "Call", "Study"]);
}

#[test]
fn test_breakdown_aggregates_by_category() {
    let day = vec![
        entry("Read", Category::Study, 8.0, 1.5),
        entry("Meeting", Category::Work, 10.0, 1.0),
        entry("Flashcards", Category::Study, 13.0, 0.5),
    ];
    let shares = category_breakdown(&day);
    assert_eq!(shares.len(), 2);
    assert_eq!(shares[0].category, Category::Study);
    assert_eq!(shares[0].hours, 2.0);
    assert_eq!(shares[0].color, Category::Study.color());
    assert_eq!(shares[1].category, Category::Work);
    assert_eq!(shares[1].hours, 1.0);
    assert!(category_breakdown(&[]).is_empty());
}
