/// A week of check-ins driven through the tool layer
use habit_streaks::tools::*;
use habit_streaks::*;

fn d(s: &str) -> LogDate {
    LogDate::parse(s).unwrap()
}

fn create(storage: &SqliteStorage, name: &str, frequency: &str, target: u32) -> Habit {
    create_habit(
        storage,
        CreateHabitParams {
            name: name.to_string(),
            frequency: Some(frequency.to_string()),
            target_frequency: Some(target),
            category: Some("fitness".to_string()),
            ..Default::default()
        },
    )
    .expect("habit created")
    .habit
}

fn toggle(storage: &SqliteStorage, engine: &AnalyticsEngine, today: &str, habit: &Habit, day: &str) {
    toggle_habit(
        storage,
        engine,
        d(today),
        ToggleHabitParams {
            habit_id: habit.id.to_string(),
            date: Some(day.to_string()),
        },
    )
    .expect("toggle succeeded");
}

#[cfg(test)]
mod checkin_workflow_tests {
    use super::*;

    #[test]
    fn test_week_of_checkins() {
        let storage = SqliteStorage::in_memory().unwrap();
        let engine = AnalyticsEngine::new();
        let run = create(&storage, "Run", "daily", 1);
        let gym = create(&storage, "Gym", "weekly", 3);

        // Monday 2024-06-03 .. Sunday 2024-06-09, run skips Thursday
        for day in ["2024-06-03", "2024-06-04", "2024-06-05", "2024-06-07", "2024-06-08"] {
            toggle(&storage, &engine, "2024-06-08", &run, day);
        }
        for day in ["2024-06-03", "2024-06-05", "2024-06-07"] {
            toggle(&storage, &engine, "2024-06-08", &gym, day);
        }

        // Sunday morning, nothing checked yet: the run streak survives on grace
        let status = get_habit_status(&storage, &engine, d("2024-06-09"), StatusParams::default())
            .unwrap();
        assert_eq!(status.completed_count, 0);
        let run_status = status.habits.iter().find(|h| h.name == "Run").unwrap();
        assert_eq!(run_status.current_streak, 2);
        let gym_status = status.habits.iter().find(|h| h.name == "Gym").unwrap();
        let weekly = gym_status.weekly.as_ref().unwrap();
        assert_eq!(weekly.completed_count, 3);
        assert!(weekly.goal_met);

        let cached = storage.get_habit(&run.id).unwrap();
        assert_eq!((cached.current_streak, cached.longest_streak), (2, 3));
    }

    #[test]
    fn test_backfilling_a_gap_joins_runs() {
        let storage = SqliteStorage::in_memory().unwrap();
        let engine = AnalyticsEngine::new();
        let run = create(&storage, "Run", "daily", 1);

        for day in ["2024-06-01", "2024-06-02", "2024-06-04", "2024-06-05"] {
            toggle(&storage, &engine, "2024-06-05", &run, day);
        }
        assert_eq!(storage.get_habit(&run.id).unwrap().current_streak, 2);

        toggle(&storage, &engine, "2024-06-05", &run, "2024-06-03");
        let cached = storage.get_habit(&run.id).unwrap();
        assert_eq!((cached.current_streak, cached.longest_streak), (5, 5));

        // Undo the backfill
        toggle(&storage, &engine, "2024-06-05", &run, "2024-06-03");
        let cached = storage.get_habit(&run.id).unwrap();
        assert_eq!((cached.current_streak, cached.longest_streak), (2, 2));
    }

    #[test]
    fn test_archived_habits_leave_the_dashboard() {
        let storage = SqliteStorage::in_memory().unwrap();
        let engine = AnalyticsEngine::new();
        let run = create(&storage, "Run", "daily", 1);
        let swim = create(&storage, "Swim", "daily", 1);
        toggle(&storage, &engine, "2024-06-05", &run, "2024-06-05");
        toggle(&storage, &engine, "2024-06-05", &swim, "2024-06-05");

        update_habit(
            &storage,
            UpdateHabitParams {
                habit_id: swim.id.to_string(),
                is_active: Some(false),
                ..Default::default()
            },
        )
        .unwrap();

        let stats = get_overall_stats(&storage, &engine, d("2024-06-05")).unwrap();
        assert_eq!(stats.stats.total_habits, 1);
        assert_eq!(stats.stats.completed_today, 1);

        let all = list_habits(
            &storage,
            ListHabitsParams {
                active_only: Some(false),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(all.total_habits, 2);
        assert_eq!(all.active_habits, 1);
    }

    #[test]
    fn test_recalculate_repairs_drift() {
        let storage = SqliteStorage::in_memory().unwrap();
        let engine = AnalyticsEngine::new();
        let run = create(&storage, "Run", "daily", 1);
        toggle(&storage, &engine, "2024-06-05", &run, "2024-06-04");
        toggle(&storage, &engine, "2024-06-05", &run, "2024-06-05");

        // Corrupt the cache behind the engine's back
        storage.update_cached_streaks(&run.id, 40, 40).unwrap();

        let repaired = recalculate_streaks(&storage, &engine, d("2024-06-05")).unwrap();
        assert_eq!(repaired.summary.habits_checked, 1);
        assert_eq!(repaired.summary.habits_updated, 1);
        let cached = storage.get_habit(&run.id).unwrap();
        assert_eq!((cached.current_streak, cached.longest_streak), (2, 2));

        // A week later the current streak has lapsed but the record stays
        let later = recalculate_streaks(&storage, &engine, d("2024-06-12")).unwrap();
        assert_eq!(later.summary.habits_updated, 1);
        let cached = storage.get_habit(&run.id).unwrap();
        assert_eq!((cached.current_streak, cached.longest_streak), (0, 2));
    }
}
