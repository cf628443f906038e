/// Status aggregation across habits: daily status, weekly goals, heatmap and dashboard
use habit_streaks::analytics::*;
use habit_streaks::*;

fn d(s: &str) -> LogDate {
    LogDate::parse(s).unwrap()
}

fn habit(name: &str, frequency: Frequency, target: u32) -> Habit {
    Habit::new(
        name.to_string(),
        None,
        Category::Other,
        frequency,
        target,
        None,
        None,
    )
    .unwrap()
}

fn done(habit: &Habit, day: &str) -> HabitLog {
    HabitLog::new(habit.id.clone(), d(day), true)
}

#[cfg(test)]
mod status_tests {
    use super::*;

    #[test]
    fn test_missing_log_means_not_completed() {
        let read = habit("Read", Frequency::Daily, 1);
        let walk = habit("Walk", Frequency::Daily, 1);
        let logs = group_logs_by_habit(vec![done(&read, "2024-06-03")]);

        let status = daily_status(&[read.clone(), walk.clone()], &logs, d("2024-06-03"));
        assert_eq!(status.len(), 2);
        assert!(status[0].is_completed_today);
        assert!(status[0].today_log.is_some());
        assert!(!status[1].is_completed_today);
        assert!(status[1].today_log.is_none());
    }

    #[test]
    fn test_weekly_goal_scenario() {
        let gym = habit("Gym", Frequency::Weekly, 3);
        // Week of Monday 2024-06-03
        let week = week_bounds(d("2024-06-05"), chrono::Weekday::Mon);
        assert_eq!(week.start, d("2024-06-03"));
        assert_eq!(week.end, d("2024-06-09"));

        let logs = vec![
            done(&gym, "2024-06-02"),
            done(&gym, "2024-06-03"),
            done(&gym, "2024-06-06"),
            done(&gym, "2024-06-09"),
            done(&gym, "2024-06-10"),
        ];

        let progress = weekly_progress(&gym, &logs, week.start, week.end).unwrap();
        assert_eq!(progress.completed_count, 3);
        assert_eq!(progress.target, 3);
        assert!(progress.goal_met);
        assert_eq!(progress.remaining(), 0);
    }

    #[test]
    fn test_week_boundaries_come_from_caller() {
        let gym = habit("Gym", Frequency::Weekly, 2);
        let logs = vec![done(&gym, "2024-06-02"), done(&gym, "2024-06-03")];

        // Sunday-start week containing both days
        let sunday_week = week_bounds(d("2024-06-03"), chrono::Weekday::Sun);
        let progress = weekly_progress(&gym, &logs, sunday_week.start, sunday_week.end).unwrap();
        assert_eq!(progress.completed_count, 2);
        assert!(progress.goal_met);

        let monday_week = week_bounds(d("2024-06-03"), chrono::Weekday::Mon);
        let progress = weekly_progress(&gym, &logs, monday_week.start, monday_week.end).unwrap();
        assert_eq!(progress.completed_count, 1);
        assert_eq!(progress.remaining(), 1);
    }

    #[test]
    fn test_daily_habits_have_no_weekly_progress() {
        let read = habit("Read", Frequency::Daily, 1);
        let logs = vec![done(&read, "2024-06-03")];
        assert!(weekly_progress(&read, &logs, d("2024-06-03"), d("2024-06-09")).is_none());
    }
}

#[cfg(test)]
mod heatmap_tests {
    use super::*;

    #[test]
    fn test_heatmap_edges() {
        assert_eq!(heatmap_level(0, 0).as_u8(), 0);
        for total in 1..=12 {
            assert_eq!(heatmap_level(0, total).as_u8(), 0);
            assert_eq!(heatmap_level(total, total).as_u8(), 4);
        }
    }

    #[test]
    fn test_heatmap_monotonic() {
        for total in 1..=20 {
            let mut previous = 0;
            for completed in 0..=total {
                let level = heatmap_level(completed, total).as_u8();
                assert!(level >= previous, "{}/{} dropped a level", completed, total);
                previous = level;
            }
        }
    }

    #[test]
    fn test_heatmap_quarter_boundaries() {
        assert_eq!(heatmap_level(1, 5).as_u8(), 1);
        assert_eq!(heatmap_level(1, 4).as_u8(), 2);
        assert_eq!(heatmap_level(2, 4).as_u8(), 3);
        assert_eq!(heatmap_level(3, 4).as_u8(), 4);
    }
}

#[cfg(test)]
mod overview_tests {
    use super::*;

    #[test]
    fn test_no_habits_is_all_zero() {
        let stats = overall_stats(&[], &[], d("2024-06-09"));
        assert_eq!(stats.total_habits, 0);
        assert_eq!(stats.best_streak, 0);
        assert_eq!(stats.weekly_completion_rate, 0);
        assert_eq!(stats.monthly_completion_rate, 0);
    }

    #[test]
    fn test_dashboard_rollup() {
        let today = d("2024-06-09");
        let mut read = habit("Read", Frequency::Daily, 1);
        let mut walk = habit("Walk", Frequency::Daily, 1);

        let mut logs: Vec<HabitLog> = ["2024-06-03", "2024-06-04", "2024-06-05", "2024-06-06"]
            .iter()
            .map(|day| done(&read, day))
            .collect();
        logs.push(done(&read, "2024-06-09"));
        logs.push(done(&walk, "2024-06-09"));
        logs.push(HabitLog::new(walk.id.clone(), d("2024-06-08"), false));

        read.set_cached_streaks(1, 4);
        walk.set_cached_streaks(1, 1);

        let stats = overall_stats(&[read, walk], &logs, today);
        assert_eq!(stats.total_habits, 2);
        assert_eq!(stats.completed_today, 2);
        assert_eq!(stats.total_today, 2);
        assert_eq!(stats.best_streak, 4);
        assert_eq!(stats.total_completions, 6);
        // 6 of 14 in the last week
        assert_eq!(stats.weekly_completion_rate, 43);
        // 6 of 60 in the last 30 days
        assert_eq!(stats.monthly_completion_rate, 10);
    }

    #[test]
    fn test_daily_breakdown_feeds_heatmap() {
        let today = d("2024-06-09");
        let read = habit("Read", Frequency::Daily, 1);
        let walk = habit("Walk", Frequency::Daily, 1);
        let logs = vec![
            done(&read, "2024-06-08"),
            done(&read, "2024-06-09"),
            done(&walk, "2024-06-09"),
        ];

        let days = daily_breakdown(&[read, walk], &logs, today, 3);
        assert_eq!(days.len(), 3);
        assert_eq!(days[0].date, d("2024-06-07"));
        assert_eq!(days[0].level.as_u8(), 0);
        assert_eq!(days[1].percentage, 50);
        assert_eq!(days[1].level.as_u8(), 3);
        assert_eq!(days[2].level.as_u8(), 4);
    }

    #[test]
    fn test_completion_stats_over_range() {
        let read = habit("Read", Frequency::Daily, 1);
        let logs = vec![done(&read, "2024-06-01"), done(&read, "2024-06-02")];
        let stats = completion_stats(&[read], &logs, d("2024-06-01"), d("2024-06-04"));
        assert_eq!(stats.total_possible, 4);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.percentage, 50);
    }

    #[test]
    fn test_best_habits_orders_by_current_streak() {
        let mut a = habit("A", Frequency::Daily, 1);
        let mut b = habit("B", Frequency::Daily, 1);
        let c = habit("C", Frequency::Daily, 1);
        a.set_cached_streaks(2, 9);
        b.set_cached_streaks(5, 5);

        let habits = [a, b, c];
        let best: Vec<&str> = best_habits(&habits, 2)
            .into_iter()
            .map(|h| h.name.as_str())
            .collect();
        assert_eq!(best, vec!["B", "A"]);
    }
}
