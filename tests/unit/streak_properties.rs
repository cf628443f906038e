/// Streak engine behaviour pinned against fixed dates
use habit_streaks::*;

fn d(s: &str) -> LogDate {
    LogDate::parse(s).unwrap()
}

/// `(date, completed)` pairs for the `n` days ending at `end`, all completed
fn run_ending(end: LogDate, n: u64) -> Vec<(LogDate, bool)> {
    (0..n)
        .rev()
        .map(|back| (end.sub_days(back).unwrap(), true))
        .collect()
}

#[cfg(test)]
mod current_streak_tests {
    use super::*;

    #[test]
    fn test_empty_history_has_no_streak() {
        let empty: Vec<(LogDate, bool)> = Vec::new();
        for today in ["2024-01-01", "2024-02-29", "2030-12-31"] {
            assert_eq!(current_streak(&empty, d(today)), 0);
        }
    }

    #[test]
    fn test_completed_today_only() {
        let today = d("2024-05-10");
        assert_eq!(current_streak(&[(today, true)], today), 1);
    }

    #[test]
    fn test_yesterday_counts_while_today_is_open() {
        let today = d("2024-05-10");
        assert_eq!(current_streak(&[(d("2024-05-09"), true)], today), 1);
    }

    #[test]
    fn test_grace_is_a_single_day() {
        let today = d("2024-05-10");
        assert_eq!(current_streak(&[(d("2024-05-08"), true)], today), 0);
    }

    #[test]
    fn test_unchecked_today_does_not_break_run() {
        let today = d("2024-05-10");
        let mut logs = run_ending(d("2024-05-09"), 5);
        logs.push((today, false));
        assert_eq!(current_streak(&logs, today), 5);
    }

    #[test]
    fn test_consecutive_run_ending_today() {
        let today = d("2024-03-02");
        for n in 1..=40 {
            let logs = run_ending(today, n);
            assert_eq!(current_streak(&logs, today), n as u32, "run of {}", n);
        }
    }

    #[test]
    fn test_gap_caps_streak_at_run_next_to_today() {
        let today = d("2024-03-02");
        let mut logs = run_ending(today, 10);
        // Knock out the 4th most recent day
        logs[6].1 = false;
        assert_eq!(current_streak(&logs, today), 3);

        let without = [&logs[..6], &logs[7..]].concat();
        assert_eq!(current_streak(&without, today), 3);
    }

    #[test]
    fn test_streak_crosses_month_and_leap_day() {
        let today = d("2024-03-01");
        let logs = vec![
            (d("2024-02-27"), true),
            (d("2024-02-28"), true),
            (d("2024-02-29"), true),
            (today, true),
        ];
        assert_eq!(current_streak(&logs, today), 4);
    }

    #[test]
    fn test_streak_crosses_year_end() {
        let today = d("2025-01-01");
        let logs = vec![(d("2024-12-30"), true), (d("2024-12-31"), true)];
        assert_eq!(current_streak(&logs, today), 2);
    }
}

#[cfg(test)]
mod longest_streak_tests {
    use super::*;

    #[test]
    fn test_empty_and_single() {
        let empty: Vec<(LogDate, bool)> = Vec::new();
        assert_eq!(longest_streak(&empty), 0);
        assert_eq!(longest_streak(&[(d("2024-01-01"), true)]), 1);
        assert_eq!(longest_streak(&[(d("2024-01-01"), false)]), 0);
    }

    #[test]
    fn test_order_does_not_matter() {
        let mut logs = run_ending(d("2024-06-30"), 6);
        logs.extend(run_ending(d("2024-06-20"), 4));
        let expected = longest_streak(&logs);
        assert_eq!(expected, 6);

        let mut reversed = logs.clone();
        reversed.reverse();
        assert_eq!(longest_streak(&reversed), expected);

        // Deterministic interleave of both halves
        let (front, back) = logs.split_at(logs.len() / 2);
        let mut shuffled = Vec::new();
        for i in 0..front.len().max(back.len()) {
            if let Some(item) = back.get(i) {
                shuffled.push(*item);
            }
            if let Some(item) = front.get(i) {
                shuffled.push(*item);
            }
        }
        assert_eq!(longest_streak(&shuffled), expected);
    }

    #[test]
    fn test_grows_with_consecutive_days() {
        let start = d("2023-12-25");
        let mut logs = Vec::new();
        let mut previous = 0;
        for offset in 0..20 {
            logs.push((start.add_days(offset).unwrap(), true));
            let longest = longest_streak(&logs);
            assert!(longest >= previous);
            previous = longest;
        }
        assert_eq!(previous, 20);
    }

    #[test]
    fn test_independent_of_today() {
        let logs = run_ending(d("2022-01-10"), 10);
        assert_eq!(longest_streak(&logs), 10);
        assert_eq!(current_streak(&logs, d("2024-01-01")), 0);
    }

    #[test]
    fn test_equal_runs_are_not_summed() {
        // D-6..D-4 done, D-3 missing, D-2..D done
        let today = d("2024-08-15");
        let mut logs = run_ending(d("2024-08-11"), 3);
        logs.extend(run_ending(today, 3));

        assert_eq!(current_streak(&logs, today), 3);
        assert_eq!(longest_streak(&logs), 3);
    }

    #[test]
    fn test_duplicate_day_last_one_wins() {
        let day = d("2024-04-04");
        assert_eq!(longest_streak(&[(day, true), (day, false)]), 0);
        assert_eq!(longest_streak(&[(day, false), (day, true)]), 1);
    }
}

#[cfg(test)]
mod rate_and_date_tests {
    use super::*;

    #[test]
    fn test_completion_rate_bounds() {
        let empty: Vec<(LogDate, bool)> = Vec::new();
        assert_eq!(completion_rate(&empty), 0);
        assert_eq!(completion_rate(&run_ending(d("2024-01-31"), 9)), 100);
        assert_eq!(completion_rate(&[(d("2024-01-01"), false)]), 0);
    }

    #[test]
    fn test_completion_rate_rounds() {
        let logs = vec![
            (d("2024-01-01"), true),
            (d("2024-01-02"), false),
            (d("2024-01-03"), false),
        ];
        assert_eq!(completion_rate(&logs), 33);

        let two_of_three = vec![
            (d("2024-01-01"), true),
            (d("2024-01-02"), true),
            (d("2024-01-03"), false),
        ];
        assert_eq!(completion_rate(&two_of_three), 67);
    }

    #[test]
    fn test_consecutive_day_check() {
        assert!(is_consecutive_day(d("2024-02-28"), d("2024-02-29")));
        assert!(is_consecutive_day(d("2024-02-29"), d("2024-03-01")));
        assert!(is_consecutive_day(d("2023-02-28"), d("2023-03-01")));
        assert!(is_consecutive_day(d("2024-12-31"), d("2025-01-01")));
        assert!(!is_consecutive_day(d("2024-01-02"), d("2024-01-01")));
        assert!(!is_consecutive_day(d("2024-01-01"), d("2024-01-01")));
        assert!(!is_consecutive_day(d("2024-01-01"), d("2024-01-03")));
    }

    #[test]
    fn test_consecutive_day_check_rejects_malformed_dates() {
        assert!(is_consecutive_day_str("2024-01-31", "2024-02-01").unwrap());
        assert!(is_consecutive_day_str("2024-01-31", "2024-02-30").is_err());
        assert!(is_consecutive_day_str("yesterday", "2024-02-01").is_err());
    }

    #[test]
    fn test_stats_from_habit_logs() {
        let habit_id = HabitId::new();
        let today = d("2024-07-04");
        let logs = vec![
            HabitLog::new(habit_id.clone(), d("2024-07-01"), true),
            HabitLog::new(habit_id.clone(), d("2024-07-02"), false),
            HabitLog::new(habit_id.clone(), d("2024-07-03"), true),
            HabitLog::new(habit_id.clone(), today, true),
        ];

        let stats = StreakStats::calculate(habit_id, &logs, today);
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.longest_streak, 2);
        assert_eq!(stats.total_completions, 3);
        assert_eq!(stats.completion_rate, 75);
        assert_eq!(stats.last_completed, Some(today));
        assert!(stats.is_active(today));
        assert_eq!(stats.tier(), StreakTier::GettingStarted);
    }
}
