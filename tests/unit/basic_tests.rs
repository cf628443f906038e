/// Basic unit tests to verify core functionality
use habit_streaks::*;
use tempfile::NamedTempFile;

#[cfg(test)]
mod basic_unit_tests {
    use super::*;

    #[test]
    fn test_habit_creation() {
        let habit = Habit::new(
            "  Test Habit ".to_string(),
            Some("A test habit".to_string()),
            Category::Health,
            Frequency::Daily,
            1,
            None,
            None,
        );

        assert!(habit.is_ok());
        let habit = habit.unwrap();
        assert_eq!(habit.name, "Test Habit");
        assert_eq!(habit.color, DEFAULT_COLOR);
        assert_eq!((habit.current_streak, habit.longest_streak), (0, 0));
    }

    #[test]
    fn test_habit_validation() {
        let empty = Habit::new(
            "   ".to_string(),
            None,
            Category::Other,
            Frequency::Daily,
            1,
            None,
            None,
        );
        assert!(empty.is_err());

        let no_target = Habit::new(
            "Gym".to_string(),
            None,
            Category::Fitness,
            Frequency::Weekly,
            0,
            None,
            None,
        );
        assert!(no_target.is_err());
    }

    #[test]
    fn test_habit_log_creation() {
        let habit_id = HabitId::new();
        let day = LogDate::parse("2024-03-01").unwrap();

        let log = HabitLog::new(habit_id.clone(), day, true)
            .with_note(Some("Great work!".to_string()))
            .unwrap();

        assert_eq!(log.habit_id, habit_id);
        assert_eq!(log.date, day);
        assert_eq!(log.completed_count, 1);
        assert!(log.has_note());
    }

    #[test]
    fn test_category_and_frequency_parsing() {
        assert_eq!(Category::parse("Fitness").unwrap(), Category::Fitness);
        assert!(Category::parse("hobbies").is_err());
        assert_eq!(Frequency::parse("weekly").unwrap(), Frequency::Weekly);
        assert_eq!(Frequency::Daily.as_str(), "daily");
    }

    #[test]
    fn test_dates_are_canonical() {
        let day: LogDate = "2024-02-29".parse().unwrap();
        assert_eq!(day.to_string(), "2024-02-29");
        assert!(LogDate::parse("2023-02-29").is_err());
        assert!(LogDate::parse("2024-2-29").is_err());
        assert!(LogDate::parse("").is_err());
    }

    #[tokio::test]
    async fn test_server_creation() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let server = HabitTrackerServer::new(temp_file.path().to_path_buf()).await;
        assert!(server.is_ok());
    }

    #[test]
    fn test_server_uses_its_clock() {
        let day = LogDate::parse("2024-12-31").unwrap();
        let server = HabitTrackerServer::in_memory()
            .unwrap()
            .with_clock(FixedClock(day));
        assert_eq!(server.today(), day);
    }

    #[test]
    fn test_storage_creation() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path().to_path_buf());
        assert!(storage.is_ok());
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.analytics, AnalyticsConfig::default());
        assert!(config.database.is_none());

        let engine = AnalyticsEngine::with_config(config.analytics);
        assert_eq!(engine.config().heatmap_days, 84);
    }
}
