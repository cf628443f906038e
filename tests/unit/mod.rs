/// Unit test suite: pure streak and aggregation behaviour
mod aggregator_scenarios;
mod basic_tests;
mod streak_properties;
