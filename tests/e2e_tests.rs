//! End-to-end integration tests
//!
//! These tests validate the complete processing pipeline using predefined
//! fixture directories. Each fixture holds:
//! - `config.toml` - marketplace configuration
//! - `input.csv` - the operation file
//! - `expected_courses.csv` / `expected_accounts.csv` - the two reports
//!
//! Fixtures cover:
//! - The full create → purchase → deactivate → repurchase lifecycle
//! - Purchases under derived key lookup
//! - Pause gating and treasury withdrawals
//! - Rollback when the recipient of a transfer rejects it
//! - Ownership transfer and self-destruct
//! - Malformed rows and missing fields
//!
//! Every fixture is run with both strategies and both reports.

#[cfg(test)]
mod tests {
    use course_marketplace_engine::cli::StrategyType;
    use course_marketplace_engine::config::MarketplaceConfig;
    use course_marketplace_engine::strategy::{create_strategy, BatchConfig, ReportKind, RunSettings};
    use rstest::rstest;
    use std::fs;
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;

    /// Run a fixture and compare the selected report with the expected file
    ///
    /// # Panics
    ///
    /// Panics if fixture files cannot be read or the output differs.
    fn run_test_fixture(fixture_name: &str, strategy_type: StrategyType, report: ReportKind) {
        let fixture_dir = format!("tests/fixtures/{}", fixture_name);
        let input_path = format!("{}/input.csv", fixture_dir);
        let config_path = format!("{}/config.toml", fixture_dir);
        let expected_path = match report {
            ReportKind::Courses => format!("{}/expected_courses.csv", fixture_dir),
            ReportKind::Accounts => format!("{}/expected_accounts.csv", fixture_dir),
        };

        assert!(
            Path::new(&input_path).exists(),
            "Input file not found: {}",
            input_path
        );

        let config = MarketplaceConfig::load(Path::new(&config_path))
            .unwrap_or_else(|e| panic!("Failed to load {}: {}", config_path, e));

        // Small batches so the async pipeline crosses batch boundaries
        let strategy = create_strategy(
            strategy_type.clone(),
            RunSettings::new(config, report),
            Some(BatchConfig::new(3, 2)),
        );

        let mut temp_output = NamedTempFile::new().expect("Failed to create temp file");

        strategy
            .process(Path::new(&input_path), &mut temp_output)
            .unwrap_or_else(|e| panic!("Failed to process operations: {}", e));

        temp_output.flush().expect("Failed to flush temp file");

        let actual_output = fs::read_to_string(temp_output.path())
            .unwrap_or_else(|e| panic!("Failed to read temp output file: {}", e));

        let expected_output = fs::read_to_string(&expected_path)
            .unwrap_or_else(|e| panic!("Failed to read expected file {}: {}", expected_path, e));

        assert_eq!(
            actual_output, expected_output,
            "\n\nOutput mismatch for fixture: {} (strategy: {:?}, report: {:?})\n\nActual output:\n{}\n\nExpected output:\n{}\n",
            fixture_name, strategy_type, report, actual_output, expected_output
        );
    }

    /// End-to-end test for all fixtures with both strategies and both reports
    #[rstest]
    #[case("happy_path")]
    #[case("derived_lookup")]
    #[case("paused_system")]
    #[case("payment_failure_rollback")]
    #[case("self_destruct")]
    #[case("malformed_data")]
    fn test_fixtures(
        #[case] fixture: &str,
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
        #[values(ReportKind::Courses, ReportKind::Accounts)] report: ReportKind,
    ) {
        run_test_fixture(fixture, strategy, report);
    }

    #[rstest]
    fn test_missing_admin_is_fatal(
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
    ) {
        let strategy = create_strategy(
            strategy,
            RunSettings::new(MarketplaceConfig::default(), ReportKind::Courses),
            None,
        );
        let mut output = Vec::new();

        let result = strategy.process(Path::new("tests/fixtures/happy_path/input.csv"), &mut output);

        assert!(result.is_err());
        assert!(output.is_empty());
    }
}
