//! Benchmark suite for comparing processing strategies
//!
//! This benchmark compares the synchronous and the pipelined asynchronous
//! strategy using the divan benchmarking framework.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```
//!
//! Operation files are generated into temporary files before timing starts.
//! Each file creates `n` courses, sells every one of them to a second
//! identity, and deactivates and reprices every other course.

use course_marketplace_engine::cli::StrategyType;
use course_marketplace_engine::config::{MarketplaceConfig, PurchaseLookup};
use course_marketplace_engine::strategy::{create_strategy, BatchConfig, ReportKind, RunSettings};
use course_marketplace_engine::Identity;
use std::io::Write;
use tempfile::NamedTempFile;

const SIZES: &[usize] = &[100, 1_000, 10_000];

fn main() {
    divan::main();
}

fn identity(last: u8) -> Identity {
    let mut bytes = [0u8; 20];
    bytes[19] = last;
    Identity::new(bytes)
}

fn operations_file(courses: usize) -> NamedTempFile {
    let admin = identity(0xad);
    let proof = format!("0x{}", "01".repeat(32));
    let mut file = NamedTempFile::new().expect("Failed to create temp file");

    writeln!(file, "op,caller,course,proof,amount,target").expect("Failed to write header");
    for index in 0..courses {
        let seller = identity((index % 200) as u8 + 1);
        let buyer = identity((index % 200) as u8 + 2);
        writeln!(file, "create,{seller},,{proof},100,").expect("Failed to write row");
        writeln!(file, "purchase,{buyer},{index},{proof},150,").expect("Failed to write row");
        if index % 2 == 0 {
            writeln!(file, "deactivate,{admin},{index},,,").expect("Failed to write row");
            writeln!(file, "repurchase,{buyer},{index},,50,").expect("Failed to write row");
        }
    }
    file.flush().expect("Failed to flush temp file");
    file
}

fn settings() -> RunSettings {
    let config = MarketplaceConfig {
        purchase_lookup: PurchaseLookup::Indexed,
        ..MarketplaceConfig::with_admin(identity(0xad))
    };
    RunSettings::new(config, ReportKind::Courses)
}

/// Benchmark synchronous processing strategy
#[divan::bench(args = SIZES)]
fn sync_strategy(bencher: divan::Bencher, courses: usize) {
    let file = operations_file(courses);
    let strategy = create_strategy(StrategyType::Sync, settings(), None);

    bencher.bench_local(|| {
        let mut output = Vec::new();
        strategy
            .process(file.path(), &mut output)
            .expect("Processing failed");
    });
}

/// Benchmark pipelined asynchronous processing strategy
#[divan::bench(args = SIZES)]
fn async_strategy(bencher: divan::Bencher, courses: usize) {
    let file = operations_file(courses);
    let strategy = create_strategy(StrategyType::Async, settings(), Some(BatchConfig::default()));

    bencher.bench_local(|| {
        let mut output = Vec::new();
        strategy
            .process(file.path(), &mut output)
            .expect("Processing failed");
    });
}
