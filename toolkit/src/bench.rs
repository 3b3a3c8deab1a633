use std::env;
use std::error::Error;

use rand::prelude::*;
use serde::Serialize;

use viskit_lib::settings::BenchSettings;
use viskit_lib::workload;

#[derive(Debug, Serialize)]
struct BenchResults {
    avg_elapsed_ms: f64,
    avg_removed: f64,
    avg_reprioritized: f64,
    all_consistent: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logger
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env::set_var("RUST_BACKTRACE", "1");
    env_logger::init();

    let args: Vec<_> = env::args().collect();
    let settings = match BenchSettings::from_args(&args) {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("{}", err);
            return Err(err.into());
        }
    };

    log::info!("Benchmarking with the following settings: {:?}", &settings);
    log::info!("Starting benchmarks");

    let mut rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let loop_count = settings.loop_count.max(1);
    let mut sum_elapsed = 0.0;
    let mut sum_removed = 0;
    let mut sum_reprioritized = 0;
    let mut all_consistent = true;
    for _ in 0..loop_count {
        let report = workload::run(&settings, &mut rng)?;
        sum_elapsed += report.elapsed_ms;
        sum_removed += report.removed;
        sum_reprioritized += report.reprioritized;
        all_consistent &= report.consistent;
    }

    let bench_results = BenchResults {
        avg_elapsed_ms: sum_elapsed / loop_count as f64,
        avg_removed: sum_removed as f64 / loop_count as f64,
        avg_reprioritized: sum_reprioritized as f64 / loop_count as f64,
        all_consistent,
    };

    if !bench_results.all_consistent {
        log::warn!("Queue returned entries out of order");
    }
    log::info!("Benchmark results:\n{:#?}", bench_results);

    if settings.json {
        println!("{}", serde_json::to_string_pretty(&bench_results)?);
    }

    Ok(())
}
