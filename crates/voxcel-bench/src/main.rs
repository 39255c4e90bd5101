use std::path::PathBuf;
use std::process;

use voxcel_bench::report;
use voxcel_bench::runner::BenchmarkRunner;
use voxcel_bench::scenes;
use voxcel_core::config::EngineConfig;

fn parse_arg<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> T {
    match value.and_then(|v| v.parse().ok()) {
        Some(v) => v,
        None => {
            eprintln!("invalid or missing value for {}", flag);
            process::exit(1);
        }
    }
}

fn load_config(path: &PathBuf) -> EngineConfig {
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("cannot read {}: {}", path.display(), e);
            process::exit(1);
        }
    };
    match EngineConfig::from_ron_str(&text) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: {}", path.display(), e);
            process::exit(1);
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut baseline_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut regression_threshold = 10.0f64;
    let mut iterations = 20u32;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                config_path = Some(parse_arg("--config", args.get(i)));
            }
            "--baseline" => {
                i += 1;
                baseline_path = Some(parse_arg("--baseline", args.get(i)));
            }
            "--output" => {
                i += 1;
                output_path = Some(parse_arg("--output", args.get(i)));
            }
            "--regression-threshold" => {
                i += 1;
                regression_threshold = parse_arg("--regression-threshold", args.get(i));
            }
            "--iterations" => {
                i += 1;
                iterations = parse_arg("--iterations", args.get(i));
            }
            "--help" | "-h" => {
                eprintln!("Usage: bench-runner [OPTIONS]");
                eprintln!("  --config <path>                Engine config RON (default: built-in)");
                eprintln!("  --baseline <path>              Load baseline JSON for comparison");
                eprintln!("  --output <path>                Save current results as JSON baseline");
                eprintln!(
                    "  --regression-threshold <pct>   Regression threshold percentage (default: 10)"
                );
                eprintln!("  --iterations <n>               Samples per scene (default: 20)");
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
        }
        i += 1;
    }

    let config = config_path
        .as_ref()
        .map(load_config)
        .unwrap_or_default();
    let runner = BenchmarkRunner::new(config, iterations);

    let results: Vec<_> = scenes::standard_scenes()
        .iter()
        .map(|scene| runner.run_scene(scene))
        .collect();

    println!("\n## Benchmark Results\n");
    println!("{}", report::format_markdown(&results));

    if let Some(ref path) = output_path {
        let baseline = report::Baseline {
            label: format!("bench-{}", process::id()),
            results: results.clone(),
        };
        if let Err(e) = report::save_baseline(path, &baseline) {
            eprintln!("failed to save baseline: {}", e);
            process::exit(1);
        }
        log::info!("Saved baseline to {}", path.display());
    }

    if let Some(ref path) = baseline_path {
        if let Some(baseline) = report::load_baseline(path) {
            let regressions = report::compare(&results, &baseline, regression_threshold);
            println!(
                "{}",
                report::format_comparison(&regressions, regression_threshold)
            );
            if !regressions.is_empty() {
                eprintln!(
                    "ERROR: {} regressions detected, exiting with code 1",
                    regressions.len()
                );
                process::exit(1);
            }
        } else {
            log::warn!("Baseline file not found: {}", path.display());
        }
    }

    log::info!("Benchmark complete.");
}
