#![forbid(unsafe_code)]

use fnc_conformance::{
    ConformanceHarness, HarnessConfig, SuiteReport, default_registry, parse_seed,
    set_conformance_log_path,
};
use serde::Serialize;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Serialize)]
struct SuiteSummary {
    suite: String,
    case_count: usize,
    pass_count: usize,
    skip_count: usize,
    skipped: Vec<String>,
    failures: Vec<String>,
}

#[derive(Debug, Serialize)]
struct GateSummary {
    status: &'static str,
    seed: String,
    iterations: usize,
    conformance_log: String,
    suites: Vec<SuiteSummary>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("run_conformance_gate failed: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut cfg = HarnessConfig::from_env()?;
    let mut log_path: Option<PathBuf> = None;
    let mut only: Option<String> = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--seed requires a value".to_string())?;
                let seed = parse_seed(&value).ok_or_else(|| format!("invalid seed: {value}"))?;
                cfg = cfg.with_seed(seed);
            }
            "--iterations" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--iterations requires a value".to_string())?;
                let iterations = value
                    .parse()
                    .map_err(|err| format!("invalid iteration count {value}: {err}"))?;
                cfg = cfg.with_iterations(iterations);
            }
            "--candidate" => {
                only = Some(
                    args.next()
                        .ok_or_else(|| "--candidate requires a value".to_string())?,
                );
            }
            "--log-path" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--log-path requires a value".to_string())?;
                log_path = Some(PathBuf::from(value));
            }
            "--help" | "-h" => {
                println!(
                    "Usage: cargo run -p fnc-conformance --bin run_conformance_gate -- [--seed <u64|0xhex>] [--iterations <n>] [--candidate <name>] [--log-path <path>]"
                );
                return Ok(());
            }
            unknown => return Err(format!("unknown argument: {unknown}")),
        }
    }

    let ts_millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_millis());
    let log_path = log_path.unwrap_or_else(|| {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../artifacts/logs")
            .join(format!("conformance_gate_{ts_millis}.jsonl"))
    });
    set_conformance_log_path(Some(log_path.clone()));

    let registry = default_registry();
    let reports = match only.as_deref() {
        Some(name) => {
            let candidate = registry.get(name).ok_or_else(|| {
                format!(
                    "unknown candidate {name}; registered: {}",
                    registry.names().join(", ")
                )
            })?;
            let harness = ConformanceHarness::new(cfg.clone());
            vec![candidate.run(&harness)?]
        }
        None => registry.run_all(&cfg)?,
    };

    let status = if reports.iter().all(SuiteReport::all_passed) {
        "pass"
    } else {
        "fail"
    };
    let summary = GateSummary {
        status,
        seed: format!("{:#018x}", cfg.seed),
        iterations: cfg.iterations,
        conformance_log: log_path.display().to_string(),
        suites: reports.into_iter().map(summarize_suite).collect(),
    };

    let summary_json = serde_json::to_string_pretty(&summary)
        .map_err(|err| format!("failed serializing summary: {err}"))?;
    println!("{summary_json}");

    if status == "fail" {
        std::process::exit(2);
    }
    Ok(())
}

fn summarize_suite(report: SuiteReport) -> SuiteSummary {
    SuiteSummary {
        suite: report.suite,
        case_count: report.case_count,
        pass_count: report.pass_count,
        skip_count: report.skip_count,
        skipped: report.skipped,
        failures: report.failures,
    }
}
