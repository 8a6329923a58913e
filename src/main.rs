//! MISO trade-off search CLI - drive the external evaluator with a GA.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::Ordering;

use miso_skyline::schema::{OracleConfig, PatternCatalog, SearchConfig};
use miso_skyline::search::{
    Evaluator, GaEngine, MaskRng, ProcessOracle, SearchContext, TradeoffLog,
};

fn main() -> ExitCode {
    env_logger::init();

    let mut positional: Vec<String> = Vec::new();
    let mut config_path: Option<PathBuf> = None;
    let mut oracle_path: Option<PathBuf> = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--example-config" => {
                print_example_config();
                return ExitCode::SUCCESS;
            }
            "--config" => match args.next() {
                Some(path) => config_path = Some(PathBuf::from(path)),
                None => return usage("--config requires a path"),
            },
            "--oracle" => match args.next() {
                Some(path) => oracle_path = Some(PathBuf::from(path)),
                None => return usage("--oracle requires a path"),
            },
            _ => positional.push(arg),
        }
    }

    if positional.len() < 2 || positional.len() > 3 {
        return usage("expected <bitcode> <miso> [bcconf]");
    }

    let bitcode = PathBuf::from(&positional[0]);
    let miso_path = &positional[1];
    let bcconf = positional.get(2).map(PathBuf::from);

    let config: SearchConfig = match &config_path {
        Some(path) => {
            let text = match fs::read_to_string(path) {
                Ok(text) => text,
                Err(e) => {
                    eprintln!("Error reading config file: {e}");
                    return ExitCode::FAILURE;
                }
            };
            match serde_json::from_str(&text) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Error parsing config: {e}");
                    return ExitCode::FAILURE;
                }
            }
        }
        None => SearchConfig::default(),
    };
    if let Err(e) = config.validate() {
        eprintln!("Invalid config: {e}");
        return ExitCode::FAILURE;
    }

    let catalog = match PatternCatalog::load(miso_path) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Error reading MISO file: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("MISO Trade-off Search");
    println!("=====================");
    println!("Patterns: {}", catalog.len());
    println!(
        "Population: {} x {} generations",
        config.population_size, config.max_iterations
    );
    println!();

    let oracle = ProcessOracle::new(OracleConfig {
        command: oracle_path.unwrap_or_else(|| PathBuf::from("./main")),
        bitcode,
        bcconf,
        work_path: std::env::temp_dir().join("miso.txt"),
    });

    let mut context = SearchContext::new(Evaluator::new(oracle, catalog.clone()), config.compaction);
    if config.random_baseline {
        let rng = match config.random_seed {
            // offset so the baseline stream differs from the engine's
            Some(seed) => MaskRng::new(seed.wrapping_add(1)),
            None => MaskRng::random(),
        };
        context = context.with_random_baseline(rng);
    }

    println!("Calibrating baselines...");
    match context.calibrate() {
        Ok(baselines) => {
            println!(
                "  area_all={}, sta_base={}",
                baselines.area_all, baselines.sta_base
            );
            println!();
        }
        Err(e) => {
            eprintln!("Calibration failed: {e}");
            return ExitCode::FAILURE;
        }
    }

    let mut engine = GaEngine::new(config, catalog.len());
    let cancel = engine.cancel_handle();
    let interrupted = engine.cancel_handle();
    if let Err(e) = ctrlc::set_handler(move || cancel.store(true, Ordering::Relaxed)) {
        eprintln!("Warning: no interrupt handler: {e}");
    }

    let outcome = engine.run_with_callback(
        |mask| context.objective(mask),
        |progress| {
            println!(
                "Generation {}/{}: best loss {:.4} (this generation {:.4}, {} evaluations)",
                progress.generation,
                progress.total_generations,
                progress.best_loss,
                progress.generation_best,
                progress.evaluations
            );
        },
    );

    match outcome {
        Ok(result) => {
            println!();
            println!(
                "Search stopped ({:?}): {} generations, {} evaluations, {:.1}s",
                result.stop_reason, result.generations, result.evaluations, result.elapsed_seconds
            );
            if let Some(best) = &result.best {
                println!("Best loss: {:.4}", best.loss);
            }
            print_reports(&context);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Run aborted: {e}");
            // A SIGINT delivered to the whole process group can kill the
            // oracle child mid-call and surface here as an oracle error;
            // everything recorded before the failing call is still valid.
            if interrupted.load(Ordering::Relaxed) {
                print_reports(&context);
                return ExitCode::from(130);
            }
            ExitCode::FAILURE
        }
    }
}

fn print_reports(context: &SearchContext<ProcessOracle>) {
    report("Optimized", context.optimized());
    if let Some(random) = context.random() {
        report("Random baseline", random);
    }
}

fn report(label: &str, log: &TradeoffLog) {
    println!();
    println!("{label} frontier:");
    println!("[");
    for point in log.skyline.frontier() {
        println!("  ({:.6}, {:.6}),", point.area_ratio, point.timing_ratio);
    }
    println!("]");
    println!("{label} loss trace:");
    println!("[");
    for breakpoint in log.history.trace() {
        println!("  ({}, {:.6}),", breakpoint.iteration, breakpoint.loss);
    }
    println!("]");
}

fn usage(problem: &str) -> ExitCode {
    eprintln!("Error: {problem}");
    eprintln!();
    eprintln!("Usage: miso-skyline [options] <bitcode> <miso> [bcconf]");
    eprintln!();
    eprintln!("Search MISO pattern subsets for area/timing trade-offs.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  bitcode  Reference design the timing oracle measures against");
    eprintln!("  miso     Candidate pattern catalog, one pattern per line");
    eprintln!("  bcconf   Optional auxiliary configuration for the oracle");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>   GA parameters as JSON (see --example-config)");
    eprintln!("  --oracle <path>   Evaluator binary (default: ./main)");
    eprintln!("  --example-config  Print the default configuration and exit");
    ExitCode::FAILURE
}

fn print_example_config() {
    let config = SearchConfig::default();
    println!("{}", serde_json::to_string_pretty(&config).unwrap());
}
