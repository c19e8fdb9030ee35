use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum, error::ErrorKind};

use crate::accessor::TimeScale;
use crate::config::DispatchConfig;
use crate::dispatcher::Dispatcher;
use crate::errors::DispatchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TimestampArg {
    Seconds,
    Minute,
    Hour,
}

impl From<TimestampArg> for TimeScale {
    fn from(value: TimestampArg) -> Self {
        match value {
            TimestampArg::Seconds => TimeScale::Seconds,
            TimestampArg::Minute => TimeScale::Minutes,
            TimestampArg::Hour => TimeScale::Hours,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "dispatch_demo",
    disable_help_subcommand = true,
    about = "Generate a regulation dispatch sequence",
    long_about = "Stitch hourly segments of recorded regulation dispatch into one sequence and print its head.",
    after_help = "The corpus table is resolved in order by --db, the config file, the REGDISPATCH_DB environment variable, then data/FrequencyRegulationData.csv."
)]
/// CLI for `dispatch_demo`.
///
/// Common usage:
/// - First minute of a one-hour sequence: `dispatch_demo --seed 20`
/// - First two hours of a day, hour index: `dispatch_demo --length 86400 --timestamp hour --window 2`
/// - Drive the step cursor instead of the batch view: `dispatch_demo --steps 15`
struct DispatchDemoCli {
    #[arg(long, value_name = "SECONDS", help = "Total sequence length in seconds")]
    length: Option<u64>,
    #[arg(long, value_name = "SECONDS", help = "Seconds per sample (only 4 is supported)")]
    step: Option<u32>,
    #[arg(long, default_value_t = 20, help = "Deterministic seed for segment draws")]
    seed: u64,
    #[arg(long, value_name = "PATH", help = "Corpus table location")]
    db: Option<PathBuf>,
    #[arg(
        long,
        value_name = "PATH",
        help = "JSON file with DispatchConfig fields; command-line flags take precedence"
    )]
    config: Option<PathBuf>,
    #[arg(
        long,
        value_enum,
        default_value_t = TimestampArg::Minute,
        help = "Time unit of the printed index"
    )]
    timestamp: TimestampArg,
    #[arg(
        long,
        default_value_t = 1.0,
        help = "Print points up to this time, in --timestamp units"
    )]
    window: f64,
    #[arg(long, help = "Emit points as JSON instead of a table")]
    json: bool,
    #[arg(
        long,
        value_parser = parse_positive_usize,
        help = "Call the step cursor this many times instead of printing the batch view"
    )]
    steps: Option<usize>,
}

/// Parse demo arguments (without the program name), build a generator, and print its output.
pub fn run_dispatch_demo<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let Some(cli) = parse_cli::<DispatchDemoCli, _>(
        std::iter::once("dispatch_demo".to_string()).chain(args_iter),
    )?
    else {
        return Ok(());
    };

    let config = build_config(&cli)?;
    println!("Reading corpus from {}", config.db.display());
    let mut dispatcher = match Dispatcher::new(config) {
        Ok(dispatcher) => dispatcher,
        Err(err) => {
            if let DispatchError::StitchingExhausted { seed, .. } = &err {
                eprintln!(
                    "Could not assemble a dispatch signal with seed {seed}. Try another --seed or a shorter --length."
                );
            }
            return Err(err.into());
        }
    };

    if let Some(steps) = cli.steps {
        print_steps(&mut dispatcher, steps, cli.json)?;
    } else {
        print_view(&dispatcher, cli.timestamp.into(), cli.window, cli.json)?;
    }
    print_quality(&dispatcher);
    Ok(())
}

fn build_config(cli: &DispatchDemoCli) -> Result<DispatchConfig, Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => DispatchConfig::from_json_str(&fs::read_to_string(path)?)?,
        None => DispatchConfig::default(),
    };
    if let Some(length) = cli.length {
        config.length = length;
    }
    if let Some(step) = cli.step {
        config.step = step;
    }
    if let Some(db) = &cli.db {
        config.db = db.clone();
    }
    config.seed = Some(cli.seed);
    Ok(config)
}

fn print_view(
    dispatcher: &Dispatcher,
    scale: TimeScale,
    window: f64,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let view = dispatcher.sequence_view(scale);
    if json {
        let points: Vec<(f64, f64)> = view.until(window).collect();
        println!("{}", serde_json::to_string_pretty(&points)?);
        return Ok(());
    }
    println!(
        "Regulation dispatch for the first {window} {} (seed {}):",
        unit_name(scale),
        dispatcher.seed()
    );
    println!();
    println!("{:>12}  {:>14}", view.time_label, view.value_label);
    for (time, value) in view.until(window) {
        println!("{time:>12.4}  {value:>14.6}");
    }
    Ok(())
}

fn print_steps(
    dispatcher: &mut Dispatcher,
    steps: usize,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let mut taken = Vec::with_capacity(steps);
    for _ in 0..steps {
        match dispatcher.do_step() {
            Ok(step) => taken.push(step),
            Err(DispatchError::CursorExhausted { elapsed, covered }) => {
                eprintln!("Step cursor reached {elapsed}s; the sequence covers {covered}s.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }
    if json {
        println!("{}", serde_json::to_string_pretty(&taken)?);
    } else {
        for step in &taken {
            println!("t={:>8}s  dispatch={:>12.6}", step.time, step.value);
        }
    }
    Ok(())
}

fn print_quality(dispatcher: &Dispatcher) {
    let corpus = dispatcher.corpus();
    let sequence = dispatcher.sequence();
    println!();
    println!("[CORPUS]");
    println!(
        "  segments: {} x {} samples ({} partial set aside)",
        corpus.len(),
        corpus.segment_len(),
        corpus.partial_segments().len()
    );
    println!("[SEQUENCE]");
    println!(
        "  samples: {}  pieces: {}  draws consumed: {}",
        sequence.len(),
        sequence.pieces().len(),
        sequence.draws_consumed()
    );
    if let Some(check) = dispatcher.mean_check() {
        println!(
            "  mean: {:.4}  segment-mean band: [{:.4}, {:.4}]  {}",
            check.assembled_mean,
            check.p50,
            check.p75,
            if check.in_range {
                "in range"
            } else {
                "OUT OF RANGE"
            }
        );
    }
}

fn unit_name(scale: TimeScale) -> &'static str {
    match scale {
        TimeScale::Seconds => "second(s)",
        TimeScale::Minutes => "minute(s)",
        TimeScale::Hours => "hour(s)",
    }
}

fn parse_positive_usize(raw: &str) -> Result<usize, String> {
    let parsed = raw.parse::<usize>().map_err(|_| {
        format!(
            "Could not parse --steps value '{}' as a positive integer",
            raw
        )
    })?;
    if parsed == 0 {
        return Err("--steps must be greater than zero".to_string());
    }
    Ok(parsed)
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn parse(args: &[&str]) -> DispatchDemoCli {
        parse_cli::<DispatchDemoCli, _>(
            std::iter::once("dispatch_demo").chain(args.iter().copied()),
        )
        .unwrap()
        .unwrap()
    }

    fn write_corpus(dir: &std::path::Path) -> PathBuf {
        let path = dir.join("dispatch.csv");
        let mut text = String::from(",reg\n");
        for i in 0..1800 {
            text.push_str(&format!("{i},{}\n", (i % 25) as f64 / 5.0));
        }
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn help_is_not_an_error() {
        let parsed = parse_cli::<DispatchDemoCli, _>(["dispatch_demo", "--help"]).unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn invalid_steps_and_timestamp_are_rejected() {
        assert!(parse_cli::<DispatchDemoCli, _>(["dispatch_demo", "--steps", "0"]).is_err());
        assert!(
            parse_cli::<DispatchDemoCli, _>(["dispatch_demo", "--timestamp", "fortnight"])
                .is_err()
        );
        assert_eq!(parse_positive_usize("3").unwrap(), 3);
    }

    #[test]
    fn flags_override_config_file() {
        let temp = tempdir().unwrap();
        let config_path = temp.path().join("config.json");
        fs::write(&config_path, r#"{"length": 7200, "db": "from_file.csv", "seed": 3}"#).unwrap();
        let cli = parse(&[
            "--config",
            config_path.to_str().unwrap(),
            "--db",
            "override.csv",
            "--seed",
            "11",
        ]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.length, 7200);
        assert_eq!(config.db, PathBuf::from("override.csv"));
        assert_eq!(config.seed, Some(11));
        assert_eq!(cli.timestamp, TimestampArg::Minute);
        assert_eq!(TimeScale::from(TimestampArg::Hour), TimeScale::Hours);
    }

    #[test]
    fn demo_runs_end_to_end_on_a_small_corpus() {
        let temp = tempdir().unwrap();
        let db = write_corpus(temp.path());
        let db_arg = db.to_str().unwrap().to_string();

        run_dispatch_demo(["--db".to_string(), db_arg.clone()].into_iter()).unwrap();
        run_dispatch_demo(
            [
                "--db".to_string(),
                db_arg.clone(),
                "--json".to_string(),
                "--timestamp".to_string(),
                "hour".to_string(),
            ]
            .into_iter(),
        )
        .unwrap();
        run_dispatch_demo(
            [
                "--db".to_string(),
                db_arg,
                "--length".to_string(),
                "40".to_string(),
                "--steps".to_string(),
                "12".to_string(),
            ]
            .into_iter(),
        )
        .unwrap();
    }

    #[test]
    fn exhausted_stitching_fails_the_run() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("ramp.csv");
        let mut text = String::from(",reg\n");
        for i in 0..900 {
            text.push_str(&format!("{i},{i}\n"));
        }
        fs::write(&path, text).unwrap();
        let result = run_dispatch_demo(
            [
                "--db".to_string(),
                path.to_str().unwrap().to_string(),
                "--length".to_string(),
                "7200".to_string(),
            ]
            .into_iter(),
        );
        let err = result.expect_err("exhaustion must not exit cleanly");
        assert!(matches!(
            err.downcast_ref::<DispatchError>(),
            Some(DispatchError::StitchingExhausted { seed: 20, .. })
        ));
    }

    #[test]
    fn missing_corpus_is_an_error() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("missing.csv");
        let result = run_dispatch_demo(
            ["--db".to_string(), missing.to_str().unwrap().to_string()].into_iter(),
        );
        assert!(result.is_err());
    }
}
