use std::path::PathBuf;
use std::process::ExitCode;

use argh::FromArgs;
use edastat::{
    BootstrapConfig, BootstrapEstimator, Criterion, DatasetRegistry, FailurePolicy, Family, ModelSelector, Percentile,
};

/// Fit lifetime distributions, rank them by AIC/BIC and bootstrap percentile estimates
#[derive(FromArgs, Debug)]
struct Args {
    /// path of a CSV file registered as an extra dataset named after its file stem
    #[argh(option)]
    csv: Option<PathBuf>,

    /// column of the --csv file holding the observations
    #[argh(option)]
    column: Option<String>,

    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
enum Command {
    List(ListArgs),
    Fit(FitArgs),
    Bootstrap(BootstrapArgs),
}

/// List registered datasets
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "list")]
struct ListArgs {}

/// Fit every candidate family and rank the fits
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "fit")]
struct FitArgs {
    /// dataset name
    #[argh(positional)]
    dataset: String,

    /// comma-separated candidate families (default: gaussian,gamma,birnbaum-saunders,weibull3)
    #[argh(option, from_str_fn(parse_families))]
    families: Option<Vec<Family>>,

    /// ranking criterion, aic or bic (default: bic)
    #[argh(option, default = "Criterion::Bic")]
    criterion: Criterion,

    /// fail on the first family that cannot be fit instead of excluding it
    #[argh(switch)]
    strict: bool,
}

/// Bootstrap a percentile of the selected model
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "bootstrap")]
struct BootstrapArgs {
    /// dataset name
    #[argh(positional)]
    dataset: String,

    /// master seed of the resampling stream
    #[argh(option)]
    seed: u64,

    /// number of resamples
    #[argh(option)]
    resamples: usize,

    /// two-sided confidence level (default: 0.95)
    #[argh(option, default = "0.95")]
    confidence: f64,

    /// probability of the model percentile to estimate (default: 0.001)
    #[argh(option, default = "0.001")]
    percentile: f64,

    /// comma-separated candidate families (default: gaussian,gamma,birnbaum-saunders,weibull3)
    #[argh(option, from_str_fn(parse_families))]
    families: Option<Vec<Family>>,

    /// ranking criterion, aic or bic (default: bic)
    #[argh(option, default = "Criterion::Bic")]
    criterion: Criterion,
}

fn parse_families(value: &str) -> Result<Vec<Family>, String> {
    value
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.parse::<Family>().map_err(|e| e.to_string()))
        .collect()
}

fn selector(families: Option<Vec<Family>>) -> edastat::Result<ModelSelector> {
    Ok(match families {
        Some(families) => ModelSelector::new(families)?,
        None => ModelSelector::default(),
    })
}

fn run(args: Args) -> edastat::Result<()> {
    let mut registry = DatasetRegistry::builtin();
    if let (Some(path), Some(column)) = (&args.csv, &args.column) {
        let name = path.file_stem().map_or_else(|| "csv".to_owned(), |s| s.to_string_lossy().into_owned());
        registry.register_csv(&name, path, column)?;
    }

    match args.command {
        Command::List(_) => {
            for dataset in registry.iter() {
                println!("{:<24} {:>5}  {}", dataset.name, dataset.values.len(), dataset.description);
            }
        }
        Command::Fit(fit) => {
            let sample = registry.load(&fit.dataset)?;
            let policy = if fit.strict { FailurePolicy::Propagate } else { FailurePolicy::Exclude };
            let ranking = selector(fit.families)?.criterion(fit.criterion).failure_policy(policy).rank(&sample)?;
            println!("{ranking}");
        }
        Command::Bootstrap(boot) => {
            let sample = registry.load(&boot.dataset)?;
            let config = BootstrapConfig::new(boot.resamples, boot.confidence, boot.seed)?;
            let statistic = Percentile::new(boot.percentile)?;
            let estimator = BootstrapEstimator::new(selector(boot.families)?.criterion(boot.criterion), statistic, config);
            let estimate = estimator.run(&sample)?;
            println!("{estimate}");
        }
    }
    Ok(())
}

/// Parse `argv` (program name first), run it and return the exit code:
/// 0 on success, 1 when the command fails, 2 on a usage error.
fn execute(argv: &[&str]) -> u8 {
    let command = argv.first().copied().unwrap_or("edastat");
    let rest = argv.get(1..).unwrap_or_default();

    let args = match Args::from_args(&[command], rest) {
        Ok(args) => args,
        Err(early) => {
            return match early.status {
                Ok(()) => {
                    println!("{}", early.output);
                    0
                }
                Err(()) => {
                    eprintln!("{}", early.output);
                    2
                }
            };
        }
    };

    if args.csv.is_some() != args.column.is_some() {
        eprintln!("--csv and --column must be given together");
        return 2;
    }

    match run(args) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {err}");
            1
        }
    }
}

fn main() -> ExitCode {
    let strings: Vec<String> = std::env::args().collect();
    let argv: Vec<&str> = strings.iter().map(String::as_str).collect();
    ExitCode::from(execute(&argv))
}
