// Terminal front-end for the simulator. The browser studio lives in
// studio/main.rs:
//   cargo run --bin studio
use std::path::PathBuf;
use std::sync::mpsc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use playrithm::dataset::{catalog, DatasetSplit, DEFAULT_TRAIN_RATIO};
use playrithm::metrics::comparison::best_by_accuracy;
use playrithm::{
    algorithm_comparison, start_run, Hyperparams, ModelArchitecture, PlayrithmConfig, RunOutcome,
    SimResult,
};

#[derive(Parser)]
#[command(name = "playrithm", version, about = "Simulated ML training curves in the terminal")]
struct Cli {
    /// TOML config file (defaults to $PLAYRITHM_CONFIG or ./playrithm.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a simulated training and print one line per epoch
    Run {
        #[arg(long, default_value = "mnist")]
        dataset: String,
        #[arg(long)]
        epochs: Option<usize>,
        #[arg(long)]
        learning_rate: Option<f64>,
        /// Delay between epochs in milliseconds
        #[arg(long)]
        interval_ms: Option<u64>,
        #[arg(long)]
        seed: Option<u64>,
        /// Print samples as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// List the built-in datasets with their train/test split
    Datasets {
        #[arg(long, default_value_t = DEFAULT_TRAIN_RATIO)]
        train_ratio: f64,
    },
    /// Print the algorithm comparison table
    Compare,
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> SimResult<()> {
    let config = PlayrithmConfig::discover(cli.config.as_deref())?;
    match cli.command {
        Command::Run { dataset, epochs, learning_rate, interval_ms, seed, json } => {
            let hp = Hyperparams {
                epochs: epochs.unwrap_or(config.defaults.epochs),
                learning_rate: learning_rate.unwrap_or(config.defaults.learning_rate),
                ..config.defaults.clone()
            };
            run_training(&config, hp, &dataset, interval_ms, seed, json)
        }
        Command::Datasets { train_ratio } => list_datasets(train_ratio),
        Command::Compare => {
            print_comparison();
            Ok(())
        }
    }
}

fn run_training(
    config: &PlayrithmConfig,
    hp: Hyperparams,
    dataset: &str,
    interval_ms: Option<u64>,
    seed: Option<u64>,
    json: bool,
) -> SimResult<()> {
    hp.validate()?;

    let mut run_config = hp
        .run_config(dataset)
        .with_tick_interval(interval_ms.map_or(config.simulator.tick_interval(), std::time::Duration::from_millis));
    if let Some(seed) = seed.or(config.simulator.seed) {
        run_config = run_config.with_seed(seed);
    }

    if !json {
        println!("{}", ModelArchitecture::for_dataset_id(&hp, dataset).summary());
        println!(
            "Training on '{}' for {} epochs (lr {}, {})",
            dataset,
            hp.epochs,
            hp.learning_rate,
            hp.optimizer.display_name()
        );
    }

    // Samples are printed on the main thread so output never interleaves.
    let (tx, rx) = mpsc::channel();
    let handle = start_run(run_config, move |sample| { let _ = tx.send(sample); }, || {})?;

    for sample in rx {
        if json {
            match serde_json::to_string(&sample) {
                Ok(line) => println!("{}", line),
                Err(e) => eprintln!("error: {}", e),
            }
            continue;
        }
        let val = match (sample.val_accuracy, sample.val_loss) {
            (Some(va), Some(vl)) => format!("  val_acc {:.4}  val_loss {:.4}", va, vl),
            _ => String::new(),
        };
        println!(
            "epoch {:>3}/{}  acc {:.4}  loss {:.4}{}",
            sample.epoch, sample.total_epochs, sample.accuracy, sample.loss, val
        );
    }

    match handle.join()? {
        RunOutcome::Completed { epochs } if !json => println!("Training complete ({} epochs).", epochs),
        RunOutcome::Cancelled { epochs_emitted } if !json => {
            println!("Training stopped after {} epochs.", epochs_emitted)
        }
        _ => {}
    }
    Ok(())
}

fn list_datasets(train_ratio: f64) -> SimResult<()> {
    println!(
        "{:<8} {:<16} {:<24} {:>8} {:>8} {:>8} {:>8}",
        "id", "name", "type", "samples", "features", "train", "test"
    );
    for d in catalog::all() {
        let split = DatasetSplit::new(d.id, train_ratio)?;
        println!(
            "{:<8} {:<16} {:<24} {:>8} {:>8} {:>8} {:>8}",
            d.id, d.name, d.kind.label(), d.samples, d.features, split.training, split.testing
        );
    }
    Ok(())
}

fn print_comparison() {
    let results = algorithm_comparison();
    println!("{:<20} {:>8} {:>6} {:>9} {:>10}", "algorithm", "accuracy", "loss", "time (s)", "params");
    for r in results {
        println!(
            "{:<20} {:>7.1}% {:>6.2} {:>9.1} {:>10}",
            r.name, r.accuracy * 100.0, r.loss, r.training_time, r.parameters
        );
    }
    if let Some(best) = best_by_accuracy(results) {
        println!("Best accuracy: {}", best.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_flag_does_not_read_the_environment() {
        // Discovery reads $PLAYRITHM_CONFIG itself; the flag stays unset.
        std::env::set_var(playrithm::config::CONFIG_ENV_VAR, "/nonexistent/playrithm.toml");
        let cli = Cli::try_parse_from(["playrithm", "compare"]).unwrap();
        assert!(cli.config.is_none());

        let cli = Cli::try_parse_from(["playrithm", "--config", "a.toml", "compare"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("a.toml")));
    }
}
