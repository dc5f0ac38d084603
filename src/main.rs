//! tailrec - run a reference program through the trampoline

use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use tailrec::demos::Program;
use tailrec::{EngineConfig, FeatureSet, TailError};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Program to run
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProgramArg {
    /// Count n down to zero
    Countdown,
    /// n! with an accumulator
    Factorial,
    /// n-th Fibonacci number, tail form
    Fibonacci,
    /// 0 + 1 + ... + n through nested deferred arguments (needs nested_calls)
    SumNested,
    /// Reverse [0, n) with operators on the deferred result (needs full)
    Reverse,
}

impl From<ProgramArg> for Program {
    fn from(arg: ProgramArg) -> Self {
        match arg {
            ProgramArg::Countdown => Program::Countdown,
            ProgramArg::Factorial => Program::Factorial,
            ProgramArg::Fibonacci => Program::Fibonacci,
            ProgramArg::SumNested => Program::SumNested,
            ProgramArg::Reverse => Program::Reverse,
        }
    }
}

#[derive(Parser)]
#[command(name = "tailrec", version = VERSION)]
#[command(about = "Run a tail-recursive reference program without growing the native stack", long_about = None)]
struct Cli {
    /// Program to run
    program: ProgramArg,

    /// Input size
    n: i64,

    /// Feature set (base, nested_calls, full); overrides the config file
    #[arg(short, long)]
    feature_set: Option<FeatureSet>,

    /// TOML engine configuration
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print trampoline statistics to stderr
    #[arg(long)]
    stats: bool,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(cli: &Cli) -> Result<EngineConfig, String> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load_from_path(path).map_err(|e| e.to_string())?,
        None => EngineConfig::default(),
    };
    let mut config = config.with_env_overrides().map_err(|e| e.to_string())?;
    if let Some(feature_set) = cli.feature_set {
        config.feature_set = feature_set;
    }
    Ok(config)
}

fn run(cli: &Cli) -> Result<(), String> {
    let config = load_config(cli)?;
    let program = Program::from(cli.program);
    let function = program.register(config.feature_set);
    let call = function.deferred_call(program.args(cli.n));

    match tailrec::run_with_stats(call, config.feature_set, config.limits()) {
        Ok((value, stats)) => {
            println!("{}", value);
            if cli.stats {
                eprintln!("invocations:        {}", stats.invocations);
                eprintln!("nested resolutions: {}", stats.nested_resolutions);
                eprintln!("tail continuations: {}", stats.tail_continuations);
                eprintln!("max stack depth:    {}", stats.max_stack_depth);
            }
            Ok(())
        }
        Err(err @ TailError::ForwardingDisabled { .. }) | Err(err @ TailError::UnresolvedArgument { .. }) => {
            Err(format!(
                "{}\n{} needs at least the '{}' feature set",
                err,
                program,
                program.required_feature_set()
            ))
        }
        Err(err) => Err(err.to_string()),
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
