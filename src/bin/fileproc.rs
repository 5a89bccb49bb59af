//! fileproc command-line binary

use clap::{Parser, Subcommand};
use fileproc::config::{Config, DEFAULT_CONFIG_FILE};
use fileproc::encryption::{EncryptionType, generate_key};
use fileproc::exit_codes::{EXIT_INVALID_ARGS, EXIT_PANIC, EXIT_SUCCESS, exit_code_for};
use fileproc::logger::{LogObserver, LogSpec};
use fileproc::shell::Shell;
use fileproc::{CalculationMethod, FileprocError, calculate_file, run_pipeline_file};
use std::{env, io, panic, path::PathBuf, process};

const VERSION: &str = fileproc::version::VERSION;

#[derive(Parser, Debug)]
#[command(version = VERSION, about = "Compress, encrypt and calculate over files with replayable pipelines")]
struct Args {
    /// Path to config.json
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error, off; prefix with json: for JSON lines)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive shell (default)
    Shell,

    /// Process one file non-interactively
    Run {
        /// Input file
        #[arg(short, long)]
        input: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Saved pipeline to replay
        #[arg(short, long)]
        pipeline: Option<PathBuf>,

        /// Calculation method (regex, parser, library); regex when no pipeline is given
        #[arg(long, conflicts_with = "pipeline")]
        calc: Option<String>,
    },

    /// Generate an AES key or an RSA key pair
    GenKey {
        /// aes or rsa
        kind: String,

        /// Key path; RSA writes <path>.priv and <path>.pub
        path: PathBuf,
    },
}

fn main() {
    // Set up panic handler to return specific exit code
    panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC: {}", panic_info);
        process::exit(EXIT_PANIC);
    }));

    let result = panic::catch_unwind(run);

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(_) => {
            eprintln!("Fatal: Unhandled panic in fileproc");
            process::exit(EXIT_PANIC);
        }
    }
}

fn run() -> i32 {
    // Handle --version before clap so build info is included
    if env::args().nth(1).as_deref() == Some("--version") {
        println!("fileproc {}", fileproc::version::full_version());
        return EXIT_SUCCESS;
    }

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                EXIT_INVALID_ARGS
            } else {
                EXIT_SUCCESS
            };
        }
    };

    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return exit_code_for(&e);
        }
    };

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.effective_log_level().to_string());
    LogSpec::parse(&level).install();
    log::debug!("🚀 fileproc {} started", VERSION);

    match execute(args.command.unwrap_or(Command::Shell), config) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            log::error!("❌ {}", e);
            eprintln!("Error: {}", e);
            exit_code_for(&e)
        }
    }
}

fn execute(command: Command, config: Config) -> Result<(), FileprocError> {
    let observer = LogObserver::shared();

    match command {
        Command::Shell => {
            let mut shell = Shell::new(config, observer);
            shell.run(io::stdin().lock(), io::stdout())
        }
        Command::Run {
            input,
            output,
            pipeline: Some(pipeline),
            ..
        } => run_pipeline_file(&input, &pipeline, &output, observer),
        Command::Run {
            input,
            output,
            pipeline: None,
            calc,
        } => {
            let method = match calc {
                Some(name) => name.parse()?,
                None => CalculationMethod::Regex,
            };
            calculate_file(&input, &output, method, observer)
        }
        Command::GenKey { kind, path } => {
            let kind: EncryptionType = kind.parse()?;
            for written in generate_key(kind, &path, config.rsa_key_bits)? {
                println!("Key written to {}", written.display());
            }
            Ok(())
        }
    }
}
