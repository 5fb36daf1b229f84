use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "introspec")]
#[command(
    version,
    about = "Infer package schemas from component definition files"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long)]
    verbose: bool,

    #[arg(long, short)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the package-schema document
    Schema {
        #[arg(long, short, help = "Directory of definition files")]
        dir: Option<PathBuf>,
        #[arg(long, help = "Package name used in resource identifiers")]
        name: Option<String>,
        #[arg(long, help = "Package version")]
        version: Option<String>,
        #[arg(long, short, help = "Write the document to a file instead of stdout")]
        output: Option<PathBuf>,
    },

    /// List discovered components and their contracts
    Components {
        #[arg(long, short, help = "Directory of definition files")]
        dir: Option<PathBuf>,
    },

    /// Show a component's observable output attributes
    Outputs {
        #[arg(help = "Component name to look up")]
        component: String,
        #[arg(long, short, help = "Directory of definition files")]
        dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Schema {
            dir,
            name,
            version,
            output,
        } => {
            introspec::cli::commands::schema::run(dir, name, version, output)?;
        }
        Commands::Components { dir } => {
            introspec::cli::commands::components::run(dir)?;
        }
        Commands::Outputs { component, dir } => {
            introspec::cli::commands::outputs::run(&component, dir)?;
        }
    }

    Ok(())
}
