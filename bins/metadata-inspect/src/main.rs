mod cmd;

use clap::Parser;
use cmd::config::{Effective, InspectArgs};

#[derive(Parser)]
#[command(name = "metadata-inspect", about = "Check and print exported stream metadata")]
struct Cli {
    #[command(flatten)]
    args: InspectArgs,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let eff = match Effective::new(&cli.args) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = cmd::inspect::run(&eff) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
