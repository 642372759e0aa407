use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use qint::{qint_expression_with_bound, DEFAULT_CYCLOTOMIC_BOUND};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decompose a rational function in q into q-integer factors
    Eval {
        /// The expression to decompose, e.g. "(q^6 - 1)/(q - 1)"
        expression: String,

        /// Search bound for cyclotomic recognition
        #[arg(long, default_value_t = DEFAULT_CYCLOTOMIC_BOUND)]
        bound: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Eval { expression, bound } => {
            let form = qint_expression_with_bound(&expression, bound)
                .with_context(|| format!("could not decompose {expression:?}"))?;
            println!("{form}");
        }
    }
    Ok(())
}
