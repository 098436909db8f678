//! framekit-demo: runs the export and reshape scenarios end to end.

mod demo;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use framekit_reshape::EnumMissingColumnPolicy;

#[derive(Parser)]
#[command(name = "framekit-demo")]
#[command(
    version,
    about = "Export a formatted sales workbook and reshape a flat table into groups"
)]
struct Cli {
    /// Directory receiving the generated workbooks
    #[arg(long, default_value = ".")]
    dir_out: PathBuf,

    /// Fail on the first relation column missing from the source table
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "framekit=info".into()),
        )
        .init();

    let cli = Cli::parse();
    std::fs::create_dir_all(&cli.dir_out)
        .with_context(|| format!("Failed to create output directory {}", cli.dir_out.display()))?;

    let rule_missing = if cli.strict {
        EnumMissingColumnPolicy::FailFast
    } else {
        EnumMissingColumnPolicy::Warn
    };

    let path_sales = demo::run_sales_report(&cli.dir_out)?;
    println!("Wrote {}", path_sales.display());

    let outcome = demo::run_grouped_report(&cli.dir_out, rule_missing)?;
    println!("{}", outcome.df_flat);
    println!("{}", outcome.report);
    println!("Wrote {}", outcome.path_out.display());

    Ok(())
}
