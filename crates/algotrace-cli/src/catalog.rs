//! Catalog commands - `list` and `show`

use std::process::ExitCode;

use algotrace_engine::{Category, Descriptor};
use anyhow::{bail, Context, Result};
use clap::Args;

/// Arguments for the list command
#[derive(Args)]
pub struct ListArgs {
    /// Only show one category (e.g. sorting, linked-lists, dp)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Print descriptors as a JSON array instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the show command
#[derive(Args)]
pub struct ShowArgs {
    /// Algorithm id (see `algotrace list`)
    pub id: String,
}

fn parse_category(raw: &str) -> Result<Category> {
    match Category::parse(raw) {
        Some(category) => Ok(category),
        None => {
            let known: Vec<&str> = Category::ALL.iter().map(Category::as_str).collect();
            bail!("unknown category `{raw}` (expected one of: {})", known.join(", "))
        }
    }
}

/// Execute the list command
pub fn list(args: ListArgs) -> Result<ExitCode> {
    let registry = algotrace_algorithms::registry();
    let descriptors: Vec<&Descriptor> = match args.category.as_deref() {
        Some(raw) => registry.list_by_category(parse_category(raw)?).collect(),
        None => registry.list_all().collect(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&descriptors)?);
        return Ok(ExitCode::SUCCESS);
    }

    for d in &descriptors {
        println!(
            "{:<28} {:<14} {:<12} {}",
            d.id,
            d.category.as_str(),
            format!("{:?}", d.difficulty).to_lowercase(),
            d.name
        );
    }
    tracing::debug!(shown = descriptors.len(), "listed algorithms");
    Ok(ExitCode::SUCCESS)
}

/// Execute the show command
pub fn show(args: ShowArgs) -> Result<ExitCode> {
    let descriptor = algotrace_algorithms::registry()
        .descriptor(&args.id)
        .with_context(|| format!("no algorithm registered as `{}`", args.id))?;
    println!("{}", serde_json::to_string_pretty(descriptor)?);
    Ok(ExitCode::SUCCESS)
}
