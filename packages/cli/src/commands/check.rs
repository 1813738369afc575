use super::{load_config, load_page};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Page description (JSON markup)
    pub page: PathBuf,

    /// Editor config file (defaults to scriptcard.config.json in the cwd)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

pub fn check(args: CheckArgs, cwd: &Path) -> Result<()> {
    let config = load_config(args.config.as_ref(), cwd)?;
    let page = load_page(&args.page)?;
    let issues = page.binding_issues();

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&issues)?);
    } else {
        println!("🔍 {} {}", "Checking".green().bold(), args.page.display());
        println!(
            "   Cards: {}  Display nodes: {}  Form inputs: {}  Errand forms: {}",
            page.cards().len(),
            page.nodes().len(),
            page.controls().len(),
            page.errands().len()
        );
        println!();

        for issue in &issues {
            let marker = if config.strict_bindings {
                "error".red().bold()
            } else {
                "warning".yellow().bold()
            };
            println!("   {}: {}", marker, issue);
        }

        if issues.is_empty() {
            println!("   {} No binding issues found!", "✓".green());
        }
    }

    // Strict pages refuse to start with unbound names
    if config.strict_bindings && !issues.is_empty() {
        anyhow::bail!("{} binding issue(s) with strictBindings enabled", issues.len());
    }

    Ok(())
}
