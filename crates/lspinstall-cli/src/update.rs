//! Update command - bring an installed server to its latest version.

use anyhow::Result;
use clap::Args;
use console::style;

use lspinstall_core::SourceRegistry;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Server to update
    #[arg(value_name = "NAME")]
    pub name: String,
}

pub fn execute(args: UpdateArgs, registry: &SourceRegistry) -> Result<i32> {
    let source = registry.lookup(&args.name)?;

    if !source.installed()? {
        eprintln!(
            "{} {} is not installed, use {} first",
            style("Warning:").yellow().bold(),
            args.name,
            style(format!("lspinstall install {}", args.name)).cyan()
        );
        return Ok(1);
    }

    println!("{} {}", style("Updating").green().bold(), args.name);
    source.update()?;
    println!("{} {}", style("Updated").green().bold(), args.name);

    Ok(0)
}
