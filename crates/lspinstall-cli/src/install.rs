//! Install command - install servers that are not present yet.

use anyhow::Result;
use clap::Args;
use console::style;

use lspinstall_core::SourceRegistry;

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Servers to install, in order
    #[arg(value_name = "NAMES", required = true)]
    pub names: Vec<String>,
}

pub fn execute(args: InstallArgs, registry: &SourceRegistry) -> Result<i32> {
    for name in &args.names {
        let source = registry.lookup(name)?;

        if source.installed()? {
            eprintln!(
                "{} {} is already installed, use {} to get the latest version",
                style("Warning:").yellow().bold(),
                name,
                style(format!("lspinstall update {}", name)).cyan()
            );
            return Ok(1);
        }

        println!("{} {}", style("Installing").green().bold(), name);
        source.install()?;
        println!("{} {}", style("Installed").green().bold(), name);
    }

    Ok(0)
}
