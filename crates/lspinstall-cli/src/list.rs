//! List command - show every known server and whether it is installed.

use anyhow::Result;
use clap::Args;
use console::style;

use lspinstall_core::{Error, Source, SourceRegistry};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show installed servers
    #[arg(long)]
    pub installed: bool,
}

pub fn execute(args: ListArgs, registry: &SourceRegistry) -> Result<i32> {
    let mut failed = false;

    for source in registry.all() {
        match source.installed() {
            Ok(installed) => {
                if args.installed && !installed {
                    continue;
                }
                println!("{}", status_line(source, installed));
            }
            Err(e) => {
                failed = true;
                println!("{}", error_line(source, &e));
            }
        }
    }

    Ok(if failed { 1 } else { 0 })
}

fn status_line(source: &Source, installed: bool) -> String {
    let status = if installed {
        style("is installed").green()
    } else {
        style("not installed").red()
    };

    format!(
        "{} {} {}",
        style(source.name()).bold(),
        status,
        style(format!("({})", source.kind())).dim()
    )
}

fn error_line(source: &Source, error: &Error) -> String {
    let reason = match error.backend() {
        Some(cause) => cause.to_string(),
        None => error.to_string(),
    };

    format!(
        "{} {} {}",
        style(source.name()).bold(),
        style(format!("unknown ({})", reason)).yellow(),
        style(format!("({})", source.kind())).dim()
    )
}
