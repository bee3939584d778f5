//! Post-extraction hooks that turn an extracted tree into a runnable program.
//!
//! A hook receives the final destination path of an archive source once
//! extraction has fully succeeded. Hooks only have side effects: marking
//! files executable and writing launcher scripts into the user-local bin
//! directory.

use std::path::{Path, PathBuf};

use crate::util::make_executable;

/// Callback invoked with the destination path after extraction.
pub type FinalizeHook = Box<dyn Fn(&Path) -> std::io::Result<()> + Send + Sync>;

/// Write an executable bash script `bin_dir/name` with the given body.
pub fn write_launcher(bin_dir: &Path, name: &str, body: &str) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(bin_dir)?;

    let script = bin_dir.join(name);
    std::fs::write(&script, format!("#!/usr/bin/env bash\n{}\n", body))?;
    make_executable(&script)?;

    log::debug!("Wrote launcher {}", script.display());
    Ok(script)
}

/// Shell line that execs `program` and forwards all arguments.
fn exec_line(program: &Path) -> std::io::Result<String> {
    Ok(format!("exec \"{}\" \"$@\"", std::path::absolute(program)?.display()))
}

/// Mark the destination itself executable (single-binary sources).
pub fn mark_executable() -> FinalizeHook {
    Box::new(|dest: &Path| make_executable(dest))
}

/// Mark `relative` inside the destination executable.
pub fn mark_executable_at(relative: impl Into<PathBuf>) -> FinalizeHook {
    let relative = relative.into();
    Box::new(move |dest: &Path| make_executable(&dest.join(&relative)))
}

/// Write a launcher `bin_dir/name` that execs `relative` inside the destination.
pub fn exec_launcher(
    bin_dir: impl Into<PathBuf>,
    name: impl Into<String>,
    relative: impl Into<PathBuf>,
) -> FinalizeHook {
    let bin_dir = bin_dir.into();
    let name = name.into();
    let relative = relative.into();

    Box::new(move |dest: &Path| {
        let body = exec_line(&dest.join(&relative))?;
        write_launcher(&bin_dir, &name, &body).map(|_| ())
    })
}

/// Write a launcher `bin_dir/name` that runs `program` with a file from the
/// destination as its first argument, e.g. `dotnet Server.dll`.
pub fn interpreter_launcher(
    bin_dir: impl Into<PathBuf>,
    name: impl Into<String>,
    program: impl Into<String>,
    relative: impl Into<PathBuf>,
) -> FinalizeHook {
    let bin_dir = bin_dir.into();
    let name = name.into();
    let program = program.into();
    let relative = relative.into();

    Box::new(move |dest: &Path| {
        let entry = std::path::absolute(dest.join(&relative))?;
        let body = format!("exec {} \"{}\" \"$@\"", program, entry.display());
        write_launcher(&bin_dir, &name, &body).map(|_| ())
    })
}

/// Run several hooks in order, stopping at the first failure.
pub fn chain(hooks: Vec<FinalizeHook>) -> FinalizeHook {
    Box::new(move |dest: &Path| {
        for hook in &hooks {
            hook(dest)?;
        }
        Ok(())
    })
}
