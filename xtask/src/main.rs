use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::*;
use std::process::{Command, Stdio};
use std::time::Instant;

/// Size of a retail ROM0 boot image
const ROM0_SIZE: u64 = 4 * 1024 * 1024;

#[derive(Parser)]
#[command(name = "x")]
#[command(about = "Development automation for ps2rx")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Restrict `cargo test --lib` to individual core modules
#[derive(Args, Default, Clone, Copy)]
struct ModuleFilter {
    /// Run only CPU module tests
    #[arg(long)]
    cpu: bool,
    /// Run only address space tests
    #[arg(long)]
    memory: bool,
    /// Run only DMA controller tests
    #[arg(long)]
    dma: bool,
    /// Run only timer tests
    #[arg(long)]
    timer: bool,
    /// Run only System module tests
    #[arg(long)]
    system: bool,
}

impl ModuleFilter {
    fn selected(&self) -> Vec<(&'static str, &'static str)> {
        [
            (self.cpu, "core::cpu", "CPU"),
            (self.memory, "core::memory", "Memory"),
            (self.dma, "core::dma", "DMA"),
            (self.timer, "core::timer", "Timer"),
            (self.system, "core::system", "System"),
        ]
        .into_iter()
        .filter(|(enabled, _, _)| *enabled)
        .map(|(_, path, name)| (path, name))
        .collect()
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run all CI checks (fmt, clippy, build, test)
    Ci {
        #[arg(long)]
        verbose: bool,
    },
    /// Quick checks before commit (fmt, clippy)
    Check {
        #[arg(long)]
        verbose: bool,
    },
    /// Format code
    Fmt {
        #[arg(long)]
        check: bool,
    },
    /// Run clippy
    Clippy {
        #[arg(long)]
        fix: bool,
    },
    /// Build the project
    Build {
        #[arg(long)]
        release: bool,
    },
    /// Run tests
    Test {
        #[arg(long)]
        doc: bool,
        #[arg(long)]
        ignored: bool,
        #[command(flatten)]
        modules: ModuleFilter,
    },
    /// Run benchmarks
    Bench,
    /// Boot a ROM0 image through the ps2rx binary
    FirmwareBoot {
        /// Path to the ROM0 image
        #[arg(default_value = "SCPH-70012.BIN")]
        rom0_path: String,
        /// Number of ticks to run
        #[arg(short = 'n', long, default_value = "100000")]
        ticks: u64,
        /// Build in release mode
        #[arg(long)]
        release: bool,
    },
    /// Pre-commit hook (fmt, clippy, test)
    PreCommit,
    /// Install git hooks
    InstallHooks,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ci { verbose } => run_ci(verbose),
        Commands::Check { verbose } => run_check(verbose),
        Commands::Fmt { check } => run_fmt(check),
        Commands::Clippy { fix } => run_clippy(fix),
        Commands::Build { release } => run_build(release),
        Commands::Test {
            doc,
            ignored,
            modules,
        } => run_test(doc, ignored, modules),
        Commands::Bench => run_bench(),
        Commands::FirmwareBoot {
            rom0_path,
            ticks,
            release,
        } => run_firmware_boot(&rom0_path, ticks, release),
        Commands::PreCommit => run_pre_commit(),
        Commands::InstallHooks => install_hooks(),
    }
}

fn run_ci(verbose: bool) -> Result<()> {
    println!("{}", "=== Running CI Pipeline ===".bold().blue());

    let start = Instant::now();

    run_task("Format Check", || run_fmt(true), verbose)?;
    run_task("Clippy", || run_clippy(false), verbose)?;
    run_task("Build", || run_build(false), verbose)?;
    run_task(
        "Test",
        || run_test(false, false, ModuleFilter::default()),
        verbose,
    )?;

    report_elapsed("✓ CI passed in", start);
    Ok(())
}

fn run_check(verbose: bool) -> Result<()> {
    println!("{}", "=== Running Quick Checks ===".bold().blue());

    let start = Instant::now();

    run_task("Format Check", || run_fmt(true), verbose)?;
    run_task("Clippy", || run_clippy(false), verbose)?;

    report_elapsed("✓ Checks passed in", start);
    Ok(())
}

fn run_fmt(check: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("fmt").arg("--all");

    if check {
        cmd.arg("--").arg("--check");
    }

    execute_command(&mut cmd)
}

fn run_clippy(fix: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("clippy").arg("--workspace").arg("--all-targets");

    if fix {
        cmd.arg("--fix");
    } else {
        cmd.arg("--").arg("-D").arg("warnings");
    }

    execute_command(&mut cmd)
}

fn run_build(release: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("build");

    if release {
        cmd.arg("--release");
    }

    execute_command(&mut cmd)
}

fn run_test(doc: bool, ignored: bool, modules: ModuleFilter) -> Result<()> {
    let selected = modules.selected();

    if doc || selected.is_empty() {
        let mut cmd = Command::new("cargo");
        cmd.arg("test");
        if doc {
            cmd.arg("--doc");
        }
        if ignored {
            cmd.arg("--").arg("--ignored");
        }
        return execute_command(&mut cmd);
    }

    let mut failed = Vec::new();

    for (module_path, module_name) in &selected {
        println!("{} Running {} tests...", "→".blue(), module_name.bold());

        let mut cmd = Command::new("cargo");
        cmd.arg("test").arg("--lib").arg(module_path);

        if ignored {
            cmd.arg("--").arg("--ignored");
        }

        match execute_command(&mut cmd) {
            Ok(()) => println!("{} {} tests passed\n", "✓".green(), module_name),
            Err(e) if selected.len() == 1 => return Err(e),
            Err(_) => {
                println!("{} {} tests failed\n", "✗".red(), module_name);
                failed.push(*module_name);
            }
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("Module tests failed: {}", failed.join(", "))
    }
}

fn run_bench() -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("bench");

    execute_command(&mut cmd)
}

fn run_firmware_boot(rom0_path: &str, ticks: u64, release: bool) -> Result<()> {
    use std::fs;
    use std::path::Path;

    println!("{}", "=== Firmware Boot ===".bold().blue());

    let path = Path::new(rom0_path);
    if !path.exists() {
        println!(
            "{} ROM0 image not found: {}",
            "✗".red().bold(),
            rom0_path.yellow()
        );
        println!(
            "\n{} Pass the path to a ROM0 dump, e.g. `cargo x firmware-boot SCPH-70012.BIN`.",
            "ℹ".blue()
        );
        anyhow::bail!("ROM0 image not found");
    }

    let size = fs::metadata(path)?.len();
    if size != ROM0_SIZE {
        println!(
            "{} Unusual ROM0 size: {} bytes (retail dumps are {} bytes)",
            "!".yellow().bold(),
            size,
            ROM0_SIZE
        );
    }

    println!("{} ROM0: {}", "✓".green(), rom0_path.cyan());
    println!("{} Ticks: {}", "→".blue(), ticks.to_string().bold());
    println!(
        "{} Build mode: {}",
        "→".blue(),
        if release {
            "release".green().bold()
        } else {
            "debug".yellow().bold()
        }
    );
    println!();

    let start = Instant::now();

    let mut cmd = Command::new("cargo");
    cmd.arg("run").arg("--bin").arg("ps2rx");

    if release {
        cmd.arg("--release");
    }

    cmd.arg("--")
        .arg(rom0_path)
        .arg("-n")
        .arg(ticks.to_string());

    let status = cmd
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()?;

    if !status.success() {
        println!("\n{} Firmware boot stopped early", "✗".red().bold());
        anyhow::bail!("ps2rx exited with: {}", status);
    }

    report_elapsed("✓ Firmware boot completed in", start);
    Ok(())
}

fn run_pre_commit() -> Result<()> {
    println!("{}", "=== Pre-commit Checks ===".bold().blue());

    let start = Instant::now();

    run_task("Format Check", || run_fmt(true), false)?;
    run_task("Clippy", || run_clippy(false), false)?;
    run_task(
        "Test",
        || run_test(false, false, ModuleFilter::default()),
        false,
    )?;

    report_elapsed("✓ Pre-commit checks passed in", start);
    Ok(())
}

fn install_hooks() -> Result<()> {
    use std::fs;

    println!("{}", "Installing git hooks...".bold());

    let hook_content = r#"#!/bin/sh
# Installed by cargo x install-hooks
set -e

cargo x pre-commit
"#;

    let hook_path = ".git/hooks/pre-commit";
    fs::write(hook_path, hook_content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mut perms = fs::metadata(hook_path)?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(hook_path, perms)?;
    }

    println!("{}", "✓ Git hooks installed".green());

    Ok(())
}

fn report_elapsed(label: &str, start: Instant) {
    println!(
        "\n{} {}",
        label.green().bold(),
        format!("{:.2}s", start.elapsed().as_secs_f64()).bold()
    );
}

fn run_task<F>(name: &str, task: F, verbose: bool) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    print!("{} {} ... ", "→".blue(), name);

    let start = Instant::now();

    match task() {
        Ok(()) => {
            if verbose {
                println!(
                    "{} ({:.2}s)",
                    "✓".green().bold(),
                    start.elapsed().as_secs_f64()
                );
            } else {
                println!("{}", "✓".green().bold());
            }
            Ok(())
        }
        Err(e) => {
            println!("{}", "✗".red().bold());
            Err(e)
        }
    }
}

fn execute_command(cmd: &mut Command) -> Result<()> {
    let status = cmd
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()?;

    if !status.success() {
        anyhow::bail!("Command failed with exit code: {}", status);
    }

    Ok(())
}
