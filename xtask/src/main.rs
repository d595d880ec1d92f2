use std::process::{exit, Command};

use clap::{Parser, Subcommand};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the item fetcher workspace"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Invoke the optimize-source function via the itemfetch binary
    Fetch {
        /// Extra flags forwarded to itemfetch (e.g. --items-to-get 5)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Run CI checks (fmt, clippy, tests)
    Ci,
}

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn run_cargo(args: &[&str]) {
    eprintln!("+ cargo {}", args.join(" "));
    let status = Command::new("cargo")
        .args(args)
        .status()
        .expect("failed to execute cargo");
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&["clippy", "--all-targets", "--", "-D", "warnings"]);

    step("Test itemfetch_core");
    run_cargo(&["test", "-p", "itemfetch_core"]);

    step("Test itemfetch_cli");
    run_cargo(&["test", "-p", "itemfetch_cli"]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch { args } => {
            let mut cargo_args = vec!["run", "-p", "itemfetch_cli", "--bin", "itemfetch"];
            if !args.is_empty() {
                cargo_args.push("--");
                cargo_args.extend(args.iter().map(String::as_str));
            }
            run_cargo(&cargo_args);
        }
        Commands::Ci => {
            ci_check();
            eprintln!("\nCI job passed.");
        }
    }
}
