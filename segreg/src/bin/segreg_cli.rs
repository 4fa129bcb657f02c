//! Command-line demo for segmented regression: reads `x,y` pairs from a
//! CSV-ish file (or stdin) and prints the fitted tree.

use clap::Parser;
use segreg::{compute_regression, Mode, RegressionOptions};
use std::io::{self, Read};
use std::path::PathBuf;

/// Fit a segmented linear regression over `x,y` observations.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a file of `x,y` lines. Reads stdin if omitted.
    input: Option<PathBuf>,

    /// Scoring mode.
    #[arg(long, value_enum, default_value = "bic")]
    mode: CliMode,

    /// Epsilon for the noise-tolerance predicate. Defaults to `min|y|`.
    #[arg(long)]
    epsilon: Option<f64>,

    /// Run the post-hoc simplifier after splitting.
    #[arg(long)]
    simplify: bool,

    /// Also print the fitted tree as a Graphviz DOT graph.
    #[arg(long)]
    dot: bool,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum CliMode {
    Rss,
    Aic,
    Bic,
}

impl From<CliMode> for Mode {
    fn from(mode: CliMode) -> Self {
        match mode {
            CliMode::Rss => Mode::Rss,
            CliMode::Aic => Mode::Aic,
            CliMode::Bic => Mode::Bic,
        }
    }
}

fn read_observations(cli: &Cli) -> io::Result<(Vec<f64>, Vec<f64>)> {
    let text = match &cli.input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().lock().read_to_string(&mut buf)?;
            buf
        }
    };
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut parts = line.splitn(2, [',', ' ', '\t']);
        let x: f64 = parts
            .next()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or_else(|| die(&format!("malformed line: {line:?}")));
        let y: f64 = parts
            .next()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or_else(|| die(&format!("malformed line: {line:?}")));
        xs.push(x);
        ys.push(y);
    }
    Ok((xs, ys))
}

fn die(message: &str) -> ! {
    eprintln!("error: {message}");
    std::process::exit(1);
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let (xs, ys) = match read_observations(&cli) {
        Ok(pairs) => pairs,
        Err(e) => die(&format!("reading input: {e}")),
    };

    let options = RegressionOptions {
        mode: cli.mode.into(),
        epsilon: cli.epsilon,
        simplify: cli.simplify,
    };

    match compute_regression(&xs, &ys, options) {
        Ok(tree) => {
            println!("{tree}");
            println!(
                "breakpoints: {:?}",
                tree.breakpoints()
                    .iter()
                    .map(|x| format!("{x:.3e}"))
                    .collect::<Vec<_>>()
            );
            println!("RSS = {:.6e}, MSE = {:.6e}", tree.rss(), tree.mse());
            if cli.dot {
                println!("{}", tree.to_dot());
            }
        }
        Err(e) => die(&e.to_string()),
    }
}
