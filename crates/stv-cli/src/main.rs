// crates/stv-cli/src/main.rs

#![forbid(unsafe_code)]
#![deny(
    rust_2018_idioms,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo
)]

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use stv_core::io::{read_json, read_proof_auto, write_proof_auto};
use stv_core::ProofSummary;
use stv_stark::{ConstraintSystem, Fibonacci, FibonacciConfig, Verdict};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "stv",
    about = "STARK proof verifier",
    long_about = "STARK proof verifier.\n\nChecks proofs against a built-in program and inspects proof files (JSON, CBOR or bincode, chosen by extension).",
    version = env!("CARGO_PKG_VERSION"),
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Verify a proof; exits non-zero if it is rejected
    Verify {
        /// Proof file (.json/.cbor/.bin)
        #[arg(long)]
        proof: PathBuf,

        /// Program the proof claims to execute
        #[arg(long, value_enum, default_value_t = ProgramOpt::Fibonacci)]
        program: ProgramOpt,

        /// Program configuration (JSON); defaults apply to missing keys
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print a JSON summary of a proof's shape and derived parameters
    Inspect {
        /// Proof file (.json/.cbor/.bin)
        #[arg(long)]
        proof: PathBuf,

        /// Program used to derive parameters from the public inputs
        #[arg(long, value_enum, default_value_t = ProgramOpt::Fibonacci)]
        program: ProgramOpt,

        /// Program configuration (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Re-encode a proof file (format chosen by extension)
    Convert {
        /// Input proof file
        #[arg(long)]
        input: PathBuf,

        /// Output proof file
        #[arg(long)]
        output: PathBuf,
    },
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
enum ProgramOpt {
    Fibonacci,
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Verify {
            proof,
            program,
            config,
        } => verify(&proof, program, config.as_deref()),

        Cmd::Inspect {
            proof,
            program,
            config,
        } => inspect(&proof, program, config.as_deref()),

        Cmd::Convert { input, output } => convert(&input, &output),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().with_target(false).with_level(true).compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn load_program(program: ProgramOpt, config: Option<&Path>) -> Result<Box<dyn ConstraintSystem>> {
    match program {
        ProgramOpt::Fibonacci => {
            let config: FibonacciConfig = match config {
                Some(path) => read_json(path)
                    .with_context(|| format!("loading Fibonacci config {}", path.display()))?,
                None => FibonacciConfig::default(),
            };
            info!(?config, "fibonacci program");
            Ok(Box::new(Fibonacci::new(config)))
        }
    }
}

fn verify(proof_path: &Path, program: ProgramOpt, config: Option<&Path>) -> Result<()> {
    let cs = load_program(program, config)?;
    info!(proof=%proof_path.display(), ?program, "verifying proof");
    let proof = read_proof_auto(proof_path)
        .with_context(|| format!("reading proof {}", proof_path.display()))?;

    let verdict = stv_stark::verify(&proof, &*cs)
        .with_context(|| format!("malformed proof {}", proof_path.display()))?;
    match verdict {
        Verdict::Accepted => {
            println!("OK: {} accepted", proof_path.display());
            Ok(())
        }
        Verdict::Rejected(reason) => bail!("{} rejected: {reason}", proof_path.display()),
    }
}

#[derive(Serialize)]
struct Inspection {
    path: String,
    #[serde(flatten)]
    summary: ProofSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    params_error: Option<String>,
}

fn inspect(proof_path: &Path, program: ProgramOpt, config: Option<&Path>) -> Result<()> {
    let cs = load_program(program, config)?;
    let proof = read_proof_auto(proof_path)
        .with_context(|| format!("reading proof {}", proof_path.display()))?;

    let mut summary = proof.summary();
    let params_error = match cs.initialize(&proof.public_inputs) {
        Ok((params, _)) => {
            summary.params = Some(params);
            None
        }
        Err(e) => {
            warn!(error=%e, "public inputs do not decode for this program");
            Some(e.to_string())
        }
    };

    let report = Inspection {
        path: proof_path.display().to_string(),
        summary,
        params_error,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("serialize summary")?
    );
    Ok(())
}

fn convert(input: &Path, output: &Path) -> Result<()> {
    info!(infile=%input.display(), outfile=%output.display(), "converting proof");
    let proof = read_proof_auto(input).with_context(|| format!("reading proof {}", input.display()))?;
    write_proof_auto(output, &proof)
        .with_context(|| format!("writing proof {}", output.display()))?;
    println!("Converted {} → {}", input.display(), output.display());
    Ok(())
}
