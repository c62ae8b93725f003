//! Proof file I/O.
//!
//! JSON, CBOR and bincode read/write with extension-based auto-detection.
//! Unknown or missing extensions are rejected for reads and default to JSON
//! for writes.

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::StarkProof;

/// On-disk encodings understood by [`read_proof_auto`] / [`write_proof_auto`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProofFormat {
    /// Pretty JSON with hex strings.
    Json,
    /// CBOR via `ciborium`.
    Cbor,
    /// `bincode` (v1, default options).
    Bincode,
}

impl ProofFormat {
    /// Format implied by a path's extension (case-insensitive).
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match ext_lower(path).as_deref() {
            Some("json") => Some(Self::Json),
            Some("cbor") => Some(Self::Cbor),
            Some("bin" | "bincode") => Some(Self::Bincode),
            _ => None,
        }
    }
}

/// Ensure the parent directory for a file exists (no-op if none).
fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating parent directory {}", display(path)))?;
        }
    }
    Ok(())
}

/// Read a [`StarkProof`] in the given format.
pub fn read_proof<P: AsRef<Path>>(path: P, format: ProofFormat) -> Result<StarkProof> {
    let path_ref = path.as_ref();
    let f = File::open(path_ref).with_context(|| format!("open {}", display(path_ref)))?;
    let mut rdr = BufReader::new(f);
    let proof = match format {
        ProofFormat::Json => {
            serde_json::from_reader(rdr).with_context(|| "deserialize JSON proof")?
        }
        ProofFormat::Cbor => {
            ciborium::de::from_reader(&mut rdr).with_context(|| "deserialize CBOR proof")?
        }
        ProofFormat::Bincode => {
            bincode::deserialize_from(rdr).with_context(|| "deserialize bincode proof")?
        }
    };
    Ok(proof)
}

/// Write a [`StarkProof`] in the given format.
pub fn write_proof<P: AsRef<Path>>(path: P, proof: &StarkProof, format: ProofFormat) -> Result<()> {
    let path_ref = path.as_ref();
    ensure_parent_dir(path_ref)?;
    let f = File::create(path_ref).with_context(|| format!("create {}", display(path_ref)))?;
    let mut w = BufWriter::new(f);
    match format {
        ProofFormat::Json => {
            serde_json::to_writer_pretty(w, proof).with_context(|| "serialize JSON proof")?;
        }
        ProofFormat::Cbor => {
            ciborium::ser::into_writer(proof, &mut w).with_context(|| "serialize CBOR proof")?;
        }
        ProofFormat::Bincode => {
            bincode::serialize_into(w, proof).with_context(|| "serialize bincode proof")?;
        }
    }
    Ok(())
}

/// Auto-detect read by extension `.json` / `.cbor` / `.bin`.
pub fn read_proof_auto<P: AsRef<Path>>(path: P) -> Result<StarkProof> {
    let path_ref = path.as_ref();
    match ProofFormat::from_path(path_ref) {
        Some(format) => read_proof(path_ref, format),
        None => match ext_lower(path_ref) {
            Some(other) => Err(anyhow!(
                "unsupported proof extension: {} (supported: .json, .cbor, .bin)",
                other
            )),
            None => Err(anyhow!("path has no extension (expected .json, .cbor or .bin)")),
        },
    }
}

/// Auto-detect write (defaults to **JSON** if unknown or missing).
pub fn write_proof_auto<P: AsRef<Path>>(path: P, proof: &StarkProof) -> Result<()> {
    let path_ref = path.as_ref();
    let format = ProofFormat::from_path(path_ref).unwrap_or(ProofFormat::Json);
    write_proof(path_ref, proof, format)
}

/// Read any JSON document (configuration files).
pub fn read_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let path_ref = path.as_ref();
    let f = File::open(path_ref).with_context(|| format!("open {}", display(path_ref)))?;
    serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("deserialize JSON {}", display(path_ref)))
}

/// Return the lowercase extension (without dot) if present.
fn ext_lower(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

/// Human-friendly path display for error messages.
fn display(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
