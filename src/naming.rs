//! Derivative identifiers.
//!
//! Every source image gets one identifier, shared by all of its derivatives
//! (`<id>.webp` and `<id>-preview.jpg` belong together). Two strategies:
//!
//! - [`NamingStrategy::Random`]: 8 bytes from a CSPRNG, hex-encoded to 16
//!   characters. A re-run produces different names for the same sources.
//! - [`NamingStrategy::Content`]: the first 16 hex characters of the SHA-256
//!   of the source file. Stable across runs; byte-identical sources in the
//!   same album collapse to one id and the later ones are reported as
//!   duplicates.
//!
//! Uniqueness is only guaranteed within one album's run, tracked by an owned
//! [`HashRegistry`]. Nothing is persisted between runs.

use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::io;
use std::path::Path;

/// Random bytes per identifier.
pub const ID_BYTES: usize = 8;

/// Identifier length in hex characters.
pub const ID_LEN: usize = ID_BYTES * 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NamingStrategy {
    Random,
    Content,
}

/// Identifiers already handed out during one album's run.
#[derive(Debug, Default)]
pub struct HashRegistry {
    used: HashSet<String>,
}

impl HashRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.used.contains(id)
    }

    fn insert(&mut self, id: String) {
        self.used.insert(id);
    }
}

/// Outcome of allocating an identifier for one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Allocation {
    Fresh(String),
    /// Content naming only: the id already belongs to an identical source.
    Duplicate(String),
}

/// A fresh random identifier: 16 lowercase hex characters.
pub fn random_id() -> String {
    let mut bytes = [0u8; ID_BYTES];
    rand::rng().fill(&mut bytes);
    hex::encode(bytes)
}

/// Allocate a random identifier not yet in `registry`, and record it.
pub fn allocate(registry: &mut HashRegistry) -> String {
    allocate_from(registry, random_id)
}

/// Retry `generate` until it yields an unused id. No retry bound.
fn allocate_from(registry: &mut HashRegistry, mut generate: impl FnMut() -> String) -> String {
    loop {
        let candidate = generate();
        if !registry.contains(&candidate) {
            registry.insert(candidate.clone());
            return candidate;
        }
        log::debug!("Identifier collision on {candidate}, retrying");
    }
}

/// Identifier derived from the file's SHA-256.
pub fn content_id(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    let mut id = hex::encode(Sha256::digest(&bytes));
    id.truncate(ID_LEN);
    Ok(id)
}

/// Allocate an identifier for `source` under the given strategy.
///
/// Only content naming reads the file, and only it can report a duplicate.
pub fn allocate_for(
    registry: &mut HashRegistry,
    strategy: NamingStrategy,
    source: &Path,
) -> io::Result<Allocation> {
    match strategy {
        NamingStrategy::Random => Ok(Allocation::Fresh(allocate(registry))),
        NamingStrategy::Content => {
            let id = content_id(source)?;
            if registry.contains(&id) {
                Ok(Allocation::Duplicate(id))
            } else {
                registry.insert(id.clone());
                Ok(Allocation::Fresh(id))
            }
        }
    }
}
