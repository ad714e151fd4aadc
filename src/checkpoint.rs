//! Snapshots of networks and hierarchies for checkpoint and resume.
//!
//! Binary snapshots start with the `RLCT` magic bytes followed by a bincode
//! body. JSON snapshots are accepted too; [`Checkpoint::load`] tells the two
//! apart by the leading bytes. Training samples are never stored and must be
//! reattached after loading.

use crate::ensemble::Relict;
use crate::error::TopologyError;
use crate::neural::Network;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;

const MAGIC: &[u8; 4] = b"RLCT";

/// What a snapshot holds
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Model {
    Network(Network),
    Relict(Relict),
}

impl Model {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Relict(_) => "relict",
        }
    }

    /// Structural check of the held network or hierarchy
    pub fn check_topology(&self) -> Result<(), TopologyError> {
        match self {
            Self::Network(network) => network.check_topology(),
            Self::Relict(relict) => relict.check_topology(),
        }
    }
}

/// Full-state snapshot
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Version for compatibility checking
    pub version: u32,
    /// Training generation the snapshot was taken at
    pub generation: u64,
    pub model: Model,
}

impl Checkpoint {
    /// Current checkpoint version
    pub const VERSION: u32 = 1;

    pub fn new(generation: u64, model: Model) -> Self {
        Self {
            version: Self::VERSION,
            generation,
            model,
        }
    }

    pub fn from_network(network: Network, generation: u64) -> Self {
        Self::new(generation, Model::Network(network))
    }

    pub fn from_relict(relict: Relict, generation: u64) -> Self {
        Self::new(generation, Model::Relict(relict))
    }

    /// Save as a binary snapshot, replacing any existing file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), CheckpointError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        writer.write_all(MAGIC)?;
        bincode::serialize_into(&mut writer, self)?;
        writer.flush()?;

        Ok(())
    }

    /// Save as pretty-printed JSON, replacing any existing file
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), CheckpointError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;

        Ok(())
    }

    /// Load a binary or JSON snapshot and check the structure of its model
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CheckpointError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;

        let checkpoint: Checkpoint = if let Some(body) = buffer.strip_prefix(MAGIC) {
            bincode::deserialize(body)?
        } else if buffer.iter().find(|b| !b.is_ascii_whitespace()) == Some(&b'{') {
            serde_json::from_slice(&buffer)?
        } else {
            return Err(CheckpointError::InvalidFormat(
                "neither binary magic bytes nor JSON".to_string(),
            ));
        };

        if checkpoint.version != Self::VERSION {
            return Err(CheckpointError::VersionMismatch {
                expected: Self::VERSION,
                found: checkpoint.version,
            });
        }
        checkpoint.model.check_topology()?;

        Ok(checkpoint)
    }

    /// Take the hierarchy out of a relict snapshot
    pub fn into_relict(self) -> Result<Relict, CheckpointError> {
        match self.model {
            Model::Relict(relict) => Ok(relict),
            other => Err(CheckpointError::WrongKind {
                expected: "relict",
                found: other.kind(),
            }),
        }
    }

    /// Take the network out of a network snapshot
    pub fn into_network(self) -> Result<Network, CheckpointError> {
        match self.model {
            Model::Network(network) => Ok(network),
            other => Err(CheckpointError::WrongKind {
                expected: "network",
                found: other.kind(),
            }),
        }
    }

    /// Size of the binary encoding in bytes
    pub fn size_bytes(&self) -> usize {
        bincode::serialized_size(self).map_or(0, |n| n as usize + MAGIC.len())
    }
}

/// Errors that can occur during checkpoint operations
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] bincode::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    #[error("version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
    #[error("malformed model: {0}")]
    Topology(#[from] TopologyError),
    #[error("snapshot holds a {found}, expected a {expected}")]
    WrongKind {
        expected: &'static str,
        found: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RelictConfig;
    use crate::sample::SampleSet;

    fn relict() -> Relict {
        let samples = SampleSet::new()
            .add(vec![0.0, 1.0, 0.0], vec![1.0])
            .build();
        Relict::build(&RelictConfig::default(), samples).unwrap()
    }

    #[test]
    fn test_relict_roundtrip_preserves_prediction() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relict.ckpt");

        let mut original = relict();
        original.mutate();
        let expected = original.predict(&[0.3, 0.1, 0.9]);

        Checkpoint::from_relict(original.clone(), 7).save(&path).unwrap();
        let loaded = Checkpoint::load(&path).unwrap();
        assert_eq!(loaded.generation, 7);

        let mut restored = loaded.into_relict().unwrap();
        assert!(restored.samples().is_empty());
        assert_eq!(restored.predict(&[0.3, 0.1, 0.9]), expected);
    }

    #[test]
    fn test_json_snapshot_is_readable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relict.json");

        let mut original = relict();
        let expected = original.predict(&[1.0, 0.0, 1.0]);
        Checkpoint::from_relict(original, 0).save_json(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"Relict\""));

        let mut restored = Checkpoint::load(&path).unwrap().into_relict().unwrap();
        assert_eq!(restored.predict(&[1.0, 0.0, 1.0]), expected);
    }

    #[test]
    fn test_overwrite_replaces_previous() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relict.ckpt");

        Checkpoint::from_relict(relict(), 1).save(&path).unwrap();
        Checkpoint::from_relict(relict(), 2).save(&path).unwrap();

        assert_eq!(Checkpoint::load(&path).unwrap().generation, 2);
    }

    #[test]
    fn test_wrong_kind() {
        let samples = SampleSet::new().add(vec![1.0], vec![0.0]).build();
        let network = Network::new(1, 2, samples).unwrap();

        let err = Checkpoint::from_network(network, 0).into_relict().unwrap_err();
        assert!(matches!(
            err,
            CheckpointError::WrongKind {
                expected: "relict",
                found: "network"
            }
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.ckpt");
        std::fs::write(&path, b"\x00\x01garbage").unwrap();

        assert!(matches!(
            Checkpoint::load(&path),
            Err(CheckpointError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_truncated_binary_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.ckpt");
        std::fs::write(&path, b"RLCT\x01").unwrap();

        assert!(matches!(
            Checkpoint::load(&path),
            Err(CheckpointError::Serialization(_))
        ));
    }

    #[test]
    fn test_version_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.ckpt");

        let mut checkpoint = Checkpoint::from_relict(relict(), 0);
        checkpoint.version = 0;
        checkpoint.save(&path).unwrap();

        assert!(matches!(
            Checkpoint::load(&path),
            Err(CheckpointError::VersionMismatch { expected: 1, found: 0 })
        ));
    }

    #[test]
    fn test_size_bytes() {
        let size = Checkpoint::from_relict(relict(), 0).size_bytes();
        assert!(size > MAGIC.len());
    }

    #[test]
    fn test_malformed_model_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("malformed.ckpt");

        let mut damaged = relict();
        damaged.layers[0][0].net.layers[0][0].weights.clear();
        Checkpoint::from_relict(damaged, 0).save(&path).unwrap();

        assert!(matches!(
            Checkpoint::load(&path),
            Err(CheckpointError::Topology(TopologyError::Node { layer: 0, node: 0, .. }))
        ));
    }
}
