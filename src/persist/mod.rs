//! # Persistence Module
//!
//! Serialization of explicitly edited chunks. The world regenerates
//! deterministically from its seed, so terrain is never worth saving; only
//! the chunks a player has modified are exported, as raw block arrays keyed
//! by chunk coordinate. Unknown block bytes in saved data decode to air, so
//! old saves keep loading after the block set grows.

use serde::{Deserialize, Serialize};

use crate::voxels::block::{BlockId, RawBlockId};
use crate::voxels::chunk::{Chunk, CHUNK_VOLUME};
use crate::voxels::chunk_store::ChunkCoord;

/// A single edited chunk in its serialized form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedChunk {
    /// Coordinate of the saved chunk.
    pub coord: ChunkCoord,
    /// Raw block bytes in dense array order.
    pub blocks: Vec<RawBlockId>,
}

impl SavedChunk {
    /// Captures a chunk's block data for saving.
    pub fn capture(chunk: &Chunk) -> Self {
        SavedChunk {
            coord: chunk.coord,
            blocks: chunk.blocks().iter().map(|block| block.to_raw()).collect(),
        }
    }

    /// Captures already-extracted block data, as held by the store's
    /// retention overlay.
    pub(crate) fn from_raw_blocks(coord: ChunkCoord, blocks: &[BlockId]) -> Self {
        SavedChunk {
            coord,
            blocks: blocks.iter().map(|block| block.to_raw()).collect(),
        }
    }

    /// Decodes the saved bytes back into a block array of exactly one
    /// chunk volume. Short data is padded with air, extra data is dropped,
    /// and unknown bytes decode to air.
    pub fn to_blocks(&self) -> Box<[BlockId]> {
        let mut blocks = Vec::with_capacity(CHUNK_VOLUME);
        blocks.extend(
            self.blocks
                .iter()
                .take(CHUNK_VOLUME)
                .map(|&raw| BlockId::from_raw(raw)),
        );
        blocks.resize(CHUNK_VOLUME, BlockId::Air);
        blocks.into_boxed_slice()
    }
}

/// Serializes saved chunks to a JSON document.
///
/// # Errors
/// Returns the underlying `serde_json` error; with well-formed input this
/// does not fail.
pub fn to_json(saved: &[SavedChunk]) -> Result<String, serde_json::Error> {
    serde_json::to_string(saved)
}

/// Parses saved chunks from a JSON document.
///
/// # Errors
/// Returns the underlying `serde_json` error for malformed documents.
pub fn from_json(json: &str) -> Result<Vec<SavedChunk>, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::chunk::block_index;

    #[test]
    fn capture_and_decode_round_trip() {
        let mut chunk = Chunk::empty(ChunkCoord::new(3, -9));
        chunk.set(1, 2, 3, BlockId::Wood);
        chunk.set(15, 127, 15, BlockId::Leaves);

        let saved = SavedChunk::capture(&chunk);
        let blocks = saved.to_blocks();
        assert_eq!(blocks[block_index(1, 2, 3)], BlockId::Wood);
        assert_eq!(blocks[block_index(15, 127, 15)], BlockId::Leaves);
    }

    #[test]
    fn json_round_trip_preserves_the_save() {
        let mut chunk = Chunk::empty(ChunkCoord::new(-1, 4));
        chunk.set(0, 10, 0, BlockId::Stone);
        let saved = vec![SavedChunk::capture(&chunk)];

        let json = to_json(&saved).unwrap();
        let parsed = from_json(&json).unwrap();
        assert_eq!(parsed, saved);
    }

    #[test]
    fn truncated_or_oversized_saves_degrade_gracefully() {
        let short = SavedChunk {
            coord: ChunkCoord::new(0, 0),
            blocks: vec![BlockId::Stone.to_raw(); 10],
        };
        let blocks = short.to_blocks();
        assert_eq!(blocks.len(), CHUNK_VOLUME);
        assert_eq!(blocks[0], BlockId::Stone);
        assert_eq!(blocks[CHUNK_VOLUME - 1], BlockId::Air);

        let long = SavedChunk {
            coord: ChunkCoord::new(0, 0),
            blocks: vec![BlockId::Dirt.to_raw(); CHUNK_VOLUME + 10],
        };
        assert_eq!(long.to_blocks().len(), CHUNK_VOLUME);
    }

    #[test]
    fn unknown_block_bytes_decode_to_air() {
        let saved = SavedChunk {
            coord: ChunkCoord::new(0, 0),
            blocks: vec![255; CHUNK_VOLUME],
        };
        assert!(saved.to_blocks().iter().all(|&b| b == BlockId::Air));
    }
}
