// League persistence
// MessagePack + LZ4 compression with versioning and integrity checks

pub mod error;
pub mod format;
pub mod store;

pub use error::StoreError;
pub use format::{
    decompress_and_deserialize, serialize_and_compress, LeagueRecord, LeagueStatus, MatchRecord,
    ProbabilityRecord, StoreSnapshot, TeamRecord,
};
pub use store::{FileStore, LeagueStore, MemoryStore};

pub const STORE_VERSION: u32 = 1;
