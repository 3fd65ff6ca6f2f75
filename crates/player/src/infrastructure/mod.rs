//! Infrastructure adapters for the player ports

pub mod clock;
pub mod http_client;
pub mod random;
pub mod storage;

pub use clock::SystemClock;
pub use http_client::ReqwestApiAdapter;
pub use random::SeededRandom;
pub use storage::FileSnapshotStore;
