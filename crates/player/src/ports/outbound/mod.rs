//! Outbound ports - Interfaces for external services
//!
//! These ports define the contracts that infrastructure adapters must implement,
//! allowing application services to interact with external systems without
//! depending on concrete implementations.

pub mod clock_port;
pub mod raw_api_port;
pub mod snapshot_store_port;

pub use clock_port::ClockPort;
pub use raw_api_port::{ApiError, RawApiPort};
pub use snapshot_store_port::{storage_keys, PersistedGame, SnapshotStorePort, StorageError};

#[cfg(test)]
pub use clock_port::MockClockPort;
#[cfg(test)]
pub use raw_api_port::MockRawApiPort;
#[cfg(test)]
pub use snapshot_store_port::MockSnapshotStorePort;
