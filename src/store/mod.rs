pub mod record_store;
pub mod snapshot;

pub use record_store::RecordStore;
pub use snapshot::Snapshot;
