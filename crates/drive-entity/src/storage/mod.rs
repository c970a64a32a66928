pub mod model;

pub use model::{KindUsage, OwnedStorageBreakdown, StorageLimit, StorageQuotaRow};
