mod errors;
mod table;
mod types;
mod versioning;

pub use errors::DeleteFileError;
pub use errors::ModifyFileError;
pub(crate) use table::MetadataTable;
pub use types::BlockRef;
pub use types::FileVersion;
pub use types::ReadFileOutput;
pub(crate) use versioning::MetadataService;
pub(crate) use versioning::WriteGuard;
