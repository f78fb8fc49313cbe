//! Services shared by the verification engine and the managers: directory
//! listing and comparison, the file mutation service, registry snapshots,
//! XML record access, settings and the run context.

pub mod cancel;
pub mod context;
pub mod document;
pub mod error;
pub mod files;
pub mod progress;
pub mod registry;
pub mod settings;
pub mod transform;

pub use cancel::CancelToken;
pub use context::{RunContext, Selection};
pub use document::Record;
pub use error::LibError;
pub use files::{FileOps, compare_files, is_cache_path, list_sub_directories};
pub use progress::ProgressEvent;
pub use registry::{MemoryRegistry, RegFile, RegValue, Registry};
pub use settings::Settings;
pub use transform::{TransformRequest, TransformRunner};
