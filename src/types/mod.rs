pub mod consent;
pub mod error;
pub mod id;
pub mod sensitive;

pub use consent::{
    BatchEntryError, BatchReport, ConsentRecord, ConsentView, Employee, Field, RecordView,
};
pub use error::Error;
pub use id::RecordId;
pub use sensitive::Sensitive;
