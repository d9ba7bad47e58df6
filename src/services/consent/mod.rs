mod batch;
mod lookup;
mod upsert;

pub mod validation;

pub use batch::UpsertMany;
pub use lookup::Lookup;
pub use upsert::Upsert;
