mod frequency;
pub use frequency::*;

mod recurrence;
pub use recurrence::*;

mod plan;
pub use plan::*;

mod upsert;
pub use upsert::*;

#[cfg(feature = "backend")]
mod sqlite_store;
#[cfg(feature = "backend")]
pub use sqlite_store::*;

mod view;
pub use view::*;
