pub(crate) mod collection;
mod repository;

pub use repository::{EntityRepository, RefreshSnapshot};
