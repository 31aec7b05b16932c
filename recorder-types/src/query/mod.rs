//! Ordering and result-window primitives shared by both managers.
//!
//! Both types are purely descriptive. Each manager interprets a `Sort` over
//! its own sort-key enum and applies `Paging` after filtering and sorting.

mod paging;
mod sort;

pub use paging::Paging;
pub use sort::{ParseSortError, Sort, SortDirection};
