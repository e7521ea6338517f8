//! Query translation engines
//!
//! One fresh engine instance per concern per request:
//! - `filter` - AND filters and OR groups via operator strategy dispatch
//! - `sort` - sort-key resolution and direction
//! - `pagination` - offset/limit execution, counting, response building
//! - `strategies` - the default operator strategy set

pub mod filter;
pub mod pagination;
pub mod sort;
pub mod strategies;

pub use filter::FilterEngine;
pub use pagination::PaginationEngine;
pub use sort::SortEngine;
pub use strategies::FilterStrategy;
