pub mod filter;
pub mod loader;
pub mod model;
pub mod parser;

pub use filter::{filter, section_counts, SectionCount, ALL_SECTIONS};
pub use loader::{load_catalog, Catalog};
pub use model::{IdSequence, Query, SectionMap};
pub use parser::QueryParser;
