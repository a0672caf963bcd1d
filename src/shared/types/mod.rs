pub mod envelope;
pub mod errors;
pub mod pagination;
pub mod sort;

pub use envelope::*;
pub use errors::*;
pub use pagination::*;
pub use sort::*;
