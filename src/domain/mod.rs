// Order data shapes shared by the generator, the enrichment core and the I/O layer

pub mod enriched;
pub mod order;

pub use enriched::*;
pub use order::*;
