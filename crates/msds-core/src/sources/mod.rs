//! Source plugins for fetching chemical data from online databases

pub mod kosha;
pub mod pubchem;
pub mod traits;

pub use kosha::KoshaSource;
pub use pubchem::PubChemSource;
pub use traits::*;
