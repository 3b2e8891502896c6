//! Miscellaneous components used in the library.

mod counter;
pub use counter::IdCounter;

mod var_names;
pub use var_names::VarNames;
