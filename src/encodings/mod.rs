//! Translation of gate circuits into CNF.

mod tseitin;
pub use tseitin::TseitinEncoder;
