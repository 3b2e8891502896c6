//! Objects used to read DQBF instances and write answers.

mod dqcir_reader;
pub use dqcir_reader::DqcirReader;

mod model_writer;
pub use model_writer::ModelWriter;

mod specs;
pub use specs::InstanceReader;
pub use specs::WarningHandler;
