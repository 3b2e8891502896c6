use crate::dqbf::DqbfInstance;
use anyhow::Result;
use std::io::Read;

/// The type of callback functions to call when warnings are raised while reading an instance.
///
/// Such callback functions take as input the line number and the warning message.
pub type WarningHandler = Box<dyn Fn(usize, String)>;

/// A trait implemented by objects able to read DQBF instances.
///
/// Readers must detect errors encountered while reading an instance and can
/// also raise warnings using the handlers registered through the
/// [add_warning_handler](Self::add_warning_handler) function.
pub trait InstanceReader {
    /// Reads a [`DqbfInstance`].
    ///
    /// In case warnings are raised, the callback functions registered by
    /// [add_warning_handler](Self::add_warning_handler) are triggered.
    ///
    /// # Example
    ///
    /// ```
    /// # use skolibri::io::{DqcirReader, InstanceReader};
    /// # use skolibri::dqbf::DqbfInstance;
    /// fn read_instance_from_str(s: &str) -> DqbfInstance {
    ///     let reader = DqcirReader::default();
    ///     reader.read(&mut s.as_bytes()).expect("invalid DQCIR instance")
    /// }
    /// # read_instance_from_str("exists(y)\noutput(y)\n");
    /// ```
    fn read(&self, reader: &mut dyn Read) -> Result<DqbfInstance>;

    /// Adds a callback function to call when warnings are raised while reading an instance.
    ///
    /// Such callback functions take as input the line number and the warning message.
    fn add_warning_handler(&mut self, h: WarningHandler);
}
