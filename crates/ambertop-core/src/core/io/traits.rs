use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Defines the interface for decoding topology file formats.
///
/// Implementors only have to parse from a buffered reader; opening files is
/// shared through the provided [`TopologyFile::read_from_path`].
pub trait TopologyFile {
    /// The decoded representation of the file.
    type Output;

    /// The error type for decoding, which must absorb I/O failures.
    type Error: Error + From<io::Error>;

    /// Decodes a topology from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is malformed or reading fails.
    fn read_from(reader: &mut impl BufRead) -> Result<Self::Output, Self::Error>;

    /// Decodes a topology from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or decoding fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self::Output, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}
