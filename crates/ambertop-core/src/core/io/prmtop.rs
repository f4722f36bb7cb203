use super::section::{PrmtopSections, SectionReader};
use super::traits::TopologyFile;
use crate::core::error::PrmtopError;
use std::io::{self, BufRead};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Prmtop(#[from] PrmtopError),
}

/// AMBER "new-style" parameter/topology files (`%FLAG`/`%FORMAT` tagged).
pub struct PrmtopFile;

impl TopologyFile for PrmtopFile {
    type Output = PrmtopSections;
    type Error = LoadError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Output, Self::Error> {
        let mut section_reader = SectionReader::new();
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                break;
            }
            section_reader.feed_line(&line)?;
        }
        let sections = section_reader.finish();
        debug!("Read {} prmtop sections.", sections.len());
        Ok(sections)
    }
}
