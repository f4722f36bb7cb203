use super::format::FormatDescriptor;
use crate::core::error::PrmtopError;
use std::collections::HashMap;
use std::fmt;
use tracing::{trace, warn};

/// Every section flag the decoder knows how to interpret.
///
/// Flags that are not listed here are preserved as [`SectionFlag::Other`] so
/// that raw access still works, but no derivation ever reads them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SectionFlag {
    Title,
    Pointers,
    AtomName,
    Charge,
    Mass,
    AtomTypeIndex,
    AmberAtomType,
    ResidueLabel,
    ResiduePointer,
    BondsIncHydrogen,
    BondsWithoutHydrogen,
    BondForceConstant,
    BondEquilValue,
    AnglesIncHydrogen,
    AnglesWithoutHydrogen,
    AngleForceConstant,
    AngleEquilValue,
    DihedralsIncHydrogen,
    DihedralsWithoutHydrogen,
    DihedralForceConstant,
    DihedralPhase,
    DihedralPeriodicity,
    NonbondedParmIndex,
    LennardJonesAcoef,
    LennardJonesBcoef,
    NumberExcludedAtoms,
    ExcludedAtomsList,
    Radii,
    Screen,
    BoxDimensions,
    Other(String),
}

impl SectionFlag {
    pub fn from_name(name: &str) -> Self {
        match name {
            "TITLE" => Self::Title,
            "POINTERS" => Self::Pointers,
            "ATOM_NAME" => Self::AtomName,
            "CHARGE" => Self::Charge,
            "MASS" => Self::Mass,
            "ATOM_TYPE_INDEX" => Self::AtomTypeIndex,
            "AMBER_ATOM_TYPE" => Self::AmberAtomType,
            "RESIDUE_LABEL" => Self::ResidueLabel,
            "RESIDUE_POINTER" => Self::ResiduePointer,
            "BONDS_INC_HYDROGEN" => Self::BondsIncHydrogen,
            "BONDS_WITHOUT_HYDROGEN" => Self::BondsWithoutHydrogen,
            "BOND_FORCE_CONSTANT" => Self::BondForceConstant,
            "BOND_EQUIL_VALUE" => Self::BondEquilValue,
            "ANGLES_INC_HYDROGEN" => Self::AnglesIncHydrogen,
            "ANGLES_WITHOUT_HYDROGEN" => Self::AnglesWithoutHydrogen,
            "ANGLE_FORCE_CONSTANT" => Self::AngleForceConstant,
            "ANGLE_EQUIL_VALUE" => Self::AngleEquilValue,
            "DIHEDRALS_INC_HYDROGEN" => Self::DihedralsIncHydrogen,
            "DIHEDRALS_WITHOUT_HYDROGEN" => Self::DihedralsWithoutHydrogen,
            "DIHEDRAL_FORCE_CONSTANT" => Self::DihedralForceConstant,
            "DIHEDRAL_PHASE" => Self::DihedralPhase,
            "DIHEDRAL_PERIODICITY" => Self::DihedralPeriodicity,
            "NONBONDED_PARM_INDEX" => Self::NonbondedParmIndex,
            "LENNARD_JONES_ACOEF" => Self::LennardJonesAcoef,
            "LENNARD_JONES_BCOEF" => Self::LennardJonesBcoef,
            "NUMBER_EXCLUDED_ATOMS" => Self::NumberExcludedAtoms,
            "EXCLUDED_ATOMS_LIST" => Self::ExcludedAtomsList,
            "RADII" => Self::Radii,
            "SCREEN" => Self::Screen,
            "BOX_DIMENSIONS" => Self::BoxDimensions,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Title => "TITLE",
            Self::Pointers => "POINTERS",
            Self::AtomName => "ATOM_NAME",
            Self::Charge => "CHARGE",
            Self::Mass => "MASS",
            Self::AtomTypeIndex => "ATOM_TYPE_INDEX",
            Self::AmberAtomType => "AMBER_ATOM_TYPE",
            Self::ResidueLabel => "RESIDUE_LABEL",
            Self::ResiduePointer => "RESIDUE_POINTER",
            Self::BondsIncHydrogen => "BONDS_INC_HYDROGEN",
            Self::BondsWithoutHydrogen => "BONDS_WITHOUT_HYDROGEN",
            Self::BondForceConstant => "BOND_FORCE_CONSTANT",
            Self::BondEquilValue => "BOND_EQUIL_VALUE",
            Self::AnglesIncHydrogen => "ANGLES_INC_HYDROGEN",
            Self::AnglesWithoutHydrogen => "ANGLES_WITHOUT_HYDROGEN",
            Self::AngleForceConstant => "ANGLE_FORCE_CONSTANT",
            Self::AngleEquilValue => "ANGLE_EQUIL_VALUE",
            Self::DihedralsIncHydrogen => "DIHEDRALS_INC_HYDROGEN",
            Self::DihedralsWithoutHydrogen => "DIHEDRALS_WITHOUT_HYDROGEN",
            Self::DihedralForceConstant => "DIHEDRAL_FORCE_CONSTANT",
            Self::DihedralPhase => "DIHEDRAL_PHASE",
            Self::DihedralPeriodicity => "DIHEDRAL_PERIODICITY",
            Self::NonbondedParmIndex => "NONBONDED_PARM_INDEX",
            Self::LennardJonesAcoef => "LENNARD_JONES_ACOEF",
            Self::LennardJonesBcoef => "LENNARD_JONES_BCOEF",
            Self::NumberExcludedAtoms => "NUMBER_EXCLUDED_ATOMS",
            Self::ExcludedAtomsList => "EXCLUDED_ATOMS_LIST",
            Self::Radii => "RADII",
            Self::Screen => "SCREEN",
            Self::BoxDimensions => "BOX_DIMENSIONS",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for SectionFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionPayload {
    /// The free-form title line, stored without width slicing.
    Title(String),
    /// Width-sliced, trimmed, non-empty fields in file order.
    Tokens(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawSection {
    pub flag: SectionFlag,
    pub format: Option<FormatDescriptor>,
    pub payload: SectionPayload,
}

impl RawSection {
    fn new(flag: SectionFlag) -> Self {
        let payload = if flag == SectionFlag::Title {
            SectionPayload::Title(String::new())
        } else {
            SectionPayload::Tokens(Vec::new())
        };
        Self {
            flag,
            format: None,
            payload,
        }
    }

    pub fn tokens(&self) -> &[String] {
        match &self.payload {
            SectionPayload::Tokens(tokens) => tokens,
            SectionPayload::Title(_) => &[],
        }
    }
}

/// All sections of one prmtop file, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrmtopSections {
    version: Option<String>,
    sections: Vec<RawSection>,
    index: HashMap<SectionFlag, usize>,
}

impl PrmtopSections {
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        match self.get(&SectionFlag::Title).map(|s| &s.payload) {
            Some(SectionPayload::Title(title)) => Some(title.as_str()),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &RawSection> {
        self.sections.iter()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn contains(&self, flag: &SectionFlag) -> bool {
        self.index.contains_key(flag)
    }

    pub fn get(&self, flag: &SectionFlag) -> Option<&RawSection> {
        self.index.get(flag).map(|&i| &self.sections[i])
    }

    pub fn require(&self, flag: &SectionFlag) -> Result<&RawSection, PrmtopError> {
        self.get(flag)
            .ok_or_else(|| PrmtopError::SectionMissing(flag.name().to_string()))
    }

    pub fn tokens(&self, flag: &SectionFlag) -> Result<&[String], PrmtopError> {
        Ok(self.require(flag)?.tokens())
    }

    pub fn integers(&self, flag: &SectionFlag) -> Result<Vec<i64>, PrmtopError> {
        self.tokens(flag)?
            .iter()
            .enumerate()
            .map(|(position, token)| parse_integer(token, flag, position))
            .collect()
    }

    pub fn reals(&self, flag: &SectionFlag) -> Result<Vec<f64>, PrmtopError> {
        self.tokens(flag)?
            .iter()
            .enumerate()
            .map(|(position, token)| parse_real(token, flag, position))
            .collect()
    }

    fn push(&mut self, section: RawSection) {
        if let Some(&existing) = self.index.get(&section.flag) {
            warn!(
                "Section '{}' is declared more than once; the later declaration replaces the earlier one.",
                section.flag
            );
            self.sections[existing] = section;
        } else {
            self.index.insert(section.flag.clone(), self.sections.len());
            self.sections.push(section);
        }
    }
}

fn parse_integer(token: &str, flag: &SectionFlag, position: usize) -> Result<i64, PrmtopError> {
    token.parse().map_err(|_| PrmtopError::InvalidToken {
        section: flag.name().to_string(),
        position,
        token: token.to_string(),
        expected: "integer",
    })
}

fn parse_real(token: &str, flag: &SectionFlag, position: usize) -> Result<f64, PrmtopError> {
    token
        .parse()
        .or_else(|_| token.replace(['D', 'd'], "E").parse())
        .map_err(|_| PrmtopError::InvalidToken {
            section: flag.name().to_string(),
            position,
            token: token.to_string(),
            expected: "real",
        })
}

/// Single-pass state machine that turns prmtop lines into [`PrmtopSections`].
///
/// Tag lines switch state; all other lines are sliced into fixed-width fields
/// according to the format descriptor of the most recently declared section.
#[derive(Debug, Default)]
pub struct SectionReader {
    sections: PrmtopSections,
    current: Option<RawSection>,
    line_number: usize,
}

impl SectionReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed_line(&mut self, line: &str) -> Result<(), PrmtopError> {
        self.line_number += 1;
        let line = line.trim_end_matches(['\r', '\n']);

        if let Some(rest) = line.strip_prefix("%VERSION") {
            self.sections.version = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("%FLAG") {
            let name = rest.split_whitespace().next().ok_or_else(|| {
                PrmtopError::SectionMissing(format!(
                    "%FLAG tag without a section name on line {}",
                    self.line_number
                ))
            })?;
            let flag = SectionFlag::from_name(name);
            if let SectionFlag::Other(name) = &flag {
                trace!("Keeping uninterpreted section '{}'.", name);
            }
            if let Some(previous) = self.current.replace(RawSection::new(flag)) {
                self.sections.push(previous);
            }
        } else if line.starts_with("%FORMAT") {
            let section = self.current_section_mut(line)?;
            let descriptor = match (line.find('('), line.rfind(')')) {
                (Some(open), Some(close)) if open < close => &line[open + 1..close],
                _ => {
                    return Err(PrmtopError::Format {
                        flag: section.flag.name().to_string(),
                        descriptor: line.to_string(),
                    });
                }
            };
            section.format = Some(FormatDescriptor::parse(descriptor, section.flag.name())?);
        } else if !line.starts_with("%COMMENT") {
            self.feed_data(line)?;
        }
        Ok(())
    }

    fn feed_data(&mut self, line: &str) -> Result<(), PrmtopError> {
        if self.current.is_none() && line.trim().is_empty() {
            return Ok(());
        }
        let section = self.current_section_mut(line)?;

        if let SectionPayload::Title(title) = &mut section.payload {
            if title.is_empty() {
                *title = line.trim_end().to_string();
            }
            return Ok(());
        }

        let width = section
            .format
            .as_ref()
            .map(|format| format.field_width)
            .ok_or_else(|| PrmtopError::Format {
                flag: section.flag.name().to_string(),
                descriptor: String::new(),
            })?;

        if let SectionPayload::Tokens(tokens) = &mut section.payload {
            let chars: Vec<char> = line.trim_end().chars().collect();
            for field in chars.chunks(width) {
                let field: String = field.iter().collect();
                let field = field.trim();
                if !field.is_empty() {
                    tokens.push(field.to_string());
                }
            }
        }
        Ok(())
    }

    fn current_section_mut(&mut self, line: &str) -> Result<&mut RawSection, PrmtopError> {
        let line_number = self.line_number;
        self.current.as_mut().ok_or_else(|| {
            PrmtopError::SectionMissing(format!(
                "line {} ('{}') appears before any %FLAG tag",
                line_number,
                line.trim()
            ))
        })
    }

    pub fn finish(mut self) -> PrmtopSections {
        if let Some(last) = self.current.take() {
            self.sections.push(last);
        }
        self.sections
    }
}
