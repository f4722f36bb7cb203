use crate::core::error::PrmtopError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static FORMAT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]+)([a-zA-Z]+)([0-9]+)(?:\.([0-9]+))?").expect("format pattern is valid")
});

/// The kind of value a Fortran edit descriptor declares for its fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// `I` descriptors.
    Integer,
    /// `E`, `F` and `D` descriptors.
    Real,
    /// `A` descriptors.
    Text,
    /// Any other letter sequence, kept verbatim.
    Other(String),
}

impl FieldKind {
    fn from_code(code: &str) -> Self {
        match code.to_ascii_uppercase().as_str() {
            "I" => Self::Integer,
            "E" | "F" | "D" => Self::Real,
            "A" => Self::Text,
            _ => Self::Other(code.to_string()),
        }
    }
}

/// A decoded `%FORMAT(...)` descriptor such as `10I8` or `5E16.8`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatDescriptor {
    pub items_per_line: usize,
    pub kind: FieldKind,
    pub field_width: usize,
    pub precision: Option<usize>,
}

impl FormatDescriptor {
    /// Parses the text between the parentheses of a `%FORMAT` tag.
    ///
    /// The grammar is searched rather than anchored, so `(10I8)` and `10I8`
    /// decode identically. `flag` only names the owning section in errors.
    pub fn parse(descriptor: &str, flag: &str) -> Result<Self, PrmtopError> {
        let error = || PrmtopError::Format {
            flag: flag.to_string(),
            descriptor: descriptor.to_string(),
        };

        let caps = FORMAT_PATTERN.captures(descriptor).ok_or_else(error)?;
        let items_per_line = caps[1].parse().map_err(|_| error())?;
        let field_width: usize = caps[3].parse().map_err(|_| error())?;
        if field_width == 0 {
            return Err(error());
        }
        let precision = match caps.get(4) {
            Some(m) => Some(m.as_str().parse().map_err(|_| error())?),
            None => None,
        };

        Ok(Self {
            items_per_line,
            kind: FieldKind::from_code(&caps[2]),
            field_width,
            precision,
        })
    }
}

impl fmt::Display for FormatDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match &self.kind {
            FieldKind::Integer => "I",
            FieldKind::Real => "E",
            FieldKind::Text => "a",
            FieldKind::Other(code) => code.as_str(),
        };
        write!(f, "{}{}{}", self.items_per_line, code, self.field_width)?;
        if let Some(precision) = self.precision {
            write!(f, ".{}", precision)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_integer_descriptor() {
        let format = FormatDescriptor::parse("10I8", "POINTERS").unwrap();
        assert_eq!(format.items_per_line, 10);
        assert_eq!(format.kind, FieldKind::Integer);
        assert_eq!(format.field_width, 8);
        assert_eq!(format.precision, None);
    }

    #[test]
    fn parse_real_descriptor_with_precision() {
        let format = FormatDescriptor::parse("5E16.8", "CHARGE").unwrap();
        assert_eq!(format.items_per_line, 5);
        assert_eq!(format.kind, FieldKind::Real);
        assert_eq!(format.field_width, 16);
        assert_eq!(format.precision, Some(8));
    }

    #[test]
    fn parse_lowercase_text_descriptor() {
        let format = FormatDescriptor::parse("20a4", "ATOM_NAME").unwrap();
        assert_eq!(format.kind, FieldKind::Text);
        assert_eq!(format.field_width, 4);
    }

    #[test]
    fn parse_tolerates_surrounding_parentheses() {
        let format = FormatDescriptor::parse("(1a80)", "TITLE").unwrap();
        assert_eq!(format.items_per_line, 1);
        assert_eq!(format.field_width, 80);
    }

    #[test]
    fn unknown_letters_are_kept_verbatim() {
        let format = FormatDescriptor::parse("3Z12", "CUSTOM").unwrap();
        assert_eq!(format.kind, FieldKind::Other("Z".to_string()));
    }

    #[test]
    fn parse_fails_for_unmatched_descriptor() {
        let result = FormatDescriptor::parse("E16", "CHARGE");
        assert_eq!(
            result,
            Err(PrmtopError::Format {
                flag: "CHARGE".to_string(),
                descriptor: "E16".to_string(),
            })
        );
    }

    #[test]
    fn parse_fails_for_zero_width() {
        assert!(FormatDescriptor::parse("10I0", "POINTERS").is_err());
    }

    #[test]
    fn display_renders_canonical_descriptor() {
        let format = FormatDescriptor::parse("5E16.8", "CHARGE").unwrap();
        assert_eq!(format.to_string(), "5E16.8");
    }
}
