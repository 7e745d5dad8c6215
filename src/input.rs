use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use anyhow::{bail, Context, Result};
use compact_genome::interface::alphabet::Alphabet;
use log::{debug, info};

use crate::sequence::{generate, parse_sequence};

/// A base sequence together with the insertions that expand it.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct SequenceDescription {
    pub base: String,
    pub insertion_indices: Vec<usize>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct InputDescription {
    pub first: SequenceDescription,
    pub second: SequenceDescription,
}

impl SequenceDescription {
    /// Parse the base sequence and apply all insertions.
    pub fn generate<AlphabetType: Alphabet>(&self) -> Result<Vec<AlphabetType::CharacterType>> {
        let base = parse_sequence::<AlphabetType>(&self.base)
            .with_context(|| format!("Invalid base sequence {:?}", self.base))?;
        generate(&base, &self.insertion_indices)
            .with_context(|| format!("Error expanding base sequence {:?}", self.base))
    }
}

pub fn read_input_file(path: impl AsRef<Path>) -> Result<InputDescription> {
    let path = path.as_ref();
    info!("Loading input file {path:?}");

    let file = File::open(path).with_context(|| format!("Error opening input file: {path:?}"))?;
    parse_input(BufReader::new(file)).with_context(|| format!("Error loading file: {path:?}"))
}

/// Parse an input consisting of a base sequence, its insertion indices, a second base sequence and its insertion indices.
///
/// Each of these is on its own line, whitespace is ignored and blank lines are skipped.
pub fn parse_input(reader: impl BufRead) -> Result<InputDescription> {
    let mut first: Option<SequenceDescription> = None;
    let mut second: Option<SequenceDescription> = None;

    for (line_number, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Error reading line {}", line_number + 1))?;
        let line: String = line.chars().filter(|c| !c.is_whitespace()).collect();
        if line.is_empty() {
            continue;
        }

        if first.is_none() {
            first = Some(SequenceDescription {
                base: line,
                insertion_indices: Vec::new(),
            });
        } else if line.bytes().all(|byte| byte.is_ascii_digit()) {
            let index: usize = line.parse().with_context(|| {
                format!("Error parsing insertion index '{line}' on line {}", line_number + 1)
            })?;
            if let Some(current) = second.as_mut().or(first.as_mut()) {
                current.insertion_indices.push(index);
            }
        } else if second.is_none() {
            second = Some(SequenceDescription {
                base: line,
                insertion_indices: Vec::new(),
            });
        } else {
            bail!(
                "Unexpected line {}: expected an insertion index, but found {line:?}",
                line_number + 1
            );
        }
    }

    let (Some(first), Some(second)) = (first, second) else {
        bail!("Input must contain two base sequences");
    };
    debug!(
        "Parsed base sequences of length {} and {} with {} and {} insertions",
        first.base.len(),
        second.base.len(),
        first.insertion_indices.len(),
        second.insertion_indices.len()
    );

    Ok(InputDescription { first, second })
}
