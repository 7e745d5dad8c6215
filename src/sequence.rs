use std::fmt::{self, Display};

use anyhow::{ensure, Context, Result};
use compact_genome::interface::alphabet::Alphabet;
use log::debug;

/// A symbol that is not part of the configured alphabet.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct UnknownSymbolError {
    pub symbol: char,
    /// The offset of the symbol within its sequence, if it came from one.
    pub position: Option<usize>,
}

impl Display for UnknownSymbolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown symbol {:?}", self.symbol)?;
        if let Some(position) = self.position {
            write!(f, " at position {position}")?;
        }
        write!(f, " is not part of the alphabet")
    }
}

impl std::error::Error for UnknownSymbolError {}

/// Convert a single ASCII symbol into a character of the alphabet.
pub fn parse_symbol<AlphabetType: Alphabet>(
    symbol: u8,
) -> Result<AlphabetType::CharacterType, UnknownSymbolError> {
    AlphabetType::ascii_to_character(symbol).map_err(|_| UnknownSymbolError {
        symbol: char::from(symbol),
        position: None,
    })
}

pub fn parse_sequence<AlphabetType: Alphabet>(
    text: &str,
) -> Result<Vec<AlphabetType::CharacterType>, UnknownSymbolError> {
    text.bytes()
        .enumerate()
        .map(|(position, symbol)| {
            parse_symbol::<AlphabetType>(symbol).map_err(|error| UnknownSymbolError {
                position: Some(position),
                ..error
            })
        })
        .collect()
}

/// Grow `base` by repeatedly inserting a copy of the whole current sequence into itself.
///
/// For each index `idx`, the copy is inserted right after position `idx`.
/// The length roughly doubles with each index, so a few indices already produce very long sequences.
pub fn generate<Character: Clone>(
    base: &[Character],
    insertion_indices: &[usize],
) -> Result<Vec<Character>> {
    let mut sequence = base.to_vec();

    for &index in insertion_indices {
        let split = index
            .checked_add(1)
            .with_context(|| format!("Insertion index {index} is too large"))?;
        ensure!(
            split <= sequence.len(),
            "Insertion index {index} is out of range for a sequence of length {}",
            sequence.len()
        );

        let mut next = Vec::with_capacity(sequence.len() * 2);
        next.extend_from_slice(&sequence[..split]);
        next.extend_from_slice(&sequence);
        next.extend_from_slice(&sequence[split..]);
        sequence = next;

        debug!(
            "Inserted copy after position {index}, length is now {}",
            sequence.len()
        );
    }

    Ok(sequence)
}

#[cfg(test)]
mod tests {
    use compact_genome::implementation::alphabets::dna_alphabet::DnaAlphabet;

    use super::{generate, parse_sequence, UnknownSymbolError};

    fn generate_text(base: &str, indices: &[usize]) -> String {
        let base: Vec<char> = base.chars().collect();
        generate(&base, indices).unwrap().into_iter().collect()
    }

    #[test]
    fn single_symbol_doubles() {
        assert_eq!(generate_text("A", &[0]), "AA");
    }

    #[test]
    fn copy_is_inserted_after_index() {
        assert_eq!(generate_text("ACTG", &[3]), "ACTGACTG");
        assert_eq!(generate_text("ACTG", &[0]), "AACTGCTG");
        assert_eq!(generate_text("ACTG", &[1]), "ACACTGTG");
        assert_eq!(generate_text("ACTG", &[1, 2]), "ACAACACTGTGCTGTG");
    }

    #[test]
    fn no_indices_returns_base() {
        assert_eq!(generate_text("GATTACA", &[]), "GATTACA");
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let base: Vec<char> = "AC".chars().collect();
        assert!(generate(&base, &[2]).is_err());
        assert!(generate(&base, &[1]).is_ok());
        assert!(generate::<char>(&[], &[0]).is_err());
    }

    #[test]
    fn unknown_symbol_reports_position() {
        let error = parse_sequence::<DnaAlphabet>("ACXG").unwrap_err();
        assert_eq!(
            error,
            UnknownSymbolError {
                symbol: 'X',
                position: Some(2),
            }
        );
    }

    #[test]
    fn empty_sequence_parses() {
        assert!(parse_sequence::<DnaAlphabet>("").unwrap().is_empty());
    }
}
