use std::fmt::Display;

use super::AlignmentResult;

/// Marks a gap in the textual representation of an aligned sequence.
pub const GAP_CHARACTER: char = '-';

fn aligned_string<'result, Character: Clone + Into<char> + 'result>(
    aligned: impl Iterator<Item = Option<&'result Character>>,
) -> String {
    aligned
        .map(|character| character.map_or(GAP_CHARACTER, |character| character.clone().into()))
        .collect()
}

/// Render both aligned sequences as text.
pub fn aligned_strings<Character: Clone + Into<char>>(
    result: &AlignmentResult<Character>,
) -> (String, String) {
    (
        aligned_string(result.aligned1()),
        aligned_string(result.aligned2()),
    )
}

/// Prints the cost followed by both aligned sequences, each on its own line.
impl<Character: Clone + Into<char>> Display for AlignmentResult<Character> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (aligned1, aligned2) = aligned_strings(self);
        writeln!(f, "{}", self.cost)?;
        writeln!(f, "{aligned1}")?;
        write!(f, "{aligned2}")
    }
}

#[cfg(test)]
mod tests {
    use crate::alignment::{AlignmentColumn, AlignmentResult};

    #[test]
    fn display_writes_three_lines() {
        let result = AlignmentResult {
            cost: 78,
            columns: vec![
                AlignmentColumn::Substitution('A', 'A'),
                AlignmentColumn::Deletion('C'),
                AlignmentColumn::Insertion('T'),
                AlignmentColumn::Substitution('G', 'A'),
            ],
        };
        assert_eq!(result.to_string(), "78\nAC-G\nA-TA");
    }
}
