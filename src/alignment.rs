use anyhow::Result;
use compact_genome::interface::alphabet::Alphabet;

use cost_model::{Cost, CostModel};

mod base_case;
pub mod baseline;
pub mod cost_model;
mod cost_vector;
mod display;
pub mod hirschberg;

/// A global pairwise aligner.
///
/// All implementors compute an alignment of minimum total cost under the given cost model.
/// They may differ in which of several optimal alignments they return.
pub trait Aligner<AlphabetType: Alphabet> {
    fn align(
        &self,
        cost_model: &CostModel<AlphabetType>,
        sequence1: &[AlphabetType::CharacterType],
        sequence2: &[AlphabetType::CharacterType],
    ) -> Result<AlignmentResult<AlphabetType::CharacterType>>;
}

/// A single column of a pairwise alignment.
///
/// A column with a gap on both sides is not representable.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum AlignmentColumn<Character> {
    /// A character of the first sequence aligned to a character of the second sequence.
    /// This includes matches.
    Substitution(Character, Character),
    /// A character of the first sequence aligned to a gap.
    Deletion(Character),
    /// A gap aligned to a character of the second sequence.
    Insertion(Character),
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AlignmentResult<Character> {
    pub cost: Cost,
    pub columns: Vec<AlignmentColumn<Character>>,
}

impl<Character> AlignmentColumn<Character> {
    pub fn first(&self) -> Option<&Character> {
        match self {
            Self::Substitution(first, _) | Self::Deletion(first) => Some(first),
            Self::Insertion(_) => None,
        }
    }

    pub fn second(&self) -> Option<&Character> {
        match self {
            Self::Substitution(_, second) | Self::Insertion(second) => Some(second),
            Self::Deletion(_) => None,
        }
    }

    /// Exchange the roles of the two sequences.
    pub fn transposed(self) -> Self {
        match self {
            Self::Substitution(first, second) => Self::Substitution(second, first),
            Self::Deletion(first) => Self::Insertion(first),
            Self::Insertion(second) => Self::Deletion(second),
        }
    }
}

impl<Character: Clone> AlignmentResult<Character> {
    /// Align each character of `sequence` against a gap in the second sequence.
    pub fn all_deletions(sequence: &[Character], gap_cost: Cost) -> Self {
        Self {
            cost: gap_cost * sequence.len() as Cost,
            columns: sequence
                .iter()
                .cloned()
                .map(AlignmentColumn::Deletion)
                .collect(),
        }
    }

    /// Align each character of `sequence` against a gap in the first sequence.
    pub fn all_insertions(sequence: &[Character], gap_cost: Cost) -> Self {
        Self {
            cost: gap_cost * sequence.len() as Cost,
            columns: sequence
                .iter()
                .cloned()
                .map(AlignmentColumn::Insertion)
                .collect(),
        }
    }
}

impl<Character> AlignmentResult<Character> {
    /// The number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Concatenate `other` to the right of this alignment.
    pub fn append(&mut self, other: Self) {
        self.cost += other.cost;
        self.columns.extend(other.columns);
    }

    /// Exchange the roles of the two sequences.
    pub fn transposed(self) -> Self {
        Self {
            cost: self.cost,
            columns: self
                .columns
                .into_iter()
                .map(AlignmentColumn::transposed)
                .collect(),
        }
    }

    /// The first aligned sequence, with `None` marking gaps.
    pub fn aligned1(&self) -> impl Iterator<Item = Option<&Character>> {
        self.columns.iter().map(AlignmentColumn::first)
    }

    /// The second aligned sequence, with `None` marking gaps.
    pub fn aligned2(&self) -> impl Iterator<Item = Option<&Character>> {
        self.columns.iter().map(AlignmentColumn::second)
    }
}

impl<Character> AlignmentResult<Character> {
    /// Sum up the cost of each column independently of the reported cost.
    pub fn rescore<AlphabetType: Alphabet<CharacterType = Character>>(
        &self,
        cost_model: &CostModel<AlphabetType>,
    ) -> Cost {
        self.columns
            .iter()
            .map(|column| match column {
                AlignmentColumn::Substitution(first, second) => cost_model.cost(first, second),
                AlignmentColumn::Deletion(_) | AlignmentColumn::Insertion(_) => {
                    cost_model.gap_cost()
                }
            })
            .sum()
    }
}
