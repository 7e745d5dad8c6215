use anyhow::{anyhow, ensure, Result};
use compact_genome::interface::alphabet::Alphabet;
use log::debug;

use super::{
    cost_model::{Cost, CostModel},
    Aligner, AlignmentColumn, AlignmentResult,
};

/// Needleman-Wunsch with the full quadratic table.
///
/// The table holds `(len(s1) + 1) * (len(s2) + 1)` costs, so it is only suited for moderately sized inputs.
/// With a memory limit set, inputs whose table would exceed the limit are rejected before allocating.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaselineAligner {
    memory_limit: Option<usize>,
}

impl BaselineAligner {
    /// Limit the size of the table to `memory_limit` bytes.
    pub fn with_memory_limit(memory_limit: usize) -> Self {
        Self {
            memory_limit: Some(memory_limit),
        }
    }

    /// The number of bytes required for the table, or `None` if it does not fit into `usize`.
    pub fn table_size(length1: usize, length2: usize) -> Option<usize> {
        length1
            .checked_add(1)?
            .checked_mul(length2.checked_add(1)?)?
            .checked_mul(std::mem::size_of::<Cost>())
    }
}

impl<AlphabetType: Alphabet> Aligner<AlphabetType> for BaselineAligner {
    fn align(
        &self,
        cost_model: &CostModel<AlphabetType>,
        sequence1: &[AlphabetType::CharacterType],
        sequence2: &[AlphabetType::CharacterType],
    ) -> Result<AlignmentResult<AlphabetType::CharacterType>> {
        let table_size = Self::table_size(sequence1.len(), sequence2.len()).ok_or_else(|| {
            anyhow!(
                "Table for sequences of length {} and {} exceeds the address space",
                sequence1.len(),
                sequence2.len()
            )
        })?;
        if let Some(memory_limit) = self.memory_limit {
            ensure!(
                table_size <= memory_limit,
                "Table for sequences of length {} and {} requires {table_size} bytes, exceeding the limit of {memory_limit} bytes",
                sequence1.len(),
                sequence2.len()
            );
        }

        debug!(
            "Filling {}x{} table ({table_size} bytes)",
            sequence1.len() + 1,
            sequence2.len() + 1
        );
        let table = Table::fill(cost_model, sequence1, sequence2);
        Ok(table.backtrack(cost_model, sequence1, sequence2))
    }
}

struct Table {
    costs: Vec<Cost>,
    width: usize,
}

impl Table {
    fn fill<AlphabetType: Alphabet>(
        cost_model: &CostModel<AlphabetType>,
        sequence1: &[AlphabetType::CharacterType],
        sequence2: &[AlphabetType::CharacterType],
    ) -> Self {
        let gap_cost = cost_model.gap_cost();
        let width = sequence2.len() + 1;
        let mut costs = vec![0; (sequence1.len() + 1) * width];

        for (j, cost) in costs[..width].iter_mut().enumerate() {
            *cost = j as Cost * gap_cost;
        }

        for (i, character1) in sequence1.iter().enumerate() {
            let (previous, current) = costs[i * width..(i + 2) * width].split_at_mut(width);
            current[0] = (i as Cost + 1) * gap_cost;

            for (j, character2) in sequence2.iter().enumerate() {
                current[j + 1] = (previous[j + 1] + gap_cost)
                    .min(current[j] + gap_cost)
                    .min(previous[j] + cost_model.cost(character1, character2));
            }
        }

        Self { costs, width }
    }

    fn get(&self, i: usize, j: usize) -> Cost {
        self.costs[i * self.width + j]
    }

    /// Walk back from the bottom-right corner, preferring substitutions, then deletions, then insertions.
    fn backtrack<AlphabetType: Alphabet>(
        &self,
        cost_model: &CostModel<AlphabetType>,
        sequence1: &[AlphabetType::CharacterType],
        sequence2: &[AlphabetType::CharacterType],
    ) -> AlignmentResult<AlphabetType::CharacterType> {
        let gap_cost = cost_model.gap_cost();
        let (mut i, mut j) = (sequence1.len(), sequence2.len());
        let mut columns = Vec::with_capacity(i + j);

        while i > 0 || j > 0 {
            let cost = self.get(i, j);

            if i > 0
                && j > 0
                && cost
                    == self.get(i - 1, j - 1) + cost_model.cost(&sequence1[i - 1], &sequence2[j - 1])
            {
                columns.push(AlignmentColumn::Substitution(
                    sequence1[i - 1].clone(),
                    sequence2[j - 1].clone(),
                ));
                i -= 1;
                j -= 1;
            } else if i > 0 && cost == self.get(i - 1, j) + gap_cost {
                columns.push(AlignmentColumn::Deletion(sequence1[i - 1].clone()));
                i -= 1;
            } else {
                debug_assert!(j > 0 && cost == self.get(i, j - 1) + gap_cost);
                columns.push(AlignmentColumn::Insertion(sequence2[j - 1].clone()));
                j -= 1;
            }
        }

        columns.reverse();
        AlignmentResult {
            cost: self.get(sequence1.len(), sequence2.len()),
            columns,
        }
    }
}
