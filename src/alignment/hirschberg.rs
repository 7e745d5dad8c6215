use anyhow::Result;
use compact_genome::interface::alphabet::Alphabet;
use log::{debug, trace};

use super::{
    base_case,
    cost_model::{Cost, CostModel},
    cost_vector::{forward_cost, reverse_cost},
    Aligner, AlignmentResult,
};

/// Hirschberg's divide-and-conquer alignment in linear space.
///
/// The first sequence is split in half, and the second sequence is split where the sum of the forward costs of the left half
/// and the reverse costs of the right half is minimal.
/// Both subproblems are then solved independently and their alignments concatenated.
///
/// Instead of recursing, pending subproblems are kept on an explicit stack.
/// Since the first sequence halves on each split, the stack stays logarithmic in its length.
#[derive(Debug, Clone, Copy, Default)]
pub struct HirschbergAligner;

impl<AlphabetType: Alphabet> Aligner<AlphabetType> for HirschbergAligner {
    fn align(
        &self,
        cost_model: &CostModel<AlphabetType>,
        sequence1: &[AlphabetType::CharacterType],
        sequence2: &[AlphabetType::CharacterType],
    ) -> Result<AlignmentResult<AlphabetType::CharacterType>> {
        Ok(align(cost_model, sequence1, sequence2))
    }
}

/// The state of a subproblem, determined only by the lengths of its sequences.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Subproblem {
    EmptyX,
    EmptyY,
    BaseCase,
    Recurse,
}

impl Subproblem {
    fn classify(x_len: usize, y_len: usize) -> Self {
        if x_len == 0 {
            Self::EmptyX
        } else if y_len == 0 {
            Self::EmptyY
        } else if x_len == 1 || y_len == 1 {
            Self::BaseCase
        } else {
            Self::Recurse
        }
    }
}

fn align<AlphabetType: Alphabet>(
    cost_model: &CostModel<AlphabetType>,
    sequence1: &[AlphabetType::CharacterType],
    sequence2: &[AlphabetType::CharacterType],
) -> AlignmentResult<AlphabetType::CharacterType> {
    let gap_cost = cost_model.gap_cost();
    let mut result = AlignmentResult {
        cost: 0,
        columns: Vec::with_capacity(sequence1.len() + sequence2.len()),
    };
    // The right subproblem is pushed first, so subproblems are solved from left to right
    // and their alignments can be appended to the result directly.
    let mut stack = vec![(sequence1, sequence2)];
    let mut max_stack_len = stack.len();
    let mut splits = 0usize;

    while let Some((x, y)) = stack.pop() {
        match Subproblem::classify(x.len(), y.len()) {
            Subproblem::EmptyX => result.append(AlignmentResult::all_insertions(y, gap_cost)),
            Subproblem::EmptyY => result.append(AlignmentResult::all_deletions(x, gap_cost)),
            Subproblem::BaseCase => result.append(base_case::solve(cost_model, x, y)),
            Subproblem::Recurse => {
                let x_mid = x.len() / 2;
                let (x_left, x_right) = x.split_at(x_mid);

                let forward = forward_cost(cost_model, x_left, y);
                let reverse = reverse_cost(cost_model, x_right, y);
                let y_mid = optimal_split(&forward, &reverse);
                trace!(
                    "Splitting {}x{} at ({x_mid}, {y_mid}) with cost {}",
                    x.len(),
                    y.len(),
                    forward[y_mid] + reverse[y.len() - y_mid]
                );

                let (y_left, y_right) = y.split_at(y_mid);
                stack.push((x_right, y_right));
                stack.push((x_left, y_left));

                splits += 1;
                max_stack_len = max_stack_len.max(stack.len());
            }
        }
    }

    debug!("Hirschberg finished after {splits} splits with maximum stack length {max_stack_len}");
    result
}

/// Find the split `k` of the second sequence minimising `forward[k] + reverse[n - k]`, where `n + 1` is the length of both vectors.
///
/// Ties are broken towards the smallest `k`.
pub fn optimal_split(forward: &[Cost], reverse: &[Cost]) -> usize {
    debug_assert_eq!(forward.len(), reverse.len());
    debug_assert!(!forward.is_empty());
    let n = forward.len() - 1;

    // `min_by_key` returns the first of several minima.
    (0..=n)
        .min_by_key(|&k| forward[k] + reverse[n - k])
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::{optimal_split, HirschbergAligner, Subproblem};
    use crate::alignment::{
        display::aligned_strings,
        tests::{assert_valid_alignment, dna, random_dna, reference_cost_model},
        Aligner,
    };

    fn assert_split_is_optimal(forward: &[u64], reverse: &[u64]) {
        let n = forward.len() - 1;
        let split = optimal_split(forward, reverse);
        let split_cost = forward[split] + reverse[n - split];
        for k in 0..=n {
            assert!(split_cost <= forward[k] + reverse[n - k]);
            if k < split {
                assert!(split_cost < forward[k] + reverse[n - k]);
            }
        }
    }

    #[test]
    fn split_minimises_sum() {
        let forward = [90, 60, 30, 60, 90];
        let reverse = [120, 30, 0, 100, 200];
        // Sums are 290, 160, 30, 90, 210.
        assert_eq!(optimal_split(&forward, &reverse), 2);
        assert_split_is_optimal(&forward, &reverse);
    }

    #[test]
    fn split_does_not_maximise_sum() {
        let forward = [0, 100, 0];
        let reverse = [0, 0, 0];
        assert_eq!(optimal_split(&forward, &reverse), 0);
    }

    #[test]
    fn split_breaks_ties_towards_smallest_index() {
        let forward = [10, 5, 0];
        let reverse = [5, 5, 0];
        // Sums are 10, 10, 5.
        assert_eq!(optimal_split(&forward, &reverse), 2);
        assert_eq!(optimal_split(&[7, 7, 7], &[3, 3, 3]), 0);
        assert_eq!(optimal_split(&[5], &[5]), 0);
    }

    #[test]
    fn split_on_random_vectors() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let len = rng.gen_range(1..20);
            let forward: Vec<u64> = (0..len).map(|_| rng.gen_range(0..50)).collect();
            let reverse: Vec<u64> = (0..len).map(|_| rng.gen_range(0..50)).collect();
            assert_split_is_optimal(&forward, &reverse);
        }
    }

    #[test]
    fn subproblem_classification() {
        assert_eq!(Subproblem::classify(0, 0), Subproblem::EmptyX);
        assert_eq!(Subproblem::classify(0, 5), Subproblem::EmptyX);
        assert_eq!(Subproblem::classify(5, 0), Subproblem::EmptyY);
        assert_eq!(Subproblem::classify(1, 5), Subproblem::BaseCase);
        assert_eq!(Subproblem::classify(5, 1), Subproblem::BaseCase);
        assert_eq!(Subproblem::classify(2, 2), Subproblem::Recurse);
    }

    #[test]
    fn empty_against_sequence() {
        let cost_model = reference_cost_model();
        let result = HirschbergAligner
            .align(&cost_model, &[], &dna("ACGT"))
            .unwrap();
        assert_eq!(result.cost, 120);
        assert_eq!(
            aligned_strings(&result),
            ("----".to_string(), "ACGT".to_string())
        );

        let result = HirschbergAligner
            .align(&cost_model, &dna("ACGT"), &[])
            .unwrap();
        assert_eq!(result.cost, 120);
        assert_eq!(
            aligned_strings(&result),
            ("ACGT".to_string(), "----".to_string())
        );
    }

    #[test]
    fn small_examples() {
        let cost_model = reference_cost_model();
        let result = HirschbergAligner
            .align(&cost_model, &dna("AG"), &dna("AA"))
            .unwrap();
        assert_eq!(result.cost, 48);
        assert_eq!(aligned_strings(&result), ("AG".to_string(), "AA".to_string()));

        let result = HirschbergAligner
            .align(&cost_model, &dna("AG"), &dna("AC"))
            .unwrap();
        assert_eq!(result.cost, 60);
        assert_valid_alignment(&result, "AG", "AC", &cost_model);
    }

    #[test]
    fn very_unbalanced_lengths() {
        let cost_model = reference_cost_model();
        let mut rng = StdRng::seed_from_u64(11);
        let long = random_dna(&mut rng, 2000);
        let short = random_dna(&mut rng, 3);

        let result = HirschbergAligner
            .align(&cost_model, &dna(&long), &dna(&short))
            .unwrap();
        assert_valid_alignment(&result, &long, &short, &cost_model);
        let result = HirschbergAligner
            .align(&cost_model, &dna(&short), &dna(&long))
            .unwrap();
        assert_valid_alignment(&result, &short, &long, &cost_model);
    }

    #[test]
    fn long_generated_sequences() {
        let cost_model = reference_cost_model();
        let base1: Vec<char> = "ACTG".chars().collect();
        let base2: Vec<char> = "TACG".chars().collect();
        let sequence1: String = crate::sequence::generate(&base1, &[3, 6, 1, 1, 2, 9])
            .unwrap()
            .into_iter()
            .collect();
        let sequence2: String = crate::sequence::generate(&base2, &[1, 2, 9, 2, 3, 4])
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(sequence1.len(), 256);
        assert_eq!(sequence2.len(), 256);

        let result = HirschbergAligner
            .align(&cost_model, &dna(&sequence1), &dna(&sequence2))
            .unwrap();
        assert_valid_alignment(&result, &sequence1, &sequence2, &cost_model);
    }
}
