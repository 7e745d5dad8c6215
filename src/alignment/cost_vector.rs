use compact_genome::interface::alphabet::Alphabet;

use super::cost_model::{Cost, CostModel};

/// Compute the last row of the alignment cost table of `x` against `y`.
///
/// Position `j` of the result holds the minimum cost of aligning all of `x` against the first `j` characters of `y`.
/// Only two rows are kept in memory at any time.
pub fn forward_cost<AlphabetType: Alphabet>(
    cost_model: &CostModel<AlphabetType>,
    x: &[AlphabetType::CharacterType],
    y: &[AlphabetType::CharacterType],
) -> Vec<Cost> {
    last_row(cost_model, x.iter(), y.iter())
}

/// Like [`forward_cost`], but on the reversed sequences.
///
/// Position `j` of the result holds the minimum cost of aligning all of `x` against the last `j` characters of `y`.
pub fn reverse_cost<AlphabetType: Alphabet>(
    cost_model: &CostModel<AlphabetType>,
    x: &[AlphabetType::CharacterType],
    y: &[AlphabetType::CharacterType],
) -> Vec<Cost> {
    last_row(cost_model, x.iter().rev(), y.iter().rev())
}

fn last_row<'sequence, AlphabetType: Alphabet>(
    cost_model: &CostModel<AlphabetType>,
    x: impl Iterator<Item = &'sequence AlphabetType::CharacterType>,
    y: impl ExactSizeIterator<Item = &'sequence AlphabetType::CharacterType> + Clone,
) -> Vec<Cost>
where
    AlphabetType::CharacterType: 'sequence,
{
    let gap_cost = cost_model.gap_cost();
    let mut previous: Vec<Cost> = (0..=y.len() as Cost).map(|j| j * gap_cost).collect();
    let mut current = vec![0; previous.len()];

    for (i, x_character) in x.enumerate() {
        current[0] = (i as Cost + 1) * gap_cost;

        for (j, y_character) in y.clone().enumerate() {
            current[j + 1] = (previous[j + 1] + gap_cost)
                .min(current[j] + gap_cost)
                .min(previous[j] + cost_model.cost(x_character, y_character));
        }

        std::mem::swap(&mut previous, &mut current);
    }

    previous
}
