use compact_genome::interface::alphabet::Alphabet;

use super::{
    cost_model::{Cost, CostModel},
    AlignmentColumn, AlignmentResult,
};

/// Align two sequences of which at least one has exactly one character.
///
/// Runs in linear time and space by computing only the single row of the table below the boundary row.
pub fn solve<AlphabetType: Alphabet>(
    cost_model: &CostModel<AlphabetType>,
    x: &[AlphabetType::CharacterType],
    y: &[AlphabetType::CharacterType],
) -> AlignmentResult<AlphabetType::CharacterType> {
    debug_assert!(x.len() == 1 || y.len() == 1);

    if let [character] = x {
        solve_single(cost_model, character, y)
    } else {
        solve_single(cost_model, &y[0], x).transposed()
    }
}

/// Align the single `character` against `y`.
fn solve_single<AlphabetType: Alphabet>(
    cost_model: &CostModel<AlphabetType>,
    character: &AlphabetType::CharacterType,
    y: &[AlphabetType::CharacterType],
) -> AlignmentResult<AlphabetType::CharacterType> {
    let gap_cost = cost_model.gap_cost();
    // The boundary row aligns the empty prefix of x to a prefix of y.
    let boundary = |j: usize| j as Cost * gap_cost;

    let mut row = Vec::with_capacity(y.len() + 1);
    row.push(gap_cost);
    for (j, y_character) in y.iter().enumerate() {
        let cost = (boundary(j + 1) + gap_cost)
            .min(row[j] + gap_cost)
            .min(boundary(j) + cost_model.cost(character, y_character));
        row.push(cost);
    }

    // Backtrack within the row until the character is consumed.
    let mut columns = Vec::with_capacity(y.len() + 1);
    let mut j = y.len();
    loop {
        if j > 0 && row[j] == boundary(j - 1) + cost_model.cost(character, &y[j - 1]) {
            columns.push(AlignmentColumn::Substitution(
                character.clone(),
                y[j - 1].clone(),
            ));
            j -= 1;
            break;
        } else if row[j] == boundary(j) + gap_cost {
            columns.push(AlignmentColumn::Deletion(character.clone()));
            break;
        } else {
            columns.push(AlignmentColumn::Insertion(y[j - 1].clone()));
            j -= 1;
        }
    }

    // The remaining prefix of y can only be inserted.
    columns.extend(y[..j].iter().rev().cloned().map(AlignmentColumn::Insertion));
    columns.reverse();

    AlignmentResult {
        cost: row[y.len()],
        columns,
    }
}
