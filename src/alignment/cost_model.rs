use std::{io::Read, marker::PhantomData, path::Path};

use anyhow::{anyhow, bail, ensure, Context, Result};
use compact_genome::interface::alphabet::{Alphabet, AlphabetCharacter};
use csv::{Reader, ReaderBuilder};
use log::{info, trace};

use crate::sequence::{parse_symbol, UnknownSymbolError};

/// Type for storing costs.
pub type Cost = u64;

pub const REFERENCE_GAP_COST: Cost = 30;

/// The upper triangle of the reference substitution table.
pub const REFERENCE_SUBSTITUTION_COSTS: [(u8, u8, Cost); 10] = [
    (b'A', b'A', 0),
    (b'A', b'C', 110),
    (b'A', b'G', 48),
    (b'A', b'T', 94),
    (b'C', b'C', 0),
    (b'C', b'G', 118),
    (b'C', b'T', 48),
    (b'G', b'G', 0),
    (b'G', b'T', 110),
    (b'T', b'T', 0),
];

/// A symmetric substitution cost table together with a linear gap cost.
///
/// The table is dense and indexed by the rank of the characters within the alphabet.
/// It is guaranteed to be complete, symmetric and zero on the diagonal.
#[derive(Debug, Clone)]
pub struct CostModel<AlphabetType> {
    table: Vec<Cost>,
    gap_cost: Cost,
    phantom_data: PhantomData<AlphabetType>,
}

impl<AlphabetType: Alphabet> CostModel<AlphabetType> {
    /// The DNA substitution table with a gap cost of 30.
    pub fn reference() -> Result<Self> {
        Self::from_symbol_costs(REFERENCE_SUBSTITUTION_COSTS, REFERENCE_GAP_COST)
            .with_context(|| "The reference cost table requires an alphabet over ACGT")
    }

    /// Build a cost model from `(symbol, symbol, cost)` triples over ASCII symbols.
    ///
    /// Each triple sets the cost for both orders of the symbol pair.
    /// Every pair of alphabet characters must receive a cost.
    pub fn from_symbol_costs(
        symbol_costs: impl IntoIterator<Item = (u8, u8, Cost)>,
        gap_cost: Cost,
    ) -> Result<Self> {
        let size = alphabet_size::<AlphabetType>();
        let mut table = vec![None; size * size];

        for (first, second, cost) in symbol_costs {
            let first_index = rank(&parse_symbol::<AlphabetType>(first)?);
            let second_index = rank(&parse_symbol::<AlphabetType>(second)?);

            for index in [
                first_index * size + second_index,
                second_index * size + first_index,
            ] {
                if let Some(previous_cost) = table[index] {
                    ensure!(
                        previous_cost == cost,
                        "Conflicting costs for {} and {}: {previous_cost} != {cost}",
                        char::from(first),
                        char::from(second),
                    );
                }
                table[index] = Some(cost);
            }
        }

        let mut dense_table = Vec::with_capacity(size * size);
        for first in AlphabetType::iter() {
            for second in AlphabetType::iter() {
                let first_index = rank(&first);
                let second_index = rank(&second);
                let cost = table[first_index * size + second_index].ok_or_else(|| {
                    anyhow!(
                        "Missing cost for {} and {}",
                        display_character::<AlphabetType>(&first),
                        display_character::<AlphabetType>(&second),
                    )
                })?;
                ensure!(
                    first_index != second_index || cost == 0,
                    "Cost of aligning {} to itself must be zero, but is {cost}",
                    display_character::<AlphabetType>(&first),
                );
                dense_table.push(cost);
            }
        }

        Ok(Self {
            table: dense_table,
            gap_cost,
            phantom_data: PhantomData,
        })
    }

    pub fn from_csv_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Reading CSV file {path:?}");

        let reader = ReaderBuilder::new()
            .has_headers(false)
            .from_path(path)
            .with_context(|| format!("Error opening CSV file {path:?}"))?;
        Self::from_csv(reader).with_context(|| format!("Error loading cost table {path:?}"))
    }

    pub fn from_csv_reader(reader: impl Read) -> Result<Self> {
        Self::from_csv(ReaderBuilder::new().has_headers(false).from_reader(reader))
    }

    /// Parse a square table whose first row and column name the symbols.
    ///
    /// The gap is written as `-` or `*`, and its row and column hold the linear gap cost.
    fn from_csv(mut reader: Reader<impl Read>) -> Result<Self> {
        let mut lines = reader.records().enumerate();

        // Parse first line
        let first_line = lines
            .next()
            .map(|(_, first_line)| first_line)
            .ok_or_else(|| anyhow!("CSV file contains no lines"))?
            .with_context(|| "Error reading first CSV line")?;
        let mut column_to_symbol = Vec::new();

        for (column, symbol) in first_line.iter().enumerate() {
            if column == 0 {
                ensure!(
                    symbol.trim().is_empty(),
                    "First column of first row must be empty, but was: {:?}",
                    symbol.trim()
                );
                column_to_symbol.push(None);
                continue;
            }

            let symbol = parse_table_symbol(symbol)
                .with_context(|| format!("Invalid symbol in column {column} of first row"))?;
            ensure!(
                !column_to_symbol.contains(&Some(symbol)),
                "First row contained a symbol twice: {}",
                char::from(symbol)
            );
            column_to_symbol.push(Some(symbol));
        }

        // Parse further lines
        let mut symbol_costs = Vec::new();
        let mut gap_costs = Vec::new();
        let mut row_symbols = Vec::new();
        for (row, line) in lines {
            let line = line.with_context(|| format!("Error reading CSV line {}", row + 1))?;
            ensure!(
                line.len() == column_to_symbol.len(),
                "Row {} has {} columns, but the first row has {}",
                row + 1,
                line.len(),
                column_to_symbol.len()
            );

            let row_symbol = parse_table_symbol(&line[0])
                .with_context(|| format!("Invalid symbol in first column of row {}", row + 1))?;
            ensure!(
                !row_symbols.contains(&row_symbol),
                "First column contained a symbol twice: {}",
                char::from(row_symbol)
            );
            row_symbols.push(row_symbol);

            for (column, cost) in line.iter().enumerate().skip(1) {
                let column_symbol = column_to_symbol[column]
                    .ok_or_else(|| anyhow!("Missing symbol for column {column}"))?;
                let cost = cost.trim();

                match (is_gap(row_symbol), is_gap(column_symbol)) {
                    (true, true) => continue,
                    (true, false) | (false, true) => {
                        let cost: Cost = cost.parse().with_context(|| {
                            format!("Error parsing gap cost '{cost}' in row {}", row + 1)
                        })?;
                        gap_costs.push(cost);
                    }
                    (false, false) => {
                        let cost: Cost = cost.parse().with_context(|| {
                            format!("Error parsing cost '{cost}' in row {}", row + 1)
                        })?;
                        trace!(
                            "row: {}; column: {}; cost: {cost}",
                            char::from(row_symbol),
                            char::from(column_symbol),
                        );
                        symbol_costs.push((row_symbol, column_symbol, cost));
                    }
                }
            }
        }

        let Some(&gap_cost) = gap_costs.first() else {
            bail!("Cost table contains no gap row or column");
        };
        ensure!(
            gap_costs.iter().all(|&cost| cost == gap_cost),
            "Gap costs must be the same for every symbol, but found {gap_costs:?}"
        );

        Self::from_symbol_costs(symbol_costs, gap_cost)
    }
}

impl<AlphabetType: Alphabet> CostModel<AlphabetType> {
    #[inline]
    pub fn cost(
        &self,
        first: &AlphabetType::CharacterType,
        second: &AlphabetType::CharacterType,
    ) -> Cost {
        self.table[rank(first) * alphabet_size::<AlphabetType>() + rank(second)]
    }

    /// Look up the substitution cost of two ASCII symbols.
    pub fn symbol_cost(&self, first: u8, second: u8) -> Result<Cost, UnknownSymbolError> {
        Ok(self.cost(
            &parse_symbol::<AlphabetType>(first)?,
            &parse_symbol::<AlphabetType>(second)?,
        ))
    }
}

impl<AlphabetType> CostModel<AlphabetType> {
    #[inline]
    pub fn gap_cost(&self) -> Cost {
        self.gap_cost
    }
}

fn alphabet_size<AlphabetType: Alphabet>() -> usize {
    usize::from(AlphabetType::SIZE)
}

fn rank<Character: AlphabetCharacter>(character: &Character) -> usize {
    usize::from(character.index())
}

fn display_character<AlphabetType: Alphabet>(character: &AlphabetType::CharacterType) -> char {
    character.clone().into()
}

fn parse_table_symbol(symbol: &str) -> Result<u8> {
    let symbol = symbol.trim();
    ensure!(
        symbol.chars().count() == 1,
        "Expected a single character, but found {symbol:?}"
    );
    let symbol = symbol.chars().next().unwrap();
    u8::try_from(symbol)
        .with_context(|| format!("Symbol must be a valid ASCII character, but is {symbol:?}"))
}

fn is_gap(symbol: u8) -> bool {
    symbol == b'-' || symbol == b'*'
}

#[cfg(test)]
mod tests {
    use compact_genome::implementation::alphabets::{
        dna_alphabet::DnaAlphabet, dna_alphabet_or_n::DnaAlphabetOrN,
    };

    use super::{CostModel, REFERENCE_GAP_COST};
    use crate::{alignment::tests::dna, sequence::UnknownSymbolError};

    const REFERENCE_CSV: &str = "\
 ,A,C,G,T,-
A,0,110,48,94,30
C,110,0,118,48,30
G,48,118,0,110,30
T,94,48,110,0,30
-,30,30,30,30,
";

    #[test]
    fn reference_table_lookup() {
        let cost_model = CostModel::<DnaAlphabet>::reference().unwrap();
        assert_eq!(cost_model.gap_cost(), REFERENCE_GAP_COST);
        assert_eq!(cost_model.symbol_cost(b'A', b'A').unwrap(), 0);
        assert_eq!(cost_model.symbol_cost(b'A', b'C').unwrap(), 110);
        assert_eq!(cost_model.symbol_cost(b'G', b'A').unwrap(), 48);
        assert_eq!(cost_model.symbol_cost(b'T', b'A').unwrap(), 94);
        assert_eq!(cost_model.symbol_cost(b'C', b'G').unwrap(), 118);
        assert_eq!(cost_model.symbol_cost(b'T', b'C').unwrap(), 48);
        assert_eq!(cost_model.symbol_cost(b'G', b'T').unwrap(), 110);
    }

    #[test]
    fn reference_table_is_symmetric_with_zero_diagonal() {
        let cost_model = CostModel::<DnaAlphabet>::reference().unwrap();
        let symbols = dna("ACGT");
        for first in &symbols {
            for second in &symbols {
                assert_eq!(
                    cost_model.cost(first, second),
                    cost_model.cost(second, first)
                );
            }
            assert_eq!(cost_model.cost(first, first), 0);
        }
    }

    #[test]
    fn unknown_symbol_lookup_fails() {
        let cost_model = CostModel::<DnaAlphabet>::reference().unwrap();
        assert_eq!(
            cost_model.symbol_cost(b'A', b'U').unwrap_err(),
            UnknownSymbolError {
                symbol: 'U',
                position: None
            }
        );
    }

    #[test]
    fn reference_requires_complete_table() {
        // N has no reference costs.
        assert!(CostModel::<DnaAlphabetOrN>::reference().is_err());
    }

    #[test]
    fn csv_table_matches_reference() {
        let from_csv = CostModel::<DnaAlphabet>::from_csv_reader(REFERENCE_CSV.as_bytes()).unwrap();
        let reference = CostModel::<DnaAlphabet>::reference().unwrap();
        assert_eq!(from_csv.gap_cost(), reference.gap_cost());
        for first in b"ACGT" {
            for second in b"ACGT" {
                assert_eq!(
                    from_csv.symbol_cost(*first, *second).unwrap(),
                    reference.symbol_cost(*first, *second).unwrap()
                );
            }
        }
    }

    #[test]
    fn csv_table_rejects_asymmetry() {
        let csv = REFERENCE_CSV.replace("C,110,0,118", "C,111,0,118");
        assert!(CostModel::<DnaAlphabet>::from_csv_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn csv_table_rejects_nonzero_diagonal() {
        let csv = REFERENCE_CSV.replace("G,48,118,0", "G,48,118,5");
        assert!(CostModel::<DnaAlphabet>::from_csv_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn csv_table_requires_uniform_gap_cost() {
        let csv = REFERENCE_CSV.replace("T,94,48,110,0,30", "T,94,48,110,0,31");
        assert!(CostModel::<DnaAlphabet>::from_csv_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn csv_table_requires_gap() {
        let csv = "\
 ,A,C,G,T
A,0,110,48,94
C,110,0,118,48
G,48,118,0,110
T,94,48,110,0
";
        assert!(CostModel::<DnaAlphabet>::from_csv_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn csv_table_requires_all_symbols() {
        let csv = "\
 ,A,C,G,-
A,0,110,48,30
C,110,0,118,30
G,48,118,0,30
-,30,30,30,
";
        assert!(CostModel::<DnaAlphabet>::from_csv_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn csv_table_with_n() {
        let csv = "\
 ,A,C,G,T,N,*
A,0,110,48,94,50,30
C,110,0,118,48,50,30
G,48,118,0,110,50,30
T,94,48,110,0,50,30
N,50,50,50,50,0,30
*,30,30,30,30,30,
";
        let cost_model = CostModel::<DnaAlphabetOrN>::from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(cost_model.symbol_cost(b'N', b'A').unwrap(), 50);
        assert_eq!(cost_model.gap_cost(), 30);
    }
}
