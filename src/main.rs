use std::path::PathBuf;

use alignment::{
    baseline::BaselineAligner, cost_model::CostModel, hirschberg::HirschbergAligner, Aligner,
};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use compact_genome::{
    implementation::alphabets::{dna_alphabet::DnaAlphabet, dna_alphabet_or_n::DnaAlphabetOrN},
    interface::alphabet::Alphabet,
};
use instrumentation::measure;
use log::{debug, info, warn, LevelFilter};
use simplelog::{ColorChoice, TermLogger, TerminalMode};

mod alignment;
mod input;
mod instrumentation;
mod report;
mod sequence;

#[derive(Parser)]
struct Cli {
    /// The minimum importance of log messages to output.
    #[clap(long, short = 'l', default_value = "info")]
    log_level: LevelFilter,

    /// The input file.
    ///
    /// It contains the first base sequence followed by its insertion indices, then the second base sequence
    /// followed by its insertion indices, each on a separate line.
    #[clap(long, short = 'i')]
    input: PathBuf,

    /// The file to write the cost, the alignment, the runtime in milliseconds and the memory delta in KiB to.
    #[clap(long, short = 'o')]
    output: PathBuf,

    /// The alignment algorithm.
    #[clap(long, short = 'a', default_value = "hirschberg")]
    algorithm: Algorithm,

    /// The alphabet of the input sequences.
    ///
    /// This must also match the alphabet used in the cost table.
    #[clap(long, default_value = "dna")]
    alphabet: InputAlphabet,

    /// A CSV file containing the substitution costs and the gap cost.
    ///
    /// The first row and the first column list the symbols, with `-` standing for the gap.
    /// If not given, the reference DNA cost table with gap cost 30 is used.
    #[clap(long)]
    cost_table: Option<PathBuf>,

    /// The maximum size of the baseline alignment table in bytes.
    ///
    /// Zero disables the limit.
    #[clap(long, default_value = "4294967296")]
    baseline_memory_limit: usize,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum Algorithm {
    /// Needleman-Wunsch with a quadratic table.
    Baseline,
    /// Hirschberg's linear-space divide and conquer.
    Hirschberg,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum InputAlphabet {
    Dna,
    DnaN,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    TermLogger::init(
        cli.log_level,
        Default::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    info!("Logging initialised");

    match cli.alphabet {
        InputAlphabet::Dna => execute_with_alphabet::<DnaAlphabet>(cli),
        InputAlphabet::DnaN => execute_with_alphabet::<DnaAlphabetOrN>(cli),
    }?;

    info!("Terminating");

    Ok(())
}

fn execute_with_alphabet<AlphabetType: Alphabet + 'static>(cli: Cli) -> Result<()> {
    let cost_model = if let Some(cost_table) = &cli.cost_table {
        CostModel::<AlphabetType>::from_csv_file(cost_table)?
    } else {
        CostModel::<AlphabetType>::reference()?
    };
    debug!("Gap cost: {}", cost_model.gap_cost());

    let input = input::read_input_file(&cli.input)?;
    let sequence1 = input
        .first
        .generate::<AlphabetType>()
        .with_context(|| "Error generating first sequence")?;
    let sequence2 = input
        .second
        .generate::<AlphabetType>()
        .with_context(|| "Error generating second sequence")?;
    info!(
        "Generated sequences of length {} and {}",
        sequence1.len(),
        sequence2.len()
    );

    let aligner: Box<dyn Aligner<AlphabetType>> = match cli.algorithm {
        Algorithm::Baseline => {
            if cli.baseline_memory_limit == 0 {
                warn!("Running baseline aligner without a memory limit");
                Box::new(BaselineAligner::default())
            } else {
                Box::new(BaselineAligner::with_memory_limit(
                    cli.baseline_memory_limit,
                ))
            }
        }
        Algorithm::Hirschberg => Box::new(HirschbergAligner),
    };

    info!("Aligning with {:?}", cli.algorithm);
    let (result, measurement) = measure(|| aligner.align(&cost_model, &sequence1, &sequence2));
    let result = result?;

    info!("Alignment cost {}", result.cost);
    info!("Alignment length {}", result.len());
    info!("Runtime: {:.2}s", measurement.elapsed.as_secs_f64());
    info!("Memory delta: {} KiB", measurement.memory_delta_kib);
    debug_assert_eq!(result.rescore(&cost_model), result.cost);

    report::write_report_file(&cli.output, &result, &measurement)
}
