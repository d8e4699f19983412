use std::io::{self, Write};

use anyhow::Context;
use blockfall_engine::{PieceKind, PieceSequence};
use rand::Rng as _;

use crate::util::Output;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct GenerateArg {
    /// Random seed (chosen at random if omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Number of pieces to generate
    #[arg(long, default_value_t = 1000)]
    length: usize,
}

pub(crate) fn run(arg: &GenerateArg) -> anyhow::Result<()> {
    let seed = arg.seed.unwrap_or_else(|| rand::rng().random());
    eprintln!("Generating {} pieces with seed {seed}", arg.length);

    let mut output = Output::stdout();
    write_sequence(&mut output, PieceSequence::new(seed, arg.length))
        .and_then(|()| output.flush())
        .with_context(|| format!("Failed to write pieces to {}", output.display_path()))?;
    Ok(())
}

/// Writes `pieces` in the line protocol.
///
/// The first two pieces share the first line, every following piece gets a
/// line of its own and `X` closes the supply. Nothing is written for an empty
/// sequence.
pub(crate) fn write_sequence<W, I>(w: &mut W, pieces: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = PieceKind>,
{
    let mut pieces = pieces.into_iter();
    let Some(first) = pieces.next() else {
        return Ok(());
    };
    write!(w, "{}", first.as_char())?;
    for kind in pieces {
        writeln!(w, "{}", kind.as_char())?;
    }
    writeln!(w, "X")
}
