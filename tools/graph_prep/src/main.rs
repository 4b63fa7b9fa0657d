use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter};
use std::path::PathBuf;
use clap::Parser;

use graph_core::MolGraph;

/// Converts a delimited text corpus into the JSON graph corpus consumed by
/// the trainer. The graph column uses the compact encoding
/// `atoms|u-v:order;...`, e.g. `6,6,8|0-1:1;1-2:2`.
#[derive(Parser)]
struct Cli {
    #[arg(short, long)]
    input: PathBuf,
    #[arg(short, long)]
    output: PathBuf,
    /// Field delimiter of the input file.
    #[arg(short, long, default_value = "\t")]
    delimiter: String,
    /// Zero-based index of the graph column.
    #[arg(short, long, default_value_t = 0)]
    column: usize,
    /// Skip a header line.
    #[arg(long, default_value_t = false)]
    skip_header: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let file = File::open(&cli.input)?;
    let reader = BufReader::new(file);

    let mut graphs = Vec::new();
    let mut skipped = 0;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() || (cli.skip_header && line_no == 0) {
            continue;
        }

        let fields: Vec<&str> = line.split(cli.delimiter.as_str()).collect();
        let field = match fields.get(cli.column) {
            Some(f) => *f,
            None => {
                anyhow::bail!(
                    "line {}: no column {} (found {} fields)",
                    line_no + 1,
                    cli.column,
                    fields.len()
                );
            }
        };

        match MolGraph::parse_compact(field) {
            Ok(graph) => graphs.push(graph),
            Err(e) => {
                eprintln!("line {}: skipping unparsable graph: {}", line_no + 1, e);
                skipped += 1;
            }
        }
    }

    let out = File::create(&cli.output)?;
    serde_json::to_writer(BufWriter::new(out), &graphs)?;

    println!(
        "Done. Wrote {} graphs to {:?} ({} skipped).",
        graphs.len(),
        cli.output,
        skipped
    );
    Ok(())
}
