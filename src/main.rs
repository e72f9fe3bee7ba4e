use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use wf_reader::data::flatten::FeatureMatrix;
use wf_reader::{WfDataset, WfReader, WfSyntax};

/// Inspect and export window-feature (WF) files.
#[derive(Parser, Debug)]
#[command(name = "wf-reader", version, about, long_about = None)]
struct Cli {
    /// JSON file overriding the separators and vector markers.
    #[arg(long, value_name = "FILE", global = true)]
    syntax: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print attribute names and per-class window counts.
    Inspect {
        file: PathBuf,
        /// Print the whole dataset as JSON instead.
        #[arg(long)]
        json: bool,
    },
    /// Flatten the windows of selected classes into a CSV matrix.
    Export {
        file: PathBuf,
        /// Class to include; repeat to select several. Order sets the label index.
        #[arg(short, long = "class", value_name = "LABEL", required = true)]
        classes: Vec<String>,
        /// Scale columns to zero mean and unit variance.
        #[arg(long)]
        standardize: bool,
        /// Output file (stdout if omitted).
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let syntax = match &cli.syntax {
        Some(path) => load_syntax(path)?,
        None => WfSyntax::default(),
    };
    let reader = WfReader::new(syntax).context("invalid --syntax file")?;

    match cli.command {
        Command::Inspect { file, json } => {
            let dataset = read(&reader, &file)?;
            let stdout = io::stdout();
            let mut out = stdout.lock();
            if json {
                serde_json::to_writer_pretty(&mut out, &dataset).context("writing JSON")?;
                writeln!(out)?;
            } else {
                print_summary(&mut out, &dataset)?;
            }
        }
        Command::Export {
            file,
            classes,
            standardize,
            output,
        } => {
            let dataset = read(&reader, &file)?;
            let mut matrix = FeatureMatrix::from_classes(&dataset, classes.as_slice())
                .context("selecting classes")?;
            if standardize {
                matrix.standardize();
            }
            match output {
                Some(path) => {
                    let out = File::create(&path)
                        .with_context(|| format!("creating {}", path.display()))?;
                    matrix.write_csv(BufWriter::new(out))?;
                    info!("wrote {} rows to {}", matrix.len(), path.display());
                }
                None => matrix.write_csv(io::stdout().lock())?,
            }
        }
    }
    Ok(())
}

fn load_syntax(path: &Path) -> Result<WfSyntax> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading syntax file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("parsing syntax JSON in {}", path.display()))
}

fn read(reader: &WfReader, path: &Path) -> Result<WfDataset> {
    reader
        .read_wf_file(path)
        .with_context(|| format!("reading {}", path.display()))
}

fn print_summary<W: Write>(out: &mut W, dataset: &WfDataset) -> io::Result<()> {
    writeln!(out, "attributes ({}):", dataset.attribute_names.len())?;
    for name in &dataset.attribute_names {
        writeln!(out, "  {name}")?;
    }
    writeln!(out, "classes ({}):", dataset.len())?;
    for (label, windows) in &dataset.windows_by_class {
        let widths: Vec<usize> = windows.iter().map(|w| w.flat_len()).collect();
        match (widths.iter().min(), widths.iter().max()) {
            (Some(lo), Some(hi)) if lo == hi => {
                writeln!(out, "  {label}: {} windows, {lo} values each", windows.len())?
            }
            (Some(lo), Some(hi)) => writeln!(
                out,
                "  {label}: {} windows, {lo}..{hi} values",
                windows.len()
            )?,
            _ => writeln!(out, "  {label}: no windows")?,
        }
    }
    Ok(())
}
