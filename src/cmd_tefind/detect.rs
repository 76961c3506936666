use clap::*;
use log::warn;
use std::io::Write;
use tefind::libs::detect::{DetectParams, Detection, Detector};
use tefind::libs::nt::Sequence;
use tefind::libs::repeat::{Cancel, TirParams, TsdParams};
use tefind::libs::validate::{GroundTruth, MatchMode};

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("detect")
        .about("Detects transposable elements by TIRs and TSDs")
        .after_help(
            r###"
This command detects transposable elements in the first record of a FASTA file.

Processing:
  1. Find inverted repeat pairs (terminal inverted repeats, TIRs).
     Windows containing N are never used as the left TIR.
  2. Keep non-overlapping TIR pairs, longest first, then leftmost.
  3. Find direct repeat pairs (target site duplications, TSDs).
  4. For each TIR pair, take the longest TSD pair that encloses it and whose
     copies are more than --min-element bases apart.
     * With a TSD: confidence "high", the element spans both TSD copies.
     * Without:    confidence "medium", the element spans the TIR pair.
  5. Keep non-overlapping elements, leftmost first.

Notes:
* Coordinates are 0-based, inclusive.
* Lowercase bases are uppercased. Symbols other than ACGTN are an error.
* Supports both plain text and gzipped (.gz) files
* Reads from stdin if input file is 'stdin'
* With --truth, precision and recall are added. An unreadable truth file only
  skips validation.

Examples:
1. Detect with default thresholds (8 bp TIRs, 5-12 bp TSDs):
   tefind detect artificial_dna.fa

2. Compare with ground truth:
   tefind detect artificial_dna.fa --truth transposons_ground_truth.json

3. Longer TIRs, 4 threads, tabular output:
   tefind detect genome.fa --tir-min 8 --tir-max 15 --parallel 4 --format tsv

"###,
        )
        .arg(
            Arg::new("infile")
                .required(true)
                .index(1)
                .help("Input FASTA file to process"),
        )
        .arg(
            Arg::new("tir_min")
                .long("tir-min")
                .value_parser(value_parser!(usize))
                .default_value("8")
                .help("Minimum TIR length"),
        )
        .arg(
            Arg::new("tir_max")
                .long("tir-max")
                .value_parser(value_parser!(usize))
                .default_value("8")
                .help("Maximum TIR length"),
        )
        .arg(
            Arg::new("tir_min_gap")
                .long("tir-min-gap")
                .value_parser(value_parser!(usize))
                .default_value("10")
                .help("Minimum bases between the two TIRs"),
        )
        .arg(
            Arg::new("tir_max_gap")
                .long("tir-max-gap")
                .value_parser(value_parser!(usize))
                .default_value("100")
                .help("Maximum bases between the two TIRs"),
        )
        .arg(
            Arg::new("tsd_min")
                .long("tsd-min")
                .value_parser(value_parser!(usize))
                .default_value("5")
                .help("Minimum TSD length"),
        )
        .arg(
            Arg::new("tsd_max")
                .long("tsd-max")
                .value_parser(value_parser!(usize))
                .default_value("12")
                .help("Maximum TSD length"),
        )
        .arg(
            Arg::new("tsd_max_dist")
                .long("tsd-max-dist")
                .value_parser(value_parser!(usize))
                .default_value("100")
                .help("Maximum distance from the end of the first TSD to the second"),
        )
        .arg(
            Arg::new("min_element")
                .long("min-element")
                .value_parser(value_parser!(usize))
                .default_value("30")
                .help("TSD copies must be more than this many bases apart"),
        )
        .arg(
            Arg::new("truth")
                .long("truth")
                .num_args(1)
                .help("Ground truth JSON file"),
        )
        .arg(
            Arg::new("tolerance")
                .long("tolerance")
                .value_parser(value_parser!(usize))
                .default_value("10")
                .help("Allowed endpoint deviation when matching ground truth"),
        )
        .arg(
            Arg::new("exclusive")
                .long("exclusive")
                .action(ArgAction::SetTrue)
                .help("Each ground truth element may be matched only once"),
        )
        .arg(
            Arg::new("parallel")
                .long("parallel")
                .short('p')
                .value_parser(value_parser!(usize))
                .default_value("1")
                .help("Number of threads for parallel processing"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .value_parser(value_parser!(f64))
                .help("Abort the scan after this many seconds"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .value_parser(["json", "tsv"])
                .default_value("json")
                .help("Output format"),
        )
        .arg(
            Arg::new("outfile")
                .long("outfile")
                .short('o')
                .num_args(1)
                .default_value("stdout")
                .help("Output filename. [stdout] for screen"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let infile = args.get_one::<String>("infile").unwrap();
    let params = DetectParams {
        tir: TirParams {
            min_len: *args.get_one::<usize>("tir_min").unwrap(),
            max_len: *args.get_one::<usize>("tir_max").unwrap(),
            min_gap: *args.get_one::<usize>("tir_min_gap").unwrap(),
            max_gap: *args.get_one::<usize>("tir_max_gap").unwrap(),
        },
        tsd: TsdParams {
            min_len: *args.get_one::<usize>("tsd_min").unwrap(),
            max_len: *args.get_one::<usize>("tsd_max").unwrap(),
            max_distance: *args.get_one::<usize>("tsd_max_dist").unwrap(),
        },
        min_element_len: *args.get_one::<usize>("min_element").unwrap(),
        threads: *args.get_one::<usize>("parallel").unwrap(),
    };
    let tolerance = *args.get_one::<usize>("tolerance").unwrap();
    let mode = if args.get_flag("exclusive") {
        MatchMode::Exclusive
    } else {
        MatchMode::FirstMatch
    };
    let cancel = match args.get_one::<f64>("timeout") {
        Some(secs) => {
            let timeout = std::time::Duration::try_from_secs_f64(*secs)
                .map_err(|e| anyhow::anyhow!("invalid timeout {}: {}", secs, e))?;
            Cancel::new().with_timeout(timeout)?
        }
        None => Cancel::none(),
    };
    let format = args.get_one::<String>("format").unwrap();

    //----------------------------
    // Operating
    //----------------------------
    let (name, bases) = tefind::read_first_fasta(infile)?;
    let seq = Sequence::normalize(&bases)?;
    log::info!("{}: {} bp", name, seq.len());

    let mut detection = Detector::new(params).with_cancel(cancel).run(&name, &seq)?;

    if let Some(truth_file) = args.get_one::<String>("truth") {
        match GroundTruth::from_path(truth_file) {
            Ok(truth) => {
                detection.validate_against(truth.records(), tolerance, mode);
            }
            Err(e) => warn!("{}; skipping validation", e),
        }
    }

    //----------------------------
    // Output
    //----------------------------
    let mut writer = tefind::writer(args.get_one::<String>("outfile").unwrap())?;
    match format.as_str() {
        "tsv" => write_tsv(&mut writer, &detection)?,
        _ => {
            serde_json::to_writer_pretty(&mut writer, &detection)?;
            writer.write_all(b"\n")?;
        }
    }
    writer.flush()?;

    Ok(())
}

fn write_tsv(writer: &mut Box<dyn Write>, detection: &Detection) -> anyhow::Result<()> {
    writer.write_fmt(format_args!(
        "#id\tstart\tend\tlength\ttir_length\ttsd\tconfidence\ttir_left\ttir_right\n"
    ))?;
    for (idx, te) in detection.transposons.iter().enumerate() {
        writer.write_fmt(format_args!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
            idx + 1,
            te.start,
            te.end,
            te.length,
            te.tir_length,
            te.tsd.as_deref().unwrap_or("N/A"),
            te.confidence,
            te.tir_left,
            te.tir_right,
        ))?;
    }
    if let Some(report) = &detection.validation {
        writer.write_fmt(format_args!(
            "#true_positives={}\tprecision={:.4}\trecall={:.4}\n",
            report.true_positives, report.precision, report.recall
        ))?;
    }

    Ok(())
}
