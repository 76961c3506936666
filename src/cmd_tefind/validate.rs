use clap::*;
use std::io::{Read, Write};
use tefind::libs::detect::Detection;
use tefind::libs::validate::{validate, GroundTruth, MatchMode};

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("validate")
        .about("Compares detections with ground truth")
        .after_help(
            r###"
This command reads the JSON written by `tefind detect` and a ground truth JSON
file, and reports true positives, precision and recall.

A detection matches a ground truth element when the two intervals overlap and
both endpoints differ by at most --tolerance. Each detection takes the first
matching element. Without --exclusive one element may be matched by several
detections.

Ground truth format:
    { "num_transposons": 1, "transposons": [ { "id": 1, "start": 5, "end": 60, "tsd": "...", "tir": "..." } ] }

Examples:
1. Validate with the default tolerance of 10 bp:
   tefind validate detection.json transposons_ground_truth.json

"###,
        )
        .arg(
            Arg::new("detection")
                .required(true)
                .index(1)
                .help("Detection JSON file"),
        )
        .arg(
            Arg::new("truth")
                .required(true)
                .index(2)
                .help("Ground truth JSON file"),
        )
        .arg(
            Arg::new("tolerance")
                .long("tolerance")
                .value_parser(value_parser!(usize))
                .default_value("10")
                .help("Allowed endpoint deviation"),
        )
        .arg(
            Arg::new("exclusive")
                .long("exclusive")
                .action(ArgAction::SetTrue)
                .help("Each ground truth element may be matched only once"),
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
    let tolerance = *args.get_one::<usize>("tolerance").unwrap();
    let mode = if args.get_flag("exclusive") {
        MatchMode::Exclusive
    } else {
        MatchMode::FirstMatch
    };

    let mut reader = tefind::reader(args.get_one::<String>("detection").unwrap())?;
    let mut json = String::new();
    reader.read_to_string(&mut json)?;
    let detection: Detection = serde_json::from_str(&json)?;

    let truth = GroundTruth::from_path(args.get_one::<String>("truth").unwrap())?;
    let report = validate(&detection.transposons, truth.records(), tolerance, mode);

    let mut writer = tefind::writer(args.get_one::<String>("outfile").unwrap())?;
    serde_json::to_writer_pretty(&mut writer, &report)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    Ok(())
}
