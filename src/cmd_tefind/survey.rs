use clap::*;
use std::io::Write;
use tefind::libs::nt::Sequence;
use tefind::libs::repeat::{Cancel, TirParams};
use tefind::libs::survey::{survey, SurveyParams};

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("survey")
        .about("Counts inverted repeats as transposon markers")
        .after_help(
            r###"
This command scans every record of the input FASTA files for short inverted
repeats and reports, per record:

* total number of non-overlapping inverted repeat pairs
* counts per repeat length, longest first
* the first --top pairs, longest first
* density per Mbp

Output is a JSON array, one object per record.

Examples:
1. Survey bacterial genomes with default 4-6 bp repeats:
   tefind survey Escherichia_coli.fa Bacillus_subtilis.fa

2. Longer repeats, 8 threads:
   tefind survey genome.fa --min-len 6 --max-len 10 --parallel 8

"###,
        )
        .arg(
            Arg::new("infiles")
                .required(true)
                .num_args(1..)
                .index(1)
                .help("Input FASTA file(s) to process"),
        )
        .arg(
            Arg::new("min_len")
                .long("min-len")
                .value_parser(value_parser!(usize))
                .default_value("4")
                .help("Minimum repeat length"),
        )
        .arg(
            Arg::new("max_len")
                .long("max-len")
                .value_parser(value_parser!(usize))
                .default_value("6")
                .help("Maximum repeat length"),
        )
        .arg(
            Arg::new("min_gap")
                .long("min-gap")
                .value_parser(value_parser!(usize))
                .default_value("10")
                .help("Minimum bases between the two windows"),
        )
        .arg(
            Arg::new("max_gap")
                .long("max-gap")
                .value_parser(value_parser!(usize))
                .default_value("100")
                .help("Maximum bases between the two windows"),
        )
        .arg(
            Arg::new("top")
                .long("top")
                .value_parser(value_parser!(usize))
                .default_value("20")
                .help("Number of repeats to list"),
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
    let params = SurveyParams {
        tir: TirParams {
            min_len: *args.get_one::<usize>("min_len").unwrap(),
            max_len: *args.get_one::<usize>("max_len").unwrap(),
            min_gap: *args.get_one::<usize>("min_gap").unwrap(),
            max_gap: *args.get_one::<usize>("max_gap").unwrap(),
        },
        top: *args.get_one::<usize>("top").unwrap(),
        threads: *args.get_one::<usize>("parallel").unwrap(),
    };
    params.validate()?;

    let mut reports = vec![];
    for infile in args.get_many::<String>("infiles").unwrap() {
        for (name, bases) in tefind::read_fasta(infile)? {
            let seq = Sequence::normalize(&bases)?;
            reports.push(survey(&name, &seq, &params, &Cancel::none())?);
        }
    }

    let mut writer = tefind::writer(args.get_one::<String>("outfile").unwrap())?;
    serde_json::to_writer_pretty(&mut writer, &reports)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    Ok(())
}
