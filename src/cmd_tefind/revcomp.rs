use clap::*;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("revcomp")
        .about("Reverse complements sequences")
        .after_help(
            r###"
Prints the reverse complement of each sequence given on the command line, one
per line. Lowercase bases are uppercased; N stays N.

Examples:
1. Single sequence:
   tefind revcomp GATTACA

"###,
        )
        .arg(
            Arg::new("seqs")
                .required(true)
                .num_args(1..)
                .index(1)
                .help("Sequences"),
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
    let mut writer = tefind::writer(args.get_one::<String>("outfile").unwrap())?;

    for seq in args.get_many::<String>("seqs").unwrap() {
        let rc = tefind::libs::nt::rev_comp_str(&seq.to_ascii_uppercase())?;
        writer.write_fmt(format_args!("{}\n", rc))?;
    }
    writer.flush()?;

    Ok(())
}
