extern crate clap;
use clap::*;

mod cmd_tefind;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let app = Command::new("tefind")
        .version(crate_version!())
        .author(crate_authors!())
        .about("`tefind` - Transposable element finder")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .subcommand(cmd_tefind::detect::make_subcommand())
        .subcommand(cmd_tefind::survey::make_subcommand())
        .subcommand(cmd_tefind::validate::make_subcommand())
        .subcommand(cmd_tefind::revcomp::make_subcommand())
        .after_help(
            r###"Subcommand groups:

* Detection:
    * detect   - TIR + TSD transposon detection in one sequence
    * survey   - Inverted repeat census across genomes

* Evaluation:
    * validate - Compare detections with ground truth

* Utilities:
    * revcomp  - Reverse complement

Set RUST_LOG=info to follow the detection stages on stderr.

"###,
        );

    // Check which subcommand the user ran...
    match app.get_matches().subcommand() {
        Some(("detect", sub_matches)) => cmd_tefind::detect::execute(sub_matches),
        Some(("survey", sub_matches)) => cmd_tefind::survey::execute(sub_matches),
        Some(("validate", sub_matches)) => cmd_tefind::validate::execute(sub_matches),
        Some(("revcomp", sub_matches)) => cmd_tefind::revcomp::execute(sub_matches),
        _ => unreachable!(),
    }?;

    Ok(())
}
