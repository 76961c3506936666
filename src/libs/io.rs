use crate::libs::error::{Result, TeError};
use std::io::{BufRead, BufReader, BufWriter, Write};

/// Opens `input`, or stdin for `"stdin"`. `.gz` files are decompressed.
///
/// ```
/// use std::io::BufRead;
/// let reader = tefind::reader("tests/fasta/te.fa").unwrap();
/// assert_eq!(reader.lines().count(), 2);
///
/// assert!(tefind::reader("tests/fasta/missing.fa").is_err());
/// ```
pub fn reader(input: &str) -> Result<Box<dyn BufRead>> {
    let reader: Box<dyn BufRead> = if input == "stdin" {
        Box::new(BufReader::new(std::io::stdin()))
    } else {
        let path = std::path::Path::new(input);
        let file = match std::fs::File::open(path) {
            Err(why) => {
                return Err(TeError::InputNotFound(format!(
                    "{}: {}",
                    path.display(),
                    why
                )))
            }
            Ok(file) => file,
        };

        if path.extension() == Some(std::ffi::OsStr::new("gz")) {
            Box::new(BufReader::new(flate2::read::MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        }
    };

    Ok(reader)
}

/// Writes to `output`, or stdout for `"stdout"`.
pub fn writer(output: &str) -> Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = if output == "stdout" {
        Box::new(BufWriter::new(std::io::stdout()))
    } else {
        Box::new(BufWriter::new(std::fs::File::create(output)?))
    };

    Ok(writer)
}

/// All `(name, bases)` records of a FASTA file. Bases are returned as stored.
pub fn read_fasta(input: &str) -> Result<Vec<(String, Vec<u8>)>> {
    let mut fa_in = noodles_fasta::io::Reader::new(reader(input)?);

    let mut records = vec![];
    for result in fa_in.records() {
        let record = result?;
        let name: Vec<u8> = record.name().into();
        let name = String::from_utf8_lossy(&name).to_string();
        records.push((name, record.sequence().as_ref().to_vec()));
    }

    Ok(records)
}

/// The first FASTA record. Later records are ignored.
pub fn read_first_fasta(input: &str) -> Result<(String, Vec<u8>)> {
    let mut records = read_fasta(input)?;
    if records.is_empty() {
        return Err(TeError::InputNotFound(format!(
            "{}: no FASTA records",
            input
        )));
    }
    if records.len() > 1 {
        log::warn!(
            "{}: {} records, only the first is used",
            input,
            records.len()
        );
    }

    Ok(records.swap_remove(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use tempfile::tempdir;

    #[test]
    fn test_read_fasta() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("multi.fa");
        std::fs::write(&path, ">seq1 desc\nACGT\nacgt\n>seq2\nNNNN\n").unwrap();

        let records = read_fasta(path.to_str().unwrap()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].0, "seq1");
        assert_eq!(records[0].1, b"ACGTacgt".to_vec());
        assert_eq!(records[1].1, b"NNNN".to_vec());

        let (name, seq) = read_first_fasta(path.to_str().unwrap()).unwrap();
        assert_eq!(name, "seq1");
        assert_eq!(seq.len(), 8);
    }

    #[test]
    fn test_read_gz() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("one.fa.gz");
        {
            let file = std::fs::File::create(&path).unwrap();
            let mut encoder = GzEncoder::new(file, flate2::Compression::default());
            writeln!(encoder, ">gz\nGATTACA").unwrap();
            encoder.finish().unwrap();
        }

        let (name, seq) = read_first_fasta(path.to_str().unwrap()).unwrap();
        assert_eq!(name, "gz");
        assert_eq!(seq, b"GATTACA".to_vec());
    }

    #[test]
    fn test_missing() {
        assert!(matches!(
            read_first_fasta("tests/no/such.fa"),
            Err(TeError::InputNotFound(_))
        ));

        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.fa");
        std::fs::write(&path, "").unwrap();
        assert!(matches!(
            read_first_fasta(path.to_str().unwrap()),
            Err(TeError::InputNotFound(_))
        ));
    }
}
