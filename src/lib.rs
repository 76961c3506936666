pub mod libs;

pub use libs::io::{read_first_fasta, read_fasta, reader, writer};
