pub mod detect;
pub mod error;
pub mod io;
pub mod nt;
pub mod repeat;
pub mod resolve;
pub mod survey;
pub mod transposon;
pub mod validate;

pub use error::{Result, TeError};
