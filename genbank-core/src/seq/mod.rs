pub mod sequence;

pub use sequence::{SeqKind, Sequence};
