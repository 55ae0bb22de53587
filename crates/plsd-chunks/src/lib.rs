//! plsd-chunks: file digests and the parallel chunk pipeline
//!
//! - `digest`: whole-file / slice SHA3-512 (block linkage and integrity)
//! - `pipeline`: split a file into fixed-size chunks, map a function over
//!   them in parallel, write the results back in index order

pub mod digest;
pub mod pipeline;

pub use digest::{digest_bytes, digest_file, DIGEST_LEN};
pub use pipeline::{process_file, process_file_staged, StagedFile};
