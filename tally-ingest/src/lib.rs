//! tally-ingest: everything between a raw message and a candidate record.
//! Text cleanup, extractor prompt/schema, reply parsing, taxonomy files and
//! batch sample files.

pub mod batch;
pub mod preprocess;
pub mod prompt;
pub mod reply;
pub mod taxonomy_file;
pub mod types;

pub use batch::{read_batch, read_batch_from};
pub use preprocess::Preprocessor;
pub use reply::parse_extractor_reply;
pub use taxonomy_file::{SAMPLE_TAXONOMY, TaxonomySource, load_taxonomy_file, parse_taxonomy_toml};
pub use types::{BatchMessage, Expectation};
