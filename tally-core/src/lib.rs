//! tally-core: taxonomy-constrained normalization and validation of
//! extracted transactions.

pub mod canonicalize;
pub mod classifier;
pub mod error;
pub mod lexicon;
pub mod money;
pub mod pipeline;
pub mod record;
pub mod resolve;
pub mod taxonomy;
pub mod text;
pub mod time;
pub mod validate;

pub use canonicalize::{UnknownTokens, canonicalize_account, canonicalize_field};
pub use classifier::{infer_expense_category, infer_income_category, looks_like_income};
pub use error::{ErrorKind, Field, ValidationError};
pub use lexicon::{KeywordRule, KeywordRules, Lexicon, Synonyms};
pub use money::{Currency, round_half_up};
pub use pipeline::{Normalized, Normalizer};
pub use record::{CandidateRecord, FieldInput, RawAmount, TransactionKind, ValidatedTransaction};
pub use resolve::{Resolution, ResolutionBasis, ResolvePolicy, TieBreak, XorResolver, resolve};
pub use taxonomy::{Taxonomy, TaxonomyStore};
pub use validate::{DateWindow, RecordValidator};
