pub mod assemble;
pub mod backend;
pub mod config_file;
pub mod filter;
pub mod matching;
pub mod mock;
pub mod ordering;
pub mod terms;
pub mod text;

// Re-export for convenience
pub use assemble::{AssembleError, assemble_pages};
pub use backend::{BackendError, PdfBackend};
pub use config_file::{ConfigFile, Settings};
pub use filter::{
    FilterError, FilterOptions, FilterOutcome, FilterRequest, FilteredDocument, PageSnippet,
    PreviewReport, Selection, run_filter, select_pages,
};
pub use matching::matching_pages;
pub use ordering::{RankedPage, earliest_offset, order_by_offset, rank_pages};
pub use terms::{MatchMode, TermError, TermSpec, parse_term_array, parse_terms};
pub use text::{CaseLocale, normalize, normalize_with};
