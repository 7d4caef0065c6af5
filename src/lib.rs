// Thesis keyness: what makes a collection of theses distinctive.
//
// This is the library root. PDFs are exported to text, the text is tagged
// with CLAWS/USAS, and token and semantic tag frequencies are compared
// against a reference corpus with SigEff.

pub mod config;
pub mod labels;
pub mod output;
pub mod paths;
pub mod pdf;
pub mod stats;
pub mod tagging;
