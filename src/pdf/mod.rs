// Thesis PDFs — Science Parse client, section heuristics and text export.

pub mod export;
pub mod science_parse;
pub mod sections;
