//! Natural Language Processing components
//!
//! This module provides corpus loading, tokenization and the two
//! stopword providers (library list and NeigSyl elbow).

pub mod neigsyl;
pub mod stopwords;
pub mod tokenizer;
