//! Reader for tagged collection files.
//!
//! A collection is a sequence of `<DOC id="...">` blocks. The indexed content
//! of a block is its `<TEXT>` section followed by its optional `<HEADLINE>`.

use crate::error::{Error, Result};
use crate::index::{BuiltIndex, IndexBuilder};
use crate::tokenizer::tokenize;
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

lazy_static! {
    static ref DOC_RE: Regex = Regex::new(r#"(?s)<DOC\s+id="([^"]*)"[^>]*>(.*?)</DOC>"#).expect("valid regex");
    static ref TEXT_RE: Regex = Regex::new(r"(?s)<TEXT>(.*?)</TEXT>").expect("valid regex");
    static ref HEADLINE_RE: Regex = Regex::new(r"(?s)<HEADLINE>(.*?)</HEADLINE>").expect("valid regex");
    static ref PARA_RE: Regex = Regex::new(r"</?[pP]>").expect("valid regex");
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    pub doc_id: String,
    pub text: String,
}

/// Split collection markup into documents. `path` is only used for errors.
pub fn parse_collection(markup: &str, path: &Path) -> Result<Vec<RawDocument>> {
    let mut docs = Vec::new();
    for caps in DOC_RE.captures_iter(markup) {
        let doc_id = caps[1].trim().to_string();
        let body = &caps[2];
        if doc_id.is_empty() {
            return Err(Error::MalformedCollection {
                path: path.to_path_buf(),
                reason: "document with empty id".to_string(),
            });
        }
        let text = match TEXT_RE.captures(body) {
            Some(t) => t[1].to_string(),
            None => {
                return Err(Error::MalformedCollection {
                    path: path.to_path_buf(),
                    reason: format!("document {doc_id:?} has no <TEXT> section"),
                })
            }
        };
        let mut content = PARA_RE.replace_all(&text, " ").into_owned();
        if let Some(h) = HEADLINE_RE.captures(body) {
            content.push(' ');
            content.push_str(&PARA_RE.replace_all(&h[1], " "));
        }
        docs.push(RawDocument { doc_id, text: content });
    }
    if docs.is_empty() && !markup.trim().is_empty() {
        tracing::warn!(path = %path.display(), "no <DOC> blocks found");
    }
    Ok(docs)
}

/// Read one collection file, or every `.xml` file under a directory tree in
/// file-name order.
pub fn read_collection(path: &Path) -> Result<Vec<RawDocument>> {
    let mut files = Vec::new();
    if path.is_dir() {
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let p = e.path().unwrap_or(path).to_path_buf();
                Error::io(p, e.into())
            })?;
            let p = entry.path();
            if p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("xml") {
                files.push(p.to_path_buf());
            }
        }
    } else {
        files.push(path.to_path_buf());
    }

    let mut docs = Vec::new();
    for file in files {
        let markup = fs::read_to_string(&file).map_err(|e| Error::io(&file, e))?;
        let parsed = parse_collection(&markup, &file)?;
        tracing::debug!(file = %file.display(), docs = parsed.len(), "read collection file");
        docs.extend(parsed);
    }
    Ok(docs)
}

/// Normalize and index every document of a collection.
pub fn build_index(docs: &[RawDocument]) -> Result<BuiltIndex> {
    let mut builder = IndexBuilder::new();
    for doc in docs {
        builder.add_document(&doc.doc_id, tokenize(&doc.text))?;
    }
    builder.build()
}

pub fn build_collection_index(path: &Path) -> Result<BuiltIndex> {
    let docs = read_collection(path)?;
    build_index(&docs)
}
