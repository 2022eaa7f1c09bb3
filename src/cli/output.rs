//! Output formatting for CLI commands.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::error::Result;
use crate::index::DocId;
use crate::suggest::Candidate;

/// Result of building one index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSummary {
    pub name: String,
    pub words: usize,
    pub terms: usize,
    pub duration_ms: u64,
}

/// One search result as printed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub word: String,
    pub similarity: f64,
}

impl From<&Candidate> for SearchHit {
    fn from(candidate: &Candidate) -> Self {
        SearchHit {
            doc_id: candidate.doc_id,
            word: candidate.word.clone(),
            similarity: candidate.similarity(),
        }
    }
}

/// Write search results in the requested format.
pub fn write_results<W: Write>(
    writer: &mut W,
    results: &[Candidate],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Human => {
            for candidate in results {
                writeln!(writer, "{}\t{:.4}", candidate.word, candidate.similarity())?;
            }
        }
        OutputFormat::Json => {
            let hits: Vec<SearchHit> = results.iter().map(SearchHit::from).collect();
            serde_json::to_writer_pretty(&mut *writer, &hits)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

/// Write build summaries in the requested format.
pub fn write_summaries<W: Write>(
    writer: &mut W,
    summaries: &[IndexSummary],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Human => {
            for summary in summaries {
                writeln!(
                    writer,
                    "{}: {} words, {} terms, {} ms",
                    summary.name, summary.words, summary.terms, summary.duration_ms
                )?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, summaries)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results() -> Vec<Candidate> {
        vec![
            Candidate::new(0, "tesla".to_string(), 0.0),
            Candidate::new(3, "tesla model".to_string(), 0.75),
        ]
    }

    #[test]
    fn test_human_results() {
        let mut out = Vec::new();
        write_results(&mut out, &results(), OutputFormat::Human).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "tesla\t1.0000\ntesla model\t0.2500\n"
        );
    }

    #[test]
    fn test_json_results() {
        let mut out = Vec::new();
        write_results(&mut out, &results(), OutputFormat::Json).unwrap();

        let hits: Vec<SearchHit> = serde_json::from_slice(&out).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[1].doc_id, 3);
        assert_eq!(hits[1].similarity, 0.25);
    }

    #[test]
    fn test_human_summary() {
        let summary = IndexSummary {
            name: "cars".to_string(),
            words: 4,
            terms: 20,
            duration_ms: 1,
        };
        let mut out = Vec::new();
        write_summaries(&mut out, &[summary], OutputFormat::Human).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "cars: 4 words, 20 terms, 1 ms\n");
    }
}
