//! Context assembly for grounded generation.

use crate::types::RetrievalResults;

/// Merge retrieved verses into one labeled text block.
///
/// Each corpus with hits contributes an upper-cased `NAME:` header followed by
/// one line per verse. Groups are separated by a blank line; corpora without
/// hits are left out.
pub fn assemble_context(results: &RetrievalResults) -> String {
    results
        .non_empty()
        .map(|group| {
            let mut block = format!("{}:", group.corpus.to_uppercase());
            for hit in &group.hits {
                block.push('\n');
                block.push_str(&hit.record.content);
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CorpusHits, SearchHit, VerseRecord};

    fn group(corpus: &str, contents: &[&str]) -> CorpusHits {
        CorpusHits {
            corpus: corpus.to_string(),
            hits: contents
                .iter()
                .enumerate()
                .map(|(i, c)| SearchHit {
                    record: VerseRecord::new(format!("{}{}", corpus, i), *c),
                    score: 1.0 - i as f32 * 0.1,
                })
                .collect(),
        }
    }

    #[test]
    fn test_assemble_groups_in_order() {
        let results = RetrievalResults {
            corpora: vec![
                group("quran", &[]),
                group("gita", &["Do your duty.", "Be steady in mind."]),
                group("bible", &["Fear not."]),
            ],
        };

        assert_eq!(
            assemble_context(&results),
            "GITA:\nDo your duty.\nBe steady in mind.\n\nBIBLE:\nFear not."
        );
    }

    #[test]
    fn test_zero_hit_corpus_never_appears() {
        let results = RetrievalResults {
            corpora: vec![group("quran", &[]), group("bible", &["Fear not."])],
        };

        assert!(!assemble_context(&results).contains("QURAN"));
    }

    #[test]
    fn test_empty_results_give_empty_context() {
        assert_eq!(assemble_context(&RetrievalResults::default()), "");
    }
}
