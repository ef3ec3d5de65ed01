//! BM25 keyword scoring using Tantivy.
//!
//! The catalog is indexed once into an in-memory Tantivy index. Documents are
//! the already-normalized searchable texts, so the index tokenizer only has
//! to split on whitespace. Scoring returns one BM25 score per product, with
//! zeros for products that share no term with the query.

use anyhow::{Context, Result};
use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, Occur, Query, TermQuery};
use tantivy::schema::{
    Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, Value as _, STORED,
};
use tantivy::tokenizer::{TextAnalyzer, WhitespaceTokenizer};
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};
use tracing::debug;

/// Tokenizer registered for the text field
const TOKENIZER_NAME: &str = "normalized";

/// Schema field names
const FIELD_TEXT: &str = "text";
const FIELD_POSITION: &str = "position";

/// Writer heap budget in bytes
const WRITER_HEAP_SIZE: usize = 50_000_000;

/// BM25 index schema.
#[derive(Clone)]
struct Bm25Schema {
    schema: Schema,
    text: Field,
    position: Field,
}

impl Bm25Schema {
    fn new() -> Self {
        let mut schema_builder = Schema::builder();

        let indexing = TextFieldIndexing::default()
            .set_tokenizer(TOKENIZER_NAME)
            .set_index_option(IndexRecordOption::WithFreqs);
        let text_options = TextOptions::default().set_indexing_options(indexing);

        let text = schema_builder.add_text_field(FIELD_TEXT, text_options);
        let position = schema_builder.add_u64_field(FIELD_POSITION, STORED);

        Self {
            schema: schema_builder.build(),
            text,
            position,
        }
    }
}

/// Read-only BM25 index over the catalog's searchable texts.
pub struct Bm25Index {
    schema: Bm25Schema,
    reader: IndexReader,
    len: usize,
}

impl Bm25Index {
    /// Index `texts` in catalog order.
    ///
    /// Each text must already be normalized; it is split on whitespace only.
    pub fn build(texts: &[String]) -> Result<Self> {
        let schema = Bm25Schema::new();
        let index = Index::create_in_ram(schema.schema.clone());
        index
            .tokenizers()
            .register(TOKENIZER_NAME, TextAnalyzer::from(WhitespaceTokenizer::default()));

        let mut writer: IndexWriter = index
            .writer_with_num_threads(1, WRITER_HEAP_SIZE)
            .with_context(|| "Failed to create index writer")?;

        for (position, text) in texts.iter().enumerate() {
            writer.add_document(doc!(
                schema.text => text.as_str(),
                schema.position => position as u64,
            ))?;
        }

        writer
            .commit()
            .with_context(|| "Failed to commit BM25 index")?;

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .with_context(|| "Failed to create index reader")?;

        debug!("BM25 index built over {} documents", texts.len());

        Ok(Self {
            schema,
            reader,
            len: texts.len(),
        })
    }

    /// Number of indexed documents
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// BM25 score of every document for the given query tokens.
    ///
    /// The result has one entry per document, in catalog order. Each query
    /// token contributes independently, so repeated tokens count repeatedly.
    /// An empty token list scores every document zero.
    pub fn score(&self, tokens: &[String]) -> Result<Vec<f32>> {
        let mut scores = vec![0.0f32; self.len];
        if tokens.is_empty() || self.len == 0 {
            return Ok(scores);
        }

        let clauses: Vec<(Occur, Box<dyn Query>)> = tokens
            .iter()
            .map(|token| {
                let term = Term::from_field_text(self.schema.text, token);
                let query: Box<dyn Query> =
                    Box::new(TermQuery::new(term, IndexRecordOption::WithFreqs));
                (Occur::Should, query)
            })
            .collect();
        let query = BooleanQuery::new(clauses);

        let searcher = self.reader.searcher();
        let hits = searcher
            .search(&query, &TopDocs::with_limit(self.len))
            .with_context(|| "BM25 search failed")?;

        for (score, address) in hits {
            let document: TantivyDocument = searcher
                .doc(address)
                .with_context(|| "Failed to read BM25 document")?;
            let position = document
                .get_first(self.schema.position)
                .and_then(|v| v.as_u64())
                .with_context(|| "BM25 document has no position")?;

            if let Some(slot) = scores.get_mut(position as usize) {
                *slot = score;
            }
        }

        Ok(scores)
    }
}
