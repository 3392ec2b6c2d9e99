//! RAG answering: retrieve context, assemble the prompt, complete.

use std::sync::Arc;

use tracing::debug;

use crate::domain::errors::EngineResult;
use crate::domain::ports::completion::CompletionProvider;
use crate::infrastructure::retry::RetryPolicy;
use crate::services::retriever::{RetrievedContext, Retriever};

/// Size of the windows `answer_chunked` slices the answer into.
const STREAM_WINDOW_CHARS: usize = 200;

const ANSWER_PROMPT: &str = "\
You are a helpful contract assistant.
Answer ONLY using the context provided below.
Do not hallucinate or add extra info.

Context:
{context}

Question: {question}

Answer:
";

/// A grounded answer together with the context it was grounded on.
#[derive(Debug, Clone)]
pub struct RagAnswer {
    pub answer: String,
    pub context: RetrievedContext,
}

/// Answers questions against the indexed corpus.
///
/// The prompt instructs the model to answer only from the retrieved
/// context. When the index is empty the context section is empty and the
/// model is expected to decline; that is a degraded answer, not an error.
pub struct RagAnswerer {
    retriever: Retriever,
    completer: Arc<dyn CompletionProvider>,
    retry: RetryPolicy,
}

impl RagAnswerer {
    pub fn new(
        retriever: Retriever,
        completer: Arc<dyn CompletionProvider>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            retriever,
            completer,
            retry,
        }
    }

    /// Answer a question using retrieved context.
    pub async fn answer(&self, question: &str) -> EngineResult<RagAnswer> {
        let context = self.retriever.retrieve(question).await?;
        let prompt = build_prompt(&context);

        debug!(
            "Answering with {} context chunks, prompt {} chars",
            context.chunks.len(),
            prompt.len()
        );

        let answer = self.retry.execute(|| self.completer.complete(&prompt)).await?;

        Ok(RagAnswer { answer, context })
    }

    /// Answer a question and slice the answer into fixed-size character
    /// windows, for callers that deliver it incrementally.
    pub async fn answer_chunked(&self, question: &str) -> EngineResult<Vec<String>> {
        let answer = self.answer(question).await?.answer;
        Ok(window_chars(&answer, STREAM_WINDOW_CHARS))
    }
}

fn build_prompt(context: &RetrievedContext) -> String {
    ANSWER_PROMPT
        .replace("{context}", &context.context_text())
        .replace("{question}", &context.question)
}

/// Split a string into consecutive windows of at most `size` characters.
fn window_chars(text: &str, size: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(size)
        .map(|window| window.iter().collect())
        .collect()
}
