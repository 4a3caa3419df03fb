//! Study Assistant
//!
//! Orchestrates ingestion, retrieval, prompting and structured-output
//! recovery. Every generation call follows the same path: build a context
//! from retrieval, short-circuit when there is none, render the prompt, call
//! the model, recover the result.

use buddy_models::{FlashcardDeck, GenerateRequest, IngestReport, MindMap, Passage, QuizSet, SourceDocument};
use buddy_utils::{recover_flashcards, recover_mindmap, recover_quiz, AppConfig, BuddyError, BuddyResult, RecoveryOutput};
use std::sync::Arc;
use tracing::{info, warn};

use crate::chunker::Chunker;
use crate::ollama_client::{CompletionService, EmbeddingService};
use crate::prompts::{PromptKind, PromptTemplates, PromptVars};
use crate::retrieval::VectorIndex;
use crate::text_extractor::TextExtractor;

/// Context values that mean retrieval found nothing.
const EMPTY_CONTEXT_MARKERS: [&str; 2] = ["No relevant context found.", "None"];

pub const NO_TEXT_MESSAGE: &str = "No extractable text. If a PDF is scanned, it needs OCR first.";

/// One file from an upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub data: Vec<u8>,
}

/// Whether a rendered context holds anything worth prompting with.
pub fn has_context(context: &str) -> bool {
    let trimmed = context.trim();
    !trimmed.is_empty() && !EMPTY_CONTEXT_MARKERS.contains(&trimmed)
}

/// `[i] source` header over each passage, separated by blank lines.
pub fn format_context(passages: &[Passage]) -> String {
    passages
        .iter()
        .enumerate()
        .map(|(i, p)| format!("[{}] {}\n{}", i + 1, p.source, p.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[derive(Clone)]
pub struct StudyAssistant {
    completion: Arc<dyn CompletionService>,
    index: VectorIndex,
    prompts: Arc<PromptTemplates>,
    extractor: Arc<TextExtractor>,
    chunker: Chunker,
    top_k: usize,
    default_flashcards: u32,
    default_questions: u32,
}

impl StudyAssistant {
    pub fn new(
        config: &AppConfig,
        completion: Arc<dyn CompletionService>,
        embedder: Arc<dyn EmbeddingService>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            completion,
            index: VectorIndex::new(embedder),
            prompts: Arc::new(PromptTemplates::new()?),
            extractor: Arc::new(TextExtractor::new()),
            chunker: Chunker::new(config.retrieval.chunk_size, config.retrieval.chunk_overlap),
            top_k: config.retrieval.top_k,
            default_flashcards: config.generation.flashcards,
            default_questions: config.generation.quiz_questions,
        })
    }

    /// Replaces the index with the text of `files`.
    pub async fn ingest(&self, files: Vec<UploadedFile>, note_id: Option<String>) -> BuddyResult<IngestReport> {
        let mut documents = Vec::new();
        for file in files {
            match self.extractor.extract(&file.name, &file.data) {
                Ok(text) if !text.is_empty() => documents.push(SourceDocument {
                    source: file.name,
                    text,
                    note_id: note_id.clone(),
                }),
                Ok(_) => warn!(file_name = %file.name, "No text in upload"),
                Err(e) => warn!(file_name = %file.name, error = %e, "Skipping unreadable upload"),
            }
        }

        let passages: Vec<Passage> = documents.iter().flat_map(|doc| self.chunker.chunk_document(doc)).collect();
        let chunks = self.index.replace(passages).await?;

        if documents.is_empty() {
            return Ok(IngestReport::rejected(NO_TEXT_MESSAGE));
        }
        info!(docs = documents.len(), chunks, note_id = ?note_id, "Upload indexed");
        Ok(IngestReport::indexed(documents.len(), chunks))
    }

    pub async fn indexed_chunks(&self) -> usize {
        self.index.len().await
    }

    pub async fn build_context(&self, query: &str, note_id: Option<&str>) -> BuddyResult<String> {
        let passages = self.index.search(query, self.top_k, note_id).await?;
        Ok(format_context(&passages))
    }

    fn render(&self, kind: PromptKind, vars: &PromptVars<'_>) -> BuddyResult<String> {
        self.prompts
            .render(kind, vars)
            .map_err(|e| BuddyError::internal(format!("{:#}", e)))
    }

    pub async fn ask(&self, question: &str, note_id: Option<&str>) -> BuddyResult<String> {
        let context = self.build_context(question, note_id).await?;
        let kind = if has_context(&context) {
            PromptKind::Answer
        } else {
            PromptKind::NotInNotes
        };

        let prompt = self.render(kind, &PromptVars { context: &context, question, ..Default::default() })?;
        self.completion.complete(&prompt).await
    }

    pub async fn summarize(&self, request: &GenerateRequest) -> BuddyResult<String> {
        let context = self
            .build_context(request.topic().unwrap_or("main topics"), request.note_id.as_deref())
            .await?;
        let prompt = self.render(
            PromptKind::Summary,
            &PromptVars { context: &context, topic: request.topic(), ..Default::default() },
        )?;
        self.completion.complete(&prompt).await
    }

    pub async fn flashcards(&self, request: &GenerateRequest) -> BuddyResult<FlashcardDeck> {
        let count = request.count_or(self.default_flashcards);
        self.generate(PromptKind::Flashcards, "key concepts", request, count, recover_flashcards).await
    }

    pub async fn quiz(&self, request: &GenerateRequest) -> BuddyResult<QuizSet> {
        let count = request.count_or(self.default_questions);
        self.generate(PromptKind::Quiz, "key topics", request, count, recover_quiz).await
    }

    pub async fn mindmap(&self, request: &GenerateRequest) -> BuddyResult<MindMap> {
        self.generate(PromptKind::MindMap, "overview", request, 0, recover_mindmap).await
    }

    async fn generate<T: RecoveryOutput>(
        &self,
        kind: PromptKind,
        default_topic: &str,
        request: &GenerateRequest,
        count: u32,
        recover: fn(&str) -> T,
    ) -> BuddyResult<T> {
        let context = self
            .build_context(request.topic().unwrap_or(default_topic), request.note_id.as_deref())
            .await?;
        if !has_context(&context) {
            info!(prompt = kind.name(), "No context retrieved, skipping model call");
            return Ok(T::no_context());
        }

        let prompt = self.render(
            kind,
            &PromptVars { context: &context, topic: request.topic(), count, ..Default::default() },
        )?;
        let raw = self.completion.complete(&prompt).await?;
        Ok(recover(&raw))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::retrieval::tests::KeywordEmbedder;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replies with a fixed completion and records every prompt.
    pub(crate) struct ScriptedCompletion {
        reply: String,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedCompletion {
        pub(crate) fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                prompts: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CompletionService for ScriptedCompletion {
        async fn complete(&self, prompt: &str) -> BuddyResult<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }
    }

    pub(crate) fn assistant(completion: Arc<ScriptedCompletion>) -> StudyAssistant {
        StudyAssistant::new(&AppConfig::default(), completion, Arc::new(KeywordEmbedder)).unwrap()
    }

    fn text_file(name: &str, text: &str) -> UploadedFile {
        UploadedFile {
            name: name.to_string(),
            data: text.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_has_context() {
        assert!(!has_context(""));
        assert!(!has_context("  \n"));
        assert!(!has_context("No relevant context found."));
        assert!(!has_context(" None "));
        assert!(has_context("[1] a.txt\ncells"));
    }

    #[test]
    fn test_format_context() {
        let passages = vec![
            Passage::new("a.txt", "Cells divide.", None),
            Passage::new("b.pdf", "Atoms bond.", None),
        ];
        assert_eq!(format_context(&passages), "[1] a.txt\nCells divide.\n\n[2] b.pdf\nAtoms bond.");
        assert_eq!(format_context(&[]), "");
    }

    #[tokio::test]
    async fn test_structured_calls_short_circuit_without_documents() {
        let completion = ScriptedCompletion::new("{}");
        let assistant = assistant(completion.clone());
        let request = GenerateRequest::default();

        let deck = assistant.flashcards(&request).await.unwrap();
        assert!(deck.flashcards.is_empty());
        assert_eq!(deck.error.as_deref(), Some("No documents uploaded. Please upload study materials first."));

        let quiz = assistant.quiz(&request).await.unwrap();
        assert!(quiz.error.is_some());

        let map = assistant.mindmap(&request).await.unwrap();
        assert!(map.branches.is_empty());
        assert!(map.error.is_some());

        assert_eq!(completion.calls(), 0);
    }

    #[tokio::test]
    async fn test_flashcards_after_upload() {
        let reply = "Sure!\n```json\n{'flashcards': [{'front': 'What is a cell', 'back': 'The basic unit of life'}],}\n```";
        let completion = ScriptedCompletion::new(reply);
        let assistant = assistant(completion.clone());

        let report = assistant
            .ingest(vec![text_file("bio.txt", "Every cell has a membrane.")], None)
            .await
            .unwrap();
        assert_eq!(report, IngestReport::indexed(1, 1));

        let deck = assistant
            .flashcards(&GenerateRequest { n: Some(3), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(deck.flashcards.len(), 1);
        assert_eq!(deck.flashcards[0].front, "What is a cell?");

        let prompts = completion.prompts.lock().unwrap();
        assert!(prompts[0].contains("create 3 flashcards"));
        assert!(prompts[0].contains("[1] bio.txt\nEvery cell has a membrane."));
    }

    #[tokio::test]
    async fn test_upload_without_text_is_rejected() {
        let assistant = assistant(ScriptedCompletion::new(""));
        let report = assistant
            .ingest(vec![text_file("empty.txt", "   "), text_file("essay.docx", "PK")], None)
            .await
            .unwrap();
        assert!(!report.ok);
        assert_eq!(report.message.as_deref(), Some(NO_TEXT_MESSAGE));
    }

    #[tokio::test]
    async fn test_upload_replaces_previous_content() {
        let assistant = assistant(ScriptedCompletion::new(""));
        assistant.ingest(vec![text_file("a.txt", "cell")], None).await.unwrap();
        assistant.ingest(vec![text_file("b.txt", "atom")], None).await.unwrap();

        let context = assistant.build_context("cell", None).await.unwrap();
        assert_eq!(context, "[1] b.txt\natom");
    }

    #[tokio::test]
    async fn test_ask_without_context_uses_not_in_notes_prompt() {
        let completion = ScriptedCompletion::new("That isn't in your notes yet.");
        let assistant = assistant(completion.clone());

        let answer = assistant.ask("What is osmosis?", None).await.unwrap();
        assert_eq!(answer, "That isn't in your notes yet.");
        let prompts = completion.prompts.lock().unwrap();
        assert!(prompts[0].contains("found no relevant information"));
        assert!(prompts[0].contains("What is osmosis?"));
    }

    #[tokio::test]
    async fn test_note_filter_limits_context() {
        let completion = ScriptedCompletion::new("answer");
        let assistant = assistant(completion.clone());
        assistant
            .ingest(vec![text_file("a.txt", "cell notes")], Some("note_a".to_string()))
            .await
            .unwrap();

        assistant.ask("cell", Some("note_b")).await.unwrap();
        assistant.ask("cell", Some("note_a")).await.unwrap();

        let prompts = completion.prompts.lock().unwrap();
        assert!(prompts[0].contains("found no relevant information"));
        assert!(prompts[1].contains("[1] a.txt\ncell notes"));
    }
}
