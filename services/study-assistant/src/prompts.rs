//! Prompt templates
//!
//! Handlebars templates for every model call. HTML escaping is disabled since
//! the output is plain prompt text.

use anyhow::{Context, Result};
use handlebars::Handlebars;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    Answer,
    NotInNotes,
    Summary,
    Flashcards,
    Quiz,
    MindMap,
}

impl PromptKind {
    pub const ALL: [PromptKind; 6] = [
        PromptKind::Answer,
        PromptKind::NotInNotes,
        PromptKind::Summary,
        PromptKind::Flashcards,
        PromptKind::Quiz,
        PromptKind::MindMap,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Answer => "answer",
            Self::NotInNotes => "not_in_notes",
            Self::Summary => "summary",
            Self::Flashcards => "flashcards",
            Self::Quiz => "quiz",
            Self::MindMap => "mindmap",
        }
    }

    fn template(self) -> &'static str {
        match self {
            Self::Answer => ANSWER_TEMPLATE,
            Self::NotInNotes => NOT_IN_NOTES_TEMPLATE,
            Self::Summary => SUMMARY_TEMPLATE,
            Self::Flashcards => FLASHCARDS_TEMPLATE,
            Self::Quiz => QUIZ_TEMPLATE,
            Self::MindMap => MINDMAP_TEMPLATE,
        }
    }
}

/// Values a template may reference.
#[derive(Debug, Default, Serialize)]
pub struct PromptVars<'a> {
    pub context: &'a str,
    pub question: &'a str,
    pub topic: Option<&'a str>,
    pub count: u32,
}

pub struct PromptTemplates {
    handlebars: Handlebars<'static>,
}

impl PromptTemplates {
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);

        for kind in PromptKind::ALL {
            handlebars
                .register_template_string(kind.name(), kind.template())
                .with_context(|| format!("Invalid {} prompt template", kind.name()))?;
        }
        Ok(Self { handlebars })
    }

    pub fn render(&self, kind: PromptKind, vars: &PromptVars<'_>) -> Result<String> {
        self.handlebars
            .render(kind.name(), vars)
            .with_context(|| format!("Failed to render {} prompt", kind.name()))
    }
}

const ANSWER_TEMPLATE: &str = r#"You are "My Learning Buddy", a friendly study helper.

Answer the user's question using ONLY the context below.

RULES:
1. If the answer is in the context, answer clearly and cite sources like [1], [2].
2. If it is not, say "I couldn't find information about that in your notes."
3. Never add information from outside the context and never guess.

CONTEXT FROM USER'S NOTES:
{{context}}

QUESTION: {{question}}

Answer based ONLY on the context above:"#;

const NOT_IN_NOTES_TEMPLATE: &str = r#"You are "My Learning Buddy", a friendly study helper.

The user asked: "{{question}}"

You searched their notes but found no relevant information about this topic.

Reply in 2-3 short, friendly sentences: say it is not in their notes and suggest uploading material about it. Do not explain or define the term."#;

const SUMMARY_TEMPLATE: &str = r#"You are "My Learning Buddy", a friendly study helper creating summaries from the user's own notes.

Use ONLY information from the CONTEXT below and keep it student-friendly.

Create a study summary {{#if topic}}about "{{topic}}"{{else}}from the materials{{/if}} with:
- Key Points (bullet points of the main ideas)
- Important Definitions (key terms explained simply)
- Review Questions (5 questions to test understanding)

CONTEXT FROM USER'S NOTES:
{{context}}"#;

const FLASHCARDS_TEMPLATE: &str = r#"Read this text and create {{count}} flashcards.

TEXT:
{{context}}

Create flashcards as JSON. Example:
{"flashcards": [{"front": "What is DNA?", "back": "DNA is the molecule that carries genetic information."}]}

Your {{count}} flashcards as JSON:"#;

const QUIZ_TEMPLATE: &str = r#"Read the text and create {{count}} multiple choice questions{{#if topic}} about "{{topic}}"{{/if}}.

TEXT:
{{context}}

IMPORTANT: Each choice must be a real answer, NOT just a letter!

Return JSON like this example:
{"quiz": [
  {"question": "What is the main function of the heart?", "choices": ["To pump blood throughout the body", "To digest food", "To filter air", "To produce hormones"], "answer_index": 0, "explanation": "The heart pumps blood to all parts of the body."}
]}

Create {{count}} questions with 4 real answer choices each. JSON:"#;

const MINDMAP_TEMPLATE: &str = r#"Create ONE mindmap{{#if topic}} about "{{topic}}"{{/if}} from the context below.

RULES:
1. Use ONLY facts from the CONTEXT and never make up content.
2. Return exactly ONE JSON object.
3. Match the actual subject of the context.

Format (return ONLY this, no extra text):
{"title": "Topic from context", "branches": [{"name": "Theme 1", "items": ["fact 1", "fact 2"]}, {"name": "Theme 2", "items": ["fact 1", "fact 2"]}]}

CONTEXT:
{{context}}

Return ONE JSON object only:"#;
