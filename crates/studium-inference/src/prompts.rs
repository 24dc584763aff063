//! Prompt construction for every generation task.
//!
//! Pure string building: templates per task, with caller preferences
//! (count, difficulty, focus topic) interpolated over defaults. Every
//! structured-generation template pins down the three things the
//! extraction pipeline depends on: a raw JSON array with no surrounding
//! prose or fences, the exact snake_case field contract, and LaTeX/`\ce{}`
//! notation inside string values.

use studium_core::defaults;
use studium_core::{Difficulty, GenerationPreferences, ResponseStyle};

/// Shared instruction forcing raw-JSON output.
const RAW_JSON_INSTRUCTION: &str = "IMPORTANT: Return ONLY the valid JSON array as plain text without any markdown \
formatting, code blocks, or annotations. Do not use markdown syntax like ```json or ```. \
The response must be directly parseable as JSON.";

/// Shared instruction for math/chemistry notation inside string values.
const NOTATION_INSTRUCTION: &str = "Special formatting guidelines:\n\
1. Mathematical expressions: use LaTeX notation\n\
   - Inline math: $E = mc^2$\n\
   - Display math: $$K_a = \\\\frac{[H^+][A^-]}{[HA]}$$\n\
2. Chemical equations and formulas: use \\\\ce{} notation (rendered with mhchem)\n\
   - Example: \\\\ce{2H2 + O2 -> 2H2O}\n\
   - Example: \\\\ce{H2SO4}\n\
Escape every LaTeX backslash as a double backslash so the JSON stays valid.";

fn focus_sentence(preferences: &GenerationPreferences) -> String {
    match preferences.focus_topic.as_deref().map(str::trim) {
        Some(topic) if !topic.is_empty() => {
            format!("Focus on the topic of \"{}\" if present in the content.\n\n", topic)
        }
        _ => String::new(),
    }
}

fn difficulty(preferences: &GenerationPreferences) -> Difficulty {
    preferences.difficulty.unwrap_or_default()
}

/// Build the flashcard-generation prompt for a note's content.
pub fn flashcard_prompt(content: &str, preferences: &GenerationPreferences) -> String {
    let count = preferences.count.unwrap_or(defaults::FLASHCARD_COUNT);
    let difficulty = difficulty(preferences);

    format!(
        "Based on the following text, generate a list of {count} flashcards at {difficulty} \
difficulty level. Each flashcard must be a JSON object with a \"front\" (question, term, or \
concept) and a \"back\" (answer or definition).\n\n\
{raw_json}\n\n\
{focus}\
Difficulty guidelines:\n\
- Easy: simple definitions, basic concepts, and straightforward questions\n\
- Medium: more detailed explanations, intermediate concepts, and application-level questions\n\
- Hard: complex details, advanced concepts, and questions requiring synthesis of multiple ideas\n\n\
{notation}\n\n\
Text:\n---\n{content}\n---\n\n\
Output format example:\n\
[{{\"front\": \"Question 1\", \"back\": \"Answer 1\"}}, {{\"front\": \"Question 2\", \"back\": \"Answer 2\"}}]",
        count = count,
        difficulty = difficulty.as_str(),
        raw_json = RAW_JSON_INSTRUCTION,
        focus = focus_sentence(preferences),
        notation = NOTATION_INSTRUCTION,
        content = content,
    )
}

/// Build the multiple-choice quiz prompt for a note's content.
pub fn quiz_prompt(content: &str, preferences: &GenerationPreferences) -> String {
    let count = preferences.count.unwrap_or(defaults::QUIZ_QUESTION_COUNT);
    let difficulty = difficulty(preferences);

    format!(
        "Based on the following text, generate a multiple-choice quiz with {count} questions at \
{difficulty} difficulty level. Each question must be a JSON object with the following properties:\n\
- question_text: the question itself\n\
- option_a: first option\n\
- option_b: second option\n\
- option_c: third option\n\
- option_d: fourth option\n\
- correct_option: one of 'A', 'B', 'C', or 'D' indicating which option is correct\n\
- explanation: brief explanation of why the answer is correct\n\n\
{raw_json}\n\n\
{focus}\
Difficulty guidelines:\n\
- Easy: simple recall questions with straightforward options\n\
- Medium: application and comprehension questions with more nuanced options\n\
- Hard: analysis and synthesis questions with challenging distractors\n\n\
{notation}\n\n\
Text:\n---\n{content}\n---\n\n\
Output format example:\n\
[{{\"question_text\": \"Question 1\", \"option_a\": \"Option A\", \"option_b\": \"Option B\", \
\"option_c\": \"Option C\", \"option_d\": \"Option D\", \"correct_option\": \"A\", \
\"explanation\": \"Explanation 1\"}}]",
        count = count,
        difficulty = difficulty.as_str(),
        raw_json = RAW_JSON_INSTRUCTION,
        focus = focus_sentence(preferences),
        notation = NOTATION_INSTRUCTION,
        content = content,
    )
}

/// Prompt for converting an uploaded document (PDF and similar) into one
/// structured Markdown study note.
pub const DOCUMENT_NOTE_PROMPT: &str = r"You are a Markdown-first note enhancer.
Take the content of this document and output one clear, structured Markdown document that a
student can study from. Follow these exact rules:

### 1. General Formatting
- Organize with `#`, `##`, `###` headings, bullet/numbered lists, and bold/*italic* for emphasis.
- Preserve the original order of topics, but feel free to split dense paragraphs into lists.
- Preserve tables as Markdown tables.
- Add brief transitions or one-sentence summaries where it improves flow.

### 2. Mathematics
- Inline math: `$E = mc^2$`
- Display math: `$$K_a = \frac{[H^+][A^-]}{[HA]}$$`

### 3. Chemistry
- Formulae and reactions: use `\ce{}` (mhchem). Example: `\ce{2H2 + O2 -> 2H2O}`

### 4. Circuit Diagrams
- If any appear, describe them in a fenced `circuit` block instead of reproducing the drawing.

### 5. Enrichment
- Define key terms on first use.
- Add clarifying sentences where derivations are implicit.
- Insert **Practice Question** call-outs for major concepts.

### 6. Do NOT
- Invent unrelated material.
- Omit substantive information.
- Reproduce diagrams or images.
- Output anything except the final enriched Markdown.";

/// Prompt for converting an uploaded image into a Markdown explanation.
pub const IMAGE_NOTE_PROMPT: &str = r"You are an expert tutor.
Analyze this image and produce a detailed Markdown explanation.

- If text is present, extract it verbatim.
- Render math in LaTeX (`$...$` for inline, `$$...$$` for display).
- Render chemical formulas with `\ce{}`.
- For structural formulas, combine `\ce{}` blocks and LaTeX.
- For circuit diagrams, describe them in a fenced `circuit` block.
- Explain the principles depicted and, where relevant, guide the student toward a solution
  as a tutor would.
- Do not include diagrams in the output.";

/// Prompt appended when several files are combined into one note.
pub const GROUP_NOTE_PROMPT: &str = "Combine all the supplied files into one cohesive study note in Markdown.\n\
Follow the same rules for headings, math ($...$ / $$...$$), \\ce{} chemistry, and circuit \
blocks as described above.";

/// Build the title-generation prompt for freshly generated note content.
///
/// The model is asked for a short title; the orchestrator falls back to a
/// literal title if this call fails, so the prompt stays minimal.
pub fn title_prompt(content: &str, context_hint: Option<&str>) -> String {
    let mut prompt =
        String::from("Generate a concise, relevant title (5-10 words, max 15) for the text below. \
Return only the title, with no quotes and no extra commentary.");
    if let Some(hint) = context_hint {
        prompt.push_str(&format!("\nContext: {}.", hint));
    }
    prompt.push_str(&format!("\n\nText:\n{}", content));
    prompt
}

/// System prompt for the chat assistant, per requested answer style.
pub fn chat_system_prompt(style: ResponseStyle) -> &'static str {
    match style {
        ResponseStyle::Detailed => {
            "You are an expert tutor. Provide detailed, in-depth answers with examples and \
thorough explanations. Use LaTeX for math and \\ce{} for chemistry notation."
        }
        ResponseStyle::Concise => {
            "You are a helpful study assistant. Provide concise, to-the-point answers."
        }
    }
}

/// Wrap an assembled document context and a user question into one message.
///
/// The instruction pins the model to the supplied document so answers stay
/// grounded in the user's own material.
pub fn chat_context_prompt(context: &str, question: &str) -> String {
    format!(
        "I want you to answer questions about the following document. First I provide the \
document content, then the question.\n\n\
Document content:\n{context}\n\n\
Answer the following question strictly with respect to the document above. If the document \
does not contain the answer, say so.\n\n\
Question: {question}"
    )
}
