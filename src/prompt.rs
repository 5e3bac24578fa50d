// src/prompt.rs
use regex::Regex;
use serde_json::{Value, json};
use std::sync::LazyLock;

use crate::models::TestVariant;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").expect("placeholder pattern"));

/// A prompt with `{{key}}` placeholders, filled from a JSON object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Placeholder names in order of first appearance.
    pub fn placeholders(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for caps in PLACEHOLDER.captures_iter(&self.template) {
            let name = caps[1].to_string();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Substitutes placeholders in a single pass. Text coming from a variable
    /// is never scanned again, so a writing sample that happens to contain
    /// `{{...}}` is sent as written. Unknown keys keep their placeholder.
    pub fn render(&self, variables: &Value) -> String {
        PLACEHOLDER
            .replace_all(&self.template, |caps: &regex::Captures<'_>| {
                match variables.get(&caps[1]) {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Null) | None => caps[0].to_string(),
                    Some(other) => other.to_string(),
                }
            })
            .into_owned()
    }
}

const EVALUATION_TEMPLATE: &str = r#"## IELTS Writing Test Information
The IELTS Writing test evaluates the ability to express ideas in written English. The writing sample must address the question "{{writing_question}}" and adhere to the following requirements:

### Test Format
- The IELTS Writing test consists of two tasks:
  - **Task 1**:
    - Academic: Describe visual information, such as graphs, charts, or diagrams.
    - General Training: Write a letter based on a given situation.
  - **Task 2**: Write an essay in response to a question or statement.

### Word Count
- **Task 1**: Minimum 150 words.
- **Task 2**: Minimum 250 words.

### Word Count Impact
Responses below the recommended word count are likely to lack sufficient depth and development of ideas, negatively affecting the **Task Response** score. Deduct from the overall score like this:
- **Task 1**:
  - 100-149 words: Deduct 1 band.
  - Below 100 words: Deduct 2 bands.
- **Task 2**:
  - 200-249 words: Deduct 1 band.
  - 150-199 words: Deduct 2 bands.
  - Below 150 words: Deduct 3 bands.

## Scoring Instructions
Evaluate the writing sample on a scale from 1 to 9 using the following steps:

### 1. Task Type Context
- Determine whether the task is Task 1 or Task 2 from the question, and evaluate accordingly.

### 2. Task Response
- Assess how well the response addresses the question, develops ideas, and supports them with examples or evidence.
- Penalize insufficient word count according to the **Word Count Impact** section.

### 3. Coherence and Cohesion
- Evaluate the logical flow, organization of ideas, and use of cohesive devices.

### 4. Lexical Resource
- Examine the range, accuracy, and appropriateness of vocabulary used.

### 5. Grammatical Range and Accuracy
- Analyze the sentence structures, grammar, and punctuation for range and accuracy.

## Additional Context
- If the writing sample is completely off-topic from the given question, do not assign a score. Omit the "score" key and explain the decision in "reasoning".

# IELTS Writing Evaluation

## Writing Sample
{{writing_sample}}

## Question
{{writing_question}}

## Evaluation Criteria
{{criteria_string}}

## Test Variant
{{test_variant}}

## Word Count
The writing sample contains {{word_count}} words. This count has already been computed; copy it into "word_count" exactly as given and do not recount.

## JSON Response Format
Respond with a single JSON object and nothing else. No preamble, no closing remarks, no markdown:
{
  "score": <Overall band score (1-9)>,
  "reasoning": "<Detailed explanation for the score, referencing specific points from the writing sample and evaluation criteria>",
  "test_variant": "{{test_variant}}",
  "word_count": {{word_count}},
  "misspelled_words": ["<List of misspelled words, if any>"]
}
"#;

const CLASSIFICATION_TEMPLATE: &str = r#"### QUESTION:
{{writing_question}}

### INSTRUCTION:
Based on the question above, determine whether the task is 'Academic' or 'General Training'.
- If the question asks to describe a graph, chart, or diagram, classify it as 'Academic'.
- If the question asks to write a letter or is conversational in tone, classify it as 'General Training'.

### RESPONSE FORMAT:
Return only the label, with no quotes or punctuation: Academic or General Training.
"#;

/// Template of the scoring prompt.
pub fn build_prompt_template() -> PromptTemplate {
    PromptTemplate::new(EVALUATION_TEMPLATE)
}

/// Template of the Academic / General Training classification prompt.
pub fn classification_template() -> PromptTemplate {
    PromptTemplate::new(CLASSIFICATION_TEMPLATE)
}

pub fn classification_variables(writing_question: &str) -> Value {
    json!({ "writing_question": writing_question })
}

/// Values interpolated into the scoring prompt.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationPrompt<'a> {
    pub writing_sample: &'a str,
    pub writing_question: &'a str,
    pub criteria_string: &'a str,
    pub test_variant: TestVariant,
    pub word_count: usize,
}

impl EvaluationPrompt<'_> {
    pub fn variables(&self) -> Value {
        json!({
            "writing_sample": self.writing_sample,
            "writing_question": self.writing_question,
            "criteria_string": self.criteria_string,
            "test_variant": self.test_variant.as_str(),
            "word_count": self.word_count,
        })
    }
}
