//! Prompt presets for the JSON operations.
//!
//! Every template declares its input variables up front so mismatches fail
//! in-process instead of producing a half-rendered prompt.

use structify_prompt::PromptTemplate;

const ZERO_SHOT_SCHEMA_EXTRACTION: &str = "\
You are a highly efficient text processing application.
Your main objective is to accurately parse the user's input text and transform it into a JSON object that complies with the schema provided below.
-------------------
JSON schema:
{{json_schema}}
-------------------
Please generate the output JSON object containing the necessary information and ensure it follows the given schema.
If the input text contains any attributes not mentioned in the schema, please disregard them.
-------------------
Input:
{{context}}
-------------------
Output:
";

const ZERO_SHOT_SCHEMA_EXTRACTION_REFINE: &str = "\
You are a highly efficient text processing application.
Your main objective is to accurately parse the user's input text and transform it into a JSON object that complies with the schema provided below.
-------------------
JSON schema:
{{json_schema}}
-------------------
You have already produced the following JSON output from earlier parts of the document:
{{existing_answer}}
-------------------
We have the opportunity to refine the existing output (only if needed) with some more context below.
-------------------
Context:
{{context}}
-------------------
Given the new context, refine the original JSON output so it captures the necessary information and still follows the given schema.
If the context isn't useful, return the existing output unchanged.
-------------------
Output:
";

const ONE_SHOT_EXTRACTION: &str = "\
You are a highly efficient text processing application.
Your main objective is to accurately parse the user's input text and transform it into a JSON object that matches the structure of the example below.
-------------------
Example input:
{{example_input}}
-------------------
Example output:
{{example_output}}
-------------------
Please generate the output JSON object containing the necessary information, following the structure of the example output.
If the input text contains any attributes not present in the example output, please disregard them.
-------------------
Input:
{{context}}
-------------------
Output:
";

const ANALYSIS: &str = "\
You are a meticulous reviewer of structured data extraction.
A JSON output was generated from the original text below, using the JSON schema as the extraction model.
Your main objective is to analyze the generated output against the original text and the schema, and to point out every issue you find.
-------------------
JSON schema:
{{json_schema}}
-------------------
Original text:
{{original_text}}
-------------------
Generated JSON output:
{{json_output}}
-------------------
Respond with a JSON object following this format:
{{output_format}}
-------------------
Output:
";

const CLASSIFICATION: &str = "\
You are a highly efficient text classification application.
Your main objective is to classify the user's input text into exactly one of the categories provided below.
-------------------
Categories:
{{categories}}
-------------------
Text:
{{text}}
-------------------
Respond with a JSON object following this format:
{{output_format}}
-------------------
Output:
";

const GENERIC_PROMPT: &str = "{{prompt}}";

pub fn json_zero_shot_schema_extraction() -> PromptTemplate {
    PromptTemplate::new(ZERO_SHOT_SCHEMA_EXTRACTION, &["context", "json_schema"])
}

pub fn json_zero_shot_schema_extraction_refine() -> PromptTemplate {
    PromptTemplate::new(
        ZERO_SHOT_SCHEMA_EXTRACTION_REFINE,
        &["context", "existing_answer", "json_schema"],
    )
}

pub fn json_one_shot_extraction() -> PromptTemplate {
    PromptTemplate::new(
        ONE_SHOT_EXTRACTION,
        &["context", "example_input", "example_output"],
    )
}

pub fn json_analysis() -> PromptTemplate {
    PromptTemplate::new(
        ANALYSIS,
        &["json_schema", "original_text", "json_output", "output_format"],
    )
}

pub fn json_classification() -> PromptTemplate {
    PromptTemplate::new(CLASSIFICATION, &["categories", "text", "output_format"])
}

pub fn json_generic_prompt() -> PromptTemplate {
    PromptTemplate::new(GENERIC_PROMPT, &["prompt"])
}
