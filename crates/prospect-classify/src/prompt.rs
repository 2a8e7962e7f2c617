use prospect_core::types::{Intent, ParamDefault};
use std::fmt::Write;

fn example_queries(intent: Intent) -> &'static [&'static str] {
    match intent {
        Intent::Company => &[
            "Find tech companies in San Francisco",
            "Show me startups in Berlin, Germany",
            "List software companies in London",
            "Search for manufacturing companies in Tokyo",
        ],
        Intent::Person => &[
            "Find Python developers in India",
            "Search for software engineers at Google",
            "Look for data scientists with SQL skills in Canada",
            "Find marketing managers named John in New York",
        ],
        Intent::Job => &[
            "Find remote software engineering jobs",
            "Search for full-time data analyst positions",
            "Look for entry-level marketing jobs in London",
            "Find remote AI engineer positions for senior level",
        ],
    }
}

/// Instruction prompt asking the model for `{"search_type", "parameters"}`.
pub fn build_prompt(query: &str) -> String {
    let mut prompt = String::from(
        "Analyze the following search query and determine if it's looking for companies, \
         people, or jobs.\nExtract only the relevant parameters based on the search type.\n",
    );

    for intent in Intent::ALL {
        let _ = writeln!(prompt, "\nExample queries for {} search:", intent);
        for example in example_queries(intent) {
            let _ = writeln!(prompt, "- \"{}\"", example);
        }
        let _ = writeln!(prompt, "Valid {} parameters are:", intent);
        for param in intent.params() {
            let _ = write!(prompt, "- {} ({})", param.name, param.description);
            match param.default {
                Some(ParamDefault::Text(v)) => {
                    let _ = write!(prompt, " [default \"{}\"]", v);
                }
                Some(ParamDefault::Integer(v)) => {
                    let _ = write!(prompt, " [default {}]", v);
                }
                None => {}
            }
            prompt.push('\n');
        }
    }

    let _ = write!(
        prompt,
        "\nCurrent Query: {}\n\n\
         Respond in the following JSON format only, using only the valid parameters listed above:\n\
         {{\n    \"search_type\": \"company|person|job\",\n    \"parameters\": {{\n        \
         // include only valid parameters for the chosen search type\n    }}\n}}\n",
        query.trim()
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_contains_query_and_every_parameter() {
        let prompt = build_prompt("  Find Rust developers in Norway ");
        assert!(prompt.contains("Current Query: Find Rust developers in Norway\n"));
        for intent in Intent::ALL {
            assert!(prompt.contains(&format!("Valid {} parameters are:", intent)));
            for param in intent.params() {
                assert!(
                    prompt.contains(&format!("- {} (", param.name)),
                    "missing {}",
                    param.name
                );
            }
        }
    }

    #[test]
    fn prompt_mentions_defaults_and_response_shape() {
        let prompt = build_prompt("x");
        assert!(prompt.contains("page_size (Max results per API call) [default 10]"));
        assert!(prompt.contains("[default \"skip\"]"));
        assert!(prompt.contains("\"search_type\": \"company|person|job\""));
    }
}
