use std::collections::HashMap;

use super::*;
use crate::RagError;

fn lookup_from<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
    let map: HashMap<&str, &str> = vars.iter().copied().collect();
    move |key| map.get(key).map(|value| (*value).to_string())
}

#[test]
fn defaults_apply_when_nothing_is_set() {
    let config = Config::from_lookup(lookup_from(&[])).expect("defaults should parse");

    assert_eq!(config.pdf_path, PathBuf::from(DEFAULT_PDF_PATH));
    assert_eq!(config.postgres_url, DEFAULT_POSTGRES_URL);
    assert_eq!(config.provider, Provider::OpenAi);
    assert_eq!(config.openai.embeddings_model, "text-embedding-3-small");
    assert_eq!(config.openai.chat_model, "gpt-4o-mini");
    assert_eq!(config.google.embeddings_model, "models/embedding-001");
    assert_eq!(config.google.chat_model, "gemini-1.5-flash");
    assert_eq!(config.retrieval_k, RETRIEVAL_K);
    assert_eq!(config.openai.api_key, None);
}

#[test]
fn environment_values_override_defaults() {
    let vars = [
        ("PDF_PATH", "reports/annual.pdf"),
        ("POSTGRES_URL", "postgres://user:pw@db:5432/vectors"),
        ("LLM_PROVIDER", "google"),
        ("GOOGLE_API_KEY", "secret"),
        ("EMBEDDINGS_MODEL_GOOGLE", "models/text-embedding-004"),
        ("LLM_MODEL_GOOGLE", "gemini-2.0-flash"),
    ];
    let config = Config::from_lookup(lookup_from(&vars)).expect("overrides should parse");

    assert_eq!(config.pdf_path, PathBuf::from("reports/annual.pdf"));
    assert_eq!(config.postgres_url, "postgres://user:pw@db:5432/vectors");
    assert_eq!(config.provider, Provider::Google);
    assert_eq!(config.google.api_key.as_deref(), Some("secret"));
    assert_eq!(config.google.embeddings_model, "models/text-embedding-004");
    assert_eq!(config.google.chat_model, "gemini-2.0-flash");
}

#[test]
fn provider_parsing_is_case_insensitive() {
    assert_eq!("OpenAI".parse::<Provider>().ok(), Some(Provider::OpenAi));
    assert_eq!("GOOGLE".parse::<Provider>().ok(), Some(Provider::Google));
}

#[test]
fn unsupported_provider_is_a_config_error() {
    let result = Config::from_lookup(lookup_from(&[("LLM_PROVIDER", "anthropic")]));

    match result {
        Err(RagError::Config(message)) => {
            assert!(message.contains("anthropic"));
            assert!(message.contains("openai"));
            assert!(message.contains("google"));
        }
        other => panic!("Expected a configuration error, got {other:?}"),
    }
}

#[test]
fn provider_display_round_trips() {
    for provider in [Provider::OpenAi, Provider::Google] {
        let parsed: Provider = provider
            .to_string()
            .parse()
            .expect("display form should parse");
        assert_eq!(parsed, provider);
    }
}

#[test]
fn splitter_defaults_are_wired_in() {
    let config = Config::from_lookup(lookup_from(&[])).expect("defaults should parse");
    assert_eq!(config.splitter, SplitConfig::default());
}
