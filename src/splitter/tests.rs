use super::*;

fn chars_of(s: &str) -> Vec<char> {
    s.chars().collect()
}

#[test]
fn empty_text_produces_no_chunks() {
    let config = SplitConfig::default();
    assert!(split_text("", &config).is_empty());
}

#[test]
fn short_text_is_a_single_chunk() {
    let config = SplitConfig::default();
    let text = "A short paragraph that fits in one chunk.";

    let chunks = split_text(text, &config);

    assert_eq!(chunks, vec![text.to_string()]);
}

#[test]
fn text_at_exact_limit_is_not_split() {
    let config = SplitConfig::default();
    let text = "x".repeat(config.chunk_size);

    let chunks = split_text(&text, &config);

    assert_eq!(chunks.len(), 1);
}

#[test]
fn chunks_respect_maximum_length() {
    let config = SplitConfig::default();
    let text = "palavra ".repeat(2000);

    let chunks = split_text(&text, &config);

    assert!(chunks.len() > 1);
    for chunk in &chunks {
        assert!(chunk.chars().count() <= config.chunk_size);
    }
}

#[test]
fn consecutive_chunks_share_exact_overlap() {
    let config = SplitConfig::default();
    let text = "Uma frase razoavelmente longa sobre o documento. ".repeat(100);

    let chunks = split_text(&text, &config);

    assert!(chunks.len() > 1);
    for pair in chunks.windows(2) {
        let prev = chars_of(&pair[0]);
        let curr = chars_of(&pair[1]);
        let overlap = &prev[prev.len() - config.chunk_overlap..];
        assert_eq!(overlap, &curr[..config.chunk_overlap]);
    }
}

#[test]
fn chunks_reconstruct_the_original_text() {
    let config = SplitConfig::default();
    let text = "Linha de texto do relatório anual.\n".repeat(120);

    let chunks = split_text(&text, &config);
    assert!(chunks.len() > 1);

    let mut rebuilt: Vec<char> = chars_of(&chunks[0]);
    for chunk in &chunks[1..] {
        rebuilt.extend(&chars_of(chunk)[config.chunk_overlap..]);
    }

    assert_eq!(rebuilt, chars_of(&text));
}

#[test]
fn cut_prefers_paragraph_boundary() {
    let config = SplitConfig {
        chunk_size: 100,
        chunk_overlap: 20,
    };
    let first = "a".repeat(70);
    let second = "b".repeat(120);
    let text = format!("{first}\n\n{second}");

    let chunks = split_text(&text, &config);

    // The first cut lands just after the paragraph break instead of at the
    // hard 100-character limit.
    assert!(chunks[0].ends_with("\n\n"));
    assert_eq!(chunks[0].chars().count(), 72);
}

#[test]
fn cut_falls_back_to_word_boundary() {
    let config = SplitConfig {
        chunk_size: 100,
        chunk_overlap: 20,
    };
    let text = "palavra ".repeat(50);

    let chunks = split_text(&text, &config);

    assert!(chunks.len() > 1);
    assert!(chunks[0].ends_with(' '));
}

#[test]
fn unbroken_text_gets_hard_cuts() {
    let config = SplitConfig {
        chunk_size: 100,
        chunk_overlap: 20,
    };
    let text = "x".repeat(500);

    let chunks = split_text(&text, &config);

    assert!(chunks.len() > 1);
    for chunk in &chunks[..chunks.len() - 1] {
        assert_eq!(chunk.chars().count(), config.chunk_size);
    }
}

#[test]
fn multibyte_text_is_counted_in_characters() {
    let config = SplitConfig {
        chunk_size: 100,
        chunk_overlap: 20,
    };
    let text = "informação ".repeat(60);

    let chunks = split_text(&text, &config);

    for chunk in &chunks {
        assert!(chunk.chars().count() <= config.chunk_size);
    }
    for pair in chunks.windows(2) {
        let prev = chars_of(&pair[0]);
        let curr = chars_of(&pair[1]);
        assert_eq!(
            &prev[prev.len() - config.chunk_overlap..],
            &curr[..config.chunk_overlap]
        );
    }
}

#[test]
fn default_config_matches_ingestion_contract() {
    let config = SplitConfig::default();
    assert_eq!(config.chunk_size, 1000);
    assert_eq!(config.chunk_overlap, 150);
}
