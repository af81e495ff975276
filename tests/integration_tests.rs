use excuse_gen::{
    parse_corpus, parse_expression, Catalog, CorpusConfig, Generator, GrammarError, Node,
};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::io::Write;
use std::sync::Arc;
use std::thread;

#[test]
fn test_encoding_scenarios() {
    let cases = [
        ("plop mmlm mxls", "plop mmlm mxls"),
        ("<plop|mmlm|mxls>", "<plop|mmlm|mxls>"),
        ("<>", ""),
        ("< >", " "),
        ("<plop|>", "plop"),
        ("plop <mmlm|mxls>", "plop <mmlm|mxls>"),
        ("<plop| >", "<plop| >"),
    ];

    for (source, encoded) in cases {
        let generator = Generator::from_expression(source).unwrap();
        assert_eq!(generator.encode(), encoded, "source: {:?}", source);
    }
}

#[test]
fn test_concat_structure() {
    let node = parse_expression("plop <mmlm|mxls>").unwrap();
    let Node::Sequence(seq) = &node else {
        panic!("Expected Sequence, got {:?}", node);
    };
    assert_eq!(seq.items()[0], Node::term("plop "));
    let Node::Alternation(alt) = &seq.items()[1] else {
        panic!("Expected Alternation");
    };
    assert_eq!(alt.items(), &[Node::term("mmlm"), Node::term("mxls")]);
}

#[test]
fn test_canonical_form_is_stable() {
    let corpus = "\
<I'm|I am> <late|stuck> <|on the <bridge|highway>>
<<a|b>|<c|<d|e>>>
<|>x<y|>
";
    let first = parse_corpus(corpus).unwrap().to_string();
    let second = parse_expression(&first).unwrap().to_string();
    let third = parse_expression(&second).unwrap().to_string();
    assert_eq!(second, third);
}

#[test]
fn test_every_line_reachable() {
    let corpus = "\
# weights: 1, 2, 6
alpha
<beta|gamma>
<delta|epsilon><one|two|three>
";
    let generator = Generator::build(corpus).unwrap();
    assert_eq!(generator.count(), 9);

    let outputs: HashSet<String> = (0..1000).map(|seed| generator.expand(seed)).collect();
    assert_eq!(outputs.len(), 9);
    assert!(outputs.contains("alpha"));
    assert!(outputs.contains("gamma"));
    assert!(outputs.contains("epsilonthree"));
}

#[test]
fn test_corpus_error_reports_line() {
    let corpus = "ok\n# comment\nstill <ok|fine>\noops >\n";
    let err = Generator::build(corpus).unwrap_err();

    assert_eq!(err.line(), Some(4));
    assert_eq!(
        err.to_string(),
        "Error at line 4: Trailing input at offset 5: unexpected '>'"
    );
}

#[test]
fn test_load_from_file_with_config() {
    let mut corpus = tempfile::NamedTempFile::new().unwrap();
    write!(corpus, "first\n\nsecond\n").unwrap();

    let mut config_file = tempfile::NamedTempFile::new().unwrap();
    write!(config_file, r#"{{"skip_blank_lines": true}}"#).unwrap();
    let config = CorpusConfig::from_json_file(config_file.path()).unwrap();

    let generator = Generator::from_file(corpus.path(), &config).unwrap();
    assert_eq!(generator.encode(), "<first|second>");

    let generator = Generator::from_file(corpus.path(), &CorpusConfig::default()).unwrap();
    assert_eq!(generator.encode(), "<first||second>");
    assert_eq!(generator.count(), 3);
}

#[test]
fn test_shared_across_threads() {
    let generator = Arc::new(Catalog::Any.build().unwrap());

    let handles: Vec<_> = (0..4)
        .map(|seed| {
            let generator = Arc::clone(&generator);
            thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(seed);
                (0..50)
                    .map(|_| generator.expand_with(&mut rng))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for (seed, handle) in handles.into_iter().enumerate() {
        let outputs = handle.join().unwrap();
        let mut rng = StdRng::seed_from_u64(seed as u64);
        let expected: Vec<String> = (0..50).map(|_| generator.expand_with(&mut rng)).collect();
        assert_eq!(outputs, expected);
        assert!(outputs.iter().all(|s| s.len() <= generator.max_length()));
    }
}

#[test]
fn test_catalog_debug_view() {
    let generator = Catalog::Meeting.build().unwrap();
    let json: serde_json::Value = serde_json::from_str(&generator.debug_json()).unwrap();
    assert_eq!(json["type"], "sequence");
    assert_eq!(json["items"][0]["type"], "sequence");
    assert_eq!(json["items"][1]["type"], "choice");
}

#[test]
fn test_unterminated_alternation() {
    let err = Generator::from_expression("never <closed|ever").unwrap_err();
    assert!(matches!(
        err,
        GrammarError::UnterminatedAlternation { position: 6 }
    ));
}

#[test]
fn test_deep_nesting_rejected() {
    let deep = format!("{}x{}", "<".repeat(100_000), ">".repeat(100_000));
    let err = Generator::from_expression(&deep).unwrap_err();
    assert!(matches!(err, GrammarError::TooDeep { position: 256, .. }));

    let config = CorpusConfig::from_json_str(r#"{"max_depth": 2}"#).unwrap();
    let generator = Generator::build_with("<a|<b|c>>", &config).unwrap();
    assert_eq!(generator.count(), 3);
    assert!(Generator::build_with("<<<a>>>", &config).is_err());
}
