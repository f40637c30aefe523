use edgelist_core::{Edge, EdgeListParser, ParserConfig};
use proptest::prelude::*;
use rstest::rstest;

#[rstest]
#[case('#', "1 2")]
#[case('%', "this is not an edge at all")]
#[case(';', " a b")]
#[case('/', "/")]
fn test_comment_lines_are_suppressed(#[case] marker: char, #[case] rest: &str) {
    let config = ParserConfig::new().with_comment_markers(['#', '%', ';', '/']);
    let parser = EdgeListParser::new(config);
    parser.resolve("seen").unwrap();

    let line = format!("{marker}{rest}");
    let edges: Vec<_> = parser.parse_str(&line).collect();

    assert!(edges.is_empty(), "comment {:?} produced {:?}", line, edges);
    assert_eq!(parser.mappings().len(), 1);
}

#[rstest]
#[case("solo", 1)]
#[case("a b c", 3)]
#[case("1\t2\t3\t4", 4)]
fn test_wrong_token_counts_fail(#[case] line: &str, #[case] expected: usize) {
    let parser = EdgeListParser::default();
    let err = parser
        .parse_str(line)
        .next()
        .expect("a malformed line still yields an item")
        .unwrap_err();

    assert!(err.is_malformed());
    assert!(
        err.to_string().contains(&format!("found {expected}")),
        "unexpected message: {err}"
    );
}

fn separator() -> impl Strategy<Value = String> {
    proptest::collection::vec(prop_oneof![Just(' '), Just('\t'), Just('\u{a0}')], 1..8)
        .prop_map(|chars| chars.into_iter().collect())
}

fn label() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_.:-]{1,12}"
}

proptest! {
    #[test]
    fn test_whitespace_runs_match_single_space(
        source in label(),
        target in label(),
        lead in separator(),
        sep in separator(),
        trail in separator(),
    ) {
        let plain = EdgeListParser::default();
        let expected: Vec<Edge> = plain
            .parse_str(&format!("{source} {target}"))
            .collect::<Result<_, _>>()
            .unwrap();

        let padded = EdgeListParser::default();
        let actual: Vec<Edge> = padded
            .parse_str(&format!("{lead}{source}{sep}{target}{trail}"))
            .collect::<Result<_, _>>()
            .unwrap();

        prop_assert_eq!(actual, expected);
        prop_assert_eq!(padded.snapshot_mappings(), plain.snapshot_mappings());
    }

    #[test]
    fn test_resolution_is_idempotent(
        labels in proptest::collection::vec(label(), 1..64),
        pick in 0usize..64,
    ) {
        let parser = EdgeListParser::default();
        let target_label = &labels[pick % labels.len()];
        let first = parser.resolve(target_label).unwrap();

        for label in &labels {
            parser.resolve(label).unwrap();
            prop_assert_eq!(parser.resolve(target_label).unwrap(), first);
        }

        let ids: Vec<_> = parser.snapshot_mappings().into_iter().map(|m| m.id).collect();
        prop_assert_eq!(ids, (0..parser.mappings().len() as u64).collect::<Vec<_>>());
    }
}
