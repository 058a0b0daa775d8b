use annotext_engine::highlight::concat_runs;
use annotext_engine::{AnnotationSet, AnnotationSession, Document, Label, Run, Span, highlight};
use pretty_assertions::assert_eq;

fn span(id: &str, start: i64, end: i64) -> Span {
    Span::new(id, start, end, "Label", "#4ECDC4")
}

/// Non-overlapping spans placed every few chars across a long text
fn striped_spans(text_len: i64, stride: i64, width: i64) -> Vec<Span> {
    (0..)
        .map(|i| i * stride)
        .take_while(|start| start + width <= text_len)
        .map(|start| span(&format!("s{start}"), start, start + width))
        .collect()
}

#[test]
fn worked_example_single_span() {
    let spans = [span("a", 5, 10)];
    let runs = highlight("0123456789ABCDE", &spans).unwrap();

    assert_eq!(
        runs,
        vec![
            Run::plain("01234"),
            Run::annotated("56789", "a", "#4ECDC4"),
            Run::plain("ABCDE"),
        ]
    );
}

#[test]
fn worked_example_two_disjoint_spans() {
    let spans = [span("a", 0, 3), span("b", 5, 8)];
    let runs = highlight("0123456789", &spans).unwrap();

    let shape: Vec<bool> = runs.iter().map(Run::is_annotated).collect();
    assert_eq!(shape, vec![true, false, true, false]);
}

#[test]
fn striped_spans_reconstruct_text() {
    let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. ".repeat(20);
    let len = text.chars().count() as i64;

    for (stride, width) in [(7, 3), (10, 10), (13, 1), (50, 49)] {
        let mut spans = striped_spans(len, stride, width);
        // Input order must not matter.
        spans.reverse();

        let runs = highlight(&text, &spans).unwrap();
        assert_eq!(concat_runs(&runs), text, "stride {stride} width {width}");
        assert_eq!(
            runs.iter().filter(|r| r.is_annotated()).count(),
            spans.len()
        );
    }
}

#[test]
fn invalid_span_yields_no_runs() {
    let spans = [span("good", 0, 4), span("bad", 4, 4)];
    let result = highlight("0123456789", &spans);

    let err = result.unwrap_err();
    assert_eq!(err.span_id, "bad");
}

#[test]
fn session_highlights_loaded_annotations() {
    let document = Document::new("memo.txt", "memo", "Meet Ada at the lab.");
    let mut session = AnnotationSession::new(
        document,
        AnnotationSet {
            labels: vec![Label::new("person", "Person", "#FF6B6B")],
            ..Default::default()
        },
    );
    let request = annotext_engine::CreateAnnotationRequest {
        document_id: "memo.txt".into(),
        label_id: "person".into(),
        start_position: 5,
        end_position: 8,
        comment: None,
    };
    session.apply_annotation("a1", request).unwrap();

    let runs = session.runs().unwrap();
    assert_eq!(
        runs,
        vec![
            Run::plain("Meet "),
            Run::annotated("Ada", "a1", "#FF6B6B"),
            Run::plain(" at the lab."),
        ]
    );
}
