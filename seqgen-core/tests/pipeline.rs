use pretty_assertions::assert_eq;
use seqgen_core::scene::{MessageKind, Node};
use seqgen_core::{generate, layout, parse, render, render_with_config, RenderConfig};

const CHECKOUT: &str = r#"
# Checkout flow
title Checkout
participant Browser
participant "Web Shop" as Shop
participant width 120
participant Payment
participant Warehouse as WH

found left ->+ Browser: click buy
Browser ->+ Shop: POST /order

alt card accepted
    Shop ->+ Payment: charge
    Payment -> self: fraud check
    Payment -->>- Shop: ok
    Shop ->>| WH: reserve items
else card declined
    Shop ->+ Payment: charge
    Payment -->- Shop: declined
    extend 20
end

note Shop dx=20 width=140
Order is persisted
before responding
end note

loop until shipped
    Shop -> Shop: poll
end

space 20
Shop -->>- Browser: 201 Created
Browser ->- lost right: redirect
"#;

#[test]
fn test_checkout_scene() {
    let statements = parse(CHECKOUT).unwrap();
    let scene = layout(&statements).unwrap();

    let lanes: Vec<(&str, &str)> = scene
        .lanes()
        .map(|lane| (lane.id.as_str(), lane.label.as_str()))
        .collect();
    assert_eq!(
        lanes,
        vec![
            ("Browser", "Browser"),
            ("Shop", "Web Shop"),
            ("Payment", "Payment"),
            ("WH", "Warehouse"),
        ]
    );
    let widths: Vec<f64> = scene.lanes().map(|lane| lane.rect.width).collect();
    assert_eq!(widths, vec![160.0, 160.0, 120.0, 120.0]);

    let kinds: Vec<MessageKind> = scene.messages().map(|message| message.kind).collect();
    assert_eq!(
        kinds,
        vec![
            MessageKind::Found,
            MessageKind::Regular,
            MessageKind::Regular,
            MessageKind::SelfCall,
            MessageKind::Regular,
            MessageKind::Regular,
            MessageKind::Regular,
            MessageKind::Regular,
            MessageKind::SelfCall,
            MessageKind::Regular,
            MessageKind::Lost,
        ]
    );

    let frames: Vec<&str> = scene.frames().map(|frame| frame.kind.as_str()).collect();
    assert_eq!(frames, vec!["alt", "loop"]);
    assert_eq!(scene.dividers().count(), 1);

    let note = scene.notes().next().unwrap();
    assert_eq!(note.text, vec!["Order is persisted", "before responding"]);
    assert_eq!(note.rect.width, 140.0);

    assert!(matches!(scene.nodes[0], Node::TitleBox(_)));
    let title = scene.title().unwrap();
    for frame in scene.frames() {
        assert!(title.rect.span().contains(frame.rect.span()));
    }
}

#[test]
fn test_alt_frame_covers_all_branches() {
    let scene = layout(&parse(CHECKOUT).unwrap()).unwrap();
    let alt = scene.frames().next().unwrap();
    let lanes: Vec<_> = scene.lanes().collect();
    for lane in &lanes[1..] {
        assert!(alt.rect.span().contains(lane.rect.span()), "{}", lane.id);
    }
    // standing extension on the right edge
    assert_eq!(alt.rect.right(), lanes[3].rect.right() + 10.0 + 20.0);
}

#[test]
fn test_generate_is_idempotent() {
    let first = generate(CHECKOUT).unwrap();
    let second = generate(CHECKOUT).unwrap();
    assert_eq!(first, second);

    let statements = parse(CHECKOUT).unwrap();
    assert_eq!(layout(&statements).unwrap(), layout(&statements).unwrap());
}

#[test]
fn test_document_has_one_cell_per_drawable() {
    let scene = layout(&parse(CHECKOUT).unwrap()).unwrap();
    let xml = render(&scene);

    // frame and divider labels add a text cell each
    let labels = scene.frames().filter(|frame| !frame.label.is_empty()).count()
        + scene.dividers().filter(|divider| !divider.label.is_empty()).count();
    let cells = xml.matches("<mxCell").count();
    assert_eq!(cells, 2 + scene.nodes.len() + labels);
}

#[test]
fn test_custom_prefix_applies_to_all_ids() {
    let scene = layout(&parse(CHECKOUT).unwrap()).unwrap();
    let xml = render_with_config(&scene, &RenderConfig::default().with_id_prefix("x-"));
    let ids: Vec<&str> = xml
        .match_indices(r#" id=""#)
        .map(|(i, _)| {
            let rest = &xml[i + 5..];
            &rest[..rest.find('"').unwrap()]
        })
        .filter(|id| *id != "0" && *id != "1")
        .collect();
    assert!(!ids.is_empty());
    assert!(ids.iter().all(|id| id.starts_with("x-")));
    assert_eq!(ids[0], "x-1");
}

#[test]
fn test_errors_carry_kind_and_line() {
    let cases = [
        ("participant A\nparticipant A", "DuplicateParticipant", 2),
        ("participant A\nactivate B", "UnknownParticipant", 2),
        ("participant A\nparticipant B\nA ->+ B\nA -> B", "SenderNotActive", 4),
        ("participant A\ndeactivate A", "OverDeactivation", 2),
        ("participant A\nactivate A", "UnbalancedActivation", 2),
        ("participant A\nend", "NoOpenFrame", 2),
        ("participant A\nactivate A\nloop\nA -> A\nelse\nend", "InvalidBranch", 5),
        ("participant A\nopt\nend", "EmptyFrame", 3),
        ("participant A\nactivate A\nopt\nA -> A\ndeactivate A", "UnclosedFrame", 3),
        ("participant A\nnote A\ntext", "UnterminatedNote", 2),
        ("participant A\nfound left ->- A", "InvalidActivationForFoundLost", 2),
        ("participant A\nactivate A\nA ->+ self", "InvalidActivationForSelfCall", 3),
        ("participant A\nwhat is this", "SyntaxError", 2),
    ];
    for (input, kind, line) in cases {
        let err = generate(input).unwrap_err();
        assert_eq!((err.kind_name(), err.line()), (kind, line), "{input}");
    }
}
