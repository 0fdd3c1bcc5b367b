use html2dream::{
    ClassificationTables, Element, MarkupNode, PrecheckError, TranspileOptions, Transpiler,
    UnrecognizedNode, encode_string, encode_variant, parse_document, parse_fragment, transpile,
};

fn transpile_with(tables: &ClassificationTables, node: impl Into<MarkupNode>) -> String {
    Transpiler::new(tables)
        .transpile(&node.into())
        .expect("transpile should succeed")
        .source
}

#[test]
fn test_checkbox_input() {
    let mut input = Element::new("input").with_attr("type", "checkbox");
    input.attrs.push(html2dream::Attribute::flag("checked"));

    let out = transpile(&input.into()).unwrap();
    assert_eq!(out.source, "input [type_ \"checkbox\"; checked ; ] ");
    assert!(out.warnings.is_empty());
}

#[test]
fn test_option_collapses_to_text() {
    let option = Element::new("option").with_text("Red");
    assert_eq!(transpile(&option.into()).unwrap().source, "option [] \"Red\"");
}

#[test]
fn test_comment_with_quotes() {
    let comment = MarkupNode::Comment("He said \"hi\"".to_string());
    assert_eq!(
        transpile(&comment).unwrap().source,
        "comment {|He said \"hi\"|}"
    );
}

#[test]
fn test_void_tags_never_get_child_list() {
    let tables = ClassificationTables::extended();
    for tag in &tables.void_tags {
        let elem = Element::new(tag.as_str())
            .with_text("ignored")
            .with_child(Element::new("span"));
        let out = transpile_with(&tables, elem);
        assert_eq!(out, format!("{tag} [] "), "void tag {tag}");
    }
}

#[test]
fn test_raw_text_tags_get_one_string() {
    let tables = ClassificationTables::extended();
    for tag in &tables.raw_text_tags {
        let elem = Element::new(tag.as_str())
            .with_text("a ")
            .with_child(Element::new("b").with_text("b"));
        let out = transpile_with(&tables, elem);
        assert_eq!(out, format!("{tag} [] \"a b\""), "raw text tag {tag}");
        assert!(!out.contains('\n'));
    }
}

#[test]
fn test_string_delimiters() {
    let samples = [
        "",
        "plain",
        "with \"quote\"",
        "\"",
        "ends with |}",
        "\"|}\"",
        "\"|}|x}|xx}\"",
    ];
    for raw in samples {
        let out = encode_string(raw);
        if raw.contains('"') {
            assert!(out.starts_with('{'), "{raw:?} -> {out}");
            // Content survives verbatim between the delimiters
            let open = out.find('|').unwrap();
            let id = &out[1..open];
            let close = format!("|{id}}}");
            assert!(out.ends_with(&close));
            assert_eq!(&out[open + 1..out.len() - close.len()], raw);
            assert!(!raw.contains(&close));
        } else {
            assert_eq!(out, format!("\"{raw}\""));
        }
    }
}

#[test]
fn test_variant_special_cases() {
    assert_eq!(encode_variant("get"), "`GET");
    assert_eq!(encode_variant("post"), "`POST");
    assert_eq!(encode_variant("true"), "`true_");
    assert_eq!(encode_variant("false"), "`false_");
    assert_eq!(encode_variant("no-referrer"), "`no_referrer");
}

#[test]
fn test_namespacing_with_data_alias_from_json() {
    let tables = ClassificationTables::from_json(
        r#"{
            "namespaces": [
                { "prefix": "aria-", "namespace": "Aria", "names": ["checked"], "data_alias": true }
            ]
        }"#,
    )
    .unwrap();

    assert_eq!(tables.attr_name("aria-checked"), "Aria.checked");
    assert_eq!(tables.attr_name("data-aria-checked"), "Aria.checked");
    assert_eq!(tables.attr_name("aria-pressed"), "aria-pressed");
}

#[test]
fn test_precheck_runs_before_output() {
    let tables = ClassificationTables::extended();
    let select = Element::new("select")
        .with_child(Element::new("option").with_text("ok"))
        .with_child(Element::new("option").with_attr("value", ""));

    let err = Transpiler::new(&tables)
        .with_options(TranspileOptions::new().require_option_labels())
        .transpile_element(&select)
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("option"), "{message}");
    assert!(message.contains('1'), "{message}");
}

#[test]
fn test_unrecognized_nodes_are_reported() {
    let mut div = Element::new("div")
        .with_text("before")
        .with_child(Element::new("hr"));
    div.push_child(MarkupNode::Unrecognized(UnrecognizedNode::new(4, "#cdata-section")));

    let out = transpile(&div.into()).unwrap();
    assert_eq!(out.source, "div [] [\ntxt \"before\";\nhr [] ;]");
    assert_eq!(out.warnings.len(), 1);
    assert_eq!(
        out.warnings[0].to_string(),
        "skipped unrecognized node type 4 (#cdata-section) at 2"
    );
}

#[test]
fn test_xml_processing_instruction_parses_as_comment() {
    // html5ever turns `<?xml ... ?>` into a bogus comment in HTML documents
    let doc = parse_document("<body><?xml-stylesheet href=\"a\"?><p>x</p></body>");
    let body = doc.body().unwrap();
    assert!(matches!(body.children[0], MarkupNode::Comment(_)));
}

#[test]
fn test_parsed_whitespace_can_be_skipped() {
    let nodes = parse_fragment("<ul>\n  <li>One</li>\n  <li>Two</li>\n</ul>");
    let ul = nodes[0].clone();

    let tables = ClassificationTables::extended();
    let out = Transpiler::new(&tables)
        .with_options(TranspileOptions::new().skip_blank_text())
        .transpile(&ul)
        .unwrap();
    assert_eq!(
        out.source,
        "ul [] [\nli [] [\ntxt \"One\";];\nli [] [\ntxt \"Two\";];]"
    );

    let kept = transpile(&ul).unwrap();
    assert_eq!(
        kept.source,
        "ul [] [\ntxt \"\n  \";\nli [] [\ntxt \"One\";];\ntxt \"\n  \";\nli [] [\ntxt \"Two\";];\ntxt \"\n\";]"
    );
}

#[test]
fn test_minimal_tables_leave_names_alone() {
    let tables = ClassificationTables::minimal();
    let button = Element::new("button")
        .with_attr("hx-post", "/x")
        .with_attr("aria-pressed", "true")
        .with_attr("type", "button");
    assert_eq!(
        transpile_with(&tables, button),
        "button [hx-post \"/x\"; aria-pressed \"true\"; type_ \"button\"; ] []"
    );
}

#[test]
fn test_precheck_error_variants() {
    let err = transpile(&Element::new("").into()).unwrap_err();
    assert!(matches!(err, PrecheckError::EmptyTagName { .. }));
}
