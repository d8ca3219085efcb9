use std::path::PathBuf;

use platon_core::ResourceLocation;
use platon_editor::{
    LinkTarget, Position, RESERVED_VARIABLES, completions, documentation_links, hover, hover_at,
    reference_links,
};
use pretty_assertions::assert_eq;

const DOCS: &str = "https://platon.univ-eiffel.fr/";

fn location() -> ResourceLocation {
    ResourceLocation {
        id: "abc".to_string(),
        root: PathBuf::from("/storage/abc"),
        name: "Fractions".to_string(),
    }
}

#[test]
fn test_documentation_links() {
    let text = "// see #docs/main/programing/exercise\ntitle = x #docs/components/input-box. end";

    let links = documentation_links(text, DOCS);

    assert_eq!(links.len(), 2);
    assert_eq!(
        links[0].target,
        LinkTarget::Url("https://platon.univ-eiffel.fr/docs/main/programing/exercise".into())
    );
    assert_eq!(links[0].range.start, Position::new(0, 7));
    assert_eq!(links[0].range.end, Position::new(0, 37));
    assert_eq!(
        links[1].target,
        LinkTarget::Url("https://platon.univ-eiffel.fr/docs/components/input-box.".into())
    );
    assert_eq!(links[1].range.start, Position::new(1, 10));
}

#[test]
fn test_documentation_links_ignore_other_sections() {
    assert!(documentation_links("#docs/other/page #doc/main", DOCS).is_empty());
}

#[test]
fn test_reference_links_point_into_working_copy() {
    let text = "@extends /abc/base.ple\n@include   data/values.json\n";

    let links = reference_links(text, &location());

    assert_eq!(links.len(), 2);
    assert_eq!(
        links[0].target,
        LinkTarget::File(PathBuf::from("/storage/abc/base.ple"))
    );
    assert_eq!(links[0].range.start, Position::new(0, 9));
    assert_eq!(links[0].range.end, Position::new(0, 22));
    assert_eq!(
        links[1].target,
        LinkTarget::File(PathBuf::from("/storage/abc/data/values.json"))
    );
    assert_eq!(links[1].range.start, Position::new(1, 11));
}

#[test]
fn test_reference_links_skip_blocks_and_other_resources() {
    let text = "\
statement ==
@include ignored.txt
==
@copyurl /other:v1/file.png
image = @copycontent img/logo.png
";

    let links = reference_links(text, &location());

    assert_eq!(links.len(), 1);
    assert_eq!(
        links[0].target,
        LinkTarget::File(PathBuf::from("/storage/abc/img/logo.png"))
    );
    assert_eq!(links[0].range.start.line, 4);
}

#[test]
fn test_hover_known_keywords() {
    let markdown = hover("grader", DOCS).unwrap();
    assert!(markdown.starts_with("Defines a grader block.\n\n[documentation]("));
    assert!(markdown.contains(
        "https://platon.univ-eiffel.fr/docs/main/programing/exercise/workflow#%C3%A9valuation-grader"
    ));
    assert!(hover("sandbox", DOCS).unwrap().contains("`python` or `node`"));
    assert_eq!(hover("title", DOCS), None);
}

#[test]
fn test_hover_at_position() {
    let text = "title = Add\n@extends /abc/base.ple";

    let found = hover_at(text, Position::new(1, 3), DOCS).unwrap();
    assert!(found.contents.starts_with("Extends a resource."));
    assert_eq!(found.range.start, Position::new(1, 1));
    assert_eq!(found.range.end, Position::new(1, 8));

    assert_eq!(hover_at(text, Position::new(0, 2), DOCS), None);
}

#[test]
fn test_completions() {
    let items = completions();
    let labels: Vec<_> = items.iter().map(|i| i.label).collect();

    assert_eq!(labels, RESERVED_VARIABLES.to_vec());
    assert!(items.iter().all(|i| i.detail == "Reserved variable"));
}
