mod common;

use common::{WML_NS, element_layout, style_attr, styles_xml};
use docxide_normalize::{Attribute, NormalizeConfig, Outcome, normalize_styles_xml, read_catalog};

const BODY_2: &str = r#"<w:style w:type="paragraph" w:styleId="Body2"><w:name w:val="Body 2"/><w:pPr><w:ind w:left="100" w:leftChars="50" w:right="200" w:hanging="60"/></w:pPr><w:rPr><w:sz w:val="20"/></w:rPr></w:style>"#;

const QUOTE: &str = r#"<w:style w:type="paragraph" w:styleId="Quote"><w:name w:val="Quote"/><w:pPr><w:spacing w:before="120" w:after="60" w:line="280" w:lineRule="exact"/></w:pPr><w:rPr><w:sz w:val="24"/></w:rPr></w:style>"#;

#[test]
fn catalog_reads_points_and_keeps_absence() {
    let xml = styles_xml(&format!(
        r#"{BODY_2}{QUOTE}<w:style w:type="paragraph" w:styleId="Plain"><w:pPr><w:spacing w:line="276" w:lineRule="auto"/></w:pPr></w:style><w:style w:type="character" w:styleId="Emph"><w:name w:val="Emphasis"/></w:style>"#
    ));
    let catalog = read_catalog(&xml).unwrap();

    let names: Vec<_> = catalog.iter().map(|r| r.name.raw.as_str()).collect();
    assert_eq!(names, ["Body 2", "Quote", "Plain"]);

    let body = &catalog[0];
    assert_eq!(body.font_size, Some(10.0));
    assert_eq!(body.name.level_multiplier, Some(2));
    assert_eq!(body.left_indent, 5.0);
    assert_eq!(body.right_indent, 10.0);
    assert_eq!(body.first_line_indent, -3.0);
    assert_eq!(body.leading, None);

    let quote = &catalog[1];
    assert_eq!(quote.font_size, Some(12.0));
    assert_eq!(quote.leading, Some(14.0));
    assert_eq!(quote.space_before, 6.0);
    assert_eq!(quote.space_after, 3.0);

    let plain = &catalog[2];
    assert_eq!(plain.font_size, None);
    assert_eq!(plain.leading, None);
    assert!(plain.faults.is_empty());
}

#[test]
fn unreadable_values_become_faults() {
    let xml = styles_xml(
        r#"<w:style w:type="paragraph" w:styleId="Odd"><w:name w:val="Odd"/><w:pPr><w:ind w:left="0.5in"/><w:spacing w:before="120" w:line="240" w:lineRule="sometimes"/></w:pPr><w:rPr><w:sz w:val="24"/></w:rPr></w:style>"#,
    );
    let catalog = read_catalog(&xml).unwrap();
    let attrs: Vec<_> = catalog[0].faults.iter().map(|f| f.attribute).collect();
    assert_eq!(attrs, [Attribute::Leading, Attribute::LeftIndent]);

    let (patched, report) = normalize_styles_xml(&xml, &NormalizeConfig::default()).unwrap();
    assert_eq!(patched, xml);
    assert_eq!(report.errored(), 2);
}

#[test]
fn numbered_style_rewrites_ind_in_place() {
    common::init_logging();
    let xml = styles_xml(BODY_2);
    let (patched, report) = normalize_styles_xml(&xml, &NormalizeConfig::default()).unwrap();

    assert!(matches!(report.indent.styles[0].outcome, Outcome::Updated { .. }));
    assert_eq!(style_attr(&patched, "Body 2", "ind", "left").as_deref(), Some("400"));
    assert_eq!(style_attr(&patched, "Body 2", "ind", "leftChars"), None);
    assert_eq!(style_attr(&patched, "Body 2", "ind", "right").as_deref(), Some("200"));
    assert_eq!(style_attr(&patched, "Body 2", "ind", "hanging").as_deref(), Some("200"));
    assert!(patched.contains(r#"<w:ind w:left="400" w:right="200" w:hanging="200"/>"#));
}

#[test]
fn hanging_turns_into_first_line_for_positive_indents() {
    let xml = styles_xml(
        r#"<w:style w:type="paragraph" w:styleId="B"><w:name w:val="Body"/><w:pPr><w:ind w:firstLine="100" w:firstLineChars="100"/></w:pPr><w:rPr><w:sz w:val="22"/></w:rPr></w:style>"#,
    );
    let (patched, _) = normalize_styles_xml(&xml, &NormalizeConfig::default()).unwrap();
    assert!(patched.contains(r#"<w:ind w:firstLine="220"/>"#));
}

#[test]
fn missing_ppr_is_inserted_before_rpr() {
    let xml = styles_xml(
        r#"<w:style w:type="paragraph" w:styleId="L3"><w:name w:val="List 3"/><w:basedOn w:val="Normal"/><w:rPr><w:sz w:val="20"/></w:rPr></w:style>"#,
    );
    let (patched, _) = normalize_styles_xml(&xml, &NormalizeConfig::default()).unwrap();

    assert_eq!(style_attr(&patched, "List 3", "ind", "left").as_deref(), Some("600"));
    assert_eq!(
        element_layout(&patched, "List 3"),
        ["name", "basedOn", "pPr", "rPr", "pPr/ind"]
    );
}

#[test]
fn break_sets_both_sides_on_existing_spacing() {
    let xml = styles_xml(
        r#"<w:style w:type="paragraph" w:styleId="Break"><w:name w:val="Break"/><w:pPr><w:keepNext/><w:spacing w:line="300" w:lineRule="atLeast"/><w:jc w:val="center"/></w:pPr></w:style>"#,
    );
    let (patched, _) = normalize_styles_xml(&xml, &NormalizeConfig::default()).unwrap();

    assert_eq!(style_attr(&patched, "Break", "spacing", "before").as_deref(), Some("300"));
    assert_eq!(style_attr(&patched, "Break", "spacing", "after").as_deref(), Some("300"));
    assert_eq!(
        element_layout(&patched, "Break"),
        ["name", "pPr", "pPr/keepNext", "pPr/spacing", "pPr/jc"]
    );
}

#[test]
fn self_closing_ppr_is_expanded() {
    let xml = styles_xml(
        r#"<w:style w:type="paragraph" w:styleId="H2"><w:name w:val="Heading 2"/><w:pPr/><w:rPr><w:sz w:val="28"/></w:rPr></w:style>"#,
    );
    let (patched, _) = normalize_styles_xml(&xml, &NormalizeConfig::default()).unwrap();
    assert!(patched.contains(r#"<w:pPr><w:ind w:left="560"/></w:pPr>"#));
}

#[test]
fn spacing_autospacing_overrides_are_dropped() {
    let xml = styles_xml(
        r#"<w:style w:type="paragraph" w:styleId="N"><w:name w:val="Normal"/><w:pPr><w:spacing w:beforeAutospacing="1" w:before="100" w:line="240" w:lineRule="exact"/></w:pPr></w:style>"#,
    );
    let (patched, _) = normalize_styles_xml(&xml, &NormalizeConfig::default()).unwrap();
    assert!(patched.contains(r#"<w:spacing w:before="240" w:line="240" w:lineRule="exact"/>"#));
}

#[test]
fn untouched_styles_are_byte_identical() {
    let footnote = r#"<w:style w:type="paragraph" w:styleId="FootnoteText"><w:name w:val="footnote text"/><w:pPr><w:spacing w:before="40"   w:line='200' w:lineRule="exact"/></w:pPr></w:style>"#;
    let xml = styles_xml(&format!("{footnote}\n  {BODY_2}"));
    let (patched, _) = normalize_styles_xml(&xml, &NormalizeConfig::default()).unwrap();

    assert!(patched.contains(footnote));
    assert!(patched.starts_with(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#));
    assert_ne!(patched, xml);
}

#[test]
fn second_run_changes_nothing() {
    let xml = styles_xml(&format!(
        r#"{BODY_2}{QUOTE}<w:style w:type="paragraph" w:styleId="Br"><w:name w:val="break"/><w:pPr><w:spacing w:line="240" w:lineRule="exact"/></w:pPr></w:style>"#
    ));
    let config = NormalizeConfig::default();
    let (once, first) = normalize_styles_xml(&xml, &config).unwrap();
    let (twice, second) = normalize_styles_xml(&once, &config).unwrap();

    assert_eq!(first.updates().len(), 3);
    assert!(second.updates().is_empty());
    assert_eq!(once, twice);
}

#[test]
fn ind_is_inserted_between_spacing_and_jc() {
    let xml = styles_xml(
        r#"<w:style w:type="paragraph" w:styleId="L2"><w:name w:val="List 2"/><w:pPr><w:keepNext/><w:spacing w:line="240" w:lineRule="exact"/><w:jc w:val="left"/></w:pPr><w:rPr><w:sz w:val="20"/></w:rPr></w:style>"#,
    );
    let (patched, report) = normalize_styles_xml(&xml, &NormalizeConfig::default()).unwrap();

    assert_eq!(report.updates().len(), 1);
    assert!(patched.contains(r#"<w:spacing w:line="240" w:lineRule="exact"/><w:ind w:left="400"/><w:jc "#));
    assert_eq!(
        element_layout(&patched, "List 2"),
        ["name", "pPr", "rPr", "pPr/keepNext", "pPr/spacing", "pPr/ind", "pPr/jc"]
    );
}

fn ind_count(xml: &str) -> usize {
    let doc = roxmltree::Document::parse(xml).unwrap();
    doc.descendants()
        .filter(|n| n.tag_name().name() == "ind" && n.tag_name().namespace() == Some(WML_NS))
        .count()
}

#[test]
fn duplicate_name_with_existing_ind_patches_only_the_first() {
    common::init_logging();
    let copy = r#"<w:style w:type="paragraph" w:styleId="Body2Copy"><w:name w:val="Body 2"/><w:pPr><w:ind w:left="80" w:right="40" w:hanging="40"/></w:pPr><w:rPr><w:sz w:val="24"/></w:rPr></w:style>"#;
    let xml = styles_xml(&format!("{BODY_2}{copy}"));
    let (patched, report) = normalize_styles_xml(&xml, &NormalizeConfig::default()).unwrap();

    assert_eq!(report.updates().len(), 2);
    assert!(patched.contains(r#"<w:ind w:left="400" w:right="200" w:hanging="200"/>"#));
    assert!(patched.contains(copy));
    assert_eq!(ind_count(&patched), 2);
}

#[test]
fn duplicate_name_without_ind_gets_a_single_insert() {
    let first = r#"<w:style w:type="paragraph" w:styleId="ListA"><w:name w:val="List 1"/><w:pPr><w:jc w:val="left"/></w:pPr><w:rPr><w:sz w:val="20"/></w:rPr></w:style>"#;
    let second = r#"<w:style w:type="paragraph" w:styleId="ListB"><w:name w:val="List 1"/><w:pPr><w:jc w:val="both"/></w:pPr><w:rPr><w:sz w:val="24"/></w:rPr></w:style>"#;
    let xml = styles_xml(&format!("{first}{second}"));
    let (patched, _) = normalize_styles_xml(&xml, &NormalizeConfig::default()).unwrap();

    assert_eq!(ind_count(&patched), 1);
    assert_eq!(style_attr(&patched, "List 1", "ind", "left").as_deref(), Some("200"));
    assert_eq!(
        element_layout(&patched, "List 1"),
        ["name", "pPr", "rPr", "pPr/ind", "pPr/jc"]
    );
    assert!(patched.contains(second));
}

#[test]
fn attributes_keep_their_quotes_and_order() {
    let xml = styles_xml(
        r#"<w:style w:type="paragraph" w:styleId="L2"><w:name w:val="List 2"/><w:pPr><w:ind  w:hanging='60' w:left='100'  w:leftChars='50' /></w:pPr><w:rPr><w:sz w:val="20"/></w:rPr></w:style>"#,
    );
    let (patched, _) = normalize_styles_xml(&xml, &NormalizeConfig::default()).unwrap();
    assert!(patched.contains(r#"<w:ind  w:hanging='200' w:left='400' /></w:pPr>"#));
}
