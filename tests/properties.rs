mod common;

use common::{TestResult, XDT, apply, transform_doc};
use xmloverlay::{Document, Transformer, TransformerConfig};

const TARGETS: &[&str] = &[
    "<?xml version=\"1.0\"?><a><b key=\"abc\" value=\"def\"></b></a>",
    "<?xml version=\"1.0\"?>\r\n<configuration>\r\n  <appSettings>\r\n    <add key=\"abc\" value=\"def\" />\r\n  </appSettings>\r\n</configuration>",
    "<!--lead--><a>\n\t<b><![CDATA[x < y]]></b>\n\t<?pi data?>\n\t<c>&amp; text</c>\n</a>\n<!--trail-->",
];

#[test]
fn transform_without_directives_is_identity() -> TestResult {
    let transforms = [
        transform_doc("<b key=\"abc\" value=\"zzz\"><c /></b>"),
        format!("<configuration xmlns:xdt=\"{}\"><appSettings><add key=\"x\" /></appSettings></configuration>", XDT),
        "<a xmlns:other=\"urn:other\"><b other:Transform=\"Remove\" /></a>".to_string(),
    ];
    for target in TARGETS {
        for transform in &transforms {
            assert_eq!(&apply(target, transform)?, target);
        }
    }
    Ok(())
}

#[test]
fn remove_versus_remove_all() -> TestResult {
    for n in 1..=4 {
        let target = format!("<a>{}</a>", "<d />".repeat(n));
        let remove = apply(&target, &transform_doc("<d xdt:Transform=\"Remove\" />"))?;
        assert_eq!(remove.matches("<d />").count(), n - 1);
        let remove_all = apply(&target, &transform_doc("<d xdt:Transform=\"RemoveAll\" />"))?;
        assert_eq!(remove_all, "<a></a>");
    }
    Ok(())
}

#[test]
fn sibling_inserts_at_depth_keep_indentation() -> TestResult {
    let target = "<a>\n    <b>\n        <c key=\"1\" />\n    </b>\n</a>";
    let result = apply(
        target,
        &transform_doc(
            "<d xdt:Transform=\"InsertBefore(//c)\" />\n<e xdt:Transform=\"InsertAfter(//c)\" />",
        ),
    )?;
    assert_eq!(
        result,
        "<a>\n    <b>\n        <d />\n        <c key=\"1\" />\n        <e />\n    </b>\n</a>"
    );
    Ok(())
}

#[test]
fn directive_namespace_is_configurable() -> TestResult {
    let transformer =
        Transformer::with_config(TransformerConfig::default().with_directive_namespace("urn:overlay"));
    let mut target = Document::parse("<a><b key=\"1\" /><b key=\"2\" /></a>")?;
    transformer.apply(
        &mut target,
        "<a xmlns:o=\"urn:overlay\" xmlns:xdt=\"http://schemas.microsoft.com/XML-Document-Transform\"><b key=\"2\" o:Locator=\"Match(key)\" o:Transform=\"Remove\" /><b xdt:Transform=\"RemoveAll\" /></a>",
    )?;
    assert_eq!(target.to_xml(), "<a><b key=\"1\" /></a>");
    Ok(())
}

#[test]
fn transform_str_round_trip() -> TestResult {
    let result = xmloverlay::transform_str(
        "<a><b key=\"abc\" /></a>",
        &transform_doc("<b key=\"abc\" extra=\"1\" xdt:Locator=\"Match(key)\" xdt:Transform=\"SetAttributes(extra)\" />"),
    )?;
    assert_eq!(result, "<a><b key=\"abc\" extra=\"1\" /></a>");
    Ok(())
}
