mod common;

use common::{TestResult, apply, transform_doc};

const COMMON_TARGET: &str = "<?xml version=\"1.0\"?><a><b key=\"abc\" value=\"def\"></b></a>";
const TWO_BS: &str = "<?xml version=\"1.0\"?><a><b key=\"abc\" value=\"def\"></b><b key=\"xyz\"></b></a>";

#[test]
fn remove_nonexistent_element_is_a_no_op() -> TestResult {
    let result = apply(COMMON_TARGET, &transform_doc("<c key=\"abc\" xdt:Transform=\"Remove\" />"))?;
    assert_eq!(result, COMMON_TARGET);
    Ok(())
}

#[test]
fn remove_previous_comment_of_nonexistent_element_is_a_no_op() -> TestResult {
    let result = apply(
        COMMON_TARGET,
        &transform_doc("<c key=\"abc\" xdt:Transform=\"RemovePreviousComment\" />"),
    )?;
    assert_eq!(result, COMMON_TARGET);
    Ok(())
}

#[test]
fn remove_nonexistent_element_with_lowercase_locator() -> TestResult {
    let result = apply(
        COMMON_TARGET,
        &transform_doc("<c key=\"abc\" xdt:Locator=\"match(key)\" xdt:Transform=\"Remove\" />"),
    )?;
    assert_eq!(result, COMMON_TARGET);
    Ok(())
}

#[test]
fn insert_follows_existing_indentation() -> TestResult {
    let target = "<?xml version=\"1.0\"?>\r\n<configuration>\r\n  <appSettings>\r\n    <add key=\"abc\" value=\"def\" />\r\n  </appSettings>\r\n</configuration>";
    let transform = format!(
        "<?xml version=\"1.0\"?>\n<configuration xmlns:xdt=\"{}\">\n  <appSettings>\n    <add key=\"ghi\" value=\"klm\" xdt:Transform=\"Insert\" />\n  </appSettings>\n</configuration>",
        common::XDT
    );
    let result = apply(target, &transform)?;
    assert_eq!(
        result,
        "<?xml version=\"1.0\"?>\r\n<configuration>\r\n  <appSettings>\r\n    <add key=\"abc\" value=\"def\" />\r\n    <add key=\"ghi\" value=\"klm\" />\r\n  </appSettings>\r\n</configuration>"
    );
    Ok(())
}

#[test]
fn insert_then_comment_keeps_indentation() -> TestResult {
    let target = "<?xml version=\"1.0\"?>\r\n<configuration>\r\n  <appSettings>\r\n    <add key=\"abc\" value=\"def\" />\r\n  </appSettings>\r\n</configuration>";
    let transform = format!(
        "<?xml version=\"1.0\"?>\n<configuration xmlns:xdt=\"{}\">\n  <appSettings>\n    <add key=\"ghi\" value=\"klm\" xdt:Transform=\"Insert\" />\n    <add key=\"ghi\" xdt:Locator=\"match(key)\" xdt:Transform=\"comment(\\r\\n    Hello\\r\\n    )\" />\n  </appSettings>\n</configuration>",
        common::XDT
    );
    let result = apply(target, &transform)?;
    assert_eq!(
        result,
        "<?xml version=\"1.0\"?>\r\n<configuration>\r\n  <appSettings>\r\n    <add key=\"abc\" value=\"def\" />\r\n    <!--\r\n    Hello\r\n    -->\r\n    <add key=\"ghi\" value=\"klm\" />\r\n  </appSettings>\r\n</configuration>"
    );
    Ok(())
}

#[test]
fn replace_uses_short_form_for_empty_copy() -> TestResult {
    let result = apply(
        COMMON_TARGET,
        &transform_doc(
            "<b key=\"abc\" value=\"ghi\" second=\"lmno\" xdt:Locator=\"Match(key)\" xdt:Transform=\"Replace\"></b>",
        ),
    )?;
    assert_eq!(
        result,
        "<?xml version=\"1.0\"?><a><b key=\"abc\" value=\"ghi\" second=\"lmno\" /></a>"
    );
    Ok(())
}

#[test]
fn replace_with_children() -> TestResult {
    let result = apply(
        COMMON_TARGET,
        &transform_doc(
            "<b key=\"abc\" value=\"ghi\" second=\"lmno\" xdt:Locator=\"Match(key)\" xdt:Transform=\"Replace\"><c f=\"xyz\"></c></b>",
        ),
    )?;
    assert_eq!(
        result,
        "<?xml version=\"1.0\"?><a><b key=\"abc\" value=\"ghi\" second=\"lmno\"><c f=\"xyz\" /></b></a>"
    );
    Ok(())
}

#[test]
fn insert_appends_to_parent() -> TestResult {
    let result = apply(
        TWO_BS,
        &transform_doc("<c key=\"abc\" value=\"ghi\" xdt:Transform=\"Insert\"></c>"),
    )?;
    assert_eq!(
        result,
        "<?xml version=\"1.0\"?><a><b key=\"abc\" value=\"def\"></b><b key=\"xyz\"></b><c key=\"abc\" value=\"ghi\" /></a>"
    );
    Ok(())
}

#[test]
fn insert_into_element_without_children() -> TestResult {
    let result = apply(
        "<?xml version=\"1.0\"?><a></a>",
        &transform_doc("<c key=\"abc\" value=\"ghi\" xdt:Transform=\"Insert\"></c>"),
    )?;
    assert_eq!(result, "<?xml version=\"1.0\"?><a><c key=\"abc\" value=\"ghi\" /></a>");
    Ok(())
}

#[test]
fn insert_using_xpath_locator() -> TestResult {
    let result = apply(
        TWO_BS,
        &transform_doc(
            "<c key=\"abc\" value=\"ghi\" xdt:Locator=\"XPath(//a/b[@key='abc'])\" xdt:Transform=\"Insert\"></c>",
        ),
    )?;
    assert_eq!(
        result,
        "<?xml version=\"1.0\"?><a><b key=\"abc\" value=\"def\"><c key=\"abc\" value=\"ghi\" /></b><b key=\"xyz\"></b></a>"
    );
    Ok(())
}

#[test]
fn insert_with_children() -> TestResult {
    let result = apply(
        TWO_BS,
        &transform_doc(
            "<c key=\"abc\" value=\"ghi\" xdt:Locator=\"XPath(//a/b[@key='abc'])\" xdt:Transform=\"Insert\"><d key=\"lmno\"></d></c>",
        ),
    )?;
    assert_eq!(
        result,
        "<?xml version=\"1.0\"?><a><b key=\"abc\" value=\"def\"><c key=\"abc\" value=\"ghi\"><d key=\"lmno\" /></c></b><b key=\"xyz\"></b></a>"
    );
    Ok(())
}

#[test]
fn comment_goes_before_target() -> TestResult {
    let result = apply(
        COMMON_TARGET,
        &transform_doc(
            "<b key=\"abc\" xdt:Locator=\"Match(key)\" xdt:Transform=\"Comment(abc 123)\"></b>",
        ),
    )?;
    assert_eq!(
        result,
        "<?xml version=\"1.0\"?><a><!--abc 123--><b key=\"abc\" value=\"def\"></b></a>"
    );
    Ok(())
}

#[test]
fn comment_is_indented_like_target() -> TestResult {
    let target = "<?xml version=\"1.0\"?>\r\n<a>\r\n  <b key=\"abc\" value=\"def\">\r\n  </b>\r\n</a>";
    let result = apply(
        target,
        &transform_doc(
            "<b key=\"abc\" xdt:Locator=\"Match(key)\" xdt:Transform=\"Comment(\\r\\nabc 123\\r\\n)\"></b>",
        ),
    )?;
    assert_eq!(
        result,
        "<?xml version=\"1.0\"?>\r\n<a>\r\n  <!--\r\nabc 123\r\n-->\r\n  <b key=\"abc\" value=\"def\">\r\n  </b>\r\n</a>"
    );
    Ok(())
}

#[test]
fn insert_after() -> TestResult {
    let result = apply(
        TWO_BS,
        &transform_doc(
            "<c key=\"abc\" value=\"ghi\" xdt:Locator=\"XPath(//a/b[@key='abc'])\" xdt:Transform=\"InsertAfter(//a/b[@key='abc'])\"></c>",
        ),
    )?;
    assert_eq!(
        result,
        "<?xml version=\"1.0\"?><a><b key=\"abc\" value=\"def\"></b><c key=\"abc\" value=\"ghi\" /><b key=\"xyz\"></b></a>"
    );
    Ok(())
}

#[test]
fn insert_after_with_children() -> TestResult {
    let result = apply(
        TWO_BS,
        &transform_doc(
            "<c key=\"abc\" value=\"ghi\" xdt:Transform=\"InsertAfter(//a/b[@key='abc'])\"><d key=\"lmno\"></d></c>",
        ),
    )?;
    assert_eq!(
        result,
        "<?xml version=\"1.0\"?><a><b key=\"abc\" value=\"def\"></b><c key=\"abc\" value=\"ghi\"><d key=\"lmno\" /></c><b key=\"xyz\"></b></a>"
    );
    Ok(())
}

#[test]
fn insert_before() -> TestResult {
    let result = apply(
        TWO_BS,
        &transform_doc(
            "<c key=\"abc\" value=\"ghi\" xdt:Transform=\"InsertBefore(//a/b[@key='abc'])\"></c>",
        ),
    )?;
    assert_eq!(
        result,
        "<?xml version=\"1.0\"?><a><c key=\"abc\" value=\"ghi\" /><b key=\"abc\" value=\"def\"></b><b key=\"xyz\"></b></a>"
    );
    Ok(())
}

#[test]
fn insert_before_with_children() -> TestResult {
    let result = apply(
        TWO_BS,
        &transform_doc(
            "<c key=\"abc\" value=\"ghi\" xdt:Locator=\"XPath(//a/b[@key='abc'])\" xdt:Transform=\"InsertBefore(//a/b[@key='abc'])\"><d key=\"lmno\"></d></c>",
        ),
    )?;
    assert_eq!(
        result,
        "<?xml version=\"1.0\"?><a><c key=\"abc\" value=\"ghi\"><d key=\"lmno\" /></c><b key=\"abc\" value=\"def\"></b><b key=\"xyz\"></b></a>"
    );
    Ok(())
}

#[test]
fn remove_leaves_empty_parent_in_long_form() -> TestResult {
    let result = apply(
        COMMON_TARGET,
        &transform_doc("<b key=\"abc\" xdt:Locator=\"Match(key)\" xdt:Transform=\"Remove\"></b>"),
    )?;
    assert_eq!(result, "<?xml version=\"1.0\"?><a></a>");
    Ok(())
}

#[test]
fn remove_attributes() -> TestResult {
    let result = apply(
        COMMON_TARGET,
        &transform_doc(
            "<b key=\"abc\" xdt:Locator=\"Match(key)\" xdt:Transform=\"RemoveAttributes(value)\"></b>",
        ),
    )?;
    assert_eq!(result, "<?xml version=\"1.0\"?><a><b key=\"abc\"></b></a>");
    Ok(())
}

#[test]
fn remove_attributes_ignores_absent_names() -> TestResult {
    let result = apply(
        COMMON_TARGET,
        &transform_doc(
            "<b key=\"abc\" xdt:Locator=\"Match(key)\" xdt:Transform=\"RemoveAttributes(missing, value)\"></b>",
        ),
    )?;
    assert_eq!(result, "<?xml version=\"1.0\"?><a><b key=\"abc\"></b></a>");
    Ok(())
}

#[test]
fn set_attributes_copies_every_plain_attribute() -> TestResult {
    let result = apply(
        COMMON_TARGET,
        &transform_doc(
            "<b key=\"abc\" value=\"ghi\" second=\"lmno\" xdt:Locator=\"Match(key)\" xdt:Transform=\"SetAttributes\"></b>",
        ),
    )?;
    assert_eq!(
        result,
        "<?xml version=\"1.0\"?><a><b key=\"abc\" value=\"ghi\" second=\"lmno\"></b></a>"
    );
    Ok(())
}

#[test]
fn set_attributes_with_multi_attribute_match() -> TestResult {
    let result = apply(
        COMMON_TARGET,
        &transform_doc(
            "<b key=\"abc\" value=\"def\" second=\"lmno\" xdt:Locator=\"Match(key,value)\" xdt:Transform=\"SetAttributes\"></b>",
        ),
    )?;
    assert_eq!(
        result,
        "<?xml version=\"1.0\"?><a><b key=\"abc\" value=\"def\" second=\"lmno\"></b></a>"
    );
    Ok(())
}

#[test]
fn set_attributes_with_condition_locator() -> TestResult {
    let result = apply(
        COMMON_TARGET,
        &transform_doc(
            "<b key=\"abc\" value=\"def\" second=\"lmno\" xdt:Locator=\"Condition(@key='abc')\" xdt:Transform=\"SetAttributes\"></b>",
        ),
    )?;
    assert_eq!(
        result,
        "<?xml version=\"1.0\"?><a><b key=\"abc\" value=\"def\" second=\"lmno\"></b></a>"
    );
    Ok(())
}

#[test]
fn set_attributes_only_touches_listed_names() -> TestResult {
    let result = apply(
        COMMON_TARGET,
        &transform_doc(
            "<b key=\"abc\" value=\"ghi\" other=\"zzz\" xdt:Locator=\"Match(key)\" xdt:Transform=\"SetAttributes(value)\"></b>",
        ),
    )?;
    assert_eq!(result, "<?xml version=\"1.0\"?><a><b key=\"abc\" value=\"ghi\"></b></a>");
    Ok(())
}

#[test]
fn remove_all() -> TestResult {
    let result = apply(TWO_BS, &transform_doc("<b xdt:Transform=\"RemoveAll\"></b>"))?;
    assert_eq!(result, "<?xml version=\"1.0\"?><a></a>");
    Ok(())
}

#[test]
fn transform_kinds_are_case_insensitive() -> TestResult {
    let result = apply(
        COMMON_TARGET,
        &transform_doc("<b key=\"abc\" xdt:Locator=\"MATCH(key)\" xdt:Transform=\"remove\"></b>"),
    )?;
    assert_eq!(result, "<?xml version=\"1.0\"?><a></a>");
    Ok(())
}
