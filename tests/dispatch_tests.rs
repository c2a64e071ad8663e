mod common;

use bloqs::{
    BlockError, BlockOptions, BlockRef, BlockRegistry, BoxBlock, Content, ContentKind,
    Collapsible, ContentMatcher, Grid, Raw, TableData, add_block_types, block,
    configure_default_registry,
    render_fragment, resolve, resolve_with,
};
use common::{TestResult, render, root_element};
use pretty_assertions::assert_eq;
use std::sync::Arc;

#[derive(Debug, Clone)]
struct Temperature(f64);

#[derive(Debug, Clone)]
struct Unregistered;

#[test]
fn test_text_and_null_resolve_to_raw() -> TestResult {
    assert_eq!(render_fragment(block("hi")?.as_ref())?, "<div class=\"bloqs\">hi</div>");
    assert_eq!(render_fragment(block(None::<&str>)?.as_ref())?, "<div class=\"bloqs\"></div>");
    Ok(())
}

#[test]
fn test_existing_block_passes_through_untitled() -> TestResult {
    let original: BlockRef = Arc::new(Raw::new("body", BlockOptions::new()));
    let same = block(original.clone())?;
    assert!(Arc::ptr_eq(&same, &original));

    let wrapped = resolve(original.clone(), BlockOptions::new().title("X"))?;
    assert!(!Arc::ptr_eq(&wrapped, &original));

    let doc = render(wrapped.as_ref())?;
    let body = doc.body().unwrap();
    let tags: Vec<&str> = body.child_elements().map(|el| el.tag()).collect();
    assert_eq!(tags, vec!["h3", "div"], "title first, then the original block, no extra container");
    assert_eq!(body.text_content(), "Xbody");
    Ok(())
}

#[test]
fn test_unregistered_custom_type_names_the_type() {
    let err = block(Content::custom(Unregistered)).unwrap_err();
    match err {
        BlockError::UnrecognizedContent(name) => assert!(name.ends_with("Unregistered")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_custom_type_registration() -> TestResult {
    configure_default_registry(|registry| {
        registry.register_type::<Temperature, _>(|t, options| {
            Ok(Arc::new(Raw::new(format!("{:.1} °C", t.0), options)) as BlockRef)
        });
    });

    let resolved = block(Content::custom(Temperature(21.456)))?;
    assert_eq!(
        render_fragment(resolved.as_ref())?,
        "<div class=\"bloqs\">21.5 °C</div>"
    );
    Ok(())
}

#[test]
fn test_add_block_types_applies_to_every_matcher() -> TestResult {
    #[derive(Debug)]
    struct Celsius(i32);
    #[derive(Debug)]
    struct Fahrenheit(i32);

    add_block_types(
        [ContentMatcher::of::<Celsius>(), ContentMatcher::of::<Fahrenheit>()],
        |_, content, options| match content {
            Content::Custom(custom) => {
                let text = if let Some(c) = custom.downcast_ref::<Celsius>() {
                    format!("{}C", c.0)
                } else if let Some(f) = custom.downcast_ref::<Fahrenheit>() {
                    format!("{}F", f.0)
                } else {
                    String::new()
                };
                Ok(Arc::new(Raw::new(text, options)) as BlockRef)
            }
            other => Err(BlockError::InvalidContent(other.type_name().to_string())),
        },
    );

    assert!(render_fragment(block(Content::custom(Celsius(3)))?.as_ref())?.contains("3C"));
    assert!(render_fragment(block(Content::custom(Fahrenheit(40)))?.as_ref())?.contains("40F"));
    Ok(())
}

#[test]
fn test_registration_order_first_match_wins() -> TestResult {
    let mut registry = BlockRegistry::new();
    registry.register(ContentKind::Text, |_, content, options| {
        Ok(Arc::new(BoxBlock::new(content, options.title("first"))?) as BlockRef)
    });
    registry.register(ContentKind::Sequence, |_, content, options| {
        Ok(Arc::new(Grid::new(vec![content], options)?) as BlockRef)
    });

    let resolved = resolve_with(&registry, "x", BlockOptions::new())?;
    let doc = render(resolved.as_ref())?;
    assert_eq!(root_element(&doc).find("h3").unwrap().text_content(), "first");

    // Re-registering keeps the original position.
    registry.register(ContentKind::Text, |_, content, options| {
        Ok(Arc::new(BoxBlock::paragraph(content, options)?) as BlockRef)
    });
    let kinds: Vec<ContentMatcher> = registry.matchers().copied().collect();
    assert_eq!(
        kinds,
        vec![
            ContentMatcher::Kind(ContentKind::Text),
            ContentMatcher::Kind(ContentKind::Sequence)
        ]
    );
    let doc = render(resolve_with(&registry, "x", BlockOptions::new())?.as_ref())?;
    assert_eq!(root_element(&doc).tag(), "p");
    Ok(())
}

#[test]
fn test_table_content_resolves_to_table_block() -> TestResult {
    let data = TableData::new(["a", "b"]).row([1, 2]);
    let doc = render(block(data)?.as_ref())?;
    let table = root_element(&doc).find("table").unwrap();
    assert!(table.has_class("bloqs-table"));
    assert_eq!(table.find_all("td").len(), 2);
    Ok(())
}

#[test]
fn test_empty_registry_rejects_sequences() {
    let registry = BlockRegistry::new();
    let err = resolve_with(&registry, vec!["a"], BlockOptions::new()).unwrap_err();
    assert!(matches!(err, BlockError::UnrecognizedContent(name) if name == "sequence"));
}

#[test]
fn test_block_trait_objects_are_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BlockRef>();
    assert_send_sync::<BlockRegistry>();
}

#[test]
fn test_explicit_registry_reaches_nested_content() -> TestResult {
    #[derive(Debug)]
    struct Reading(u32);

    let mut registry = BlockRegistry::with_defaults();
    registry.register_type::<Reading, _>(|reading, options| {
        Ok(Arc::new(Raw::new(format!("{} rpm", reading.0), options)) as BlockRef)
    });

    let readings = vec![Content::custom(Reading(900)), Content::custom(Reading(1200))];
    let nested = vec![Content::from("Engine"), Content::from(readings)];
    let grid = resolve_with(&registry, nested, BlockOptions::new())?;
    let html = render_fragment(grid.as_ref())?;
    assert!(html.contains("900 rpm"));
    assert!(html.contains("1200 rpm"));

    let details = Collapsible::new_with(
        &registry,
        vec![Content::custom(Reading(5))],
        BlockOptions::new().title("Idle"),
    )?;
    assert!(render_fragment(&details)?.contains("5 rpm"));

    let boxed = BoxBlock::new_with(&registry, Content::custom(Reading(7)), BlockOptions::new())?;
    assert!(render_fragment(&boxed)?.contains("7 rpm"));

    assert!(Collapsible::new(vec![Content::custom(Reading(5))], BlockOptions::new()).is_err());
    Ok(())
}
