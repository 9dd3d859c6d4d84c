//! 翻译管道集成测试
//!
//! 测试从获取到回填的端到端流程

use html_translator::parsers::html::html_to_dom;
use html_translator::translation::constants;
use html_translator::translation::pipeline::{
    collect_translation_units, create_batches, unit_texts, TextCollector,
};

mod common {
    include!("common/mod.rs");
}

use common::{build_translator, EchoBackend, HtmlFixtures, ScriptedBackend, StubFetcher};

/// 段落和 alt 属性都被翻译，并注入 base 标签
#[tokio::test]
async fn test_translates_text_and_alt() {
    let fetcher = StubFetcher::serving(HtmlFixtures::hello_dog(), "https://example.com/");
    let backend = ScriptedBackend::new(vec![Ok(r#"["Xin chào", "Con chó"]"#.to_string())]);
    let translator = build_translator(fetcher.clone(), backend.clone(), 32);

    let document = translator
        .translate_url("https://example.com/", Some("vi"))
        .await
        .expect("translation should succeed");

    assert!(document.html.contains("<p>Xin chào</p>"));
    assert!(document.html.contains(r#"<img alt="Con chó">"#));
    assert!(document
        .html
        .contains(r#"<head><base href="https://example.com/">"#));
    assert_eq!(document.units, 2);
    assert_eq!(document.batches, 1);
    assert_eq!(document.target_lang, "vi");
    assert_eq!(backend.calls(), 1);
    assert_eq!(fetcher.calls(), 1);
}

/// 50 个单元按 32 + 18 两批依次提交，结果按提交顺序拼接
#[tokio::test]
async fn test_splits_into_ordered_batches() {
    let html = HtmlFixtures::numbered_paragraphs(50);
    let fetcher = StubFetcher::serving(&html, "https://example.com/list");
    let backend = EchoBackend::new("vi:");
    let translator = build_translator(fetcher, backend.clone(), 32);

    let document = translator
        .translate_url("https://example.com/list", None)
        .await
        .unwrap();

    let batches = backend.batches();
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0].len(), 32);
    assert_eq!(batches[1].len(), 18);
    assert_eq!(batches[0][0], "item 0");
    assert_eq!(batches[1][0], "item 32");
    assert_eq!(document.batches, 2);

    let expected: String = (0..50).map(|i| format!("<p>vi:item {}</p>", i)).collect();
    assert!(document.html.contains(&expected));
}

/// 回填后重新收集得到的序列就是逐项翻译的结果
#[tokio::test]
async fn test_reassembly_preserves_positions() {
    let translator = build_translator(
        StubFetcher::serving("", "https://example.com/"),
        EchoBackend::new("T:"),
        3,
    );

    let source = HtmlFixtures::mixed_page();
    let before = unit_texts(&collect_translation_units(&html_to_dom(
        source.as_bytes(),
        "utf-8",
    )));

    let document = translator
        .translate_html(source, "https://example.com/", Some("de"))
        .await
        .unwrap();

    let after = unit_texts(&collect_translation_units(&html_to_dom(
        document.html.as_bytes(),
        "utf-8",
    )));
    let expected: Vec<String> = before.iter().map(|text| format!("T:{}", text)).collect();

    assert_eq!(after, expected);
    assert_eq!(document.units, before.len());
    assert_eq!(document.batches, before.len().div_ceil(3));
}

/// 跳过元素中的文本保持原样，也不会提交给后端
#[tokio::test]
async fn test_skip_elements_are_untouched() {
    let backend = EchoBackend::new("T:");
    let translator = build_translator(
        StubFetcher::serving("", "https://example.com/"),
        backend.clone(),
        32,
    );

    let document = translator
        .translate_html(HtmlFixtures::mixed_page(), "https://example.com/", None)
        .await
        .unwrap();

    assert!(document.html.contains("<pre>let x = 1;</pre>"));
    assert!(document.html.contains("<code>fn main()</code>"));
    assert!(document.html.contains(r#"var greeting = "hi";"#));
    assert!(document.html.contains("body { color: red; }"));
    assert!(document.html.contains("<!-- a comment -->"));

    let submitted: Vec<String> = backend.batches().concat();
    assert!(!submitted.iter().any(|text| text.contains("let x")));
    assert!(!submitted.iter().any(|text| text.contains("greeting")));
    assert!(!submitted.iter().any(|text| text.contains("a comment")));
}

/// 只翻译白名单中的属性
#[tokio::test]
async fn test_only_allow_listed_attributes() {
    let translator = build_translator(
        StubFetcher::serving("", "https://example.com/"),
        EchoBackend::new("T:"),
        32,
    );

    let document = translator
        .translate_html(HtmlFixtures::mixed_page(), "https://example.com/", None)
        .await
        .unwrap();

    assert!(document.html.contains(r#"title="T:Heading tip""#));
    assert!(document.html.contains(r#"aria-label="T:About us""#));
    assert!(document.html.contains(r#"href="/about""#));
    assert!(document.html.contains(r#"data-note="keep""#));
    assert!(document.html.contains(r#"placeholder="Search here""#));
    assert!(document.html.contains(r#"value="query""#));
}

/// 文本单元在前，属性单元按属性名分组在后
#[test]
fn test_collection_order() {
    let dom = html_to_dom(HtmlFixtures::mixed_page().as_bytes(), "utf-8");
    let mut collector = TextCollector::new();
    let texts = unit_texts(&collector.collect(&dom));

    assert_eq!(
        texts,
        vec![
            "Page title",
            "Welcome",
            "First ",
            "bold",
            " paragraph",
            "draft",
            "About",
            "Heading tip",
            "About us",
        ]
    );
    assert_eq!(collector.stats().attribute_units, 2);
}

/// 没有可翻译单元时不调用后端，但仍注入 base 标签
#[tokio::test]
async fn test_document_without_units() {
    let backend = ScriptedBackend::new(vec![]);
    let translator = build_translator(
        StubFetcher::serving("", "https://example.com/"),
        backend.clone(),
        32,
    );

    let document = translator
        .translate_html(
            "<html><head></head><body><script>run()</script></body></html>",
            "https://example.com/page",
            None,
        )
        .await
        .unwrap();

    assert_eq!(backend.calls(), 0);
    assert_eq!(document.units, 0);
    assert_eq!(document.batches, 0);
    assert!(document.html.contains(r#"<base href="https://example.com/page">"#));
}

/// 已有 base 标签时保持原样，不插入第二个
#[tokio::test]
async fn test_existing_base_is_kept() {
    let translator = build_translator(
        StubFetcher::serving("", "https://example.com/"),
        EchoBackend::new("T:"),
        32,
    );

    let document = translator
        .translate_html(
            r#"<html><head><base href="/old/"></head><body><p>Hi</p></body></html>"#,
            "https://example.com/new/",
            None,
        )
        .await
        .unwrap();

    assert_eq!(document.html.matches("<base").count(), 1);
    assert!(document.html.contains(r#"<base href="/old/">"#));
    assert!(document.html.contains("<p>T:Hi</p>"));
}

/// 重定向后的最终地址写入 base 标签
#[tokio::test]
async fn test_base_points_at_final_url() {
    let fetcher = StubFetcher::serving(
        HtmlFixtures::hello_dog(),
        "https://www.example.com/landing",
    );
    let translator = build_translator(fetcher, EchoBackend::new("T:"), 32);

    let document = translator
        .translate_url("https://example.com/", None)
        .await
        .unwrap();

    assert_eq!(document.final_url, "https://www.example.com/landing");
    assert!(document
        .html
        .contains(r#"<base href="https://www.example.com/landing">"#));
    assert_eq!(document.target_lang, constants::DEFAULT_TARGET_LANG);
}

#[test]
fn test_batches_cover_all_units_in_order() {
    let dom = html_to_dom(HtmlFixtures::numbered_paragraphs(70).as_bytes(), "utf-8");
    let texts = unit_texts(&collect_translation_units(&dom));
    let batches = create_batches(&texts, constants::DEFAULT_MAX_BATCH);

    let sizes: Vec<usize> = batches.iter().map(|batch| batch.len()).collect();
    assert_eq!(sizes, vec![32, 32, 6]);

    let rejoined: Vec<String> = batches.iter().flat_map(|b| b.items.to_vec()).collect();
    assert_eq!(rejoined, texts);
}

/// `<template>` 中的文本和属性同样被翻译并写回
#[tokio::test]
async fn test_template_content_is_translated() {
    let backend = EchoBackend::new("T:");
    let translator = build_translator(
        StubFetcher::serving("", "https://example.com/"),
        backend.clone(),
        32,
    );

    let document = translator
        .translate_html(
            r#"<html><head></head><body><p>outside</p><template><p>inside template</p><img alt="tpl alt"></template></body></html>"#,
            "https://example.com/",
            None,
        )
        .await
        .unwrap();

    assert_eq!(
        backend.batches().concat(),
        vec!["outside", "inside template", "tpl alt"]
    );
    assert!(document
        .html
        .contains(r#"<template><p>T:inside template</p><img alt="T:tpl alt"></template>"#));
    assert_eq!(document.units, 3);
}
