//! Link preview page
//!
//! 预览页包含 Open Graph / Twitter Card 标签。插值走 askama 默认的 HTML 转义，
//! 只有已编码的 JS 字符串字面量标记为 `safe`。

use askama::Template;

use crate::errors::Result;
use crate::storage::LinkRecord;

/// How the page sends a human visitor on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectMode {
    /// `<meta http-equiv="refresh">` in the head
    MetaRefresh,
    /// `window.location.replace(...)`, meta refresh only inside `<noscript>`
    Script,
}

#[derive(Template)]
#[template(
    source = r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8" />
    <title>{{ title }}</title>
    <meta property="og:type" content="website" />
    <meta property="og:url" content="{{ page_url }}" />
    <meta property="og:title" content="{{ title }}" />
    <meta property="og:description" content="{{ description }}" />
    {%- if let Some(image) = image %}
    <meta property="og:image" content="{{ image }}" />
    {%- endif %}
    <meta name="twitter:card" content="{{ twitter_card }}" />
    <meta name="twitter:title" content="{{ title }}" />
    <meta name="twitter:description" content="{{ description }}" />
    {%- if let Some(image) = image %}
    <meta name="twitter:image" content="{{ image }}" />
    {%- endif %}
    {%- if script_redirect %}
    <noscript><meta http-equiv="refresh" content="0; url={{ target_url }}" /></noscript>
    {%- else %}
    <meta http-equiv="refresh" content="0; url={{ target_url }}" />
    {%- endif %}
  </head>
  <body>
    <p>Redirecting to <a href="{{ target_url }}">{{ target_url }}</a>...</p>
    {%- if script_redirect %}
    <script>window.location.replace({{ target_js|safe }});</script>
    {%- endif %}
  </body>
</html>
"#,
    ext = "html"
)]
struct PreviewTemplate {
    title: String,
    description: String,
    page_url: String,
    target_url: String,
    image: Option<String>,
    twitter_card: &'static str,
    script_redirect: bool,
    target_js: String,
}

/// Page title: the description when it has text, otherwise `default_title`
pub fn preview_title<'a>(record: &'a LinkRecord, default_title: &'a str) -> &'a str {
    record.non_empty_description().unwrap_or(default_title)
}

/// Text of the description meta tags
pub fn preview_description(record: &LinkRecord) -> String {
    format!("Click to open the link: {}", record.original_url)
}

/// Render the preview page for a record
///
/// `page_url` is the short URL the crawler fetched (`og:url`).
pub fn render_preview(
    record: &LinkRecord,
    page_url: &str,
    default_title: &str,
    mode: RedirectMode,
) -> Result<String> {
    let image = record.non_empty_thumbnail().map(str::to_string);
    let twitter_card = if image.is_some() {
        "summary_large_image"
    } else {
        "summary"
    };

    let template = PreviewTemplate {
        title: preview_title(record, default_title).to_string(),
        description: preview_description(record),
        page_url: page_url.to_string(),
        target_url: record.original_url.clone(),
        image,
        twitter_card,
        script_redirect: mode == RedirectMode::Script,
        target_js: js_string_literal(&record.original_url)?,
    };

    Ok(template.render()?)
}

/// JSON-encoded string that is also safe inside a `<script>` element
fn js_string_literal(value: &str) -> Result<String> {
    let json = serde_json::to_string(value)?;
    Ok(json
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(description: Option<&str>, thumbnail: Option<&str>) -> LinkRecord {
        LinkRecord {
            short_code: "abc123".to_string(),
            original_url: "https://example.com/page?a=1&b=2".to_string(),
            description: description.map(String::from),
            thumbnail_url: thumbnail.map(String::from),
        }
    }

    #[test]
    fn test_meta_refresh_page() {
        let html = render_preview(
            &record(Some("Demo Page"), Some("https://x/img.png")),
            "https://sho.rt/short/abc123",
            "Shared Link",
            RedirectMode::MetaRefresh,
        )
        .unwrap();

        assert!(html.contains("<title>Demo Page</title>"));
        assert!(html.contains(r#"<meta property="og:title" content="Demo Page" />"#));
        assert!(html.contains(r#"<meta property="og:image" content="https://x/img.png" />"#));
        assert!(html.contains(r#"<meta name="twitter:card" content="summary_large_image" />"#));
        assert!(html.contains(r#"<meta property="og:url" content="https://sho.rt/short/abc123" />"#));
        assert!(html.contains(
            r#"<meta http-equiv="refresh" content="0; url=https://example.com/page?a=1&amp;b=2" />"#
        ));
        assert!(html.contains("Click to open the link: https://example.com/page?a=1&amp;b=2"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_defaults_without_description_or_thumbnail() {
        let html = render_preview(
            &record(Some("   "), None),
            "https://sho.rt/short/abc123",
            "Shared Link",
            RedirectMode::MetaRefresh,
        )
        .unwrap();

        assert!(html.contains("<title>Shared Link</title>"));
        assert!(!html.contains("og:image"));
        assert!(!html.contains("twitter:image"));
        assert!(html.contains(r#"<meta name="twitter:card" content="summary" />"#));
    }

    #[test]
    fn test_script_page() {
        let html = render_preview(
            &record(None, None),
            "https://sho.rt/short/abc123",
            "Shared Link",
            RedirectMode::Script,
        )
        .unwrap();

        assert!(html.contains(
            r#"<script>window.location.replace("https://example.com/page?a=1\u0026b=2");</script>"#
        ));
        assert!(html.contains("<noscript><meta http-equiv=\"refresh\""));
    }

    #[test]
    fn test_description_is_escaped() {
        let html = render_preview(
            &record(Some(r#""><script>alert(1)</script>"#), None),
            "https://sho.rt/short/abc123",
            "Shared Link",
            RedirectMode::MetaRefresh,
        )
        .unwrap();

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&quot;&gt;&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn test_js_literal_cannot_close_script() {
        let literal = js_string_literal("https://e.com/</script><b>").unwrap();
        assert!(!literal.contains('<'));
        assert!(!literal.contains('>'));
        assert_eq!(literal, r#""https://e.com/\u003c/script\u003e\u003cb\u003e""#);
    }

    #[test]
    fn test_urls_are_escaped_in_attributes() {
        let mut rec = record(Some("Tom's page"), Some("https://x/a.png?x=1&y=\"2\""));
        rec.original_url = "https://example.com/?q='<b>'".to_string();
        let html = render_preview(
            &rec,
            "https://sho.rt/short/abc123",
            "Shared Link",
            RedirectMode::Script,
        )
        .unwrap();

        assert!(html.contains("<title>Tom&#x27;s page</title>"));
        assert!(html.contains(
            r#"<meta property="og:image" content="https://x/a.png?x=1&amp;y=&quot;2&quot;" />"#
        ));
        assert!(html.contains("url=https://example.com/?q=&#x27;&lt;b&gt;&#x27;"));
        // JS 字面量原样输出，不做二次 HTML 转义
        assert!(html.contains(
            r#"window.location.replace("https://example.com/?q='\u003cb\u003e'");"#
        ));
    }
}
