use std::borrow::Cow;

/// Escapes `& < > " '` for use in HTML text and attribute values.
///
/// Borrows the input unchanged when nothing needs escaping.
pub fn html_escape(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(input);
    }

    let mut escaped = String::with_capacity(input.len() + 16);
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Encodes `target_url` as a JavaScript string literal that is safe inside
/// a `<script>` element.
fn script_string(target_url: &str) -> String {
    // serializing a &str cannot fail
    let literal = serde_json::to_string(target_url).unwrap_or_else(|_| String::from("\"\""));
    literal
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

/// Renders the static redirect page for one link.
///
/// The output depends only on `target_url`, so unchanged links render to
/// identical bytes.
pub fn render_redirect_document(target_url: &str) -> String {
    let escaped = html_escape(target_url);
    let script = script_string(target_url);
    format!(
        r#"<!doctype html>
<html>
  <head>
    <meta charset="utf-8">
    <meta http-equiv="refresh" content="0; url={escaped}">
    <link rel="canonical" href="{escaped}">
    <meta name="robots" content="noindex">
    <title>Redirecting</title>
  </head>
  <body>
    <script>location.replace({script});</script>
    <p>Redirecting to <a href="{escaped}">{escaped}</a></p>
  </body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_borrows_clean_input() {
        assert!(matches!(
            html_escape("https://example.com/a?b=c"),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn escape_all_special_characters() {
        assert_eq!(
            html_escape(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn escape_existing_entities_again() {
        assert_eq!(html_escape("&lt;"), "&amp;lt;");
    }

    #[test]
    fn document_carries_redirect_hints() {
        let html = render_redirect_document("https://example.com/page");

        assert!(html.contains(r#"<meta http-equiv="refresh" content="0; url=https://example.com/page">"#));
        assert!(html.contains(r#"<link rel="canonical" href="https://example.com/page">"#));
        assert!(html.contains(r#"<meta name="robots" content="noindex">"#));
        assert!(html.contains(r#"location.replace("https://example.com/page");"#));
        assert!(html.contains(r#"<a href="https://example.com/page">"#));
    }

    #[test]
    fn document_escapes_hostile_target() {
        let html = render_redirect_document(r#"https://example.com/?q="><script>alert('x')</script>&y"#);

        assert!(!html.contains("<script>alert"));
        assert!(!html.contains("</script>&y"));
        assert!(html.contains("&quot;&gt;&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;&amp;y"));
        assert!(html.contains(r"\u003c/script\u003e\u0026y"));
    }

    #[test]
    fn document_is_deterministic() {
        assert_eq!(
            render_redirect_document("https://example.com"),
            render_redirect_document("https://example.com")
        );
    }
}
