//! Small helpers for server-rendered HTML fragments.

/// Escape text for use in HTML element content and quoted attribute values.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Wrap a body fragment in the shared page layout.
pub fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<link rel="stylesheet" href="/static/style.css">
<script src="https://unpkg.com/htmx.org@1.9.12"></script>
<script src="/static/app.js"></script>
</head>
<body>
<nav><a href="/index/">Home</a> <a href="/search/">Search</a> <a href="/create_books/">Add</a> <a href="/delete_books/">Remove</a></nav>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_and_quotes() {
        assert_eq!(
            escape(r#"<script>alert("x")</script> & 'y'"#),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; &#x27;y&#x27;"
        );
    }

    #[test]
    fn leaves_plain_text_alone() {
        assert_eq!(escape("It was a pleasure to burn."), "It was a pleasure to burn.");
    }

    #[test]
    fn page_escapes_title_but_not_body() {
        let html = page("A & B", "<p>ok</p>");
        assert!(html.contains("<title>A &amp; B</title>"));
        assert!(html.contains("<p>ok</p>"));
    }
}
