//! Server-side document generation: trilingual, RTL-aware HTML templates
//! for contracts and booking summaries, plus the rendering-service client
//! that turns the HTML into PDF bytes.

pub mod contract;
pub mod lang;
pub mod renderer;
pub mod summary;

/// Escape a user-supplied string for interpolation into template HTML.
pub(crate) fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::escape_html;

    #[test]
    fn escapes_html_metacharacters() {
        assert_eq!(
            escape_html(r#"<b>"Bob" & 'Co'</b>"#),
            "&lt;b&gt;&quot;Bob&quot; &amp; &#39;Co&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }
}
