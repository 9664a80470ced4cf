use scraper::Html;

const SKIPPED_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Strips markup and returns the document's text nodes concatenated as-is.
///
/// Text inside script-like elements is dropped. Plain text without markup
/// comes back unchanged.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut text = String::with_capacity(html.len());

    for node in document.root_element().descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };
        let skipped = node
            .parent()
            .and_then(|parent| parent.value().as_element())
            .is_some_and(|element| SKIPPED_ELEMENTS.contains(&element.name()));
        if !skipped {
            text.push_str(fragment);
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_tags_and_keeps_text() {
        let html = "<html><body><h1>Ownership</h1><p>Each value has <b>one</b> owner.</p></body></html>";
        assert_eq!(html_to_text(html), "OwnershipEach value has one owner.");
    }

    #[test]
    fn test_drops_script_and_style_contents() {
        let html = "<html><head><style>p { color: red; }</style></head><body><script>track();</script><p>Borrowing</p></body></html>";
        assert_eq!(html_to_text(html), "Borrowing");
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(html_to_text("just text"), "just text");
    }

    #[test]
    fn test_decodes_entities() {
        assert_eq!(html_to_text("<p>a &amp; b</p>"), "a & b");
    }
}
