use pulldown_cmark::{html, Options, Parser};
use tracing::debug;

/// Renders markdown to the HTML that is stored as the page body.
pub struct MarkdownRenderer {
    options: Options,
}

impl MarkdownRenderer {
    /// Plain CommonMark, or CommonMark plus the GitHub-style extensions.
    pub fn new(extensions: bool) -> Self {
        let options = if extensions {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_FOOTNOTES
        } else {
            Options::empty()
        };

        Self { options }
    }

    pub fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut output, parser);

        debug!("Rendered {} bytes of markdown into {} bytes of HTML", markdown.len(), output.len());
        output
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new(false)
    }
}
