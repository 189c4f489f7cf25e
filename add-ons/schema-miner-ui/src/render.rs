//! Server-side HTML for the tabbed interface.

use pulldown_cmark::{html, Options, Parser};
use schema_miner_core::{Panel, Role, TabbedInterface, TemplatePlaceholder, TemplateSource};
use std::fmt::Write;

const DEFAULT_OUTPUT_LINES: u32 = 7;

/// Escape text for element content and double-quoted attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

pub fn markdown_to_html(input: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(input, options);
    let mut output = String::new();
    html::push_html(&mut output, parser);
    output
}

/// Full page. Each output area reads the template again.
pub fn render_index(app_name: &str, ui: &TabbedInterface, source: &TemplateSource) -> String {
    let mut page = String::new();
    let _ = write!(
        page,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="/assets/style.css">
</head>
<body>
<nav class="tabs" role="tablist">
"#,
        title = escape_html(app_name)
    );

    for (i, panel) in ui.panels.iter().enumerate() {
        let _ = writeln!(
            page,
            r#"<button class="tab{active}" role="tab" data-tab="stage-{n}">{title}</button>"#,
            active = if i == 0 { " active" } else { "" },
            n = panel.stage.number(),
            title = escape_html(panel.title),
        );
    }
    page.push_str("</nav>\n<main>\n");

    for (i, panel) in ui.panels.iter().enumerate() {
        let placeholder = source.placeholder();
        page.push_str(&render_panel(panel, &placeholder, i == 0));
    }

    page.push_str("</main>\n<script src=\"/assets/tabs.js\"></script>\n</body>\n</html>\n");
    page
}

pub fn render_panel(panel: &Panel, placeholder: &TemplatePlaceholder, active: bool) -> String {
    let n = panel.stage.number();
    let mut s = String::new();
    let _ = writeln!(
        s,
        r#"<section class="panel{active}" id="stage-{n}" data-stage="{n}">"#,
        active = if active { " active" } else { "" },
    );
    let _ = writeln!(s, r#"<div class="markdown">{}</div>"#, markdown_to_html(panel.intro_markdown));

    let _ = write!(
        s,
        r#"<div class="group">
<label for="api-key-{n}">{label}</label>
<p class="info">{info}</p>
<input type="password" id="api-key-{n}" autocomplete="off">
<button data-action="api-key">{button}</button>
</div>
"#,
        label = escape_html(panel.api_key.label),
        info = escape_html(panel.api_key.info),
        button = escape_html(panel.api_key.button),
    );

    s.push_str("<div class=\"row\">\n<div class=\"group column\">\n<ol class=\"chatbot\">\n");
    for message in &panel.transcript {
        let role = match message.role {
            Role::Assistant => "assistant",
            Role::User => "user",
        };
        let _ = writeln!(
            s,
            r#"<li class="message {role}">{}</li>"#,
            escape_html(&message.content)
        );
    }
    let _ = write!(
        s,
        r#"</ol>
<input type="text" class="chat-input" placeholder="{placeholder}">
</div>
<div class="group column">
<label for="document-{n}">{label}</label>
<input type="file" id="document-{n}" accept="{accept}" style="height: {height}px">
<button class="upload-action" data-action="{action}">{button}</button>
</div>
</div>
"#,
        placeholder = escape_html(panel.chat_placeholder),
        label = escape_html(panel.upload.label),
        accept = escape_html(&panel.upload.accepted_types.join(",")),
        height = panel.upload.height,
        button = escape_html(panel.upload.button),
        action = panel.upload.action.endpoint(),
    );

    let _ = writeln!(
        s,
        r#"<div class="markdown">{}</div>"#,
        markdown_to_html(panel.output.description_markdown)
    );
    let _ = write!(
        s,
        r#"<div class="row">
<textarea class="schema-output{missing}" readonly rows="{rows}" placeholder="{text}"></textarea>
</div>
<p class="status" aria-live="polite"></p>
</section>
"#,
        missing = if placeholder.available { "" } else { " unavailable" },
        rows = panel.output.lines.unwrap_or(DEFAULT_OUTPUT_LINES),
        text = escape_html(&placeholder.text),
    );
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema_miner_core::{Stage, TextEncoding};

    #[test]
    fn escape_covers_markup_and_quotes() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn markdown_headings_and_bold_render() {
        let html = markdown_to_html("# Extracted JSON Schema\nSee the **Process Specification Document**.");
        assert!(html.contains("<h1>Extracted JSON Schema</h1>"));
        assert!(html.contains("<strong>Process Specification Document</strong>"));
    }

    #[test]
    fn panel_shows_template_in_output_placeholder() {
        let panel = Panel::for_stage(Stage::Preliminary);
        let placeholder = TemplatePlaceholder {
            text: "{\n    \"name\": \"\"\n}".to_string(),
            available: true,
        };
        let html = render_panel(&panel, &placeholder, false);
        assert!(html.contains(r#"id="stage-2""#));
        assert!(html.contains(r#"rows="13""#));
        assert!(html.contains("&quot;name&quot;: &quot;&quot;"));
        assert!(html.contains(r#"accept=".pdf""#));
        assert!(html.contains("Upload Scientific Paper"));
        assert!(!html.contains("unavailable"));
    }

    #[test]
    fn upload_button_targets_stage_action() {
        let placeholder = TemplatePlaceholder {
            text: "{}".to_string(),
            available: true,
        };
        let stage1 = render_panel(&Panel::for_stage(Stage::Initial), &placeholder, true);
        assert!(stage1.contains(r#"data-action="generate">Generate Schema</button>"#));
        assert!(!stage1.contains(r#"data-action="document""#));

        for stage in [Stage::Preliminary, Stage::Finalize] {
            let html = render_panel(&Panel::for_stage(stage), &placeholder, false);
            assert!(html.contains(r#"data-action="document">Upload</button>"#));
            assert!(!html.contains(r#"data-action="generate""#));
        }
    }

    #[test]
    fn index_renders_every_tab_even_without_template() {
        let dir = tempfile::tempdir().unwrap();
        let source = TemplateSource::new(dir.path().join("missing.json"), TextEncoding::Utf8);
        let html = render_index("Schema Miner", &TabbedInterface::build(), &source);
        for stage in Stage::ALL {
            assert!(html.contains(stage.title()));
        }
        assert_eq!(html.matches("Schema template unavailable: File Not Found").count(), 3);
        assert!(!html.contains(r#"placeholder="null""#));
    }
}
