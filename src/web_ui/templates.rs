//! Template engine setup and HTML templates.

use once_cell::sync::Lazy;
use tera::{Context, Tera};

/// Global template engine instance with embedded templates.
pub static TEMPLATES: Lazy<Tera> = Lazy::new(|| {
    let mut tera = Tera::default();

    // Embed templates directly in the binary (no external files needed)
    tera.add_raw_templates(vec![
        ("base.html", BASE_TEMPLATE),
        ("index.html", INDEX_TEMPLATE),
        ("error.html", ERROR_TEMPLATE),
    ])
    .expect("Failed to load templates");

    tera
});

/// Render a template with context
pub fn render(template: &str, context: &Context) -> Result<String, tera::Error> {
    TEMPLATES.render(template, context)
}

// =============================================================================
// Embedded Templates
// =============================================================================

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{% block title %}Gallery{% endblock %}</title>
    <style>
        :root {
            --bg: #0a0a0a;
            --bg-secondary: #141414;
            --foreground: #fafafa;
            --foreground-secondary: rgba(250, 250, 250, 0.7);
            --border: #262626;
        }

        * { box-sizing: border-box; margin: 0; padding: 0; }

        body {
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif;
            background: var(--bg);
            color: var(--foreground);
            line-height: 1.6;
        }

        .container {
            max-width: 1200px;
            margin: 0 auto;
            padding: 32px;
        }

        .nav {
            display: flex;
            flex-wrap: wrap;
            gap: 8px;
            align-items: center;
            padding-bottom: 16px;
            border-bottom: 1px solid var(--border);
            margin-bottom: 16px;
        }

        button, select, input {
            background: var(--bg-secondary);
            color: var(--foreground);
            border: 1px solid var(--border);
            border-radius: 8px;
            padding: 6px 14px;
            font-size: 14px;
        }
        button:hover { border-color: var(--foreground-secondary); cursor: pointer; }
        input.offset { width: 72px; }

        .status {
            color: var(--foreground-secondary);
            font-size: 14px;
            margin-bottom: 16px;
        }

        img.current {
            max-height: 80vh;
            max-width: 100%;
        }
    </style>
</head>
<body>
    <div class="container">
        {% block content %}{% endblock %}
    </div>
</body>
</html>"##;

const INDEX_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}{{ directory }}{% endblock %}
{% block content %}
<div class="nav" id="nav">
    <select id="group" hidden></select>
    <button id="first">First</button>
    <button id="previous">Previous</button>
    <button id="next">Next</button>
    <button id="last">Last</button>
    <input id="offset" class="offset" type="number" min="1" value="10" title="Offset">
    <button id="back">Back by offset</button>
    <button id="forward">Forward by offset</button>
</div>
<div id="content" data-images-url="{{ images_url }}" data-directory="{{ directory }}">
    <p class="status" id="status">{{ image_count }} image(s) in '{{ directory }}'.</p>
    <a class="current" href=""><img alt="" class="current" src=""></a>
</div>
<script type="application/json" id="catalog">{{ catalog_json | safe }}</script>
<script src="{{ script_url | safe }}"></script>
{% endblock %}"##;

const ERROR_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Error{% endblock %}
{% block content %}
<div style="padding: 48px; text-align: center;">
    <h1 style="margin-bottom: 16px;">Something went wrong</h1>
    <p class="status">{{ message }}</p>
    <a href="/">Return to the gallery</a>
</div>
{% endblock %}"##;
