//! HTML report: a static page of plot cards with embedded audio players

use crate::report::{MatrixSection, ReportDocument, Section};
use std::io::{self, Write};

pub fn write<W: Write>(writer: &mut W, document: &ReportDocument) -> io::Result<()> {
    write_header(writer, document)?;

    if let Some(ref matrix) = document.matrix {
        write_matrix(writer, matrix)?;
    }
    for section in document.sections() {
        write_section(writer, section)?;
    }

    write_footer(writer)
}

fn write_header<W: Write>(writer: &mut W, document: &ReportDocument) -> io::Result<()> {
    let summary = &document.summary;
    let title = html_escape(&document.title);

    write!(writer, r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
        :root {{
            --bg: #f0f0f0;
            --card: #ffffff;
            --border: #e5e5e5;
            --text: #333333;
            --dim: #777777;
            --ok: #2da44e;
            --skip: #cf222e;
            --accent: #0969da;
        }}
        * {{ box-sizing: border-box; }}
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Helvetica, Arial, sans-serif;
            background: var(--bg);
            color: var(--text);
            margin: 0;
            line-height: 1.5;
        }}
        .container {{ max-width: 1200px; margin: 0 auto; padding: 20px; }}

        /* Header */
        h1 {{ text-align: center; margin: 0 0 20px; }}

        /* Stats Row */
        .stats {{
            display: grid;
            grid-template-columns: repeat(4, 1fr);
            gap: 1rem;
            margin-bottom: 20px;
        }}
        .stat {{
            background: var(--card);
            border-radius: 8px;
            box-shadow: 0 2px 5px rgba(0,0,0,0.1);
            padding: 1rem;
            text-align: center;
        }}
        .stat-value {{ font-size: 2rem; font-weight: 700; line-height: 1; }}
        .stat-label {{ color: var(--dim); font-size: 0.8rem; text-transform: uppercase; letter-spacing: 0.05em; margin-top: 0.5rem; }}
        .stat.ok .stat-value {{ color: var(--ok); }}
        .stat.skip .stat-value {{ color: var(--skip); }}
        .stat.audio .stat-value {{ color: var(--accent); }}

        /* Cards */
        .grid-container {{
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(350px, 1fr));
            gap: 20px;
        }}
        .card {{
            background: var(--card);
            border-radius: 8px;
            box-shadow: 0 2px 5px rgba(0,0,0,0.1);
            padding: 20px;
        }}
        .card.full-width {{ grid-column: 1 / -1; }}
        .card h2 {{
            margin-top: 0;
            color: #555;
            border-bottom: 1px solid var(--border);
            padding-bottom: 10px;
            font-size: 1.2rem;
            word-break: break-all;
        }}
        .plot-img {{ width: 100%; height: auto; border: 1px solid var(--border); margin-bottom: 10px; }}
        audio {{ width: 100%; margin-top: 10px; }}
    </style>
</head>
<body>
    <div class="container">
        <h1>{title}</h1>
        <div class="stats">
            <div class="stat"><div class="stat-value">{total}</div><div class="stat-label">Artifacts</div></div>
            <div class="stat ok"><div class="stat-value">{rendered}</div><div class="stat-label">Rendered</div></div>
            <div class="stat skip"><div class="stat-value">{skipped}</div><div class="stat-label">Skipped</div></div>
            <div class="stat audio"><div class="stat-value">{audio}</div><div class="stat-label">With Audio</div></div>
        </div>
        <div class="grid-container">
"#,
        title = title,
        total = summary.total,
        rendered = summary.rendered,
        skipped = summary.skipped,
        audio = summary.audio,
    )
}

fn write_matrix<W: Write>(writer: &mut W, matrix: &MatrixSection) -> io::Result<()> {
    write!(writer, r#"            <div class="card full-width">
                <h2>{title}</h2>
                <img src="{image}" class="plot-img" alt="{title}">
            </div>
"#,
        title = html_escape(&matrix.title),
        image = html_escape(&matrix.image),
    )
}

fn write_section<W: Write>(writer: &mut W, section: &Section) -> io::Result<()> {
    let name = html_escape(&section.name);

    writeln!(writer, r#"            <div class="card">"#)?;
    writeln!(writer, "                <h2>{}</h2>", name)?;
    writeln!(
        writer,
        r#"                <img src="{}" class="plot-img" alt="{}">"#,
        html_escape(&section.plot),
        name
    )?;
    if let Some(ref trajectory) = section.trajectory {
        writeln!(
            writer,
            r#"                <img src="{}" class="plot-img" alt="{} trajectory">"#,
            html_escape(trajectory),
            name
        )?;
    }
    if let Some(ref spectrogram) = section.spectrogram {
        writeln!(
            writer,
            r#"                <img src="{}" class="plot-img" alt="{} spectrogram">"#,
            html_escape(spectrogram),
            name
        )?;
    }
    if let Some(ref audio) = section.audio {
        writeln!(
            writer,
            r#"                <audio controls><source src="{}" type="audio/wav">Your browser does not support the audio element.</audio>"#,
            html_escape(audio)
        )?;
    }
    writeln!(writer, "            </div>")
}

fn write_footer<W: Write>(writer: &mut W) -> io::Result<()> {
    write!(writer, r#"        </div>
    </div>
</body>
</html>
"#)
}

/// Escape text for use in element content and double-quoted attributes.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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
