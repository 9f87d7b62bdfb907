//! Preview renderers, one per template variant
//!
//! Every renderer is a pure function of the snapshot: it never mutates it,
//! renders absent fields as empty strings and escapes every interpolated value.

use std::fmt::Write;

use crate::markup::escape_html;
use crate::models::{FormSnapshot, TemplateVariant};

/// Render `snapshot` with `variant`. Unknown variants render nothing.
pub fn render(variant: &TemplateVariant, snapshot: &FormSnapshot) -> String {
    match variant {
        TemplateVariant::Template1 => render_classic(snapshot),
        TemplateVariant::Template2 => render_sectioned(snapshot),
        TemplateVariant::Template3 => render_compact(snapshot),
        TemplateVariant::Unknown(tag) => {
            tracing::debug!("No renderer for template '{}', preview left empty", tag);
            String::new()
        }
    }
}

fn field(snapshot: &FormSnapshot, name: &str) -> String {
    escape_html(snapshot.value_or_empty(name))
}

/// One line per field keyed by its raw name, in snapshot order
fn render_classic(snapshot: &FormSnapshot) -> String {
    let mut html = String::from("<div class=\"template1\">\n<h3>Preview</h3>\n");
    for (name, value) in snapshot.iter() {
        let _ = writeln!(
            html,
            "<p><strong>{}:</strong> {}</p>",
            escape_html(name),
            escape_html(value)
        );
    }
    html.push_str("</div>\n");
    html
}

fn render_sectioned(snapshot: &FormSnapshot) -> String {
    let mut html = String::from("<div class=\"template2\">\n");
    let _ = writeln!(html, "<h2>{}</h2>", field(snapshot, "full_name"));
    let _ = writeln!(
        html,
        "<p>{} | {}</p>",
        field(snapshot, "email"),
        field(snapshot, "phone")
    );

    html.push_str("<h3>Education</h3>\n");
    let _ = writeln!(html, "<p>{}</p>", field(snapshot, "education"));
    let _ = writeln!(
        html,
        "<p>{}, {}</p>",
        field(snapshot, "education_degree"),
        field(snapshot, "education_major")
    );
    let _ = writeln!(
        html,
        "<p>{} ({})</p>",
        field(snapshot, "education_school"),
        field(snapshot, "education_year")
    );

    html.push_str("<h3>Experience</h3>\n");
    let _ = writeln!(html, "<p>{}</p>", field(snapshot, "work_experience"));
    let _ = writeln!(
        html,
        "<p>{} at {} ({})</p>",
        field(snapshot, "work_position"),
        field(snapshot, "work_company"),
        field(snapshot, "work_duration")
    );

    html.push_str("<h3>Skills</h3>\n<ul>\n");
    for name in ["skill1", "skill2", "skill3"] {
        let _ = writeln!(html, "<li>{}</li>", field(snapshot, name));
    }
    html.push_str("</ul>\n</div>\n");
    html
}

fn render_compact(snapshot: &FormSnapshot) -> String {
    format!(
        "<div class=\"template3\">\n\
         <h3>Template 3 Preview:</h3>\n\
         <p>Full Name: {}</p>\n\
         <p>Education: {}</p>\n\
         <p>Experience: {}</p>\n\
         </div>\n",
        field(snapshot, "full_name"),
        field(snapshot, "education"),
        field(snapshot, "work_experience"),
    )
}
