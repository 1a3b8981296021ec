//! Plain-text API reference built from a loaded session.

use std::fmt::{self, Write};

use crate::config::Meta;
use crate::schema::{LinkDescription, Schema};
use crate::session::Session;
use crate::types::Method;

/// Render every document root of `session` as a Markdown-flavoured text
/// reference: one section per resource, one subsection per link with an
/// example request and response.
pub fn render_text(session: &Session, meta: &Meta) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_text(&mut out, session, meta);
    out
}

/// Like [`render_text`], writing into any formatter sink.
pub fn write_text(out: &mut impl Write, session: &Session, meta: &Meta) -> fmt::Result {
    writeln!(out, "# {}", meta.title)?;
    if !meta.description.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", meta.description)?;
    }
    if !meta.headers.is_empty() {
        writeln!(out)?;
        writeln!(out, "Headers:")?;
        for header in &meta.headers {
            writeln!(out, "    {}", header)?;
        }
    }

    for root in session.roots() {
        write_resource(out, root, meta)?;
    }
    Ok(())
}

fn write_resource(out: &mut impl Write, root: Schema<'_>, meta: &Meta) -> fmt::Result {
    let heading = match (root.title(), root.id()) {
        ("", "") => "(untitled)",
        ("", id) => id,
        (title, _) => title,
    };
    writeln!(out)?;
    writeln!(out, "## {}", heading)?;
    if !root.description().is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", root.description())?;
    }

    let properties: Vec<_> = root.properties().collect();
    if !properties.is_empty() {
        writeln!(out)?;
        writeln!(out, "Properties:")?;
        for (name, property) in properties {
            write!(out, "    {}", name)?;
            match (property.resolve_type(), property.resolve_format()) {
                ("", _) => {}
                (t, "") => write!(out, " ({})", t)?,
                (t, f) => write!(out, " ({}, {})", t, f)?,
            }
            match property.resolve_description() {
                "" => writeln!(out)?,
                d => writeln!(out, ": {}", d)?,
            }
        }
    }

    for link in root.links() {
        write_link(out, &link, meta)?;
    }
    Ok(())
}

fn write_link(out: &mut impl Write, link: &LinkDescription<'_>, meta: &Meta) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "### {}", link.title())?;
    if !link.description().is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", link.description())?;
    }

    let url = format!("{}{}", meta.base_url.trim_end_matches('/'), link.href());
    let has_body = Method::parse(link.method()).is_some_and(|m| m.has_body());

    writeln!(out)?;
    writeln!(out, "Request:")?;
    writeln!(out)?;
    writeln!(out, "```")?;
    if has_body {
        writeln!(out, "{} {}", link.method(), url)?;
        for header in &meta.headers {
            writeln!(out, "{}", header)?;
        }
        writeln!(out)?;
        writeln!(out, "{}", link.schema().example_json())?;
    } else {
        let pairs = link.schema().example_query_pairs();
        if pairs.is_empty() {
            writeln!(out, "{} {}", link.method(), url)?;
        } else {
            writeln!(out, "{} {}?{}", link.method(), url, pairs.join("&"))?;
        }
    }
    writeln!(out, "```")?;

    writeln!(out)?;
    writeln!(out, "Response:")?;
    writeln!(out)?;
    writeln!(out, "```")?;
    writeln!(out, "{}", link.target_schema().example_json())?;
    writeln!(out, "```")
}
