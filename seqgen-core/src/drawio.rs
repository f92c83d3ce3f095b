//! draw.io (mxfile) renderer for laid out scenes
//!
//! Every scene node maps to one or two `mxCell`s with absolute geometry.
//! Edges carry their own source and target points instead of connecting to
//! vertices, so the output reproduces the layout exactly.

use std::fmt::{self, Write};

use crate::ast::{ArrowHead, LineStyle};
use crate::geometry::{Point, Rect};
use crate::scene::*;

const TEXT_HEIGHT: f64 = 20.0;
const HOST: &str = "seqgen";

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Prefix of every generated cell id
    pub id_prefix: String,
    /// Name of the single diagram page
    pub page_name: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            id_prefix: "seqgen-".to_string(),
            page_name: "Diagram".to_string(),
        }
    }
}

impl RenderConfig {
    /// Set the cell id prefix
    pub fn with_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }

    /// Set the page name
    pub fn with_page_name(mut self, name: impl Into<String>) -> Self {
        self.page_name = name.into();
        self
    }
}

/// Render a scene to a draw.io document
pub fn render(scene: &Scene) -> String {
    render_with_config(scene, &RenderConfig::default())
}

/// Render a scene to a draw.io document with custom config
pub fn render_with_config(scene: &Scene, config: &RenderConfig) -> String {
    let mut state = RenderState::new(config);
    state
        .document(scene)
        .expect("writing to String is infallible");
    state.xml
}

/// Render state
struct RenderState<'a> {
    config: &'a RenderConfig,
    xml: String,
    next_id: usize,
}

impl<'a> RenderState<'a> {
    fn new(config: &'a RenderConfig) -> Self {
        Self {
            config,
            xml: String::new(),
            next_id: 1,
        }
    }

    fn create_id(&mut self) -> String {
        let id = format!("{}{}", self.config.id_prefix, self.next_id);
        self.next_id += 1;
        id
    }

    fn document(&mut self, scene: &Scene) -> fmt::Result {
        let page_id = self.create_id();

        writeln!(
            self.xml,
            r#"<mxfile host="{host}" agent="{host}" version="26.2.2">"#,
            host = HOST
        )?;
        writeln!(
            self.xml,
            r#"  <diagram name="{name}" id="{id}">"#,
            name = escape_xml(&self.config.page_name),
            id = page_id
        )?;
        writeln!(
            self.xml,
            r##"    <mxGraphModel dx="0" dy="0" grid="1" gridSize="10" guides="1" tooltips="1" connect="1" arrows="1" fold="1" page="0" pageScale="1" pageWidth="851" pageHeight="1100" background="#ffffff" math="0" shadow="0">"##
        )?;
        writeln!(self.xml, "      <root>")?;
        writeln!(self.xml, r#"        <mxCell id="0" />"#)?;
        writeln!(self.xml, r#"        <mxCell id="1" parent="0" />"#)?;

        for node in &scene.nodes {
            match node {
                Node::TitleBox(title) => self.title(title)?,
                Node::LaneHeader(lane) => self.lane(lane)?,
                Node::ActivationBar(bar) => self.activation(bar)?,
                Node::MessageArrow(message) => self.message(message)?,
                Node::FrameBox(frame) => self.frame(frame)?,
                Node::BranchDivider(divider) => self.divider(divider)?,
                Node::NoteBox(note) => self.note(note)?,
            }
        }

        writeln!(self.xml, "      </root>")?;
        writeln!(self.xml, "    </mxGraphModel>")?;
        writeln!(self.xml, "  </diagram>")?;
        writeln!(self.xml, "</mxfile>")
    }

    fn title(&mut self, title: &TitleBox) -> fmt::Result {
        let style = frame_style(title.tab_width, title.tab_height);
        self.vertex(&escape_xml(&title.text), &style, title.rect).map(drop)
    }

    fn lane(&mut self, lane: &LaneHeader) -> fmt::Result {
        let size = lane.header_height.to_string();
        let style = style(&[
            ("shape", "umlLifeline"),
            ("perimeter", "lifelinePerimeter"),
            ("whiteSpace", "wrap"),
            ("html", "1"),
            ("container", "1"),
            ("dropTarget", "0"),
            ("collapsible", "0"),
            ("recursiveResize", "0"),
            ("outlineConnect", "0"),
            ("portConstraint", "eastwest"),
            ("newEdgeStyle", r#"{"curved":0,"rounded":0}"#),
            ("size", &size),
        ]);
        self.vertex(&escape_xml(&lane.label), &style, lane.rect)
            .map(drop)
    }

    fn activation(&mut self, bar: &ActivationBar) -> fmt::Result {
        let style = style(&[
            ("html", "1"),
            ("points", "[[0,0,0,0,5],[0,1,0,0,-5],[1,0,0,0,5],[1,1,0,0,-5]]"),
            ("perimeter", "orthogonalPerimeter"),
            ("outlineConnect", "0"),
            ("targetShapes", "umlLifeline"),
            ("portConstraint", "eastwest"),
            ("newEdgeStyle", r#"{"curved":0,"rounded":0}"#),
        ]);
        self.vertex("", &style, bar.rect).map(drop)
    }

    fn message(&mut self, message: &MessageArrow) -> fmt::Result {
        let end_arrow = match message.head {
            ArrowHead::Closed => "block",
            ArrowHead::Open => "open",
        };
        let dashed = match message.line {
            LineStyle::Solid => "0",
            LineStyle::Dashed => "1",
        };

        let mut pairs = vec![
            ("html", "1"),
            ("curved", "0"),
            ("rounded", "0"),
            ("endArrow", end_arrow),
            ("dashed", dashed),
        ];
        // Self call labels sit beside the loop, everything else above the line
        if message.kind == MessageKind::SelfCall {
            pairs.extend([("align", "left"), ("spacingLeft", "2")]);
        } else {
            pairs.push(("verticalAlign", "bottom"));
        }

        self.edge(
            &label(&message.text),
            &style(&pairs),
            message.from,
            message.to,
            &message.waypoints,
        )
    }

    fn frame(&mut self, frame: &FrameBox) -> fmt::Result {
        let style = frame_style(frame.tab_width, frame.tab_height);
        let frame_id = self.vertex(frame.kind.as_str(), &style, frame.rect)?;

        if !frame.label.is_empty() {
            let rect = Rect::new(
                frame.rect.x + frame.tab_width,
                frame.rect.y,
                (frame.rect.width - frame.tab_width).max(0.0),
                frame.tab_height.max(TEXT_HEIGHT),
            );
            self.text(&frame.label, rect)?;
        }
        log::trace!(id = frame_id.as_str(), kind = frame.kind.as_str(); "Rendered frame");
        Ok(())
    }

    fn divider(&mut self, divider: &BranchDivider) -> fmt::Result {
        let style = style(&[
            ("html", "1"),
            ("endArrow", "none"),
            ("dashed", "1"),
            ("rounded", "0"),
        ]);
        let from = Point::new(divider.x, divider.y);
        let to = Point::new(divider.x + divider.width, divider.y);
        self.edge("", &style, from, to, &[])?;

        if !divider.label.is_empty() {
            let rect = Rect::new(divider.x, divider.y, divider.width, TEXT_HEIGHT);
            self.text(&divider.label, rect)?;
        }
        Ok(())
    }

    fn note(&mut self, note: &NoteBox) -> fmt::Result {
        let style = style(&[
            ("shape", "note"),
            ("whiteSpace", "wrap"),
            ("html", "1"),
            ("backgroundOutline", "1"),
            ("darkOpacity", "0.05"),
            ("size", "10"),
            ("align", "left"),
            ("spacing", "8"),
        ]);
        self.vertex(&label(&note.text), &style, note.rect).map(drop)
    }

    /// Bracketed guard text next to a frame tab or divider
    fn text(&mut self, text: &str, rect: Rect) -> fmt::Result {
        let style = style(&[
            ("text", ""),
            ("html", "1"),
            ("align", "left"),
            ("verticalAlign", "middle"),
            ("rounded", "0"),
            ("labelPosition", "center"),
            ("verticalLabelPosition", "middle"),
            ("spacingLeft", "5"),
        ]);
        let value = escape_xml(&escape_html(&format!("[{}]", text)));
        self.vertex(&value, &style, rect).map(drop)
    }

    /// Write a vertex cell and return its id; `value` must already be escaped
    fn vertex(&mut self, value: &str, style: &str, rect: Rect) -> Result<String, fmt::Error> {
        let id = self.create_id();
        writeln!(
            self.xml,
            r#"        <mxCell id="{id}" value="{value}" style="{style}" vertex="1" parent="1">"#,
            style = escape_xml(style)
        )?;
        writeln!(
            self.xml,
            r#"          <mxGeometry x="{}" y="{}" width="{}" height="{}" as="geometry" />"#,
            rect.x, rect.y, rect.width, rect.height
        )?;
        writeln!(self.xml, "        </mxCell>")?;
        Ok(id)
    }

    /// Write an edge between two absolute points; `value` must already be escaped
    fn edge(
        &mut self,
        value: &str,
        style: &str,
        from: Point,
        to: Point,
        waypoints: &[Point],
    ) -> fmt::Result {
        let id = self.create_id();
        writeln!(
            self.xml,
            r#"        <mxCell id="{id}" value="{value}" style="{style}" edge="1" parent="1">"#,
            style = escape_xml(style)
        )?;
        writeln!(self.xml, r#"          <mxGeometry relative="1" as="geometry">"#)?;
        writeln!(
            self.xml,
            r#"            <mxPoint x="{}" y="{}" as="sourcePoint" />"#,
            from.x, from.y
        )?;
        writeln!(
            self.xml,
            r#"            <mxPoint x="{}" y="{}" as="targetPoint" />"#,
            to.x, to.y
        )?;
        if !waypoints.is_empty() {
            writeln!(self.xml, r#"            <Array as="points">"#)?;
            for point in waypoints {
                writeln!(
                    self.xml,
                    r#"              <mxPoint x="{}" y="{}" />"#,
                    point.x, point.y
                )?;
            }
            writeln!(self.xml, "            </Array>")?;
        }
        writeln!(self.xml, "          </mxGeometry>")?;
        writeln!(self.xml, "        </mxCell>")
    }
}

fn frame_style(tab_width: f64, tab_height: f64) -> String {
    let width = tab_width.to_string();
    let height = tab_height.to_string();
    style(&[
        ("shape", "umlFrame"),
        ("whiteSpace", "wrap"),
        ("html", "1"),
        ("pointerEvents", "0"),
        ("width", &width),
        ("height", &height),
    ])
}

/// Build a `key=value;` style string; empty values emit a bare key
fn style(pairs: &[(&str, &str)]) -> String {
    let mut style = String::new();
    for (key, value) in pairs {
        style.push_str(key);
        if !value.is_empty() {
            style.push('=');
            style.push_str(value);
        }
        style.push(';');
    }
    style
}

/// HTML label from text lines, escaped for an XML attribute
fn label(lines: &[String]) -> String {
    let html: Vec<String> = lines.iter().map(|line| escape_html(line)).collect();
    escape_xml(&html.join("<br>"))
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
