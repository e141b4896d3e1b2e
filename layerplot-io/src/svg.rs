//! SVG export of a [`RenderFrame`].
//!
//! Commands are painted inside a clipped plot area by ascending `zorder`,
//! then in display-list order, so a later layer covers an earlier one where
//! they overlap. Sizes given in points (line widths, marker areas) are
//! converted with the figure's dpi. Lines break at non-finite samples.

use std::io;

use layerplot_renderer::{DrawCommand, Edge, LegendEntry, Primitive, RenderFrame, Viewport};
use svg::node::element::{Circle, ClipPath, Definitions, Group, Line, Polyline, Rectangle, Text};
use svg::node::Text as TextNode;
use svg::Document;

const CLIP_ID: &str = "plot-area";
const FONT_PX: f64 = 13.0;

/// Format a pixel coordinate compactly.
fn px(v: f64) -> String {
    let s = format!("{:.2}", v);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Writes a [`RenderFrame`] as a standalone SVG document.
pub struct SvgWriter<W: io::Write> {
    writer: W,
}

impl<W: io::Write> SvgWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write the frame as a standalone SVG document.
    pub fn write(&mut self, frame: &RenderFrame) -> io::Result<()> {
        let document = document(frame);
        svg::write(&mut self.writer, &document)
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn pt_to_px(pt: f64, dpi: f64) -> f64 {
    pt * dpi / 72.0
}

fn document(frame: &RenderFrame) -> Document {
    let inset = 0.1 * frame.width_px.min(frame.height_px);
    let viewport = Viewport::new(frame.width_px, frame.height_px)
        .with_inset(inset)
        .with_view(frame.view);
    let (left, top, width, height) = viewport.plot_area();

    let clip = ClipPath::new().set("id", CLIP_ID).add(
        Rectangle::new()
            .set("x", px(left))
            .set("y", px(top))
            .set("width", px(width))
            .set("height", px(height)),
    );

    let mut layers = Group::new().set("clip-path", format!("url(#{})", CLIP_ID));
    for command in frame.paint_order() {
        layers = layers.add(command_group(command, &viewport, frame.dpi));
    }

    let frame_rect = Rectangle::new()
        .set("x", px(left))
        .set("y", px(top))
        .set("width", px(width))
        .set("height", px(height))
        .set("fill", "none")
        .set("stroke", "#000000")
        .set("stroke-width", px(pt_to_px(0.8, frame.dpi)));

    let mut document = Document::new()
        .set("width", px(frame.width_px))
        .set("height", px(frame.height_px))
        .set(
            "viewBox",
            format!("0 0 {} {}", px(frame.width_px), px(frame.height_px)),
        )
        .add(Definitions::new().add(clip))
        .add(
            Rectangle::new()
                .set("width", "100%")
                .set("height", "100%")
                .set("fill", "#ffffff"),
        )
        .add(layers)
        .add(frame_rect);

    if let Some(title) = frame.suptitle.as_deref() {
        document = document.add(label(title, frame.width_px / 2.0, FONT_PX * 1.5, None));
    }
    if let Some(title) = frame.title.as_deref() {
        document = document.add(label(title, left + width / 2.0, top - FONT_PX * 0.6, None));
    }
    if let Some(xlabel) = frame.xlabel.as_deref() {
        document = document.add(label(
            xlabel,
            left + width / 2.0,
            top + height + FONT_PX * 2.0,
            None,
        ));
    }
    if let Some(ylabel) = frame.ylabel.as_deref() {
        let (x, y) = (left - FONT_PX * 1.5, top + height / 2.0);
        document = document.add(label(ylabel, x, y, Some(format!("rotate(-90 {} {})", px(x), px(y)))));
    }
    if let Some(entries) = frame.legend.as_deref() {
        if !entries.is_empty() {
            document = document.add(legend(entries, left + width, top));
        }
    }
    document
}

fn command_group(command: &DrawCommand, viewport: &Viewport, dpi: f64) -> Group {
    let color = command.color.to_hex();
    let opacity = px(command.color.opacity(command.alpha));
    let mut group = Group::new().set("data-seq", command.seq.to_string());
    if let Some(label) = &command.label {
        group = group.set("data-label", label.as_str());
    }

    match &command.primitive {
        Primitive::Line { points, width, dash } => {
            let stroke_px = pt_to_px(*width, dpi);
            for run in points.split(|p| !p.is_finite()).filter(|run| run.len() > 1) {
                let coords: Vec<String> = run
                    .iter()
                    .map(|p| {
                        let s = viewport.data_to_screen(p);
                        format!("{},{}", px(s.x), px(s.y))
                    })
                    .collect();
                let mut line = Polyline::new()
                    .set("points", coords.join(" "))
                    .set("fill", "none")
                    .set("stroke", color.clone())
                    .set("stroke-opacity", opacity.clone())
                    .set("stroke-width", px(stroke_px))
                    .set("stroke-linejoin", "round");
                if let Some(pattern) = dash.dash_pattern() {
                    line = line.set("stroke-dasharray", dash_array(pattern, stroke_px));
                }
                group = group.add(line);
            }
            group
        }
        Primitive::Scatter { points, size, edge } => {
            let radius = px(pt_to_px(size.sqrt() / 2.0, dpi));
            let stroke = outline(edge, command, dpi);
            for p in points.iter().filter(|p| p.is_finite()) {
                let s = viewport.data_to_screen(p);
                let mut marker = Circle::new()
                    .set("cx", px(s.x))
                    .set("cy", px(s.y))
                    .set("r", radius.clone())
                    .set("fill", color.clone())
                    .set("fill-opacity", opacity.clone());
                for (name, value) in stroke.iter().cloned() {
                    marker = marker.set(name, value);
                }
                group = group.add(marker);
            }
            group
        }
        Primitive::Bar { bars, edge } => {
            let stroke = outline(edge, command, dpi);
            for bar in bars {
                let x0 = viewport.data_to_screen_x(bar.left());
                let x1 = viewport.data_to_screen_x(bar.right());
                let y0 = viewport.data_to_screen_y(bar.bottom);
                let y1 = viewport.data_to_screen_y(bar.top());
                if ![x0, x1, y0, y1].iter().all(|v| v.is_finite()) {
                    continue;
                }
                let mut rect = Rectangle::new()
                    .set("x", px(x0.min(x1)))
                    .set("y", px(y0.min(y1)))
                    .set("width", px((x1 - x0).abs()))
                    .set("height", px((y1 - y0).abs()))
                    .set("fill", color.clone())
                    .set("fill-opacity", opacity.clone());
                for (name, value) in stroke.iter().cloned() {
                    rect = rect.set(name, value);
                }
                group = group.add(rect);
            }
            group
        }
    }
}

/// Stroke attributes of a filled shape's edge, empty when it has none.
/// The fill color stands in for a missing edge color.
fn outline(edge: &Edge, command: &DrawCommand, dpi: f64) -> Vec<(&'static str, String)> {
    if !edge.is_visible() {
        return Vec::new();
    }
    let stroke = edge.color.unwrap_or(command.color);
    let stroke_px = pt_to_px(edge.width, dpi);
    let mut attrs = vec![
        ("stroke", stroke.to_hex()),
        ("stroke-opacity", px(stroke.opacity(command.alpha))),
        ("stroke-width", px(stroke_px)),
    ];
    if let Some(pattern) = edge.dash.dash_pattern() {
        attrs.push(("stroke-dasharray", dash_array(pattern, stroke_px)));
    }
    attrs
}

fn dash_array(pattern: &[f64], stroke_px: f64) -> String {
    pattern
        .iter()
        .map(|d| px(d * stroke_px.max(1.0)))
        .collect::<Vec<_>>()
        .join(",")
}

fn label(content: &str, x: f64, y: f64, transform: Option<String>) -> Text {
    let mut text = Text::new()
        .set("x", px(x))
        .set("y", px(y))
        .set("text-anchor", "middle")
        .set("font-family", "sans-serif")
        .set("font-size", px(FONT_PX))
        .add(TextNode::new(content));
    if let Some(t) = transform {
        text = text.set("transform", t);
    }
    text
}

fn legend(entries: &[LegendEntry], right: f64, top: f64) -> Group {
    let row = FONT_PX * 1.4;
    let box_width = 140.0;
    let x = right - box_width - 8.0;
    let y = top + 8.0;

    let mut group = Group::new().set("class", "legend").add(
        Rectangle::new()
            .set("x", px(x))
            .set("y", px(y))
            .set("width", px(box_width))
            .set("height", px(row * entries.len() as f64 + 8.0))
            .set("fill", "#ffffff")
            .set("fill-opacity", "0.8")
            .set("stroke", "#cccccc"),
    );

    for (i, entry) in entries.iter().enumerate() {
        let cy = y + 4.0 + row * (i as f64 + 0.5);
        let swatch = Line::new()
            .set("x1", px(x + 8.0))
            .set("y1", px(cy))
            .set("x2", px(x + 28.0))
            .set("y2", px(cy))
            .set("stroke", entry.color.to_hex())
            .set("stroke-width", "4");
        let text = Text::new()
            .set("x", px(x + 34.0))
            .set("y", px(cy + FONT_PX / 3.0))
            .set("font-family", "sans-serif")
            .set("font-size", px(FONT_PX * 0.9))
            .add(TextNode::new(entry.label.as_str()));
        group = group.add(swatch).add(text);
    }
    group
}

#[cfg(test)]
mod tests {
    use super::*;
    use layerplot_core::Style;
    use layerplot_renderer::{subplots, FigureConfig};

    fn render(frame: &RenderFrame) -> String {
        let mut writer = SvgWriter::new(Vec::new());
        writer.write(frame).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn test_px_formatting() {
        assert_eq!(px(12.0), "12");
        assert_eq!(px(12.5), "12.5");
        assert_eq!(px(0.126), "0.13");
    }

    #[test]
    fn test_layers_painted_in_display_list_order() {
        let (fig, mut axes) = subplots(&FigureConfig::default());
        axes.bar(&[1.0, 2.0, 3.0], &[5.0, 6.0, 7.0], &Style::new().with("label", "Bar Plot"))
            .unwrap();
        axes.plot(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &Style::new().with("label", "Line Plot"))
            .unwrap();
        axes.scatter(&[1.0, 2.0, 3.0], &[6.0, 5.0, 4.0], &Style::new().with("label", "Scatter Plot"))
            .unwrap();

        let out = render(&RenderFrame::capture(&fig, &axes));
        assert!(out.contains("<svg"));
        let bar = out.find("data-label=\"Bar Plot\"").unwrap();
        let line = out.find("data-label=\"Line Plot\"").unwrap();
        let scatter = out.find("data-label=\"Scatter Plot\"").unwrap();
        assert!(bar < line && line < scatter);
        assert_eq!(out.matches("<circle").count(), 3);
        assert!(out.contains("<polyline"));
    }

    #[test]
    fn test_decorations_and_legend() {
        let (mut fig, mut axes) = subplots(&FigureConfig::default());
        fig.set_suptitle("Overview");
        axes.plot(&[0.0, 1.0], &[0.0, 1.0], &Style::new().with("label", "diag").with("linestyle", "--"))
            .unwrap();
        axes.set_title("Layered Plot Example");
        axes.set_xlabel("X-Axis");
        axes.set_ylabel("Y-Axis");
        axes.legend();

        let out = render(&RenderFrame::capture(&fig, &axes));
        for text in ["Overview", "Layered Plot Example", "X-Axis", "Y-Axis", "class=\"legend\""] {
            assert!(out.contains(text), "missing {text}");
        }
        assert!(out.contains("stroke-dasharray"));
    }

    #[test]
    fn test_zorder_overrides_draw_order_when_painting() {
        let (fig, mut axes) = subplots(&FigureConfig::default());
        axes.plot(&[1.0, 2.0], &[1.0, 2.0], &Style::new().with("label", "front").with("zorder", 3.0))
            .unwrap();
        axes.bar(&[1.0, 2.0], &[2.0, 1.0], &Style::new().with("label", "back"))
            .unwrap();

        let out = render(&RenderFrame::capture(&fig, &axes));
        let back = out.find("data-label=\"back\"").unwrap();
        let front = out.find("data-label=\"front\"").unwrap();
        assert!(back < front);
        assert_eq!(axes.commands()[0].label.as_deref(), Some("front"));
    }

    #[test]
    fn test_line_breaks_at_nan() {
        let (fig, mut axes) = subplots(&FigureConfig::default());
        axes.plot(
            &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            &[1.0, 2.0, f64::NAN, 4.0, 5.0, 6.0],
            &Style::new(),
        )
        .unwrap();

        let out = render(&RenderFrame::capture(&fig, &axes));
        assert_eq!(out.matches("<polyline").count(), 2);
    }

    #[test]
    fn test_edges_are_stroked() {
        let (fig, mut axes) = subplots(&FigureConfig::default());
        axes.bar(&[1.0], &[2.0], &Style::new().with("color", "red")).unwrap();
        let out = render(&RenderFrame::capture(&fig, &axes));
        assert!(!out.contains("stroke=\"#ff0000\""));

        axes.scatter(&[1.0], &[1.0], &Style::new().with("color", "red").with("linewidth", 2.0))
            .unwrap();
        axes.bar(&[2.0], &[1.0], &Style::new().with("linewidth", 1.0).with("edgecolor", "blue"))
            .unwrap();
        let out = render(&RenderFrame::capture(&fig, &axes));
        assert!(out.contains("stroke=\"#ff0000\""));
        assert!(out.contains("stroke=\"#0000ff\""));
    }

    #[test]
    fn test_empty_frame_is_valid_document() {
        let (fig, axes) = subplots(&FigureConfig::default());
        let out = render(&RenderFrame::capture(&fig, &axes));
        assert!(out.contains("<clipPath"));
        assert!(out.trim_end().ends_with("</svg>"));
    }
}
