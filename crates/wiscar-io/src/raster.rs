//! Rasterizing a rendered label region through a 2D canvas.
//!
//! [`CanvasRasterizer`] captures the label the way it is laid out on the
//! page: it looks the region up by its DOM id, then paints every text
//! node line by line at its laid-out position with its computed font and
//! color, and every `<hr>` as a rule in its computed border color and
//! style, onto an off-document canvas. The canvas is scaled by
//! `devicePixelRatio` so the export is as sharp as the screen.
//!
//! Only what a label contains is painted: text, rules and the region's
//! background and border. This is not a general DOM renderer.


use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    CanvasRenderingContext2d, CssStyleDeclaration, Document, Element, HtmlCanvasElement, Node,
    Window,
};
use wiscar_label::{RasterError, Rasterizer, RegionHandle, RgbaImage};

/// Canvas fill used under transparent region backgrounds.
const PAGE_BACKGROUND: &str = "#ffffff";

/// Dash pattern for rules styled `dashed`, in CSS pixels.
const DASH_PATTERN: [f64; 2] = [6.0, 4.0];

/// How far canvas text metrics may exceed a laid-out line box before a
/// word is moved to the next line, in CSS pixels.
const LINE_SLACK: f64 = 0.5;

fn platform(value: JsValue) -> RasterError {
    RasterError::Platform(format!("{value:?}"))
}

/// Rasterizes label regions in the current document.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanvasRasterizer {
    /// Output pixels per CSS pixel. `None` uses `devicePixelRatio`.
    scale: Option<f64>,
}

impl CanvasRasterizer {
    /// A rasterizer with a fixed output scale.
    #[must_use]
    pub const fn with_scale(scale: f64) -> Self {
        Self { scale: Some(scale) }
    }
}

impl Rasterizer for CanvasRasterizer {
    #[allow(
        clippy::future_not_send, // WASM is single-threaded; DOM handles are !Send
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    async fn rasterize(&self, region: &RegionHandle) -> Result<RgbaImage, RasterError> {
        // Let the browser finish the pending layout pass before reading
        // positions back.
        TimeoutFuture::new(0).await;

        let window =
            web_sys::window().ok_or_else(|| RasterError::Platform("no global window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| RasterError::Platform("no document".into()))?;

        let id = region.dom_id();
        let element = document
            .get_element_by_id(&id)
            .filter(|el| el.is_connected())
            .ok_or_else(|| RasterError::Detached(id.clone()))?;

        let bounds = element.get_bounding_client_rect();
        let scale = self
            .scale
            .unwrap_or_else(|| window.device_pixel_ratio())
            .max(1.0);
        let width = (bounds.width() * scale).ceil() as u32;
        let height = (bounds.height() * scale).ceil() as u32;
        if width == 0 || height == 0 {
            return Err(RasterError::EmptyRegion(id));
        }

        let canvas = document
            .create_element("canvas")
            .map_err(platform)?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|e| RasterError::Platform(format!("failed to cast canvas: {e:?}")))?;
        canvas.set_width(width);
        canvas.set_height(height);
        let ctx = canvas
            .get_context("2d")
            .map_err(platform)?
            .ok_or_else(|| RasterError::Platform("2d context unavailable".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|e| RasterError::Platform(format!("failed to cast context: {e:?}")))?;
        ctx.scale(scale, scale).map_err(platform)?;

        let painter = Painter {
            window: &window,
            document: &document,
            ctx: &ctx,
            left: bounds.left(),
            top: bounds.top(),
        };
        painter.paint_background(&element, bounds.width(), bounds.height())?;
        painter.paint_border(&element, bounds.width(), bounds.height())?;
        painter.paint_children(&element)?;

        let pixels = ctx
            .get_image_data(0.0, 0.0, f64::from(width), f64::from(height))
            .map_err(|e| RasterError::Tainted(format!("{e:?}")))?;
        RgbaImage::from_raw(width, height, pixels.data().0)
            .ok_or_else(|| RasterError::Platform("canvas returned a short pixel buffer".into()))
    }
}

/// Paints one region's nodes onto a canvas, relative to the region's
/// top-left corner.
struct Painter<'a> {
    window: &'a Window,
    document: &'a Document,
    ctx: &'a CanvasRenderingContext2d,
    left: f64,
    top: f64,
}

impl Painter<'_> {
    fn style(&self, element: &Element) -> Result<CssStyleDeclaration, RasterError> {
        self.window
            .get_computed_style(element)
            .map_err(platform)?
            .ok_or_else(|| RasterError::Platform("no computed style".into()))
    }

    fn paint_background(
        &self,
        element: &Element,
        width: f64,
        height: f64,
    ) -> Result<(), RasterError> {
        self.ctx.set_fill_style_str(PAGE_BACKGROUND);
        self.ctx.fill_rect(0.0, 0.0, width, height);

        let background = self
            .style(element)?
            .get_property_value("background-color")
            .map_err(platform)?;
        if !is_transparent(&background) {
            self.ctx.set_fill_style_str(&background);
            self.ctx.fill_rect(0.0, 0.0, width, height);
        }
        Ok(())
    }

    /// Stroke the region's border inside its bounds.
    ///
    /// Labels carry a uniform border, so the top edge's width, style and
    /// color stand for all four sides.
    fn paint_border(&self, element: &Element, width: f64, height: f64) -> Result<(), RasterError> {
        let style = self.style(element)?;
        let prop = |name: &str| style.get_property_value(name).map_err(platform);

        let Some(line) = css_px(&prop("border-top-width")?).filter(|w| *w > 0.0) else {
            return Ok(());
        };
        let color = prop("border-top-color")?;
        let hidden = matches!(prop("border-top-style")?.as_str(), "none" | "hidden");
        if hidden || is_transparent(&color) {
            return Ok(());
        }

        self.ctx
            .set_line_dash(&js_sys::Array::new())
            .map_err(platform)?;
        self.ctx.set_stroke_style_str(&color);
        self.ctx.set_line_width(line);
        self.ctx
            .stroke_rect(line / 2.0, line / 2.0, width - line, height - line);
        Ok(())
    }

    fn paint_children(&self, node: &Node) -> Result<(), RasterError> {
        let children = node.child_nodes();
        for i in 0..children.length() {
            if let Some(child) = children.get(i) {
                self.paint_node(&child)?;
            }
        }
        Ok(())
    }

    fn paint_node(&self, node: &Node) -> Result<(), RasterError> {
        match node.node_type() {
            Node::TEXT_NODE => self.paint_text(node),
            Node::ELEMENT_NODE => match node.dyn_ref::<Element>() {
                Some(el) if el.tag_name().eq_ignore_ascii_case("hr") => self.paint_rule(el),
                _ => self.paint_children(node),
            },
            _ => Ok(()),
        }
    }

    fn paint_text(&self, node: &Node) -> Result<(), RasterError> {
        let Some(text) = node.text_content() else {
            return Ok(());
        };
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }
        let Some(parent) = node.parent_element() else {
            return Ok(());
        };
        let style = self.style(&parent)?;

        // One client rect per line box the text was wrapped onto.
        let range = self.document.create_range().map_err(platform)?;
        range.select_node_contents(node).map_err(platform)?;
        let Some(rects) = range.get_client_rects() else {
            return Ok(());
        };
        let boxes: Vec<_> = (0..rects.length())
            .filter_map(|i| rects.item(i))
            .filter(|rect| rect.width() > 0.0)
            .collect();
        if boxes.is_empty() {
            return Ok(());
        }

        self.ctx.set_font(&font_shorthand(&style)?);
        self.ctx
            .set_fill_style_str(&style.get_property_value("color").map_err(platform)?);
        self.ctx.set_text_baseline("top");

        let widths: Vec<f64> = boxes.iter().map(web_sys::DomRect::width).collect();
        let pieces = split_lines(text, &widths, |piece| {
            self.ctx
                .measure_text(piece)
                .map(|metrics| metrics.width())
                .map_err(platform)
        })?;
        for (rect, piece) in boxes.iter().zip(&pieces) {
            self.ctx
                .fill_text(piece, rect.left() - self.left, rect.top() - self.top)
                .map_err(platform)?;
        }
        Ok(())
    }

    fn paint_rule(&self, rule: &Element) -> Result<(), RasterError> {
        let style = self.style(rule)?;
        let rect = rule.get_bounding_client_rect();

        let dash = js_sys::Array::new();
        if style.get_property_value("border-top-style").map_err(platform)? == "dashed" {
            for segment in DASH_PATTERN {
                dash.push(&JsValue::from_f64(segment));
            }
        }
        self.ctx.set_line_dash(&dash).map_err(platform)?;
        self.ctx.set_stroke_style_str(
            &style
                .get_property_value("border-top-color")
                .map_err(platform)?,
        );
        self.ctx.set_line_width(1.0);

        let y = rect.top() - self.top + 0.5;
        self.ctx.begin_path();
        self.ctx.move_to(rect.left() - self.left, y);
        self.ctx.line_to(rect.right() - self.left, y);
        self.ctx.stroke();
        Ok(())
    }
}

/// Build a canvas `font` value from an element's computed style.
///
/// The computed `font` shorthand is empty in some browsers, so it is
/// assembled from the longhands.
fn font_shorthand(style: &CssStyleDeclaration) -> Result<String, RasterError> {
    let prop = |name: &str| style.get_property_value(name).map_err(platform);
    Ok(format!(
        "{} {} {} {}",
        prop("font-style")?,
        prop("font-weight")?,
        prop("font-size")?,
        prop("font-family")?,
    ))
}

/// Split `text` into one piece per laid-out line box.
///
/// Words are taken greedily while they fit the line's width as reported
/// by `measure`. Every line gets at least one word, and the last line
/// takes whatever remains so no text is dropped.
fn split_lines<E>(
    text: &str,
    widths: &[f64],
    mut measure: impl FnMut(&str) -> Result<f64, E>,
) -> Result<Vec<String>, E> {
    let mut words = text.split_whitespace().peekable();
    let mut lines = Vec::with_capacity(widths.len());
    for (i, &width) in widths.iter().enumerate() {
        let last = i + 1 == widths.len();
        let mut line = String::new();
        while let Some(&word) = words.peek() {
            let candidate = if line.is_empty() {
                word.to_owned()
            } else {
                format!("{line} {word}")
            };
            if !last && !line.is_empty() && measure(&candidate)? > width + LINE_SLACK {
                break;
            }
            line = candidate;
            words.next();
        }
        lines.push(line);
    }
    Ok(lines)
}

/// Parse a computed CSS length in pixels, e.g. `"1px"`.
fn css_px(value: &str) -> Option<f64> {
    value.trim().strip_suffix("px")?.trim().parse().ok()
}

/// Whether a computed CSS color paints nothing.
fn is_transparent(color: &str) -> bool {
    let color = color.trim();
    color.is_empty()
        || color == "transparent"
        || color
            .strip_prefix("rgba(")
            .and_then(|rest| rest.strip_suffix(')'))
            .and_then(|args| args.rsplit(',').next())
            .is_some_and(|alpha| alpha.trim().parse::<f64>().is_ok_and(|a| a <= 0.0))
}
