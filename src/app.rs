use std::cell::RefCell;
use std::rc::Rc;

use eframe::egui::{self, Color32, FontId, Pos2, Rect, Sense, Stroke, Vec2};

use crate::model::{Color, PixelPoint, PixelRect};
use crate::settings::EditorSettings;
use crate::store::MemoryAsset;
use crate::surface::DrawSurface;
use crate::widget::{CurveEditor, GraphControl, PointerEvent};

fn to_color32(color: Color) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

fn to_pos2(point: PixelPoint) -> Pos2 {
    Pos2::new(point.x as f32, point.y as f32)
}

fn to_pixel(pos: Pos2) -> PixelPoint {
    PixelPoint::new(pos.x as i32, pos.y as i32)
}

/// Adapts an egui painter to the editor's draw-primitive seam.
pub struct PainterSurface<'a> {
    painter: &'a egui::Painter,
    font: FontId,
}

impl<'a> PainterSurface<'a> {
    pub fn new(painter: &'a egui::Painter) -> Self {
        Self {
            painter,
            font: FontId::proportional(12.0),
        }
    }

    pub fn with_font(painter: &'a egui::Painter, font: FontId) -> Self {
        Self { painter, font }
    }
}

impl DrawSurface for PainterSurface<'_> {
    fn font_height(&self) -> i32 {
        self.painter.ctx().fonts(|f| f.row_height(&self.font)) as i32
    }

    fn text_width(&self, text: &str) -> i32 {
        self.painter
            .ctx()
            .fonts(|f| {
                f.layout_no_wrap(text.to_owned(), self.font.clone(), Color32::WHITE)
                    .size()
                    .x
            }) as i32
    }

    fn line(&mut self, from: PixelPoint, to: PixelPoint, color: Color) {
        self.painter.line_segment(
            [to_pos2(from), to_pos2(to)],
            Stroke::new(1.0, to_color32(color)),
        );
    }

    fn fill_rect(&mut self, rect: PixelRect, color: Color) {
        self.painter.rect_filled(
            Rect::from_min_size(
                to_pos2(rect.origin()),
                Vec2::new(rect.width as f32, rect.height as f32),
            ),
            0.0,
            to_color32(color),
        );
    }

    fn fill_triangle(&mut self, a: PixelPoint, b: PixelPoint, c: PixelPoint, color: Color) {
        self.painter.add(egui::Shape::convex_polygon(
            vec![to_pos2(a), to_pos2(b), to_pos2(c)],
            to_color32(color),
            Stroke::NONE,
        ));
    }

    fn fill_circle(&mut self, center: PixelPoint, radius: f32, color: Color) {
        self.painter
            .circle_filled(to_pos2(center), radius, to_color32(color));
    }

    fn text(&mut self, at: PixelPoint, text: &str, color: Color, rotated: bool) {
        if rotated {
            let galley =
                self.painter
                    .layout_no_wrap(text.to_owned(), self.font.clone(), to_color32(color));
            self.painter.add(
                egui::epaint::TextShape::new(to_pos2(at), galley, to_color32(color))
                    .with_angle(-std::f32::consts::FRAC_PI_2),
            );
        } else {
            self.painter.text(
                to_pos2(at),
                egui::Align2::LEFT_TOP,
                text,
                self.font.clone(),
                to_color32(color),
            );
        }
    }
}

impl CurveEditor {
    /// Wires the host-framework hooks to egui: the allocated rect drives
    /// resize, pointer state drives the gesture callbacks, and the painter
    /// backs the draw surface for the render pass.
    pub fn show(&mut self, ui: &mut egui::Ui, size: Vec2) -> egui::Response {
        let (rect, response) = ui.allocate_exact_size(size, Sense::click_and_drag());

        let bounds = PixelRect::new(
            rect.min.x as i32,
            rect.min.y as i32,
            rect.width() as i32,
            rect.height() as i32,
        );
        if bounds != self.bounds() {
            self.on_resize(bounds);
        }

        let double = ui.input(|i| i.pointer.button_double_clicked(egui::PointerButton::Primary));
        let pressed = ui.input(|i| i.pointer.primary_pressed());
        if (pressed || double) && response.hovered() {
            if let Some(pos) = response.interact_pointer_pos() {
                let event = if double {
                    PointerEvent::double(to_pixel(pos))
                } else {
                    PointerEvent::single(to_pixel(pos))
                };
                self.on_pointer_down(event);
            }
        }

        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.on_pointer_drag(PointerEvent::single(to_pixel(pos)));
            }
        }

        let released = ui.input(|i| i.pointer.primary_released());
        if response.drag_stopped() || (released && response.hovered()) {
            let pos = response
                .interact_pointer_pos()
                .or_else(|| response.hover_pos())
                .unwrap_or_else(|| rect.center());
            self.on_pointer_up(PointerEvent::single(to_pixel(pos)));
        }

        let painter = ui.painter_at(rect);
        let mut surface = PainterSurface::new(&painter);
        let cursor = response.hover_pos().map(to_pixel);
        self.render(&mut surface, cursor);

        response
    }
}

/// Demo host: one asset with a quantity curve and its variation curve, each
/// in its own editor, with the variation linked into the base editor's band.
pub struct CurveEditorApp {
    base: Rc<RefCell<CurveEditor>>,
    variation: Rc<RefCell<CurveEditor>>,
}

impl CurveEditorApp {
    pub fn new(settings: EditorSettings) -> Self {
        let mut asset = MemoryAsset::new();
        asset.insert_field("QuantityScale", &[(0.0, 5.0), (0.4, 8.0), (1.0, 3.0)]);
        asset.insert_field("QuantityScaleVariation", &[(0.0, 1.0), (0.7, 2.0)]);
        let asset: Rc<RefCell<MemoryAsset>> = Rc::new(RefCell::new(asset));

        let mut base = CurveEditor::new(settings.clone());
        base.inspect(asset.clone());
        base.set_display_field("QuantityScale");

        let mut variation = CurveEditor::new(settings);
        variation.inspect(asset.clone());
        variation.set_display_field("QuantityScaleVariation");
        variation.set_display_area("0", "0", "1", "5");

        let variation = Rc::new(RefCell::new(variation));
        base.link_variation(Rc::downgrade(&variation));

        Self {
            base: Rc::new(RefCell::new(base)),
            variation,
        }
    }
}

impl eframe::App for CurveEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let size = Vec2::new(
                (ui.available_width() - 16.0) / 2.0,
                ui.available_height() - 24.0,
            );
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label("Quantity");
                    self.base.borrow_mut().show(ui, size);
                });
                ui.vertical(|ui| {
                    ui.label("Variation");
                    self.variation.borrow_mut().show(ui, size);
                });
            });
        });
    }
}
