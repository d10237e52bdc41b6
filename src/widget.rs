use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::band;
use crate::editor::{self, EditContext};
use crate::mapper::DisplayRange;
use crate::model::{PixelPoint, PixelRect, RenderPoint};
use crate::normalize::normalize_keys;
use crate::render;
use crate::settings::EditorSettings;
use crate::store::{EffectAsset, FieldScope, KeyframeField};
use crate::surface::DrawSurface;

/// The edited asset is shared between the host editor and any number of
/// curve widgets on the UI thread.
pub type SharedAsset = Rc<RefCell<dyn EffectAsset>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub position: PixelPoint,
    pub click_count: u32,
}

impl PointerEvent {
    pub fn single(position: PixelPoint) -> Self {
        Self {
            position,
            click_count: 1,
        }
    }

    pub fn double(position: PixelPoint) -> Self {
        Self {
            position,
            click_count: 2,
        }
    }
}

/// The hooks the host widget framework drives. The host owns event dispatch
/// and layout; the editor only reacts through this seam.
pub trait GraphControl {
    fn on_pointer_down(&mut self, event: PointerEvent);
    fn on_pointer_drag(&mut self, event: PointerEvent);
    fn on_pointer_up(&mut self, event: PointerEvent);
    fn on_resize(&mut self, bounds: PixelRect);
    fn render(&mut self, surface: &mut dyn DrawSurface, cursor: Option<PixelPoint>);
}

/// Visual editor for one keyframed scalar field of a particle-effect asset.
///
/// Pointer gestures mutate the field store immediately; the widget only
/// caches the screen-space projection of the keys, rebuilt on the next
/// render pass whenever the dirty flag is set. A second editor can be
/// linked as a variation source, in which case its point list is composited
/// into a `base ± variation` band behind the curve.
pub struct CurveEditor {
    asset: Option<SharedAsset>,
    field_name: String,
    emitter_index: usize,
    variation: Option<Weak<RefCell<CurveEditor>>>,
    range: DisplayRange,
    label_x: String,
    label_y: String,
    settings: EditorSettings,
    bounds: PixelRect,
    selection: Option<usize>,
    dirty: bool,
    active: bool,
    point_list: Vec<RenderPoint>,
    grid_rect: PixelRect,
    last_origin: Option<PixelPoint>,
}

fn target_field<'a>(
    asset: &'a mut dyn EffectAsset,
    scope: FieldScope,
    name: &str,
) -> &'a mut dyn KeyframeField {
    match asset.field_mut(scope, name) {
        Some(field) => field,
        // A widget pointed at a field the asset doesn't define is a host
        // configuration bug, not a runtime condition to recover from.
        None => panic!("curve editor field '{name}' is missing from the asset and its emitters"),
    }
}

impl CurveEditor {
    pub fn new(settings: EditorSettings) -> Self {
        Self {
            asset: None,
            field_name: "QuantityScale".to_owned(),
            emitter_index: 0,
            variation: None,
            range: DisplayRange::default(),
            label_x: "Time".to_owned(),
            label_y: "Value".to_owned(),
            settings,
            bounds: PixelRect::new(0, 0, 300, 200),
            selection: None,
            dirty: true,
            active: false,
            point_list: Vec::new(),
            grid_rect: PixelRect::default(),
            last_origin: None,
        }
    }

    /// Points the widget at the asset whose fields it edits.
    pub fn inspect(&mut self, asset: SharedAsset) {
        self.asset = Some(asset);
        self.dirty = true;
    }

    /// Switches the edited field. Changing fields drops the selection, which
    /// indexes into the old field's keys.
    pub fn set_display_field(&mut self, name: &str) {
        if self.field_name != name {
            self.selection = None;
            self.field_name = name.to_owned();
        }
        self.dirty = true;
    }

    pub fn set_display_field_on_emitter(&mut self, name: &str, emitter_index: usize) {
        self.emitter_index = emitter_index;
        self.set_display_field(name);
    }

    /// Sets the domain window from its four boundary labels (numeric value
    /// parsed from each, zero fallback).
    pub fn set_display_area(&mut self, min_x: &str, min_y: &str, max_x: &str, max_y: &str) {
        self.range = DisplayRange::from_labels(min_x, min_y, max_x, max_y);
        self.dirty = true;
    }

    pub fn set_display_labels(&mut self, label_x: &str, label_y: &str) {
        self.label_x = label_x.to_owned();
        self.label_y = label_y.to_owned();
    }

    /// Links another editor as the variation source for band compositing.
    /// The link is weak: a dropped or not-yet-rendered source just means no
    /// band. Linking an editor to itself is not supported.
    pub fn link_variation(&mut self, source: Weak<RefCell<CurveEditor>>) {
        self.variation = Some(source);
    }

    pub fn clear_variation(&mut self) {
        self.variation = None;
    }

    pub fn set_settings(&mut self, settings: EditorSettings) {
        self.settings = settings;
        self.dirty = true;
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn range(&self) -> &DisplayRange {
        &self.range
    }

    pub fn bounds(&self) -> PixelRect {
        self.bounds
    }

    pub fn grid_rect(&self) -> PixelRect {
        self.grid_rect
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Host wake/sleep. An inactive editor exposes no point list.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// The last computed point list, for another editor's compositing pass.
    ///
    /// Returns `None` while the editor is inactive or has no target. When
    /// the cached list is stale it is recomputed against a placeholder rect
    /// so times and values are fresh, and the dirty flag stays set because
    /// the pixel placement still belongs to the next real render pass.
    pub fn render_points(&mut self) -> Option<&[RenderPoint]> {
        if !self.active || self.asset.is_none() {
            return None;
        }
        if self.dirty {
            self.recompute_points(PixelRect::new(0, 0, 1, 1));
            self.dirty = true;
        }
        Some(&self.point_list)
    }

    fn resolve_scope(&mut self, asset: &dyn EffectAsset) -> FieldScope {
        if asset.has_field(FieldScope::Asset, &self.field_name) {
            return FieldScope::Asset;
        }
        let last = asset.emitter_count().saturating_sub(1);
        if self.emitter_index > last {
            self.emitter_index = last;
        }
        FieldScope::Emitter(self.emitter_index)
    }

    fn recompute_points(&mut self, rect: PixelRect) {
        let Some(asset) = self.asset.clone() else {
            return;
        };
        let mut asset = asset.borrow_mut();
        let scope = self.resolve_scope(&*asset);
        let field = target_field(&mut *asset, scope, &self.field_name);
        let keys = normalize_keys(field);
        drop(asset);

        self.grid_rect = rect;
        self.point_list.clear();
        for (index, key) in keys.iter().enumerate() {
            match self.range.to_pixel(rect, key.time, key.value) {
                Ok(pixel) => self.point_list.push(RenderPoint {
                    pixel,
                    time: key.time,
                    value: key.value,
                    index,
                }),
                Err(err) => {
                    tracing::warn!(%err, "keyframes not projected; display range is degenerate");
                    self.point_list.clear();
                    break;
                }
            }
        }
        self.dirty = false;
    }
}

impl GraphControl for CurveEditor {
    fn on_pointer_down(&mut self, event: PointerEvent) {
        let Some(asset) = self.asset.clone() else {
            return;
        };
        let mut asset = asset.borrow_mut();
        let scope = self.resolve_scope(&*asset);
        let field = target_field(&mut *asset, scope, &self.field_name);
        let ctx = EditContext {
            grid: self.grid_rect,
            range: &self.range,
            points: &self.point_list,
            radius: self.settings.hit_radius,
        };
        match editor::handle_press(&ctx, field, event.position, event.click_count, &mut self.selection)
        {
            Ok(true) => self.dirty = true,
            Ok(false) => {}
            Err(err) => tracing::warn!(%err, "press ignored"),
        }
    }

    fn on_pointer_drag(&mut self, event: PointerEvent) {
        let Some(asset) = self.asset.clone() else {
            return;
        };
        let mut asset = asset.borrow_mut();
        let scope = self.resolve_scope(&*asset);
        let field = target_field(&mut *asset, scope, &self.field_name);
        let ctx = EditContext {
            grid: self.grid_rect,
            range: &self.range,
            points: &self.point_list,
            radius: self.settings.hit_radius,
        };
        match editor::handle_drag(&ctx, field, event.position, &mut self.selection) {
            Ok(true) => self.dirty = true,
            Ok(false) => {}
            Err(err) => tracing::warn!(%err, "drag ignored"),
        }
    }

    fn on_pointer_up(&mut self, _event: PointerEvent) {
        if let Some(asset) = &self.asset {
            asset.borrow_mut().refresh();
        }
    }

    fn on_resize(&mut self, bounds: PixelRect) {
        self.bounds = bounds;
        self.dirty = true;
    }

    fn render(&mut self, surface: &mut dyn DrawSurface, cursor: Option<PixelPoint>) {
        self.active = true;

        let rect = render::content_rect(self.bounds, self.settings.padding, surface, &self.range);
        render::draw_labels(
            surface,
            rect,
            &self.range,
            &self.label_x,
            &self.label_y,
            self.settings.label_color,
        );
        if !rect.is_valid() {
            return;
        }

        render::draw_grid(surface, rect, self.settings.grid_color);

        if self.asset.is_none() {
            return;
        }

        // The projection is tied to where the content rect last landed, so a
        // moved widget recomputes even without an explicit resize.
        if self.last_origin != Some(rect.origin()) {
            self.dirty = true;
        }
        if self.dirty {
            self.recompute_points(rect);
        }
        self.last_origin = Some(rect.origin());

        if let Some(source) = self.variation.as_ref().and_then(|link| link.upgrade()) {
            let mut source = source.borrow_mut();
            if let Some(variation_points) = source.render_points() {
                let color = self.settings.band_color();
                if let Err(err) = band::draw_band(
                    surface,
                    rect,
                    &self.range,
                    &self.point_list,
                    variation_points,
                    color,
                ) {
                    tracing::warn!(%err, "variation band skipped");
                }
            }
        }

        render::draw_curve(
            surface,
            rect,
            &self.point_list,
            self.selection,
            cursor,
            &self.settings,
        );
    }
}
