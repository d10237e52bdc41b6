use particle_curve_editor::app::CurveEditorApp;
use particle_curve_editor::logging;
use particle_curve_editor::settings::EditorSettings;

use eframe::egui;

fn main() -> anyhow::Result<()> {
    let settings = EditorSettings::load("curve_editor.json")?;
    logging::init(settings.debug_logging);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([760.0, 420.0])
            .with_min_inner_size([480.0, 280.0]),
        ..Default::default()
    };

    let _ = eframe::run_native(
        "Particle Curve Editor",
        native_options,
        Box::new(move |_cc| Box::new(CurveEditorApp::new(settings))),
    );
    Ok(())
}
