mod action_bar;
mod app;
mod canvas;
mod theme;
mod toolbar;
mod ui_controls;

use eframe::egui;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let viewport = egui::ViewportBuilder::default()
        .with_title("Blackboard")
        .with_inner_size([1080.0, 760.0])
        .with_min_inner_size([480.0, 360.0]);

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Blackboard",
        options,
        Box::new(|cc| Box::new(app::BlackboardApp::new(cc))),
    )
}
