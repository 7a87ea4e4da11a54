// main.rs
mod app;
mod conversion;
mod platform;
mod utils;

use app::App;
use eframe::NativeOptions;

fn main() {
    // Storage permissions are requested before the window opens.
    let app = App::new(platform::current_platform());

    let native_options = NativeOptions {
        initial_window_size: Some(egui::Vec2::new(1000.0, 700.0)),
        resizable: true,
        ..Default::default()
    };
    eframe::run_native(
        "Image Converter",
        native_options,
        Box::new(move |_cc| Box::new(app)),
    );
}
