use eframe::{run_native, App, CreationContext, Frame, NativeOptions};
use egui::{CentralPanel, Context};

const APP_NAME: &str = "Asterism";

mod app;

pub struct AsterismApp {
    app: app::App,
}

impl AsterismApp {
    fn new(_: &CreationContext<'_>) -> Self {
        Self {
            app: app::App::new(),
        }
    }
}

impl App for AsterismApp {
    fn update(&mut self, ctx: &Context, _: &mut Frame) {
        CentralPanel::default().show(ctx, |ui| self.app.update(ctx, ui));
    }
}

fn main() -> eframe::Result {
    env_logger::init();

    run_native(
        APP_NAME,
        NativeOptions::default(),
        Box::new(|cc| Ok(Box::new(AsterismApp::new(cc)))),
    )
}
