mod app;
mod data;
mod layout;
mod util;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON dataset of topics with sentiment counts; uses a built-in sample
    /// set when omitted.
    #[arg(long)]
    dataset: Option<String>,
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };

    eframe::run_native(
        "mention bubbles",
        options,
        Box::new(move |cc| Ok(Box::new(app::BubbleApp::new(cc, args.dataset.clone())))),
    )
}
