#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() {
    env_logger::init();

    if let Err(error) = zoomable_image::run_cli() {
        log::error!("{error}");
        eprintln!("{error}");
        std::process::exit(1);
    }
}
