mod app;
mod commands;
mod components;
mod evaluators;
mod pages;
mod playground;
mod profile;
mod testsets;
mod theme;

use app::App;

fn main() {
    leptos::mount::mount_to_body(App);
}
