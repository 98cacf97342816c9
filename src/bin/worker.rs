use caro_core::worker::GameWorker;
use gloo_worker::Registrable;

fn main() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    GameWorker::registrar().register();
}
