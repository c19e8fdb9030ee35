use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    regdispatch::example_apps::run_dispatch_demo(std::env::args().skip(1))
}
