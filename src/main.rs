//! boredit main entrypoint.

use boredit::run;
use boredit::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(e);
        std::process::exit(1);
    }
}
