mod app;

use anyhow::Result;
use app::App;

fn main() -> Result<()> {
    App::run()
}
