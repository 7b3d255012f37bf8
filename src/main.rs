use stressor::error::AppResult;

fn main() -> AppResult<()> {
    stressor::entry::run()
}
