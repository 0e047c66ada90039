use trafficgen::error::AppResult;

fn main() -> AppResult<()> {
    trafficgen::entry::run()
}
