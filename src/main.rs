fn main() {
    if let Err(err) = swing_gauge::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
