fn main() {
    if let Err(err) = sales_pulse::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
