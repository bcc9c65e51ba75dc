fn main() {
    if let Err(err) = dataset_insights::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
