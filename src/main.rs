fn main() {
    if let Err(err) = quick_notebooks::entry() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
