// The parsnip command-line tool.
// Usage: parsnip <tokens|check|ast> <file> [options]

fn main() {
    parsnip::cli::run();
}
