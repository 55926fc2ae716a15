fn main() {
    quotesync_lib::run()
}
