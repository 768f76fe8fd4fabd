fn main() {
    sharedq::app::startup::startup();
}
