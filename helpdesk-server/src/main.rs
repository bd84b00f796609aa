fn main() {
    helpdesk_server::server::run();
}
