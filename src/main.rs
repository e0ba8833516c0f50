fn main() {
    if metasploit_mcp_lib::run().is_err() {
        std::process::exit(1);
    }
}
