pub fn format_store_key(prefix: &str, key: &str) -> String {
    format!("{}:{}", prefix, key)
}
