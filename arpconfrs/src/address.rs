/// Compose `scheme://host:port/database`.
///
/// Plain substitution: values are expected to have passed parameter
/// validation already, nothing is escaped.
pub fn connection_address(scheme: &str, host: &str, port: &str, database: &str) -> String {
    format!("{scheme}://{host}:{port}/{database}")
}
