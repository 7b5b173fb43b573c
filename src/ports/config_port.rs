//! Configuration access port trait.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;

    /// `None` when the key is absent, `Some(Err(raw))` when present but not
    /// an integer.
    fn get_int_strict(&self, section: &str, key: &str) -> Option<Result<i64, String>> {
        self.get_string(section, key)
            .map(|raw| raw.trim().parse::<i64>().map_err(|_| raw))
    }
}
