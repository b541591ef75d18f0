use std::fmt;

/// Join key shared by the inventory, traffic and reverse DNS tables.
///
/// Either a bare IP address (`"1.2.3.4"`) or a subnet in `"ip/mask"` form
/// (`"2a01:4f8:111:4221::/64"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AddressKey(String);

impl AddressKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn subnet(ip: &str, mask: &str) -> Self {
        Self(format!("{}/{}", ip, mask))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Text before the first `/`, or the whole key for a bare address.
    pub fn ip_portion(&self) -> &str {
        self.0.split('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for AddressKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AddressKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for AddressKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}
