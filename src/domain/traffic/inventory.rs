use super::address::AddressKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subnet {
    pub ip: String,
    pub mask: String,
}

impl Subnet {
    pub fn key(&self) -> AddressKey {
        AddressKey::subnet(&self.ip, &self.mask)
    }
}

/// One leased server as reported by the inventory endpoint.
///
/// Rebuilt from scratch on every poll; nothing here is cached between cycles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerEntry {
    pub server_ip: Option<String>,
    pub server_number: u64,
    pub server_name: String,
    pub product: String,
    pub dc: String,
    pub traffic: String,
    pub flatrate: bool,
    pub status: String,
    pub throttled: bool,
    pub cancelled: bool,
    pub paid_until: String,
    pub ips: Vec<String>,
    pub subnets: Vec<Subnet>,
}

impl ServerEntry {
    /// Every join key owned by this server: directly assigned addresses first,
    /// then subnets in `ip/mask` form.
    pub fn address_keys(&self) -> impl Iterator<Item = AddressKey> + '_ {
        self.ips
            .iter()
            .map(|ip| AddressKey::new(ip.as_str()))
            .chain(self.subnets.iter().map(Subnet::key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_keys_cover_ips_and_subnets() {
        let server = ServerEntry {
            server_number: 100,
            ips: vec!["1.2.3.4".to_string()],
            subnets: vec![Subnet {
                ip: "10.0.0.0".to_string(),
                mask: "24".to_string(),
            }],
            ..Default::default()
        };

        let keys: Vec<String> = server.address_keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["1.2.3.4", "10.0.0.0/24"]);
    }
}
