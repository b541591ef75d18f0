//! Wire types of the Robot webservice JSON payloads.
//!
//! Decoding is lenient about missing or `null` fields; only the shape of the
//! document has to match.

use crate::domain::traffic::{
    AddressKey, ReverseDnsTable, ServerEntry, Subnet, TrafficRecord, TrafficTable,
};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ===== GET /server =====

#[derive(Debug, Deserialize)]
pub struct ServerListItem {
    pub server: ServerDto,
}

#[derive(Debug, Deserialize)]
pub struct ServerDto {
    #[serde(default)]
    pub server_ip: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub server_number: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub server_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub product: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dc: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub traffic: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub flatrate: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub throttled: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cancelled: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub paid_until: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ip: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subnet: Vec<SubnetDto>,
}

#[derive(Debug, Deserialize)]
pub struct SubnetDto {
    pub ip: String,
    pub mask: String,
}

impl From<ServerDto> for ServerEntry {
    fn from(dto: ServerDto) -> Self {
        Self {
            server_ip: dto.server_ip,
            server_number: dto.server_number,
            server_name: dto.server_name,
            product: dto.product,
            dc: dto.dc,
            traffic: dto.traffic,
            flatrate: dto.flatrate,
            status: dto.status,
            throttled: dto.throttled,
            cancelled: dto.cancelled,
            paid_until: dto.paid_until,
            ips: dto.ip,
            subnets: dto
                .subnet
                .into_iter()
                .map(|s| Subnet {
                    ip: s.ip,
                    mask: s.mask,
                })
                .collect(),
        }
    }
}

// ===== GET /rdns =====

#[derive(Debug, Deserialize)]
pub struct RdnsListItem {
    pub rdns: RdnsDto,
}

#[derive(Debug, Deserialize)]
pub struct RdnsDto {
    pub ip: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ptr: String,
}

pub fn into_rdns_table(items: Vec<RdnsListItem>) -> ReverseDnsTable {
    items
        .into_iter()
        .map(|item| (item.rdns.ip, item.rdns.ptr))
        .collect()
}

// ===== POST /traffic =====

#[derive(Debug, Deserialize)]
pub struct TrafficResponse {
    pub traffic: TrafficDto,
}

#[derive(Debug, Deserialize)]
pub struct TrafficDto {
    #[serde(rename = "type", default)]
    pub _kind: Option<String>,
    #[serde(rename = "from", default)]
    pub _from: Option<String>,
    #[serde(rename = "to", default)]
    pub _to: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: BTreeMap<String, TrafficDataDto>,
}

#[derive(Debug, Deserialize)]
pub struct TrafficDataDto {
    #[serde(rename = "in", default)]
    pub input: f64,
    #[serde(rename = "out", default)]
    pub output: f64,
    #[serde(default)]
    pub sum: f64,
}

impl From<TrafficDto> for TrafficTable {
    fn from(dto: TrafficDto) -> Self {
        dto.data
            .into_iter()
            .map(|(key, data)| {
                (
                    AddressKey::from(key),
                    TrafficRecord {
                        input: data.input,
                        output: data.output,
                        total: data.sum,
                    },
                )
            })
            .collect()
    }
}

// ===== Error envelope (non-2xx) =====

#[derive(Debug, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiErrorDto,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDto {
    pub status: u16,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_list_decoding() {
        let body = r#"[{"server":{
            "server_ip":"123.123.123.123","server_number":321,"server_name":"server1",
            "product":"EX 41","dc":"FSN1-DC1","traffic":"unlimited","flatrate":true,
            "status":"ready","throttled":false,"cancelled":false,"paid_until":"2026-10-31",
            "ip":["123.123.123.123"],
            "subnet":[{"ip":"2a01:4f8:111:4221::","mask":"64"}]
        }}]"#;

        let items: Vec<ServerListItem> = serde_json::from_str(body).unwrap();
        let server = ServerEntry::from(items.into_iter().next().unwrap().server);
        assert_eq!(server.server_number, 321);
        assert_eq!(server.product, "EX 41");
        assert_eq!(server.ips, vec!["123.123.123.123"]);
        assert_eq!(server.subnets[0].key().as_str(), "2a01:4f8:111:4221::/64");
    }

    #[test]
    fn test_null_collections_decode_as_empty() {
        let body = r#"[{"server":{"server_number":7,"server_name":null,"ip":null,"subnet":null}}]"#;
        let items: Vec<ServerListItem> = serde_json::from_str(body).unwrap();
        let server = ServerEntry::from(items.into_iter().next().unwrap().server);
        assert!(server.ips.is_empty());
        assert!(server.subnets.is_empty());
        assert_eq!(server.server_name, "");
    }

    #[test]
    fn test_traffic_decoding() {
        let body = r#"{"traffic":{"type":"month","from":"2026-10-01","to":"2026-10-31",
            "data":{"1.2.3.4":{"in":1.5,"out":2.25,"sum":3.75}}}}"#;
        let response: TrafficResponse = serde_json::from_str(body).unwrap();
        let table = TrafficTable::from(response.traffic);
        let record = table[&AddressKey::from("1.2.3.4")];
        assert_eq!(record.input, 1.5);
        assert_eq!(record.total, 3.75);
    }

    #[test]
    fn test_rdns_decoding() {
        let body = r#"[{"rdns":{"ip":"1.2.3.4","ptr":"host.example"}}]"#;
        let items: Vec<RdnsListItem> = serde_json::from_str(body).unwrap();
        let table = into_rdns_table(items);
        assert_eq!(table.resolve(&AddressKey::from("1.2.3.4")), Some("host.example"));
    }

    #[test]
    fn test_error_envelope_decoding() {
        let body = r#"{"error":{"status":404,"code":"SERVER_NOT_FOUND","message":"Server not found"}}"#;
        let envelope: ApiErrorEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.error.status, 404);
        assert_eq!(envelope.error.code, "SERVER_NOT_FOUND");
    }
}
