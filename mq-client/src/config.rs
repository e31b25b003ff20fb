//! Configuration module for environment variable parsing.
//!
//! All connection parameters are read once at startup and carried in an
//! immutable [`ConnectionConfig`]; the core components never touch the
//! environment themselves. Every connection key is mandatory and
//! validated here, before any connection attempt.

use std::env;

use crate::codec::{self, CodePage};
use crate::error::MqError;

/// Connection parameters for one queue-manager session, loaded from
/// environment variables.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Queue manager name (QMGR_NAME)
    pub qmgr_name: String,

    /// Channel name used for the connection path (CHANNEL)
    pub channel: String,

    /// Remote endpoint as a host:port string (HOST_PORT)
    pub host_port: String,

    /// Target queue (QUEUE_NAME)
    pub queue_name: String,

    /// User id for the handshake (USER)
    pub user: String,

    /// Password for the handshake (PASSWORD)
    pub password: String,

    /// Code page used both to tag and to encode outbound payloads
    /// (PUT_CCSID, default 500). Tag and bytes always agree.
    pub put_codepage: &'static CodePage,

    /// Code page used to decode payloads that arrive without a usable
    /// encoding tag (FALLBACK_CCSID, default 37).
    pub fallback_codepage: &'static CodePage,
}

impl ConnectionConfig {
    /// Load and validate configuration from environment variables.
    pub fn from_env() -> Result<Self, MqError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, MqError> {
        Ok(ConnectionConfig {
            qmgr_name: require(&lookup, "QMGR_NAME")?,
            channel: require(&lookup, "CHANNEL")?,
            host_port: require(&lookup, "HOST_PORT")?,
            queue_name: require(&lookup, "QUEUE_NAME")?,
            user: require(&lookup, "USER")?,
            password: require(&lookup, "PASSWORD")?,
            put_codepage: codepage(&lookup, "PUT_CCSID", 500)?,
            fallback_codepage: codepage(&lookup, "FALLBACK_CCSID", 37)?,
        })
    }
}

fn require(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, MqError> {
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(MqError::Config(name)),
    }
}

fn codepage(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default_ccsid: u16,
) -> Result<&'static CodePage, MqError> {
    let ccsid = match lookup(name) {
        None => default_ccsid,
        Some(raw) => raw
            .trim()
            .parse::<u16>()
            .map_err(|_| MqError::ConfigInvalid {
                name,
                reason: format!("not a CCSID number: {raw:?}"),
            })?,
    };
    codec::from_ccsid(ccsid).ok_or(MqError::ConfigInvalid {
        name,
        reason: format!("unsupported CCSID {ccsid}"),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn full_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("QMGR_NAME", "QM01"),
            ("CHANNEL", "DEV.APP.SVRCONN"),
            ("HOST_PORT", "mqhost.example.com:1414"),
            ("QUEUE_NAME", "DEV.QUEUE.1"),
            ("USER", "app"),
            ("PASSWORD", "secret"),
        ])
    }

    fn lookup_in(
        env: HashMap<&'static str, &'static str>,
    ) -> impl Fn(&str) -> Option<String> {
        move |name| env.get(name).map(|v| v.to_string())
    }

    #[test]
    fn loads_all_required_keys() {
        let config = ConnectionConfig::from_lookup(lookup_in(full_env())).unwrap();
        assert_eq!(config.qmgr_name, "QM01");
        assert_eq!(config.queue_name, "DEV.QUEUE.1");
        assert_eq!(config.host_port, "mqhost.example.com:1414");
        assert_eq!(config.put_codepage.ccsid, 500);
        assert_eq!(config.fallback_codepage.ccsid, 37);
    }

    #[test]
    fn missing_key_fails_fast() {
        let mut env = full_env();
        env.remove("PASSWORD");
        let err = ConnectionConfig::from_lookup(lookup_in(env)).unwrap_err();
        assert!(matches!(err, MqError::Config("PASSWORD")));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let mut env = full_env();
        env.insert("QUEUE_NAME", "   ");
        let err = ConnectionConfig::from_lookup(lookup_in(env)).unwrap_err();
        assert!(matches!(err, MqError::Config("QUEUE_NAME")));
    }

    #[test]
    fn codepage_overrides_apply() {
        let mut env = full_env();
        env.insert("PUT_CCSID", "37");
        env.insert("FALLBACK_CCSID", "500");
        let config = ConnectionConfig::from_lookup(lookup_in(env)).unwrap();
        assert_eq!(config.put_codepage.ccsid, 37);
        assert_eq!(config.fallback_codepage.ccsid, 500);
    }

    #[test]
    fn unsupported_ccsid_rejected() {
        let mut env = full_env();
        env.insert("PUT_CCSID", "1047");
        let err = ConnectionConfig::from_lookup(lookup_in(env)).unwrap_err();
        assert!(matches!(err, MqError::ConfigInvalid { name: "PUT_CCSID", .. }));
    }

    #[test]
    fn garbage_ccsid_rejected() {
        let mut env = full_env();
        env.insert("FALLBACK_CCSID", "ebcdic");
        let err = ConnectionConfig::from_lookup(lookup_in(env)).unwrap_err();
        assert!(matches!(
            err,
            MqError::ConfigInvalid {
                name: "FALLBACK_CCSID",
                ..
            }
        ));
    }
}
